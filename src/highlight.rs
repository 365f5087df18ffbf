/// A piece of a cell's text, either part of a search hit or plain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub matched: bool,
}

/// Splits `text` around every case-insensitive occurrence of `term`.
///
/// Occurrences do not overlap and are found left to right. The term is taken
/// literally, characters with a special meaning in patterns have none here.
pub fn segments<'a>(text: &'a str, term: &str) -> Vec<Segment<'a>> {
    let needle: Vec<char> = term.chars().flat_map(char::to_lowercase).collect();
    if needle.is_empty() {
        return vec![Segment {
            text,
            matched: false,
        }];
    }

    let mut out = Vec::new();
    let mut plain_start = 0;
    let mut pos = 0;
    while pos < text.len() {
        if let Some(len) = match_len_at(&text[pos..], &needle) {
            if plain_start < pos {
                out.push(Segment {
                    text: &text[plain_start..pos],
                    matched: false,
                });
            }
            out.push(Segment {
                text: &text[pos..pos + len],
                matched: true,
            });
            pos += len;
            plain_start = pos;
        } else {
            pos += text[pos..].chars().next().map(char::len_utf8).unwrap_or(1);
        }
    }
    if plain_start < text.len() || out.is_empty() {
        out.push(Segment {
            text: &text[plain_start..],
            matched: false,
        });
    }
    out
}

// Byte length of the prefix of `haystack` whose lowercase form equals `needle`.
// Characters are consumed whole, a match that would end inside the lowercase
// expansion of a character does not count.
fn match_len_at(haystack: &str, needle: &[char]) -> Option<usize> {
    let mut matched = 0;
    for (idx, c) in haystack.char_indices() {
        for lc in c.to_lowercase() {
            if matched == needle.len() || needle[matched] != lc {
                return None;
            }
            matched += 1;
        }
        if matched == needle.len() {
            return Some(idx + c.len_utf8());
        }
    }
    None
}
