use thiserror::Error;
use tracing::{debug, trace};

use crate::table::{Cell, Row, Table};

pub const DELIMITER: char = ',';

/// UTF-8 byte order mark some spreadsheet tools put in front of CSV exports.
pub const BOM: char = '\u{feff}';

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("CSV file is empty")]
pub struct EmptyInputError;

/// Parses comma separated text into a [`Table`].
///
/// The first line holds the headers. Every following line becomes one row,
/// values are matched to headers by position. Quoting is not supported, a
/// comma always starts a new field.
pub fn parse(text: &str) -> Result<Table, EmptyInputError> {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(EmptyInputError);
    }

    let mut lines = trimmed.split('\n');
    let headers: Vec<String> = match lines.next() {
        Some(line) => split_fields(line).map(str::to_string).collect(),
        None => return Err(EmptyInputError),
    };
    trace!("Headers {:?}", headers);

    let rows: Vec<Row> = lines.map(|line| parse_row(&headers, line)).collect();

    debug!(
        "Parsed {} rows with {} columns",
        rows.len(),
        headers.len()
    );
    Ok(Table::new(headers, rows))
}

fn split_fields(line: &str) -> impl Iterator<Item = &str> {
    line.split(DELIMITER).map(str::trim)
}

fn parse_row(headers: &[String], line: &str) -> Row {
    let mut values = split_fields(line);
    let mut row = Row::new();
    // Extra values past the last header are ignored, missing ones become "".
    for header in headers {
        let value = values.next().unwrap_or("");
        row.insert(header.as_str(), coerce(value));
    }
    row
}

/// Types a single trimmed value. Blank values stay text.
pub fn coerce(value: &str) -> Cell {
    match parse_number(value) {
        Some(n) => Cell::Number(n),
        None => Cell::Text(value.to_string()),
    }
}

/// Accepts the number forms a browser's `Number()` accepts: decimals with an
/// optional sign, fraction and exponent, `Infinity`, and unsigned hex, octal
/// and binary integer literals.
pub fn parse_number(s: &str) -> Option<f64> {
    if s.is_empty() {
        return None;
    }

    let (sign, body) = match s.as_bytes()[0] {
        b'-' => (-1.0, &s[1..]),
        b'+' => (1.0, &s[1..]),
        _ => (1.0, s),
    };

    if body == "Infinity" {
        return Some(sign * f64::INFINITY);
    }

    if body.len() == s.len() && body.len() > 2 && body.starts_with('0') {
        let radix = match body.as_bytes()[1] {
            b'x' | b'X' => Some(16),
            b'o' | b'O' => Some(8),
            b'b' | b'B' => Some(2),
            _ => None,
        };
        if let Some(radix) = radix {
            return parse_radix(&body[2..], radix);
        }
    }

    if !is_decimal_literal(body) {
        return None;
    }
    body.parse::<f64>().ok().map(|n| sign * n)
}

fn parse_radix(digits: &str, radix: u32) -> Option<f64> {
    if digits.is_empty() {
        return None;
    }
    digits.chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(radix).map(|d| acc * radix as f64 + d as f64)
    })
}

// digits [ "." digits ] [ ("e"|"E") [sign] digits ], with at least one digit
// on either side of the point.
fn is_decimal_literal(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut pos = 0;

    let int_digits = count_digits(&bytes[pos..]);
    pos += int_digits;

    let mut frac_digits = 0;
    if bytes.get(pos) == Some(&b'.') {
        pos += 1;
        frac_digits = count_digits(&bytes[pos..]);
        pos += frac_digits;
    }
    if int_digits == 0 && frac_digits == 0 {
        return false;
    }

    if matches!(bytes.get(pos), Some(b'e') | Some(b'E')) {
        pos += 1;
        if matches!(bytes.get(pos), Some(b'+') | Some(b'-')) {
            pos += 1;
        }
        let exp_digits = count_digits(&bytes[pos..]);
        if exp_digits == 0 {
            return false;
        }
        pos += exp_digits;
    }

    pos == bytes.len()
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}
