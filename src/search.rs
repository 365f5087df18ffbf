use std::fmt;

use tracing::trace;

use crate::table::{Row, Table};

/// Sentinel scope name selecting every column.
pub const ALL_COLUMNS: &str = "all";

/// Which columns a search looks at.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SearchScope {
    #[default]
    All,
    Column(String),
}

impl SearchScope {
    pub fn column(&self) -> Option<&str> {
        match self {
            SearchScope::All => None,
            SearchScope::Column(name) => Some(name.as_str()),
        }
    }

    /// Next scope in the cycle `all -> first header -> ... -> last header -> all`.
    pub fn cycle(&self, headers: &[String]) -> SearchScope {
        let next = match self {
            SearchScope::All => headers.first(),
            SearchScope::Column(name) => headers
                .iter()
                .position(|h| h == name)
                .and_then(|idx| headers.get(idx + 1)),
        };
        next.map(|h| SearchScope::Column(h.clone()))
            .unwrap_or(SearchScope::All)
    }
}

// Only the literal sentinel means "all", every other value names a column.
impl From<&str> for SearchScope {
    fn from(s: &str) -> Self {
        if s == ALL_COLUMNS {
            SearchScope::All
        } else {
            SearchScope::Column(s.to_string())
        }
    }
}

impl fmt::Display for SearchScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchScope::All => f.write_str(ALL_COLUMNS),
            SearchScope::Column(name) => f.write_str(name),
        }
    }
}

/// A table row that matched, borrowed straight from the table.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult<'a> {
    pub row: &'a Row,
    /// Position of the row in [`Table::rows`].
    pub index: usize,
    /// Matched column names, in header order, without repeats.
    pub matched_columns: Vec<&'a str>,
}

impl MatchResult<'_> {
    pub fn matched(&self, column: &str) -> bool {
        self.matched_columns.contains(&column)
    }
}

/// Case-insensitive substring search over `table`.
///
/// An empty term returns no results. Results keep the row order of the table.
/// A scope naming an unknown column matches nothing.
pub fn search<'a>(table: &'a Table, term: &str, scope: &SearchScope) -> Vec<MatchResult<'a>> {
    if term.is_empty() {
        return Vec::new();
    }
    let needle = term.to_lowercase();

    let results: Vec<MatchResult<'a>> = table
        .rows()
        .iter()
        .enumerate()
        .filter_map(|(index, row)| {
            let matched_columns = match scope {
                SearchScope::Column(name) => table
                    .headers()
                    .iter()
                    .find(|h| *h == name)
                    .filter(|h| cell_contains(row, h, &needle))
                    .map(|h| vec![h.as_str()])
                    .unwrap_or_default(),
                SearchScope::All => {
                    let mut columns: Vec<&'a str> = Vec::new();
                    for header in table.headers() {
                        if !columns.contains(&header.as_str()) && cell_contains(row, header, &needle) {
                            columns.push(header);
                        }
                    }
                    columns
                }
            };
            (!matched_columns.is_empty()).then_some(MatchResult {
                row,
                index,
                matched_columns,
            })
        })
        .collect();

    trace!(
        "Search for {:?} in {} matched {} of {} rows",
        term,
        scope,
        results.len(),
        table.nrows()
    );
    results
}

/// Whether the cell under `column` contains the already lowercased `needle`.
pub fn cell_contains(row: &Row, column: &str, needle: &str) -> bool {
    row.get(column)
        .map(|cell| cell.to_string().to_lowercase().contains(needle))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn people() -> Table {
        parse("name,city,age\nAnna,Berlin,31\nBob,Annaberg,45\nCarl,Rome,13\nDora,Oslo,anna").unwrap()
    }

    #[test]
    fn empty_term_returns_nothing() {
        let table = people();
        assert!(search(&table, "", &SearchScope::All).is_empty());
        assert!(search(&table, "", &SearchScope::from("name")).is_empty());
    }

    #[test]
    fn all_columns_reports_every_match_in_header_order() {
        let table = people();
        let results = search(&table, "ANNA", &SearchScope::All);
        let hits: Vec<(usize, Vec<&str>)> = results
            .iter()
            .map(|r| (r.index, r.matched_columns.clone()))
            .collect();
        assert_eq!(
            hits,
            vec![(0, vec!["name"]), (1, vec!["city"]), (3, vec!["age"])]
        );
    }

    #[test]
    fn single_column_only_reports_that_column() {
        let table = people();
        let results = search(&table, "anna", &SearchScope::from("city"));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].index, 1);
        assert_eq!(results[0].matched_columns, vec!["city"]);
    }

    #[test]
    fn numbers_are_searched_by_their_rendering() {
        let table = people();
        let results = search(&table, "3", &SearchScope::from("age"));
        let indices: Vec<usize> = results.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![0, 2]);

        let table = parse("v\n1.50\n2").unwrap();
        assert!(search(&table, "1.50", &SearchScope::All).is_empty());
        assert_eq!(search(&table, "1.5", &SearchScope::All).len(), 1);
    }

    #[test]
    fn unknown_column_matches_nothing() {
        let table = people();
        assert!(search(&table, "a", &SearchScope::from("country")).is_empty());
        // "undefined" must not leak in as the text of a missing cell
        assert!(search(&table, "undefined", &SearchScope::from("country")).is_empty());
    }

    #[test]
    fn rows_are_borrowed_from_the_table() {
        let table = people();
        let results = search(&table, "rome", &SearchScope::All);
        assert!(std::ptr::eq(results[0].row, &table.rows()[2]));
    }

    #[test]
    fn duplicate_headers_are_reported_once() {
        let table = parse("k,k\nx,hit").unwrap();
        let results = search(&table, "hit", &SearchScope::All);
        assert_eq!(results[0].matched_columns, vec!["k"]);
    }

    #[test]
    fn scope_parsing_uses_literal_sentinel() {
        assert_eq!(SearchScope::from("all"), SearchScope::All);
        assert_eq!(SearchScope::from("All"), SearchScope::Column("All".into()));
        assert_eq!(SearchScope::All.to_string(), "all");
    }

    #[test]
    fn scope_cycles_through_headers() {
        let headers = vec!["a".to_string(), "b".to_string()];
        let s1 = SearchScope::All.cycle(&headers);
        assert_eq!(s1, SearchScope::Column("a".into()));
        let s2 = s1.cycle(&headers);
        assert_eq!(s2, SearchScope::Column("b".into()));
        assert_eq!(s2.cycle(&headers), SearchScope::All);
        assert_eq!(SearchScope::Column("gone".into()).cycle(&headers), SearchScope::All);
        assert_eq!(SearchScope::All.cycle(&[]), SearchScope::All);
    }
}
