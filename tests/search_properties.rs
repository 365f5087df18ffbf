use csvseek::{SearchScope, Table, export, parse, search};

fn tables() -> Vec<Table> {
    [
        include_str!("fixtures/sample-data.csv"),
        "a,b\n1,2\n3,x",
        "k,k,v\nAB,ab,1\ncd,CD,2\n,,",
        "only\n",
        "n,s\n10,ten\n-1.5,minus\n1e3,thousand\nInfinity,big",
    ]
    .iter()
    .map(|text| parse(text).unwrap())
    .collect()
}

const TERMS: [&str; 8] = ["a", "PUNE", "12", "1", "-", "in", "zzz", "1000"];

fn naive_hit(table: &Table, idx: usize, term: &str) -> bool {
    let needle = term.to_lowercase();
    let row = &table.rows()[idx];
    row.values(table.headers())
        .any(|v| v.to_lowercase().contains(&needle))
}

#[test]
fn all_columns_equals_naive_filter() {
    for table in tables() {
        for term in TERMS {
            let results = search(&table, term, &SearchScope::All);
            assert!(results.iter().all(|r| !r.matched_columns.is_empty()));

            let got: Vec<usize> = results.iter().map(|r| r.index).collect();
            let expected: Vec<usize> = (0..table.nrows())
                .filter(|&idx| naive_hit(&table, idx, term))
                .collect();
            assert_eq!(got, expected, "term {term:?} in {:?}", table.headers());
        }
    }
}

#[test]
fn empty_term_never_matches() {
    for table in tables() {
        assert!(search(&table, "", &SearchScope::All).is_empty());
        for header in table.headers() {
            assert!(search(&table, "", &SearchScope::from(header.as_str())).is_empty());
        }
    }
}

#[test]
fn column_scope_only_reports_that_column() {
    for table in tables() {
        for header in table.headers() {
            for term in TERMS {
                for r in search(&table, term, &SearchScope::from(header.as_str())) {
                    assert_eq!(r.matched_columns, vec![header.as_str()]);
                }
            }
        }
    }
}

#[test]
fn results_point_into_the_table() {
    for table in tables() {
        for r in search(&table, "a", &SearchScope::All) {
            assert!(std::ptr::eq(r.row, &table.rows()[r.index]));
        }
    }
}

#[test]
fn sample_data_search() {
    let table = parse(include_str!("fixtures/sample-data.csv")).unwrap();
    let pune = search(&table, "pune", &SearchScope::from("city"));
    let ids: Vec<String> = pune
        .iter()
        .map(|r| r.row.get("id").unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["1", "4", "7"]);

    // "12" hits the ward column and id 12
    let twelve = search(&table, "12", &SearchScope::All);
    let last = twelve.last().unwrap();
    assert_eq!(last.index, 11);
    assert_eq!(last.matched_columns, vec!["id", "ward"]);
}

#[test]
fn export_round_trips_without_embedded_commas() {
    for table in tables() {
        let again = parse(&export(table.headers(), table.rows())).unwrap();
        // duplicate headers collapse to one key per row, so compare through export
        assert_eq!(
            export(again.headers(), again.rows()),
            export(table.headers(), table.rows())
        );
    }
    let table = parse("a,b\n1,x\n2,").unwrap();
    assert_eq!(parse(&export(table.headers(), table.rows())).unwrap(), table);
}

#[test]
fn export_loses_embedded_commas() {
    let headers = vec!["name".to_string(), "note".to_string()];
    let row: csvseek::Row = [
        ("name", csvseek::Cell::from("Ann")),
        ("note", csvseek::Cell::from("x,y")),
    ]
    .into_iter()
    .collect();
    let text = export(&headers, [&row]);
    assert_eq!(text, "name,note\nAnn,x,y");
    let parsed = parse(&text).unwrap();
    assert_ne!(parsed.rows()[0].get("note"), row.get("note"));
}
