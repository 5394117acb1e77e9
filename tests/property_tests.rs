//! Property-based tests for SQL statement building
//!
//! These tests check, for arbitrary valid identifiers and values, that:
//! - insert lists exactly one placeholder per column and binds every value
//! - select emits one ANDed equality per condition, in order
//! - raw fragments appear verbatim after WHERE

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use tablekit::crud::statement::{build_delete, build_insert, build_select, build_update};
    use tablekit::{Predicate, Record, Value};

    fn arb_identifier() -> impl Strategy<Value = String> {
        "[a-zA-Z_][a-zA-Z0-9_]{0,15}".prop_map(|s: String| s)
    }

    fn arb_value() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<i64>().prop_map(Value::Integer),
            (-1.0e6..1.0e6f64).prop_map(Value::Real),
            "[ -~]{0,20}".prop_map(Value::Text),
            prop::collection::vec(any::<u8>(), 0..8).prop_map(Value::Blob),
        ]
    }

    fn arb_record(min: usize) -> impl Strategy<Value = Record> {
        prop::collection::vec((arb_identifier(), arb_value()), min..8)
            .prop_map(|fields| fields.into_iter().collect::<Record>())
    }

    proptest! {
        /// Column count, placeholder count and binding count all match the data
        #[test]
        fn prop_insert_binds_every_column(table in arb_identifier(), data in arb_record(1)) {
            let stmt = build_insert(&table, &data).unwrap();

            let columns: Vec<&str> = data.keys().collect();
            let expected = format!(
                "INSERT INTO {} ({}) VALUES ({})",
                table,
                columns.join(", "),
                columns.iter().map(|c| format!(":{}", c)).collect::<Vec<_>>().join(", ")
            );
            prop_assert_eq!(&stmt.sql, &expected);
            prop_assert_eq!(stmt.params.len(), data.len());
            for ((name, bound), (column, value)) in stmt.params.iter().zip(data.iter()) {
                prop_assert_eq!(name, &format!(":{}", column));
                prop_assert_eq!(bound, value);
            }
        }

        /// One equality term per condition, in the record's order
        #[test]
        fn prop_select_where_terms_follow_conditions(table in arb_identifier(), conditions in arb_record(0)) {
            let stmt = build_select(&table, &conditions).unwrap();
            if conditions.is_empty() {
                prop_assert_eq!(stmt.sql, format!("SELECT * FROM {}", table));
            } else {
                let (_, clause) = stmt.sql.split_once(" WHERE ").unwrap();
                let terms: Vec<&str> = clause.split(" AND ").collect();
                prop_assert_eq!(terms.len(), conditions.len());
                for (term, column) in terms.iter().zip(conditions.keys()) {
                    prop_assert_eq!(*term, format!("{} = :{}", column, column));
                }
            }
        }

        /// Raw fragments are copied verbatim after WHERE
        #[test]
        fn prop_raw_fragment_verbatim(column in arb_identifier(), n in any::<i32>(), data in arb_record(1)) {
            let fragment = format!("{} = {}", column, n);
            let predicate = Predicate::raw(&fragment);

            let update = build_update("users", &data, &predicate).unwrap();
            let expected_suffix = format!(" WHERE {}", fragment);
            prop_assert!(update.sql.ends_with(&expected_suffix));

            let delete = build_delete("users", &predicate).unwrap();
            prop_assert_eq!(delete.sql, format!("DELETE FROM users WHERE {}", fragment));
            prop_assert!(delete.params.is_empty());
        }

        /// Values never leak into the SQL text
        #[test]
        fn prop_text_values_are_not_interpolated(text in "[a-z]{12,20}") {
            let data = Record::new().with_value("note", text.as_str());
            let stmt = build_insert("notes", &data).unwrap();
            prop_assert!(!stmt.sql.contains(&text));
        }
    }
}
