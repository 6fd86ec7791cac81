//! Property-based tests for the table oracle

use parsesmith::oracle::{cells_agree, compare, equivalent, TableDiff, Verdict};
use parsesmith::table::{Cell, Table};
use proptest::prelude::*;

fn cell_strategy() -> impl Strategy<Value = Cell> {
    prop_oneof![
        Just(Cell::Missing),
        "[A-Za-z0-9 .,-]{0,12}".prop_map(Cell::Text),
        (-1.0e6f64..1.0e6f64).prop_map(Cell::Number),
    ]
}

/// Tables of 1..4 columns and 0..8 rows
fn table_strategy() -> impl Strategy<Value = Table> {
    (1usize..4).prop_flat_map(|width| {
        prop::collection::vec(prop::collection::vec(cell_strategy(), width), 0..8).prop_map(
            move |rows| {
                let columns = (0..width).map(|i| format!("col{}", i)).collect();
                Table::new(columns, rows).unwrap()
            },
        )
    })
}

/// A table always matches itself
#[test]
fn test_oracle_is_reflexive() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&table_strategy(), |table| {
            assert!(equivalent(&table, &table.clone()));
            Ok(())
        })
        .unwrap();
}

/// Verdicts agree in both directions
#[test]
fn test_oracle_is_symmetric() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(table_strategy(), table_strategy()), |(a, b)| {
            assert_eq!(equivalent(&a, &b), equivalent(&b, &a));
            Ok(())
        })
        .unwrap();
}

/// Surrounding whitespace on text cells never changes the verdict
#[test]
fn test_padding_text_cells_keeps_equivalence() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&table_strategy(), |table| {
            let padded_rows = table
                .rows()
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|cell| match cell {
                            Cell::Text(text) => Cell::Text(format!("  {}\t", text)),
                            other => other.clone(),
                        })
                        .collect()
                })
                .collect();
            let padded = Table::new(table.columns().to_vec(), padded_rows).unwrap();
            assert!(equivalent(&padded, &table));
            Ok(())
        })
        .unwrap();
}

/// Swapping two distinct rows breaks equivalence: row order is significant
#[test]
fn test_row_order_is_significant() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&table_strategy(), |table| {
            prop_assume!(table.row_count() >= 2);
            let first = table.rows()[0].clone();
            let last = table.rows()[table.row_count() - 1].clone();
            prop_assume!(!first.iter().zip(&last).all(|(a, b)| cells_agree(a, b)));

            let mut rows = table.rows().to_vec();
            let end = rows.len() - 1;
            rows.swap(0, end);
            let swapped = Table::new(table.columns().to_vec(), rows).unwrap();
            assert!(!equivalent(&swapped, &table));
            Ok(())
        })
        .unwrap();
}

/// Dropping a row is always a row count mismatch, whatever the cells say
#[test]
fn test_dropped_row_reports_row_count() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&table_strategy(), |table| {
            prop_assume!(!table.is_empty());
            let rows = table.rows()[1..].to_vec();
            let shorter = Table::new(table.columns().to_vec(), rows).unwrap();
            assert_eq!(
                compare(&shorter, &table),
                Verdict::Mismatch(TableDiff::RowCountMismatch {
                    expected: table.row_count(),
                    actual: table.row_count() - 1,
                })
            );
            Ok(())
        })
        .unwrap();
}

#[test]
fn test_missing_is_not_empty_text() {
    let columns = vec!["Debit Amt".to_string()];
    let missing = Table::new(columns.clone(), vec![vec![Cell::Missing]]).unwrap();
    let empty = Table::new(columns.clone(), vec![vec![Cell::text("")]]).unwrap();
    let nan = Table::new(columns, vec![vec![Cell::Number(f64::NAN)]]).unwrap();

    assert!(!equivalent(&missing, &empty));
    assert!(equivalent(&missing, &nan));
}

#[test]
fn test_empty_candidate_never_matches_non_empty_reference() {
    let reference = Table::from_csv_reader("Date,Balance\n01-08-2024,6864.58\n".as_bytes()).unwrap();
    let candidate = Table::new(reference.columns().to_vec(), vec![]).unwrap();
    assert!(!equivalent(&candidate, &reference));
    assert!(!equivalent(&Table::empty(), &reference));
}
