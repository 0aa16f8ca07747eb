//! Integration tests for cascading facet filters.

use lineage::filter::{FacetFilter, RowCounts};
use lineage::table::RowTable;

fn table() -> RowTable {
    let grid = [
        ["childTableName", "childTableType", "relationship", "parentTableName", "parentTableType"],
        ["orders", "view", "uses", "raw_orders", "source"],
        ["customers", "view", "uses", "raw_customers", "source"],
        ["revenue", "table", "reads", "orders", "view"],
        ["churn", "table", "reads", "customers", "view"],
        ["audit", "table", "copies", "raw_orders", "source"],
    ];
    let grid = grid
        .iter()
        .map(|r| r.iter().map(|c| c.to_string()).collect())
        .collect();
    RowTable::from_grid(grid).unwrap()
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[test]
fn test_unfiltered_values_are_sorted_and_distinct() {
    let filter = FacetFilter::new(table());
    assert_eq!(
        filter.available_values("relationship"),
        strings(&["copies", "reads", "uses"])
    );
    assert_eq!(filter.row_counts(), RowCounts { total: 5, filtered: 5 });
}

#[test]
fn test_other_columns_narrow_the_candidates() {
    let mut filter = FacetFilter::new(table());
    filter.toggle_value("childTableType", "view");

    assert_eq!(filter.available_values("relationship"), strings(&["uses"]));
    // A column's own selection never narrows its own candidates.
    assert_eq!(
        filter.available_values("childTableType"),
        strings(&["table", "view"])
    );
}

#[test]
fn test_available_values_are_reachable() {
    let mut filter = FacetFilter::new(table());
    filter.toggle_value("childTableType", "table");
    filter.toggle_value("parentTableType", "view");

    for column in filter.columns() {
        for value in filter.available_values(&column) {
            let mut probe = filter.clone();
            probe.clear_column(&column);
            probe.toggle_value(&column, &value);
            assert!(
                probe.row_counts().filtered > 0,
                "{}={} leaves no rows",
                column,
                value
            );
        }
    }
}

#[test]
fn test_and_across_columns_or_within_a_column() {
    let mut filter = FacetFilter::new(table());
    filter.toggle_value("relationship", "reads");
    filter.toggle_value("relationship", "copies");
    assert_eq!(filter.row_counts().filtered, 3);

    filter.toggle_value("parentTableType", "view");
    assert_eq!(filter.row_counts().filtered, 2);
}

#[test]
fn test_toggle_twice_removes_the_restriction() {
    let mut filter = FacetFilter::new(table());
    assert!(filter.toggle_value("relationship", "uses"));
    assert!(!filter.toggle_value("relationship", "uses"));
    assert!(filter.state().is_empty());
    assert_eq!(filter.row_counts().filtered, 5);
}

#[test]
fn test_select_all_twice_leaves_column_unrestricted() {
    let mut filter = FacetFilter::new(table());
    filter.select_all("relationship");
    assert!(filter.is_fully_selected("relationship"));
    assert_eq!(filter.row_counts().filtered, 5);

    filter.select_all("relationship");
    assert!(filter.state().selected("relationship").is_none());
}

#[test]
fn test_select_all_completes_a_partial_selection() {
    let mut filter = FacetFilter::new(table());
    filter.toggle_value("relationship", "uses");
    filter.select_all("relationship");

    let selected = filter.state().selected("relationship").unwrap();
    assert_eq!(selected.len(), 3);
}

#[test]
fn test_filtered_table_keeps_header_and_row_order() {
    let mut filter = FacetFilter::new(table());
    filter.toggle_value("childTableType", "table");

    let filtered = filter.filtered_table();
    assert_eq!(filtered.header(), filter.table().header());
    let children: Vec<&str> = filtered.rows().iter().map(|r| r[0].as_str()).collect();
    assert_eq!(children, vec!["revenue", "churn", "audit"]);
}

#[test]
fn test_filters_match_normalized_column_names() {
    let mut filter = FacetFilter::new(table());
    filter.toggle_value("Child Table Type", "view");
    assert!(filter.state().is_restricted("childtabletype"));
    assert_eq!(filter.row_counts().filtered, 2);
}

#[test]
fn test_clear_all_restores_every_row() {
    let mut filter = FacetFilter::new(table());
    filter.toggle_value("relationship", "uses");
    filter.toggle_value("childTableType", "view");
    filter.clear_all();
    assert_eq!(filter.row_counts(), RowCounts { total: 5, filtered: 5 });
}
