// 🔎 Table Views - Search, sort and page through in-memory lists
//
// Every list page (income, expenses, categories, accounts) derives what it
// shows from the same three steps:
//   1. case-insensitive substring search over the record's searchable fields
//   2. stable sort on one column, ascending or descending
//   3. slicing into fixed-size pages
//
// The source list is never modified; a view is recomputed whenever the
// search text, sort column or page changes.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Rows per page when nothing else is configured
pub const DEFAULT_PAGE_SIZE: usize = 10;

// ============================================================================
// RECORD + COLUMN TRAITS
// ============================================================================

/// A sortable column of some record type.
pub trait Column: Copy + PartialEq + fmt::Debug + FromStr + 'static {
    /// Every column, in display order
    fn all() -> &'static [Self];

    /// Stable identifier used in query strings and CLI flags
    fn as_str(&self) -> &'static str;
}

/// A record that can be shown in a table view.
pub trait TableRecord: Clone {
    type Column: Column;

    /// True if any searchable field contains `needle`.
    ///
    /// `needle` is already lowercased and non-empty.
    fn matches(&self, needle: &str) -> bool;

    /// Compare two records by one column, ascending.
    fn compare(&self, other: &Self, column: Self::Column) -> Ordering;
}

/// Lowercased substring test shared by record implementations
pub fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

// ============================================================================
// SORTING
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl FromStr for SortDirection {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            _ => Err(UnknownValue(s.to_string())),
        }
    }
}

/// Error for column or direction names that don't parse
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown value: {0}")]
pub struct UnknownValue(pub String);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SortState<C> {
    pub column: C,
    pub direction: SortDirection,
}

impl<C: Column> SortState<C> {
    pub fn new(column: C, direction: SortDirection) -> Self {
        Self { column, direction }
    }

    pub fn ascending(column: C) -> Self {
        Self::new(column, SortDirection::Asc)
    }

    /// Next sort state after the user selects `column`.
    ///
    /// Selecting the active column flips its direction; any other column
    /// starts ascending.
    pub fn toggle(current: Option<Self>, column: C) -> Self {
        match current {
            Some(state) if state.column == column => Self::new(column, state.direction.flipped()),
            _ => Self::ascending(column),
        }
    }
}

/// Filter records by a search string (empty search keeps everything)
pub fn filter<T: TableRecord>(records: &[T], search: &str) -> Vec<T> {
    if search.is_empty() {
        return records.to_vec();
    }

    let needle = search.to_lowercase();
    records
        .iter()
        .filter(|record| record.matches(&needle))
        .cloned()
        .collect()
}

/// Sort in place. `slice::sort_by` is stable, so records with equal keys keep
/// their relative order in both directions.
pub fn sort<T: TableRecord>(records: &mut [T], state: Option<SortState<T::Column>>) {
    let Some(state) = state else {
        return;
    };

    match state.direction {
        SortDirection::Asc => records.sort_by(|a, b| a.compare(b, state.column)),
        SortDirection::Desc => records.sort_by(|a, b| b.compare(a, state.column)),
    }
}

// ============================================================================
// PAGINATION
// ============================================================================

/// Number of pages for `total` rows. Always at least 1 so an empty list still
/// has a page to show its placeholder on.
pub fn page_count(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1)).max(1)
}

/// Clamp a 1-based page index into `[1, page_count]`
pub fn clamp_page(page: usize, total: usize, page_size: usize) -> usize {
    page.clamp(1, page_count(total, page_size))
}

/// Index range of the rows shown on `page`
pub fn page_bounds(page: usize, total: usize, page_size: usize) -> (usize, usize) {
    let size = page_size.max(1);
    let page = clamp_page(page, total, size);
    let start = ((page - 1) * size).min(total);
    let end = (start + size).min(total);
    (start, end)
}

/// Slice one page out of `records`
pub fn paginate<T>(records: &[T], page: usize, page_size: usize) -> &[T] {
    let (start, end) = page_bounds(page, records.len(), page_size);
    &records[start..end]
}

// ============================================================================
// QUERY + VIEW
// ============================================================================

/// Everything a list page remembers between renders
#[derive(Debug, Clone, PartialEq)]
pub struct TableQuery<C> {
    pub search: String,
    pub sort: Option<SortState<C>>,
    pub page: usize,
    pub page_size: usize,
}

impl<C: Column> Default for TableQuery<C> {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl<C: Column> TableQuery<C> {
    pub fn new(page_size: usize) -> Self {
        Self {
            search: String::new(),
            sort: None,
            page: 1,
            page_size: page_size.max(1),
        }
    }

    /// Change the search text and jump back to the first page
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.page = 1;
    }

    /// Select a sort column (toggles direction on repeat) and jump back to
    /// the first page
    pub fn toggle_sort(&mut self, column: C) {
        self.sort = Some(SortState::toggle(self.sort, column));
        self.page = 1;
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Compute the view over `records`
    pub fn apply<T>(&self, records: &[T]) -> TableView<T>
    where
        T: TableRecord<Column = C>,
    {
        let mut matched = filter(records, &self.search);
        sort(&mut matched, self.sort);

        let page_size = self.page_size.max(1);
        let page = clamp_page(self.page, matched.len(), page_size);

        TableView {
            matched,
            page,
            page_size,
        }
    }
}

/// The derived, read-only result of a [`TableQuery`]
#[derive(Debug, Clone, PartialEq)]
pub struct TableView<T> {
    matched: Vec<T>,
    page: usize,
    page_size: usize,
}

/// What a renderer should draw in the table body
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DisplayRows<'a, T> {
    Records(&'a [T]),
    Placeholder(&'a str),
}

impl<T> TableView<T> {
    /// Rows of the current page
    pub fn rows(&self) -> &[T] {
        paginate(&self.matched, self.page, self.page_size)
    }

    /// All rows that survived the search, sorted, across every page
    pub fn matched(&self) -> &[T] {
        &self.matched
    }

    pub fn total_matches(&self) -> usize {
        self.matched.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matched.is_empty()
    }

    /// Current 1-based page, always within `[1, total_pages]`
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self) -> usize {
        page_count(self.matched.len(), self.page_size)
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Page rows, or the placeholder when nothing matched
    pub fn display<'a>(&'a self, placeholder: &'a str) -> DisplayRows<'a, T> {
        if self.matched.is_empty() {
            DisplayRows::Placeholder(placeholder)
        } else {
            DisplayRows::Records(self.rows())
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        label: &'static str,
        group: &'static str,
        value: i32,
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum RowColumn {
        Label,
        Value,
    }

    impl FromStr for RowColumn {
        type Err = UnknownValue;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s {
                "label" => Ok(RowColumn::Label),
                "value" => Ok(RowColumn::Value),
                _ => Err(UnknownValue(s.to_string())),
            }
        }
    }

    impl Column for RowColumn {
        fn all() -> &'static [Self] {
            &[RowColumn::Label, RowColumn::Value]
        }

        fn as_str(&self) -> &'static str {
            match self {
                RowColumn::Label => "label",
                RowColumn::Value => "value",
            }
        }
    }

    impl TableRecord for Row {
        type Column = RowColumn;

        fn matches(&self, needle: &str) -> bool {
            contains_ci(self.label, needle)
        }

        fn compare(&self, other: &Self, column: RowColumn) -> Ordering {
            match column {
                RowColumn::Label => self.label.cmp(other.label),
                RowColumn::Value => self.value.cmp(&other.value),
            }
        }
    }

    fn row(label: &'static str, group: &'static str, value: i32) -> Row {
        Row { label, group, value }
    }

    fn rows() -> Vec<Row> {
        vec![
            row("Miete", "a", 3),
            row("Kino", "b", 1),
            row("MIETKAUTION", "c", 3),
            row("Strom", "d", 2),
            row("Bahn", "e", 1),
        ]
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let matched = filter(&rows(), "miet");
        let labels: Vec<_> = matched.iter().map(|r| r.label).collect();
        assert_eq!(labels, vec!["Miete", "MIETKAUTION"]);
    }

    #[test]
    fn test_filter_ignores_unsearched_fields() {
        // "Kino" sits in group "b" but only labels are searched
        let matched = filter(&rows(), "b");
        let labels: Vec<_> = matched.iter().map(|r| r.label).collect();
        assert_eq!(labels, vec!["Bahn"]);
    }

    #[test]
    fn test_empty_search_keeps_everything() {
        assert_eq!(filter(&rows(), "").len(), 5);
    }

    #[test]
    fn test_sort_ascending_is_stable() {
        let mut data = rows();
        sort(&mut data, Some(SortState::ascending(RowColumn::Value)));
        let groups: Vec<_> = data.iter().map(|r| r.group).collect();
        // value 1: b before e, value 3: a before c (source order)
        assert_eq!(groups, vec!["b", "e", "d", "a", "c"]);
    }

    #[test]
    fn test_sort_descending_is_stable() {
        let mut data = rows();
        sort(&mut data, Some(SortState::new(RowColumn::Value, SortDirection::Desc)));
        let groups: Vec<_> = data.iter().map(|r| r.group).collect();
        assert_eq!(groups, vec!["a", "c", "d", "b", "e"]);
    }

    #[test]
    fn test_no_sort_keeps_source_order() {
        let mut data = rows();
        sort(&mut data, None);
        assert_eq!(data, rows());
    }

    #[test]
    fn test_toggle_same_column_flips_direction() {
        let first = SortState::toggle(None, RowColumn::Value);
        assert_eq!(first.direction, SortDirection::Asc);

        let second = SortState::toggle(Some(first), RowColumn::Value);
        assert_eq!(second.direction, SortDirection::Desc);

        let third = SortState::toggle(Some(second), RowColumn::Value);
        assert_eq!(third.direction, SortDirection::Asc);
    }

    #[test]
    fn test_toggle_new_column_starts_ascending() {
        let desc = SortState::new(RowColumn::Value, SortDirection::Desc);
        let next = SortState::toggle(Some(desc), RowColumn::Label);
        assert_eq!(next, SortState::ascending(RowColumn::Label));
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0, 10), 1);
        assert_eq!(page_count(10, 10), 1);
        assert_eq!(page_count(11, 10), 2);
        assert_eq!(page_count(5, 0), 5);
    }

    #[test]
    fn test_page_is_always_in_range() {
        for total in 0..25 {
            for requested in 0..10 {
                let page = clamp_page(requested, total, 4);
                assert!(page >= 1);
                assert!(page <= page_count(total, 4));
            }
        }
    }

    #[test]
    fn test_paginate_slices_last_page() {
        let data: Vec<u32> = (1..=7).collect();
        assert_eq!(paginate(&data, 1, 3), &[1, 2, 3]);
        assert_eq!(paginate(&data, 3, 3), &[7]);
        assert_eq!(paginate(&data, 99, 3), &[7]);
        assert!(paginate(&Vec::<u32>::new(), 2, 3).is_empty());
    }

    #[test]
    fn test_query_apply_combines_steps() {
        let mut query: TableQuery<RowColumn> = TableQuery::new(2);
        query.toggle_sort(RowColumn::Label);
        query.set_page(2);

        let view = query.apply(&rows());
        assert_eq!(view.total_matches(), 5);
        assert_eq!(view.total_pages(), 3);
        assert_eq!(view.page(), 2);
        let labels: Vec<_> = view.rows().iter().map(|r| r.label).collect();
        assert_eq!(labels, vec!["MIETKAUTION", "Miete"]);
        assert!(view.has_previous());
        assert!(view.has_next());
    }

    #[test]
    fn test_search_resets_page() {
        let mut query: TableQuery<RowColumn> = TableQuery::new(2);
        query.set_page(3);
        query.set_search("kino");
        assert_eq!(query.page, 1);
    }

    #[test]
    fn test_empty_result_shows_placeholder() {
        let mut query: TableQuery<RowColumn> = TableQuery::new(2);
        query.set_search("gibt es nicht");
        query.set_page(4);

        let view = query.apply(&rows());
        assert!(view.is_empty());
        assert_eq!(view.page(), 1);
        assert_eq!(view.total_pages(), 1);
        assert_eq!(view.display("Nichts gefunden."), DisplayRows::Placeholder("Nichts gefunden."));
    }

    #[test]
    fn test_direction_parsing() {
        assert_eq!("DESC".parse::<SortDirection>(), Ok(SortDirection::Desc));
        assert!("sideways".parse::<SortDirection>().is_err());
    }
}
