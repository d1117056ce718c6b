//! View state over the last result: row filter, column sort and scroll.
//!
//! The view never touches the [`QueryResult`] it is applied to. It only
//! computes which rows to show and in what order.

use crate::db::{QueryResult, Value};

static NULL: Value = Value::Null;

/// Column the results are sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub column: usize,
    pub descending: bool,
}

/// Filter, sort and scroll position of the results pane.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultsView {
    /// Shown rows skipped from the top.
    pub scroll: usize,
    filter: String,
    editing: bool,
    sort: Option<SortKey>,
}

impl ResultsView {
    /// Current filter text. Empty means every row is shown.
    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// True while the filter is being typed.
    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn sort(&self) -> Option<SortKey> {
        self.sort
    }

    pub fn start_filter(&mut self) {
        self.editing = true;
    }

    pub fn push_filter(&mut self, c: char) {
        self.filter.push(c);
        self.scroll = 0;
    }

    pub fn pop_filter(&mut self) {
        self.filter.pop();
        self.scroll = 0;
    }

    /// Stops editing and keeps the filter applied.
    pub fn finish_filter(&mut self) {
        self.editing = false;
    }

    pub fn clear_filter(&mut self) {
        self.filter.clear();
        self.editing = false;
        self.scroll = 0;
    }

    /// Steps through: unsorted, column 0 ascending, column 0 descending,
    /// column 1 ascending, ..., last column descending, unsorted.
    pub fn cycle_sort(&mut self, column_count: usize) {
        self.sort = match self.sort {
            _ if column_count == 0 => None,
            None => Some(SortKey {
                column: 0,
                descending: false,
            }),
            Some(SortKey {
                column,
                descending: false,
            }) => Some(SortKey {
                column,
                descending: true,
            }),
            Some(SortKey { column, .. }) if column + 1 < column_count => Some(SortKey {
                column: column + 1,
                descending: false,
            }),
            Some(_) => None,
        };
        self.scroll = 0;
    }

    /// Indices of the rows of `result` that match the filter, in display order.
    ///
    /// A row matches when any cell's displayed text contains the filter,
    /// ignoring case. Sorting is stable, so equal cells keep result order.
    pub fn visible_rows(&self, result: &QueryResult) -> Vec<usize> {
        let needle = self.filter.to_lowercase();
        let mut rows: Vec<usize> = result
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| {
                needle.is_empty()
                    || row
                        .iter()
                        .any(|value| value.to_display_string().to_lowercase().contains(&needle))
            })
            .map(|(index, _)| index)
            .collect();

        if let Some(key) = self.sort.filter(|key| key.column < result.column_count()) {
            let cell = |index: usize| result.rows[index].get(key.column).unwrap_or(&NULL);
            rows.sort_by(|&a, &b| {
                let ordering = cell(a).cmp_sortable(cell(b));
                if key.descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            });
        }

        rows
    }

    /// Human-readable sort description, e.g. `name desc`.
    pub fn describe_sort(&self, result: &QueryResult) -> Option<String> {
        let key = self.sort?;
        let column = result.columns.get(key.column)?;
        Some(format!(
            "{} {}",
            column.name,
            if key.descending { "desc" } else { "asc" }
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::ColumnInfo;
    use pretty_assertions::assert_eq;

    fn people() -> QueryResult {
        QueryResult::with_data(
            vec![ColumnInfo::new("id", "INTEGER"), ColumnInfo::new("name", "TEXT")],
            vec![
                vec![Value::Int(3), Value::from("carol")],
                vec![Value::Int(1), Value::from("Alice")],
                vec![Value::Int(2), Value::Null],
            ],
        )
    }

    #[test]
    fn test_no_filter_shows_all_in_order() {
        assert_eq!(ResultsView::default().visible_rows(&people()), vec![0, 1, 2]);
    }

    #[test]
    fn test_filter_matches_any_cell_ignoring_case() {
        let mut view = ResultsView::default();
        for c in "ALI".chars() {
            view.push_filter(c);
        }
        assert_eq!(view.visible_rows(&people()), vec![1]);

        view.clear_filter();
        view.push_filter('3');
        assert_eq!(view.visible_rows(&people()), vec![0]);
    }

    #[test]
    fn test_filter_matches_null_text() {
        let mut view = ResultsView::default();
        for c in "null".chars() {
            view.push_filter(c);
        }
        assert_eq!(view.visible_rows(&people()), vec![2]);
    }

    #[test]
    fn test_sort_cycle() {
        let mut view = ResultsView::default();
        let result = people();

        view.cycle_sort(2);
        assert_eq!(view.visible_rows(&result), vec![1, 2, 0]);
        assert_eq!(view.describe_sort(&result).as_deref(), Some("id asc"));

        view.cycle_sort(2);
        assert_eq!(view.visible_rows(&result), vec![0, 2, 1]);

        // NULL sorts first, text compares case-sensitively
        view.cycle_sort(2);
        assert_eq!(view.visible_rows(&result), vec![2, 1, 0]);
        assert_eq!(view.describe_sort(&result).as_deref(), Some("name asc"));

        view.cycle_sort(2);
        view.cycle_sort(2);
        assert_eq!(view.sort(), None);
        assert_eq!(view.visible_rows(&result), vec![0, 1, 2]);
    }

    #[test]
    fn test_sort_without_columns_is_off() {
        let mut view = ResultsView::default();
        view.cycle_sort(0);
        assert_eq!(view.sort(), None);
    }

    #[test]
    fn test_filter_and_sort_leave_result_untouched() {
        let result = people();
        let before = result.clone();
        let mut view = ResultsView::default();
        view.push_filter('a');
        view.cycle_sort(2);
        view.visible_rows(&result);
        assert!(result.same_data(&before));
    }

    #[test]
    fn test_filter_edits_reset_scroll() {
        let mut view = ResultsView {
            scroll: 4,
            ..ResultsView::default()
        };
        view.start_filter();
        assert!(view.is_editing());
        view.push_filter('x');
        assert_eq!(view.scroll, 0);
        view.finish_filter();
        assert!(!view.is_editing());
        assert_eq!(view.filter(), "x");
    }
}
