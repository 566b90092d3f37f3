// 📊 Dashboard Summary - Totals, month series and budget progress
//
// Everything here is derived from a loaded `Dataset`; nothing is cached.
// "Current month" means the latest month that has any entry in the data,
// not the wall-clock month, so the fixtures render the same on any day.

use chrono::{Months, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::records::{total_amount, Dataset, LedgerEntry};
use crate::table::TableView;

/// Default monthly spending limit in EUR
pub const DEFAULT_BUDGET_LIMIT: f64 = 3000.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthTotals {
    /// `YYYY-MM`
    pub month: String,
    pub income: f64,
    pub expenses: f64,
}

impl MonthTotals {
    pub fn balance(&self) -> f64 {
        self.income - self.expenses
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

/// Latest month against the calendar month before it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthComparison {
    pub current: MonthTotals,
    /// `None` when the calendar month before `current` has no entries
    pub previous: Option<MonthTotals>,
    /// Percent change in income; `None` without a non-zero previous value
    pub income_change: Option<f64>,
    pub expense_change: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetProgress {
    pub spent: f64,
    pub limit: f64,
    pub percent: f64,
    pub over_budget: bool,
}

impl BudgetProgress {
    pub fn new(spent: f64, limit: f64) -> Self {
        let percent = if limit > 0.0 { spent / limit * 100.0 } else { 0.0 };
        BudgetProgress {
            spent,
            limit,
            percent,
            over_budget: spent > limit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_income: f64,
    pub total_expenses: f64,
    pub balance: f64,
    pub months: Vec<MonthTotals>,
    pub comparison: Option<MonthComparison>,
    pub top_income_category: Option<CategoryTotal>,
    pub top_expense_category: Option<CategoryTotal>,
    pub budget: BudgetProgress,
}

impl DashboardSummary {
    pub fn from_dataset(dataset: &Dataset, budget_limit: f64) -> Self {
        let total_income = total_amount(&dataset.income);
        let total_expenses = total_amount(&dataset.expenses);
        let months = monthly_series(&dataset.income, &dataset.expenses);
        let comparison = compare_latest(&months);

        let spent = comparison
            .as_ref()
            .map(|c| c.current.expenses)
            .unwrap_or(0.0);

        DashboardSummary {
            total_income,
            total_expenses,
            balance: total_income - total_expenses,
            top_income_category: category_totals(&dataset.income).into_iter().next(),
            top_expense_category: category_totals(&dataset.expenses).into_iter().next(),
            budget: BudgetProgress::new(spent, budget_limit),
            months,
            comparison,
        }
    }
}

/// Sum of the amounts a table view matched (all pages)
pub fn view_total(view: &TableView<LedgerEntry>) -> f64 {
    total_amount(view.matched())
}

fn month_key(entry: &LedgerEntry) -> String {
    entry.date.format("%Y-%m").to_string()
}

/// Income and expenses per month, oldest first. Months with entries in only
/// one list still appear, with 0 for the other.
pub fn monthly_series(income: &[LedgerEntry], expenses: &[LedgerEntry]) -> Vec<MonthTotals> {
    let mut by_month: BTreeMap<String, (f64, f64)> = BTreeMap::new();
    for entry in income {
        by_month.entry(month_key(entry)).or_default().0 += entry.amount;
    }
    for entry in expenses {
        by_month.entry(month_key(entry)).or_default().1 += entry.amount;
    }

    by_month
        .into_iter()
        .map(|(month, (income, expenses))| MonthTotals {
            month,
            income,
            expenses,
        })
        .collect()
}

/// Totals per category label, largest first; ties keep first appearance
pub fn category_totals(entries: &[LedgerEntry]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    for entry in entries {
        match totals.iter_mut().find(|t| t.category == entry.category) {
            Some(total) => total.total += entry.amount,
            None => totals.push(CategoryTotal {
                category: entry.category.clone(),
                total: entry.amount,
            }),
        }
    }
    totals.sort_by(|a, b| b.total.total_cmp(&a.total));
    totals
}

pub fn percent_change(current: f64, previous: f64) -> Option<f64> {
    if previous == 0.0 {
        None
    } else {
        Some((current - previous) / previous * 100.0)
    }
}

/// `YYYY-MM` key of the calendar month before `month`
fn previous_month_key(month: &str) -> Option<String> {
    let first = NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d").ok()?;
    let previous = first.checked_sub_months(Months::new(1))?;
    Some(previous.format("%Y-%m").to_string())
}

fn compare_latest(months: &[MonthTotals]) -> Option<MonthComparison> {
    let (current, rest) = months.split_last()?;
    let previous = previous_month_key(&current.month)
        .and_then(|key| rest.iter().rev().find(|m| m.month == key))
        .cloned();

    let (income_change, expense_change) = match &previous {
        Some(prev) => (
            percent_change(current.income, prev.income),
            percent_change(current.expenses, prev.expenses),
        ),
        None => (None, None),
    };

    Some(MonthComparison {
        current: current.clone(),
        previous,
        income_change,
        expense_change,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{EntryColumn, EntryKind};
    use crate::table::TableQuery;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    fn entry(id: u32, amount: f64, date: &str, category: &str) -> LedgerEntry {
        LedgerEntry::new(
            id,
            "Test",
            amount,
            chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            category,
            "Girokonto",
        )
    }

    #[test]
    fn test_fixture_totals() {
        let dataset = Dataset::fixtures().unwrap();
        let summary = DashboardSummary::from_dataset(&dataset, DEFAULT_BUDGET_LIMIT);

        assert!(close(summary.total_income, 6423.10));
        assert!(close(summary.total_expenses, 2238.13));
        assert!(close(summary.balance, 4184.97));
    }

    #[test]
    fn test_fixture_month_comparison() {
        let dataset = Dataset::fixtures().unwrap();
        let summary = DashboardSummary::from_dataset(&dataset, DEFAULT_BUDGET_LIMIT);

        let months: Vec<&str> = summary.months.iter().map(|m| m.month.as_str()).collect();
        assert_eq!(months, vec!["2025-04", "2025-05"]);

        let comparison = summary.comparison.unwrap();
        assert_eq!(comparison.current.month, "2025-05");
        assert!(close(comparison.current.income, 3260.70));
        assert!(close(comparison.current.expenses, 1144.38));

        let income_change = comparison.income_change.unwrap();
        assert!(close(income_change, (3260.70 - 3162.40) / 3162.40 * 100.0));
    }

    #[test]
    fn test_fixture_top_categories() {
        let dataset = Dataset::fixtures().unwrap();
        let summary = DashboardSummary::from_dataset(&dataset, DEFAULT_BUDGET_LIMIT);

        let top_expense = summary.top_expense_category.unwrap();
        assert_eq!(top_expense.category, "Wohnen");
        assert!(close(top_expense.total, 1700.0));
        assert_eq!(summary.top_income_category.unwrap().category, "Gehalt");
    }

    #[test]
    fn test_budget_uses_latest_month() {
        let dataset = Dataset::fixtures().unwrap();
        let budget = DashboardSummary::from_dataset(&dataset, 1000.0).budget;
        assert!(close(budget.spent, 1144.38));
        assert!(budget.over_budget);
        assert!(close(budget.percent, 114.438));
    }

    #[test]
    fn test_budget_zero_limit() {
        let budget = BudgetProgress::new(50.0, 0.0);
        assert_eq!(budget.percent, 0.0);
        assert!(budget.over_budget);
    }

    #[test]
    fn test_percent_change_without_baseline() {
        assert_eq!(percent_change(100.0, 0.0), None);
        assert_eq!(percent_change(150.0, 100.0), Some(50.0));
    }

    #[test]
    fn test_month_only_in_one_list() {
        let income = vec![entry(1, 100.0, "2025-01-15", "Gehalt")];
        let expenses = vec![entry(2, 40.0, "2025-02-01", "Wohnen")];

        let months = monthly_series(&income, &expenses);
        assert_eq!(months.len(), 2);
        assert_eq!(months[0].expenses, 0.0);
        assert_eq!(months[1].income, 0.0);
        assert_eq!(months[1].balance(), -40.0);
    }

    #[test]
    fn test_comparison_skips_over_gap_month() {
        let income = vec![
            entry(1, 100.0, "2025-02-10", "Gehalt"),
            entry(2, 120.0, "2025-04-10", "Gehalt"),
        ];
        let months = monthly_series(&income, &[]);
        let comparison = compare_latest(&months).unwrap();

        assert_eq!(comparison.current.month, "2025-04");
        assert_eq!(comparison.previous, None);
        assert_eq!(comparison.income_change, None);
    }

    #[test]
    fn test_comparison_across_year_boundary() {
        let income = vec![
            entry(1, 100.0, "2024-12-20", "Gehalt"),
            entry(2, 150.0, "2025-01-20", "Gehalt"),
        ];
        let comparison = compare_latest(&monthly_series(&income, &[])).unwrap();
        assert_eq!(comparison.previous.map(|m| m.month), Some("2024-12".to_string()));
        assert_eq!(comparison.income_change, Some(50.0));
    }

    #[test]
    fn test_empty_dataset() {
        let dataset = Dataset {
            income: Vec::new(),
            expenses: Vec::new(),
            categories: Vec::new(),
        };
        let summary = DashboardSummary::from_dataset(&dataset, DEFAULT_BUDGET_LIMIT);
        assert!(summary.months.is_empty());
        assert!(summary.comparison.is_none());
        assert!(summary.top_expense_category.is_none());
        assert_eq!(summary.budget.spent, 0.0);
    }

    #[test]
    fn test_category_totals_tie_keeps_order() {
        let entries = vec![
            entry(1, 10.0, "2025-01-01", "B"),
            entry(2, 10.0, "2025-01-02", "A"),
            entry(3, 5.0, "2025-01-03", "C"),
        ];
        let names: Vec<String> = category_totals(&entries).into_iter().map(|t| t.category).collect();
        assert_eq!(names, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_view_total_spans_all_pages() {
        let dataset = Dataset::fixtures().unwrap();
        let mut query: TableQuery<EntryColumn> = TableQuery::new(2);
        query.set_search("bargeld");
        let view = query.apply(dataset.entries(EntryKind::Expense));

        assert_eq!(view.total_matches(), 3);
        assert_eq!(view.rows().len(), 2);
        let expected: f64 = view.matched().iter().map(|e| e.amount).sum();
        assert!(close(view_total(&view), expected));
    }
}
