// 💶 Ledger Entries - Income and expense records
//
// Income and expense lists share one flat record shape. The list a record was
// loaded into decides whether it is income or expense; amounts are stored as
// positive numbers in both.
//
// Sources, in order of preference:
//   1. <data_dir>/income.json | income.csv (same for expenses, categories)
//   2. the fixtures embedded from data/*.json

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::entities::category::{self, Category};
use crate::table::{contains_ci, Column, TableRecord, UnknownValue};

const INCOME_FIXTURE: &str = include_str!("../data/income.json");
const EXPENSES_FIXTURE: &str = include_str!("../data/expenses.json");

// ============================================================================
// ENTRY KIND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Income,
    Expense,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Income => "income",
            EntryKind::Expense => "expense",
        }
    }

    /// File stem used when loading from a data directory
    pub fn file_stem(&self) -> &'static str {
        match self {
            EntryKind::Income => "income",
            EntryKind::Expense => "expenses",
        }
    }

    fn fixture(&self) -> &'static str {
        match self {
            EntryKind::Income => INCOME_FIXTURE,
            EntryKind::Expense => EXPENSES_FIXTURE,
        }
    }
}

// ============================================================================
// LEDGER ENTRY
// ============================================================================

/// One income or expense line.
///
/// German field names (`beschreibung`, `betrag`, ...) are accepted so exports
/// from the old JSON fixtures load unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: u32,

    #[serde(alias = "beschreibung")]
    pub description: String,

    #[serde(alias = "betrag")]
    pub amount: f64,

    /// Booking date (ISO `YYYY-MM-DD`)
    #[serde(alias = "datum")]
    pub date: NaiveDate,

    #[serde(alias = "kategorie")]
    pub category: String,

    #[serde(alias = "konto")]
    pub account: String,
}

impl LedgerEntry {
    pub fn new(
        id: u32,
        description: &str,
        amount: f64,
        date: NaiveDate,
        category: &str,
        account: &str,
    ) -> Self {
        Self {
            id,
            description: description.to_string(),
            amount,
            date,
            category: category.to_string(),
            account: account.to_string(),
        }
    }

    /// Date as shown to German readers (`28.04.2025`)
    pub fn display_date(&self) -> String {
        self.date.format("%d.%m.%Y").to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryColumn {
    Description,
    Amount,
    Date,
    Category,
    Account,
}

impl FromStr for EntryColumn {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "description" | "beschreibung" => Ok(EntryColumn::Description),
            "amount" | "betrag" => Ok(EntryColumn::Amount),
            "date" | "datum" => Ok(EntryColumn::Date),
            "category" | "kategorie" => Ok(EntryColumn::Category),
            "account" | "konto" => Ok(EntryColumn::Account),
            _ => Err(UnknownValue(s.to_string())),
        }
    }
}

impl Column for EntryColumn {
    fn all() -> &'static [Self] {
        &[
            EntryColumn::Description,
            EntryColumn::Amount,
            EntryColumn::Date,
            EntryColumn::Category,
            EntryColumn::Account,
        ]
    }

    fn as_str(&self) -> &'static str {
        match self {
            EntryColumn::Description => "description",
            EntryColumn::Amount => "amount",
            EntryColumn::Date => "date",
            EntryColumn::Category => "category",
            EntryColumn::Account => "account",
        }
    }
}

impl TableRecord for LedgerEntry {
    type Column = EntryColumn;

    /// Search covers description, category and account. Amount and date are
    /// not searchable.
    fn matches(&self, needle: &str) -> bool {
        contains_ci(&self.description, needle)
            || contains_ci(&self.category, needle)
            || contains_ci(&self.account, needle)
    }

    fn compare(&self, other: &Self, column: EntryColumn) -> Ordering {
        match column {
            EntryColumn::Description => self.description.cmp(&other.description),
            EntryColumn::Amount => self.amount.total_cmp(&other.amount),
            EntryColumn::Date => self.date.cmp(&other.date),
            EntryColumn::Category => self.category.cmp(&other.category),
            EntryColumn::Account => self.account.cmp(&other.account),
        }
    }
}

/// Sum of all amounts
pub fn total_amount(entries: &[LedgerEntry]) -> f64 {
    entries.iter().map(|e| e.amount).sum()
}

// ============================================================================
// LOADING
// ============================================================================

pub fn parse_entries_json(json: &str) -> Result<Vec<LedgerEntry>> {
    serde_json::from_str(json).context("Failed to parse ledger entries")
}

pub fn load_entries_json(path: &Path) -> Result<Vec<LedgerEntry>> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_entries_json(&json)
}

pub fn load_entries_csv(path: &Path) -> Result<Vec<LedgerEntry>> {
    let mut rdr = csv::Reader::from_path(path).context("Failed to open CSV file")?;

    let mut entries = Vec::new();
    for result in rdr.deserialize() {
        let entry: LedgerEntry = result.context("Failed to deserialize ledger entry")?;
        entries.push(entry);
    }

    Ok(entries)
}

/// Load entries from a `.json` or `.csv` file
pub fn load_entries(path: &Path) -> Result<Vec<LedgerEntry>> {
    match extension(path).as_deref() {
        Some("csv") => load_entries_csv(path),
        _ => load_entries_json(path),
    }
}

/// Embedded fixture entries for `kind`
pub fn fixture_entries(kind: EntryKind) -> Result<Vec<LedgerEntry>> {
    parse_entries_json(kind.fixture())
        .with_context(|| format!("Embedded {} fixture is invalid", kind.as_str()))
}

pub(crate) fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// `<dir>/<stem>.json`, else `<dir>/<stem>.csv`, if either exists
pub(crate) fn find_data_file(dir: &Path, stem: &str) -> Option<PathBuf> {
    ["json", "csv"]
        .iter()
        .map(|ext| dir.join(format!("{}.{}", stem, ext)))
        .find(|path| path.is_file())
}

// ============================================================================
// DATASET
// ============================================================================

/// Everything the dashboard pages read from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub income: Vec<LedgerEntry>,
    pub expenses: Vec<LedgerEntry>,
    pub categories: Vec<Category>,
}

impl Dataset {
    /// Embedded fixtures only
    pub fn fixtures() -> Result<Self> {
        Self::load(None)
    }

    /// Load from `data_dir`, using the embedded fixture for any missing file
    pub fn load(data_dir: Option<&Path>) -> Result<Self> {
        let income = load_kind(data_dir, EntryKind::Income)?;
        let expenses = load_kind(data_dir, EntryKind::Expense)?;

        let categories = match data_dir.and_then(|dir| find_data_file(dir, "categories")) {
            Some(path) => {
                tracing::info!(path = %path.display(), "loading categories");
                category::load_categories(&path)?
            }
            None => category::fixture_categories()?,
        };

        tracing::debug!(
            income = income.len(),
            expenses = expenses.len(),
            categories = categories.len(),
            "dataset loaded"
        );

        Ok(Self {
            income,
            expenses,
            categories,
        })
    }

    pub fn entries(&self, kind: EntryKind) -> &[LedgerEntry] {
        match kind {
            EntryKind::Income => &self.income,
            EntryKind::Expense => &self.expenses,
        }
    }
}

fn load_kind(data_dir: Option<&Path>, kind: EntryKind) -> Result<Vec<LedgerEntry>> {
    match data_dir.and_then(|dir| find_data_file(dir, kind.file_stem())) {
        Some(path) => {
            tracing::info!(path = %path.display(), kind = kind.as_str(), "loading entries");
            load_entries(&path)
        }
        None => fixture_entries(kind),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{SortDirection, SortState, TableQuery};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn scratch_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("budgify-test-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_fixtures_load() {
        let dataset = Dataset::fixtures().unwrap();
        assert_eq!(dataset.income.len(), 8);
        assert_eq!(dataset.expenses.len(), 12);
        assert_eq!(dataset.categories.len(), 13);
    }

    #[test]
    fn test_fixture_totals() {
        let dataset = Dataset::fixtures().unwrap();
        assert!((total_amount(&dataset.income) - 6423.10).abs() < 1e-6);
        assert!((total_amount(&dataset.expenses) - 2238.13).abs() < 1e-6);
    }

    #[test]
    fn test_parse_german_field_names() {
        let json = r#"[{"id": 1, "beschreibung": "Gehalt", "betrag": 2500.0,
            "datum": "2025-03-28", "kategorie": "Gehalt", "konto": "Girokonto"}]"#;
        let entries = parse_entries_json(json).unwrap();
        assert_eq!(entries[0].description, "Gehalt");
        assert_eq!(entries[0].date, date("2025-03-28"));
        assert_eq!(entries[0].account, "Girokonto");
    }

    #[test]
    fn test_parse_rejects_non_numeric_amount() {
        let json = r#"[{"id": 1, "description": "x", "amount": "viel",
            "date": "2025-03-28", "category": "a", "account": "b"}]"#;
        assert!(parse_entries_json(json).is_err());
    }

    #[test]
    fn test_load_csv() {
        let dir = scratch_dir();
        let path = dir.join("income.csv");
        fs::write(
            &path,
            "id,description,amount,date,category,account\n\
             1,Gehalt,2500.00,2025-06-28,Gehalt,Girokonto\n\
             2,Zinsen,3.10,2025-06-30,Zinsen,Sparkonto\n",
        )
        .unwrap();

        let entries = load_entries(&path).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].amount, 3.10);

        let dataset = Dataset::load(Some(&dir)).unwrap();
        assert_eq!(dataset.income.len(), 2);
        // expenses fall back to the fixture
        assert_eq!(dataset.expenses.len(), 12);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_search_covers_description_category_account() {
        let dataset = Dataset::fixtures().unwrap();

        let mut query: TableQuery<EntryColumn> = TableQuery::new(50);
        query.set_search("BARGELD");
        let view = query.apply(&dataset.expenses);
        assert_eq!(view.total_matches(), 3);
        assert!(view.matched().iter().all(|e| e.account == "Bargeld"));

        query.set_search("lebensmittel");
        assert_eq!(query.apply(&dataset.expenses).total_matches(), 3);

        query.set_search("miete");
        assert_eq!(query.apply(&dataset.expenses).total_matches(), 2);
    }

    #[test]
    fn test_search_ignores_amount_and_date() {
        let dataset = Dataset::fixtures().unwrap();
        let mut query: TableQuery<EntryColumn> = TableQuery::new(50);
        query.set_search("850");
        assert!(query.apply(&dataset.expenses).is_empty());
        query.set_search("2025-04");
        assert!(query.apply(&dataset.expenses).is_empty());
    }

    #[test]
    fn test_sort_by_amount_keeps_equal_amounts_in_order() {
        let dataset = Dataset::fixtures().unwrap();
        let mut query: TableQuery<EntryColumn> = TableQuery::new(50);
        query.sort = Some(SortState::new(EntryColumn::Amount, SortDirection::Desc));

        let view = query.apply(&dataset.income);
        let ids: Vec<u32> = view.matched().iter().map(|e| e.id).collect();
        // two 2500.00 salaries (1, 4) and two 12.40 interest lines (3, 8)
        assert_eq!(ids, vec![1, 4, 2, 6, 5, 7, 3, 8]);
    }

    #[test]
    fn test_sort_by_date() {
        let dataset = Dataset::fixtures().unwrap();
        let mut query: TableQuery<EntryColumn> = TableQuery::new(3);
        query.toggle_sort(EntryColumn::Date);
        query.toggle_sort(EntryColumn::Date);

        let view = query.apply(&dataset.expenses);
        assert_eq!(view.rows()[0].description, "Restaurant");
        assert_eq!(view.total_pages(), 4);
    }

    #[test]
    fn test_column_parsing_accepts_german_names() {
        assert_eq!("Betrag".parse::<EntryColumn>(), Ok(EntryColumn::Amount));
        assert_eq!("konto".parse::<EntryColumn>(), Ok(EntryColumn::Account));
        assert!("saldo".parse::<EntryColumn>().is_err());
    }

    #[test]
    fn test_display_date() {
        let entry = LedgerEntry::new(1, "x", 1.0, date("2025-04-28"), "a", "b");
        assert_eq!(entry.display_date(), "28.04.2025");
    }
}
