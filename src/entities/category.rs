// 🏷️ Category Entity - Income and expense categories with display colors
//
// Categories are flat: a name, a type (income or expense) and a color used by
// badges and charts. The category page searches them by name and type and
// shows income and expense categories side by side.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::records::extension;
use crate::table::{contains_ci, Column, TableRecord, UnknownValue};

const CATEGORIES_FIXTURE: &str = include_str!("../../data/categories.json");

// ============================================================================
// CATEGORY TYPE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    /// Income category (money coming in)
    #[serde(alias = "einnahme")]
    Income,

    /// Expense category (money going out)
    #[serde(alias = "ausgabe")]
    Expense,
}

impl CategoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryType::Income => "income",
            CategoryType::Expense => "expense",
        }
    }

    /// German label, also matched by the category search
    pub fn label_de(&self) -> &'static str {
        match self {
            CategoryType::Income => "einnahme",
            CategoryType::Expense => "ausgabe",
        }
    }
}

impl FromStr for CategoryType {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" | "einnahme" => Ok(CategoryType::Income),
            "expense" | "ausgabe" => Ok(CategoryType::Expense),
            _ => Err(UnknownValue(s.to_string())),
        }
    }
}

// ============================================================================
// CATEGORY ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: u32,

    /// Category name (e.g., "Wohnen", "Gehalt")
    pub name: String,

    #[serde(rename = "type", alias = "typ")]
    pub category_type: CategoryType,

    /// Display color (e.g., "#EF4444")
    #[serde(alias = "farbe")]
    pub color: String,
}

impl Category {
    pub fn new(id: u32, name: &str, category_type: CategoryType, color: &str) -> Self {
        Category {
            id,
            name: name.to_string(),
            category_type,
            color: color.to_string(),
        }
    }

    pub fn is_income(&self) -> bool {
        self.category_type == CategoryType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.category_type == CategoryType::Expense
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryColumn {
    Name,
    Type,
}

impl FromStr for CategoryColumn {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "name" => Ok(CategoryColumn::Name),
            "type" | "typ" => Ok(CategoryColumn::Type),
            _ => Err(UnknownValue(s.to_string())),
        }
    }
}

impl Column for CategoryColumn {
    fn all() -> &'static [Self] {
        &[CategoryColumn::Name, CategoryColumn::Type]
    }

    fn as_str(&self) -> &'static str {
        match self {
            CategoryColumn::Name => "name",
            CategoryColumn::Type => "type",
        }
    }
}

impl TableRecord for Category {
    type Column = CategoryColumn;

    fn matches(&self, needle: &str) -> bool {
        contains_ci(&self.name, needle)
            || self.category_type.as_str().contains(needle)
            || self.category_type.label_de().contains(needle)
    }

    fn compare(&self, other: &Self, column: CategoryColumn) -> Ordering {
        match column {
            CategoryColumn::Name => self.name.cmp(&other.name),
            CategoryColumn::Type => self
                .category_type
                .as_str()
                .cmp(other.category_type.as_str()),
        }
    }
}

// ============================================================================
// LOADING
// ============================================================================

pub fn parse_categories_json(json: &str) -> Result<Vec<Category>> {
    serde_json::from_str(json).context("Failed to parse categories")
}

/// Load categories from a `.json` or `.csv` file (`id,name,type,color`)
pub fn load_categories(path: &Path) -> Result<Vec<Category>> {
    match extension(path).as_deref() {
        Some("csv") => {
            let mut rdr = csv::Reader::from_path(path).context("Failed to open CSV file")?;
            let mut categories = Vec::new();
            for result in rdr.deserialize() {
                let category: Category = result.context("Failed to deserialize category")?;
                categories.push(category);
            }
            Ok(categories)
        }
        _ => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            parse_categories_json(&json)
        }
    }
}

pub fn fixture_categories() -> Result<Vec<Category>> {
    parse_categories_json(CATEGORIES_FIXTURE).context("Embedded category fixture is invalid")
}

// ============================================================================
// CATEGORY REGISTRY
// ============================================================================

/// Counts shown on the category page's stat cards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CategoryCounts {
    pub total: usize,
    pub income: usize,
    pub expense: usize,
}

impl CategoryCounts {
    pub fn of(categories: &[Category]) -> Self {
        let income = categories.iter().filter(|c| c.is_income()).count();
        CategoryCounts {
            total: categories.len(),
            income,
            expense: categories.len() - income,
        }
    }
}

/// Read-only lookup over a loaded category list
#[derive(Debug, Clone, Default)]
pub struct CategoryRegistry {
    categories: Vec<Category>,
}

impl CategoryRegistry {
    pub fn new(categories: Vec<Category>) -> Self {
        CategoryRegistry { categories }
    }

    /// Registry preloaded with the embedded fixture
    pub fn with_defaults() -> Result<Self> {
        Ok(Self::new(fixture_categories()?))
    }

    pub fn all(&self) -> &[Category] {
        &self.categories
    }

    pub fn count(&self) -> usize {
        self.categories.len()
    }

    /// Find category by name (exact match, case-insensitive)
    pub fn find_by_name(&self, name: &str) -> Option<&Category> {
        let lower_name = name.to_lowercase();
        self.categories
            .iter()
            .find(|cat| cat.name.to_lowercase() == lower_name)
    }

    pub fn find_by_id(&self, id: u32) -> Option<&Category> {
        self.categories.iter().find(|cat| cat.id == id)
    }

    /// Color for a category label, used to tint entry badges
    pub fn color_for(&self, name: &str) -> Option<&str> {
        self.find_by_name(name).map(|cat| cat.color.as_str())
    }

    /// Case-insensitive search over name and type, then split by type.
    /// Both halves keep source order.
    pub fn search_split(&self, search: &str) -> (Vec<Category>, Vec<Category>) {
        crate::table::filter(&self.categories, search)
            .into_iter()
            .partition(|cat| cat.is_income())
    }

    /// Counts over the categories matching `search`; an empty search counts all
    pub fn counts_matching(&self, search: &str) -> CategoryCounts {
        CategoryCounts::of(&crate::table::filter(&self.categories, search))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_registry() {
        let registry = CategoryRegistry::with_defaults().unwrap();
        assert_eq!(registry.count(), 13);

        let counts = registry.counts_matching("");
        assert_eq!(counts.income, 6);
        assert_eq!(counts.expense, 7);
        assert_eq!(counts.total, 13);
    }

    #[test]
    fn test_counts_follow_search() {
        let registry = CategoryRegistry::with_defaults().unwrap();
        let counts = registry.counts_matching("gehalt");
        assert_eq!((counts.total, counts.income, counts.expense), (1, 1, 0));

        let counts = registry.counts_matching("urlaub");
        assert_eq!((counts.total, counts.income, counts.expense), (0, 0, 0));
    }

    #[test]
    fn test_find_by_name_case_insensitive() {
        let registry = CategoryRegistry::with_defaults().unwrap();
        let wohnen = registry.find_by_name("WOHNEN").unwrap();
        assert_eq!(wohnen.category_type, CategoryType::Expense);
        assert_eq!(registry.color_for("wohnen"), Some("#EF4444"));
        assert!(registry.find_by_name("Urlaub").is_none());
    }

    #[test]
    fn test_german_type_literals_parse() {
        let json = r##"[{"id": 1, "name": "Gehalt", "typ": "einnahme", "farbe": "#00FF00"},
                        {"id": 2, "name": "Miete", "type": "ausgabe", "color": "#FF0000"}]"##;
        let categories = parse_categories_json(json).unwrap();
        assert!(categories[0].is_income());
        assert!(categories[1].is_expense());
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let json = r##"[{"id": 1, "name": "Gehalt", "type": "transfer", "color": "#00FF00"}]"##;
        assert!(parse_categories_json(json).is_err());
    }

    #[test]
    fn test_search_matches_type_label() {
        let registry = CategoryRegistry::with_defaults().unwrap();

        let (income, expense) = registry.search_split("einnahme");
        assert_eq!(income.len(), 6);
        assert!(expense.is_empty());

        let (income, expense) = registry.search_split("Expense");
        assert!(income.is_empty());
        assert_eq!(expense.len(), 7);
    }

    #[test]
    fn test_search_matches_name() {
        let registry = CategoryRegistry::with_defaults().unwrap();
        let (income, expense) = registry.search_split("neben");
        assert_eq!(income.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(), vec!["Nebenjob"]);
        assert_eq!(expense.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(), vec!["Nebenkosten"]);
    }

    #[test]
    fn test_split_keeps_source_order() {
        let registry = CategoryRegistry::with_defaults().unwrap();
        let (income, _) = registry.search_split("");
        assert_eq!(income.first().map(|c| c.id), Some(1));
        assert_eq!(income.last().map(|c| c.id), Some(6));
    }
}
