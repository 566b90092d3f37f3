// 💳 Account Entity - Named balances with a display color
//
// The accounts page keeps its own list: it starts from three default
// accounts, the user can add and delete entries, and nothing is persisted.
// The registry is shared between request handlers, so it guards its list
// with a RwLock and hands out clones.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::table::{contains_ci, Column, TableRecord, UnknownValue};
use crate::validation::{AccountForm, ValidationErrors};

/// Color preselected in the "new account" form
pub const DEFAULT_ACCOUNT_COLOR: &str = "#3B82F6";

// ============================================================================
// ACCOUNT ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: u64,

    /// Account name (e.g., "Girokonto")
    pub name: String,

    /// Current balance in EUR
    pub balance: f64,

    /// Display color (e.g., "#10B981")
    pub color: String,
}

impl Account {
    pub fn new(id: u64, name: &str, balance: f64, color: &str) -> Self {
        Account {
            id,
            name: name.to_string(),
            balance,
            color: color.to_string(),
        }
    }
}

/// Validated input for a new account
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    pub name: String,
    pub balance: f64,
    pub color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountColumn {
    Name,
    Balance,
}

impl FromStr for AccountColumn {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "name" => Ok(AccountColumn::Name),
            "balance" | "saldo" | "kontostand" => Ok(AccountColumn::Balance),
            _ => Err(UnknownValue(s.to_string())),
        }
    }
}

impl Column for AccountColumn {
    fn all() -> &'static [Self] {
        &[AccountColumn::Name, AccountColumn::Balance]
    }

    fn as_str(&self) -> &'static str {
        match self {
            AccountColumn::Name => "name",
            AccountColumn::Balance => "balance",
        }
    }
}

impl TableRecord for Account {
    type Column = AccountColumn;

    fn matches(&self, needle: &str) -> bool {
        contains_ci(&self.name, needle)
    }

    fn compare(&self, other: &Self, column: AccountColumn) -> Ordering {
        match column {
            AccountColumn::Name => self.name.cmp(&other.name),
            AccountColumn::Balance => self.balance.total_cmp(&other.balance),
        }
    }
}

// ============================================================================
// ACCOUNT REGISTRY
// ============================================================================

/// In-memory account list with add/delete
#[derive(Debug, Clone)]
pub struct AccountRegistry {
    accounts: Arc<RwLock<Vec<Account>>>,
    next_id: Arc<AtomicU64>,
}

impl Default for AccountRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountRegistry {
    /// Create new empty registry
    pub fn new() -> Self {
        AccountRegistry {
            accounts: Arc::new(RwLock::new(Vec::new())),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Create registry with the default accounts pre-loaded
    ///
    /// - Girokonto: 1250.75
    /// - Sparkonto: 4500.00
    /// - Bargeld: 120.30
    pub fn with_defaults() -> Self {
        let registry = AccountRegistry::new();
        for (name, balance, color) in [
            ("Girokonto", 1250.75, "#3B82F6"),
            ("Sparkonto", 4500.00, "#10B981"),
            ("Bargeld", 120.30, "#F59E0B"),
        ] {
            registry.add(NewAccount {
                name: name.to_string(),
                balance,
                color: color.to_string(),
            });
        }
        registry
    }

    /// Append an account and return it with its assigned id
    pub fn add(&self, new_account: NewAccount) -> Account {
        let id = self.next_id.fetch_add(1, AtomicOrdering::Relaxed);
        let account = Account {
            id,
            name: new_account.name,
            balance: new_account.balance,
            color: new_account.color,
        };

        let mut accounts = self.accounts.write().unwrap_or_else(PoisonError::into_inner);
        accounts.push(account.clone());
        account
    }

    /// Validate raw form input and add the account.
    ///
    /// Invalid input leaves the list unchanged.
    pub fn add_from_form(&self, form: &AccountForm) -> Result<Account, ValidationErrors> {
        let new_account = form.validate()?;
        let account = self.add(new_account);
        tracing::info!(id = account.id, name = %account.name, "account added");
        Ok(account)
    }

    /// Delete an account by id. Returns false if no such account exists.
    pub fn remove(&self, id: u64) -> bool {
        let mut accounts = self.accounts.write().unwrap_or_else(PoisonError::into_inner);
        let before = accounts.len();
        accounts.retain(|account| account.id != id);
        let removed = accounts.len() != before;
        if removed {
            tracing::info!(id, "account deleted");
        }
        removed
    }

    /// Snapshot of all accounts, in insertion order
    pub fn all(&self) -> Vec<Account> {
        self.accounts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn find_by_id(&self, id: u64) -> Option<Account> {
        self.accounts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|account| account.id == id)
            .cloned()
    }

    pub fn count(&self) -> usize {
        self.accounts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Sum of all balances
    pub fn total_balance(&self) -> f64 {
        self.accounts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|account| account.balance)
            .sum()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, balance: &str) -> AccountForm {
        AccountForm {
            name: name.to_string(),
            balance: balance.to_string(),
            color: None,
        }
    }

    #[test]
    fn test_defaults() {
        let registry = AccountRegistry::with_defaults();
        assert_eq!(registry.count(), 3);
        assert!((registry.total_balance() - 5871.05).abs() < 1e-9);

        let names: Vec<String> = registry.all().into_iter().map(|a| a.name).collect();
        assert_eq!(names, vec!["Girokonto", "Sparkonto", "Bargeld"]);
    }

    #[test]
    fn test_add_from_form() {
        let registry = AccountRegistry::with_defaults();
        let account = registry.add_from_form(&form("  Depot ", "1000.50")).unwrap();

        assert_eq!(account.name, "Depot");
        assert_eq!(account.color, DEFAULT_ACCOUNT_COLOR);
        assert_eq!(registry.count(), 4);
        assert!((registry.total_balance() - 6871.55).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_form_leaves_list_unchanged() {
        let registry = AccountRegistry::with_defaults();
        assert!(registry.add_from_form(&form("   ", "10")).is_err());
        assert!(registry.add_from_form(&form("Depot", "")).is_err());
        assert!(registry.add_from_form(&form("Depot", "zehn")).is_err());
        assert_eq!(registry.count(), 3);
    }

    #[test]
    fn test_ids_are_unique_after_delete() {
        let registry = AccountRegistry::with_defaults();
        let last = registry.all().last().map(|a| a.id).unwrap();
        assert!(registry.remove(last));

        let added = registry.add_from_form(&form("Neu", "0")).unwrap();
        assert_ne!(added.id, last);
    }

    #[test]
    fn test_remove_unknown_id() {
        let registry = AccountRegistry::with_defaults();
        assert!(!registry.remove(999));
        assert_eq!(registry.count(), 3);
    }

    #[test]
    fn test_clones_share_state() {
        let registry = AccountRegistry::with_defaults();
        let handle = registry.clone();
        handle.add_from_form(&form("Tagesgeld", "250")).unwrap();
        assert_eq!(registry.count(), 4);
        assert!(registry.find_by_id(4).is_some());
    }
}
