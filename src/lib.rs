// Budgify - Core Library
// Exposes all modules for use in CLI, web server, and tests

pub mod auth;
pub mod config;
pub mod content;
pub mod db;
pub mod entities;
pub mod guard;
pub mod messages;
pub mod records;
pub mod summary;
pub mod table;
pub mod validation;

#[cfg(feature = "server")]
pub mod server;

#[cfg(feature = "tui")]
pub mod ui;

// Re-export commonly used types
pub use auth::{
    AuthContext, AuthError, AuthOutcome, AuthProvider, LocalAuthProvider, LocalAuthSettings,
    Session, User, UserMetadata,
};
pub use config::Config;
pub use entities::{
    Account, AccountColumn, AccountRegistry, Category, CategoryColumn, CategoryRegistry,
    CategoryType, NewAccount,
};
pub use guard::{RouteDecision, SessionStatus};
pub use messages::Locale;
pub use records::{Dataset, EntryColumn, EntryKind, LedgerEntry};
pub use summary::DashboardSummary;
pub use table::{SortDirection, SortState, TableQuery, TableRecord, TableView};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
