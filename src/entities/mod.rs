// Entity Models - Categories and accounts shown on the dashboard
//
// Each entity has:
// - A small flat record with a display color
// - A registry for lookups (categories) or ephemeral editing (accounts)

pub mod account;
pub mod category;

pub use account::{Account, AccountColumn, AccountRegistry, NewAccount};
pub use category::{Category, CategoryColumn, CategoryCounts, CategoryRegistry, CategoryType};
