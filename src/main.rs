use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;

use budgify::config::{init_tracing, Config};
use budgify::messages::{self, format_eur, ListKind};
use budgify::summary::{view_total, DashboardSummary};
use budgify::table::{Column, SortDirection, SortState, TableQuery, TableRecord, TableView};
#[cfg(feature = "tui")]
use budgify::ui;
use budgify::{
    Account, AccountColumn, AccountRegistry, AuthContext, AuthOutcome, AuthProvider, Category,
    CategoryColumn, Dataset, EntryColumn, EntryKind, LedgerEntry, LocalAuthProvider, UserMetadata,
};

/// Budgify - personal finance dashboard
#[derive(Debug, Parser)]
#[command(name = "budgify", version = budgify::VERSION)]
struct Cli {
    /// SQLite file with users and sessions (overrides BUDGIFY_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Directory with income/expenses/categories files (overrides BUDGIFY_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sign in and open the terminal dashboard (default)
    Dashboard {
        #[arg(long, env = "BUDGIFY_EMAIL")]
        email: Option<String>,
        #[arg(long, env = "BUDGIFY_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Create an account; prints where the confirmation link was sent
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "BUDGIFY_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Confirm an email address with the token from the confirmation link
    Confirm { token: String },

    /// Send a fresh confirmation link
    Resend {
        #[arg(long)]
        email: String,
    },

    /// Print one page of a list
    List {
        kind: ListArg,
        #[arg(long, short, default_value = "")]
        search: String,
        /// Column to sort by (e.g. amount, date, name, balance)
        #[arg(long)]
        sort: Option<String>,
        #[arg(long)]
        desc: bool,
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print the dashboard totals
    Summary {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ListArg {
    #[value(alias = "einnahmen")]
    Income,
    #[value(alias = "ausgaben")]
    Expenses,
    #[value(alias = "kategorien")]
    Categories,
    #[value(alias = "konten")]
    Accounts,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    init_tracing(config.log_json);
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Some(dir) = cli.data_dir {
        config.data_dir = Some(dir);
    }

    match cli.command.unwrap_or(Command::Dashboard {
        email: None,
        password: None,
    }) {
        Command::Dashboard { email, password } => run_ui_mode(&config, email, password),
        Command::Register {
            name,
            email,
            password,
        } => run_register(&config, &name, &email, &password),
        Command::Confirm { token } => run_confirm(&config, &token),
        Command::Resend { email } => run_resend(&config, &email),
        Command::List {
            kind,
            search,
            sort,
            desc,
            page,
            json,
        } => run_list(&config, kind, &search, sort.as_deref(), desc, page, json),
        Command::Summary { json } => run_summary(&config, json),
    }
}

fn open_provider(config: &Config) -> Result<Arc<LocalAuthProvider>> {
    let provider = LocalAuthProvider::open(&config.db_path, config.auth_settings())
        .with_context(|| format!("Failed to open {}", config.db_path.display()))?;
    Ok(Arc::new(provider))
}

/// Turn a failed outcome into an error carrying the user-facing message
fn check(config: &Config, outcome: AuthOutcome) -> Result<()> {
    match outcome.message(config.locale) {
        None => Ok(()),
        Some(message) => Err(anyhow!(message)),
    }
}

// ============================================================================
// AUTH COMMANDS
// ============================================================================

fn run_register(config: &Config, name: &str, email: &str, password: &str) -> Result<()> {
    let provider = open_provider(config)?;
    let mut auth = AuthContext::new(provider).with_site_origin(&config.site_url);

    check(config, auth.sign_up(email, password, UserMetadata::with_name(name)))?;

    println!("✓ {}", messages::confirmation_sent(config.locale, email));
    Ok(())
}

fn run_confirm(config: &Config, token: &str) -> Result<()> {
    let provider = open_provider(config)?;
    let user = provider
        .confirm_email(token.trim())
        .map_err(|error| anyhow!(messages::auth_error(config.locale, &error)))?;

    println!("✓ {} bestätigt", user.email);
    Ok(())
}

fn run_resend(config: &Config, email: &str) -> Result<()> {
    let provider = open_provider(config)?;
    let auth = AuthContext::new(provider)
        .with_site_origin(&config.site_url)
        .with_last_registered_email(Some(email.to_string()));

    check(config, auth.resend_confirmation(email))?;

    println!("✓ {}", messages::confirmation_sent(config.locale, email));
    Ok(())
}

// ============================================================================
// LIST + SUMMARY
// ============================================================================

fn query_for<C: Column>(config: &Config, search: &str, sort: Option<&str>, desc: bool, page: usize) -> Result<TableQuery<C>> {
    let mut query = TableQuery::new(config.page_size);
    query.set_search(search.trim());

    if let Some(sort) = sort {
        let column: C = sort.parse().map_err(|_| {
            let known: Vec<&str> = C::all().iter().map(|c| c.as_str()).collect();
            anyhow!("Unknown sort column {:?} (expected one of: {})", sort, known.join(", "))
        })?;
        let direction = if desc { SortDirection::Desc } else { SortDirection::Asc };
        query.sort = Some(SortState::new(column, direction));
    }

    query.set_page(page);
    Ok(query)
}

fn print_view<T, F>(config: &Config, kind: ListKind, view: &TableView<T>, json: bool, render: F) -> Result<()>
where
    T: TableRecord + serde::Serialize,
    F: Fn(&T) -> String,
{
    if json {
        println!("{}", serde_json::to_string_pretty(view.rows())?);
        return Ok(());
    }

    println!("{}", messages::list_title(config.locale, kind));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    if view.is_empty() {
        println!("  {}", messages::empty_list(config.locale, kind));
    }
    for record in view.rows() {
        println!("{}", render(record));
    }

    println!(
        "\nSeite {} von {} · {} Treffer",
        view.page(),
        view.total_pages(),
        view.total_matches()
    );
    Ok(())
}

fn run_list(
    config: &Config,
    kind: ListArg,
    search: &str,
    sort: Option<&str>,
    desc: bool,
    page: usize,
    json: bool,
) -> Result<()> {
    let dataset = Dataset::load(config.data_dir.as_deref())?;

    let entry_line = |e: &LedgerEntry| {
        format!(
            "{:<32} {:>14}  {}  {:<16} {}",
            e.description,
            format_eur(e.amount),
            e.display_date(),
            e.category,
            e.account
        )
    };

    match kind {
        ListArg::Income | ListArg::Expenses => {
            let (entry_kind, list_kind) = if kind == ListArg::Income {
                (EntryKind::Income, ListKind::Income)
            } else {
                (EntryKind::Expense, ListKind::Expenses)
            };
            let query: TableQuery<EntryColumn> = query_for(config, search, sort, desc, page)?;
            let view = query.apply(dataset.entries(entry_kind));
            print_view(config, list_kind, &view, json, entry_line)?;
            if !json {
                println!("Summe: {}", format_eur(view_total(&view)));
            }
        }
        ListArg::Categories => {
            let query: TableQuery<CategoryColumn> = query_for(config, search, sort, desc, page)?;
            let view = query.apply(&dataset.categories);
            print_view(config, ListKind::Categories, &view, json, |c: &Category| {
                format!("{:<24} {:<10} {}", c.name, c.category_type.label_de(), c.color)
            })?;
        }
        ListArg::Accounts => {
            let accounts = AccountRegistry::with_defaults();
            let query: TableQuery<AccountColumn> = query_for(config, search, sort, desc, page)?;
            let view = query.apply(&accounts.all());
            print_view(config, ListKind::Accounts, &view, json, |a: &Account| {
                format!("{:<24} {:>14}", a.name, format_eur(a.balance))
            })?;
        }
    }

    Ok(())
}

fn run_summary(config: &Config, json: bool) -> Result<()> {
    let dataset = Dataset::load(config.data_dir.as_deref())?;
    let summary = DashboardSummary::from_dataset(&dataset, config.budget_limit);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("📊 Budgify - Übersicht");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Gesamteinnahmen: {}", format_eur(summary.total_income));
    println!("Gesamtausgaben:  {}", format_eur(summary.total_expenses));
    println!("Saldo:           {}", format_eur(summary.balance));
    println!(
        "Budget:          {} von {} ({:.0}%){}",
        format_eur(summary.budget.spent),
        format_eur(summary.budget.limit),
        summary.budget.percent,
        if summary.budget.over_budget { " ⚠️ überschritten" } else { "" }
    );

    println!("\nMonat      Einnahmen        Ausgaben         Saldo");
    for month in &summary.months {
        println!(
            "{:<10} {:>15}  {:>15}  {:>15}",
            month.month,
            format_eur(month.income),
            format_eur(month.expenses),
            format_eur(month.balance())
        );
    }

    if let Some(top) = &summary.top_expense_category {
        println!("\nGrößte Ausgabenkategorie: {} ({})", top.category, format_eur(top.total));
    }
    Ok(())
}

// ============================================================================
// TERMINAL DASHBOARD
// ============================================================================

#[cfg(feature = "tui")]
fn run_ui_mode(config: &Config, email: Option<String>, password: Option<String>) -> Result<()> {
    let (Some(email), Some(password)) = (email, password) else {
        return Err(anyhow!(
            "Sign-in required: pass --email and --password (or BUDGIFY_EMAIL / BUDGIFY_PASSWORD)"
        ));
    };

    let provider = open_provider(config)?;
    let mut auth = AuthContext::new(provider);
    check(config, auth.sign_in(&email, &password))?;

    let label = auth
        .user()
        .map(|user| user.display_label().to_string())
        .unwrap_or(email);

    println!("🖥️  Loading Budgify dashboard...");
    let dataset = Dataset::load(config.data_dir.as_deref())?;

    let mut app = ui::App::new(
        dataset,
        AccountRegistry::with_defaults(),
        config.page_size,
        config.budget_limit,
        config.locale,
        &label,
    );
    ui::run_ui(&mut app)?;

    auth.sign_out();
    println!("\n✅ Signed out");
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &Config, _email: Option<String>, _password: Option<String>) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the web dashboard: cargo run --bin budgify-server --features server");
    std::process::exit(1);
}
