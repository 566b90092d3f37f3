// JSON API: the same list views as the dashboard pages, as data

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Serialize;

use super::{AppState, ListParams};
use crate::entities::{Account, Category};
use crate::messages::{self, ListKind};
use crate::records::{total_amount, EntryColumn, EntryKind, LedgerEntry};
use crate::summary::DashboardSummary;
use crate::table::{TableQuery, TableRecord, TableView};

/// API Response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }
}

/// One page of a list view
#[derive(Debug, Serialize)]
pub struct TablePage<T> {
    rows: Vec<T>,
    page: usize,
    page_size: usize,
    total_pages: usize,
    total_matches: usize,
    /// Sum over every matching row, for income and expense lists
    #[serde(skip_serializing_if = "Option::is_none")]
    total_amount: Option<f64>,
    /// Set when nothing matched
    #[serde(skip_serializing_if = "Option::is_none")]
    placeholder: Option<&'static str>,
}

impl<T: Clone> TablePage<T> {
    fn from_view(view: &TableView<T>, placeholder: &'static str) -> Self {
        TablePage {
            rows: view.rows().to_vec(),
            page: view.page(),
            page_size: view.page_size(),
            total_pages: view.total_pages(),
            total_matches: view.total_matches(),
            total_amount: None,
            placeholder: view.is_empty().then_some(placeholder),
        }
    }
}

fn list<T>(state: &AppState, params: &ListParams, records: &[T], kind: ListKind) -> TablePage<T>
where
    T: TableRecord,
{
    let query: TableQuery<T::Column> = params.to_query(state.config.page_size);
    let view = query.apply(records);
    TablePage::from_view(&view, messages::empty_list(state.config.locale, kind))
}

fn entry_list(state: &AppState, params: &ListParams, kind: EntryKind) -> TablePage<LedgerEntry> {
    let list_kind = match kind {
        EntryKind::Income => ListKind::Income,
        EntryKind::Expense => ListKind::Expenses,
    };

    let query: TableQuery<EntryColumn> = params.to_query(state.config.page_size);
    let view = query.apply(state.dataset.entries(kind));
    let mut page = TablePage::from_view(&view, messages::empty_list(state.config.locale, list_kind));
    page.total_amount = Some(total_amount(view.matched()));
    page
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/income
async fn get_income(State(state): State<AppState>, Query(params): Query<ListParams>) -> impl IntoResponse {
    Json(ApiResponse::ok(entry_list(&state, &params, EntryKind::Income)))
}

/// GET /api/expenses
async fn get_expenses(State(state): State<AppState>, Query(params): Query<ListParams>) -> impl IntoResponse {
    Json(ApiResponse::ok(entry_list(&state, &params, EntryKind::Expense)))
}

/// GET /api/categories
async fn get_categories(State(state): State<AppState>, Query(params): Query<ListParams>) -> impl IntoResponse {
    let page: TablePage<Category> = list(&state, &params, state.categories.all(), ListKind::Categories);
    Json(ApiResponse::ok(page))
}

/// GET /api/accounts
async fn get_accounts(State(state): State<AppState>, Query(params): Query<ListParams>) -> impl IntoResponse {
    let accounts = state.accounts.all();
    let page: TablePage<Account> = list(&state, &params, &accounts, ListKind::Accounts);
    Json(ApiResponse::ok(page))
}

/// GET /api/summary - Dashboard cards and month series
async fn get_summary(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::ok(DashboardSummary::from_dataset(
        &state.dataset,
        state.config.budget_limit,
    )))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/income", get(get_income))
        .route("/expenses", get(get_expenses))
        .route("/categories", get(get_categories))
        .route("/accounts", get(get_accounts))
        .route("/summary", get(get_summary))
}

#[cfg(test)]
mod tests {
    use super::super::{router, AppState};
    use crate::auth::{LocalAuthProvider, LocalAuthSettings};
    use crate::config::Config;
    use crate::records::Dataset;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        let provider = Arc::new(LocalAuthProvider::in_memory(LocalAuthSettings::for_tests()).unwrap());
        let app = router(AppState::new(provider, Dataset::fixtures().unwrap(), Config::default()));

        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, json) = get_json("/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"], "OK");
    }

    #[tokio::test]
    async fn test_expense_search_sorted_by_amount() {
        let (status, json) = get_json("/api/expenses?q=bargeld&sort=amount&dir=desc").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);

        let data = &json["data"];
        assert_eq!(data["total_matches"], 3);
        assert_eq!(data["rows"][0]["amount"], 58.5);
        assert_eq!(data["rows"][2]["amount"], 24.0);
        assert!(data.get("placeholder").is_none());
    }

    #[tokio::test]
    async fn test_empty_search_returns_placeholder() {
        let (_, json) = get_json("/api/income?q=nichts").await;
        let data = &json["data"];
        assert_eq!(data["rows"].as_array().map(Vec::len), Some(0));
        assert_eq!(data["page"], 1);
        assert_eq!(data["total_pages"], 1);
        assert_eq!(data["placeholder"], "Keine Einnahmen gefunden.");
    }

    #[tokio::test]
    async fn test_paging_clamps_to_last_page() {
        let (_, json) = get_json("/api/expenses?page=99").await;
        let data = &json["data"];
        assert_eq!(data["total_matches"], 12);
        assert_eq!(data["page"], 2);
        assert_eq!(data["rows"].as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn test_api_is_not_guarded() {
        let (status, json) = get_json("/api/accounts?sort=balance&dir=desc").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["rows"][0]["name"], "Sparkonto");
    }

    #[tokio::test]
    async fn test_summary() {
        let (_, json) = get_json("/api/summary").await;
        assert_eq!(json["data"]["months"].as_array().map(Vec::len), Some(2));
        assert_eq!(json["data"]["top_expense_category"]["category"], "Wohnen");
    }
}
