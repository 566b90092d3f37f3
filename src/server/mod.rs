// 🌐 Web Server - HTML pages, JSON API and the route guard
//
// The session lives in a cookie holding the provider's access token. Every
// page request passes through `guard_requests`, which looks the token up once
// and either redirects or hands the session to the handler as an extension.

mod api;
pub mod html;
mod pages;

use anyhow::{Context, Result};
use axum::{
    extract::{Request, State},
    http::{HeaderMap, Method},
    middleware::{self, Next},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::auth::{AuthProvider, LocalAuthProvider, Session};
use crate::config::Config;
use crate::entities::{AccountRegistry, CategoryRegistry};
use crate::guard::{self, RouteDecision, SessionStatus};
use crate::records::Dataset;
use crate::table::{Column, SortState, TableQuery};

pub const SESSION_COOKIE: &str = "budgify_session";

/// Email of the last registration, read by the confirm page
pub const PENDING_EMAIL_COOKIE: &str = "budgify_pending_email";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<dyn AuthProvider>,
    pub dataset: Arc<Dataset>,
    pub categories: Arc<CategoryRegistry>,
    pub accounts: AccountRegistry,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(auth: Arc<dyn AuthProvider>, dataset: Dataset, config: Config) -> Self {
        let categories = CategoryRegistry::new(dataset.categories.clone());
        AppState {
            auth,
            dataset: Arc::new(dataset),
            categories: Arc::new(categories),
            accounts: AccountRegistry::with_defaults(),
            config: Arc::new(config),
        }
    }
}

/// Session of a request that passed the guard signed in
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Session);

// ============================================================================
// COOKIES
// ============================================================================

/// Value of one cookie from the `Cookie` request header(s)
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(axum::http::header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

pub fn session_cookie(session: &Session) -> String {
    let max_age = (session.expires_at - Utc::now()).num_seconds().max(0);
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE, session.access_token, max_age
    )
}

pub fn clear_cookie(name: &str, path: &str) -> String {
    format!("{}=; Path={}; HttpOnly; SameSite=Lax; Max-Age=0", name, path)
}

// ============================================================================
// LIST QUERY PARAMETERS
// ============================================================================

/// `?q=&sort=&dir=&page=` as sent by the list pages and the API.
///
/// Values are kept as text so a bad `sort` or `page` falls back to the
/// default instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub q: Option<String>,
    pub sort: Option<String>,
    pub dir: Option<String>,
    pub page: Option<String>,
}

impl ListParams {
    pub fn to_query<C: Column>(&self, page_size: usize) -> TableQuery<C> {
        let mut query = TableQuery::new(page_size);
        query.search = self.q.as_deref().map(str::trim).unwrap_or_default().to_string();
        query.sort = self
            .sort
            .as_deref()
            .and_then(|sort| sort.parse::<C>().ok())
            .map(|column| {
                let direction = self
                    .dir
                    .as_deref()
                    .and_then(|dir| dir.parse().ok())
                    .unwrap_or_default();
                SortState::new(column, direction)
            });
        query.set_page(
            self.page
                .as_deref()
                .and_then(|page| page.trim().parse().ok())
                .unwrap_or(1),
        );
        query
    }
}

// ============================================================================
// GUARD MIDDLEWARE
// ============================================================================

async fn guard_requests(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let token = read_cookie(request.headers(), SESSION_COOKIE);

    let (status, session) = match token.as_deref() {
        None => (SessionStatus::Anonymous, None),
        Some(token) => match state.auth.get_session(token) {
            Ok(Some(session)) => (SessionStatus::Authenticated, Some(session)),
            Ok(None) => (SessionStatus::Anonymous, None),
            Err(error) => {
                tracing::error!(%error, "session lookup failed");
                (SessionStatus::Unknown, None)
            }
        },
    };

    match guard::decide(request.uri().path(), status) {
        RouteDecision::Redirect(to) => {
            tracing::debug!(path = %request.uri().path(), to, "guard redirect");
            if request.method() == Method::GET {
                Redirect::temporary(to).into_response()
            } else {
                Redirect::to(to).into_response()
            }
        }
        RouteDecision::Continue => {
            if let Some(session) = session {
                request.extensions_mut().insert(CurrentSession(session));
            }
            next.run(request).await
        }
    }
}

// ============================================================================
// ROUTER
// ============================================================================

pub fn router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route("/", get(pages::landing))
        .route("/features", get(pages::features))
        .route("/features/:slug", get(pages::feature_page))
        .route("/login", get(pages::login_form).post(pages::login))
        .route("/register", get(pages::register_form).post(pages::register))
        .route(
            "/register/confirm",
            get(pages::confirm_notice).post(pages::resend_confirmation),
        )
        .route(crate::auth::VERIFIED_PATH, get(pages::verified))
        .route("/logout", post(pages::logout))
        .route("/settings", get(pages::settings).post(pages::update_settings))
        .route("/dashboard", get(pages::dashboard))
        .route("/dashboard/einnahmen", get(pages::income))
        .route("/dashboard/ausgaben", get(pages::expenses))
        .route("/dashboard/kategorien", get(pages::categories))
        .route("/dashboard/konten", get(pages::accounts).post(pages::add_account))
        .route("/dashboard/konten/:id/delete", post(pages::delete_account))
        .route_layer(middleware::from_fn_with_state(state.clone(), guard_requests));

    let api_routes = api::routes().layer(CorsLayer::permissive());

    Router::new()
        .merge(page_routes)
        .nest("/api", api_routes)
        .nest_service("/static", ServeDir::new("web/static"))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Open the store, load the data and serve until the process stops
pub async fn serve(config: Config) -> Result<()> {
    let provider = Arc::new(LocalAuthProvider::open(&config.db_path, config.auth_settings())?);
    let dataset = Dataset::load(config.data_dir.as_deref())?;

    tracing::info!(
        db = %config.db_path.display(),
        income = dataset.income.len(),
        expenses = dataset.expenses.len(),
        "state loaded"
    );

    // Expired sessions are dropped lazily on lookup; this keeps the table small
    let janitor = provider.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(3600));
        loop {
            interval.tick().await;
            match janitor.purge_expired() {
                Ok(0) => {}
                Ok(purged) => tracing::info!(purged, "expired sessions removed"),
                Err(error) => tracing::warn!(%error, "session purge failed"),
            }
        }
    });

    let addr = config.addr;
    let app = router(AppState::new(provider, dataset, config));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    tracing::info!(%addr, "server listening");

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{LocalAuthSettings, UserMetadata};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request as HttpRequest, StatusCode};
    use tower::ServiceExt;

    fn test_state() -> (AppState, Arc<LocalAuthProvider>) {
        let provider = Arc::new(LocalAuthProvider::in_memory(LocalAuthSettings::for_tests()).unwrap());
        let state = AppState::new(provider.clone(), Dataset::fixtures().unwrap(), Config::default());
        (state, provider)
    }

    fn get_request(uri: &str, cookie: Option<&str>) -> HttpRequest<Body> {
        let mut builder = HttpRequest::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn post_form(uri: &str, body: &str, cookie: Option<&str>) -> HttpRequest<Body> {
        let mut builder = HttpRequest::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn send(app: &Router, request: HttpRequest<Body>) -> Response {
        app.clone().oneshot(request).await.unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn location(response: &Response) -> &str {
        response.headers()[header::LOCATION].to_str().unwrap()
    }

    /// `name=value` part of the first Set-Cookie header
    fn set_cookie(response: &Response) -> String {
        let value = response.headers()[header::SET_COOKIE].to_str().unwrap();
        value.split(';').next().unwrap().to_string()
    }

    /// Register, confirm and sign in directly at the provider
    fn signed_in_cookie(provider: &LocalAuthProvider, email: &str) -> String {
        provider
            .sign_up(email, "geheim123", UserMetadata::with_name("Anna").normalized(), None)
            .unwrap();
        let pending = provider.pending_confirmation(email).unwrap().unwrap();
        provider.confirm_email(&pending.token).unwrap();
        let session = provider.sign_in_with_password(email, "geheim123").unwrap();
        format!("{}={}", SESSION_COOKIE, session.access_token)
    }

    #[test]
    fn test_read_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, "theme=dark; budgify_session=abc123".parse().unwrap());
        assert_eq!(read_cookie(&headers, SESSION_COOKIE), Some("abc123".to_string()));
        assert_eq!(read_cookie(&headers, "missing"), None);
    }

    #[test]
    fn test_list_params_fall_back_on_bad_values() {
        let params = ListParams {
            q: Some("  miete ".to_string()),
            sort: Some("height".to_string()),
            dir: Some("desc".to_string()),
            page: Some("zwei".to_string()),
        };
        let query: TableQuery<crate::records::EntryColumn> = params.to_query(10);
        assert_eq!(query.search, "miete");
        assert_eq!(query.sort, None);
        assert_eq!(query.page, 1);
    }

    #[tokio::test]
    async fn test_anonymous_dashboard_redirects_to_login() {
        let (state, _) = test_state();
        let app = router(state);

        for path in ["/dashboard", "/dashboard/ausgaben", "/settings"] {
            let response = send(&app, get_request(path, None)).await;
            assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT, "{}", path);
            assert_eq!(location(&response), "/login");
        }

        let stale = format!("{}=not-a-token", SESSION_COOKIE);
        let response = send(&app, get_request("/dashboard", Some(&stale))).await;
        assert_eq!(location(&response), "/login");
    }

    #[tokio::test]
    async fn test_public_pages() {
        let (state, _) = test_state();
        let app = router(state);

        let response = send(&app, get_request("/", None)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Behalte den Überblick über deine Finanzen"));

        let response = send(&app, get_request("/features/budgetplanung", None)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Setze Budgetgrenzen"));

        let response = send(&app, get_request("/features/erinnerungen", None)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_register_confirm_login_flow() {
        let (state, provider) = test_state();
        let app = router(state);

        let response = send(
            &app,
            post_form(
                "/register",
                "name=Anna&email=anna%40example.com&password=geheim123&confirm_password=geheim123&terms=on",
                None,
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/register/confirm");
        let pending_cookie = set_cookie(&response);

        let response = send(&app, get_request("/register/confirm", Some(&pending_cookie))).await;
        assert!(body_text(response).await.contains("anna@example.com"));

        // Not confirmed yet
        let response = send(
            &app,
            post_form("/login", "email=anna%40example.com&password=geheim123", None),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(body_text(response).await.contains("Bitte bestätige zuerst deine E-Mail-Adresse."));

        let pending = provider.pending_confirmation("anna@example.com").unwrap().unwrap();
        assert!(pending.link().starts_with("http://localhost:3000/auth/verified"));
        let response = send(&app, get_request(&format!("/auth/verified?token={}", pending.token), None)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = send(
            &app,
            post_form("/login", "email=anna%40example.com&password=geheim123", None),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/dashboard");
        let session = set_cookie(&response);
        assert!(session.starts_with(SESSION_COOKIE));

        let response = send(&app, get_request("/dashboard", Some(&session))).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Hallo, Anna"));

        let response = send(&app, get_request("/login", Some(&session))).await;
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&response), "/dashboard");
    }

    #[tokio::test]
    async fn test_wrong_credentials_show_message() {
        let (state, _) = test_state();
        let app = router(state);

        let response = send(
            &app,
            post_form("/login", "email=niemand%40example.com&password=falsch123", None),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(body_text(response)
            .await
            .contains("Ungültige E-Mail-Adresse oder ungültiges Passwort."));
    }

    #[tokio::test]
    async fn test_invalid_registration_is_rejected() {
        let (state, provider) = test_state();
        let app = router(state);

        let response = send(
            &app,
            post_form(
                "/register",
                "name=A&email=kaputt&password=kurz&confirm_password=anders",
                None,
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_text(response).await;
        assert!(body.contains("Die Passwörter stimmen nicht überein."));
        assert!(body.contains("data-field=\"terms\""));
        assert!(provider.pending_confirmation("kaputt").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expense_list_page() {
        let (state, provider) = test_state();
        let cookie = signed_in_cookie(&provider, "anna@example.com");
        let app = router(state);

        let response = send(
            &app,
            get_request("/dashboard/ausgaben?q=bargeld&sort=amount&dir=desc", Some(&cookie)),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("3 Einträge"));
        assert!(body.contains("Seite 1 von 1"));

        let response = send(&app, get_request("/dashboard/einnahmen?q=nichts", Some(&cookie))).await;
        assert!(body_text(response).await.contains("Keine Einnahmen gefunden."));
    }

    #[tokio::test]
    async fn test_category_cards_count_search_matches() {
        let (state, provider) = test_state();
        let cookie = signed_in_cookie(&provider, "anna@example.com");
        let app = router(state);

        let response = send(&app, get_request("/dashboard/kategorien?q=gehalt", Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("<h3>Gesamt</h3><p>1</p>"));
        assert!(body.contains("<h3>Einnahmekategorien</h3><p>1</p>"));
        assert!(body.contains("<h3>Ausgabekategorien</h3><p>0</p>"));
        assert!(body.contains("Keine Kategorien gefunden."));

        let response = send(&app, get_request("/dashboard/kategorien", Some(&cookie))).await;
        assert!(body_text(response).await.contains("<h3>Gesamt</h3><p>13</p>"));
    }

    #[tokio::test]
    async fn test_account_color_outside_hex_is_rejected() {
        let (state, provider) = test_state();
        let cookie = signed_in_cookie(&provider, "anna@example.com");
        let accounts = state.accounts.clone();
        let app = router(state);

        let response = send(
            &app,
            post_form(
                "/dashboard/konten",
                "name=Depot&balance=100&color=red%3Bbackground-image%3Aurl(https%3A%2F%2Fevil.example%2Ft)",
                Some(&cookie),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(accounts.count(), 3);

        let response = send(&app, get_request("/dashboard/konten", Some(&cookie))).await;
        assert!(!body_text(response).await.contains("background-image"));
    }

    #[tokio::test]
    async fn test_accounts_add_and_delete() {
        let (state, provider) = test_state();
        let cookie = signed_in_cookie(&provider, "anna@example.com");
        let accounts = state.accounts.clone();
        let app = router(state);

        let response = send(
            &app,
            post_form("/dashboard/konten", "name=Depot&balance=100%2C50&color=%2310B981", Some(&cookie)),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(accounts.count(), 4);

        let response = send(&app, post_form("/dashboard/konten", "name=&balance=viel", Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(accounts.count(), 4);

        let response = send(&app, post_form("/dashboard/konten/1/delete", "", Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(accounts.count(), 3);

        let response = send(&app, post_form("/dashboard/konten/99/delete", "", Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_logout_ends_session() {
        let (state, provider) = test_state();
        let cookie = signed_in_cookie(&provider, "anna@example.com");
        let app = router(state);

        let response = send(&app, post_form("/logout", "", Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");

        let response = send(&app, get_request("/dashboard", Some(&cookie))).await;
        assert_eq!(location(&response), "/login");
    }

    #[tokio::test]
    async fn test_settings_update_display_name() {
        let (state, provider) = test_state();
        let cookie = signed_in_cookie(&provider, "anna@example.com");
        let app = router(state);

        let response = send(&app, post_form("/settings", "display_name=Anna+B.", Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Profil gespeichert."));

        let token = cookie.trim_start_matches(&format!("{}=", SESSION_COOKIE));
        let session = provider.get_session(token).unwrap().unwrap();
        assert_eq!(session.user.metadata.display_name.as_deref(), Some("Anna B."));
    }
}
