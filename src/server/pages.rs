// 📄 HTML page handlers: marketing, auth screens, settings and dashboard

use axum::{
    extract::{Form, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Extension,
};
use serde::Deserialize;

use super::html::{self, escape};
use super::{
    clear_cookie, read_cookie, session_cookie, AppState, CurrentSession, ListParams,
    PENDING_EMAIL_COOKIE,
};
use crate::auth::{AuthContext, AuthError, UserMetadata};
use crate::content::{self, FEATURES, HERO};
use crate::entities::{Account, Category, CategoryColumn};
use crate::messages::{self, format_eur, ListKind};
use crate::records::{EntryColumn, EntryKind, LedgerEntry};
use crate::summary::{view_total, DashboardSummary};
use crate::table::TableQuery;
use crate::validation::{AccountForm, LoginForm, RegisterForm, Rule, MIN_NAME_LEN};

type MaybeSession = Option<Extension<CurrentSession>>;

fn session_of(current: &MaybeSession) -> Option<&crate::auth::Session> {
    current.as_ref().map(|Extension(CurrentSession(session))| session)
}

// ============================================================================
// MARKETING
// ============================================================================

/// GET /
pub async fn landing(current: MaybeSession) -> impl IntoResponse {
    let cards: String = FEATURES
        .iter()
        .map(|feature| {
            let more = feature
                .slug
                .map(|slug| format!(r#"<a href="/features/{}">Mehr erfahren</a>"#, slug))
                .unwrap_or_default();
            format!(
                "<article class=\"feature\"><h3>{}</h3><p>{}</p>{}</article>",
                escape(feature.title),
                escape(feature.summary),
                more
            )
        })
        .collect();

    let body = format!(
        r#"<section class="hero">
  <h1>{}</h1>
  <p>{}</p>
  <a href="/register" class="button">{}</a>
  <a href="/features" class="button outline">{}</a>
</section>
<section class="features">
  <h2>Funktionen, die deine Finanzen vereinfachen</h2>
  {}
</section>"#,
        escape(HERO.headline),
        escape(HERO.subline),
        escape(HERO.primary_cta),
        escape(HERO.secondary_cta),
        cards
    );

    html::layout("Start", session_of(&current), &body)
}

/// GET /features
pub async fn features(current: MaybeSession) -> impl IntoResponse {
    let items: String = content::explainer_pages()
        .filter_map(|feature| {
            feature.slug.map(|slug| {
                format!(
                    r#"<li><a href="/features/{}">{}</a> {}</li>"#,
                    slug,
                    escape(feature.title),
                    escape(feature.summary)
                )
            })
        })
        .collect();

    let body = format!("<h1>Alle Funktionen von Budgify</h1><ul class=\"feature-list\">{}</ul>", items);
    html::layout("Funktionen", session_of(&current), &body)
}

/// GET /features/:slug
pub async fn feature_page(current: MaybeSession, Path(slug): Path<String>) -> Response {
    let Some(feature) = content::find_feature(&slug) else {
        let body = "<h1>Seite nicht gefunden</h1>";
        return (StatusCode::NOT_FOUND, html::layout("Nicht gefunden", session_of(&current), body))
            .into_response();
    };

    let steps: String = feature
        .steps
        .iter()
        .enumerate()
        .map(|(i, step)| {
            format!(
                "<li><span class=\"step\">{}</span><h3>{}</h3><p>{}</p></li>",
                i + 1,
                escape(step.title),
                escape(step.text)
            )
        })
        .collect();

    let body = format!(
        r#"<section class="hero"><h1>{}</h1><p>{}</p><a href="/register" class="button">Jetzt ausprobieren</a></section>
<section><h2>So funktioniert es</h2><ol class="steps">{}</ol></section>
<section class="cta"><p>{}</p><a href="/register" class="button">Kostenlos starten</a></section>"#,
        escape(feature.title),
        escape(feature.tagline),
        steps,
        escape(feature.closing)
    );

    html::layout(feature.title, session_of(&current), &body).into_response()
}

// ============================================================================
// LOGIN / REGISTER / CONFIRM
// ============================================================================

fn login_page(email: &str, errors: &str) -> Html<String> {
    let body = format!(
        r#"<h1>Anmelden</h1>
{}
<form method="post" action="/login" class="auth">
  <label>E-Mail <input type="email" name="email" value="{}"></label>
  <label>Passwort <input type="password" name="password"></label>
  <button type="submit">Anmelden</button>
</form>
<p>Noch kein Konto? <a href="/register">Registrieren</a></p>"#,
        errors,
        escape(email)
    );
    html::layout("Anmelden", None, &body)
}

/// GET /login
pub async fn login_form() -> impl IntoResponse {
    login_page("", "")
}

/// POST /login
pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    let locale = state.config.locale;

    if let Err(errors) = form.validate() {
        let errors = html::field_errors(locale, &errors);
        return (StatusCode::UNPROCESSABLE_ENTITY, login_page(&form.email, &errors))
            .into_response();
    }

    let mut auth = AuthContext::new(state.auth.clone());
    let outcome = auth.sign_in(&form.email, &form.password);

    match (outcome.success, auth.session()) {
        (true, Some(session)) => (
            [(header::SET_COOKIE, session_cookie(session))],
            Redirect::to("/dashboard"),
        )
            .into_response(),
        _ => {
            let message = outcome
                .message(locale)
                .unwrap_or_else(|| messages::auth_error(locale, &AuthError::InvalidCredentials));
            let status = match outcome.error {
                Some(AuthError::Storage(_)) => StatusCode::INTERNAL_SERVER_ERROR,
                _ => StatusCode::UNAUTHORIZED,
            };
            (status, login_page(&form.email, &html::notice("error", message))).into_response()
        }
    }
}

fn register_page(form: &RegisterForm, errors: &str) -> Html<String> {
    let body = format!(
        r#"<h1>Registrieren</h1>
{}
<form method="post" action="/register" class="auth">
  <label>Name <input type="text" name="name" value="{}"></label>
  <label>E-Mail <input type="email" name="email" value="{}"></label>
  <label>Passwort <input type="password" name="password"></label>
  <label>Passwort bestätigen <input type="password" name="confirm_password"></label>
  <label class="checkbox"><input type="checkbox" name="terms"> Ich stimme den Nutzungsbedingungen zu</label>
  <button type="submit">Konto erstellen</button>
</form>
<p>Bereits registriert? <a href="/login">Anmelden</a></p>"#,
        errors,
        escape(&form.name),
        escape(&form.email)
    );
    html::layout("Registrieren", None, &body)
}

/// GET /register
pub async fn register_form() -> impl IntoResponse {
    register_page(&RegisterForm::default(), "")
}

/// POST /register
pub async fn register(State(state): State<AppState>, Form(form): Form<RegisterForm>) -> Response {
    let locale = state.config.locale;

    if let Err(errors) = form.validate() {
        let errors = html::field_errors(locale, &errors);
        return (StatusCode::UNPROCESSABLE_ENTITY, register_page(&form, &errors)).into_response();
    }

    let mut auth = AuthContext::new(state.auth.clone()).with_site_origin(&state.config.site_url);
    let outcome = auth.sign_up(&form.email, &form.password, UserMetadata::with_name(form.name.trim()));

    match outcome.message(locale) {
        None => {
            let email = auth.last_registered_email().unwrap_or(form.email.as_str());
            let cookie = format!(
                "{}={}; Path=/register; HttpOnly; SameSite=Lax",
                PENDING_EMAIL_COOKIE,
                urlencoding::encode(email)
            );
            ([(header::SET_COOKIE, cookie)], Redirect::to("/register/confirm")).into_response()
        }
        Some(message) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            register_page(&form, &html::notice("error", message)),
        )
            .into_response(),
    }
}

fn pending_email(headers: &HeaderMap) -> Option<String> {
    read_cookie(headers, PENDING_EMAIL_COOKIE)
        .and_then(|raw| urlencoding::decode(&raw).ok().map(|email| email.into_owned()))
        .filter(|email| !email.is_empty())
}

fn confirm_page(email: Option<&str>, notice: &str) -> Html<String> {
    let body = format!(
        r#"<h1>Bestätige deine E-Mail-Adresse</h1>
{}
<form method="post" action="/register/confirm" class="auth">
  <label>E-Mail <input type="email" name="email" value="{}"></label>
  <button type="submit">Bestätigungsmail erneut senden</button>
</form>
<p><a href="/login">Zur Anmeldung</a></p>"#,
        notice,
        escape(email.unwrap_or(""))
    );
    html::layout("E-Mail bestätigen", None, &body)
}

/// GET /register/confirm
pub async fn confirm_notice(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let auth = AuthContext::new(state.auth.clone()).with_last_registered_email(pending_email(&headers));
    let email = auth.last_registered_email();

    let notice = email
        .map(|email| html::notice("info", &messages::confirmation_sent(state.config.locale, email)))
        .unwrap_or_default();
    confirm_page(email, &notice)
}

#[derive(Debug, Default, Deserialize)]
pub struct ResendForm {
    #[serde(default)]
    pub email: String,
}

/// POST /register/confirm
pub async fn resend_confirmation(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<ResendForm>,
) -> Response {
    let locale = state.config.locale;
    let auth = AuthContext::new(state.auth.clone())
        .with_site_origin(&state.config.site_url)
        .with_last_registered_email(pending_email(&headers));

    let email = Some(form.email.trim())
        .filter(|email| !email.is_empty())
        .or(auth.last_registered_email())
        .map(str::to_string);

    let Some(email) = email else {
        let notice = html::notice("error", messages::rule(locale, Rule::Required));
        return (StatusCode::UNPROCESSABLE_ENTITY, confirm_page(None, &notice)).into_response();
    };

    let outcome = auth.resend_confirmation(&email);
    match outcome.message(locale) {
        None => {
            let notice = html::notice("info", &messages::confirmation_sent(locale, &email));
            confirm_page(Some(&email), &notice).into_response()
        }
        Some(message) => (
            StatusCode::BAD_REQUEST,
            confirm_page(Some(&email), &html::notice("error", message)),
        )
            .into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub struct VerifyParams {
    pub token: Option<String>,
}

/// GET /auth/verified?token=
pub async fn verified(State(state): State<AppState>, Query(params): Query<VerifyParams>) -> Response {
    let locale = state.config.locale;
    let result = match params.token.as_deref().filter(|t| !t.is_empty()) {
        Some(token) => state.auth.confirm_email(token),
        None => Err(AuthError::InvalidConfirmationToken),
    };

    match result {
        Ok(user) => {
            tracing::info!(user_id = %user.id, "email confirmed");
            let body = r#"<h1>E-Mail bestätigt</h1>
<p>Deine E-Mail-Adresse wurde erfolgreich bestätigt. Du kannst dich jetzt anmelden.</p>
<a href="/login" class="button">Zur Anmeldung</a>"#;
            (
                [(header::SET_COOKIE, clear_cookie(PENDING_EMAIL_COOKIE, "/register"))],
                html::layout("E-Mail bestätigt", None, body),
            )
                .into_response()
        }
        Err(error) => {
            tracing::warn!(%error, "email confirmation failed");
            let body = format!(
                r#"<h1>Bestätigung fehlgeschlagen</h1>{}<a href="/register/confirm">Neuen Link anfordern</a>"#,
                html::notice("error", messages::auth_error(locale, &error))
            );
            (StatusCode::BAD_REQUEST, html::layout("Bestätigung fehlgeschlagen", None, &body))
                .into_response()
        }
    }
}

/// POST /logout
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let token = read_cookie(&headers, super::SESSION_COOKIE);
    match AuthContext::restore(state.auth.clone(), token.as_deref()) {
        Ok(mut auth) => auth.sign_out(),
        Err(error) => tracing::warn!(%error, "session lookup failed during logout"),
    }

    (
        [(header::SET_COOKIE, clear_cookie(super::SESSION_COOKIE, "/"))],
        Redirect::to("/"),
    )
        .into_response()
}

// ============================================================================
// SETTINGS
// ============================================================================

fn settings_page(session: &crate::auth::Session, notice: &str) -> Html<String> {
    let name = session.user.metadata.display_name.as_deref().unwrap_or("");
    let body = format!(
        r#"<h1>Einstellungen</h1>
{}
<section>
  <h2>Profil</h2>
  <p>E-Mail: {}</p>
  <form method="post" action="/settings" class="auth">
    <label>Anzeigename <input type="text" name="display_name" value="{}"></label>
    <button type="submit">Speichern</button>
  </form>
</section>"#,
        notice,
        escape(&session.user.email),
        escape(name)
    );
    html::layout("Einstellungen", Some(session), &body)
}

/// GET /settings
pub async fn settings(Extension(CurrentSession(session)): Extension<CurrentSession>) -> impl IntoResponse {
    settings_page(&session, "")
}

#[derive(Debug, Default, Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub display_name: String,
}

/// POST /settings
pub async fn update_settings(
    State(state): State<AppState>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
    Form(form): Form<ProfileForm>,
) -> Response {
    let locale = state.config.locale;
    let name = form.display_name.trim();

    if name.chars().count() < MIN_NAME_LEN {
        let notice = html::notice("error", messages::rule(locale, Rule::NameTooShort));
        return (StatusCode::UNPROCESSABLE_ENTITY, settings_page(&session, &notice)).into_response();
    }

    let mut auth = match AuthContext::restore(state.auth.clone(), Some(&session.access_token)) {
        Ok(auth) => auth,
        Err(error) => {
            let notice = html::notice("error", messages::auth_error(locale, &error));
            return (StatusCode::INTERNAL_SERVER_ERROR, settings_page(&session, &notice)).into_response();
        }
    };

    let outcome = auth.update_profile(Some(name));
    let current = auth.session().cloned().unwrap_or(session);
    match outcome.message(locale) {
        None => settings_page(&current, &html::notice("success", "Profil gespeichert.")).into_response(),
        Some(message) => (
            StatusCode::BAD_REQUEST,
            settings_page(&current, &html::notice("error", message)),
        )
            .into_response(),
    }
}

// ============================================================================
// DASHBOARD
// ============================================================================

/// GET /dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
) -> impl IntoResponse {
    let summary = DashboardSummary::from_dataset(&state.dataset, state.config.budget_limit);

    let change = |value: Option<f64>| {
        value
            .map(|pct| format!("{:+.1}% zum Vormonat", pct).replace('.', ","))
            .unwrap_or_else(|| "–".to_string())
    };
    let (income_change, expense_change) = summary
        .comparison
        .as_ref()
        .map(|c| (change(c.income_change), change(c.expense_change)))
        .unwrap_or_else(|| (change(None), change(None)));

    let months: String = summary
        .months
        .iter()
        .map(|m| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                m.month,
                format_eur(m.income),
                format_eur(m.expenses),
                format_eur(m.balance())
            )
        })
        .collect();

    let mut latest: Vec<&LedgerEntry> = state.dataset.expenses.iter().collect();
    latest.sort_by(|a, b| b.date.cmp(&a.date));
    let latest: String = latest
        .iter()
        .take(5)
        .map(|e| entry_row(&state, e))
        .collect();

    let top = |total: &Option<crate::summary::CategoryTotal>| {
        total
            .as_ref()
            .map(|t| format!("{} ({})", escape(&t.category), format_eur(t.total)))
            .unwrap_or_else(|| "–".to_string())
    };

    let body = format!(
        r#"{nav}
<h1>Hallo, {name}</h1>
<section class="cards">
  <div class="card"><h3>Gesamteinnahmen</h3><p class="amount income">{income}</p><small>{income_change}</small></div>
  <div class="card"><h3>Gesamtausgaben</h3><p class="amount expense">{expenses}</p><small>{expense_change}</small></div>
  <div class="card"><h3>Saldo</h3><p class="amount">{balance}</p></div>
  <div class="card"><h3>Budget-Fortschritt</h3>
    <progress max="100" value="{percent:.0}"></progress>
    <small>{percent_text}% des monatlichen Budgets ({limit}) ausgegeben</small>
  </div>
</section>
<section>
  <h2>Monatsübersicht</h2>
  <table><thead><tr><th>Monat</th><th>Einnahmen</th><th>Ausgaben</th><th>Saldo</th></tr></thead><tbody>{months}</tbody></table>
  <p>Größte Einnahmequelle: {top_income} · Größte Ausgabenkategorie: {top_expense}</p>
</section>
<section>
  <h2>Letzte Ausgaben</h2>
  <table><thead><tr><th>Beschreibung</th><th>Betrag</th><th>Datum</th><th>Kategorie</th><th>Konto</th></tr></thead><tbody>{latest}</tbody></table>
</section>"#,
        nav = html::dashboard_nav("/dashboard"),
        name = escape(session.user.display_label()),
        income = format_eur(summary.total_income),
        expenses = format_eur(summary.total_expenses),
        balance = format_eur(summary.balance),
        income_change = income_change,
        expense_change = expense_change,
        percent = summary.budget.percent.min(100.0),
        percent_text = format!("{:.0}", summary.budget.percent),
        limit = format_eur(summary.budget.limit),
        months = months,
        top_income = top(&summary.top_income_category),
        top_expense = top(&summary.top_expense_category),
        latest = latest,
    );

    html::layout("Dashboard", Some(&session), &body)
}

fn entry_row(state: &AppState, entry: &LedgerEntry) -> String {
    format!(
        "<tr><td>{}</td><td class=\"amount\">{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
        escape(&entry.description),
        format_eur(entry.amount),
        entry.display_date(),
        html::badge(&entry.category, state.categories.color_for(&entry.category)),
        escape(&entry.account)
    )
}

const ENTRY_HEADERS: &[(&str, Option<EntryColumn>)] = &[
    ("Beschreibung", Some(EntryColumn::Description)),
    ("Betrag", Some(EntryColumn::Amount)),
    ("Datum", Some(EntryColumn::Date)),
    ("Kategorie", Some(EntryColumn::Category)),
    ("Konto", Some(EntryColumn::Account)),
];

fn entry_list(state: &AppState, session: &crate::auth::Session, kind: EntryKind, params: &ListParams) -> Html<String> {
    let locale = state.config.locale;
    let (base, list_kind) = match kind {
        EntryKind::Income => ("/dashboard/einnahmen", ListKind::Income),
        EntryKind::Expense => ("/dashboard/ausgaben", ListKind::Expenses),
    };

    let query: TableQuery<EntryColumn> = params.to_query(state.config.page_size);
    let view = query.apply(state.dataset.entries(kind));
    let title = messages::list_title(locale, list_kind);

    let table = html::data_table(
        base,
        &query.search,
        query.sort,
        ENTRY_HEADERS,
        &view,
        messages::empty_list(locale, list_kind),
        |entry| entry_row(state, entry),
    );

    let body = format!(
        r#"{}
<h1>{}</h1>
<div class="cards">
  <div class="card"><h3>Summe</h3><p class="amount">{}</p><small>{} Einträge</small></div>
</div>
{}
{}"#,
        html::dashboard_nav(base),
        title,
        format_eur(view_total(&view)),
        view.total_matches(),
        html::search_form(base, &query.search, "Suchen nach Beschreibung, Kategorie oder Konto"),
        table
    );

    html::layout(title, Some(session), &body)
}

/// GET /dashboard/einnahmen
pub async fn income(
    State(state): State<AppState>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
    Query(params): Query<ListParams>,
) -> impl IntoResponse {
    entry_list(&state, &session, EntryKind::Income, &params)
}

/// GET /dashboard/ausgaben
pub async fn expenses(
    State(state): State<AppState>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
    Query(params): Query<ListParams>,
) -> impl IntoResponse {
    entry_list(&state, &session, EntryKind::Expense, &params)
}

/// GET /dashboard/kategorien
pub async fn categories(
    State(state): State<AppState>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
    Query(params): Query<ListParams>,
) -> impl IntoResponse {
    let locale = state.config.locale;
    let base = "/dashboard/kategorien";
    let query: TableQuery<CategoryColumn> = params.to_query(state.config.page_size);
    let (income, expense) = state.categories.search_split(&query.search);
    let counts = state.categories.counts_matching(&query.search);

    let headers: &[(&str, Option<CategoryColumn>)] =
        &[("Name", Some(CategoryColumn::Name)), ("Farbe", None)];
    let placeholder = messages::empty_list(locale, ListKind::Categories);

    let render = |category: &Category| {
        format!(
            "<tr><td>{}</td><td><span class=\"swatch\" style=\"background: {}\"></span> {}</td></tr>",
            escape(&category.name),
            escape(&category.color),
            escape(&category.color)
        )
    };

    // Income and expense categories page independently
    let section = |title: &str, categories: &[Category]| {
        let view = query.apply(categories);
        format!(
            "<section><h2>{}</h2>{}</section>",
            title,
            html::data_table(base, &query.search, query.sort, headers, &view, placeholder, render)
        )
    };

    let body = format!(
        r#"{}
<h1>{}</h1>
<div class="cards">
  <div class="card"><h3>Gesamt</h3><p>{}</p></div>
  <div class="card"><h3>Einnahmekategorien</h3><p>{}</p></div>
  <div class="card"><h3>Ausgabekategorien</h3><p>{}</p></div>
</div>
{}
{}
{}"#,
        html::dashboard_nav(base),
        messages::list_title(locale, ListKind::Categories),
        counts.total,
        counts.income,
        counts.expense,
        html::search_form(base, &query.search, "Kategorien durchsuchen"),
        section("Einnahmekategorien", &income),
        section("Ausgabekategorien", &expense),
    );

    html::layout("Kategorien", Some(&session), &body)
}

fn accounts_page(state: &AppState, session: &crate::auth::Session, form: &AccountForm, errors: &str) -> Html<String> {
    let locale = state.config.locale;
    let accounts = state.accounts.all();

    let rows: String = if accounts.is_empty() {
        format!(
            r#"<tr class="placeholder"><td colspan="3">{}</td></tr>"#,
            escape(messages::empty_list(locale, ListKind::Accounts))
        )
    } else {
        accounts.iter().map(account_row).collect()
    };

    let body = format!(
        r#"{}
<h1>{}</h1>
<div class="cards"><div class="card"><h3>Gesamtsaldo</h3><p class="amount">{}</p></div></div>
<table><thead><tr><th>Name</th><th>Saldo</th><th></th></tr></thead><tbody>{}</tbody></table>
<section>
  <h2>Neues Konto</h2>
  {}
  <form method="post" action="/dashboard/konten" class="inline-form">
    <label>Name <input type="text" name="name" value="{}"></label>
    <label>Saldo <input type="text" name="balance" value="{}"></label>
    <label>Farbe <input type="color" name="color" value="{}"></label>
    <button type="submit">Hinzufügen</button>
  </form>
</section>"#,
        html::dashboard_nav("/dashboard/konten"),
        messages::list_title(locale, ListKind::Accounts),
        format_eur(state.accounts.total_balance()),
        rows,
        errors,
        escape(&form.name),
        escape(&form.balance),
        escape(form.color.as_deref().unwrap_or(crate::entities::account::DEFAULT_ACCOUNT_COLOR)),
    );

    html::layout("Konten", Some(session), &body)
}

fn account_row(account: &Account) -> String {
    format!(
        r#"<tr><td><span class="swatch" style="background: {}"></span> {}</td><td class="amount">{}</td>
<td><form method="post" action="/dashboard/konten/{}/delete"><button type="submit">Löschen</button></form></td></tr>"#,
        escape(&account.color),
        escape(&account.name),
        format_eur(account.balance),
        account.id
    )
}

/// GET /dashboard/konten
pub async fn accounts(
    State(state): State<AppState>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
) -> impl IntoResponse {
    accounts_page(&state, &session, &AccountForm::default(), "")
}

/// POST /dashboard/konten
pub async fn add_account(
    State(state): State<AppState>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
    Form(form): Form<AccountForm>,
) -> Response {
    match state.accounts.add_from_form(&form) {
        Ok(_) => Redirect::to("/dashboard/konten").into_response(),
        Err(errors) => {
            let errors = html::field_errors(state.config.locale, &errors);
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                accounts_page(&state, &session, &form, &errors),
            )
                .into_response()
        }
    }
}

/// POST /dashboard/konten/:id/delete
pub async fn delete_account(State(state): State<AppState>, Path(id): Path<u64>) -> Response {
    if state.accounts.remove(id) {
        Redirect::to("/dashboard/konten").into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}
