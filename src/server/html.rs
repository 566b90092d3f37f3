// 🧱 HTML building blocks shared by the page handlers
//
// Pages are assembled from format! strings. Every value that came from data
// or user input goes through `escape` first.

use axum::response::Html;

use crate::auth::Session;
use crate::messages::{self, Locale};
use crate::table::{Column, DisplayRows, SortDirection, SortState, TableRecord, TableView};
use crate::validation::ValidationErrors;

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Page shell: header navigation, main content, footer
pub fn layout(title: &str, session: Option<&Session>, body: &str) -> Html<String> {
    let account_nav = match session {
        Some(session) => format!(
            r#"<a href="/dashboard">Dashboard</a>
        <a href="/settings">{}</a>
        <form method="post" action="/logout" class="inline"><button type="submit">Abmelden</button></form>"#,
            escape(session.user.display_label())
        ),
        None => r#"<a href="/login">Anmelden</a>
        <a href="/register" class="button">Registrieren</a>"#
            .to_string(),
    };

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="de">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{title} · Budgify</title>
  <link rel="stylesheet" href="/static/style.css">
</head>
<body>
  <header>
    <a href="/" class="brand">Budgify</a>
    <nav>
        <a href="/features">Funktionen</a>
        {account_nav}
    </nav>
  </header>
  <main>
{body}
  </main>
  <footer>© Budgify</footer>
</body>
</html>"#,
        title = escape(title),
        account_nav = account_nav,
        body = body,
    ))
}

/// Dashboard sub-navigation, with the active page highlighted
pub fn dashboard_nav(active: &str) -> String {
    let links = [
        ("/dashboard", "Übersicht"),
        ("/dashboard/einnahmen", "Einnahmen"),
        ("/dashboard/ausgaben", "Ausgaben"),
        ("/dashboard/kategorien", "Kategorien"),
        ("/dashboard/konten", "Konten"),
    ];

    let items: Vec<String> = links
        .iter()
        .map(|(href, label)| {
            let class = if *href == active { r#" class="active""# } else { "" };
            format!(r#"<a href="{}"{}>{}</a>"#, href, class, label)
        })
        .collect();

    format!(r#"<nav class="dashboard-nav">{}</nav>"#, items.join(""))
}

pub fn notice(kind: &str, text: &str) -> String {
    format!(r#"<p class="notice {}">{}</p>"#, kind, escape(text))
}

/// One `<p class="field-error">` per failing field, in form order
pub fn field_errors(locale: Locale, errors: &ValidationErrors) -> String {
    errors
        .0
        .iter()
        .map(|e| {
            format!(
                r#"<p class="field-error" data-field="{}">{}</p>"#,
                e.field,
                escape(messages::rule(locale, e.rule))
            )
        })
        .collect()
}

/// Link to a list page with the given search, sort and page
pub fn list_href<C: Column>(
    base: &str,
    search: &str,
    sort: Option<SortState<C>>,
    page: usize,
) -> String {
    let mut parts = Vec::new();
    if !search.is_empty() {
        parts.push(format!("q={}", urlencoding::encode(search)));
    }
    if let Some(sort) = sort {
        parts.push(format!("sort={}", sort.column.as_str()));
        parts.push(format!("dir={}", sort.direction.as_str()));
    }
    if page > 1 {
        parts.push(format!("page={}", page));
    }

    if parts.is_empty() {
        base.to_string()
    } else {
        format!("{}?{}", base, parts.join("&"))
    }
}

pub fn search_form(base: &str, search: &str, placeholder: &str) -> String {
    format!(
        r#"<form method="get" action="{}" class="search">
  <input type="search" name="q" value="{}" placeholder="{}">
  <button type="submit">Suchen</button>
</form>"#,
        base,
        escape(search),
        escape(placeholder)
    )
}

/// Column header cell; sortable columns link to the toggled sort state
fn header_cell<C: Column>(
    base: &str,
    search: &str,
    current: Option<SortState<C>>,
    label: &str,
    column: Option<C>,
) -> String {
    let Some(column) = column else {
        return format!("<th>{}</th>", escape(label));
    };

    let next = SortState::toggle(current, column);
    let marker = match current {
        Some(state) if state.column == column => match state.direction {
            SortDirection::Asc => " ▲",
            SortDirection::Desc => " ▼",
        },
        _ => "",
    };

    format!(
        r#"<th><a href="{}">{}{}</a></th>"#,
        escape(&list_href(base, search, Some(next), 1)),
        escape(label),
        marker
    )
}

/// Table with sortable headers, the current page of rows (or the
/// placeholder row) and previous/next links.
pub fn data_table<T, F>(
    base: &str,
    search: &str,
    sort: Option<SortState<T::Column>>,
    headers: &[(&str, Option<T::Column>)],
    view: &TableView<T>,
    placeholder: &str,
    render_row: F,
) -> String
where
    T: TableRecord,
    F: Fn(&T) -> String,
{
    let head: String = headers
        .iter()
        .map(|(label, column)| header_cell(base, search, sort, label, *column))
        .collect();

    let body = match view.display(placeholder) {
        DisplayRows::Records(rows) => rows.iter().map(render_row).collect::<String>(),
        DisplayRows::Placeholder(text) => format!(
            r#"<tr class="placeholder"><td colspan="{}">{}</td></tr>"#,
            headers.len(),
            escape(text)
        ),
    };

    let mut pager = format!(
        r#"<span class="page-info">Seite {} von {}</span>"#,
        view.page(),
        view.total_pages()
    );
    if view.has_previous() {
        pager.insert_str(
            0,
            &format!(
                r#"<a href="{}" rel="prev">Zurück</a> "#,
                escape(&list_href(base, search, sort, view.page() - 1))
            ),
        );
    }
    if view.has_next() {
        pager.push_str(&format!(
            r#" <a href="{}" rel="next">Weiter</a>"#,
            escape(&list_href(base, search, sort, view.page() + 1))
        ));
    }

    format!(
        r#"<table>
  <thead><tr>{}</tr></thead>
  <tbody>{}</tbody>
</table>
<div class="pager">{}</div>"#,
        head, body, pager
    )
}

pub fn badge(text: &str, color: Option<&str>) -> String {
    match color {
        Some(color) => format!(
            r#"<span class="badge" style="--badge-color: {}">{}</span>"#,
            escape(color),
            escape(text)
        ),
        None => format!(r#"<span class="badge">{}</span>"#, escape(text)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::EntryColumn;

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
        assert_eq!(escape("Wohnen"), "Wohnen");
    }

    #[test]
    fn test_list_href() {
        assert_eq!(list_href::<EntryColumn>("/dashboard/ausgaben", "", None, 1), "/dashboard/ausgaben");
        assert_eq!(
            list_href(
                "/dashboard/ausgaben",
                "kino abend",
                Some(SortState::new(EntryColumn::Amount, SortDirection::Desc)),
                2
            ),
            "/dashboard/ausgaben?q=kino%20abend&sort=amount&dir=desc&page=2"
        );
    }

    #[test]
    fn test_header_links_toggle_direction() {
        let current = Some(SortState::ascending(EntryColumn::Amount));
        let cell = header_cell("/x", "", current, "Betrag", Some(EntryColumn::Amount));
        assert!(cell.contains("sort=amount&amp;dir=desc"));
        assert!(cell.contains("▲"));

        let other = header_cell("/x", "", current, "Datum", Some(EntryColumn::Date));
        assert!(other.contains("sort=date&amp;dir=asc"));
    }
}
