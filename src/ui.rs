use crate::entities::{Account, AccountColumn, AccountRegistry, Category, CategoryColumn};
use crate::messages::{self, format_eur, ListKind, Locale};
use crate::records::{Dataset, EntryColumn, LedgerEntry};
use crate::summary::{view_total, DashboardSummary};
use crate::table::{Column, SortDirection, SortState, TableQuery, TableView};
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Overview,
    Income,
    Expenses,
    Categories,
    Accounts,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Overview,
        Tab::Income,
        Tab::Expenses,
        Tab::Categories,
        Tab::Accounts,
    ];

    pub fn next(&self) -> Self {
        match self {
            Tab::Overview => Tab::Income,
            Tab::Income => Tab::Expenses,
            Tab::Expenses => Tab::Categories,
            Tab::Categories => Tab::Accounts,
            Tab::Accounts => Tab::Overview,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Tab::Overview => Tab::Accounts,
            Tab::Income => Tab::Overview,
            Tab::Expenses => Tab::Income,
            Tab::Categories => Tab::Expenses,
            Tab::Accounts => Tab::Categories,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Tab::Overview => "Übersicht",
            Tab::Income => "Einnahmen",
            Tab::Expenses => "Ausgaben",
            Tab::Categories => "Kategorien",
            Tab::Accounts => "Konten",
        }
    }

    fn list_kind(&self) -> Option<ListKind> {
        match self {
            Tab::Overview => None,
            Tab::Income => Some(ListKind::Income),
            Tab::Expenses => Some(ListKind::Expenses),
            Tab::Categories => Some(ListKind::Categories),
            Tab::Accounts => Some(ListKind::Accounts),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
}

/// Paging numbers of the active list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub page: usize,
    pub total_pages: usize,
    pub matches: usize,
    /// Rows on the current page
    pub rows: usize,
}

impl PageInfo {
    fn of<T>(view: &TableView<T>) -> Self {
        PageInfo {
            page: view.page(),
            total_pages: view.total_pages(),
            matches: view.total_matches(),
            rows: view.rows().len(),
        }
    }
}

pub struct App {
    pub dataset: Dataset,
    pub accounts: AccountRegistry,
    pub summary: DashboardSummary,
    pub locale: Locale,
    pub user_label: String,
    pub current_tab: Tab,
    pub input_mode: InputMode,
    pub income_query: TableQuery<EntryColumn>,
    pub expense_query: TableQuery<EntryColumn>,
    pub category_query: TableQuery<CategoryColumn>,
    pub account_query: TableQuery<AccountColumn>,
    /// Selected row within the current page
    pub state: TableState,
    pub show_detail: bool,
}

impl App {
    pub fn new(
        dataset: Dataset,
        accounts: AccountRegistry,
        page_size: usize,
        budget_limit: f64,
        locale: Locale,
        user_label: &str,
    ) -> Self {
        let summary = DashboardSummary::from_dataset(&dataset, budget_limit);

        Self {
            dataset,
            accounts,
            summary,
            locale,
            user_label: user_label.to_string(),
            current_tab: Tab::Overview,
            input_mode: InputMode::Normal,
            income_query: TableQuery::new(page_size),
            expense_query: TableQuery::new(page_size),
            category_query: TableQuery::new(page_size),
            account_query: TableQuery::new(page_size),
            state: TableState::default(),
            show_detail: false,
        }
    }

    pub fn next_tab(&mut self) {
        self.current_tab = self.current_tab.next();
        self.reset_selection();
    }

    pub fn previous_tab(&mut self) {
        self.current_tab = self.current_tab.previous();
        self.reset_selection();
    }

    pub fn toggle_detail(&mut self) {
        self.show_detail = !self.show_detail;
    }

    /// Search text of the active list (empty on the overview)
    pub fn search(&self) -> &str {
        match self.current_tab {
            Tab::Overview => "",
            Tab::Income => &self.income_query.search,
            Tab::Expenses => &self.expense_query.search,
            Tab::Categories => &self.category_query.search,
            Tab::Accounts => &self.account_query.search,
        }
    }

    fn set_search(&mut self, search: String) {
        match self.current_tab {
            Tab::Overview => return,
            Tab::Income => self.income_query.set_search(search),
            Tab::Expenses => self.expense_query.set_search(search),
            Tab::Categories => self.category_query.set_search(search),
            Tab::Accounts => self.account_query.set_search(search),
        }
        self.reset_selection();
    }

    pub fn start_search(&mut self) {
        if self.current_tab != Tab::Overview {
            self.input_mode = InputMode::Search;
        }
    }

    pub fn push_search_char(&mut self, c: char) {
        let mut search = self.search().to_string();
        search.push(c);
        self.set_search(search);
    }

    pub fn pop_search_char(&mut self) {
        let mut search = self.search().to_string();
        search.pop();
        self.set_search(search);
    }

    pub fn clear_search(&mut self) {
        self.set_search(String::new());
    }

    /// Sort the active list by its `index`-th column (0-based). Repeating the
    /// same column flips the direction.
    pub fn toggle_sort(&mut self, index: usize) {
        fn toggle<C: Column>(query: &mut TableQuery<C>, index: usize) {
            if let Some(column) = C::all().get(index) {
                query.toggle_sort(*column);
            }
        }

        match self.current_tab {
            Tab::Overview => return,
            Tab::Income => toggle(&mut self.income_query, index),
            Tab::Expenses => toggle(&mut self.expense_query, index),
            Tab::Categories => toggle(&mut self.category_query, index),
            Tab::Accounts => toggle(&mut self.account_query, index),
        }
        self.reset_selection();
    }

    /// Active sort as `(column name, direction)`
    pub fn sort_label(&self) -> Option<(&'static str, SortDirection)> {
        fn label<C: Column>(sort: Option<SortState<C>>) -> Option<(&'static str, SortDirection)> {
            sort.map(|state| (state.column.as_str(), state.direction))
        }

        match self.current_tab {
            Tab::Overview => None,
            Tab::Income => label(self.income_query.sort),
            Tab::Expenses => label(self.expense_query.sort),
            Tab::Categories => label(self.category_query.sort),
            Tab::Accounts => label(self.account_query.sort),
        }
    }

    pub fn income_view(&self) -> TableView<LedgerEntry> {
        self.income_query.apply(&self.dataset.income)
    }

    pub fn expense_view(&self) -> TableView<LedgerEntry> {
        self.expense_query.apply(&self.dataset.expenses)
    }

    pub fn category_view(&self) -> TableView<Category> {
        self.category_query.apply(&self.dataset.categories)
    }

    pub fn account_view(&self) -> TableView<Account> {
        self.account_query.apply(&self.accounts.all())
    }

    pub fn page_info(&self) -> Option<PageInfo> {
        match self.current_tab {
            Tab::Overview => None,
            Tab::Income => Some(PageInfo::of(&self.income_view())),
            Tab::Expenses => Some(PageInfo::of(&self.expense_view())),
            Tab::Categories => Some(PageInfo::of(&self.category_view())),
            Tab::Accounts => Some(PageInfo::of(&self.account_view())),
        }
    }

    fn set_page(&mut self, page: usize) {
        match self.current_tab {
            Tab::Overview => return,
            Tab::Income => self.income_query.set_page(page),
            Tab::Expenses => self.expense_query.set_page(page),
            Tab::Categories => self.category_query.set_page(page),
            Tab::Accounts => self.account_query.set_page(page),
        }
        self.reset_selection();
    }

    pub fn next_page(&mut self) {
        if let Some(info) = self.page_info() {
            if info.page < info.total_pages {
                self.set_page(info.page + 1);
            }
        }
    }

    pub fn previous_page(&mut self) {
        if let Some(info) = self.page_info() {
            if info.page > 1 {
                self.set_page(info.page - 1);
            }
        }
    }

    fn reset_selection(&mut self) {
        let rows = self.page_info().map(|info| info.rows).unwrap_or(0);
        self.state.select(if rows > 0 { Some(0) } else { None });
    }

    pub fn next(&mut self) {
        let len = self.page_info().map(|info| info.rows).unwrap_or(0);
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.page_info().map(|info| info.rows).unwrap_or(0);
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    /// Entry under the cursor on the income or expense tab
    pub fn selected_entry(&self) -> Option<LedgerEntry> {
        let view = match self.current_tab {
            Tab::Income => self.income_view(),
            Tab::Expenses => self.expense_view(),
            _ => return None,
        };
        self.state.selected().and_then(|i| view.rows().get(i).cloned())
    }

    fn placeholder(&self) -> &'static str {
        self.current_tab
            .list_kind()
            .map(|kind| messages::empty_list(self.locale, kind))
            .unwrap_or("")
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(%err, "terminal dashboard failed");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };

        if app.input_mode == InputMode::Search {
            match key.code {
                KeyCode::Enter => app.input_mode = InputMode::Normal,
                KeyCode::Esc => {
                    app.clear_search();
                    app.input_mode = InputMode::Normal;
                }
                KeyCode::Backspace => app.pop_search_char(),
                KeyCode::Char(c) => app.push_search_char(c),
                _ => {}
            }
            continue;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    app.previous_tab();
                } else {
                    app.next_tab();
                }
            }
            KeyCode::BackTab => app.previous_tab(),
            KeyCode::Char('/') => app.start_search(),
            KeyCode::Char('c') => app.clear_search(),
            KeyCode::Char(c @ '1'..='5') => {
                let index = c as usize - '1' as usize;
                app.toggle_sort(index);
            }
            KeyCode::Enter => app.toggle_detail(),
            KeyCode::Down | KeyCode::Char('j') => app.next(),
            KeyCode::Up | KeyCode::Char('k') => app.previous(),
            KeyCode::Right | KeyCode::PageDown | KeyCode::Char('n') => app.next_page(),
            KeyCode::Left | KeyCode::PageUp | KeyCode::Char('p') => app.previous_page(),
            _ => {}
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match app.current_tab {
        Tab::Overview => render_overview(f, chunks[1], app),
        _ => {
            let list_chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Min(0)])
                .split(chunks[1]);
            render_search(f, list_chunks[0], app);

            let show_detail = app.show_detail && app.selected_entry().is_some();
            if show_detail {
                let content_chunks = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                    .split(list_chunks[1]);
                render_list(f, content_chunks[0], app);
                render_detail_panel(f, content_chunks[1], app);
            } else {
                render_list(f, list_chunks[1], app);
            }
        }
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut tab_spans = vec![];
    for (i, tab) in Tab::ALL.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *tab == app.current_tab {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(tab.title(), style));
    }

    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        app.user_label.clone(),
        Style::default().fg(Color::White),
    ));

    let header = Paragraph::new(vec![Line::from(tab_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Budgify "),
    );

    f.render_widget(header, area);
}

fn render_overview(f: &mut Frame, area: Rect, app: &App) {
    let summary = &app.summary;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    let change = |value: Option<f64>| {
        value
            .map(|pct| format!(" ({:+.1}%)", pct))
            .unwrap_or_default()
    };
    let (income_change, expense_change) = summary
        .comparison
        .as_ref()
        .map(|c| (change(c.income_change), change(c.expense_change)))
        .unwrap_or_default();

    let lines = vec![
        Line::from(vec![
            Span::raw("Gesamteinnahmen: "),
            Span::styled(format_eur(summary.total_income), Style::default().fg(Color::Green)),
            Span::styled(income_change, Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(vec![
            Span::raw("Gesamtausgaben:  "),
            Span::styled(format_eur(summary.total_expenses), Style::default().fg(Color::Red)),
            Span::styled(expense_change, Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(vec![
            Span::raw("Saldo:           "),
            Span::styled(
                format_eur(summary.balance),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::raw("Kontostand:      "),
            Span::raw(format_eur(app.accounts.total_balance())),
        ]),
    ];

    let cards = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Hallo, {} ", app.user_label)),
    );
    f.render_widget(cards, chunks[0]);

    let budget = &summary.budget;
    let gauge_color = if budget.over_budget { Color::Red } else { Color::Green };
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" Budget-Fortschritt "))
        .gauge_style(Style::default().fg(gauge_color))
        .ratio((budget.percent / 100.0).clamp(0.0, 1.0))
        .label(format!(
            "{} von {} ({:.0}%)",
            format_eur(budget.spent),
            format_eur(budget.limit),
            budget.percent
        ));
    f.render_widget(gauge, chunks[1]);

    let header = Row::new(["Monat", "Einnahmen", "Ausgaben", "Saldo"].map(|h| {
        Cell::from(h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    }))
    .style(Style::default().bg(Color::DarkGray));

    let rows = summary.months.iter().map(|m| {
        Row::new(vec![
            Cell::from(m.month.clone()),
            Cell::from(format_eur(m.income)).style(Style::default().fg(Color::Green)),
            Cell::from(format_eur(m.expenses)).style(Style::default().fg(Color::Red)),
            Cell::from(format_eur(m.balance())),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(10),
            Constraint::Length(16),
            Constraint::Length(16),
            Constraint::Length(16),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title(" Monatsübersicht "));
    f.render_widget(table, chunks[2]);
}

fn render_search(f: &mut Frame, area: Rect, app: &App) {
    let editing = app.input_mode == InputMode::Search;
    let style = if editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::White)
    };

    let mut text = app.search().to_string();
    if editing {
        text.push('▏');
    }

    let search = Paragraph::new(text).style(style).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Suche (/) "),
    );
    f.render_widget(search, area);
}

/// Header cells with a ▲/▼ marker on the sorted column
fn header_row<C: Column>(labels: &[&str], sort: Option<SortState<C>>) -> Row<'static> {
    let cells: Vec<Cell> = labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let marker = match (sort, C::all().get(i)) {
                (Some(state), Some(column)) if state.column == *column => match state.direction {
                    SortDirection::Asc => " ▲",
                    SortDirection::Desc => " ▼",
                },
                _ => "",
            };
            Cell::from(format!("{}{} [{}]", label, marker, i + 1))
                .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        })
        .collect();

    Row::new(cells).style(Style::default().bg(Color::DarkGray)).height(1)
}

fn entry_rows(view: &TableView<LedgerEntry>, color: Color) -> Vec<Row<'static>> {
    view.rows()
        .iter()
        .map(|entry| {
            Row::new(vec![
                Cell::from(truncate(&entry.description, 32)),
                Cell::from(format_eur(entry.amount)).style(Style::default().fg(color)),
                Cell::from(entry.display_date()),
                Cell::from(truncate(&entry.category, 18)),
                Cell::from(truncate(&entry.account, 18)),
            ])
        })
        .collect()
}

fn render_list(f: &mut Frame, area: Rect, app: &mut App) {
    let entry_widths = vec![
        Constraint::Length(34),
        Constraint::Length(14),
        Constraint::Length(12),
        Constraint::Length(20),
        Constraint::Length(20),
    ];
    let entry_labels = ["Beschreibung", "Betrag", "Datum", "Kategorie", "Konto"];

    let (header, rows, widths, title, empty) = match app.current_tab {
        Tab::Overview => return,
        Tab::Income => {
            let view = app.income_view();
            (
                header_row(&entry_labels, app.income_query.sort),
                entry_rows(&view, Color::Green),
                entry_widths,
                format!(" Einnahmen · {} ", format_eur(view_total(&view))),
                view.is_empty(),
            )
        }
        Tab::Expenses => {
            let view = app.expense_view();
            (
                header_row(&entry_labels, app.expense_query.sort),
                entry_rows(&view, Color::Red),
                entry_widths,
                format!(" Ausgaben · {} ", format_eur(view_total(&view))),
                view.is_empty(),
            )
        }
        Tab::Categories => {
            let view = app.category_view();
            let rows: Vec<Row> = view
                .rows()
                .iter()
                .map(|category| {
                    let color = if category.is_income() { Color::Green } else { Color::Red };
                    Row::new(vec![
                        Cell::from(category.name.clone()),
                        Cell::from(category.category_type.label_de()).style(Style::default().fg(color)),
                        Cell::from(category.color.clone()),
                    ])
                })
                .collect();
            let counts = crate::entities::CategoryCounts::of(&crate::table::filter(
                &app.dataset.categories,
                &app.category_query.search,
            ));
            (
                header_row(&["Name", "Typ"], app.category_query.sort),
                rows,
                vec![Constraint::Length(24), Constraint::Length(12), Constraint::Length(10)],
                format!(
                    " Kategorien · {} Einnahme / {} Ausgabe ",
                    counts.income, counts.expense
                ),
                view.is_empty(),
            )
        }
        Tab::Accounts => {
            let view = app.account_view();
            let rows: Vec<Row> = view
                .rows()
                .iter()
                .map(|account| {
                    Row::new(vec![
                        Cell::from(account.name.clone()),
                        Cell::from(format_eur(account.balance)),
                    ])
                })
                .collect();
            (
                header_row(&["Name", "Saldo"], app.account_query.sort),
                rows,
                vec![Constraint::Length(24), Constraint::Length(16)],
                format!(" Konten · {} ", format_eur(app.accounts.total_balance())),
                view.is_empty(),
            )
        }
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(title);

    if empty {
        let placeholder = Paragraph::new(app.placeholder())
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(placeholder, area);
        return;
    }

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_detail_panel(f: &mut Frame, area: Rect, app: &App) {
    let Some(entry) = app.selected_entry() else {
        return;
    };

    let label = Style::default().fg(Color::Yellow);
    let lines = vec![
        Line::from(vec![Span::styled("Beschreibung: ", label), Span::raw(entry.description.clone())]),
        Line::from(vec![Span::styled("Betrag:       ", label), Span::raw(format_eur(entry.amount))]),
        Line::from(vec![Span::styled("Datum:        ", label), Span::raw(entry.display_date())]),
        Line::from(vec![Span::styled("Kategorie:    ", label), Span::raw(entry.category.clone())]),
        Line::from(vec![Span::styled("Konto:        ", label), Span::raw(entry.account.clone())]),
    ];

    let detail = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Details "),
    );
    f.render_widget(detail, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let key = Style::default().fg(Color::Yellow);
    let mut status_spans = vec![];

    if let Some(info) = app.page_info() {
        status_spans.push(Span::styled(
            format!(" Seite {} von {} ", info.page, info.total_pages),
            Style::default().fg(Color::Cyan),
        ));
        status_spans.push(Span::raw(format!("· {} Treffer ", info.matches)));
        if let Some((column, direction)) = app.sort_label() {
            status_spans.push(Span::styled(
                format!("· {} {} ", column, direction.as_str()),
                Style::default().fg(Color::Green),
            ));
        }
        status_spans.push(Span::raw("| "));
        status_spans.push(Span::styled("/", key));
        status_spans.push(Span::raw(" Suche | "));
        status_spans.push(Span::styled("1-5", key));
        status_spans.push(Span::raw(" Sortieren | "));
        status_spans.push(Span::styled("←/→", key));
        status_spans.push(Span::raw(" Seite | "));
        status_spans.push(Span::styled("Enter", key));
        status_spans.push(Span::raw(" Details | "));
    }

    status_spans.push(Span::styled("Tab", key));
    status_spans.push(Span::raw(" Ansicht | "));
    status_spans.push(Span::styled("q", key));
    status_spans.push(Span::raw(" Beenden"));

    let status = Paragraph::new(Line::from(status_spans)).block(Block::default().borders(Borders::ALL));
    f.render_widget(status, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(
            Dataset::fixtures().unwrap(),
            AccountRegistry::with_defaults(),
            5,
            3000.0,
            Locale::De,
            "Anna",
        )
    }

    #[test]
    fn test_tab_cycle() {
        let mut app = app();
        assert_eq!(app.current_tab, Tab::Overview);
        for _ in 0..Tab::ALL.len() {
            app.next_tab();
        }
        assert_eq!(app.current_tab, Tab::Overview);
        app.previous_tab();
        assert_eq!(app.current_tab, Tab::Accounts);
    }

    #[test]
    fn test_overview_ignores_list_keys() {
        let mut app = app();
        app.start_search();
        assert_eq!(app.input_mode, InputMode::Normal);
        app.toggle_sort(0);
        assert!(app.page_info().is_none());
    }

    #[test]
    fn test_paging_and_search_reset() {
        let mut app = app();
        app.current_tab = Tab::Expenses;

        let info = app.page_info().unwrap();
        assert_eq!((info.page, info.total_pages, info.matches), (1, 3, 12));

        app.next_page();
        app.next_page();
        app.next_page();
        assert_eq!(app.page_info().unwrap().page, 3);
        assert_eq!(app.page_info().unwrap().rows, 2);

        for c in "bargeld".chars() {
            app.push_search_char(c);
        }
        let info = app.page_info().unwrap();
        assert_eq!((info.page, info.matches), (1, 3));

        app.previous_page();
        assert_eq!(app.page_info().unwrap().page, 1);
    }

    #[test]
    fn test_sort_toggle_and_selection() {
        let mut app = app();
        app.current_tab = Tab::Expenses;
        app.set_search("bargeld".to_string());

        app.toggle_sort(1);
        app.toggle_sort(1);
        assert_eq!(app.sort_label(), Some(("amount", SortDirection::Desc)));
        assert_eq!(app.selected_entry().map(|e| e.amount), Some(58.5));

        app.next();
        app.next();
        app.next();
        assert_eq!(app.state.selected(), Some(0));
        app.previous();
        assert_eq!(app.selected_entry().map(|e| e.amount), Some(24.0));
    }

    #[test]
    fn test_no_matches_shows_placeholder() {
        let mut app = app();
        app.current_tab = Tab::Income;
        app.set_search("nichts".to_string());

        let info = app.page_info().unwrap();
        assert_eq!((info.page, info.total_pages, info.rows), (1, 1, 0));
        assert_eq!(app.state.selected(), None);
        assert_eq!(app.placeholder(), "Keine Einnahmen gefunden.");

        app.pop_search_char();
        assert_eq!(app.search(), "nicht");
        app.clear_search();
        assert_eq!(app.page_info().unwrap().matches, 8);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Miete", 10), "Miete");
        assert_eq!(truncate("Überweisung Sparkonto", 10), "Überwei...");
    }
}
