//! Main view: search input, result cards, pagination state.
//!
//! All browse state lives here and is mutated only by this screen's own
//! operations. `search` and `load_more` are the two supported entry
//! points; `fetch_page` is the sole network operation and owns the
//! at-most-one-in-flight guard.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use tracing::{error, info};
use unicode_width::UnicodeWidthStr;

use crate::catalog::{CatalogClient, PhotoSection, TreeCard, TreeRecord};
use crate::tui::ui::{truncate_to_width, InputField, Styles};

/// What the results area shows instead of cards.
#[derive(Debug, Clone, PartialEq)]
pub enum Placeholder {
    None,
    Loading,
    NoResults,
    Error(String),
}

/// Which part of the main view receives key input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Search,
    Results,
}

/// A fetch that has been prepared but not yet run. The event loop draws
/// one frame between preparing and performing, so the loading state is
/// actually visible while the request is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingFetch {
    /// Replace the card set with the fetched page
    NewSearch,
    /// Append the fetched page to the card set
    NextPage,
}

pub struct BrowserScreen {
    pub query_input: InputField,
    pub focus: Focus,

    /// Active query, as used by the last search (load-more reuses it)
    query: String,
    offset: usize,
    rows_per_page: usize,
    is_loading: bool,
    total_count: usize,

    cards: Vec<TreeCard>,
    expanded: Vec<bool>,
    placeholder: Placeholder,
    list_state: ListState,
    initialized: bool,
}

impl BrowserScreen {
    pub fn new(rows_per_page: usize) -> Self {
        Self {
            query_input: InputField::new("Recherche").with_placeholder("chêne, platane, Monceau…"),
            focus: Focus::Search,
            query: String::new(),
            offset: 0,
            rows_per_page,
            is_loading: false,
            total_count: 0,
            cards: Vec::new(),
            expanded: Vec::new(),
            placeholder: Placeholder::None,
            list_state: ListState::default(),
            initialized: false,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// One-time setup: stages the initial page load with an empty
    /// query. Later calls are no-ops, so returning to the main view
    /// shows the state exactly as it was left.
    pub fn prepare_initialize(&mut self) -> Option<PendingFetch> {
        if self.initialized {
            return None;
        }
        self.initialized = true;

        info!("Initializing result browser");
        self.begin_search(String::new());
        Some(PendingFetch::NewSearch)
    }

    /// Stage a fresh search with the text currently in the input field;
    /// the fetched page will replace all displayed cards.
    pub fn prepare_search(&mut self) -> Option<PendingFetch> {
        if self.is_loading {
            return None;
        }

        self.begin_search(self.query_input.value.trim().to_string());
        Some(PendingFetch::NewSearch)
    }

    /// Stage the next page for the stored query; the fetched page will
    /// be appended.
    pub fn prepare_load_more(&mut self) -> Option<PendingFetch> {
        if self.is_loading || !self.load_more_visible() {
            return None;
        }

        self.begin_load_more();
        Some(PendingFetch::NextPage)
    }

    /// Run a staged fetch to completion.
    pub async fn perform_fetch(&mut self, client: &CatalogClient, kind: PendingFetch) {
        let query = self.query.clone();
        let records = self.fetch_page(client, &query).await;
        self.show_page(records, kind == PendingFetch::NewSearch);
    }

    /// The sole network operation. Rejects overlapping calls with an
    /// empty result, never throws past this boundary, and always clears
    /// the in-flight flag on its own exits.
    async fn fetch_page(&mut self, client: &CatalogClient, query: &str) -> Vec<TreeRecord> {
        if self.is_loading {
            return Vec::new();
        }
        self.is_loading = true;

        let result = client.fetch_page(query, self.offset).await;
        self.is_loading = false;

        match result {
            Ok(page) => {
                self.total_count = page.nhits;
                page.records
            }
            Err(e) => {
                error!("Failed to fetch catalog page: {}", e);
                self.placeholder =
                    Placeholder::Error(format!("Impossible de charger les données: {}", e));
                Vec::new()
            }
        }
    }

    fn begin_search(&mut self, query: String) {
        self.query = query;
        self.offset = 0;
        self.placeholder = Placeholder::Loading;
    }

    fn begin_load_more(&mut self) {
        self.offset += self.rows_per_page;
    }

    /// Turn fetched records into cards. A new search replaces the card
    /// set; load-more appends.
    fn show_page(&mut self, records: Vec<TreeRecord>, new_search: bool) {
        if new_search {
            self.cards.clear();
            self.expanded.clear();
            self.list_state.select(None);
        }

        if records.is_empty() {
            if new_search && !matches!(self.placeholder, Placeholder::Error(_)) {
                self.placeholder = Placeholder::NoResults;
            }
            return;
        }

        self.placeholder = Placeholder::None;
        for record in &records {
            self.cards.push(TreeCard::from_record(record));
            self.expanded.push(false);
        }

        if self.list_state.selected().is_none() {
            self.list_state.select(Some(0));
        }
    }

    /// `displayed` of the "`displayed` of `total`" counter.
    pub fn displayed_count(&self) -> usize {
        std::cmp::min(self.offset + self.rows_per_page, self.total_count)
    }

    pub fn load_more_visible(&self) -> bool {
        self.displayed_count() < self.total_count
    }

    pub fn select_next(&mut self) {
        if self.cards.is_empty() {
            return;
        }
        let next = match self.list_state.selected() {
            Some(i) => (i + 1).min(self.cards.len() - 1),
            None => 0,
        };
        self.list_state.select(Some(next));
    }

    pub fn select_previous(&mut self) {
        if self.cards.is_empty() {
            return;
        }
        let prev = self.list_state.selected().unwrap_or(0).saturating_sub(1);
        self.list_state.select(Some(prev));
    }

    /// Toggle the selected card between collapsed and expanded. Only
    /// meaningful on narrow terminals; on wide ones cards are always
    /// fully shown and the toggle is inert.
    pub fn toggle_expanded(&mut self, narrow: bool) {
        if !narrow {
            return;
        }
        if let Some(i) = self.list_state.selected() {
            if let Some(flag) = self.expanded.get_mut(i) {
                *flag = !*flag;
            }
        }
    }

    pub fn draw(&mut self, f: &mut Frame, area: Rect, narrow: bool) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Search input
                Constraint::Length(1), // Result counter
                Constraint::Min(0),    // Cards
            ])
            .split(area);

        self.query_input
            .set_focus(self.focus == Focus::Search);
        self.query_input.render(f, chunks[0]);

        self.draw_counter(f, chunks[1]);
        self.draw_results(f, chunks[2], narrow);
    }

    fn draw_counter(&self, f: &mut Frame, area: Rect) {
        let mut spans = vec![Span::styled(
            format!(
                "Affichage de {} sur {} résultats",
                self.displayed_count(),
                self.total_count
            ),
            Styles::info(),
        )];

        if self.load_more_visible() {
            spans.push(Span::styled("   m: charger plus", Styles::title()));
        }

        let counter = Paragraph::new(Line::from(spans)).alignment(Alignment::Left);
        f.render_widget(counter, area);
    }

    fn draw_results(&mut self, f: &mut Frame, area: Rect, narrow: bool) {
        match &self.placeholder {
            Placeholder::Loading => {
                self.draw_placeholder(f, area, "Chargement des données…", Styles::info());
                return;
            }
            Placeholder::NoResults => {
                self.draw_placeholder(
                    f,
                    area,
                    "🔍 Aucun résultat trouvé\n\nEssayez avec d'autres termes de recherche.",
                    Styles::warning(),
                );
                return;
            }
            Placeholder::Error(message) => {
                let text = format!(
                    "❌ Erreur\n\n{}\n\nVérifiez votre connexion internet ou réessayez plus tard.",
                    message
                );
                self.draw_placeholder(f, area, &text, Styles::error());
                return;
            }
            Placeholder::None => {}
        }

        // Room inside the block borders
        let max_width = area.width.saturating_sub(2) as usize;

        let items: Vec<ListItem> = self
            .cards
            .iter()
            .enumerate()
            .map(|(i, card)| {
                let selected = self.list_state.selected() == Some(i);
                ListItem::new(card_lines(card, self.expanded[i], narrow, selected, max_width))
            })
            .collect();

        let border_style = if self.focus == Focus::Results {
            Styles::active_border()
        } else {
            Styles::inactive_border()
        };

        let list = List::new(items).block(
            Block::default()
                .title("Arbres remarquables")
                .borders(Borders::ALL)
                .border_style(border_style),
        );

        f.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn draw_placeholder(&self, f: &mut Frame, area: Rect, text: &str, style: Style) {
        let widget = Paragraph::new(text)
            .style(style)
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Styles::inactive_border()),
            );
        f.render_widget(widget, area);
    }
}

/// Render one card as lines clipped to the available width. Collapsed
/// cards (narrow terminals only) show just the title line.
fn card_lines(
    card: &TreeCard,
    expanded: bool,
    narrow: bool,
    selected: bool,
    max_width: usize,
) -> Vec<Line<'static>> {
    let title_style = if selected {
        Styles::selected()
    } else {
        Styles::title()
    };

    let mut lines = vec![Line::styled(
        truncate_to_width(&card.title, max_width),
        title_style,
    )];

    if !narrow || expanded {
        match &card.photo {
            PhotoSection::Link(url) => {
                lines.push(Line::styled(
                    truncate_to_width(&format!("  📷 Voir la photo: {}", url), max_width),
                    Styles::info(),
                ));
            }
            PhotoSection::Unavailable => {
                lines.push(Line::styled(
                    "  🌳 Photo non disponible".to_string(),
                    Styles::inactive(),
                ));
            }
        }

        for detail in &card.details {
            let icon = format!("  {} ", detail.icon);
            let label = format!("{}: ", detail.label);
            let available = max_width.saturating_sub(icon.width() + label.width());
            lines.push(Line::from(vec![
                Span::raw(icon),
                Span::styled(label, Styles::title()),
                Span::raw(truncate_to_width(&detail.value, available)),
            ]));
        }
    } else {
        lines.push(Line::styled(
            "  … (Enter pour déplier)".to_string(),
            Styles::inactive(),
        ));
    }

    lines.push(Line::from(""));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::types::TreeFields;
    use crate::config::Config;

    fn record(name: &str) -> TreeRecord {
        TreeRecord {
            fields: TreeFields {
                com_nom_usuel: Some(name.to_string()),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_search_resets_offset_and_replaces_cards() {
        let mut browser = BrowserScreen::new(9);
        browser.offset = 27;
        browser.show_page(vec![record("old")], true);

        browser.begin_search("oak".to_string());
        assert_eq!(browser.offset, 0);
        assert_eq!(browser.query, "oak");
        assert_eq!(browser.placeholder, Placeholder::Loading);

        browser.show_page(vec![record("a"), record("b")], true);
        assert_eq!(browser.cards.len(), 2);
        assert_eq!(browser.placeholder, Placeholder::None);
    }

    #[test]
    fn test_load_more_advances_offset_and_appends() {
        let mut browser = BrowserScreen::new(9);
        browser.begin_search("oak".to_string());
        browser.show_page(vec![record("page1-a"), record("page1-b")], true);

        browser.begin_load_more();
        assert_eq!(browser.offset, 9);
        browser.show_page(vec![record("page2-a")], false);

        assert_eq!(browser.cards.len(), 3);
        assert!(browser.cards[0].title.contains("page1-a"));
        assert!(browser.cards[2].title.contains("page2-a"));
    }

    #[test]
    fn test_empty_new_search_shows_no_results() {
        let mut browser = BrowserScreen::new(9);
        browser.show_page(vec![record("old")], true);

        browser.begin_search("xyzzy".to_string());
        browser.show_page(Vec::new(), true);

        assert!(browser.cards.is_empty());
        assert_eq!(browser.placeholder, Placeholder::NoResults);
    }

    #[test]
    fn test_error_placeholder_survives_empty_page() {
        let mut browser = BrowserScreen::new(9);
        browser.begin_search("oak".to_string());
        browser.placeholder = Placeholder::Error("HTTP 500".to_string());
        browser.show_page(Vec::new(), true);

        assert_eq!(browser.placeholder, Placeholder::Error("HTTP 500".to_string()));
    }

    #[test]
    fn test_counter_math_over_three_pages() {
        let mut browser = BrowserScreen::new(9);
        browser.total_count = 25;

        browser.offset = 0;
        assert_eq!(browser.displayed_count(), 9);
        assert!(browser.load_more_visible());

        browser.offset = 9;
        assert_eq!(browser.displayed_count(), 18);
        assert!(browser.load_more_visible());

        browser.offset = 18;
        assert_eq!(browser.displayed_count(), 25);
        assert!(!browser.load_more_visible());
    }

    #[test]
    fn test_counter_with_no_results() {
        let browser = BrowserScreen::new(9);
        assert_eq!(browser.displayed_count(), 0);
        assert!(!browser.load_more_visible());
    }

    #[test]
    fn test_prepare_search_stages_query_and_loading_state() {
        let mut browser = BrowserScreen::new(9);
        for c in " oak ".chars() {
            browser.query_input.insert_char(c);
        }

        assert_eq!(browser.prepare_search(), Some(PendingFetch::NewSearch));
        assert_eq!(browser.query, "oak");
        assert_eq!(browser.offset, 0);
        assert_eq!(browser.placeholder, Placeholder::Loading);
    }

    #[test]
    fn test_prepare_load_more_requires_more_results() {
        let mut browser = BrowserScreen::new(9);
        assert_eq!(browser.prepare_load_more(), None);

        browser.total_count = 25;
        assert_eq!(browser.prepare_load_more(), Some(PendingFetch::NextPage));
        assert_eq!(browser.offset, 9);
    }

    #[test]
    fn test_prepare_initialize_is_one_time() {
        let mut browser = BrowserScreen::new(9);
        assert_eq!(browser.prepare_initialize(), Some(PendingFetch::NewSearch));
        assert_eq!(browser.prepare_initialize(), None);
    }

    #[tokio::test]
    async fn test_failed_fetch_surfaces_error_panel_and_releases_guard() {
        let mut config = Config::from_env().unwrap();
        config.api_url = "http://127.0.0.1:1/".to_string();
        config.http.timeout_seconds = 1;
        let client = CatalogClient::new(&config).unwrap();

        let mut browser = BrowserScreen::new(9);
        browser.total_count = 42;

        let records = browser.fetch_page(&client, "oak").await;

        assert!(records.is_empty());
        assert!(!browser.is_loading);
        assert_eq!(browser.total_count, 42);
        assert!(matches!(browser.placeholder, Placeholder::Error(_)));
    }

    #[test]
    fn test_card_lines_fit_available_width() {
        let card = TreeCard::from_record(&TreeRecord {
            fields: TreeFields {
                com_nom_usuel: Some("Platane à feuilles d'érable du Jardin des Plantes".to_string()),
                com_adresse: Some("Jardin des Plantes, 57 rue Cuvier, 75005 Paris, France".to_string()),
                com_url_photo1: Some(
                    "https://example.org/photos/platane-jardin-des-plantes-paris.jpg".to_string(),
                ),
                ..Default::default()
            },
        });

        for line in card_lines(&card, true, false, false, 40) {
            assert!(line.width() <= 40, "line too wide: {:?}", line);
        }
    }

    #[tokio::test]
    async fn test_overlapping_fetch_is_rejected() {
        let config = Config::from_env().unwrap();
        let client = CatalogClient::new(&config).unwrap();

        let mut browser = BrowserScreen::new(9);
        browser.offset = 9;
        browser.total_count = 42;
        browser.is_loading = true;

        // Rejected before the first await: no request goes out, state is
        // untouched and the in-flight flag stays owned by the real fetch.
        let records = browser.fetch_page(&client, "oak").await;
        assert!(records.is_empty());
        assert_eq!(browser.offset, 9);
        assert_eq!(browser.total_count, 42);
        assert!(browser.is_loading);
    }

    #[test]
    fn test_search_is_not_staged_while_loading() {
        let mut browser = BrowserScreen::new(9);
        browser.show_page(vec![record("kept")], true);
        browser.is_loading = true;

        assert_eq!(browser.prepare_search(), None);
        assert_eq!(browser.cards.len(), 1);
        assert_eq!(browser.offset, 0);
        assert_eq!(browser.placeholder, Placeholder::None);
    }

    #[test]
    fn test_toggle_expanded_only_when_narrow() {
        let mut browser = BrowserScreen::new(9);
        browser.show_page(vec![record("a")], true);

        browser.toggle_expanded(false);
        assert!(!browser.expanded[0]);

        browser.toggle_expanded(true);
        assert!(browser.expanded[0]);
        browser.toggle_expanded(true);
        assert!(!browser.expanded[0]);
    }

    #[test]
    fn test_selection_stays_in_bounds() {
        let mut browser = BrowserScreen::new(9);
        browser.show_page(vec![record("a"), record("b")], true);

        browser.select_previous();
        assert_eq!(browser.list_state.selected(), Some(0));
        browser.select_next();
        browser.select_next();
        browser.select_next();
        assert_eq!(browser.list_state.selected(), Some(1));
    }
}
