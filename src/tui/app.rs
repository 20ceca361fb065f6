//! Main TUI application state and logic

use anyhow::{Context, Result};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use std::time::{Duration, Instant};
use tracing::info;

use super::audio;
use super::screens::browser::{Focus, PendingFetch};
use super::screens::lamp::LampTick;
use super::screens::{BrowserScreen, LampScreen};
use super::ui::{centered_rect, Styles};
use crate::catalog::CatalogClient;
use crate::config::Config;

/// How long the event loop waits for input before running timers.
const TICK_RATE: Duration = Duration::from_millis(100);

/// Application screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Welcome,
    Main,
}

/// Main TUI application state
pub struct App {
    pub current_screen: Screen,
    pub config: Config,
    client: CatalogClient,

    pub lamp: LampScreen,
    pub browser: BrowserScreen,

    pub should_quit: bool,
    pub show_help_popup: bool,
    /// Whether the last drawn frame was at or under the narrow threshold
    narrow: bool,
    /// Fetch staged by a key handler or tick, run after the next frame
    /// so the loading state is visible while the request is in flight
    pending_fetch: Option<PendingFetch>,
}

impl App {
    /// Create a new TUI application. A client that cannot be built is a
    /// fatal configuration error.
    pub fn new(config: Config) -> Result<Self> {
        let client = CatalogClient::new(&config)
            .context("Failed to initialize the catalog client")?;
        let browser = BrowserScreen::new(config.rows_per_page);

        Ok(Self {
            current_screen: Screen::Welcome,
            config,
            client,
            lamp: LampScreen::new(),
            browser,
            should_quit: false,
            show_help_popup: false,
            narrow: false,
            pending_fetch: None,
        })
    }

    /// Run the main application loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            terminal.draw(|f| self.draw(f))?;

            if crossterm::event::poll(TICK_RATE)? {
                if let Event::Key(key) = crossterm::event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key)?;
                    }
                }
            }

            self.on_tick(Instant::now());

            // Run a staged fetch only after its loading state has been
            // drawn once; the await then covers the whole request.
            if self.pending_fetch.is_some() {
                terminal.draw(|f| self.draw(f))?;
                if let Some(kind) = self.pending_fetch.take() {
                    self.browser.perform_fetch(&self.client, kind).await;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Advance the lamp timers; entering the main view for the first
    /// time also stages the browser's one-time initial load.
    pub fn on_tick(&mut self, now: Instant) {
        match self.lamp.on_tick(now) {
            LampTick::EnterMain => {
                info!("Lamp transition complete, showing main view");
                self.current_screen = Screen::Main;
                self.pending_fetch = self.browser.prepare_initialize();
            }
            LampTick::WelcomeRestored | LampTick::None => {}
        }
    }

    /// Handle keyboard input events. Handlers never block: fetches are
    /// staged in `pending_fetch` and run by the event loop.
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        let typing =
            self.current_screen == Screen::Main && self.browser.focus == Focus::Search;

        // Global shortcuts, except while typing in the search field
        if !typing {
            match key.code {
                KeyCode::F(1) | KeyCode::Char('?') => {
                    self.show_help_popup = !self.show_help_popup;
                    return Ok(());
                }
                KeyCode::Char('q') => {
                    self.should_quit = true;
                    return Ok(());
                }
                _ => {}
            }
        }

        if self.show_help_popup {
            if key.code == KeyCode::Esc {
                self.show_help_popup = false;
            }
            return Ok(());
        }

        match self.current_screen {
            Screen::Welcome => self.handle_welcome_event(key),
            Screen::Main => self.handle_main_event(key),
        }

        Ok(())
    }

    fn handle_welcome_event(&mut self, key: KeyEvent) {
        let now = Instant::now();
        let activated = match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => self.lamp.activate(now),
            KeyCode::Char('p') => self.lamp.pull_chain(now),
            _ => false,
        };

        if activated {
            audio::play_pull_chime();
        }
    }

    fn handle_main_event(&mut self, key: KeyEvent) {
        if self.browser.is_loading() || self.pending_fetch.is_some() {
            return;
        }

        match self.browser.focus {
            Focus::Search => match key.code {
                KeyCode::Enter => {
                    self.pending_fetch = self.browser.prepare_search();
                    self.browser.focus = Focus::Results;
                }
                KeyCode::Tab | KeyCode::Esc | KeyCode::Down => {
                    self.browser.focus = Focus::Results;
                }
                KeyCode::Char(c) => self.browser.query_input.insert_char(c),
                KeyCode::Backspace => self.browser.query_input.delete_char(),
                KeyCode::Left => self.browser.query_input.move_cursor_left(),
                KeyCode::Right => self.browser.query_input.move_cursor_right(),
                _ => {}
            },
            Focus::Results => match key.code {
                KeyCode::Tab | KeyCode::Char('/') => {
                    self.browser.focus = Focus::Search;
                }
                KeyCode::Up => self.browser.select_previous(),
                KeyCode::Down => self.browser.select_next(),
                KeyCode::Enter => self.browser.toggle_expanded(self.narrow),
                KeyCode::Char('m') => {
                    self.pending_fetch = self.browser.prepare_load_more();
                }
                KeyCode::Esc => {
                    // Back to the lamp; browser state is kept as-is
                    if self.lamp.deactivate(Instant::now()) {
                        self.current_screen = Screen::Welcome;
                    }
                }
                _ => {}
            },
        }
    }

    /// Draw the UI
    pub fn draw(&mut self, f: &mut Frame) {
        let size = f.size();
        self.narrow = size.width <= self.config.narrow_cols;

        match self.current_screen {
            Screen::Welcome => self.lamp.draw(f, size),
            Screen::Main => {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(3)])
                    .split(size);

                self.browser.draw(f, chunks[0], self.narrow);
                self.draw_status_bar(f, chunks[1]);
            }
        }

        if self.show_help_popup {
            self.draw_help_popup(f, size);
        }
    }

    fn draw_status_bar(&self, f: &mut Frame, area: Rect) {
        let fetching = self.browser.is_loading() || self.pending_fetch.is_some();
        let status_text = if fetching {
            "Chargement…".to_string()
        } else {
            match self.browser.focus {
                Focus::Search => {
                    "Recherche | Enter: chercher | Tab: résultats | ?: aide".to_string()
                }
                Focus::Results => {
                    "Résultats | ↑/↓: naviguer | m: charger plus | /: recherche | ESC: lampe | q: quitter"
                        .to_string()
                }
            }
        };

        let style = if fetching {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::Gray)
        };

        let status_bar = Paragraph::new(status_text)
            .style(style)
            .block(Block::default().borders(Borders::ALL));

        f.render_widget(status_bar, area);
    }

    fn draw_help_popup(&self, f: &mut Frame, area: Rect) {
        let popup_area = centered_rect(60, 60, area);

        f.render_widget(Clear, popup_area);

        let help_content = "\
Accueil:\n\
  Enter / Espace - Allumer la lampe\n\
  p - Tirer sur la chaîne\n\n\
Résultats:\n\
  Tab / / - Basculer recherche / résultats\n\
  ↑/↓ - Naviguer dans les fiches\n\
  Enter - Déplier une fiche (terminal étroit)\n\
  m - Charger plus de résultats\n\
  ESC - Retour à la lampe\n\n\
Global:\n\
  ? / F1 - Cette aide\n\
  q - Quitter";

        let help_popup = Paragraph::new(help_content)
            .block(
                Block::default()
                    .title("Aide")
                    .borders(Borders::ALL)
                    .style(Styles::warning()),
            )
            .style(Style::default().fg(Color::White));

        f.render_widget(help_popup, popup_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::screens::lamp::LampPhase;
    use crossterm::event::{KeyEvent, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> App {
        App::new(Config::from_env().unwrap()).unwrap()
    }

    #[test]
    fn test_quit_key_on_welcome() {
        let mut app = app();
        app.handle_key_event(key(KeyCode::Char('q'))).unwrap();
        assert!(app.should_quit);
    }

    #[test]
    fn test_enter_lights_the_lamp() {
        let mut app = app();
        app.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert_eq!(app.lamp.phase(), LampPhase::Transitioning);
        // Screen switches only once the delay elapses
        assert_eq!(app.current_screen, Screen::Welcome);
    }

    #[test]
    fn test_help_popup_toggle() {
        let mut app = app();
        app.handle_key_event(key(KeyCode::Char('?'))).unwrap();
        assert!(app.show_help_popup);
        app.handle_key_event(key(KeyCode::Esc)).unwrap();
        assert!(!app.show_help_popup);
    }

    #[test]
    fn test_typing_q_in_search_does_not_quit() {
        let mut app = app();
        app.current_screen = Screen::Main;
        app.browser.focus = Focus::Search;

        app.handle_key_event(key(KeyCode::Char('q'))).unwrap();
        assert!(!app.should_quit);
        assert_eq!(app.browser.query_input.value, "q");
    }

    #[test]
    fn test_esc_in_results_before_transition_keeps_screen() {
        let mut app = app();
        app.current_screen = Screen::Main;
        app.browser.focus = Focus::Results;

        // Lamp never transitioned, deactivate is a no-op
        app.handle_key_event(key(KeyCode::Esc)).unwrap();
        assert_eq!(app.current_screen, Screen::Main);
    }

    #[test]
    fn test_search_key_stages_fetch_for_next_frame() {
        let mut app = app();
        app.current_screen = Screen::Main;
        app.browser.focus = Focus::Search;

        app.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert_eq!(app.pending_fetch, Some(PendingFetch::NewSearch));
        assert_eq!(app.browser.focus, Focus::Results);
    }

    #[test]
    fn test_keys_ignored_while_fetch_is_staged() {
        let mut app = app();
        app.current_screen = Screen::Main;
        app.browser.focus = Focus::Search;
        app.pending_fetch = Some(PendingFetch::NewSearch);

        app.handle_key_event(key(KeyCode::Char('a'))).unwrap();
        assert!(app.browser.query_input.value.is_empty());
    }

    #[test]
    fn test_completed_transition_stages_initial_load() {
        let mut app = app();
        app.handle_key_event(key(KeyCode::Enter)).unwrap();

        app.on_tick(Instant::now() + Duration::from_millis(1200));
        assert_eq!(app.current_screen, Screen::Main);
        assert_eq!(app.pending_fetch, Some(PendingFetch::NewSearch));
    }
}
