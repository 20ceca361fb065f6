//! Welcome screen: the lamp, its pull chain, and the timed transition
//! into the main view.
//!
//! The state machine is deliberately tiny. Two guard flags make repeated
//! activations no-ops, and two deadline timestamps drive the delayed
//! view switches; `on_tick` is called from the event loop with the
//! current instant so tests can feed synthetic times.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use std::time::{Duration, Instant};

use crate::tui::ui::Styles;

/// Delay between pulling the chain and entering the main view.
pub const TRANSITION_DELAY: Duration = Duration::from_millis(1200);
/// Delay before the welcome view reappears after leaving the main view.
pub const RETURN_DELAY: Duration = Duration::from_millis(500);

/// How long the cosmetic chain tug lasts.
const CHAIN_TUG: Duration = Duration::from_millis(300);

/// Observable lamp phase, derived from the flags and pending deadlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LampPhase {
    /// Lamp off, waiting for a pull
    Idle,
    /// Lit, transition pending
    Transitioning,
    /// Main view shown
    Active,
    /// Main view left, welcome not yet re-shown
    Returning,
}

/// Tick outcome the app has to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LampTick {
    None,
    /// Transition delay elapsed: show the main view now
    EnterMain,
    /// Return delay elapsed: welcome view is back, lamp is Idle again
    WelcomeRestored,
}

pub struct LampScreen {
    is_lit: bool,
    has_transitioned: bool,
    /// Light-expansion visual, reset as soon as the lamp goes off
    light_expand: bool,
    transition_at: Option<Instant>,
    return_at: Option<Instant>,
    chain_pulled_at: Option<Instant>,
}

impl LampScreen {
    pub fn new() -> Self {
        Self {
            is_lit: false,
            has_transitioned: false,
            light_expand: false,
            transition_at: None,
            return_at: None,
            chain_pulled_at: None,
        }
    }

    pub fn phase(&self) -> LampPhase {
        if self.return_at.is_some() {
            LampPhase::Returning
        } else if self.has_transitioned {
            LampPhase::Active
        } else if self.is_lit {
            LampPhase::Transitioning
        } else {
            LampPhase::Idle
        }
    }

    /// Turn the lamp on. Only the first call has any effect; once lit or
    /// transitioned all further calls are no-ops. Returns whether the lamp
    /// was newly lit, so the caller can start the chime.
    pub fn activate(&mut self, now: Instant) -> bool {
        if self.is_lit || self.has_transitioned {
            return false;
        }

        self.is_lit = true;
        self.light_expand = true;
        self.transition_at = Some(now + TRANSITION_DELAY);
        true
    }

    /// Pull-chain variant of [`activate`]: same transition plus a purely
    /// cosmetic chain tug.
    pub fn pull_chain(&mut self, now: Instant) -> bool {
        self.chain_pulled_at = Some(now);
        self.activate(now)
    }

    /// Leave the main view. Valid only once transitioned; lit visuals
    /// reset immediately, the guard flags clear when the return delay
    /// elapses. Browser state is untouched.
    pub fn deactivate(&mut self, now: Instant) -> bool {
        if !self.has_transitioned || self.return_at.is_some() {
            return false;
        }

        self.light_expand = false;
        self.return_at = Some(now + RETURN_DELAY);
        true
    }

    /// Advance pending deadlines.
    pub fn on_tick(&mut self, now: Instant) -> LampTick {
        if let Some(deadline) = self.transition_at {
            if now >= deadline {
                self.transition_at = None;
                self.has_transitioned = true;
                return LampTick::EnterMain;
            }
        }

        if let Some(deadline) = self.return_at {
            if now >= deadline {
                self.return_at = None;
                self.is_lit = false;
                self.has_transitioned = false;
                return LampTick::WelcomeRestored;
            }
        }

        if let Some(pulled) = self.chain_pulled_at {
            if now >= pulled + CHAIN_TUG {
                self.chain_pulled_at = None;
            }
        }

        LampTick::None
    }

    pub fn draw(&self, f: &mut Frame, area: Rect) {
        // Between leaving the main view and the welcome view coming back
        // the screen stays dark.
        if self.phase() == LampPhase::Returning {
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(12),
                Constraint::Length(3),
                Constraint::Min(0),
            ])
            .split(area);

        self.draw_lamp(f, chunks[1]);

        let hint = if self.is_lit {
            Line::from(Span::styled("✨", Style::default().fg(Color::Yellow)))
        } else {
            Line::from(vec![
                Span::styled("Tirez sur la chaîne — ", Styles::inactive()),
                Span::styled("Enter", Styles::title()),
                Span::styled(" ou ", Styles::inactive()),
                Span::styled("p", Styles::title()),
                Span::styled("  (q: quitter)", Styles::inactive()),
            ])
        };
        let hint = Paragraph::new(hint).alignment(Alignment::Center);
        f.render_widget(hint, chunks[2]);
    }

    fn draw_lamp(&self, f: &mut Frame, area: Rect) {
        let chain_tugged = self.chain_pulled_at.is_some();

        let bulb = if self.is_lit { "(●)" } else { "(○)" };
        let rays = if self.is_lit { "\\ │ /" } else { "     " };
        let glow = if self.light_expand { "・  ✦  ・" } else { "" };
        let chain_tail = if chain_tugged { "§" } else { "│" };

        let lamp_style = if self.is_lit {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let rows = [
            "┌─────┐".to_string(),
            "│".to_string(),
            "┌┴┐".to_string(),
            "/   \\".to_string(),
            format!("/ {} \\", bulb),
            "‾‾‾‾‾‾‾".to_string(),
            rays.to_string(),
            glow.to_string(),
            "│".to_string(),
            chain_tail.to_string(),
            "○".to_string(),
        ];

        let lines: Vec<Line> = rows
            .into_iter()
            .map(|row| Line::styled(row, lamp_style))
            .collect();

        let lamp = Paragraph::new(lines).alignment(Alignment::Center);
        f.render_widget(lamp, area);
    }
}

impl Default for LampScreen {
    fn default() -> Self {
        Self::new()
    }
}
