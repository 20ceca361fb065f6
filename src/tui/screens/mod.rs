//! Screen modules for the arbres TUI

pub mod browser;
pub mod lamp;

pub use browser::BrowserScreen;
pub use lamp::LampScreen;
