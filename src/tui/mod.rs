//! Terminal user interface: lamp welcome screen and result browser.

pub mod app;
pub mod audio;
pub mod screens;
pub mod ui;

pub use app::App;
