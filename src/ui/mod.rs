pub mod app;
pub mod command;
pub mod context;
pub mod layout;
pub mod plain;
pub mod year_window;

pub use context::{Context, Mode, Theme};
pub use year_window::YearWindow;
