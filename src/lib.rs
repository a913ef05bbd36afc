pub mod config;
pub mod daytype;
pub mod error;
pub mod events;
pub mod geometry;
pub mod grid;
pub mod lunar;
pub mod select;
pub mod ui;
