//! hxv - Terminal hex viewer
//!
//! Offset gutter, hex grid and ASCII grid rendered from a windowed slice
//! of the input, kept in lockstep by a shared cursor.

pub mod app;
pub mod config;
pub mod cursor;
pub mod grid;
pub mod logging;
pub mod source;
pub mod ui;
pub mod window;
