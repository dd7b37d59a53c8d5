//! A terminal reader for plain-text books.
//!
//! Books live in a library as `<id>/info.json` and `<id>/book.txt`. The text
//! is split into chapters on lines starting with `##`, shown in a
//! scrollable pane with a chapter sidebar, and can be searched with
//! highlighted results. Favorite book ids are kept in a small JSON file.

pub mod app;
pub mod args;
pub mod chapter;
pub mod config;
pub mod error;
pub mod favorites;
pub mod library;
pub mod logging;
pub mod render;
pub mod search;
pub mod session;
pub mod view;

pub use error::{Error, Result};
