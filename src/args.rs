use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::search::SearchMode;

#[derive(Parser, Debug)]
#[command(author, version, about = "Read plain-text books in the terminal")]
pub struct Options {
    /// Book library: a directory or an http(s) base URL [env: BOOKPANE_LIBRARY]
    #[arg(long, global = true)]
    pub library: Option<String>,

    /// Where favorites and logs are kept [env: BOOKPANE_DATA_DIR]
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log file used while the reader owns the terminal [env: BOOKPANE_LOG]
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Open a book in the reader
    Read(ReadArgs),
    /// List a book's chapters
    Chapters {
        /// Book id
        id: String,
    },
    /// Search a book and print matching lines
    Search(SearchArgs),
    /// Write a book as a standalone HTML page
    Export(ExportArgs),
    /// Show or change favorite books
    Favorites {
        #[command(subcommand)]
        command: FavoritesCommand,
    },
}

#[derive(Args, Debug)]
pub struct ReadArgs {
    /// Book id; without one the reader opens empty
    pub id: Option<String>,

    /// Match search input as plain text instead of a regular expression
    #[arg(long)]
    pub literal: bool,
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Book id
    pub id: String,

    /// Search query (case-insensitive)
    pub query: String,

    /// Match the query as plain text instead of a regular expression
    #[arg(long)]
    pub literal: bool,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Book id
    pub id: String,

    /// Output HTML file
    #[arg(long)]
    pub out: PathBuf,

    /// Body font size in pixels (12-48)
    #[arg(long, default_value_t = crate::session::DEFAULT_FONT_SIZE)]
    pub font_size: u16,
}

#[derive(Subcommand, Debug)]
pub enum FavoritesCommand {
    /// Print favorite book ids, one per line
    List,
    /// Add a book to favorites, or remove it if already there
    Toggle {
        /// Book id
        id: String,
    },
}

pub fn search_mode(literal: bool) -> SearchMode {
    if literal {
        SearchMode::Literal
    } else {
        SearchMode::Pattern
    }
}
