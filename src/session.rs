//! Reader state for one book view.

use crate::chapter::{NavTarget, Parsed, parse};
use crate::favorites::{self, FavoritesStore};
use crate::library::{BookSource, fetch_content, fetch_info};
use crate::render::Renderer;
use crate::search::{SearchError, SearchMode, SearchView, search};

pub const DEFAULT_FONT_SIZE: u16 = 22;
pub const MIN_FONT_SIZE: u16 = 12;
pub const MAX_FONT_SIZE: u16 = 48;

/// Title shown before any book is loaded.
pub const APP_TITLE: &str = "Reader";

#[derive(Debug, Clone)]
pub struct Session {
    pub book_id: Option<String>,
    pub title: String,
    pub text: String,
    pub parsed: Parsed,
    pub query: String,
    pub search_mode: SearchMode,
    pub search_view: SearchView,
    pub search_error: Option<String>,
    pub font_size: u16,
    pub sidebar_visible: bool,
    pub fullscreen: bool,
    pub search_open: bool,
    pub favorite: bool,
    pub load_error: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            book_id: None,
            title: APP_TITLE.to_string(),
            text: String::new(),
            parsed: Parsed::default(),
            query: String::new(),
            search_mode: SearchMode::default(),
            search_view: SearchView::default(),
            search_error: None,
            font_size: DEFAULT_FONT_SIZE,
            sidebar_visible: true,
            fullscreen: false,
            search_open: false,
            favorite: false,
            load_error: None,
        }
    }
}

impl Session {
    pub fn new(search_mode: SearchMode) -> Self {
        Self {
            search_mode,
            ..Self::default()
        }
    }

    /// Loads a book, replacing whatever was shown before.
    ///
    /// Failure of either fetch leaves the session empty with `load_error`
    /// set; there is no retry. The metadata title stays once `info.json`
    /// has been read, even if the content fetch then fails.
    pub fn load(&mut self, source: &dyn BookSource, store: &dyn FavoritesStore, id: &str) {
        self.book_id = Some(id.to_string());
        self.text.clear();
        self.parsed = Parsed::default();
        self.query.clear();
        self.search_view = SearchView::Cleared;
        self.search_error = None;
        self.load_error = None;

        self.title = APP_TITLE.to_string();
        let loaded = fetch_info(source, id).and_then(|info| {
            self.title = info.display_title().to_string();
            fetch_content(source, id)
        });
        match loaded {
            Ok(text) => {
                self.parsed = parse(&text);
                self.text = text;
                tracing::info!(
                    book = id,
                    chapters = self.parsed.chapters.len(),
                    blocks = self.parsed.blocks.len(),
                    "parsed book"
                );
            }
            Err(err) => {
                tracing::warn!(book = id, error = %err, "failed to load book");
                self.load_error = Some(format!("Failed to load book: {err}"));
            }
        }

        self.favorite = match favorites::contains(store, id) {
            Ok(favorite) => favorite,
            Err(err) => {
                tracing::warn!(error = %err, "could not read favorites");
                false
            }
        };
    }

    pub fn is_loaded(&self) -> bool {
        self.book_id.is_some() && self.load_error.is_none()
    }

    /// Reruns the search for `query` over the whole text.
    pub fn set_query(&mut self, query: &str) -> Result<(), SearchError> {
        self.query = query.to_string();
        self.search_view = SearchView::Cleared;
        self.search_error = None;
        match search(&self.text, query, self.search_mode) {
            Ok(view) => {
                self.search_view = view;
                Ok(())
            }
            Err(err) => {
                self.search_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    pub fn change_font_size(&mut self, delta: i32) -> u16 {
        let size = (i32::from(self.font_size) + delta)
            .clamp(i32::from(MIN_FONT_SIZE), i32::from(MAX_FONT_SIZE));
        self.font_size = size as u16;
        self.font_size
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_visible = !self.sidebar_visible;
        self.search_open = false;
    }

    pub fn toggle_search(&mut self) {
        self.search_open = !self.search_open;
        self.sidebar_visible = false;
    }

    pub fn close_search(&mut self) {
        self.search_open = false;
    }

    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen = !self.fullscreen;
    }

    pub fn toggle_favorite(&mut self, store: &dyn FavoritesStore) -> crate::Result<bool> {
        let Some(id) = self.book_id.as_deref() else {
            return Ok(false);
        };
        self.favorite = favorites::toggle(store, id)?;
        Ok(self.favorite)
    }

    /// Resolves a sidebar item or search result activation.
    ///
    /// Anchors that name no parsed chapter resolve to `None`, leaving the
    /// view where it is.
    pub fn activate(&mut self, target: &NavTarget) -> Option<NavTarget> {
        let resolved = match target {
            NavTarget::Top => Some(NavTarget::Top),
            NavTarget::Anchor(id) => self
                .parsed
                .chapters
                .iter()
                .find(|c| &c.id == id)
                .map(|c| c.target()),
        };
        if resolved.is_some() {
            self.search_open = false;
        }
        resolved
    }

    pub fn present(&self, renderer: &mut dyn Renderer) {
        renderer.show_title(&self.title, self.favorite);
        match &self.load_error {
            Some(message) => renderer.show_error(message),
            None => renderer.show_book(&self.parsed.blocks, &self.parsed.chapters),
        }
        renderer.show_search(&self.search_view);
    }
}
