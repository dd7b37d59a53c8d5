use std::cell::RefCell;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub const FAVORITES_FILE: &str = "favorites.json";

pub const FAVORITE_SYMBOL: &str = "★";
pub const NOT_FAVORITE_SYMBOL: &str = "☆";

/// Persistence for the favorites list.
///
/// The list is ordered by insertion; order carries no meaning beyond that.
pub trait FavoritesStore {
    fn load(&self) -> Result<Vec<String>>;
    fn save(&self, ids: &[String]) -> Result<()>;
}

/// Stores the list as a JSON array of strings in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(FAVORITES_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FavoritesStore for JsonFileStore {
    fn load(&self) -> Result<Vec<String>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        serde_json::from_str(&raw).map_err(Error::Favorites)
    }

    fn save(&self, ids: &[String]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string(ids).map_err(Error::Favorites)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    ids: RefCell<Vec<String>>,
}

impl MemoryStore {
    pub fn with(ids: &[&str]) -> Self {
        Self {
            ids: RefCell::new(ids.iter().map(|s| s.to_string()).collect()),
        }
    }
}

impl FavoritesStore for MemoryStore {
    fn load(&self) -> Result<Vec<String>> {
        Ok(self.ids.borrow().clone())
    }

    fn save(&self, ids: &[String]) -> Result<()> {
        *self.ids.borrow_mut() = ids.to_vec();
        Ok(())
    }
}

pub fn contains(store: &dyn FavoritesStore, id: &str) -> Result<bool> {
    Ok(store.load()?.iter().any(|fav| fav == id))
}

/// Adds `id` if absent, removes it if present. Returns the new membership.
///
/// The list is re-read before every change; a concurrent writer's changes
/// are overwritten by whichever save lands last.
pub fn toggle(store: &dyn FavoritesStore, id: &str) -> Result<bool> {
    let mut ids = store.load()?;
    let now_favorite = if ids.iter().any(|fav| fav == id) {
        ids.retain(|fav| fav != id);
        false
    } else {
        ids.push(id.to_string());
        true
    };
    store.save(&ids)?;
    tracing::info!(book = id, favorite = now_favorite, "toggled favorite");
    Ok(now_favorite)
}

pub fn symbol(favorite: bool) -> &'static str {
    if favorite {
        FAVORITE_SYMBOL
    } else {
        NOT_FAVORITE_SYMBOL
    }
}
