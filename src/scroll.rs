use crate::markdown::SectionEntry;
use anyhow::Result;
use percent_encoding::percent_decode_str;
use std::path::{Path, PathBuf};
use std::{fs, io};

/// The single well-known key holding the persisted scroll offset.
pub const SCROLL_KEY: &str = "bookScrollY";

/// A tiny persistent key-value capability for reader state.
pub trait TextStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// A `TextStore` keeping one file per key under a state directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: &Path) -> Self {
        Self { dir: dir.into() }
    }
}

impl TextStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        match fs::read_to_string(self.dir.join(key)) {
            Ok(value) => Some(value),
            Err(ref e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                log::error!("failed to read state key {key}: {e}");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.dir.join(key), value)?;
        Ok(())
    }
}

/// Where the viewport should start on load.
#[derive(Debug, PartialEq)]
pub enum ScrollTarget {
    /// Jump to the section with this id.
    Section(String),
    /// Jump to a persisted vertical offset.
    Offset(f64),
    /// Stay at the top.
    Top,
}

/// Decide the initial viewport position.
///
/// A URL fragment always wins: it is percent-decoded and matched against the
/// section index, and the persisted offset is never consulted, even when the
/// lookup fails (that failure is logged and the scroll step skipped). Without
/// a fragment, a persisted offset is restored if one parses.
pub fn initial_position(
    fragment: Option<&str>,
    sections: &[SectionEntry],
    store: &dyn TextStore,
) -> ScrollTarget {
    if let Some(fragment) = fragment.filter(|f| !f.is_empty()) {
        let decoded = percent_decode_str(fragment).decode_utf8_lossy();
        if sections.iter().any(|s| s.id == decoded) {
            return ScrollTarget::Section(decoded.into_owned());
        }
        log::warn!("no section matches fragment {decoded:?}");
        return ScrollTarget::Top;
    }

    match store
        .get(SCROLL_KEY)
        .and_then(|v| v.trim().parse::<f64>().ok())
    {
        Some(offset) => ScrollTarget::Offset(offset),
        None => ScrollTarget::Top,
    }
}

/// Persist one scroll tick, overwriting any previous offset.
pub fn record(store: &dyn TextStore, offset: f64) {
    if let Err(e) = store.set(SCROLL_KEY, &offset.to_string()) {
        log::error!("failed to persist scroll position: {e}");
    }
}
