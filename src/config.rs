use anyhow::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{fs, io};

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Title for the assembled page.
    pub title: String,
    /// Base URL all resource paths are fetched under.
    pub base_url: String,
    /// Number of chapters, fetched as `chapter1.md` .. `chapterN.md`.
    pub chapters: u32,
    /// Path prefix for chapter files, relative to the base URL.
    pub chapter_dir: String,
    /// Path of the introduction document, relative to the base URL.
    pub introduction: String,
    /// Language tags to register for syntax highlighting.
    pub languages: Vec<String>,
    pub fetch_timeout_secs: u64,
    /// Directory holding persisted reader state (the scroll offset).
    pub state_dir: PathBuf,
    /// Output file for `build`.
    pub output: PathBuf,
    /// Listen address for `serve`.
    pub listen: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "PureScript by Example".into(),
            base_url: "https://raw.githubusercontent.com/purescript-contrib/purescript-book/master"
                .into(),
            chapters: 14,
            chapter_dir: "text/".into(),
            introduction: "README.md".into(),
            languages: vec!["haskell".into(), "javascript".into()],
            fetch_timeout_secs: 30,
            state_dir: ".chapbook".into(),
            output: "book.html".into(),
            listen: "127.0.0.1:3000".into(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            // Silently proceed if the file isn't found, but crash on other errors.
            Err(ref e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e)?,
            Ok(s) => Ok(toml::from_str(&s)?),
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}
