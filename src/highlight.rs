use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{IncludeBackground, styled_line_to_highlighted_html};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

/// A capability lookup for syntax highlighting, keyed by language tag.
///
/// Only explicitly registered tags are highlighted; everything else yields
/// `None` so callers fall back to plain escaped output. Internal highlighting
/// failures are logged and degrade the same way, never propagating outward.
pub struct HighlightRegistry {
    syntaxes: SyntaxSet,
    theme: Theme,
    registered: Vec<String>,
}

impl HighlightRegistry {
    pub fn new() -> Self {
        let syntaxes = SyntaxSet::load_defaults_newlines();
        let themes = ThemeSet::load_defaults();
        let theme = themes.themes["InspiredGitHub"].clone();
        Self {
            syntaxes,
            theme,
            registered: vec![],
        }
    }

    /// Register a language tag for highlighting. Returns false when the
    /// bundled syntax set has no grammar for the tag.
    pub fn register(&mut self, tag: &str) -> bool {
        if self.syntaxes.find_syntax_by_token(tag).is_none() {
            log::warn!("no grammar for language tag {tag:?}");
            return false;
        }
        if !self.is_registered(tag) {
            self.registered.push(tag.to_ascii_lowercase());
        }
        true
    }

    pub fn is_registered(&self, tag: &str) -> bool {
        self.registered.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Highlight a code block, returning the inner markup (no `<pre>`
    /// wrapper). `None` means the caller should use its default escaping.
    pub fn highlight(&self, tag: &str, code: &str) -> Option<String> {
        if tag.is_empty() || !self.is_registered(tag) {
            return None;
        }
        let syntax = self.syntaxes.find_syntax_by_token(tag)?;

        let mut lines = HighlightLines::new(syntax, &self.theme);
        let mut markup = String::new();
        for line in LinesWithEndings::from(code) {
            let regions = match lines.highlight_line(line, &self.syntaxes) {
                Ok(regions) => regions,
                Err(e) => {
                    log::error!("highlighting {tag} failed: {e}");
                    return None;
                }
            };
            match styled_line_to_highlighted_html(&regions, IncludeBackground::No) {
                Ok(html) => markup.push_str(&html),
                Err(e) => {
                    log::error!("highlighting {tag} failed: {e}");
                    return None;
                }
            }
        }
        Some(markup)
    }
}

impl Default for HighlightRegistry {
    fn default() -> Self {
        Self::new()
    }
}
