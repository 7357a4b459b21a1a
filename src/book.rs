use crate::config::Config;
use crate::fetch::{FetchError, ResourceFetcher};
use crate::highlight::HighlightRegistry;
use crate::markdown::{self, SectionEntry};
use futures::future;

/// An assembled book: rendered introduction, concatenated chapter HTML, and
/// the ordered section index over that body.
pub struct Book {
    pub title: String,
    pub introduction: String,
    pub body: String,
    pub sections: Vec<SectionEntry>,
}

/// The ordered chapter path list: `{prefix}chapter1.md` .. `{prefix}chapterN.md`.
pub fn chapter_paths(count: u32, prefix: &str) -> Vec<String> {
    (1..=count).map(|i| format!("{prefix}chapter{i}.md")).collect()
}

/// Fetch and render the whole book.
///
/// All chapter fetches are issued concurrently and awaited as one batch;
/// rendering and concatenation then follow the request order, so the output
/// is deterministic regardless of completion order. A failed chapter renders
/// as a visible error block in its position and never blocks its siblings.
pub async fn assemble<F: ResourceFetcher>(
    fetcher: &F,
    config: &Config,
    highlights: &HighlightRegistry,
) -> Book {
    let introduction = match fetcher.fetch(&config.introduction).await {
        Ok(md) => markdown::render_plain(&md, highlights),
        Err(e) => {
            log::error!("failed to fetch {}: {e}", config.introduction);
            String::new()
        }
    };

    let paths = chapter_paths(config.chapters, &config.chapter_dir);
    let results = future::join_all(paths.iter().map(|path| fetcher.fetch(path))).await;

    let mut body = String::new();
    let mut sections = vec![];
    let mut counter = 0;
    for (path, result) in paths.iter().zip(results) {
        match result {
            Ok(md) => {
                body.push_str(&markdown::render(&md, &mut sections, &mut counter, highlights));
            }
            Err(e) => {
                log::error!("failed to fetch {path}: {e}");
                body.push_str(&error_block(path, &e));
            }
        }
    }

    Book {
        title: config.title.clone(),
        introduction,
        body,
        sections,
    }
}

/// The inline placeholder for a chapter that could not be loaded.
fn error_block(path: &str, err: &FetchError) -> String {
    format!(
        "<section class=\"chapter-error\"><p>Chapter {} could not be loaded: {}.</p></section>\n",
        escape_html(path),
        escape_html(&err.to_string()),
    )
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    /// A canned fetcher with a per-path artificial latency, for exercising
    /// out-of-order completion.
    struct FakeFetcher {
        responses: HashMap<String, (u64, Result<String, FetchError>)>,
    }

    impl FakeFetcher {
        fn new() -> Self {
            Self {
                responses: HashMap::new(),
            }
        }

        fn insert(&mut self, path: &str, delay_ms: u64, result: Result<&str, FetchError>) {
            self.responses
                .insert(path.into(), (delay_ms, result.map(String::from)));
        }
    }

    impl ResourceFetcher for FakeFetcher {
        async fn fetch(&self, path: &str) -> Result<String, FetchError> {
            let (delay_ms, result) = self
                .responses
                .get(path)
                .cloned()
                .unwrap_or((0, Err(FetchError::Status(404))));
            if delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
            result
        }
    }

    fn test_config(chapters: u32) -> Config {
        Config {
            chapters,
            ..Config::default()
        }
    }

    #[test]
    fn paths_are_ordered() {
        assert_eq!(
            chapter_paths(3, "text/"),
            &["text/chapter1.md", "text/chapter2.md", "text/chapter3.md"]
        );
    }

    #[tokio::test]
    async fn order_survives_latency_inversion() {
        let mut fetcher = FakeFetcher::new();
        fetcher.insert("README.md", 0, Ok("# Welcome"));
        // The first chapter resolves last.
        fetcher.insert("text/chapter1.md", 30, Ok("# One"));
        fetcher.insert("text/chapter2.md", 15, Ok("# Two"));
        fetcher.insert("text/chapter3.md", 0, Ok("# Three"));

        let book = assemble(&fetcher, &test_config(3), &HighlightRegistry::new()).await;

        let one = book.body.find("1-One").unwrap();
        let two = book.body.find("2-Two").unwrap();
        let three = book.body.find("3-Three").unwrap();
        assert!(one < two && two < three);
    }

    #[tokio::test]
    async fn section_ids_are_unique_across_chapters() {
        let mut fetcher = FakeFetcher::new();
        fetcher.insert("README.md", 0, Ok(""));
        fetcher.insert("text/chapter1.md", 0, Ok("# Intro"));
        fetcher.insert("text/chapter2.md", 0, Ok("# Intro"));

        let book = assemble(&fetcher, &test_config(2), &HighlightRegistry::new()).await;

        let ids: Vec<_> = book.sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, &["1-Intro", "2-Intro"]);
    }

    #[tokio::test]
    async fn failed_chapter_renders_placeholder_in_position() {
        let mut fetcher = FakeFetcher::new();
        fetcher.insert("README.md", 0, Ok(""));
        fetcher.insert("text/chapter1.md", 0, Ok("# One"));
        fetcher.insert("text/chapter2.md", 0, Err(FetchError::Status(500)));
        fetcher.insert("text/chapter3.md", 0, Ok("# Three"));

        let book = assemble(&fetcher, &test_config(3), &HighlightRegistry::new()).await;

        let one = book.body.find("1-One").unwrap();
        let gap = book.body.find("chapter-error").unwrap();
        let three = book.body.find("2-Three").unwrap();
        assert!(one < gap && gap < three);
        assert!(book.body.contains("text/chapter2.md"));
        assert!(book.body.contains("HTTP status 500"));

        // The section counter skips nothing for the missing chapter.
        let ids: Vec<_> = book.sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, &["1-One", "2-Three"]);
    }

    #[tokio::test]
    async fn failed_introduction_degrades_to_empty() {
        let mut fetcher = FakeFetcher::new();
        fetcher.insert(
            "README.md",
            0,
            Err(FetchError::Transport("connection refused".into())),
        );
        fetcher.insert("text/chapter1.md", 0, Ok("hello"));

        let book = assemble(&fetcher, &test_config(1), &HighlightRegistry::new()).await;

        assert_eq!(book.introduction, "");
        assert!(book.body.contains("hello"));
    }
}
