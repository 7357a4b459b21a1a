mod codeblocks;
mod section_ids;
mod toc;

pub use toc::SectionEntry;

use crate::highlight::HighlightRegistry;
use pulldown_cmark::{Options, Parser, html::push_html};

fn parse_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_HEADING_ATTRIBUTES);
    options.insert(Options::ENABLE_SMART_PUNCTUATION);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options
}

/// Render one chapter's Markdown to HTML.
///
/// Every heading gets a generated section id and a corresponding entry in
/// `sections`. The id counter is borrowed from the caller so that one
/// strictly increasing sequence spans all chapters of a book.
pub fn render(
    source: &str,
    sections: &mut Vec<SectionEntry>,
    counter: &mut u32,
    highlights: &HighlightRegistry,
) -> String {
    let mut html_buf = String::new();

    let iter = Parser::new_ext(source, parse_options());
    let iter = codeblocks::HighlightCodeBlocks::new(iter, highlights);
    let iter = section_ids::AssignSectionIds::new(iter, counter);
    let iter = toc::TableOfContents::new(iter, sections);

    push_html(&mut html_buf, iter);
    html_buf
}

/// Render Markdown without section indexing. Used for the introduction,
/// whose headings never appear in the table of contents.
pub fn render_plain(source: &str, highlights: &HighlightRegistry) -> String {
    let mut html_buf = String::new();

    let iter = Parser::new_ext(source, parse_options());
    let iter = codeblocks::HighlightCodeBlocks::new(iter, highlights);

    push_html(&mut html_buf, iter);
    html_buf
}
