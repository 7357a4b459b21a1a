use crate::highlight::HighlightRegistry;
use pulldown_cmark::{CodeBlockKind, CowStr, Event, Tag, TagEnd};
use std::collections::VecDeque;

/// A pulldown-cmark adapter that replaces fenced code blocks with
/// syntax-highlighted markup when the block's language tag is registered in
/// the highlighting registry. Unregistered tags (and indented blocks, which
/// carry no tag) pass through untouched, so the renderer's default escaping
/// applies.
pub struct HighlightCodeBlocks<'a, 'r, I>
where
    I: Iterator<Item = Event<'a>>,
{
    iter: I,
    registry: &'r HighlightRegistry,
    buffer: VecDeque<Event<'a>>,
}

impl<'a, 'r, I> HighlightCodeBlocks<'a, 'r, I>
where
    I: Iterator<Item = Event<'a>>,
{
    pub fn new(iter: I, registry: &'r HighlightRegistry) -> Self {
        Self {
            iter,
            registry,
            buffer: VecDeque::new(),
        }
    }
}

impl<'a, 'r, I> Iterator for HighlightCodeBlocks<'a, 'r, I>
where
    I: Iterator<Item = Event<'a>>,
{
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        // Unbuffer the next buffered event, if any.
        if let Some(event) = self.buffer.pop_front() {
            return Some(event);
        }

        let event = self.iter.next()?;
        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(lang))) => {
                // Buffer the whole block so we can replay it unchanged when
                // highlighting declines.
                assert!(self.buffer.is_empty(), "nested code blocks are not allowed");
                let mut code = String::new();
                self.buffer
                    .push_back(Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(
                        lang.clone(),
                    ))));
                for future_event in self.iter.by_ref() {
                    let is_end = matches!(&future_event, Event::End(TagEnd::CodeBlock));
                    if let Event::Text(text) = &future_event {
                        code.push_str(text);
                    }
                    self.buffer.push_back(future_event);
                    if is_end {
                        break;
                    }
                }

                match self.registry.highlight(&lang, &code) {
                    Some(markup) => {
                        self.buffer.clear();
                        let html =
                            format!("<pre><code class=\"language-{lang}\">{markup}</code></pre>\n");
                        Some(Event::Html(CowStr::from(html)))
                    }
                    // Replay the buffered block for default escaping.
                    None => self.buffer.pop_front(),
                }
            }
            _ => Some(event),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulldown_cmark::{Parser, html};

    fn render_code(source: &str, registry: &HighlightRegistry) -> String {
        let parser = Parser::new(source);
        let mut buf = String::new();
        html::push_html(&mut buf, HighlightCodeBlocks::new(parser, registry));
        buf
    }

    #[test]
    fn unregistered_tag_stays_plain() {
        let registry = HighlightRegistry::new();
        let html = render_code("```cobol\nDISPLAY <thing>.\n```", &registry);
        assert!(html.contains("language-cobol"));
        assert!(html.contains("DISPLAY &lt;thing&gt;."));
        assert!(!html.contains("<span"));
    }

    #[test]
    fn untagged_block_stays_plain() {
        let mut registry = HighlightRegistry::new();
        registry.register("javascript");
        let html = render_code("```\nvar x = 1;\n```", &registry);
        assert_eq!(html, "<pre><code>var x = 1;\n</code></pre>\n");
    }

    #[test]
    fn registered_tag_is_highlighted() {
        let mut registry = HighlightRegistry::new();
        registry.register("javascript");
        let html = render_code("```javascript\nvar x = 1;\n```", &registry);
        assert!(html.contains("language-javascript"));
        assert!(html.contains("<span"));
    }

    #[test]
    fn surrounding_text_is_untouched() {
        let registry = HighlightRegistry::new();
        let html = render_code("before\n\n```cobol\nX.\n```\n\nafter", &registry);
        assert!(html.starts_with("<p>before</p>"));
        assert!(html.trim_end().ends_with("<p>after</p>"));
    }
}
