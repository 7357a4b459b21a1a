use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use pulldown_cmark::{Event, HeadingLevel, Tag, TagEnd};

/// Characters that must be percent-encoded inside a fragment link.
const FRAGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'#')
    .add(b'%');

/// One navigable table-of-contents row for one heading.
#[derive(Debug, PartialEq, Eq)]
pub struct SectionEntry {
    pub level: HeadingLevel,
    pub id: String,
    pub title: String,
}

impl SectionEntry {
    /// The percent-encoded jump target for this section, without the `#`.
    pub fn href(&self) -> String {
        utf8_percent_encode(&self.id, FRAGMENT).to_string()
    }

    /// The indentation class for this entry: rank 1 is least indented,
    /// rank 6 is most indented.
    pub fn indent_class(&self) -> &'static str {
        match self.level {
            HeadingLevel::H1 => "indent-h1",
            HeadingLevel::H2 => "indent-h2",
            HeadingLevel::H3 => "indent-h3",
            HeadingLevel::H4 => "indent-h4",
            HeadingLevel::H5 => "indent-h5",
            HeadingLevel::H6 => "indent-h6",
        }
    }
}

/// A pulldown-cmark adapter that extracts a table of contents from a Markdown
/// document, i.e., a list of all the headings. When this iterator runs, it
/// pushes the TOC entries into a vector that you supply. It expects to run
/// downstream of `AssignSectionIds`, so every heading already carries an id.
pub struct TableOfContents<'a, 'b, I>
where
    I: Iterator<Item = Event<'a>>,
{
    iter: I,
    pub entries: &'b mut Vec<SectionEntry>,
    in_heading: bool,
}

impl<'a, 'b, I> TableOfContents<'a, 'b, I>
where
    I: Iterator<Item = Event<'a>>,
{
    pub fn new(iter: I, entries: &'b mut Vec<SectionEntry>) -> Self {
        Self {
            iter,
            entries,
            in_heading: false,
        }
    }
}

impl<'a, 'b, I> Iterator for TableOfContents<'a, 'b, I>
where
    I: Iterator<Item = Event<'a>>,
{
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let event = self.iter.next()?;
        match &event {
            Event::Start(Tag::Heading {
                level,
                id,
                classes: _,
                attrs: _,
            }) => {
                // Start building a new TOC entry for this heading.
                self.entries.push(SectionEntry {
                    level: *level,
                    id: id.as_ref().map(|s| s.to_string()).unwrap_or_default(),
                    title: String::new(),
                });
                self.in_heading = true;
            }
            Event::End(TagEnd::Heading(_)) => {
                // Finish a TOC entry.
                assert!(self.in_heading, "heading ended without starting");
                self.in_heading = false;
            }
            Event::Text(text) => {
                if self.in_heading {
                    let entry = self.entries.last_mut().expect("no entry for heading");
                    entry.title += text;
                }
            }
            Event::Code(code) => {
                if self.in_heading {
                    let entry = self.entries.last_mut().expect("no entry for heading");
                    entry.title += code;
                }
            }
            _ => (),
        }
        Some(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulldown_cmark::{Options, Parser};

    fn get_toc(source: &str) -> Vec<SectionEntry> {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_HEADING_ATTRIBUTES);
        let parser = Parser::new_ext(source, options);
        let mut entries = vec![];
        let mut toc = TableOfContents::new(parser, &mut entries);
        toc.by_ref().for_each(|_| {}); // Just consume the whole iterator.
        entries
    }

    #[test]
    fn no_headings() {
        assert_eq!(get_toc("hi"), &[]);
    }

    #[test]
    fn one_entry_per_heading() {
        let entries = get_toc("# a\n\ntext\n\n## b\n\nmore\n\n# c");
        let titles: Vec<_> = entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, &["a", "b", "c"]);
    }

    #[test]
    fn entry_with_id() {
        assert_eq!(
            get_toc("# hi {#x}"),
            &[SectionEntry {
                level: HeadingLevel::H1,
                id: "x".to_string(),
                title: "hi".to_string(),
            }]
        );
    }

    #[test]
    fn indent_classes_follow_rank() {
        let entries = get_toc("# a\n###### b");
        assert_eq!(entries[0].indent_class(), "indent-h1");
        assert_eq!(entries[1].indent_class(), "indent-h6");
    }

    #[test]
    fn href_is_percent_encoded() {
        let entry = SectionEntry {
            level: HeadingLevel::H1,
            id: "3-Getting Started".to_string(),
            title: "Getting Started".to_string(),
        };
        assert_eq!(entry.href(), "3-Getting%20Started");
    }
}
