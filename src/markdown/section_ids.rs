use pulldown_cmark::{CowStr, Event, Tag, TagEnd};
use std::collections::VecDeque;

/// A pulldown-cmark adapter that gives every heading a generated section id:
/// a strictly increasing counter, a dash, and the heading's text content.
/// The counter prefix keeps ids unique even when heading text repeats.
///
/// The counter is borrowed from the caller and holds the last value handed
/// out, so a single sequence can run across several documents. Authored
/// `{#id}` attributes are overwritten; section ids are always generated.
pub struct AssignSectionIds<'a, 'b, I>
where
    I: Iterator<Item = Event<'a>>,
{
    iter: I,
    counter: &'b mut u32,
    buffer: VecDeque<Event<'a>>,
}

impl<'a, 'b, I> AssignSectionIds<'a, 'b, I>
where
    I: Iterator<Item = Event<'a>>,
{
    pub fn new(iter: I, counter: &'b mut u32) -> Self {
        Self {
            iter,
            counter,
            buffer: VecDeque::new(),
        }
    }

    /// Assuming that `self` is now just after the beginning of a heading,
    /// buffer up all the events until the heading ends. Return the heading's
    /// concatenated text content.
    fn consume_heading(&mut self) -> String {
        assert!(self.buffer.is_empty(), "nested headings are not allowed");
        let mut label = String::new();

        for future_event in self.iter.by_ref() {
            let is_end = match &future_event {
                Event::End(TagEnd::Heading(_)) => true,
                Event::Text(text) => {
                    label.push_str(text);
                    false
                }
                Event::Code(code) => {
                    label.push_str(code);
                    false
                }
                _ => false,
            };
            self.buffer.push_back(future_event);
            if is_end {
                break;
            }
        }

        label
    }
}

impl<'a, 'b, I> Iterator for AssignSectionIds<'a, 'b, I>
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
            Event::Start(Tag::Heading {
                level,
                id: _,
                classes,
                attrs,
            }) => {
                let label = self.consume_heading();
                *self.counter += 1;
                let id = format!("{}-{}", self.counter, label);
                Some(Event::Start(Tag::Heading {
                    level,
                    id: Some(CowStr::from(id)),
                    classes,
                    attrs,
                }))
            }
            _ => Some(event),
        }
    }
}
