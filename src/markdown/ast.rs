//! Event-list AST with addressable link nodes.

use pulldown_cmark::{CowStr, Event, HeadingLevel, LinkType as MdLinkType, Tag, TagEnd};

/// One link or image found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkNode {
    /// Index of the `Event::Start` carrying the destination.
    index: usize,
    /// Destination as written (reference links already resolved).
    pub url: String,
    pub is_image: bool,
    /// Visible text, or alt text for images.
    pub text: String,
}

/// Parsed markdown: the event stream plus an index of its link nodes.
#[derive(Debug, Clone, Default)]
pub struct MarkdownAst {
    events: Vec<Event<'static>>,
    links: Vec<LinkNode>,
}

impl MarkdownAst {
    pub(super) fn from_events<'a>(events: impl IntoIterator<Item = Event<'a>>) -> Self {
        let events: Vec<Event<'static>> = events.into_iter().map(Event::into_static).collect();
        let mut links = Vec::new();
        // indices into `links` of the currently open link/image tags
        let mut open: Vec<usize> = Vec::new();

        for (index, event) in events.iter().enumerate() {
            match event {
                Event::Start(Tag::Link {
                    link_type,
                    dest_url,
                    ..
                }) => {
                    if *link_type == MdLinkType::Email {
                        continue;
                    }
                    open.push(links.len());
                    links.push(LinkNode {
                        index,
                        url: dest_url.to_string(),
                        is_image: false,
                        text: String::new(),
                    });
                }
                Event::Start(Tag::Image { dest_url, .. }) => {
                    open.push(links.len());
                    links.push(LinkNode {
                        index,
                        url: dest_url.to_string(),
                        is_image: true,
                        text: String::new(),
                    });
                }
                Event::End(TagEnd::Link) => {
                    // email autolinks never pushed an entry
                    if open.last().is_some_and(|&i| !links[i].is_image) {
                        open.pop();
                    }
                }
                Event::End(TagEnd::Image) => {
                    open.pop();
                }
                Event::Text(text) | Event::Code(text) => {
                    for &i in &open {
                        links[i].text.push_str(text);
                    }
                }
                _ => {}
            }
        }

        Self { events, links }
    }

    pub fn links(&self) -> &[LinkNode] {
        &self.links
    }

    /// Replace the destination of link `link`.
    ///
    /// Out-of-range indices are ignored.
    pub fn set_url(&mut self, link: usize, url: &str) {
        let Some(node) = self.links.get_mut(link) else {
            return;
        };
        node.url = url.to_string();
        match &mut self.events[node.index] {
            Event::Start(Tag::Link { dest_url, .. })
            | Event::Start(Tag::Image { dest_url, .. }) => {
                *dest_url = CowStr::from(url.to_string());
            }
            _ => {}
        }
    }

    /// Text of the first level-1 heading.
    pub fn title(&self) -> Option<String> {
        let start = self.events.iter().position(|e| {
            matches!(
                e,
                Event::Start(Tag::Heading {
                    level: HeadingLevel::H1,
                    ..
                })
            )
        })?;
        let title: String = self.events[start + 1..]
            .iter()
            .take_while(|e| !matches!(e, Event::End(TagEnd::Heading(_))))
            .filter_map(|e| match e {
                Event::Text(t) | Event::Code(t) => Some(t.as_ref()),
                _ => None,
            })
            .collect();
        let title = title.trim();
        (!title.is_empty()).then(|| title.to_string())
    }

    pub(super) fn events(&self) -> &[Event<'static>] {
        &self.events
    }
}
