//! Word counting over eCFR XML documents.
//!
//! Counts whitespace-separated tokens in every paragraph and heading element.
//! An element's text is all of its descendant text concatenated, so inline
//! children such as `<I>` or `<E>` count toward the enclosing paragraph.
//! Nested content elements each contribute their own count.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::CounterError;

/// Local element names whose text is counted, compared case-insensitively.
pub const CONTENT_TAGS: [&str; 7] = ["p", "h1", "h2", "h3", "h4", "h5", "h6"];

fn is_content_tag(name: &[u8]) -> bool {
    CONTENT_TAGS
        .iter()
        .any(|tag| name.eq_ignore_ascii_case(tag.as_bytes()))
}

/// Number of whitespace-separated tokens in `text`.
pub fn count_words(text: &str) -> u64 {
    text.split_whitespace().count() as u64
}

/// Sums [`count_words`] over the text of every content element in `xml`.
///
/// Fails when the document is not well-formed or has no root element.
pub fn count_content_words(xml: &str) -> Result<u64, CounterError> {
    let mut reader = Reader::from_str(xml);

    // One entry per open element: whether it is a content element.
    let mut open_elements: Vec<bool> = Vec::new();
    // Text gathered so far for each open content element, outermost first.
    let mut buffers: Vec<String> = Vec::new();
    let mut saw_root = false;
    let mut total = 0u64;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                saw_root = true;
                let content = is_content_tag(e.local_name().as_ref());
                if content {
                    buffers.push(String::new());
                }
                open_elements.push(content);
            }
            Event::End(_) => {
                if open_elements.pop() == Some(true) {
                    if let Some(text) = buffers.pop() {
                        total += count_words(&text);
                    }
                }
            }
            Event::Empty(_) => saw_root = true,
            Event::Text(e) if !buffers.is_empty() => {
                let text = e.unescape()?;
                for buf in buffers.iter_mut() {
                    buf.push_str(&text);
                }
            }
            Event::CData(e) if !buffers.is_empty() => {
                let raw = e.into_inner();
                let text = String::from_utf8_lossy(&raw);
                for buf in buffers.iter_mut() {
                    buf.push_str(&text);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_root {
        return Err(CounterError::Xml("document has no root element".to_string()));
    }
    if !open_elements.is_empty() {
        return Err(CounterError::Xml(format!(
            "document ended with {} unclosed element(s)",
            open_elements.len()
        )));
    }
    Ok(total)
}
