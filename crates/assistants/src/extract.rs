//! Reply extraction from a thread's message list.
//!
//! The service has emitted more than one content-item schema over time,
//! so every item is classified into [`ContentItem`] and the first usable
//! one wins. Shapes that match nothing degrade to [`NO_REPLY`] instead of
//! failing the request.

use serde_json::Value;

/// Returned whenever no text can be found in the newest message.
pub const NO_REPLY: &str = "(no reply)";

/// Type tags under which the service emits assistant-generated text.
const TEXT_TAGS: &[&str] = &["text", "output_text"];

/// The only tag under which a bare-string `text` is accepted.
const PLAIN_TEXT_TAG: &str = "text";

/// One entry of a message's `content` array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentItem<'a> {
    /// `{ "type": "text" | "output_text", "text": { "value": "..." } }`
    GeneratedText(&'a str),
    /// `{ "type": "text", "text": "..." }`
    PlainText(&'a str),
    /// Any other item carrying `text.value`.
    Annotated(&'a str),
    Unrecognized,
}

impl<'a> ContentItem<'a> {
    pub fn classify(item: &'a Value) -> Self {
        let tag = item.get("type").and_then(Value::as_str);
        let is_text_tag = tag.is_some_and(|t| TEXT_TAGS.contains(&t));
        let is_plain_tag = tag == Some(PLAIN_TEXT_TAG);

        let text = item.get("text");
        let value = text
            .and_then(|t| t.get("value"))
            .and_then(Value::as_str)
            .filter(|v| !v.is_empty());
        let bare = text.and_then(Value::as_str).filter(|v| !v.is_empty());

        match (is_text_tag, value, bare) {
            (true, Some(v), _) => ContentItem::GeneratedText(v),
            (true, None, Some(s)) if is_plain_tag => ContentItem::PlainText(s),
            (false, Some(v), _) => ContentItem::Annotated(v),
            _ => ContentItem::Unrecognized,
        }
    }

    pub fn text(&self) -> Option<&'a str> {
        match *self {
            ContentItem::GeneratedText(s)
            | ContentItem::PlainText(s)
            | ContentItem::Annotated(s) => Some(s),
            ContentItem::Unrecognized => None,
        }
    }
}

/// Pull the reply text out of a message-list payload.
///
/// Only `data[0]` (the newest message) is consulted. Never returns an
/// empty string.
pub fn extract_reply(payload: Option<&Value>) -> String {
    newest_message_text(payload)
        .map(str::to_owned)
        .unwrap_or_else(|| NO_REPLY.to_owned())
}

fn newest_message_text(payload: Option<&Value>) -> Option<&str> {
    let newest = payload?.get("data")?.as_array()?.first()?;
    let content = newest.get("content")?.as_array()?;
    content
        .iter()
        .find_map(|item| ContentItem::classify(item).text())
}
