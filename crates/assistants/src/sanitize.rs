//! Post-processing of extracted reply text.

use std::sync::OnceLock;

use regex::Regex;

/// File-search citation markers, e.g. `【4:0†source】` rendered with ASCII
/// brackets as `[4:0†source]`.
fn citation_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\[[0-9]+:[0-9]+†[^\]]+\]").expect("citation pattern is valid")
    })
}

fn whitespace_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("whitespace pattern is valid"))
}

/// Strip citation markers, then collapse whitespace runs to one space and
/// trim.
///
/// Marker removal repeats until none is left, since cutting one marker can
/// join its neighbours into another (`[1:2[3:4†a]†b]`). With that, the
/// function is idempotent.
pub fn sanitize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut stripped = text.to_owned();
    while citation_marker().is_match(&stripped) {
        stripped = citation_marker().replace_all(&stripped, "").into_owned();
    }

    whitespace_run()
        .replace_all(&stripped, " ")
        .trim()
        .to_owned()
}
