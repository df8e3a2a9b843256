use regex::Regex;
use scraper::Html;
use std::sync::OnceLock;

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"</?[A-Za-z][^>]*>").expect("tag pattern"))
}

fn has_elements(doc: &Html) -> bool {
    doc.root_element()
        .descendants()
        .skip(1)
        .any(|n| n.value().is_element())
}

fn visible_text(doc: &Html) -> String {
    doc.root_element()
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .replace('\u{a0}', " ")
}

/// Strips markup to visible text, one space between text runs.
///
/// Input without any tag is returned untouched, entities included.
pub fn html_to_text(input: &str) -> String {
    let fragment = Html::parse_fragment(input);
    if has_elements(&fragment) {
        return visible_text(&fragment);
    }

    if !tag_re().is_match(input) {
        return input.to_string();
    }

    // Body-context parsing drops table-section and document-level tags
    // (`<td>`, `<tr>`, `<html>`, `<body>`...). Inside a table they survive.
    let wrapped = Html::parse_fragment(&format!("<table>{input}</table>"));
    visible_text(&wrapped)
}
