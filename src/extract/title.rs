use super::or_nothing;
use crate::auction::is_placeholder;
use crate::element::LotElement;
use regex::Regex;
use std::sync::LazyLock;

pub const TITLE_SELECTOR: &str = "h1, h2, h3, h4, .title, .item-title, .lot-title";

/// Lines starting with these are labels, not descriptions.
const LABEL_PREFIXES: [&str; 5] = ["lot", "current", "bid", "time", "status"];

const MIN_DESCRIPTION_CHARS: usize = 10;

/// "Lot 42 - Widget [ABC123]": the description sits between the dash and
/// the item code (or a colon).
static LOT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^\s*lot\s*\d+\s*[-–]\s*(.+?)\s*(?:\[|:|$)").expect("valid lot line pattern")
});

pub fn title(element: &dyn LotElement, text: &str) -> Option<String> {
    or_nothing(TITLE_SELECTOR, element.select_text(TITLE_SELECTOR))
        .iter()
        .find_map(|t| clean(t))
        .or_else(|| from_text(text))
}

pub fn from_text(text: &str) -> Option<String> {
    if let Some(title) = LOT_LINE.captures(text).and_then(|c| clean(&c[1])) {
        return Some(title);
    }

    let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();

    lines
        .iter()
        .find(|l| is_description(l))
        .or_else(|| lines.first())
        .and_then(|l| clean(l))
}

fn is_description(line: &str) -> bool {
    let lower = line.to_lowercase();
    line.chars().count() > MIN_DESCRIPTION_CHARS
        && !LABEL_PREFIXES.iter().any(|p| lower.starts_with(p))
        && !line.contains('£')
}

/// Drop a lot prefix and anything from the first `[` on.
fn clean(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let raw = LOT_LINE
        .captures(raw)
        .and_then(|c| c.get(1))
        .map_or(raw, |m| m.as_str());
    let stripped = raw.split('[').next().unwrap_or(raw).trim();

    let title = if stripped.is_empty() { raw } else { stripped };
    (!is_placeholder(title)).then(|| title.to_owned())
}
