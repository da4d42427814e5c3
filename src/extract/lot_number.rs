use super::or_nothing;
use crate::auction::LotNumber;
use crate::element::LotElement;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

pub const LOT_ATTRIBUTE: &str = "data-lot-number";

/// Tried in order; capture group 1 is the lot number.
static PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // "Lot 123 - ...", "LOT 123"
        r"(?i)\blot\s*(\d+)",
        // "#123"
        r"#(\d+)",
        // item codes: "[JPTC85291]"
        r"(?i)\[([A-Z0-9]+)\]",
        // bare lot ids
        r"(\d{5,})",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid lot number pattern"))
    .collect()
});

pub fn lot_number(element: &dyn LotElement, text: &str) -> Option<LotNumber> {
    or_nothing(LOT_ATTRIBUTE, element.attr(LOT_ATTRIBUTE))
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .or_else(|| from_text(text))
}

pub fn from_text(text: &str) -> Option<LotNumber> {
    PATTERNS
        .iter()
        .find_map(|re| re.captures(text))
        .map(|c| c[1].to_owned())
}

/// How many different `Lot N` numbers the text mentions
pub fn distinct_lot_mentions(text: &str) -> usize {
    PATTERNS[0]
        .captures_iter(text)
        .map(|c| c[1].to_owned())
        .collect::<BTreeSet<_>>()
        .len()
}
