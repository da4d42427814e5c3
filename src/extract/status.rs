use super::{or_nothing, Amounts};
use crate::auction::{BidStatus, ListKind};
use crate::element::LotElement;

pub const STATUS_SELECTOR: &str = ".status, .bid-status, .winning, .outbid";

/// Checked in this order, case-insensitively.
const KEYWORDS: [(&str, BidStatus); 3] = [
    ("winning", BidStatus::Winning),
    ("outbid", BidStatus::Outbid),
    ("ended", BidStatus::Ended),
];

pub fn status(element: &dyn LotElement, text: &str, list: ListKind, amounts: &Amounts) -> BidStatus {
    or_nothing(STATUS_SELECTOR, element.select_text(STATUS_SELECTOR))
        .iter()
        .find_map(|t| from_keywords(t))
        .or_else(|| from_keywords(text))
        .unwrap_or_else(|| inferred(list, amounts))
}

pub fn from_keywords(text: &str) -> Option<BidStatus> {
    let lower = text.to_lowercase();
    KEYWORDS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, status)| *status)
}

/// Status when the page doesn't say. The watchlist carries no max bid of
/// ours, so there is nothing to compare there.
pub fn inferred(list: ListKind, amounts: &Amounts) -> BidStatus {
    match list {
        ListKind::Watchlist => BidStatus::Active,
        ListKind::ActiveBids if !amounts.found => BidStatus::Unknown,
        ListKind::ActiveBids if amounts.max >= amounts.current => BidStatus::Winning,
        ListKind::ActiveBids => BidStatus::Outbid,
    }
}
