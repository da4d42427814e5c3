//! Field extraction
//!
//! Turns one [`LotElement`] into a [`BidRecord`]. Every field has its own
//! submodule holding an ordered list of patterns; the first pattern that
//! matches wins. Nothing in here fails on odd input: a field that can't be
//! found is `None` or a default, and only a missing lot number or title
//! rejects the whole element.
use crate::auction::{BidRecord, BidStatus, ListKind, Price};
use crate::element::LotElement;
use anyhow::Result;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, trace};

pub mod amounts;
pub mod end_time;
pub mod lot_number;
pub mod status;
pub mod title;
pub mod url;

pub use self::amounts::Amounts;

/// Shorter element texts are layout fragments, not lots.
pub const MIN_ELEMENT_TEXT: usize = 20;

pub const DEFAULT_BASE_URL: &str = "https://www.johnpyeauctions.co.uk";

/// How to fill `my_bid` when the page doesn't show it
///
/// Older scrapers disagreed here, so it stays a setting.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub enum MyBidRule {
    /// Winning: the current bid is ours. Otherwise: our max.
    #[default]
    StatusBased,
    AlwaysCurrent,
    AlwaysMax,
}

impl MyBidRule {
    pub fn resolve(self, status: BidStatus, current: Price, max: Price) -> Price {
        match self {
            MyBidRule::StatusBased if status == BidStatus::Winning => current,
            MyBidRule::StatusBased => max,
            MyBidRule::AlwaysCurrent => current,
            MyBidRule::AlwaysMax => max,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown my-bid rule {0:?} (expected status, current or max)")]
pub struct MyBidRuleParseError(String);

impl FromStr for MyBidRule {
    type Err = MyBidRuleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "status" | "status-based" => Ok(MyBidRule::StatusBased),
            "current" => Ok(MyBidRule::AlwaysCurrent),
            "max" => Ok(MyBidRule::AlwaysMax),
            _ => Err(MyBidRuleParseError(s.to_owned())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractRules {
    /// Joined onto relative lot links
    pub base_url: String,
    pub my_bid_rule: MyBidRule,
}

impl Default for ExtractRules {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            my_bid_rule: MyBidRule::default(),
        }
    }
}

/// Result of a structured lookup, with failures logged and treated as "nothing found"
pub(crate) fn or_nothing<T: Default>(what: &str, result: Result<T>) -> T {
    result.unwrap_or_else(|e| {
        debug!(lookup = what, error = %e, "structured lookup failed");
        T::default()
    })
}

/// Build a record from one page element, or `None` if it doesn't describe a lot
pub fn assemble(
    element: &dyn LotElement,
    list: ListKind,
    page_url: &str,
    rules: &ExtractRules,
) -> Option<BidRecord> {
    let text = element.text();
    if text.chars().count() < MIN_ELEMENT_TEXT {
        return None;
    }

    let Some(lot_number) = lot_number::lot_number(element, &text) else {
        trace!(%text, "no lot number");
        return None;
    };
    let Some(title) = title::title(element, &text) else {
        trace!(%lot_number, "no title");
        return None;
    };

    let amounts = amounts::amounts(element, &text);
    let status = status::status(element, &text, list, &amounts);
    let my_bid = amounts
        .my
        .unwrap_or_else(|| rules.my_bid_rule.resolve(status, amounts.current, amounts.max));

    let record = BidRecord {
        lot_number,
        title,
        current_bid: amounts.current,
        my_bid,
        my_max_bid: amounts.max,
        status,
        end_time: end_time::end_time(element, &text),
        url: url::url(element, page_url, &rules.base_url),
    };

    if record.is_valid() {
        Some(record)
    } else {
        trace!(?record, "placeholder lot number or title");
        None
    }
}
