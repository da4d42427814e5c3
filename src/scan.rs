//! Page scan: HTML in, deduplicated records out
use crate::auction::{BidRecord, ListKind};
use crate::dedup::{dedup, dedup_watchlist};
use crate::element::{parse_selector, HtmlElement, LotElement};
use crate::extract::{assemble, lot_number::distinct_lot_mentions, ExtractRules};
use crate::page::Page;
use anyhow::Result;
use scraper::Html;
use tracing::debug;

/// Candidate lot containers, most specific first. The first selector that
/// yields any record after deduplication is used for the whole page.
pub const LOT_SELECTORS: [&str; 6] = [
    "[data-lot-number]",
    ".auction-item",
    ".bidding-item",
    ".lot-details",
    "table tbody tr",
    ".row",
];

pub fn scan(page: &Page, list: ListKind, rules: &ExtractRules) -> Result<Vec<BidRecord>> {
    let html = Html::parse_document(&page.html);

    for css in LOT_SELECTORS {
        let selector = parse_selector(css)?;
        let records: Vec<BidRecord> = html
            .select(&selector)
            .map(HtmlElement::new)
            .filter(|element| {
                // Wrappers around several lots would merge their fields.
                distinct_lot_mentions(&element.text()) <= 1
            })
            .filter_map(|element| assemble(&element, list, &page.url, rules))
            .collect();

        let found = records.len();
        let records = match list {
            ListKind::ActiveBids => dedup(records),
            ListKind::Watchlist => dedup_watchlist(records),
        };
        if !records.is_empty() {
            debug!(%list, selector = css, found, kept = records.len(), "page scanned");
            return Ok(records);
        }
        if found > 0 {
            debug!(%list, selector = css, found, "only noise, trying next selector");
        }
    }

    debug!(%list, "no lots on page");
    Ok(vec![])
}
