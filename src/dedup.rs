//! Deduplication of records scraped from one page
//!
//! The same lot often shows up in more than one matching element (a table
//! row and a card inside it, say). The first occurrence wins.
use crate::auction::{BidRecord, LotKey};
use std::collections::BTreeSet;
use tracing::trace;

/// Titles the watchlist page uses for buttons and badges
const NOISE_TITLES: [&str; 7] = [
    "view item",
    "winning",
    "outbid",
    "lost",
    "won",
    "ended",
    "active",
];

/// Watchlist titles shorter than this are UI fragments.
pub const MIN_WATCHLIST_TITLE_CHARS: usize = 10;

/// Keep the first record per [`LotKey`], in first-seen order
pub fn dedup(records: impl IntoIterator<Item = BidRecord>) -> Vec<BidRecord> {
    let mut seen = BTreeSet::new();
    records
        .into_iter()
        .filter(|record| {
            let fresh = seen.insert(record.key());
            if !fresh {
                trace!(key = %record.key(), "duplicate record");
            }
            fresh
        })
        .collect()
}

/// Like [`dedup`], but also drops records titled like UI noise
pub fn dedup_watchlist(records: impl IntoIterator<Item = BidRecord>) -> Vec<BidRecord> {
    dedup(records.into_iter().filter(|record| {
        let noise = is_noise_title(&record.title);
        if noise {
            trace!(title = %record.title, "noise title on watchlist");
        }
        !noise
    }))
}

pub fn is_noise_title(title: &str) -> bool {
    let title = title.trim().to_lowercase();
    title.chars().count() < MIN_WATCHLIST_TITLE_CHARS || NOISE_TITLES.contains(&title.as_str())
}

/// Keys of `records`, for callers that only need membership
pub fn keys<'r>(records: impl IntoIterator<Item = &'r BidRecord>) -> BTreeSet<LotKey> {
    records.into_iter().map(BidRecord::key).collect()
}
