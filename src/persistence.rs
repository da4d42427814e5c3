//! Status snapshot for the dashboard
//!
//! Every cycle the monitor writes the whole picture (both lists plus a
//! summary) through a [`StatusWriter`]. There is no history: each write
//! replaces the previous one.
#[cfg(test)]
mod in_memory;
mod json_file;

#[cfg(test)]
pub use self::in_memory::*;
pub use self::json_file::*;

use crate::auction::{BidRecord, BidStatus, Price};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusFile {
    pub timestamp: DateTime<Utc>,
    pub is_running: bool,
    pub start_time: Option<DateTime<Utc>>,
    pub active_bids_count: usize,
    pub watchlist_count: usize,
    pub active_bids: Vec<BidRecord>,
    pub watchlist_items: Vec<BidRecord>,
    pub summary: Summary,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total_active_bids: usize,
    pub winning_bids: usize,
    pub outbid_bids: usize,
    pub total_watchlist: usize,
    /// Sum of current bids over active bids
    pub total_value_current: Price,
    /// Sum of our max bids over active bids
    pub total_value_max: Price,
}

impl Summary {
    pub fn new(active_bids: &[BidRecord], watchlist_items: &[BidRecord]) -> Self {
        let count = |status| active_bids.iter().filter(|r| r.status == status).count();
        Self {
            total_active_bids: active_bids.len(),
            winning_bids: count(BidStatus::Winning),
            outbid_bids: count(BidStatus::Outbid),
            total_watchlist: watchlist_items.len(),
            total_value_current: active_bids.iter().map(|r| r.current_bid).sum(),
            total_value_max: active_bids.iter().map(|r| r.my_max_bid).sum(),
        }
    }
}

impl StatusFile {
    pub fn new(
        timestamp: DateTime<Utc>,
        is_running: bool,
        start_time: Option<DateTime<Utc>>,
        active_bids: Vec<BidRecord>,
        watchlist_items: Vec<BidRecord>,
    ) -> Self {
        Self {
            timestamp,
            is_running,
            start_time,
            active_bids_count: active_bids.len(),
            watchlist_count: watchlist_items.len(),
            summary: Summary::new(&active_bids, &watchlist_items),
            active_bids,
            watchlist_items,
        }
    }
}

/// Where status snapshots go
pub trait StatusWriter {
    fn write(&self, status: &StatusFile) -> Result<()>;
}

pub type SharedStatusWriter = Arc<dyn StatusWriter + Send + Sync + 'static>;
