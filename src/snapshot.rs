//! Snapshots and change detection
//!
//! A [`Snapshot`] is the last known state of every lot on one list. Each
//! cycle [`detect`] compares freshly scraped records against it and hands
//! back the snapshot to keep for next time, together with what changed.
//! The detector owns no state of its own; whoever runs the cycles keeps
//! the snapshot between calls.
use crate::auction::{BidRecord, BidStatus, LotKey, Price};
use crate::dedup;
use crate::event::{Change, ChangeEvent};
use crate::extract::end_time::remaining_minutes;
use std::collections::BTreeMap;

pub const DEFAULT_BID_INCREASE_THRESHOLD: Price = Price::from_pounds(10);
pub const DEFAULT_ENDING_SOON_MINUTES: u32 = 60;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DetectionRules {
    /// Smaller increases of the current bid go unreported
    pub bid_increase_threshold: Price,
    pub ending_soon_minutes: u32,
}

impl Default for DetectionRules {
    fn default() -> Self {
        Self {
            bid_increase_threshold: DEFAULT_BID_INCREASE_THRESHOLD,
            ending_soon_minutes: DEFAULT_ENDING_SOON_MINUTES,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Snapshot(BTreeMap<LotKey, BidRecord>);

impl Snapshot {
    pub fn get(&self, key: &LotKey) -> Option<&BidRecord> {
        self.0.get(key)
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Records in key order
    pub fn records(&self) -> impl Iterator<Item = &BidRecord> {
        self.0.values()
    }
}

impl FromIterator<BidRecord> for Snapshot {
    /// The first record per key is kept, same as [`dedup::dedup`].
    fn from_iter<I: IntoIterator<Item = BidRecord>>(iter: I) -> Self {
        let mut map = BTreeMap::new();
        for record in iter {
            map.entry(record.key()).or_insert(record);
        }
        Self(map)
    }
}

/// Compare `current` against `previous`
///
/// Events for current records come first, in input order, then removals
/// in key order. One lot can produce several events in the same call.
pub fn detect(
    previous: &Snapshot,
    current: &[BidRecord],
    rules: &DetectionRules,
) -> (Snapshot, Vec<ChangeEvent>) {
    let mut events = vec![];

    for record in current {
        match previous.get(&record.key()) {
            None => {
                events.push(ChangeEvent::new(record, Change::NewItem));
                if let Some(minutes_left) = ending_soon(None, record, rules) {
                    events.push(ChangeEvent::new(record, Change::EndingSoon { minutes_left }));
                }
            }
            Some(before) => events.extend(
                changes(before, record, rules)
                    .into_iter()
                    .map(|change| ChangeEvent::new(record, change)),
            ),
        }
    }

    let current_keys = dedup::keys(current);
    events.extend(
        previous
            .records()
            .filter(|before| !current_keys.contains(&before.key()))
            .map(|before| ChangeEvent::new(before, Change::Removed)),
    );

    (current.iter().cloned().collect(), events)
}

fn changes(before: &BidRecord, now: &BidRecord, rules: &DetectionRules) -> Vec<Change> {
    let mut changes = vec![];

    if before.status != now.status {
        changes.push(Change::StatusChange {
            from: before.status,
            to: now.status,
        });
    }

    let delta = now.current_bid.saturating_sub(before.current_bid);
    if !delta.is_zero() && rules.bid_increase_threshold <= delta {
        changes.push(Change::BidIncrease {
            previous: before.current_bid,
            current: now.current_bid,
            delta,
        });
    }

    if let Some(minutes_left) = ending_soon(Some(before), now, rules) {
        changes.push(Change::EndingSoon { minutes_left });
    }

    changes
}

/// Minutes left, if `now` just crossed into the ending-soon window
fn ending_soon(before: Option<&BidRecord>, now: &BidRecord, rules: &DetectionRules) -> Option<u32> {
    if now.status == BidStatus::Ended {
        return None;
    }
    let minutes_left = remaining_minutes(&now.end_time)?;
    if rules.ending_soon_minutes < minutes_left {
        return None;
    }
    let was_outside = before
        .and_then(|b| remaining_minutes(&b.end_time))
        .map_or(true, |m| rules.ending_soon_minutes < m);
    was_outside.then_some(minutes_left)
}
