use crate::auction::*;

/// Something that changed about one lot between two scrapes
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChangeEvent {
    pub key: LotKey,
    /// Latest observation; for [`Change::Removed`] the last one seen
    pub record: BidRecord,
    pub change: Change,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Change {
    /// First time this key was seen
    NewItem,
    StatusChange {
        from: BidStatus,
        to: BidStatus,
    },
    BidIncrease {
        previous: Price,
        current: Price,
        delta: Price,
    },
    /// Remaining time dropped to or below the warning threshold
    EndingSoon { minutes_left: u32 },
    /// No longer on the page
    Removed,
}

impl ChangeEvent {
    pub fn new(record: &BidRecord, change: Change) -> Self {
        Self {
            key: record.key(),
            record: record.clone(),
            change,
        }
    }
}
