//! Notifications
//!
//! [`Notification`] is what the monitor hands out: a severity, a template
//! key, the record it's about and a few extra named values. How it gets to
//! a person is up to the [`Notifier`].
use crate::auction::{BidRecord, BidStatus, ListKind, Price};
use crate::event::{Change, ChangeEvent};
use anyhow::Result;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

mod command;
mod log;

pub use self::{command::*, log::*};

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Urgent,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Info => "info",
            Severity::Urgent => "urgent",
        })
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Template {
    NewItem,
    BidIncrease,
    Outbid,
    Winning,
    StatusChange,
    AuctionEnded,
    EndingSoon,
    ItemRemoved,
    MonitoringStarted,
    MonitoringStopped,
    Error,
}

impl Template {
    pub fn as_str(self) -> &'static str {
        match self {
            Template::NewItem => "new_item",
            Template::BidIncrease => "bid_increase",
            Template::Outbid => "outbid",
            Template::Winning => "winning",
            Template::StatusChange => "status_change",
            Template::AuctionEnded => "auction_ended",
            Template::EndingSoon => "ending_soon",
            Template::ItemRemoved => "item_removed",
            Template::MonitoringStarted => "monitoring_started",
            Template::MonitoringStopped => "monitoring_stopped",
            Template::Error => "error",
        }
    }

    fn headline(self) -> &'static str {
        match self {
            Template::NewItem => "NEW ITEM!",
            Template::BidIncrease => "BID INCREASE ALERT!",
            Template::Outbid => "OUTBID ALERT!",
            Template::Winning => "NOW WINNING!",
            Template::StatusChange => "STATUS CHANGED!",
            Template::AuctionEnded => "AUCTION ENDED!",
            Template::EndingSoon => "AUCTION ENDING SOON!",
            Template::ItemRemoved => "ITEM REMOVED!",
            Template::MonitoringStarted => "MONITORING STARTED!",
            Template::MonitoringStopped => "MONITORING STOPPED!",
            Template::Error => "ERROR ALERT!",
        }
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub template: Template,
    pub record: Option<BidRecord>,
    pub context: BTreeMap<&'static str, String>,
}

impl Notification {
    pub fn new(severity: Severity, template: Template) -> Self {
        Self {
            severity,
            template,
            record: None,
            context: BTreeMap::new(),
        }
    }

    pub fn with_record(mut self, record: BidRecord) -> Self {
        self.record = Some(record);
        self
    }

    pub fn with(mut self, key: &'static str, value: impl ToString) -> Self {
        self.context.insert(key, value.to_string());
        self
    }

    pub fn for_change(list: ListKind, event: &ChangeEvent) -> Self {
        let (severity, template) = match &event.change {
            Change::NewItem => (Severity::Info, Template::NewItem),
            Change::StatusChange { to, .. } => match to {
                BidStatus::Outbid => (Severity::Urgent, Template::Outbid),
                BidStatus::Winning => (Severity::Info, Template::Winning),
                BidStatus::Ended => (Severity::Info, Template::AuctionEnded),
                _ => (Severity::Info, Template::StatusChange),
            },
            Change::BidIncrease { .. } => (Severity::Info, Template::BidIncrease),
            Change::EndingSoon { .. } => (Severity::Urgent, Template::EndingSoon),
            Change::Removed => (Severity::Info, Template::ItemRemoved),
        };

        let notification = Self::new(severity, template)
            .with_record(event.record.clone())
            .with("list", list);

        match &event.change {
            Change::StatusChange { from, to } => notification.with("from", from).with("to", to),
            Change::BidIncrease {
                previous,
                current,
                delta,
            } => notification
                .with("previous_bid", previous)
                .with("current_bid", current)
                .with("increase", delta),
            Change::EndingSoon { minutes_left } => {
                notification.with("minutes_left", minutes_left)
            }
            Change::NewItem | Change::Removed => notification,
        }
    }

    pub fn monitoring_started(interval_secs: u64) -> Self {
        Self::new(Severity::Info, Template::MonitoringStarted)
            .with("check_interval", format!("{interval_secs}s"))
    }

    pub fn monitoring_stopped(reason: &str) -> Self {
        Self::new(Severity::Info, Template::MonitoringStopped).with("reason", reason)
    }

    pub fn error(error: &anyhow::Error, context: &str) -> Self {
        Self::new(Severity::Urgent, Template::Error)
            .with("error", format!("{error:#}"))
            .with("context", context)
    }

    /// Message text for a human: headline, record lines, then context
    pub fn render(&self) -> String {
        let mut lines = vec![self.template.headline().to_owned()];

        if let Some(record) = &self.record {
            lines.push(format!("Item: {}", record.title));
            lines.push(format!("Lot: {}", record.lot_number));
            if !self.context.contains_key("current_bid") {
                lines.push(format!("Current Bid: {}", record.current_bid));
            }
            if record.my_max_bid != Price::ZERO {
                lines.push(format!("Your Max: {}", record.my_max_bid));
            }
            lines.push(format!("Status: {}", record.status));
            lines.push(format!("End Time: {}", record.end_time));
        }

        lines.extend(
            self.context
                .iter()
                .map(|(key, value)| format!("{}: {value}", label(key))),
        );

        if let Some(record) = &self.record {
            lines.push(format!("URL: {}", record.url));
        }

        lines.join("\n")
    }
}

/// `previous_bid` -> `Previous Bid`
fn label(key: &str) -> String {
    key.split('_')
        .map(|word| {
            let mut chars = word.chars();
            chars
                .next()
                .map(|first| first.to_uppercase().chain(chars).collect::<String>())
                .unwrap_or_default()
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Delivers notifications somewhere a person will see them
pub trait Notifier {
    fn notify(&self, notification: &Notification) -> Result<()>;
}

pub type SharedNotifier = Arc<dyn Notifier + Send + Sync + 'static>;

/// Sends every notification to each notifier in turn
///
/// All notifiers are tried; the first failure is returned.
pub struct Notifiers(Vec<SharedNotifier>);

impl Notifiers {
    pub fn new(notifiers: Vec<SharedNotifier>) -> Self {
        Self(notifiers)
    }

    pub fn new_shared(notifiers: Vec<SharedNotifier>) -> SharedNotifier {
        Arc::new(Self::new(notifiers))
    }
}

impl Notifier for Notifiers {
    fn notify(&self, notification: &Notification) -> Result<()> {
        let mut first_err = None;
        for notifier in &self.0 {
            if let Err(e) = notifier.notify(notification) {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}
