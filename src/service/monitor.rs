//! Monitor
//!
//! One cycle: fetch each list page, scan it into records, compare against
//! the list's snapshot, send a notification per change, and write the
//! status file. Nothing that goes wrong inside a cycle stops the loop; it
//! is logged, reported through the notifier where it matters, and the next
//! cycle tries again.
use super::{LoopService, StopSignal};
use crate::auction::{BidRecord, ListKind};
use crate::event::{Change, ChangeEvent};
use crate::extract::ExtractRules;
use crate::notify::{Notification, SharedNotifier};
use crate::page::SharedPageSource;
use crate::persistence::{SharedStatusWriter, StatusFile};
use crate::scan::scan;
use crate::snapshot::{detect, DetectionRules, Snapshot};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// What one cycle saw
#[derive(Debug, Default)]
pub struct CycleReport {
    pub events: Vec<(ListKind, ChangeEvent)>,
    /// Lists whose page couldn't be fetched or scanned
    pub failed: Vec<ListKind>,
}

#[derive(Default)]
struct ListState {
    snapshot: Snapshot,
    /// Records of the last successful scan, in page order
    records: Vec<BidRecord>,
    /// Set after the first successful scan. Everything on the first scan is
    /// new, and that isn't worth a notification per lot.
    baseline: bool,
}

pub struct MonitorService {
    pages: SharedPageSource,
    notifier: SharedNotifier,
    status_writer: SharedStatusWriter,
    extract_rules: ExtractRules,
    detection_rules: DetectionRules,
    interval: Duration,
    stop: StopSignal,
    lists: BTreeMap<ListKind, ListState>,
    start_time: Option<DateTime<Utc>>,
}

impl MonitorService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        pages: SharedPageSource,
        notifier: SharedNotifier,
        status_writer: SharedStatusWriter,
        extract_rules: ExtractRules,
        detection_rules: DetectionRules,
        interval: Duration,
        stop: StopSignal,
    ) -> Self {
        Self {
            pages,
            notifier,
            status_writer,
            extract_rules,
            detection_rules,
            interval,
            stop,
            lists: ListKind::ALL
                .into_iter()
                .map(|list| (list, ListState::default()))
                .collect(),
            start_time: None,
        }
    }

    pub fn snapshot(&self, list: ListKind) -> Option<&Snapshot> {
        self.lists.get(&list).map(|state| &state.snapshot)
    }

    fn fetch_and_scan(&self, list: ListKind) -> Result<Vec<BidRecord>> {
        let page = self
            .pages
            .fetch(list)
            .with_context(|| format!("fetching {list} page"))?;
        scan(&page, list, &self.extract_rules).with_context(|| format!("scanning {list} page"))
    }

    pub fn run_cycle(&mut self) -> CycleReport {
        let mut report = CycleReport::default();

        for list in ListKind::ALL {
            let records = match self.fetch_and_scan(list) {
                Ok(records) => records,
                Err(e) => {
                    // The snapshot stays as it was, so a missing page doesn't
                    // look like every lot being removed.
                    error!(%list, error = %format!("{e:#}"), "check failed");
                    self.send(Notification::error(&e, &format!("checking {list}")));
                    report.failed.push(list);
                    continue;
                }
            };

            let state = self.lists.entry(list).or_default();
            let (snapshot, events) = detect(&state.snapshot, &records, &self.detection_rules);
            let baseline = state.baseline;
            state.snapshot = snapshot;
            state.records = records;
            state.baseline = true;

            info!(%list, lots = state.snapshot.len(), changes = events.len(), "checked");

            for event in events {
                debug!(%list, ?event, "event");
                if baseline || event.change != Change::NewItem {
                    self.send(Notification::for_change(list, &event));
                }
                report.events.push((list, event));
            }
        }

        report
    }

    /// A single cycle outside the service loop, leaving the status file
    /// marked as not running
    pub fn run_once(&mut self) -> CycleReport {
        self.start_time.get_or_insert_with(Utc::now);
        let report = self.run_cycle();
        self.write_status(false);
        report
    }

    fn records(&self, list: ListKind) -> Vec<BidRecord> {
        self.lists
            .get(&list)
            .map(|state| state.records.clone())
            .unwrap_or_default()
    }

    pub fn status(&self, is_running: bool) -> StatusFile {
        StatusFile::new(
            Utc::now(),
            is_running,
            self.start_time,
            self.records(ListKind::ActiveBids),
            self.records(ListKind::Watchlist),
        )
    }

    fn write_status(&self, is_running: bool) {
        if let Err(e) = self.status_writer.write(&self.status(is_running)) {
            warn!(error = %format!("{e:#}"), "writing status failed");
        }
    }

    fn send(&self, notification: Notification) {
        if let Err(e) = self.notifier.notify(&notification) {
            warn!(
                template = notification.template.as_str(),
                error = %format!("{e:#}"),
                "notification failed"
            );
        }
    }
}

impl LoopService for MonitorService {
    fn startup(&mut self) -> Result<()> {
        self.start_time = Some(Utc::now());
        info!(interval = ?self.interval, "monitoring started");
        self.send(Notification::monitoring_started(self.interval.as_secs()));
        Ok(())
    }

    fn run_iteration(&mut self) -> Result<()> {
        let report = self.run_cycle();
        if !report.failed.is_empty() {
            warn!(failed = ?report.failed, "some lists were not checked");
        }
        self.write_status(true);
        self.stop.sleep(self.interval);
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        info!("monitoring stopped");
        self.send(Notification::monitoring_stopped("shutting down"));
        self.write_status(false);
        Ok(())
    }
}
