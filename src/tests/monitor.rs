use super::support::*;
use crate::auction::{ListKind, Price};
use crate::event::Change;
use crate::extract::ExtractRules;
use crate::notify::{Severity, SharedNotifier, Template};
use crate::page::InMemoryPageSource;
use crate::persistence::InMemoryStatusWriter;
use crate::service::{MonitorService, ServiceControl, StopSignal};
use crate::snapshot::DetectionRules;
use anyhow::{format_err, Result};
use std::sync::Arc;
use std::time::{Duration, Instant};

struct Fixture {
    pages: Arc<InMemoryPageSource>,
    notifier: Arc<RecordingNotifier>,
    status: Arc<InMemoryStatusWriter>,
}

impl Fixture {
    fn new() -> Self {
        let pages = InMemoryPageSource::new_shared();
        pages.set(ListKind::ActiveBids, ACTIVE_PAGE);
        pages.set(ListKind::Watchlist, WATCHLIST_PAGE);
        Self {
            pages,
            notifier: RecordingNotifier::new_shared(),
            status: InMemoryStatusWriter::new_shared(),
        }
    }

    fn monitor_with(&self, notifier: SharedNotifier, stop: StopSignal) -> MonitorService {
        MonitorService::new(
            self.pages.clone(),
            notifier,
            self.status.clone(),
            ExtractRules::default(),
            DetectionRules::default(),
            Duration::from_secs(60),
            stop,
        )
    }

    fn monitor(&self) -> MonitorService {
        self.monitor_with(self.notifier.clone(), StopSignal::default())
    }
}

#[test]
fn first_check_sets_a_baseline() -> Result<()> {
    let fixture = Fixture::new();
    let mut monitor = fixture.monitor();

    let report = monitor.run_once();
    assert!(report.failed.is_empty());
    assert_eq!(
        report
            .events
            .iter()
            .filter(|(_, e)| e.change == Change::NewItem)
            .count(),
        3
    );

    // Only the lot that is about to end is worth a message right away.
    assert_eq!(fixture.notifier.templates(), vec![Template::EndingSoon]);

    let status = fixture
        .status
        .last()
        .ok_or_else(|| format_err!("no status written"))?;
    assert!(!status.is_running);
    assert!(status.start_time.is_some());
    assert_eq!(status.active_bids_count, 2);
    assert_eq!(status.watchlist_count, 1);
    assert_eq!(status.summary.winning_bids, 1);
    assert_eq!(status.summary.outbid_bids, 1);
    assert_eq!(status.summary.total_value_current, Price::from_pounds(125));
    assert_eq!(status.summary.total_value_max, Price::from_pounds(130));
    Ok(())
}

#[test]
fn later_check_reports_changes() -> Result<()> {
    let fixture = Fixture::new();
    let mut monitor = fixture.monitor();
    monitor.run_once();
    fixture.notifier.clear();

    fixture.pages.set(ListKind::ActiveBids, ACTIVE_PAGE_LATER);
    let report = monitor.run_cycle();

    assert_eq!(
        fixture.notifier.templates(),
        vec![Template::Outbid, Template::BidIncrease, Template::ItemRemoved]
    );

    let sent = fixture.notifier.sent();
    assert_eq!(sent[0].severity, Severity::Urgent);
    assert!(sent[0].render().starts_with("OUTBID ALERT!\nItem: Makita Impact Driver"));
    assert_eq!(
        sent[1].context.get("increase").map(String::as_str),
        Some("£20.00")
    );
    assert!(report
        .events
        .iter()
        .all(|(list, _)| *list == ListKind::ActiveBids));

    let active = monitor
        .snapshot(ListKind::ActiveBids)
        .ok_or_else(|| format_err!("no snapshot"))?;
    assert_eq!(active.len(), 1);
    Ok(())
}

#[test]
fn missing_page_keeps_the_snapshot() -> Result<()> {
    let fixture = Fixture::new();
    let mut monitor = fixture.monitor();
    monitor.run_once();
    fixture.notifier.clear();

    fixture.pages.remove(ListKind::Watchlist);
    let report = monitor.run_cycle();

    assert_eq!(report.failed, vec![ListKind::Watchlist]);
    assert!(report.events.is_empty(), "no removals for an unreadable page");
    assert_eq!(fixture.notifier.templates(), vec![Template::Error]);
    assert_eq!(
        monitor
            .snapshot(ListKind::Watchlist)
            .map(|s| s.len()),
        Some(1)
    );
    Ok(())
}

#[test]
fn notifier_failures_do_not_stop_a_check() {
    let fixture = Fixture::new();
    let mut monitor = fixture.monitor_with(Arc::new(FailingNotifier), StopSignal::default());

    let report = monitor.run_once();
    assert_eq!(report.events.len(), 4);
    assert_eq!(fixture.status.written().len(), 1);
}

#[test]
fn service_loop_starts_and_stops_cleanly() -> Result<()> {
    let fixture = Fixture::new();
    let svc_ctr = ServiceControl::new();
    let handle = svc_ctr.spawn_loop(fixture.monitor_with(
        fixture.notifier.clone(),
        svc_ctr.stop_signal(),
    ));

    let deadline = Instant::now() + Duration::from_secs(10);
    while fixture.status.written().is_empty() {
        if deadline < Instant::now() {
            return Err(format_err!("no cycle ran"));
        }
        std::thread::sleep(Duration::from_millis(20));
    }

    svc_ctr.stop_all();
    handle.join()?;

    let templates = fixture.notifier.templates();
    assert_eq!(templates.first(), Some(&Template::MonitoringStarted));
    assert_eq!(templates.last(), Some(&Template::MonitoringStopped));

    let written = fixture.status.written();
    assert!(written[0].is_running);
    assert!(!written[written.len() - 1].is_running);
    Ok(())
}
