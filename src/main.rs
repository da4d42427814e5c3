mod auction;
mod cli;
mod config;
mod dedup;
mod element;
mod event;
mod extract;
mod notify;
mod page;
mod persistence;
mod scan;
mod service;
mod snapshot;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = cli::Args::parse();
    let config = config::Config::from_env()?.apply_args(&args)?;
    info!(
        pages_dir = %config.pages_dir.display(),
        status_file = %config.status_file.display(),
        interval_secs = config.check_interval_secs,
        "starting"
    );

    let pages = page::DirPageSource::new_shared(&config.pages_dir, &config.base_url);
    let status_writer = persistence::JsonFileStatusWriter::new_shared(&config.status_file);
    let mut notifiers = vec![notify::LogNotifier::new_shared()];
    if let Some(command) = &config.notify_command {
        notifiers.push(notify::CommandNotifier::new_shared(command)?);
    }
    let notifier = notify::Notifiers::new_shared(notifiers);

    let svc_ctr = service::ServiceControl::new();

    let mut monitor = service::MonitorService::new(
        pages,
        notifier,
        status_writer,
        config.extract_rules(),
        config.detection_rules(),
        config.check_interval(),
        svc_ctr.stop_signal(),
    );

    if args.once {
        let report = monitor.run_once();
        info!(
            changes = report.events.len(),
            failed = report.failed.len(),
            "single check done"
        );
        return Ok(());
    }

    ctrlc::set_handler({
        let svc_ctr = svc_ctr.clone();
        move || {
            eprintln!("Stopping all services...");
            svc_ctr.stop_all();
        }
    })?;

    svc_ctr.spawn_loop(monitor).join()
}
