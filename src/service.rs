pub mod monitor;

pub use self::monitor::*;
use anyhow::{format_err, Result};
use std::{
    panic::{self, AssertUnwindSafe},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::{Duration, Instant},
};
use tracing::{error, info};

/// Granularity of [`StopSignal::sleep`]
pub const STOP_CHECK_TICK: Duration = Duration::from_millis(100);

/// A service that is a loop that does something
pub trait LoopService: Send + Sync {
    /// Called once on the service thread, before the first iteration
    fn startup(&mut self) -> Result<()> {
        Ok(())
    }

    fn run_iteration(&mut self) -> Result<()>;

    /// Called once after the last iteration, whether the loop was stopped
    /// or failed
    fn shutdown(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Shared "please stop" flag
#[derive(Clone, Default, Debug)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Sleep for `duration`, waking early on stop
    ///
    /// Returns `true` if stopped.
    pub fn sleep(&self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;
        loop {
            if self.is_stopped() {
                return true;
            }
            let now = Instant::now();
            if deadline <= now {
                return false;
            }
            thread::sleep(STOP_CHECK_TICK.min(deadline - now));
        }
    }
}

/// Service execution control instance
///
/// All services are basically a loop, and we would like to be able to
/// gracefully terminate them, and handle a top-level error of any
/// of them by gracefully stopping everything else.
#[derive(Clone, Default)]
pub struct ServiceControl {
    stop_all: StopSignal,
}

impl ServiceControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop_all(&self) {
        self.stop_all.stop();
    }

    pub fn stop_signal(&self) -> StopSignal {
        self.stop_all.clone()
    }

    /// Start a service on its own thread
    ///
    /// Iterates until stopped or until an iteration fails or panics; in
    /// every case `shutdown` runs afterwards. A failure or panic stops all
    /// services.
    pub fn spawn_loop(&self, mut service: impl LoopService + 'static) -> JoinHandle {
        let stop_all = self.stop_all.clone();

        JoinHandle::new(
            stop_all.clone(),
            thread::spawn(move || -> Result<()> {
                let res = panic::catch_unwind(AssertUnwindSafe(|| -> Result<()> {
                    service.startup()?;
                    while !stop_all.is_stopped() {
                        service.run_iteration()?;
                    }
                    Ok(())
                }))
                .unwrap_or_else(|_| Err(format_err!("service panicked")));

                if res.is_err() {
                    stop_all.stop();
                }
                match panic::catch_unwind(AssertUnwindSafe(|| service.shutdown())) {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => error!(error = %e, "service shutdown failed"),
                    Err(_) => error!("service shutdown panicked"),
                }
                res
            }),
        )
    }
}

/// Simple thread join wrapper that joins the thread on drop
///
/// Dropping it requests a stop of all services first.
pub struct JoinHandle {
    stop: StopSignal,
    thread: Option<thread::JoinHandle<Result<()>>>,
}

impl JoinHandle {
    fn new(stop: StopSignal, handle: thread::JoinHandle<Result<()>>) -> Self {
        JoinHandle {
            stop,
            thread: Some(handle),
        }
    }

    fn join_mut(&mut self) -> Result<()> {
        if let Some(h) = self.thread.take() {
            h.join().map_err(|e| format_err!("join failed: {:?}", e))?
        } else {
            Ok(())
        }
    }

    pub fn join(mut self) -> Result<()> {
        self.join_mut()
    }
}

impl Drop for JoinHandle {
    fn drop(&mut self) {
        if self.thread.is_none() {
            return;
        }
        self.stop.stop();
        match self.join_mut() {
            Ok(()) => info!("service stopped"),
            Err(e) => error!(error = %e, "service failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Panicking {
        shut_down: Arc<AtomicBool>,
    }

    impl LoopService for Panicking {
        fn run_iteration(&mut self) -> Result<()> {
            panic!("iteration blew up");
        }

        fn shutdown(&mut self) -> Result<()> {
            self.shut_down.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn shutdown_runs_after_a_panic() {
        let shut_down = Arc::new(AtomicBool::new(false));
        let svc_ctr = ServiceControl::new();

        let res = svc_ctr
            .spawn_loop(Panicking {
                shut_down: shut_down.clone(),
            })
            .join();

        assert!(res.is_err());
        assert!(shut_down.load(Ordering::SeqCst));
        assert!(svc_ctr.stop_signal().is_stopped());
    }
}
