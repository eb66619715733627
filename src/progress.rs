//! Simulated download progress.
//!
//! [`ProgressSimulator`] is the pure state machine; [`DownloadTask`] drives it
//! from a tokio interval and can be cancelled. Nothing is transferred.

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Duration, MissedTickBehavior};
use tracing::debug;

/// Percent added on every tick.
pub const STEP: u8 = 10;
pub const COMPLETE: u8 = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProgressState {
    #[default]
    Idle,
    Running(u8),
    Complete,
}

impl ProgressState {
    pub fn percent(&self) -> u8 {
        match self {
            ProgressState::Idle => 0,
            ProgressState::Running(percent) => *percent,
            ProgressState::Complete => COMPLETE,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, ProgressState::Complete)
    }

    pub fn is_running(&self) -> bool {
        matches!(self, ProgressState::Running(_))
    }
}

#[derive(Debug, Default)]
pub struct ProgressSimulator {
    state: ProgressState,
}

impl ProgressSimulator {
    pub fn state(&self) -> ProgressState {
        self.state
    }

    /// Begin a fresh run, from any state. Returns the percent to report for
    /// the start signal, which is the new run's value before any tick.
    pub fn start(&mut self) -> u8 {
        self.state = ProgressState::Running(0);
        self.state.percent()
    }

    /// Advance one step. `None` when not running, so nothing ticks after
    /// completion.
    pub fn tick(&mut self) -> Option<u8> {
        let ProgressState::Running(percent) = self.state else {
            return None;
        };

        let next = percent.saturating_add(STEP).min(COMPLETE);
        self.state = if next >= COMPLETE {
            ProgressState::Complete
        } else {
            ProgressState::Running(next)
        };
        Some(next)
    }
}

/// Handle to a running simulated download.
///
/// Dropping the handle stops the ticking task.
#[derive(Debug)]
pub struct DownloadTask {
    state: watch::Receiver<ProgressState>,
    handle: JoinHandle<()>,
}

impl DownloadTask {
    /// Start a run ticking every `interval`. `on_start` receives the start
    /// percent once, before the first tick.
    pub fn spawn(interval: Duration, on_start: impl FnOnce(u8)) -> Self {
        let mut simulator = ProgressSimulator::default();
        on_start(simulator.start());

        let (tx, rx) = watch::channel(simulator.state());
        let handle = tokio::spawn(async move {
            let mut ticker = time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick of an interval completes immediately.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let Some(percent) = simulator.tick() else {
                    break;
                };
                debug!("Simulated download at {}%", percent);
                if tx.send(simulator.state()).is_err() {
                    break;
                }
                if simulator.state().is_complete() {
                    break;
                }
            }
        });

        DownloadTask { state: rx, handle }
    }

    pub fn state(&self) -> ProgressState {
        *self.state.borrow()
    }

    /// A receiver that is notified on every step.
    pub fn subscribe(&self) -> watch::Receiver<ProgressState> {
        self.state.clone()
    }

    /// Stop ticking. The last published state stays readable.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for DownloadTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
