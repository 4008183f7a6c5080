//! Fixed-interval sampling loop with explicit, cooperative stop.
//!
//! The loop samples immediately, then sleeps for the interval after each
//! sample completes, so long uptimes drift rather than align to the clock.
//! Sampling runs on the blocking pool and is never interrupted: a stop that
//! arrives mid-sample takes effect once the line is on disk.

use crate::sample::Sample;
use crate::state::StateHolder;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Callback invoked with every successfully logged sample.
pub type SampleCallback = Box<dyn Fn(&Sample) + Send + Sync>;

/// Stops a running [`Scheduler`]. Cheap to clone; stopping twice is harmless.
#[derive(Clone, Debug)]
pub struct SchedulerHandle {
    shutdown_tx: mpsc::Sender<()>,
}

impl SchedulerHandle {
    /// Cancel the pending timer. Returns immediately; await the scheduler's
    /// join handle to wait for an in-flight sample.
    pub fn stop(&self) {
        // full channel means a stop is already queued
        let _ = self.shutdown_tx.try_send(());
    }
}

pub struct Scheduler {
    state: Arc<StateHolder>,
    interval: Duration,
    on_sample: Option<SampleCallback>,
    shutdown_rx: mpsc::Receiver<()>,
}

impl Scheduler {
    pub fn new(state: Arc<StateHolder>, interval: Duration) -> (Self, SchedulerHandle) {
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        (
            Self {
                state,
                interval,
                on_sample: None,
                shutdown_rx,
            },
            SchedulerHandle { shutdown_tx },
        )
    }

    pub fn on_sample(mut self, callback: impl Fn(&Sample) + Send + Sync + 'static) -> Self {
        self.on_sample = Some(Box::new(callback));
        self
    }

    /// Spawn the loop on the current runtime.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Run until stopped. Consumes self (can only be called once).
    pub async fn run(mut self) {
        info!(
            "Sampling {} every {:?}",
            self.state.folder().display(),
            self.interval
        );

        loop {
            sample_and_notify(&self.state, self.on_sample.as_deref()).await;

            tokio::select! {
                biased;

                _ = self.shutdown_rx.recv() => {
                    info!("Scheduler stopped");
                    break;
                }

                _ = tokio::time::sleep(self.interval) => {}
            }
        }
    }
}

async fn sample_and_notify(state: &Arc<StateHolder>, on_sample: Option<&(dyn Fn(&Sample) + Send + Sync)>) {
    let state = state.clone();
    match tokio::task::spawn_blocking(move || state.sample_once()).await {
        Ok(Ok(sample)) => {
            if let Some(callback) = on_sample {
                callback(&sample);
            }
        }
        Ok(Err(err)) => {
            error!("Failed to record sample, history is missing this interval: {}", err);
        }
        Err(err) => {
            error!("Sampling task failed: {}", err);
        }
    }
}
