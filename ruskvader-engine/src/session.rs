//! ## ruskvader-engine::session
//! **Capture session state machine**
//!
//! Lifecycle: `Idle → Opening → Running → Stopping → Idle`. An open failure
//! aborts the start transition; a fatal capture-loop error is surfaced once
//! and settles the machine back in `Idle`. One dedicated blocking context
//! drives the source's read loop; every captured frame is dispatched into
//! its own task running the impairment pipeline, bounded by a semaphore so
//! a flood of long-delayed packets cannot pile up without limit (arrivals
//! beyond the bound are shed and counted).

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::{watch, Semaphore};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info_span, Instrument};

use ruskvader_core::{
    ImpairmentPipeline, InjectionSink, Packet, PacketRng, PacketSource, SharedConfig, Verdict,
    WireError,
};
use ruskvader_telemetry::{logging, MetricsRecorder};

/// Default bound on concurrently in-flight packets.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 4096;

/// Lifecycle of a capture session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Opening,
    Running,
    Stopping,
}

/// Session knobs beyond the impairment configuration itself.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Seed for the impairment RNG; entropy-seeded when absent.
    pub seed: Option<u64>,
    /// Bound on concurrently in-flight packets.
    pub max_in_flight: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            seed: None,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
        }
    }
}

/// One live capture-and-reinject session.
///
/// At most one session should be running per interface; enforcing that is
/// the control surface's job, not this type's.
pub struct CaptureSession {
    state: Arc<watch::Sender<SessionState>>,
    cancel: CancellationToken,
    supervisor: Option<JoinHandle<Result<(), WireError>>>,
    metrics: MetricsRecorder,
}

impl CaptureSession {
    /// Opens the source via `open_source` and starts capturing.
    ///
    /// Runs `Idle → Opening → Running`; an open failure reverts to `Idle`
    /// and is surfaced once as the returned error. Must be called from
    /// within a tokio runtime.
    pub fn start<Src, Snk, F>(
        open_source: F,
        sink: Arc<Snk>,
        config: SharedConfig,
        options: SessionOptions,
    ) -> Result<Self, super::SessionError>
    where
        Src: PacketSource,
        Snk: InjectionSink,
        F: FnOnce() -> Result<Src, WireError>,
    {
        let state = Arc::new(watch::channel(SessionState::Idle).0);
        state.send_replace(SessionState::Opening);

        let mut source = match open_source() {
            Ok(source) => source,
            Err(e) => {
                state.send_replace(SessionState::Idle);
                logging::status(&format!("Error opening device: {e}"));
                return Err(super::SessionError::Open(e));
            }
        };

        let cancel = CancellationToken::new();
        let metrics = MetricsRecorder::new();
        let rng = Arc::new(match options.seed {
            Some(seed) => PacketRng::seeded(seed),
            None => PacketRng::from_entropy(),
        });
        let pipeline = Arc::new(ImpairmentPipeline::new(config, rng, sink, cancel.clone()));
        let permits = Arc::new(Semaphore::new(options.max_in_flight));

        // Device opened: capture begins with a fresh cancellation signal.
        state.send_replace(SessionState::Running);
        logging::status("Running...");

        let runtime = Handle::current();
        let loop_cancel = cancel.clone();
        let loop_metrics = metrics.clone();

        let capture = tokio::task::spawn_blocking(move || {
            let mut on_packet = |packet: Packet| {
                loop_metrics.packets_captured.inc();

                let permit = match permits.clone().try_acquire_owned() {
                    Ok(permit) => permit,
                    Err(_) => {
                        // In-flight bound reached: shed the newest arrival
                        // rather than stall the capture loop.
                        loop_metrics.packets_shed.inc();
                        return;
                    }
                };

                let pipeline = pipeline.clone();
                let metrics = loop_metrics.clone();
                runtime.spawn(async move {
                    match pipeline.process(packet).await {
                        Verdict::Forwarded => metrics.packets_forwarded.inc(),
                        Verdict::Dropped => metrics.packets_dropped.inc(),
                        Verdict::Duplicated => metrics.packets_duplicated.inc(),
                        Verdict::Cancelled => metrics.packets_cancelled.inc(),
                    }
                    drop(permit);
                });
            };
            source.run(&loop_cancel, &mut on_packet)
        });

        // Supervisor: settles the state machine when the loop exits, both
        // on a requested stop and on a fatal capture error.
        let sup_state = state.clone();
        let sup_cancel = cancel.clone();
        let supervisor = tokio::spawn(
            async move {
                let outcome = match capture.await {
                    Ok(result) => result,
                    Err(e) => Err(WireError::Read(format!("capture task panicked: {e}"))),
                };
                if let Err(ref e) = outcome {
                    logging::status(&format!("Error during capture: {e}"));
                }
                sup_state.send_replace(SessionState::Stopping);
                // Make sure in-flight suspended packets abort even when the
                // loop died on its own.
                sup_cancel.cancel();
                sup_state.send_replace(SessionState::Idle);
                outcome
            }
            .instrument(info_span!("capture_supervisor")),
        );

        Ok(Self {
            state,
            cancel,
            supervisor: Some(supervisor),
            metrics,
        })
    }

    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    /// Subscribes to state transitions, e.g. for a status display.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn metrics(&self) -> &MetricsRecorder {
        &self.metrics
    }

    /// Waits for the capture loop to exit on its own (fatal read error, or
    /// a cancellation raised elsewhere). The loop's error is surfaced on
    /// the first call only; later calls return `Ok`. Cancel-safe: a wait
    /// abandoned mid-await (e.g. racing a Ctrl-C select) leaves the loop
    /// outcome collectable by a later `wait` or `stop`.
    pub async fn wait(&mut self) -> Result<(), super::SessionError> {
        let Some(handle) = self.supervisor.as_mut() else {
            return Ok(());
        };
        let joined = handle.await;
        self.supervisor = None;
        match joined {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(super::SessionError::Capture(e)),
            Err(e) => Err(super::SessionError::Join(e.to_string())),
        }
    }

    /// Stops the session: `Running → Stopping → Idle`.
    ///
    /// Raises the cancellation token, so packets suspended in the delay or
    /// throttle stage are discarded without being forwarded. Returns after
    /// the capture loop has exited and the device is closed; no further
    /// frames are injected once this resolves.
    pub async fn stop(mut self) -> Result<(), super::SessionError> {
        if self.state() == SessionState::Running {
            self.state.send_replace(SessionState::Stopping);
        }
        self.cancel.cancel();
        let outcome = self.wait().await;
        logging::status("Stopped");
        outcome
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        // A dropped session must not keep capturing in the background.
        self.cancel.cancel();
        debug!("capture session dropped");
    }
}
