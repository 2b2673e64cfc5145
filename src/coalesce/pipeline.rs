//! The streaming manager: one mailbox, one wake signal, one stop signal,
//! one consumer thread.
//!
//! # Responsibilities
//!
//! The consumer thread handles:
//!
//! - **Draining**: picks the freshest buffered event, discards the rest
//! - **Forwarding**: hands the event to the [`EventSink`] synchronously,
//!   on its own thread — never on the producer's
//! - **Observability**: logs discard counts and sink failures
//! - **Shutdown**: exits cooperatively when the stop flag is raised
//!
//! # Signaling
//!
//! The wake signal is a capacity-1 crossbeam token channel: `try_send(())`
//! sets it (a full channel means it was already set — multiple sets before
//! a clear collapse to one wake), `recv()` waits and clears. A push that
//! lands after a drain but before the consumer blocks leaves the token set,
//! so the following `recv` returns immediately — no lost wakeups.
//!
//! The stop signal is an `AtomicBool`, checked at the top of every loop
//! iteration. `stop()` raises it and then *sets* the wake signal so a
//! sleeping consumer terminates promptly, then joins the thread.

use crate::coalesce::mailbox::Mailbox;
use crate::coalesce::sink::EventSink;
use crate::config::StreamConfig;
use crate::error::{Result, StreamError};
use crate::types::{AttrValue, AttributeEvent, EventKind};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

/// State shared between the pipeline handle, the ingestion callbacks and
/// the consumer thread.
struct Shared {
    name: String,
    mailbox: Mailbox,
    wake_tx: Sender<()>,
    stopping: AtomicBool,
    sink: Arc<dyn EventSink>,
}

/// A per-curve coalescing pipeline.
///
/// Owns exactly one mailbox, one wake signal, one stop signal and one
/// consumer thread. Created by the owning widget at construction
/// ([`StreamPipeline::spawn`] starts the consumer immediately); the widget's
/// destruction hook must call [`StreamPipeline::stop`] — `Drop` performs the
/// same sequence as a backstop, but explicit teardown is the supported path.
pub struct StreamPipeline {
    shared: Arc<Shared>,
    /// Taken by `start`; present only while the pipeline has never run.
    wake_rx: Option<Receiver<()>>,
    worker: Option<JoinHandle<()>>,
}

impl StreamPipeline {
    /// Create a pipeline without starting the consumer thread.
    pub fn new(config: StreamConfig, sink: Arc<dyn EventSink>) -> Self {
        let (wake_tx, wake_rx) = bounded(1);
        Self {
            shared: Arc::new(Shared {
                name: config.name,
                mailbox: Mailbox::new(),
                wake_tx,
                stopping: AtomicBool::new(false),
                sink,
            }),
            wake_rx: Some(wake_rx),
            worker: None,
        }
    }

    /// Create a pipeline and start its consumer thread immediately.
    pub fn spawn(config: StreamConfig, sink: Arc<dyn EventSink>) -> Result<Self> {
        let mut pipeline = Self::new(config, sink);
        pipeline.start()?;
        Ok(pipeline)
    }

    /// Start the consumer thread. Fails if the pipeline was already started.
    pub fn start(&mut self) -> Result<()> {
        let wake_rx = self
            .wake_rx
            .take()
            .ok_or_else(|| StreamError::AlreadyStarted(self.shared.name.clone()))?;
        let shared = Arc::clone(&self.shared);
        let handle = std::thread::Builder::new()
            .name(format!("streaming-{}", self.shared.name))
            .spawn(move || run_consumer(shared, wake_rx))?;
        self.worker = Some(handle);
        Ok(())
    }

    /// Stop the consumer thread and wait for it to exit.
    ///
    /// Raises the stop flag, sets the wake signal to unblock a sleeping
    /// consumer, joins, then abandons whatever is left in the mailbox.
    /// Idempotent; after this returns no further `forward` call originates
    /// from the consumer thread.
    pub fn stop(&mut self) {
        self.shared.stopping.store(true, Ordering::SeqCst);
        // A full channel means a wake is already pending, which is enough.
        let _ = self.shared.wake_tx.try_send(());

        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                tracing::error!(curve = %self.shared.name, "consumer thread panicked");
            }
        }

        let abandoned = self.shared.mailbox.clear();
        if abandoned > 0 {
            tracing::debug!(
                curve = %self.shared.name,
                abandoned,
                "abandoning unconsumed events at teardown"
            );
        }
    }

    /// Whether the consumer thread is currently running.
    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// Cloneable ingestion handle for the device-subscription layer.
    pub fn handle(&self) -> StreamHandle {
        StreamHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    pub fn name(&self) -> &str {
        &self.shared.name
    }
}

impl Drop for StreamPipeline {
    fn drop(&mut self) {
        if self.worker.is_some() {
            tracing::debug!(
                curve = %self.shared.name,
                "pipeline dropped without explicit stop"
            );
            self.stop();
        }
    }
}

/// Producer-side handle: the `eventReceived` callback surface.
///
/// Clone freely; safe to call concurrently from multiple threads. Never
/// blocks on I/O and returns quickly so device-notification threads are
/// not stalled.
#[derive(Clone)]
pub struct StreamHandle {
    shared: Arc<Shared>,
}

impl StreamHandle {
    /// Ingestion callback for the device-subscription layer.
    pub fn on_event_received(&self, source: impl Into<String>, kind: EventKind, value: AttrValue) {
        self.push_event(AttributeEvent::new(source, kind, value));
    }

    /// Deposit an already-built event.
    ///
    /// While the pipeline is live this pushes into the mailbox and sets the
    /// wake signal. After teardown the event is forwarded inline through
    /// the sink instead — delivery degrades to the direct path, it never
    /// silently drops.
    pub fn push_event(&self, event: AttributeEvent) {
        if self.shared.stopping.load(Ordering::SeqCst) {
            tracing::warn!(
                curve = %self.shared.name,
                source = %event.source,
                "pipeline stopped, processing event without the streaming feature"
            );
            if let Err(e) = self.shared.sink.forward(event) {
                tracing::warn!(curve = %self.shared.name, error = %e, "inline forward failed");
            }
            return;
        }

        tracing::trace!(
            curve = %self.shared.name,
            source = %event.source,
            kind = event.kind.as_str(),
            "event received"
        );
        self.shared.mailbox.push(event);
        let _ = self.shared.wake_tx.try_send(());
    }

    pub fn name(&self) -> &str {
        &self.shared.name
    }
}

/// Main loop of the consumer thread.
///
/// Starts in the processing state: one drain attempt happens before the
/// first wait, in case events arrived before the thread was scheduled.
fn run_consumer(shared: Arc<Shared>, wake_rx: Receiver<()>) {
    tracing::info!(curve = %shared.name, "streaming manager started");

    loop {
        if shared.stopping.load(Ordering::SeqCst) {
            break;
        }

        if let Some(drained) = shared.mailbox.drain_newest() {
            if drained.discarded > 0 {
                tracing::warn!(
                    curve = %shared.name,
                    dropped = drained.discarded,
                    "dropping superseded event(s) from the queue"
                );
            }
            if let Err(e) = shared.sink.forward(drained.event) {
                // Contained per iteration; the loop keeps serving events.
                tracing::warn!(curve = %shared.name, error = %e, "sink failed to process event");
            }
        }

        tracing::trace!(curve = %shared.name, "streaming manager going to sleep");
        if wake_rx.recv().is_err() {
            // All senders gone; nothing can ever wake us again.
            break;
        }
        tracing::trace!(curve = %shared.name, "streaming manager woke up");
    }

    tracing::info!(curve = %shared.name, "streaming manager exiting");
}
