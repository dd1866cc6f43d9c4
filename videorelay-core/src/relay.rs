//! ## videorelay-core::relay
//! **Ordered many-producer, single-consumer relay to one delegate**
//!
//! Producers call [`EventRelay::post`] from any thread or task. The enqueue
//! step runs under one lock, so the order in which posts complete is the
//! order the delegate sees. A single dispatcher task pops the head of the
//! queue, runs the matching delegate callback to completion, then pops the
//! next one.
//!
//! ### Lifecycle
//! `Open -> Closing -> Closed`. [`EventRelay::close`] stops accepting posts,
//! lets the dispatcher drain everything already queued, and returns once the
//! last callback has finished.
//!
//! ### Failure isolation
//! Each callback runs in its own spawned task which the dispatcher awaits.
//! An error or a panic in the delegate is logged and counted; the following
//! events are still delivered.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, info_span, instrument, trace, warn, Instrument};

use videorelay_config::QueueConfig;
use videorelay_telemetry::{EventLogger, MetricsRecorder, Milestone};

use crate::delegate::{deliver, RelayDelegate};
use crate::error::RelayError;
use crate::events::{CameraCapabilities, Event, VideoProfile, WireError, WireMessage};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelayState {
    /// Accepting posts.
    Open,
    /// Rejecting posts, still delivering what was queued.
    Closing,
    /// Drained; the dispatcher has exited.
    Closed,
}

/// Construction options for a relay.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RelayOptions {
    /// Maximum number of queued, not yet dispatched events. `None` is unbounded.
    pub capacity: Option<usize>,
}

impl From<&QueueConfig> for RelayOptions {
    fn from(config: &QueueConfig) -> Self {
        Self {
            capacity: config.capacity,
        }
    }
}

static NEXT_RELAY_ID: AtomicU64 = AtomicU64::new(0);

tokio::task_local! {
    /// Id of the relay whose callback the current task is running.
    static DISPATCHING_RELAY: u64;
}

struct Queued {
    seq: u64,
    event: Event,
}

/// Enqueue-side state. Holding this lock is what makes enqueue order total.
struct Gate {
    state: RelayState,
    sender: Option<UnboundedSender<Queued>>,
    next_seq: u64,
}

struct Shared {
    id: u64,
    gate: Mutex<Gate>,
    pending: Arc<AtomicUsize>,
    capacity: Option<usize>,
    metrics: Arc<MetricsRecorder>,
    dispatcher: tokio::sync::Mutex<Option<JoinHandle<()>>>,
}

/// Handle to a relay. Cheap to [`share`](EventRelay::share) across producers.
pub struct EventRelay {
    shared: Arc<Shared>,
}

impl EventRelay {
    /// Creates an unbounded relay bound to `delegate`.
    ///
    /// # Panics
    /// If called outside a tokio runtime, since the dispatcher is spawned here.
    pub fn new<D: RelayDelegate>(delegate: Arc<D>) -> Self {
        Self::with_options(delegate, RelayOptions::default())
    }

    /// Creates a relay bound to `delegate` with explicit options.
    ///
    /// # Panics
    /// If called outside a tokio runtime.
    pub fn with_options<D: RelayDelegate>(delegate: Arc<D>, options: RelayOptions) -> Self {
        let id = NEXT_RELAY_ID.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = mpsc::unbounded_channel();
        let pending = Arc::new(AtomicUsize::new(0));
        let metrics = Arc::new(MetricsRecorder::new());

        debug!(capacity = ?options.capacity, "Spawning relay dispatcher");
        let dispatcher = tokio::spawn(
            dispatch_loop(id, receiver, delegate, pending.clone(), metrics.clone())
                .instrument(info_span!("relay_dispatcher", relay = id)),
        );

        Self {
            shared: Arc::new(Shared {
                id,
                gate: Mutex::new(Gate {
                    state: RelayState::Open,
                    sender: Some(sender),
                    next_seq: 0,
                }),
                pending,
                capacity: options.capacity,
                metrics,
                dispatcher: tokio::sync::Mutex::new(Some(dispatcher)),
            }),
        }
    }

    /// Creates another handle to the same relay.
    #[inline]
    pub fn share(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Queues `event` behind everything posted before it.
    ///
    /// Returns once the event is queued, not once it is delivered.
    pub fn post(&self, event: Event) -> Result<(), RelayError> {
        let kind = event.kind();
        let mut gate = self.shared.gate.lock();

        if gate.state != RelayState::Open {
            return Err(self.reject(kind, RelayError::Closed));
        }
        if let Some(capacity) = self.shared.capacity {
            if self.shared.pending.load(Ordering::Acquire) >= capacity {
                return Err(self.reject(kind, RelayError::QueueFull { capacity }));
            }
        }

        let seq = gate.next_seq;
        let Some(sender) = gate.sender.as_ref() else {
            return Err(self.reject(kind, RelayError::Closed));
        };

        self.shared.pending.fetch_add(1, Ordering::AcqRel);
        if sender.send(Queued { seq, event }).is_err() {
            // Dispatcher task is gone, e.g. its runtime shut down.
            self.shared.pending.fetch_sub(1, Ordering::AcqRel);
            return Err(self.reject(kind, RelayError::Closed));
        }
        gate.next_seq += 1;
        drop(gate);

        self.shared.metrics.posted_events.inc();
        trace!(seq, kind, "Event queued");
        Ok(())
    }

    pub fn post_session_modify_request(&self, profile: VideoProfile) -> Result<(), RelayError> {
        self.post(Event::SessionModifyRequest { profile })
    }

    pub fn post_session_modify_response(
        &self,
        status: i32,
        requested: VideoProfile,
        response: VideoProfile,
    ) -> Result<(), RelayError> {
        self.post(Event::SessionModifyResponse {
            status,
            requested,
            response,
        })
    }

    pub fn post_call_session_event(&self, event: i32) -> Result<(), RelayError> {
        self.post(Event::CallSessionEvent { event })
    }

    pub fn post_peer_dimensions_changed(&self, width: i32, height: i32) -> Result<(), RelayError> {
        self.post(Event::PeerDimensionsChanged { width, height })
    }

    pub fn post_call_data_usage_changed(&self, data_usage: i64) -> Result<(), RelayError> {
        self.post(Event::CallDataUsageChanged { data_usage })
    }

    pub fn post_camera_capabilities_changed(
        &self,
        capabilities: CameraCapabilities,
    ) -> Result<(), RelayError> {
        self.post(Event::CameraCapabilitiesChanged { capabilities })
    }

    pub fn post_video_quality_changed(&self, quality: i32) -> Result<(), RelayError> {
        self.post(Event::VideoQualityChanged { quality })
    }

    /// Decodes a transport message and posts the resulting event.
    ///
    /// Messages that do not decode are dropped, but never quietly: each one is
    /// logged at `warn` and counted in `unrecognized_messages`.
    pub fn post_wire(&self, message: WireMessage) -> Result<(), RelayError> {
        match Event::try_from(message) {
            Ok(event) => self.post(event),
            Err(WireError::UnknownTag(tag)) => {
                self.shared.metrics.unrecognized_messages.inc();
                warn!(tag, "Unrecognized wire message tag, dropping");
                Err(RelayError::UnrecognizedTag(tag))
            }
            Err(WireError::Malformed { tag, reason }) => {
                self.shared.metrics.unrecognized_messages.inc();
                warn!(tag, %reason, "Malformed wire message, dropping");
                Err(RelayError::Decode { tag, reason })
            }
        }
    }

    /// Stops accepting posts and waits until every queued event is delivered.
    ///
    /// Safe to call more than once and from several handles; every caller
    /// returns after the drain has finished, including callers that follow a
    /// cancelled `close()`.
    ///
    /// Called from inside a delegate callback of this relay it only starts
    /// closing and returns [`RelayError::CloseFromDelegate`].
    #[instrument(skip(self))]
    pub async fn close(&self) -> Result<(), RelayError> {
        {
            let mut gate = self.shared.gate.lock();
            if gate.state == RelayState::Open {
                gate.state = RelayState::Closing;
                // Dropping the only sender ends the channel after the backlog.
                gate.sender = None;
                info!(pending = self.pending(), "Relay closing, draining queue");
            }
        }

        if self.is_dispatching() {
            // The dispatcher is awaiting this very callback; joining it would hang.
            warn!("close() called from inside a delegate callback");
            return Err(RelayError::CloseFromDelegate);
        }

        // The handle stays in place until the join completes, so a close()
        // dropped mid-drain leaves the next caller something to wait on.
        let mut dispatcher = self.shared.dispatcher.lock().await;
        let result = match dispatcher.as_mut() {
            Some(handle) => {
                let joined = handle.await.map_err(RelayError::from);
                *dispatcher = None;
                joined
            }
            None => Ok(()),
        };
        self.shared.gate.lock().state = RelayState::Closed;

        match &result {
            Ok(()) => {
                let metrics = &self.shared.metrics;
                EventLogger::log_milestone(&Milestone::RelayDrained {
                    dispatched: metrics.dispatched_events.get(),
                    delegate_failures: metrics.delegate_failures.get(),
                    unrecognized: metrics.unrecognized_messages.get(),
                });
            }
            Err(e) => error!("Relay dispatcher ended abnormally: {e}"),
        }
        result
    }

    pub fn state(&self) -> RelayState {
        self.shared.gate.lock().state
    }

    /// Events queued but not yet handed to the delegate.
    pub fn pending(&self) -> usize {
        self.shared.pending.load(Ordering::Acquire)
    }

    pub fn capacity(&self) -> Option<usize> {
        self.shared.capacity
    }

    pub fn metrics(&self) -> &Arc<MetricsRecorder> {
        &self.shared.metrics
    }

    fn is_dispatching(&self) -> bool {
        DISPATCHING_RELAY
            .try_with(|id| *id == self.shared.id)
            .unwrap_or(false)
    }

    fn reject(&self, kind: &'static str, err: RelayError) -> RelayError {
        self.shared.metrics.rejected_posts.inc();
        debug!(kind, "Post rejected: {err}");
        err
    }
}

/// The only code path that touches the delegate.
async fn dispatch_loop(
    id: u64,
    mut queue: UnboundedReceiver<Queued>,
    delegate: Arc<dyn RelayDelegate>,
    pending: Arc<AtomicUsize>,
    metrics: Arc<MetricsRecorder>,
) {
    debug!("Dispatcher started");

    while let Some(Queued { seq, event }) = queue.recv().await {
        pending.fetch_sub(1, Ordering::AcqRel);
        let kind = event.kind();
        trace!(seq, "Dispatching {event}");

        let started = Instant::now();
        let outcome =
            tokio::spawn(DISPATCHING_RELAY.scope(id, deliver(delegate.clone(), event))).await;
        metrics
            .dispatch_latency
            .observe(started.elapsed().as_nanos() as f64);
        metrics.dispatched_events.inc();

        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                metrics.delegate_failures.inc();
                warn!(seq, kind, "Delegate failed to handle event: {e}");
            }
            Err(e) => {
                metrics.delegate_failures.inc();
                error!(seq, kind, "Delegate task aborted: {e}");
            }
        }
    }

    debug!("Dispatcher drained");
}
