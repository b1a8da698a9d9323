//! Event channel: owns the long-lived SSE connection to the agent server.
//!
//! One channel holds at most one live upstream connection. `connect` tears
//! down any predecessor before opening the next one; a monotonically
//! increasing generation counter fences every piece of scheduled work
//! (reads, deliveries, reconnect timers) so nothing outlives the
//! connection that scheduled it. Transport failures never surface to the
//! caller: the channel logs them and recovers through exponential backoff.
//!
//! # Module structure
//! - `backoff` - retry schedule and reconnect fencing context
//! - `sink` - the client-facing delivery trait
//! - `state` - observable connection state

mod backoff;
mod sink;
mod state;

pub use backoff::{ReconnectContext, ReconnectPolicy};
pub use sink::EventSink;
pub use state::ConnectionState;

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::StreamExt;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::notifications::{map_frame, Notification};
use crate::sse::{FrameTokenizer, SseFrame};

/// Default agent server address.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Errors internal to the channel's connection loop.
///
/// These never escape to the caller; the loop logs them and schedules a
/// reconnect.
#[derive(Debug)]
pub enum ChannelError {
    /// HTTP request failed (connection refused, DNS, mid-stream error)
    Http(reqwest::Error),
    /// Server answered with a non-success status
    HttpStatus { status: u16 },
    /// Connect or read exceeded the configured timeout
    Timeout { operation: &'static str },
    /// Server closed the stream
    ServerClosed,
}

impl std::fmt::Display for ChannelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelError::Http(e) => write!(f, "HTTP error: {}", e),
            ChannelError::HttpStatus { status } => {
                write!(f, "server returned status {}", status)
            }
            ChannelError::Timeout { operation } => write!(f, "{} timed out", operation),
            ChannelError::ServerClosed => write!(f, "server closed the event stream"),
        }
    }
}

impl std::error::Error for ChannelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ChannelError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ChannelError {
    fn from(e: reqwest::Error) -> Self {
        ChannelError::Http(e)
    }
}

/// Configuration for an event channel.
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Agent server base URL
    pub base_url: String,
    /// Timeout for establishing the streaming response
    pub connect_timeout: Duration,
    /// Timeout between successive reads on an open stream
    pub idle_timeout: Duration,
    /// Retry schedule applied after a lost connection
    pub backoff: ReconnectPolicy,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(30),
            backoff: ReconnectPolicy::default(),
        }
    }
}

impl ChannelConfig {
    /// Config pointing at a custom base URL, defaults otherwise.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

/// The project/session pair a connection streams events for.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Target {
    project_id: String,
    session_id: String,
}

impl Target {
    fn events_url(&self, base_url: &str) -> String {
        format!(
            "{}/project/{}/session/{}/events",
            base_url, self.project_id, self.session_id
        )
    }
}

/// State shared between the channel handle and its connection task.
struct Shared {
    /// Bumped on every connect/disconnect; stale generations stand down.
    generation: AtomicU64,
    /// Set once by `dispose()`, never cleared.
    disposed: AtomicBool,
    /// Consecutive failed attempts, reset on a successful connection.
    attempt: AtomicU32,
    /// Target of the current connection, if any.
    target: Mutex<Option<Target>>,
    /// Attached sink, if any. Cloned out before delivery so no lock is
    /// held across a callback.
    sink: Mutex<Option<Arc<dyn EventSink>>>,
    state_tx: watch::Sender<ConnectionState>,
}

impl Shared {
    fn is_current(&self, generation: u64) -> bool {
        !self.disposed.load(Ordering::SeqCst)
            && self.generation.load(Ordering::SeqCst) == generation
    }

    /// Publish a state change, unless this generation has been superseded.
    fn set_state(&self, generation: u64, state: ConnectionState) {
        if self.is_current(generation) {
            let _ = self.state_tx.send(state);
        }
    }

    fn current_target(&self) -> Option<Target> {
        self.target.lock().unwrap().clone()
    }

    fn sink(&self) -> Option<Arc<dyn EventSink>> {
        self.sink.lock().unwrap().clone()
    }
}

/// SSE client for the agent server's per-session event stream.
///
/// Construct once, `attach_sink`, then drive with
/// `connect`/`disconnect`/`dispose`. All methods are callable from sink
/// callbacks; none of them block on network activity.
pub struct EventChannel {
    config: ChannelConfig,
    http: reqwest::Client,
    shared: Arc<Shared>,
    state_rx: watch::Receiver<ConnectionState>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl EventChannel {
    /// Create a channel. No connection is opened until `connect`.
    pub fn new(config: ChannelConfig) -> Self {
        let (state_tx, state_rx) = watch::channel(ConnectionState::Disconnected);
        Self {
            config,
            http: reqwest::Client::new(),
            shared: Arc::new(Shared {
                generation: AtomicU64::new(0),
                disposed: AtomicBool::new(false),
                attempt: AtomicU32::new(0),
                target: Mutex::new(None),
                sink: Mutex::new(None),
                state_tx,
            }),
            state_rx,
            task: Mutex::new(None),
        }
    }

    /// Attach the sink that receives routed notifications.
    ///
    /// While no sink is attached, frames are still parsed but simply not
    /// delivered; there is no buffering.
    pub fn attach_sink(&self, sink: Arc<dyn EventSink>) {
        *self.shared.sink.lock().unwrap() = Some(sink);
    }

    /// Detach the current sink, stopping delivery immediately.
    pub fn detach_sink(&self) {
        *self.shared.sink.lock().unwrap() = None;
    }

    /// Current connection state.
    pub fn connection_state(&self) -> ConnectionState {
        *self.state_rx.borrow()
    }

    /// Whether the upstream stream is currently established.
    pub fn is_connected(&self) -> bool {
        self.connection_state() == ConnectionState::Connected
    }

    /// Subscribe to connection state changes.
    pub fn state_receiver(&self) -> watch::Receiver<ConnectionState> {
        self.state_rx.clone()
    }

    /// Open the event stream for a project/session, tearing down any
    /// existing connection first.
    ///
    /// Must be called from within a tokio runtime; the connection runs on
    /// a spawned task. After `dispose()` this is a logged no-op.
    pub fn connect(&self, project_id: &str, session_id: &str) {
        if self.shared.disposed.load(Ordering::SeqCst) {
            warn!(project_id, session_id, "connect() on disposed channel ignored");
            return;
        }

        let generation = self.teardown();
        self.shared.attempt.store(0, Ordering::SeqCst);

        let target = Target {
            project_id: project_id.to_string(),
            session_id: session_id.to_string(),
        };
        *self.shared.target.lock().unwrap() = Some(target.clone());
        let _ = self.shared.state_tx.send(ConnectionState::Connecting);
        info!(project_id, session_id, "connecting event channel");

        let handle = tokio::spawn(run_connection(
            self.http.clone(),
            self.config.clone(),
            Arc::clone(&self.shared),
            generation,
            target,
        ));
        *self.task.lock().unwrap() = Some(handle);
    }

    /// Close the current connection, cancel any pending reconnect timer,
    /// and reset the attempt counter.
    pub fn disconnect(&self) {
        self.teardown();
        self.shared.attempt.store(0, Ordering::SeqCst);
        *self.shared.target.lock().unwrap() = None;
        if !self.shared.disposed.load(Ordering::SeqCst) {
            let _ = self.shared.state_tx.send(ConnectionState::Disconnected);
        }
        debug!("event channel disconnected");
    }

    /// Permanently shut the channel down. Subsequent `connect` calls are
    /// logged no-ops.
    pub fn dispose(&self) {
        if self.shared.disposed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.disconnect();
        let _ = self.shared.state_tx.send(ConnectionState::Disposed);
        info!("event channel disposed");
    }

    /// Invalidate the current generation and abort its task. Returns the
    /// new generation.
    fn teardown(&self) -> u64 {
        let generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(handle) = self.task.lock().unwrap().take() {
            handle.abort();
        }
        generation
    }
}

impl Drop for EventChannel {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Connection loop for one generation: stream until failure, back off,
/// retry while the target is unchanged.
async fn run_connection(
    http: reqwest::Client,
    config: ChannelConfig,
    shared: Arc<Shared>,
    generation: u64,
    target: Target,
) {
    loop {
        if !shared.is_current(generation) {
            return;
        }
        shared.set_state(generation, ConnectionState::Connecting);

        let error = match stream_events(&http, &config, &shared, generation, &target).await {
            // Ok means this generation was superseded mid-stream
            Ok(()) => return,
            Err(error) => error,
        };
        if !shared.is_current(generation) {
            return;
        }
        shared.set_state(generation, ConnectionState::Disconnected);

        let attempt = shared.attempt.load(Ordering::SeqCst);
        let delay = config.backoff.delay_for(attempt);
        let context = ReconnectContext {
            project_id: target.project_id.clone(),
            session_id: target.session_id.clone(),
            attempt,
        };
        shared.attempt.store(attempt + 1, Ordering::SeqCst);
        shared.set_state(generation, ConnectionState::Reconnecting);
        warn!(
            error = %error,
            attempt = context.attempt,
            delay_ms = delay.as_millis() as u64,
            "event stream lost, scheduling reconnect"
        );

        tokio::time::sleep(delay).await;

        if !shared.is_current(generation) {
            return;
        }
        let still_current = shared
            .current_target()
            .map_or(false, |t| context.matches(&t.project_id, &t.session_id));
        if !still_current {
            debug!(
                project_id = %context.project_id,
                session_id = %context.session_id,
                "discarding stale reconnect timer"
            );
            return;
        }
    }
}

/// Open the stream and pump frames until it fails or goes stale.
async fn stream_events(
    http: &reqwest::Client,
    config: &ChannelConfig,
    shared: &Shared,
    generation: u64,
    target: &Target,
) -> Result<(), ChannelError> {
    let url = target.events_url(&config.base_url);
    debug!(%url, "opening event stream");

    let request = http
        .get(&url)
        .header(reqwest::header::ACCEPT, "text/event-stream")
        .send();
    let response = match tokio::time::timeout(config.connect_timeout, request).await {
        Ok(result) => result?,
        Err(_) => return Err(ChannelError::Timeout { operation: "connect" }),
    };

    let status = response.status();
    if !status.is_success() {
        return Err(ChannelError::HttpStatus {
            status: status.as_u16(),
        });
    }

    if !shared.is_current(generation) {
        return Ok(());
    }
    shared.attempt.store(0, Ordering::SeqCst);
    shared.set_state(generation, ConnectionState::Connected);
    info!(
        project_id = %target.project_id,
        session_id = %target.session_id,
        "event stream connected"
    );

    let mut tokenizer = FrameTokenizer::new();
    let mut stream = response.bytes_stream();

    loop {
        let next = match tokio::time::timeout(config.idle_timeout, stream.next()).await {
            Ok(next) => next,
            Err(_) => return Err(ChannelError::Timeout { operation: "read" }),
        };

        match next {
            Some(Ok(chunk)) => {
                for frame in tokenizer.feed_bytes(&chunk) {
                    if !shared.is_current(generation) {
                        return Ok(());
                    }
                    deliver(shared, &frame);
                }
            }
            Some(Err(e)) => return Err(ChannelError::Http(e)),
            None => {
                // Recover a final frame the server sent without its
                // terminating blank line
                if let Some(frame) = tokenizer.flush() {
                    if shared.is_current(generation) {
                        deliver(shared, &frame);
                    }
                }
                return Err(ChannelError::ServerClosed);
            }
        }
    }
}

/// Map one frame and hand it to the sink, if one is attached.
///
/// Holds no lock while the sink callback runs, so callbacks may re-enter
/// the channel.
fn deliver(shared: &Shared, frame: &SseFrame) {
    let notification = match map_frame(frame) {
        Ok(Some(notification)) => notification,
        Ok(None) => return,
        Err(e) => {
            warn!(error = %e, "dropping undecodable frame");
            return;
        }
    };

    let sink = match shared.sink() {
        Some(sink) => sink,
        None => {
            debug!(event = %frame.event, "no sink attached, notification dropped");
            return;
        }
    };

    match notification {
        Notification::Session(n) => sink.on_session_event(n),
        Notification::Message(n) => sink.on_message_event(n),
        Notification::File(n) => sink.on_file_event(n),
        Notification::Permission(n) => sink.on_permission_event(n),
    }
}
