//! # Channel - Concurrent Handler Fan-Out
//!
//! A [`Channel`] owns an ordered list of subscribed handlers and fans every
//! sent message out to them as independently scheduled tasks. It also keeps
//! the bookkeeping the broker bridge needs: which broker subscriptions
//! currently back this channel, and whether the channel is private
//! (local-only) or galactic (mirrored to an external destination).
//!
//! ## Run-Once Eviction
//!
//! A run-once handler fires at most once. The firing task runs concurrently
//! with the dispatch loop and cannot safely mutate the handler list itself,
//! so it only flips the handler's `has_run` tombstone; the next `send` pass
//! compacts tombstoned entries out before dispatching. Until that pass runs,
//! the fired handler stays in the list as an inert entry.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bus_bridge::{Connection, Subscription};
use bus_model::Message;
use parking_lot::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

/// Callback invoked with every message dispatched to a handler.
///
/// Side effects only; panics inside the callback are contained by the
/// dispatch task and surface as a warning at join time.
pub type HandlerFn = Arc<dyn Fn(Arc<Message>) + Send + Sync>;

/// A subscriber registration on a channel.
///
/// The same identity may subscribe multiple times; each call produces an
/// independent entry that receives its own copy of future messages.
pub struct ChannelEventHandler {
    /// Identity of this subscription instance.
    id: Uuid,

    /// The subscriber callback.
    callback: HandlerFn,

    /// When `true`, the handler fires at most once and is then evicted.
    run_once: bool,

    /// Tombstone flag, set by the dispatch task after a run-once
    /// invocation completes. Shared with the task so it can be flipped
    /// without re-acquiring the channel lock.
    has_run: Arc<AtomicBool>,
}

impl ChannelEventHandler {
    /// Creates a handler that fires on every message.
    #[must_use]
    pub fn new(id: Uuid, callback: HandlerFn) -> Self {
        Self {
            id,
            callback,
            run_once: false,
            has_run: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Creates a handler that fires at most once, then is evicted.
    #[must_use]
    pub fn once(id: Uuid, callback: HandlerFn) -> Self {
        Self {
            id,
            callback,
            run_once: true,
            has_run: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns the identity of this subscription instance.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns `true` if this handler is evicted after its first run.
    #[must_use]
    pub fn is_run_once(&self) -> bool {
        self.run_once
    }
}

/// A recorded broker-side subscription backing a channel.
#[derive(Debug, Clone)]
struct BrokerLink {
    connection: Connection,
    subscription: Subscription,
}

/// Reachability flags for the bridge layer.
///
/// The flags are stored independently; the bridge is responsible for never
/// opening a broker subscription for a private channel.
#[derive(Debug, Default)]
struct Reachability {
    private: bool,
    galactic: bool,
    destination: Option<String>,
}

/// A named in-process pub/sub topic.
///
/// Channels are created through [`ChannelManager`](crate::ChannelManager)
/// and shared as `Arc<Channel>`. All mutation happens under per-channel
/// guards, so channels are safe to use from arbitrary concurrent callers
/// and independent channels never contend with each other.
pub struct Channel {
    /// Channel name, fixed at creation; identity within the registry.
    name: String,

    /// Subscribed handlers, in subscription order.
    event_handlers: Mutex<Vec<ChannelEventHandler>>,

    /// Broker subscriptions backing this channel, keyed by subscription id.
    broker_subs: Mutex<HashMap<Uuid, BrokerLink>>,

    /// Private/galactic flags and the galactic destination.
    reachability: RwLock<Reachability>,

    /// Tasks spawned by in-flight `send` calls, awaited by `join`.
    pending: Mutex<Vec<JoinHandle<()>>>,
}

impl Channel {
    /// Creates an empty channel named `name`.
    ///
    /// The handler list and broker-subscription map start empty; both
    /// reachability flags start false.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            event_handlers: Mutex::new(Vec::new()),
            broker_subs: Mutex::new(HashMap::new()),
            reachability: RwLock::new(Reachability::default()),
            pending: Mutex::new(Vec::new()),
        }
    }

    /// Returns the channel's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    // =========================================================================
    // HANDLER LIFECYCLE
    // =========================================================================

    /// Appends `handler` to the handler list.
    ///
    /// No deduplication by identity: subscribing the same id twice yields
    /// two independent entries that both receive future messages.
    pub fn subscribe_handler(&self, handler: ChannelEventHandler) {
        let mut handlers = self.event_handlers.lock();
        debug!(
            channel = %self.name,
            handler_id = %handler.id,
            run_once = handler.run_once,
            "Handler subscribed"
        );
        handlers.push(handler);
    }

    /// Removes the handler at `index`, preserving the order of the rest.
    ///
    /// Out-of-range indices, including any index on an empty list, are a
    /// silent no-op.
    pub fn remove_event_handler(&self, index: usize) {
        let mut handlers = self.event_handlers.lock();
        if index >= handlers.len() {
            debug!(
                channel = %self.name,
                index,
                len = handlers.len(),
                "Handler removal out of range, ignored"
            );
            return;
        }
        let removed = handlers.remove(index);
        debug!(
            channel = %self.name,
            handler_id = %removed.id,
            "Handler removed"
        );
    }

    /// Returns `true` if at least one handler is currently registered.
    ///
    /// A run-once handler that has fired but not yet been compacted out
    /// still counts; compaction happens on the next `send` pass.
    #[must_use]
    pub fn contains_handlers(&self) -> bool {
        !self.event_handlers.lock().is_empty()
    }

    /// Returns the current number of registered handlers.
    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.event_handlers.lock().len()
    }

    // =========================================================================
    // DISPATCH
    // =========================================================================

    /// Fans `message` out to every registered handler concurrently.
    ///
    /// Walks the handler list once in subscription order: fired run-once
    /// entries are compacted out without dispatch; every live entry gets
    /// one independently scheduled task. Returns immediately after
    /// scheduling — callers that need completion must [`join`](Self::join).
    ///
    /// Sending on a channel with zero handlers is a legal no-op.
    ///
    /// # Panics
    ///
    /// Must be called from within a tokio runtime; task scheduling
    /// panics otherwise.
    pub fn send(&self, message: Arc<Message>) {
        let mut handlers = self.event_handlers.lock();
        let mut pending = self.pending.lock();
        let before = handlers.len();

        handlers.retain(|handler| {
            // Tombstoned on a previous pass; compact out without dispatch.
            if handler.run_once && handler.has_run.load(Ordering::Acquire) {
                return false;
            }

            let callback = Arc::clone(&handler.callback);
            let msg = Arc::clone(&message);
            let run_once = handler.run_once;
            let has_run = Arc::clone(&handler.has_run);

            pending.push(tokio::spawn(async move {
                callback(msg);
                if run_once {
                    has_run.store(true, Ordering::Release);
                }
            }));
            true
        });

        debug!(
            channel = %self.name,
            message_id = %message.id,
            dispatched = handlers.len(),
            pruned = before - handlers.len(),
            "Message dispatched"
        );
    }

    /// Waits until every task spawned by in-flight `send` calls completes.
    ///
    /// A handler that panicked resolves its task with an error; the unit of
    /// outstanding work is still released and the panic is reported as a
    /// warning rather than propagated.
    pub async fn join(&self) {
        let tasks: Vec<JoinHandle<()>> = std::mem::take(&mut *self.pending.lock());
        for task in tasks {
            if let Err(err) = task.await {
                warn!(channel = %self.name, error = %err, "Dispatch task failed");
            }
        }
    }

    // =========================================================================
    // REACHABILITY FLAGS
    // =========================================================================

    /// Marks whether this channel is local-only.
    pub fn set_private(&self, private: bool) {
        self.reachability.write().private = private;
    }

    /// Returns `true` if this channel must never be bridged to a broker.
    #[must_use]
    pub fn is_private(&self) -> bool {
        self.reachability.read().private
    }

    /// Marks this channel as federated to `destination`.
    ///
    /// A non-empty destination sets the galactic flag; the bridge layer
    /// decides whether to actually open a broker-side subscription.
    pub fn set_galactic(&self, destination: impl Into<String>) {
        let destination = destination.into();
        let mut flags = self.reachability.write();
        flags.galactic = !destination.is_empty();
        flags.destination = if destination.is_empty() {
            None
        } else {
            Some(destination)
        };
    }

    /// Clears the galactic flag and destination, making delivery local.
    pub fn set_local(&self) {
        let mut flags = self.reachability.write();
        flags.galactic = false;
        flags.destination = None;
    }

    /// Returns `true` if this channel is federated to a broker destination.
    #[must_use]
    pub fn is_galactic(&self) -> bool {
        self.reachability.read().galactic
    }

    /// Returns the broker destination this channel is federated to, if any.
    #[must_use]
    pub fn destination(&self) -> Option<String> {
        self.reachability.read().destination.clone()
    }

    // =========================================================================
    // BROKER SUBSCRIPTION BOOKKEEPING
    // =========================================================================

    /// Records that `subscription`, reached via `connection`, now backs
    /// this channel.
    ///
    /// Idempotent upsert keyed by the subscription's id: re-adding an
    /// already-present subscription replaces its entry.
    pub fn add_broker_subscription(&self, connection: &Connection, subscription: &Subscription) {
        let mut subs = self.broker_subs.lock();
        debug!(
            channel = %self.name,
            subscription_id = %subscription.id,
            connection_id = %connection.id,
            "Broker subscription recorded"
        );
        subs.insert(
            subscription.id,
            BrokerLink {
                connection: connection.clone(),
                subscription: subscription.clone(),
            },
        );
    }

    /// Deletes the entry for `subscription`; no-op if absent.
    pub fn remove_broker_subscription(&self, subscription: &Subscription) {
        let mut subs = self.broker_subs.lock();
        if subs.remove(&subscription.id).is_some() {
            debug!(
                channel = %self.name,
                subscription_id = %subscription.id,
                "Broker subscription removed"
            );
        }
    }

    /// Returns `true` if `subscription` currently backs this channel.
    #[must_use]
    pub fn is_broker_subscribed(&self, subscription: &Subscription) -> bool {
        self.broker_subs.lock().contains_key(&subscription.id)
    }

    /// Returns the number of broker subscriptions backing this channel.
    #[must_use]
    pub fn broker_subscription_count(&self) -> usize {
        self.broker_subs.lock().len()
    }

    /// Returns the connection a recorded subscription is reached over.
    #[must_use]
    pub fn broker_connection_for(&self, subscription: &Subscription) -> Option<Connection> {
        self.broker_subs
            .lock()
            .get(&subscription.id)
            .map(|link| link.connection.clone())
    }
}

impl std::fmt::Debug for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Channel")
            .field("name", &self.name)
            .field("handlers", &self.handler_count())
            .field("broker_subs", &self.broker_subscription_count())
            .finish()
    }
}
