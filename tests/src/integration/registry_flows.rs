//! # Registry and Federation Flows
//!
//! Channel creation and lookup through the manager atop the process-wide
//! bus, plus the broker-subscription bookkeeping the bridge layer drives.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bus_bridge::{Connection, Subscription};
    use bus_core::{BusError, ChannelManager, EventBus};

    use crate::init_test_logging;

    /// The concrete broker-subscription scenario: create a channel through
    /// the registry, record one subscription, check membership both ways,
    /// remove it, and check again.
    #[test]
    fn test_broker_subscription_membership_via_registry() {
        init_test_logging();
        let conn = Connection::new("tcp://broker:61613");
        let sub = Subscription::new("/topic/testing-broker-subs");
        let other_sub = Subscription::new("/topic/testing-broker-subs");

        let cm = ChannelManager::new(EventBus::global());
        let channel = cm.create_channel("testing-broker-subs");

        channel.add_broker_subscription(&conn, &sub);
        assert!(channel.is_broker_subscribed(&sub));
        assert!(!channel.is_broker_subscribed(&other_sub));

        channel.remove_broker_subscription(&sub);
        assert!(!channel.is_broker_subscribed(&sub));
    }

    /// "No such channel" is signaled distinctly from "channel exists with
    /// no handlers".
    #[test]
    fn test_not_found_is_distinct_from_empty_channel() {
        init_test_logging();
        let cm = ChannelManager::new(&EventBus::new());
        cm.create_channel("empty");

        let empty = cm.get_channel("empty").expect("channel exists");
        assert!(!empty.contains_handlers());

        assert_eq!(
            cm.get_channel("missing").err(),
            Some(BusError::ChannelNotFound {
                name: "missing".into()
            })
        );
    }

    /// Two managers on distinct buses keep independent registries.
    #[test]
    fn test_independent_buses_do_not_share_channels() {
        init_test_logging();
        let bus_a = EventBus::new();
        let bus_b = EventBus::new();

        bus_a.manager().create_channel("only-on-a");

        assert!(bus_a.manager().check_channel_exists("only-on-a"));
        assert!(!bus_b.manager().check_channel_exists("only-on-a"));
    }

    /// Reachability flags drive the bridge's decisions: a private channel
    /// stays private regardless of galactic state, since the flags are
    /// stored independently.
    #[test]
    fn test_reachability_flags_are_independent() {
        init_test_logging();
        let cm = ChannelManager::new(&EventBus::new());
        let channel = cm.create_channel("federated");

        channel.set_private(true);
        channel.set_galactic("/topic/federated");

        assert!(channel.is_private());
        assert!(channel.is_galactic());
        assert_eq!(channel.destination().as_deref(), Some("/topic/federated"));

        channel.set_local();
        assert!(channel.is_private());
        assert!(!channel.is_galactic());
    }

    /// Concurrent create_channel calls for one name settle on exactly one
    /// live instance registry-wide.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_registry_survives_concurrent_creation() {
        init_test_logging();
        let cm = Arc::new(ChannelManager::new(&EventBus::new()));

        let mut tasks = Vec::new();
        for _ in 0..32 {
            let cm = Arc::clone(&cm);
            tasks.push(tokio::spawn(async move { cm.create_channel("contended") }));
        }

        let mut created = Vec::new();
        for task in tasks {
            created.push(task.await.expect("task completed"));
        }

        assert_eq!(cm.channel_count(), 1);
        for channel in &created {
            assert!(Arc::ptr_eq(channel, &created[0]));
        }
    }

    /// Destroying a channel through the registry does not invalidate
    /// handles already held by callers.
    #[test]
    fn test_destroy_leaves_held_handles_working() {
        init_test_logging();
        let cm = ChannelManager::new(&EventBus::new());
        let held = cm.create_channel("short-lived");

        cm.destroy_channel("short-lived");
        assert!(!cm.check_channel_exists("short-lived"));

        // The held Arc still works for local bookkeeping.
        let conn = Connection::new("tcp://broker:61613");
        let sub = Subscription::new("/topic/short-lived");
        held.add_broker_subscription(&conn, &sub);
        assert!(held.is_broker_subscribed(&sub));
    }
}
