//! Change feed for live collection subscriptions
//!
//! Every successful write publishes a [`ChangeEvent`] to the subscribers of
//! the affected collection. Receivers that have been dropped are pruned on
//! the next publish.

use std::collections::HashMap;
use std::fmt;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Mutex;

use tracing::debug;

/// A per-user document collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Accounts,
    Transactions,
    Budgets,
    Profile,
    Settings,
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accounts => write!(f, "accounts"),
            Self::Transactions => write!(f, "transactions"),
            Self::Budgets => write!(f, "budgets"),
            Self::Profile => write!(f, "profile"),
            Self::Settings => write!(f, "settings"),
        }
    }
}

/// Kind of change applied to a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOperation {
    Created,
    Updated,
    Deleted,
}

/// Notification that documents in a collection changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub collection: Collection,
    pub operation: ChangeOperation,
    /// Display ids of the affected documents
    pub ids: Vec<String>,
}

impl ChangeEvent {
    pub fn new(collection: Collection, operation: ChangeOperation, ids: Vec<String>) -> Self {
        Self {
            collection,
            operation,
            ids,
        }
    }
}

/// Fan-out of change events to collection subscribers
#[derive(Default)]
pub struct ChangeFeed {
    subscribers: Mutex<HashMap<Collection, Vec<Sender<ChangeEvent>>>>,
}

impl ChangeFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to changes of one collection
    pub fn subscribe(&self, collection: Collection) -> Receiver<ChangeEvent> {
        let (sender, receiver) = mpsc::channel();
        // A poisoned map only loses subscribers, never data
        let mut subscribers = match self.subscribers.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        subscribers.entry(collection).or_default().push(sender);
        receiver
    }

    /// Deliver an event to every live subscriber of its collection
    pub fn publish(&self, event: ChangeEvent) {
        let mut subscribers = match self.subscribers.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let Some(senders) = subscribers.get_mut(&event.collection) else {
            return;
        };

        let before = senders.len();
        senders.retain(|sender| sender.send(event.clone()).is_ok());
        if senders.len() < before {
            debug!(
                collection = %event.collection,
                pruned = before - senders.len(),
                "Dropped disconnected subscribers"
            );
        }
    }

    /// Number of live subscribers for a collection (as of the last publish)
    pub fn subscriber_count(&self, collection: Collection) -> usize {
        let subscribers = match self.subscribers.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        subscribers.get(&collection).map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_reaches_matching_subscribers_only() {
        let feed = ChangeFeed::new();
        let accounts = feed.subscribe(Collection::Accounts);
        let budgets = feed.subscribe(Collection::Budgets);

        feed.publish(ChangeEvent::new(
            Collection::Accounts,
            ChangeOperation::Updated,
            vec!["acc-1234abcd".into()],
        ));

        let event = accounts.try_recv().unwrap();
        assert_eq!(event.operation, ChangeOperation::Updated);
        assert_eq!(event.ids, vec!["acc-1234abcd".to_string()]);
        assert!(budgets.try_recv().is_err());
    }

    #[test]
    fn test_dropped_subscribers_are_pruned() {
        let feed = ChangeFeed::new();
        let kept = feed.subscribe(Collection::Transactions);
        drop(feed.subscribe(Collection::Transactions));
        assert_eq!(feed.subscriber_count(Collection::Transactions), 2);

        feed.publish(ChangeEvent::new(
            Collection::Transactions,
            ChangeOperation::Created,
            vec![],
        ));

        assert_eq!(feed.subscriber_count(Collection::Transactions), 1);
        assert!(kept.try_recv().is_ok());
    }

    #[test]
    fn test_publish_without_subscribers_is_noop() {
        let feed = ChangeFeed::new();
        feed.publish(ChangeEvent::new(
            Collection::Profile,
            ChangeOperation::Updated,
            vec![],
        ));
        assert_eq!(feed.subscriber_count(Collection::Profile), 0);
    }
}
