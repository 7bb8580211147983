//! Connection registry.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::Mutex;

use crate::domain::ConnectionId;

use super::ClientHandle;

/// Set of live client handles.
///
/// One lock serializes every operation, so an insert or removal never races
/// with a fan-out taking its snapshot. Iteration only happens over snapshots.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    handles: Mutex<HashMap<ConnectionId, Arc<ClientHandle>>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a handle. Re-adding an id replaces the previous handle.
    pub async fn add(&self, handle: ClientHandle) {
        let mut handles = self.handles.lock().await;
        let id = handle.id();
        if let Some(previous) = handles.insert(id, Arc::new(handle)) {
            previous.mark_dead();
        }
    }

    /// Remove a handle if present. Dropping the registry's reference closes
    /// the connection's writer once in-flight fan-outs let go of it.
    pub async fn remove(&self, id: &ConnectionId) -> Option<Arc<ClientHandle>> {
        let mut handles = self.handles.lock().await;
        let removed = handles.remove(id);
        if let Some(handle) = &removed {
            handle.mark_dead();
        }
        removed
    }

    /// Remove several handles under one lock acquisition
    pub async fn remove_all(&self, ids: &[ConnectionId]) -> usize {
        let mut handles = self.handles.lock().await;
        let mut removed = 0;
        for id in ids {
            if let Some(handle) = handles.remove(id) {
                handle.mark_dead();
                removed += 1;
            }
        }
        removed
    }

    /// Handles that are live right now
    pub async fn snapshot(&self) -> Vec<Arc<ClientHandle>> {
        let handles = self.handles.lock().await;
        handles
            .values()
            .filter(|handle| handle.is_live())
            .cloned()
            .collect()
    }

    pub async fn contains(&self, id: &ConnectionId) -> bool {
        self.handles.lock().await.contains_key(id)
    }

    pub async fn len(&self) -> usize {
        self.handles.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use tokio::sync::mpsc;

    fn handle() -> (ClientHandle, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(8);
        (ClientHandle::new(ConnectionId::generate(), tx), rx)
    }

    fn ids(snapshot: &[Arc<ClientHandle>]) -> HashSet<ConnectionId> {
        snapshot.iter().map(|h| h.id()).collect()
    }

    #[tokio::test]
    async fn test_add_and_snapshot() {
        // given:
        let registry = ConnectionRegistry::new();
        let (alice, _alice_rx) = handle();
        let (bob, _bob_rx) = handle();
        let expected: HashSet<_> = [alice.id(), bob.id()].into_iter().collect();

        // when:
        registry.add(alice).await;
        registry.add(bob).await;

        // then:
        assert_eq!(ids(&registry.snapshot().await), expected);
        assert_eq!(registry.len().await, 2);
    }

    #[tokio::test]
    async fn test_add_same_id_twice_keeps_one_entry() {
        let registry = ConnectionRegistry::new();
        let id = ConnectionId::generate();
        let (tx1, _rx1) = mpsc::channel(1);
        let (tx2, _rx2) = mpsc::channel(1);

        registry.add(ClientHandle::new(id, tx1)).await;
        registry.add(ClientHandle::new(id, tx2)).await;

        assert_eq!(registry.len().await, 1);
        assert_eq!(registry.snapshot().await.len(), 1);
    }

    #[tokio::test]
    async fn test_remove_twice_is_idempotent() {
        // given:
        let registry = ConnectionRegistry::new();
        let (alice, _alice_rx) = handle();
        let (bob, _bob_rx) = handle();
        let alice_id = alice.id();
        let bob_id = bob.id();
        registry.add(alice).await;
        registry.add(bob).await;

        // when:
        let first = registry.remove(&alice_id).await;
        let second = registry.remove(&alice_id).await;

        // then:
        assert!(first.is_some());
        assert!(!first.unwrap().is_live());
        assert!(second.is_none());
        assert_eq!(ids(&registry.snapshot().await), HashSet::from([bob_id]));
    }

    #[tokio::test]
    async fn test_remove_unknown_id_is_noop() {
        let registry = ConnectionRegistry::new();
        let (alice, _rx) = handle();
        registry.add(alice).await;

        assert!(registry.remove(&ConnectionId::generate()).await.is_none());
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_snapshot_skips_dead_handles() {
        let registry = ConnectionRegistry::new();
        let (alice, _alice_rx) = handle();
        let (bob, _bob_rx) = handle();
        let alice_id = alice.id();
        let bob_id = bob.id();
        registry.add(alice).await;
        registry.add(bob).await;

        // a concurrent fan-out saw bob fail
        for h in registry.snapshot().await {
            if h.id() == bob_id {
                h.mark_dead();
            }
        }

        assert_eq!(ids(&registry.snapshot().await), HashSet::from([alice_id]));
        // still registered until that fan-out removes it
        assert_eq!(registry.len().await, 2);
    }

    #[tokio::test]
    async fn test_remove_all() {
        let registry = ConnectionRegistry::new();
        let (alice, _a) = handle();
        let (bob, _b) = handle();
        let targets = [alice.id(), bob.id(), ConnectionId::generate()];
        registry.add(alice).await;
        registry.add(bob).await;

        let removed = registry.remove_all(&targets).await;

        assert_eq!(removed, 2);
        assert_eq!(registry.len().await, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_add_remove_leaves_no_phantoms() {
        // given: 64 handles, every even one removed again, all concurrently
        let registry = Arc::new(ConnectionRegistry::new());
        let mut receivers = Vec::new();
        let mut tasks = Vec::new();
        let mut expected = HashSet::new();

        for i in 0..64 {
            let (h, rx) = handle();
            receivers.push(rx);
            let id = h.id();
            let keep = i % 2 == 1;
            if keep {
                expected.insert(id);
            }
            let registry = registry.clone();
            tasks.push(tokio::spawn(async move {
                registry.add(h).await;
                tokio::task::yield_now().await;
                if !keep {
                    registry.remove(&id).await;
                }
            }));
        }

        // when:
        for task in tasks {
            task.await.unwrap();
        }

        // then:
        assert_eq!(ids(&registry.snapshot().await), expected);
        assert_eq!(registry.len().await, 32);
    }
}
