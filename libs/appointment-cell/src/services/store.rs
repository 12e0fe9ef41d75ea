use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::models::{ConversationId, ConversationState};

/// Keyed table of live conversations.
///
/// Each conversation gets its own slot; holding the slot's lock for the whole
/// action serializes actions within one conversation without blocking others.
#[derive(Default)]
pub struct ConversationStore {
    conversations: RwLock<HashMap<ConversationId, Arc<Mutex<ConversationState>>>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot for `id`, created with the initial state on first interaction.
    pub async fn slot(&self, id: ConversationId) -> Arc<Mutex<ConversationState>> {
        if let Some(slot) = self.conversations.read().await.get(&id) {
            return slot.clone();
        }

        let mut conversations = self.conversations.write().await;
        conversations
            .entry(id)
            .or_insert_with(|| {
                debug!("Creating conversation state for {}", id);
                Arc::new(Mutex::new(ConversationState::default()))
            })
            .clone()
    }

    /// Drop the slot of a conversation that is back at the initial state.
    ///
    /// `slot` must be the caller's handle from [`ConversationStore::slot`]. The
    /// entry survives while another action holds a handle or the state moved on.
    pub async fn release(&self, id: ConversationId, slot: &Arc<Mutex<ConversationState>>) -> bool {
        let mut conversations = self.conversations.write().await;
        let Some(current) = conversations.get(&id) else {
            return false;
        };

        // One handle in the table, one held by the caller.
        let idle = Arc::ptr_eq(current, slot) && Arc::strong_count(slot) == 2;
        let is_initial = idle
            && slot
                .try_lock()
                .map_or(false, |state| *state == ConversationState::default());
        if !is_initial {
            return false;
        }

        conversations.remove(&id);
        debug!("Released conversation state for {}", id);
        true
    }

    pub async fn snapshot(&self, id: ConversationId) -> Option<ConversationState> {
        let slot = self.conversations.read().await.get(&id).cloned()?;
        let state = slot.lock().await;
        Some(state.clone())
    }

    pub async fn len(&self) -> usize {
        self.conversations.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Stage;

    #[tokio::test]
    async fn test_slot_is_created_once_per_conversation() {
        let store = ConversationStore::new();
        assert!(store.snapshot(1).await.is_none());

        let first = store.slot(1).await;
        first.lock().await.stage = Stage::ChoosingClinic;

        let again = store.slot(1).await;
        assert!(Arc::ptr_eq(&first, &again));
        assert_eq!(store.snapshot(1).await.unwrap().stage, Stage::ChoosingClinic);

        store.slot(2).await;
        assert_eq!(store.len().await, 2);
        assert_eq!(store.snapshot(2).await.unwrap(), ConversationState::default());
    }

    #[tokio::test]
    async fn test_release_drops_only_idle_initial_slots() {
        let store = ConversationStore::new();

        let slot = store.slot(1).await;
        slot.lock().await.stage = Stage::ChoosingClinic;
        assert!(!store.release(1, &slot).await);
        assert_eq!(store.len().await, 1);

        *slot.lock().await = ConversationState::default();
        let waiting = store.slot(1).await;
        assert!(!store.release(1, &slot).await);
        drop(waiting);

        assert!(store.release(1, &slot).await);
        assert_eq!(store.len().await, 0);
        assert!(store.snapshot(1).await.is_none());
    }
}
