//! In-memory stores.
//!
//! Used by the router tests and by `SWEET_HOME_STORAGE=memory` for local runs.
//! Each method holds the lock for its whole operation, which gives the same
//! single-record atomicity the `PostgreSQL` statements have.

use std::cmp::Reverse;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use sweet_home_core::{
    Address, AddressId, AddressPatch, InteractionRecord, NewAddress, SessionRecord, UserId,
};

use super::{AddressStore, AnalyticsStore, RepositoryError};

/// Stored address plus its insertion sequence, used to break `created_at` ties.
struct Entry {
    seq: u64,
    address: Address,
}

#[derive(Default)]
struct AddressTable {
    next_seq: u64,
    entries: Vec<Entry>,
}

impl AddressTable {
    fn find_mut(&mut self, user_id: UserId, id: AddressId) -> Option<&mut Address> {
        self.entries
            .iter_mut()
            .map(|entry| &mut entry.address)
            .find(|address| address.id == id && address.user_id == user_id)
    }
}

/// Address store kept in process memory.
#[derive(Default)]
pub struct MemoryAddressStore {
    table: RwLock<AddressTable>,
}

impl MemoryAddressStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored addresses across all users.
    pub async fn len(&self) -> usize {
        self.table.read().await.entries.len()
    }

    /// Whether the store holds no addresses at all.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl AddressStore for MemoryAddressStore {
    async fn list(&self, user_id: UserId) -> Result<Vec<Address>, RepositoryError> {
        let table = self.table.read().await;

        let mut owned: Vec<&Entry> = table
            .entries
            .iter()
            .filter(|entry| entry.address.user_id == user_id)
            .collect();
        owned.sort_by_key(|entry| {
            (
                Reverse(entry.address.is_default),
                Reverse(entry.address.created_at),
                Reverse(entry.seq),
            )
        });

        Ok(owned.into_iter().map(|entry| entry.address.clone()).collect())
    }

    async fn create(&self, user_id: UserId, input: NewAddress) -> Result<Address, RepositoryError> {
        let mut table = self.table.write().await;

        let address = Address::from_new(AddressId::generate(), user_id, input, Utc::now());
        let seq = table.next_seq;
        table.next_seq += 1;
        table.entries.push(Entry {
            seq,
            address: address.clone(),
        });

        Ok(address)
    }

    async fn update(
        &self,
        user_id: UserId,
        id: AddressId,
        patch: AddressPatch,
    ) -> Result<Address, RepositoryError> {
        let mut table = self.table.write().await;
        let address = table
            .find_mut(user_id, id)
            .ok_or(RepositoryError::NotFound)?;

        patch.apply(address, Utc::now());
        Ok(address.clone())
    }

    async fn delete(&self, user_id: UserId, id: AddressId) -> Result<bool, RepositoryError> {
        let mut table = self.table.write().await;
        let before = table.entries.len();
        table
            .entries
            .retain(|entry| !(entry.address.id == id && entry.address.user_id == user_id));

        Ok(table.entries.len() < before)
    }

    async fn set_default(
        &self,
        user_id: UserId,
        id: AddressId,
    ) -> Result<Address, RepositoryError> {
        let mut table = self.table.write().await;
        let address = table
            .find_mut(user_id, id)
            .ok_or(RepositoryError::NotFound)?;

        address.is_default = true;
        address.updated_at = Utc::now();
        Ok(address.clone())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

/// Analytics store kept in process memory.
#[derive(Default)]
pub struct MemoryAnalyticsStore {
    interactions: RwLock<Vec<(Option<UserId>, InteractionRecord)>>,
    sessions: RwLock<Vec<(Option<UserId>, SessionRecord)>>,
}

impl MemoryAnalyticsStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of stored interactions in arrival order.
    pub async fn interactions(&self) -> Vec<(Option<UserId>, InteractionRecord)> {
        self.interactions.read().await.clone()
    }

    /// Snapshot of stored sessions in arrival order.
    pub async fn sessions(&self) -> Vec<(Option<UserId>, SessionRecord)> {
        self.sessions.read().await.clone()
    }
}

#[async_trait]
impl AnalyticsStore for MemoryAnalyticsStore {
    async fn record_interaction(
        &self,
        user_id: Option<UserId>,
        record: &InteractionRecord,
    ) -> Result<(), RepositoryError> {
        self.interactions
            .write()
            .await
            .push((user_id, record.clone()));
        Ok(())
    }

    async fn record_session(
        &self,
        user_id: Option<UserId>,
        record: &SessionRecord,
    ) -> Result<(), RepositoryError> {
        self.sessions.write().await.push((user_id, record.clone()));
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn new_address(name: &str, is_default: bool) -> NewAddress {
        NewAddress {
            name: name.to_owned(),
            phone: "555-0100".to_owned(),
            street: "1 Main St".to_owned(),
            city: "Pune".to_owned(),
            state: "MH".to_owned(),
            zipcode: "411001".to_owned(),
            country: "India".to_owned(),
            label: "home".to_owned(),
            is_default,
        }
    }

    #[tokio::test]
    async fn test_list_orders_defaults_first_then_newest() {
        let store = MemoryAddressStore::new();
        let user = UserId::generate();

        let t1 = store.create(user, new_address("t1", false)).await.unwrap();
        let t2 = store.create(user, new_address("t2", true)).await.unwrap();
        let t3 = store.create(user, new_address("t3", false)).await.unwrap();

        let listed: Vec<AddressId> = store
            .list(user)
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(listed, vec![t2.id, t3.id, t1.id]);
    }

    #[tokio::test]
    async fn test_list_is_scoped_to_user() {
        let store = MemoryAddressStore::new();
        let alice = UserId::generate();
        let bob = UserId::generate();

        store.create(alice, new_address("a", false)).await.unwrap();
        assert!(store.list(bob).await.unwrap().is_empty());
        assert_eq!(store.list(alice).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_cross_user_mutations_are_not_found() {
        let store = MemoryAddressStore::new();
        let alice = UserId::generate();
        let bob = UserId::generate();
        let address = store.create(alice, new_address("a", false)).await.unwrap();

        let patch = AddressPatch {
            city: Some("Elsewhere".to_owned()),
            ..AddressPatch::default()
        };
        assert!(matches!(
            store.update(bob, address.id, patch).await,
            Err(RepositoryError::NotFound)
        ));
        assert!(matches!(
            store.set_default(bob, address.id).await,
            Err(RepositoryError::NotFound)
        ));
        assert!(!store.delete(bob, address.id).await.unwrap());

        let untouched = store.list(alice).await.unwrap();
        assert_eq!(untouched, vec![address]);
    }

    #[tokio::test]
    async fn test_set_default_keeps_other_defaults() {
        let store = MemoryAddressStore::new();
        let user = UserId::generate();
        let first = store.create(user, new_address("first", true)).await.unwrap();
        let second = store.create(user, new_address("second", false)).await.unwrap();

        let updated = store.set_default(user, second.id).await.unwrap();
        assert!(updated.is_default);

        let listed = store.list(user).await.unwrap();
        assert!(listed.iter().all(|a| a.is_default));
        assert!(listed.iter().any(|a| a.id == first.id));
    }

    #[tokio::test]
    async fn test_second_delete_reports_missing() {
        let store = MemoryAddressStore::new();
        let user = UserId::generate();
        let address = store.create(user, new_address("a", false)).await.unwrap();

        assert!(store.delete(user, address.id).await.unwrap());
        assert!(!store.delete(user, address.id).await.unwrap());
        assert!(store.is_empty().await);
    }
}
