//! Saved address repository.
//!
//! Invariant: whenever at least one address exists, exactly one of them is
//! the default. Every mutation re-establishes it before writing.

use std::sync::Arc;

use chrono::{TimeDelta, Utc};
use tokio::sync::Mutex;
use tracing::instrument;

use dishdash_core::AddressId;

use crate::error::{AppError, Result};
use crate::models::{Address, AddressChanges, NewAddress};
use crate::storage::{self, KeyValueStore, keys};

/// Repository for the user's delivery addresses.
pub struct AddressRepository {
    store: Arc<dyn KeyValueStore>,
    addresses: Mutex<Vec<Address>>,
}

impl AddressRepository {
    /// Create an empty repository. Call [`Self::load`] to read stored addresses.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            addresses: Mutex::new(Vec::new()),
        }
    }

    /// Load stored addresses, repairing the default flag if needed.
    ///
    /// A repaired list is kept in memory only; it is written back on the
    /// next mutation.
    #[instrument(skip(self))]
    pub async fn load(&self) -> usize {
        let mut loaded: Vec<Address> =
            storage::load_or_default(self.store.as_ref(), keys::USER_ADDRESSES).await;
        if normalize_default(&mut loaded, None) {
            tracing::warn!("Stored addresses had no single default, repaired");
        }
        let count = loaded.len();
        *self.addresses.lock().await = loaded;
        count
    }

    /// All addresses in insertion order.
    pub async fn all(&self) -> Vec<Address> {
        self.addresses.lock().await.clone()
    }

    /// Look up an address by ID.
    pub async fn get(&self, id: &AddressId) -> Option<Address> {
        self.addresses
            .lock()
            .await
            .iter()
            .find(|a| &a.id == id)
            .cloned()
    }

    /// The default address, if any address exists.
    pub async fn default_address(&self) -> Option<Address> {
        self.addresses
            .lock()
            .await
            .iter()
            .find(|a| a.is_default)
            .cloned()
    }

    /// Save a new address.
    ///
    /// The first address always becomes the default; a later one becomes
    /// the default only when `is_default` is set.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for a blank name or address, or
    /// `AppError::Storage` if the write fails.
    #[instrument(skip(self, new), fields(name = %new.name))]
    pub async fn add(&self, new: NewAddress) -> Result<Address> {
        let name = required("name", &new.name)?;
        let address = required("address", &new.address)?;

        let mut addresses = self.addresses.lock().await;
        let id = unique_id(&addresses);
        let mut next = addresses.clone();
        next.push(Address {
            id: id.clone(),
            name,
            address,
            phone: new.phone,
            is_default: new.is_default,
        });
        let preferred = new.is_default.then_some(&id);
        normalize_default(&mut next, preferred);
        let created = next
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("address {id}")))?;

        self.persist(&next).await?;
        *addresses = next;
        tracing::info!(address_id = %created.id, is_default = created.is_default, "Address saved");
        Ok(created)
    }

    /// Edit an address. The default flag is changed via [`Self::set_default`].
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` for an unknown ID, `AppError::Validation`
    /// for a blank name or address, or `AppError::Storage` if the write fails.
    #[instrument(skip(self, changes))]
    pub async fn update(&self, id: &AddressId, changes: AddressChanges) -> Result<Address> {
        let name = changes.name.as_deref().map(|n| required("name", n)).transpose()?;
        let street = changes
            .address
            .as_deref()
            .map(|a| required("address", a))
            .transpose()?;

        let mut addresses = self.addresses.lock().await;
        let mut next = addresses.clone();
        let target = next
            .iter_mut()
            .find(|a| &a.id == id)
            .ok_or_else(|| AppError::NotFound(format!("address {id}")))?;

        if let Some(name) = name {
            target.name = name;
        }
        if let Some(street) = street {
            target.address = street;
        }
        if let Some(phone) = changes.phone {
            target.phone = phone;
        }
        let updated = target.clone();

        self.persist(&next).await?;
        *addresses = next;
        Ok(updated)
    }

    /// Delete an address. If it was the default, the first remaining
    /// address becomes the default.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` for an unknown ID, or `AppError::Storage`
    /// if the write fails.
    #[instrument(skip(self))]
    pub async fn remove(&self, id: &AddressId) -> Result<()> {
        let mut addresses = self.addresses.lock().await;
        if !addresses.iter().any(|a| &a.id == id) {
            return Err(AppError::NotFound(format!("address {id}")));
        }

        let mut next: Vec<Address> = addresses.iter().filter(|a| &a.id != id).cloned().collect();
        normalize_default(&mut next, None);

        self.persist(&next).await?;
        *addresses = next;
        Ok(())
    }

    /// Make an address the default, clearing the flag on all others.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` for an unknown ID, or `AppError::Storage`
    /// if the write fails.
    #[instrument(skip(self))]
    pub async fn set_default(&self, id: &AddressId) -> Result<Address> {
        let mut addresses = self.addresses.lock().await;
        if !addresses.iter().any(|a| &a.id == id) {
            return Err(AppError::NotFound(format!("address {id}")));
        }

        let mut next = addresses.clone();
        normalize_default(&mut next, Some(id));
        let updated = next
            .iter()
            .find(|a| &a.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("address {id}")))?;

        self.persist(&next).await?;
        *addresses = next;
        Ok(updated)
    }

    async fn persist(&self, addresses: &[Address]) -> Result<()> {
        storage::set_json(self.store.as_ref(), keys::USER_ADDRESSES, addresses).await?;
        Ok(())
    }
}

/// Enforce exactly one default on a non-empty list.
///
/// `preferred` wins when given; otherwise the first address already marked
/// default keeps it, falling back to the first address. Returns whether any
/// flag changed.
fn normalize_default(addresses: &mut [Address], preferred: Option<&AddressId>) -> bool {
    let chosen = preferred
        .and_then(|id| addresses.iter().position(|a| &a.id == id))
        .or_else(|| addresses.iter().position(|a| a.is_default))
        .or_else(|| (!addresses.is_empty()).then_some(0));

    let mut changed = false;
    for (i, address) in addresses.iter_mut().enumerate() {
        let should_be_default = Some(i) == chosen;
        if address.is_default != should_be_default {
            address.is_default = should_be_default;
            changed = true;
        }
    }
    changed
}

/// Timestamp-derived ID, bumped a millisecond at a time until it is unused.
fn unique_id(existing: &[Address]) -> AddressId {
    let mut at = Utc::now();
    loop {
        let id = AddressId::from_timestamp(at);
        if !existing.iter().any(|a| a.id == id) {
            return id;
        }
        at += TimeDelta::milliseconds(1);
    }
}

fn required(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(trimmed.to_owned())
}
