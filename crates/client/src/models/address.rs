//! Saved delivery addresses.

use serde::{Deserialize, Serialize};

use dishdash_core::{AddressId, PhoneNumber};

/// A saved delivery address.
///
/// At most one address in the stored list carries `is_default`; the
/// address repository keeps exactly one default whenever the list is
/// non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: AddressId,
    /// Label such as `"Home"` or `"Work"`.
    pub name: String,
    /// Free-text street address.
    pub address: String,
    pub phone: PhoneNumber,
    #[serde(default)]
    pub is_default: bool,
}

/// Input for creating an address.
#[derive(Debug, Clone)]
pub struct NewAddress {
    pub name: String,
    pub address: String,
    pub phone: PhoneNumber,
    pub is_default: bool,
}

/// Partial update of an address. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct AddressChanges {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<PhoneNumber>,
}
