//! Shipping address types.
//!
//! An address always belongs to exactly one user. Nothing here enforces a
//! single default address per user: several records may carry `is_default`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{AddressId, UserId};

/// Label used when a new address does not specify one.
pub const DEFAULT_LABEL: &str = "home";

/// A persisted shipping address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Unique address ID.
    pub id: AddressId,
    /// User who owns this address.
    pub user_id: UserId,
    /// Recipient name.
    pub name: String,
    /// Contact phone number.
    pub phone: String,
    /// Street line.
    pub street: String,
    /// City or town.
    pub city: String,
    /// State or province.
    pub state: String,
    /// Postal code, stored as entered.
    pub zipcode: String,
    /// Country name; empty when the client omitted it.
    pub country: String,
    /// Free-text label such as "home" or "work".
    pub label: String,
    /// Whether the user marked this address as a default.
    pub is_default: bool,
    /// When the address was created.
    pub created_at: DateTime<Utc>,
    /// When the address was last modified.
    pub updated_at: DateTime<Utc>,
}

impl Address {
    /// Build a new record from client input.
    #[must_use]
    pub fn from_new(id: AddressId, user_id: UserId, input: NewAddress, now: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id,
            name: input.name,
            phone: input.phone,
            street: input.street,
            city: input.city,
            state: input.state,
            zipcode: input.zipcode,
            country: input.country,
            label: input.label,
            is_default: input.is_default,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Fields accepted when adding an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAddress {
    /// Recipient name.
    pub name: String,
    /// Contact phone number.
    pub phone: String,
    /// Street line.
    pub street: String,
    /// City or town.
    pub city: String,
    /// State or province.
    pub state: String,
    /// Postal code, stored as entered.
    pub zipcode: String,
    /// Country name; empty when omitted.
    #[serde(default)]
    pub country: String,
    /// Free-text label; defaults to [`DEFAULT_LABEL`].
    #[serde(default = "default_label")]
    pub label: String,
    /// Whether to mark the address as a default.
    #[serde(default)]
    pub is_default: bool,
}

fn default_label() -> String {
    DEFAULT_LABEL.to_owned()
}

/// Fields accepted when updating an address.
///
/// Absent fields leave the stored value unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zipcode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
}

impl AddressPatch {
    /// Apply the supplied fields to `address` and bump `updated_at`.
    pub fn apply(self, address: &mut Address, now: DateTime<Utc>) {
        fn set<T>(slot: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *slot = value;
            }
        }

        set(&mut address.name, self.name);
        set(&mut address.phone, self.phone);
        set(&mut address.street, self.street);
        set(&mut address.city, self.city);
        set(&mut address.state, self.state);
        set(&mut address.zipcode, self.zipcode);
        set(&mut address.country, self.country);
        set(&mut address.label, self.label);
        set(&mut address.is_default, self.is_default);
        address.updated_at = now;
    }
}
