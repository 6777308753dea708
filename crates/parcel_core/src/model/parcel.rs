//! Parcel domain model.
//!
//! # Responsibility
//! - Define the shipment record persisted by the parcel store.
//! - Provide the checks the store and the service apply on writes.
//!
//! # Invariants
//! - `number` is `0` until the store assigns one; it is never reassigned.
//! - `created_at` is an RFC3339 UTC timestamp string.
//! - Any status spelling round-trips; only the three tracked ones have a
//!   successor.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned parcel identifier.
pub type ParcelNumber = i64;

/// Identifier of the client owning a parcel.
pub type ClientId = i64;

/// Lifecycle label of a parcel.
///
/// The tracked lifecycle is `registered -> sent -> delivered`. Any other
/// label is kept verbatim in `Other`; the store accepts every transition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ParcelStatus {
    /// Accepted for shipping, address may still change.
    Registered,
    /// Handed over to the carrier.
    Sent,
    /// Reached the recipient.
    Delivered,
    /// Label outside the tracked lifecycle, e.g. `returned`.
    ///
    /// Built through `From`, a tracked spelling never lands here.
    Other(String),
}

impl ParcelStatus {
    /// Returns the storage spelling of this status.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Registered => "registered",
            Self::Sent => "sent",
            Self::Delivered => "delivered",
            Self::Other(value) => value.as_str(),
        }
    }

    /// Returns the following status along `registered -> sent -> delivered`.
    ///
    /// `delivered` and labels outside the lifecycle yield `None`.
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Registered => Some(Self::Sent),
            Self::Sent => Some(Self::Delivered),
            Self::Delivered | Self::Other(_) => None,
        }
    }
}

impl From<&str> for ParcelStatus {
    fn from(value: &str) -> Self {
        match value {
            "registered" => Self::Registered,
            "sent" => Self::Sent,
            "delivered" => Self::Delivered,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for ParcelStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "registered" | "sent" | "delivered" => Self::from(value.as_str()),
            _ => Self::Other(value),
        }
    }
}

impl From<ParcelStatus> for String {
    fn from(value: ParcelStatus) -> Self {
        match value {
            ParcelStatus::Other(label) => label,
            tracked => tracked.as_str().to_string(),
        }
    }
}

impl Display for ParcelStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation failures for parcel records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParcelValidationError {
    /// Address is empty after trim. Enforced by the service, not the store.
    EmptyAddress,
    /// `created_at` is not an RFC3339 timestamp.
    InvalidCreatedAt(String),
}

impl Display for ParcelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyAddress => write!(f, "parcel address must not be blank"),
            Self::InvalidCreatedAt(value) => {
                write!(f, "parcel created_at `{value}` is not an RFC3339 timestamp")
            }
        }
    }
}

impl Error for ParcelValidationError {}

/// Tracked shipment record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parcel {
    /// Assigned by the store on insert; `0` before that.
    pub number: ParcelNumber,
    pub client: ClientId,
    pub status: ParcelStatus,
    /// Free-text shipping address.
    pub address: String,
    /// RFC3339 UTC creation time, e.g. `2024-05-01T10:00:00Z`.
    pub created_at: String,
}

impl Parcel {
    /// Creates an unsaved `registered` parcel with a caller-provided timestamp.
    pub fn new(client: ClientId, address: impl Into<String>, created_at: impl Into<String>) -> Self {
        Self {
            number: 0,
            client,
            status: ParcelStatus::Registered,
            address: address.into(),
            created_at: created_at.into(),
        }
    }

    /// Creates an unsaved `registered` parcel stamped with the current UTC time.
    pub fn register_now(client: ClientId, address: impl Into<String>) -> Self {
        Self::new(client, address, now_rfc3339())
    }

    /// Checks that `created_at` is an RFC3339 timestamp.
    ///
    /// `number`, `client`, `status` and `address` are free-form at this level.
    pub fn validate(&self) -> Result<(), ParcelValidationError> {
        if DateTime::parse_from_rfc3339(&self.created_at).is_err() {
            return Err(ParcelValidationError::InvalidCreatedAt(
                self.created_at.clone(),
            ));
        }
        Ok(())
    }
}

/// Rejects blank addresses.
pub fn validate_address(address: &str) -> Result<(), ParcelValidationError> {
    if address.trim().is_empty() {
        return Err(ParcelValidationError::EmptyAddress);
    }
    Ok(())
}

/// Formats the current UTC time the way parcels store `created_at`.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}
