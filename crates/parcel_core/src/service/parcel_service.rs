//! Parcel tracking use-case service.
//!
//! # Responsibility
//! - Register parcels and advance them through their delivery lifecycle.
//! - Enforce tracker rules the store intentionally does not know about.
//!
//! # Invariants
//! - Status only moves forward: `registered -> sent -> delivered`.
//! - Address changes and deletion are allowed only while `registered`.
//! - Addresses written through the service are never blank.
//! - Service APIs never bypass store validation.

use crate::model::parcel::{
    validate_address, ClientId, Parcel, ParcelNumber, ParcelStatus, ParcelValidationError,
};
use crate::repo::parcel_repo::{ParcelStore, RepoError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from parcel service operations.
#[derive(Debug)]
pub enum ParcelServiceError {
    /// Operation requires a `registered` parcel.
    NotRegistered {
        number: ParcelNumber,
        status: ParcelStatus,
    },
    /// Input rejected before reaching the store.
    Validation(ParcelValidationError),
    /// Store-level failure, including `NotFound`.
    Repo(RepoError),
}

impl Display for ParcelServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotRegistered { number, status } => write!(
                f,
                "parcel {number} is `{status}`; only `registered` parcels can be changed"
            ),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ParcelServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotRegistered { .. } => None,
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<ParcelValidationError> for ParcelServiceError {
    fn from(value: ParcelValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ParcelServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

pub type ParcelServiceResult<T> = Result<T, ParcelServiceError>;

/// Use-case service wrapper over a parcel store.
pub struct ParcelService<S: ParcelStore> {
    store: S,
}

impl<S: ParcelStore> ParcelService<S> {
    /// Creates a service using the provided store implementation.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Registers a new parcel for `client`, stamped with the current time.
    ///
    /// # Contract
    /// - Status is `registered`.
    /// - Blank addresses are rejected with `Validation`.
    /// - Returned parcel carries the store-assigned number.
    pub fn register(
        &self,
        client: ClientId,
        address: impl Into<String>,
    ) -> ParcelServiceResult<Parcel> {
        let address = address.into();
        validate_address(&address)?;
        let mut parcel = Parcel::register_now(client, address);
        parcel.number = self.store.add(&parcel)?;
        info!(
            "event=parcel_register module=service status=ok number={} client={}",
            parcel.number, parcel.client
        );
        Ok(parcel)
    }

    pub fn get(&self, number: ParcelNumber) -> ParcelServiceResult<Parcel> {
        Ok(self.store.get(number)?)
    }

    /// Lists all parcels owned by `client`.
    pub fn client_parcels(&self, client: ClientId) -> ParcelServiceResult<Vec<Parcel>> {
        Ok(self.store.get_by_client(client)?)
    }

    /// Moves a parcel to its next status.
    ///
    /// Returns the new status, or `None` when the parcel is `delivered` or
    /// carries a label outside the lifecycle (nothing is written then).
    pub fn next_status(&self, number: ParcelNumber) -> ParcelServiceResult<Option<ParcelStatus>> {
        let parcel = self.store.get(number)?;
        let Some(next) = parcel.status.next() else {
            return Ok(None);
        };

        self.store.set_status(number, next.clone())?;
        info!(
            "event=parcel_status module=service status=ok number={number} from={} to={next}",
            parcel.status
        );
        Ok(Some(next))
    }

    /// Replaces the address of a `registered` parcel with a non-blank one.
    pub fn change_address(&self, number: ParcelNumber, address: &str) -> ParcelServiceResult<()> {
        validate_address(address)?;
        self.ensure_registered(number)?;
        self.store.set_address(number, address)?;
        info!("event=parcel_address module=service status=ok number={number}");
        Ok(())
    }

    /// Deletes a `registered` parcel.
    pub fn delete(&self, number: ParcelNumber) -> ParcelServiceResult<()> {
        self.ensure_registered(number)?;
        self.store.delete(number)?;
        info!("event=parcel_delete module=service status=ok number={number}");
        Ok(())
    }

    fn ensure_registered(&self, number: ParcelNumber) -> ParcelServiceResult<()> {
        let parcel = self.store.get(number)?;
        if parcel.status != ParcelStatus::Registered {
            return Err(ParcelServiceError::NotRegistered {
                number,
                status: parcel.status,
            });
        }
        Ok(())
    }
}
