// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ownership enforcement for single-record access.
//!
//! Every read or delete of one specific record passes through
//! [`OwnershipEnforcer::authorize_owner`]. Listings never do: they are
//! answered from the owner index, so other users' records are never touched.

use uuid::Uuid;

use super::Identity;

/// Why access to a specific record was refused.
#[derive(Debug, Clone, Copy, thiserror::Error, PartialEq, Eq)]
pub enum AccessError {
    #[error("resource not found")]
    NotFound,

    #[error("resource belongs to another user")]
    NotOwner,
}

/// Trait for resources that have an owner.
pub trait OwnedResource {
    /// Identity id recorded as the owner at creation time.
    fn owner_id(&self) -> Uuid;
}

impl<T: OwnedResource> OwnedResource for &T {
    fn owner_id(&self) -> Uuid {
        (**self).owner_id()
    }
}

/// Trait for enforcing ownership on storage operations.
pub trait OwnershipEnforcer {
    /// Allow iff the resource owner is the given identity.
    ///
    /// # Errors
    /// Returns `AccessError::NotOwner` if the identity doesn't own the resource.
    fn authorize_owner(&self, identity: &Identity) -> Result<(), AccessError>;
}

impl<T: OwnedResource> OwnershipEnforcer for T {
    fn authorize_owner(&self, identity: &Identity) -> Result<(), AccessError> {
        if self.owner_id() == identity.id {
            Ok(())
        } else {
            Err(AccessError::NotOwner)
        }
    }
}

/// Lookup-then-authorize in one step.
pub trait OwnershipCheck<T> {
    /// Verify ownership and return the resource if authorized.
    fn verify_owner(self, identity: &Identity) -> Result<T, AccessError>;
}

impl<T: OwnedResource> OwnershipCheck<T> for Option<T> {
    fn verify_owner(self, identity: &Identity) -> Result<T, AccessError> {
        let resource = self.ok_or(AccessError::NotFound)?;
        resource.authorize_owner(identity)?;
        Ok(resource)
    }
}
