//! Guest entity.
//!
//! # Invariants
//! - `name` and `occupation` are never empty.

use crate::model::validation::{check_id, check_non_empty, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Surrogate key of a persisted guest.
pub type GuestId = i64;

/// A person who appears on episodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GuestRecord", into = "GuestRecord")]
pub struct Guest {
    id: Option<GuestId>,
    name: String,
    occupation: String,
}

#[derive(Serialize, Deserialize)]
struct GuestRecord {
    #[serde(default)]
    id: Option<GuestId>,
    name: String,
    occupation: String,
}

impl Guest {
    /// Creates an unpersisted guest.
    pub fn new(
        name: impl Into<String>,
        occupation: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Self::build(None, name.into(), occupation.into())
    }

    /// Creates a guest carrying an existing surrogate key.
    pub fn with_id(
        id: GuestId,
        name: impl Into<String>,
        occupation: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Self::build(Some(id), name.into(), occupation.into())
    }

    fn build(
        id: Option<GuestId>,
        name: String,
        occupation: String,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id: check_id(id)?,
            name: check_non_empty(name, ValidationError::MissingGuestName)?,
            occupation: check_non_empty(occupation, ValidationError::MissingGuestOccupation)?,
        })
    }

    /// Returns a copy of this guest keyed by `id`.
    pub fn persisted_as(&self, id: GuestId) -> Result<Self, ValidationError> {
        Ok(Self {
            id: check_id(Some(id))?,
            ..self.clone()
        })
    }

    pub fn id(&self) -> Option<GuestId> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn occupation(&self) -> &str {
        &self.occupation
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), ValidationError> {
        self.name = check_non_empty(name.into(), ValidationError::MissingGuestName)?;
        Ok(())
    }

    pub fn set_occupation(&mut self, occupation: impl Into<String>) -> Result<(), ValidationError> {
        self.occupation =
            check_non_empty(occupation.into(), ValidationError::MissingGuestOccupation)?;
        Ok(())
    }
}

impl TryFrom<GuestRecord> for Guest {
    type Error = ValidationError;

    fn try_from(value: GuestRecord) -> Result<Self, Self::Error> {
        Self::build(value.id, value.name, value.occupation)
    }
}

impl From<Guest> for GuestRecord {
    fn from(value: Guest) -> Self {
        Self {
            id: value.id,
            name: value.name,
            occupation: value.occupation,
        }
    }
}

impl Display for Guest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "<Guest {}, Occupation: {}>", self.name, self.occupation)
    }
}
