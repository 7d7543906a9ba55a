//! Episode entity.
//!
//! # Invariants
//! - `date` is never empty.
//! - `number` is strictly positive.

use crate::model::validation::{check_id, check_non_empty, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Surrogate key of a persisted episode.
pub type EpisodeId = i64;

/// One published show episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EpisodeRecord", into = "EpisodeRecord")]
pub struct Episode {
    id: Option<EpisodeId>,
    date: String,
    number: i64,
}

#[derive(Serialize, Deserialize)]
struct EpisodeRecord {
    #[serde(default)]
    id: Option<EpisodeId>,
    date: String,
    number: i64,
}

impl Episode {
    /// Creates an unpersisted episode.
    pub fn new(date: impl Into<String>, number: i64) -> Result<Self, ValidationError> {
        Self::build(None, date.into(), number)
    }

    /// Creates an episode carrying an existing surrogate key.
    pub fn with_id(
        id: EpisodeId,
        date: impl Into<String>,
        number: i64,
    ) -> Result<Self, ValidationError> {
        Self::build(Some(id), date.into(), number)
    }

    fn build(id: Option<EpisodeId>, date: String, number: i64) -> Result<Self, ValidationError> {
        let mut episode = Self {
            id: check_id(id)?,
            date: check_non_empty(date, ValidationError::MissingDate)?,
            number: 0,
        };
        episode.set_number(number)?;
        Ok(episode)
    }

    /// Returns a copy of this episode keyed by `id`.
    pub fn persisted_as(&self, id: EpisodeId) -> Result<Self, ValidationError> {
        Ok(Self {
            id: check_id(Some(id))?,
            ..self.clone()
        })
    }

    pub fn id(&self) -> Option<EpisodeId> {
        self.id
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn number(&self) -> i64 {
        self.number
    }

    pub fn set_date(&mut self, date: impl Into<String>) -> Result<(), ValidationError> {
        self.date = check_non_empty(date.into(), ValidationError::MissingDate)?;
        Ok(())
    }

    pub fn set_number(&mut self, number: i64) -> Result<(), ValidationError> {
        if number <= 0 {
            return Err(ValidationError::NonPositiveNumber(number));
        }
        self.number = number;
        Ok(())
    }
}

impl TryFrom<EpisodeRecord> for Episode {
    type Error = ValidationError;

    fn try_from(value: EpisodeRecord) -> Result<Self, Self::Error> {
        Self::build(value.id, value.date, value.number)
    }
}

impl From<Episode> for EpisodeRecord {
    fn from(value: Episode) -> Self {
        Self {
            id: value.id,
            date: value.date,
            number: value.number,
        }
    }
}

impl Display for Episode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "<Episode {} on {}>", self.number, self.date)
    }
}
