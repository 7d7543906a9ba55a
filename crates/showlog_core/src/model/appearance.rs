//! Appearance join entity.
//!
//! # Responsibility
//! - Record one guest's appearance on one episode, with a rating.
//!
//! # Invariants
//! - `rating` lies within `RATING_RANGE`.
//! - `episode_id` and `guest_id` are positive. Whether the referenced rows
//!   exist is checked by the repository, not here.

use crate::model::episode::EpisodeId;
use crate::model::guest::GuestId;
use crate::model::validation::{check_id, check_rating, check_reference, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Surrogate key of a persisted appearance.
pub type AppearanceId = i64;

/// Guest-on-episode record carrying a 1..=5 rating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AppearanceRecord", into = "AppearanceRecord")]
pub struct Appearance {
    id: Option<AppearanceId>,
    rating: i64,
    episode_id: EpisodeId,
    guest_id: GuestId,
}

#[derive(Serialize, Deserialize)]
struct AppearanceRecord {
    #[serde(default)]
    id: Option<AppearanceId>,
    rating: i64,
    episode_id: EpisodeId,
    guest_id: GuestId,
}

impl Appearance {
    /// Creates an unpersisted appearance.
    pub fn new(
        rating: i64,
        episode_id: EpisodeId,
        guest_id: GuestId,
    ) -> Result<Self, ValidationError> {
        Self::build(None, rating, episode_id, guest_id)
    }

    /// Creates an appearance carrying an existing surrogate key.
    pub fn with_id(
        id: AppearanceId,
        rating: i64,
        episode_id: EpisodeId,
        guest_id: GuestId,
    ) -> Result<Self, ValidationError> {
        Self::build(Some(id), rating, episode_id, guest_id)
    }

    fn build(
        id: Option<AppearanceId>,
        rating: i64,
        episode_id: EpisodeId,
        guest_id: GuestId,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id: check_id(id)?,
            rating: check_rating(rating)?,
            episode_id: check_reference(episode_id, ValidationError::MissingEpisodeId)?,
            guest_id: check_reference(guest_id, ValidationError::MissingGuestId)?,
        })
    }

    /// Returns a copy of this appearance keyed by `id`.
    pub fn persisted_as(&self, id: AppearanceId) -> Result<Self, ValidationError> {
        Ok(Self {
            id: check_id(Some(id))?,
            ..self.clone()
        })
    }

    pub fn id(&self) -> Option<AppearanceId> {
        self.id
    }

    pub fn rating(&self) -> i64 {
        self.rating
    }

    pub fn episode_id(&self) -> EpisodeId {
        self.episode_id
    }

    pub fn guest_id(&self) -> GuestId {
        self.guest_id
    }

    pub fn set_rating(&mut self, rating: i64) -> Result<(), ValidationError> {
        self.rating = check_rating(rating)?;
        Ok(())
    }

    pub fn set_episode_id(&mut self, episode_id: EpisodeId) -> Result<(), ValidationError> {
        self.episode_id = check_reference(episode_id, ValidationError::MissingEpisodeId)?;
        Ok(())
    }

    pub fn set_guest_id(&mut self, guest_id: GuestId) -> Result<(), ValidationError> {
        self.guest_id = check_reference(guest_id, ValidationError::MissingGuestId)?;
        Ok(())
    }
}

impl TryFrom<AppearanceRecord> for Appearance {
    type Error = ValidationError;

    fn try_from(value: AppearanceRecord) -> Result<Self, Self::Error> {
        Self::build(value.id, value.rating, value.episode_id, value.guest_id)
    }
}

impl From<Appearance> for AppearanceRecord {
    fn from(value: Appearance) -> Self {
        Self {
            id: value.id,
            rating: value.rating,
            episode_id: value.episode_id,
            guest_id: value.guest_id,
        }
    }
}

impl Display for Appearance {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "<Appearance: Guest ID {}, Episode ID {}, Rating {}>",
            self.guest_id, self.episode_id, self.rating
        )
    }
}
