//! Field validation rules shared by all entities.
//!
//! # Invariants
//! - Every rule failure maps to exactly one `ValidationError` variant.
//! - Each variant knows the wire field it concerns.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::ops::RangeInclusive;

/// Inclusive bounds for an appearance rating.
pub const RATING_RANGE: RangeInclusive<i64> = 1..=5;

/// Field-level validation failure raised on construction or mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Episode date is empty.
    MissingDate,
    /// Episode number is zero or negative.
    NonPositiveNumber(i64),
    /// Guest name is empty.
    MissingGuestName,
    /// Guest occupation is empty.
    MissingGuestOccupation,
    /// Rating falls outside `RATING_RANGE`.
    RatingOutOfRange(i64),
    /// Appearance episode reference is zero or negative.
    MissingEpisodeId,
    /// Appearance guest reference is zero or negative.
    MissingGuestId,
    /// Surrogate key is zero or negative.
    InvalidId(i64),
}

impl ValidationError {
    /// Wire field name this error belongs to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingDate => "date",
            Self::NonPositiveNumber(_) => "number",
            Self::MissingGuestName => "name",
            Self::MissingGuestOccupation => "occupation",
            Self::RatingOutOfRange(_) => "rating",
            Self::MissingEpisodeId => "episode_id",
            Self::MissingGuestId => "guest_id",
            Self::InvalidId(_) => "id",
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingDate => write!(f, "Date is required."),
            Self::NonPositiveNumber(_) => {
                write!(f, "Episode number must be a positive integer.")
            }
            Self::MissingGuestName => write!(f, "Guest name cannot be empty."),
            Self::MissingGuestOccupation => write!(f, "Guest occupation cannot be empty."),
            Self::RatingOutOfRange(_) => write!(f, "Rating must be between 1 and 5."),
            Self::MissingEpisodeId => write!(f, "Episode ID is required."),
            Self::MissingGuestId => write!(f, "Guest ID is required."),
            Self::InvalidId(_) => write!(f, "ID must be a positive integer."),
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn check_id(id: Option<i64>) -> Result<Option<i64>, ValidationError> {
    match id {
        Some(value) if value <= 0 => Err(ValidationError::InvalidId(value)),
        other => Ok(other),
    }
}

pub(crate) fn check_non_empty(
    value: String,
    missing: ValidationError,
) -> Result<String, ValidationError> {
    if value.is_empty() {
        Err(missing)
    } else {
        Ok(value)
    }
}

pub(crate) fn check_rating(rating: i64) -> Result<i64, ValidationError> {
    if RATING_RANGE.contains(&rating) {
        Ok(rating)
    } else {
        Err(ValidationError::RatingOutOfRange(rating))
    }
}

pub(crate) fn check_reference(
    value: i64,
    missing: ValidationError,
) -> Result<i64, ValidationError> {
    if value > 0 {
        Ok(value)
    } else {
        Err(missing)
    }
}
