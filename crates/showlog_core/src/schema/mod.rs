//! Wire-format schemas for episodes, guests and appearances.
//!
//! # Responsibility
//! - `load`: turn a JSON payload into a validated entity or per-field errors.
//! - `dump`: turn an entity into its representation with `links` and, for
//!   episodes and guests, nested appearances.
//!
//! # Invariants
//! - Field lists are written out per schema; nothing is discovered at runtime.
//! - Nested appearances never carry a reference back to their parent.
//! - A failed load has no side effects.

use crate::model::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod appearance_schema;
pub mod episode_schema;
mod fields;
pub mod guest_schema;
pub mod routes;

pub use appearance_schema::{AppearanceLinks, AppearanceRepr, AppearanceSchema};
pub use episode_schema::{EpisodeLinks, EpisodeRepr, EpisodeSchema};
pub use guest_schema::{GuestLinks, GuestRepr, GuestSchema};
pub use routes::{Route, RouteTable};

pub type SchemaResult<T> = Result<T, SchemaError>;

/// Key used for errors that concern the payload as a whole.
pub const SCHEMA_ERROR_KEY: &str = "_schema";

/// Validation messages grouped by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Records an entity-level failure under the field it concerns.
    pub fn add_validation(&mut self, err: &ValidationError) {
        self.add(err.field(), err.to_string());
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }
}

impl Display for FieldErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, messages) in self.iter() {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Errors raised while loading or dumping representations.
#[derive(Debug)]
pub enum SchemaError {
    /// Payload failed field or entity validation.
    Invalid(FieldErrors),
    /// Payload bytes are not JSON.
    Malformed(serde_json::Error),
    /// Entity has no id, so its links cannot be built.
    Unpersisted(&'static str),
    /// Route template needs a parameter the caller did not supply.
    MissingRouteParam {
        route: &'static str,
        param: String,
    },
    /// Route name is not one of the known identifiers.
    UnknownRoute(String),
    /// Route template is not a path starting with `/`.
    InvalidTemplate {
        route: &'static str,
        template: String,
    },
}

impl SchemaError {
    /// Returns field errors when this is a validation failure.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Invalid(errors) => Some(errors),
            _ => None,
        }
    }
}

impl Display for SchemaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(errors) => write!(f, "validation failed: {errors}"),
            Self::Malformed(err) => write!(f, "malformed payload: {err}"),
            Self::Unpersisted(entity) => {
                write!(f, "{entity} has no id; links need a persisted record")
            }
            Self::MissingRouteParam { route, param } => {
                write!(f, "route `{route}` requires parameter `{param}`")
            }
            Self::UnknownRoute(name) => write!(f, "unknown route `{name}`"),
            Self::InvalidTemplate { route, template } => {
                write!(f, "route `{route}` template `{template}` must start with `/`")
            }
        }
    }
}

impl Error for SchemaError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Malformed(err) => Some(err),
            _ => None,
        }
    }
}

impl From<FieldErrors> for SchemaError {
    fn from(value: FieldErrors) -> Self {
        Self::Invalid(value)
    }
}

impl From<ValidationError> for SchemaError {
    fn from(value: ValidationError) -> Self {
        let mut errors = FieldErrors::new();
        errors.add_validation(&value);
        Self::Invalid(errors)
    }
}

impl From<serde_json::Error> for SchemaError {
    fn from(value: serde_json::Error) -> Self {
        Self::Malformed(value)
    }
}
