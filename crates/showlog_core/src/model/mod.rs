//! Episode/guest/appearance domain model.
//!
//! # Responsibility
//! - Define the three persisted records and their field rules.
//! - Reject invalid values at construction and on every mutation.
//!
//! # Invariants
//! - A constructed entity always satisfies its field rules.
//! - Failed setters leave the entity unchanged.
//! - `id = None` means the entity has not been persisted yet.

pub mod appearance;
pub mod episode;
pub mod guest;
pub mod validation;

pub use appearance::{Appearance, AppearanceId};
pub use episode::{Episode, EpisodeId};
pub use guest::{Guest, GuestId};
pub use validation::ValidationError;
