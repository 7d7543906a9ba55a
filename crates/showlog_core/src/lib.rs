//! Core data layer for showlog: episodes, guests and the appearances
//! linking them.
//! This crate is the single source of truth for field rules and
//! representation shapes.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod schema;
pub mod service;

pub use config::{ConfigError, DatabaseConfig, LinkConfig, LoggingConfig, ShowlogConfig};
pub use logging::{default_log_level, init_from_config, init_logging, logging_status};
pub use model::{
    Appearance, AppearanceId, Episode, EpisodeId, Guest, GuestId, ValidationError,
};
pub use repo::appearance_repo::{AppearanceRepository, SqliteAppearanceRepository};
pub use repo::episode_repo::{EpisodeRepository, SqliteEpisodeRepository};
pub use repo::guest_repo::{GuestRepository, SqliteGuestRepository};
pub use repo::{RepoError, RepoResult};
pub use schema::{
    AppearanceRepr, AppearanceSchema, EpisodeRepr, EpisodeSchema, FieldErrors, GuestRepr,
    GuestSchema, Route, RouteTable, SchemaError,
};
pub use service::show_service::{ServiceError, ServiceResult, ShowService, SqliteShowService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
