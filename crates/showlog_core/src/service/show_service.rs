//! Episode/guest/appearance use-case service.
//!
//! # Responsibility
//! - Accept JSON payloads, persist validated entities, return representations.
//! - Resolve nested appearances for episode and guest representations.
//!
//! # Invariants
//! - A payload that fails schema load never reaches a repository.
//! - Service APIs never bypass repository reference checks or cascades.
//! - Log events carry ids and field names only, never field contents.

use crate::model::{AppearanceId, EpisodeId, GuestId, ValidationError};
use crate::repo::appearance_repo::{AppearanceRepository, SqliteAppearanceRepository};
use crate::repo::episode_repo::{EpisodeRepository, SqliteEpisodeRepository};
use crate::repo::guest_repo::{GuestRepository, SqliteGuestRepository};
use crate::repo::RepoError;
use crate::schema::{
    AppearanceRepr, AppearanceSchema, EpisodeRepr, EpisodeSchema, GuestRepr, GuestSchema,
    RouteTable, SchemaError,
};
use log::{info, warn};
use rusqlite::Connection;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors from show service operations.
#[derive(Debug)]
pub enum ServiceError {
    /// Payload failed load, or a representation could not be built.
    Schema(SchemaError),
    /// Target record does not exist.
    NotFound { entity: &'static str, id: i64 },
    /// Repository-level failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Schema(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Schema(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::NotFound { .. } => None,
        }
    }
}

impl From<SchemaError> for ServiceError {
    fn from(value: SchemaError) -> Self {
        Self::Schema(value)
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Schema(value.into())
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { entity, id } => Self::NotFound { entity, id },
            other => Self::Repo(other),
        }
    }
}

/// Service facade over the three entity repositories.
pub struct ShowService<E, G, A> {
    episodes: E,
    guests: G,
    appearances: A,
    routes: RouteTable,
}

/// Service wired to SQLite repositories sharing one connection.
pub type SqliteShowService<'conn> = ShowService<
    SqliteEpisodeRepository<'conn>,
    SqliteGuestRepository<'conn>,
    SqliteAppearanceRepository<'conn>,
>;

impl<'conn> SqliteShowService<'conn> {
    /// Builds all three repositories over `conn`.
    pub fn open(conn: &'conn Connection, routes: RouteTable) -> ServiceResult<Self> {
        Ok(Self::new(
            SqliteEpisodeRepository::try_new(conn)?,
            SqliteGuestRepository::try_new(conn)?,
            SqliteAppearanceRepository::try_new(conn)?,
            routes,
        ))
    }
}

impl<E, G, A> ShowService<E, G, A>
where
    E: EpisodeRepository,
    G: GuestRepository,
    A: AppearanceRepository,
{
    pub fn new(episodes: E, guests: G, appearances: A, routes: RouteTable) -> Self {
        Self {
            episodes,
            guests,
            appearances,
            routes,
        }
    }

    pub fn create_episode(&self, payload: &Value) -> ServiceResult<EpisodeRepr> {
        let episode = log_rejection("episode_create", self.episode_schema().load(payload))?;
        let stored = self.episodes.create_episode(&episode)?;
        let id = stored.id().unwrap_or_default();
        info!("event=episode_create module=service status=ok episode_id={id}");
        Ok(self.episode_schema().dump(&stored, &[])?)
    }

    /// Replaces the fields of episode `id`; any id in the payload is ignored.
    pub fn update_episode(&self, id: EpisodeId, payload: &Value) -> ServiceResult<EpisodeRepr> {
        let episode = log_rejection(
            "episode_update",
            self.episode_schema().load_for_update(id, payload),
        )?;
        self.episodes.update_episode(&episode)?;
        info!("event=episode_update module=service status=ok episode_id={id}");
        self.episode(id)
    }

    pub fn episode(&self, id: EpisodeId) -> ServiceResult<EpisodeRepr> {
        let episode = self.episodes.get_episode(id)?.ok_or(ServiceError::NotFound {
            entity: "episode",
            id,
        })?;
        let appearances = self.appearances.list_for_episode(id)?;
        Ok(self.episode_schema().dump(&episode, &appearances)?)
    }

    pub fn episodes(&self) -> ServiceResult<Vec<EpisodeRepr>> {
        let appearances = self.appearances.list_appearances()?;
        self.episodes
            .list_episodes()?
            .iter()
            .map(|episode| {
                self.episode_schema()
                    .dump(episode, &appearances)
                    .map_err(ServiceError::from)
            })
            .collect()
    }

    /// Deletes episode `id` and its appearances; returns appearances removed.
    pub fn delete_episode(&self, id: EpisodeId) -> ServiceResult<usize> {
        Ok(self.episodes.delete_episode(id)?)
    }

    pub fn create_guest(&self, payload: &Value) -> ServiceResult<GuestRepr> {
        let guest = log_rejection("guest_create", self.guest_schema().load(payload))?;
        let stored = self.guests.create_guest(&guest)?;
        let id = stored.id().unwrap_or_default();
        info!("event=guest_create module=service status=ok guest_id={id}");
        Ok(self.guest_schema().dump(&stored, &[])?)
    }

    /// Replaces the fields of guest `id`; any id in the payload is ignored.
    pub fn update_guest(&self, id: GuestId, payload: &Value) -> ServiceResult<GuestRepr> {
        let guest = log_rejection(
            "guest_update",
            self.guest_schema().load_for_update(id, payload),
        )?;
        self.guests.update_guest(&guest)?;
        info!("event=guest_update module=service status=ok guest_id={id}");
        self.guest(id)
    }

    pub fn guest(&self, id: GuestId) -> ServiceResult<GuestRepr> {
        let guest = self
            .guests
            .get_guest(id)?
            .ok_or(ServiceError::NotFound { entity: "guest", id })?;
        let appearances = self.appearances.list_for_guest(id)?;
        Ok(self.guest_schema().dump(&guest, &appearances)?)
    }

    pub fn guests(&self) -> ServiceResult<Vec<GuestRepr>> {
        let appearances = self.appearances.list_appearances()?;
        self.guests
            .list_guests()?
            .iter()
            .map(|guest| {
                self.guest_schema()
                    .dump(guest, &appearances)
                    .map_err(ServiceError::from)
            })
            .collect()
    }

    /// Deletes guest `id` and its appearances; returns appearances removed.
    pub fn delete_guest(&self, id: GuestId) -> ServiceResult<usize> {
        Ok(self.guests.delete_guest(id)?)
    }

    pub fn create_appearance(&self, payload: &Value) -> ServiceResult<AppearanceRepr> {
        let appearance =
            log_rejection("appearance_create", self.appearance_schema().load(payload))?;
        let stored = self.appearances.create_appearance(&appearance)?;
        let id = stored.id().unwrap_or_default();
        info!(
            "event=appearance_create module=service status=ok appearance_id={id} episode_id={} guest_id={}",
            stored.episode_id(),
            stored.guest_id()
        );
        Ok(self.appearance_schema().dump(&stored)?)
    }

    /// Replaces the fields of appearance `id`; any id in the payload is ignored.
    pub fn update_appearance(
        &self,
        id: AppearanceId,
        payload: &Value,
    ) -> ServiceResult<AppearanceRepr> {
        let appearance = log_rejection(
            "appearance_update",
            self.appearance_schema().load_for_update(id, payload),
        )?;
        self.appearances.update_appearance(&appearance)?;
        info!("event=appearance_update module=service status=ok appearance_id={id}");
        self.appearance(id)
    }

    pub fn appearance(&self, id: AppearanceId) -> ServiceResult<AppearanceRepr> {
        let appearance = self
            .appearances
            .get_appearance(id)?
            .ok_or(ServiceError::NotFound {
                entity: "appearance",
                id,
            })?;
        Ok(self.appearance_schema().dump(&appearance)?)
    }

    pub fn appearances(&self) -> ServiceResult<Vec<AppearanceRepr>> {
        self.appearances
            .list_appearances()?
            .iter()
            .map(|appearance| {
                self.appearance_schema()
                    .dump(appearance)
                    .map_err(ServiceError::from)
            })
            .collect()
    }

    pub fn delete_appearance(&self, id: AppearanceId) -> ServiceResult<()> {
        Ok(self.appearances.delete_appearance(id)?)
    }

    fn episode_schema(&self) -> EpisodeSchema<'_> {
        EpisodeSchema::new(&self.routes)
    }

    fn guest_schema(&self) -> GuestSchema<'_> {
        GuestSchema::new(&self.routes)
    }

    fn appearance_schema(&self) -> AppearanceSchema<'_> {
        AppearanceSchema::new(&self.routes)
    }
}

fn log_rejection<T>(event: &str, loaded: Result<T, SchemaError>) -> ServiceResult<T> {
    loaded.map_err(|err| {
        let fields = err
            .field_errors()
            .map(|errors| errors.iter().map(|(field, _)| field).collect::<Vec<_>>().join(","))
            .unwrap_or_default();
        warn!("event={event} module=service status=rejected error_fields={fields}");
        ServiceError::Schema(err)
    })
}
