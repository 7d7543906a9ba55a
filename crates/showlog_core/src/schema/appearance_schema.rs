//! Appearance schema.
//!
//! Representation:
//! `{ id, rating, episode_id, guest_id, links: { self, episode, guest } }`.
//! Nested under a parent, the parent's key and link are left out.

use crate::model::validation::RATING_RANGE;
use crate::model::{Appearance, AppearanceId, EpisodeId, GuestId};
use crate::schema::fields::{parse_slice, Payload};
use crate::schema::routes::{Route, RouteTable};
use crate::schema::{SchemaError, SchemaResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const FIELDS: &[&str] = &["id", "rating", "episode_id", "guest_id"];
const DUMP_ONLY: &[&str] = &["links"];
const RATING_MESSAGE: &str = "Rating must be between 1 and 5.";

/// Parent a nested appearance is rendered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NestedIn {
    Episode,
    Guest,
}

/// Wire representation of one appearance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppearanceRepr {
    pub id: AppearanceId,
    pub rating: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode_id: Option<EpisodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest_id: Option<GuestId>,
    pub links: AppearanceLinks,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppearanceLinks {
    #[serde(rename = "self")]
    pub self_link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest: Option<String>,
}

/// Loads and dumps appearances against one route table.
#[derive(Debug, Clone, Copy)]
pub struct AppearanceSchema<'r> {
    routes: &'r RouteTable,
}

impl<'r> AppearanceSchema<'r> {
    pub fn new(routes: &'r RouteTable) -> Self {
        Self { routes }
    }

    /// Renders a standalone appearance with both parent references.
    pub fn dump(&self, appearance: &Appearance) -> SchemaResult<AppearanceRepr> {
        self.render(appearance, None)
    }

    pub(crate) fn dump_nested(
        &self,
        appearance: &Appearance,
        parent: NestedIn,
    ) -> SchemaResult<AppearanceRepr> {
        self.render(appearance, Some(parent))
    }

    /// Validates `value` and builds an unpersisted (or id-carrying) appearance.
    ///
    /// The rating bound is checked here before the entity constructor runs.
    pub fn load(&self, value: &Value) -> SchemaResult<Appearance> {
        let mut payload = Payload::open(value, FIELDS, DUMP_ONLY)?;
        let id = payload.optional_id();
        let (rating, episode_id, guest_id) = read_fields(payload)?;
        Ok(match id {
            Some(id) => Appearance::with_id(id, rating, episode_id, guest_id)?,
            None => Appearance::new(rating, episode_id, guest_id)?,
        })
    }

    /// Loads the replacement fields for appearance `id`; a payload `id` is ignored.
    pub fn load_for_update(&self, id: AppearanceId, value: &Value) -> SchemaResult<Appearance> {
        let (rating, episode_id, guest_id) =
            read_fields(Payload::open(value, FIELDS, DUMP_ONLY)?)?;
        Ok(Appearance::with_id(id, rating, episode_id, guest_id)?)
    }

    /// Parses JSON bytes, then behaves like [`AppearanceSchema::load`].
    pub fn load_slice(&self, bytes: &[u8]) -> SchemaResult<Appearance> {
        self.load(&parse_slice(bytes)?)
    }

    fn render(
        &self,
        appearance: &Appearance,
        parent: Option<NestedIn>,
    ) -> SchemaResult<AppearanceRepr> {
        let id = appearance
            .id()
            .ok_or(SchemaError::Unpersisted("appearance"))?;
        let episode_id = appearance.episode_id();
        let guest_id = appearance.guest_id();
        let show_episode = parent != Some(NestedIn::Episode);
        let show_guest = parent != Some(NestedIn::Guest);

        let links = AppearanceLinks {
            self_link: self
                .routes
                .url_for(Route::SingleAppearance, &[("appearance_id", id)])?,
            episode: show_episode
                .then(|| {
                    self.routes
                        .url_for(Route::SingleEpisode, &[("episode_id", episode_id)])
                })
                .transpose()?,
            guest: show_guest
                .then(|| self.routes.url_for(Route::SingleGuest, &[("guest_id", guest_id)]))
                .transpose()?,
        };

        Ok(AppearanceRepr {
            id,
            rating: appearance.rating(),
            episode_id: show_episode.then_some(episode_id),
            guest_id: show_guest.then_some(guest_id),
            links,
        })
    }
}

fn read_fields(mut payload: Payload<'_>) -> SchemaResult<(i64, EpisodeId, GuestId)> {
    let rating = payload.required_int("rating");
    let episode_id = payload.required_int("episode_id");
    let guest_id = payload.required_int("guest_id");

    if let Some(rating) = rating {
        if !RATING_RANGE.contains(&rating) {
            payload.errors_mut().add("rating", RATING_MESSAGE);
        }
    }

    let values = rating
        .zip(episode_id)
        .zip(guest_id)
        .map(|((rating, episode_id), guest_id)| (rating, episode_id, guest_id));
    payload.finish(values)
}
