//! Episode schema.
//!
//! Representation:
//! `{ id, date, number, appearance_list: [..], links: { self, appearances } }`.

use crate::model::{Appearance, Episode, EpisodeId};
use crate::schema::appearance_schema::{AppearanceRepr, AppearanceSchema, NestedIn};
use crate::schema::fields::{parse_slice, Payload};
use crate::schema::routes::{Route, RouteTable};
use crate::schema::{SchemaError, SchemaResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const FIELDS: &[&str] = &["id", "date", "number"];
const DUMP_ONLY: &[&str] = &["links", "appearance_list"];

/// Wire representation of one episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeRepr {
    pub id: EpisodeId,
    pub date: String,
    pub number: i64,
    pub appearance_list: Vec<AppearanceRepr>,
    pub links: EpisodeLinks,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeLinks {
    #[serde(rename = "self")]
    pub self_link: String,
    pub appearances: String,
}

/// Loads and dumps episodes against one route table.
#[derive(Debug, Clone, Copy)]
pub struct EpisodeSchema<'r> {
    routes: &'r RouteTable,
}

impl<'r> EpisodeSchema<'r> {
    pub fn new(routes: &'r RouteTable) -> Self {
        Self { routes }
    }

    /// Renders `episode` with the appearances that belong to it.
    ///
    /// Appearances of other episodes are skipped; the rest are listed by id.
    pub fn dump(
        &self,
        episode: &Episode,
        appearances: &[Appearance],
    ) -> SchemaResult<EpisodeRepr> {
        let id = episode.id().ok_or(SchemaError::Unpersisted("episode"))?;

        let mut related: Vec<&Appearance> = appearances
            .iter()
            .filter(|appearance| appearance.episode_id() == id)
            .collect();
        related.sort_by_key(|appearance| appearance.id());

        let nested = AppearanceSchema::new(self.routes);
        let appearance_list = related
            .into_iter()
            .map(|appearance| nested.dump_nested(appearance, NestedIn::Episode))
            .collect::<SchemaResult<Vec<_>>>()?;

        Ok(EpisodeRepr {
            id,
            date: episode.date().to_string(),
            number: episode.number(),
            appearance_list,
            links: EpisodeLinks {
                self_link: self
                    .routes
                    .url_for(Route::SingleEpisode, &[("episode_id", id)])?,
                appearances: self
                    .routes
                    .url_for(Route::AppearanceCreation, &[("episode_id", id)])?,
            },
        })
    }

    pub fn load(&self, value: &Value) -> SchemaResult<Episode> {
        let mut payload = Payload::open(value, FIELDS, DUMP_ONLY)?;
        let id = payload.optional_id();
        let (date, number) = read_fields(payload)?;
        Ok(match id {
            Some(id) => Episode::with_id(id, date, number)?,
            None => Episode::new(date, number)?,
        })
    }

    /// Loads the replacement fields for episode `id`; a payload `id` is ignored.
    pub fn load_for_update(&self, id: EpisodeId, value: &Value) -> SchemaResult<Episode> {
        let (date, number) = read_fields(Payload::open(value, FIELDS, DUMP_ONLY)?)?;
        Ok(Episode::with_id(id, date, number)?)
    }

    pub fn load_slice(&self, bytes: &[u8]) -> SchemaResult<Episode> {
        self.load(&parse_slice(bytes)?)
    }
}

fn read_fields(mut payload: Payload<'_>) -> SchemaResult<(String, i64)> {
    let date = payload.required_str("date");
    let number = payload.required_int("number");
    payload.finish(date.zip(number))
}
