//! Guest schema.
//!
//! Representation:
//! `{ id, name, occupation, appearance_list: [..], links: { self, appearances } }`.

use crate::model::{Appearance, Guest, GuestId};
use crate::schema::appearance_schema::{AppearanceRepr, AppearanceSchema, NestedIn};
use crate::schema::fields::{parse_slice, Payload};
use crate::schema::routes::{Route, RouteTable};
use crate::schema::{SchemaError, SchemaResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const FIELDS: &[&str] = &["id", "name", "occupation"];
const DUMP_ONLY: &[&str] = &["links", "appearance_list"];

/// Wire representation of one guest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestRepr {
    pub id: GuestId,
    pub name: String,
    pub occupation: String,
    pub appearance_list: Vec<AppearanceRepr>,
    pub links: GuestLinks,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestLinks {
    #[serde(rename = "self")]
    pub self_link: String,
    pub appearances: String,
}

/// Loads and dumps guests against one route table.
#[derive(Debug, Clone, Copy)]
pub struct GuestSchema<'r> {
    routes: &'r RouteTable,
}

impl<'r> GuestSchema<'r> {
    pub fn new(routes: &'r RouteTable) -> Self {
        Self { routes }
    }

    /// Renders `guest` with the appearances that belong to it, listed by id.
    pub fn dump(&self, guest: &Guest, appearances: &[Appearance]) -> SchemaResult<GuestRepr> {
        let id = guest.id().ok_or(SchemaError::Unpersisted("guest"))?;

        let mut related: Vec<&Appearance> = appearances
            .iter()
            .filter(|appearance| appearance.guest_id() == id)
            .collect();
        related.sort_by_key(|appearance| appearance.id());

        let nested = AppearanceSchema::new(self.routes);
        let appearance_list = related
            .into_iter()
            .map(|appearance| nested.dump_nested(appearance, NestedIn::Guest))
            .collect::<SchemaResult<Vec<_>>>()?;

        Ok(GuestRepr {
            id,
            name: guest.name().to_string(),
            occupation: guest.occupation().to_string(),
            appearance_list,
            links: GuestLinks {
                self_link: self
                    .routes
                    .url_for(Route::SingleGuest, &[("guest_id", id)])?,
                appearances: self
                    .routes
                    .url_for(Route::AppearanceCreation, &[("guest_id", id)])?,
            },
        })
    }

    pub fn load(&self, value: &Value) -> SchemaResult<Guest> {
        let mut payload = Payload::open(value, FIELDS, DUMP_ONLY)?;
        let id = payload.optional_id();
        let (name, occupation) = read_fields(payload)?;
        Ok(match id {
            Some(id) => Guest::with_id(id, name, occupation)?,
            None => Guest::new(name, occupation)?,
        })
    }

    /// Loads the replacement fields for guest `id`; a payload `id` is ignored.
    pub fn load_for_update(&self, id: GuestId, value: &Value) -> SchemaResult<Guest> {
        let (name, occupation) = read_fields(Payload::open(value, FIELDS, DUMP_ONLY)?)?;
        Ok(Guest::with_id(id, name, occupation)?)
    }

    pub fn load_slice(&self, bytes: &[u8]) -> SchemaResult<Guest> {
        self.load(&parse_slice(bytes)?)
    }
}

fn read_fields(mut payload: Payload<'_>) -> SchemaResult<(String, String)> {
    let name = payload.required_str("name");
    let occupation = payload.required_str("occupation");
    payload.finish(name.zip(occupation))
}
