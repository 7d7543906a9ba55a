//! Route identifiers and URL templates for representation links.
//!
//! # Responsibility
//! - Map each route identifier to a URL template.
//! - Build absolute URLs from entity identifiers.
//!
//! # Invariants
//! - `{name}` placeholders are filled from supplied parameters; a missing
//!   parameter is an error, never an empty segment.
//! - Parameters not consumed by the template become the query string, in
//!   the order supplied.

use crate::schema::{SchemaError, SchemaResult};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid placeholder regex"));

/// Named resource routes referenced by `links`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Route {
    SingleAppearance,
    SingleEpisode,
    SingleGuest,
    AppearanceCreation,
}

impl Route {
    pub const ALL: [Route; 4] = [
        Route::SingleAppearance,
        Route::SingleEpisode,
        Route::SingleGuest,
        Route::AppearanceCreation,
    ];

    /// Identifier the host router registers this route under.
    pub fn name(self) -> &'static str {
        match self {
            Self::SingleAppearance => "singleappearanceresource",
            Self::SingleEpisode => "singleepisoderesource",
            Self::SingleGuest => "singleguestresource",
            Self::AppearanceCreation => "appearancecreationresource",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|route| route.name() == name)
    }

    fn default_template(self) -> &'static str {
        match self {
            Self::SingleAppearance => "/appearances/{appearance_id}",
            Self::SingleEpisode => "/episodes/{episode_id}",
            Self::SingleGuest => "/guests/{guest_id}",
            Self::AppearanceCreation => "/appearances",
        }
    }
}

/// Route templates plus the absolute base URL they hang off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    base_url: String,
    templates: BTreeMap<Route, String>,
}

impl RouteTable {
    /// Creates a table with the default template for every route.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let templates = Route::ALL
            .into_iter()
            .map(|route| (route, route.default_template().to_string()))
            .collect();
        Self {
            base_url,
            templates,
        }
    }

    /// Replaces the template for `route`; the template must start with `/`.
    pub fn with_template(
        mut self,
        route: Route,
        template: impl Into<String>,
    ) -> SchemaResult<Self> {
        let template = template.into();
        if !template.starts_with('/') {
            return Err(SchemaError::InvalidTemplate {
                route: route.name(),
                template,
            });
        }
        self.templates.insert(route, template);
        Ok(self)
    }

    /// Replaces the template for the route registered as `name`.
    pub fn with_named_template(
        self,
        name: &str,
        template: impl Into<String>,
    ) -> SchemaResult<Self> {
        let route =
            Route::from_name(name).ok_or_else(|| SchemaError::UnknownRoute(name.to_string()))?;
        self.with_template(route, template)
    }

    pub fn template(&self, route: Route) -> &str {
        self.templates
            .get(&route)
            .map(String::as_str)
            .unwrap_or_else(|| route.default_template())
    }

    /// Builds the absolute URL for `route`.
    pub fn url_for(&self, route: Route, params: &[(&str, i64)]) -> SchemaResult<String> {
        let template = self.template(route);
        let mut consumed = Vec::new();
        for captures in PLACEHOLDER_RE.captures_iter(template) {
            let name = &captures[1];
            if !params.iter().any(|(key, _)| *key == name) {
                return Err(SchemaError::MissingRouteParam {
                    route: route.name(),
                    param: name.to_string(),
                });
            }
            consumed.push(name.to_string());
        }

        let path = PLACEHOLDER_RE.replace_all(template, |captures: &regex::Captures<'_>| {
            params
                .iter()
                .find(|(key, _)| *key == &captures[1])
                .map(|(_, value)| value.to_string())
                .unwrap_or_default()
        });

        let query = params
            .iter()
            .filter(|(key, _)| !consumed.iter().any(|name| name == key))
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>();

        let mut url = format!("{}{}", self.base_url, path);
        if !query.is_empty() {
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str(&query.join("&"));
        }
        Ok(url)
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new("http://localhost:5555")
    }
}
