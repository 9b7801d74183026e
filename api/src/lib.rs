pub mod client;
mod de;
pub mod service;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use client::{ApiError, ApiResult, BlobClient, ErrorKind, StatsConfig};
pub use service::DataService;

// ---------------------------------------------------------------------------
// Domain types. Field names follow the camelCase blob documents.
// ---------------------------------------------------------------------------

/// A league as listed in `leagues.json`.
///
/// Anything beyond `id` and `name` is display metadata the client may use;
/// it is kept as-is so the response mirrors the upstream document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct League {
    #[serde(default, deserialize_with = "de::id")]
    pub id: String,
    #[serde(default, deserialize_with = "de::or_default")]
    pub name: String,
    #[serde(flatten)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

/// A fixture from `leagues/{leagueId}.json`. The league is implied by the path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    #[serde(default, deserialize_with = "de::id")]
    pub id: String,
    #[serde(default, with = "de::date")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de::or_default")]
    pub game_week: i32,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub home_team: Option<Team>,
    #[serde(default)]
    pub away_team: Option<Team>,
}

impl Match {
    pub fn teams_mut(&mut self) -> impl Iterator<Item = &mut Team> {
        self.home_team.iter_mut().chain(self.away_team.iter_mut())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Team {
    #[serde(default, deserialize_with = "de::id")]
    pub id: String,
    #[serde(default, deserialize_with = "de::or_default")]
    pub name: String,
    /// Only ever set by the brand join; absent otherwise, never zero-valued.
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub brand: Option<MatchBrand>,
}

/// Brand annotation attached to a team.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchBrand {
    pub name: String,
    pub primary_color: String,
}

impl From<&TeamBrand> for MatchBrand {
    fn from(tb: &TeamBrand) -> Self {
        Self { name: tb.name.clone(), primary_color: tb.primary_color.clone() }
    }
}

/// A brand from `brands.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    #[serde(default, deserialize_with = "de::id")]
    pub id: String,
    #[serde(default, deserialize_with = "de::or_default")]
    pub name: String,
    #[serde(default, deserialize_with = "de::or_default")]
    pub primary_color: String,
    #[serde(default, deserialize_with = "de::ids")]
    pub team_ids: Vec<String>,
}

/// One team's membership in a brand, from `brands/{brandId}.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamBrand {
    #[serde(default, deserialize_with = "de::id")]
    pub id: String,
    #[serde(default, deserialize_with = "de::id")]
    pub team_id: String,
    #[serde(default, deserialize_with = "de::or_default")]
    pub name: String,
    #[serde(default, deserialize_with = "de::or_default")]
    pub primary_color: String,
}

// ---------------------------------------------------------------------------
// Result envelope
// ---------------------------------------------------------------------------

/// Envelope returned by every [`DataService`] operation.
///
/// `data` is always present. A failed fetch and an upstream `[]` both give an
/// empty `data`; only `success` and `message` tell them apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceResponse<T> {
    pub data: Vec<T>,
    pub success: bool,
    pub message: String,
}

impl<T> ServiceResponse<T> {
    pub fn ok(data: Vec<T>) -> Self {
        Self { data, success: true, message: String::new() }
    }

    pub fn failure(err: &ApiError) -> Self {
        let message = match err.kind() {
            ErrorKind::Network => format!("An error occurred: {err}"),
            ErrorKind::Unexpected => format!("An unexpected error occurred: {err}"),
        };
        Self { data: Vec::new(), success: false, message }
    }
}

impl<T> From<ApiResult<Vec<T>>> for ServiceResponse<T> {
    fn from(result: ApiResult<Vec<T>>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::failure(&e),
        }
    }
}
