use crate::client::{ApiError, ApiResult, BlobClient, StatsConfig};
use crate::{Brand, League, Match, MatchBrand, ServiceResponse, TeamBrand};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use std::collections::HashMap;

const LEAGUES_PATH: &str = "leagues.json";
const BRANDS_PATH: &str = "brands.json";

fn league_path(league_id: &str) -> String {
    format!("leagues/{league_id}.json")
}

fn brand_path(brand_id: &str) -> String {
    format!("brands/{brand_id}.json")
}

/// Read-only view over the league/match/brand documents.
///
/// Every operation returns a [`ServiceResponse`] and never an error: failures
/// are folded into `success = false` plus a message. Nothing is cached, so
/// each call reflects the documents as they are at that moment.
#[derive(Debug, Clone)]
pub struct DataService {
    client: BlobClient,
}

impl DataService {
    pub fn new(config: StatsConfig) -> Self {
        Self::with_client(BlobClient::new(config))
    }

    pub fn with_client(client: BlobClient) -> Self {
        Self { client }
    }

    pub async fn get_leagues(&self) -> ServiceResponse<League> {
        respond("leagues", self.load(LEAGUES_PATH).await)
    }

    pub async fn get_matches_by_league_id(&self, league_id: &str) -> ServiceResponse<Match> {
        respond("matches", self.load(&league_path(league_id)).await)
    }

    pub async fn get_brands(&self) -> ServiceResponse<Brand> {
        respond("brands", self.load(BRANDS_PATH).await)
    }

    pub async fn get_team_list_by_brand_id(&self, brand_id: &str) -> ServiceResponse<TeamBrand> {
        respond("team brands", self.load(&brand_path(brand_id)).await)
    }

    /// Matches for a league with each team tagged by its brand, if it has one.
    ///
    /// An empty `brand_id` skips the brand lookup and returns the plain match
    /// list. If the brand document cannot be loaded the whole call fails;
    /// unenriched matches are never reported as a success.
    pub async fn get_matches_by_brand_id(
        &self,
        league_id: &str,
        brand_id: &str,
    ) -> ServiceResponse<Match> {
        respond("branded matches", self.branded_matches(league_id, brand_id).await)
    }

    async fn branded_matches(&self, league_id: &str, brand_id: &str) -> ApiResult<Vec<Match>> {
        let mut matches: Vec<Match> = self.load(&league_path(league_id)).await?;
        if brand_id.is_empty() {
            return Ok(matches);
        }

        let team_brands: Vec<TeamBrand> = self.load(&brand_path(brand_id)).await?;
        apply_brands(&mut matches, &team_brands);
        Ok(matches)
    }

    /// Fetch a document and read it as a JSON array. A `null` document is
    /// treated as an empty list.
    async fn load<T: DeserializeOwned>(&self, path: &str) -> ApiResult<Vec<T>> {
        let body = self.client.fetch(path).await?;
        let items: Option<Vec<T>> = serde_json::from_str(&body)
            .map_err(|e| ApiError::Parsing(e, self.client.config().display_url(path)))?;
        let items = items.unwrap_or_default();
        debug!("{path}: {} entries", items.len());
        Ok(items)
    }
}

fn respond<T>(what: &str, result: ApiResult<Vec<T>>) -> ServiceResponse<T> {
    if let Err(e) = &result {
        warn!("loading {what} failed: {e}");
    }
    result.into()
}

/// Attach brand colours to the home and away team of every match.
///
/// Teams are matched on `TeamBrand::team_id`; when a team appears more than
/// once in `team_brands` the first entry is used. Teams without an entry end
/// up with no brand. Records with an empty team id (a `null` upstream) never
/// match anything.
pub fn apply_brands(matches: &mut [Match], team_brands: &[TeamBrand]) {
    let mut by_team: HashMap<&str, &TeamBrand> = HashMap::with_capacity(team_brands.len());
    for tb in team_brands.iter().filter(|tb| !tb.team_id.is_empty()) {
        by_team.entry(tb.team_id.as_str()).or_insert(tb);
    }

    for m in matches.iter_mut() {
        for team in m.teams_mut() {
            team.brand = by_team.get(team.id.as_str()).map(|tb| MatchBrand::from(*tb));
        }
    }
}
