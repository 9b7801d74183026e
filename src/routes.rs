use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use serde_json::json;
use stats_data::{DataService, ServiceResponse};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// HTTP surface over [`DataService`].
///
/// Lowercase paths are the canonical spelling. The PascalCase aliases keep
/// older clients working, which were written against controller-named routes
/// (`/api/League/GetLeagues`, `/api/Match/{leagueId}`, ...). Only the fixed
/// segments are aliased; path parameters keep their case.
pub fn router(data: DataService) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/league", get(leagues))
        .route("/api/League", get(leagues))
        .route("/api/league/getleagues", get(leagues))
        .route("/api/League/GetLeagues", get(leagues))
        .route("/api/match/{league_id}", get(matches_by_league))
        .route("/api/Match/{league_id}", get(matches_by_league))
        .route("/api/match/{league_id}/{brand_id}", get(matches_by_brand))
        .route("/api/Match/{league_id}/{brand_id}", get(matches_by_brand))
        .route("/api/brand/getbrandlist", get(brands))
        .route("/api/Brand/GetBrandList", get(brands))
        .route("/api/brand/getteamlistbybrandid/{brand_id}", get(team_list))
        .route("/api/Brand/GetTeamListByBrandId/{brand_id}", get(team_list))
        .with_state(data)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

// Status comes from `success` alone: an empty list that loaded fine is still a 200.
fn render<T: Serialize>(resp: ServiceResponse<T>) -> Response {
    let status = if resp.success { StatusCode::OK } else { StatusCode::BAD_GATEWAY };
    (status, Json(resp)).into_response()
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn leagues(State(data): State<DataService>) -> Response {
    render(data.get_leagues().await)
}

async fn matches_by_league(
    State(data): State<DataService>,
    Path(league_id): Path<String>,
) -> Response {
    render(data.get_matches_by_league_id(&league_id).await)
}

async fn matches_by_brand(
    State(data): State<DataService>,
    Path((league_id, brand_id)): Path<(String, String)>,
) -> Response {
    render(data.get_matches_by_brand_id(&league_id, &brand_id).await)
}

async fn brands(State(data): State<DataService>) -> Response {
    render(data.get_brands().await)
}

async fn team_list(State(data): State<DataService>, Path(brand_id): Path<String>) -> Response {
    render(data.get_team_list_by_brand_id(&brand_id).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use mockito::Server;
    use serde_json::Value;
    use stats_data::StatsConfig;
    use tower::ServiceExt;

    const TOKEN: &str = "?sig=abc";

    fn app(server: &Server) -> Router {
        router(DataService::new(StatsConfig::new(format!("{}/", server.url()), TOKEN)))
    }

    async fn call(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn health_is_ok() {
        let server = Server::new_async().await;
        let (status, body) = call(app(&server), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn leagues_render_the_envelope() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/leagues.json?sig=abc")
            .with_body(r#"[{"id":"L1","name":"Premier"}]"#)
            .create_async()
            .await;

        let (status, body) = call(app(&server), "/api/league").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "");
        assert_eq!(body["data"][0]["name"], "Premier");
    }

    #[tokio::test]
    async fn empty_upstream_list_is_still_200() {
        let mut server = Server::new_async().await;
        let _m = server.mock("GET", "/brands.json?sig=abc").with_body("[]").create_async().await;

        let (status, body) = call(app(&server), "/api/Brand/GetBrandList").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn upstream_failure_is_bad_gateway_with_envelope() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/brands/B9.json?sig=abc")
            .with_status(404)
            .create_async()
            .await;

        let (status, body) = call(app(&server), "/api/brand/getteamlistbybrandid/B9").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["success"], false);
        assert_eq!(body["data"], serde_json::json!([]));
        assert!(body["message"].as_str().unwrap().starts_with("An error occurred:"));
    }

    #[tokio::test]
    async fn branded_match_route_joins_brand_colours() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/leagues/L1.json?sig=abc")
            .with_body(
                r#"[{"id":"M1","gameWeek":3,"homeTeam":{"id":"T1","name":"Reds"},"awayTeam":{"id":"T2","name":"Blues"}}]"#,
            )
            .create_async()
            .await;
        let _b = server
            .mock("GET", "/brands/B1.json?sig=abc")
            .with_body(r##"[{"id":"TB1","teamId":"T1","name":"Red","primaryColor":"#F00"}]"##)
            .create_async()
            .await;

        let (status, body) = call(app(&server), "/api/match/L1/B1").await;

        assert_eq!(status, StatusCode::OK);
        let m = &body["data"][0];
        assert_eq!(m["gameWeek"], 3);
        assert_eq!(m["homeTeam"]["brand"]["name"], "Red");
        assert_eq!(m["homeTeam"]["brand"]["primaryColor"], "#F00");
        assert!(m["awayTeam"].get("brand").is_none());
    }

    #[tokio::test]
    async fn pascal_case_league_and_match_routes_resolve() {
        let mut server = Server::new_async().await;
        let _l = server
            .mock("GET", "/leagues.json?sig=abc")
            .with_body(r#"[{"id":"L1","name":"Premier"}]"#)
            .create_async()
            .await;
        let _m = server
            .mock("GET", "/leagues/Lx1.json?sig=abc")
            .with_body(r#"[{"id":"M1","homeTeam":{"id":"T1","name":"Reds"}}]"#)
            .create_async()
            .await;
        let _b = server
            .mock("GET", "/brands/Bx1.json?sig=abc")
            .with_body(r##"[{"teamId":"T1","name":"Red","primaryColor":"#F00"}]"##)
            .create_async()
            .await;

        for uri in ["/api/League", "/api/League/GetLeagues"] {
            let (status, body) = call(app(&server), uri).await;
            assert_eq!(status, StatusCode::OK, "{uri}");
            assert_eq!(body["data"][0]["id"], "L1");
        }

        let (status, body) = call(app(&server), "/api/Match/Lx1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"][0]["id"], "M1");

        // Parameters are passed through with their original case.
        let (status, body) = call(app(&server), "/api/Match/Lx1/Bx1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"][0]["homeTeam"]["brand"]["name"], "Red");
    }

    #[tokio::test]
    async fn plain_match_route_leaves_teams_unbranded() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/leagues/L1.json?sig=abc")
            .with_body(r#"[{"id":"M1","homeTeam":{"id":"T1","name":"Reds"}}]"#)
            .create_async()
            .await;

        let (status, body) = call(app(&server), "/api/match/L1").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert!(body["data"][0]["homeTeam"].get("brand").is_none());
    }
}
