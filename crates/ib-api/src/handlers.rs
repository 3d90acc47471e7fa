//! # ib-api Handlers
//!
//! This module coordinates the flow between HTTP requests and Core traits.

use actix_web::{web, HttpRequest, HttpResponse, Responder};
use ib_core::color::ColorStrategy;
use ib_core::error::AppError;
use ib_core::models::{GeoPoint, NewPost};
use ib_core::resolver::resolve_stone_id;
use ib_core::traits::StoneStore;
use serde::Deserialize;
use serde_json::json;

/// Rows returned by the debug listing.
const DEBUG_FEED_LIMIT: i64 = 100;

/// State shared across all Actix-web workers.
pub struct AppState {
    pub store: Box<dyn StoneStore>,
    pub colors: Box<dyn ColorStrategy>,
    pub maps: MapsConfig,
}

/// Frontend map configuration passed through verbatim.
#[derive(Debug, Clone, Default)]
pub struct MapsConfig {
    pub api_key: String,
    pub map_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub nickname: String,
    #[serde(default)]
    pub comment: String,
    pub post_location: Option<GeoPoint>,
    pub pin_color: Option<String>,
    /// Fallback when the API host itself does not name a stone.
    pub stone_id: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub stone_id: Option<String>,
}

/// Every endpoint resolves the stone the same way: request host first,
/// explicit `stoneId` field second.
fn resolve_from(req: &HttpRequest, fallback: Option<&str>) -> Option<String> {
    let host = req.connection_info().host().to_string();
    resolve_stone_id(&host, fallback)
}

fn error_response(err: AppError) -> HttpResponse {
    match &err {
        AppError::Unresolved => HttpResponse::BadRequest()
            .json(json!({ "error": "could not tell which stone this request is for" })),
        AppError::Validation(msg) => HttpResponse::BadRequest().json(json!({ "error": msg })),
        // Full detail stays in the server log; clients get a generic body.
        AppError::UnknownStone(_) | AppError::Storage(_) => {
            log::error!("storage failure: {err}");
            HttpResponse::InternalServerError().json(json!({ "error": "internal server error" }))
        }
    }
}

/// Liveness probe for "/".
pub async fn index() -> impl Responder {
    HttpResponse::Ok().json(json!({ "message": "ishi-board api" }))
}

/// The per-stone feed, newest post first.
pub async fn list_posts(
    data: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<ListQuery>,
) -> impl Responder {
    let stone_id = match resolve_from(&req, query.stone_id.as_deref()) {
        Some(id) => id,
        None => return error_response(AppError::Unresolved),
    };

    // A GET may be the first contact with a brand-new stone: provision it
    // here so its feed starts out empty instead of erroring.
    if let Err(err) = data.store.ensure_stone(&stone_id).await {
        return error_response(err);
    }

    match data.store.list_posts(&stone_id).await {
        Ok(posts) => HttpResponse::Ok().json(posts),
        Err(err) => error_response(err),
    }
}

/// Orchestrates the creation of a new post.
pub async fn create_post(
    data: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<CreatePostRequest>,
) -> impl Responder {
    let body = body.into_inner();

    // 1. Resolve which stone owns this post.
    let stone_id = match resolve_from(&req, body.stone_id.as_deref()) {
        Some(id) => id,
        None => return error_response(AppError::Unresolved),
    };

    // 2. Validate required fields.
    let nickname = body.nickname.trim().to_string();
    if nickname.is_empty() {
        return error_response(AppError::Validation("nickname is required".to_string()));
    }

    // 3. Provision the stone so the append below never dangles.
    if let Err(err) = data.store.ensure_stone(&stone_id).await {
        return error_response(err);
    }

    // 4. Pick a pin color from the stone's most recent post. Two racing
    //    posts may read the same latest row and end up on the same color;
    //    accepted, the color is a cosmetic grouping aid.
    let latest = match data.store.latest_post(&stone_id).await {
        Ok(latest) => latest,
        Err(err) => return error_response(err),
    };
    let pin_color = data.colors.assign(body.pin_color.as_deref(), &nickname, latest.as_ref());

    // 5. Append the immutable row.
    let new_post = NewPost {
        stone_id,
        nickname,
        comment: body.comment,
        post_location_lat: body.post_location.map(|p| p.lat),
        post_location_lng: body.post_location.map(|p| p.lng),
        user_id: body.user_id,
        pin_color,
    };
    match data.store.append_post(new_post).await {
        Ok(post) => HttpResponse::Ok().json(json!({ "success": true, "post": post })),
        Err(err) => error_response(err),
    }
}

/// Latest posts across all stones, for eyeballing the whole installation.
pub async fn debug_posts(data: web::Data<AppState>) -> impl Responder {
    match data.store.recent_posts(DEBUG_FEED_LIMIT).await {
        Ok(posts) => HttpResponse::Ok().json(posts),
        Err(err) => error_response(err),
    }
}

/// Destroys all data. Maintenance only.
pub async fn clear_all(data: web::Data<AppState>) -> impl Responder {
    match data.store.clear_all().await {
        Ok((posts, stones)) => HttpResponse::Ok().json(json!({
            "success": true,
            "message": "all posts and stones deleted",
            "deletedPosts": posts,
            "deletedStones": stones,
        })),
        Err(err) => error_response(err),
    }
}

pub async fn maps_config(data: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "apiKey": data.maps.api_key,
        "mapId": data.maps.map_id,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configure_routes;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use ib_core::color::{RotationStrategy, DEFAULT_PALETTE};
    use ib_db_sqlite::SqliteStoneStore;

    async fn test_state() -> web::Data<AppState> {
        let store = SqliteStoneStore::new("sqlite::memory:").await.unwrap();
        web::Data::new(AppState {
            store: Box::new(store),
            colors: Box::new(RotationStrategy::default()),
            maps: MapsConfig {
                api_key: "test-key".to_string(),
                map_id: "test-map".to_string(),
            },
        })
    }

    macro_rules! test_app {
        ($state:expr) => {
            test::init_service(App::new().app_data($state.clone()).configure(configure_routes)).await
        };
    }

    #[actix_web::test]
    async fn test_liveness() {
        let state = test_state().await;
        let app = test_app!(state);

        let req = test::TestRequest::get().uri("/").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["message"], "ishi-board api");
    }

    #[actix_web::test]
    async fn test_post_then_list_roundtrip() {
        let state = test_state().await;
        let app = test_app!(state);

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(("Host", "isi7.example.com"))
            .set_json(json!({ "nickname": "alice", "comment": "hi" }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["success"], true);
        assert_eq!(body["post"]["stoneId"], "stone-007");
        assert_eq!(body["post"]["nickname"], "alice");
        assert_eq!(body["post"]["comment"], "hi");
        assert_eq!(body["post"]["pinColor"], DEFAULT_PALETTE[0]);

        let req = test::TestRequest::get()
            .uri("/api/posts")
            .insert_header(("Host", "isi7.example.com"))
            .to_request();
        let feed: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        let feed = feed.as_array().unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0]["nickname"], "alice");
    }

    #[actix_web::test]
    async fn test_second_author_rotates_color() {
        let state = test_state().await;
        let app = test_app!(state);

        for (nick, expected) in [("alice", DEFAULT_PALETTE[0]), ("bob", DEFAULT_PALETTE[1])] {
            let req = test::TestRequest::post()
                .uri("/api/posts")
                .insert_header(("Host", "isi7.example.com"))
                .set_json(json!({ "nickname": nick }))
                .to_request();
            let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
            assert_eq!(body["post"]["pinColor"], expected);
        }
    }

    #[actix_web::test]
    async fn test_stone_id_fallback_on_neutral_host() {
        let state = test_state().await;
        let app = test_app!(state);

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(("Host", "api.example.com"))
            .set_json(json!({ "nickname": "alice", "stoneId": "stone-042" }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["post"]["stoneId"], "stone-042");

        let req = test::TestRequest::get()
            .uri("/api/posts?stoneId=stone-042")
            .insert_header(("Host", "api.example.com"))
            .to_request();
        let feed: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(feed.as_array().unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn test_unresolved_host_is_rejected() {
        let state = test_state().await;
        let app = test_app!(state);

        let req = test::TestRequest::get()
            .uri("/api/posts")
            .insert_header(("Host", "api.example.com"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_blank_nickname_is_rejected() {
        let state = test_state().await;
        let app = test_app!(state);

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(("Host", "isi7.example.com"))
            .set_json(json!({ "nickname": "   " }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_debug_posts_spans_stones() {
        let state = test_state().await;
        let app = test_app!(state);

        for host in ["isi1.example.com", "isi2.example.com"] {
            let req = test::TestRequest::post()
                .uri("/api/posts")
                .insert_header(("Host", host))
                .set_json(json!({ "nickname": "alice" }))
                .to_request();
            test::call_service(&app, req).await;
        }

        let req = test::TestRequest::get().uri("/api/debug/posts").to_request();
        let posts: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(posts.as_array().unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn test_clear_all_then_fresh_feed() {
        let state = test_state().await;
        let app = test_app!(state);

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(("Host", "isi7.example.com"))
            .set_json(json!({ "nickname": "alice" }))
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::delete().uri("/api/debug/clear-all").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["deletedPosts"], 1);
        assert_eq!(body["deletedStones"], 1);

        let req = test::TestRequest::get()
            .uri("/api/posts")
            .insert_header(("Host", "isi7.example.com"))
            .to_request();
        let feed: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert!(feed.as_array().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_maps_config_passthrough() {
        let state = test_state().await;
        let app = test_app!(state);

        let req = test::TestRequest::get().uri("/api/google-maps-config").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["apiKey"], "test-key");
        assert_eq!(body["mapId"], "test-map");
    }
}
