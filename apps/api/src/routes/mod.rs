pub mod health;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::intake::handlers as intake;
use crate::library::handlers as library;
use crate::parents::handlers as parents;
use crate::recommendation::handlers as recommendation;
use crate::rewards::handlers as rewards;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Parents
        .route(
            "/api/v1/parents/:id",
            get(parents::handle_get_parent).put(parents::handle_upsert_parent),
        )
        // Intake
        .route("/api/v1/intake", post(intake::handle_submit_intake))
        .route("/api/v1/intake/:parent_id", get(intake::handle_get_intake))
        .route(
            "/api/v1/intake/:parent_id/confirmation",
            get(intake::handle_get_confirmation),
        )
        // Recommendations
        .route("/api/v1/subjects", get(recommendation::handle_list_subjects))
        .route(
            "/api/v1/recommendations",
            get(recommendation::handle_get_recommendation),
        )
        .route(
            "/api/v1/recommendations/selection",
            post(recommendation::handle_toggle_selection),
        )
        .route(
            "/api/v1/recommendations/confirm",
            post(recommendation::handle_confirm_selection),
        )
        // Resource library
        .route(
            "/api/v1/resources",
            get(library::handle_list_resources).post(library::handle_create_resource),
        )
        .route(
            "/api/v1/resources/:id",
            get(library::handle_get_resource).delete(library::handle_delete_resource),
        )
        .route(
            "/api/v1/resources/:id/favorite",
            post(library::handle_toggle_favorite),
        )
        .route("/api/v1/favorites", get(library::handle_list_favorites))
        .route(
            "/api/v1/collections",
            get(library::handle_list_collections).post(library::handle_create_collection),
        )
        .route(
            "/api/v1/collections/:id",
            delete(library::handle_delete_collection),
        )
        .route(
            "/api/v1/collections/:id/resources",
            get(library::handle_collection_resources),
        )
        .route(
            "/api/v1/collections/:id/resources/:resource_id",
            put(library::handle_add_to_collection).delete(library::handle_remove_from_collection),
        )
        // Rewards
        .route("/api/v1/rewards/catalog", get(rewards::handle_reward_catalog))
        .route("/api/v1/students/:id/rewards", get(rewards::handle_get_rewards))
        .route("/api/v1/students/:id/coins", post(rewards::handle_adjust_coins))
        .route(
            "/api/v1/students/:id/streak",
            put(rewards::handle_set_streak).delete(rewards::handle_reset_streak),
        )
        .route("/api/v1/students/:id/redeem", post(rewards::handle_redeem))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::store::{MemoryStore, Store};

    async fn app_with_parent() -> (Router, Uuid) {
        let store = MemoryStore::new();
        let parent_id = Uuid::new_v4();
        store
            .upsert_parent(parent_id, "Jordan Rivera", None)
            .await
            .unwrap();
        let state = AppState {
            store: Arc::new(store),
        };
        (build_router(state), parent_id)
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                builder = builder.header("content-type", "application/json");
                Body::from(serde_json::to_vec(&v).unwrap())
            }
            None => Body::empty(),
        };
        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_health_reports_store() {
        let (app, _) = app_with_parent().await;
        let (status, body) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["store"], "memory");
    }

    #[tokio::test]
    async fn test_unknown_parent_is_404() {
        let (app, _) = app_with_parent().await;
        let uri = format!("/api/v1/parents/{}", Uuid::new_v4());
        let (status, body) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_intake_confirmation_renders_roster_verbatim() {
        let (app, parent_id) = app_with_parent().await;
        let students = json!([
            { "name": "Ava Grace", "grade_level": "4th" },
            { "name": "leo", "grade_level": "Kindergarten (age 5)" }
        ]);

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/intake",
            Some(json!({ "parent_id": parent_id, "students": students })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["students"], students);

        let uri = format!("/api/v1/intake/{parent_id}/confirmation");
        let (status, body) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["students"], students);
        assert_eq!(body["parent_name"], "Jordan Rivera");
        assert_eq!(body["gpa_text"], "No specific target");
    }

    #[tokio::test]
    async fn test_intake_for_unknown_parent_rejected() {
        let (app, _) = app_with_parent().await;
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/v1/intake",
            Some(json!({ "parent_id": Uuid::new_v4() })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_recommendation_unknown_subject_falls_back_to_math() {
        let (app, _) = app_with_parent().await;
        let (status, body) = send(
            &app,
            Method::GET,
            "/api/v1/recommendations?subject=basket-weaving",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["subject"], "math");
        assert_eq!(body["preferences"]["gpa_text"], "No specific target");
        assert_eq!(body["runner_ups"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_confirm_requires_exactly_one_selection() {
        let (app, parent_id) = app_with_parent().await;

        for selected in [json!([]), json!(["math-quest", "math-video-tutor"])] {
            let (status, _) = send(
                &app,
                Method::POST,
                "/api/v1/recommendations/confirm",
                Some(json!({ "parent_id": parent_id, "subject": "math", "selected": selected })),
            )
            .await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        }

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/recommendations/confirm",
            Some(json!({ "parent_id": parent_id, "subject": "math", "selected": ["math-quest"] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["platform"]["id"], "math-quest");

        let uri = format!("/api/v1/recommendations?parent_id={parent_id}&subject=math");
        let (_, body) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(body["current_choice"], "math-quest");
    }

    #[tokio::test]
    async fn test_coin_removal_clamps_at_zero() {
        let (app, _) = app_with_parent().await;
        let uri = format!("/api/v1/students/{}/coins", Uuid::new_v4());

        send(
            &app,
            Method::POST,
            &uri,
            Some(json!({ "action": "add", "amount": 12 })),
        )
        .await;
        let (status, body) = send(
            &app,
            Method::POST,
            &uri,
            Some(json!({ "action": "remove", "amount": 40 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["account"]["coins"], 0);
        assert_eq!(body["message"], "Removed 12 coins");
    }

    #[tokio::test]
    async fn test_redeem_without_enough_coins() {
        let (app, _) = app_with_parent().await;
        let uri = format!("/api/v1/students/{}/redeem", Uuid::new_v4());
        let (status, _) = send(
            &app,
            Method::POST,
            &uri,
            Some(json!({ "reward_id": "field-trip" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_favorite_toggle_round_trip_and_collection_dedup() {
        let (app, parent_id) = app_with_parent().await;
        let (status, resource) = send(
            &app,
            Method::POST,
            "/api/v1/resources",
            Some(json!({ "title": "Fraction Pizza", "subject": "Math" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let resource_id = resource["id"].as_str().unwrap().to_string();

        let fav_uri = format!("/api/v1/resources/{resource_id}/favorite");
        let toggle = json!({ "parent_id": parent_id });
        let (_, first) = send(&app, Method::POST, &fav_uri, Some(toggle.clone())).await;
        let (_, second) = send(&app, Method::POST, &fav_uri, Some(toggle)).await;
        assert_eq!(first["favorited"], true);
        assert_eq!(second["favorited"], false);

        let list_uri = format!("/api/v1/favorites?parent_id={parent_id}");
        let (_, favorites) = send(&app, Method::GET, &list_uri, None).await;
        assert_eq!(favorites["resource_ids"], json!([]));

        let (status, collection) = send(
            &app,
            Method::POST,
            "/api/v1/collections",
            Some(json!({ "parent_id": parent_id, "name": "Pizza Week" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let map_uri = format!(
            "/api/v1/collections/{}/resources/{resource_id}",
            collection["id"].as_str().unwrap()
        );
        send(&app, Method::PUT, &map_uri, None).await;
        let (status, body) = send(&app, Method::PUT, &map_uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["collection"]["count"], 1);
        assert_eq!(body["change"], "already_present");
    }

    #[tokio::test]
    async fn test_selection_toggle_reports_can_confirm() {
        let (app, _) = app_with_parent().await;
        let uri = "/api/v1/recommendations/selection";

        let (status, body) = send(
            &app,
            Method::POST,
            uri,
            Some(json!({ "subject": "math", "platform_id": "math-quest" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["selected"], json!(["math-quest"]));
        assert_eq!(body["can_confirm"], true);

        let (_, body) = send(
            &app,
            Method::POST,
            uri,
            Some(json!({
                "subject": "math",
                "selected": ["math-quest"],
                "platform_id": "math-video-tutor"
            })),
        )
        .await;
        assert_eq!(body["selected"], json!(["math-quest", "math-video-tutor"]));
        assert_eq!(body["can_confirm"], false);

        let (_, body) = send(
            &app,
            Method::POST,
            uri,
            Some(json!({
                "subject": "math",
                "selected": ["math-quest"],
                "platform_id": "math-quest"
            })),
        )
        .await;
        assert_eq!(body["selected"], json!([]));
        assert_eq!(body["can_confirm"], false);

        let (status, _) = send(
            &app,
            Method::POST,
            uri,
            Some(json!({ "subject": "coding", "platform_id": "math-quest" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_get_resource_by_id() {
        let (app, _) = app_with_parent().await;
        let (_, created) = send(
            &app,
            Method::POST,
            "/api/v1/resources",
            Some(json!({ "title": "Tide Pool Field Guide", "subject": "Science" })),
        )
        .await;
        let uri = format!("/api/v1/resources/{}", created["id"].as_str().unwrap());

        let (status, body) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Tide Pool Field Guide");
        assert_eq!(body["subject"], "science");

        let (status, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
