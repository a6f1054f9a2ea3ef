//! # Backend Module
//!
//! Contains all non-UI logic for the birthday tracker application.
//!
//! This module serves as the orchestration layer that brings together:
//! - **Domain**: Business logic for birthdays, groups, users, notifications
//! - **Storage**: File-backed persistence (YAML metadata + CSV rows)
//! - **IO**: REST interface layer exposed to clients
//!
//! ## Architecture
//!
//! The backend follows a layered architecture:
//! ```text
//! IO Layer (REST API, handlers)
//!     ↓
//! Domain Layer (Business logic, services)
//!     ↓
//! Storage Layer (File persistence)
//! ```
//!
//! The notification sweep sits beside the REST layer: both drive the same
//! domain services, one from HTTP requests, one from a timer.

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use axum::{
    http::Method,
    routing::{get, post},
    Router,
};
use anyhow::Result;
use log::info;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::backend::config::AppConfig;
use crate::backend::domain::{
    BirthdayService, EmailService, GroupService, NotificationService, UserService,
};
use crate::backend::storage::csv::CsvConnection;

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub birthday_service: BirthdayService,
    pub group_service: GroupService,
    pub user_service: UserService,
    pub notification_service: Arc<NotificationService<EmailService>>,
}

/// Initialize the backend with all required services
pub fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    let data_directory = config.resolved_data_directory();
    info!("Setting up storage in {}", data_directory.display());
    let connection = Arc::new(CsvConnection::new(&data_directory)?);

    info!("Setting up domain model");
    let birthday_service = BirthdayService::new(connection.clone());
    let group_service = GroupService::new(connection.clone());
    let user_service = UserService::new(connection.clone());

    let mailer = EmailService::initialize(config.email.clone())?;
    let notification_service = Arc::new(NotificationService::new(
        connection,
        mailer,
        config.sweep.threshold_days,
    ));

    Ok(AppState {
        birthday_service,
        group_service,
        user_service,
        notification_service,
    })
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router {
    // CORS setup to allow browser clients to make requests
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    // Set up our application routes
    let api_routes = Router::new()
        .route(
            "/birthdays",
            get(io::rest::birthday_apis::list_birthdays)
                .post(io::rest::birthday_apis::create_birthday),
        )
        .route("/birthdays/search", get(io::rest::birthday_apis::search_birthdays))
        .route(
            "/birthdays/:birthday_id",
            get(io::rest::birthday_apis::get_birthday)
                .put(io::rest::birthday_apis::update_birthday)
                .delete(io::rest::birthday_apis::delete_birthday),
        )
        .route(
            "/groups",
            get(io::rest::group_apis::list_groups).post(io::rest::group_apis::create_group),
        )
        .route(
            "/groups/:group_id",
            get(io::rest::group_apis::get_group)
                .put(io::rest::group_apis::update_group)
                .delete(io::rest::group_apis::delete_group),
        )
        .route(
            "/groups/:group_id/birthdays/upcoming",
            get(io::rest::birthday_apis::get_upcoming_birthdays),
        )
        .route(
            "/groups/:group_id/members",
            get(io::rest::user_apis::list_group_members)
                .post(io::rest::user_apis::add_group_member),
        )
        .route(
            "/groups/:group_id/members/:user_id",
            axum::routing::delete(io::rest::user_apis::remove_group_member),
        )
        .route("/users", post(io::rest::user_apis::register_user));

    // Define our main application router
    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tempfile::{tempdir, TempDir};
    use tower::ServiceExt;

    fn setup_router() -> (Router, TempDir) {
        let temp_dir = tempdir().unwrap();
        let config = AppConfig {
            data_directory: Some(temp_dir.path().to_path_buf()),
            ..Default::default()
        };
        let state = initialize_backend(&config).unwrap();
        (create_router(state), temp_dir)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_list_birthdays_over_rest() {
        let (router, _temp_dir) = setup_router();

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/groups")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"name":"Family","description":null}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let group = body_json(response).await;
        let group_id = group["id"].as_str().unwrap().to_string();

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/birthdays")
                    .header("content-type", "application/json")
                    .body(Body::from(format!(
                        r#"{{"name":"Alice","birthdate":"1990-06-04","message":null,"group_id":"{}"}}"#,
                        group_id
                    )))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let birthday = body_json(response).await;
        assert_eq!(birthday["name"], "Alice");
        assert_eq!(birthday["notified"], false);

        let response = router
            .oneshot(
                Request::builder()
                    .uri(format!("/api/birthdays?group_id={}", group_id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let list = body_json(response).await;
        assert_eq!(list["birthdays"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_upcoming_view_sorted_with_pinned_today() {
        let (router, _temp_dir) = setup_router();

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/groups")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"name":"Family","description":null}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        let group_id = body_json(response).await["id"].as_str().unwrap().to_string();

        for (name, birthdate) in [("Far", "1985-01-10"), ("Near", "1990-06-04")] {
            let response = router
                .clone()
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/api/birthdays")
                        .header("content-type", "application/json")
                        .body(Body::from(format!(
                            r#"{{"name":"{}","birthdate":"{}","message":null,"group_id":"{}"}}"#,
                            name, birthdate, group_id
                        )))
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let response = router
            .oneshot(
                Request::builder()
                    .uri(format!(
                        "/api/groups/{}/birthdays/upcoming?today=2024-06-01",
                        group_id
                    ))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let list = body_json(response).await;
        let birthdays = list["birthdays"].as_array().unwrap();
        assert_eq!(birthdays[0]["name"], "Near");
        assert_eq!(birthdays[0]["days_until"], 3);
        assert_eq!(birthdays[0]["label"], "4 June (in 3 days)");
        assert_eq!(birthdays[1]["name"], "Far");
    }

    #[tokio::test]
    async fn test_unknown_birthday_returns_404() {
        let (router, _temp_dir) = setup_router();

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/birthdays/birthday::missing")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
