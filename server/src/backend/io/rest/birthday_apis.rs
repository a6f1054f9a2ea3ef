//! # REST API for Birthday Management
//!
//! Endpoints for creating, retrieving, updating, and deleting birthdays,
//! plus the proximity-sorted upcoming view and name search.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::NaiveDate;
use log::{error, info};
use serde::Deserialize;

use crate::backend::domain::commands::birthday::{
    CreateBirthdayCommand, SearchBirthdaysQuery, UpcomingBirthdaysQuery, UpdateBirthdayCommand,
};
use crate::backend::io::rest::mappers::BirthdayMapper;
use crate::backend::AppState;
use shared::{CreateBirthdayRequest, UpdateBirthdayRequest};

// Query parameters for the birthday listing API
#[derive(Debug, Deserialize)]
pub struct BirthdayListQuery {
    pub group_id: Option<String>,
}

// Query parameters for the birthday search API
#[derive(Debug, Deserialize)]
pub struct BirthdaySearchQuery {
    pub q: String,
}

// Query parameters for the upcoming view API; `today` pins the reference
// date (ISO 8601) and is mainly used by tests
#[derive(Debug, Deserialize)]
pub struct UpcomingQuery {
    pub today: Option<NaiveDate>,
}

/// List birthdays, optionally filtered to one group
pub async fn list_birthdays(
    State(state): State<AppState>,
    Query(query): Query<BirthdayListQuery>,
) -> impl IntoResponse {
    info!("GET /api/birthdays - query: {:?}", query);

    match state.birthday_service.list_birthdays(query.group_id.as_deref()) {
        Ok(result) => (StatusCode::OK, Json(BirthdayMapper::to_list_dto(result.birthdays))).into_response(),
        Err(e) => {
            error!("Failed to list birthdays: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error listing birthdays").into_response()
        }
    }
}

/// Search birthdays by name, proximity-sorted
pub async fn search_birthdays(
    State(state): State<AppState>,
    Query(query): Query<BirthdaySearchQuery>,
) -> impl IntoResponse {
    info!("GET /api/birthdays/search - q: {}", query.q);

    let search = SearchBirthdaysQuery {
        query: query.q,
        today: None,
    };
    match state.birthday_service.search_birthdays(search) {
        Ok(result) => (StatusCode::OK, Json(BirthdayMapper::to_upcoming_dto(result.birthdays))).into_response(),
        Err(e) => {
            error!("Failed to search birthdays: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error searching birthdays").into_response()
        }
    }
}

/// Create a new birthday
pub async fn create_birthday(
    State(state): State<AppState>,
    Json(request): Json<CreateBirthdayRequest>,
) -> impl IntoResponse {
    info!("POST /api/birthdays - request: {:?}", request);

    let command = CreateBirthdayCommand {
        name: request.name,
        birthdate: request.birthdate,
        message: request.message,
        group_id: request.group_id,
    };
    match state.birthday_service.create_birthday(command) {
        Ok(result) => (StatusCode::CREATED, Json(BirthdayMapper::to_dto(result.birthday))).into_response(),
        Err(e) => {
            error!("Failed to create birthday: {}", e);
            let status = if e.to_string().contains("not found") {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::BAD_REQUEST
            };
            (status, e.to_string()).into_response()
        }
    }
}

/// Get a birthday by ID
pub async fn get_birthday(
    State(state): State<AppState>,
    Path(birthday_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/birthdays/{}", birthday_id);

    match state.birthday_service.get_birthday(&birthday_id) {
        Ok(result) => match result.birthday {
            Some(birthday) => (StatusCode::OK, Json(BirthdayMapper::to_dto(birthday))).into_response(),
            None => (StatusCode::NOT_FOUND, "Birthday not found").into_response(),
        },
        Err(e) => {
            error!("Failed to get birthday: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error retrieving birthday").into_response()
        }
    }
}

/// The proximity-sorted upcoming view for one group
pub async fn get_upcoming_birthdays(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
    Query(query): Query<UpcomingQuery>,
) -> impl IntoResponse {
    info!("GET /api/groups/{}/birthdays/upcoming", group_id);

    let upcoming = UpcomingBirthdaysQuery {
        group_id: Some(group_id),
        today: query.today,
    };
    match state.birthday_service.list_upcoming(upcoming) {
        Ok(result) => (StatusCode::OK, Json(BirthdayMapper::to_upcoming_dto(result.birthdays))).into_response(),
        Err(e) => {
            error!("Failed to list upcoming birthdays: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error listing upcoming birthdays").into_response()
        }
    }
}

/// Update a birthday
pub async fn update_birthday(
    State(state): State<AppState>,
    Path(birthday_id): Path<String>,
    Json(request): Json<UpdateBirthdayRequest>,
) -> impl IntoResponse {
    info!("PUT /api/birthdays/{} - request: {:?}", birthday_id, request);

    let command = UpdateBirthdayCommand {
        birthday_id,
        name: request.name,
        birthdate: request.birthdate,
        message: request.message,
    };
    match state.birthday_service.update_birthday(command) {
        Ok(result) => (StatusCode::OK, Json(BirthdayMapper::to_dto(result.birthday))).into_response(),
        Err(e) => {
            error!("Failed to update birthday: {}", e);
            let status = if e.to_string().contains("not found") {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::BAD_REQUEST
            };
            (status, e.to_string()).into_response()
        }
    }
}

/// Delete a birthday
pub async fn delete_birthday(
    State(state): State<AppState>,
    Path(birthday_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/birthdays/{}", birthday_id);

    match state.birthday_service.delete_birthday(&birthday_id) {
        Ok(_) => (StatusCode::NO_CONTENT, "").into_response(),
        Err(e) => {
            error!("Failed to delete birthday: {}", e);
            let status = if e.to_string().contains("not found") {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            (status, e.to_string()).into_response()
        }
    }
}
