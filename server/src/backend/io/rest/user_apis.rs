//! # REST API for User and Membership Management
//!
//! Endpoints for registering users and managing group membership.
//! Authentication is handled by an external collaborator; these endpoints
//! never inspect caller identity.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::{error, info};

use crate::backend::domain::commands::user::{AssignGroupCommand, RegisterUserCommand};
use crate::backend::io::rest::mappers::UserMapper;
use crate::backend::AppState;
use shared::{AddMemberRequest, RegisterUserRequest};

/// Register a new user
pub async fn register_user(
    State(state): State<AppState>,
    Json(request): Json<RegisterUserRequest>,
) -> impl IntoResponse {
    info!("POST /api/users - request: {:?}", request);

    let command = RegisterUserCommand {
        email: request.email,
        role: UserMapper::role_to_domain(request.role),
        group_id: request.group_id,
    };
    match state.user_service.register_user(command) {
        Ok(result) => (StatusCode::CREATED, Json(UserMapper::to_dto(result.user))).into_response(),
        Err(e) => {
            error!("Failed to register user: {}", e);
            let status = if e.to_string().contains("not found") {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::BAD_REQUEST
            };
            (status, e.to_string()).into_response()
        }
    }
}

/// List a group's members
pub async fn list_group_members(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/groups/{}/members", group_id);

    match state.user_service.list_group_members(&group_id) {
        Ok(result) => (StatusCode::OK, Json(UserMapper::to_members_dto(result.members))).into_response(),
        Err(e) => {
            error!("Failed to list group members: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error listing group members").into_response()
        }
    }
}

/// Add a user to a group
pub async fn add_group_member(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
    Json(request): Json<AddMemberRequest>,
) -> impl IntoResponse {
    info!("POST /api/groups/{}/members - request: {:?}", group_id, request);

    let command = AssignGroupCommand {
        user_id: request.user_id,
        group_id: Some(group_id),
    };
    match state.user_service.assign_group(command) {
        Ok(()) => (StatusCode::NO_CONTENT, "").into_response(),
        Err(e) => {
            error!("Failed to add group member: {}", e);
            let status = if e.to_string().contains("not found") {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::BAD_REQUEST
            };
            (status, e.to_string()).into_response()
        }
    }
}

/// Remove a user from a group
pub async fn remove_group_member(
    State(state): State<AppState>,
    Path((group_id, user_id)): Path<(String, String)>,
) -> impl IntoResponse {
    info!("DELETE /api/groups/{}/members/{}", group_id, user_id);

    let command = AssignGroupCommand {
        user_id,
        group_id: None,
    };
    match state.user_service.assign_group(command) {
        Ok(()) => (StatusCode::NO_CONTENT, "").into_response(),
        Err(e) => {
            error!("Failed to remove group member: {}", e);
            let status = if e.to_string().contains("not found") {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            (status, e.to_string()).into_response()
        }
    }
}
