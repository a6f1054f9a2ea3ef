//! # REST API for Group Management
//!
//! Endpoints for creating, retrieving, updating, and deleting groups.
//! Deleting a group cascades to its birthdays and detaches its members.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::{error, info};

use crate::backend::domain::commands::group::{CreateGroupCommand, UpdateGroupCommand};
use crate::backend::io::rest::mappers::GroupMapper;
use crate::backend::AppState;
use shared::{CreateGroupRequest, UpdateGroupRequest};

/// Create a new group
pub async fn create_group(
    State(state): State<AppState>,
    Json(request): Json<CreateGroupRequest>,
) -> impl IntoResponse {
    info!("POST /api/groups - request: {:?}", request);

    let command = CreateGroupCommand {
        name: request.name,
        description: request.description,
    };
    match state.group_service.create_group(command) {
        Ok(result) => (StatusCode::CREATED, Json(GroupMapper::to_dto(result.group))).into_response(),
        Err(e) => {
            error!("Failed to create group: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
    }
}

/// Get a group by ID
pub async fn get_group(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/groups/{}", group_id);

    match state.group_service.get_group(&group_id) {
        Ok(result) => match result.group {
            Some(group) => (StatusCode::OK, Json(GroupMapper::to_dto(group))).into_response(),
            None => (StatusCode::NOT_FOUND, "Group not found").into_response(),
        },
        Err(e) => {
            error!("Failed to get group: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error retrieving group").into_response()
        }
    }
}

/// List all groups
pub async fn list_groups(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/groups");

    match state.group_service.list_groups() {
        Ok(result) => (StatusCode::OK, Json(GroupMapper::to_list_dto(result.groups))).into_response(),
        Err(e) => {
            error!("Failed to list groups: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error listing groups").into_response()
        }
    }
}

/// Update a group
pub async fn update_group(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
    Json(request): Json<UpdateGroupRequest>,
) -> impl IntoResponse {
    info!("PUT /api/groups/{} - request: {:?}", group_id, request);

    let command = UpdateGroupCommand {
        group_id,
        name: request.name,
        description: request.description,
    };
    match state.group_service.update_group(command) {
        Ok(result) => (StatusCode::OK, Json(GroupMapper::to_dto(result.group))).into_response(),
        Err(e) => {
            error!("Failed to update group: {}", e);
            let status = if e.to_string().contains("not found") {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::BAD_REQUEST
            };
            (status, e.to_string()).into_response()
        }
    }
}

/// Delete a group, cascading to its birthdays and members
pub async fn delete_group(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/groups/{}", group_id);

    match state.group_service.delete_group(&group_id) {
        Ok(result) => (StatusCode::OK, Json(GroupMapper::to_delete_dto(result))).into_response(),
        Err(e) => {
            error!("Failed to delete group: {}", e);
            let status = if e.to_string().contains("not found") {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            (status, e.to_string()).into_response()
        }
    }
}
