//! Component instance routes: the page-tree CRUD surface.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use builder::doc::{ComponentInstance, PartialComponentInstance};

use crate::routes::definitions::definition_error_to_status;
use crate::services::definition;
use crate::services::instance::{self, InstanceError, InstancePlacement, NewInstance};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateInstanceBody {
    /// Client-assigned id for optimistic creation.
    #[serde(default)]
    pub id: Option<Uuid>,
    pub definition_id: Uuid,
    #[serde(default)]
    pub parent_id: Option<Uuid>,
    #[serde(default)]
    pub order_index: Option<i32>,
    #[serde(default)]
    pub props: Option<serde_json::Value>,
}

#[derive(Deserialize)]
pub struct MoveInstancesBody {
    pub moves: Vec<InstancePlacement>,
}

#[derive(Serialize)]
pub struct DeleteInstanceResponse {
    /// Removed instance ids, the requested root first.
    pub deleted: Vec<Uuid>,
}

/// `GET /api/pages/:page_id/instances` — flat instance list for a page.
pub async fn list_instances(
    State(state): State<AppState>,
    Path(page_id): Path<Uuid>,
) -> Result<Json<Vec<ComponentInstance>>, StatusCode> {
    let instances = instance::list_instances(&state, page_id)
        .await
        .map_err(instance_error_to_status)?;
    Ok(Json(instances))
}

/// `POST /api/pages/:page_id/instances` — place a component on the page.
pub async fn create_instance(
    State(state): State<AppState>,
    Path(page_id): Path<Uuid>,
    Json(body): Json<CreateInstanceBody>,
) -> Result<(StatusCode, Json<ComponentInstance>), StatusCode> {
    // Verify the referenced catalog entry exists before placing it.
    definition::get_definition(&state.pool, body.definition_id)
        .await
        .map_err(definition_error_to_status)?;

    let created = instance::create_instance(
        &state,
        page_id,
        NewInstance {
            id: body.id,
            definition_id: body.definition_id,
            parent_id: body.parent_id,
            order_index: body.order_index,
            props: body.props,
        },
    )
    .await
    .map_err(instance_error_to_status)?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// `PATCH /api/pages/:page_id/instances/:id` — sparse update (props edits,
/// single re-parent) with LWW version checking.
pub async fn update_instance(
    State(state): State<AppState>,
    Path((page_id, instance_id)): Path<(Uuid, Uuid)>,
    Json(partial): Json<PartialComponentInstance>,
) -> Result<Json<ComponentInstance>, StatusCode> {
    let updated = instance::update_instance(&state, page_id, instance_id, &partial)
        .await
        .map_err(instance_error_to_status)?;
    Ok(Json(updated))
}

/// `POST /api/pages/:page_id/instances/move` — apply one committed drag's
/// placements as a single batch.
pub async fn move_instances(
    State(state): State<AppState>,
    Path(page_id): Path<Uuid>,
    Json(body): Json<MoveInstancesBody>,
) -> Result<Json<Vec<ComponentInstance>>, StatusCode> {
    let updated = instance::move_instances(&state, page_id, &body.moves)
        .await
        .map_err(instance_error_to_status)?;
    Ok(Json(updated))
}

/// `DELETE /api/pages/:page_id/instances/:id` — delete an instance and its
/// subtree.
pub async fn delete_instance(
    State(state): State<AppState>,
    Path((page_id, instance_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<DeleteInstanceResponse>, StatusCode> {
    let deleted = instance::delete_instance(&state, page_id, instance_id)
        .await
        .map_err(instance_error_to_status)?;
    Ok(Json(DeleteInstanceResponse { deleted }))
}

pub(crate) fn instance_error_to_status(err: InstanceError) -> StatusCode {
    match err {
        InstanceError::NotFound(_) => StatusCode::NOT_FOUND,
        InstanceError::InvalidParent(_) => StatusCode::BAD_REQUEST,
        InstanceError::WouldCycle { .. } | InstanceError::StaleUpdate { .. } => StatusCode::CONFLICT,
        InstanceError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_mapping() {
        assert_eq!(
            instance_error_to_status(InstanceError::NotFound(Uuid::nil())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            instance_error_to_status(InstanceError::InvalidParent(Uuid::nil())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            instance_error_to_status(InstanceError::WouldCycle { id: Uuid::nil(), new_parent: Uuid::nil() }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            instance_error_to_status(InstanceError::StaleUpdate { incoming: 1, current: 2 }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            instance_error_to_status(InstanceError::Database(sqlx::Error::PoolClosed)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn create_body_minimal() {
        let body: CreateInstanceBody = serde_json::from_str(
            r#"{"definition_id": "00000000-0000-0000-0000-000000000001"}"#,
        )
        .unwrap();
        assert!(body.id.is_none());
        assert!(body.parent_id.is_none());
        assert!(body.order_index.is_none());
        assert!(body.props.is_none());
    }

    #[test]
    fn move_body_parses_placements() {
        let body: MoveInstancesBody = serde_json::from_str(
            r#"{"moves": [
                {"id": "00000000-0000-0000-0000-000000000001", "parent_id": null, "order_index": 0},
                {"id": "00000000-0000-0000-0000-000000000002",
                 "parent_id": "00000000-0000-0000-0000-000000000001", "order_index": 1}
            ]}"#,
        )
        .unwrap();
        assert_eq!(body.moves.len(), 2);
        assert_eq!(body.moves[0].parent_id, None);
        assert_eq!(body.moves[1].order_index, 1);
    }
}
