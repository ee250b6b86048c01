//! Component definition (catalog) routes.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use uuid::Uuid;

use builder::catalog::{ComponentDefinition, ComponentType, DefinitionFilter};

use crate::services::definition::{self, DefinitionError, DefinitionUpdate, NewDefinition};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateDefinitionBody {
    pub name: String,
    pub component_type: ComponentType,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub default_props: Option<serde_json::Value>,
    #[serde(default)]
    pub prop_schema: Option<serde_json::Value>,
    #[serde(default)]
    pub project_id: Option<Uuid>,
    #[serde(default)]
    pub is_global: bool,
    #[serde(default)]
    pub is_published: bool,
}

#[derive(Deserialize)]
pub struct UpdateDefinitionBody {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub default_props: Option<serde_json::Value>,
    #[serde(default)]
    pub prop_schema: Option<serde_json::Value>,
    #[serde(default)]
    pub is_published: Option<bool>,
}

/// `GET /api/definitions?project_id&is_global` — list catalog definitions.
pub async fn list_definitions(
    State(state): State<AppState>,
    Query(filter): Query<DefinitionFilter>,
) -> Result<Json<Vec<ComponentDefinition>>, StatusCode> {
    let definitions = definition::list_definitions(&state.pool, &filter)
        .await
        .map_err(definition_error_to_status)?;
    Ok(Json(definitions))
}

/// `GET /api/definitions/:id` — fetch one definition.
pub async fn get_definition(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ComponentDefinition>, StatusCode> {
    let def = definition::get_definition(&state.pool, id)
        .await
        .map_err(definition_error_to_status)?;
    Ok(Json(def))
}

/// `POST /api/definitions` — create a definition.
pub async fn create_definition(
    State(state): State<AppState>,
    Json(body): Json<CreateDefinitionBody>,
) -> Result<(StatusCode, Json<ComponentDefinition>), StatusCode> {
    // A definition is either global or owned by a project, never both.
    if body.is_global && body.project_id.is_some() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let def = definition::create_definition(
        &state.pool,
        NewDefinition {
            name: body.name,
            component_type: body.component_type,
            category: body.category.unwrap_or_else(|| "basic".to_owned()),
            description: body.description,
            default_props: body.default_props.unwrap_or_else(|| serde_json::json!({})),
            prop_schema: body.prop_schema.unwrap_or_else(|| serde_json::json!({})),
            project_id: body.project_id,
            is_global: body.is_global,
            is_published: body.is_published,
        },
    )
    .await
    .map_err(definition_error_to_status)?;

    Ok((StatusCode::CREATED, Json(def)))
}

/// `PUT /api/definitions/:id` — update a project-scoped definition.
pub async fn update_definition(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateDefinitionBody>,
) -> Result<Json<ComponentDefinition>, StatusCode> {
    let def = definition::update_definition(
        &state.pool,
        id,
        DefinitionUpdate {
            name: body.name,
            category: body.category,
            description: body.description,
            default_props: body.default_props,
            prop_schema: body.prop_schema,
            is_published: body.is_published,
        },
    )
    .await
    .map_err(definition_error_to_status)?;

    Ok(Json(def))
}

pub(crate) fn definition_error_to_status(err: DefinitionError) -> StatusCode {
    match err {
        DefinitionError::NotFound(_) => StatusCode::NOT_FOUND,
        DefinitionError::GlobalReadOnly(_) => StatusCode::FORBIDDEN,
        DefinitionError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_mapping() {
        assert_eq!(
            definition_error_to_status(DefinitionError::NotFound(Uuid::nil())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            definition_error_to_status(DefinitionError::GlobalReadOnly(Uuid::nil())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            definition_error_to_status(DefinitionError::Database(sqlx::Error::PoolClosed)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn create_body_defaults() {
        let body: CreateDefinitionBody =
            serde_json::from_str(r#"{"name": "Widget", "component_type": "text"}"#).unwrap();
        assert_eq!(body.name, "Widget");
        assert_eq!(body.component_type, ComponentType::Text);
        assert!(body.category.is_none());
        assert!(!body.is_global);
        assert!(!body.is_published);
    }

    #[test]
    fn update_body_all_optional() {
        let body: UpdateDefinitionBody = serde_json::from_str("{}").unwrap();
        assert!(body.name.is_none());
        assert!(body.is_published.is_none());
    }
}
