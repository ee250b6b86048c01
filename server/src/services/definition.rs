//! Definition service — catalog CRUD against Postgres.
//!
//! DESIGN
//! ======
//! The catalog is read-mostly and small, so queries go straight to the
//! database; there is no in-memory layer to keep coherent. Global
//! definitions are shared fixtures and therefore read-only through this
//! API: only project-scoped definitions may be edited.

use sqlx::PgPool;
use uuid::Uuid;

use builder::catalog::{ComponentDefinition, ComponentType, DefinitionFilter, DefinitionId};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum DefinitionError {
    #[error("definition not found: {0}")]
    NotFound(DefinitionId),
    #[error("global definitions are read-only: {0}")]
    GlobalReadOnly(DefinitionId),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Fields for a new catalog definition.
pub struct NewDefinition {
    pub name: String,
    pub component_type: ComponentType,
    pub category: String,
    pub description: Option<String>,
    pub default_props: serde_json::Value,
    pub prop_schema: serde_json::Value,
    pub project_id: Option<Uuid>,
    pub is_global: bool,
    pub is_published: bool,
}

/// Sparse catalog definition update. Only present fields are applied.
#[derive(Default)]
pub struct DefinitionUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub default_props: Option<serde_json::Value>,
    pub prop_schema: Option<serde_json::Value>,
    pub is_published: Option<bool>,
}

#[derive(sqlx::FromRow)]
struct DefinitionRow {
    id: Uuid,
    name: String,
    component_type: String,
    category: String,
    description: Option<String>,
    default_props: serde_json::Value,
    prop_schema: serde_json::Value,
    project_id: Option<Uuid>,
    is_global: bool,
    is_published: bool,
}

fn to_definition(row: DefinitionRow) -> ComponentDefinition {
    let component_type = ComponentType::parse(&row.component_type).unwrap_or_else(|| {
        tracing::warn!(
            id = %row.id,
            component_type = %row.component_type,
            "unknown component type in catalog; treating as custom"
        );
        ComponentType::Custom
    });
    ComponentDefinition {
        id: row.id,
        name: row.name,
        component_type,
        category: row.category,
        description: row.description,
        default_props: row.default_props,
        prop_schema: row.prop_schema,
        project_id: row.project_id,
        is_global: row.is_global,
        is_published: row.is_published,
    }
}

// =============================================================================
// QUERIES
// =============================================================================

/// List definitions matching `filter`, ordered for stable catalog display.
///
/// # Errors
///
/// Returns `Database` on query failure.
pub async fn list_definitions(
    pool: &PgPool,
    filter: &DefinitionFilter,
) -> Result<Vec<ComponentDefinition>, DefinitionError> {
    let rows: Vec<DefinitionRow> = sqlx::query_as(
        "SELECT id, name, component_type, category, description,
                default_props, prop_schema, project_id, is_global, is_published
           FROM component_definitions
          WHERE ($1::uuid IS NULL OR project_id = $1)
            AND ($2::boolean IS NULL OR is_global = $2)
          ORDER BY category, name, id",
    )
    .bind(filter.project_id)
    .bind(filter.is_global)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(to_definition).collect())
}

/// Fetch one definition by id.
///
/// # Errors
///
/// Returns `NotFound` if no row matches.
pub async fn get_definition(pool: &PgPool, id: DefinitionId) -> Result<ComponentDefinition, DefinitionError> {
    let row: Option<DefinitionRow> = sqlx::query_as(
        "SELECT id, name, component_type, category, description,
                default_props, prop_schema, project_id, is_global, is_published
           FROM component_definitions
          WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(to_definition).ok_or(DefinitionError::NotFound(id))
}

// =============================================================================
// MUTATIONS
// =============================================================================

/// Create a catalog definition.
///
/// # Errors
///
/// Returns `Database` on query failure (including constraint violations).
pub async fn create_definition(pool: &PgPool, new: NewDefinition) -> Result<ComponentDefinition, DefinitionError> {
    let row: DefinitionRow = sqlx::query_as(
        "INSERT INTO component_definitions
             (name, component_type, category, description, default_props, prop_schema,
              project_id, is_global, is_published)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
         RETURNING id, name, component_type, category, description,
                   default_props, prop_schema, project_id, is_global, is_published",
    )
    .bind(&new.name)
    .bind(new.component_type.as_str())
    .bind(&new.category)
    .bind(&new.description)
    .bind(&new.default_props)
    .bind(&new.prop_schema)
    .bind(new.project_id)
    .bind(new.is_global)
    .bind(new.is_published)
    .fetch_one(pool)
    .await?;

    Ok(to_definition(row))
}

/// Apply a sparse update to a project-scoped definition.
///
/// # Errors
///
/// Returns `NotFound` if the definition doesn't exist, `GlobalReadOnly` if
/// it is global or unowned.
pub async fn update_definition(
    pool: &PgPool,
    id: DefinitionId,
    update: DefinitionUpdate,
) -> Result<ComponentDefinition, DefinitionError> {
    let existing = get_definition(pool, id).await?;
    if existing.is_global || existing.project_id.is_none() {
        return Err(DefinitionError::GlobalReadOnly(id));
    }

    let row: DefinitionRow = sqlx::query_as(
        "UPDATE component_definitions SET
             name = COALESCE($2, name),
             category = COALESCE($3, category),
             description = COALESCE($4, description),
             default_props = COALESCE($5, default_props),
             prop_schema = COALESCE($6, prop_schema),
             is_published = COALESCE($7, is_published)
         WHERE id = $1
         RETURNING id, name, component_type, category, description,
                   default_props, prop_schema, project_id, is_global, is_published",
    )
    .bind(id)
    .bind(&update.name)
    .bind(&update.category)
    .bind(&update.description)
    .bind(&update.default_props)
    .bind(&update.prop_schema)
    .bind(update.is_published)
    .fetch_one(pool)
    .await?;

    Ok(to_definition(row))
}
