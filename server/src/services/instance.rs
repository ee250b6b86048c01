//! Instance service — page-tree mutations with LWW versioning.
//!
//! DESIGN
//! ======
//! Instance mutations update the in-memory page state immediately, mark the
//! instance as dirty for debounced persistence, and return the updated
//! instance for the response. The in-memory store is the same
//! [`builder::doc::PageDoc`] the editing client runs, so sibling ordering,
//! cycle checks, and cascade semantics match on both sides. LWW conflict
//! resolution: an incoming version must be >= the current version, otherwise
//! the update is rejected as stale.
//!
//! A page is hydrated from Postgres on first access. Instances whose parent
//! no longer resolves are kept (they render as roots) but logged as
//! data-integrity warnings.

use sqlx::PgPool;
use uuid::Uuid;

use builder::doc::{ComponentInstance, InstanceId, PageDoc, PageId, PartialComponentInstance};

use crate::state::{AppState, PageState};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum InstanceError {
    #[error("instance not found: {0}")]
    NotFound(InstanceId),
    #[error("parent instance not on this page: {0}")]
    InvalidParent(InstanceId),
    #[error("moving {id} under {new_parent} would create a cycle")]
    WouldCycle {
        id: InstanceId,
        new_parent: InstanceId,
    },
    #[error("stale update: incoming version {incoming} < current {current}")]
    StaleUpdate { incoming: i32, current: i32 },
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Fields for a new component instance.
pub struct NewInstance {
    /// Client-assigned id for optimistic creation, or `None` to mint one.
    pub id: Option<InstanceId>,
    pub definition_id: Uuid,
    pub parent_id: Option<InstanceId>,
    /// Explicit sibling position, or `None` to append after the last sibling.
    pub order_index: Option<i32>,
    pub props: Option<serde_json::Value>,
}

/// One placement inside a batch move (a single committed drag).
#[derive(Debug, Clone, serde::Deserialize)]
pub struct InstancePlacement {
    pub id: InstanceId,
    pub parent_id: Option<InstanceId>,
    pub order_index: i32,
}

#[derive(sqlx::FromRow)]
struct InstanceRow {
    id: Uuid,
    page_id: Uuid,
    definition_id: Uuid,
    parent_id: Option<Uuid>,
    order_index: i32,
    props: serde_json::Value,
    version: i32,
}

fn to_instance(row: InstanceRow) -> ComponentInstance {
    ComponentInstance {
        id: row.id,
        page_id: row.page_id,
        definition_id: row.definition_id,
        parent_id: row.parent_id,
        order_index: row.order_index,
        props: row.props,
        version: row.version,
    }
}

// =============================================================================
// HYDRATION
// =============================================================================

/// Load a page into memory from Postgres if it isn't already live.
///
/// # Errors
///
/// Returns `Database` if the hydration query fails.
pub async fn ensure_page(state: &AppState, page_id: PageId) -> Result<(), InstanceError> {
    {
        let pages = state.pages.read().await;
        if pages.contains_key(&page_id) {
            return Ok(());
        }
    }

    let rows: Vec<InstanceRow> = sqlx::query_as(
        "SELECT id, page_id, definition_id, parent_id, order_index, props, version
           FROM component_instances
          WHERE page_id = $1
          ORDER BY order_index, id",
    )
    .bind(page_id)
    .fetch_all(&state.pool)
    .await?;

    let mut page = PageState::new(page_id);
    page.doc
        .load_snapshot(rows.into_iter().map(to_instance).collect());

    // Dangling parents are demoted to roots by the tree view; flag them so
    // the corruption is visible in logs rather than silently absorbed.
    for id in page.doc.dangling_ids() {
        tracing::warn!(%page_id, instance_id = %id, "instance references a missing parent; treating as root");
    }

    // A concurrent hydration may have won the race; keep the existing entry.
    let mut pages = state.pages.write().await;
    pages.entry(page_id).or_insert(page);
    Ok(())
}

// =============================================================================
// QUERIES
// =============================================================================

/// Flat instance list for a page, sorted by `(order_index, id)`.
///
/// # Errors
///
/// Returns `Database` if hydration fails.
pub async fn list_instances(state: &AppState, page_id: PageId) -> Result<Vec<ComponentInstance>, InstanceError> {
    ensure_page(state, page_id).await?;
    let pages = state.pages.read().await;
    let page = pages.get(&page_id).ok_or(InstanceError::NotFound(page_id))?;
    Ok(page.doc.sorted_instances().into_iter().cloned().collect())
}

// =============================================================================
// CREATE
// =============================================================================

/// Create a new instance on a page.
///
/// The caller is responsible for verifying the definition exists (the
/// foreign key enforces it at flush time regardless).
///
/// # Errors
///
/// Returns `InvalidParent` if `parent_id` doesn't resolve on this page.
pub async fn create_instance(
    state: &AppState,
    page_id: PageId,
    new: NewInstance,
) -> Result<ComponentInstance, InstanceError> {
    ensure_page(state, page_id).await?;
    let mut pages = state.pages.write().await;
    let page = pages.get_mut(&page_id).ok_or(InstanceError::NotFound(page_id))?;

    if let Some(parent_id) = new.parent_id {
        if !page.doc.contains(&parent_id) {
            return Err(InstanceError::InvalidParent(parent_id));
        }
    }

    let instance = ComponentInstance {
        id: new.id.unwrap_or_else(Uuid::new_v4),
        page_id,
        definition_id: new.definition_id,
        parent_id: new.parent_id,
        order_index: new
            .order_index
            .unwrap_or_else(|| page.doc.next_order_index(new.parent_id)),
        props: new.props.unwrap_or_else(|| serde_json::json!({})),
        version: 1,
    };

    let result = instance.clone();
    page.dirty.insert(instance.id);
    page.doc.insert(instance);

    Ok(result)
}

// =============================================================================
// UPDATE
// =============================================================================

/// Update an existing instance with LWW conflict resolution.
///
/// A re-parenting update is validated against the page tree: the new parent
/// must resolve and must not be the instance itself or one of its
/// descendants.
///
/// # Errors
///
/// Returns `StaleUpdate` if `partial.version` is behind the current version.
pub async fn update_instance(
    state: &AppState,
    page_id: PageId,
    instance_id: InstanceId,
    partial: &PartialComponentInstance,
) -> Result<ComponentInstance, InstanceError> {
    ensure_page(state, page_id).await?;
    let mut pages = state.pages.write().await;
    let page = pages.get_mut(&page_id).ok_or(InstanceError::NotFound(page_id))?;

    let current_version = page
        .doc
        .get(&instance_id)
        .ok_or(InstanceError::NotFound(instance_id))?
        .version;

    // LWW: reject stale updates.
    if let Some(incoming) = partial.version {
        if incoming < current_version {
            return Err(InstanceError::StaleUpdate { incoming, current: current_version });
        }
    }

    if let Some(Some(new_parent)) = partial.parent_id {
        if !page.doc.contains(&new_parent) {
            return Err(InstanceError::InvalidParent(new_parent));
        }
        if page.doc.is_descendant(new_parent, instance_id) {
            return Err(InstanceError::WouldCycle { id: instance_id, new_parent });
        }
    }

    let applied = PartialComponentInstance {
        version: Some(partial.version.unwrap_or(current_version.saturating_add(1))),
        ..partial.clone()
    };
    page.doc.apply_partial(&instance_id, &applied);
    page.dirty.insert(instance_id);

    page.doc
        .get(&instance_id)
        .cloned()
        .ok_or(InstanceError::NotFound(instance_id))
}

// =============================================================================
// MOVE
// =============================================================================

/// Apply a batch of placements from one committed drag as a unit.
///
/// Placements are validated sequentially against the evolving tree; on the
/// first invalid placement the page is restored to its pre-batch state and
/// the error is returned, so a drag commit is all-or-nothing.
///
/// # Errors
///
/// Returns `NotFound`, `InvalidParent`, or `WouldCycle` for the first
/// placement that fails validation.
pub async fn move_instances(
    state: &AppState,
    page_id: PageId,
    placements: &[InstancePlacement],
) -> Result<Vec<ComponentInstance>, InstanceError> {
    ensure_page(state, page_id).await?;
    let mut pages = state.pages.write().await;
    let page = pages.get_mut(&page_id).ok_or(InstanceError::NotFound(page_id))?;

    let snapshot: Vec<ComponentInstance> = page.doc.sorted_instances().into_iter().cloned().collect();

    if let Err(err) = apply_placements(&mut page.doc, placements) {
        page.doc.load_snapshot(snapshot);
        return Err(err);
    }

    let mut updated = Vec::with_capacity(placements.len());
    for placement in placements {
        page.dirty.insert(placement.id);
        if let Some(instance) = page.doc.get(&placement.id) {
            updated.push(instance.clone());
        }
    }
    Ok(updated)
}

fn apply_placements(doc: &mut PageDoc, placements: &[InstancePlacement]) -> Result<(), InstanceError> {
    for placement in placements {
        if !doc.contains(&placement.id) {
            return Err(InstanceError::NotFound(placement.id));
        }
        if let Some(new_parent) = placement.parent_id {
            if !doc.contains(&new_parent) {
                return Err(InstanceError::InvalidParent(new_parent));
            }
            if doc.is_descendant(new_parent, placement.id) {
                return Err(InstanceError::WouldCycle { id: placement.id, new_parent });
            }
        }
        doc.apply_partial(
            &placement.id,
            &PartialComponentInstance {
                parent_id: Some(placement.parent_id),
                order_index: Some(placement.order_index),
                ..Default::default()
            },
        );
    }
    Ok(())
}

// =============================================================================
// DELETE
// =============================================================================

/// Delete an instance and its entire subtree. Removes from memory and
/// Postgres immediately (row-level `ON DELETE CASCADE` covers children).
/// Returns the removed ids, parents before children.
///
/// # Errors
///
/// Returns `NotFound` if the instance doesn't exist.
pub async fn delete_instance(
    state: &AppState,
    page_id: PageId,
    instance_id: InstanceId,
) -> Result<Vec<InstanceId>, InstanceError> {
    ensure_page(state, page_id).await?;

    let removed_ids = {
        let mut pages = state.pages.write().await;
        let page = pages.get_mut(&page_id).ok_or(InstanceError::NotFound(page_id))?;

        if !page.doc.contains(&instance_id) {
            return Err(InstanceError::NotFound(instance_id));
        }
        let removed = page.doc.remove_subtree(instance_id);
        for instance in &removed {
            page.dirty.remove(&instance.id);
        }
        removed.into_iter().map(|instance| instance.id).collect::<Vec<_>>()
    };

    // Delete from Postgres immediately (not deferred); children go with the
    // root via ON DELETE CASCADE.
    sqlx::query("DELETE FROM component_instances WHERE id = $1")
        .bind(instance_id)
        .execute(&state.pool)
        .await?;

    Ok(removed_ids)
}

// =============================================================================
// FLUSH
// =============================================================================

/// Upsert a batch of instances in one transaction. Used by the persistence
/// task to flush dirty instances.
///
/// # Errors
///
/// Returns the underlying `sqlx` error; the caller keeps dirty flags on
/// failure so the flush is retried.
pub async fn flush_instances(pool: &PgPool, instances: &[ComponentInstance]) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    for instance in instances {
        sqlx::query(
            "INSERT INTO component_instances
                 (id, page_id, definition_id, parent_id, order_index, props, version)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (id) DO UPDATE SET
                 parent_id = EXCLUDED.parent_id,
                 order_index = EXCLUDED.order_index,
                 props = EXCLUDED.props,
                 version = EXCLUDED.version",
        )
        .bind(instance.id)
        .bind(instance.page_id)
        .bind(instance.definition_id)
        .bind(instance.parent_id)
        .bind(instance.order_index)
        .bind(&instance.props)
        .bind(instance.version)
        .execute(tx.as_mut())
        .await?;
    }
    tx.commit().await?;
    Ok(())
}
