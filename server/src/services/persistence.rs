//! Persistence service — background flush for dirty instances.
//!
//! DESIGN
//! ======
//! A background task flushes dirty instances, then sleeps before the next
//! cycle. Handlers never block on Postgres I/O for tree mutations; deletes
//! are the exception and write through immediately.
//!
//! ERROR HANDLING
//! ==============
//! Dirty flags are cleared only after successful writes. This prioritizes
//! durability over duplicate flush attempts: repeated upserts are
//! acceptable, silent data loss is not.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{error, info};
use uuid::Uuid;

use builder::doc::ComponentInstance;

use crate::services::instance::flush_instances;
use crate::state::AppState;

const DEFAULT_INSTANCE_FLUSH_INTERVAL_MS: u64 = 100;

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

/// Spawn the background persistence task. Returns a handle for shutdown.
pub fn spawn_persistence_task(state: AppState) -> JoinHandle<()> {
    let flush_interval_ms = env_parse("INSTANCE_FLUSH_INTERVAL_MS", DEFAULT_INSTANCE_FLUSH_INTERVAL_MS);
    info!(flush_interval_ms, "instance persistence flush configured");
    tokio::spawn(async move {
        loop {
            flush_all_dirty(&state).await;
            tokio::time::sleep(Duration::from_millis(flush_interval_ms)).await;
        }
    })
}

async fn flush_all_dirty(state: &AppState) {
    // PHASE: SNAPSHOT DIRTY INSTANCES
    // WHY: collect immutable clones under lock, then perform I/O lock-free.
    let batches = {
        let pages = state.pages.read().await;
        let mut collected = Vec::new();

        for (page_id, page_state) in pages.iter() {
            if page_state.dirty.is_empty() {
                continue;
            }

            let instances = page_state
                .dirty
                .iter()
                .filter_map(|id| page_state.doc.get(id).cloned())
                .collect::<Vec<_>>();
            if instances.is_empty() {
                continue;
            }
            let versions = instances
                .iter()
                .map(|instance| (instance.id, instance.version))
                .collect::<Vec<_>>();
            collected.push(DirtyFlushBatch { page_id: *page_id, instances, flushed_versions: versions });
        }

        collected
    };

    // PHASE: FLUSH PER PAGE + ACK DIRTY IDS
    // WHY: if flush fails we intentionally keep dirty flags for retry.
    for batch in batches {
        match flush_instances(&state.pool, &batch.instances).await {
            Ok(()) => {
                clear_flushed_dirty_ids(state, batch.page_id, &batch.flushed_versions).await;
            }
            Err(e) => {
                error!(error = %e, count = batch.instances.len(), page_id = %batch.page_id, "persistence flush failed");
            }
        }
    }
}

#[cfg(test)]
pub(crate) async fn flush_all_dirty_for_tests(state: &AppState) {
    flush_all_dirty(state).await;
}

#[derive(Debug)]
struct DirtyFlushBatch {
    page_id: Uuid,
    instances: Vec<ComponentInstance>,
    flushed_versions: Vec<(Uuid, i32)>,
}

async fn clear_flushed_dirty_ids(state: &AppState, page_id: Uuid, flushed_versions: &[(Uuid, i32)]) {
    let mut pages = state.pages.write().await;
    let Some(page_state) = pages.get_mut(&page_id) else {
        return;
    };

    for (instance_id, flushed_version) in flushed_versions {
        // EDGE: keep dirty flag if the instance was updated again after the
        // snapshot was taken.
        let can_clear = match page_state.doc.get(instance_id) {
            Some(current) => current.version == *flushed_version,
            None => true,
        };
        if can_clear {
            page_state.dirty.remove(instance_id);
        }
    }
}
