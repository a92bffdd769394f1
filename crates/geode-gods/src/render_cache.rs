//! Meshes waiting for the renderer.
//!
//! The render god commits meshes here from its own thread; the host drains
//! them into a [`RenderSink`] at its own pace. Deletions always reach the
//! sink before creations from the same upload.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use geode_mesh::{ChunkMesh, RenderSink};
use geode_voxel::{chunk_distance_sq, chunk_key};
use glam::IVec3;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

/// Shared handle to the cache.
pub type RenderCacheHandle = Arc<Mutex<RenderCache>>;

/// Pending meshes, queued deletions, and what the sink currently holds.
#[derive(Debug, Default)]
pub struct RenderCache {
    pending: FxHashMap<IVec3, ChunkMesh>,
    deletions: Vec<IVec3>,
    uploaded: FxHashSet<IVec3>,
    focus: IVec3,
}

impl RenderCache {
    /// An empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty cache behind a shareable handle.
    pub fn shared() -> RenderCacheHandle {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Lock a shared cache, ignoring poisoning.
    pub fn lock(handle: &RenderCacheHandle) -> MutexGuard<'_, RenderCache> {
        handle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store a fresh mesh for `chunk`, replacing any pending one.
    pub fn commit(&mut self, chunk: IVec3, mesh: ChunkMesh) {
        self.pending.insert(chunk, mesh);
    }

    /// Forget `chunk`: drop its pending mesh and, if the sink holds one,
    /// queue its deletion.
    pub fn evict(&mut self, chunk: IVec3) {
        self.pending.remove(&chunk);
        if self.uploaded.remove(&chunk) {
            self.deletions.push(chunk);
        }
    }

    /// Chunk that uploads are ordered around.
    pub fn focus(&self) -> IVec3 {
        self.focus
    }

    /// Set the chunk that uploads are ordered around.
    pub fn set_focus(&mut self, chunk: IVec3) {
        self.focus = chunk;
    }

    /// Meshes waiting for upload.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Returns `true` if a mesh for `chunk` is waiting for upload.
    pub fn is_pending(&self, chunk: IVec3) -> bool {
        self.pending.contains_key(&chunk)
    }

    /// Deletions waiting for the next upload.
    pub fn deletion_count(&self) -> usize {
        self.deletions.len()
    }

    /// Returns `true` if the sink holds a mesh for `chunk`.
    pub fn is_uploaded(&self, chunk: IVec3) -> bool {
        self.uploaded.contains(&chunk)
    }

    /// Flush every queued deletion, then hand up to `max` pending meshes to
    /// the sink, nearest to the focus first. Returns the number of meshes
    /// uploaded.
    pub fn upload(&mut self, max: usize, sink: &mut dyn RenderSink) -> usize {
        for chunk in self.deletions.drain(..) {
            sink.delete_mesh(&chunk_key(chunk));
        }

        let focus = self.focus;
        let mut order: Vec<IVec3> = self.pending.keys().copied().collect();
        order.sort_by_key(|c| (chunk_distance_sq(*c, focus), c.x, c.y, c.z));
        order.truncate(max);

        for chunk in &order {
            if let Some(mesh) = self.pending.remove(chunk) {
                sink.create_mesh(&chunk_key(*chunk), &mesh);
                self.uploaded.insert(*chunk);
            }
        }
        if !order.is_empty() {
            debug!(uploaded = order.len(), pending = self.pending.len(), "uploaded chunk meshes");
        }
        order.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        log: Vec<String>,
    }

    impl RenderSink for Recorder {
        fn create_mesh(&mut self, key: &str, _mesh: &ChunkMesh) {
            self.log.push(format!("create {key}"));
        }

        fn delete_mesh(&mut self, key: &str) {
            self.log.push(format!("delete {key}"));
        }
    }

    #[test]
    fn test_upload_nearest_first_within_budget() {
        let mut cache = RenderCache::new();
        for x in [3, -1, 2, 0] {
            cache.commit(IVec3::new(x, 0, 0), ChunkMesh::default());
        }
        let mut sink = Recorder::default();
        assert_eq!(cache.upload(2, &mut sink), 2);
        assert_eq!(sink.log, vec!["create 0,0,0", "create -1,0,0"]);
        assert_eq!(cache.pending_count(), 2);
        assert!(cache.is_uploaded(IVec3::new(-1, 0, 0)));

        assert_eq!(cache.upload(10, &mut sink), 2);
        assert_eq!(cache.upload(10, &mut sink), 0);
    }

    #[test]
    fn test_deletions_flush_before_creations() {
        let mut cache = RenderCache::new();
        let chunk = IVec3::new(1, 2, 3);
        cache.commit(chunk, ChunkMesh::default());
        let mut sink = Recorder::default();
        cache.upload(1, &mut sink);

        cache.evict(chunk);
        assert_eq!(cache.deletion_count(), 1);
        cache.commit(chunk, ChunkMesh::default());
        sink.log.clear();
        cache.upload(1, &mut sink);
        assert_eq!(sink.log, vec!["delete 1,2,3", "create 1,2,3"]);
    }

    #[test]
    fn test_evicting_unuploaded_chunk_queues_nothing() {
        let mut cache = RenderCache::new();
        cache.commit(IVec3::ZERO, ChunkMesh::default());
        cache.evict(IVec3::ZERO);
        assert_eq!(cache.pending_count(), 0);
        assert_eq!(cache.deletion_count(), 0);
    }
}
