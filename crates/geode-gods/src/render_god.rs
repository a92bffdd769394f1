//! Meshes chunks in its domain into the shared render cache.

use std::sync::Arc;

use geode_mesh::{AtlasLayout, ChunkNeighborhood, FaceDirection, RenderSink, mesh_chunk};
use geode_voxel::{Chunk, World};
use glam::IVec3;
use rustc_hash::FxHashMap;
use tracing::{debug, info};

use crate::god::{Domain, God};
use crate::render_cache::{RenderCache, RenderCacheHandle};

/// Builds chunk meshes and keeps the render cache in step with the world.
///
/// A chunk meshed while some face neighbor was missing is remembered. Once
/// that neighbor exists, the chunk leaves the realm and is meshed again so
/// its boundary faces are culled.
pub struct RenderGod {
    world: Arc<World>,
    cache: RenderCacheHandle,
    atlas: AtlasLayout,
    domain: Domain,
    incomplete: FxHashMap<IVec3, Vec<FaceDirection>>,
}

impl RenderGod {
    /// A render god around the world origin writing into `cache`.
    pub fn new(world: Arc<World>, cache: RenderCacheHandle, atlas: AtlasLayout, radius: u32) -> Self {
        Self {
            world,
            cache,
            atlas,
            domain: Domain::new(IVec3::ZERO, radius),
            incomplete: FxHashMap::default(),
        }
    }

    /// Handle to the shared cache.
    pub fn cache(&self) -> &RenderCacheHandle {
        &self.cache
    }

    /// Replace a chunk in the world and schedule it for re-meshing.
    pub fn set_chunk(&mut self, coord: IVec3, chunk: Chunk) {
        self.world.set_chunk(coord, chunk);
        self.forget(coord);
        RenderCache::lock(&self.cache).evict(coord);
    }

    /// Drop realm chunks farther than `radius + allowance`, evicting their
    /// meshes. Returns the number of chunks dropped.
    pub fn cull_far_chunks(&mut self, allowance: u32) -> usize {
        let far: Vec<IVec3> = self
            .domain
            .realm
            .iter()
            .copied()
            .filter(|c| !self.domain.within(*c, allowance))
            .collect();
        if far.is_empty() {
            return 0;
        }

        let mut cache = RenderCache::lock(&self.cache);
        for coord in &far {
            self.domain.realm.remove(coord);
            self.incomplete.remove(coord);
            cache.evict(*coord);
        }
        debug!(culled = far.len(), "culled far chunks");
        far.len()
    }

    /// Upload up to `max` pending meshes to `sink`, nearest to the domain
    /// center first, after flushing queued deletions.
    pub fn upload_cache(&self, max: usize, sink: &mut dyn RenderSink) -> usize {
        let mut cache = RenderCache::lock(&self.cache);
        cache.set_focus(self.domain.center_chunk());
        cache.upload(max, sink)
    }

    fn forget(&mut self, coord: IVec3) {
        self.domain.realm.remove(&coord);
        self.incomplete.remove(&coord);
    }

    /// Chunks whose missing neighbors have since appeared.
    fn stale_chunks(&self) -> Vec<IVec3> {
        self.incomplete
            .iter()
            .filter(|(coord, missing)| {
                missing
                    .iter()
                    .any(|dir| self.world.has_chunk(**coord + dir.offset()))
            })
            .map(|(coord, _)| *coord)
            .collect()
    }
}

impl God for RenderGod {
    fn domain(&self) -> &Domain {
        &self.domain
    }

    fn domain_mut(&mut self) -> &mut Domain {
        &mut self.domain
    }

    fn name(&self) -> &'static str {
        "render"
    }

    fn update(&mut self) -> usize {
        let stale = self.stale_chunks();
        if !stale.is_empty() {
            let mut cache = RenderCache::lock(&self.cache);
            for coord in stale {
                debug!(chunk = %coord, "neighbor appeared, re-meshing");
                cache.evict(coord);
                self.domain.realm.remove(&coord);
                self.incomplete.remove(&coord);
            }
        }

        RenderCache::lock(&self.cache).set_focus(self.domain.center_chunk());

        let mut meshed = 0;
        for coord in self.domain.chunks() {
            if self.domain.realm.contains(&coord) {
                continue;
            }
            let world = &self.world;
            let Some(neighborhood) = ChunkNeighborhood::capture(coord, |c| world.get_chunk(c)) else {
                continue;
            };
            let missing = neighborhood.missing_neighbors();
            let mesh = mesh_chunk(&neighborhood, &self.atlas);
            RenderCache::lock(&self.cache).commit(coord, mesh);

            if missing.is_empty() {
                self.incomplete.remove(&coord);
            } else {
                self.incomplete.insert(coord, missing);
            }
            self.domain.realm.insert(coord);
            meshed += 1;
        }

        if meshed > 0 {
            info!(meshed, realm = self.domain.realm.len(), "render update");
        }
        meshed
    }
}
