//! Parallel generation of a batch of chunks.
//!
//! Workers are scoped threads pulling coordinates from a shared crossbeam
//! queue. Generation is pure, so results are identical to generating the same
//! coordinates one by one. They come back in input order.

use std::time::Instant;

use crossbeam_channel::unbounded;
use geode_voxel::Chunk;
use glam::IVec3;
use tracing::warn;

use crate::generator::TerrainGenerator;

/// A generated chunk waiting to be committed to the world.
#[derive(Debug)]
pub struct GeneratedChunk {
    /// Chunk coordinate.
    pub coord: IVec3,
    /// Generated block data.
    pub chunk: Chunk,
    /// Generation time in microseconds (for profiling).
    pub generation_time_us: u64,
}

/// Worker count that leaves headroom for the tick loop and the render
/// manager.
pub fn default_worker_count() -> usize {
    num_cpus::get().saturating_sub(2).max(1)
}

fn generate_one(generator: &TerrainGenerator, coord: IVec3) -> GeneratedChunk {
    let start = Instant::now();
    let chunk = generator.generate(coord);
    GeneratedChunk {
        coord,
        chunk,
        generation_time_us: start.elapsed().as_micros() as u64,
    }
}

/// Generate every coordinate in `coords` on up to `workers` threads.
pub fn generate_batch(
    generator: &TerrainGenerator,
    coords: &[IVec3],
    workers: usize,
) -> Vec<GeneratedChunk> {
    if coords.is_empty() {
        return Vec::new();
    }
    let workers = workers.clamp(1, coords.len());
    if workers == 1 {
        return coords.iter().map(|c| generate_one(generator, *c)).collect();
    }

    let (task_sender, task_receiver) = unbounded::<(usize, IVec3)>();
    let (result_sender, result_receiver) = unbounded::<(usize, GeneratedChunk)>();
    for task in coords.iter().copied().enumerate() {
        // Cannot fail: the receiver is alive.
        let _ = task_sender.send(task);
    }
    drop(task_sender);

    std::thread::scope(|scope| {
        for i in 0..workers {
            let receiver = task_receiver.clone();
            let sender = result_sender.clone();
            let spawned = std::thread::Builder::new()
                .name(format!("terrain-worker-{i}"))
                .spawn_scoped(scope, move || {
                    while let Ok((index, coord)) = receiver.recv() {
                        let _ = sender.send((index, generate_one(generator, coord)));
                    }
                });
            if let Err(err) = spawned {
                warn!("failed to spawn terrain worker {i}: {err}");
            }
        }
    });
    drop(result_sender);

    let mut results: Vec<(usize, GeneratedChunk)> = result_receiver.try_iter().collect();
    // Anything left over had no worker to run it.
    for (index, coord) in task_receiver.try_iter() {
        results.push((index, generate_one(generator, coord)));
    }
    results.sort_by_key(|(index, _)| *index);
    results.into_iter().map(|(_, generated)| generated).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::TerrainParams;

    #[test]
    fn test_empty_batch() {
        let generator = TerrainGenerator::new(TerrainParams::default()).unwrap();
        assert!(generate_batch(&generator, &[], 4).is_empty());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let generator = TerrainGenerator::new(TerrainParams::default()).unwrap();
        let coords: Vec<IVec3> = (-2..=2)
            .flat_map(|x| (-1..=0).map(move |y| IVec3::new(x, y, 1)))
            .collect();

        let parallel = generate_batch(&generator, &coords, 4);
        let sequential = generate_batch(&generator, &coords, 1);

        assert_eq!(parallel.len(), coords.len());
        for ((p, s), coord) in parallel.iter().zip(&sequential).zip(&coords) {
            assert_eq!(p.coord, *coord, "results must keep input order");
            assert!(p.chunk.same_blocks(&s.chunk), "mismatch at {coord}");
        }
    }

    #[test]
    fn test_default_worker_count_positive() {
        assert!(default_worker_count() >= 1);
    }
}
