//! Candidate generator
//!
//! Filters the garment list once per call, partitions the survivors by slot
//! and draws one garment per mandatory slot for every candidate. Draws are
//! independent, so the same combination may come back more than once.
use std::ops::Range;
use std::sync::Arc;

use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{ConstraintSet, Garment, OutfitCandidate, Slot},
    services::catalog::SlotPartition,
};

pub const DEFAULT_CANDIDATE_COUNT: usize = 10;
const ACCESSORY_PROBABILITY: f64 = 0.5;

/// Generator bound to one call's filtered, partitioned pool
#[derive(Debug, Clone)]
pub struct CandidateGenerator {
    pool: SlotPartition,
}

impl CandidateGenerator {
    /// Applies the generic filter and any pool narrowing, then partitions by slot
    pub fn new(garments: &[Garment], constraints: &ConstraintSet) -> Self {
        let pool = SlotPartition::from_garments(
            garments
                .iter()
                .filter(|g| constraints.admits_with_narrowing(g))
                .cloned(),
        );

        tracing::debug!(
            total = garments.len(),
            eligible = pool.len(),
            "Garment pool filtered"
        );

        Self { pool }
    }

    pub fn pool(&self) -> &SlotPartition {
        &self.pool
    }

    /// Draws `count` candidates named `Outfit 1..=count`
    pub fn generate<R: Rng>(&self, count: usize, rng: &mut R) -> Vec<OutfitCandidate> {
        self.generate_range(0..count, rng)
    }

    /// Draws the candidates at positions `range`; used to split work across workers
    pub fn generate_range<R: Rng>(&self, range: Range<usize>, rng: &mut R) -> Vec<OutfitCandidate> {
        range.map(|index| self.draw(index, rng)).collect()
    }

    fn draw<R: Rng>(&self, index: usize, rng: &mut R) -> OutfitCandidate {
        let mut selected = Vec::with_capacity(Slot::MANDATORY.len() + 1);

        for slot in Slot::MANDATORY {
            if let Some(garment) = self.pool.get(slot).choose(rng) {
                selected.push(garment.clone());
            }
        }

        // Outerwear is a recognized slot but is never drawn here.

        let accessories = self.pool.get(Slot::Accessory);
        if !accessories.is_empty() && rng.gen_bool(ACCESSORY_PROBABILITY) {
            if let Some(accessory) = accessories.choose(rng) {
                selected.push(accessory.clone());
            }
        }

        // Ids are fresh on every call, seeded or not.
        OutfitCandidate::assemble(Uuid::new_v4(), format!("Outfit {}", index + 1), selected)
    }
}

/// Generates `count` candidates from `garments` under `constraints`
pub fn generate<R: Rng>(
    garments: &[Garment],
    constraints: &ConstraintSet,
    count: usize,
    rng: &mut R,
) -> Vec<OutfitCandidate> {
    CandidateGenerator::new(garments, constraints).generate(count, rng)
}

/// Splits `count` draws across `workers` blocking tasks
///
/// Each worker owns a `StdRng` seeded from `base_seed` plus its index. Chunks
/// are contiguous and joined in order, so naming matches sequential output.
pub async fn generate_parallel(
    generator: Arc<CandidateGenerator>,
    count: usize,
    workers: usize,
    base_seed: u64,
) -> AppResult<Vec<OutfitCandidate>> {
    let mut tasks = Vec::new();

    for (worker, range) in chunk_ranges(count, workers).into_iter().enumerate() {
        let generator = Arc::clone(&generator);
        let seed = base_seed.wrapping_add(worker as u64);
        let task = tokio::task::spawn_blocking(move || {
            let mut rng = StdRng::seed_from_u64(seed);
            generator.generate_range(range, &mut rng)
        });
        tasks.push(task);
    }

    let mut candidates = Vec::with_capacity(count);
    for task in tasks {
        match task.await {
            Ok(chunk) => candidates.extend(chunk),
            Err(e) => {
                tracing::error!(error = %e, "Generation worker failed");
                return Err(AppError::Internal(e.to_string()));
            }
        }
    }

    Ok(candidates)
}

/// Contiguous, non-empty ranges covering `0..count`, at most `workers` of them
fn chunk_ranges(count: usize, workers: usize) -> Vec<Range<usize>> {
    let workers = workers.clamp(1, count.max(1));
    let base = count / workers;
    let extra = count % workers;

    let mut ranges = Vec::with_capacity(workers);
    let mut start = 0;
    for worker in 0..workers {
        let len = base + usize::from(worker < extra);
        if len == 0 {
            continue;
        }
        ranges.push(start..start + len);
        start += len;
    }
    ranges
}
