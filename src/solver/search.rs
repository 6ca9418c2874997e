use std::sync::{Arc, Mutex, MutexGuard};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tokio::sync::OnceCell;
use tokio::task;
use tracing::{debug, error, info, info_span, Instrument};

use crate::config::{constant, Settings};
use crate::distance::matrix::DistanceMatrix;
use crate::distance::provider::DistanceProvider;
use crate::domain::solution::ScoredSolution;
use crate::domain::types::ProblemInstance;
use crate::error::SolveError;
use crate::evaluation::evaluator::evaluate;
use crate::solver::construction::build_candidate;
use crate::solver::memory::{RecordEvent, SearchMemory};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Candidates generated per run.
    pub trials: usize,
    /// Master seed; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            trials: constant::SEARCH_TRIALS,
            seed: None,
        }
    }
}

impl From<&Settings> for SearchConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            trials: settings.search_trials,
            seed: settings.search_seed,
        }
    }
}

/// What one run hands back: the fixed baseline, best-ever after this run,
/// and this run's own best.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub initial: ScoredSolution,
    pub best_ever: ScoredSolution,
    pub best_in_run: ScoredSolution,
    pub record: Option<RecordEvent>,
}

/// Owns the matrix cache and the search memory for one problem instance.
///
/// Safe to share across concurrent requests. Provider calls and candidate
/// generation happen outside the memory lock; only the write-once baseline
/// and the compare-and-swap of best-ever run under it.
pub struct SearchController<P> {
    provider: P,
    instance: Arc<ProblemInstance>,
    matrix: OnceCell<Arc<DistanceMatrix>>,
    memory: Mutex<SearchMemory>,
    seeds: Mutex<ChaCha8Rng>,
    trials: usize,
}

impl<P: DistanceProvider> SearchController<P> {
    pub fn new(provider: P, instance: Arc<ProblemInstance>, config: SearchConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            provider,
            instance,
            matrix: OnceCell::new(),
            memory: Mutex::new(SearchMemory::new()),
            seeds: Mutex::new(rng),
            trials: config.trials,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn instance(&self) -> &ProblemInstance {
        &self.instance
    }

    /// The cached matrix, fetching it on first use.
    ///
    /// Concurrent callers wait for a single fetch. A failed fetch is not
    /// cached, so the next call tries again.
    pub async fn ensure_matrix(&self) -> Result<Arc<DistanceMatrix>, SolveError> {
        let dm = self
            .matrix
            .get_or_try_init(|| async {
                let points: Vec<(f64, f64)> =
                    self.instance.locations().iter().map(|l| l.coords()).collect();
                let dm = self.provider.distance_matrix(&points).await.map_err(|e| {
                    error!("Distance matrix unavailable: {}", e);
                    SolveError::from(e)
                })?;
                if dm.dimension() != self.instance.dimension() {
                    return Err(SolveError::Internal(format!(
                        "matrix dimension {} does not match {} locations",
                        dm.dimension(),
                        self.instance.dimension()
                    )));
                }
                info!("Cached {}x{} distance matrix", dm.dimension(), dm.dimension());
                Ok::<_, SolveError>(Arc::new(dm))
            })
            .await?;
        Ok(Arc::clone(dm))
    }

    /// Run with the configured number of trials.
    pub async fn run_search(&self) -> Result<SearchOutcome, SolveError> {
        self.run_search_with(self.trials).await
    }

    /// Generate `trials` candidates (at least one), keep the best of the run
    /// and fold it into best-ever.
    ///
    /// Fails only when the matrix is unavailable, in which case the memory is
    /// left untouched.
    pub async fn run_search_with(&self, trials: usize) -> Result<SearchOutcome, SolveError> {
        let trials = trials.max(1);
        let span = info_span!("run_search", trials);
        async move {
            let dm = self.ensure_matrix().await?;

            let needs_baseline = self.lock_memory()?.initial_baseline().is_none();
            if needs_baseline {
                let seed = self.draw_seeds(1)?[0];
                let candidate = score_candidate(&self.instance, &dm, seed);
                let total = candidate.total_distance;
                if self.lock_memory()?.seed_baseline(candidate) {
                    info!("Initial baseline set: {:.2} m", total);
                }
            }

            let seeds = self.draw_seeds(trials)?;
            let instance = Arc::clone(&self.instance);
            let matrix = Arc::clone(&dm);
            // CPU-bound fan-out; keep it off the async workers.
            let candidates: Vec<ScoredSolution> = task::spawn_blocking(move || {
                seeds
                    .par_iter()
                    .map(|&seed| score_candidate(&instance, &matrix, seed))
                    .collect::<Vec<_>>()
            })
            .await
            .map_err(|e| {
                error!("Trial evaluation aborted: {}", e);
                SolveError::Internal(format!("trial evaluation aborted: {}", e))
            })?;
            let best_in_run = select_best(candidates)
                .ok_or_else(|| SolveError::Internal("no candidates generated".to_string()))?;
            debug!("Best in run: {:.2} m", best_in_run.total_distance);

            let (initial, best_ever, record) = {
                let mut memory = self.lock_memory()?;
                let record = memory.offer(&best_in_run);
                let initial = memory.initial_baseline().cloned();
                let best_ever = memory.best_ever().cloned();
                (initial, best_ever, record)
            };

            if let Some(event) = &record {
                info!(
                    "New record found! Distance: {:.2} km (was {:.2} km, run {})",
                    event.total_distance / constant::METERS_PER_KILOMETER,
                    event.previous_distance / constant::METERS_PER_KILOMETER,
                    event.run
                );
            }

            let missing = || SolveError::Internal("search memory lost its baseline".to_string());
            Ok(SearchOutcome {
                initial: initial.ok_or_else(missing)?,
                best_ever: best_ever.ok_or_else(missing)?,
                best_in_run,
                record,
            })
        }
        .instrument(span)
        .await
    }

    pub fn records(&self) -> Result<Vec<RecordEvent>, SolveError> {
        Ok(self.lock_memory()?.records().to_vec())
    }

    pub fn best_ever(&self) -> Result<Option<ScoredSolution>, SolveError> {
        Ok(self.lock_memory()?.best_ever().cloned())
    }

    pub fn initial_baseline(&self) -> Result<Option<ScoredSolution>, SolveError> {
        Ok(self.lock_memory()?.initial_baseline().cloned())
    }

    fn lock_memory(&self) -> Result<MutexGuard<'_, SearchMemory>, SolveError> {
        self.memory
            .lock()
            .map_err(|_| SolveError::Internal("search memory lock poisoned".to_string()))
    }

    fn draw_seeds(&self, n: usize) -> Result<Vec<u64>, SolveError> {
        let mut rng = self
            .seeds
            .lock()
            .map_err(|_| SolveError::Internal("seed source lock poisoned".to_string()))?;
        Ok((0..n).map(|_| rng.gen::<u64>()).collect())
    }
}

fn score_candidate(pi: &ProblemInstance, dm: &DistanceMatrix, seed: u64) -> ScoredSolution {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let solution = build_candidate(pi, &mut rng);
    evaluate(&solution, pi, dm)
}

/// Lowest total distance; the earliest candidate wins ties.
pub fn select_best<I>(candidates: I) -> Option<ScoredSolution>
where
    I: IntoIterator<Item = ScoredSolution>,
{
    candidates.into_iter().fold(None, |best, candidate| match best {
        Some(best) if !candidate.is_better_than(&best) => Some(best),
        _ => Some(candidate),
    })
}
