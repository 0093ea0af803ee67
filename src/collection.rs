use crate::board::{MarkerBoard, RegionGrid};
use crate::generation::{generate_candidate, GenerateError};
use crate::solver::{self, SolveError, DEFAULT_THRESHOLD};
use log::{debug, info};
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp;
use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::sync::mpsc::channel;
use std::thread;
use thiserror::Error;

/// Batches never shrink below this, since the accept rate is low and
/// unpredictable.
const MIN_BATCH: usize = 10;

/// An accepted board, in the shape the persistence collaborator stores.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardRecord {
    pub name: String,
    #[serde(rename = "caseNumber")]
    pub size: usize,
    #[serde(rename = "colorGrid")]
    pub regions: RegionGrid,
    #[serde(rename = "queenBoard")]
    pub markers: MarkerBoard,
}

/// Accepted boards keyed by board size, in acceptance order.
pub type BoardCollection = BTreeMap<usize, Vec<BoardRecord>>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CollectionError {
    #[error(transparent)]
    Generate(#[from] GenerateError),
    #[error(transparent)]
    Solve(#[from] SolveError),
    /// The attempt cap turned non-convergence into a reported failure instead
    /// of looping forever on a size with a vanishing accept rate.
    #[error("gave up on board size {size} after {attempts} attempts")]
    AttemptsExhausted { size: usize, attempts: usize },
}

#[derive(Clone, Debug)]
pub struct GenerationConfig {
    pub sizes: RangeInclusive<usize>,
    pub threshold: usize,
    pub worker_count: usize,
    pub max_attempts_per_size: usize,
}

impl Default for GenerationConfig {
    fn default() -> GenerationConfig {
        GenerationConfig {
            sizes: 4..=17,
            threshold: DEFAULT_THRESHOLD,
            worker_count: 8,
            max_attempts_per_size: 1_000_000,
        }
    }
}

/// Target number of accepted boards per size, a non-decreasing step function.
pub fn target_board_count(size: usize) -> usize {
    match size {
        4..=5 => 30,
        6..=7 => 50,
        8..=13 => 70,
        14..=17 => 100,
        _ => 0,
    }
}

/// Fills every size in `config.sizes` up to its quota, resuming from the
/// boards already present in `collection`, and returns the updated
/// collection.
pub fn generate_collection(
    config: &GenerationConfig,
    mut collection: BoardCollection,
) -> Result<BoardCollection, CollectionError> {
    for size in config.sizes.clone() {
        let quota = target_board_count(size);
        let boards = collection.entry(size).or_insert_with(Vec::new);

        if boards.len() >= quota {
            debug!("size {}: quota of {} already met", size, quota);
            continue;
        }

        info!(
            "size {}: generating {} board(s) towards a quota of {}",
            size,
            quota - boards.len(),
            quota
        );

        fill_size(size, quota, config, boards)?;

        info!("size {}: complete with {} board(s)", size, boards.len());
    }

    Ok(collection)
}

/// Produces candidate boards in parallel batches until `accepted` holds
/// `quota` boards. Accepting, deduplicating and renaming all happen here on
/// the calling thread; workers share no mutable state.
fn fill_size(
    size: usize,
    quota: usize,
    config: &GenerationConfig,
    accepted: &mut Vec<BoardRecord>,
) -> Result<(), CollectionError> {
    if config.threshold == 0 {
        return Err(SolveError::InvalidThreshold.into());
    }

    let mut attempts = 0;

    while accepted.len() < quota {
        let outstanding = quota - accepted.len();
        let allowance = config.max_attempts_per_size - attempts;
        let batch_size = cmp::min(cmp::max(outstanding * 2, MIN_BATCH), allowance);

        let survivors = run_batch(size, batch_size, config)?;
        attempts += batch_size;

        debug!(
            "size {}: batch of {} yielded {} survivor(s), {} attempts so far",
            size,
            batch_size,
            survivors.len(),
            attempts
        );

        for mut record in survivors {
            if accepted.len() >= quota {
                break;
            }

            if accepted
                .iter()
                .any(|existing| existing.regions.same_partition(&record.regions))
            {
                debug!("size {}: discarding duplicate partition", size);
                continue;
            }

            record.name = format!("Map n{} #{}", size, accepted.len() + 1);
            info!("size {}: accepted {}", size, record.name);
            accepted.push(record);
        }

        if accepted.len() < quota && attempts >= config.max_attempts_per_size {
            return Err(CollectionError::AttemptsExhausted { size, attempts });
        }
    }

    Ok(())
}

fn run_batch(
    size: usize,
    batch_size: usize,
    config: &GenerationConfig,
) -> Result<Vec<BoardRecord>, CollectionError> {
    let worker_count = cmp::max(config.worker_count, 1);
    let threshold = config.threshold;

    let (tx, rx) = channel();
    let mut handles = Vec::with_capacity(worker_count);

    for worker in 0..worker_count {
        let jobs = batch_size / worker_count
            + if worker < batch_size % worker_count {
                1
            } else {
                0
            };

        if jobs == 0 {
            continue;
        }

        let tx = tx.clone();

        handles.push(thread::spawn(move || {
            let mut rng = SmallRng::from_entropy();

            for _ in 0..jobs {
                if tx.send(attempt_board(size, threshold, &mut rng)).is_err() {
                    return;
                }
            }
        }));
    }

    drop(tx);

    let mut survivors = Vec::new();
    let mut failure = None;

    // Drain the whole batch even after a failure so the workers can finish.
    for message in rx {
        match message {
            Ok(Some(record)) => survivors.push(record),
            Ok(None) => {}
            Err(error) => failure = Some(error),
        }
    }

    for handle in handles {
        let _ = handle.join();
    }

    match failure {
        Some(error) => Err(error),
        None => Ok(survivors),
    }
}

/// One independent unit of work: generate a candidate, evaluate it, and keep
/// it only when its solution count stays within the threshold.
fn attempt_board<G: Rng>(
    size: usize,
    threshold: usize,
    rng: &mut G,
) -> Result<Option<BoardRecord>, CollectionError> {
    let candidate = generate_candidate(size, rng)?;

    let name = format!("random-{:06}", rng.gen_range(0, 1_000_000));
    let outcome = solver::solve(&name, &candidate.regions, threshold)?;

    if outcome.solution_count > threshold {
        return Ok(None);
    }

    Ok(Some(BoardRecord {
        name,
        size,
        markers: candidate.placement.marker_board(),
        regions: candidate.regions,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> GenerationConfig {
        GenerationConfig {
            sizes: 4..=17,
            threshold: 1,
            worker_count: 2,
            max_attempts_per_size: 100_000,
        }
    }

    #[test]
    fn quotas_follow_the_size_table() {
        assert_eq!(target_board_count(3), 0);
        assert_eq!(target_board_count(4), 30);
        assert_eq!(target_board_count(5), 30);
        assert_eq!(target_board_count(6), 50);
        assert_eq!(target_board_count(7), 50);
        assert_eq!(target_board_count(8), 70);
        assert_eq!(target_board_count(13), 70);
        assert_eq!(target_board_count(14), 100);
        assert_eq!(target_board_count(17), 100);
        assert_eq!(target_board_count(18), 0);
    }

    #[test]
    fn filling_a_size_respects_quota_uniqueness_and_threshold() {
        let config = test_config();
        let mut accepted = Vec::new();

        fill_size(5, 3, &config, &mut accepted).unwrap();

        assert_eq!(accepted.len(), 3);

        for (index, record) in accepted.iter().enumerate() {
            assert_eq!(record.name, format!("Map n5 #{}", index + 1));
            assert_eq!(record.size, 5);
            assert_eq!(record.regions.distinct_label_count(), 5);

            let outcome = solver::solve(&record.name, &record.regions, 1).unwrap();
            assert!(outcome.solvable);
            assert!(outcome.solution_count <= 1);
        }

        for a in 0..accepted.len() {
            for b in a + 1..accepted.len() {
                assert!(!accepted[a].regions.same_partition(&accepted[b].regions));
            }
        }
    }

    #[test]
    fn a_met_quota_makes_resuming_a_no_op() {
        let config = test_config();
        let mut accepted = Vec::new();

        fill_size(4, 2, &config, &mut accepted).unwrap();
        let snapshot = accepted.clone();

        fill_size(4, 2, &config, &mut accepted).unwrap();

        assert_eq!(accepted, snapshot);
    }

    #[test]
    fn the_attempt_cap_reports_non_convergence() {
        let config = GenerationConfig {
            max_attempts_per_size: 5,
            ..test_config()
        };
        let mut accepted = Vec::new();

        // Five attempts cannot fill a quota this large, so the cap fires.
        let result = fill_size(5, 10_000, &config, &mut accepted);

        assert_eq!(
            result,
            Err(CollectionError::AttemptsExhausted {
                size: 5,
                attempts: 5,
            })
        );
    }

    #[test]
    fn degenerate_sizes_propagate_the_placement_error() {
        let config = test_config();
        let mut accepted = Vec::new();

        assert_eq!(
            fill_size(3, 1, &config, &mut accepted),
            Err(CollectionError::Generate(GenerateError::NoPlacement {
                size: 3,
            }))
        );
    }

    #[test]
    fn a_zero_threshold_is_rejected_before_spawning_workers() {
        let config = GenerationConfig {
            threshold: 0,
            ..test_config()
        };
        let mut accepted = Vec::new();

        assert_eq!(
            fill_size(4, 1, &config, &mut accepted),
            Err(CollectionError::Solve(SolveError::InvalidThreshold))
        );
    }

    #[test]
    fn sizes_without_a_quota_stay_empty() {
        let config = GenerationConfig {
            sizes: 18..=18,
            ..test_config()
        };

        let collection = generate_collection(&config, BoardCollection::new()).unwrap();

        assert_eq!(collection.get(&18), Some(&Vec::new()));
    }

    #[test]
    fn collections_serialise_in_the_persisted_shape() {
        let config = test_config();
        let mut accepted = Vec::new();

        fill_size(4, 1, &config, &mut accepted).unwrap();

        let mut collection = BoardCollection::new();
        collection.insert(4, accepted);

        let json = serde_json::to_value(&collection).unwrap();
        let record = &json["4"][0];

        assert_eq!(record["name"], "Map n4 #1");
        assert_eq!(record["caseNumber"], 4);
        assert_eq!(record["colorGrid"].as_array().unwrap().len(), 4);
        assert_eq!(record["queenBoard"].as_array().unwrap().len(), 4);

        let round_trip: BoardCollection = serde_json::from_value(json).unwrap();
        assert_eq!(round_trip, collection);
    }
}
