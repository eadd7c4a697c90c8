use clap::ValueEnum;
use log::warn;
use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::{ItemId, RatingMatrix, RatingValue, UserId};

/// Floor for the number of position draws before falling back to uniform sampling
const MIN_SAMPLING_ATTEMPTS: usize = 10_000;
/// Position draws allowed per rating in the matrix
const ATTEMPTS_PER_RATING: usize = 100;

/// How withheld ratings are drawn from the matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SamplingMode {
    /// Random user, then random item position; keep the pair only if it is rated
    #[default]
    ByPosition,
    /// Uniform over the existing (user, item) ratings
    UniformOverRatings,
}

/// A withheld rating
#[derive(Debug, Clone, PartialEq)]
pub struct TestCase {
    pub user: UserId,
    pub item: ItemId,
    pub rating: RatingValue,
}

/// `ceil(total * percentage)`, never more than `total`
pub fn test_set_size(total_ratings: usize, percentage: f64) -> usize {
    let size = (total_ratings as f64 * percentage).ceil() as usize;
    size.min(total_ratings)
}

/// Attempt budget for position sampling on a matrix with `total_ratings` ratings
pub fn default_max_attempts(total_ratings: usize) -> usize {
    total_ratings
        .saturating_mul(ATTEMPTS_PER_RATING)
        .max(MIN_SAMPLING_ATTEMPTS)
}

/// Move `size` distinct ratings out of `working` and return them.
///
/// Position sampling that exhausts `max_attempts` draws completes the test
/// set uniformly from the remaining ratings, so exactly `size` cases are
/// returned whenever the matrix holds that many.
pub fn extract_test_set<R: Rng + ?Sized>(
    working: &mut RatingMatrix,
    size: usize,
    mode: SamplingMode,
    max_attempts: usize,
    rng: &mut R,
) -> Vec<TestCase> {
    let size = size.min(working.num_ratings());
    let mut cases = Vec::with_capacity(size);

    if mode == SamplingMode::ByPosition {
        sample_by_position(working, size, max_attempts, rng, &mut cases);

        if cases.len() < size {
            warn!(
                "Position sampling found {}/{} ratings in {} draws, completing uniformly",
                cases.len(),
                size,
                max_attempts
            );
        }
    }

    let remaining = size - cases.len();
    sample_uniformly(working, remaining, rng, &mut cases);

    cases
}

fn sample_by_position<R: Rng + ?Sized>(
    working: &mut RatingMatrix,
    size: usize,
    max_attempts: usize,
    rng: &mut R,
    cases: &mut Vec<TestCase>,
) {
    let users: Vec<UserId> = working.users().cloned().collect();
    let items = working.items();
    if users.is_empty() || items.is_empty() {
        return;
    }

    let mut attempts = 0;
    while cases.len() < size && attempts < max_attempts {
        attempts += 1;

        let user = &users[rng.gen_range(0..users.len())];
        let item = &items[rng.gen_range(0..items.len())];

        if let Some(rating) = working.remove(user, item) {
            cases.push(TestCase {
                user: user.clone(),
                item: item.clone(),
                rating,
            });
        }
    }
}

fn sample_uniformly<R: Rng + ?Sized>(
    working: &mut RatingMatrix,
    amount: usize,
    rng: &mut R,
    cases: &mut Vec<TestCase>,
) {
    if amount == 0 {
        return;
    }

    let pairs: Vec<(UserId, ItemId)> = working
        .entries()
        .map(|(user, item, _)| (user.clone(), item.clone()))
        .collect();
    let amount = amount.min(pairs.len());

    for position in index::sample(rng, pairs.len(), amount).iter() {
        let (user, item) = &pairs[position];
        if let Some(rating) = working.remove(user, item) {
            cases.push(TestCase {
                user: user.clone(),
                item: item.clone(),
                rating,
            });
        }
    }
}
