//! Monte-Carlo path engine
//!
//! Partitions paths into contiguous chunks, one work item per chunk, the
//! same `par_iter`-and-collect shape used elsewhere in this codebase for
//! per-item parallelism, generalised from "one policy per item" to "one
//! path-chunk per item". Each chunk owns a private RNG and writes its own
//! slice of the result; there is no shared mutable state to synchronise.

use crate::error::{IrcError, IrcResult};
use crate::math::norm_cdf;
use crate::position::Position;
use crate::reference_data::ReferenceData;
use crate::simulator::issuer_group::{IssuerGroup, MAX_SUB_PERIODS};
use crate::simulator::revaluation::position_loss;
use crate::simulator::rng;
use log::debug;
use rand::Rng;
use rand_distr::StandardNormal;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Paths per work item. Small enough that a cancellation request is
/// noticed promptly, large enough that the per-chunk scheduling overhead
/// stays negligible next to the per-path cost.
const CHUNK_SIZE: usize = 2_000;

/// Cooperative cancellation: checked once per chunk, between chunks.
/// A simple atomic flag is the idiomatic minimal-dependency choice here —
/// there is nothing about the cancellation semantics that needs a crate.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Everything the path loop needs, bundled so the hot function does not
/// take a dozen parameters.
pub struct SimulationInputs<'a> {
    pub positions: &'a [Position],
    pub issuer_groups: &'a [IssuerGroup],
    pub reference_data: &'a ReferenceData,
}

/// Run `num_paths` independent Monte-Carlo paths and return the vector of
/// per-path portfolio losses (positive = loss). Deterministic given
/// `master_seed`; embarrassingly parallel across chunks.
pub fn simulate(
    inputs: &SimulationInputs,
    num_paths: usize,
    master_seed: u64,
    cancellation: &CancellationToken,
) -> IrcResult<Vec<f64>> {
    if num_paths == 0 {
        return Ok(Vec::new());
    }

    let num_chunks = num_paths.div_ceil(CHUNK_SIZE);
    let start = Instant::now();

    let chunk_results: Vec<IrcResult<Vec<f64>>> = (0..num_chunks)
        .into_par_iter()
        .map(|chunk_id| -> IrcResult<Vec<f64>> {
            if cancellation.is_cancelled() {
                return Err(IrcError::Cancelled);
            }

            let chunk_start = chunk_id * CHUNK_SIZE;
            let chunk_end = (chunk_start + CHUNK_SIZE).min(num_paths);
            let mut worker_rng = rng::worker_rng(master_seed, chunk_id as u64);

            let mut losses = Vec::with_capacity(chunk_end - chunk_start);
            for _ in chunk_start..chunk_end {
                losses.push(simulate_path(inputs, &mut worker_rng));
            }
            Ok(losses)
        })
        .collect();

    let mut losses = Vec::with_capacity(num_paths);
    for chunk in chunk_results {
        losses.extend(chunk?);
    }

    debug!(
        "simulated {num_paths} paths across {num_chunks} chunks in {:?}",
        start.elapsed()
    );

    Ok(losses)
}

/// Simulate one path: draw the shared systematic factors once, then let
/// each issuer group consume as many of them as its sub-period count
/// requires.
fn simulate_path(inputs: &SimulationInputs, rng: &mut impl Rng) -> f64 {
    let systematic: [f64; MAX_SUB_PERIODS] =
        std::array::from_fn(|_| rng.sample::<f64, _>(StandardNormal));

    let mut path_loss = 0.0;

    for group in inputs.issuer_groups {
        if group.all_defaulted {
            continue;
        }

        let matrix = match inputs.reference_data.matrix(&group.matrix_name) {
            Some(m) => m,
            None => continue,
        };

        for sub_period in 0..group.sub_periods {
            let x = systematic[sub_period];
            let eps: f64 = rng.sample(StandardNormal);
            let z = group.rho.sqrt() * x + (1.0 - group.rho).sqrt() * eps;
            let u = norm_cdf(z).clamp(0.0, 1.0);

            for &position_idx in &group.position_indices {
                let position = &inputs.positions[position_idx];
                if position.rating.is_default() {
                    continue;
                }
                let new_rating = matrix.bucket(position.rating, u);
                path_loss += position_loss(position, new_rating, inputs.reference_data.spreads());
            }
        }
    }

    path_loss
}
