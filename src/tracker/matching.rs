//! Matching utilities for centroid tracking.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::tracker::rect::{Centroid, centroid_distance};
use crate::tracker::tracked_ball::TrackedBall;

/// Cost assigned to pairs that must never be matched.
pub const UNMATCHABLE: f64 = f64::INFINITY;

/// How far from its last position a tracked ball may reacquire a detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReacquisitionPolicy {
    /// Fixed radius regardless of how long the ball has been missing.
    #[default]
    Static,
    /// Radius shrinks linearly to zero over the disappearance window.
    Decaying,
}

/// Solver used to pair tracked balls with detections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStrategy {
    /// Row/column elimination by ascending row minimum. Oldest ball wins ties.
    #[default]
    Greedy,
    /// Globally optimal linear assignment (Jonker-Volgenant).
    Optimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentResult {
    pub matches: Vec<(usize, usize)>,
    pub unmatched_tracks: Vec<usize>,
    pub unmatched_detections: Vec<usize>,
}

impl AssignmentResult {
    fn from_matches(matches: Vec<(usize, usize)>, num_rows: usize, num_cols: usize) -> Self {
        let mut row_used = vec![false; num_rows];
        let mut col_used = vec![false; num_cols];
        for &(row, col) in &matches {
            row_used[row] = true;
            col_used[col] = true;
        }
        Self {
            matches,
            unmatched_tracks: unused_indices(&row_used),
            unmatched_detections: unused_indices(&col_used),
        }
    }
}

fn unused_indices(used: &[bool]) -> Vec<usize> {
    used.iter()
        .enumerate()
        .filter_map(|(i, &u)| if u { None } else { Some(i) })
        .collect()
}

/// Compute the Euclidean distance matrix between tracked balls and detections.
pub fn distance_matrix(balls: &[&TrackedBall], detections: &[Centroid]) -> Array2<f64> {
    let mut dists = Array2::zeros((balls.len(), detections.len()));
    for (i, ball) in balls.iter().enumerate() {
        for (j, det) in detections.iter().enumerate() {
            dists[[i, j]] = centroid_distance(&ball.centroid, det);
        }
    }
    dists
}

/// Mark pairs that cannot be matched.
///
/// A pair is gated out when the detection lies beyond the ball's reacquisition
/// radius, or when the ball is falling and the detection lies above it.
/// `radii[i]` is the radius for row `i`; a non-positive radius gates out the
/// whole row.
pub fn gate(
    cost_matrix: &mut Array2<f64>,
    balls: &[&TrackedBall],
    detections: &[Centroid],
    radii: &[f64],
) {
    let (rows, cols) = cost_matrix.dim();
    for i in 0..rows {
        let ball = balls[i];
        let radius = radii[i];
        for j in 0..cols {
            let beyond_reach = radius <= 0.0 || cost_matrix[[i, j]] > radius;
            let rising_against_fall = ball.is_falling && detections[j].y < ball.centroid.y;
            if beyond_reach || rising_against_fall {
                cost_matrix[[i, j]] = UNMATCHABLE;
            }
        }
    }
}

/// Greedy row/column elimination.
///
/// Rows are visited in ascending order of their minimum cost; each row claims
/// its cheapest column unless that row or column is already used or the pair
/// is unmatchable. The sort is stable, so equal minima keep row order.
pub fn greedy_assignment(cost_matrix: &Array2<f64>) -> AssignmentResult {
    let (num_rows, num_cols) = cost_matrix.dim();

    if num_rows == 0 || num_cols == 0 {
        return AssignmentResult::from_matches(vec![], num_rows, num_cols);
    }

    let mut row_minima: Vec<(usize, usize, f64)> = cost_matrix
        .outer_iter()
        .enumerate()
        .map(|(row, costs)| {
            let (col, min) = costs
                .iter()
                .enumerate()
                .fold((0, f64::INFINITY), |(best_col, best), (col, &c)| {
                    if c < best { (col, c) } else { (best_col, best) }
                });
            (row, col, min)
        })
        .collect();
    row_minima.sort_by(|a, b| a.2.total_cmp(&b.2));

    let mut used_rows = vec![false; num_rows];
    let mut used_cols = vec![false; num_cols];
    let mut matches = vec![];

    for (row, col, cost) in row_minima {
        if !cost.is_finite() || used_rows[row] || used_cols[col] {
            continue;
        }
        used_rows[row] = true;
        used_cols[col] = true;
        matches.push((row, col));
    }

    AssignmentResult::from_matches(matches, num_rows, num_cols)
}

/// Optimal assignment via the Jonker-Volgenant solver.
///
/// The matrix is padded to a square with a cost larger than any finite entry;
/// pairs landing on padding or on an unmatchable entry are left unmatched.
pub fn optimal_assignment(cost_matrix: &Array2<f64>) -> Result<AssignmentResult> {
    let (num_rows, num_cols) = cost_matrix.dim();

    if num_rows == 0 || num_cols == 0 {
        return Ok(AssignmentResult::from_matches(vec![], num_rows, num_cols));
    }

    let max_finite = cost_matrix
        .iter()
        .copied()
        .filter(|c| c.is_finite())
        .fold(0.0_f64, f64::max);
    let sentinel = (max_finite * 2.0 + 1.0).max(1e6);

    let size = num_rows.max(num_cols);
    let mut padded = Array2::<f64>::from_elem((size, size), sentinel);
    for i in 0..num_rows {
        for j in 0..num_cols {
            let c = cost_matrix[[i, j]];
            if c.is_finite() {
                padded[[i, j]] = c;
            }
        }
    }

    let (row_to_col, _) =
        lapjv::lapjv(&padded).map_err(|e| Error::Assignment(format!("{e:?}")))?;

    let matches = row_to_col
        .iter()
        .enumerate()
        .filter(|&(row, &col)| {
            row < num_rows && col < num_cols && cost_matrix[[row, col]].is_finite()
        })
        .map(|(row, &col)| (row, col))
        .collect();

    Ok(AssignmentResult::from_matches(matches, num_rows, num_cols))
}
