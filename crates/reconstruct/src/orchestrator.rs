//! Picks a solving strategy from the problem size and runs it.

use crate::error::ReconstructError;
use crate::{anneal, dfs, MapData};

/// Above this room count DFS is judged impractical up front (it covers the
/// `probatio`/`primus`/`secundus` tiers, where the search tree is small
/// enough to explore exhaustively within the node budget below).
const DFS_SIZE_THRESHOLD: usize = 12;
const DFS_NODE_BUDGET: usize = 1_000_000;
const ANNEAL_ITERATION_BUDGET: usize = 10_000_000;

pub fn reconstruct(n: usize, doors: &str, labels: &[u8]) -> Result<MapData, ReconstructError> {
    if n <= DFS_SIZE_THRESHOLD {
        match dfs::solve_with_budget(n, doors, labels, DFS_NODE_BUDGET) {
            Ok(map) => return Ok(map),
            Err(ReconstructError::NoSolution) => {
                log::warn!("DFS exhausted its budget for N={n}; falling back to annealing");
            }
            Err(other) => return Err(other),
        }
    }

    anneal::solve_with_budget(n, doors, labels, ANNEAL_ITERATION_BUDGET)
}
