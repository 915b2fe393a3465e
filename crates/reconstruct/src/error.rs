use thiserror::Error;

/// Everything that can go wrong while reconstructing a map from a walk.
#[derive(Debug, Error)]
pub enum ReconstructError {
    /// The DFS search tree was exhausted, or annealing ran out of its
    /// iteration budget, without finding a map consistent with the walk.
    #[error("no solution found within the search budget")]
    NoSolution,

    /// The `(doors, labels)` pair given to `solve`/`solve2`/`reconstruct`
    /// is malformed and was rejected before either solver ran.
    #[error("inconsistent input: {0}")]
    InconsistentInput(String),

    /// An invariant the solvers rely on was violated. This indicates a bug
    /// in this crate, not a property of the input.
    #[error("internal logic error: {0}")]
    LogicError(String),
}
