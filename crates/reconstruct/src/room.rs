//! The solver's internal graph representation.
//!
//! Distinct from `icfpc2025_common::types::Map`: this is the mutable,
//! partially-unknown shape the solvers search over, not the wire format.

pub const DOORS: usize = 6;

/// A room under construction. `label` and each door target are `None`
/// until the search (or annealing initialization) pins them down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub label: Option<u8>,
    pub doors: [Option<usize>; DOORS],
}

impl Room {
    pub fn unknown() -> Self {
        Self {
            label: None,
            doors: [None; DOORS],
        }
    }
}

/// One end of a door-pair, local to the solver's own `Room` model (kept
/// separate from `icfpc2025_common::RoomDoor`, which is the wire type).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoomDoor {
    pub room: usize,
    pub door: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connection {
    pub src: RoomDoor,
    pub dst: RoomDoor,
}

/// Disjoint-set over room indices, used by the DFS connectivity prune.
pub(crate) struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    pub fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            self.parent[x] = self.find(self.parent[x]);
        }
        self.parent[x]
    }

    pub fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            self.parent[ra] = rb;
        }
    }
}
