//! Exact backtracking solver. Grounded on the source solver's `dfs`/`solve`
//! (state memoization, the four prunes) and on the teacher's own
//! `greedy/src/main.rs` (a stack-free recursive search over partial
//! `Rooms` clones is the idiomatic Rust shape for this search, in place of
//! the source's mutate-then-undo style).

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::connections;
use crate::digest::state_digest;
use crate::error::ReconstructError;
use crate::room::{Room, UnionFind, DOORS};
use crate::walk::Walk;
use crate::MapData;

const DEFAULT_NODE_BUDGET: usize = 5_000_000;

pub fn solve(n: usize, doors: &str, labels: &[u8]) -> Result<MapData, ReconstructError> {
    solve_with_budget(n, doors, labels, DEFAULT_NODE_BUDGET)
}

pub(crate) fn solve_with_budget(
    n: usize,
    doors: &str,
    labels: &[u8],
    node_budget: usize,
) -> Result<MapData, ReconstructError> {
    if n == 0 {
        return Err(ReconstructError::InconsistentInput(
            "N must be at least 1".to_string(),
        ));
    }
    let walk = Walk::new(doors, labels)?;

    let mut rooms = vec![Room::unknown(); n];
    rooms[0].label = Some(walk.labels[0]);

    let mut memo: HashMap<String, bool> = HashMap::new();
    let mut visited = 0usize;
    let mut rng = StdRng::from_entropy();

    match dfs(n, &walk, rooms, 0, 0, &mut memo, &mut visited, node_budget, &mut rng)? {
        Some(map) => Ok(map),
        None => Err(ReconstructError::NoSolution),
    }
}

/// `Ok(Some(map))` on success, `Ok(None)` on an exhausted branch,
/// `Err` only for a logic error the pruning should have prevented.
#[allow(clippy::too_many_arguments)]
fn dfs(
    n: usize,
    walk: &Walk,
    rooms: Vec<Room>,
    i: usize,
    c: usize,
    memo: &mut HashMap<String, bool>,
    visited: &mut usize,
    node_budget: usize,
    rng: &mut StdRng,
) -> Result<Option<MapData>, ReconstructError> {
    *visited += 1;
    if *visited > node_budget {
        return Ok(None);
    }

    let digest = state_digest(&rooms, i, c);
    if let Some(&dead) = memo.get(&digest) {
        if dead {
            return Ok(None);
        }
    }

    if !prune_label_capacity(&rooms, n) {
        memo.insert(digest, true);
        return Ok(None);
    }
    if !prune_in_degree(&rooms) {
        memo.insert(digest, true);
        return Ok(None);
    }
    if !prune_connectivity(&rooms, n) {
        memo.insert(digest, true);
        return Ok(None);
    }
    if !prune_reverse_lookup(&rooms) {
        memo.insert(digest, true);
        return Ok(None);
    }

    if i == walk.len() {
        return match terminal(n, &rooms, rng)? {
            Some(map) => {
                memo.insert(digest, false);
                Ok(Some(map))
            }
            None => {
                memo.insert(digest, true);
                Ok(None)
            }
        };
    }

    let door = walk.doors[i];
    let next_label = walk.labels[i + 1];

    if let Some(next_room) = rooms[c].doors[door] {
        if rooms[next_room].label == Some(next_label) {
            if let Some(map) = dfs(
                n,
                walk,
                rooms.clone(),
                i + 1,
                next_room,
                memo,
                visited,
                node_budget,
                rng,
            )? {
                return Ok(Some(map));
            }
        }
        memo.insert(digest, true);
        return Ok(None);
    }

    // (a) exactly one fresh-room child: opening any unknown room is
    // symmetric to opening any other, so only the first is tried.
    if let Some(fresh) = rooms.iter().position(|r| r.label.is_none()) {
        let mut next_rooms = rooms.clone();
        next_rooms[fresh].label = Some(next_label);
        next_rooms[c].doors[door] = Some(fresh);
        if let Some(map) = dfs(
            n,
            walk,
            next_rooms,
            i + 1,
            fresh,
            memo,
            visited,
            node_budget,
            rng,
        )? {
            return Ok(Some(map));
        }
    }

    // (b) every already-labelled room carrying the required label.
    for r in 0..n {
        if rooms[r].label == Some(next_label) {
            let mut next_rooms = rooms.clone();
            next_rooms[c].doors[door] = Some(r);
            if let Some(map) = dfs(
                n,
                walk,
                next_rooms,
                i + 1,
                r,
                memo,
                visited,
                node_budget,
                rng,
            )? {
                return Ok(Some(map));
            }
        }
    }

    memo.insert(digest, true);
    Ok(None)
}

fn prune_label_capacity(rooms: &[Room], n: usize) -> bool {
    let cap = (n + 3) / 4;
    let mut counts = [0usize; 4];
    for room in rooms {
        if let Some(label) = room.label {
            counts[label as usize] += 1;
        }
    }
    counts.iter().all(|&count| count <= cap)
}

fn prune_in_degree(rooms: &[Room]) -> bool {
    let mut in_degree = vec![0usize; rooms.len()];
    for room in rooms {
        for target in room.doors.iter().flatten() {
            in_degree[*target] += 1;
        }
    }
    in_degree.iter().all(|&d| d <= DOORS)
}

fn prune_connectivity(rooms: &[Room], n: usize) -> bool {
    let mut uf = UnionFind::new(n);
    for (i, room) in rooms.iter().enumerate() {
        for target in room.doors.iter().flatten() {
            uf.union(i, *target);
        }
    }

    let roots: Vec<usize> = (0..n).map(|i| uf.find(i)).collect();
    let mut component_size: HashMap<usize, usize> = HashMap::new();
    for &root in &roots {
        *component_size.entry(root).or_insert(0) += 1;
    }
    let mut component_closed: HashMap<usize, bool> = HashMap::new();
    for i in 0..n {
        let entry = component_closed.entry(roots[i]).or_insert(true);
        if rooms[i].doors.iter().any(|d| d.is_none()) {
            *entry = false;
        }
    }

    for (root, size) in &component_size {
        if *size < n && component_closed[root] {
            return false;
        }
    }
    true
}

/// Fail-fast reverse-lookup check: every room that some determined door
/// already points at must have a door slot free for (or already assigned
/// to) each of its predecessors.
fn prune_reverse_lookup(rooms: &[Room]) -> bool {
    let n = rooms.len();
    let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (p, room) in rooms.iter().enumerate() {
        for target in room.doors.iter().flatten() {
            predecessors[*target].push(p);
        }
    }

    for r in 0..n {
        let mut used = [false; DOORS];
        for &p in &predecessors[r] {
            if !reserve_door_for_predecessor(&rooms[r], &mut used, p) {
                return false;
            }
        }
    }
    true
}

/// Tries to reserve a door of `room` for predecessor `p`: first a door
/// already pointing at `p`, else any free door.
fn reserve_door_for_predecessor(room: &Room, used: &mut [bool; DOORS], p: usize) -> bool {
    for door in 0..DOORS {
        if !used[door] && room.doors[door] == Some(p) {
            used[door] = true;
            return true;
        }
    }
    for door in 0..DOORS {
        if !used[door] && room.doors[door].is_none() {
            used[door] = true;
            return true;
        }
    }
    false
}

/// Runs at `i == walk.len()`: checks full closure, completes forced
/// reverse-lookup assignments, and randomly fills any doors that are still
/// unconstrained by the walk.
fn terminal(n: usize, rooms: &[Room], rng: &mut StdRng) -> Result<Option<MapData>, ReconstructError> {
    if rooms.iter().any(|r| r.label.is_none()) {
        return Ok(None);
    }

    let floor = n / 4;
    let ceil = (n + 3) / 4;
    let mut counts = [0usize; 4];
    for room in rooms {
        counts[room.label.expect("checked above") as usize] += 1;
    }
    if counts.iter().any(|&count| count != floor && count != ceil) {
        return Ok(None);
    }

    let mut uf = UnionFind::new(n);
    for (i, room) in rooms.iter().enumerate() {
        for target in room.doors.iter().flatten() {
            uf.union(i, *target);
        }
    }
    let root = uf.find(0);
    if (0..n).filter(|&i| uf.find(i) == root).count() != n {
        return Ok(None);
    }

    let mut rooms = rooms.to_vec();
    if !complete_reverse_lookup(&mut rooms) {
        return Ok(None);
    }
    fill_remaining_doors(&mut rooms, rng);

    let connections = connections::extract(&rooms)?;
    let room_labels = rooms
        .iter()
        .map(|r| r.label.expect("checked above"))
        .collect();

    Ok(Some(MapData {
        rooms: room_labels,
        starting_room: 0,
        connections,
    }))
}

/// Commits the forced predecessor assignments `prune_reverse_lookup` only
/// checked the feasibility of. Returns `false` if commitment turns out to
/// be impossible (an in-degree overflow the earlier prunes should have
/// already caught).
fn complete_reverse_lookup(rooms: &mut [Room]) -> bool {
    let n = rooms.len();
    let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (p, room) in rooms.iter().enumerate() {
        for target in room.doors.iter().flatten() {
            predecessors[*target].push(p);
        }
    }

    for r in 0..n {
        let mut used = [false; DOORS];
        let room_predecessors = predecessors[r].clone();
        for p in room_predecessors {
            let mut matched = false;
            for door in 0..DOORS {
                if !used[door] && rooms[r].doors[door] == Some(p) {
                    used[door] = true;
                    matched = true;
                    break;
                }
            }
            if matched {
                continue;
            }
            let mut assigned = false;
            for door in 0..DOORS {
                if !used[door] && rooms[r].doors[door].is_none() {
                    rooms[r].doors[door] = Some(p);
                    used[door] = true;
                    assigned = true;
                    break;
                }
            }
            if !assigned {
                return false;
            }
        }
    }
    true
}

/// Pairs every door still unconstrained by the walk with a uniformly
/// shuffled partner drawn from the same multiset of rooms that still need
/// an incoming door, so in-degree stays balanced.
fn fill_remaining_doors(rooms: &mut [Room], rng: &mut StdRng) {
    let mut owners: Vec<usize> = Vec::new();
    let mut slots: Vec<(usize, usize)> = Vec::new();
    for (i, room) in rooms.iter().enumerate() {
        for (door, target) in room.doors.iter().enumerate() {
            if target.is_none() {
                owners.push(i);
                slots.push((i, door));
            }
        }
    }
    owners.shuffle(rng);
    for (k, &(room, door)) in slots.iter().enumerate() {
        rooms[room].doors[door] = Some(owners[k]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solves_a_small_walk() {
        let map = solve(3, "012", &[0, 1, 2, 0]).unwrap();
        assert_eq!(map.rooms.len(), 3);
        let mut labels = map.rooms.clone();
        labels.sort_unstable();
        assert_eq!(labels, vec![0, 1, 2]);
    }

    #[test]
    fn rejects_invalid_input_before_searching() {
        let err = solve(3, "012", &[0, 1]).unwrap_err();
        assert!(matches!(err, ReconstructError::InconsistentInput(_)));
    }

    #[test]
    fn all_same_label_walk_can_self_loop() {
        let map = solve(3, "000000", &[0, 0, 0, 0, 0, 0, 0]).unwrap();
        assert_eq!(map.rooms[map.starting_room], 0);
    }
}
