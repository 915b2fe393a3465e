//! A local, in-process stand-in for the contest oracle.
//!
//! `Simulator` generates a random connected 6-regular map with labels drawn
//! from `{0,1,2,3}` and answers `explore`/`guess` exactly the way the real
//! oracle would. It exists so `icfpc2025-reconstruct` and the CLI can be
//! exercised end to end without a network connection, and so property tests
//! can generate arbitrary target maps to reconstruct against.

use anyhow::{bail, Result};
use async_trait::async_trait;
use icfpc2025_common::{
    ExploreResponse, GuessResponse, Map, MapConnection, RoomDoor, SelectResponse,
};
use rand::seq::SliceRandom;
use rand::Rng;

pub use icfpc2025_common::AedificiumClient;

const DOORS: usize = 6;

#[derive(Debug, Clone)]
pub struct Room {
    pub label: u8,
    /// `doors[d]` is the room this room's door `d` leads to. Always fully
    /// determined: the simulator's world is a complete 6-regular graph.
    pub doors: [usize; DOORS],
}

/// A disjoint-set structure over room indices, used only to guarantee the
/// generated map is connected.
struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            self.parent[x] = self.find(self.parent[x]);
        }
        self.parent[x]
    }

    fn union(&mut self, a: usize, b: usize) -> bool {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }
        self.parent[ra] = rb;
        true
    }
}

/// The hidden world: `room_count` rooms, each carrying one of four labels in
/// roughly equal proportion, wired into a connected 6-regular graph.
#[derive(Debug)]
pub struct Library {
    rooms: Vec<Room>,
    starting_room: usize,
    room_count: usize,
}

impl Library {
    pub fn generate(room_count: usize, rng: &mut impl Rng) -> Result<Self> {
        if room_count == 0 {
            bail!("Library must have at least one room");
        }

        let labels = balanced_labels(room_count, rng);
        let doors = random_connected_matching(room_count, rng);

        let rooms = labels
            .into_iter()
            .zip(doors.into_iter())
            .map(|(label, doors)| Room { label, doors })
            .collect();

        let starting_room = rng.gen_range(0..room_count);

        Ok(Self {
            rooms,
            starting_room,
            room_count,
        })
    }

    pub fn max_doorways(&self) -> usize {
        18 * self.room_count
    }
}

/// `room_count` labels in `{0,1,2,3}`, counts as equal as `room_count`
/// allows, in random room order.
fn balanced_labels(room_count: usize, rng: &mut impl Rng) -> Vec<u8> {
    let mut labels: Vec<u8> = (0..room_count).map(|i| (i % 4) as u8).collect();
    labels.shuffle(rng);
    labels
}

/// A uniformly random perfect matching on the `6 * room_count` door-ends,
/// repaired (by swapping pairs across components) until the induced graph is
/// connected.
fn random_connected_matching(room_count: usize, rng: &mut impl Rng) -> Vec<[usize; DOORS]> {
    let mut ends: Vec<(usize, usize)> = (0..room_count)
        .flat_map(|room| (0..DOORS).map(move |door| (room, door)))
        .collect();
    ends.shuffle(rng);

    // `pairs[k] = [end_a, end_b]`: the k-th edge of the matching.
    let mut pairs: Vec<[(usize, usize); 2]> = ends
        .chunks_exact(2)
        .map(|chunk| [chunk[0], chunk[1]])
        .collect();

    loop {
        let mut uf = UnionFind::new(room_count);
        for pair in &pairs {
            uf.union(pair[0].0, pair[1].0);
        }

        let mut roots: Vec<usize> = (0..room_count).map(|r| uf.find(r)).collect();
        roots.sort_unstable();
        roots.dedup();
        if roots.len() <= 1 {
            break;
        }

        // Merge two components by swapping one endpoint between a pair that
        // sits in the first component and a pair that sits elsewhere. This
        // keeps every room's degree at exactly 6.
        let first_root = uf.find(pairs[0][0].0);
        let other_pair_idx = pairs
            .iter()
            .position(|p| uf.find(p[0].0) != first_root)
            .expect("more than one component implies some pair crosses it");

        let a = pairs[0];
        let b = pairs[other_pair_idx];
        pairs[0] = [a[0], b[0]];
        pairs[other_pair_idx] = [a[1], b[1]];
    }

    let mut doors = vec![[0usize; DOORS]; room_count];
    for pair in &pairs {
        let (room_a, door_a) = pair[0];
        let (room_b, door_b) = pair[1];
        doors[room_a][door_a] = room_b;
        doors[room_b][door_b] = room_a;
    }
    doors
}

#[derive(Debug)]
pub struct Simulator {
    library: Library,
    current_doorways_used: usize,
}

impl Simulator {
    pub fn new(room_count: usize, rng: &mut impl Rng) -> Result<Self> {
        let library = Library::generate(room_count, rng)?;
        Ok(Self {
            library,
            current_doorways_used: 0,
        })
    }

    fn _select(&self, problem_name: String) -> Result<SelectResponse> {
        Ok(SelectResponse {
            data: serde_json::json!({ "problemName": problem_name }),
        })
    }

    fn _explore(&mut self, plans: Vec<String>) -> Result<ExploreResponse> {
        let mut results = Vec::new();

        for plan in plans {
            let mut current_room = self.library.starting_room;
            let mut room_labels = Vec::new();

            room_labels.push(self.library.rooms[current_room].label);
            self.current_doorways_used += 1;

            for door_char in plan.chars() {
                if self.current_doorways_used >= self.library.max_doorways() {
                    bail!("Maximum doorways exceeded for this library");
                }

                let door = match door_char.to_digit(10) {
                    Some(d) if (d as usize) < DOORS => d as usize,
                    _ => bail!("Invalid door number in plan: {}", door_char),
                };

                let next_room = self.library.rooms[current_room].doors[door];
                current_room = next_room;
                room_labels.push(self.library.rooms[current_room].label);
                self.current_doorways_used += 1;
            }

            results.push(room_labels);
        }

        Ok(ExploreResponse {
            results,
            query_count: self.current_doorways_used,
        })
    }

    fn find_reverse_door(&self, from_room: usize, to_room: usize) -> usize {
        self.library.rooms[to_room]
            .doors
            .iter()
            .position(|&connected| connected == from_room)
            .unwrap_or(0)
    }

    fn _guess(&self, map: Map) -> Result<GuessResponse> {
        if map.starting_room != self.library.starting_room {
            return Ok(GuessResponse { correct: false });
        }

        if map.rooms.len() != self.library.rooms.len() {
            return Ok(GuessResponse { correct: false });
        }
        let mut expected_labels: Vec<u8> =
            self.library.rooms.iter().map(|r| r.label).collect();
        let mut submitted_labels = map.rooms.clone();
        expected_labels.sort_unstable();
        submitted_labels.sort_unstable();
        if expected_labels != submitted_labels {
            return Ok(GuessResponse { correct: false });
        }

        let expected_connections = self.connections_canonical();
        let mut provided_connections: Vec<MapConnection> = map
            .connections
            .iter()
            .map(|conn| {
                if conn.from.room <= conn.to.room {
                    conn.clone()
                } else {
                    MapConnection {
                        from: conn.to.clone(),
                        to: conn.from.clone(),
                    }
                }
            })
            .collect();
        let mut expected_sorted = expected_connections.clone();
        expected_sorted.sort_by_key(connection_sort_key);
        provided_connections.sort_by_key(connection_sort_key);

        Ok(GuessResponse {
            correct: expected_sorted == provided_connections,
        })
    }

    fn connections_canonical(&self) -> Vec<MapConnection> {
        let mut seen = vec![[false; DOORS]; self.library.rooms.len()];
        let mut connections = Vec::new();
        for room_id in 0..self.library.rooms.len() {
            for door in 0..DOORS {
                if seen[room_id][door] {
                    continue;
                }
                let other_room = self.library.rooms[room_id].doors[door];
                let other_door = self
                    .library.rooms[other_room]
                    .doors
                    .iter()
                    .enumerate()
                    .position(|(d, &r)| r == room_id && !seen[other_room][d])
                    .unwrap_or_else(|| self.find_reverse_door(room_id, other_room));
                seen[room_id][door] = true;
                seen[other_room][other_door] = true;
                connections.push(MapConnection {
                    from: RoomDoor {
                        room: room_id,
                        door,
                    },
                    to: RoomDoor {
                        room: other_room,
                        door: other_door,
                    },
                });
            }
        }
        connections
    }

    pub fn get_library_info(&self) -> (usize, usize) {
        (self.library.room_count, self.current_doorways_used)
    }

    pub fn reset_exploration(&mut self) {
        self.current_doorways_used = 0;
    }

    pub fn starting_room(&self) -> usize {
        self.library.starting_room
    }

    pub fn room_labels(&self) -> Vec<u8> {
        self.library.rooms.iter().map(|r| r.label).collect()
    }

    pub fn get_actual_map(&self) -> Map {
        Map {
            rooms: self.room_labels(),
            starting_room: self.library.starting_room,
            connections: self.connections_canonical(),
        }
    }

    pub fn remaining_doorways(&self) -> usize {
        self.library
            .max_doorways()
            .saturating_sub(self.current_doorways_used)
    }
}

fn connection_sort_key(c: &MapConnection) -> (usize, usize, usize, usize) {
    (c.from.room, c.from.door, c.to.room, c.to.door)
}

#[async_trait]
impl AedificiumClient for Simulator {
    async fn select(&self, problem_name: String) -> Result<SelectResponse> {
        self._select(problem_name)
    }

    async fn explore(&mut self, plans: Vec<String>) -> Result<ExploreResponse> {
        self._explore(plans)
    }

    async fn guess(&self, data: Map) -> Result<GuessResponse> {
        self._guess(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_library_generation() {
        let mut rng = StdRng::seed_from_u64(42);
        let library = Library::generate(5, &mut rng).unwrap();
        assert_eq!(library.rooms.len(), 5);
        assert!(library.starting_room < 5);
    }

    #[test]
    fn generated_library_is_six_regular_and_connected() {
        let mut rng = StdRng::seed_from_u64(7);
        let library = Library::generate(12, &mut rng).unwrap();

        let mut uf = UnionFind::new(12);
        for room in &library.rooms {
            for &target in &room.doors {
                assert!(target < 12);
                uf.union(0, target);
            }
        }
        let root = uf.find(0);
        for room in 0..12 {
            assert_eq!(uf.find(room), root, "room {room} is disconnected");
        }
    }

    #[test]
    fn test_simulator_creation() {
        let mut rng = StdRng::seed_from_u64(123);
        let simulator = Simulator::new(3, &mut rng).unwrap();
        let (room_count, doorways_used) = simulator.get_library_info();
        assert_eq!(room_count, 3);
        assert_eq!(doorways_used, 0);
    }

    #[tokio::test]
    async fn test_simple_exploration() {
        let mut rng = StdRng::seed_from_u64(456);
        let mut simulator = Simulator::new(6, &mut rng).unwrap();
        let response = simulator
            .explore(vec!["012345".to_string()])
            .await
            .unwrap();

        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].len(), 7);
        for &observed_room in &response.results[0] {
            assert!(observed_room < 4);
        }
    }

    #[tokio::test]
    async fn actual_map_guesses_correct() {
        let mut rng = StdRng::seed_from_u64(9);
        let simulator = Simulator::new(8, &mut rng).unwrap();
        let map = simulator.get_actual_map();
        let response = simulator.guess(map).await.unwrap();
        assert!(response.correct);
    }

    #[tokio::test]
    async fn wrong_starting_room_guesses_incorrect() {
        let mut rng = StdRng::seed_from_u64(9);
        let simulator = Simulator::new(8, &mut rng).unwrap();
        let mut map = simulator.get_actual_map();
        map.starting_room = (map.starting_room + 1) % 8;
        let response = simulator.guess(map).await.unwrap();
        assert!(!response.correct);
    }
}
