//! Reconstructs a candidate map from a walk's observed label sequence.
//!
//! Given `(N, doors, labels)`, [`solve`] runs the exact DFS backtracking
//! search, [`solve2`] runs the simulated-annealing metaheuristic, and
//! [`reconstruct`] picks between them by problem size. All three return a
//! [`MapData`] convertible to the wire [`icfpc2025_common::Map`] format.
//! The core performs no I/O.

mod anneal;
mod connections;
mod digest;
mod dfs;
mod error;
mod orchestrator;
mod room;
mod walk;

pub use anneal::{AnnealState, Feedback};
pub use error::ReconstructError;
pub use room::{Connection, Room, RoomDoor};
pub use walk::Walk;

use icfpc2025_common::{Map, MapConnection};
use room::DOORS;

/// The solver's own candidate-map representation: room labels, a start
/// room, and the door-pair matching. Distinct from the wire `Map` type
/// (see module docs); [`From`]/[`TryFrom`] convert between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapData {
    pub rooms: Vec<u8>,
    pub starting_room: usize,
    pub connections: Vec<Connection>,
}

impl From<MapData> for Map {
    fn from(data: MapData) -> Self {
        Map {
            rooms: data.rooms,
            starting_room: data.starting_room,
            connections: data
                .connections
                .into_iter()
                .map(|c| MapConnection {
                    from: icfpc2025_common::RoomDoor {
                        room: c.src.room,
                        door: c.src.door,
                    },
                    to: icfpc2025_common::RoomDoor {
                        room: c.dst.room,
                        door: c.dst.door,
                    },
                })
                .collect(),
        }
    }
}

impl TryFrom<Map> for MapData {
    type Error = ReconstructError;

    fn try_from(map: Map) -> Result<Self, Self::Error> {
        let n = map.rooms.len();
        for connection in &map.connections {
            for end in [&connection.from, &connection.to] {
                if end.room >= n || end.door >= DOORS {
                    return Err(ReconstructError::InconsistentInput(format!(
                        "connection references door ({}, {}) outside a {}-room, {}-door map",
                        end.room, end.door, n, DOORS
                    )));
                }
            }
        }
        if map.starting_room >= n {
            return Err(ReconstructError::InconsistentInput(format!(
                "starting_room {} is outside [0, {})",
                map.starting_room, n
            )));
        }

        Ok(MapData {
            rooms: map.rooms,
            starting_room: map.starting_room,
            connections: map
                .connections
                .into_iter()
                .map(|c| Connection {
                    src: RoomDoor {
                        room: c.from.room,
                        door: c.from.door,
                    },
                    dst: RoomDoor {
                        room: c.to.room,
                        door: c.to.door,
                    },
                })
                .collect(),
        })
    }
}

/// Exact DFS backtracking solver. See the `dfs` module for the algorithm.
pub fn solve(n: usize, doors: &str, labels: &[u8]) -> Result<MapData, ReconstructError> {
    dfs::solve(n, doors, labels)
}

/// Simulated-annealing metaheuristic solver. See the `anneal` module.
pub fn solve2(n: usize, doors: &str, labels: &[u8]) -> Result<MapData, ReconstructError> {
    anneal::solve(n, doors, labels)
}

/// Picks DFS or annealing based on problem size and runs it.
pub fn reconstruct(n: usize, doors: &str, labels: &[u8]) -> Result<MapData, ReconstructError> {
    orchestrator::reconstruct(n, doors, labels)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_map() -> MapData {
        MapData {
            rooms: vec![0, 1, 2],
            starting_room: 1,
            connections: vec![Connection {
                src: RoomDoor { room: 0, door: 0 },
                dst: RoomDoor { room: 1, door: 1 },
            }],
        }
    }

    #[test]
    fn map_data_round_trips_through_wire_map() {
        let original = sample_map();
        let wire: Map = original.clone().into();
        assert_eq!(wire.starting_room, 1);
        assert_eq!(wire.connections[0].from.room, 0);
        assert_eq!(wire.connections[0].to.door, 1);

        let back = MapData::try_from(wire).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn wire_map_serializes_with_camel_case_starting_room() {
        let wire: Map = sample_map().into();
        let json = serde_json::to_string(&wire).unwrap();
        assert!(json.contains("\"startingRoom\""));
    }

    #[test]
    fn try_from_rejects_out_of_range_starting_room() {
        let wire = Map {
            rooms: vec![0, 1],
            starting_room: 5,
            connections: vec![],
        };
        let err = MapData::try_from(wire).unwrap_err();
        assert!(matches!(err, ReconstructError::InconsistentInput(_)));
    }

    #[test]
    fn try_from_rejects_out_of_range_connection() {
        let wire = Map {
            rooms: vec![0, 1],
            starting_room: 0,
            connections: vec![MapConnection {
                from: icfpc2025_common::RoomDoor { room: 0, door: 9 },
                to: icfpc2025_common::RoomDoor { room: 1, door: 0 },
            }],
        };
        let err = MapData::try_from(wire).unwrap_err();
        assert!(matches!(err, ReconstructError::InconsistentInput(_)));
    }
}
