//! Turns a fully-determined `Rooms[N]` into the 3N door-pair `Connection`s
//! that make up a `MapData`. Grounded on the source solver's
//! `create_connections`.

use crate::error::ReconstructError;
use crate::room::{Connection, Room, RoomDoor, DOORS};

/// Pair up every door-end. `(i,j)`'s partner is the smallest-indexed
/// unclaimed door `k` at `rooms[i].doors[j]` that points back to `i`; a door
/// with no such partner is a self-loop iff it points at its own room.
pub fn extract(rooms: &[Room]) -> Result<Vec<Connection>, ReconstructError> {
    let n = rooms.len();
    let mut done = vec![[false; DOORS]; n];
    let mut connections = Vec::with_capacity(n * DOORS);

    for i in 0..n {
        for j in 0..DOORS {
            if done[i][j] {
                continue;
            }

            let dst = rooms[i].doors[j].ok_or_else(|| {
                ReconstructError::LogicError(format!(
                    "room {i} door {j} has no target at connection-extraction time"
                ))
            })?;

            let mut dst_door = None;
            for k in 0..DOORS {
                if !done[dst][k] && rooms[dst].doors[k] == Some(i) {
                    dst_door = Some(k);
                    break;
                }
            }

            let dst_door = match dst_door {
                Some(k) => k,
                None if i == dst => j,
                None => {
                    return Err(ReconstructError::LogicError(format!(
                        "door ({i},{j}) points to room {dst}, which has no free door back to {i}"
                    )));
                }
            };

            done[i][j] = true;
            done[dst][dst_door] = true;
            connections.push(Connection {
                src: RoomDoor { room: i, door: j },
                dst: RoomDoor {
                    room: dst,
                    door: dst_door,
                },
            });
        }
    }

    Ok(connections)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(label: u8, doors: [usize; DOORS]) -> Room {
        Room {
            label: Some(label),
            doors: doors.map(Some),
        }
    }

    #[test]
    fn emits_3n_connections_with_every_door_used_once() {
        // Two rooms, fully wired to each other (including two self-loops).
        let rooms = vec![room(0, [0, 1, 1, 1, 1, 1]), room(1, [1, 0, 0, 0, 0, 0])];
        let connections = extract(&rooms).unwrap();
        assert_eq!(connections.len(), 2 * DOORS);

        let mut seen = vec![[false; DOORS]; 2];
        for c in &connections {
            assert!(!seen[c.src.room][c.src.door]);
            assert!(!seen[c.dst.room][c.dst.door]);
            seen[c.src.room][c.src.door] = true;
            seen[c.dst.room][c.dst.door] = true;
        }
        assert!(seen.iter().all(|doors| doors.iter().all(|&d| d)));
    }

    #[test]
    fn pure_self_loop_room_pairs_every_door_to_itself() {
        let rooms = vec![room(0, [0, 0, 0, 0, 0, 0])];
        let connections = extract(&rooms).unwrap();
        assert_eq!(connections.len(), DOORS);
        for c in &connections {
            assert_eq!(c.src.room, 0);
            assert_eq!(c.dst.room, 0);
            assert_eq!(c.src.door, c.dst.door);
        }
    }

    #[test]
    fn missing_reciprocal_door_is_a_logic_error() {
        // Room 0's door 0 points at room 1, but room 1 has nothing back to 0.
        let rooms = vec![room(0, [1, 1, 1, 1, 1, 1]), room(1, [1, 1, 1, 1, 1, 1])];
        let err = extract(&rooms).unwrap_err();
        assert!(matches!(err, ReconstructError::LogicError(_)));
    }
}
