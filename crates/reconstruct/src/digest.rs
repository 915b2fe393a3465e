//! Content digest of a DFS search state, used as the memoization key.
//!
//! Grounded on the source solver's `serialize_state`, which hashes the same
//! fields with SHA-256; this crate reaches for `sha2` for the same reason.

use sha2::{Digest, Sha256};

use crate::room::Room;

const UNKNOWN_SENTINEL: u64 = u64::MAX;

pub(crate) fn state_digest(rooms: &[Room], walk_index: usize, current_room: usize) -> String {
    let mut hasher = Sha256::new();

    for room in rooms {
        hasher.update([room.label.unwrap_or(u8::MAX)]);
        for door in room.doors {
            let encoded = door.map(|d| d as u64).unwrap_or(UNKNOWN_SENTINEL);
            hasher.update(encoded.to_le_bytes());
        }
    }
    hasher.update((walk_index as u64).to_le_bytes());
    hasher.update((current_room as u64).to_le_bytes());

    let digest = hasher.finalize();
    digest.iter().map(|byte| format!("{byte:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::room::DOORS;

    fn room(label: Option<u8>, doors: [Option<usize>; DOORS]) -> Room {
        Room { label, doors }
    }

    #[test]
    fn identical_states_digest_identically() {
        let rooms = vec![room(Some(0), [Some(1), None, None, None, None, None])];
        assert_eq!(state_digest(&rooms, 2, 0), state_digest(&rooms, 2, 0));
    }

    #[test]
    fn distinct_states_digest_differently() {
        let a = vec![room(Some(0), [Some(1), None, None, None, None, None])];
        let b = vec![room(Some(0), [Some(2), None, None, None, None, None])];
        assert_ne!(state_digest(&a, 0, 0), state_digest(&b, 0, 0));
        assert_ne!(state_digest(&a, 0, 0), state_digest(&a, 1, 0));
        assert_ne!(state_digest(&a, 0, 0), state_digest(&a, 0, 1));
    }
}
