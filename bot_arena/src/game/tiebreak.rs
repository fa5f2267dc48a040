//! Deterministic tiebreaks.
//!
//! Never random: the winner is derived from a SHA-256 digest of the two team
//! names (in seat order) and the round number, so replaying a match always
//! picks the same side.

use super::entities::Side;
use sha2::{Digest, Sha256};

/// Stable 64-bit hash of arbitrary string parts
pub fn stable_hash(parts: &[&str]) -> u64 {
    let mut hasher = Sha256::new();
    for (idx, part) in parts.iter().enumerate() {
        if idx > 0 {
            hasher.update(b"|");
        }
        hasher.update(part.as_bytes());
    }
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}

/// Pick a winner when both bots failed, or when nothing else separates them
pub fn tiebreak_winner(bot1: &str, bot2: &str, round: u32) -> Side {
    let round = round.to_string();
    if stable_hash(&[bot1, bot2, &round]) % 2 == 0 {
        Side::Player1
    } else {
        Side::Player2
    }
}
