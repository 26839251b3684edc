//! Randomness derivations for encounter outcomes.
//!
//! Both derivations hash `abi.encodePacked` of `uint256` words with keccak256,
//! so outcomes match the deployed contract bit for bit. Neither is
//! cryptographically secure: the provider seed is chosen off-chain and the
//! fallback is computed from block context anyone can observe.

use alloy_primitives::{U256, keccak256};

use crate::state::{EncounterId, Timestamp};

/// `keccak256(abi.encodePacked(uint256 seed, uint256 encounterId))`.
///
/// Binding the seed to the encounter keeps a reused seed from replaying the
/// same outcome across encounters.
pub fn derive_random_number(seed: U256, encounter: EncounterId) -> U256 {
    hash_words(&[seed, encounter.as_word()])
}

/// `keccak256(abi.encodePacked(uint256 timestamp, uint256 prevrandao, uint256 encounterId))`.
///
/// Only used by the admin sweep to unstick encounters nobody fulfilled.
pub fn fallback_random_number(
    timestamp: Timestamp,
    prevrandao: U256,
    encounter: EncounterId,
) -> U256 {
    hash_words(&[U256::from(timestamp), prevrandao, encounter.as_word()])
}

fn hash_words(words: &[U256]) -> U256 {
    let mut packed = Vec::with_capacity(words.len() * 32);
    for word in words {
        packed.extend_from_slice(&word.to_be_bytes::<32>());
    }
    U256::from_be_bytes(keccak256(&packed).0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_abi_encode_packed_layout() {
        let mut packed = [0u8; 64];
        packed[31] = 7;
        packed[63] = 1;
        let expected = U256::from_be_bytes(keccak256(packed).0);

        assert_eq!(derive_random_number(U256::from(7), EncounterId(1)), expected);
    }

    #[test]
    fn empty_input_hash_is_keccak_of_nothing() {
        // keccak256("") is a well-known constant
        assert_eq!(
            hex::encode(hash_words(&[]).to_be_bytes::<32>()),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn same_seed_differs_per_encounter() {
        let seed = U256::from(12_345);
        assert_ne!(
            derive_random_number(seed, EncounterId(1)),
            derive_random_number(seed, EncounterId(2))
        );
    }

    #[test]
    fn fallback_depends_on_every_input() {
        let base = fallback_random_number(10, U256::from(3), EncounterId(1));
        assert_ne!(base, fallback_random_number(11, U256::from(3), EncounterId(1)));
        assert_ne!(base, fallback_random_number(10, U256::from(4), EncounterId(1)));
        assert_ne!(base, fallback_random_number(10, U256::from(3), EncounterId(2)));
        assert_ne!(base, U256::ZERO);
    }
}
