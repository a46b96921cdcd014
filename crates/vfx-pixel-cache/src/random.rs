//! Lazily-initialised per-descriptor random state.
//!
//! Backs the `Random` virtual-pixel policy, the 12-character temp-file
//! suffix, and the server-side nonce in the remote handshake. Grounded on
//! `rand::rngs::StdRng` the way `vfx-exr` and `vfx-icc` already depend on
//! `rand` elsewhere in this workspace; guarded by a `Mutex` rather than
//! `Cell` because a descriptor's random state is reachable from any thread
//! through its nexus array.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

const TEMP_SUFFIX_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// A descriptor's random service, created on first use (the `Random`
/// virtual-pixel policy, or the first temp file the descriptor needs).
pub struct RandomState {
    rng: Mutex<StdRng>,
}

impl std::fmt::Debug for RandomState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RandomState").finish_non_exhaustive()
    }
}

impl RandomState {
    /// Seeds from the OS entropy source.
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Returns a uniform `f64` in `[0, 1)`, used to pick the virtual-pixel
    /// `Random` policy's sample coordinate (`rand()*columns`, `rand()*rows`).
    pub fn next_unit(&self) -> f64 {
        self.rng.lock().expect("random state mutex poisoned").r#gen()
    }

    /// Returns a uniform coordinate in `[0, extent)`.
    pub fn next_coordinate(&self, extent: u32) -> u32 {
        if extent == 0 {
            return 0;
        }
        (self.next_unit() * extent as f64) as u32
    }

    /// Fills `buf` with cryptographically-irrelevant but unpredictable bytes,
    /// used for the temp-file suffix and (via a fresh, process-level source)
    /// the handshake nonce.
    pub fn fill_bytes(&self, buf: &mut [u8]) {
        self.rng.lock().expect("random state mutex poisoned").fill_bytes(buf);
    }

    /// Produces the 12-character `[A-Za-z0-9_-]` suffix spec.md §6 specifies
    /// for temp-file basenames.
    pub fn temp_suffix(&self) -> String {
        let mut rng = self.rng.lock().expect("random state mutex poisoned");
        (0..12)
            .map(|_| {
                let idx = rng.gen_range(0..TEMP_SUFFIX_ALPHABET.len());
                TEMP_SUFFIX_ALPHABET[idx] as char
            })
            .collect()
    }

    /// Generates an 8-byte handshake nonce (see `crate::remote::protocol`).
    pub fn nonce(&self) -> [u8; 8] {
        let mut bytes = [0u8; 8];
        self.fill_bytes(&mut bytes);
        bytes
    }
}

impl Default for RandomState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_coordinate_stays_in_bounds() {
        let state = RandomState::new();
        for _ in 0..256 {
            let c = state.next_coordinate(17);
            assert!(c < 17);
        }
    }

    #[test]
    fn zero_extent_is_always_zero() {
        let state = RandomState::new();
        assert_eq!(state.next_coordinate(0), 0);
    }

    #[test]
    fn temp_suffix_is_twelve_legal_characters() {
        let state = RandomState::new();
        let suffix = state.temp_suffix();
        assert_eq!(suffix.len(), 12);
        assert!(suffix
            .bytes()
            .all(|b| TEMP_SUFFIX_ALPHABET.contains(&b)));
    }

    #[test]
    fn nonce_is_eight_bytes() {
        let state = RandomState::new();
        assert_eq!(state.nonce().len(), 8);
    }
}
