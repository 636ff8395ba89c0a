//! Unique ids for outbound calls.

use std::fmt::Write;

use parking_lot::Mutex;
use rand::{rngs::SmallRng, RngCore, SeedableRng};

/// Process-wide source of correlation ids.
///
/// Every outbound call gets a v4-shaped UUID drawn from a guarded rng. 122
/// random bits make a repeat within one process lifetime vanishingly
/// unlikely, and the mutex keeps concurrent connectors from tearing a draw,
/// so the ids coming out are distinct no matter how many connectors share
/// the source. Callers rely on uniqueness only; there is no ordering.
pub struct CorrelationIds {
    rng: Mutex<SmallRng>,
}

impl CorrelationIds {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(SmallRng::from_os_rng()),
        }
    }

    /// Reproducible id stream for tests.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(SmallRng::seed_from_u64(seed)),
        }
    }

    pub fn next_id(&self) -> String {
        let mut bytes = [0u8; 16];
        self.rng.lock().fill_bytes(&mut bytes);
        bytes[6] = (bytes[6] & 0x0f) | 0x40;
        bytes[8] = (bytes[8] & 0x3f) | 0x80;
        let mut s = String::with_capacity(36);
        for (i, b) in bytes.iter().enumerate() {
            if matches!(i, 4 | 6 | 8 | 10) {
                s.push('-');
            }
            write!(s, "{b:02x}").unwrap();
        }
        s
    }
}

impl Default for CorrelationIds {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{collections::HashSet, sync::Arc, thread};

    #[test]
    fn ids_are_v4_shaped() {
        let ids = CorrelationIds::with_seed(42);
        for _ in 0..100 {
            let id = ids.next_id();
            assert_eq!(id.len(), 36);
            let dashes: Vec<_> = id.match_indices('-').map(|(i, _)| i).collect();
            assert_eq!(dashes, vec![8, 13, 18, 23]);
            assert_eq!(&id[14..15], "4");
            assert!(matches!(&id[19..20], "8" | "9" | "a" | "b"));
        }
    }

    #[test]
    fn seeded_streams_are_reproducible() {
        let a = CorrelationIds::with_seed(7);
        let b = CorrelationIds::with_seed(7);
        for _ in 0..5 {
            assert_eq!(a.next_id(), b.next_id());
        }
    }

    #[test]
    fn concurrent_callers_never_collide() {
        let ids = Arc::new(CorrelationIds::new());
        let mut handles = Vec::new();
        for _ in 0..2 {
            let ids = Arc::clone(&ids);
            handles.push(thread::spawn(move || {
                (0..10_000).map(|_| ids.next_id()).collect::<Vec<_>>()
            }));
        }
        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "duplicate correlation id issued");
            }
        }
        assert_eq!(seen.len(), 20_000);
    }
}
