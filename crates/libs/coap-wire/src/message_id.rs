//! Message-ID assignment for generated packets.

use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::OnceLock;

use rand_core::{OsRng, RngCore};

/// Generated IDs stay in [0, WRAP]; the increment wraps WRAP back to 0.
const WRAP: u16 = 65534;

/// Counter behind the message IDs assigned during generation.
///
/// [`generate`](crate::generate) draws from a process-wide instance; tests
/// pass their own through [`generate_with`](crate::generate_with) to get a
/// deterministic sequence. The advance is a single atomic update, so
/// concurrent generation never hands out duplicate or skipped IDs.
#[derive(Debug)]
pub struct MessageIdGenerator {
    next: AtomicU16,
}

impl MessageIdGenerator {
    /// Seeds from OS randomness.
    pub fn new() -> Self {
        let seed = (OsRng.next_u32() % (u32::from(WRAP) + 1)) as u16;
        Self::from_seed(seed)
    }

    /// Starts the sequence at `seed`, taken modulo 65535.
    pub fn from_seed(seed: u16) -> Self {
        Self { next: AtomicU16::new(seed % (WRAP + 1)) }
    }

    /// Returns the next ID and advances the counter.
    pub fn next_id(&self) -> u16 {
        self.next
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |id| {
                Some(if id >= WRAP { 0 } else { id + 1 })
            })
            .unwrap_or_else(|id| id)
    }
}

impl Default for MessageIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-wide generator backing `generate` calls without an explicit ID.
pub(crate) fn shared() -> &'static MessageIdGenerator {
    static SHARED: OnceLock<MessageIdGenerator> = OnceLock::new();
    SHARED.get_or_init(MessageIdGenerator::new)
}
