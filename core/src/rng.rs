//! Deterministic random number generation.
//!
//! RULE: Nothing in the scheduler may call any platform RNG.
//! All randomness flows through RotationRng instances derived
//! from the single master seed recorded on the generation row.
//!
//! Each stream is seeded from (master_seed XOR stream_index * golden),
//! so adding a new stream never changes the existing ones.

use rand::{seq::SliceRandom, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// A named, deterministic RNG for a single stream.
pub struct RotationRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl RotationRng {
    /// Stream RNG for `stream_index` under `master_seed`. The index of a
    /// stream must never change once assigned.
    pub fn new(master_seed: u64, stream_index: u64) -> Self {
        let derived_seed = master_seed ^ stream_index.wrapping_mul(0x9e37_79b9_7f4a_7c15);
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.inner);
        log::trace!("rng[{}]: shuffled {} items", self.name, items.len());
    }
}

/// All stream RNGs for a single generation, indexed by stable slot.
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn for_stream(&self, slot: StreamSlot) -> RotationRng {
        RotationRng::new(self.master_seed, slot as u64).with_name(slot.name())
    }
}

/// Stable stream slot assignments.
/// NEVER reorder or remove entries, only append.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum StreamSlot {
    PrimaryRotation = 0,
}

impl StreamSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::PrimaryRotation => "primary_rotation",
        }
    }
}
