//! Single-flight execution guard for the analysis cycle.
//!
//! The gate is a semaphore of size one over a three-state phase:
//!
//!   Idle ──try_begin──▶ Requesting ──committing()──▶ Committing
//!    ▲                                                   │
//!    └──────────────── FlightGuard dropped ◀─────────────┘
//!
//! RULES:
//!   - `try_begin` only succeeds from Idle. A second caller is refused,
//!     never queued.
//!   - Dropping the guard is the only way back to Idle, so every exit
//!     path (commit, classifier failure, panic unwind) releases it.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU8, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum CyclePhase {
    Idle = 0,
    Requesting = 1,
    Committing = 2,
}

impl CyclePhase {
    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Self::Requesting,
            2 => Self::Committing,
            _ => Self::Idle,
        }
    }
}

#[derive(Debug, Default)]
pub struct CycleGate {
    phase: AtomicU8,
}

impl CycleGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> CyclePhase {
        CyclePhase::from_u8(self.phase.load(Ordering::Acquire))
    }

    pub fn is_idle(&self) -> bool {
        self.phase() == CyclePhase::Idle
    }

    /// Idle → Requesting, or `None` if a cycle is already in flight.
    pub fn try_begin(&self) -> Option<FlightGuard<'_>> {
        self.phase
            .compare_exchange(
                CyclePhase::Idle as u8,
                CyclePhase::Requesting as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .ok()
            .map(|_| FlightGuard { gate: self })
    }
}

/// Proof that the holder owns the in-flight slot.
#[must_use = "dropping the guard immediately returns the gate to Idle"]
pub struct FlightGuard<'a> {
    gate: &'a CycleGate,
}

impl FlightGuard<'_> {
    /// Requesting → Committing.
    pub fn committing(&self) {
        self.gate.phase.store(CyclePhase::Committing as u8, Ordering::Release);
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.gate.phase.store(CyclePhase::Idle as u8, Ordering::Release);
    }
}
