// SPDX-License-Identifier: MIT OR Apache-2.0
//! Ramp scheduling on the engine clock.

use super::EngineEvent;
use express_train::{RampHandle, SpeedRamp};
use indexmap::IndexMap;

/// Active ramps keyed by handle.
///
/// Cancelling removes the entry synchronously, so a tick from a
/// cancelled handle can never be emitted afterwards.
pub(crate) struct RampTable {
    ramps: IndexMap<u64, SpeedRamp>,
    next_handle: u64,
}

impl RampTable {
    pub(crate) fn new() -> Self {
        Self {
            ramps: IndexMap::new(),
            next_handle: 0,
        }
    }

    pub(crate) fn schedule(&mut self, ramp: SpeedRamp) -> RampHandle {
        let handle = RampHandle(self.next_handle);
        self.next_handle += 1;
        self.ramps.insert(handle.0, ramp);
        handle
    }

    pub(crate) fn cancel(&mut self, handle: RampHandle) {
        self.ramps.shift_remove(&handle.0);
    }

    pub(crate) fn active_count(&self) -> usize {
        self.ramps.len()
    }

    /// Advance every ramp by `dt_ms`, emitting one tick each and
    /// dropping the ones that completed.
    pub(crate) fn advance(&mut self, dt_ms: f32, events: &mut Vec<EngineEvent>) {
        for (&handle, ramp) in &mut self.ramps {
            let value = ramp.advance(dt_ms);
            events.push(EngineEvent::RampTick {
                handle: RampHandle(handle),
                value,
                finished: ramp.is_finished(),
            });
        }
        self.ramps.retain(|_, ramp| !ramp.is_finished());
    }
}
