//! Ad slot registration.
//!
//! An [`AdSlot`] registers at most one display request with the ad-serving
//! queue over its mounted lifetime, and none at all while disabled.

use serde::Serialize;
use tracing::{debug, info};

use crate::io::config::AdConfig;

/// Display request handed to the ad-serving queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdSlotRequest {
    pub unit: String,
    pub width: u32,
    pub height: u32,
}

/// Global ad-serving queue, modeled as a capability.
pub trait AdQueue {
    fn register_ad_slot(&mut self, request: &AdSlotRequest);
}

/// Queue that only traces requests; used where no ad network is available.
#[derive(Debug, Default)]
pub struct TracingAdQueue;

impl AdQueue for TracingAdQueue {
    fn register_ad_slot(&mut self, request: &AdSlotRequest) {
        info!(unit = %request.unit, width = request.width, height = request.height, "ad slot registered");
    }
}

#[derive(Debug, Clone)]
pub struct AdSlot {
    request: AdSlotRequest,
    disabled: bool,
    registered: bool,
}

impl AdSlot {
    pub fn new(unit: impl Into<String>, width: u32, height: u32, disabled: bool) -> Self {
        Self {
            request: AdSlotRequest {
                unit: unit.into(),
                width,
                height,
            },
            disabled,
            registered: false,
        }
    }

    pub fn from_config(cfg: &AdConfig) -> Self {
        Self::new(cfg.unit.clone(), cfg.width, cfg.height, cfg.disabled)
    }

    /// Mount the slot. Registers with `queue` the first time an enabled slot is
    /// mounted; returns whether a registration happened on this call.
    pub fn mount(&mut self, queue: &mut dyn AdQueue) -> bool {
        if self.disabled || self.registered {
            debug!(
                disabled = self.disabled,
                registered = self.registered,
                "ad slot mount skipped"
            );
            return false;
        }
        queue.register_ad_slot(&self.request);
        self.registered = true;
        true
    }

    /// Disabling never undoes an earlier registration, but blocks any later one.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn is_registered(&self) -> bool {
        self.registered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingAdQueue;

    #[test]
    fn registers_once_per_mounted_slot() {
        let mut queue = RecordingAdQueue::default();
        let mut slot = AdSlot::new("DAN-unit", 320, 50, false);

        assert!(slot.mount(&mut queue));
        assert!(!slot.mount(&mut queue));

        assert_eq!(
            queue.requests,
            vec![AdSlotRequest {
                unit: "DAN-unit".to_string(),
                width: 320,
                height: 50,
            }]
        );
    }

    #[test]
    fn disabled_slot_never_registers() {
        let mut queue = RecordingAdQueue::default();
        let mut slot = AdSlot::new("DAN-unit", 320, 50, true);
        assert!(!slot.mount(&mut queue));

        let mut later = AdSlot::new("DAN-unit", 320, 50, false);
        later.set_disabled(true);
        assert!(!later.mount(&mut queue));

        assert!(queue.requests.is_empty());
        assert!(!later.is_registered());
    }
}
