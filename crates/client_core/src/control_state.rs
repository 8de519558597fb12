use std::sync::atomic::{AtomicI32, AtomicU16, Ordering};

use shared::domain::{ControlFrame, AXIS_MAX};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pedal {
    Throttle,
    Brake,
}

#[derive(Debug, Default)]
pub struct ControlState {
    roll: AtomicI32,
    throttle: AtomicU16,
    brake: AtomicU16,
}

impl ControlState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_roll(&self, degrees: i32) {
        self.roll.store(degrees, Ordering::Release);
    }

    pub fn roll(&self) -> i32 {
        self.roll.load(Ordering::Acquire)
    }

    /// Stores a pedal value, saturating at [`AXIS_MAX`].
    pub fn set_pedal(&self, pedal: Pedal, value: u16) {
        let value = value.min(AXIS_MAX);
        match pedal {
            Pedal::Throttle => self.throttle.store(value, Ordering::Release),
            Pedal::Brake => self.brake.store(value, Ordering::Release),
        }
    }

    pub fn pedal(&self, pedal: Pedal) -> u16 {
        match pedal {
            Pedal::Throttle => self.throttle.load(Ordering::Acquire),
            Pedal::Brake => self.brake.load(Ordering::Acquire),
        }
    }

    pub fn snapshot(&self) -> ControlFrame {
        ControlFrame::new(
            self.roll(),
            self.pedal(Pedal::Throttle),
            self.pedal(Pedal::Brake),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_latest_writes() {
        let state = ControlState::new();
        assert_eq!(state.snapshot(), ControlFrame::default());

        state.set_roll(10);
        state.set_pedal(Pedal::Throttle, 5000);
        assert_eq!(state.snapshot(), ControlFrame::new(10, 5000, 0));

        state.set_pedal(Pedal::Brake, 700);
        state.set_roll(-3);
        assert_eq!(state.snapshot(), ControlFrame::new(-3, 5000, 700));
    }

    #[test]
    fn pedal_values_saturate_at_axis_max() {
        let state = ControlState::new();
        state.set_pedal(Pedal::Brake, u16::MAX);
        assert_eq!(state.pedal(Pedal::Brake), AXIS_MAX);
    }
}
