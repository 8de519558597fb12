use std::sync::Arc;

use shared::domain::AXIS_MAX;

use crate::control_state::{ControlState, Pedal};

/// Maps a vertical touch coordinate inside a region to a pedal value.
///
/// The top edge (`y == 0`) is full deflection and the bottom edge is zero.
/// Positions outside `[0, height]` are clamped, so an overshooting drag is not
/// an error. `height` must be positive; it is the rendered extent of the
/// control.
pub fn map_touch_to_axis(y: f32, height: f32) -> u16 {
    debug_assert!(height > 0.0, "touch region height must be positive");
    let clamped = f64::from(y.clamp(0.0, height));
    let normalized = 1.0 - clamped / f64::from(height);
    (normalized * f64::from(AXIS_MAX)).round() as u16
}

/// One pressure zone on screen, bound to a pedal in the [`ControlState`].
///
/// Drives the per-contact lifecycle: a value on press, a fresh value on every
/// drag, and exactly zero on release or cancel.
#[derive(Debug)]
pub struct TouchZone {
    pedal: Pedal,
    height: f32,
    state: Arc<ControlState>,
}

impl TouchZone {
    pub fn new(pedal: Pedal, height: f32, state: Arc<ControlState>) -> Self {
        Self {
            pedal,
            height,
            state,
        }
    }

    pub fn pedal(&self) -> Pedal {
        self.pedal
    }

    /// Updates the region extent after a re-layout.
    pub fn set_height(&mut self, height: f32) {
        self.height = height;
    }

    pub fn press(&self, y: f32) -> u16 {
        self.emit(map_touch_to_axis(y, self.height))
    }

    pub fn drag(&self, y: f32) -> u16 {
        self.emit(map_touch_to_axis(y, self.height))
    }

    /// Contact lifted or lost.
    pub fn release(&self) -> u16 {
        self.emit(0)
    }

    fn emit(&self, value: u16) -> u16 {
        self.state.set_pedal(self.pedal, value);
        value
    }
}

#[cfg(test)]
#[path = "tests/touch_tests.rs"]
mod tests;
