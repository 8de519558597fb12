use std::{fmt, str::FromStr};

use serde::Deserialize;
use shared::domain::ControlFrame;
use tracing::info;

const STEERING_SPAN: f64 = 32768.0;
const Y_FORWARD: i32 = 0;
const Y_NEUTRAL: i32 = 16384;
const Y_REVERSE: i32 = 32768;

/// How a control frame is laid out on the virtual joystick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Profile {
    /// X steers over ±90° of tilt; throttle and brake drive Y and Z as-is.
    #[default]
    SplitPedals,
    /// X steers over ±45° of tilt; throttle and brake fold into one Y axis.
    CombinedY,
}

impl Profile {
    /// Widest tilt the steering axis distinguishes, in degrees either way.
    pub fn max_tilt(self) -> i32 {
        match self {
            Profile::SplitPedals => 90,
            Profile::CombinedY => 45,
        }
    }

    pub fn axes(self, frame: ControlFrame) -> Axes {
        let x = steering_axis(frame.roll, self.max_tilt());
        match self {
            Profile::SplitPedals => Axes {
                x,
                y: i32::from(frame.throttle),
                z: Some(i32::from(frame.brake)),
            },
            Profile::CombinedY => Axes {
                x,
                y: combined_y(frame.throttle, frame.brake),
                z: None,
            },
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Profile::SplitPedals => f.write_str("split_pedals"),
            Profile::CombinedY => f.write_str("combined_y"),
        }
    }
}

impl FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "split_pedals" => Ok(Profile::SplitPedals),
            "combined_y" => Ok(Profile::CombinedY),
            other => Err(format!("unknown gamepad profile '{other}'")),
        }
    }
}

/// Joystick axis values; `z` is left untouched when `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Axes {
    pub x: i32,
    pub y: i32,
    pub z: Option<i32>,
}

/// Maps device roll to the steering axis.
///
/// Roll is inverted so that tilting right steers right, clamped to
/// ±`max_tilt`, and scaled so that 45° of tilt spans the full axis.
pub fn steering_axis(roll: i32, max_tilt: i32) -> i32 {
    let roll = roll.saturating_neg().clamp(-max_tilt, max_tilt);
    ((f64::from(roll) + 45.0) / 90.0 * STEERING_SPAN) as i32
}

/// Brake alone reverses, throttle alone goes forward, anything else is neutral.
pub fn combined_y(throttle: u16, brake: u16) -> i32 {
    match (throttle > 0, brake > 0) {
        (false, true) => Y_REVERSE,
        (true, false) => Y_FORWARD,
        _ => Y_NEUTRAL,
    }
}

pub trait VirtualGamepad: Send {
    fn set_axes(&mut self, axes: Axes);
    fn set_button(&mut self, button: u8, pressed: bool);
}

/// Gamepad that only reports what it would drive.
#[derive(Debug, Default)]
pub struct LoggingGamepad {
    last: Axes,
}

impl LoggingGamepad {
    pub fn last(&self) -> Axes {
        self.last
    }
}

impl VirtualGamepad for LoggingGamepad {
    fn set_axes(&mut self, axes: Axes) {
        self.last = axes;
        info!(x = axes.x, y = axes.y, z = ?axes.z, "gamepad: axes");
    }

    fn set_button(&mut self, button: u8, pressed: bool) {
        info!(button, pressed, "gamepad: button");
    }
}

#[cfg(test)]
#[path = "tests/gamepad_tests.rs"]
mod tests;
