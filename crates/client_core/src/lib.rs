pub mod command;
pub mod config;
pub mod control_state;
pub mod controller;
pub mod error;
pub mod orientation;
pub mod session;
pub mod touch;
pub mod transport;

pub use command::CommandSender;
pub use config::{load_settings, ControllerSettings};
pub use control_state::{ControlState, Pedal};
pub use controller::Controller;
pub use error::SessionError;
pub use orientation::{Orientation, OrientationEstimator, SensorKind};
pub use session::{SessionStatus, StreamingSession};
pub use touch::{map_touch_to_axis, TouchZone};
pub use transport::{DatagramChannel, DatagramTransport, Endpoint, UdpTransport};

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod controller_tests;

#[cfg(test)]
#[path = "tests/command_tests.rs"]
mod command_tests;
