/// Full deflection of a pedal axis.
pub const AXIS_MAX: u16 = 32767;

/// One snapshot of the steering controls as it goes on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlFrame {
    /// Signed tilt in whole degrees, effectively -90..=90.
    pub roll: i32,
    pub throttle: u16,
    pub brake: u16,
}

impl ControlFrame {
    pub fn new(roll: i32, throttle: u16, brake: u16) -> Self {
        Self {
            roll,
            throttle,
            brake,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Restart,
}

impl Command {
    pub fn token(self) -> &'static str {
        match self {
            Command::Restart => "RESTART",
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

impl std::str::FromStr for Command {
    type Err = crate::error::ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case(Command::Restart.token()) {
            Ok(Command::Restart)
        } else {
            Err(crate::error::ProtocolError::UnknownCommand(s.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_parses_case_insensitively() {
        assert_eq!("restart".parse::<Command>().expect("parse"), Command::Restart);
        assert_eq!(" RESTART\n".parse::<Command>().expect("parse"), Command::Restart);
        assert!("reboot".parse::<Command>().is_err());
    }
}
