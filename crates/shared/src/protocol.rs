use crate::{
    domain::{Command, ControlFrame, AXIS_MAX},
    error::ProtocolError,
};

/// Largest datagram a receiver needs to buffer.
pub const MAX_DATAGRAM_LEN: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Datagram {
    Control(ControlFrame),
    Command(Command),
}

impl Datagram {
    pub fn encode(&self) -> String {
        match self {
            Datagram::Control(frame) => encode_frame(frame),
            Datagram::Command(command) => command.token().to_string(),
        }
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, ProtocolError> {
        let text = std::str::from_utf8(bytes).map_err(|_| ProtocolError::InvalidUtf8)?;
        let text = text.trim();

        if let Ok(command) = text.parse::<Command>() {
            return Ok(Datagram::Command(command));
        }

        let fields: Vec<&str> = text.split(',').collect();
        if fields.len() != 3 {
            if fields.len() == 1 && !looks_numeric(fields[0]) {
                return Err(ProtocolError::UnknownCommand(text.to_string()));
            }
            return Err(ProtocolError::FieldCount(fields.len()));
        }

        let roll = parse_field("roll", fields[0])?;
        let throttle = parse_axis("throttle", fields[1])?;
        let brake = parse_axis("brake", fields[2])?;
        let roll = i32::try_from(roll).map_err(|_| ProtocolError::InvalidInteger {
            field: "roll",
            value: fields[0].to_string(),
        })?;

        Ok(Datagram::Control(ControlFrame::new(roll, throttle, brake)))
    }
}

impl From<ControlFrame> for Datagram {
    fn from(frame: ControlFrame) -> Self {
        Datagram::Control(frame)
    }
}

impl From<Command> for Datagram {
    fn from(command: Command) -> Self {
        Datagram::Command(command)
    }
}

pub fn encode_frame(frame: &ControlFrame) -> String {
    format!("{},{},{}", frame.roll, frame.throttle, frame.brake)
}

fn looks_numeric(field: &str) -> bool {
    let field = field.trim();
    let digits = field.strip_prefix(['-', '+']).unwrap_or(field);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn parse_field(field: &'static str, raw: &str) -> Result<i64, ProtocolError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ProtocolError::InvalidInteger {
            field,
            value: raw.to_string(),
        })
}

fn parse_axis(field: &'static str, raw: &str) -> Result<u16, ProtocolError> {
    let value = parse_field(field, raw)?;
    if !(0..=i64::from(AXIS_MAX)).contains(&value) {
        return Err(ProtocolError::OutOfRange {
            field,
            value,
            max: AXIS_MAX,
        });
    }
    Ok(value as u16)
}
