use super::devices::{RelayId, ServoId};
use crate::comms::{DeviceKind, Frame, FramePayload, Operation};
use std::fmt::{Display, Formatter};
use tokio::sync::mpsc;

/// Servo position for a fully open valve.
pub const SERVO_OPEN: u8 = 0;
/// Servo position for a fully closed valve.
pub const SERVO_CLOSED: u8 = 100;

#[derive(Debug, PartialEq, Eq)]
pub enum CommandError {
    /// Servo position outside the closed range `0..=100`; never submitted.
    PositionOutOfRange(u8),
    /// Operation that does not exist for the targeted device class.
    UnsupportedOperation(Operation),
    /// The outbound queue is gone, the link has shut down.
    LinkClosed,
}

impl Display for CommandError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::PositionOutOfRange(pos) => {
                write!(f, "servo position {pos} outside 0..=100")
            }
            CommandError::UnsupportedOperation(op) => {
                write!(f, "operation {op} not available on this device")
            }
            CommandError::LinkClosed => write!(f, "command link closed"),
        }
    }
}

impl std::error::Error for CommandError {}

/// Builds validated actuator command frames and submits them fire-and-forget.
///
/// Commands are owned transiently: once pushed onto the queue nothing here
/// retains them. Matching the eventual acknowledgement is the router's job,
/// by pattern, not by instance.
#[derive(Clone)]
pub struct CommandIssuer {
    sink: mpsc::UnboundedSender<Frame>,
}

impl CommandIssuer {
    pub fn new(sink: mpsc::UnboundedSender<Frame>) -> Self { Self { sink } }

    /// Commands a servo to the given position, 0 fully open, 100 fully closed.
    pub fn servo_position(&self, servo: ServoId, position: u8) -> Result<(), CommandError> {
        if position > SERVO_CLOSED {
            return Err(CommandError::PositionOutOfRange(position));
        }
        let frame = Frame::service(
            DeviceKind::Servo,
            servo.index(),
            Operation::Position,
            FramePayload::Int(i16::from(position)),
        );
        self.sink.send(frame).map_err(|_| CommandError::LinkClosed)
    }

    /// Commands a relay open or closed. Relay operations carry no payload.
    pub fn relay(&self, relay: RelayId, operation: Operation) -> Result<(), CommandError> {
        if !matches!(operation, Operation::Open | Operation::Close) {
            return Err(CommandError::UnsupportedOperation(operation));
        }
        let frame = Frame::service(DeviceKind::Relay, relay.index(), operation, FramePayload::Empty);
        self.sink.send(frame).map_err(|_| CommandError::LinkClosed)
    }
}
