use strum_macros::Display;

/// Upper bound on the encoded frame body, enforced by the link before
/// allocating the receive buffer. Frames are a handful of discriminants plus
/// one scalar payload, so anything larger is a corrupted stream.
pub(crate) const MAX_FRAME_LEN: usize = 64;

#[derive(serde::Serialize, serde::Deserialize, Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoardId {
    Software,
    Rocket,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Priority {
    Low,
    High,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameAction {
    Feed,
    Service,
    Ack,
    Nack,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    Sensor,
    Servo,
    Relay,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Read,
    Position,
    Open,
    Close,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq)]
pub enum FramePayload {
    Empty,
    Float(f32),
    Int(i16),
}

/// One message on the simulator link.
///
/// Outbound service frames travel `Software -> Rocket`, everything inbound
/// (sensor feeds, acknowledgements) travels `Rocket -> Software`.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct Frame {
    pub dst: BoardId,
    pub src: BoardId,
    pub priority: Priority,
    pub action: FrameAction,
    pub device: DeviceKind,
    pub index: u8,
    pub operation: Operation,
    pub payload: FramePayload,
}

/// Frame identity for handler registration. Priority and payload are
/// excluded: two frames that differ only in those fields resolve to the
/// same registered handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoutingKey {
    pub dst: BoardId,
    pub src: BoardId,
    pub action: FrameAction,
    pub device: DeviceKind,
    pub index: u8,
    pub operation: Operation,
}

impl Frame {
    /// Builds an outbound service frame addressed to the rocket.
    pub fn service(device: DeviceKind, index: u8, operation: Operation, payload: FramePayload) -> Self {
        Self {
            dst: BoardId::Rocket,
            src: BoardId::Software,
            priority: Priority::Low,
            action: FrameAction::Service,
            device,
            index,
            operation,
            payload,
        }
    }

    pub fn routing_key(&self) -> RoutingKey {
        RoutingKey {
            dst: self.dst,
            src: self.src,
            action: self.action,
            device: self.device,
            index: self.index,
            operation: self.operation,
        }
    }
}

impl RoutingKey {
    /// Key for an inbound frame of the given shape, i.e. `Rocket -> Software`.
    pub fn inbound(action: FrameAction, device: DeviceKind, index: u8, operation: Operation) -> Self {
        Self {
            dst: BoardId::Software,
            src: BoardId::Rocket,
            action,
            device,
            index,
            operation,
        }
    }
}

#[derive(Debug, Display)]
pub enum CodecError {
    Encode,
    Decode,
    Oversized,
}

impl std::error::Error for CodecError {}
impl From<bincode::error::EncodeError> for CodecError {
    fn from(_: bincode::error::EncodeError) -> Self { CodecError::Encode }
}
impl From<bincode::error::DecodeError> for CodecError {
    fn from(_: bincode::error::DecodeError) -> Self { CodecError::Decode }
}

/// Encodes a frame as a big-endian `u32` length prefix followed by the
/// bincode body.
pub(crate) fn encode(frame: &Frame) -> Result<Vec<u8>, CodecError> {
    let body = bincode::serde::encode_to_vec(frame, bincode::config::standard())?;
    if body.len() > MAX_FRAME_LEN {
        return Err(CodecError::Oversized);
    }
    let mut buf = Vec::with_capacity(4 + body.len());
    buf.extend_from_slice(&u32::try_from(body.len()).map_err(|_| CodecError::Oversized)?.to_be_bytes());
    buf.extend_from_slice(&body);
    Ok(buf)
}

/// Decodes a frame body (the bytes after the length prefix).
pub(crate) fn decode(body: &[u8]) -> Result<Frame, CodecError> {
    let (frame, _) = bincode::serde::decode_from_slice(body, bincode::config::standard())?;
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn altitude_feed(priority: Priority, value: f32) -> Frame {
        Frame {
            dst: BoardId::Software,
            src: BoardId::Rocket,
            priority,
            action: FrameAction::Feed,
            device: DeviceKind::Sensor,
            index: 2,
            operation: Operation::Read,
            payload: FramePayload::Float(value),
        }
    }

    #[test]
    fn routing_key_ignores_priority_and_payload() {
        let low = altitude_feed(Priority::Low, 10.0);
        let high = altitude_feed(Priority::High, 523.25);
        assert_eq!(low.routing_key(), high.routing_key());
        assert_eq!(
            low.routing_key(),
            RoutingKey::inbound(FrameAction::Feed, DeviceKind::Sensor, 2, Operation::Read)
        );
    }

    #[test]
    fn routing_key_separates_ack_from_nack() {
        let ack = RoutingKey::inbound(FrameAction::Ack, DeviceKind::Servo, 1, Operation::Position);
        let nack = RoutingKey::inbound(FrameAction::Nack, DeviceKind::Servo, 1, Operation::Position);
        assert_ne!(ack, nack);
    }

    #[test]
    fn wire_frame_survives_the_codec() {
        let frame = Frame::service(DeviceKind::Servo, 3, Operation::Position, FramePayload::Int(100));
        let bytes = encode(&frame).unwrap();
        let body_len = u32::from_be_bytes(bytes[..4].try_into().unwrap()) as usize;
        assert_eq!(body_len, bytes.len() - 4);
        assert!(body_len <= MAX_FRAME_LEN);
        assert_eq!(decode(&bytes[4..]).unwrap(), frame);
    }
}
