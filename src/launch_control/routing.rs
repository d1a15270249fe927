use super::devices::{RelayId, SensorId, ServoId};
use crate::comms::{DeviceKind, Frame, FrameAction, FramePayload, Operation, RoutingKey};
use std::collections::HashMap;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

/// Command lifecycles the sequencer tracks, one per outbound pattern.
///
/// This enum replaces per-frame callback registration: every acknowledgement
/// pattern maps to one of these edges, and the sequencer decides what the
/// edge means for its sub-machines. The wiring is data, so it can be tested
/// without constructing the sequencer at all.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum CommandEdge {
    FuelIntake,
    OxidizerIntake,
    FuelMain,
    OxidizerMain,
    HeaterOpen,
    HeaterClose,
    IgniterOpen,
    IgniterClose,
    ParachuteOpen,
}

impl CommandEdge {
    /// The outbound pattern this edge resolves: device class, wire index and
    /// operation. Acknowledgement matching keys on exactly this triple.
    pub fn pattern(self) -> (DeviceKind, u8, Operation) {
        match self {
            CommandEdge::FuelIntake => (DeviceKind::Servo, ServoId::FuelIntake.index(), Operation::Position),
            CommandEdge::OxidizerIntake => {
                (DeviceKind::Servo, ServoId::OxidizerIntake.index(), Operation::Position)
            }
            CommandEdge::FuelMain => (DeviceKind::Servo, ServoId::FuelMain.index(), Operation::Position),
            CommandEdge::OxidizerMain => {
                (DeviceKind::Servo, ServoId::OxidizerMain.index(), Operation::Position)
            }
            CommandEdge::HeaterOpen => (DeviceKind::Relay, RelayId::OxidizerHeater.index(), Operation::Open),
            CommandEdge::HeaterClose => {
                (DeviceKind::Relay, RelayId::OxidizerHeater.index(), Operation::Close)
            }
            CommandEdge::IgniterOpen => (DeviceKind::Relay, RelayId::Igniter.index(), Operation::Open),
            CommandEdge::IgniterClose => (DeviceKind::Relay, RelayId::Igniter.index(), Operation::Close),
            CommandEdge::ParachuteOpen => (DeviceKind::Relay, RelayId::Parachute.index(), Operation::Open),
        }
    }
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Acknowledged,
    Rejected,
}

/// A routed inbound event, normalized for the sequencer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Route {
    /// Sensor reading, already narrowed to its float value.
    Feed(SensorId, f32),
    /// Result of a previously issued command.
    Result(CommandEdge, CommandOutcome),
}

/// The registration table: every inbound pattern the sequence cares about,
/// built once at startup. Frames with no entry are dropped by the caller,
/// which is explicitly not an error.
pub struct Router {
    table: HashMap<RoutingKey, Entry>,
}

#[derive(Clone, Copy)]
enum Entry {
    Feed(SensorId),
    Result(CommandEdge, CommandOutcome),
}

impl Router {
    /// Registers the full launch-sequence pattern set: one feed entry per
    /// sensor, one ack and one nack entry per command edge.
    pub fn launch_defaults() -> Self {
        let mut router = Self { table: HashMap::new() };
        for sensor in SensorId::iter() {
            router.register(
                RoutingKey::inbound(FrameAction::Feed, DeviceKind::Sensor, sensor.index(), Operation::Read),
                Entry::Feed(sensor),
            );
        }
        for edge in CommandEdge::iter() {
            let (device, index, operation) = edge.pattern();
            router.register(
                RoutingKey::inbound(FrameAction::Ack, device, index, operation),
                Entry::Result(edge, CommandOutcome::Acknowledged),
            );
            router.register(
                RoutingKey::inbound(FrameAction::Nack, device, index, operation),
                Entry::Result(edge, CommandOutcome::Rejected),
            );
        }
        router
    }

    fn register(&mut self, key: RoutingKey, entry: Entry) {
        let clash = self.table.insert(key, entry);
        debug_assert!(clash.is_none(), "duplicate registration for {key:?}");
    }

    /// Resolves a frame to at most one registered route. Feed frames whose
    /// payload is not a float are malformed and resolve to nothing.
    pub fn route(&self, frame: &Frame) -> Option<Route> {
        match self.table.get(&frame.routing_key())? {
            Entry::Feed(sensor) => match frame.payload {
                FramePayload::Float(value) => Some(Route::Feed(*sensor, value)),
                _ => None,
            },
            Entry::Result(edge, outcome) => Some(Route::Result(*edge, *outcome)),
        }
    }
}
