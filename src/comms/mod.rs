pub(crate) mod frame;
pub(crate) mod link;

pub use frame::{BoardId, DeviceKind, Frame, FrameAction, FramePayload, Operation, Priority, RoutingKey};
pub use link::{LinkError, SimLink};
