use super::commands::SERVO_OPEN;
use super::devices::ServoId;
use strum_macros::Display;

/// Oxidizer tank is full enough once both level and pressure targets hold.
const OXIDIZER_LEVEL_TARGET: f32 = 100.0;
const OXIDIZER_PRESSURE_TARGET: f32 = 30.0;
/// Fuel readiness is level-only.
const FUEL_LEVEL_TARGET: f32 = 100.0;

/// Readiness over the latest sensor values, configured per tank.
pub type ReadinessPredicate = fn(level: f32, pressure: f32) -> bool;

fn oxidizer_ready(level: f32, pressure: f32) -> bool {
    level >= OXIDIZER_LEVEL_TARGET && pressure >= OXIDIZER_PRESSURE_TARGET
}

fn fuel_ready(level: f32, _pressure: f32) -> bool { level >= FUEL_LEVEL_TARGET }

/// Where a fill currently stands. Derived from the flag set, used for
/// logging and assertions rather than control flow.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum FillStage {
    Idle,
    Opening,
    Open,
    Closing,
    Closed,
}

/// Intake-valve fill process, one instance per tank.
///
/// Oxidizer and fuel fills are structurally identical, so this is a single
/// type configured with the tank's servo and readiness predicate. The valve
/// state only flips on acknowledgement, never optimistically, and at most
/// one of the pending flags is set at a time.
pub struct FillMachine {
    servo: ServoId,
    ready: ReadinessPredicate,
    open: bool,
    pending_open: bool,
    pending_close: bool,
    complete: bool,
    level: f32,
    pressure: f32,
}

impl FillMachine {
    pub fn oxidizer() -> Self { Self::new(ServoId::OxidizerIntake, oxidizer_ready) }

    pub fn fuel() -> Self { Self::new(ServoId::FuelIntake, fuel_ready) }

    fn new(servo: ServoId, ready: ReadinessPredicate) -> Self {
        Self {
            servo,
            ready,
            open: false,
            pending_open: false,
            pending_close: false,
            complete: false,
            level: 0.0,
            pressure: 0.0,
        }
    }

    pub fn servo(&self) -> ServoId { self.servo }

    pub fn stage(&self) -> FillStage {
        if self.complete {
            FillStage::Closed
        } else if self.pending_close {
            FillStage::Closing
        } else if self.open {
            FillStage::Open
        } else if self.pending_open {
            FillStage::Opening
        } else {
            FillStage::Idle
        }
    }

    /// Records that a position command went out for this valve.
    pub fn command_sent(&mut self, position: u8) {
        self.pending_close = position != SERVO_OPEN;
        self.pending_open = !self.pending_close;
    }

    /// Stores a level reading. Returns true when the close command is due:
    /// valve open, no close pending, readiness satisfied.
    #[must_use]
    pub fn record_level(&mut self, level: f32) -> bool {
        self.level = level;
        self.open && !self.pending_close && (self.ready)(self.level, self.pressure)
    }

    /// Stores a pressure reading. Only the oxidizer predicate consumes it.
    pub fn record_pressure(&mut self, pressure: f32) { self.pressure = pressure; }

    /// Applies a position acknowledgement. Returns true exactly once, when
    /// the close is acknowledged and the fill is complete. A stray ack with
    /// neither flag pending is ignored so double delivery cannot complete
    /// the fill twice.
    #[must_use]
    pub fn acked(&mut self) -> bool {
        if self.pending_open {
            self.pending_open = false;
            self.open = true;
            false
        } else if self.pending_close {
            self.pending_close = false;
            self.open = false;
            self.complete = true;
            true
        } else {
            false
        }
    }
}
