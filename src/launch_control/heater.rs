/// Oxidizer pressure at which the heater has done its job.
const HEATER_PRESSURE_TARGET: f32 = 55.0;

/// Oxidizer-heater relay process.
///
/// `should_run` is the desired state, `active` the acknowledged relay state;
/// the shutoff condition only arms while both hold.
pub struct HeaterMachine {
    should_run: bool,
    active: bool,
    complete: bool,
    pressure: f32,
}

impl HeaterMachine {
    pub fn new() -> Self {
        Self { should_run: false, active: false, complete: false, pressure: 0.0 }
    }

    pub fn is_active(&self) -> bool { self.active }

    pub fn is_complete(&self) -> bool { self.complete }

    /// Entry-action half: the heater is now wanted on.
    pub fn engage(&mut self) { self.should_run = true; }

    /// The shutoff command went out, the heater is no longer wanted on.
    pub fn commanded_off(&mut self) { self.should_run = false; }

    /// Stores a pressure reading. Returns true when the shutoff command is
    /// due: heater wanted, relay acknowledged on, target pressure reached.
    #[must_use]
    pub fn record_pressure(&mut self, pressure: f32) -> bool {
        self.pressure = pressure;
        self.should_run && self.active && self.pressure >= HEATER_PRESSURE_TARGET
    }

    pub fn open_acked(&mut self) { self.active = true; }

    /// Applies the shutoff acknowledgement. Returns true exactly once; a
    /// duplicate close-ack finds the relay already inactive and is ignored.
    #[must_use]
    pub fn close_acked(&mut self) -> bool {
        if self.active {
            self.active = false;
            self.complete = true;
            true
        } else {
            false
        }
    }
}
