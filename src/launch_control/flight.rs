/// Altitude accumulator for the flight and landing phases.
///
/// Pure data, no side effects: descent detection must not issue actuator
/// commands from inside a state update, so the parachute and landing
/// decisions live in the sequencer, which reads this machine after each
/// feed. `max_altitude` is monotone; `descending` latches on the first
/// reading below the peak and stays set until the landing logic clears it.
pub struct FlightMachine {
    altitude: f32,
    max_altitude: f32,
    descending: bool,
}

impl FlightMachine {
    pub fn new() -> Self { Self { altitude: 0.0, max_altitude: 0.0, descending: false } }

    pub fn altitude(&self) -> f32 { self.altitude }

    pub fn max_altitude(&self) -> f32 { self.max_altitude }

    pub fn is_descending(&self) -> bool { self.descending }

    pub fn record_altitude(&mut self, altitude: f32) {
        self.max_altitude = self.max_altitude.max(altitude);
        self.altitude = altitude;
        if self.max_altitude > self.altitude {
            self.descending = true;
        }
    }

    /// Called by the landing logic once touchdown is handled.
    pub fn clear_descent(&mut self) { self.descending = false; }
}
