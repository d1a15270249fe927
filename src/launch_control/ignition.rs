/// Main-valve latches ahead of ignition.
///
/// Both main valves are commanded open at phase entry; each acknowledgement
/// sets its latch, and whichever arrives second arms the igniter. The
/// `ignited` one-shot keeps a duplicate acknowledgement from firing twice.
pub struct IgnitionMachine {
    fuel_main_open: bool,
    oxidizer_main_open: bool,
    ignited: bool,
}

impl IgnitionMachine {
    pub fn new() -> Self {
        Self { fuel_main_open: false, oxidizer_main_open: false, ignited: false }
    }

    pub fn is_ready_to_ignite(&self) -> bool { self.fuel_main_open && self.oxidizer_main_open }

    /// Returns true when this acknowledgement is the one that arms ignition.
    #[must_use]
    pub fn fuel_main_acked(&mut self) -> bool {
        self.fuel_main_open = true;
        self.arm()
    }

    /// Returns true when this acknowledgement is the one that arms ignition.
    #[must_use]
    pub fn oxidizer_main_acked(&mut self) -> bool {
        self.oxidizer_main_open = true;
        self.arm()
    }

    fn arm(&mut self) -> bool {
        if self.is_ready_to_ignite() && !self.ignited {
            self.ignited = true;
            true
        } else {
            false
        }
    }
}
