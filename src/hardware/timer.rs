/// Counts instructions executed by the running process and fires once the
/// quantum is used up. Without a quantum it never fires.
pub(crate) struct Timer {
    quantum: Option<usize>,
    tick_count: usize,
}

impl Timer {
    pub fn new(quantum: Option<usize>) -> Timer {
        Timer { quantum, tick_count: 0 }
    }

    pub fn set_quantum(&mut self, quantum: Option<usize>) {
        self.quantum = quantum;
        self.reset();
    }

    pub fn reset(&mut self) {
        self.tick_count = 0;
    }

    /// Returns true when a TIMEOUT should be raised.
    pub fn tick(&mut self) -> bool {
        let quantum = match self.quantum {
            Some(quantum) => quantum,
            None => return false,
        };

        self.tick_count += 1;
        self.tick_count >= quantum
    }
}
