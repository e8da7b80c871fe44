use log::trace;

use crate::io::Instruction;

/// A device that needs a fixed number of ticks per operation.
pub(crate) struct IoDevice {
    device_id: &'static str,
    duration: usize,
    current: Option<(Instruction, usize)>,
}

impl IoDevice {
    pub fn new(device_id: &'static str, duration: usize) -> IoDevice {
        IoDevice {
            device_id,
            duration,
            current: None,
        }
    }

    pub fn device_id(&self) -> &'static str {
        self.device_id
    }

    pub fn is_idle(&self) -> bool {
        self.current.is_none()
    }

    pub fn execute(&mut self, instruction: Instruction) {
        if let Some((busy_with, _)) = self.current {
            panic!("Device {} is busy executing {}", self.device_id, busy_with);
        }

        trace!("{} executing {}", self.device_id, instruction);
        self.current = Some((instruction, self.duration));
    }

    /// Returns true when the current operation completes on this tick.
    pub fn tick(&mut self) -> bool {
        match self.current.as_mut() {
            Some((_, remaining)) => {
                *remaining = remaining.saturating_sub(1);
                if *remaining == 0 {
                    self.current = None;
                    return true;
                }
                false
            }
            None => false,
        }
    }
}
