use std::collections::HashMap;

use log::debug;

use super::Instruction;
use crate::kernel::{Pid, ProcessState};

/// Backing store for evicted pages.
pub(crate) struct Swap {
    pages: HashMap<(Pid, usize), Vec<Instruction>>,
}

impl Swap {
    pub fn new() -> Swap {
        Swap {
            pages: HashMap::new(),
        }
    }

    /// Stores a page's contents. Pages of finished processes are dropped.
    pub fn swap_out(&mut self, pid: Pid, page: usize, instructions: Vec<Instruction>, state: ProcessState) {
        if state == ProcessState::Finished {
            debug!("Skipping swap out of page {} for finished process {}", page, pid);
            return;
        }

        debug!("Swapping out page {} of process {}", page, pid);
        self.pages.insert((pid, page), instructions);
    }

    pub fn swap_in(&mut self, pid: Pid, page: usize) -> Vec<Instruction> {
        match self.pages.remove(&(pid, page)) {
            Some(instructions) => {
                debug!("Swapping in page {} of process {}", page, pid);
                instructions
            }
            None => panic!("No swapped page {} for process {}", page, pid),
        }
    }

    pub fn clear(&mut self, pid: Pid) {
        self.pages.retain(|&(owner, _), _| owner != pid);
    }

    #[cfg(test)]
    pub fn contains(&self, pid: Pid, page: usize) -> bool {
        self.pages.contains_key(&(pid, page))
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.pages.len()
    }
}
