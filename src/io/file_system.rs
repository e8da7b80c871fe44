use super::{Disk, Instruction, Program, Swap};
use crate::kernel::{Pid, ProcessState};

/// Disk and swap behind one handle.
pub(crate) struct FileSystem {
    disk: Disk,
    swap: Swap,
}

impl FileSystem {
    pub fn new() -> FileSystem {
        FileSystem {
            disk: Disk::new(),
            swap: Swap::new(),
        }
    }

    pub fn write(&mut self, path: &str, program: Program) {
        self.disk.write_program(path, program);
    }

    pub fn read(&self, path: &str) -> Option<&Program> {
        self.disk.read_program(path)
    }

    pub fn read_instructions(&self, path: &str, offset: usize, count: usize) -> Vec<Instruction> {
        self.disk.read_instructions(path, offset, count)
    }

    pub fn swap_out(&mut self, pid: Pid, page: usize, instructions: Vec<Instruction>, state: ProcessState) {
        self.swap.swap_out(pid, page, instructions, state);
    }

    pub fn swap_in(&mut self, pid: Pid, page: usize) -> Vec<Instruction> {
        self.swap.swap_in(pid, page)
    }

    pub fn clear_swap(&mut self, pid: Pid) {
        self.swap.clear(pid);
    }

    #[cfg(test)]
    pub fn swap(&self) -> &Swap {
        &self.swap
    }
}
