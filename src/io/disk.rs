use std::collections::HashMap;

use super::{Instruction, Program};

/// Program images keyed by path.
pub(crate) struct Disk {
    program_map: HashMap<String, Program>,
}

impl Disk {
    pub fn new() -> Disk {
        Disk {
            program_map: HashMap::new(),
        }
    }

    pub fn write_program(&mut self, path: &str, program: Program) {
        self.program_map.insert(path.to_string(), program);
    }

    pub fn read_program(&self, path: &str) -> Option<&Program> {
        self.program_map.get(path)
    }

    /// Reads up to `count` instructions starting at `offset`. The last page of
    /// a program is usually shorter than a frame, so the range is clamped.
    pub fn read_instructions(&self, path: &str, offset: usize, count: usize) -> Vec<Instruction> {
        let program = match self.program_map.get(path) {
            Some(program) => program,
            None => panic!("Program not found: {}", path),
        };

        let instructions = program.instructions();
        let start = offset.min(instructions.len());
        let end = (offset + count).min(instructions.len());

        instructions[start..end].to_vec()
    }
}
