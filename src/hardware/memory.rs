use crate::io::Instruction;

/// Physical memory. A cell is `None` until something is written to it.
pub(crate) struct Memory {
    data: Vec<Option<Instruction>>,
}

impl Memory {
    pub fn new(size: usize) -> Memory {
        Memory {
            data: vec![None; size],
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn read_from(&self, address: usize) -> Option<Instruction> {
        if address >= self.data.len() {
            panic!("Out of bounds memory access. Address {} is greater than memory size", address);
        }

        self.data[address]
    }

    pub fn read_block_from(&self, start_address: usize, end_address: usize) -> Vec<Option<Instruction>> {
        if start_address > self.data.len() || end_address > self.data.len() {
            panic!("Out of bounds memory access. Start or end address is greater than memory size");
        } else if start_address > end_address {
            panic!("Invalid memory range. Start address is greater than end address");
        }

        self.data[start_address..end_address].to_vec()
    }

    pub fn write_block_to(&mut self, address: usize, data: &[Instruction]) {
        let end_address = address + data.len();

        if end_address > self.data.len() {
            panic!("Out of bounds memory access");
        }

        for (cell, value) in self.data[address..end_address].iter_mut().zip(data) {
            *cell = Some(*value);
        }
    }

    pub fn clear_block(&mut self, start_address: usize, end_address: usize) {
        if end_address > self.data.len() || start_address > end_address {
            panic!("Invalid memory range {}..{}", start_address, end_address);
        }

        self.data[start_address..end_address].fill(None);
    }
}
