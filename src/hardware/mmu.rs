use std::collections::HashMap;

use super::Memory;
use crate::io::Instruction;

/// Raised when the page holding a logical address has no frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PageFault {
    pub page: usize,
}

pub(crate) struct Mmu {
    frame_size: usize,
    tlb: HashMap<usize, Option<usize>>,
}

impl Mmu {
    pub fn new(frame_size: usize) -> Mmu {
        Mmu {
            frame_size,
            tlb: HashMap::new(),
        }
    }

    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    pub fn reset_tlb(&mut self) {
        self.tlb.clear();
    }

    pub fn set_page_frame(&mut self, page: usize, frame: Option<usize>) {
        self.tlb.insert(page, frame);
    }

    pub fn frame_of(&self, page: usize) -> Option<usize> {
        self.tlb.get(&page).copied().flatten()
    }

    pub fn fetch(&self, logical_address: usize, memory: &Memory) -> Result<Instruction, PageFault> {
        let page = logical_address / self.frame_size;
        let offset = logical_address % self.frame_size;

        let frame = self.frame_of(page).ok_or(PageFault { page })?;

        match memory.read_from(frame * self.frame_size + offset) {
            Some(instruction) => Ok(instruction),
            None => panic!("Fetched an empty cell at page {} offset {} (frame {})", page, offset, frame),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mmu_fetch_translates_page_to_frame() {
        let mut memory = Memory::new(16);
        memory.write_block_to(8, &[Instruction::Cpu, Instruction::Io]);

        let mut mmu = Mmu::new(4);
        mmu.set_page_frame(1, Some(2));

        assert_eq!(mmu.fetch(5, &memory), Ok(Instruction::Io));
    }

    #[test]
    fn test_mmu_fetch_unmapped_page_faults() {
        let memory = Memory::new(16);
        let mut mmu = Mmu::new(4);
        mmu.set_page_frame(0, None);

        assert_eq!(mmu.fetch(2, &memory), Err(PageFault { page: 0 }));
        assert_eq!(mmu.fetch(9, &memory), Err(PageFault { page: 2 }));
    }

    #[test]
    fn test_mmu_reset_tlb() {
        let mut mmu = Mmu::new(4);
        mmu.set_page_frame(0, Some(1));
        mmu.reset_tlb();
        assert_eq!(mmu.frame_of(0), None);
    }
}
