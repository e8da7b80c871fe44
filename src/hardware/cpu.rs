use log::trace;

use super::{Interrupt, Memory, Mmu};
use crate::io::Instruction;

/// Outcome of a single CPU cycle.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum CpuStep {
    Idle,
    Executed,
    Interrupt(Interrupt),
}

pub(crate) struct Cpu {
    /// `None` while no process is loaded.
    pub program_counter: Option<usize>,
}

impl Cpu {
    pub fn new() -> Cpu {
        Cpu { program_counter: None }
    }

    /// Fetches through the MMU and executes one instruction. A page fault
    /// leaves the counter untouched so the same instruction is retried.
    pub fn cycle(&mut self, mmu: &Mmu, memory: &Memory) -> CpuStep {
        let program_counter = match self.program_counter {
            Some(program_counter) => program_counter,
            None => return CpuStep::Idle,
        };

        let instruction = match mmu.fetch(program_counter, memory) {
            Ok(instruction) => instruction,
            Err(fault) => {
                trace!("Page fault on page {} at address {}", fault.page, program_counter);
                return CpuStep::Interrupt(Interrupt::PageFault);
            }
        };

        self.program_counter = Some(program_counter + 1);

        Cpu::execute(instruction)
    }

    fn execute(instruction: Instruction) -> CpuStep {
        match instruction {
            Instruction::Cpu => CpuStep::Executed,
            Instruction::Io => CpuStep::Interrupt(Interrupt::IoIn(instruction)),
            Instruction::Exit => CpuStep::Interrupt(Interrupt::Kill),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded_hardware() -> (Mmu, Memory) {
        let mut memory = Memory::new(8);
        memory.write_block_to(4, &[Instruction::Cpu, Instruction::Io, Instruction::Exit]);

        let mut mmu = Mmu::new(4);
        mmu.set_page_frame(0, Some(1));

        (mmu, memory)
    }

    #[test]
    fn test_cpu_idle_does_nothing() {
        let (mmu, memory) = loaded_hardware();
        let mut cpu = Cpu::new();
        assert_eq!(cpu.cycle(&mmu, &memory), CpuStep::Idle);
    }

    #[test]
    fn test_cpu_cycle_raises_by_instruction() {
        let (mmu, memory) = loaded_hardware();
        let mut cpu = Cpu::new();
        cpu.program_counter = Some(0);

        assert_eq!(cpu.cycle(&mmu, &memory), CpuStep::Executed);
        assert_eq!(cpu.cycle(&mmu, &memory), CpuStep::Interrupt(Interrupt::IoIn(Instruction::Io)));
        assert_eq!(cpu.cycle(&mmu, &memory), CpuStep::Interrupt(Interrupt::Kill));
        assert_eq!(cpu.program_counter, Some(3));
    }

    #[test]
    fn test_cpu_page_fault_keeps_counter() {
        let (mmu, memory) = loaded_hardware();
        let mut cpu = Cpu::new();
        cpu.program_counter = Some(4);

        assert_eq!(cpu.cycle(&mmu, &memory), CpuStep::Interrupt(Interrupt::PageFault));
        assert_eq!(cpu.program_counter, Some(4));
    }
}
