use super::page_table::PageRow;
use super::{ProcessControlBlock, ProcessState};
use crate::hardware::Hardware;

/// Installs a process's page mappings and saved counter on the CPU.
pub(crate) fn load(hardware: &mut Hardware, pcb: &ProcessControlBlock, rows: &[PageRow]) {
    hardware.mmu.reset_tlb();
    for row in rows {
        hardware.mmu.set_page_frame(row.page_number, row.frame);
    }

    hardware.cpu.program_counter = Some(pcb.program_counter);
}

/// Copies the CPU counter back into `pcb` and leaves the CPU idle.
pub(crate) fn save(hardware: &mut Hardware, pcb: &mut ProcessControlBlock) {
    if let Some(program_counter) = hardware.cpu.program_counter {
        pcb.program_counter = program_counter;
    }
    pcb.state = ProcessState::Waiting;

    hardware.cpu.program_counter = None;
}
