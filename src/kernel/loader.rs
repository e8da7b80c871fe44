use log::debug;

use super::{MemoryManager, Pid};
use crate::hardware::Memory;
use crate::io::Instruction;

pub(crate) fn page_count(instruction_count: usize, frame_size: usize) -> usize {
    instruction_count.div_ceil(frame_size)
}

/// Creates the page rows of a freshly admitted process. Nothing becomes
/// resident until the process faults its pages in.
pub(crate) fn create_pages(memory_manager: &mut MemoryManager, pid: Pid, instruction_count: usize) -> usize {
    let pages = page_count(instruction_count, memory_manager.frame_size());
    memory_manager.add_pages(pid, pages);

    debug!("Process {} needs {} pages for {} instructions", pid, pages, instruction_count);
    pages
}

pub(crate) fn load_page_in_memory(memory: &mut Memory, instructions: &[Instruction], frame: usize, frame_size: usize) {
    let start_address = frame * frame_size;

    memory.clear_block(start_address, start_address + frame_size);
    memory.write_block_to(start_address, instructions);
}

/// Reads a frame's contents and clears it so it can be handed to another page.
pub(crate) fn unload_page(memory: &mut Memory, frame: usize, frame_size: usize) -> Vec<Instruction> {
    let start_address = frame * frame_size;
    let end_address = start_address + frame_size;

    let instructions = memory
        .read_block_from(start_address, end_address)
        .into_iter()
        .flatten()
        .collect();
    memory.clear_block(start_address, end_address);

    instructions
}
