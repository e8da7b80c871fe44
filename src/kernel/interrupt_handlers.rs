use log::{debug, info};

use super::{dispatcher, loader};
use super::{Kernel, KernelError, MemoryManager, PcbTable, Pid, ProcessState, ShortTermScheduler};
use crate::hardware::Hardware;
use crate::io::{Instruction, Program};

impl Kernel {
    pub(super) fn handle_new(&mut self, path: &str, priority: u32) -> Result<Pid, KernelError> {
        let instruction_count = self
            .file_system
            .read(path)
            .map(Program::len)
            .ok_or_else(|| KernelError::ProgramNotFound(path.to_string()))?;

        let pid = self.pcb_table.create_pcb(path, priority, self.hardware.clock());
        loader::create_pages(&mut self.memory_manager, pid, instruction_count);
        info!("Process {} created from {} with priority {}", pid, path, priority);

        admit(pid, &mut self.pcb_table, &mut self.scheduler, &self.memory_manager, &mut self.hardware);
        Ok(pid)
    }

    pub(super) fn handle_kill(&mut self) -> Result<(), KernelError> {
        let pid = self.running_pid("KILL")?;

        dispatcher::save(&mut self.hardware, self.pcb_table.get_pcb_mut_for(pid));
        self.memory_manager.release_process(pid);
        self.file_system.clear_swap(pid);
        self.pcb_table.get_pcb_mut_for(pid).finish(self.hardware.clock());
        info!("Process {} finished at tick {}", pid, self.hardware.clock());

        dispatch_next(&mut self.pcb_table, &mut self.scheduler, &self.memory_manager, &mut self.hardware);
        Ok(())
    }

    pub(super) fn handle_io_in(&mut self, instruction: Instruction) -> Result<(), KernelError> {
        let pid = self.running_pid("IO_IN")?;

        dispatcher::save(&mut self.hardware, self.pcb_table.get_pcb_mut_for(pid));
        self.io_controller.run_operation(&mut self.hardware.io_device, pid, instruction);
        debug!("Process {} waits for {}", pid, instruction);

        dispatch_next(&mut self.pcb_table, &mut self.scheduler, &self.memory_manager, &mut self.hardware);
        Ok(())
    }

    pub(super) fn handle_io_out(&mut self) -> Result<(), KernelError> {
        let pid = self
            .io_controller
            .get_finished_pcb(&mut self.hardware.io_device)
            .ok_or(KernelError::NoFinishedIo)?;
        debug!("Process {} is back from I/O", pid);

        admit(pid, &mut self.pcb_table, &mut self.scheduler, &self.memory_manager, &mut self.hardware);
        Ok(())
    }

    pub(super) fn handle_timeout(&mut self) -> Result<(), KernelError> {
        let running = self.running_pid("TIMEOUT")?;

        if self.scheduler.is_empty() {
            self.hardware.timer.reset();
            return Ok(());
        }

        // The successor is picked before the preempted process rejoins the queue.
        if let Some(next) = self.scheduler.next() {
            debug!("Quantum expired, switching from process {} to {}", running, next);
            dispatcher::save(&mut self.hardware, self.pcb_table.get_pcb_mut_for(running));
            enqueue(running, &mut self.pcb_table, &mut self.scheduler);
            run_process(next, &mut self.pcb_table, &self.memory_manager, &mut self.hardware);
        }

        Ok(())
    }

    pub(super) fn handle_page_fault(&mut self) -> Result<(), KernelError> {
        let pid = self.running_pid("PAGE_FAULT")?;
        let program_counter = self
            .hardware
            .cpu
            .program_counter
            .ok_or(KernelError::NoRunningProcess("PAGE_FAULT"))?;

        let frame_size = self.memory_manager.frame_size();
        let page = program_counter / frame_size;

        let frame = match self.memory_manager.alloc_frame() {
            Some(frame) => frame,
            None => self.evict_victim(pid, page)?,
        };

        let instructions = if self.memory_manager.row(pid, page).is_swapped_out {
            self.memory_manager.mark_swapped(pid, page, false);
            self.file_system.swap_in(pid, page)
        } else {
            let path = self.pcb_table.get_pcb_for(pid).get_path();
            self.file_system.read_instructions(path, page * frame_size, frame_size)
        };

        loader::load_page_in_memory(&mut self.hardware.memory, &instructions, frame, frame_size);
        self.memory_manager.set_frame(pid, page, Some(frame));
        self.memory_manager.add_eviction_candidate(pid, page);
        self.hardware.mmu.set_page_frame(page, Some(frame));

        debug!("Page {} of process {} loaded into frame {}", page, pid, frame);
        Ok(())
    }

    /// Swaps out the next victim and hands its frame straight to the faulting
    /// page, without passing through the free pool.
    fn evict_victim(&mut self, pid: Pid, page: usize) -> Result<usize, KernelError> {
        let victim = self.memory_manager.next_victim().ok_or(KernelError::OutOfFrames { pid, page })?;
        let frame = match victim.frame {
            Some(frame) => frame,
            None => panic!("Eviction candidate page {} of process {} is not resident", victim.page_number, victim.pid),
        };

        let frame_size = self.memory_manager.frame_size();
        let instructions = loader::unload_page(&mut self.hardware.memory, frame, frame_size);
        let state = self.pcb_table.get_pcb_for(victim.pid).state;

        self.file_system.swap_out(victim.pid, victim.page_number, instructions, state);
        self.memory_manager.set_frame(victim.pid, victim.page_number, None);
        self.memory_manager.mark_swapped(victim.pid, victim.page_number, true);

        if victim.pid == pid {
            self.hardware.mmu.set_page_frame(victim.page_number, None);
        }

        debug!(
            "Evicted page {} of process {} from frame {}",
            victim.page_number, victim.pid, frame
        );
        Ok(frame)
    }

    fn running_pid(&self, kind: &'static str) -> Result<Pid, KernelError> {
        self.pcb_table.running().ok_or(KernelError::NoRunningProcess(kind))
    }
}

/// Places an arriving process: straight onto an idle CPU, onto the CPU in
/// place of a less urgent process when the scheduler preempts, or into the
/// ready queue.
pub(super) fn admit(
    pid: Pid,
    pcb_table: &mut PcbTable,
    scheduler: &mut ShortTermScheduler,
    memory_manager: &MemoryManager,
    hardware: &mut Hardware,
) {
    let running = match pcb_table.running() {
        Some(running) => running,
        None => {
            run_process(pid, pcb_table, memory_manager, hardware);
            return;
        }
    };

    if scheduler.should_preempt(pcb_table.get_pcb_for(pid), pcb_table.get_pcb_for(running)) {
        debug!("Process {} preempts process {}", pid, running);
        dispatcher::save(hardware, pcb_table.get_pcb_mut_for(running));
        enqueue(running, pcb_table, scheduler);
        run_process(pid, pcb_table, memory_manager, hardware);
    } else {
        enqueue(pid, pcb_table, scheduler);
    }
}

fn enqueue(pid: Pid, pcb_table: &mut PcbTable, scheduler: &mut ShortTermScheduler) {
    let pcb = pcb_table.get_pcb_mut_for(pid);
    pcb.state = ProcessState::Ready;
    scheduler.add(pcb);
}

fn run_process(pid: Pid, pcb_table: &mut PcbTable, memory_manager: &MemoryManager, hardware: &mut Hardware) {
    let rows = memory_manager.page_table_of(pid);
    dispatcher::load(hardware, pcb_table.get_pcb_for(pid), &rows);
    hardware.timer.reset();
    pcb_table.set_running(pid);
}

fn dispatch_next(
    pcb_table: &mut PcbTable,
    scheduler: &mut ShortTermScheduler,
    memory_manager: &MemoryManager,
    hardware: &mut Hardware,
) {
    match scheduler.next() {
        Some(pid) => run_process(pid, pcb_table, memory_manager, hardware),
        None => {
            pcb_table.clear_running();
            hardware.cpu.program_counter = None;
        }
    }
}
