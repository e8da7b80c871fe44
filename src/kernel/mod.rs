mod dispatcher;
mod error;
mod interrupt_handlers;
mod io_controller;
mod loader;
mod memory_manager;
mod page_table;
mod process_control_block;
mod short_term_scheduler;
mod victims;

use log::{debug, info, trace};

pub(crate) use error::KernelError;
pub(crate) use io_controller::IoDeviceController;
pub(crate) use memory_manager::MemoryManager;
pub(crate) use process_control_block::{PcbTable, Pid, ProcessControlBlock, ProcessState};
pub(crate) use short_term_scheduler::{SchedulingAlgorithm, ShortTermScheduler};
pub(crate) use victims::EvictionPolicy;

use crate::hardware::{CpuStep, Hardware, Interrupt};
use crate::io::FileSystem;

/// Owns every kernel component and the machine they run on, and routes
/// each interrupt the machine raises to its handler.
pub(crate) struct Kernel {
    hardware: Hardware,
    pcb_table: PcbTable,
    scheduler: ShortTermScheduler,
    memory_manager: MemoryManager,
    file_system: FileSystem,
    io_controller: IoDeviceController,
}

impl Kernel {
    pub fn new(mut hardware: Hardware, scheduling_alg: SchedulingAlgorithm, eviction: EvictionPolicy) -> Kernel {
        let scheduler = ShortTermScheduler::new(scheduling_alg);
        hardware.timer.set_quantum(scheduler.quantum());

        let memory_manager = MemoryManager::new(hardware.memory.size(), hardware.mmu.frame_size(), eviction);

        info!(
            "Kernel booted: {} frames of {} cells, {} scheduling, {} eviction",
            memory_manager.total_frames(),
            memory_manager.frame_size(),
            scheduling_alg,
            eviction
        );

        Kernel {
            hardware,
            pcb_table: PcbTable::new(),
            scheduler,
            memory_manager,
            file_system: FileSystem::new(),
            io_controller: IoDeviceController::new(),
        }
    }

    pub fn pcb_table(&self) -> &PcbTable {
        &self.pcb_table
    }

    pub fn memory_manager(&self) -> &MemoryManager {
        &self.memory_manager
    }

    #[cfg(test)]
    pub fn file_system(&self) -> &FileSystem {
        &self.file_system
    }

    pub fn file_system_mut(&mut self) -> &mut FileSystem {
        &mut self.file_system
    }

    /// Admits a program already written to disk by raising NEW for it.
    pub fn run(&mut self, path: &str, priority: u32) -> Result<Pid, KernelError> {
        let interrupt = Interrupt::New {
            path: path.to_string(),
            priority,
        };

        match self.handle(interrupt)? {
            Some(pid) => Ok(pid),
            None => panic!("NEW for {} admitted no process", path),
        }
    }

    /// Routes an interrupt to its handler. Only NEW yields a pid, the one it
    /// admitted.
    pub fn handle(&mut self, interrupt: Interrupt) -> Result<Option<Pid>, KernelError> {
        debug!("Handling {} at tick {}", interrupt, self.hardware.clock());

        match interrupt {
            Interrupt::New { path, priority } => return self.handle_new(&path, priority).map(Some),
            Interrupt::Kill => self.handle_kill()?,
            Interrupt::IoIn(instruction) => self.handle_io_in(instruction)?,
            Interrupt::IoOut => self.handle_io_out()?,
            Interrupt::Timeout => self.handle_timeout()?,
            Interrupt::PageFault => self.handle_page_fault()?,
        }

        Ok(None)
    }

    /// One clock tick: the device, then the CPU, then the timer.
    pub fn tick(&mut self) -> Result<(), KernelError> {
        let clock = self.hardware.advance_clock();
        trace!("Tick {}", clock);

        if self.hardware.io_device.tick() {
            self.handle(Interrupt::IoOut)?;
        }

        // A faulting fetch is retried once the page is resident.
        let step = loop {
            match self.hardware.cpu_cycle() {
                CpuStep::Interrupt(Interrupt::PageFault) => {
                    self.handle(Interrupt::PageFault)?;
                }
                step => break step,
            }
        };

        match step {
            CpuStep::Idle => {}
            CpuStep::Executed => {
                if self.hardware.timer.tick() {
                    self.handle(Interrupt::Timeout)?;
                }
            }
            CpuStep::Interrupt(interrupt) => {
                self.handle(interrupt)?;
            }
        }

        Ok(())
    }

    pub fn all_finished(&self) -> bool {
        self.pcb_table.all_finished()
    }

    /// Ticks until every admitted process has finished. Returns the number of
    /// ticks spent.
    pub fn run_until_finished(&mut self, max_ticks: u64) -> Result<u64, KernelError> {
        let mut ticks = 0;

        while !self.all_finished() {
            if ticks >= max_ticks {
                return Err(KernelError::DidNotFinish { ticks });
            }
            self.tick()?;
            ticks += 1;
        }

        Ok(ticks)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::io::{Op, Program};

    fn kernel_with(total_memory: usize, scheduling_alg: SchedulingAlgorithm) -> Kernel {
        Kernel::new(Hardware::new(total_memory, 4, 3), scheduling_alg, EvictionPolicy::SecondChance)
    }

    fn check_invariants(kernel: &Kernel) {
        assert!(kernel.pcb_table().count_in(ProcessState::Running) <= 1);

        let mut frames = HashSet::new();
        for row in kernel.memory_manager().page_table().resident_rows() {
            assert!(frames.insert(row.frame), "frame {:?} mapped twice", row.frame);
        }
        for frame in kernel.memory_manager().free_frames() {
            assert!(!frames.contains(&Some(frame)), "frame {} is both free and mapped", frame);
        }

        for pcb in kernel.pcb_table().pcbs().filter(|pcb| pcb.state == ProcessState::Finished) {
            assert!(kernel
                .memory_manager()
                .page_table_of(pcb.get_pid())
                .iter()
                .all(|row| !row.is_resident()));
        }
    }

    fn tick_checked(kernel: &mut Kernel) {
        kernel.tick().unwrap();
        check_invariants(kernel);
    }

    #[test]
    fn test_kernel_run_unknown_program() {
        let mut kernel = kernel_with(16, SchedulingAlgorithm::Fifo);
        assert_eq!(
            kernel.run("c:/missing.exe", 0),
            Err(KernelError::ProgramNotFound("c:/missing.exe".to_string()))
        );
        assert_eq!(kernel.pcb_table().pcbs().count(), 0);
    }

    #[test]
    fn test_kernel_single_process_runs_to_completion() {
        let mut kernel = kernel_with(16, SchedulingAlgorithm::Fifo);
        kernel.file_system_mut().write("c:/prg1.exe", Program::new(&[Op::Cpu(5)]));

        let pid = kernel.run("c:/prg1.exe", 0).unwrap();
        let ticks = kernel.run_until_finished(100).unwrap();

        assert_eq!(ticks, 6);
        let pcb = kernel.pcb_table().get_pcb_for(pid);
        assert_eq!(pcb.state, ProcessState::Finished);
        assert_eq!(pcb.get_turnaround_ticks(), Some(6));
        assert_eq!(kernel.memory_manager().free_frames().len(), 4);
        assert_eq!(kernel.hardware.cpu.program_counter, None);
    }

    #[test]
    fn test_kernel_run_until_finished_bound() {
        let mut kernel = kernel_with(16, SchedulingAlgorithm::Fifo);
        kernel.file_system_mut().write("c:/prg1.exe", Program::new(&[Op::Cpu(50)]));
        kernel.run("c:/prg1.exe", 0).unwrap();

        assert_eq!(kernel.run_until_finished(10), Err(KernelError::DidNotFinish { ticks: 10 }));
    }

    #[test]
    fn test_kernel_round_robin_interleaves_three_processes() {
        let mut kernel = kernel_with(16, SchedulingAlgorithm::RoundRobin { quantum: 2 });
        let file_system = kernel.file_system_mut();
        file_system.write("c:/prg0.exe", Program::new(&[Op::Io, Op::Cpu(5)]));
        file_system.write("c:/prg1.exe", Program::new(&[Op::Io, Op::Cpu(1)]));
        file_system.write("c:/prg2.exe", Program::new(&[Op::Io, Op::Cpu(3)]));

        for path in ["c:/prg0.exe", "c:/prg1.exe", "c:/prg2.exe"] {
            kernel.run(path, 0).unwrap();
        }
        assert_eq!(kernel.pcb_table().running(), Some(0));
        assert_eq!(kernel.scheduler.ready_pids(), vec![1, 2]);

        let mut finish_order = Vec::new();
        for _ in 0..200 {
            if kernel.all_finished() {
                break;
            }
            tick_checked(&mut kernel);

            for pcb in kernel.pcb_table().pcbs() {
                if pcb.state == ProcessState::Finished && !finish_order.contains(&pcb.get_pid()) {
                    finish_order.push(pcb.get_pid());
                }
            }
        }

        assert_eq!(finish_order.len(), 3);
        assert_eq!(finish_order[0], 1);
        assert_eq!(kernel.pcb_table().count_in(ProcessState::Running), 0);
        assert_eq!(kernel.pcb_table().count_in(ProcessState::Ready), 0);
        assert_eq!(kernel.pcb_table().count_in(ProcessState::Finished), 3);
        assert!(kernel.scheduler.is_empty());
        assert_eq!(kernel.memory_manager().free_frames().len(), 4);
        assert_eq!(kernel.file_system.swap().len(), 0);
    }

    #[test]
    fn test_kernel_eviction_swaps_out_page_of_waiting_process() {
        let mut kernel = kernel_with(8, SchedulingAlgorithm::Fifo);
        let file_system = kernel.file_system_mut();
        file_system.write("c:/prg0.exe", Program::new(&[Op::Cpu(2), Op::Io, Op::Cpu(4)]));
        file_system.write("c:/prg1.exe", Program::new(&[Op::Cpu(7)]));

        let first = kernel.run("c:/prg0.exe", 0).unwrap();
        let second = kernel.run("c:/prg1.exe", 0).unwrap();
        assert_eq!(kernel.memory_manager().page_table_of(first).len(), 2);
        assert_eq!(kernel.memory_manager().page_table_of(second).len(), 2);

        for _ in 0..7 {
            tick_checked(&mut kernel);
        }
        assert_eq!(kernel.pcb_table().running(), Some(second));
        assert!(kernel.memory_manager().free_frames().is_empty());
        assert!(kernel.memory_manager().row(first, 0).is_resident());

        // The second page of the second process has no free frame left.
        tick_checked(&mut kernel);

        let evicted = kernel.memory_manager().row(first, 0);
        assert_eq!(evicted.frame, None);
        assert!(evicted.is_swapped_out);
        assert!(kernel.file_system.swap().contains(first, 0));
        assert!(kernel.memory_manager().row(second, 1).is_resident());

        kernel.run_until_finished(100).unwrap();
        check_invariants(&kernel);

        assert_eq!(kernel.pcb_table().count_in(ProcessState::Finished), 2);
        assert_eq!(kernel.memory_manager().free_frames().len(), 2);
        assert!(kernel.memory_manager().eviction_candidates().is_empty());
        assert_eq!(kernel.file_system.swap().len(), 0);
    }
}
