mod cpu;
mod io_device;
mod memory;
mod mmu;
mod timer;

use std::fmt;

pub(crate) use cpu::{Cpu, CpuStep};
pub(crate) use io_device::IoDevice;
pub(crate) use memory::Memory;
pub(crate) use mmu::Mmu;
pub(crate) use timer::Timer;

use crate::io::Instruction;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Interrupt {
    New { path: String, priority: u32 },
    Kill,
    IoIn(Instruction),
    IoOut,
    Timeout,
    PageFault,
}

impl Interrupt {
    pub fn kind(&self) -> &'static str {
        match self {
            Interrupt::New { .. } => "NEW",
            Interrupt::Kill => "KILL",
            Interrupt::IoIn(_) => "IO_IN",
            Interrupt::IoOut => "IO_OUT",
            Interrupt::Timeout => "TIMEOUT",
            Interrupt::PageFault => "PAGE_FAULT",
        }
    }
}

impl fmt::Display for Interrupt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interrupt::New { path, priority } => write!(f, "NEW({}, priority {})", path, priority),
            Interrupt::IoIn(instruction) => write!(f, "IO_IN({})", instruction),
            other => write!(f, "{}", other.kind()),
        }
    }
}

/// The simulated machine. The kernel receives it at construction and is the
/// only thing that drives it.
pub(crate) struct Hardware {
    pub cpu: Cpu,
    pub mmu: Mmu,
    pub memory: Memory,
    pub timer: Timer,
    pub io_device: IoDevice,
    clock: u64,
}

impl Hardware {
    pub fn new(total_memory: usize, frame_size: usize, io_duration: usize) -> Hardware {
        Hardware {
            cpu: Cpu::new(),
            mmu: Mmu::new(frame_size),
            memory: Memory::new(total_memory),
            timer: Timer::new(None),
            io_device: IoDevice::new("Printer", io_duration),
            clock: 0,
        }
    }

    pub fn clock(&self) -> u64 {
        self.clock
    }

    pub(crate) fn advance_clock(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    pub fn cpu_cycle(&mut self) -> CpuStep {
        self.cpu.cycle(&self.mmu, &self.memory)
    }
}
