use anyhow::Context;
use log::{info, warn};

use crate::config::Config;
use crate::hardware::Hardware;
use crate::io::loader::{self, Job};
use crate::io::{FileSystem, Op, Program};
use crate::kernel::{Kernel, Pid, ProcessState};

/// Boots a kernel from a configuration, admits the jobs and runs them to
/// completion.
pub(crate) struct Driver {
    kernel: Kernel,
    program_file: Option<String>,
    max_ticks: u64,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct ProcessStats {
    pub pid: Pid,
    pub path: String,
    pub priority: u32,
    pub admitted_at: u64,
    pub finished_at: u64,
    pub turnaround_ticks: u64,
}

impl Driver {
    pub fn new(config: &Config) -> Driver {
        let hardware = Hardware::new(config.total_memory, config.frame_size, config.io_duration);

        Driver {
            kernel: Kernel::new(hardware, config.scheduling, config.eviction),
            program_file: config.program_file.clone(),
            max_ticks: config.max_ticks,
        }
    }

    pub fn start(&mut self) -> anyhow::Result<Vec<ProcessStats>> {
        info!("Starting the driver.");
        let jobs = self.load_jobs()?;

        if jobs.is_empty() {
            warn!("No programs to run.");
            return Ok(Vec::new());
        }

        info!("Admitting {} programs.", jobs.len());
        for job in &jobs {
            self.kernel
                .run(&job.path, job.priority)
                .with_context(|| format!("failed to admit {}", job.path))?;
        }

        let ticks = self
            .kernel
            .run_until_finished(self.max_ticks)
            .context("kernel stopped before every process finished")?;
        info!(
            "{} processes finished after {} ticks, {} of {} frames free.",
            self.kernel.pcb_table().count_in(ProcessState::Finished),
            ticks,
            self.kernel.memory_manager().free_frames().len(),
            self.kernel.memory_manager().total_frames()
        );

        Ok(self.collect_stats())
    }

    fn load_jobs(&mut self) -> anyhow::Result<Vec<Job>> {
        match &self.program_file {
            Some(path) => {
                info!("Loading programs from {}.", path);
                loader::load_programs_into_disk(path, self.kernel.file_system_mut())
                    .with_context(|| format!("failed to load programs from {}", path))
            }
            None => {
                info!("Loading built-in programs.");
                Ok(demo_programs(self.kernel.file_system_mut()))
            }
        }
    }

    fn collect_stats(&self) -> Vec<ProcessStats> {
        self.kernel
            .pcb_table()
            .pcbs()
            .map(|pcb| ProcessStats {
                pid: pcb.get_pid(),
                path: pcb.get_path().to_string(),
                priority: pcb.get_priority(),
                admitted_at: pcb.get_admitted_at(),
                finished_at: pcb.get_finished_at().unwrap_or_default(),
                turnaround_ticks: pcb.get_turnaround_ticks().unwrap_or_default(),
            })
            .collect()
    }
}

pub(crate) fn print_stats(stats: &[ProcessStats]) {
    println!("... PID | Priority | Admitted | Finished | Turnaround (ticks) | Program");
    println!("...-----|----------|----------|----------|--------------------|--------");
    for stat in stats {
        println!(
            "... {:03} | {:02}       | {:>8} | {:>8} | {:>18} | {}",
            stat.pid, stat.priority, stat.admitted_at, stat.finished_at, stat.turnaround_ticks, stat.path
        );
    }
}

/// The three programs the emulator ships with.
pub(crate) fn demo_programs(file_system: &mut FileSystem) -> Vec<Job> {
    let programs = [
        ("c:/prg1.exe", 0, Program::new(&[Op::Cpu(2), Op::Io, Op::Cpu(3), Op::Io, Op::Cpu(2)])),
        ("c:/prg2.exe", 1, Program::new(&[Op::Cpu(8)])),
        ("c:/prg3.exe", 1, Program::new(&[Op::Cpu(4), Op::Io, Op::Cpu(1)])),
    ];

    programs
        .into_iter()
        .map(|(path, priority, program)| {
            file_system.write(path, program);
            Job {
                path: path.to_string(),
                priority,
            }
        })
        .collect()
}
