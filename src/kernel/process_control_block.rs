use std::collections::BTreeMap;
use std::fmt;

pub(crate) type Pid = u32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ProcessState {
    New,
    Ready,
    Running,
    Waiting,
    Finished,
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProcessState::New => "New",
            ProcessState::Ready => "Ready",
            ProcessState::Running => "Running",
            ProcessState::Waiting => "Waiting",
            ProcessState::Finished => "Finished",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug)]
pub(crate) struct ProcessControlBlock {
    /// Saved counter, restored onto the CPU by the dispatcher.
    pub program_counter: usize,
    pub state: ProcessState,

    pid: Pid,
    path: String,
    priority: u32,

    admitted_at: u64,
    finished_at: Option<u64>,
}

impl ProcessControlBlock {
    pub fn new(pid: Pid, path: &str, priority: u32, admitted_at: u64) -> ProcessControlBlock {
        ProcessControlBlock {
            pid,
            path: path.to_string(),
            priority,
            program_counter: 0,
            state: ProcessState::New,
            admitted_at,
            finished_at: None,
        }
    }

    pub fn get_pid(&self) -> Pid {
        self.pid
    }

    pub fn get_path(&self) -> &str {
        &self.path
    }

    pub fn get_priority(&self) -> u32 {
        self.priority
    }

    pub fn get_admitted_at(&self) -> u64 {
        self.admitted_at
    }

    pub fn get_finished_at(&self) -> Option<u64> {
        self.finished_at
    }

    pub fn finish(&mut self, at: u64) {
        self.state = ProcessState::Finished;
        self.finished_at = Some(at);
    }

    /// Ticks from admission to completion.
    pub fn get_turnaround_ticks(&self) -> Option<u64> {
        self.finished_at.map(|finished_at| finished_at - self.admitted_at)
    }
}

/// Registry of every process ever admitted. Finished processes stay here.
pub(crate) struct PcbTable {
    pcb_map: BTreeMap<Pid, ProcessControlBlock>,
    running: Option<Pid>,
    next_pid: Pid,
}

impl PcbTable {
    pub fn new() -> PcbTable {
        PcbTable {
            pcb_map: BTreeMap::new(),
            running: None,
            next_pid: 0,
        }
    }

    pub fn create_pcb(&mut self, path: &str, priority: u32, admitted_at: u64) -> Pid {
        let pid = self.next_pid;
        self.next_pid += 1;

        self.pcb_map.insert(pid, ProcessControlBlock::new(pid, path, priority, admitted_at));
        pid
    }

    pub fn get_pcb_for(&self, pid: Pid) -> &ProcessControlBlock {
        match self.pcb_map.get(&pid) {
            Some(pcb) => pcb,
            None => panic!("No process found for id: {}", pid),
        }
    }

    pub fn get_pcb_mut_for(&mut self, pid: Pid) -> &mut ProcessControlBlock {
        match self.pcb_map.get_mut(&pid) {
            Some(pcb) => pcb,
            None => panic!("No process found for id: {}", pid),
        }
    }

    pub fn running(&self) -> Option<Pid> {
        self.running
    }

    pub fn set_running(&mut self, pid: Pid) {
        self.get_pcb_mut_for(pid).state = ProcessState::Running;
        self.running = Some(pid);
    }

    pub fn clear_running(&mut self) {
        self.running = None;
    }

    pub fn pcbs(&self) -> impl Iterator<Item = &ProcessControlBlock> {
        self.pcb_map.values()
    }

    pub fn count_in(&self, state: ProcessState) -> usize {
        self.pcb_map.values().filter(|pcb| pcb.state == state).count()
    }

    pub fn all_finished(&self) -> bool {
        self.pcb_map.values().all(|pcb| pcb.state == ProcessState::Finished)
    }
}
