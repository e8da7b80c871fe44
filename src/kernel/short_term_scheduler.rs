use std::collections::VecDeque;
use std::fmt;

use super::{Pid, ProcessControlBlock};

/// Every priority level is split into this many aging tiers, oldest first.
const AGING_TIERS: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SchedulingAlgorithm {
    Fifo,
    RoundRobin { quantum: usize },
    Priority { levels: usize, preemptive: bool },
    RoundRobinPriority { levels: usize, preemptive: bool, quantum: usize },
}

impl fmt::Display for SchedulingAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedulingAlgorithm::Fifo => write!(f, "FIFO"),
            SchedulingAlgorithm::RoundRobin { quantum } => write!(f, "Round Robin (quantum {})", quantum),
            SchedulingAlgorithm::Priority { levels, preemptive } => {
                write!(f, "Priority ({} levels, preemptive: {})", levels, preemptive)
            }
            SchedulingAlgorithm::RoundRobinPriority { levels, preemptive, quantum } => write!(
                f,
                "Round Robin Priority ({} levels, preemptive: {}, quantum {})",
                levels, preemptive, quantum
            ),
        }
    }
}

enum ReadyQueue {
    Fifo(VecDeque<Pid>),
    Priority(Vec<Level>),
}

/// One priority level. Tier 0 holds the pids that have waited longest.
struct Level {
    tiers: [VecDeque<Pid>; AGING_TIERS],
}

impl Level {
    fn new() -> Level {
        Level {
            tiers: std::array::from_fn(|_| VecDeque::new()),
        }
    }

    fn len(&self) -> usize {
        self.tiers.iter().map(VecDeque::len).sum()
    }

    fn push(&mut self, pid: Pid) {
        self.tiers[AGING_TIERS - 1].push_back(pid);
    }

    fn pop_oldest(&mut self) -> Option<Pid> {
        self.tiers.iter_mut().find_map(VecDeque::pop_front)
    }

    /// Each tier moves one step closer to the front.
    fn grow_older(&mut self) {
        for tier in 0..AGING_TIERS - 1 {
            let younger = std::mem::take(&mut self.tiers[tier + 1]);
            self.tiers[tier].extend(younger);
        }
    }

    fn take_oldest_tier(&mut self) -> VecDeque<Pid> {
        std::mem::take(&mut self.tiers[0])
    }

    fn absorb(&mut self, pids: VecDeque<Pid>) {
        self.tiers[AGING_TIERS - 1].extend(pids);
    }
}

pub(crate) struct ShortTermScheduler {
    ready_queue: ReadyQueue,
    scheduling_alg: SchedulingAlgorithm,
}

impl ShortTermScheduler {
    pub fn new(scheduling_alg: SchedulingAlgorithm) -> ShortTermScheduler {
        let ready_queue = match scheduling_alg {
            SchedulingAlgorithm::Fifo | SchedulingAlgorithm::RoundRobin { .. } => ReadyQueue::Fifo(VecDeque::new()),
            SchedulingAlgorithm::Priority { levels, .. } | SchedulingAlgorithm::RoundRobinPriority { levels, .. } => {
                ReadyQueue::Priority((0..levels.max(1)).map(|_| Level::new()).collect())
            }
        };

        ShortTermScheduler {
            ready_queue,
            scheduling_alg,
        }
    }

    /// Quantum to install on the hardware timer, if any.
    pub fn quantum(&self) -> Option<usize> {
        match self.scheduling_alg {
            SchedulingAlgorithm::RoundRobin { quantum } | SchedulingAlgorithm::RoundRobinPriority { quantum, .. } => {
                Some(quantum)
            }
            _ => None,
        }
    }

    pub fn is_preemptive(&self) -> bool {
        match self.scheduling_alg {
            SchedulingAlgorithm::Priority { preemptive, .. }
            | SchedulingAlgorithm::RoundRobinPriority { preemptive, .. } => preemptive,
            _ => false,
        }
    }

    /// Whether `arriving` should take the CPU away from `running`. Lower
    /// numbers are more urgent and ties never preempt.
    pub fn should_preempt(&self, arriving: &ProcessControlBlock, running: &ProcessControlBlock) -> bool {
        self.is_preemptive() && arriving.get_priority() < running.get_priority()
    }

    pub fn add(&mut self, pcb: &ProcessControlBlock) {
        match &mut self.ready_queue {
            ReadyQueue::Fifo(queue) => queue.push_back(pcb.get_pid()),
            ReadyQueue::Priority(levels) => {
                let level = (pcb.get_priority() as usize).min(levels.len() - 1);
                levels[level].push(pcb.get_pid());
            }
        }
    }

    pub fn next(&mut self) -> Option<Pid> {
        match &mut self.ready_queue {
            ReadyQueue::Fifo(queue) => queue.pop_front(),
            ReadyQueue::Priority(levels) => {
                let pid = levels.iter_mut().find(|level| level.len() > 0)?.pop_oldest();
                Self::age(levels);
                pid
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn len(&self) -> usize {
        match &self.ready_queue {
            ReadyQueue::Fifo(queue) => queue.len(),
            ReadyQueue::Priority(levels) => levels.iter().map(Level::len).sum(),
        }
    }

    /// Pids in the order `next` would consider them, ignoring aging.
    #[cfg(test)]
    pub fn ready_pids(&self) -> Vec<Pid> {
        match &self.ready_queue {
            ReadyQueue::Fifo(queue) => queue.iter().copied().collect(),
            ReadyQueue::Priority(levels) => levels
                .iter()
                .flat_map(|level| level.tiers.iter().flatten().copied())
                .collect(),
        }
    }

    fn age(levels: &mut [Level]) {
        for index in 0..levels.len() {
            levels[index].grow_older();

            if index + 1 < levels.len() {
                let promoted = levels[index + 1].take_oldest_tier();
                levels[index].absorb(promoted);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pcb(pid: Pid, priority: u32) -> ProcessControlBlock {
        ProcessControlBlock::new(pid, "c:/prg.exe", priority, 0)
    }

    #[test]
    fn test_fifo_scheduler_keeps_arrival_order() {
        let mut sts = ShortTermScheduler::new(SchedulingAlgorithm::Fifo);
        sts.add(&pcb(0, 2));
        sts.add(&pcb(1, 0));
        sts.add(&pcb(2, 1));

        assert_eq!(sts.len(), 3);
        assert_eq!(sts.next(), Some(0));
        assert_eq!(sts.next(), Some(1));
        assert_eq!(sts.next(), Some(2));
        assert_eq!(sts.next(), None);
        assert!(sts.is_empty());
        assert!(!sts.is_preemptive());
        assert_eq!(sts.quantum(), None);
    }

    #[test]
    fn test_round_robin_scheduler_installs_quantum() {
        let sts = ShortTermScheduler::new(SchedulingAlgorithm::RoundRobin { quantum: 2 });
        assert_eq!(sts.quantum(), Some(2));
        assert!(!sts.is_preemptive());
    }

    #[test]
    fn test_priority_scheduler_orders_by_priority() {
        let mut sts = ShortTermScheduler::new(SchedulingAlgorithm::Priority { levels: 3, preemptive: false });
        sts.add(&pcb(0, 2));
        sts.add(&pcb(1, 0));
        sts.add(&pcb(2, 1));

        assert_eq!(sts.next(), Some(1));
        assert_eq!(sts.next(), Some(2));
        assert_eq!(sts.next(), Some(0));
        assert_eq!(sts.next(), None);
    }

    #[test]
    fn test_priority_scheduler_same_level_is_fifo() {
        let mut sts = ShortTermScheduler::new(SchedulingAlgorithm::Priority { levels: 3, preemptive: false });
        sts.add(&pcb(0, 1));
        sts.add(&pcb(1, 1));
        sts.add(&pcb(2, 1));

        assert_eq!(sts.next(), Some(0));
        assert_eq!(sts.next(), Some(1));
        assert_eq!(sts.next(), Some(2));
    }

    #[test]
    fn test_priority_scheduler_clamps_out_of_range_priority() {
        let mut sts = ShortTermScheduler::new(SchedulingAlgorithm::Priority { levels: 2, preemptive: false });
        sts.add(&pcb(0, 9));
        sts.add(&pcb(1, 1));

        assert_eq!(sts.ready_pids(), vec![0, 1]);
        assert_eq!(sts.next(), Some(0));
    }

    #[test]
    fn test_priority_scheduler_aging_prevents_starvation() {
        let levels = 3;
        let mut sts = ShortTermScheduler::new(SchedulingAlgorithm::Priority { levels, preemptive: false });
        let starving = 100;
        sts.add(&pcb(starving, 2));

        let mut calls = 0;
        let mut next_pid = 0;
        loop {
            sts.add(&pcb(next_pid, 0));
            next_pid += 1;
            calls += 1;

            if sts.next() == Some(starving) {
                break;
            }
            assert!(calls <= AGING_TIERS * levels, "pid {} starved", starving);
        }
    }

    #[test]
    fn test_priority_scheduler_preemption_is_strict() {
        let sts = ShortTermScheduler::new(SchedulingAlgorithm::Priority { levels: 3, preemptive: true });
        let running = pcb(0, 1);

        assert!(sts.should_preempt(&pcb(1, 0), &running));
        assert!(!sts.should_preempt(&pcb(2, 1), &running));
        assert!(!sts.should_preempt(&pcb(3, 2), &running));
    }

    #[test]
    fn test_cooperative_priority_scheduler_never_preempts() {
        let sts = ShortTermScheduler::new(SchedulingAlgorithm::RoundRobinPriority {
            levels: 3,
            preemptive: false,
            quantum: 3,
        });

        assert!(!sts.should_preempt(&pcb(1, 0), &pcb(0, 2)));
        assert_eq!(sts.quantum(), Some(3));
    }
}
