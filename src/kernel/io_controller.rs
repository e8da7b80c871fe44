use std::collections::VecDeque;

use log::debug;

use super::Pid;
use crate::hardware::IoDevice;
use crate::io::Instruction;

/// Driver side of an I/O device: queues requests and feeds the device one
/// at a time.
pub(crate) struct IoDeviceController {
    waiting_queue: VecDeque<(Pid, Instruction)>,
    current: Option<Pid>,
}

impl IoDeviceController {
    pub fn new() -> IoDeviceController {
        IoDeviceController {
            waiting_queue: VecDeque::new(),
            current: None,
        }
    }

    pub fn run_operation(&mut self, device: &mut IoDevice, pid: Pid, instruction: Instruction) {
        self.waiting_queue.push_back((pid, instruction));
        self.load_from_waiting_queue_if_apply(device);
    }

    /// Hands back the process whose operation just completed and starts the
    /// next queued request.
    pub fn get_finished_pcb(&mut self, device: &mut IoDevice) -> Option<Pid> {
        let finished = self.current.take();
        self.load_from_waiting_queue_if_apply(device);
        finished
    }

    #[cfg(test)]
    pub fn current(&self) -> Option<Pid> {
        self.current
    }

    #[cfg(test)]
    pub fn waiting_pids(&self) -> Vec<Pid> {
        self.waiting_queue.iter().map(|(pid, _)| *pid).collect()
    }

    fn load_from_waiting_queue_if_apply(&mut self, device: &mut IoDevice) {
        if !device.is_idle() || self.current.is_some() {
            return;
        }

        if let Some((pid, instruction)) = self.waiting_queue.pop_front() {
            debug!("{} starts {} for process {}", device.device_id(), instruction, pid);
            self.current = Some(pid);
            device.execute(instruction);
        }
    }
}
