use std::error::Error;
use std::fmt;

use super::Pid;

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum KernelError {
    ProgramNotFound(String),
    /// No free frame and nothing resident to evict.
    OutOfFrames { pid: Pid, page: usize },
    NoRunningProcess(&'static str),
    NoFinishedIo,
    DidNotFinish { ticks: u64 },
}

impl fmt::Display for KernelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelError::ProgramNotFound(path) => write!(f, "program not found on disk: {}", path),
            KernelError::OutOfFrames { pid, page } => write!(
                f,
                "no free frame and no resident page to evict while loading page {} of process {}",
                page, pid
            ),
            KernelError::NoRunningProcess(kind) => write!(f, "{} raised with no running process", kind),
            KernelError::NoFinishedIo => write!(f, "IO_OUT raised with no finished operation"),
            KernelError::DidNotFinish { ticks } => write!(f, "processes still alive after {} ticks", ticks),
        }
    }
}

impl Error for KernelError {}
