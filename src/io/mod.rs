mod disk;
mod file_system;
pub(crate) mod loader;
mod program;
mod swap;

pub(crate) use disk::Disk;
pub(crate) use file_system::FileSystem;
pub(crate) use program::{Instruction, Op, Program};
pub(crate) use swap::Swap;
