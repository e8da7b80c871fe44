use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Instruction {
    Cpu,
    Io,
    Exit,
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Cpu => write!(f, "CPU"),
            Instruction::Io => write!(f, "IO"),
            Instruction::Exit => write!(f, "EXIT"),
        }
    }
}

/// A piece of source used to build a program. A `Cpu(n)` burst expands
/// to `n` consecutive CPU instructions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Op {
    Cpu(usize),
    Io,
    Exit,
}

/// An expanded program image. Always non-empty and always terminated by
/// an EXIT instruction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Program {
    instructions: Vec<Instruction>,
}

impl Program {
    pub fn new(ops: &[Op]) -> Program {
        let mut instructions = Vec::new();

        for op in ops {
            match *op {
                Op::Cpu(count) => instructions.extend(std::iter::repeat(Instruction::Cpu).take(count)),
                Op::Io => instructions.push(Instruction::Io),
                Op::Exit => instructions.push(Instruction::Exit),
            }
        }

        if instructions.last() != Some(&Instruction::Exit) {
            instructions.push(Instruction::Exit);
        }

        Program { instructions }
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_expands_bursts() {
        let program = Program::new(&[Op::Cpu(2), Op::Io, Op::Cpu(1)]);
        assert_eq!(
            program.instructions(),
            &[Instruction::Cpu, Instruction::Cpu, Instruction::Io, Instruction::Cpu, Instruction::Exit]
        );
    }

    #[test]
    fn test_program_keeps_trailing_exit() {
        let program = Program::new(&[Op::Cpu(1), Op::Exit]);
        assert_eq!(program.len(), 2);
    }

    #[test]
    fn test_program_empty_source_still_exits() {
        let program = Program::new(&[]);
        assert_eq!(program.instructions(), &[Instruction::Exit]);
    }
}
