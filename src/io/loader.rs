use std::fs;
use std::io::{Error, ErrorKind};

use super::{FileSystem, Op, Program};

/// A program read from a program file, waiting to be admitted.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Job {
    pub path: String,
    pub priority: u32,
}

/// Reads a program file and writes every job it contains to disk.
///
/// The format is one job per block:
///
/// ```text
/// // JOB c:/prg1.exe 0
/// CPU 2
/// IO
/// CPU 3
/// // END
/// ```
pub(crate) fn load_programs_into_disk(file_path: &str, file_system: &mut FileSystem) -> std::io::Result<Vec<Job>> {
    let contents = fs::read_to_string(file_path)?;
    let parsed = parse_program_file(&contents)?;

    let mut jobs = Vec::new();
    for (job, program) in parsed {
        file_system.write(&job.path, program);
        jobs.push(job);
    }

    Ok(jobs)
}

pub(crate) fn parse_program_file(contents: &str) -> std::io::Result<Vec<(Job, Program)>> {
    let mut parsed = Vec::new();
    let mut current: Option<Job> = None;
    let mut ops = Vec::new();

    for (line_num, line) in contents.lines().enumerate() {
        let line = line.trim();
        let line_num = line_num + 1;

        if line.is_empty() {
            continue;
        }

        if let Some(job_info) = line.strip_prefix("// JOB") {
            if current.is_some() {
                return Err(invalid(line_num, "JOB card before previous END"));
            }
            current = Some(parse_job(line_num, job_info)?);
        } else if line.starts_with("// END") {
            let job = current.take().ok_or_else(|| invalid(line_num, "END card without JOB"))?;
            parsed.push((job, Program::new(&ops)));
            ops.clear();
        } else if line.starts_with("//") {
            continue;
        } else {
            if current.is_none() {
                return Err(invalid(line_num, "instruction outside of a JOB"));
            }
            ops.push(parse_op(line_num, line)?);
        }
    }

    if current.is_some() {
        return Err(invalid(contents.lines().count(), "missing END card"));
    }

    Ok(parsed)
}

fn parse_job(line_num: usize, job_info: &str) -> std::io::Result<Job> {
    let mut inputs = job_info.split_whitespace();

    let path = inputs
        .next()
        .ok_or_else(|| invalid(line_num, "JOB control card is missing a path"))?
        .to_string();

    let priority = match inputs.next() {
        Some(value) => value
            .parse()
            .map_err(|err| invalid(line_num, &format!("JOB priority is not a number: {}", err)))?,
        None => 0,
    };

    Ok(Job { path, priority })
}

fn parse_op(line_num: usize, line: &str) -> std::io::Result<Op> {
    let mut parts = line.split_whitespace();

    match parts.next().map(|s| s.to_ascii_uppercase()).as_deref() {
        Some("CPU") => {
            let count = match parts.next() {
                Some(value) => value
                    .parse()
                    .map_err(|err| invalid(line_num, &format!("CPU burst is not a number: {}", err)))?,
                None => 1,
            };
            Ok(Op::Cpu(count))
        }
        Some("IO") => Ok(Op::Io),
        Some("EXIT") => Ok(Op::Exit),
        _ => Err(invalid(line_num, &format!("unknown instruction `{}`", line))),
    }
}

fn invalid(line_num: usize, message: &str) -> Error {
    Error::new(ErrorKind::InvalidData, format!("line {}: {}", line_num, message))
}
