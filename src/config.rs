use std::error::Error;
use std::fmt;

use crate::kernel::{EvictionPolicy, SchedulingAlgorithm};

const DEFAULT_TOTAL_MEMORY: usize = 16;
const DEFAULT_FRAME_SIZE: usize = 4;
const DEFAULT_QUANTUM: usize = 2;
const DEFAULT_LEVELS: usize = 3;
const DEFAULT_IO_DURATION: usize = 3;
const DEFAULT_MAX_TICKS: u64 = 10_000;

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum ConfigError {
    UnknownFlag(String),
    MissingValue(&'static str),
    InvalidNumber { flag: &'static str, value: String },
    UnknownScheduler(String),
    UnknownEviction(String),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnknownFlag(flag) => write!(f, "unknown flag `{}`", flag),
            ConfigError::MissingValue(flag) => write!(f, "missing value for `{}`", flag),
            ConfigError::InvalidNumber { flag, value } => write!(f, "`{}` expects a number, got `{}`", flag, value),
            ConfigError::UnknownScheduler(name) => {
                write!(f, "unknown scheduler `{}` (fifo, rr, priority, rr-priority)", name)
            }
            ConfigError::UnknownEviction(reason) => f.write_str(reason),
            ConfigError::Invalid(reason) => f.write_str(reason),
        }
    }
}

impl Error for ConfigError {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Config {
    pub total_memory: usize,
    pub frame_size: usize,
    pub scheduling: SchedulingAlgorithm,
    pub eviction: EvictionPolicy,
    pub io_duration: usize,
    pub max_ticks: u64,
    pub program_file: Option<String>,
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            total_memory: DEFAULT_TOTAL_MEMORY,
            frame_size: DEFAULT_FRAME_SIZE,
            scheduling: SchedulingAlgorithm::Fifo,
            eviction: EvictionPolicy::SecondChance,
            io_duration: DEFAULT_IO_DURATION,
            max_ticks: DEFAULT_MAX_TICKS,
            program_file: None,
            verbose: false,
        }
    }
}

impl Config {
    /// Builds a configuration from command line arguments, not including the
    /// program name.
    pub fn from_args<I>(args: I) -> Result<Config, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Config::default();
        let mut scheduler = "fifo".to_string();
        let mut quantum = DEFAULT_QUANTUM;
        let mut levels = DEFAULT_LEVELS;
        let mut preemptive = false;

        let mut args = args.into_iter();
        while let Some(flag) = args.next() {
            match flag.as_str() {
                "--memory" => config.total_memory = parse_number("--memory", args.next())?,
                "--frame-size" => config.frame_size = parse_number("--frame-size", args.next())?,
                "--scheduler" => scheduler = args.next().ok_or(ConfigError::MissingValue("--scheduler"))?,
                "--quantum" => quantum = parse_number("--quantum", args.next())?,
                "--levels" => levels = parse_number("--levels", args.next())?,
                "--preemptive" => preemptive = true,
                "--eviction" => {
                    let value = args.next().ok_or(ConfigError::MissingValue("--eviction"))?;
                    config.eviction = value.parse().map_err(ConfigError::UnknownEviction)?;
                }
                "--io-duration" => config.io_duration = parse_number("--io-duration", args.next())?,
                "--max-ticks" => config.max_ticks = parse_number("--max-ticks", args.next())?,
                "--programs" => {
                    config.program_file = Some(args.next().ok_or(ConfigError::MissingValue("--programs"))?)
                }
                "--verbose" | "-v" => config.verbose = true,
                _ => return Err(ConfigError::UnknownFlag(flag)),
            }
        }

        config.scheduling = match scheduler.as_str() {
            "fifo" => SchedulingAlgorithm::Fifo,
            "rr" | "round-robin" => SchedulingAlgorithm::RoundRobin { quantum },
            "priority" => SchedulingAlgorithm::Priority { levels, preemptive },
            "rr-priority" => SchedulingAlgorithm::RoundRobinPriority { levels, preemptive, quantum },
            _ => return Err(ConfigError::UnknownScheduler(scheduler)),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_size == 0 {
            return Err(ConfigError::Invalid("frame size must be greater than zero"));
        }
        if self.total_memory == 0 || self.total_memory % self.frame_size != 0 {
            return Err(ConfigError::Invalid("memory must be a positive multiple of the frame size"));
        }
        if self.io_duration == 0 {
            return Err(ConfigError::Invalid("io duration must be greater than zero"));
        }

        match self.scheduling {
            SchedulingAlgorithm::RoundRobin { quantum } | SchedulingAlgorithm::RoundRobinPriority { quantum, .. }
                if quantum == 0 =>
            {
                Err(ConfigError::Invalid("quantum must be greater than zero"))
            }
            SchedulingAlgorithm::Priority { levels, .. } | SchedulingAlgorithm::RoundRobinPriority { levels, .. }
                if levels == 0 =>
            {
                Err(ConfigError::Invalid("priority scheduling needs at least one level"))
            }
            _ => Ok(()),
        }
    }
}

fn parse_number<T: std::str::FromStr>(flag: &'static str, value: Option<String>) -> Result<T, ConfigError> {
    let value = value.ok_or(ConfigError::MissingValue(flag))?;
    value.parse().map_err(|_| ConfigError::InvalidNumber { flag, value })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(line: &str) -> Vec<String> {
        line.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_args(Vec::new()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.total_memory, 16);
        assert_eq!(config.frame_size, 4);
    }

    #[test]
    fn test_config_round_robin_priority() {
        let config = Config::from_args(args("--scheduler rr-priority --quantum 3 --levels 4 --preemptive")).unwrap();
        assert_eq!(
            config.scheduling,
            SchedulingAlgorithm::RoundRobinPriority { levels: 4, preemptive: true, quantum: 3 }
        );
    }

    #[test]
    fn test_config_memory_and_eviction() {
        let config = Config::from_args(args("--memory 32 --frame-size 8 --eviction fifo -v")).unwrap();
        assert_eq!(config.total_memory, 32);
        assert_eq!(config.frame_size, 8);
        assert_eq!(config.eviction, EvictionPolicy::Fifo);
        assert!(config.verbose);
    }

    #[test]
    fn test_config_rejects_memory_not_multiple_of_frame() {
        let result = Config::from_args(args("--memory 10 --frame-size 4"));
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_config_rejects_zero_quantum() {
        let result = Config::from_args(args("--scheduler rr --quantum 0"));
        assert_eq!(result, Err(ConfigError::Invalid("quantum must be greater than zero")));
    }

    #[test]
    fn test_config_rejects_bad_input() {
        assert_eq!(
            Config::from_args(args("--bogus")),
            Err(ConfigError::UnknownFlag("--bogus".to_string()))
        );
        assert_eq!(Config::from_args(args("--memory")), Err(ConfigError::MissingValue("--memory")));
        assert_eq!(
            Config::from_args(args("--memory lots")),
            Err(ConfigError::InvalidNumber { flag: "--memory", value: "lots".to_string() })
        );
        assert!(matches!(
            Config::from_args(args("--scheduler lottery")),
            Err(ConfigError::UnknownScheduler(_))
        ));
        assert!(matches!(
            Config::from_args(args("--eviction lru")),
            Err(ConfigError::UnknownEviction(_))
        ));
    }
}
