use std::fmt;
use std::str::FromStr;

use super::page_table::{PageKey, PageTable};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum EvictionPolicy {
    SecondChance,
    Fifo,
}

impl FromStr for EvictionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "second-chance" | "clock" => Ok(EvictionPolicy::SecondChance),
            "fifo" => Ok(EvictionPolicy::Fifo),
            other => Err(format!("unknown eviction policy `{}`", other)),
        }
    }
}

impl fmt::Display for EvictionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvictionPolicy::SecondChance => f.write_str("second-chance"),
            EvictionPolicy::Fifo => f.write_str("fifo"),
        }
    }
}

/// Resident pages eligible for replacement, in the order they became
/// resident.
///
/// Under second chance the list is scanned as a clock from a cursor that
/// survives between calls. The chance bit itself lives on the page row.
pub(crate) struct VictimList {
    policy: EvictionPolicy,
    candidates: Vec<PageKey>,
    cursor: usize,
}

impl VictimList {
    pub fn new(policy: EvictionPolicy) -> VictimList {
        VictimList {
            policy,
            candidates: Vec::new(),
            cursor: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[cfg(test)]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[cfg(test)]
    pub fn contains(&self, key: PageKey) -> bool {
        self.candidates.contains(&key)
    }

    pub fn add(&mut self, key: PageKey) {
        self.candidates.push(key);
    }

    pub fn remove(&mut self, key: PageKey) -> bool {
        let index = match self.candidates.iter().position(|candidate| *candidate == key) {
            Some(index) => index,
            None => return false,
        };

        self.candidates.remove(index);

        if index < self.cursor {
            self.cursor -= 1;
        }
        if self.cursor >= self.candidates.len() {
            self.cursor = 0;
        }

        true
    }

    /// Picks and removes the next page to evict.
    pub fn next_victim(&mut self, page_table: &mut PageTable) -> Option<PageKey> {
        if self.is_empty() {
            return None;
        }

        match self.policy {
            EvictionPolicy::Fifo => Some(self.candidates.remove(0)),
            EvictionPolicy::SecondChance => Some(self.next_second_chance_victim(page_table)),
        }
    }

    fn next_second_chance_victim(&mut self, page_table: &mut PageTable) -> PageKey {
        // Every pass clears at least one bit, so this ends within two laps.
        loop {
            let key = self.candidates[self.cursor];
            let row = page_table.row_mut(key);

            if row.second_chance {
                row.second_chance = false;
                self.cursor = (self.cursor + 1) % self.candidates.len();
                continue;
            }

            self.candidates.remove(self.cursor);
            if self.cursor >= self.candidates.len() {
                self.cursor = 0;
            }
            return key;
        }
    }
}
