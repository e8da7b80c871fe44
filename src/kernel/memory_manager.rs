use std::collections::VecDeque;

use log::debug;

use super::page_table::{PageKey, PageRow, PageTable};
use super::victims::{EvictionPolicy, VictimList};
use super::Pid;

/// Owns the free-frame pool, the page table and the eviction candidates.
pub(crate) struct MemoryManager {
    frame_size: usize,
    total_frames: usize,
    free_frames: VecDeque<usize>,
    page_table: PageTable,
    victims: VictimList,
}

impl MemoryManager {
    pub fn new(total_memory: usize, frame_size: usize, policy: EvictionPolicy) -> MemoryManager {
        let total_frames = total_memory / frame_size;

        MemoryManager {
            frame_size,
            total_frames,
            free_frames: (0..total_frames).collect(),
            page_table: PageTable::new(),
            victims: VictimList::new(policy),
        }
    }

    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    pub fn total_frames(&self) -> usize {
        self.total_frames
    }

    pub fn free_frames(&self) -> Vec<usize> {
        self.free_frames.iter().copied().collect()
    }

    pub fn alloc_frame(&mut self) -> Option<usize> {
        self.free_frames.pop_front()
    }

    /// Returns frames to the pool. A frame already in the pool is not added
    /// twice.
    pub fn add_frames(&mut self, frames: &[usize]) {
        for &frame in frames {
            if !self.free_frames.contains(&frame) {
                self.free_frames.push_back(frame);
            }
        }
    }

    pub fn add_pages(&mut self, pid: Pid, page_count: usize) {
        for page in 0..page_count {
            self.page_table.add_row(pid, page);
        }
    }

    #[cfg(test)]
    pub fn page_table(&self) -> &PageTable {
        &self.page_table
    }

    pub fn page_table_of(&self, pid: Pid) -> Vec<PageRow> {
        self.page_table.rows_of(pid)
    }

    pub fn row(&self, pid: Pid, page: usize) -> &PageRow {
        self.page_table.row(PageKey { pid, page })
    }

    pub fn set_frame(&mut self, pid: Pid, page: usize, frame: Option<usize>) {
        self.page_table.set_frame(PageKey { pid, page }, frame);
    }

    pub fn mark_swapped(&mut self, pid: Pid, page: usize, is_swapped_out: bool) {
        self.page_table.set_swapped(PageKey { pid, page }, is_swapped_out);
    }

    /// Registers a freshly resident page. It enters holding its second chance.
    pub fn add_eviction_candidate(&mut self, pid: Pid, page: usize) {
        let key = PageKey { pid, page };
        self.page_table.row_mut(key).second_chance = true;
        self.victims.add(key);
    }

    #[cfg(test)]
    pub fn eviction_candidates(&self) -> &VictimList {
        &self.victims
    }

    pub fn next_victim(&mut self) -> Option<PageRow> {
        let key = self.victims.next_victim(&mut self.page_table)?;
        Some(self.page_table.row(key).clone())
    }

    /// Frees every frame held by `pid` and forgets its residency.
    pub fn release_process(&mut self, pid: Pid) -> Vec<usize> {
        for row in self.page_table.rows_of(pid) {
            if row.is_resident() {
                self.victims.remove(row.key());
            }
        }

        let frames = self.page_table.invalidate(pid);
        debug!("Releasing frames {:?} of process {}", frames, pid);
        self.add_frames(&frames);

        frames
    }
}
