use super::Pid;

/// Identifies one virtual page of one process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct PageKey {
    pub pid: Pid,
    pub page: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct PageRow {
    pub pid: Pid,
    pub page_number: usize,
    /// `None` while the page is not resident.
    pub frame: Option<usize>,
    pub is_swapped_out: bool,
    pub second_chance: bool,
}

impl PageRow {
    pub fn new(pid: Pid, page_number: usize) -> PageRow {
        PageRow {
            pid,
            page_number,
            frame: None,
            is_swapped_out: false,
            second_chance: false,
        }
    }

    pub fn key(&self) -> PageKey {
        PageKey {
            pid: self.pid,
            page: self.page_number,
        }
    }

    pub fn is_resident(&self) -> bool {
        self.frame.is_some()
    }
}

pub(crate) struct PageTable {
    rows: Vec<PageRow>,
}

impl PageTable {
    pub fn new() -> PageTable {
        PageTable { rows: Vec::new() }
    }

    pub fn add_row(&mut self, pid: Pid, page_number: usize) {
        self.rows.push(PageRow::new(pid, page_number));
    }

    pub fn rows_of(&self, pid: Pid) -> Vec<PageRow> {
        self.rows.iter().filter(|row| row.pid == pid).cloned().collect()
    }

    pub fn row(&self, key: PageKey) -> &PageRow {
        match self.rows.iter().find(|row| row.key() == key) {
            Some(row) => row,
            None => panic!("No page {} for process {}", key.page, key.pid),
        }
    }

    pub fn row_mut(&mut self, key: PageKey) -> &mut PageRow {
        match self.rows.iter_mut().find(|row| row.key() == key) {
            Some(row) => row,
            None => panic!("No page {} for process {}", key.page, key.pid),
        }
    }

    pub fn set_frame(&mut self, key: PageKey, frame: Option<usize>) {
        self.row_mut(key).frame = frame;
    }

    pub fn set_swapped(&mut self, key: PageKey, is_swapped_out: bool) {
        self.row_mut(key).is_swapped_out = is_swapped_out;
    }

    /// Drops residency and swap state of every row of `pid`, returning the
    /// frames those rows held.
    pub fn invalidate(&mut self, pid: Pid) -> Vec<usize> {
        let mut frames = Vec::new();

        for row in self.rows.iter_mut().filter(|row| row.pid == pid) {
            if let Some(frame) = row.frame.take() {
                frames.push(frame);
            }
            row.is_swapped_out = false;
            row.second_chance = false;
        }

        frames
    }

    #[cfg(test)]
    pub fn resident_rows(&self) -> impl Iterator<Item = &PageRow> {
        self.rows.iter().filter(|row| row.is_resident())
    }
}
