//! Entry tracker — the index of the most recent entry, carried forward.

/// Last-write-wins register for the open entry.
///
/// `None` is the flat sentinel. A new entry overwrites any open entry; an
/// exit clears it only when the composer's reset policy says so.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntryTracker {
    entry_index: Option<usize>,
}

impl EntryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register bar `i`'s entry flag and return the entry in effect.
    pub fn on_bar(&mut self, bar_index: usize, is_entry: bool) -> Option<usize> {
        if is_entry {
            self.entry_index = Some(bar_index);
        }
        self.entry_index
    }

    pub fn current(&self) -> Option<usize> {
        self.entry_index
    }

    pub fn is_flat(&self) -> bool {
        self.entry_index.is_none()
    }

    /// Go flat after an exit.
    pub fn clear(&mut self) {
        self.entry_index = None;
    }
}
