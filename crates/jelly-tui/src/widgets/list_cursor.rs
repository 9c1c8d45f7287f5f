//! Cursor over a list whose length changes underneath it.
//!
//! Keeps `0 <= pos < max(1, len)` after every operation.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListCursor {
    pos: usize,
}

impl ListCursor {
    pub fn get(&self) -> usize {
        self.pos
    }

    pub fn up(&mut self) {
        self.pos = self.pos.saturating_sub(1);
    }

    pub fn down(&mut self, len: usize) {
        self.pos = (self.pos + 1).min(len.saturating_sub(1));
    }

    /// Pull the cursor back inside a list that may have shrunk.
    pub fn clamp(&mut self, len: usize) {
        self.pos = self.pos.min(len.saturating_sub(1));
    }

    pub fn reset(&mut self) {
        self.pos = 0;
    }

    pub fn pick<'a, T>(&self, items: &'a [T]) -> Option<&'a T> {
        items.get(self.pos)
    }
}
