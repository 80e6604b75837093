//! Selection state for a group of navigation items (category list, heading list).
//!
//! Two markers are tracked independently: the *active* item, which is the one whose
//! content is shown, and the *cursor*, which follows the keyboard. Clicking an item
//! moves both. At most one item in a group is active at any time.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavGroup<T> {
    items: Vec<T>,
    active: Option<usize>,
    cursor: Option<usize>,
}

impl<T> NavGroup<T> {
    /// A group with no active item; the cursor starts on the first item.
    pub fn new(items: Vec<T>) -> Self {
        let cursor = if items.is_empty() { None } else { Some(0) };
        Self {
            items,
            active: None,
            cursor,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn active_item(&self) -> Option<&T> {
        self.active.and_then(|i| self.items.get(i))
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.active == Some(index)
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Deactivate the previous item and activate `index`. Out-of-range clicks are ignored.
    pub fn click(&mut self, index: usize) -> Option<&T> {
        if index >= self.items.len() {
            return None;
        }
        self.active = Some(index);
        self.cursor = Some(index);
        self.items.get(index)
    }

    /// Click whatever the cursor is on.
    pub fn click_cursor(&mut self) -> Option<&T> {
        let index = self.cursor?;
        self.click(index)
    }

    pub fn select_next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.cursor {
            Some(i) if i + 1 < self.items.len() => i + 1,
            _ => 0,
        };
        self.cursor = Some(i);
    }

    pub fn select_prev(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.cursor {
            Some(0) | None => self.items.len() - 1,
            Some(n) => n - 1,
        };
        self.cursor = Some(i);
    }
}

impl<T> Default for NavGroup<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
