//! Ordered item list and the current index
//!
//! The model owns no animation state. It only guarantees that `current` is
//! `Some(i)` with `i < len` whenever items exist and `None` when empty.

use serde::{Deserialize, Serialize};

/// One carousel entry. `handle` is opaque to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarouselItem<H> {
    pub handle: H,
    /// Used in accessibility announcements.
    pub title: Option<String>,
    pub enabled: bool,
    pub visible: bool,
}

impl<H> CarouselItem<H> {
    pub fn new(handle: H) -> Self {
        Self {
            handle,
            title: None,
            enabled: true,
            visible: true,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Result of removing an item.
#[derive(Debug, Clone, PartialEq)]
pub struct Removal<H> {
    pub index: usize,
    pub item: CarouselItem<H>,
    /// The removed item was the current one, so a different item (or none)
    /// is current now even if the index value did not move.
    pub removed_current: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CarouselModel<H> {
    items: Vec<CarouselItem<H>>,
    current: Option<usize>,
}

impl<H> Default for CarouselModel<H> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            current: None,
        }
    }
}

impl<H> CarouselModel<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn current_item(&self) -> Option<&CarouselItem<H>> {
        self.current.and_then(|i| self.items.get(i))
    }

    pub fn item(&self, index: usize) -> Option<&CarouselItem<H>> {
        self.items.get(index)
    }

    pub fn items(&self) -> &[CarouselItem<H>] {
        &self.items
    }

    pub fn last_index(&self) -> Option<usize> {
        self.items.len().checked_sub(1)
    }

    /// Append an item. The first item added becomes current.
    pub fn push(&mut self, item: CarouselItem<H>) {
        self.items.push(item);
        if self.current.is_none() {
            self.current = Some(0);
        }
    }

    /// Insert at `index` (`index == count` appends). Returns false and changes
    /// nothing when `index > count`.
    pub fn insert(&mut self, index: usize, item: CarouselItem<H>) -> bool {
        if index > self.items.len() {
            return false;
        }
        self.items.insert(index, item);
        self.current = match self.current {
            None => Some(0),
            Some(current) if index <= current => Some(current + 1),
            keep => keep,
        };
        true
    }

    /// Replace the item at `index` in place. The current index is untouched.
    pub fn set_item(
        &mut self,
        index: usize,
        item: CarouselItem<H>,
    ) -> Option<CarouselItem<H>> {
        let slot = self.items.get_mut(index)?;
        Some(std::mem::replace(slot, item))
    }

    pub fn remove(&mut self, index: usize) -> Option<Removal<H>> {
        if index >= self.items.len() {
            return None;
        }
        let item = self.items.remove(index);
        let mut removed_current = false;
        self.current = match (self.current, self.last_index()) {
            (_, None) => {
                removed_current = true;
                None
            }
            (Some(current), Some(last)) if index == current => {
                removed_current = true;
                Some(current.min(last))
            }
            (Some(current), Some(_)) if index < current => Some(current - 1),
            (keep, Some(_)) => keep,
        };
        Some(Removal {
            index,
            item,
            removed_current,
        })
    }

    /// Drop every item. Returns the number removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.items.len();
        self.items.clear();
        self.current = None;
        removed
    }

    /// Set the current index. Out-of-range values are rejected.
    pub fn set_current(&mut self, index: usize) -> bool {
        if index < self.items.len() {
            self.current = Some(index);
            true
        } else {
            false
        }
    }
}

impl<H: PartialEq> CarouselModel<H> {
    pub fn position_of(&self, handle: &H) -> Option<usize> {
        self.items.iter().position(|item| &item.handle == handle)
    }

    /// Remove the item carrying `handle`. Unknown handles are a no-op.
    pub fn remove_handle(&mut self, handle: &H) -> Option<Removal<H>> {
        let index = self.position_of(handle)?;
        self.remove(index)
    }
}
