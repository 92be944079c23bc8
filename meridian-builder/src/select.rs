//! Open/closed bookkeeping for the custom select widgets.
//!
//! At most one menu is open at a time. The registry is owned by whoever
//! mounts the selects and passed to their handlers; there is no global list.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectEntry<K> {
    pub id: K,
    pub open: bool,
    pub opens_up: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectRegistry<K> {
    entries: Vec<SelectEntry<K>>,
}

impl<K> Default for SelectRegistry<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K: PartialEq + Clone> SelectRegistry<K> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a select; registering the same id twice is a no-op.
    pub fn register(&mut self, id: K) {
        if self.entry(&id).is_none() {
            self.entries.push(SelectEntry {
                id,
                open: false,
                opens_up: false,
            });
        }
    }

    pub fn unregister(&mut self, id: &K) {
        self.entries.retain(|e| &e.id != id);
    }

    fn entry(&self, id: &K) -> Option<&SelectEntry<K>> {
        self.entries.iter().find(|e| &e.id == id)
    }

    fn entry_mut(&mut self, id: &K) -> Option<&mut SelectEntry<K>> {
        self.entries.iter_mut().find(|e| &e.id == id)
    }

    /// Close every menu except `except`. Closing also resets direction.
    pub fn close_all(&mut self, except: Option<&K>) {
        for entry in &mut self.entries {
            if except.is_some_and(|keep| keep == &entry.id) {
                continue;
            }
            entry.open = false;
            entry.opens_up = false;
        }
    }

    /// Open `id`, closing all others. Unknown ids close everything.
    pub fn open(&mut self, id: &K) {
        self.close_all(Some(id));
        if let Some(entry) = self.entry_mut(id) {
            entry.open = true;
        }
    }

    pub fn close(&mut self, id: &K) {
        if let Some(entry) = self.entry_mut(id) {
            entry.open = false;
            entry.opens_up = false;
        }
    }

    /// Flip `id` and return whether it is now open.
    pub fn toggle(&mut self, id: &K) -> bool {
        if self.is_open(id) {
            self.close(id);
            false
        } else {
            self.open(id);
            self.is_open(id)
        }
    }

    /// Record the measured direction of an open menu.
    pub fn set_opens_up(&mut self, id: &K, up: bool) {
        if let Some(entry) = self.entry_mut(id).filter(|e| e.open) {
            entry.opens_up = up;
        }
    }

    #[must_use]
    pub fn is_open(&self, id: &K) -> bool {
        self.entry(id).is_some_and(|e| e.open)
    }

    #[must_use]
    pub fn opens_up(&self, id: &K) -> bool {
        self.entry(id).is_some_and(|e| e.opens_up)
    }

    #[must_use]
    pub fn open_id(&self) -> Option<&K> {
        self.entries.iter().find(|e| e.open).map(|e| &e.id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
