//! Keyed storage backing the thread-safe heap.

use std::collections::HashMap;
use std::fmt;

use super::algorithm::{self, HeapInterface};

/// Derives the unique key of an object.
pub type KeyFunc<T> = Box<dyn Fn(&T) -> String + Send + Sync>;
/// Returns true when the first object must be popped before the second.
pub type LessFunc<T> = Box<dyn Fn(&T, &T) -> bool + Send + Sync>;

/// A stored object and its position in the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeapItem<T> {
    /// The object.
    pub obj: T,
    /// Position of the object's key in [`HeapData::queue`].
    pub index: usize,
}

/// Objects by key plus the heap-ordered queue of their keys.
///
/// `items[queue[i]].index == i` for every position `i`.
pub struct HeapData<T> {
    items: HashMap<String, HeapItem<T>>,
    queue: Vec<String>,
    key_func: KeyFunc<T>,
    less_func: LessFunc<T>,
}

impl<T> HeapData<T> {
    /// Empty storage ordered by `less_func`.
    #[must_use]
    pub fn new(key_func: KeyFunc<T>, less_func: LessFunc<T>) -> Self {
        Self {
            items: HashMap::new(),
            queue: Vec::new(),
            key_func,
            less_func,
        }
    }

    /// Key of `obj`.
    pub fn key_of(&self, obj: &T) -> String {
        (self.key_func)(obj)
    }

    /// Stored items by key.
    #[must_use]
    pub const fn items(&self) -> &HashMap<String, HeapItem<T>> {
        &self.items
    }

    /// Keys in heap order; the first one is the top.
    #[must_use]
    pub fn queue(&self) -> &[String] {
        &self.queue
    }

    /// The top object, if any.
    #[must_use]
    pub fn peek(&self) -> Option<&T> {
        let key = self.queue.first()?;
        self.items.get(key).map(|item| &item.obj)
    }

    /// Replace the object stored under `key` and restore its position, or
    /// insert it when absent.
    pub fn upsert(&mut self, key: String, obj: T) {
        if let Some(item) = self.items.get_mut(&key) {
            item.obj = obj;
            let index = item.index;
            algorithm::fix(self, index);
        } else {
            algorithm::push(self, (key, obj));
        }
    }

    /// Insert `obj` under `key` unless the key is already stored.
    pub fn insert_if_absent(&mut self, key: String, obj: T) {
        if !self.items.contains_key(&key) {
            algorithm::push(self, (key, obj));
        }
    }

    /// Remove the object stored under `key`.
    pub fn remove_key(&mut self, key: &str) -> Option<T> {
        let index = self.items.get(key)?.index;
        algorithm::remove(self, index)
    }
}

impl<T> HeapInterface for HeapData<T> {
    type Push = (String, T);
    type Pop = T;

    fn len(&self) -> usize {
        self.queue.len()
    }

    fn less(&self, i: usize, j: usize) -> bool {
        let (Some(key_i), Some(key_j)) = (self.queue.get(i), self.queue.get(j)) else {
            return false;
        };
        let (Some(item_i), Some(item_j)) = (self.items.get(key_i), self.items.get(key_j)) else {
            return false;
        };
        (self.less_func)(&item_i.obj, &item_j.obj)
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.queue.swap(i, j);
        for index in [i, j] {
            if let Some(item) = self.items.get_mut(&self.queue[index]) {
                item.index = index;
            }
        }
    }

    fn push(&mut self, (key, obj): (String, T)) {
        let index = self.queue.len();
        self.items.insert(key.clone(), HeapItem { obj, index });
        self.queue.push(key);
    }

    fn pop(&mut self) -> Option<T> {
        let key = self.queue.pop()?;
        self.items.remove(&key).map(|item| item.obj)
    }
}

impl<T> fmt::Debug for HeapData<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeapData")
            .field("queue", &self.queue)
            .finish_non_exhaustive()
    }
}
