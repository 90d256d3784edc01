//! Thread-safe keyed binary heap with blocking pop.
//!
//! Objects are stored under a key derived by a caller-supplied function and
//! ordered by a caller-supplied `less` function; adding an object whose key
//! is already present replaces it in place. Consumers block in
//! [`Heap::pop`] until an object is available or the heap is closed.
//!
//! Every mutation takes the writer mutex, so mutations are serialized and a
//! waiting consumer can never miss a wake-up. Lookups take only a shared read
//! lock on the state and never contend with each other.
//!
//! ```
//! use gang_scheduler_core::infra::Heap;
//!
//! let heap = Heap::new(
//!     |item: &(String, u32)| item.0.clone(),
//!     |a: &(String, u32), b: &(String, u32)| a.1 < b.1,
//! );
//! heap.add(("b".to_string(), 2)).unwrap();
//! heap.add(("a".to_string(), 1)).unwrap();
//! assert_eq!(heap.pop().unwrap().0, "a");
//! ```

pub mod algorithm;
pub mod data;

use std::fmt;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex, RwLock};

use crate::core::HeapError;

pub use algorithm::HeapInterface;
pub use data::{HeapData, HeapItem, KeyFunc, LessFunc};

struct HeapState<T> {
    data: HeapData<T>,
    closed: bool,
}

/// A keyed priority heap shared between producers and consumers.
///
/// States: open, then closed once [`Heap::close`] is called. A closed heap
/// refuses additions but still hands out what it holds.
pub struct Heap<T> {
    lock: Mutex<()>,
    cond: Condvar,
    state: RwLock<HeapState<T>>,
}

impl<T> Heap<T> {
    /// An empty, open heap.
    pub fn new<K, L>(key_func: K, less_func: L) -> Self
    where
        K: Fn(&T) -> String + Send + Sync + 'static,
        L: Fn(&T, &T) -> bool + Send + Sync + 'static,
    {
        Self {
            lock: Mutex::new(()),
            cond: Condvar::new(),
            state: RwLock::new(HeapState {
                data: HeapData::new(Box::new(key_func), Box::new(less_func)),
                closed: false,
            }),
        }
    }

    /// Insert `obj`, replacing any object with the same key.
    ///
    /// # Errors
    ///
    /// Returns [`HeapError::Closed`] after [`Heap::close`].
    pub fn add(&self, obj: T) -> Result<(), HeapError> {
        self.bulk_add([obj])
    }

    /// Insert every object under one lock acquisition, then wake consumers once.
    ///
    /// # Errors
    ///
    /// Returns [`HeapError::Closed`] after [`Heap::close`]; nothing is added.
    pub fn bulk_add(&self, objs: impl IntoIterator<Item = T>) -> Result<(), HeapError> {
        let _guard = self.lock.lock();
        {
            let mut state = self.state.write();
            if state.closed {
                return Err(HeapError::Closed);
            }
            for obj in objs {
                let key = state.data.key_of(&obj);
                state.data.upsert(key, obj);
            }
        }
        self.cond.notify_all();
        Ok(())
    }

    /// Insert `obj` unless an object with its key is already stored.
    ///
    /// Lets a single consumer requeue an object it popped without clobbering
    /// a newer version a producer added meanwhile.
    ///
    /// # Errors
    ///
    /// Returns [`HeapError::Closed`] after [`Heap::close`].
    pub fn add_if_not_present(&self, obj: T) -> Result<(), HeapError> {
        let _guard = self.lock.lock();
        {
            let mut state = self.state.write();
            if state.closed {
                return Err(HeapError::Closed);
            }
            let key = state.data.key_of(&obj);
            state.data.insert_if_absent(key, obj);
        }
        self.cond.notify_all();
        Ok(())
    }

    /// Same as [`Heap::add`].
    ///
    /// # Errors
    ///
    /// Returns [`HeapError::Closed`] after [`Heap::close`].
    pub fn update(&self, obj: T) -> Result<(), HeapError> {
        self.add(obj)
    }

    /// Remove the object stored under the key of `obj`.
    ///
    /// # Errors
    ///
    /// Returns [`HeapError::ObjectNotFound`] if no object has that key.
    pub fn delete(&self, obj: &T) -> Result<T, HeapError> {
        let _guard = self.lock.lock();
        let mut state = self.state.write();
        let key = state.data.key_of(obj);
        state.data.remove_key(&key).ok_or(HeapError::ObjectNotFound)
    }

    /// Block until an object is available and remove the top one.
    ///
    /// A closed heap is drained first.
    ///
    /// # Errors
    ///
    /// Returns [`HeapError::Closed`] once the heap is closed and empty, and
    /// [`HeapError::ObjectAlreadyRemoved`] if the bookkeeping is corrupted.
    pub fn pop(&self) -> Result<T, HeapError> {
        let mut guard = self.lock.lock();
        while !self.ready_to_pop()? {
            self.cond.wait(&mut guard);
        }
        self.pop_locked()
    }

    /// Like [`Heap::pop`] but gives up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`HeapError::Timeout`] if nothing became available in time,
    /// plus the errors of [`Heap::pop`].
    pub fn pop_timeout(&self, timeout: Duration) -> Result<T, HeapError> {
        let deadline = Instant::now() + timeout;
        let mut guard = self.lock.lock();
        while !self.ready_to_pop()? {
            if self.cond.wait_until(&mut guard, deadline).timed_out() && !self.ready_to_pop()? {
                return Err(HeapError::Timeout);
            }
        }
        self.pop_locked()
    }

    /// Caller must hold `lock`.
    fn ready_to_pop(&self) -> Result<bool, HeapError> {
        let state = self.state.read();
        if !state.data.is_empty() {
            return Ok(true);
        }
        if state.closed {
            return Err(HeapError::Closed);
        }
        Ok(false)
    }

    /// Caller must hold `lock`.
    fn pop_locked(&self) -> Result<T, HeapError> {
        let popped = algorithm::pop(&mut self.state.write().data);
        popped.ok_or_else(|| {
            tracing::error!("heap queue referenced an object missing from its items");
            HeapError::ObjectAlreadyRemoved
        })
    }

    /// Close the heap and wake every blocked consumer. Idempotent.
    pub fn close(&self) {
        let _guard = self.lock.lock();
        self.state.write().closed = true;
        self.cond.notify_all();
        tracing::debug!("heap closed");
    }

    /// True after [`Heap::close`].
    pub fn is_closed(&self) -> bool {
        self.state.read().closed
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.state.read().data.len()
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keys of every stored object, in no particular order.
    pub fn list_keys(&self) -> Vec<String> {
        self.state.read().data.items().keys().cloned().collect()
    }
}

impl<T: Clone> Heap<T> {
    /// Copies of every stored object, in no particular order.
    pub fn list(&self) -> Vec<T> {
        self.state
            .read()
            .data
            .items()
            .values()
            .map(|item| item.obj.clone())
            .collect()
    }

    /// The stored object with the same key as `obj`.
    pub fn get(&self, obj: &T) -> Option<T> {
        let state = self.state.read();
        let key = state.data.key_of(obj);
        state.data.items().get(&key).map(|item| item.obj.clone())
    }

    /// The stored object under `key`.
    pub fn get_by_key(&self, key: &str) -> Option<T> {
        self.state.read().data.items().get(key).map(|item| item.obj.clone())
    }

    /// The object [`Heap::pop`] would return next, without removing it.
    pub fn peek(&self) -> Option<T> {
        self.state.read().data.peek().cloned()
    }
}

impl<T> fmt::Debug for Heap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("Heap")
            .field("len", &state.data.len())
            .field("closed", &state.closed)
            .finish_non_exhaustive()
    }
}
