//! Binary heap algorithms over any indexable container.
//!
//! The container only has to expose length, comparison and swap by index,
//! plus push/pop at the end; these functions keep the heap invariant
//! `!less(child, parent)` for every parent/child pair.

/// A container the heap algorithms can operate on.
pub trait HeapInterface {
    /// What [`HeapInterface::push`] appends.
    type Push;
    /// What [`HeapInterface::pop`] removes from the end.
    type Pop;

    /// Number of elements.
    fn len(&self) -> usize;

    /// True when empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether element `i` must sit above element `j`. Out-of-range indexes
    /// compare as `false`.
    fn less(&self, i: usize, j: usize) -> bool;

    /// Exchange elements `i` and `j`.
    fn swap(&mut self, i: usize, j: usize);

    /// Append at the end without restoring the invariant.
    fn push(&mut self, value: Self::Push);

    /// Remove the last element.
    fn pop(&mut self) -> Option<Self::Pop>;
}

/// Establish the invariant over arbitrary contents.
pub fn init<H: HeapInterface + ?Sized>(h: &mut H) {
    let n = h.len();
    for i in (0..n / 2).rev() {
        down(h, i, n);
    }
}

/// Restore the invariant after element `index` changed.
pub fn fix<H: HeapInterface + ?Sized>(h: &mut H, index: usize) {
    let n = h.len();
    if !down(h, index, n) {
        up(h, index);
    }
}

/// Sift element `i0` down within the first `n` elements. Returns whether it moved.
pub fn down<H: HeapInterface + ?Sized>(h: &mut H, i0: usize, n: usize) -> bool {
    let mut i = i0;
    loop {
        let j1 = 2 * i + 1;
        if j1 >= n {
            break;
        }

        let mut j = j1;
        let j2 = j1 + 1;
        if j2 < n && h.less(j2, j1) {
            j = j2;
        }

        if !h.less(j, i) {
            break;
        }
        h.swap(i, j);
        i = j;
    }
    i > i0
}

/// Sift element `j` up toward the root.
pub fn up<H: HeapInterface + ?Sized>(h: &mut H, mut j: usize) {
    while j > 0 {
        let i = (j - 1) / 2;
        if !h.less(j, i) {
            break;
        }
        h.swap(i, j);
        j = i;
    }
}

/// Insert `value` keeping the invariant.
pub fn push<H: HeapInterface + ?Sized>(h: &mut H, value: H::Push) {
    h.push(value);
    let last = h.len() - 1;
    up(h, last);
}

/// Remove the top element.
pub fn pop<H: HeapInterface + ?Sized>(h: &mut H) -> Option<H::Pop> {
    let n = h.len().checked_sub(1)?;
    h.swap(0, n);
    down(h, 0, n);
    h.pop()
}

/// Remove element `i`.
pub fn remove<H: HeapInterface + ?Sized>(h: &mut H, i: usize) -> Option<H::Pop> {
    let n = h.len().checked_sub(1)?;
    if i > n {
        return None;
    }

    if n != i {
        h.swap(i, n);
        if !down(h, i, n) {
            up(h, i);
        }
    }
    h.pop()
}
