//! Bidirectional cursors and the forward iterator.
//!
//! A cursor carries two positions: `cur`, the node it denotes, and `prev`,
//! the node that preceded `cur` when the cursor was (re)positioned. The
//! end position is `cur == null` with `prev == tail`. Equality compares
//! `cur` only.
//!
//! # Recovery under concurrent mutation
//!
//! A step first validates the neighborhood it recorded. When the
//! validation fails, the step diagnoses what happened before moving:
//!
//! - `cur.prev != prev` with `cur` still referenced by its current
//!   predecessor: a node was inserted before `cur`; the step proceeds
//!   normally (the stale `prev` is replaced by `cur` on advance).
//! - `cur` referenced by nobody: `cur` was unlinked. The step walks
//!   forward along `next` from the unlinked node (removal never clears a
//!   node's own links, so they lead back into the list) until it finds the
//!   node now occupying the old position, or the end.
//!
//! Each recovery step either advances along a `next`/`prev` chain or
//! terminates at an endpoint, so traversal stays lock-free; with no
//! mutation adjacent to the cursor it is wait-free.
//!
//! Dereferencing a visited node is safe only while the caller's
//! reclamation scheme keeps removed nodes allocated (see
//! [`crate::reclaim`]).

use std::fmt;
use std::ptr::NonNull;

use crate::node::Node;
use crate::ordering::READ_ORD;

use super::{ListError, LockFreeList};

// ============================================================================
//  Cursor
// ============================================================================

/// A bidirectional cursor over a [`LockFreeList`].
pub struct Cursor<'a, T> {
    list: &'a LockFreeList<T>,
    cur: *mut Node<T>,
    prev: *mut Node<T>,
}

impl<'a, T> Cursor<'a, T> {
    /// Cursor at the current head: `(head, null)`.
    pub(super) fn front(list: &'a LockFreeList<T>) -> Self {
        Self {
            list,
            cur: list.head.load(READ_ORD).ptr(),
            prev: std::ptr::null_mut(),
        }
    }

    /// Cursor past the end: `(null, tail)`.
    pub(super) fn end(list: &'a LockFreeList<T>) -> Self {
        Self {
            list,
            cur: std::ptr::null_mut(),
            prev: list.tail.load(READ_ORD).ptr(),
        }
    }

    /// Whether the cursor is at the end position.
    #[inline]
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.cur.is_null()
    }

    /// The node the cursor denotes, if any.
    #[inline]
    #[must_use]
    pub fn node(&self) -> Option<NonNull<Node<T>>> {
        NonNull::new(self.cur)
    }

    /// Borrow the payload at the cursor.
    ///
    /// # Errors
    ///
    /// [`ListError::NullIterator`] at the end position.
    pub fn get(&self) -> Result<&'a T, ListError> {
        match NonNull::new(self.cur) {
            // SAFETY: `cur` was reached through the list; the caller
            // contract on the mutators keeps reachable (and concurrently
            // removed, until quiescence) nodes allocated for at least the
            // lifetime of the list borrow.
            Some(node) => Ok(unsafe { &*node.as_ptr() }.value()),
            None => Err(ListError::NullIterator),
        }
    }

    /// Advance to the next node.
    ///
    /// # Errors
    ///
    /// [`ListError::NullIterator`] when already at the end.
    pub fn move_next(&mut self) -> Result<(), ListError> {
        let Some(cur) = NonNull::new(self.cur) else {
            return Err(ListError::NullIterator);
        };
        // SAFETY: see `get`.
        let cur_ref = unsafe { cur.as_ref() };
        let next = cur_ref.next.load(READ_ORD).ptr();
        let observed_prev = cur_ref.prev.load(READ_ORD).ptr();

        if observed_prev == self.prev || self.still_linked(cur, observed_prev) {
            // In position, or a node slid in before `cur` (which remains a
            // member either way): plain advance.
            self.prev = self.cur;
            self.cur = next;
            return Ok(());
        }

        // `cur` was unlinked after positioning. Its own links survive
        // removal, so `next` leads back into the list; find the node that
        // now occupies the old position.
        let mut probe = next;
        while let Some(p) = NonNull::new(probe) {
            // SAFETY: see `get`.
            let p_ref = unsafe { p.as_ref() };
            if p_ref.prev.load(READ_ORD).ptr() == self.prev {
                self.cur = probe;
                return Ok(());
            }
            probe = p_ref.next.load(READ_ORD).ptr();
        }

        // No occupant found (repairs still in flight, or the suffix is
        // gone). Step to the unlinked node's successor; the next move
        // re-validates from there.
        self.prev = if next.is_null() {
            self.list.tail.load(READ_ORD).ptr()
        } else {
            self.prev
        };
        self.cur = next;
        Ok(())
    }

    /// Step back to the previous node.
    ///
    /// From the end position this lands on the current last node (the
    /// stored `tail` hint may lag during concurrent `push_back`; the step
    /// walks forward to the true last node).
    ///
    /// # Errors
    ///
    /// [`ListError::NullIterator`] when no predecessor exists (decrementing
    /// `begin`, or an empty list).
    pub fn move_prev(&mut self) -> Result<(), ListError> {
        if self.cur.is_null() {
            return self.descend_from_end();
        }

        let Some(t) = NonNull::new(self.prev) else {
            return Err(ListError::NullIterator);
        };
        // SAFETY: see `get`.
        let t_ref = unsafe { t.as_ref() };

        if t_ref.next.load(READ_ORD).ptr() == self.cur {
            self.cur = self.prev;
            self.prev = t_ref.prev.load(READ_ORD).ptr();
            return Ok(());
        }

        let t_prev = t_ref.prev.load(READ_ORD).ptr();
        if self.still_linked(t, t_prev) {
            // A node slid in between `t` and `cur`; the true predecessor
            // is forward of `t`.
            let mut probe = t.as_ptr();
            while let Some(p) = NonNull::new(probe) {
                // SAFETY: see `get`.
                let p_ref = unsafe { p.as_ref() };
                let p_next = p_ref.next.load(READ_ORD).ptr();
                if p_next == self.cur {
                    self.cur = probe;
                    self.prev = p_ref.prev.load(READ_ORD).ptr();
                    return Ok(());
                }
                probe = p_next;
            }
        } else {
            // `t` was unlinked; its back-link leads to a live predecessor.
            let mut probe = t_prev;
            while let Some(p) = NonNull::new(probe) {
                // SAFETY: see `get`.
                let p_ref = unsafe { p.as_ref() };
                if p_ref.next.load(READ_ORD).ptr() == self.cur {
                    self.cur = probe;
                    self.prev = p_ref.prev.load(READ_ORD).ptr();
                    return Ok(());
                }
                probe = p_ref.prev.load(READ_ORD).ptr();
            }
        }

        // No current predecessor found: step onto the recorded one, which
        // preceded `cur` when the cursor was positioned.
        self.cur = t.as_ptr();
        self.prev = t_prev;
        Ok(())
    }

    /// Decrement from the end position: land on the current last node.
    fn descend_from_end(&mut self) -> Result<(), ListError> {
        let mut last = self.list.tail.load(READ_ORD).ptr();
        if last.is_null() {
            return Err(ListError::NullIterator);
        }
        // `tail` may trail during concurrent back-insertion.
        loop {
            // SAFETY: see `get`.
            let next = unsafe { &*last }.next.load(READ_ORD).ptr();
            if next.is_null() {
                break;
            }
            last = next;
        }
        self.cur = last;
        // SAFETY: see `get`.
        self.prev = unsafe { &*last }.prev.load(READ_ORD).ptr();
        Ok(())
    }

    /// Whether `node` is still referenced by its observed predecessor (or
    /// by `head` for a front node).
    fn still_linked(&self, node: NonNull<Node<T>>, observed_prev: *mut Node<T>) -> bool {
        self.list.predecessor_links_to(observed_prev, node.as_ptr())
    }
}

impl<T> Clone for Cursor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Cursor<'_, T> {}

impl<T> PartialEq for Cursor<'_, T> {
    /// Position equality compares the denoted node only.
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.cur, other.cur)
    }
}

impl<T> Eq for Cursor<'_, T> {}

impl<T> fmt::Debug for Cursor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("cur", &self.cur)
            .field("prev", &self.prev)
            .finish()
    }
}

// ============================================================================
//  Iter
// ============================================================================

/// Forward iterator over payload references.
///
/// Every node that was a member when the iterator was created and is not
/// removed before the iterator reaches it will be visited. Nodes inserted
/// or removed mid-traversal may or may not be.
pub struct Iter<'a, T> {
    cursor: Cursor<'a, T>,
}

impl<'a, T> Iter<'a, T> {
    pub(super) fn new(list: &'a LockFreeList<T>) -> Self {
        Self {
            cursor: Cursor::front(list),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.cursor.get().ok()?;
        let _ = self.cursor.move_next();
        Some(item)
    }
}

impl<'a, T> IntoIterator for &'a LockFreeList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ============================================================================
//  Tests
// ============================================================================
