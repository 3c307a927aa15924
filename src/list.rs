//! Filepath: src/list.rs
//! The lock-free intrusive doubly linked list.
//!
//! # Protocol
//!
//! ```text
//! 1. Load one or two linkage words (acquire)
//! 2. Prepare the incoming node's links with relaxed stores (still private)
//! 3. CAS the primary link - the one forward traversal goes through
//! 4. Repair the secondary link (back-link, endpoint) after the CAS
//! ```
//!
//! The primary CAS is the linearization point of every mutator. Secondary
//! repair is best-effort and converges under any interleaving; between the
//! CAS and the repair, back-links may be stale, and traversal tolerates
//! that window (see [`Cursor`]).
//!
//! # ABA
//!
//! Every linkage word is an [`AtomicTagged`]: a pointer plus a version tag
//! that advances on each successful CAS. A mutator that loaded `(P, v)`
//! cannot succeed against a word that has since been recycled back to `P`.
//!
//! # Caller contract
//!
//! The list owns no memory. The caller allocates nodes, hands them in
//! through the unsafe mutators, takes them back via [`remove`], and frees
//! them only once no concurrent traversal can still reach them. The
//! [`crate::reclaim`] module documents the supported deferred-reclamation
//! pairing.
//!
//! [`remove`]: LockFreeList::remove

use std::fmt;
use std::hint;
use std::marker::PhantomData;
use std::ptr::NonNull;

use crate::node::Node;
use crate::ordering::{CAS_FAILURE, INIT_ORD, PUBLISH_ORD, READ_ORD, REPAIR_ORD};
use crate::tagged::{AtomicTagged, TaggedPtr};
use crate::tracing_helpers::{debug_log, trace_log};

mod cursor;


#[cfg(all(test, not(loom)))]
mod shuttle_tests;

pub use cursor::{Cursor, Iter};

// ============================================================================
//  ListError
// ============================================================================

/// Errors reported by cursor operations.
///
/// The mutator preconditions (non-null node, node not linked elsewhere) are
/// discharged at the type level (`NonNull`) and by the safety contracts of
/// the unsafe mutators; they do not surface as runtime errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListError {
    /// Dereference or decrement of a cursor with no node in that direction:
    /// dereferencing `end()`, or decrementing `begin()` of a list whose
    /// front the cursor already reached.
    NullIterator,
}

impl fmt::Display for ListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NullIterator => write!(f, "iterator does not denote a node"),
        }
    }
}

impl std::error::Error for ListError {}

// ============================================================================
//  LockFreeList
// ============================================================================

/// A lock-free doubly linked list over caller-owned intrusive nodes.
///
/// Insertion, removal, search and traversal may run concurrently from many
/// threads without mutual exclusion. Mutators are lock-free: a failed CAS
/// always means another mutator succeeded.
///
/// The list holds two linkage words, `head` and `tail`, and nothing else;
/// there is no size counter by design. `head` is null iff `tail` is null
/// iff the list is empty (in quiescent states; during an empty-list
/// `push_back`, observers may briefly see a non-null `head` with a null
/// `tail`).
pub struct LockFreeList<T> {
    head: AtomicTagged<Node<T>>,
    tail: AtomicTagged<Node<T>>,
    _owns: PhantomData<*mut Node<T>>,
}

// The PhantomData above suppresses the auto impls; the list is a set of
// pointers to nodes whose payloads it exposes by shared reference.
unsafe impl<T: Send> Send for LockFreeList<T> {}
unsafe impl<T: Send + Sync> Sync for LockFreeList<T> {}

impl<T> LockFreeList<T> {
    /// Create an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            head: AtomicTagged::null(),
            tail: AtomicTagged::null(),
            _owns: PhantomData,
        }
    }

    /// Whether the list is empty at the moment of the load.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.head.load(READ_ORD).is_null()
    }

    // ========================================================================
    //  Mutators
    // ========================================================================

    /// Insert `node` at the front of the list.
    ///
    /// Linearizes at the CAS on `head`. The old head's back-link and, for
    /// an empty list, `tail` are repaired after that point.
    ///
    /// # Safety
    ///
    /// - `node` must not currently be in this or any other list.
    /// - The node must stay allocated until no concurrent traversal can
    ///   reach it anymore, which extends past its future removal.
    pub unsafe fn push_front(&self, node: NonNull<Node<T>>) {
        let node_ptr = node.as_ptr();
        // SAFETY: caller guarantees `node` is valid and unlinked.
        let n = unsafe { node.as_ref() };
        n.prev.store_bumped(std::ptr::null_mut(), INIT_ORD);

        loop {
            let head = self.head.load(READ_ORD);
            n.next.store_bumped(head.ptr(), INIT_ORD);

            if self
                .head
                .cas_weak(head, head.bump(node_ptr), PUBLISH_ORD, CAS_FAILURE)
                .is_ok()
            {
                match NonNull::new(head.ptr()) {
                    // SAFETY: the old head is still reachable through us.
                    Some(old) => unsafe { old.as_ref() }.prev.store_bumped(node_ptr, REPAIR_ORD),
                    None => self.tail.store_bumped(node_ptr, REPAIR_ORD),
                }
                return;
            }

            trace_log!("push_front: head CAS lost, retrying");
        }
    }

    /// Insert `node` at the back of the list.
    ///
    /// Linearizes at the CAS on the last node's `next` (on an empty list,
    /// at the CAS on `head`). `tail` may trail the true last node during
    /// concurrent back-insertion; the `T.next != null` check below observes
    /// that and retries.
    ///
    /// # Safety
    ///
    /// Same contract as [`push_front`](Self::push_front).
    pub unsafe fn push_back(&self, node: NonNull<Node<T>>) {
        let node_ptr = node.as_ptr();
        // SAFETY: caller guarantees `node` is valid and unlinked.
        let n = unsafe { node.as_ref() };
        n.next.store_bumped(std::ptr::null_mut(), INIT_ORD);

        loop {
            let tail = self.tail.load(READ_ORD);
            let Some(last) = NonNull::new(tail.ptr()) else {
                // Empty list: install as both endpoints, head first.
                let head = self.head.load(READ_ORD);
                if head.is_null() {
                    n.prev.store_bumped(std::ptr::null_mut(), INIT_ORD);
                    if self
                        .head
                        .cas_weak(head, head.bump(node_ptr), PUBLISH_ORD, CAS_FAILURE)
                        .is_ok()
                    {
                        self.tail.store_bumped(node_ptr, REPAIR_ORD);
                        return;
                    }
                }
                // A racing push owns the endpoints; wait for its tail store.
                hint::spin_loop();
                continue;
            };

            // SAFETY: `last` was reachable via `tail`; the caller contract
            // keeps linked nodes allocated.
            let last_next = unsafe { last.as_ref() }.next.load(READ_ORD);
            if !last_next.is_null() {
                // Tail is stale; the appender past it will advance `tail`.
                trace_log!("push_back: stale tail, retrying");
                hint::spin_loop();
                continue;
            }

            n.prev.store_bumped(last.as_ptr(), INIT_ORD);
            // SAFETY: as above.
            if unsafe { last.as_ref() }
                .next
                .cas_weak(last_next, last_next.bump(node_ptr), PUBLISH_ORD, CAS_FAILURE)
                .is_ok()
            {
                // Endpoint repair; a failure means another mutator already
                // moved `tail` onward.
                let _ = self
                    .tail
                    .cas(tail, tail.bump(node_ptr), REPAIR_ORD, CAS_FAILURE);
                return;
            }
        }
    }

    /// Insert `node` immediately after `target`.
    ///
    /// Returns `false` when `target` is observed to no longer be a list
    /// member (pre-validation: `target.prev.next == target`, or
    /// `head == target` for the front node). The check is advisory; keeping
    /// `target` in the list for the duration of the call is the caller's
    /// responsibility, as with [`remove`](Self::remove).
    ///
    /// Linearizes at the CAS on `target.next`.
    ///
    /// # Safety
    ///
    /// - `node` must not currently be in this or any other list, and must
    ///   stay allocated as for [`push_front`](Self::push_front).
    /// - `target` must be a node of this list (it may be concurrently
    ///   removed, in which case the insert reports `false`).
    pub unsafe fn insert_after(&self, target: NonNull<Node<T>>, node: NonNull<Node<T>>) -> bool {
        let node_ptr = node.as_ptr();
        // SAFETY: caller guarantees validity of both nodes.
        let n = unsafe { node.as_ref() };
        let t = unsafe { target.as_ref() };

        loop {
            // Pre-validate that `target` is still linked.
            let t_prev = t.prev.load(READ_ORD);
            if !self.predecessor_links_to(t_prev.ptr(), target.as_ptr()) {
                trace_log!("insert_after: target no longer linked");
                return false;
            }

            let next = t.next.load(READ_ORD);
            n.prev.store_bumped(target.as_ptr(), INIT_ORD);
            n.next.store_bumped(next.ptr(), INIT_ORD);

            if t.next
                .cas_weak(next, next.bump(node_ptr), PUBLISH_ORD, CAS_FAILURE)
                .is_ok()
            {
                match NonNull::new(next.ptr()) {
                    // SAFETY: the old successor is still reachable through
                    // the inserted node.
                    Some(succ) => unsafe { succ.as_ref() }.prev.store_bumped(node_ptr, REPAIR_ORD),
                    None => {
                        // `target` was the tail; move the endpoint. Failure
                        // tolerated: someone already advanced it.
                        let tail = self.tail.load(READ_ORD);
                        if tail.ptr() == target.as_ptr() {
                            let _ = self
                                .tail
                                .cas(tail, tail.bump(node_ptr), REPAIR_ORD, CAS_FAILURE);
                        }
                    }
                }
                return true;
            }
        }
    }

    /// Unlink `node` from the list.
    ///
    /// Linearizes at the first successful CAS on a primary link (the
    /// predecessor's `next`, or `head`). After that point no traversal
    /// entering through `head` can visit `node`; the caller owns the
    /// detached node again, but must delay freeing it until concurrent
    /// traversals that may already hold it have drained.
    ///
    /// Racing removals of the same node produce exactly one removal effect;
    /// the losing call returns once it observes the node fully detached.
    /// Coordinating who reclaims the node afterwards is the caller's
    /// responsibility.
    ///
    /// # Safety
    ///
    /// - `node` must be a member of this list (or concurrently being
    ///   removed from it), and allocated for the duration of the call.
    pub unsafe fn remove(&self, node: NonNull<Node<T>>) {
        // SAFETY: caller guarantees `node` is valid.
        let n = unsafe { node.as_ref() };

        loop {
            let prev = n.prev.load(READ_ORD);
            let next = n.next.load(READ_ORD);

            if let Some(p) = NonNull::new(prev.ptr()) {
                // SAFETY: neighbors of a member stay allocated per the
                // caller contract.
                let p_ref = unsafe { p.as_ref() };

                // The recorded predecessor may itself be mid-removal or
                // mid-repair; trusting a stale predecessor can unlink
                // through a dead node. Wait out in-flight repairs around it
                // (same advisory check insert_after performs).
                let p_prev = p_ref.prev.load(READ_ORD);
                if !self.predecessor_links_to(p_prev.ptr(), p.as_ptr()) {
                    if unsafe { self.is_detached(node, prev, next) } {
                        return;
                    }
                    hint::spin_loop();
                    continue;
                }

                let expected = p_ref.next.load(READ_ORD);
                if expected.ptr() != node.as_ptr() {
                    // Neighborhood changed under us: either a racing
                    // mutator is mid-repair, or someone else removed the
                    // node already.
                    if unsafe { self.is_detached(node, prev, next) } {
                        return;
                    }
                    hint::spin_loop();
                    continue;
                }

                if p_ref
                    .next
                    .cas(expected, expected.bump(next.ptr()), PUBLISH_ORD, CAS_FAILURE)
                    .is_err()
                {
                    trace_log!("remove: primary CAS lost, retrying");
                    continue;
                }

                if let Some(succ) = NonNull::new(next.ptr()) {
                    // Back-link repair; failure tolerated, a racing mutator
                    // re-establishes it.
                    // SAFETY: as above.
                    let s_ref = unsafe { succ.as_ref() };
                    let witness = s_ref.prev.load(READ_ORD);
                    let _ = s_ref
                        .prev
                        .cas(witness, witness.bump(prev.ptr()), REPAIR_ORD, CAS_FAILURE);
                }
            } else {
                // `node` is (or was) the head.
                let expected = self.head.load(READ_ORD);
                if expected.ptr() != node.as_ptr() {
                    if unsafe { self.is_detached(node, prev, next) } {
                        return;
                    }
                    hint::spin_loop();
                    continue;
                }

                if self
                    .head
                    .cas(expected, expected.bump(next.ptr()), PUBLISH_ORD, CAS_FAILURE)
                    .is_err()
                {
                    continue;
                }

                if let Some(succ) = NonNull::new(next.ptr()) {
                    // The successor is the new head; its back-link becomes
                    // null.
                    // SAFETY: as above.
                    let s_ref = unsafe { succ.as_ref() };
                    let witness = s_ref.prev.load(READ_ORD);
                    let _ = s_ref.prev.cas(
                        witness,
                        witness.bump(std::ptr::null_mut()),
                        REPAIR_ORD,
                        CAS_FAILURE,
                    );
                }
            }

            // Endpoint repair: the removed node may have been the tail.
            if next.is_null() {
                let tail = self.tail.load(READ_ORD);
                if tail.ptr() == node.as_ptr() {
                    let _ = self
                        .tail
                        .cas(tail, tail.bump(prev.ptr()), REPAIR_ORD, CAS_FAILURE);
                }
            }
            return;
        }
    }

    /// Whether `node` is referenced by none of: `head`, its recorded
    /// predecessor, its recorded successor (or `tail` for a last node).
    ///
    /// Used by [`remove`](Self::remove) to let the loser of a racing
    /// removal terminate. Conservative: any remaining witness keeps the
    /// loop spinning until the winner's repairs land.
    unsafe fn is_detached(
        &self,
        node: NonNull<Node<T>>,
        prev: TaggedPtr<Node<T>>,
        next: TaggedPtr<Node<T>>,
    ) -> bool {
        if self.head.load(READ_ORD).ptr() == node.as_ptr() {
            return false;
        }
        if let Some(p) = NonNull::new(prev.ptr()) {
            // SAFETY: recorded neighbors stay allocated per the caller
            // contract.
            if unsafe { p.as_ref() }.next.load(READ_ORD).ptr() == node.as_ptr() {
                return false;
            }
        }
        match NonNull::new(next.ptr()) {
            Some(s) => {
                // SAFETY: as above.
                if unsafe { s.as_ref() }.prev.load(READ_ORD).ptr() == node.as_ptr() {
                    return false;
                }
            }
            None => {
                if self.tail.load(READ_ORD).ptr() == node.as_ptr() {
                    return false;
                }
            }
        }
        true
    }

    /// Reset the list to empty without touching the member nodes.
    ///
    /// The exclusive borrow makes this statically quiescent: no concurrent
    /// mutator or traversal can hold the list. Nodes are not deallocated;
    /// they belong to the caller.
    pub fn clear(&mut self) {
        debug_log!("clear: forgetting all members");
        self.head.store_bumped(std::ptr::null_mut(), INIT_ORD);
        self.tail.store_bumped(std::ptr::null_mut(), INIT_ORD);
    }

    // ========================================================================
    //  Search
    // ========================================================================

    /// Find the first node whose payload satisfies `pred`.
    ///
    /// Lock-free: the walk restarts from `head` when the matched node fails
    /// its liveness verification (both neighbors must still reference it).
    /// The returned node satisfied the predicate at some point during the
    /// search; if payloads are mutated after linking, it may not satisfy it
    /// anymore by the time the caller looks. Dereferencing the result is
    /// safe only while the caller's reclamation scheme keeps it allocated.
    #[must_use]
    pub fn find_if<F>(&self, mut pred: F) -> Option<NonNull<Node<T>>>
    where
        F: FnMut(&T) -> bool,
    {
        'restart: loop {
            let mut cur = self.head.load(READ_ORD);
            while let Some(c) = NonNull::new(cur.ptr()) {
                // SAFETY: reachable nodes stay allocated per the caller
                // contract on the mutators.
                let c_ref = unsafe { c.as_ref() };
                if pred(c_ref.value()) {
                    if self.is_live(c) {
                        return Some(c);
                    }
                    trace_log!("find_if: match failed liveness check, restarting");
                    continue 'restart;
                }
                cur = c_ref.next.load(READ_ORD);
            }
            return None;
        }
    }

    /// Find the first node whose payload equals `value`.
    #[must_use]
    pub fn find(&self, value: &T) -> Option<NonNull<Node<T>>>
    where
        T: PartialEq,
    {
        self.find_if(|v| v == value)
    }

    /// Liveness verification for a matched node: both neighbors (or the
    /// endpoints, at the edges) must still reference it.
    fn is_live(&self, node: NonNull<Node<T>>) -> bool {
        // SAFETY: `node` was just reached by traversal.
        let n = unsafe { node.as_ref() };
        let next = n.next.load(READ_ORD);
        let prev = n.prev.load(READ_ORD);

        let forward_ok = match NonNull::new(next.ptr()) {
            // SAFETY: as above.
            Some(s) => unsafe { s.as_ref() }.prev.load(READ_ORD).ptr() == node.as_ptr(),
            None => self.tail.load(READ_ORD).ptr() == node.as_ptr(),
        };
        forward_ok && self.predecessor_links_to(prev.ptr(), node.as_ptr())
    }

    /// Whether `node` is referenced from the back side: by `observed_prev`'s
    /// forward link, or by `head` when `observed_prev` is null.
    pub(crate) fn predecessor_links_to(
        &self,
        observed_prev: *mut Node<T>,
        node: *mut Node<T>,
    ) -> bool {
        match NonNull::new(observed_prev) {
            // SAFETY: recorded neighbors stay allocated per the caller
            // contract on the mutators.
            Some(p) => unsafe { p.as_ref() }.next.load(READ_ORD).ptr() == node,
            None => self.head.load(READ_ORD).ptr() == node,
        }
    }

    // ========================================================================
    //  Traversal
    // ========================================================================

    /// Forward iterator over payload references, starting at the current
    /// head.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }

    /// Bidirectional cursor positioned at the current head.
    #[must_use]
    pub fn cursor_front(&self) -> Cursor<'_, T> {
        Cursor::front(self)
    }

    /// Bidirectional cursor positioned past the end (`cur == null`,
    /// `prev == current tail`).
    #[must_use]
    pub fn cursor_end(&self) -> Cursor<'_, T> {
        Cursor::end(self)
    }
}

impl<T> Default for LockFreeList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for LockFreeList<T> {
    fn drop(&mut self) {
        // Member nodes are caller-owned; dropping the list only forgets
        // them.
        self.clear();
    }
}

impl<T: fmt::Debug> fmt::Debug for LockFreeList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

// ============================================================================
//  Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Owns every node a test allocates; frees them on drop, after the
    /// list (which never frees anything) is gone.
    struct Arena<T> {
        nodes: Vec<NonNull<Node<T>>>,
    }

    impl<T> Arena<T> {
        fn new() -> Self {
            Self { nodes: Vec::new() }
        }

        fn alloc(&mut self, value: T) -> NonNull<Node<T>> {
            let ptr = NonNull::from(Box::leak(Node::boxed(value)));
            self.nodes.push(ptr);
            ptr
        }
    }

    impl<T> Drop for Arena<T> {
        fn drop(&mut self) {
            for &ptr in &self.nodes {
                // SAFETY: arena-allocated via Box::leak, freed exactly once.
                unsafe { drop(Box::from_raw(ptr.as_ptr())) };
            }
        }
    }

    fn collect(list: &LockFreeList<i32>) -> Vec<i32> {
        list.iter().copied().collect()
    }

    #[test]
    fn test_empty_list() {
        let list: LockFreeList<i32> = LockFreeList::new();
        assert!(list.is_empty());
        assert_eq!(list.iter().count(), 0);
        assert_eq!(list.find(&0), None);
        assert_eq!(list.cursor_front(), list.cursor_end());
    }

    #[test]
    fn test_push_front_order() {
        let mut arena = Arena::new();
        let list = LockFreeList::new();
        for v in 1..=5 {
            // SAFETY: fresh nodes, arena outlives the list.
            unsafe { list.push_front(arena.alloc(v)) };
        }
        assert_eq!(collect(&list), vec![5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_push_back_order() {
        let mut arena = Arena::new();
        let list = LockFreeList::new();
        for v in 1..=5 {
            // SAFETY: fresh nodes, arena outlives the list.
            unsafe { list.push_back(arena.alloc(v)) };
        }
        assert_eq!(collect(&list), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_remove_middle() {
        let mut arena = Arena::new();
        let list = LockFreeList::new();
        let n1 = arena.alloc(1);
        let n2 = arena.alloc(2);
        let n3 = arena.alloc(3);

        // SAFETY: fresh nodes; n2 is a member when removed.
        unsafe {
            list.push_front(n1);
            list.push_front(n2);
            list.push_front(n3);
            assert_eq!(collect(&list), vec![3, 2, 1]);

            list.remove(n2);
        }
        assert_eq!(collect(&list), vec![3, 1]);

        // Back-traversal from the end yields the reverse.
        let mut back = Vec::new();
        let mut cur = list.cursor_end();
        while cur.move_prev().is_ok() {
            back.push(*cur.get().expect("positioned on a node"));
        }
        assert_eq!(back, vec![1, 3]);
    }

    #[test]
    fn test_remove_head_and_tail() {
        let mut arena = Arena::new();
        let list = LockFreeList::new();
        let a = arena.alloc(1);
        let b = arena.alloc(2);
        let c = arena.alloc(3);

        // SAFETY: fresh nodes; removed nodes are members.
        unsafe {
            list.push_back(a);
            list.push_back(b);
            list.push_back(c);

            list.remove(a);
            assert_eq!(collect(&list), vec![2, 3]);

            list.remove(c);
            assert_eq!(collect(&list), vec![2]);

            list.remove(b);
        }
        assert!(list.is_empty());
        assert!(list.tail.load(READ_ORD).is_null());
    }

    #[test]
    fn test_insert_after_tail() {
        let mut arena = Arena::new();
        let list = LockFreeList::new();
        let n1 = arena.alloc(1);
        let n2 = arena.alloc(2);
        let n3 = arena.alloc(3);

        // SAFETY: fresh nodes; n2 is a member.
        unsafe {
            list.push_back(n1);
            list.push_back(n2);
            assert!(list.insert_after(n2, n3));
        }
        assert_eq!(collect(&list), vec![1, 2, 3]);
        assert_eq!(list.tail.load(READ_ORD).ptr(), n3.as_ptr());
    }

    #[test]
    fn test_insert_after_middle() {
        let mut arena = Arena::new();
        let list = LockFreeList::new();
        let n1 = arena.alloc(1);
        let n3 = arena.alloc(3);
        let n2 = arena.alloc(2);

        // SAFETY: fresh nodes; n1 is a member.
        unsafe {
            list.push_back(n1);
            list.push_back(n3);
            assert!(list.insert_after(n1, n2));
        }
        assert_eq!(collect(&list), vec![1, 2, 3]);
    }

    #[test]
    fn test_insert_after_unlinked_target() {
        let mut arena = Arena::new();
        let list = LockFreeList::new();
        let n1 = arena.alloc(1);
        let n2 = arena.alloc(2);
        let orphan = arena.alloc(9);

        // SAFETY: fresh nodes; n1 is removed before being used as target.
        unsafe {
            list.push_back(n1);
            list.push_back(n2);
            list.remove(n1);
            assert!(!list.insert_after(n1, orphan));
        }
        assert_eq!(collect(&list), vec![2]);
    }

    #[test]
    fn test_node_reuse_after_remove() {
        let mut arena = Arena::new();
        let list = LockFreeList::new();
        let n = arena.alloc(7);

        // SAFETY: the node alternates between member and detached; it is
        // re-initialized by each push.
        unsafe {
            for _ in 0..3 {
                list.push_front(n);
                assert_eq!(collect(&list), vec![7]);
                list.remove(n);
                assert!(list.is_empty());
            }
        }
    }

    #[test]
    fn test_find() {
        let mut arena = Arena::new();
        let list = LockFreeList::new();
        for v in 0..10 {
            // SAFETY: fresh nodes.
            unsafe { list.push_back(arena.alloc(v)) };
        }

        let hit = list.find(&7).expect("7 is a member");
        // SAFETY: arena keeps the node allocated.
        assert_eq!(*unsafe { hit.as_ref() }.value(), 7);

        assert!(list.find(&42).is_none());
        assert!(list.find_if(|v| *v > 8).is_some());
        assert!(list.find_if(|v| *v > 9).is_none());
    }

    #[test]
    fn test_clear_forgets_members() {
        let mut arena = Arena::new();
        let mut list = LockFreeList::new();
        for v in 0..4 {
            // SAFETY: fresh nodes.
            unsafe { list.push_back(arena.alloc(v)) };
        }
        list.clear();
        assert!(list.is_empty());
        assert!(list.tail.load(READ_ORD).is_null());
        // Arena drop frees the nodes; clear must not have.
    }

    #[test]
    fn test_head_tag_advances_per_push() {
        let mut arena = Arena::new();
        let list = LockFreeList::new();
        // SAFETY: fresh nodes.
        unsafe {
            list.push_front(arena.alloc(1));
            list.push_front(arena.alloc(2));
        }
        assert_eq!(list.head.load(READ_ORD).tag(), 2);
    }

    #[test]
    fn test_mixed_push_ends() {
        let mut arena = Arena::new();
        let list = LockFreeList::new();
        // SAFETY: fresh nodes.
        unsafe {
            list.push_back(arena.alloc(2));
            list.push_front(arena.alloc(1));
            list.push_back(arena.alloc(3));
            list.push_front(arena.alloc(0));
        }
        assert_eq!(collect(&list), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_debug_formatting() {
        let mut arena = Arena::new();
        let list = LockFreeList::new();
        // SAFETY: fresh nodes.
        unsafe {
            list.push_back(arena.alloc(1));
            list.push_back(arena.alloc(2));
        }
        assert_eq!(format!("{list:?}"), "[1, 2]");
    }
}
