//! Caller-side node reclamation with seize.
//!
//! The list never frees memory: [`remove`](crate::LockFreeList::remove)
//! detaches a node, but concurrent traversals that already reached it may
//! still dereference it. The caller must defer the actual free until those
//! traversals have drained. This module provides the supported pairing
//! with a [`seize::Collector`]:
//!
//! - every thread that traverses the list holds a guard
//!   (`collector.enter()`) across the traversal;
//! - the thread that removes a node retires it through
//!   `guard.defer_retire(ptr, reclaim_node_boxed)` instead of freeing it;
//! - seize frees the node once no guard that could have seen it remains.
//!
//! Racing removals of the same node must still agree on a single retirer
//! (retiring twice is a double free); see
//! [`remove`](crate::LockFreeList::remove).

use seize::Collector;

use crate::node::Node;

/// Reclaim a boxed node (seize callback).
///
/// # Safety
///
/// - `ptr` must point to a `Node<T>` allocated via `Box::into_raw`.
/// - Must only be called once seize determines no guard can still reach
///   the node, which requires it was unlinked before retirement.
pub unsafe fn reclaim_node_boxed<T>(ptr: *mut Node<T>, _collector: &Collector) {
    // SAFETY: caller guarantees ptr came from Box::into_raw and is
    // unreachable; seize ensures no readers remain.
    unsafe { drop(Box::from_raw(ptr)) };
}
