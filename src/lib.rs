//! # lflist
//!
//! A lock-free intrusive doubly linked list with tagged-pointer ABA
//! protection.
//!
//! The list permits concurrent insertion, removal, search and traversal
//! from many threads without mutual exclusion. It is intrusive: elements
//! embed the linkage words ([`Node`]), and node memory is owned and
//! reclaimed by the caller, never by the list. This makes it a building
//! block for higher-level infrastructure (LRU structures, free-lists,
//! subscriber tables) where predictable latency under contention matters
//! more than convenience.
//!
//! ## Design
//!
//! - Every linkage word is a `(pointer, version-tag)` pair packed into one
//!   machine word ([`tagged`]); a CAS must match both, defeating ABA.
//! - Each mutator linearizes at a single CAS on a primary link; back-links
//!   and endpoints are repaired afterwards and converge eventually.
//! - Traversal tolerates the repair window: cursors validate their
//!   neighborhood and recover when a node is unlinked under them.
//!
//! ## Caller contract
//!
//! Mutators are `unsafe`: the caller allocates nodes, guarantees a node is
//! in at most one list, and frees a removed node only once no concurrent
//! traversal can still reach it. The [`reclaim`] module documents the
//! supported deferred-reclamation pairing with `seize`.
//!
//! ```
//! use std::ptr::NonNull;
//! use lflist::{LockFreeList, Node};
//!
//! let list = LockFreeList::new();
//! let a = NonNull::from(Box::leak(Node::boxed(1)));
//! let b = NonNull::from(Box::leak(Node::boxed(2)));
//!
//! // SAFETY: fresh nodes, freed below after the list is done with them.
//! unsafe {
//!     list.push_back(a);
//!     list.push_back(b);
//! }
//! assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![1, 2]);
//!
//! // SAFETY: `a` is a member; no other thread is traversing here.
//! unsafe { list.remove(a) };
//! assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![2]);
//!
//! drop(list);
//! // SAFETY: quiescent; the nodes were leaked above and the list is gone.
//! unsafe {
//!     drop(Box::from_raw(a.as_ptr()));
//!     drop(Box::from_raw(b.as_ptr()));
//! }
//! ```

pub mod list;
pub mod node;
pub mod ordering;
pub mod reclaim;
pub mod stamp;
pub mod tagged;

mod tracing_helpers;

pub use list::{Cursor, Iter, ListError, LockFreeList};
pub use node::Node;
pub use stamp::Stamped;
pub use tagged::{AtomicTagged, TaggedPtr};
