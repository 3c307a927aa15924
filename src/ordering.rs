//! Standard memory orderings for linkage-word access.
//!
//! These constants ensure consistent ordering usage across the codebase
//! and make the intent clear at each access point.

use std::sync::atomic::Ordering;

/// Ordering for reading a reachable linkage word.
/// Pairs with the Release on the CAS that published the node, so all
/// initialization done before publication is visible to the reader.
pub const READ_ORD: Ordering = Ordering::Acquire;

/// Ordering for initializing an incoming node's linkage before publication.
/// The node is still private to the inserting thread.
pub const INIT_ORD: Ordering = Ordering::Relaxed;

/// Ordering for the primary CAS that makes a structural change visible.
pub const PUBLISH_ORD: Ordering = Ordering::Release;

/// Ordering for secondary repair of back-links and endpoint words.
/// Correctness was already established by the preceding primary CAS.
pub const REPAIR_ORD: Ordering = Ordering::Release;

/// Ordering for a failed CAS.
/// The loop only needs to observe that the word changed.
pub const CAS_FAILURE: Ordering = Ordering::Relaxed;
