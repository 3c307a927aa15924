//! Shuttle randomized-schedule tests for the list.
//!
//! Shuttle explores thread schedules with a randomized scheduler and a
//! configurable iteration count. Unlike the loom model (which exhausts a
//! tiny protocol model), these drive the real `LockFreeList` through small
//! concurrent workloads many times. Shuttle only switches at its own API
//! calls, so the workers yield between operations; each list operation
//! runs as one scheduling block.
//!
//! Run with: `cargo test --lib list::shuttle_tests`

use std::ptr::NonNull;
use std::sync::Arc;

use shuttle::thread;

use crate::node::Node;
use crate::ordering::READ_ORD;
use crate::LockFreeList;

/// Leaked-node handle that can cross shuttle threads.
#[derive(Clone, Copy)]
struct SendNode(NonNull<Node<u64>>);

// SAFETY: the nodes are leaked for the duration of the test process and
// only manipulated through the list's atomics.
unsafe impl Send for SendNode {}
unsafe impl Sync for SendNode {}

fn leak_nodes(values: std::ops::Range<u64>) -> Vec<SendNode> {
    values
        .map(|v| SendNode(NonNull::from(Box::leak(Node::boxed(v)))))
        .collect()
}

/// Forward traversal must see exactly `expected` members (sorted) once all
/// threads quiesce, and the back-links must agree with the forward links.
fn audit(list: &LockFreeList<u64>, mut expected: Vec<u64>) {
    let mut seen: Vec<u64> = list.iter().copied().collect();
    seen.sort_unstable();
    expected.sort_unstable();
    assert_eq!(seen, expected);

    let mut cur = list.head.load(READ_ORD);
    while let Some(c) = NonNull::new(cur.ptr()) {
        // SAFETY: nodes are leaked.
        let c_ref = unsafe { c.as_ref() };
        let next = c_ref.next.load(READ_ORD);
        assert_ne!(next.ptr(), c.as_ptr(), "self-loop");
        if let Some(n) = NonNull::new(next.ptr()) {
            // SAFETY: as above.
            let back = unsafe { n.as_ref() }.prev.load(READ_ORD);
            assert_eq!(back.ptr(), c.as_ptr(), "back-link out of sync at quiescence");
        }
        cur = next;
    }
}

#[test]
fn shuttle_concurrent_push_front() {
    shuttle::check_random(
        || {
            let list = Arc::new(LockFreeList::new());
            let nodes = leak_nodes(0..6);

            let handles: Vec<_> = nodes
                .chunks(3)
                .map(|chunk| {
                    let list = Arc::clone(&list);
                    let chunk = chunk.to_vec();
                    thread::spawn(move || {
                        for n in chunk {
                            // SAFETY: fresh leaked nodes.
                            unsafe { list.push_front(n.0) };
                            thread::yield_now();
                        }
                    })
                })
                .collect();
            for h in handles {
                h.join().expect("pusher");
            }

            audit(&list, (0..6).collect());
        },
        500,
    );
}

#[test]
fn shuttle_push_both_ends() {
    shuttle::check_random(
        || {
            let list = Arc::new(LockFreeList::new());
            let nodes = leak_nodes(0..6);

            let front = Arc::clone(&list);
            let front_nodes: Vec<_> = nodes[..3].to_vec();
            let t1 = thread::spawn(move || {
                for n in front_nodes {
                    // SAFETY: fresh leaked nodes.
                    unsafe { front.push_front(n.0) };
                    thread::yield_now();
                }
            });
            let back = Arc::clone(&list);
            let back_nodes: Vec<_> = nodes[3..].to_vec();
            let t2 = thread::spawn(move || {
                for n in back_nodes {
                    // SAFETY: fresh leaked nodes.
                    unsafe { back.push_back(n.0) };
                    thread::yield_now();
                }
            });
            t1.join().expect("front pusher");
            t2.join().expect("back pusher");

            audit(&list, (0..6).collect());

            // Single-mutator order is preserved per end: 0,1,2 reversed as
            // a prefix-by-push_front, 3,4,5 in order at the back.
            let seen: Vec<u64> = list.iter().copied().collect();
            let fronts: Vec<u64> = seen.iter().copied().filter(|v| *v < 3).collect();
            let backs: Vec<u64> = seen.iter().copied().filter(|v| *v >= 3).collect();
            assert_eq!(fronts, vec![2, 1, 0]);
            assert_eq!(backs, vec![3, 4, 5]);
        },
        500,
    );
}

#[test]
fn shuttle_push_and_remove() {
    shuttle::check_random(
        || {
            let list = Arc::new(LockFreeList::new());
            let nodes = leak_nodes(0..4);

            // Seed two members, then race a pusher against a remover of
            // the seeded nodes.
            // SAFETY: fresh leaked nodes.
            unsafe {
                list.push_back(nodes[0].0);
                list.push_back(nodes[1].0);
            }

            let pusher = Arc::clone(&list);
            let incoming: Vec<_> = nodes[2..].to_vec();
            let t1 = thread::spawn(move || {
                for n in incoming {
                    // SAFETY: fresh leaked nodes.
                    unsafe { pusher.push_front(n.0) };
                    thread::yield_now();
                }
            });
            let remover = Arc::clone(&list);
            let seeded: Vec<_> = nodes[..2].to_vec();
            let t2 = thread::spawn(move || {
                for n in seeded {
                    // SAFETY: seeded members, each removed exactly once.
                    unsafe { remover.remove(n.0) };
                    thread::yield_now();
                }
            });
            t1.join().expect("pusher");
            t2.join().expect("remover");

            audit(&list, vec![2, 3]);
        },
        500,
    );
}
