//! Benchmark workloads for linkdeque.
//!
//! - [`queue_script`]: a deterministic mix of pushes and pops at both ends
//! - [`run_script`] / [`run_script_vecdeque`]: replay a script against a
//!   [`Deque`] or against `std::collections::VecDeque` as the baseline
//! - [`filled_heap`] / [`filled_arena`]: pre-populated deques

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::collections::VecDeque;

use linkdeque::types::NodeAllocator;
use linkdeque::{Deque, DequeError, Node};
use linkdeque_arena::ArenaAllocator;

/// One queue operation in a benchmark script.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueueOp {
    /// Push the value at the front.
    PushFront(u64),
    /// Push the value at the back.
    PushBack(u64),
    /// Pop from the front.
    PopFront,
    /// Pop from the back.
    PopBack,
}

/// Generate `len` operations from `seed`.
///
/// Pushes outnumber pops roughly three to two, so the queue grows slowly
/// and pops rarely hit an empty deque.
pub fn queue_script(len: usize, seed: u64) -> Vec<QueueOp> {
    let mut state = seed | 1;
    (0..len)
        .map(|_| {
            // xorshift64
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            match state % 5 {
                0 => QueueOp::PushFront(state),
                1 | 2 => QueueOp::PushBack(state),
                3 => QueueOp::PopFront,
                _ => QueueOp::PopBack,
            }
        })
        .collect()
}

/// What replaying a script against a [`Deque`] produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScriptOutcome {
    /// Wrapping sum of every popped value.
    pub checksum: u64,
    /// Pushes the allocator refused.
    pub refused_pushes: u64,
}

/// Replay `script` against `deque`.
///
/// A push the allocator refuses is counted in
/// [`ScriptOutcome::refused_pushes`]; a pop on empty is skipped. Any other
/// error means the chain is corrupt and aborts the run.
pub fn run_script<A: NodeAllocator<Node<u64>>>(
    deque: &mut Deque<u64, A>,
    script: &[QueueOp],
) -> ScriptOutcome {
    let mut outcome = ScriptOutcome::default();
    for op in script {
        let result = match *op {
            QueueOp::PushFront(v) => deque.push_front(v).map(|()| 0),
            QueueOp::PushBack(v) => deque.push_back(v).map(|()| 0),
            QueueOp::PopFront => deque.pop_front(),
            QueueOp::PopBack => deque.pop_back(),
        };
        match result {
            Ok(popped) => outcome.checksum = outcome.checksum.wrapping_add(popped),
            Err(DequeError::Alloc(_)) => outcome.refused_pushes += 1,
            Err(DequeError::Empty) => {}
            Err(err) => panic!("benchmark script on a corrupt deque: {err}"),
        }
    }
    outcome
}

/// Replay `script` against a `VecDeque`. Same checksum as [`run_script`]
/// for a deque that refuses no push.
pub fn run_script_vecdeque(deque: &mut VecDeque<u64>, script: &[QueueOp]) -> u64 {
    let mut checksum = 0u64;
    for op in script {
        match *op {
            QueueOp::PushFront(v) => deque.push_front(v),
            QueueOp::PushBack(v) => deque.push_back(v),
            QueueOp::PopFront => {
                if let Some(v) = deque.pop_front() {
                    checksum = checksum.wrapping_add(v);
                }
            }
            QueueOp::PopBack => {
                if let Some(v) = deque.pop_back() {
                    checksum = checksum.wrapping_add(v);
                }
            }
        }
    }
    checksum
}

/// A heap-backed deque holding `0..len`.
pub fn filled_heap(len: u64) -> Deque<u64> {
    (0..len).collect()
}

/// An arena-backed deque holding `0..len`, with room for exactly `len`
/// nodes.
pub fn filled_arena(len: u64) -> Deque<u64, ArenaAllocator<Node<u64>>> {
    let count = usize::try_from(len).unwrap_or(usize::MAX);
    let arena = match ArenaAllocator::with_nodes(count) {
        Ok(arena) => arena,
        Err(err) => panic!("benchmark arena for {len} nodes: {err}"),
    };
    match Deque::try_from_iter_in(0..len, arena) {
        Ok(deque) => deque,
        Err(err) => panic!("benchmark arena fill: {err}"),
    }
}
