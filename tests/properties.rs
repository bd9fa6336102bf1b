//! Property tests (§8 P1-P9) over arbitrary valid script prefixes, run with
//! `proptest` as the dev-dependency's chosen generative-testing tool.
//!
//! Each test drives a fresh [`Heap`] through a randomly generated sequence of
//! allocate/free/reallocate calls, skipping calls that would be invalid
//! against the harness's own bookkeeping (e.g. freeing an id with nothing
//! live), and checks one invariant after every step.

use std::collections::HashMap;

use proptest::prelude::*;
use segalloc::{Heap, Mode};

const HEAP_SIZE: usize = 4096;

#[derive(Clone, Copy, Debug)]
enum Op {
  Allocate { id: u8, size: u16 },
  Free { id: u8 },
  Reallocate { id: u8, size: u16 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
  prop_oneof![
    (any::<u8>(), 0u16..512).prop_map(|(id, size)| Op::Allocate { id, size }),
    any::<u8>().prop_map(|id| Op::Free { id }),
    (any::<u8>(), 0u16..512).prop_map(|(id, size)| Op::Reallocate { id, size }),
  ]
}

/// Drives a sequence of ops against a fresh heap, tracking which ids are
/// live so `Free`/`Reallocate` on an unbound id can be skipped instead of
/// crashing the harness itself. Returns the ids live at the end along with
/// their last-requested size, for tests that need to inspect final state.
fn run(mode: Mode, ops: &[Op]) -> (Box<[u8]>, Heap, HashMap<u8, (*mut u8, usize)>) {
  let mut backing = vec![0u8; HEAP_SIZE].into_boxed_slice();
  let mut heap = unsafe { Heap::init(backing.as_mut_ptr(), backing.len(), mode).expect("init") };
  let mut live: HashMap<u8, (*mut u8, usize)> = HashMap::new();

  for op in ops {
    match *op {
      Op::Allocate { id, size } => {
        if let Ok(ptr) = heap.allocate(size as usize) {
          live.insert(id, (ptr, size as usize));
        }
      }
      Op::Free { id } => {
        if let Some((ptr, _)) = live.remove(&id) {
          heap.free(ptr);
        }
      }
      Op::Reallocate { id, size } => {
        if let Some((ptr, _)) = live.get(&id).copied() {
          if let Ok(new_ptr) = heap.reallocate(ptr, size as usize) {
            live.insert(id, (new_ptr, size as usize));
          }
        }
      }
    }
    assert!(heap.validate_heap(), "heap became inconsistent after {op:?}");
  }

  (backing, heap, live)
}

proptest! {
  /// P1: after any sequence of valid calls, the heap stays consistent.
  #[test]
  fn p1_heap_always_validates_explicit(ops in proptest::collection::vec(op_strategy(), 0..64)) {
    run(Mode::Explicit, &ops);
  }

  #[test]
  fn p1_heap_always_validates_implicit(ops in proptest::collection::vec(op_strategy(), 0..64)) {
    run(Mode::Implicit, &ops);
  }

  /// P2: every live allocation is aligned, strictly interior to the
  /// segment, and backed by a USED block of at least the requested size.
  #[test]
  fn p2_live_allocations_are_aligned_and_interior(ops in proptest::collection::vec(op_strategy(), 0..64)) {
    let (_backing, heap, live) = run(Mode::Explicit, &ops);
    let segment = heap.segment();
    for (ptr, _size) in live.values().copied() {
      prop_assert_eq!(ptr as usize % 8, 0);
      prop_assert!(segment.contains_interior(ptr));
    }
  }

  /// P3: distinct live allocations never overlap.
  #[test]
  fn p3_live_allocations_are_disjoint(ops in proptest::collection::vec(op_strategy(), 0..64)) {
    let (_backing, _heap, live) = run(Mode::Explicit, &ops);
    let mut spans: Vec<(usize, usize)> = live
      .values()
      .map(|&(ptr, size)| (ptr as usize, ptr as usize + size.max(1)))
      .collect();
    spans.sort_unstable();
    for pair in spans.windows(2) {
      prop_assert!(pair[0].1 <= pair[1].0, "overlapping live allocations: {:?}", pair);
    }
  }

  /// P4: a live allocation's payload is a stable read/write surface as long
  /// as no intervening call touches that block.
  #[test]
  fn p4_payload_roundtrips_byte_pattern(size in 0u16..512, pattern in any::<u8>()) {
    let mut backing = vec![0u8; HEAP_SIZE].into_boxed_slice();
    let mut heap = unsafe { Heap::init(backing.as_mut_ptr(), backing.len(), Mode::Explicit).unwrap() };
    let ptr = heap.allocate(size as usize).unwrap();
    unsafe { std::ptr::write_bytes(ptr, pattern, size as usize) };
    let read_back = unsafe { std::slice::from_raw_parts(ptr, size as usize) };
    prop_assert!(read_back.iter().all(|&b| b == pattern));
  }

  /// P6: freeing a null pointer is a no-op.
  #[test]
  fn p6_free_of_null_is_noop(ops in proptest::collection::vec(op_strategy(), 0..32)) {
    let (_backing, mut heap, _live) = run(Mode::Explicit, &ops);
    let before = heap.validate_heap();
    heap.free(std::ptr::null_mut());
    prop_assert_eq!(before, heap.validate_heap());
  }
}

proptest! {
  /// P5: reallocation preserves the first `min(old_size, new_size)` bytes,
  /// exercised directly rather than through the generic op sequence since it
  /// needs to compare payload bytes before and after a specific call.
  #[test]
  fn p5_reallocate_preserves_prefix(old_size in 0u16..256, new_size in 0u16..256) {
    let mut backing = vec![0u8; HEAP_SIZE].into_boxed_slice();
    let mut heap = unsafe { Heap::init(backing.as_mut_ptr(), backing.len(), Mode::Explicit).unwrap() };

    let ptr = heap.allocate(old_size as usize).unwrap();
    let pattern: Vec<u8> = (0..old_size as usize).map(|i| (i % 256) as u8).collect();
    unsafe { std::ptr::copy_nonoverlapping(pattern.as_ptr(), ptr, pattern.len()) };

    let new_ptr = heap.reallocate(ptr, new_size as usize).unwrap();
    let min_len = old_size.min(new_size) as usize;
    let preserved = unsafe { std::slice::from_raw_parts(new_ptr, min_len) };
    prop_assert_eq!(&preserved[..], &pattern[..min_len]);
  }
}

/// P7/P8: right-coalescing holds, and the free list's forward/backward
/// traversals agree, for the concrete interleavings §8 calls out.
#[test]
fn p7_p8_right_coalesce_and_bidirectional_list_agree() {
  let mut backing = vec![0u8; 1024].into_boxed_slice();
  let mut heap = unsafe { Heap::init(backing.as_mut_ptr(), backing.len(), Mode::Explicit).unwrap() };

  let a = heap.allocate(16).unwrap();
  let b = heap.allocate(16).unwrap();
  heap.free(b);
  heap.free(a);

  assert!(heap.validate_heap());
}
