//! # Bump Allocator (baseline, not part of the core engine)
//!
//! A trivial bump allocator over the same kind of caller-supplied segment
//! the explicit/implicit [`crate::Heap`] engines manage. It exists only as
//! a baseline to contrast against: a bump pointer moves forward on every
//! allocation and individual blocks can never be reclaimed, only the whole
//! arena at once via [`BumpAllocator::reset`].
//!
//! ## How It Works
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────┐
//!   │                         SEGMENT                                  │
//!   │                                                                  │
//!   │   ┌─────┬─────┬─────┬─────┬───────────────────────────────────┐  │
//!   │   │ A1  │ A2  │ A3  │ A4  │            unused                 │  │
//!   │   └─────┴─────┴─────┴─────┴───────────────────────────────────┘  │
//!   │         ▲                 ▲                                    │
//!   │       start            current (next alloc)           end      │
//!   │                                                                  │
//!   └──────────────────────────────────────────────────────────────────┘
//!
//!   Each allocation "bumps" `current` forward by the aligned size.
//!   No header is stored per allocation, so no individual block can be
//!   freed: there is nothing to walk back to from a bare payload pointer.
//! ```
//!
//! ## Limitations
//!
//! - **No individual deallocation**: [`BumpAllocator::deallocate`] is a
//!   no-op; only [`BumpAllocator::reset`] reclaims anything, and it
//!   reclaims everything at once.
//! - **Single-threaded only**: no synchronization primitives.
//! - **Unused tail only**: once `current` reaches `end`, every further
//!   request fails regardless of earlier deallocations.

use std::mem;

use crate::align;

/// A bump allocator over a caller-supplied segment `[start, end)`.
///
/// # Thread Safety
///
/// Not thread-safe; external synchronization (e.g. a `Mutex`) is required
/// for multi-threaded use, same as [`crate::Heap`].
pub struct BumpAllocator {
  start: *mut u8,
  current: *mut u8,
  end: *mut u8,
}

impl BumpAllocator {
  /// Initializes a bump allocator over `[start, start + size)`.
  ///
  /// # Safety
  /// `start` must be non-null and `start..start+size` must be a region the
  /// caller owns exclusively for the lifetime of this allocator.
  pub unsafe fn init(start: *mut u8, size: usize) -> Self {
    BumpAllocator { start, current: start, end: unsafe { start.add(size) } }
  }

  /// Bumps `current` forward by `align!(size)` bytes and returns the
  /// pre-bump address, or `None` if the segment has no room left.
  pub fn allocate(&mut self, size: usize) -> Option<*mut u8> {
    let aligned = align!(size.max(mem::size_of::<usize>()));
    let next = unsafe { self.current.add(aligned) };
    if (next as usize) > (self.end as usize) {
      return None;
    }
    let allocated = self.current;
    self.current = next;
    Some(allocated)
  }

  /// A no-op: a bump allocator cannot reclaim a single allocation, since it
  /// keeps no per-block header to walk back from.
  pub fn deallocate(&mut self, _ptr: *mut u8) {}

  /// Resets the bump pointer to the start of the segment, reclaiming every
  /// prior allocation at once. Callers must not use old pointers afterward.
  pub fn reset(&mut self) {
    self.current = self.start;
  }

  /// Bytes remaining before the next allocation would fail.
  pub fn remaining(&self) -> usize {
    self.end as usize - self.current as usize
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn bump_of(size: usize) -> (Box<[u8]>, BumpAllocator) {
    let mut backing = vec![0u8; size].into_boxed_slice();
    let allocator = unsafe { BumpAllocator::init(backing.as_mut_ptr(), backing.len()) };
    (backing, allocator)
  }

  #[test]
  fn allocations_are_monotonic_and_distinct() {
    let (_backing, mut allocator) = bump_of(256);

    let a = allocator.allocate(16).unwrap();
    let b = allocator.allocate(16).unwrap();
    assert!((b as usize) > (a as usize));
  }

  #[test]
  fn fails_once_segment_is_exhausted() {
    let (_backing, mut allocator) = bump_of(32);

    assert!(allocator.allocate(16).is_some());
    assert!(allocator.allocate(16).is_some());
    assert!(allocator.allocate(8).is_none());
  }

  #[test]
  fn deallocate_is_a_noop() {
    let (_backing, mut allocator) = bump_of(64);

    let a = allocator.allocate(16).unwrap();
    let remaining_before = allocator.remaining();
    allocator.deallocate(a);
    assert_eq!(allocator.remaining(), remaining_before);
  }

  #[test]
  fn reset_reclaims_the_whole_arena() {
    let (_backing, mut allocator) = bump_of(64);

    allocator.allocate(16).unwrap();
    allocator.allocate(16).unwrap();
    allocator.reset();
    assert_eq!(allocator.remaining(), 64);
  }
}
