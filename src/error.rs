//! The error taxonomy (§7).

use thiserror::Error;

/// Which consistency check (§4.6 V1–V4) a [`ConsistencyFault`] reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Invariant {
  /// V1: a header's status bits are neither FREE nor USED.
  BadStatusBits,
  /// V2: a block's payload size is below the mode's minimum.
  UndersizedBlock,
  /// V3: the walk did not terminate exactly at segment end.
  WalkMisaligned,
  /// V4: the free list's forward/backward traversal, ordering, link
  /// consistency, or count disagreed with the heap walker.
  FreeListInconsistent,
}

/// A detected violation of one of the heap invariants in §3/§4.6, reported
/// only by [`crate::Heap::validate`].
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("heap consistency fault: {invariant:?} near {address:?}")]
pub struct ConsistencyFault {
  pub invariant: Invariant,
  /// The address the fault was detected at, when the check has a natural
  /// anchor point; `None` for faults that are about the heap as a whole
  /// (e.g. an overall list-length mismatch).
  pub address: Option<*mut u8>,
}

// SAFETY: the address is a plain integer-valued pointer carried only for
// diagnostics; it is never dereferenced by anything that receives a
// `ConsistencyFault`.
unsafe impl Send for ConsistencyFault {}
unsafe impl Sync for ConsistencyFault {}

/// The error kinds the allocator's public API can return (§7).
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum AllocatorError {
  /// Init was given a null start pointer or a segment too small to host one
  /// minimum block plus its header.
  #[error("init refused: segment of {len} bytes cannot host the minimum block ({min_required} bytes required)")]
  InitRefused { len: usize, min_required: usize },

  /// No free block (explicit) or no free region (implicit) large enough to
  /// satisfy the request exists. The heap is unchanged.
  #[error("out of space: no block of at least {requested} bytes available (largest free block: {largest_free} bytes)")]
  OutOfSpace { requested: usize, largest_free: usize },

  /// Reallocation's allocate-copy-free fallback could not find a new block.
  /// The original pointer remains valid; its right neighbors may already
  /// have been absorbed into it (see design notes on the absorption loop).
  #[error("reallocate fallback failed: could not allocate {requested} bytes for the grown copy")]
  ReallocFallbackFailure { requested: usize },
}
