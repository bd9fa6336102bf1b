//! # segalloc - A Single-Segment Free-List Allocator
//!
//! This crate manages one pre-supplied contiguous byte segment and services
//! allocate / free / reallocate requests against it, without ever asking the
//! operating system for more memory. The caller supplies a starting address
//! and a length at initialization; the allocator hands out aligned
//! sub-ranges of that segment on request and reclaims them on release.
//!
//! ## Overview
//!
//! The core is an **explicit free-list allocator**:
//!
//! ```text
//!   Explicit free-list allocator:
//!
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                      CALLER-SUPPLIED SEGMENT                        │
//!   │                                                                      │
//!   │   ┌──────┬─────┬──────┬─────┬─────────────────┬──────┬───────────┐  │
//!   │   │ hdr  │ A1  │ hdr  │ A2  │   FREE (in list) │ hdr  │    A3     │  │
//!   │   └──────┴─────┴──────┴─────┴─────────────────┴──────┴───────────┘  │
//!   │                                  ▲                                  │
//!   │                     free list: head ──► ... ──► tail                │
//!   │                                                                      │
//!   └──────────────────────────────────────────────────────────────────────┘
//!
//!   First-fit placement, address-ordered doubly linked free list,
//!   right-coalescing on free, in-place growth via right-neighbor
//!   absorption on reallocate.
//! ```
//!
//! A restricted **implicit** mode (linear scan, no free list, no
//! coalescing) is the same engine with those features disabled, to make the
//! free-list engine's invariants explicit by contrast. A trivial [`bump`]
//! allocator is included only as a baseline for comparison and is not part
//! of the core engine.
//!
//! ## Crate Structure
//!
//! ```text
//!   segalloc
//!   ├── align      - Alignment macros and size rounding
//!   ├── block      - Block header codec (internal)
//!   ├── segment    - The [start, end) descriptor for the managed region
//!   ├── list       - The address-ordered doubly linked free list
//!   ├── walker     - The heap walker used by validation and implicit mode
//!   ├── engine     - Heap: init / allocate / free / reallocate / validate
//!   ├── error      - AllocatorError and ConsistencyFault
//!   └── bump       - A trivial bump-allocator baseline (not the core)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use segalloc::{Heap, Mode};
//!
//! let mut backing = vec![0u8; 4096].into_boxed_slice();
//!
//! unsafe {
//!     let mut heap = Heap::init(backing.as_mut_ptr(), backing.len(), Mode::Explicit).unwrap();
//!
//!     let ptr = heap.allocate(64).unwrap() as *mut u64;
//!     *ptr = 42;
//!     assert_eq!(*ptr, 42);
//!
//!     heap.free(ptr as *mut u8);
//!     assert!(heap.validate_heap());
//! }
//! ```
//!
//! ## Safety
//!
//! This crate is inherently unsafe, as it deals with raw memory management
//! over a caller-supplied segment. All allocation, deallocation, and
//! reallocation operations that touch the segment require `unsafe` blocks;
//! callers must uphold the obligations documented on each one.
//!
//! ## Non-goals
//!
//! Thread safety, growing the segment, freeing memory back to the OS,
//! defragmentation beyond right-coalescing, best-fit / segregated-fit /
//! buddy placement policies, alignment stronger than the fixed word
//! alignment, and detection of double-free or invalid pointers beyond what
//! [`Heap::validate`] catches.

pub mod align;
mod block;
pub mod bump;
mod engine;
mod error;
mod list;
mod segment;
mod walker;

pub use engine::{Heap, Mode, MIN_PAYLOAD_EXPLICIT, MIN_PAYLOAD_IMPLICIT};
pub use error::{AllocatorError, ConsistencyFault, Invariant};
pub use segment::Segment;
