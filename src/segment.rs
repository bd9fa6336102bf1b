//! The segment descriptor (§3 "Segment"): the caller-supplied address range
//! the allocator is allowed to touch. Resolved once at init and immutable
//! for the lifetime of the `Heap`.

/// A half-open byte range `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Segment {
  start: *mut u8,
  end: *mut u8,
}

impl Segment {
  /// Builds a segment from a start address and length.
  ///
  /// # Safety
  /// `start` must be non-null and `start..start+len` must be a single valid
  /// allocation the caller owns for the lifetime of the `Heap`.
  pub unsafe fn new(start: *mut u8, len: usize) -> Self {
    Segment { start, end: unsafe { start.add(len) } }
  }

  pub fn start(self) -> *mut u8 {
    self.start
  }

  pub fn end(self) -> *mut u8 {
    self.end
  }

  pub fn len(self) -> usize {
    self.end as usize - self.start as usize
  }

  /// True iff `ptr` lies strictly within the segment's open interior,
  /// matching the alignment guarantee's "pointers lie strictly within
  /// `(segment_start, segment_end)`" (§6).
  pub fn contains_interior(self, ptr: *mut u8) -> bool {
    let p = ptr as usize;
    p > self.start as usize && p < self.end as usize
  }

  /// True iff `addr` is anywhere in `[start, end]` inclusive of both ends,
  /// used by the validator to sanity-check free-list link values (V4).
  pub fn contains_inclusive(self, addr: *mut u8) -> bool {
    let a = addr as usize;
    a >= self.start as usize && a <= self.end as usize
  }
}
