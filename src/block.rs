//! Block header codec (§3, §4.6 V1/V2 of the design).
//!
//! A block is a header word followed by a payload. The header packs the
//! payload size into the high bits and a status tag into the low three bits,
//! relying on the payload size always being a multiple of [`HEADER_SIZE`].

use std::mem;
use std::ptr;

use crate::align::ALIGNMENT;

/// Size in bytes of a block header: exactly one machine word.
pub const HEADER_SIZE: usize = mem::size_of::<usize>();

const STATUS_MASK: usize = 0b111;
const FREE_BITS: usize = 0b111;
const USED_BITS: usize = 0b000;

/// The two block statuses a header can encode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
  Free,
  Used,
}

/// The decoded contents of a header word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
  pub size: usize,
  pub status: Status,
}

impl Header {
  /// Decodes a raw header word. Returns `None` if the low bits are neither
  /// the FREE nor the USED pattern (a corrupted or mis-walked header).
  pub fn decode(word: usize) -> Option<Self> {
    let size = word & !STATUS_MASK;
    let status = match word & STATUS_MASK {
      FREE_BITS => Status::Free,
      USED_BITS => Status::Used,
      _ => return None,
    };
    Some(Header { size, status })
  }

  /// Encodes this header back into a single word.
  pub fn encode(self) -> usize {
    let status_bits = match self.status {
      Status::Free => FREE_BITS,
      Status::Used => USED_BITS,
    };
    debug_assert_eq!(self.size & STATUS_MASK, 0, "payload size must be word-aligned");
    self.size | status_bits
  }
}

/// A block, named by the address of its header.
///
/// `Block` is a thin wrapper over a base pointer; it carries no owned state
/// and is `Copy` so the engine can pass it around freely while walking the
/// heap. All methods are `unsafe` because they dereference the base pointer,
/// which must point at a live block header within the allocator's segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Block {
  base: *mut u8,
}

impl Block {
  /// Wraps a raw header address as a `Block`. Does not read memory.
  pub fn at(base: *mut u8) -> Self {
    Block { base }
  }

  /// Builds a `Block` from a pointer previously returned to the caller as a
  /// payload pointer (i.e. the argument to `free`/`reallocate`).
  ///
  /// # Safety
  /// `payload` must be a pointer previously returned by this allocator's
  /// `allocate`/`reallocate`, still within the segment.
  pub unsafe fn from_payload(payload: *mut u8) -> Self {
    Block { base: unsafe { payload.sub(HEADER_SIZE) } }
  }

  pub fn base(self) -> *mut u8 {
    self.base
  }

  /// Pointer to the first byte of this block's payload, i.e. the pointer
  /// handed to the caller.
  pub fn payload(self) -> *mut u8 {
    unsafe { self.base.add(HEADER_SIZE) }
  }

  /// Reads and decodes this block's header.
  ///
  /// # Safety
  /// `self.base` must point at a live header within the segment.
  pub unsafe fn header(self) -> Header {
    let word = unsafe { ptr::read(self.base as *const usize) };
    Header::decode(word).expect("corrupted block header")
  }

  /// Like [`Block::header`], but returns `None` instead of panicking when
  /// the status bits are neither FREE nor USED. Used by the walker and the
  /// validator, which must report corruption rather than crash on it.
  ///
  /// # Safety
  /// `self.base` must point at readable memory within the segment.
  pub unsafe fn try_header(self) -> Option<Header> {
    let word = unsafe { ptr::read(self.base as *const usize) };
    Header::decode(word)
  }

  /// Writes `header` to this block's header word.
  ///
  /// # Safety
  /// `self.base` must point at writable memory within the segment.
  pub unsafe fn set_header(self, header: Header) {
    unsafe { ptr::write(self.base as *mut usize, header.encode()) };
  }

  /// The header address of this block's immediate right neighbor, computed
  /// from its own (decoded) size. Caller must check this against segment end
  /// before treating it as a live block.
  ///
  /// # Safety
  /// `self.base` must point at a live header.
  pub unsafe fn right_neighbor(self, size: usize) -> *mut u8 {
    unsafe { self.base.add(HEADER_SIZE + size) }
  }

  /// Reads the `prev_free`/`next_free` link pair stored in this block's
  /// first two payload words. Only meaningful while the block is FREE.
  ///
  /// # Safety
  /// The block must be FREE and have at least two payload words (guaranteed
  /// by the minimum payload size for the explicit engine).
  pub unsafe fn read_links(self) -> (Option<*mut u8>, Option<*mut u8>) {
    let payload = self.payload() as *mut usize;
    let prev = unsafe { ptr::read(payload) };
    let next = unsafe { ptr::read(payload.add(1)) };
    (decode_link(prev), decode_link(next))
  }

  /// Writes the `prev_free`/`next_free` link pair into this block's payload.
  ///
  /// # Safety
  /// Same as [`Block::read_links`].
  pub unsafe fn write_links(self, prev: Option<*mut u8>, next: Option<*mut u8>) {
    let payload = self.payload() as *mut usize;
    unsafe {
      ptr::write(payload, encode_link(prev));
      ptr::write(payload.add(1), encode_link(next));
    }
  }
}

fn encode_link(link: Option<*mut u8>) -> usize {
  link.map_or(0, |p| p as usize)
}

fn decode_link(word: usize) -> Option<*mut u8> {
  if word == 0 { None } else { Some(word as *mut u8) }
}

/// Asserts the invariant the header codec relies on: `HEADER_SIZE` equals the
/// fixed alignment, so `size` always leaves the low bits free for the status
/// tag.
pub(crate) const fn assert_codec_invariant() {
  assert!(HEADER_SIZE == ALIGNMENT);
}
