//! Drives the explicit engine over a caller-owned segment, pausing between
//! steps so the heap state can be inspected with an external tool.
//!
//! This crate never talks to the OS: the segment here is a boxed slice the
//! demo owns outright, so what is worth watching is the pointers
//! `allocate`/`reallocate` hand back and `validate_heap`'s verdict after
//! each step.

use std::io::Read;

use segalloc::{Heap, Mode};

fn block_until_enter_pressed() {
  println!("\n>>> Press ENTER to continue...");
  let _ = std::io::stdin().bytes().next();
}

fn report(label: &str, heap: &Heap) {
  println!("[{label}] validate_heap() = {}", heap.validate_heap());
}

fn main() {
  let mut backing = vec![0u8; 1024].into_boxed_slice();

  let mut heap = unsafe { Heap::init(backing.as_mut_ptr(), backing.len(), Mode::Explicit).expect("init") };
  println!("[start] segment = {:?}..{:?}", heap.segment().start(), heap.segment().end());
  report("start", &heap);
  block_until_enter_pressed();

  println!("\n[1] Allocate 24 bytes");
  let first = heap.allocate(24).expect("allocate");
  unsafe { (first as *mut u64).write(0xDEADBEEF) };
  println!("[1] ptr = {first:?}, value written = 0x{:X}", unsafe { (first as *mut u64).read() });
  report("after alloc 1", &heap);
  block_until_enter_pressed();

  println!("\n[2] Allocate 96 bytes");
  let mut second = heap.allocate(96).expect("allocate");
  unsafe { std::ptr::write_bytes(second, 0xAB, 96) };
  println!("[2] ptr = {second:?}");
  report("after alloc 2", &heap);
  block_until_enter_pressed();

  println!("\n[3] Free the first block, then shrink the second in place");
  heap.free(first);
  second = heap.reallocate(second, 32).expect("reallocate");
  println!("[3] second's pointer after shrink = {second:?}");
  report("after free + shrink", &heap);
  block_until_enter_pressed();

  println!("\n[4] Free the second block");
  heap.free(second);
  report("after both freed", &heap);

  println!("\n[5] End of demo. Dropping the boxed slice reclaims the segment.");
}
