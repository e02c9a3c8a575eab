//! CRC32C (Castagnoli) checksum with hardware acceleration.
//!
//! This is the single checksum polynomial the lanecall kernels are wired to.
//! The crate provides:
//!
//! - [`Crc32c`]: streaming / one-shot digest
//! - [`crc32c_update`]: extend a finalized digest with more data
//! - [`crc32c_combine`]: `crc(A || B)` from `crc(A)`, `crc(B)`, `len(B)` in O(log n)
//!
//! # Hardware Acceleration
//!
//! | Platform | Instruction | Selection |
//! |----------|-------------|-----------|
//! | x86_64 | SSE4.2 `crc32` | compile-time, then runtime (`std`) |
//! | aarch64 | ARMv8 CRC extension | compile-time, then runtime (`std`) |
//! | other | slicing-by-8 tables | always |
//!
//! # Example
//!
//! ```rust
//! use checksum::Crc32c;
//!
//! let crc = Crc32c::checksum(b"hello world");
//! assert_eq!(crc, 0xC994_65AA);
//!
//! let (a, b) = b"hello world".split_at(5);
//! let combined = Crc32c::combine(Crc32c::checksum(a), Crc32c::checksum(b), b.len());
//! assert_eq!(combined, crc);
//! ```
//!
//! # Polynomial Support
//!
//! Only CRC32C is supported. The combine routine has no polynomial parameter:
//! feeding it digests computed under another polynomial (e.g. CRC-32/IEEE)
//! is unsupported and yields meaningless output.

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod combine;
pub mod constants;
mod crc32c;
pub mod reference;

pub use combine::{Gf2Matrix32, crc32c_combine};
pub use crc32c::{Crc32c, crc32c_update, selected_backend};
pub use traits::{Checksum, ChecksumCombine};

#[cfg(test)]
mod proptests;
