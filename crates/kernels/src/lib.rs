//! Native byte kernels behind the lanecall gateway.
//!
//! Every kernel is an `extern "C"` function with an unmangled `lanecall_*`
//! symbol, so the same object serves three call paths: direct Rust calls
//! through the rlib, `dlopen`/`dlsym` through the cdylib, and generated
//! trampolines in the precompiled backend.
//!
//! # Whole-chunk rule
//!
//! Width-suffixed kernels (`_16`, `_32`, `_64`) process only
//! `floor(len / w) * w` bytes. A partial trailing chunk is ignored; the
//! caller finishes it with a scalar loop. Zero whole chunks yields the
//! family's identity without touching memory, so a null pointer is valid
//! whenever `len < w`.
//!
//! # Families
//!
//! | Module | Symbols |
//! |--------|---------|
//! | [`sum`] | `lanecall_sum_u8_{16,32,64}` |
//! | [`ascii`] | `lanecall_is_ascii_{16,32,64}` |
//! | [`lut`] | `lanecall_validate_u8_lut_*`, `lanecall_map_u8_lut_*` |
//! | [`mask`] | `lanecall_eq_u8_masks_{16,32,64}` |
//! | [`crc`] | `lanecall_crc32c_update_*`, `lanecall_crc32c_combine` |
//! | [`probe`] | `lanecall_noop`, `lanecall_abi_probe`, `lanecall_abi_echo` |

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]

mod chunk;

pub mod ascii;
pub mod crc;
pub mod lut;
pub mod mask;
pub mod probe;
pub mod sum;

pub use ascii::{lanecall_is_ascii_16, lanecall_is_ascii_32, lanecall_is_ascii_64};
pub use crc::{lanecall_crc32c_combine, lanecall_crc32c_update_16, lanecall_crc32c_update_32, lanecall_crc32c_update_64};
pub use lut::{
  lanecall_map_u8_lut_16, lanecall_map_u8_lut_32, lanecall_map_u8_lut_64, lanecall_validate_u8_lut_16,
  lanecall_validate_u8_lut_32, lanecall_validate_u8_lut_64,
};
pub use mask::{lanecall_eq_u8_masks_16, lanecall_eq_u8_masks_32, lanecall_eq_u8_masks_64};
pub use probe::{EchoRecord, lanecall_abi_echo, lanecall_abi_probe, lanecall_noop};
pub use sum::{lanecall_sum_u8_16, lanecall_sum_u8_32, lanecall_sum_u8_64};
