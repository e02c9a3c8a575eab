//! Checksum traits for lanecall.
//!
//! Every checksum implementation in the workspace (the in-process `checksum`
//! crate and the gateway-routed `lanecall::Crc32c`) conforms to these traits,
//! so callers can swap one for the other and property tests can run against
//! both. `no_std` compatible, zero dependencies.
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`Checksum`] | Streaming / one-shot checksum computation |
//! | [`ChecksumCombine`] | O(log n) combination of adjacent checksums |
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

mod checksum;

pub use checksum::{Checksum, ChecksumCombine};
