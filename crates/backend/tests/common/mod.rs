//! Shared helpers: every backend this build can construct.

#![allow(dead_code)]

use backend::{Backend, BackendError};

pub fn gen_bytes(len: usize, seed: u64) -> Vec<u8> {
  let mut out = vec![0u8; len];
  let mut x = seed | 1;
  for b in &mut out {
    x ^= x << 13;
    x ^= x >> 7;
    x ^= x << 17;
    *b = (x as u8).wrapping_add((x >> 8) as u8);
  }
  out
}

/// Direct, precompiled and dynamic backends, skipping the ones this target
/// or environment cannot provide.
pub fn backends() -> Vec<Box<dyn Backend>> {
  let mut out: Vec<Box<dyn Backend>> = Vec::new();

  #[cfg(feature = "direct")]
  out.push(Box::new(backend::direct::DirectBackend));

  #[cfg(feature = "stub")]
  match backend::stub::StubBackend::init() {
    Ok(b) => out.push(Box::new(b)),
    Err(e @ BackendError::UnsupportedArch { .. }) => eprintln!("skipping precompiled backend: {e}"),
    Err(e) => panic!("precompiled backend: {e}"),
  }

  #[cfg(feature = "dynamic")]
  match backend::dynamic::DynamicBackend::init() {
    Ok(b) => out.push(Box::new(b)),
    Err(e @ BackendError::LibraryNotFound { .. }) => eprintln!("skipping dynamic backend: {e}"),
    Err(e) => panic!("dynamic backend: {e}"),
  }

  out
}
