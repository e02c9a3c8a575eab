//! Dynamic-load backend: kernels resolved from the shared library at runtime.
//!
//! The library is opened once and every contract symbol is resolved once
//! into an address table indexed by [`KernelId`]. Calls then go through a
//! single primitive, [`invoke`], that reinterprets a table address as an
//! `extern "C"` function of N machine-word arguments. Every contract
//! parameter is integer-class and at most 64 bits, so passing it widened to
//! a word is indistinguishable from the declared signature.
//!
//! # Library location
//!
//! 1. `LANECALL_KERNELS_LIB`, if set.
//! 2. A file named like the kernels cdylib (cargo's hashed `deps` names
//!    included) next to the running executable, in its `deps/`, or in its
//!    parent directory.

#[cfg(not(target_pointer_width = "64"))]
compile_error!("the dynamic backend passes 64-bit arguments as machine words");

use std::{
  env::consts::{DLL_PREFIX, DLL_SUFFIX},
  path::{Path, PathBuf},
};

use libloading::{Library, Symbol};

use crate::{
  Backend, BackendError, EchoRecord, LaneWidth, LookupTable, ProbeArgs, Strategy,
  contract::{CONTRACTS, KERNEL_COUNT, KernelId, Op},
};

/// Environment variable naming the kernels library path.
pub const LIB_ENV: &str = "LANECALL_KERNELS_LIB";

const LIB_STEM: &str = "lanecall_kernels";

// ─────────────────────────────────────────────────────────────────────────────
// Location
// ─────────────────────────────────────────────────────────────────────────────

/// Directories searched when [`LIB_ENV`] is unset.
#[must_use]
pub fn search_dirs() -> Vec<PathBuf> {
  let Some(exe_dir) = std::env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf)) else {
    return Vec::new();
  };
  let mut dirs = vec![exe_dir.join("deps"), exe_dir.clone()];
  if let Some(parent) = exe_dir.parent() {
    dirs.push(parent.to_path_buf());
  }
  dirs
}

fn is_kernels_lib(name: &str) -> bool {
  name
    .strip_prefix(DLL_PREFIX)
    .and_then(|rest| rest.strip_suffix(DLL_SUFFIX))
    .is_some_and(|stem| stem == LIB_STEM || stem.starts_with(&format!("{LIB_STEM}-")))
}

/// First kernels library found in `dirs`, preferring the unhashed name.
///
/// # Errors
///
/// [`BackendError::LibraryNotFound`] listing `dirs`.
pub fn search(dirs: &[PathBuf]) -> Result<PathBuf, BackendError> {
  let exact = format!("{DLL_PREFIX}{LIB_STEM}{DLL_SUFFIX}");
  for dir in dirs {
    tracing::debug!(dir = %dir.display(), "probing for kernels library");
    let exact_path = dir.join(&exact);
    if exact_path.is_file() {
      return Ok(exact_path);
    }
    let Ok(entries) = std::fs::read_dir(dir) else {
      continue;
    };
    let mut hashed: Vec<PathBuf> = entries
      .filter_map(Result::ok)
      .map(|e| e.path())
      .filter(|p| p.is_file() && p.file_name().and_then(|n| n.to_str()).is_some_and(is_kernels_lib))
      .collect();
    hashed.sort();
    if let Some(found) = hashed.into_iter().next() {
      return Ok(found);
    }
  }
  Err(BackendError::LibraryNotFound { searched: dirs.to_vec() })
}

/// Resolve the library path from [`LIB_ENV`] or the default search.
///
/// # Errors
///
/// [`BackendError::LibraryNotFound`] when nothing matches.
pub fn locate() -> Result<PathBuf, BackendError> {
  if let Some(path) = std::env::var_os(LIB_ENV) {
    tracing::debug!(path = ?path, "kernels library from {LIB_ENV}");
    return Ok(PathBuf::from(path));
  }
  search(&search_dirs())
}

// ─────────────────────────────────────────────────────────────────────────────
// Invocation
// ─────────────────────────────────────────────────────────────────────────────

/// Call the `extern "C"` function at `addr` with `N` word arguments.
///
/// # Safety
///
/// `addr` must be a live function whose parameters are `N` integer-class
/// values of at most one word each and whose return type is `R`.
#[inline(always)]
unsafe fn invoke<R, const N: usize>(addr: usize, args: [usize; N]) -> R {
  type W = usize;
  // SAFETY: caller contract; fn pointers are word-sized on every target.
  unsafe {
    match args.as_slice() {
      [] => core::mem::transmute::<usize, extern "C" fn() -> R>(addr)(),
      &[a] => core::mem::transmute::<usize, extern "C" fn(W) -> R>(addr)(a),
      &[a, b] => core::mem::transmute::<usize, extern "C" fn(W, W) -> R>(addr)(a, b),
      &[a, b, c] => core::mem::transmute::<usize, extern "C" fn(W, W, W) -> R>(addr)(a, b, c),
      &[a, b, c, d] => core::mem::transmute::<usize, extern "C" fn(W, W, W, W) -> R>(addr)(a, b, c, d),
      &[a, b, c, d, e] => core::mem::transmute::<usize, extern "C" fn(W, W, W, W, W) -> R>(addr)(a, b, c, d, e),
      &[a, b, c, d, e, f] => {
        core::mem::transmute::<usize, extern "C" fn(W, W, W, W, W, W) -> R>(addr)(a, b, c, d, e, f)
      }
      &[a, b, c, d, e, f, g] => {
        core::mem::transmute::<usize, extern "C" fn(W, W, W, W, W, W, W) -> R>(addr)(a, b, c, d, e, f, g)
      }
      &[a, b, c, d, e, f, g, h] => {
        core::mem::transmute::<usize, extern "C" fn(W, W, W, W, W, W, W, W) -> R>(addr)(a, b, c, d, e, f, g, h)
      }
      _ => unreachable!("kernel contract has at most eight parameters"),
    }
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Backend
// ─────────────────────────────────────────────────────────────────────────────

/// Calls the kernels through a runtime-loaded shared library.
#[derive(Debug)]
pub struct DynamicBackend {
  table: [usize; KERNEL_COUNT],
  path: PathBuf,
  // Keeps every address in `table` mapped.
  _library: Library,
}

impl DynamicBackend {
  /// Locate and open the kernels library.
  ///
  /// # Errors
  ///
  /// Any location, open or symbol resolution failure.
  pub fn init() -> Result<Self, BackendError> {
    Self::open(locate()?)
  }

  /// Open the kernels library at `path` and resolve every contract symbol.
  ///
  /// # Errors
  ///
  /// [`BackendError::LibraryOpen`] or [`BackendError::SymbolMissing`].
  pub fn open(path: impl AsRef<Path>) -> Result<Self, BackendError> {
    let path = path.as_ref().to_path_buf();
    // SAFETY: the kernels library runs no initialization code of its own.
    let library = unsafe { Library::new(&path) }.map_err(|source| BackendError::LibraryOpen {
      path: path.clone(),
      source,
    })?;

    let mut table = [0usize; KERNEL_COUNT];
    for (slot, contract) in table.iter_mut().zip(CONTRACTS) {
      // SAFETY: the symbol's address is only called through `invoke` with
      // the arity and return type its contract declares.
      let symbol: Symbol<'_, unsafe extern "C" fn()> =
        unsafe { library.get(contract.name.as_bytes()) }.map_err(|source| BackendError::SymbolMissing {
          symbol: contract.name,
          source,
        })?;
      *slot = *symbol as usize;
    }
    tracing::debug!(path = %path.display(), symbols = table.len(), "kernels library resolved");

    Ok(Self {
      table,
      path,
      _library: library,
    })
  }

  /// Path the library was opened from.
  #[must_use]
  pub fn path(&self) -> &Path {
    &self.path
  }

  #[inline(always)]
  #[allow(clippy::indexing_slicing)] // KernelId indices are below KERNEL_COUNT
  fn addr(&self, id: KernelId) -> usize {
    self.table[id.index()]
  }

  #[inline(always)]
  fn lane(&self, op: Op, width: LaneWidth) -> usize {
    self.addr(KernelId::lane(op, width))
  }
}

// SAFETY: every method passes its arguments, widened to words, to the symbol
// resolved for the same contract entry.
unsafe impl Backend for DynamicBackend {
  #[inline]
  fn strategy(&self) -> Strategy {
    Strategy::DynamicLoad
  }

  #[inline]
  unsafe fn sum_u8_raw(&self, width: LaneWidth, ptr: *const u8, len: usize) -> u32 {
    // SAFETY: contract `(ptr, len) -> u32`.
    unsafe { invoke::<u32, 2>(self.lane(Op::SumU8, width), [ptr as usize, len]) }
  }

  #[inline]
  unsafe fn is_ascii_raw(&self, width: LaneWidth, ptr: *const u8, len: usize) -> bool {
    // SAFETY: contract `(ptr, len) -> u8`.
    unsafe { invoke::<u8, 2>(self.lane(Op::IsAscii, width), [ptr as usize, len]) != 0 }
  }

  #[inline]
  unsafe fn all_in_set_raw(&self, width: LaneWidth, ptr: *const u8, len: usize, lut: &LookupTable) -> bool {
    let args = [ptr as usize, len, lut.as_ptr() as usize];
    // SAFETY: contract `(ptr, len, lut) -> u8`.
    unsafe { invoke::<u8, 3>(self.lane(Op::ValidateLut, width), args) != 0 }
  }

  #[inline]
  unsafe fn map_bytes_raw(&self, width: LaneWidth, src: *const u8, len: usize, dst: *mut u8, lut: &LookupTable) {
    let args = [src as usize, len, dst as usize, lut.as_ptr() as usize];
    // SAFETY: contract `(src, len, dst, lut)`.
    unsafe { invoke::<(), 4>(self.lane(Op::MapLut, width), args) }
  }

  #[inline]
  unsafe fn eq_masks16_raw(&self, src: *const u8, len: usize, needle: u8, out: *mut u16) -> usize {
    let args = [src as usize, len, usize::from(needle), out as usize];
    // SAFETY: contract `(src, len, needle, out) -> usize`.
    unsafe { invoke::<usize, 4>(self.lane(Op::EqMasks, LaneWidth::W16), args) }
  }

  #[inline]
  unsafe fn eq_masks32_raw(&self, src: *const u8, len: usize, needle: u8, out: *mut u32) -> usize {
    let args = [src as usize, len, usize::from(needle), out as usize];
    // SAFETY: contract `(src, len, needle, out) -> usize`.
    unsafe { invoke::<usize, 4>(self.lane(Op::EqMasks, LaneWidth::W32), args) }
  }

  #[inline]
  unsafe fn eq_masks64_raw(&self, src: *const u8, len: usize, needle: u8, out: *mut u64) -> usize {
    let args = [src as usize, len, usize::from(needle), out as usize];
    // SAFETY: contract `(src, len, needle, out) -> usize`.
    unsafe { invoke::<usize, 4>(self.lane(Op::EqMasks, LaneWidth::W64), args) }
  }

  #[inline]
  unsafe fn crc32c_update_raw(&self, width: LaneWidth, ptr: *const u8, len: usize, init: u32) -> u32 {
    let args = [ptr as usize, len, init as usize];
    // SAFETY: contract `(ptr, len, init) -> u32`.
    unsafe { invoke::<u32, 3>(self.lane(Op::Crc32cUpdate, width), args) }
  }

  #[inline]
  fn crc32c_combine(&self, crc1: u32, crc2: u32, len2: usize) -> u32 {
    // SAFETY: contract `(u32, u32, usize) -> u32`; no pointers.
    unsafe { invoke::<u32, 3>(self.addr(KernelId::CRC32C_COMBINE), [crc1 as usize, crc2 as usize, len2]) }
  }

  #[inline]
  fn noop(&self) {
    // SAFETY: contract `()`.
    unsafe { invoke::<(), 0>(self.addr(KernelId::NOOP), []) }
  }

  #[inline]
  fn abi_probe(&self, a: ProbeArgs) -> u64 {
    let args = [
      a.ptr,
      a.len,
      a.v32 as usize,
      usize::from(a.v8),
      a.v64 as usize,
      a.f64_bits as usize,
      a.f32_bits as usize,
    ];
    // SAFETY: contract has seven integer parameters; the pointer is not read.
    unsafe { invoke::<u64, 7>(self.addr(KernelId::ABI_PROBE), args) }
  }

  #[inline]
  unsafe fn abi_echo_raw(&self, a: ProbeArgs, out: *mut EchoRecord) {
    let args = [
      a.ptr,
      a.len,
      a.v32 as usize,
      usize::from(a.v8),
      a.v64 as usize,
      a.f64_bits as usize,
      a.f32_bits as usize,
      out as usize,
    ];
    // SAFETY: contract has eight integer parameters; caller guarantees `out`.
    unsafe { invoke::<(), 8>(self.addr(KernelId::ABI_ECHO), args) }
  }
}
