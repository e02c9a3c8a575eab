//! Backend initialization errors.
//!
//! These are startup failures: the active backend stores the first error and
//! every caller of [`active`](crate::active) sees it.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
  /// No kernels shared library in any searched location.
  #[error("kernels library not found; searched {}", display_paths(.searched))]
  LibraryNotFound { searched: Vec<PathBuf> },

  #[error("failed to open kernels library {}", .path.display())]
  LibraryOpen {
    path: PathBuf,
    #[source]
    source: libloading::Error,
  },

  #[error("kernels library is missing symbol `{symbol}`")]
  SymbolMissing {
    symbol: &'static str,
    #[source]
    source: libloading::Error,
  },

  /// The precompiled backend has no trampolines for this target.
  #[error("precompiled trampolines are not available for {arch}-{os}")]
  UnsupportedArch { arch: &'static str, os: &'static str },
}

fn display_paths(paths: &[PathBuf]) -> String {
  if paths.is_empty() {
    return "nothing".into();
  }
  paths
    .iter()
    .map(|p| p.display().to_string())
    .collect::<Vec<_>>()
    .join(", ")
}
