//! Scalar/vector crossover configuration.
//!
//! Each backend strategy has baked crossover thresholds: below the
//! threshold the in-process scalar loop wins, at or above it the fixed cost
//! of a native call is amortized and the vector kernel wins. The values can
//! be overridden once, at first use, through the environment:
//!
//! | Variable | Effect |
//! |----------|--------|
//! | `LANECALL_FORCE` | `auto`, `scalar` or `vector` |
//! | `LANECALL_THRESHOLD_SUM_U8` | [`ThresholdOp::SumU8`] |
//! | `LANECALL_THRESHOLD_IS_ASCII` | [`ThresholdOp::IsAscii`] |
//! | `LANECALL_THRESHOLD_ALL_BYTES_IN_SET` | [`ThresholdOp::AllBytesInSet`] |
//! | `LANECALL_THRESHOLD_MAP_BYTES` | [`ThresholdOp::MapBytes`] |
//! | `LANECALL_THRESHOLD_CRC32C` | [`ThresholdOp::Crc32c`] |
//!
//! Values that fail to parse are ignored with a warning. The configuration
//! is immutable after first read.

use std::sync::OnceLock;

use backend::Strategy;

/// Forced path selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Force {
  /// Compare the length against the threshold.
  #[default]
  Auto,
  /// Always run the in-process scalar loop.
  Scalar,
  /// Always cross into the kernels (tail still scalar).
  Vector,
}

impl Force {
  #[must_use]
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Auto => "auto",
      Self::Scalar => "scalar",
      Self::Vector => "vector",
    }
  }

  fn parse(value: &str) -> Option<Self> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("auto") {
      return Some(Self::Auto);
    }
    if value.eq_ignore_ascii_case("scalar") {
      return Some(Self::Scalar);
    }
    if value.eq_ignore_ascii_case("vector") {
      return Some(Self::Vector);
    }
    None
  }
}

/// Operations with a scalar/vector crossover.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ThresholdOp {
  SumU8,
  IsAscii,
  AllBytesInSet,
  MapBytes,
  Crc32c,
}

impl ThresholdOp {
  pub const ALL: [ThresholdOp; 5] = [
    ThresholdOp::SumU8,
    ThresholdOp::IsAscii,
    ThresholdOp::AllBytesInSet,
    ThresholdOp::MapBytes,
    ThresholdOp::Crc32c,
  ];

  /// Environment variable overriding this op's threshold.
  #[must_use]
  pub const fn env_var(self) -> &'static str {
    match self {
      Self::SumU8 => "LANECALL_THRESHOLD_SUM_U8",
      Self::IsAscii => "LANECALL_THRESHOLD_IS_ASCII",
      Self::AllBytesInSet => "LANECALL_THRESHOLD_ALL_BYTES_IN_SET",
      Self::MapBytes => "LANECALL_THRESHOLD_MAP_BYTES",
      Self::Crc32c => "LANECALL_THRESHOLD_CRC32C",
    }
  }
}

/// Minimum length (bytes) at which each op takes the vector path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Thresholds {
  pub sum_u8: usize,
  pub is_ascii: usize,
  pub all_bytes_in_set: usize,
  pub map_bytes: usize,
  pub crc32c: usize,
}

impl Thresholds {
  #[inline]
  #[must_use]
  pub const fn get(&self, op: ThresholdOp) -> usize {
    match op {
      ThresholdOp::SumU8 => self.sum_u8,
      ThresholdOp::IsAscii => self.is_ascii,
      ThresholdOp::AllBytesInSet => self.all_bytes_in_set,
      ThresholdOp::MapBytes => self.map_bytes,
      ThresholdOp::Crc32c => self.crc32c,
    }
  }

  #[must_use]
  pub const fn with(mut self, op: ThresholdOp, value: usize) -> Self {
    match op {
      ThresholdOp::SumU8 => self.sum_u8 = value,
      ThresholdOp::IsAscii => self.is_ascii = value,
      ThresholdOp::AllBytesInSet => self.all_bytes_in_set = value,
      ThresholdOp::MapBytes => self.map_bytes = value,
      ThresholdOp::Crc32c => self.crc32c = value,
    }
    self
  }

  /// Same threshold for every op.
  #[must_use]
  pub const fn uniform(value: usize) -> Self {
    Self {
      sum_u8: value,
      is_ascii: value,
      all_bytes_in_set: value,
      map_bytes: value,
      crc32c: value,
    }
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tuned defaults
// ─────────────────────────────────────────────────────────────────────────────

/// Measured crossovers per strategy.
///
/// Dynamic loading pays an indirect call through the address table plus
/// word marshaling, so it crosses over later; the precompiled trampolines
/// are the cheapest crossing and win from a single lane. CRC32-C has a fast
/// in-process hardware path, so the native call only pays off for large
/// buffers.
pub const TUNED_DEFAULTS: &[(Strategy, Thresholds)] = &[
  (
    Strategy::DirectLink,
    Thresholds {
      sum_u8: 128,
      is_ascii: 128,
      all_bytes_in_set: 64,
      map_bytes: 64,
      crc32c: 1024,
    },
  ),
  (
    Strategy::DynamicLoad,
    Thresholds {
      sum_u8: 256,
      is_ascii: 256,
      all_bytes_in_set: 256,
      map_bytes: 256,
      crc32c: 1024,
    },
  ),
  (
    Strategy::Precompiled,
    Thresholds {
      sum_u8: 16,
      is_ascii: 64,
      all_bytes_in_set: 64,
      map_bytes: 64,
      crc32c: 1024,
    },
  ),
];

/// Conservative fallback if a strategy is missing from the table.
const FALLBACK: Thresholds = Thresholds::uniform(256);

#[must_use]
pub fn tuned_defaults(strategy: Strategy) -> Thresholds {
  TUNED_DEFAULTS
    .iter()
    .find(|(s, _)| *s == strategy)
    .map_or(FALLBACK, |(_, t)| *t)
}

// ─────────────────────────────────────────────────────────────────────────────
// Overrides
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Overrides {
  force: Option<Force>,
  thresholds: [Option<usize>; 5],
}

impl Overrides {
  fn read(lookup: impl Fn(&str) -> Option<String>) -> Self {
    let force = lookup("LANECALL_FORCE").and_then(|v| {
      let parsed = Force::parse(&v);
      if parsed.is_none() {
        tracing::warn!(value = %v, "ignoring unrecognized LANECALL_FORCE");
      }
      parsed
    });

    let thresholds = ThresholdOp::ALL.map(|op| {
      let raw = lookup(op.env_var())?;
      match raw.trim().parse::<usize>() {
        Ok(v) => Some(v),
        Err(_) => {
          tracing::warn!(var = op.env_var(), value = %raw, "ignoring unparseable threshold");
          None
        }
      }
    });

    Self { force, thresholds }
  }

  fn apply(&self, strategy: Strategy) -> Config {
    let mut thresholds = tuned_defaults(strategy);
    for (op, value) in ThresholdOp::ALL.into_iter().zip(self.thresholds) {
      if let Some(v) = value {
        tracing::debug!(op = ?op, threshold = v, "threshold override");
        thresholds = thresholds.with(op, v);
      }
    }
    let force = self.force.unwrap_or_default();
    if force != Force::Auto {
      tracing::debug!(force = force.as_str(), "path forced");
    }
    Config {
      strategy,
      force,
      thresholds,
    }
  }
}

fn overrides() -> &'static Overrides {
  static OVERRIDES: OnceLock<Overrides> = OnceLock::new();
  OVERRIDES.get_or_init(|| Overrides::read(|name| std::env::var(name).ok()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Config
// ─────────────────────────────────────────────────────────────────────────────

/// Effective configuration for one backend strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
  pub strategy: Strategy,
  pub force: Force,
  pub thresholds: Thresholds,
}

impl Config {
  /// Tuned defaults with no overrides.
  #[must_use]
  pub fn tuned(strategy: Strategy) -> Self {
    Self {
      strategy,
      force: Force::Auto,
      thresholds: tuned_defaults(strategy),
    }
  }
}

/// Tuned defaults for `strategy` with environment overrides applied.
#[must_use]
pub fn get(strategy: Strategy) -> Config {
  overrides().apply(strategy)
}
