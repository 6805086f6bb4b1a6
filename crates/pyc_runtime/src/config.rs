//! Runtime configuration.

use pyc_core::ArenaConfig;

pub const DEFAULT_GC_THRESHOLD: usize = 128;
pub const GC_THRESHOLD_ENV: &str = "PYC_GC_THRESHOLD";

#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    /// Allocations between two collections.
    pub gc_threshold: usize,
    /// Keep program output in memory instead of writing it to stdout.
    pub capture_output: bool,
    /// Value bound to `__name__` by `init_context`.
    pub module_name: String,
    pub arena: ArenaConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            gc_threshold: DEFAULT_GC_THRESHOLD,
            capture_output: false,
            module_name: "__main__".to_string(),
            arena: ArenaConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Defaults, with the collection threshold taken from `PYC_GC_THRESHOLD`
    /// when it holds a positive integer.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var(GC_THRESHOLD_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => config.gc_threshold = n,
                _ => tracing::warn!(value = %raw, "ignoring invalid {GC_THRESHOLD_ENV}"),
            }
        }
        config
    }

    pub fn captured() -> Self {
        Self {
            capture_output: true,
            ..Self::default()
        }
    }
}
