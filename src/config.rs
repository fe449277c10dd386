use tracing::warn;

pub const MAX_CALL_DEPTH_ENV: &str = "SICL_MAX_CALL_DEPTH";
pub const DEFAULT_MAX_CALL_DEPTH: usize = 64;

/// Interpreter settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Deepest allowed nesting of `!` calls inside argument tokens.
    pub max_call_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(raw) = lookup(MAX_CALL_DEPTH_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(depth) if depth > 0 => config.max_call_depth = depth,
                _ => warn!(
                    value = %raw,
                    "ignoring invalid {MAX_CALL_DEPTH_ENV}, using {DEFAULT_MAX_CALL_DEPTH}"
                ),
            }
        }
        config
    }

    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth.max(1);
        self
    }
}
