//! Environment variable parsing utilities.
//!
//! Used for the few knobs that can be set without touching code, such as the
//! synthesizer's recursion bound (`SUI_PTB_SYNTH_MAX_DEPTH`).
//!
//! # Example
//!
//! ```
//! use sui_synth_types::env_utils::env_var_or;
//!
//! let depth: usize = env_var_or("SOME_UNSET_DEPTH_VAR", 3);
//! assert_eq!(depth, 3);
//! ```

use std::str::FromStr;

/// Parse an environment variable into a type that implements `FromStr`.
///
/// Returns `None` if the variable is not set or cannot be parsed.
pub fn env_var<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Parse an environment variable with a default value.
pub fn env_var_or<T: FromStr>(key: &str, default: T) -> T {
    env_var(key).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_var_parsing() {
        std::env::set_var("SYNTH_TEST_USIZE", " 7 ");
        let val: Option<usize> = env_var("SYNTH_TEST_USIZE");
        assert_eq!(val, Some(7));

        std::env::set_var("SYNTH_TEST_BAD", "seven");
        assert_eq!(env_var_or::<usize>("SYNTH_TEST_BAD", 3), 3);
        assert_eq!(env_var_or::<usize>("SYNTH_TEST_UNSET_91234", 3), 3);

        std::env::remove_var("SYNTH_TEST_USIZE");
        std::env::remove_var("SYNTH_TEST_BAD");
    }
}
