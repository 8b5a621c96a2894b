use crate::parse_flag;

/// Quiz auto-grading behaviour.
///
/// # Environment Variables
///
/// - `GRADING_POSITIONAL_FALLBACK`: when `true`, an answer whose question ID
///   does not belong to the quiz is matched to the question at the same
///   position instead of being rejected (default: `false`). Only enable this
///   for clients that still send legacy answer payloads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GradingConfig {
    pub positional_fallback: bool,
}

impl GradingConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(crate::env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            positional_fallback: lookup("GRADING_POSITIONAL_FALLBACK")
                .and_then(|v| parse_flag(&v))
                .unwrap_or(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_disabled_by_default() {
        assert!(!GradingConfig::from_lookup(|_| None).positional_fallback);
        assert!(
            !GradingConfig::from_lookup(|_| Some("garbage".into())).positional_fallback
        );
    }

    #[test]
    fn test_fallback_enabled() {
        let config = GradingConfig::from_lookup(|key| {
            (key == "GRADING_POSITIONAL_FALLBACK").then(|| "true".to_string())
        });
        assert!(config.positional_fallback);
    }
}
