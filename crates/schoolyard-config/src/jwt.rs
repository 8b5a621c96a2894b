/// Settings for verifying (and, in development tooling, issuing) bearer tokens.
///
/// # Environment Variables
///
/// - `JWT_SECRET`: HMAC secret shared with the identity provider
/// - `JWT_ACCESS_EXPIRY`: lifetime in seconds of tokens minted by the CLI (default: 3600)
#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry: i64,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(crate::env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            secret: lookup("JWT_SECRET")
                .unwrap_or_else(|| "your-secret-key-change-in-production".to_string()),
            access_token_expiry: lookup("JWT_ACCESS_EXPIRY")
                .and_then(|s| s.parse().ok())
                .unwrap_or(3600), // 1 hour
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = JwtConfig::from_lookup(|_| None);
        assert_eq!(config.secret, "your-secret-key-change-in-production");
        assert_eq!(config.access_token_expiry, 3600);
    }

    #[test]
    fn test_invalid_expiry_falls_back() {
        let config = JwtConfig::from_lookup(|key| match key {
            "JWT_SECRET" => Some("s3cret".into()),
            "JWT_ACCESS_EXPIRY" => Some("soon".into()),
            _ => None,
        });
        assert_eq!(config.secret, "s3cret");
        assert_eq!(config.access_token_expiry, 3600);
    }
}
