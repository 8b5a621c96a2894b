//! JWT claims carried by access tokens.

use schoolyard_models::{UserRole, ids::UserId};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Access token claims.
///
/// The role is trusted as issued; no database lookup happens on verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// User ID (subject claim)
    pub sub: UserId,
    pub email: String,
    pub role: UserRole,
    /// Expiration (Unix timestamp)
    pub exp: usize,
    /// Issued-at (Unix timestamp)
    pub iat: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_serialize() {
        let claims = Claims {
            sub: UserId::from_u128(1),
            email: "teacher@school.test".to_string(),
            role: UserRole::Teacher,
            exp: 1234567890,
            iat: 1234567800,
        };
        let serialized = serde_json::to_string(&claims).unwrap();
        assert!(serialized.contains(r#""sub":"00000000-0000-0000-0000-000000000001""#));
        assert!(serialized.contains(r#""role":"teacher""#));
    }

    #[test]
    fn test_claims_deserialize() {
        let json = r#"{"sub":"00000000-0000-0000-0000-000000000002","email":"kid@school.test","role":"student","exp":9999999999,"iat":9999999900}"#;
        let claims: Claims = serde_json::from_str(json).unwrap();
        assert_eq!(claims.sub, UserId::from_u128(2));
        assert_eq!(claims.role, UserRole::Student);
        assert_eq!(claims.exp, 9999999999);
    }

    #[test]
    fn test_claims_reject_unknown_role() {
        let json = r#"{"sub":"00000000-0000-0000-0000-000000000002","email":"x@y.z","role":"janitor","exp":1,"iat":1}"#;
        assert!(serde_json::from_str::<Claims>(json).is_err());
    }
}
