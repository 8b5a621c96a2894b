use schoolyard::middleware::auth::AuthUser;
use schoolyard::middleware::role::{check_admin, check_any_role, check_staff, check_student};
use schoolyard_auth::Claims;
use schoolyard_models::UserRole;
use schoolyard_models::ids::UserId;

fn create_test_auth_user(role: UserRole) -> AuthUser {
    let claims = Claims {
        sub: UserId::from_u128(1),
        email: "test@example.com".to_string(),
        role,
        exp: 9999999999,
        iat: 1234567890,
    };
    AuthUser(claims)
}

#[test]
fn test_check_admin() {
    assert!(check_admin(&create_test_auth_user(UserRole::Admin)).is_ok());
    assert!(check_admin(&create_test_auth_user(UserRole::Teacher)).is_err());
    assert!(check_admin(&create_test_auth_user(UserRole::Student)).is_err());
}

#[test]
fn test_check_staff() {
    assert!(check_staff(&create_test_auth_user(UserRole::Admin)).is_ok());
    assert!(check_staff(&create_test_auth_user(UserRole::Teacher)).is_ok());
    assert!(check_staff(&create_test_auth_user(UserRole::Student)).is_err());
    assert!(check_staff(&create_test_auth_user(UserRole::Parent)).is_err());
}

#[test]
fn test_check_student() {
    assert!(check_student(&create_test_auth_user(UserRole::Student)).is_ok());
    assert!(check_student(&create_test_auth_user(UserRole::Admin)).is_err());
    assert!(check_student(&create_test_auth_user(UserRole::Parent)).is_err());
}

#[test]
fn test_check_any_role_multiple_match() {
    let allowed = vec![UserRole::Admin, UserRole::Teacher, UserRole::Student];

    for role in [UserRole::Admin, UserRole::Teacher, UserRole::Student] {
        assert!(check_any_role(&create_test_auth_user(role), &allowed).is_ok());
    }
    assert!(check_any_role(&create_test_auth_user(UserRole::Parent), &allowed).is_err());
}

#[test]
fn test_check_any_role_empty_list() {
    let auth_user = create_test_auth_user(UserRole::Admin);
    assert!(check_any_role(&auth_user, &[]).is_err());
}

#[test]
fn test_denial_is_forbidden_and_names_role() {
    let err = check_staff(&create_test_auth_user(UserRole::Parent)).unwrap_err();
    assert_eq!(err.status.as_u16(), 403);
    assert!(err.error.to_string().contains("parent"));
}
