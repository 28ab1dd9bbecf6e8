//! Unit tests for registration, password reset, and sign-in

use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::domain::entities::otp::{OtpPurpose, OtpStatus};
use crate::domain::entities::user::{OauthAccount, User};
use crate::errors::DomainError;
use crate::repositories::{MockOtpRepository, MockUserRepository};
use crate::services::auth::{hash_password, AuthService, AuthServiceConfig};
use crate::services::otp::{OtpService, OtpServiceConfig};

use super::mocks::MockEmailService;

type TestAuthService = AuthService<MockUserRepository, MockOtpRepository, MockEmailService>;

// Low bcrypt cost keeps the tests fast; the policy itself is covered in
// the password module tests.
const TEST_BCRYPT_COST: u32 = 4;

fn setup() -> (
    TestAuthService,
    Arc<MockOtpRepository>,
    Arc<MockUserRepository>,
    Arc<MockEmailService>,
) {
    let otp_repo = Arc::new(MockOtpRepository::new());
    let user_repo = Arc::new(MockUserRepository::with_otp_store(otp_repo.store()));
    let email = Arc::new(MockEmailService::new());
    let otp_service = OtpService::new(
        otp_repo.clone(),
        user_repo.clone(),
        email.clone(),
        OtpServiceConfig::default(),
    );
    let service = AuthService::new(
        user_repo.clone(),
        otp_service,
        AuthServiceConfig {
            bcrypt_cost: TEST_BCRYPT_COST,
        },
    );
    (service, otp_repo, user_repo, email)
}

#[tokio::test]
async fn test_registration_happy_path_creates_verified_user() {
    let (service, otp_repo, user_repo, email) = setup();

    service
        .request_registration("new@example.com", "Abcdef1!")
        .await
        .unwrap();
    let code = email.last_code_for("new@example.com").unwrap();

    service
        .complete_registration("new@example.com", "Abcdef1!", &code)
        .await
        .unwrap();

    assert_eq!(user_repo.user_count().await, 1);
    let user = service.sign_in("new@example.com", "Abcdef1!").await.unwrap();
    assert!(user.is_active);
    assert!(user.email_verified_at.is_some());

    // The code record was consumed by the commit
    let records = otp_repo
        .records_for("new@example.com", OtpPurpose::Registration)
        .await;
    assert_eq!(records[0].status, OtpStatus::Used);
}

#[tokio::test]
async fn test_registration_normalizes_email_before_matching_code() {
    let (service, _, user_repo, email) = setup();

    service
        .request_registration("  New@Example.com ", "Abcdef1!")
        .await
        .unwrap();
    let code = email.last_code_for("new@example.com").unwrap();

    service
        .complete_registration("NEW@example.com", "Abcdef1!", &code)
        .await
        .unwrap();
    assert_eq!(user_repo.user_count().await, 1);
}

#[tokio::test]
async fn test_registration_commit_failure_leaves_otp_verified_and_no_user() {
    let (service, otp_repo, user_repo, email) = setup();

    service
        .request_registration("new@example.com", "Abcdef1!")
        .await
        .unwrap();
    let code = email.last_code_for("new@example.com").unwrap();

    user_repo.fail_on_commit();
    let result = service
        .complete_registration("new@example.com", "Abcdef1!", &code)
        .await;
    assert!(matches!(result, Err(DomainError::Database { .. })));

    // Nothing was half-committed: no user row, and the verified code is
    // still on record for a retried commit
    assert_eq!(user_repo.user_count().await, 0);
    let records = otp_repo
        .records_for("new@example.com", OtpPurpose::Registration)
        .await;
    assert_eq!(records[0].status, OtpStatus::Verified);
}

#[tokio::test]
async fn test_request_registration_rejects_existing_password_account() {
    let (service, _, user_repo, email) = setup();
    user_repo
        .insert_user(User::new_registered(
            "taken@example.com".to_string(),
            "$2b$10$hash".to_string(),
        ))
        .await;

    let err = service
        .request_registration("taken@example.com", "Abcdef1!")
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "User already exists. Please sign in with your Email and password."
    );
    assert_eq!(email.sent_count(), 0);
}

#[tokio::test]
async fn test_request_registration_names_oauth_provider() {
    let (service, _, user_repo, _) = setup();
    let user = User::new("oauth@example.com".to_string(), None);
    let user_id = user.id;
    user_repo.insert_user(user).await;
    user_repo
        .insert_oauth_account(OauthAccount::new(
            user_id,
            "google".to_string(),
            "acct-123".to_string(),
        ))
        .await;

    let err = service
        .request_registration("oauth@example.com", "Abcdef1!")
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "You have already signed up with Google. Please sign in using Google."
    );
}

#[tokio::test]
async fn test_complete_registration_rejects_wrong_code() {
    let (service, _, user_repo, email) = setup();

    service
        .request_registration("new@example.com", "Abcdef1!")
        .await
        .unwrap();
    let code = email.last_code_for("new@example.com").unwrap();
    let wrong = if code == "000000" { "000001" } else { "000000" };

    let err = service
        .complete_registration("new@example.com", "Abcdef1!", wrong)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Invalid or expired OTP.");
    assert_eq!(user_repo.user_count().await, 0);
}

#[tokio::test]
async fn test_complete_registration_rejects_account_created_meanwhile() {
    let (service, _, user_repo, email) = setup();

    service
        .request_registration("new@example.com", "Abcdef1!")
        .await
        .unwrap();
    let code = email.last_code_for("new@example.com").unwrap();

    // The same address registers through another channel before the commit
    user_repo
        .insert_user(User::new_registered(
            "new@example.com".to_string(),
            "$2b$10$hash".to_string(),
        ))
        .await;

    let err = service
        .complete_registration("new@example.com", "Abcdef1!", &code)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::AlreadyExists { .. }));
    assert_eq!(user_repo.user_count().await, 1);
}

#[tokio::test]
async fn test_weak_password_rejected_with_policy_messages() {
    let (service, _, _, email) = setup();

    let err = service
        .request_registration("new@example.com", "abc")
        .await
        .unwrap_err();
    match err {
        DomainError::Validation { messages } => {
            assert!(messages.contains(&"Password must be at least 8 characters".to_string()));
            assert!(messages
                .contains(&"Password must contain at least one uppercase letter".to_string()));
            assert!(
                messages.contains(&"Password must contain at least one number".to_string())
            );
        }
        other => panic!("expected validation error, got {:?}", other),
    }
    assert_eq!(email.sent_count(), 0);
}

#[tokio::test]
async fn test_invalid_email_rejected_before_any_store_access() {
    let (service, otp_repo, _, email) = setup();

    let err = service
        .request_registration("not-an-email", "Abcdef1!")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { .. }));
    assert_eq!(email.sent_count(), 0);
    assert!(otp_repo
        .records_for("not-an-email", OtpPurpose::Registration)
        .await
        .is_empty());
}

#[tokio::test]
async fn test_password_reset_full_flow_updates_password() {
    let (service, otp_repo, user_repo, email) = setup();
    user_repo
        .insert_user(User::new_registered(
            "user@example.com".to_string(),
            hash_password("OldPass1!", TEST_BCRYPT_COST).unwrap(),
        ))
        .await;

    service.reset_step1("user@example.com").await.unwrap();
    let code = email.last_code_for("user@example.com").unwrap();

    service.reset_step2("user@example.com", &code).await.unwrap();
    service
        .reset_step3("user@example.com", &code, "NewPass1!")
        .await
        .unwrap();

    // New credentials work, old ones do not
    service.sign_in("user@example.com", "NewPass1!").await.unwrap();
    let err = service
        .sign_in("user@example.com", "OldPass1!")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidCredentials));

    // The commit deleted the reset code outright
    assert!(otp_repo
        .records_for("user@example.com", OtpPurpose::PasswordReset)
        .await
        .is_empty());
}

#[tokio::test]
async fn test_reset_step1_unknown_email_is_user_not_found() {
    let (service, _, _, email) = setup();

    let err = service.reset_step1("ghost@example.com").await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "No account found with this email address."
    );
    assert_eq!(email.sent_count(), 0);
}

#[tokio::test]
async fn test_reset_step2_wrong_code_rejected_without_consuming_record() {
    let (service, otp_repo, user_repo, email) = setup();
    user_repo
        .insert_user(User::new_registered(
            "user@example.com".to_string(),
            "$2b$10$hash".to_string(),
        ))
        .await;

    service.reset_step1("user@example.com").await.unwrap();
    let code = email.last_code_for("user@example.com").unwrap();
    let wrong = if code == "000000" { "000001" } else { "000000" };

    let err = service
        .reset_step2("user@example.com", wrong)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Invalid or expired OTP.");

    // The pre-check never mutates; the real code still works
    service.reset_step2("user@example.com", &code).await.unwrap();
    let records = otp_repo
        .records_for("user@example.com", OtpPurpose::PasswordReset)
        .await;
    assert_eq!(records[0].status, OtpStatus::Pending);
}

#[tokio::test]
async fn test_reset_step3_rejects_code_expired_after_step2() {
    let (service, otp_repo, user_repo, email) = setup();
    let old_hash = hash_password("OldPass1!", TEST_BCRYPT_COST).unwrap();
    user_repo
        .insert_user(User::new_registered(
            "user@example.com".to_string(),
            old_hash,
        ))
        .await;

    service.reset_step1("user@example.com").await.unwrap();
    let code = email.last_code_for("user@example.com").unwrap();
    service.reset_step2("user@example.com", &code).await.unwrap();

    // The code lapses between the pre-check and the commit
    {
        let store = otp_repo.store();
        let mut records = store.write().await;
        for record in records.values_mut() {
            record.expires_at = Utc::now() - Duration::minutes(1);
        }
    }

    let err = service
        .reset_step3("user@example.com", &code, "NewPass1!")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Invalid or expired OTP.");

    // Password unchanged
    service.sign_in("user@example.com", "OldPass1!").await.unwrap();
}

#[tokio::test]
async fn test_reset_step3_weak_replacement_password_rejected() {
    let (service, _, user_repo, email) = setup();
    user_repo
        .insert_user(User::new_registered(
            "user@example.com".to_string(),
            hash_password("OldPass1!", TEST_BCRYPT_COST).unwrap(),
        ))
        .await;

    service.reset_step1("user@example.com").await.unwrap();
    let code = email.last_code_for("user@example.com").unwrap();

    let err = service
        .reset_step3("user@example.com", &code, "short")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { .. }));
    service.sign_in("user@example.com", "OldPass1!").await.unwrap();
}

#[tokio::test]
async fn test_sign_in_failures_share_one_generic_message() {
    let (service, _, user_repo, _) = setup();

    // Password account
    user_repo
        .insert_user(User::new_registered(
            "user@example.com".to_string(),
            hash_password("Correct1!", TEST_BCRYPT_COST).unwrap(),
        ))
        .await;
    // OAuth-only account, no password hash to compare against
    user_repo
        .insert_user(User::new("oauth@example.com".to_string(), None))
        .await;
    // Deactivated account with valid credentials
    let mut inactive = User::new_registered(
        "inactive@example.com".to_string(),
        hash_password("Correct1!", TEST_BCRYPT_COST).unwrap(),
    );
    inactive.is_active = false;
    user_repo.insert_user(inactive).await;

    let cases = [
        ("ghost@example.com", "Correct1!"),
        ("user@example.com", "Wrong1!!"),
        ("oauth@example.com", "Correct1!"),
        ("inactive@example.com", "Correct1!"),
    ];
    for (email, password) in cases {
        let err = service.sign_in(email, password).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Please enter correct email and password.",
            "expected generic failure for {}",
            email
        );
    }

    service.sign_in("user@example.com", "Correct1!").await.unwrap();
}
