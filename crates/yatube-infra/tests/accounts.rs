#![cfg(feature = "auth")]

mod common;

use std::sync::Arc;

use common::World;
use yatube_core::DomainError;
use yatube_core::ports::TokenService;
use yatube_core::services::{AccountService, SignupDraft};
use yatube_infra::{Argon2PasswordService, JwtConfig, JwtTokenService};

fn accounts(world: &World) -> AccountService {
    let tokens = JwtTokenService::new(JwtConfig {
        secret: "integration-secret".to_string(),
        expiration_hours: 1,
        issuer: "yatube-test".to_string(),
    });
    AccountService::new(
        world.store.users.clone(),
        Arc::new(Argon2PasswordService::new()),
        Arc::new(tokens),
    )
}

fn draft(username: &str, password: &str) -> SignupDraft {
    SignupDraft {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password: password.to_string(),
        first_name: "Leo".to_string(),
        last_name: "Tolstoy".to_string(),
    }
}

#[tokio::test]
async fn signup_issues_a_token_for_the_new_user() {
    let world = World::new();
    let accounts = accounts(&world);

    let session = accounts.signup(draft("leo", "war and peace")).await.unwrap();

    assert_eq!(session.user.username, "leo");
    assert_eq!(session.user.display_name(), "Leo Tolstoy");
    assert_eq!(session.expires_in, 3600);
    let claims = accounts.tokens().validate_token(&session.token).unwrap();
    assert_eq!(claims.user_id, session.user.id);
}

#[tokio::test]
async fn signup_rejects_taken_usernames_and_weak_passwords() {
    let world = World::new();
    let accounts = accounts(&world);
    accounts.signup(draft("leo", "war and peace")).await.unwrap();

    let err = accounts.signup(draft("leo", "anna karenina")).await.unwrap_err();
    assert!(matches!(err, DomainError::Duplicate(_)));

    let err = accounts.signup(draft("fyodor", "short")).await.unwrap_err();
    assert!(matches!(err, DomainError::Validation { field: "password", .. }));

    let err = accounts.signup(draft("bad name", "long enough")).await.unwrap_err();
    assert!(matches!(err, DomainError::Validation { field: "username", .. }));
}

#[tokio::test]
async fn login_checks_the_password() {
    let world = World::new();
    let accounts = accounts(&world);
    accounts.signup(draft("leo", "war and peace")).await.unwrap();

    let session = accounts.login("leo", "war and peace").await.unwrap();
    assert_eq!(session.user.username, "leo");

    let err = accounts.login("leo", "wrong password").await.unwrap_err();
    assert!(matches!(err, DomainError::InvalidCredentials));

    let err = accounts.login("nobody", "war and peace").await.unwrap_err();
    assert!(matches!(err, DomainError::InvalidCredentials));
}

#[tokio::test]
async fn password_change_requires_the_old_password() {
    let world = World::new();
    let accounts = accounts(&world);
    let session = accounts.signup(draft("leo", "war and peace")).await.unwrap();
    let actor = Some(session.user.id);

    let err = accounts
        .change_password(actor, "not it", "resurrection")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { field: "old_password", .. }));

    let err = accounts
        .change_password(None, "war and peace", "resurrection")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::AuthRequired));

    accounts
        .change_password(actor, "war and peace", "resurrection")
        .await
        .unwrap();
    assert!(accounts.login("leo", "resurrection").await.is_ok());
    assert!(accounts.login("leo", "war and peace").await.is_err());
}
