use chrono::{Duration, TimeZone, Utc};
use authgate_backend::utils::jwt::{TokenCodec, TokenError, TokenKind};

fn codec_with_secret(secret: &str) -> TokenCodec {
    TokenCodec::new("authgate-test", secret, Duration::hours(3), Duration::hours(72))
        .expect("build codec")
}

fn codec() -> TokenCodec {
    codec_with_secret("integration-test-secret")
}

#[test]
fn issue_and_validate_reproduces_identity() {
    let now = Utc::now();
    let token = codec()
        .issue("alice", "Alice Example", TokenKind::Access, now)
        .expect("issue token");

    let claims = codec().validate(&token).expect("validate token");
    assert_eq!(claims.username, "alice");
    assert_eq!(claims.full_name, "Alice Example");
    assert_eq!(claims.iss, "authgate-test");
    assert_eq!(claims.iat, now.timestamp());
}

#[test]
fn access_token_lives_exactly_three_hours() {
    let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
    let token = codec()
        .issue("alice", "Alice Example", TokenKind::Access, now)
        .expect("issue token");

    let claims = codec().validate(&token).expect("validate token");
    assert_eq!(claims.exp - claims.iat, 3 * 3600);
}

#[test]
fn refresh_token_lives_exactly_seventy_two_hours() {
    let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
    let token = codec()
        .issue("alice", "Alice Example", TokenKind::Refresh, now)
        .expect("issue token");

    let claims = codec().validate(&token).expect("validate token");
    assert_eq!(claims.exp - claims.iat, 72 * 3600);
}

#[test]
fn validate_rejects_wrong_secret() {
    let token = codec_with_secret("secret-one")
        .issue("alice", "Alice Example", TokenKind::Access, Utc::now())
        .expect("issue token");

    let result = codec_with_secret("secret-two").validate(&token);
    assert!(matches!(result, Err(TokenError::Invalid(_))));
}

#[test]
fn validate_rejects_corrupted_and_truncated_tokens() {
    let token = codec()
        .issue("alice", "Alice Example", TokenKind::Access, Utc::now())
        .expect("issue token");

    // truncate the signature
    let truncated = &token[..token.len() - 10];
    assert!(codec().validate(truncated).is_err());

    // flip a character in the payload segment
    let mut corrupted: Vec<char> = token.chars().collect();
    let mid = token.find('.').unwrap() + 2;
    corrupted[mid] = if corrupted[mid] == 'A' { 'B' } else { 'A' };
    let corrupted: String = corrupted.into_iter().collect();
    assert!(codec().validate(&corrupted).is_err());

    // structurally invalid strings
    assert!(codec().validate("").is_err());
    assert!(codec().validate("not-a-token").is_err());
    assert!(codec().validate("a.b").is_err());
    assert!(codec().validate("a.b.c").is_err());
}

#[test]
fn validate_does_not_check_expiry() {
    let long_ago = Utc::now() - Duration::hours(10);
    let token = codec()
        .issue("alice", "Alice Example", TokenKind::Access, long_ago)
        .expect("issue token");

    // Signature is fine, so validation passes; the expiry verdict belongs
    // to the caller.
    let claims = codec().validate(&token).expect("validate token");
    assert!(claims.is_expired(Utc::now()));
}

#[test]
fn is_expired_is_strict() {
    let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
    let token = codec()
        .issue("alice", "Alice Example", TokenKind::Access, now)
        .expect("issue token");
    let claims = codec().validate(&token).expect("validate token");

    let exactly_at_expiry = now + Duration::hours(3);
    assert!(!claims.is_expired(exactly_at_expiry));
    assert!(claims.is_expired(exactly_at_expiry + Duration::seconds(1)));
}

#[test]
fn same_identity_same_instant_issues_distinct_tokens() {
    // Two logins by the same user within one second must not collide on the
    // session table's unique token index.
    let now = Utc::now();
    let first = codec()
        .issue("alice", "Alice Example", TokenKind::Access, now)
        .expect("issue first token");
    let second = codec()
        .issue("alice", "Alice Example", TokenKind::Access, now)
        .expect("issue second token");

    assert_ne!(first, second);
}

#[test]
fn access_and_refresh_tokens_differ_for_the_same_instant() {
    let now = Utc::now();
    let access = codec()
        .issue("alice", "Alice Example", TokenKind::Access, now)
        .expect("issue access token");
    let refresh = codec()
        .issue("alice", "Alice Example", TokenKind::Refresh, now)
        .expect("issue refresh token");

    assert_ne!(access, refresh);
}
