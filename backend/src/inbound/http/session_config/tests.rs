//! Unit tests for session configuration parsing.

use super::*;
use mockable::MockEnv;
use rstest::rstest;
use std::collections::HashMap;

const SECRET: &str = "0123456789abcdef0123456789abcdef";

fn mock_env(vars: HashMap<&'static str, String>) -> MockEnv {
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |key| vars.get(key).cloned());
    env
}

fn release_defaults() -> HashMap<&'static str, String> {
    HashMap::from([
        (SESSION_SECRET_ENV, SECRET.to_owned()),
        (COOKIE_SECURE_ENV, "1".to_owned()),
        (SAMESITE_ENV, "Strict".to_owned()),
    ])
}

fn expect_error(
    result: Result<SessionSettings, SessionConfigError>,
    label: &str,
) -> SessionConfigError {
    match result {
        Ok(_) => panic!("{label}"),
        Err(error) => error,
    }
}

#[rstest]
#[case(BuildMode::Debug)]
#[case(BuildMode::Release)]
fn missing_secret_is_fatal_in_every_build(#[case] mode: BuildMode) {
    let mut vars = release_defaults();
    vars.remove(SESSION_SECRET_ENV);
    let err = expect_error(
        session_settings_from_env(&mock_env(vars), mode),
        "expected missing secret to fail",
    );
    assert_eq!(
        err,
        SessionConfigError::MissingEnv {
            name: SESSION_SECRET_ENV
        }
    );
}

#[rstest]
#[case(BuildMode::Debug)]
#[case(BuildMode::Release)]
fn short_secret_is_fatal_in_every_build(#[case] mode: BuildMode) {
    let mut vars = release_defaults();
    vars.insert(SESSION_SECRET_ENV, "too-short".to_owned());
    let err = expect_error(
        session_settings_from_env(&mock_env(vars), mode),
        "expected short secret to fail",
    );
    assert_eq!(
        err,
        SessionConfigError::SecretTooShort {
            length: 9,
            min_len: SESSION_SECRET_MIN_LEN
        }
    );
}

#[rstest]
fn release_missing_cookie_secure_is_rejected() {
    let mut vars = release_defaults();
    vars.remove(COOKIE_SECURE_ENV);
    let err = expect_error(
        session_settings_from_env(&mock_env(vars), BuildMode::Release),
        "expected missing cookie secure to fail",
    );
    assert_eq!(
        err,
        SessionConfigError::MissingEnv {
            name: COOKIE_SECURE_ENV
        }
    );
}

#[rstest]
#[case("maybe")]
#[case("")]
fn release_invalid_cookie_secure_is_rejected(#[case] value: &str) {
    let mut vars = release_defaults();
    vars.insert(COOKIE_SECURE_ENV, value.to_owned());
    let err = expect_error(
        session_settings_from_env(&mock_env(vars), BuildMode::Release),
        "expected invalid cookie secure to fail",
    );
    assert!(matches!(
        err,
        SessionConfigError::InvalidEnv {
            name: COOKIE_SECURE_ENV,
            ..
        }
    ));
}

#[rstest]
fn release_missing_same_site_is_rejected() {
    let mut vars = release_defaults();
    vars.remove(SAMESITE_ENV);
    let err = expect_error(
        session_settings_from_env(&mock_env(vars), BuildMode::Release),
        "expected missing SameSite to fail",
    );
    assert_eq!(err, SessionConfigError::MissingEnv { name: SAMESITE_ENV });
}

#[rstest]
fn release_insecure_none_same_site_is_rejected() {
    let mut vars = release_defaults();
    vars.insert(COOKIE_SECURE_ENV, "0".to_owned());
    vars.insert(SAMESITE_ENV, "None".to_owned());
    let err = expect_error(
        session_settings_from_env(&mock_env(vars), BuildMode::Release),
        "expected insecure SameSite=None to fail",
    );
    assert_eq!(err, SessionConfigError::InsecureSameSiteNone);
}

#[rstest]
fn release_valid_settings_succeed() {
    let settings = session_settings_from_env(&mock_env(release_defaults()), BuildMode::Release)
        .expect("expected valid settings");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Strict);
}

#[rstest]
fn debug_defaults_need_only_the_secret() {
    let vars = HashMap::from([(SESSION_SECRET_ENV, SECRET.to_owned())]);
    let settings = session_settings_from_env(&mock_env(vars), BuildMode::Debug)
        .expect("debug defaults should succeed");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Lax);
}

#[rstest]
fn debug_invalid_same_site_falls_back_to_default() {
    let mut vars = release_defaults();
    vars.insert(SAMESITE_ENV, "unexpected".to_owned());
    let settings = session_settings_from_env(&mock_env(vars), BuildMode::Debug)
        .expect("debug should fall back to defaults");
    assert_eq!(settings.same_site, SameSite::Lax);
}

#[rstest]
fn same_secret_yields_same_fingerprint() {
    let first = session_settings_from_env(&mock_env(release_defaults()), BuildMode::Release)
        .expect("valid settings");
    let second = session_settings_from_env(&mock_env(release_defaults()), BuildMode::Release)
        .expect("valid settings");

    let mut other_vars = release_defaults();
    other_vars.insert(SESSION_SECRET_ENV, "f".repeat(SESSION_SECRET_MIN_LEN));
    let other = session_settings_from_env(&mock_env(other_vars), BuildMode::Release)
        .expect("valid settings");

    assert_eq!(first.key_fingerprint(), second.key_fingerprint());
    assert_ne!(first.key_fingerprint(), other.key_fingerprint());
    assert!(first.key_fingerprint().chars().all(|c| c.is_ascii_hexdigit()));
}

#[rstest]
fn debug_output_hides_the_key() {
    let settings = session_settings_from_env(&mock_env(release_defaults()), BuildMode::Release)
        .expect("valid settings");
    let rendered = format!("{settings:?}");
    assert!(!rendered.contains(SECRET));
    assert!(rendered.contains(&settings.key_fingerprint()));
}
