use super::*;
use chrono::{Duration, TimeZone};

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).single().expect("timestamp")
}

#[test]
fn cookie_line_round_trips() {
    let cookie = SessionCookie {
        token: "eyJhbGciOi.abc".to_string(),
        expires_at: at(1_767_225_600),
    };
    let encoded = cookie.encode();
    assert!(encoded.starts_with("hexToken=eyJhbGciOi.abc;expires="));
    assert_eq!(SessionCookie::parse(&encoded), Some(cookie));
}

#[test]
fn parses_browser_style_separators() {
    let cookie = SessionCookie::parse("hexToken=t0k; expires=Thu, 01 Jan 2026 00:00:00 +0000")
        .expect("cookie");
    assert_eq!(cookie.token, "t0k");
    assert_eq!(cookie.expires_at, at(1_767_225_600));
}

#[test]
fn rejects_foreign_or_incomplete_cookies() {
    assert_eq!(SessionCookie::parse("otherToken=x;expires=Thu, 01 Jan 2026 00:00:00 +0000"), None);
    assert_eq!(SessionCookie::parse("hexToken=;expires=Thu, 01 Jan 2026 00:00:00 +0000"), None);
    assert_eq!(SessionCookie::parse("hexToken=abc"), None);
    assert_eq!(SessionCookie::parse("hexToken=abc;expires=soon"), None);
}

#[test]
fn file_store_persists_live_token() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("session.cookie");
    let store = CookieFileStore::new(&path);
    assert_eq!(store.token(), None);

    store
        .set_token("live-token", Utc::now() + Duration::hours(1))
        .expect("store");
    assert!(path.exists());
    assert_eq!(store.token().as_deref(), Some("live-token"));

    let reopened = CookieFileStore::new(&path);
    assert_eq!(reopened.current_token().as_deref(), Some("live-token"));
}

#[test]
fn file_store_hides_expired_token() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = CookieFileStore::new(dir.path().join("session.cookie"));
    store
        .set_token("stale", Utc::now() - Duration::minutes(5))
        .expect("store");
    assert_eq!(store.token(), None);
}

#[test]
fn file_store_ignores_garbage_and_clears_idempotently() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("session.cookie");
    fs::write(&path, "not a cookie").expect("write");
    let store = CookieFileStore::new(&path);
    assert_eq!(store.token(), None);

    store.clear().expect("clear");
    assert!(!path.exists());
    store.clear().expect("second clear");
}

#[test]
fn memory_store_tracks_set_and_clear() {
    let store = MemorySessionStore::default();
    assert_eq!(store.token(), None);

    store
        .set_token("mem", Utc::now() + Duration::hours(1))
        .expect("set");
    assert_eq!(store.token().as_deref(), Some("mem"));

    store.clear().expect("clear");
    assert_eq!(store.current_token(), None);

    let expired = MemorySessionStore::with_token("old", Utc::now() - Duration::seconds(1));
    assert_eq!(expired.token(), None);
}
