//! End-to-end auth flows against a mock API with file-backed storage.

use anyhow::{Result, bail};
use geminis::{
    api::ApiConfig,
    app::{App, LOCAL_FILE, SESSION_FILE},
    features::auth::Credentials,
    session::{FileStorage, KeyValueStore},
};
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use std::net::TcpListener;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

#[tokio::test]
async fn login_persists_across_restarts_until_logout() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .and(body_json(json!({ "email": "ana@example.com", "password": "pw" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-1",
            "id_token": "id-1",
            "refresh_token": "refresh-1",
            "user": { "id": 1, "is_master": true }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users/me"))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "name": "Ana",
            "is_master": true
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": 2 }])))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir()?;
    let config = ApiConfig::new(&server.uri());

    let app = App::open(config.clone(), dir.path())?;
    let credentials = Credentials::new("ana@example.com", SecretString::from("pw"));
    let success = app.auth.login(&credentials).await?;
    assert_eq!(success.message, "Sesión iniciada exitosamente");
    assert!(app.auth.is_authenticated());

    let reopened = App::open(config.clone(), dir.path())?;
    assert!(reopened.auth.is_authenticated());
    assert_eq!(reopened.auth.user(), Some(json!({ "id": 1, "is_master": true })));

    let profile = reopened.profile.load_profile_data().await?;
    assert_eq!(profile.data.user.name.as_deref(), Some("Ana"));
    assert_eq!(profile.data.users.len(), 1);

    reopened.auth.logout()?;
    let session = FileStorage::new(dir.path().join(SESSION_FILE));
    assert_eq!(session.get_item("geminis_access_token"), None);
    assert_eq!(session.get_item("geminis_refresh_token"), None);
    assert!(!App::open(config, dir.path())?.auth.is_authenticated());
    Ok(())
}

#[tokio::test]
async fn refresh_replaces_tokens_and_keeps_user() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh"))
        .and(body_json(json!({ "refresh_token": "refresh-1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-2",
            "id_token": "id-2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir()?;
    let session = FileStorage::new(dir.path().join(SESSION_FILE));
    session.set_item("geminis_access_token", "access-1")?;
    session.set_item("geminis_id_token", "id-1")?;
    session.set_item("geminis_refresh_token", "refresh-1")?;
    session.set_item("geminis_user_data", r#"{"id":1}"#)?;

    let app = App::open(ApiConfig::new(&server.uri()), dir.path())?;
    let success = app.auth.service().refresh_token().await?;
    assert_eq!(success.message, "Sesión renovada");

    let Some(access_token) = app.session.access_token() else {
        bail!("access token should be stored");
    };
    assert_eq!(access_token.expose_secret(), "access-2");
    assert_eq!(
        app.session.refresh_token().map(|token| token.expose_secret().to_string()),
        Some("refresh-1".to_string())
    );
    assert_eq!(app.session.user_data(), Some(json!({ "id": 1 })));
    Ok(())
}

#[tokio::test]
async fn email_verification_sends_encoded_token() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/verify-email"))
        .and(query_param("token", "a b+c"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    let app = App::in_memory(ApiConfig::new(&server.uri()))?;
    let success = app.auth.confirm_email("a b+c").await?;
    assert_eq!(success.data, json!({ "ok": true }));
    assert!(!app.auth.loading());
    assert_eq!(app.auth.error(), None);
    Ok(())
}

#[tokio::test]
async fn logout_clears_legacy_tokens() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let local = FileStorage::new(dir.path().join(LOCAL_FILE));
    local.set_item("geminis_access_token", "old")?;
    local.set_item("selectedTheme", "neon-pulse")?;

    let app = App::open(ApiConfig::default(), dir.path())?;
    assert_eq!(app.theme.current_theme(), "neon-pulse");
    app.auth.logout()?;

    assert_eq!(local.get_item("geminis_access_token"), None);
    assert_eq!(local.get_item("selectedTheme").as_deref(), Some("neon-pulse"));
    Ok(())
}
