use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
    time::{SystemTime, UNIX_EPOCH},
};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use okul_mesaj::{
    app::build_app,
    config::AppConfig,
    mail::{MailError, Mailer, OutgoingMail, UnconfiguredMailer},
    state::AppState,
    storage::FileStore,
};
use serde_json::{json, Value};
use tower::ServiceExt;

#[derive(Default)]
struct RecordingMailer {
    sent: Mutex<Vec<OutgoingMail>>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(mail);
        Ok(())
    }
}

struct TestApp {
    app: Router,
    mailer: Arc<RecordingMailer>,
    dir: PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}

fn temp_dir() -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();
    std::env::temp_dir().join(format!("okul-mesaj-api-{}-{}", std::process::id(), nanos))
}

fn test_app_with(config: AppConfig) -> TestApp {
    let dir = temp_dir();
    let store = Arc::new(FileStore::new(&dir));
    let mailer = Arc::new(RecordingMailer::default());
    let state = AppState::from_parts(
        Arc::new(config),
        store.clone(),
        store,
        mailer.clone(),
    );
    TestApp {
        app: build_app(state),
        mailer,
        dir,
    }
}

fn test_app() -> TestApp {
    test_app_with(AppConfig::default())
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::HOST, "okul.local");
    let req = match body {
        Some(b) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(b.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("failed to build request");

    let resp = app.clone().oneshot(req).await.expect("request failed");
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, value)
}

async fn add_teacher(app: &Router, name: &str, email: &str) -> Value {
    let (status, body) = call(
        app,
        "POST",
        "/api/teachers",
        Some(json!({ "name": name, "surname": "Kaya", "email": email })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

fn message_for(teacher_id: &str) -> Value {
    json!({
        "teacherId": teacher_id,
        "studentName": "zeynep ince",
        "studentClass": "7 b",
        "studentPhone": "0532 111 22 33",
        "message": "Veli toplantısı hakkında bilgi almak istiyorum."
    })
}

#[tokio::test]
async fn health() {
    let t = test_app();
    let (status, body) = call(&t.app, "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("ok".into()));
}

#[tokio::test]
async fn unknown_route_is_json_404() {
    let t = test_app();
    for uri in ["/api/nope", "/form/x"] {
        let (status, body) = call(&t.app, "GET", uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body["error"], "Sayfa bulunamadı.");
    }
}

#[tokio::test]
async fn partial_settings_file_still_resolves() {
    let t = test_app();
    std::fs::create_dir_all(&t.dir).unwrap();
    std::fs::write(t.dir.join("settings.json"), r#"{"schoolName":"Fen Lisesi"}"#).unwrap();

    let (status, body) = call(&t.app, "GET", "/api/settings", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["schoolName"], "Fen Lisesi");
    assert_eq!(body["adminPassword"], "0000");

    let (status, _) = call(
        &t.app,
        "POST",
        "/api/admin/login",
        Some(json!({ "password": "0000" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn saved_password_is_trimmed() {
    let t = test_app();
    let (status, body) = call(
        &t.app,
        "PUT",
        "/api/settings",
        Some(json!({ "schoolName": "Fen Lisesi", "adminPassword": " 1234 " })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["adminPassword"], "1234");

    let (status, _) = call(
        &t.app,
        "POST",
        "/api/admin/login",
        Some(json!({ "password": "1234" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn settings_default_when_never_saved() {
    let t = test_app();
    let (status, body) = call(&t.app, "GET", "/api/settings", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["schoolName"], "Örnek Okul");
    assert_eq!(body["adminPassword"], "0000");
}

#[tokio::test]
async fn settings_save_and_admin_login() {
    let t = test_app();

    let (status, _) = call(
        &t.app,
        "POST",
        "/api/admin/login",
        Some(json!({ "password": "0000" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = call(
        &t.app,
        "PUT",
        "/api/settings",
        Some(json!({ "schoolName": "Cumhuriyet Ortaokulu", "adminPassword": "2468" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);

    let (status, body) = call(
        &t.app,
        "POST",
        "/api/admin/login",
        Some(json!({ "password": "0000" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Şifre hatalı. Lütfen tekrar deneyin.");

    let (status, body) = call(
        &t.app,
        "POST",
        "/api/admin/login",
        Some(json!({ "password": "2468" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn settings_require_both_fields() {
    let t = test_app();
    let (status, body) = call(
        &t.app,
        "PUT",
        "/api/settings",
        Some(json!({ "schoolName": "Okul" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Okul adı ve admin şifresi zorunludur.");
}

#[tokio::test]
async fn teacher_crud() {
    let t = test_app();

    let a = add_teacher(&t.app, "Elif", "elif@okul.k12.tr").await;
    let b = add_teacher(&t.app, "Burak", "burak@okul.k12.tr").await;
    let a_id = a["id"].as_str().unwrap().to_string();
    let b_id = b["id"].as_str().unwrap().to_string();
    assert_ne!(a_id, b_id);

    let (status, list) = call(&t.app, "GET", "/api/teachers", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 2);

    let (status, one) = call(&t.app, "GET", &format!("/api/teachers/{a_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(one["teacher"]["email"], "elif@okul.k12.tr");
    assert_eq!(one["teacher"]["id"], a_id.as_str());

    let (status, one) = call(&t.app, "GET", &format!("/api/teachers?id={b_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(one["name"], "Burak");

    let (status, body) = call(&t.app, "DELETE", &format!("/api/teachers?id={a_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);

    let (status, _) = call(&t.app, "DELETE", &format!("/api/teachers/{a_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&t.app, "GET", &format!("/api/teachers/{a_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn teacher_create_validation() {
    let t = test_app();

    let (status, body) = call(
        &t.app,
        "POST",
        "/api/teachers",
        Some(json!({ "name": "Elif", "surname": " ", "email": "elif@okul.k12.tr" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Ad, soyad ve e-posta zorunludur.");

    let (status, _) = call(&t.app, "DELETE", "/api/teachers", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(&t.app, "DELETE", "/api/teachers/yok-boyle-biri", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn message_is_relayed_to_teacher() {
    let t = test_app();
    let teacher = add_teacher(&t.app, "İsmail", "ismail@okul.k12.tr").await;
    let id = teacher["id"].as_str().unwrap();

    let (status, body) = call(&t.app, "POST", "/api/messages", Some(message_for(id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true }));

    let sent = t.mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "ismail@okul.k12.tr");
    assert_eq!(sent[0].subject, "Mesaj - İsmail Kaya");
    assert!(sent[0].body.contains("Öğrenci ad soyad: ZEYNEP İNCE"));
    assert!(sent[0].body.contains("Sınıf: 7 B"));
    assert!(sent[0].body.contains("Telefon: 05321112233"));
}

#[tokio::test]
async fn message_to_unknown_teacher_is_not_sent() {
    let t = test_app();
    let (status, body) = call(
        &t.app,
        "POST",
        "/api/messages",
        Some(message_for("00000000-0000-4000-8000-000000000000")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Öğretmen bulunamadı.");
    assert!(t.mailer.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn message_validation_errors() {
    let t = test_app();
    let teacher = add_teacher(&t.app, "Deniz", "deniz@okul.k12.tr").await;
    let id = teacher["id"].as_str().unwrap();

    let mut bad_class = message_for(id);
    bad_class["studentClass"] = json!("13-A");
    let (status, body) = call(&t.app, "POST", "/api/messages", Some(bad_class)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Sınıf formatı hatalı. Örn: 10-A");

    let mut bad_phone = message_for(id);
    bad_phone["studentPhone"] = json!("123456");
    let (status, body) = call(&t.app, "POST", "/api/messages", Some(bad_phone)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Telefon 05 ile başlamalı ve 11 haneli olmalı.");

    let (status, body) = call(
        &t.app,
        "POST",
        "/api/messages",
        Some(json!({ "teacherId": id, "studentName": "Ali" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Zorunlu alanlar eksik.");

    let (status, body) = call(&t.app, "POST", "/api/messages", Some(json!([1, 2]))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Geçersiz istek gövdesi.");

    assert!(t.mailer.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn message_without_smtp_is_server_error() {
    let dir = temp_dir();
    let store = Arc::new(FileStore::new(&dir));
    let state = AppState::from_parts(
        Arc::new(AppConfig::default()),
        store.clone(),
        store,
        Arc::new(UnconfiguredMailer),
    );
    let app = build_app(state);

    let teacher = add_teacher(&app, "Selin", "selin@okul.k12.tr").await;
    let id = teacher["id"].as_str().unwrap();
    let (status, body) = call(&app, "POST", "/api/messages", Some(message_for(id))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "SMTP ayarları eksik.");

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn qr_link_uses_site_url() {
    let t = test_app_with(AppConfig {
        site_url: Some("https://okul.example.com".into()),
        ..AppConfig::default()
    });
    let teacher = add_teacher(&t.app, "Oya", "oya@okul.k12.tr").await;
    let id = teacher["id"].as_str().unwrap();

    let (status, body) = call(&t.app, "GET", &format!("/api/teachers/{id}/link"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["url"], format!("https://okul.example.com/form/{id}"));
    assert_eq!(body["teacher"]["name"], "Oya");

    let (status, body) = call(&t.app, "GET", &format!("/api/teachers/{id}/qr"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_str().unwrap().contains("<svg"));
}

#[tokio::test]
async fn qr_link_falls_back_to_host_and_404s_unknown() {
    let t = test_app();
    let teacher = add_teacher(&t.app, "Oya", "oya@okul.k12.tr").await;
    let id = teacher["id"].as_str().unwrap();

    let (_, body) = call(&t.app, "GET", &format!("/api/teachers/{id}/link"), None).await;
    assert_eq!(body["url"], format!("http://okul.local/form/{id}"));

    let (status, _) = call(
        &t.app,
        "GET",
        "/api/teachers/00000000-0000-4000-8000-000000000000/qr",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reset_clears_teachers_and_settings() {
    let t = test_app();
    add_teacher(&t.app, "Elif", "elif@okul.k12.tr").await;
    call(
        &t.app,
        "PUT",
        "/api/settings",
        Some(json!({ "schoolName": "Fen Lisesi", "adminPassword": "9999" })),
    )
    .await;

    let (status, body) = call(&t.app, "POST", "/api/reset", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);

    let (_, list) = call(&t.app, "GET", "/api/teachers", None).await;
    assert!(list.as_array().unwrap().is_empty());
    let (_, settings) = call(&t.app, "GET", "/api/settings", None).await;
    assert_eq!(settings["adminPassword"], "0000");
}
