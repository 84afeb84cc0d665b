use super::sessions::SessionStore;
use super::*;
use reqwest::header::{COOKIE, LOCATION, SET_COOKIE};
use reqwest::multipart::{Form, Part};
use reqwest::redirect::Policy;
use schedule_lens_core::{RawUpload, Session};
use std::net::SocketAddr;

const FIXTURE: &str = include_str!("../../../schedule-lens-core/tests/fixtures/variante_ss12.xml");

async fn spawn_app(state: AppState) -> SocketAddr {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });
    addr
}

async fn spawn_default() -> SocketAddr {
    spawn_app(AppState::from_config(&Config::default())).await
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(Policy::none())
        .build()
        .expect("client")
}

fn upload_form(name: &str, bytes: &[u8]) -> Form {
    Form::new().part("file", Part::bytes(bytes.to_vec()).file_name(name.to_string()))
}

/// `name=value` part of the Set-Cookie header
fn session_cookie(resp: &reqwest::Response) -> String {
    let raw = resp
        .headers()
        .get(SET_COOKIE)
        .expect("set-cookie")
        .to_str()
        .expect("ascii cookie");
    raw.split(';').next().unwrap().to_string()
}

async fn post_file(addr: SocketAddr, cookie: &str, name: &str, bytes: &[u8]) -> String {
    let resp = client()
        .post(format!("http://{addr}/analyze"))
        .header(COOKIE, cookie)
        .multipart(upload_form(name, bytes))
        .send()
        .await
        .expect("post");
    assert_eq!(resp.status(), 200);
    resp.text().await.expect("body")
}

#[tokio::test]
async fn test_healthz() {
    let addr = spawn_default().await;
    let resp = client()
        .get(format!("http://{addr}/healthz"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn test_index_is_idle_form_and_issues_cookie() {
    let addr = spawn_default().await;
    let resp = client().get(format!("http://{addr}/")).send().await.unwrap();

    assert_eq!(resp.status(), 200);
    assert!(session_cookie(&resp).starts_with("sl_session="));
    let body = resp.text().await.unwrap();
    assert!(body.contains("enctype=\"multipart/form-data\""));
    assert!(body.contains("accept=\".xml\""));
    assert!(!body.contains("Costo Totale"));
}

#[tokio::test]
async fn test_analyze_fixture() {
    let addr = spawn_default().await;
    let resp = client()
        .post(format!("http://{addr}/analyze"))
        .multipart(upload_form("variante_ss12.xml", FIXTURE.as_bytes()))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    assert!(resp.headers().get(SET_COOKIE).is_some());
    let body = resp.text().await.unwrap();
    assert!(body.contains("Variante SS12 - Lotto 2"));
    assert!(body.contains("€ 1.234.567,50"));
    assert!(body.contains(
        "<tr><td>TUP - Apertura al Traffico</td><td>2024-03-01</td><td>2024-03-01</td><td>0</td></tr>"
    ));
    assert!(body.contains("<td>Setup Area Lavori</td>"));
    assert!(!body.contains("<td>Collaudo</td>"));
}

#[tokio::test]
async fn test_corrupt_file_shows_one_error_and_nothing_else() {
    let addr = spawn_default().await;
    let resp = client()
        .post(format!("http://{addr}/analyze"))
        .multipart(upload_form("plan.mpp", b"\xD0\xCF\x11\xE0\xA1\xB1\x1A\xE1"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body = resp.text().await.unwrap();
    assert_eq!(body.matches("notice error").count(), 1);
    assert!(body.contains("Il file potrebbe essere corrotto o non supportato."));
    assert!(!body.contains("Costo Totale"));
    assert!(!body.contains("<table"));
}

#[tokio::test]
async fn test_submit_without_file() {
    let addr = spawn_default().await;
    let resp = client()
        .post(format!("http://{addr}/analyze"))
        .multipart(Form::new().part("file", Part::bytes(Vec::new()).file_name("")))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Nessun file caricato."));
    assert!(!body.contains("notice error"));
}

#[tokio::test]
async fn test_session_lifecycle() {
    let addr = spawn_default().await;
    let first = client().get(format!("http://{addr}/")).send().await.unwrap();
    let cookie = session_cookie(&first);

    let body = post_file(addr, &cookie, "variante_ss12.xml", FIXTURE.as_bytes()).await;
    assert!(body.contains("<table"));

    // the analysis is kept for the session
    let body = client()
        .get(format!("http://{addr}/"))
        .header(COOKIE, &cookie)
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("Variante SS12 - Lotto 2"));

    // a new upload replaces it entirely
    let body = post_file(addr, &cookie, "broken.xml", b"<Project><Tasks>").await;
    assert!(!body.contains("Variante SS12 - Lotto 2"));
    assert!(!body.contains("<table"));
    assert_eq!(body.matches("notice error").count(), 1);

    let resp = client()
        .post(format!("http://{addr}/reset"))
        .header(COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 303);
    assert_eq!(resp.headers().get(LOCATION).unwrap(), "/");

    let body = client()
        .get(format!("http://{addr}/"))
        .header(COOKIE, &cookie)
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(!body.contains("class=\"notice"));
}

#[tokio::test]
async fn test_sessions_are_isolated() {
    let addr = spawn_default().await;
    let a = session_cookie(&client().get(format!("http://{addr}/")).send().await.unwrap());
    let b = session_cookie(&client().get(format!("http://{addr}/")).send().await.unwrap());
    assert_ne!(a, b);

    post_file(addr, &a, "variante_ss12.xml", FIXTURE.as_bytes()).await;

    let body = client()
        .get(format!("http://{addr}/"))
        .header(COOKIE, &b)
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(!body.contains("Variante SS12"));
}

#[tokio::test]
async fn test_body_limit() {
    let state = AppState::new(Config::default().pipeline(), 4, 256);
    let addr = spawn_app(state).await;

    let resp = client()
        .post(format!("http://{addr}/analyze"))
        .multipart(upload_form("variante_ss12.xml", FIXTURE.as_bytes()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 413);
}

#[tokio::test]
async fn test_session_store_evicts_oldest() {
    let store = SessionStore::new(2);
    store.put("a", Session::new()).await;
    store.put("b", Session::new()).await;
    store.put("a", Session::new()).await;
    assert_eq!(store.len().await, 2);

    store.put("c", Session::new()).await;
    assert_eq!(store.len().await, 2);
    assert!(!store.contains("a").await);
    assert!(store.contains("b").await);
    assert!(store.contains("c").await);
}

#[tokio::test]
async fn test_session_store_last_put_wins() {
    let store = SessionStore::new(4);
    let pipeline = Config::default().pipeline();

    // two submits copied out of the same idle session
    let mut first = store.get("k").await;
    let mut second = store.get("k").await;
    first
        .submit(&pipeline, Some(RawUpload::new("first.xml", FIXTURE.as_bytes().to_vec())))
        .unwrap();
    second
        .submit(&pipeline, Some(RawUpload::new("second.xml", b"<Project/>".to_vec())))
        .unwrap();
    let second_id = second.upload_id().cloned();

    store.put("k", second).await;
    store.put("k", first.clone()).await;
    assert_eq!(store.len().await, 1);
    assert_eq!(store.get("k").await.upload_id(), first.upload_id());
    assert_ne!(store.get("k").await.upload_id(), second_id.as_ref());
}
