use super::{AppState, SESSION_COOKIE};
use axum::extract::{Multipart, State};
use axum::http::header::{COOKIE, LOCATION, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use schedule_lens_core::present::html;
use schedule_lens_core::{RawUpload, Session};
use tracing::{debug, error, warn};
use uuid::Uuid;

/// Session key from the request cookie, if it is one we could have issued
fn session_from_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
        .map(|id| id.to_string())
}

/// Existing session key, or a new one plus the cookie that carries it
fn resolve_session(headers: &HeaderMap) -> (String, Option<HeaderValue>) {
    if let Some(key) = session_from_cookie(headers) {
        return (key, None);
    }
    let key = Uuid::new_v4().to_string();
    let cookie = HeaderValue::from_str(&format!(
        "{SESSION_COOKIE}={key}; Path=/; HttpOnly; SameSite=Lax"
    ))
    .ok();
    (key, cookie)
}

fn page_response(status: StatusCode, body: String, cookie: Option<HeaderValue>) -> Response {
    let mut resp = (status, Html(body)).into_response();
    if let Some(cookie) = cookie {
        resp.headers_mut().insert(SET_COOKIE, cookie);
    }
    resp
}

fn render(state: &AppState, session: &Session) -> String {
    html::render_page(session.page(), state.pipeline.policy())
}

pub(crate) async fn index_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let (key, cookie) = resolve_session(&headers);
    let session = state.sessions.get(&key).await;
    page_response(StatusCode::OK, render(&state, &session), cookie)
}

/// Read the `file` field. A part with no file name and no bytes is what a
/// browser sends when nothing was chosen.
async fn read_upload(
    multipart: &mut Multipart,
) -> Result<Option<RawUpload>, (StatusCode, String)> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (e.status(), e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| (e.status(), e.body_text()))?;
        if filename.is_empty() && bytes.is_empty() {
            continue;
        }
        upload = Some(RawUpload::new(filename, bytes.to_vec()));
    }
    Ok(upload)
}

pub(crate) async fn analyze_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    let (key, cookie) = resolve_session(&headers);

    let upload = match read_upload(&mut multipart).await {
        Ok(upload) => upload,
        Err((status, message)) => {
            warn!("Rejected upload body ({}): {}", status, message);
            return page_response(status, message, cookie);
        }
    };

    let mut session = state.sessions.get(&key).await;
    let pipeline = state.pipeline.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        let result = session.submit(&pipeline, upload);
        (session, result)
    })
    .await;

    let session = match outcome {
        Ok((session, result)) => {
            if let Err(err) = result {
                debug!("Session {} submitted without a file: {}", key, err);
            }
            session
        }
        Err(err) => {
            error!("Analysis task failed: {}", err);
            return page_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "analysis task failed".to_string(),
                cookie,
            );
        }
    };

    let body = render(&state, &session);
    state.sessions.put(&key, session).await;
    page_response(StatusCode::OK, body, cookie)
}

pub(crate) async fn reset_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let (key, cookie) = resolve_session(&headers);
    let mut session = state.sessions.get(&key).await;
    session.reset();
    state.sessions.put(&key, session).await;

    let mut resp = StatusCode::SEE_OTHER.into_response();
    resp.headers_mut().insert(LOCATION, HeaderValue::from_static("/"));
    if let Some(cookie) = cookie {
        resp.headers_mut().insert(SET_COOKIE, cookie);
    }
    resp
}

pub(crate) async fn healthz_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
