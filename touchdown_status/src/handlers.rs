use axum::{
    extract::Path,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Extension,
};
use touchdown_twitch::Writer;

use crate::Landing;

pub(super) async fn landing(
    Extension(writer): Extension<Writer>,
    Path((name, guess, actual)): Path<(String, String, String)>,
) -> Response {
    log::info!("GET /landing/{name}/{guess}/{actual}");

    let landing = match Landing::parse(&name, &guess, &actual) {
        Ok(landing) => landing,
        Err(err) => {
            log::warn!("rejecting landing: {err}");
            return (StatusCode::BAD_REQUEST, err.to_string()).into_response();
        }
    };

    if let Err(err) = writer.say(&landing.announcement()).await {
        log::error!("cannot announce the landing: {err}");
        return (StatusCode::SERVICE_UNAVAILABLE, "the chat connection is gone").into_response();
    }

    ok()
}

pub(super) async fn fallback(method: Method, uri: Uri) -> Response {
    log::info!("{method} {}", uri.path());
    if method != Method::GET && method != Method::HEAD {
        return not_implemented().await;
    }
    ok()
}

pub(super) async fn not_implemented() -> Response {
    (StatusCode::NOT_IMPLEMENTED, "unsupported method").into_response()
}

fn ok() -> Response {
    (StatusCode::OK, "").into_response()
}
