//! Axum glue for the three routes.
//!
//! Each function adapts an HTTP request to its handler and turns the result
//! back into a response. The handlers themselves know nothing about axum
//! routing.

use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::{Method, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use percent_encoding::percent_decode_str;

use crate::echo::EchoRequest;
use crate::http::request::RequestIdExt;
use crate::http::server::AppState;

/// Upload form (GET) and upload processing (POST).
pub async fn upload_page(State(state): State<AppState>, request: Request) -> Html<String> {
    let method = request.method().clone();
    let request_id = request.request_id().to_string();

    let multipart = if method == Method::POST {
        match Multipart::from_request(request, &state).await {
            Ok(multipart) => Some(multipart),
            Err(rejection) => {
                tracing::debug!(request_id = %request_id, error = %rejection, "Upload body is not multipart");
                None
            }
        }
    } else {
        None
    };

    Html(state.upload.handle(&method, multipart).await.render())
}

/// Echo page for the route itself.
pub async fn echo_page(State(state): State<AppState>, request: Request) -> Html<String> {
    echo(state, None, request).await
}

/// Echo page for anything below the route, including a bare trailing `/`.
///
/// The tail is read from the raw path and decoded lossily, so bytes that are
/// not UTF-8 never turn into a rejection.
pub async fn echo_page_with_path(State(state): State<AppState>, request: Request) -> Html<String> {
    let path_info = path_below(request.uri().path(), state.echo.script_name());
    echo(state, path_info, request).await
}

/// Decoded remainder of `path` after `route`, with its leading `/`.
fn path_below(path: &str, route: &str) -> Option<String> {
    let tail = path.strip_prefix(route.trim_end_matches('/'))?;
    if tail.is_empty() {
        return None;
    }
    Some(percent_decode_str(tail).decode_utf8_lossy().into_owned())
}

async fn echo(state: AppState, path_info: Option<String>, request: Request) -> Html<String> {
    let echo_request = EchoRequest::collect(request, path_info, state.max_body_size).await;
    Html(state.echo.handle(&echo_request))
}

/// Post the configured fields to the configured endpoint and relay the body.
pub async fn post_direct(State(state): State<AppState>) -> Response {
    match state.poster.post_form(state.poster_fields.iter()).await {
        Ok(body) => Html(body).into_response(),
        Err(e) => {
            tracing::error!(error = %e, endpoint = %state.poster.endpoint(), "Form post failed");
            (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
        }
    }
}
