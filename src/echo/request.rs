//! Collecting echo metadata from an inbound request.

use axum::body::{self, Body};
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::{header, HeaderMap, Method, Version};

use crate::echo::params::Params;

/// Everything the echo page reports about one request.
#[derive(Debug, Clone, Default)]
pub struct EchoRequest {
    pub method: Method,
    pub version: Version,
    /// Path and query as sent.
    pub request_uri: String,
    /// Decoded path below the echo route, with a leading `/`.
    pub path_info: Option<String>,
    /// Raw query string, when the target had one.
    pub query_string: Option<String>,
    /// Query parameters for GET, body parameters for POST.
    pub params: Params,
}

impl EchoRequest {
    /// Read metadata and parameters. Bodies larger than `body_limit` or in an
    /// unsupported encoding contribute no parameters.
    pub async fn collect(request: Request, path_info: Option<String>, body_limit: usize) -> Self {
        let method = request.method().clone();
        let version = request.version();
        let uri = request.uri();
        let request_uri = uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| uri.path().to_string());
        let query_string = uri.query().map(str::to_string);

        let params = if method == Method::GET {
            Params::parse(query_string.as_deref().unwrap_or_default().as_bytes())
        } else if method == Method::POST {
            body_params(request, body_limit).await
        } else {
            Params::new()
        };

        Self {
            method,
            version,
            request_uri,
            path_info,
            query_string,
            params,
        }
    }
}

fn content_type(headers: &HeaderMap) -> String {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|v| v.trim().to_ascii_lowercase())
        .unwrap_or_default()
}

async fn body_params(request: Request, body_limit: usize) -> Params {
    match content_type(request.headers()).as_str() {
        "application/x-www-form-urlencoded" => {
            match body::to_bytes(request.into_body(), body_limit).await {
                Ok(bytes) => Params::parse(&bytes),
                Err(e) => {
                    tracing::warn!(error = %e, "Cannot read form body");
                    Params::new()
                }
            }
        }
        "multipart/form-data" => multipart_params(request).await,
        other => {
            tracing::debug!(content_type = %other, "No parameters read from body");
            Params::new()
        }
    }
}

/// Text fields of a multipart body. File parts are skipped.
async fn multipart_params(request: Request<Body>) -> Params {
    let mut params = Params::new();
    let mut multipart = match Multipart::from_request(request, &()).await {
        Ok(multipart) => multipart,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Cannot read multipart body");
            return params;
        }
    };

    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                if field.file_name().is_some() {
                    continue;
                }
                let Some(name) = field.name().map(str::to_string) else {
                    continue;
                };
                match field.text().await {
                    Ok(value) => params.insert(name, value),
                    Err(e) => {
                        tracing::warn!(error = %e, field = %name, "Cannot read multipart field");
                        break;
                    }
                }
            }
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "Multipart body broke");
                break;
            }
        }
    }
    params
}
