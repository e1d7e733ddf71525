//! Echo page rendering.

use std::path::Path;

use axum::http::{Method, Version};

use crate::config::EchoConfig;
use crate::echo::request::EchoRequest;
use crate::http::html;

/// Renders request metadata as an HTML page.
#[derive(Debug, Clone)]
pub struct EchoHandler {
    config: EchoConfig,
    handler_file: String,
}

impl EchoHandler {
    pub fn new(config: EchoConfig) -> Self {
        let handler_file = match std::env::current_exe() {
            Ok(path) => path.display().to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "Cannot resolve executable path");
                "unknown".to_string()
            }
        };
        Self {
            config,
            handler_file,
        }
    }

    /// The route this handler is mounted on.
    pub fn script_name(&self) -> &str {
        &self.config.route
    }

    /// Document root joined with the script name.
    pub fn script_filename(&self) -> String {
        let relative = self.config.route.trim_start_matches('/');
        self.config.document_root.join(relative).display().to_string()
    }

    pub fn document_root(&self) -> &Path {
        &self.config.document_root
    }

    pub fn handle(&self, request: &EchoRequest) -> String {
        let mut body = String::new();

        line(&mut body, "REQUEST_URI", &request.request_uri);
        if let Some(path_info) = &request.path_info {
            line(&mut body, "PATH_INFO", path_info);
        }
        if let Some(query) = &request.query_string {
            line(&mut body, "QUERY_STRING", query);
        }
        line(&mut body, "SCRIPT_NAME", self.script_name());
        let request_path = format!(
            "{}{}",
            self.script_name(),
            request.path_info.as_deref().unwrap_or_default()
        );
        line(&mut body, "REQUEST_PATH", &request_path);
        body.push_str("<hr>\n");

        line(&mut body, "SERVER_PROTOCOL", protocol(request.version));
        line(&mut body, "REQUEST_METHOD", request.method.as_str());
        if request.method == Method::GET || request.method == Method::POST {
            for (key, value) in request.params.iter() {
                body.push_str(&html::escape(&format!("{}={}", key, value)));
                body.push_str("<br>\n");
            }
        }
        body.push_str("<hr>\n");

        line(&mut body, "DOCUMENT_ROOT", &self.document_root().display().to_string());
        line(&mut body, "SCRIPT_FILENAME", &self.script_filename());
        line(&mut body, "HANDLER_FILE", &self.handler_file);

        html::document("Submit", &body)
    }
}

fn protocol(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "HTTP/0.9",
        Version::HTTP_10 => "HTTP/1.0",
        Version::HTTP_11 => "HTTP/1.1",
        Version::HTTP_2 => "HTTP/2.0",
        Version::HTTP_3 => "HTTP/3.0",
        _ => "HTTP/1.1",
    }
}

fn line(out: &mut String, label: &str, value: &str) {
    out.push_str(label);
    out.push_str(": ");
    out.push_str(&html::escape(value));
    out.push_str("<br>\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::echo::params::Params;
    use std::path::PathBuf;

    fn handler() -> EchoHandler {
        EchoHandler::new(EchoConfig {
            route: "/submit".into(),
            document_root: PathBuf::from("/srv/www"),
        })
    }

    #[test]
    fn test_lists_request_metadata() {
        let request = EchoRequest {
            method: Method::GET,
            version: Version::HTTP_11,
            request_uri: "/submit/extra?a=1".into(),
            path_info: Some("/extra".into()),
            query_string: Some("a=1".into()),
            params: Params::parse(b"a=1"),
        };

        let page = handler().handle(&request);
        assert!(page.contains("REQUEST_URI: /submit/extra?a=1<br>\n"));
        assert!(page.contains("PATH_INFO: /extra<br>\n"));
        assert!(page.contains("QUERY_STRING: a=1<br>\n"));
        assert!(page.contains("SCRIPT_NAME: /submit<br>\n"));
        assert!(page.contains("REQUEST_PATH: /submit/extra<br>\n"));
        assert!(page.contains("SERVER_PROTOCOL: HTTP/1.1<br>\n"));
        assert!(page.contains("REQUEST_METHOD: GET<br>\n"));
        assert!(page.contains("<br>\na=1<br>\n<hr>\n"));
        assert!(page.contains("DOCUMENT_ROOT: /srv/www<br>\n"));
        assert!(page.contains("SCRIPT_FILENAME: /srv/www/submit<br>\n"));
        assert!(page.contains("HANDLER_FILE: "));
    }

    #[test]
    fn test_absent_optional_lines_are_omitted() {
        let request = EchoRequest {
            request_uri: "/submit".into(),
            ..EchoRequest::default()
        };

        let page = handler().handle(&request);
        assert!(!page.contains("PATH_INFO"));
        assert!(!page.contains("QUERY_STRING"));
        assert!(page.contains("REQUEST_PATH: /submit<br>\n"));
    }

    #[test]
    fn test_everything_is_escaped() {
        let mut params = Params::new();
        params.insert("q".into(), "<script>alert(1)</script>".into());
        let request = EchoRequest {
            method: Method::POST,
            request_uri: "/submit/<img>".into(),
            path_info: Some("/<img>".into()),
            params,
            ..EchoRequest::default()
        };

        let page = handler().handle(&request);
        assert!(!page.contains("<script>"));
        assert!(!page.contains("<img>"));
        assert!(page.contains("q=&lt;script&gt;alert(1)&lt;/script&gt;<br>"));
        assert!(page.contains("PATH_INFO: /&lt;img&gt;<br>"));
    }

    #[test]
    fn test_protocol_strings() {
        assert_eq!(protocol(Version::HTTP_10), "HTTP/1.0");
        assert_eq!(protocol(Version::HTTP_11), "HTTP/1.1");
        assert_eq!(protocol(Version::HTTP_2), "HTTP/2.0");

        let request = EchoRequest {
            version: Version::HTTP_10,
            request_uri: "/submit".into(),
            ..EchoRequest::default()
        };
        assert!(handler().handle(&request).contains("SERVER_PROTOCOL: HTTP/1.0<br>\n"));
    }
}
