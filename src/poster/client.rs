//! Outbound url-encoded form POST.
//!
//! # Responsibilities
//! - Serialize key/value pairs as `application/x-www-form-urlencoded`
//! - Send exactly one POST and return the response body verbatim
//! - Report transport failures and non-2xx statuses as [`NetworkError`]
//!
//! # Design Decisions
//! - No retries: the caller decides what to do with a failure
//! - No timeout unless configured; the transport default applies otherwise
//! - Environment proxies are ignored

use std::time::Duration;

use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use url::{form_urlencoded, Url};

use crate::config::PosterConfig;
use crate::observability::metrics;
use crate::poster::error::{NetworkError, NetworkResult};

/// Content type of the request body.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Serialize pairs as `key=value&key=value`, percent-encoded, spaces as `+`.
pub fn encode_form<I, K, V>(fields: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in fields {
        serializer.append_pair(key.as_ref(), value.as_ref());
    }
    serializer.finish()
}

/// Posts url-encoded forms to one endpoint.
#[derive(Debug, Clone)]
pub struct FormPoster {
    client: Client,
    endpoint: Url,
}

impl FormPoster {
    /// Create a poster for `endpoint`.
    pub fn new(endpoint: Url, timeout: Option<Duration>) -> NetworkResult<Self> {
        let mut builder = Client::builder().no_proxy();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(NetworkError::Client)?;

        Ok(Self { client, endpoint })
    }

    /// Create a poster from its configuration section.
    pub fn from_config(config: &PosterConfig) -> NetworkResult<Self> {
        let endpoint = Url::parse(&config.endpoint).map_err(|source| {
            NetworkError::InvalidEndpoint {
                endpoint: config.endpoint.clone(),
                source,
            }
        })?;
        Self::new(endpoint, config.timeout_secs.map(Duration::from_secs))
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// POST `fields` to the endpoint and return the response body.
    pub async fn post_form<I, K, V>(&self, fields: I) -> NetworkResult<String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let body = encode_form(fields);
        let result = self.send(body).await;
        metrics::record_post(if result.is_ok() { "ok" } else { "error" });
        result
    }

    async fn send(&self, body: String) -> NetworkResult<String> {
        let url = self.endpoint.to_string();
        tracing::debug!(url = %url, bytes = body.len(), "Posting form");

        let transport = |source: reqwest::Error| NetworkError::Transport {
            url: url.clone(),
            source,
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE))
            .body(body)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %url, status = %status, "Form endpoint returned an error status");
            return Err(NetworkError::Status {
                url: url.clone(),
                status,
            });
        }

        let text = response.text().await.map_err(transport)?;
        tracing::info!(url = %url, status = %status, bytes = text.len(), "Form posted");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_encode_form() {
        let body = encode_form([("name1", "value 1"), ("name2", "value 2")]);
        assert_eq!(body, "name1=value+1&name2=value+2");
    }

    #[test]
    fn test_encode_form_reserved_characters() {
        let body = encode_form([("a&b", "c=d/é")]);
        assert_eq!(body, "a%26b=c%3Dd%2F%C3%A9");
    }

    #[test]
    fn test_encoded_form_decodes_to_same_mapping() {
        let mut fields = HashMap::new();
        fields.insert("name1".to_string(), "value 1".to_string());
        fields.insert("name2".to_string(), "value 2".to_string());
        fields.insert("odd key+".to_string(), "50% & more".to_string());

        let body = encode_form(&fields);
        let decoded: HashMap<String, String> = form_urlencoded::parse(body.as_bytes())
            .into_owned()
            .collect();
        assert_eq!(decoded, fields);
    }

    #[test]
    fn test_from_config_rejects_bad_endpoint() {
        let config = PosterConfig {
            endpoint: "not a url".into(),
            ..PosterConfig::default()
        };
        let err = FormPoster::from_config(&config).unwrap_err();
        assert!(matches!(err, NetworkError::InvalidEndpoint { .. }));
    }

    #[tokio::test]
    async fn test_from_config_defaults() {
        let poster = FormPoster::from_config(&PosterConfig::default()).unwrap();
        assert_eq!(poster.endpoint().as_str(), "http://127.0.0.1:8080/submit");
    }
}
