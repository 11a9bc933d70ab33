//! ViaCEP API client.
//!
//! ### Protocol
//!
//! - **Endpoint**: `GET {base_url}/ws/{cep}/json/`
//! - **Not found**: HTTP 200 with `{"erro": true}` (sometimes `"true"`).
//! - **Timeouts**: bounded by `ViaCepConfig::timeout`; no retries.
//! - **Normalization**: payload fields map 1:1 onto `ProviderAddress`.

pub mod error;
pub mod response;

pub use error::ViaCepError;
pub use response::{ErroFlag, ViaCepPayload};

use std::sync::Arc;
use std::time::{Duration, Instant};

use cep_core::{AppConfig, Cep, PostalLookup, ProviderError, ProviderReply};
use reqwest::header;
use url::Url;

/// Default base URL for ViaCEP.
const DEFAULT_BASE_URL: &str = "https://viacep.com.br";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "cep-cache/0.1";

/// ViaCEP client configuration.
#[derive(Debug, Clone)]
pub struct ViaCepConfig {
    /// Base URL (default: https://viacep.com.br).
    pub base_url: String,
    /// Request timeout (default: 5s).
    pub timeout: Duration,
    /// User-agent string (default: cep-cache/0.x).
    pub user_agent: String,
}

impl Default for ViaCepConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl From<&AppConfig> for ViaCepConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            base_url: config.viacep_base_url.clone(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
        }
    }
}

/// ViaCEP API client.
#[derive(Debug, Clone)]
pub struct ViaCepClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ViaCepClient {
    /// Create a new ViaCEP client with the given configuration.
    pub fn new(config: ViaCepConfig) -> Result<Self, ViaCepError> {
        let mut base_url = Url::parse(&config.base_url).map_err(|e| ViaCepError::InvalidBaseUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ViaCepError::InvalidBaseUrl(config.base_url));
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .use_rustls_tls()
            .build()
            .map_err(|e| ViaCepError::Client(Arc::new(e)))?;

        Ok(Self { http, base_url })
    }

    /// URL queried for `cep`.
    pub fn endpoint(&self, cep: &Cep) -> Result<Url, ViaCepError> {
        self.base_url
            .join(&format!("ws/{cep}/json/"))
            .map_err(|e| ViaCepError::InvalidBaseUrl(e.to_string()))
    }

    /// Look a CEP up.
    ///
    /// One request, no retries. Non-2xx statuses are errors; a 2xx body
    /// carrying the `erro` flag is `ProviderReply::NotFound`.
    pub async fn lookup(&self, cep: &Cep) -> Result<ProviderReply, ViaCepError> {
        let start = Instant::now();
        let url = self.endpoint(cep)?;

        tracing::debug!("querying ViaCEP: url={}", url);

        let http_response = self
            .http
            .get(url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = http_response.status();
        tracing::debug!("ViaCEP response status: {}", status);

        if !status.is_success() {
            return Err(ViaCepError::HttpError { status: status.as_u16() });
        }

        let bytes = http_response.bytes().await?;
        let payload: ViaCepPayload = serde_json::from_slice(&bytes).map_err(|e| ViaCepError::Parse(e.to_string()))?;
        let reply = payload.into_reply()?;

        tracing::debug!(
            cep = %cep,
            found = matches!(reply, ProviderReply::Found(_)),
            "ViaCEP lookup completed in {:?}",
            start.elapsed()
        );

        Ok(reply)
    }
}

#[async_trait::async_trait]
impl PostalLookup for ViaCepClient {
    async fn fetch(&self, cep: &Cep) -> Result<ProviderReply, ProviderError> {
        self.lookup(cep).await.map_err(ProviderError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cep_core::validate;
    use httpmock::prelude::*;

    fn client_for(server: &MockServer) -> ViaCepClient {
        ViaCepClient::new(ViaCepConfig {
            base_url: server.base_url(),
            timeout: Duration::from_millis(500),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint_default_base() {
        let client = ViaCepClient::new(ViaCepConfig::default()).unwrap();
        let url = client.endpoint(&validate("01001000").unwrap()).unwrap();
        assert_eq!(url.as_str(), "https://viacep.com.br/ws/01001000/json/");
    }

    #[test]
    fn test_endpoint_base_with_path() {
        let config = ViaCepConfig { base_url: "http://proxy.local/viacep".into(), ..Default::default() };
        let client = ViaCepClient::new(config).unwrap();
        let url = client.endpoint(&validate("01001000").unwrap()).unwrap();
        assert_eq!(url.as_str(), "http://proxy.local/viacep/ws/01001000/json/");
    }

    #[test]
    fn test_invalid_base_url() {
        let config = ViaCepConfig { base_url: "not a url".into(), ..Default::default() };
        assert!(matches!(ViaCepClient::new(config), Err(ViaCepError::InvalidBaseUrl(_))));
    }

    #[test]
    fn test_config_from_app_config() {
        let app = AppConfig { timeout_ms: 1234, ..Default::default() };
        let config = ViaCepConfig::from(&app);
        assert_eq!(config.timeout, Duration::from_millis(1234));
        assert_eq!(config.base_url, "https://viacep.com.br");
    }

    #[tokio::test]
    async fn test_lookup_found() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/ws/87654321/json/");
                then.status(200).header("content-type", "application/json").json_body(serde_json::json!({
                    "cep": "87654-321",
                    "logradouro": "Rua Nova",
                    "complemento": "Casa",
                    "bairro": "Bairro Novo",
                    "localidade": "São Paulo",
                    "uf": "SP",
                    "ibge": "3550308"
                }));
            })
            .await;

        let reply = client_for(&server).lookup(&validate("87654321").unwrap()).await.unwrap();

        let ProviderReply::Found(address) = reply else {
            panic!("expected Found");
        };
        assert_eq!(address.cep, "87654-321");
        assert_eq!(address.street, "Rua Nova");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_lookup_not_found_flag() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/ws/99999999/json/");
                then.status(200).json_body(serde_json::json!({ "erro": true }));
            })
            .await;

        let reply = client_for(&server).lookup(&validate("99999999").unwrap()).await.unwrap();

        assert_eq!(reply, ProviderReply::NotFound);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_lookup_server_error_is_unavailable() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/ws/87654321/json/");
                then.status(503).body("Service Unavailable");
            })
            .await;

        let client = client_for(&server);
        let err = client.lookup(&validate("87654321").unwrap()).await.unwrap_err();
        assert!(matches!(err, ViaCepError::HttpError { status: 503 }));

        let err = client.fetch(&validate("87654321").unwrap()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Unavailable(_)));

        assert_eq!(mock.hits_async().await, 2);
    }

    #[tokio::test]
    async fn test_lookup_timeout_is_unavailable() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/ws/87654321/json/");
                then.status(200)
                    .delay(Duration::from_secs(2))
                    .json_body(serde_json::json!({ "erro": true }));
            })
            .await;

        let client = ViaCepClient::new(ViaCepConfig {
            base_url: server.base_url(),
            timeout: Duration::from_millis(100),
            ..Default::default()
        })
        .unwrap();

        let err = client.lookup(&validate("87654321").unwrap()).await.unwrap_err();
        assert!(matches!(err, ViaCepError::Timeout));
        assert!(matches!(ProviderError::from(err), ProviderError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_lookup_connection_refused_is_unavailable() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let client = ViaCepClient::new(ViaCepConfig { base_url, ..Default::default() }).unwrap();
        let err = client.fetch(&validate("87654321").unwrap()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_lookup_garbage_body_is_malformed() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/ws/87654321/json/");
                then.status(200).body("<html>maintenance</html>");
            })
            .await;

        let err = client_for(&server).fetch(&validate("87654321").unwrap()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Malformed(_)));
    }
}
