//! Connect client and the transport it sends requests through.

use std::fmt;

use async_trait::async_trait;
use dotenv::dotenv;
use hyper::body::Bytes;
use hyper::client::HttpConnector;
use hyper::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use hyper::{Body, Method, Request, Response};
use hyper_rustls::HttpsConnector;
use log::debug;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{classify, ConnectResult, Error};
use crate::version::{require_minimum_version, Version};

/// Environment variable holding the Connect server URL.
pub const HOST_ENV: &str = "OP_CONNECT_HOST";
/// Environment variable holding the Connect access token.
pub const TOKEN_ENV: &str = "OP_CONNECT_TOKEN";
/// Environment variable overriding the user agent.
pub const USER_AGENT_ENV: &str = "OP_CONNECT_USER_AGENT";

/// User agent sent unless overridden.
pub fn default_user_agent() -> String {
    format!("connect-sdk-rust/{}", env!("CARGO_PKG_VERSION"))
}

/// Performs a single HTTP exchange.
///
/// Implement this to replace [`hyper`]: the request arrives fully formed
/// (URL, credentials, body) and the raw response is expected back. A failure
/// to complete the exchange should be reported as [`Error::Transport`].
#[async_trait]
pub trait HTTPClient: Send + Sync {
    /// Sends `request` and returns the server's response.
    async fn execute(&self, request: Request<Body>) -> ConnectResult<Response<Body>>;
}

/// Default transport: [`hyper`] over rustls with the platform's root certificates.
pub struct HyperClient {
    inner: hyper::Client<HttpsConnector<HttpConnector>, Body>,
}

impl HyperClient {
    /// Builds a transport trusting the platform certificate store.
    pub fn new() -> ConnectResult<Self> {
        let certs = rustls_native_certs::load_native_certs()
            .map_err(|err| Error::Config(format!("unable to load root certificates: {}", err)))?;
        let ders: Vec<Vec<u8>> = certs.iter().map(|cert| cert.to_vec()).collect();

        let mut roots = rustls::RootCertStore::empty();
        let (added, _ignored) = roots.add_parsable_certificates(&ders);
        if added == 0 {
            return Err(Error::Config("no usable root certificates found".to_string()));
        }

        let tls = rustls::ClientConfig::builder()
            .with_safe_defaults()
            .with_root_certificates(roots)
            .with_no_client_auth();

        let https = hyper_rustls::HttpsConnectorBuilder::new()
            .with_tls_config(tls)
            .https_or_http()
            .enable_http1()
            .enable_http2()
            .build();

        Ok(Self {
            inner: hyper::Client::builder().build(https),
        })
    }
}

impl fmt::Debug for HyperClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HyperClient").finish_non_exhaustive()
    }
}

#[async_trait]
impl HTTPClient for HyperClient {
    async fn execute(&self, request: Request<Body>) -> ConnectResult<Response<Body>> {
        Ok(self.inner.request(request).await?)
    }
}

/// Handle on a Connect server.
///
/// Holds no mutable state after construction, so one instance can be shared
/// by concurrent callers.
pub struct Client<T: HTTPClient = HyperClient> {
    host: String,
    token: String,
    user_agent: String,
    transport: T,
}

impl Client<HyperClient> {
    /// Client for `host` authenticating with `token`.
    pub fn new(host: &str, token: &str) -> ConnectResult<Self> {
        Self::with_user_agent(host, token, &default_user_agent())
    }

    /// Like [`new`](Self::new) with a custom user agent.
    pub fn with_user_agent(host: &str, token: &str, user_agent: &str) -> ConnectResult<Self> {
        let mut client = Self::with_transport(host, token, HyperClient::new()?);
        client.user_agent = user_agent.to_string();
        Ok(client)
    }

    /// Client configured from `OP_CONNECT_HOST` and `OP_CONNECT_TOKEN`,
    /// reading a `.env` file first if one exists.
    pub fn from_env() -> ConnectResult<Self> {
        dotenv().ok();
        let (host, token, user_agent) = settings_from(|key| std::env::var(key).ok())?;
        Self::with_user_agent(&host, &token, &user_agent)
    }
}

impl<T: HTTPClient> Client<T> {
    /// Client sending its requests through `transport`.
    pub fn with_transport(host: &str, token: &str, transport: T) -> Self {
        Self {
            host: host.trim_end_matches('/').to_string(),
            token: token.to_string(),
            user_agent: default_user_agent(),
            transport,
        }
    }

    /// Server URL requests are sent to.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// User agent sent with every request.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Joins `path` onto the host. An absolute URL is only accepted when it
    /// already points at the host.
    pub(crate) fn url(&self, path: &str) -> ConnectResult<String> {
        let relative = if path.starts_with("http://") || path.starts_with("https://") {
            match path.strip_prefix(self.host.as_str()) {
                Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
                _ => return Err(Error::ForeignLocation(path.to_string())),
            }
        } else {
            path
        };
        Ok(format!("{}/{}", self.host, relative.trim_start_matches('/')))
    }

    pub(crate) fn build_request(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> ConnectResult<Request<Body>> {
        let builder = Request::builder()
            .method(method)
            .uri(self.url(path)?)
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(USER_AGENT, self.user_agent.as_str());

        let request = match body {
            Some(bytes) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(bytes))?,
            None => builder.body(Body::empty())?,
        };

        Ok(request)
    }

    /// One exchange: send, optionally gate on the server version, classify.
    pub(crate) async fn exchange(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
        minimum: Option<Version>,
    ) -> ConnectResult<Bytes> {
        debug!("{} {}", method, path);
        let request = self.build_request(method, path, body)?;
        let response = self.transport.execute(request).await?;

        if let Some(minimum) = minimum {
            require_minimum_version(&response, minimum)?;
        }

        classify(response).await
    }

    pub(crate) async fn get_json<R: DeserializeOwned>(
        &self,
        path: &str,
        minimum: Option<Version>,
    ) -> ConnectResult<R> {
        let body = self.exchange(Method::GET, path, None, minimum).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    pub(crate) async fn send_json<B: Serialize, R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        payload: &B,
        minimum: Option<Version>,
    ) -> ConnectResult<R> {
        let encoded = serde_json::to_vec(payload)?;
        let body = self.exchange(method, path, Some(encoded), minimum).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    pub(crate) async fn get_bytes(
        &self,
        path: &str,
        minimum: Option<Version>,
    ) -> ConnectResult<Vec<u8>> {
        let body = self.exchange(Method::GET, path, None, minimum).await?;
        Ok(body.to_vec())
    }

    pub(crate) async fn delete(&self, path: &str, minimum: Option<Version>) -> ConnectResult<()> {
        self.exchange(Method::DELETE, path, None, minimum).await?;
        Ok(())
    }
}

impl<T: HTTPClient> fmt::Debug for Client<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("host", &self.host)
            .field("token", &"<redacted>")
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

/// Query string asking the server to filter by exact title.
pub(crate) fn title_filter(title: &str) -> String {
    let filter = format!("title eq \"{}\"", title);
    format!("filter={}", utf8_percent_encode(&filter, NON_ALPHANUMERIC))
}

/// Rejects an empty identifier before anything is sent.
pub(crate) fn require_id(id: &str, what: &'static str) -> ConnectResult<()> {
    if id.is_empty() {
        Err(Error::MissingIdentifier(what))
    } else {
        Ok(())
    }
}

fn settings_from<F>(lookup: F) -> ConnectResult<(String, String, String)>
where
    F: Fn(&str) -> Option<String>,
{
    let required = |key: &str| {
        lookup(key)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| Error::Config(format!("{} is not set", key)))
    };

    let host = required(HOST_ENV)?;
    let token = required(TOKEN_ENV)?;
    let user_agent = lookup(USER_AGENT_ENV)
        .filter(|value| !value.is_empty())
        .unwrap_or_else(default_user_agent);

    Ok((host, token, user_agent))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{json_response, FakeTransport, VALID_HOST, VALID_TOKEN};
    use crate::version::VERSION_HEADER;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn settings_require_host_and_token() {
        let missing_host = settings_from(lookup(&[(TOKEN_ENV, VALID_TOKEN)])).unwrap_err();
        assert!(matches!(missing_host, Error::Config(ref m) if m.contains(HOST_ENV)));

        let missing_token = settings_from(lookup(&[(HOST_ENV, VALID_HOST), (TOKEN_ENV, "")]))
            .unwrap_err();
        assert!(matches!(missing_token, Error::Config(ref m) if m.contains(TOKEN_ENV)));
    }

    #[test]
    fn settings_from_environment() {
        let (host, token, agent) =
            settings_from(lookup(&[(HOST_ENV, VALID_HOST), (TOKEN_ENV, VALID_TOKEN)])).unwrap();
        assert_eq!(host, VALID_HOST);
        assert_eq!(token, VALID_TOKEN);
        assert_eq!(agent, default_user_agent());

        let (_, _, agent) = settings_from(lookup(&[
            (HOST_ENV, VALID_HOST),
            (TOKEN_ENV, VALID_TOKEN),
            (USER_AGENT_ENV, "testSuite"),
        ]))
        .unwrap();
        assert_eq!(agent, "testSuite");
    }

    #[test]
    fn debug_output_hides_token() {
        let client = Client::with_transport(VALID_HOST, VALID_TOKEN, FakeTransport::default());
        let printed = format!("{:?}", client);
        assert!(printed.contains(VALID_HOST));
        assert!(!printed.contains(VALID_TOKEN));
    }

    #[test]
    fn urls_join_host_and_path() {
        let client = Client::with_transport(
            "http://localhost:8080/",
            VALID_TOKEN,
            FakeTransport::default(),
        );
        assert_eq!(client.host(), "http://localhost:8080");
        assert_eq!(client.url("/v1/vaults").unwrap(), "http://localhost:8080/v1/vaults");
        assert_eq!(client.url("v1/vaults").unwrap(), "http://localhost:8080/v1/vaults");
        assert_eq!(
            client.url("http://localhost:8080/v1/files/1/content").unwrap(),
            "http://localhost:8080/v1/files/1/content"
        );
        assert!(matches!(
            client.url("https://files.example.com/content/1"),
            Err(Error::ForeignLocation(_))
        ));
        assert!(matches!(
            client.url("http://localhost:8080.evil.example/v1"),
            Err(Error::ForeignLocation(_))
        ));
    }

    #[test]
    fn title_filter_is_encoded() {
        assert_eq!(
            title_filter("Test Vault"),
            "filter=title%20eq%20%22Test%20Vault%22"
        );
    }

    #[tokio::test]
    async fn requests_carry_credentials_and_agent() {
        let transport = FakeTransport::new(|_| json_response(200, &serde_json::json!([])));
        let client = Client::with_transport(VALID_HOST, VALID_TOKEN, transport.clone());

        let _: Vec<serde_json::Value> = client.get_json("/v1/vaults", None).await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.uri, format!("{}/v1/vaults", VALID_HOST));
        assert_eq!(
            request.header(AUTHORIZATION.as_str()),
            Some(format!("Bearer {}", VALID_TOKEN))
        );
        assert_eq!(request.header(USER_AGENT.as_str()), Some(default_user_agent()));
        assert_eq!(request.header(CONTENT_TYPE.as_str()), None);
    }

    #[tokio::test]
    async fn version_gate_runs_before_classification() {
        let transport = FakeTransport::new(|_| {
            let body = serde_json::json!({"status": 404, "message": "Not Found"});
            let mut response = json_response(404, &body);
            response
                .headers_mut()
                .insert(VERSION_HEADER, "1.1.0".parse().unwrap());
            response
        });
        let client = Client::with_transport(VALID_HOST, VALID_TOKEN, transport);

        let err = client
            .exchange(Method::GET, "/v1/anything", None, Some(Version::new(1, 3, 0)))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::VersionTooLow { .. }));
    }

    #[tokio::test]
    async fn transport_failure_is_passed_through() {
        let client = Client::with_transport(VALID_HOST, VALID_TOKEN, FakeTransport::unreachable());
        let err = client.delete("/v1/vaults/v/items/i", None).await.unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
    }
}
