//! Transport primitives for remote method calls.
//!
//! The dispatcher describes every outbound call as an [`ApiRequest`] and expects an
//! [`ApiResponse`] back. [`ApiHttpClient`] is the only dependency on an HTTP stack, so custom
//! transports (or recording fakes in tests) plug in without touching the dispatcher.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// self
use crate::{_prelude::*, error::TransportError};

/// Boxed future returned by [`ApiHttpClient::execute`].
pub type TransportFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, TransportError>> + 'a + Send>>;

/// HTTP verbs used by the remote service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
	/// Read-only call; parameters travel in the query string.
	Get,
	/// Mutating call; parameters travel in the query string and the form body.
	Post,
}
impl HttpMethod {
	/// Returns the canonical verb label.
	pub const fn as_str(self) -> &'static str {
		match self {
			HttpMethod::Get => "GET",
			HttpMethod::Post => "POST",
		}
	}
}
impl Display for HttpMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// An HTTP request described as plain data.
///
/// Built by [`Client::prepare`](crate::client::Client::prepare); transports execute it
/// verbatim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiRequest {
	/// HTTP verb.
	pub method: HttpMethod,
	/// Fully resolved URL, query string included.
	pub url: Url,
	/// Header pairs in insertion order.
	pub headers: Vec<(String, String)>,
	/// Form-encoded body for POST requests.
	pub body: Option<String>,
	/// Upper bound for the whole round-trip, when configured.
	pub timeout: Option<Duration>,
}
impl ApiRequest {
	/// Returns the value of the first header matching `name` (ASCII case-insensitive).
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers
			.iter()
			.find(|(key, _)| key.eq_ignore_ascii_case(name))
			.map(|(_, value)| value.as_str())
	}

	/// Returns the decoded query parameters in the order they appear in the URL.
	pub fn query_pairs(&self) -> Vec<(String, String)> {
		self.url.query_pairs().into_owned().collect()
	}
}

/// An HTTP response described as plain data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: u16,
	/// Raw response body.
	pub body: String,
}
impl ApiResponse {
	/// Convenience constructor.
	pub fn new(status: u16, body: impl Into<String>) -> Self {
		Self { status, body: body.into() }
	}
}

/// Abstraction over HTTP transports capable of executing remote method calls.
///
/// Implementations must be `Send + Sync + 'static` so a single transport can be shared behind
/// an [`Arc`] by any number of clients. Non-200 statuses are data, not errors: transports only
/// fail for network-level problems and leave status interpretation to the dispatcher.
pub trait ApiHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Executes `request` and returns the raw status and body.
	fn execute(&self, request: ApiRequest) -> TransportFuture<'_, ApiResponse>;
}
impl<T> ApiHttpClient for Arc<T>
where
	T: ?Sized + ApiHttpClient,
{
	fn execute(&self, request: ApiRequest) -> TransportFuture<'_, ApiResponse> {
		(**self).execute(request)
	}
}

/// Stock transport backed by a shared [`ReqwestClient`] connection pool.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client that enforces `timeout` on every request, even when the request itself
	/// does not carry one.
	pub fn with_timeout(timeout: Duration) -> Result<Self> {
		let client = ReqwestClient::builder()
			.timeout(timeout)
			.build()
			.map_err(crate::error::ConfigError::from)?;

		Ok(Self(client))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiHttpClient for ReqwestHttpClient {
	fn execute(&self, request: ApiRequest) -> TransportFuture<'_, ApiResponse> {
		let client = self.0.clone();

		Box::pin(async move {
			let ApiRequest { method, url, headers, body, timeout } = request;
			let mut builder = match method {
				HttpMethod::Get => client.get(url),
				HttpMethod::Post => client.post(url),
			};

			for (name, value) in headers {
				builder = builder.header(name, value);
			}
			if let Some(body) = body {
				builder = builder.body(body);
			}
			if let Some(timeout) = timeout {
				builder = builder.timeout(timeout);
			}

			let response = builder.send().await?;
			let status = response.status().as_u16();
			let body = response.text().await?;

			Ok::<_, TransportError>(ApiResponse { status, body })
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn request() -> ApiRequest {
		ApiRequest {
			method: HttpMethod::Post,
			url: Url::parse("http://api.jiepang.com/v1/checkin?source=checkinsync&vid=123")
				.expect("Request URL fixture should parse."),
			headers: vec![
				("Content-Type".into(), "application/x-www-form-urlencoded".into()),
				("Accept".into(), "text/plain".into()),
			],
			body: Some("source=checkinsync&vid=123".into()),
			timeout: None,
		}
	}

	#[test]
	fn header_lookup_ignores_case() {
		let request = request();

		assert_eq!(request.header("content-type"), Some("application/x-www-form-urlencoded"));
		assert_eq!(request.header("ACCEPT"), Some("text/plain"));
		assert_eq!(request.header("authorization"), None);
	}

	#[test]
	fn query_pairs_decode_in_order() {
		assert_eq!(
			request().query_pairs(),
			vec![("source".into(), "checkinsync".into()), ("vid".into(), "123".into())]
		);
	}

	#[cfg(feature = "reqwest")]
	#[test]
	fn reqwest_transport_builds_with_client_timeout() {
		let http_client = ReqwestHttpClient::with_timeout(Duration::from_secs(5))
			.expect("Client with a timeout should build.");
		let request = http_client.get("http://api.jiepang.com/v1/cities").build();

		assert!(request.is_ok());
	}

	#[test]
	fn verbs_render_uppercase() {
		assert_eq!(HttpMethod::Get.to_string(), "GET");
		assert_eq!(
			serde_json::to_string(&HttpMethod::Post).expect("Verb should serialize."),
			"\"POST\""
		);
	}
}
