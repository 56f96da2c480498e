//! Shared fixtures for integration tests.

#![allow(dead_code)]

// std
use std::sync::Arc;
// crates.io
use parking_lot::Mutex;
// self
use jiepang::{
	Client, ClientConfig, Credentials,
	error::TransportError,
	http::{ApiHttpClient, ApiRequest, ApiResponse, TransportFuture},
};

/// Transport that records every request and replies with a canned response.
#[derive(Debug)]
pub struct RecordingHttpClient {
	response: ApiResponse,
	requests: Mutex<Vec<ApiRequest>>,
}
impl RecordingHttpClient {
	pub fn replying(status: u16, body: &str) -> Self {
		Self { response: ApiResponse::new(status, body), requests: Mutex::default() }
	}

	pub fn ok_json(body: &str) -> Self {
		Self::replying(200, body)
	}

	pub fn requests(&self) -> Vec<ApiRequest> {
		self.requests.lock().clone()
	}

	pub fn call_count(&self) -> usize {
		self.requests.lock().len()
	}
}
impl ApiHttpClient for RecordingHttpClient {
	fn execute(&self, request: ApiRequest) -> TransportFuture<'_, ApiResponse> {
		self.requests.lock().push(request);

		let response = self.response.clone();

		Box::pin(async move { Ok(response) })
	}
}

/// Transport that always fails at the network level.
#[derive(Debug, Default)]
pub struct UnreachableHttpClient;
impl ApiHttpClient for UnreachableHttpClient {
	fn execute(&self, _request: ApiRequest) -> TransportFuture<'_, ApiResponse> {
		Box::pin(async {
			Err(TransportError::Io(std::io::Error::new(
				std::io::ErrorKind::ConnectionRefused,
				"connection refused",
			)))
		})
	}
}

/// Builds a client over `transport` pointed at a local base URL.
pub fn client_with(
	credentials: Credentials,
	transport: &Arc<RecordingHttpClient>,
) -> Client<RecordingHttpClient> {
	let config = ClientConfig::default()
		.with_base_url("http://127.0.0.1:9/")
		.expect("Local base URL should parse.");

	Client::<RecordingHttpClient>::with_http_client(credentials, Arc::clone(transport))
		.with_config(config)
}

/// Builds a reqwest transport that accepts the self-signed certificates served by `httpmock`.
#[cfg(feature = "reqwest")]
pub fn test_reqwest_http_client() -> jiepang::http::ReqwestHttpClient {
	let client = jiepang::reqwest::Client::builder()
		.danger_accept_invalid_certs(true)
		.danger_accept_invalid_hostnames(true)
		.build()
		.expect("Insecure reqwest client for tests should build.");

	jiepang::http::ReqwestHttpClient::with_client(client)
}
