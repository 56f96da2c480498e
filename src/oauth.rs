//! OAuth 2.0 authorization-code helper.
//!
//! The helper only builds the two URLs of the handshake and performs the code exchange; the
//! returned token is meant to be wrapped with [`Credentials::bearer`](crate::Credentials::bearer).

// self
use crate::{
	_prelude::*,
	config::DEFAULT_TIMEOUT,
	credentials::Secret,
	error::OAuthError,
	http::{ApiHttpClient, ApiRequest, ApiResponse, HttpMethod},
};

/// Label reported by [`Error::MalformedResponse`] for token endpoint responses.
pub const TOKEN_EXCHANGE: &str = "oauth.access_token";

#[derive(Deserialize)]
struct TokenResponse {
	access_token: Option<Value>,
}

/// Builds authorization and token URLs for one registered application.
#[derive(Clone)]
pub struct OAuthHelper {
	authorization_endpoint: Url,
	token_endpoint: Url,
	client_id: String,
	client_secret: Secret,
	redirect_uri: Url,
	timeout: Option<Duration>,
}
impl OAuthHelper {
	/// Creates a helper for the given endpoints and application credentials.
	pub fn new(
		authorization_endpoint: Url,
		token_endpoint: Url,
		client_id: impl Into<String>,
		client_secret: impl Into<Secret>,
		redirect_uri: Url,
	) -> Self {
		Self {
			authorization_endpoint,
			token_endpoint,
			client_id: client_id.into(),
			client_secret: client_secret.into(),
			redirect_uri,
			timeout: Some(DEFAULT_TIMEOUT),
		}
	}

	/// Overrides the timeout applied to the token exchange.
	pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
		self.timeout = timeout;

		self
	}

	/// Redirect URI registered for the application.
	pub fn redirect_uri(&self) -> &Url {
		&self.redirect_uri
	}

	/// URL the user agent is sent to in order to grant access.
	pub fn authorization_url(&self) -> Url {
		let mut url = self.authorization_endpoint.clone();

		url.query_pairs_mut()
			.append_pair("response_type", "code")
			.append_pair("client_id", &self.client_id)
			.append_pair("redirect_uri", self.redirect_uri.as_str());

		url
	}

	/// URL that exchanges `code` for an access token.
	///
	/// The client secret travels in the query string, so the result must not be logged.
	pub fn token_url(&self, code: &str) -> Url {
		let mut url = self.token_endpoint.clone();

		url.query_pairs_mut()
			.append_pair("grant_type", "authorization_code")
			.append_pair("code", code)
			.append_pair("client_id", &self.client_id)
			.append_pair("client_secret", self.client_secret.expose())
			.append_pair("redirect_uri", self.redirect_uri.as_str());

		url
	}

	/// Exchanges `code` for an access token with one GET against the token endpoint.
	pub async fn fetch_access_token<C>(&self, http_client: &C, code: &str) -> Result<Secret>
	where
		C: ?Sized + ApiHttpClient,
	{
		let request = ApiRequest {
			method: HttpMethod::Get,
			url: self.token_url(code),
			headers: Vec::new(),
			body: None,
			timeout: self.timeout,
		};
		let ApiResponse { status, body } = http_client.execute(request).await?;

		if status != 200 {
			return Err(OAuthError::TokenEndpoint { status, body }.into());
		}

		let mut deserializer = serde_json::Deserializer::from_str(&body);
		let response: TokenResponse = serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|err| Error::MalformedResponse {
				method: TOKEN_EXCHANGE.into(),
				path: err.path().to_string(),
				source: err.into_inner(),
			})?;

		// Numeric tokens are used in their decimal form.
		let token = match response.access_token {
			Some(Value::String(token)) => token,
			Some(Value::Number(token)) => token.to_string(),
			_ => String::new(),
		};

		if token.is_empty() {
			return Err(OAuthError::MissingAccessToken.into());
		}

		Ok(Secret::new(token))
	}
}
impl Debug for OAuthHelper {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OAuthHelper")
			.field("authorization_endpoint", &self.authorization_endpoint.as_str())
			.field("token_endpoint", &self.token_endpoint.as_str())
			.field("client_id", &self.client_id)
			.field("client_secret", &self.client_secret)
			.field("redirect_uri", &self.redirect_uri.as_str())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use parking_lot::Mutex;
	// self
	use super::*;
	use crate::http::TransportFuture;

	struct CannedHttpClient {
		response: ApiResponse,
		seen: Mutex<Vec<ApiRequest>>,
	}
	impl CannedHttpClient {
		fn new(status: u16, body: &str) -> Self {
			Self { response: ApiResponse::new(status, body), seen: Mutex::default() }
		}
	}
	impl ApiHttpClient for CannedHttpClient {
		fn execute(&self, request: ApiRequest) -> TransportFuture<'_, ApiResponse> {
			self.seen.lock().push(request);

			let response = self.response.clone();

			Box::pin(async move { Ok(response) })
		}
	}

	fn helper() -> OAuthHelper {
		OAuthHelper::new(
			Url::parse("https://jiepang.com/oauth/authorize").expect("Fixture URL should parse."),
			Url::parse("https://jiepang.com/oauth/token").expect("Fixture URL should parse."),
			"app-1",
			"s3cret",
			Url::parse("https://example.com/callback").expect("Fixture URL should parse."),
		)
	}

	#[test]
	fn authorization_url_lists_code_flow_parameters() {
		assert_eq!(
			helper().authorization_url().as_str(),
			"https://jiepang.com/oauth/authorize?response_type=code&client_id=app-1&redirect_uri=https%3A%2F%2Fexample.com%2Fcallback"
		);
	}

	#[test]
	fn token_url_carries_code_and_client_credentials() {
		let url = helper().token_url("abc");
		let pairs = url.query_pairs().into_owned().collect::<Vec<_>>();

		assert_eq!(url.path(), "/oauth/token");
		assert_eq!(
			pairs,
			[
				("grant_type".to_owned(), "authorization_code".to_owned()),
				("code".to_owned(), "abc".to_owned()),
				("client_id".to_owned(), "app-1".to_owned()),
				("client_secret".to_owned(), "s3cret".to_owned()),
				("redirect_uri".to_owned(), "https://example.com/callback".to_owned()),
			]
		);
	}

	#[test]
	fn debug_output_redacts_client_secret() {
		let rendered = format!("{:?}", helper());

		assert!(rendered.contains("app-1"));
		assert!(!rendered.contains("s3cret"));
	}

	#[tokio::test]
	async fn fetch_access_token_returns_token() {
		let http_client = CannedHttpClient::new(200, "{\"access_token\":\"tok-1\",\"expires_in\":3600}");
		let token =
			helper().fetch_access_token(&http_client, "abc").await.expect("Exchange should succeed.");

		assert_eq!(token.expose(), "tok-1");

		let seen = http_client.seen.lock();

		assert_eq!(seen.len(), 1);
		assert_eq!(seen[0].method, HttpMethod::Get);
		assert_eq!(seen[0].url, helper().token_url("abc"));
	}

	#[tokio::test]
	async fn numeric_tokens_are_accepted_in_decimal_form() {
		let http_client = CannedHttpClient::new(200, "{\"access_token\":12345}");
		let token =
			helper().fetch_access_token(&http_client, "abc").await.expect("Exchange should succeed.");

		assert_eq!(token.expose(), "12345");
	}

	#[tokio::test]
	async fn exchange_timeout_is_configurable() {
		let http_client = CannedHttpClient::new(200, "{\"access_token\":\"tok\"}");

		helper().fetch_access_token(&http_client, "abc").await.expect("Exchange should succeed.");
		helper()
			.with_timeout(Some(Duration::from_secs(5)))
			.fetch_access_token(&http_client, "abc")
			.await
			.expect("Exchange should succeed.");
		helper()
			.with_timeout(None)
			.fetch_access_token(&http_client, "abc")
			.await
			.expect("Exchange should succeed.");

		let timeouts = http_client.seen.lock().iter().map(|request| request.timeout).collect::<Vec<_>>();

		assert_eq!(timeouts, [Some(DEFAULT_TIMEOUT), Some(Duration::from_secs(5)), None]);
	}

	#[tokio::test]
	async fn fetch_access_token_classifies_failures() {
		let err = helper()
			.fetch_access_token(&CannedHttpClient::new(401, "denied"), "abc")
			.await
			.expect_err("Non-200 must fail.");

		assert!(matches!(
			err,
			Error::OAuth(OAuthError::TokenEndpoint { status: 401, ref body }) if body == "denied"
		));

		let err = helper()
			.fetch_access_token(&CannedHttpClient::new(200, "{\"access_token\":\"\"}"), "abc")
			.await
			.expect_err("Empty token must fail.");

		assert!(matches!(err, Error::OAuth(OAuthError::MissingAccessToken)));

		let err = helper()
			.fetch_access_token(&CannedHttpClient::new(200, "{\"error\":\"invalid_grant\"}"), "abc")
			.await
			.expect_err("Absent token must fail.");

		assert!(matches!(err, Error::OAuth(OAuthError::MissingAccessToken)));

		let err = helper()
			.fetch_access_token(&CannedHttpClient::new(200, "{\"access_token\":null}"), "abc")
			.await
			.expect_err("Null token must fail.");

		assert!(matches!(err, Error::OAuth(OAuthError::MissingAccessToken)));

		let err = helper()
			.fetch_access_token(&CannedHttpClient::new(200, "<html>"), "abc")
			.await
			.expect_err("Non-JSON must fail.");

		assert!(matches!(err, Error::MalformedResponse { ref method, .. } if method == TOKEN_EXCHANGE));
	}
}
