//! Credential strategies that authenticate outgoing requests.
//!
//! [`Credentials`] is a closed set of variants behind two operations:
//! [`Credentials::is_authorized`] gates auth-required methods, and
//! [`Credentials::build_request`] turns a verb, URL, and parameter map into the final URL,
//! body, and extra headers. Both are pure.

mod secret;

pub use secret::*;

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use url::form_urlencoded;
// self
use crate::{_prelude::*, http::HttpMethod};

/// Parameter name carrying the bearer token on auth-required calls.
pub const ACCESS_TOKEN_PARAM: &str = "access_token";

/// Authentication strategy held by a [`Client`](crate::client::Client).
///
/// Values are immutable; refreshing a token means building a new value and swapping it in
/// with [`Client::replace_credentials`](crate::client::Client::replace_credentials).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Credentials {
	/// No credentials; only public methods can be called.
	#[default]
	Anonymous,
	/// HTTP Basic authentication.
	Basic {
		/// Account name.
		username: String,
		/// Account password.
		password: Secret,
	},
	/// OAuth 2.0 bearer token sent as the `access_token` parameter.
	OAuthBearer {
		/// Token obtained from the authorization-code exchange.
		access_token: Secret,
	},
}
impl Credentials {
	/// Anonymous credentials.
	pub fn anonymous() -> Self {
		Self::Anonymous
	}

	/// HTTP Basic credentials.
	pub fn basic(username: impl Into<String>, password: impl Into<Secret>) -> Self {
		Self::Basic { username: username.into(), password: password.into() }
	}

	/// OAuth 2.0 bearer credentials.
	pub fn bearer(access_token: impl Into<Secret>) -> Self {
		Self::OAuthBearer { access_token: access_token.into() }
	}

	/// Returns a stable label suitable for span fields.
	pub const fn kind(&self) -> &'static str {
		match self {
			Self::Anonymous => "anonymous",
			Self::Basic { .. } => "basic",
			Self::OAuthBearer { .. } => "oauth_bearer",
		}
	}

	/// Reports whether auth-required methods may be called.
	///
	/// Basic credentials are trusted without local verification; bearer credentials need a
	/// non-empty token.
	pub fn is_authorized(&self) -> bool {
		match self {
			Self::Anonymous => false,
			Self::Basic { .. } => true,
			Self::OAuthBearer { access_token } => !access_token.is_empty(),
		}
	}

	/// Token to inject under [`ACCESS_TOKEN_PARAM`], for token-based credentials only.
	pub fn access_token(&self) -> Option<&Secret> {
		match self {
			Self::OAuthBearer { access_token } => Some(access_token),
			_ => None,
		}
	}

	/// Encodes `params` into the final request parts.
	///
	/// The form-encoded parameters are appended to the query string of `url`, after any pairs
	/// the URL already carries; POST requests additionally send the parameters alone as the
	/// body.
	pub fn build_request(
		&self,
		method: HttpMethod,
		mut url: Url,
		params: &BTreeMap<String, String>,
	) -> SignedRequest {
		let query = form_urlencoded::Serializer::new(String::new()).extend_pairs(params).finish();
		let full_query = match url.query() {
			Some(existing) if !existing.is_empty() && !query.is_empty() =>
				format!("{existing}&{query}"),
			Some(existing) if !existing.is_empty() => existing.to_owned(),
			_ => query.clone(),
		};

		url.set_query(Some(&full_query));

		let body = match method {
			HttpMethod::Post => Some(query),
			HttpMethod::Get => None,
		};
		let headers = match self {
			Self::Basic { username, password } => {
				let encoded = STANDARD.encode(format!("{username}:{}", password.expose()));

				vec![("Authorization".to_owned(), format!("Basic {encoded}"))]
			},
			Self::Anonymous | Self::OAuthBearer { .. } => Vec::new(),
		};

		SignedRequest { url, body, headers }
	}
}

/// Output of [`Credentials::build_request`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedRequest {
	/// URL with the encoded query string.
	pub url: Url,
	/// Form-encoded body (POST only).
	pub body: Option<String>,
	/// Headers contributed by the credential strategy.
	pub headers: Vec<(String, String)>,
}
