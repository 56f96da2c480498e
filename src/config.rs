//! Client configuration: where to send calls, how to attribute them, and how long to wait.

// self
use crate::{_prelude::*, error::ConfigError};

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "http://api.jiepang.com/";
/// Attribution tag sent as the `source` parameter on every call.
pub const DEFAULT_SOURCE: &str = "checkinsync";
/// Upper bound applied to each round-trip unless overridden.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings shared by every call issued through one [`Client`](crate::client::Client).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
	/// Root URL that method templates are resolved against, always ending in `/`.
	pub base_url: String,
	/// Value of the `source` parameter.
	pub source: String,
	/// Per-request timeout; `None` waits for as long as the transport allows.
	pub timeout: Option<Duration>,
}
impl ClientConfig {
	/// Overrides the base URL after validating it.
	///
	/// A trailing `/` is appended when missing so that relative templates extend the path
	/// rather than replacing its last segment.
	pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
		let normalized = if base_url.ends_with('/') {
			base_url.to_owned()
		} else {
			format!("{base_url}/")
		};

		Url::parse(&normalized)
			.map_err(|source| ConfigError::InvalidBaseUrl { url: base_url.into(), source })?;

		self.base_url = normalized;

		Ok(self)
	}

	/// Overrides the attribution tag.
	pub fn with_source(mut self, source: impl Into<String>) -> Self {
		self.source = source.into();

		self
	}

	/// Overrides the per-request timeout.
	pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
		self.timeout = timeout;

		self
	}

	/// Resolves a method endpoint (template with the path already substituted).
	pub fn resolve(&self, endpoint: &str) -> Result<Url> {
		let base = Url::parse(&self.base_url).map_err(|source| ConfigError::InvalidBaseUrl {
			url: self.base_url.clone(),
			source,
		})?;

		base.join(endpoint).map_err(|source| {
			ConfigError::InvalidEndpoint { endpoint: endpoint.into(), source }.into()
		})
	}
}
impl Default for ClientConfig {
	fn default() -> Self {
		Self {
			base_url: DEFAULT_BASE_URL.into(),
			source: DEFAULT_SOURCE.into(),
			timeout: Some(DEFAULT_TIMEOUT),
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn defaults_target_production() {
		let config = ClientConfig::default();

		assert_eq!(config.base_url, DEFAULT_BASE_URL);
		assert_eq!(config.source, "checkinsync");
		assert_eq!(config.timeout, Some(Duration::from_secs(30)));
	}

	#[test]
	fn base_url_gains_trailing_slash() {
		let config = ClientConfig::default()
			.with_base_url("http://127.0.0.1:8080/api")
			.expect("Base URL fixture should parse.");

		assert_eq!(
			config.resolve("v1/statuses/list").expect("Endpoint should resolve.").as_str(),
			"http://127.0.0.1:8080/api/v1/statuses/list"
		);
	}

	#[test]
	fn invalid_base_url_is_rejected() {
		let err = ClientConfig::default()
			.with_base_url("not a url")
			.expect_err("Relative base URLs must be rejected.");

		assert!(matches!(err, Error::Config(ConfigError::InvalidBaseUrl { .. })));
	}

	#[test]
	fn absolute_templates_bypass_base_url() {
		let config = ClientConfig::default();

		assert_eq!(
			config
				.resolve("https://other.example.com/v2/cities")
				.expect("Absolute endpoint should resolve.")
				.as_str(),
			"https://other.example.com/v2/cities"
		);
	}
}
