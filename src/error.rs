//! Client-level error types shared across the registry, dispatcher, and transports.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
///
/// Everything except [`Error::Remote`], [`Error::MalformedResponse`], [`Error::Transport`], and
/// [`Error::OAuth`] is raised before any network activity takes place.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Method specification could not be registered.
	#[error(transparent)]
	Registry(#[from] crate::registry::RegistryError),
	/// Supplied arguments do not match the method contract.
	#[error(transparent)]
	Argument(#[from] ArgumentError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// OAuth authorization-code exchange failed.
	#[error(transparent)]
	OAuth(#[from] OAuthError),

	/// No method with this name exists in the registry.
	#[error("Unknown remote method `{method}`.")]
	UnknownMethod {
		/// Name that failed the lookup.
		method: String,
	},
	/// The method requires authorization but the credentials are not authorized.
	#[error("Remote method `{method}` requires authorization.")]
	NotAuthorized {
		/// Method that was refused locally.
		method: String,
	},
	/// Remote service answered with a status other than 200.
	#[error("Error signaled by remote method `{method}` ({url}): HTTP {status}.")]
	Remote {
		/// Method that was called.
		method: String,
		/// Final request URL, including the encoded query.
		url: String,
		/// HTTP status code returned by the service.
		status: u16,
		/// Raw response body, preserved verbatim.
		body: String,
	},
	/// Response body was not valid JSON (or did not match the requested shape).
	#[error("Remote method `{method}` returned malformed JSON at `{path}`.")]
	MalformedResponse {
		/// Method that was called.
		method: String,
		/// JSON path where decoding stopped (`.` for the document root).
		path: String,
		/// Underlying decoding failure.
		#[source]
		source: serde_json::Error,
	},
}

/// Argument binding and validation failures.
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum ArgumentError {
	/// More positional arguments than declared parameter names.
	#[error("Method `{method}` accepts at most {max} arguments but {supplied} positional arguments were supplied.")]
	TooManyArguments {
		/// Method being called.
		method: String,
		/// Number of declared parameter names (required + optional).
		max: usize,
		/// Number of positional arguments supplied.
		supplied: usize,
	},
	/// At least one required parameter is absent.
	#[error("Too few arguments were supplied for method `{method}`; missing {}.", .missing.join(", "))]
	MissingRequiredArgument {
		/// Method being called.
		method: String,
		/// Required parameter names that were not supplied, in declaration order.
		missing: Vec<String>,
	},
	/// A parameter name outside of the method contract was supplied.
	#[error(
		"Unknown argument `{argument}` supplied to method `{method}`. Required arguments are [{}], optional arguments are [{}].",
		.required.join(", "),
		.optional.join(", ")
	)]
	UnknownArgument {
		/// Method being called.
		method: String,
		/// Offending parameter name.
		argument: String,
		/// Required parameter names declared by the method.
		required: Vec<String>,
		/// Optional parameter names declared by the method.
		optional: Vec<String>,
	},
}

/// Configuration and validation failures raised by the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Base URL cannot be parsed.
	#[error("Base URL `{url}` is invalid.")]
	InvalidBaseUrl {
		/// Rejected input.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A method URL template could not be resolved against the base URL.
	#[error("Endpoint `{endpoint}` cannot be resolved against the base URL.")]
	InvalidEndpoint {
		/// Template after method substitution.
		endpoint: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the remote service.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The request did not complete within the configured timeout.
	#[error("Request timed out while calling the remote service.")]
	Timeout {
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the remote service.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Wraps a transport-specific timeout error.
	pub fn timeout(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Timeout { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::timeout(e) } else { Self::network(e) }
	}
}

/// Authorization-code exchange failures.
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum OAuthError {
	/// Token endpoint answered with a status other than 200.
	#[error("The server couldn't fulfill the token request (HTTP {status}).")]
	TokenEndpoint {
		/// HTTP status code returned by the token endpoint.
		status: u16,
		/// Raw response body, preserved verbatim.
		body: String,
	},
	/// Token endpoint response did not carry a usable `access_token`.
	#[error("Token endpoint response is missing access_token.")]
	MissingAccessToken,
}
