//! Request dispatcher: turns a method name plus arguments into one validated, authenticated
//! HTTP round-trip.
//!
//! [`Client::prepare`] performs every local step (lookup, argument binding, validation,
//! authorization gate, parameter injection, URL resolution, credential signing) without I/O.
//! [`Client::call`] adds the round-trip and the JSON decoding. Validation failures therefore
//! never cost a request.

// self
use crate::{
	_prelude::*,
	config::ClientConfig,
	credentials::{ACCESS_TOKEN_PARAM, Credentials, SignedRequest},
	error::ArgumentError,
	http::{ApiHttpClient, ApiRequest, ApiResponse, HttpMethod},
	obs::{self, CallOutcome, CallSpan},
	registry::{MethodSpec, Registry, SOURCE_PARAM},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const POST_ACCEPT: &str = "text/plain";

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type JiepangClient = Client<ReqwestHttpClient>;

/// Positional and keyword arguments for one call.
///
/// Positional values bind to `required ++ optional` in declaration order; keywords are
/// applied afterwards and win on conflict.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallArgs {
	positional: Vec<String>,
	keyword: BTreeMap<String, String>,
}
impl CallArgs {
	/// Creates an empty argument set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a positional argument.
	pub fn arg(mut self, value: impl ToString) -> Self {
		self.positional.push(value.to_string());

		self
	}

	/// Sets a keyword argument, replacing any earlier value for `name`.
	pub fn kwarg(mut self, name: impl Into<String>, value: impl ToString) -> Self {
		self.keyword.insert(name.into(), value.to_string());

		self
	}

	/// Positional values in call order.
	pub fn positional(&self) -> &[String] {
		&self.positional
	}

	/// Keyword values keyed by parameter name.
	pub fn keyword(&self) -> &BTreeMap<String, String> {
		&self.keyword
	}

	/// Returns true when no arguments were supplied.
	pub fn is_empty(&self) -> bool {
		self.positional.is_empty() && self.keyword.is_empty()
	}

	/// Binds the arguments against `spec` and validates the resulting parameter map.
	pub fn bind(self, spec: &MethodSpec) -> Result<BTreeMap<String, String>, ArgumentError> {
		let CallArgs { positional, keyword } = self;

		if positional.len() > spec.arity() {
			return Err(ArgumentError::TooManyArguments {
				method: spec.name.into(),
				max: spec.arity(),
				supplied: positional.len(),
			});
		}

		let mut params = spec
			.parameter_names()
			.zip(positional)
			.map(|(name, value)| (name.to_owned(), value))
			.collect::<BTreeMap<_, _>>();

		params.extend(keyword);

		let missing = spec
			.required
			.iter()
			.filter(|name| !params.contains_key(**name))
			.map(|name| (*name).to_owned())
			.collect::<Vec<_>>();

		if !missing.is_empty() {
			return Err(ArgumentError::MissingRequiredArgument { method: spec.name.into(), missing });
		}
		if let Some(argument) = params.keys().find(|name| !spec.accepts(name)) {
			return Err(ArgumentError::UnknownArgument {
				method: spec.name.into(),
				argument: argument.clone(),
				required: spec.required.iter().map(|name| (*name).to_owned()).collect(),
				optional: spec.optional.iter().map(|name| (*name).to_owned()).collect(),
			});
		}

		Ok(params)
	}
}
impl<K, V> FromIterator<(K, V)> for CallArgs
where
	K: Into<String>,
	V: ToString,
{
	fn from_iter<I>(iter: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
	{
		iter.into_iter().fold(Self::new(), |args, (name, value)| args.kwarg(name, value))
	}
}
impl<K, V, const N: usize> From<[(K, V); N]> for CallArgs
where
	K: Into<String>,
	V: ToString,
{
	fn from(pairs: [(K, V); N]) -> Self {
		pairs.into_iter().collect()
	}
}

/// Dispatches registered remote methods through one credential value.
///
/// The client owns its credentials, a shared [`Registry`], the configuration, and the transport.
/// Credentials are swapped atomically (never mutated in place), so a single client can be shared
/// across tasks behind an [`Arc`].
pub struct Client<C>
where
	C: ?Sized + ApiHttpClient,
{
	http_client: Arc<C>,
	registry: Arc<Registry>,
	config: ClientConfig,
	credentials: RwLock<Arc<Credentials>>,
}
impl<C> Client<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_http_client(credentials: Credentials, http_client: impl Into<Arc<C>>) -> Self {
		Self {
			http_client: http_client.into(),
			registry: Registry::standard(),
			config: ClientConfig::default(),
			credentials: RwLock::new(Arc::new(credentials)),
		}
	}

	/// Replaces the configuration.
	pub fn with_config(mut self, config: ClientConfig) -> Self {
		self.config = config;

		self
	}

	/// Replaces the method registry (defaults to [`Registry::standard`]).
	pub fn with_registry(mut self, registry: Arc<Registry>) -> Self {
		self.registry = registry;

		self
	}

	/// Active configuration.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	/// Method registry consulted by every call.
	pub fn registry(&self) -> &Registry {
		&self.registry
	}

	/// Snapshot of the current credentials.
	pub fn credentials(&self) -> Arc<Credentials> {
		Arc::clone(&self.credentials.read())
	}

	/// Atomically swaps in new credentials and returns the previous value.
	///
	/// Calls already in flight keep the snapshot they started with.
	pub fn replace_credentials(&self, credentials: Credentials) -> Arc<Credentials> {
		std::mem::replace(&mut *self.credentials.write(), Arc::new(credentials))
	}

	/// Reports whether the current credentials can call auth-required methods.
	pub fn is_authorized(&self) -> bool {
		self.credentials.read().is_authorized()
	}

	/// Builds the request for `method` without performing any I/O.
	pub fn prepare(&self, method: &str, args: CallArgs) -> Result<ApiRequest> {
		let spec = self.registry.lookup(method)?;

		self.prepare_with(spec, &self.credentials(), args)
	}

	/// Calls `method` and returns the decoded JSON value unchanged.
	pub async fn call(&self, method: &str, args: CallArgs) -> Result<Value> {
		self.call_as(method, args).await
	}

	/// Calls `method` and decodes the response into `T`.
	pub async fn call_as<T>(&self, method: &str, args: CallArgs) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let spec = *self.registry.lookup(method)?;
		let credentials = self.credentials();
		let span = CallSpan::new(spec.name, spec.http_method, credentials.kind());

		obs::record_call_outcome(spec.name, CallOutcome::Attempt);

		let result = span
			.instrument(async {
				let request = self.prepare_with(&spec, &credentials, args)?;
				let url = request.url.to_string();
				let response = self.http_client.execute(request).await?;

				span.record_status(response.status);

				decode_response(&spec, url, response)
			})
			.await;

		match &result {
			Ok(_) => obs::record_call_outcome(spec.name, CallOutcome::Success),
			Err(_) => obs::record_call_outcome(spec.name, CallOutcome::Failure),
		}

		result
	}

	fn prepare_with(
		&self,
		spec: &MethodSpec,
		credentials: &Credentials,
		args: CallArgs,
	) -> Result<ApiRequest> {
		let mut params = args.bind(spec)?;

		params.insert(SOURCE_PARAM.into(), self.config.source.clone());

		if spec.auth_required {
			if !credentials.is_authorized() {
				return Err(Error::NotAuthorized { method: spec.name.into() });
			}
			if let Some(token) = credentials.access_token() {
				params.insert(ACCESS_TOKEN_PARAM.into(), token.expose().to_owned());
			}
		}

		let url = self.config.resolve(&spec.endpoint())?;
		let SignedRequest { url, body, headers } =
			credentials.build_request(spec.http_method, url, &params);
		let headers = match spec.http_method {
			HttpMethod::Post => merge_headers(
				vec![
					("Content-Type".into(), FORM_CONTENT_TYPE.into()),
					("Accept".into(), POST_ACCEPT.into()),
				],
				headers,
			),
			HttpMethod::Get => headers,
		};

		Ok(ApiRequest { method: spec.http_method, url, headers, body, timeout: self.config.timeout })
	}
}
#[cfg(feature = "reqwest")]
impl Client<ReqwestHttpClient> {
	/// Creates a client backed by a default reqwest transport.
	pub fn new(credentials: Credentials) -> Self {
		Self::with_http_client(credentials, ReqwestHttpClient::default())
	}

	/// Creates a client without credentials; only public methods will succeed.
	pub fn anonymous() -> Self {
		Self::new(Credentials::Anonymous)
	}
}
impl<C> Debug for Client<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client")
			.field("config", &self.config)
			.field("credentials", &self.credentials.read().kind())
			.field("methods", &self.registry.len())
			.finish()
	}
}

/// Overlays `overrides` onto `base`; header names compare ASCII case-insensitively.
fn merge_headers(
	mut base: Vec<(String, String)>,
	overrides: Vec<(String, String)>,
) -> Vec<(String, String)> {
	for (name, value) in overrides {
		match base.iter_mut().find(|(key, _)| key.eq_ignore_ascii_case(&name)) {
			Some(slot) => *slot = (name, value),
			None => base.push((name, value)),
		}
	}

	base
}

fn decode_response<T>(spec: &MethodSpec, url: String, response: ApiResponse) -> Result<T>
where
	T: DeserializeOwned,
{
	let ApiResponse { status, body } = response;

	if status != 200 {
		return Err(Error::Remote { method: spec.name.into(), url, status, body });
	}

	let mut deserializer = serde_json::Deserializer::from_str(&body);
	let value = serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
		Error::MalformedResponse {
			method: spec.name.into(),
			path: err.path().to_string(),
			source: err.into_inner(),
		}
	})?;

	deserializer.end().map_err(|source| Error::MalformedResponse {
		method: spec.name.into(),
		path: ".".into(),
		source,
	})?;

	Ok(value)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	const CHECKIN: MethodSpec = MethodSpec::new("checkin")
		.http_method(HttpMethod::Post)
		.auth_required(true)
		.optional(&["vid", "venue", "shout", "private", "twitter", "facebook", "geolat", "geolong"]);
	const VENUES: MethodSpec =
		MethodSpec::new("venues").required(&["geolat", "geolong"]).optional(&["l", "q"]);

	#[test]
	fn positional_and_keyword_bindings_agree() {
		let by_position = CallArgs::new().arg("123").bind(&CHECKIN).expect("Positional should bind.");
		let by_keyword =
			CallArgs::new().kwarg("vid", "123").bind(&CHECKIN).expect("Keyword should bind.");

		assert_eq!(by_position, by_keyword);
	}

	#[test]
	fn call_args_expose_what_was_supplied() {
		assert!(CallArgs::new().is_empty());

		let args = CallArgs::new().arg(31.2).kwarg("q", "coffee").kwarg("q", "tea");

		assert!(!args.is_empty());
		assert_eq!(args.positional(), ["31.2"]);
		assert_eq!(args.keyword().get("q").map(String::as_str), Some("tea"));
		assert_eq!(args.keyword().len(), 1);
	}

	#[test]
	fn keywords_override_positionals() {
		let params = CallArgs::new()
			.arg("1.5")
			.arg("2.5")
			.kwarg("geolat", "9.0")
			.bind(&VENUES)
			.expect("Arguments should bind.");

		assert_eq!(params.get("geolat").map(String::as_str), Some("9.0"));
		assert_eq!(params.get("geolong").map(String::as_str), Some("2.5"));
	}

	#[test]
	fn too_many_positionals_fail() {
		let args = (0..5).fold(CallArgs::new(), |args, i| args.arg(i));
		let err = args.bind(&VENUES).expect_err("Five positionals exceed four names.");

		assert_eq!(
			err,
			ArgumentError::TooManyArguments { method: "venues".into(), max: 4, supplied: 5 }
		);
	}

	#[test]
	fn missing_required_lists_every_absent_name() {
		let err = CallArgs::new().kwarg("q", "coffee").bind(&VENUES).expect_err("Required missing.");

		assert_eq!(
			err,
			ArgumentError::MissingRequiredArgument {
				method: "venues".into(),
				missing: vec!["geolat".into(), "geolong".into()],
			}
		);
	}

	#[test]
	fn unknown_arguments_are_rejected() {
		let err = CallArgs::from([("geolat", "1"), ("geolong", "2"), ("radius", "3")])
			.bind(&VENUES)
			.expect_err("Undeclared names must fail.");

		assert!(matches!(
			err,
			ArgumentError::UnknownArgument { ref argument, .. } if argument == "radius"
		));
	}

	#[test]
	fn credential_headers_win_on_collision() {
		let merged = merge_headers(
			vec![("Accept".into(), "text/plain".into())],
			vec![("accept".into(), "application/json".into()), ("X-Extra".into(), "1".into())],
		);

		assert_eq!(
			merged,
			vec![
				("accept".to_owned(), "application/json".to_owned()),
				("X-Extra".to_owned(), "1".to_owned()),
			]
		);
	}

	#[test]
	fn decode_rejects_non_200_and_malformed_bodies() {
		let err = decode_response::<Value>(
			&VENUES,
			"http://api.jiepang.com/v1/venues".into(),
			ApiResponse::new(403, "{\"error\":\"denied\"}"),
		)
		.expect_err("403 must surface as a remote error.");

		assert!(matches!(
			err,
			Error::Remote { status: 403, ref body, .. } if body == "{\"error\":\"denied\"}"
		));

		let err = decode_response::<Value>(
			&VENUES,
			"http://api.jiepang.com/v1/venues".into(),
			ApiResponse::new(200, "{\"result\":[1,2"),
		)
		.expect_err("Truncated JSON must fail.");

		assert!(matches!(err, Error::MalformedResponse { .. }));

		let err = decode_response::<Value>(
			&VENUES,
			"http://api.jiepang.com/v1/venues".into(),
			ApiResponse::new(200, "{} trailing"),
		)
		.expect_err("Trailing characters must fail.");

		assert!(matches!(err, Error::MalformedResponse { .. }));
	}

	#[test]
	fn decode_returns_json_verbatim() {
		let value = decode_response::<Value>(
			&VENUES,
			"http://api.jiepang.com/v1/venues".into(),
			ApiResponse::new(200, "{\"result\":[1,2,3]}"),
		)
		.expect("Valid JSON should decode.");

		assert_eq!(value, serde_json::json!({ "result": [1, 2, 3] }));
	}
}
