//! Method registry: one immutable [`MethodSpec`] per remote operation.
//!
//! The process-wide catalog returned by [`Registry::standard`] is built once from the
//! declarative table in [`crate::api`]. Custom registries can be assembled with
//! [`Registry::register`], which rejects duplicates and malformed specs instead of silently
//! overwriting them.

// std
use std::sync::LazyLock;
// self
use crate::{_prelude::*, credentials::ACCESS_TOKEN_PARAM, http::HttpMethod};

/// Placeholder substituted with the method path inside a URL template.
pub const METHOD_PLACEHOLDER: &str = "{method}";
/// Template shared by every method of the standard catalog, resolved against the base URL.
pub const DEFAULT_URL_TEMPLATE: &str = "v1/{method}";
/// Separator inside composite method names that maps to a URL path separator.
pub const NAME_SEPARATOR: &str = "__";
/// Parameter name carrying the client attribution tag.
pub const SOURCE_PARAM: &str = "source";

const RESERVED_PARAMS: [&str; 2] = [SOURCE_PARAM, ACCESS_TOKEN_PARAM];

static STANDARD: LazyLock<Arc<Registry>> = LazyLock::new(|| {
	let methods = crate::api::CATALOG.iter().map(|spec| (spec.name, *spec)).collect();

	Arc::new(Registry { methods })
});

/// Errors raised while registering method specs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum RegistryError {
	/// A method with the same name is already registered.
	#[error("Method `{name}` is already registered.")]
	DuplicateMethod {
		/// Conflicting method name.
		name: String,
	},
	/// Method names must be non-empty identifiers without `.` or `/`.
	#[error("Method name `{name}` is not a valid identifier.")]
	InvalidName {
		/// Rejected method name.
		name: String,
	},
	/// URL templates must contain exactly one `{method}` placeholder.
	#[error("URL template `{template}` of method `{name}` must contain exactly one {{method}} placeholder.")]
	InvalidTemplate {
		/// Method being registered.
		name: String,
		/// Rejected template.
		template: String,
	},
	/// A parameter is declared both required and optional, or twice.
	#[error("Parameter `{parameter}` of method `{name}` is declared more than once.")]
	OverlappingParameter {
		/// Method being registered.
		name: String,
		/// Parameter declared more than once.
		parameter: String,
	},
	/// A parameter collides with a name injected by the dispatcher.
	#[error("Parameter `{parameter}` of method `{name}` is reserved by the client.")]
	ReservedParameter {
		/// Method being registered.
		name: String,
		/// Reserved parameter name.
		parameter: String,
	},
}

/// Static calling contract of one remote operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct MethodSpec {
	/// Unique registry key; `__` marks a path separator.
	pub name: &'static str,
	/// HTTP verb.
	pub http_method: HttpMethod,
	/// URL template with a single `{method}` placeholder.
	pub url_template: &'static str,
	/// Whether the call needs authorized credentials.
	pub auth_required: bool,
	/// Required parameter names, in positional binding order.
	pub required: &'static [&'static str],
	/// Optional parameter names, bound positionally after the required ones.
	pub optional: &'static [&'static str],
}
impl MethodSpec {
	/// Creates a public GET method without parameters using [`DEFAULT_URL_TEMPLATE`].
	pub const fn new(name: &'static str) -> Self {
		Self {
			name,
			http_method: HttpMethod::Get,
			url_template: DEFAULT_URL_TEMPLATE,
			auth_required: false,
			required: &[],
			optional: &[],
		}
	}

	/// Overrides the HTTP verb.
	pub const fn http_method(mut self, method: HttpMethod) -> Self {
		self.http_method = method;

		self
	}

	/// Overrides the URL template.
	pub const fn url_template(mut self, template: &'static str) -> Self {
		self.url_template = template;

		self
	}

	/// Marks the method as requiring authorization.
	pub const fn auth_required(mut self, auth_required: bool) -> Self {
		self.auth_required = auth_required;

		self
	}

	/// Sets the required parameter names.
	pub const fn required(mut self, names: &'static [&'static str]) -> Self {
		self.required = names;

		self
	}

	/// Sets the optional parameter names.
	pub const fn optional(mut self, names: &'static [&'static str]) -> Self {
		self.optional = names;

		self
	}

	/// Iterates over `required ++ optional`, the positional binding order.
	pub fn parameter_names(&self) -> impl Iterator<Item = &'static str> + use<> {
		let (required, optional) = (self.required, self.optional);

		required.iter().chain(optional).copied()
	}

	/// Number of declared parameters.
	pub fn arity(&self) -> usize {
		self.required.len() + self.optional.len()
	}

	/// Returns true if `name` is a declared parameter.
	pub fn accepts(&self, name: &str) -> bool {
		self.required.contains(&name) || self.optional.contains(&name)
	}

	/// Method name with [`NAME_SEPARATOR`] turned into `/`.
	pub fn path(&self) -> String {
		self.name.replace(NAME_SEPARATOR, "/")
	}

	/// URL template with the method path substituted.
	pub fn endpoint(&self) -> String {
		self.url_template.replace(METHOD_PLACEHOLDER, &self.path())
	}

	fn validate(&self) -> Result<(), RegistryError> {
		let valid_name = !self.name.is_empty()
			&& self.name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');

		if !valid_name {
			return Err(RegistryError::InvalidName { name: self.name.into() });
		}
		if self.url_template.matches(METHOD_PLACEHOLDER).count() != 1 {
			return Err(RegistryError::InvalidTemplate {
				name: self.name.into(),
				template: self.url_template.into(),
			});
		}

		let mut seen = Vec::with_capacity(self.arity());

		for parameter in self.parameter_names() {
			if RESERVED_PARAMS.contains(&parameter) {
				return Err(RegistryError::ReservedParameter {
					name: self.name.into(),
					parameter: parameter.into(),
				});
			}
			if seen.contains(&parameter) {
				return Err(RegistryError::OverlappingParameter {
					name: self.name.into(),
					parameter: parameter.into(),
				});
			}

			seen.push(parameter);
		}

		Ok(())
	}
}

/// Name-keyed table of [`MethodSpec`] values.
#[derive(Clone, Debug, Default)]
pub struct Registry {
	methods: HashMap<&'static str, MethodSpec>,
}
impl Registry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Shared registry covering every operation of the remote service.
	pub fn standard() -> Arc<Registry> {
		Arc::clone(&STANDARD)
	}

	/// Builds a registry from `specs`, failing on the first invalid or duplicate entry.
	pub fn from_specs<I>(specs: I) -> Result<Self, RegistryError>
	where
		I: IntoIterator<Item = MethodSpec>,
	{
		let mut registry = Self::new();

		for spec in specs {
			registry.register(spec)?;
		}

		Ok(registry)
	}

	/// Adds `spec`, rejecting malformed specs and names that are already taken.
	pub fn register(&mut self, spec: MethodSpec) -> Result<(), RegistryError> {
		spec.validate()?;

		if self.methods.contains_key(spec.name) {
			return Err(RegistryError::DuplicateMethod { name: spec.name.into() });
		}

		self.methods.insert(spec.name, spec);

		Ok(())
	}

	/// Returns the spec registered under `name`.
	pub fn lookup(&self, name: &str) -> Result<&MethodSpec> {
		self.methods.get(name).ok_or_else(|| Error::UnknownMethod { method: name.into() })
	}

	/// Returns the spec registered under `name`, if any.
	pub fn get(&self, name: &str) -> Option<&MethodSpec> {
		self.methods.get(name)
	}

	/// Number of registered methods.
	pub fn len(&self) -> usize {
		self.methods.len()
	}

	/// Returns true when nothing is registered.
	pub fn is_empty(&self) -> bool {
		self.methods.is_empty()
	}

	/// Registered specs sorted by name.
	pub fn specs(&self) -> Vec<&MethodSpec> {
		let mut specs = self.methods.values().collect::<Vec<_>>();

		specs.sort_by_key(|spec| spec.name);

		specs
	}
}
