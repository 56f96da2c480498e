//! Registry-driven Rust client for the Jiepang check-in API: a declarative method catalog,
//! pluggable Basic and OAuth 2.0 bearer credentials, and typed errors for every failure mode.
//!
//! Every remote operation is described once by a [`registry::MethodSpec`]. The
//! [`client::Client`] turns a method name plus [`client::CallArgs`] into a validated,
//! authenticated request, performs one HTTP round-trip, and hands back the decoded JSON.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod http;
pub mod oauth;
pub mod obs;
pub mod registry;

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
		time::Duration,
	};

	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize, de::DeserializeOwned};
	pub use serde_json::Value;
	pub use thiserror::Error as ThisError;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use serde_json;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};

#[cfg(feature = "reqwest")] pub use client::JiepangClient;
pub use client::{CallArgs, Client};
pub use config::ClientConfig;
pub use credentials::{Credentials, Secret};
pub use error::{Error, Result};
pub use oauth::OAuthHelper;
pub use registry::{MethodSpec, Registry};
