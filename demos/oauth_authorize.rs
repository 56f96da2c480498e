//! Prints the authorization URL for an application and, once `JIEPANG_CODE` holds the code
//! returned to the redirect URI, exchanges it for a bearer token and verifies it.

// std
use std::env;
// crates.io
use color_eyre::{Result, eyre::WrapErr};
use url::Url;
// self
use jiepang::{CallArgs, Credentials, JiepangClient, OAuthHelper, http::ReqwestHttpClient};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let client_id = env::var("JIEPANG_CLIENT_ID").unwrap_or_else(|_| "demo-client".into());
	let client_secret = env::var("JIEPANG_CLIENT_SECRET").unwrap_or_else(|_| "demo-secret".into());
	let helper = OAuthHelper::new(
		Url::parse("https://jiepang.com/oauth/authorize")?,
		Url::parse("https://jiepang.com/oauth/token")?,
		client_id,
		client_secret,
		Url::parse("https://app.example.com/oauth/callback")?,
	);

	println!("Send your user to {}.", helper.authorization_url());
	println!("They will come back to {}.", helper.redirect_uri());

	let Ok(code) = env::var("JIEPANG_CODE") else {
		println!("Set JIEPANG_CODE to exchange the returned code.");

		return Ok(());
	};
	let token = helper
		.fetch_access_token(&ReqwestHttpClient::default(), &code)
		.await
		.wrap_err("Token exchange failed.")?;
	let client = JiepangClient::new(Credentials::bearer(token));
	let me = client.account_verify_credentials(CallArgs::new()).await?;

	println!("Authorized as: {me:#}");

	Ok(())
}
