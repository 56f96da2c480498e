//! Prepares a venue search and a check-in, then sends them when `JIEPANG_TOKEN` is set.
//!
//! Without a token the demo only prints the requests it would send, so it runs offline.

// std
use std::env;
// crates.io
use color_eyre::Result;
// self
use jiepang::{CallArgs, Credentials, JiepangClient};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let token = env::var("JIEPANG_TOKEN").ok();
	let client = JiepangClient::new(token.clone().map(Credentials::bearer).unwrap_or_default());
	let search = CallArgs::new().arg(31.2304).arg(121.4737).kwarg("q", "coffee");
	let checkin = CallArgs::new().kwarg("vid", "42").kwarg("shout", "Morning coffee.");

	println!("Venue search: {:?}.", client.prepare("venues", search.clone())?);

	match client.prepare("checkin", checkin.clone()) {
		Ok(request) => println!("Check-in: {} {} body={:?}.", request.method, request.url, request.body),
		Err(e) => println!("Check-in refused locally: {e}"),
	}

	if token.is_none() {
		println!("Set JIEPANG_TOKEN to send these requests.");

		return Ok(());
	}

	let venues = client.venues(search).await?;

	println!("Venues: {venues:#}");

	let receipt = client.checkin(checkin).await?;

	println!("Checked in: {receipt:#}");

	Ok(())
}
