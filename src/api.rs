//! Declarative catalog of every remote operation and the typed façade generated from it.
//!
//! Each entry expands into a [`MethodSpec`] inside [`CATALOG`] and into a one-line forwarder on
//! [`Client`], so a misspelled method is a compile error instead of an
//! [`Error::UnknownMethod`] at runtime.

// self
use crate::{
	_prelude::*,
	client::{CallArgs, Client},
	http::{ApiHttpClient, HttpMethod},
	registry::MethodSpec,
};

macro_rules! def_api {
	($(
		$(#[$doc:meta])*
		$fn_name:ident => $name:literal {
			$verb:ident,
			auth: $auth:literal,
			required: [$($required:literal),* $(,)?],
			optional: [$($optional:literal),* $(,)?] $(,)?
		}
	)*) => {
		/// Every method exposed by the remote service, in catalog order.
		pub const CATALOG: &[MethodSpec] = &[$(
			MethodSpec::new($name)
				.http_method(HttpMethod::$verb)
				.auth_required($auth)
				.required(&[$($required),*])
				.optional(&[$($optional),*]),
		)*];

		impl<C> Client<C>
		where
			C: ?Sized + ApiHttpClient,
		{
			$(
				$(#[$doc])*
				#[doc = ""]
				#[doc = concat!(
					"Calls `", $name, "` (", stringify!($verb), ", auth required: ",
					stringify!($auth), ")."
				)]
				pub async fn $fn_name(&self, args: CallArgs) -> Result<Value> {
					self.call($name, args).await
				}
			)*
		}
	};
}

def_api! {
	/// Lists supported cities.
	cities => "cities" { Get, auth: false, required: [], optional: [] }
	/// Resolves the city that contains a coordinate.
	checkcity => "checkcity" { Get, auth: false, required: ["geolat", "geolong"], optional: [] }
	/// Switches the authenticated user's home city.
	switchcity => "switchcity" { Post, auth: true, required: ["cityid"], optional: [] }

	/// Lists recent check-in statuses.
	statuses_list => "statuses__list" {
		Get,
		auth: false,
		required: ["type"],
		optional: ["count", "id"],
	}
	/// Checks in at a venue, optionally broadcasting a shout.
	checkin => "checkin" {
		Post,
		auth: true,
		required: [],
		optional: ["vid", "venue", "shout", "private", "twitter", "facebook", "geolat", "geolong"],
	}
	/// Lists the authenticated user's check-in history.
	history => "history" { Get, auth: true, required: [], optional: ["l", "sinceid"] }

	/// Verifies the current credentials.
	account_verify_credentials => "account__verify_credentials" {
		Get,
		auth: true,
		required: [],
		optional: [],
	}
	/// Shows a user profile.
	user => "user" { Get, auth: true, required: [], optional: ["uid", "badges", "mayor"] }
	/// Lists a user's friends.
	friends => "friends" { Get, auth: true, required: [], optional: ["uid"] }

	/// Searches venues near a coordinate.
	venues => "venues" { Get, auth: false, required: ["geolat", "geolong"], optional: ["l", "q"] }
	/// Shows one location.
	locations_show => "locations__show" { Get, auth: false, required: ["guid"], optional: [] }
	/// Adds a venue.
	addvenue => "addvenue" {
		Post,
		auth: true,
		required: ["name", "address", "crossstreet", "city", "state", "cityid"],
		optional: ["zip", "phone", "geolat", "geolong"],
	}
	/// Proposes an edit to an existing venue.
	venue_proposeedit => "venue_proposeedit" {
		Post,
		auth: true,
		required: ["vid", "name", "address", "crossstreet", "city", "state", "geolat", "geolong"],
		optional: ["zip", "phone"],
	}
	/// Flags a venue as closed.
	venue_flagclosed => "venue_flagclosed" { Post, auth: true, required: ["vid"], optional: [] }

	/// Lists tips near a coordinate.
	tips => "tips" { Get, auth: false, required: ["geolat", "geolong"], optional: ["l"] }
	/// Adds a tip to a venue.
	addtip => "addtip" {
		Post,
		auth: true,
		required: ["vid", "text"],
		optional: ["type", "geolat", "geolong"],
	}
	/// Marks a tip as to-do.
	tip_marktodo => "tip_marktodo" { Post, auth: true, required: ["tid"], optional: [] }
	/// Marks a tip as done.
	tip_markdone => "tip_markdone" { Post, auth: true, required: ["tid"], optional: [] }

	/// Updates ping settings.
	setpings => "setpings" { Post, auth: true, required: ["self", "uid"], optional: [] }

	/// Lists pending friend requests.
	friend_requests => "friend_requests" { Get, auth: true, required: [], optional: [] }
	/// Approves a friend request.
	friend_approve => "friend_approve" { Post, auth: true, required: ["uid"], optional: [] }
	/// Denies a friend request.
	friend_deny => "friend_deny" { Post, auth: true, required: ["uid"], optional: [] }
	/// Sends a friend request.
	friend_sendrequest => "friend_sendrequest" { Post, auth: true, required: ["uid"], optional: [] }
	/// Finds friends by name.
	findfriends_byname => "findfriends_byname" { Get, auth: true, required: ["q"], optional: [] }
	/// Finds friends by phone number.
	findfriends_byphone => "findfriends_byphone" { Get, auth: true, required: ["q"], optional: [] }
	/// Finds friends through linked Twitter accounts.
	findfriends_bytwitter => "findfriends_bytwitter" {
		Get,
		auth: true,
		required: [],
		optional: ["q"],
	}
}
