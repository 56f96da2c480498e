// self
use crate::{_prelude::*, http::HttpMethod};

/// Call future wrapped in the `jiepang.call` span.
#[cfg(feature = "tracing")]
pub type InstrumentedCall<F> = tracing::instrument::Instrumented<F>;
/// Call future, unchanged.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedCall<F> = F;

/// A span builder used by the dispatcher.
#[derive(Clone, Debug)]
pub struct CallSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl CallSpan {
	/// Creates a new span tagged with the method, its verb, and the credential kind.
	pub fn new(method: &'static str, verb: HttpMethod, credentials: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"jiepang.call",
				method,
				verb = verb.as_str(),
				credentials,
				status = tracing::field::Empty,
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (method, verb, credentials);

			Self {}
		}
	}

	/// Records the HTTP status once the response arrives.
	pub fn record_status(&self, status: u16) {
		#[cfg(feature = "tracing")]
		{
			self.span.record("status", status);
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = status;
		}
	}

	/// Runs `fut` inside the span; the span is entered on every poll, never held across `.await`.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedCall<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn call_span_passes_output_through() {
		let span = CallSpan::new("cities", HttpMethod::Get, "anonymous");

		span.record_status(200);

		let status = span.instrument(async { 204_u16 }).await;

		assert_eq!(status, 204);
	}
}
