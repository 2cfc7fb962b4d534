//! The booking backend as seen from the client.
//!
//! [`BookingApi`] is the collaborator seam: the dialog controller only ever
//! talks to the trait, so tests substitute an in-memory implementation.
//! [`HttpBookingApi`] is the production implementation over `reqwest`.

use async_trait::async_trait;

use crate::error::Result;
use crate::request::{BookingConfirmation, SessionRequest};
use crate::tutor::Tutor;

#[async_trait]
pub trait BookingApi: Send + Sync {
    /// Fetch the tutor listing, availability templates included.
    async fn fetch_tutors(&self) -> Result<Vec<Tutor>>;

    /// Submit a booking. A successful response should carry the payment
    /// redirect URL; callers check it with
    /// [`BookingConfirmation::into_redirect_url`].
    async fn submit_booking(&self, request: &SessionRequest) -> Result<BookingConfirmation>;
}

#[cfg(feature = "http")]
pub use http::HttpBookingApi;

#[cfg(feature = "http")]
mod http {
    use std::time::Duration;

    use async_trait::async_trait;
    use reqwest::{Client, Response};
    use serde::de::DeserializeOwned;
    use tracing::{debug, warn};

    use super::BookingApi;
    use crate::config::ClientConfig;
    use crate::error::{BookingError, Result};
    use crate::request::{BookingConfirmation, SessionRequest};
    use crate::tutor::Tutor;

    const TUTORS_PATH: &str = "tutors";
    const BOOK_PATH: &str = "sessions/book";

    /// JSON-over-HTTP client for the booking backend.
    #[derive(Debug, Clone)]
    pub struct HttpBookingApi {
        client: Client,
        base_url: String,
    }

    impl HttpBookingApi {
        /// Build a client from configuration.
        ///
        /// # Errors
        ///
        /// Returns [`BookingError::Config`] if the HTTP client cannot be built.
        pub fn new(config: &ClientConfig) -> Result<Self> {
            let client = Client::builder()
                .timeout(Duration::from_secs(config.request_timeout_secs))
                .build()
                .map_err(|e| BookingError::Config(format!("failed to build HTTP client: {e}")))?;
            Ok(Self {
                client,
                base_url: config.api_base_url.trim_end_matches('/').to_string(),
            })
        }

        fn url(&self, path: &str) -> String {
            format!("{}/{}", self.base_url, path)
        }
    }

    #[async_trait]
    impl BookingApi for HttpBookingApi {
        async fn fetch_tutors(&self) -> Result<Vec<Tutor>> {
            let url = self.url(TUTORS_PATH);
            debug!(%url, "fetching tutors");
            let response = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| BookingError::Transport(e.to_string()))?;
            decode(response).await
        }

        async fn submit_booking(&self, request: &SessionRequest) -> Result<BookingConfirmation> {
            let url = self.url(BOOK_PATH);
            debug!(%url, tutor_id = %request.tutor_id, "submitting booking");
            let response = self
                .client
                .post(&url)
                .json(request)
                .send()
                .await
                .map_err(|e| BookingError::Transport(e.to_string()))?;
            decode(response).await
        }
    }

    /// Turn a response into `T`, mapping non-2xx statuses to
    /// [`BookingError::Service`] with the body as the message.
    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = service_message(&body)
                .or_else(|| status.canonical_reason().map(str::to_string))
                .unwrap_or_else(|| "request failed".to_string());
            warn!(status = status.as_u16(), %message, "booking backend rejected request");
            return Err(BookingError::Service {
                status: status.as_u16(),
                message,
            });
        }
        response
            .json::<T>()
            .await
            .map_err(|e| BookingError::Decode(e.to_string()))
    }

    /// Pull a human-readable message out of an error body: the `message` or
    /// `error` field of a JSON object, or the raw text if it is not JSON.
    fn service_message(body: &str) -> Option<String> {
        let body = body.trim();
        if body.is_empty() {
            return None;
        }
        match serde_json::from_str::<serde_json::Value>(body) {
            Ok(value) => ["message", "error"]
                .iter()
                .find_map(|key| value.get(key).and_then(|v| v.as_str()))
                .map(str::to_string),
            Err(_) => Some(body.to_string()),
        }
    }

}
