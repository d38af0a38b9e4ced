//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::ApiConfig;
use crate::services::{EmailService, MediaRelayClient};
use crate::services::media::RelayError;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the database pool and configuration. The relay
/// clients are `None` when their credentials are absent; handlers degrade
/// per the interface contract instead of crashing.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    pool: SqlitePool,
    media: Option<MediaRelayClient>,
    email: Option<EmailService>,
}

impl AppState {
    /// Create a new application state, building relay clients from whatever
    /// credentials the configuration carries.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured media relay client fails to build.
    /// A failed SMTP transport build is logged and disables notifications
    /// rather than failing startup.
    pub fn new(config: ApiConfig, pool: SqlitePool) -> Result<Self, RelayError> {
        let media = match config.media.as_ref() {
            Some(media_config) => Some(MediaRelayClient::new(media_config)?),
            None => None,
        };

        let email = config.email.as_ref().and_then(|email_config| {
            match EmailService::new(email_config) {
                Ok(service) => Some(service),
                Err(e) => {
                    tracing::warn!(error = %e, "SMTP transport unavailable, order notifications disabled");
                    None
                }
            }
        });

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                media,
                email,
            }),
        })
    }

    /// State with explicit relay clients, for tests that need to exercise
    /// configured/unconfigured combinations directly.
    #[must_use]
    pub fn with_services(
        config: ApiConfig,
        pool: SqlitePool,
        media: Option<MediaRelayClient>,
        email: Option<EmailService>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                media,
                email,
            }),
        }
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }

    /// Get the media relay client, if configured.
    #[must_use]
    pub fn media(&self) -> Option<&MediaRelayClient> {
        self.inner.media.as_ref()
    }

    /// Get the email service, if configured.
    #[must_use]
    pub fn email(&self) -> Option<&EmailService> {
        self.inner.email.as_ref()
    }
}
