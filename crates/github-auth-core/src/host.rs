//! Trait boundaries for the host application's UI surface and its
//! authentication registry. The host owns the actual widgets and the
//! provider bookkeeping; this crate only drives them.

use std::sync::Arc;

use async_trait::async_trait;
use url::Url;

use crate::error::AuthError;
use crate::session::AuthenticationSession;

/// The user's answer to the create-session prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethodChoice {
    UsePat,
    UseBrowser,
    Cancel,
}

/// The user's answer to the device-code confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceLoginChoice {
    Continue,
    Cancel,
}

/// UI primitives the host must provide for the interactive flows.
#[async_trait]
pub trait HostUi: Send + Sync {
    /// Three-way choice between a PAT, the browser device flow, and
    /// cancelling outright.
    async fn choose_authentication_method(&self) -> AuthMethodChoice;

    /// Show the one-time user code with its expiry (in minutes) and ask
    /// for explicit continuation.
    async fn confirm_device_login(
        &self,
        user_code: &str,
        expires_in_minutes: u64,
    ) -> DeviceLoginChoice;

    /// Masked single-line input for a manually issued token. `None` when
    /// the user dismissed the prompt.
    async fn read_personal_access_token(&self, required_scopes: &[String]) -> Option<String>;

    /// Open a URL in the user's default browser. Best effort: failures
    /// are logged and never fail the calling flow.
    fn open_external(&self, url: &Url) {
        if let Err(err) = open::that(url.as_str()) {
            tracing::warn!(%url, error = %err, "failed to open system browser");
        }
    }
}

/// Registration metadata shown by the host next to the provider.
#[derive(Debug, Clone, Default)]
pub struct ProviderMetadata {
    pub icon: Option<String>,
}

/// The operations the host drives once a provider is registered.
#[async_trait]
pub trait AuthenticationProvider: Send + Sync {
    async fn create_session(&self, scopes: &[String])
        -> Result<AuthenticationSession, AuthError>;

    async fn get_sessions(
        &self,
        scopes: Option<&[String]>,
    ) -> Result<Vec<AuthenticationSession>, AuthError>;

    async fn remove_session(&self, session_id: &str) -> Result<(), AuthError>;
}

/// The host's authentication subsystem.
#[async_trait]
pub trait AuthenticationRegistry: Send + Sync {
    async fn register_provider(
        &self,
        provider_id: &str,
        display_name: &str,
        provider: Arc<dyn AuthenticationProvider>,
        metadata: ProviderMetadata,
    ) -> Result<(), AuthError>;

    /// Look up an existing session without creating one. Used here only
    /// as a probe; `create_if_none` is always `false` from this crate.
    async fn get_session(
        &self,
        provider_id: &str,
        scopes: &[String],
        create_if_none: bool,
    ) -> Result<Option<AuthenticationSession>, AuthError>;
}
