//! GitHub authentication provider for a desktop extension host.
//!
//! Obtains OAuth access tokens through the interactive device flow or a
//! manually supplied personal access token, persists session records via
//! the host's secret storage, and answers scope-filtered session queries
//! once registered as the host's GitHub authentication provider.

pub mod config;
mod device;
mod error;
mod flows;
mod github;
mod host;
mod manager;
pub mod scopes;
mod session;
mod storage;

pub use device::{
    wait_for_access_token, AuthenticatedUser, DeviceAuthorization, DeviceCodeResponse,
    DeviceTokenExchange, PollOutcome, UserLookup, DEVICE_SESSION_ID_PREFIX,
};
pub use error::AuthError;
pub use flows::{AuthFlows, DEVICE_FLOW_MAX_ATTEMPTS, PAT_SESSION_ID_PREFIX};
pub use github::{GitHubClient, GitHubEndpoints, GRANT_TYPE};
pub use host::{
    AuthMethodChoice, AuthenticationProvider, AuthenticationRegistry, DeviceLoginChoice, HostUi,
    ProviderMetadata,
};
pub use manager::{
    ProviderSessionManager, AUTHENTICATION_SESSIONS_KEY, PROVIDER_DISPLAY_NAME, PROVIDER_ICON,
    PROVIDER_ID,
};
pub use session::{AuthenticationSession, SessionAccount, SessionChangeEvent, SessionState};
pub use storage::{FileSecretStorage, SecretStorage};
