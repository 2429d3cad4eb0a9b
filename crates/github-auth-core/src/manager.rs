//! Session manager: owns the in-memory session collection, drives the
//! two authentication flows, and registers itself with the host as the
//! GitHub authentication provider.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{broadcast, Mutex};

use crate::device::{DeviceAuthorization, DeviceTokenExchange, UserLookup};
use crate::error::AuthError;
use crate::flows::AuthFlows;
use crate::host::{
    AuthMethodChoice, AuthenticationProvider, AuthenticationRegistry, HostUi, ProviderMetadata,
};
use crate::session::{AuthenticationSession, SessionChangeEvent, SessionState};
use crate::storage::SecretStorage;

pub const PROVIDER_ID: &str = "github-authentication";
pub const PROVIDER_DISPLAY_NAME: &str = "GitHub authentication";
pub const PROVIDER_ICON: &str = "icon.png";

/// Fixed key under which the serialized session array is stored.
pub const AUTHENTICATION_SESSIONS_KEY: &str = "github-authentication-sessions";

const CHANGE_EVENT_CAPACITY: usize = 16;

/// Owns the working session collection and the sequence counter, and
/// exposes create/get/remove/persist/restore to the host.
///
/// Callers are expected to serialize their invocations; there is no
/// cross-operation locking beyond what each operation needs itself.
pub struct ProviderSessionManager<G, U, S, R> {
    flows: AuthFlows<G, U>,
    storage: S,
    registry: Arc<R>,
    state: Mutex<SessionState>,
    events: broadcast::Sender<SessionChangeEvent>,
}

impl<G, U, S, R> ProviderSessionManager<G, U, S, R>
where
    G: DeviceAuthorization + DeviceTokenExchange + UserLookup + 'static,
    U: HostUi + 'static,
    S: SecretStorage + 'static,
    R: AuthenticationRegistry + 'static,
{
    pub fn new(flows: AuthFlows<G, U>, storage: S, registry: Arc<R>) -> Self {
        let (events, _) = broadcast::channel(CHANGE_EVENT_CAPACITY);
        Self {
            flows,
            storage,
            registry,
            state: Mutex::new(SessionState::new()),
            events,
        }
    }

    /// Subscribe to session added/removed notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionChangeEvent> {
        self.events.subscribe()
    }

    /// Host activation sequence: register the provider, restore persisted
    /// sessions, then probe for an existing session without UI.
    pub async fn activate(self: Arc<Self>) -> Result<(), AuthError> {
        self.clone().register_authentication_provider().await?;
        self.restore_sessions().await?;
        self.registry.get_session(PROVIDER_ID, &[], false).await?;
        Ok(())
    }

    /// Host deactivation hook.
    pub async fn deactivate(&self) -> Result<(), AuthError> {
        self.save_sessions().await
    }

    /// Expose this manager to the host as "the" GitHub authentication
    /// provider.
    pub async fn register_authentication_provider(self: Arc<Self>) -> Result<(), AuthError> {
        tracing::info!(provider_id = PROVIDER_ID, "registering authentication provider");
        let registry = self.registry.clone();
        registry
            .register_provider(
                PROVIDER_ID,
                PROVIDER_DISPLAY_NAME,
                self as Arc<dyn AuthenticationProvider>,
                ProviderMetadata {
                    icon: Some(PROVIDER_ICON.to_owned()),
                },
            )
            .await
    }

    /// Read the persisted store, replacing (not merging) the working
    /// collection; an absent key means no sessions.
    pub async fn restore_sessions(&self) -> Result<(), AuthError> {
        let sessions: Vec<AuthenticationSession> =
            match self.storage.get(AUTHENTICATION_SESSIONS_KEY).await? {
                Some(raw) => serde_json::from_str(&raw)?,
                None => Vec::new(),
            };
        tracing::info!(count = sessions.len(), "restored persisted sessions");
        self.state.lock().await.replace(sessions);
        Ok(())
    }

    /// Ask the user how to authenticate, run the chosen flow, and record
    /// its session.
    pub async fn create_session(
        &self,
        scopes: &[String],
    ) -> Result<AuthenticationSession, AuthError> {
        let mut state = self.state.lock().await;

        let session = match self.flows.ui().choose_authentication_method().await {
            AuthMethodChoice::UsePat => self.flows.pat_flow(scopes, &mut state).await?,
            AuthMethodChoice::UseBrowser => self.flows.device_flow(scopes, &mut state).await?,
            AuthMethodChoice::Cancel => return Err(AuthError::UserCancelled),
        };

        state.push(session.clone());
        let _ = self.events.send(SessionChangeEvent::added(session.clone()));
        Ok(session)
    }

    /// Without a filter, the full collection; with one, only sessions
    /// whose scopes contain every requested scope, in collection order.
    pub async fn get_sessions(
        &self,
        scopes: Option<&[String]>,
    ) -> Result<Vec<AuthenticationSession>, AuthError> {
        let state = self.state.lock().await;
        Ok(match scopes {
            None => state.sessions().to_vec(),
            Some(scopes) => state.matching(scopes),
        })
    }

    /// Remove a session by id. Removing the last session triggers a
    /// no-UI probe against the host's authentication subsystem, a
    /// self-check expected to be a no-op when nothing remains.
    pub async fn remove_session(&self, session_id: &str) -> Result<(), AuthError> {
        let emptied = {
            let mut state = self.state.lock().await;
            let removed = state
                .remove(session_id)
                .ok_or_else(|| AuthError::SessionNotFound(session_id.to_owned()))?;
            let _ = self.events.send(SessionChangeEvent::removed(removed));
            state.is_empty()
        };

        if emptied {
            self.registry.get_session(PROVIDER_ID, &[], false).await?;
        }
        Ok(())
    }

    /// Persist the working collection. An empty collection is represented
    /// by the absence of the key, never by an empty array.
    pub async fn save_sessions(&self) -> Result<(), AuthError> {
        let state = self.state.lock().await;
        if state.is_empty() {
            self.storage.delete(AUTHENTICATION_SESSIONS_KEY).await
        } else {
            let payload = serde_json::to_string(state.sessions())?;
            self.storage
                .store(AUTHENTICATION_SESSIONS_KEY, &payload)
                .await
        }
    }
}

#[async_trait]
impl<G, U, S, R> AuthenticationProvider for ProviderSessionManager<G, U, S, R>
where
    G: DeviceAuthorization + DeviceTokenExchange + UserLookup + 'static,
    U: HostUi + 'static,
    S: SecretStorage + 'static,
    R: AuthenticationRegistry + 'static,
{
    async fn create_session(
        &self,
        scopes: &[String],
    ) -> Result<AuthenticationSession, AuthError> {
        ProviderSessionManager::create_session(self, scopes).await
    }

    async fn get_sessions(
        &self,
        scopes: Option<&[String]>,
    ) -> Result<Vec<AuthenticationSession>, AuthError> {
        ProviderSessionManager::get_sessions(self, scopes).await
    }

    async fn remove_session(&self, session_id: &str) -> Result<(), AuthError> {
        ProviderSessionManager::remove_session(self, session_id).await
    }
}
