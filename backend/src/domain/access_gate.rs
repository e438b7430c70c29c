//! Access gate: routes a visitor to Login, Onboarding or the main app.
//!
//! Resolution happens in two steps: the session decides signed in or not,
//! then the preferences row decides whether onboarding is complete. A failed
//! preferences lookup is logged and treated as "no profile".
//!
//! ```text
//! Unresolved ──► LoggedOut
//!           ├──► LoggedIn(NoProfile)
//!           └──► LoggedIn(HasProfile)
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use utoipa::ToSchema;

use super::UserId;
use super::ports::{GateQuery, SessionSource, UserPreferencesRepository};

/// Whether a signed-in user finished onboarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileStatus {
    NoProfile,
    HasProfile,
}

/// Gate state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// Session or profile lookup still pending.
    Unresolved,
    LoggedOut,
    LoggedIn(ProfileStatus),
}

/// Top-level view to present for a [`GateState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum GateView {
    /// Nothing but a spinner; no route is rendered.
    Loading,
    Login,
    Onboarding,
    Main,
}

impl GateState {
    /// View for this state.
    ///
    /// # Examples
    /// ```
    /// use coffee_chat::domain::{GateState, GateView, ProfileStatus};
    ///
    /// assert_eq!(GateState::LoggedOut.view(), GateView::Login);
    /// assert_eq!(
    ///     GateState::LoggedIn(ProfileStatus::NoProfile).view(),
    ///     GateView::Onboarding
    /// );
    /// ```
    pub fn view(self) -> GateView {
        match self {
            Self::Unresolved => GateView::Loading,
            Self::LoggedOut => GateView::Login,
            Self::LoggedIn(ProfileStatus::NoProfile) => GateView::Onboarding,
            Self::LoggedIn(ProfileStatus::HasProfile) => GateView::Main,
        }
    }

    pub fn is_resolved(self) -> bool {
        !matches!(self, Self::Unresolved)
    }
}

/// Resolves gate state from the preferences store.
pub struct AccessGate<P> {
    preferences: Arc<P>,
}

impl<P> Clone for AccessGate<P> {
    fn clone(&self) -> Self {
        Self {
            preferences: Arc::clone(&self.preferences),
        }
    }
}

impl<P> AccessGate<P>
where
    P: UserPreferencesRepository + 'static,
{
    pub fn new(preferences: Arc<P>) -> Self {
        Self { preferences }
    }

    /// Resolve the state for an optional signed-in user.
    pub async fn resolve_for(&self, user_id: Option<UserId>) -> GateState {
        let Some(user_id) = user_id else {
            return GateState::LoggedOut;
        };
        let status = match self.preferences.find_by_user_id(&user_id).await {
            Ok(Some(prefs)) if prefs.has_profile() => ProfileStatus::HasProfile,
            Ok(_) => ProfileStatus::NoProfile,
            Err(err) => {
                warn!(%user_id, error = %err, "preferences lookup failed; routing to onboarding");
                ProfileStatus::NoProfile
            }
        };
        GateState::LoggedIn(status)
    }

    /// Follow `sessions` until the returned handle is dropped or the source
    /// closes, republishing the gate state on every change.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn spawn(&self, sessions: &dyn SessionSource) -> AccessGateHandle {
        let (tx, rx) = watch::channel(GateState::Unresolved);
        let mut subscription = sessions.subscribe();
        let gate = self.clone();
        let task = tokio::spawn(async move {
            loop {
                let user_id = subscription
                    .borrow_and_update()
                    .as_ref()
                    .map(|session| session.user_id());
                tx.send_replace(GateState::Unresolved);
                let state = gate.resolve_for(user_id).await;
                debug!(?state, "access gate resolved");
                if tx.send(state).is_err() {
                    break;
                }
                if subscription.changed().await.is_err() {
                    debug!("session source closed; access gate stopping");
                    break;
                }
            }
        });
        AccessGateHandle { state: rx, task }
    }
}

#[async_trait]
impl<P> GateQuery for AccessGate<P>
where
    P: UserPreferencesRepository + 'static,
{
    async fn resolve(&self, user_id: Option<UserId>) -> GateState {
        self.resolve_for(user_id).await
    }
}

/// Live subscription created by [`AccessGate::spawn`].
///
/// Dropping the handle aborts the background task, which drops the session
/// receiver.
pub struct AccessGateHandle {
    state: watch::Receiver<GateState>,
    task: JoinHandle<()>,
}

impl AccessGateHandle {
    /// Latest published state.
    pub fn current(&self) -> GateState {
        *self.state.borrow()
    }

    /// Wait for the next state change. `None` once the gate has stopped.
    pub async fn changed(&mut self) -> Option<GateState> {
        self.state.changed().await.ok()?;
        Some(*self.state.borrow_and_update())
    }

    /// Wait until a resolved state is published.
    pub async fn resolved(&mut self) -> Option<GateState> {
        self.state
            .wait_for(|state| state.is_resolved())
            .await
            .ok()
            .map(|state| *state)
    }

    /// Stop following session changes and release the session receiver.
    pub fn shutdown(self) {
        self.task.abort();
    }

    /// Whether the background task is still following the session.
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for AccessGateHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        FixtureUserPreferencesRepository, MockUserPreferencesRepository,
        UserPreferencesRepositoryError,
    };
    use crate::domain::{AuthSession, AuthUser, UserPreferences};
    use rstest::rstest;
    use std::time::Duration;
    use zeroize::Zeroizing;

    fn repo_returning(
        result: Result<Option<UserPreferences>, UserPreferencesRepositoryError>,
    ) -> Arc<MockUserPreferencesRepository> {
        let mut repo = MockUserPreferencesRepository::new();
        repo.expect_find_by_user_id()
            .returning(move |_| result.clone());
        Arc::new(repo)
    }

    fn session_for(user_id: UserId) -> AuthSession {
        AuthSession {
            user: AuthUser {
                id: user_id,
                email: Some("jane@example.com".into()),
                email_confirmed: true,
            },
            access_token: Zeroizing::new("token".into()),
            refresh_token: None,
            expires_at: None,
        }
    }

    #[tokio::test]
    async fn anonymous_visitor_goes_to_login_without_lookup() {
        let mut repo = MockUserPreferencesRepository::new();
        repo.expect_find_by_user_id().never();
        let gate = AccessGate::new(Arc::new(repo));
        assert_eq!(gate.resolve_for(None).await, GateState::LoggedOut);
    }

    #[rstest]
    #[case::named(Ok(Some(UserPreferences::builder(UserId::random()).first_name("Jane").build())), GateView::Main)]
    #[case::blank_name(Ok(Some(UserPreferences::builder(UserId::random()).first_name(" ").build())), GateView::Onboarding)]
    #[case::missing_row(Ok(None), GateView::Onboarding)]
    #[case::lookup_error(Err(UserPreferencesRepositoryError::connection("down")), GateView::Onboarding)]
    #[tokio::test]
    async fn signed_in_user_routes_by_profile(
        #[case] lookup: Result<Option<UserPreferences>, UserPreferencesRepositoryError>,
        #[case] expected: GateView,
    ) {
        let gate = AccessGate::new(repo_returning(lookup));
        let state = gate.resolve_for(Some(UserId::random())).await;
        assert_eq!(state.view(), expected);
    }

    struct ChannelSource(watch::Sender<Option<AuthSession>>);

    impl SessionSource for ChannelSource {
        fn current(&self) -> Option<AuthSession> {
            self.0.borrow().clone()
        }

        fn subscribe(&self) -> watch::Receiver<Option<AuthSession>> {
            self.0.subscribe()
        }
    }

    #[tokio::test]
    async fn spawned_gate_follows_session_changes() {
        let (tx, _rx) = watch::channel(None);
        let source = ChannelSource(tx);
        let gate = AccessGate::new(repo_returning(Ok(None)));
        let mut handle = gate.spawn(&source);

        assert_eq!(handle.resolved().await, Some(GateState::LoggedOut));

        source.0.send_replace(Some(session_for(UserId::random())));
        let state = tokio::time::timeout(Duration::from_secs(1), async {
            loop {
                match handle.changed().await {
                    Some(GateState::Unresolved) => continue,
                    other => break other,
                }
            }
        })
        .await
        .expect("gate reacts to sign-in");
        assert_eq!(state, Some(GateState::LoggedIn(ProfileStatus::NoProfile)));
    }

    async fn await_release(source: &ChannelSource) {
        tokio::time::timeout(Duration::from_secs(1), async {
            while source.0.receiver_count() > 1 {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("subscription released");
    }

    #[tokio::test]
    async fn shutdown_releases_subscription() {
        let (tx, _rx) = watch::channel(None);
        let source = ChannelSource(tx);
        let gate = AccessGate::new(Arc::new(FixtureUserPreferencesRepository));
        let mut handle = gate.spawn(&source);
        handle.resolved().await;
        assert_eq!(source.0.receiver_count(), 2);

        handle.shutdown();
        await_release(&source).await;
    }

    #[tokio::test]
    async fn dropping_handle_releases_subscription() {
        let (tx, _rx) = watch::channel(None);
        let source = ChannelSource(tx);
        let gate = AccessGate::new(Arc::new(FixtureUserPreferencesRepository));
        let mut handle = gate.spawn(&source);
        handle.resolved().await;
        assert_eq!(source.0.receiver_count(), 2);

        drop(handle);
        await_release(&source).await;
    }

    #[tokio::test]
    async fn gate_stops_when_source_closes() {
        let (tx, rx) = watch::channel(None);
        drop(rx);
        let source = ChannelSource(tx);
        let gate = AccessGate::new(Arc::new(FixtureUserPreferencesRepository));
        let mut handle = gate.spawn(&source);
        handle.resolved().await;
        drop(source);
        tokio::time::timeout(Duration::from_secs(1), async {
            while handle.is_running() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("gate task ends with its source");
    }
}
