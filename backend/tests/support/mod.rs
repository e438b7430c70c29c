//! Shared helpers for the backend integration suites.

pub mod auth;
pub mod in_memory;

use coffee_chat::domain::{AuthSession, AuthUser, OnboardingDraft, UserId};
use zeroize::Zeroizing;

/// Signed-in session for `user_id` with an opaque token.
pub fn session_for(user_id: UserId) -> AuthSession {
    AuthSession {
        user: AuthUser {
            id: user_id,
            email: Some("jane@example.com".to_owned()),
            email_confirmed: true,
        },
        access_token: Zeroizing::new(format!("token-{user_id}")),
        refresh_token: None,
        expires_at: None,
    }
}

/// Wizard answers that pass every step.
pub fn complete_draft(first_name: &str) -> OnboardingDraft {
    OnboardingDraft {
        first_name: first_name.to_owned(),
        last_name: "Doe".to_owned(),
        interests: vec!["product design".to_owned()],
        goals: "Learn how design teams work".to_owned(),
        timezone: "Europe/London".to_owned(),
        preferred_roles: vec!["Designer".to_owned()],
        preferred_industries: vec!["Media".to_owned()],
        weekly_target: 2,
    }
}
