//! Auth provider double holding accounts in memory.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use coffee_chat::domain::ports::{AuthProvider, AuthProviderError, SignUpResult};
use coffee_chat::domain::{
    AuthSession, AuthUser, Credentials, EmailAddress, OAuthProvider, Password, UserId,
};
use url::Url;
use zeroize::Zeroizing;

#[derive(Clone)]
struct Account {
    user_id: UserId,
    password: String,
    confirmed: bool,
}

/// Accepts sign-ups, then sign-ins once [`FakeAuthProvider::confirm`] runs.
#[derive(Clone, Default)]
pub struct FakeAuthProvider {
    accounts: Arc<Mutex<HashMap<String, Account>>>,
    revoked: Arc<Mutex<Vec<String>>>,
    confirmations_sent: Arc<Mutex<Vec<String>>>,
}

impl FakeAuthProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn accounts(&self) -> MutexGuard<'_, HashMap<String, Account>> {
        self.accounts.lock().expect("accounts lock")
    }

    /// Simulate the user clicking the confirmation link.
    pub fn confirm(&self, email: &str) {
        if let Some(account) = self.accounts().get_mut(email) {
            account.confirmed = true;
        }
    }

    pub fn revoked_tokens(&self) -> Vec<String> {
        self.revoked.lock().expect("revoked lock").clone()
    }

    pub fn confirmations_sent(&self) -> Vec<String> {
        self.confirmations_sent.lock().expect("confirmations lock").clone()
    }
}

fn auth_user(email: &str, account: &Account) -> AuthUser {
    AuthUser {
        id: account.user_id,
        email: Some(email.to_owned()),
        email_confirmed: account.confirmed,
    }
}

#[async_trait]
impl AuthProvider for FakeAuthProvider {
    async fn sign_in_with_password(
        &self,
        credentials: &Credentials,
    ) -> Result<AuthSession, AuthProviderError> {
        let email = credentials.email().as_str();
        let accounts = self.accounts();
        let account = accounts
            .get(email)
            .filter(|a| a.password == credentials.password().expose())
            .ok_or_else(AuthProviderError::invalid_credentials)?;
        if !account.confirmed {
            return Err(AuthProviderError::email_not_confirmed());
        }
        Ok(AuthSession {
            user: auth_user(email, account),
            access_token: Zeroizing::new(format!("access-{}", account.user_id)),
            refresh_token: Some(Zeroizing::new(format!("refresh-{}", account.user_id))),
            expires_at: None,
        })
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<SignUpResult, AuthProviderError> {
        let email = credentials.email().as_str().to_owned();
        let mut accounts = self.accounts();
        if accounts.contains_key(&email) {
            return Err(AuthProviderError::user_already_registered());
        }
        let account = Account {
            user_id: UserId::random(),
            password: credentials.password().expose().to_owned(),
            confirmed: false,
        };
        let user = auth_user(&email, &account);
        accounts.insert(email, account);
        Ok(SignUpResult {
            user,
            session: None,
        })
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthProviderError> {
        self.revoked
            .lock()
            .expect("revoked lock")
            .push(access_token.to_owned());
        Ok(())
    }

    async fn send_password_reset(&self, email: &EmailAddress) -> Result<(), AuthProviderError> {
        if self.accounts().contains_key(email.as_str()) {
            Ok(())
        } else {
            Err(AuthProviderError::user_not_found())
        }
    }

    async fn update_password(
        &self,
        access_token: &str,
        password: &Password,
    ) -> Result<AuthUser, AuthProviderError> {
        let mut accounts = self.accounts();
        let (email, account) = accounts
            .iter_mut()
            .find(|(_, a)| access_token == format!("access-{}", a.user_id))
            .ok_or_else(AuthProviderError::session_missing)?;
        account.password = password.expose().to_owned();
        Ok(auth_user(email, account))
    }

    async fn resend_confirmation(&self, email: &EmailAddress) -> Result<(), AuthProviderError> {
        self.confirmations_sent
            .lock()
            .expect("confirmations lock")
            .push(email.as_str().to_owned());
        Ok(())
    }

    fn authorize_url(&self, provider: OAuthProvider) -> Result<Url, AuthProviderError> {
        Url::parse(&format!(
            "https://auth.example.com/authorize?provider={}",
            provider.as_str()
        ))
        .map_err(|err| AuthProviderError::decode(err.to_string()))
    }
}
