//! Cookie session access for handlers.
//!
//! Wraps the Actix session so handlers deal in user ids and access tokens
//! rather than raw keys. The cookie is encrypted, so the access token never
//! reaches the browser in readable form. A session whose access token has
//! expired reads as signed out and is purged.

use std::sync::Arc;

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use chrono::DateTime;
use futures_util::future::LocalBoxFuture;
use mockable::{Clock, DefaultClock};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::domain::{AuthSession, Error, UserId, expiry_passed};
use crate::inbound::http::state::HttpState;

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const ACCESS_TOKEN_KEY: &str = "access_token";
pub(crate) const EXPIRES_AT_KEY: &str = "expires_at";

/// Per-request view of the signed-in user.
#[derive(Clone)]
pub struct SessionContext {
    session: Session,
    clock: Arc<dyn Clock>,
}

impl SessionContext {
    /// Wrap the Actix session, judging expiry by the system clock.
    pub fn new(session: Session) -> Self {
        Self::with_clock(session, Arc::new(DefaultClock))
    }

    pub fn with_clock(session: Session, clock: Arc<dyn Clock>) -> Self {
        Self { session, clock }
    }

    /// Store a freshly issued session, rotating the cookie.
    ///
    /// # Errors
    ///
    /// `401` when the session has already expired.
    pub fn sign_in(&self, session: &AuthSession) -> Result<(), Error> {
        if session.is_expired(self.clock.utc()) {
            return Err(Error::unauthorized("session has expired"));
        }
        self.session.renew();
        self.insert(USER_ID_KEY, session.user_id().to_string())?;
        self.insert(ACCESS_TOKEN_KEY, session.access_token.as_str().to_owned())?;
        match session.expires_at {
            Some(expiry) => self.insert(EXPIRES_AT_KEY, expiry.timestamp()),
            None => Ok(()),
        }
    }

    fn insert(&self, key: &str, value: impl Serialize) -> Result<(), Error> {
        self.session
            .insert(key, value)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, Error> {
        self.session
            .get::<T>(key)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))
    }

    /// Whether the stored access token has lapsed. An unreadable expiry
    /// counts as lapsed.
    fn has_expired(&self) -> bool {
        match self.session.get::<i64>(EXPIRES_AT_KEY) {
            Ok(None) => false,
            Ok(Some(timestamp)) => DateTime::from_timestamp(timestamp, 0)
                .is_none_or(|expiry| expiry_passed(Some(expiry), self.clock.utc())),
            Err(error) => {
                warn!(%error, "invalid expiry in session cookie");
                true
            }
        }
    }

    /// Signed-in user, if any. A malformed id or a lapsed session counts as
    /// signed out; a lapsed session is also purged.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        let Some(raw) = self.get::<String>(USER_ID_KEY)? else {
            return Ok(None);
        };
        if self.has_expired() {
            debug!("session expired; signing out");
            self.clear();
            return Ok(None);
        }
        match raw.parse::<UserId>() {
            Ok(id) => Ok(Some(id)),
            Err(error) => {
                warn!(%error, "invalid user id in session cookie");
                Ok(None)
            }
        }
    }

    /// Signed-in user or `401 Unauthorized`.
    pub fn require_user_id(&self) -> Result<UserId, Error> {
        self.user_id()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Access token issued by the auth service, if any.
    pub fn access_token(&self) -> Result<Option<Zeroizing<String>>, Error> {
        Ok(self.get::<String>(ACCESS_TOKEN_KEY)?.map(Zeroizing::new))
    }

    /// Drop every session key and expire the cookie.
    pub fn clear(&self) {
        self.session.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let clock = req
            .app_data::<web::Data<HttpState>>()
            .map(|state| Arc::clone(&state.clock));
        let fut = Session::from_request(req, payload);
        Box::pin(async move {
            let session = fut.await?;
            Ok(match clock {
                Some(clock) => Self::with_clock(session, clock),
                None => Self::new(session),
            })
        })
    }
}
