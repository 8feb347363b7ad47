//! The account session
//!
//! A [`Session`] is shared (usually through an `Arc`) by every component that needs to know whether the account
//! is signed in. Components can either poll it, or [`subscribe`](Session::subscribe) to be notified of its changes.

use std::fmt::{Debug, Formatter};

use tokio::sync::watch;

/// An OAuth bearer token. Its value never shows up in `Debug` output
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new<S: Into<String>>(token: S) -> Self {
        Self(token.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl Debug for AccessToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "AccessToken(<redacted>)")
    }
}

/// Whether the account is signed in
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionState {
    SignedOut,
    SignedIn(AccessToken),
}

impl SessionState {
    pub fn is_signed_in(&self) -> bool {
        matches!(self, SessionState::SignedIn(_))
    }

    pub fn access_token(&self) -> Option<&AccessToken> {
        match self {
            SessionState::SignedIn(token) => Some(token),
            SessionState::SignedOut => None,
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState::SignedOut
    }
}

/// See [`Session::subscribe`]
pub type SessionReceiver = watch::Receiver<SessionState>;

/// The session of the account every remote call is made on behalf of
#[derive(Debug)]
pub struct Session {
    sender: watch::Sender<SessionState>,
}

impl Session {
    /// Create a session that is not signed in yet
    pub fn new() -> Self {
        let (sender, _receiver) = watch::channel(SessionState::default());
        Self { sender }
    }

    /// Create a session that is already signed in
    pub fn signed_in<S: Into<String>>(token: S) -> Self {
        let session = Self::new();
        session.sign_in(token);
        session
    }

    /// Mark the account as signed in (or replace the token of a signed-in session) and notify every subscriber
    pub fn sign_in<S: Into<String>>(&self, token: S) {
        let previous = self.sender.send_replace(SessionState::SignedIn(AccessToken::new(token)));
        if previous.is_signed_in() {
            log::debug!("Access token refreshed");
        } else {
            log::info!("Account signed in");
        }
    }

    /// Mark the account as signed out and notify every subscriber
    pub fn sign_out(&self) {
        let previous = self.sender.send_replace(SessionState::SignedOut);
        if previous.is_signed_in() {
            log::info!("Account signed out");
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.sender.borrow().is_signed_in()
    }

    /// The token that authorizes the remote calls, if the account is signed in
    pub fn access_token(&self) -> Option<AccessToken> {
        self.sender.borrow().access_token().cloned()
    }

    /// Returns a receiver that is notified every time the session changes
    pub fn subscribe(&self) -> SessionReceiver {
        self.sender.subscribe()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
