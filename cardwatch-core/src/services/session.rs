//! Session state machine
//!
//! The dashboard moves through welcome -> sign-in -> authenticated. Every
//! transition is checked; nothing downstream runs without a username in
//! the authenticated phase.

use crate::domain::result::{Error, Result};

/// Where the user is in the dashboard flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPhase {
    /// Landing screen, nothing loaded yet
    Welcome,
    /// Login / sign-up prompts
    Auth,
    /// Logged in; uploads are allowed
    Authenticated { username: String },
}

/// One user's dashboard session.
#[derive(Debug, Clone)]
pub struct Session {
    phase: SessionPhase,
}

impl Session {
    pub fn new() -> Self {
        Self {
            phase: SessionPhase::Welcome,
        }
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.phase, SessionPhase::Authenticated { .. })
    }

    pub fn current_user(&self) -> Option<&str> {
        match &self.phase {
            SessionPhase::Authenticated { username } => Some(username),
            _ => None,
        }
    }

    /// Leave the welcome screen for the sign-in prompts.
    pub fn begin_auth(&mut self) -> Result<()> {
        match self.phase {
            SessionPhase::Welcome => {
                self.phase = SessionPhase::Auth;
                Ok(())
            }
            _ => Err(Error::validation("sign-in is already underway")),
        }
    }

    /// Record a successful login.
    pub fn login(&mut self, username: impl Into<String>) -> Result<()> {
        match self.phase {
            SessionPhase::Auth => {
                self.phase = SessionPhase::Authenticated {
                    username: username.into(),
                };
                Ok(())
            }
            SessionPhase::Welcome => Err(Error::validation("cannot log in from the welcome screen")),
            SessionPhase::Authenticated { .. } => {
                Err(Error::validation("a user is already logged in"))
            }
        }
    }

    /// Drop back to the sign-in prompts.
    pub fn logout(&mut self) -> Result<()> {
        match self.phase {
            SessionPhase::Authenticated { .. } => {
                self.phase = SessionPhase::Auth;
                Ok(())
            }
            _ => Err(Error::validation("no user is logged in")),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
