//! Access-gate boundary.
//!
//! The quoting engine does not depend on authentication; the gate exists so
//! the application shell has a seam to hang a real identity provider on.
//! `StaticCredentialGate` mirrors the legacy single-credential login and is
//! explicitly not a security mechanism.

use secrecy::{ExposeSecret, SecretString};

pub trait AccessGate: Send + Sync {
    fn authenticate(&self, username: &str, password: &str) -> bool;
}

/// Single fixed credential pair.
pub struct StaticCredentialGate {
    username: String,
    password: SecretString,
}

impl StaticCredentialGate {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: password.into().into() }
    }
}

impl AccessGate for StaticCredentialGate {
    fn authenticate(&self, username: &str, password: &str) -> bool {
        username == self.username && password == self.password.expose_secret()
    }
}

/// Gate that admits everyone. For local tooling and tests.
#[derive(Default)]
pub struct OpenGate;

impl AccessGate for OpenGate {
    fn authenticate(&self, _username: &str, _password: &str) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::{AccessGate, OpenGate, StaticCredentialGate};

    #[test]
    fn static_gate_matches_exact_credentials_only() {
        let gate = StaticCredentialGate::new("sales", "hunter2");
        assert!(gate.authenticate("sales", "hunter2"));
        assert!(!gate.authenticate("sales", "wrong"));
        assert!(!gate.authenticate("admin", "hunter2"));
    }

    #[test]
    fn open_gate_admits_everyone() {
        assert!(OpenGate.authenticate("anyone", "anything"));
    }
}
