//! Access gating for the operator surface.
//!
//! Deliberately not a password check: the embedding surface supplies a
//! real credential collaborator through [`AccessGate`], and everything
//! defaults to denial.

use thiserror::Error;

/// Who is entering the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Browses active tests and takes attempts.
    Taker,
    /// Authors, publishes, and manages tests.
    Operator,
}

/// The supplied credential did not authorize operator access.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("access denied")]
pub struct AccessDenied;

/// Credential check for operator access.
pub trait AccessGate: Send + Sync {
    fn authorize(&self, credential: &str) -> Result<(), AccessDenied>;
}

/// The safe default: no credential is ever accepted.
pub struct DenyAll;

impl AccessGate for DenyAll {
    fn authorize(&self, _credential: &str) -> Result<(), AccessDenied> {
        Err(AccessDenied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SharedSecret(&'static str);

    impl AccessGate for SharedSecret {
        fn authorize(&self, credential: &str) -> Result<(), AccessDenied> {
            if credential == self.0 {
                Ok(())
            } else {
                Err(AccessDenied)
            }
        }
    }

    #[test]
    fn deny_all_rejects_everything() {
        assert_eq!(DenyAll.authorize(""), Err(AccessDenied));
        assert_eq!(DenyAll.authorize("hunter2"), Err(AccessDenied));
    }

    #[test]
    fn custom_gate_decides() {
        let gate = SharedSecret("correct horse");
        assert!(gate.authorize("correct horse").is_ok());
        assert_eq!(gate.authorize("wrong"), Err(AccessDenied));
    }
}
