use crate::error::GateError;

/// Passphrase prompt in front of add and delete.
///
/// This is friction against accidental edits on a shared scoreboard. It compares plain strings held
/// by the same process that does the writing, so anyone with access to the store can skip it.
/// Real access control would have to live in the store itself.
#[derive(Debug, Clone, Default)]
pub struct AdminGate {
    passphrase: Option<String>,
}

impl AdminGate {
    /// Gate that lets everything through.
    pub fn disabled() -> Self {
        Self { passphrase: None }
    }

    pub fn with_passphrase(passphrase: impl Into<String>) -> Self {
        Self { passphrase: Some(passphrase.into()) }
    }

    pub fn is_enabled(&self) -> bool {
        self.passphrase.is_some()
    }

    pub fn check(&self, attempt: Option<&str>) -> Result<(), GateError> {
        match &self.passphrase {
            None => Ok(()),
            Some(expected) if attempt == Some(expected.as_str()) => Ok(()),
            Some(_) => {
                tracing::warn!("mutation rejected by admin gate");
                Err(GateError::Rejected)
            }
        }
    }
}
