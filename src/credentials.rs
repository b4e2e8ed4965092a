//! The credential gate in front of the workflow.
//!
//! The original host exposed an ambient key-picker object; here the host is
//! an injected capability so tests and other frontends can substitute it.
//! The gate is checked once at startup and revised afterwards in exactly
//! one place: a credential-classified generation failure revokes it.

/// Host environment capable of reporting and selecting an API credential.
pub trait CredentialHost {
    /// Whether a usable API credential is currently active.
    fn has_active_key(&self) -> bool;

    /// Asks the host to let the user pick a credential. The gate re-checks
    /// afterwards; hosts that cannot prompt just explain how to supply one.
    fn request_selection(&self);
}

/// Credential host backed by the `GOOGLE_API_KEY` environment variable.
#[derive(Debug, Clone, Default)]
pub struct EnvCredentialHost;

impl CredentialHost for EnvCredentialHost {
    fn has_active_key(&self) -> bool {
        std::env::var("GOOGLE_API_KEY")
            .map(|v| !v.trim().is_empty())
            .unwrap_or(false)
    }

    fn request_selection(&self) {
        eprintln!("Set the GOOGLE_API_KEY environment variable to a key with billing enabled for Gemini 3 Pro.");
        eprintln!("Keys can be created at https://aistudio.google.com");
    }
}

/// Blocks the workflow until the host reports an active credential.
pub struct CredentialGate<H> {
    host: Option<H>,
    available: bool,
}

impl<H: CredentialHost> CredentialGate<H> {
    /// Creates the gate, performing the startup check.
    pub fn new(host: H) -> Self {
        let available = host.has_active_key();
        Self {
            host: Some(host),
            available,
        }
    }

    /// Whether the workflow may run.
    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Triggers the host's selection flow, then re-checks.
    pub fn request_selection(&mut self) -> bool {
        if let Some(host) = &self.host {
            host.request_selection();
        }
        self.recheck()
    }

    /// Re-reads the host's credential state.
    pub fn recheck(&mut self) -> bool {
        if let Some(host) = &self.host {
            self.available = host.has_active_key();
        }
        self.available
    }

    /// Flips the gate back to absent. Called only when a generation failure
    /// was classified as a credential problem, so the blocking screen
    /// reappears and prompts re-selection.
    pub fn revoke(&mut self) {
        tracing::warn!("active API key rejected, blocking workflow until a new key is selected");
        self.available = false;
    }
}

impl CredentialGate<EnvCredentialHost> {
    /// Gate for non-hosted development contexts with no credential API:
    /// assume a key is available and let the API itself reject it.
    pub fn assume_available() -> Self {
        Self {
            host: None,
            available: true,
        }
    }
}
