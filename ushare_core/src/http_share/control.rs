use crate::error::ShareError;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

/// Shared stop switch for the serve loop.
///
/// Handlers that hit an unrecoverable condition record it with [`abort`],
/// which also stops the server; `serve` then returns the recorded error.
///
/// [`abort`]: ServerControl::abort
#[derive(Debug, Clone, Default)]
pub struct ServerControl {
    token: CancellationToken,
    fatal: Arc<Mutex<Option<ShareError>>>,
}

impl ServerControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clean stop (Ctrl-C)
    pub fn shutdown(&self) {
        self.token.cancel();
    }

    /// Stop with an error. Only the first error is kept.
    pub fn abort(&self, err: ShareError) {
        if let Ok(mut slot) = self.fatal.lock() {
            if slot.is_none() {
                *slot = Some(err);
            }
        }
        self.token.cancel();
    }

    /// Resolves once a stop was requested
    pub async fn stopped(&self) {
        self.token.cancelled().await
    }

    pub fn take_fatal(&self) -> Option<ShareError> {
        self.fatal.lock().ok().and_then(|mut slot| slot.take())
    }
}
