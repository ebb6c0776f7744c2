//! Cancellation scope tying in-flight requests to a mounted screen.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::error::ScreenError;

#[derive(Debug, Clone, Default)]
pub struct ScreenScope {
    token: CancellationToken,
}

impl ScreenScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drives `fut` to completion unless the scope is cancelled first.
    pub async fn run<F, T, E>(&self, fut: F) -> Result<T, ScreenError>
    where
        F: Future<Output = Result<T, E>>,
        E: Into<ScreenError>,
    {
        if self.token.is_cancelled() {
            return Err(ScreenError::Cancelled);
        }
        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(ScreenError::Cancelled),
            result = fut => result.map_err(Into::into),
        }
    }

    pub fn unmount(&self) {
        self.token.cancel();
    }

    pub fn is_unmounted(&self) -> bool {
        self.token.is_cancelled()
    }
}
