//! Export backend that writes nothing
//!
//! Used by `export --dry-run`: every request is logged and kept so the
//! planned files can be listed afterwards.

use crate::adapters::host::{ExportBackend, ExportRequest};
use crate::domain::errors::ExportFailure;
use async_trait::async_trait;
use std::sync::Mutex;

/// Records export requests instead of writing files
#[derive(Debug, Default)]
pub struct DryRunBackend {
    requests: Mutex<Vec<ExportRequest>>,
}

impl DryRunBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests received so far, in call order
    pub fn planned(&self) -> Vec<ExportRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ExportBackend for DryRunBackend {
    async fn export(&self, request: &ExportRequest) -> Result<(), ExportFailure> {
        tracing::info!(
            path = %request.path.display(),
            target = %request.target_name,
            format = %request.format,
            "Dry run: would export"
        );

        self.requests
            .lock()
            .map_err(|_| ExportFailure::Backend("dry-run request log poisoned".to_string()))?
            .push(request.clone());
        Ok(())
    }
}
