//! Shared fakes for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use paramsweep::adapters::host::{
    DesignHost, ExportBackend, ExportRequest, ObjectInfo, ProgressReporter,
};
use paramsweep::domain::ids::{ParameterName, TargetHandle};
use paramsweep::domain::job::{
    ExportFormat, ExportJob, ExportJobBuilder, ExportTarget, NamingOptions, ParameterKind,
};
use paramsweep::domain::{ExportFailure, Result, SweepError};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Mutex;

/// In-memory design host recording every parameter write
#[derive(Debug, Default)]
pub struct FakeHost {
    pub parameters: HashMap<String, String>,
    pub writes: Vec<(String, String)>,
    pub rejected: HashSet<String>,
    pub failing_compute: HashSet<String>,
    pub bodies: Vec<String>,
    pub components: Vec<String>,
    pub computes: usize,
    pub refreshes: usize,
    pending: usize,
}

impl FakeHost {
    pub fn new(parameter: &str, expression: &str) -> Self {
        let mut parameters = HashMap::new();
        parameters.insert(parameter.to_string(), expression.to_string());
        Self {
            parameters,
            bodies: vec!["Case".to_string(), "Lid".to_string()],
            ..Default::default()
        }
    }

    /// Reject `expression` in `set_parameter_expression`
    pub fn rejecting(mut self, expression: &str) -> Self {
        self.rejected.insert(expression.to_string());
        self
    }

    /// Fail `compute_all` while the swept parameter holds `expression`
    pub fn failing_compute_for(mut self, expression: &str) -> Self {
        self.failing_compute.insert(expression.to_string());
        self
    }

    pub fn expression(&self, name: &str) -> &str {
        self.parameters.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn written_expressions(&self) -> Vec<&str> {
        self.writes.iter().map(|(_, e)| e.as_str()).collect()
    }
}

#[async_trait]
impl DesignHost for FakeHost {
    fn parameter_expression(&self, name: &str) -> Result<String> {
        self.parameters
            .get(name)
            .cloned()
            .ok_or_else(|| SweepError::Parameter(format!("no parameter named '{name}'")))
    }

    fn set_parameter_expression(&mut self, name: &str, expression: &str) -> Result<()> {
        if self.rejected.contains(expression) {
            return Err(SweepError::Parameter(format!(
                "expression rejected: {expression}"
            )));
        }
        let slot = self
            .parameters
            .get_mut(name)
            .ok_or_else(|| SweepError::Parameter(format!("no parameter named '{name}'")))?;
        *slot = expression.to_string();
        self.writes.push((name.to_string(), expression.to_string()));
        Ok(())
    }

    async fn compute_all(&mut self) -> Result<()> {
        self.computes += 1;
        self.pending = 2;
        if self
            .parameters
            .values()
            .any(|e| self.failing_compute.contains(e))
        {
            return Err(SweepError::Regeneration("does not evaluate".to_string()));
        }
        Ok(())
    }

    async fn process_events(&mut self) -> bool {
        self.pending = self.pending.saturating_sub(1);
        self.pending > 0
    }

    fn refresh_viewport(&mut self) {
        self.refreshes += 1;
    }

    fn bodies(&self) -> Vec<ObjectInfo> {
        self.bodies
            .iter()
            .enumerate()
            .map(|(i, name)| ObjectInfo::new(name.as_str(), TargetHandle::body(i)))
            .collect()
    }

    fn components(&self) -> Vec<ObjectInfo> {
        self.components
            .iter()
            .enumerate()
            .map(|(i, name)| ObjectInfo::new(name.as_str(), TargetHandle::component(i)))
            .collect()
    }
}

/// Backend recording requests; fails for listed target names
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub requests: Mutex<Vec<ExportRequest>>,
    pub failing_targets: HashSet<String>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_for(mut self, target: &str) -> Self {
        self.failing_targets.insert(target.to_string());
        self
    }

    pub fn file_names(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| {
                r.path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default()
            })
            .collect()
    }
}

#[async_trait]
impl ExportBackend for RecordingBackend {
    async fn export(&self, request: &ExportRequest) -> std::result::Result<(), ExportFailure> {
        self.requests.lock().unwrap().push(request.clone());
        if self.failing_targets.contains(&request.target_name) {
            return Err(ExportFailure::Backend(format!(
                "cannot export {}",
                request.target_name
            )));
        }
        Ok(())
    }
}

/// Reporter that requests cancellation after a number of reports
#[derive(Debug, Default)]
pub struct ScriptedProgress {
    pub reports: Vec<(usize, usize, String)>,
    pub cancel_after: Option<usize>,
}

impl ScriptedProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel_after(reports: usize) -> Self {
        Self {
            reports: Vec::new(),
            cancel_after: Some(reports),
        }
    }
}

impl ProgressReporter for ScriptedProgress {
    fn report(&mut self, current: usize, total: usize, message: &str) {
        self.reports.push((current, total, message.to_string()));
    }

    fn is_cancelled(&self) -> bool {
        self.cancel_after
            .is_some_and(|limit| self.reports.len() >= limit)
    }
}

/// Text job over the given body names
pub fn job(
    folder: &Path,
    parameter: &str,
    variations: &[&str],
    targets: &[&str],
    naming: NamingOptions,
) -> ExportJob {
    ExportJobBuilder::new()
        .parameter(ParameterName::new(parameter).unwrap(), ParameterKind::Text)
        .variations(variations.iter().copied())
        .naming(naming)
        .format(ExportFormat::StlBinary)
        .targets(
            targets
                .iter()
                .enumerate()
                .map(|(i, name)| ExportTarget::new(*name, TargetHandle::body(i)))
                .collect(),
        )
        .output_folder(folder)
        .build()
        .unwrap()
}
