// Paramsweep - Parametric Design Variation Sweep & Export
// Copyright (c) 2025 Paramsweep Contributors
// Licensed under the MIT License

//! # Paramsweep - Parametric Design Variation Sweep & Export
//!
//! Paramsweep drives a parametric design through a list of values for one
//! user parameter and exports every selected body or component once per
//! value, restoring the parameter afterwards.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Planning** collision-free file names for every (variation, object) pair
//! - **Sweeping** the parameter with bounded waits for regeneration
//! - **Exporting** through a pluggable [`adapters::host::ExportBackend`]
//! - **Restoring** the original parameter expression on every exit path
//!
//! ## Architecture
//!
//! Paramsweep follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (sweep coordination, naming, progress, restore)
//! - [`adapters`] - Host seams and the offline JSON model host
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use paramsweep::adapters::model::{ModelDocument, ModelExporter};
//! use paramsweep::cli::progress::ConsoleProgress;
//! use paramsweep::config::{build_job, load_config};
//! use paramsweep::core::export::run_sweep;
//! use paramsweep::core::recompute::RecomputeWaiter;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("paramsweep.toml")?;
//!     let mut document = ModelDocument::load(&config.document.path)?;
//!     let job = build_job(&config, &document)?;
//!
//!     let exporter = ModelExporter::new(document.geometry());
//!     let (_cancel, cancelled) = tokio::sync::watch::channel(false);
//!     let mut progress = ConsoleProgress::new(cancelled);
//!
//!     let summary = run_sweep(
//!         &job,
//!         &mut document,
//!         &exporter,
//!         &mut progress,
//!         RecomputeWaiter::default(),
//!     )
//!     .await?;
//!
//!     println!("{}", summary.final_message());
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Fatal problems are [`domain::SweepError`]s. A single export that fails is
//! an [`domain::ExportFailure`] recorded in the summary; the sweep continues.
//!
//! ## Logging
//!
//! Paramsweep uses structured logging with the `tracing` crate. Every sweep
//! runs inside a `sweep` span carrying its `run_id`.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
