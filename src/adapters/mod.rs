//! External system integrations for paramsweep.
//!
//! - [`host`] - Traits the sweep drives: design host, export backend,
//!   progress surface
//! - [`model`] - File-backed offline design host and its export backend
//! - [`dry_run`] - Backend that records exports without writing
//! - [`factory`] - Backend selection
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate the CAD engine from the
//! sweep logic. Any application able to read and write a named parameter,
//! regenerate, and serialize an object can host a sweep by implementing
//! [`host::DesignHost`] and [`host::ExportBackend`].
//!
//! ```rust,no_run
//! use paramsweep::adapters::host::DesignHost;
//! use paramsweep::adapters::model::ModelDocument;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let document = ModelDocument::load("bracket.json")?;
//! for parameter in document.parameters() {
//!     println!("{} = {}", parameter.name, parameter.expression);
//! }
//! for body in document.bodies() {
//!     println!("body {}", body.name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod dry_run;
pub mod factory;
pub mod host;
pub mod model;
