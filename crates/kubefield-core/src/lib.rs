//! Field-level semantic validation for Kubernetes-shaped configuration values.
//!
//! Each rule checks one value that a host has already extracted from its
//! configuration tree (an object name, a label map, a port, a cron schedule)
//! and returns [`Diagnostics`]. Rules never fail or panic on bad input: every
//! problem, including a value of the wrong shape, comes back as an
//! [`ErrorDetail`].
//!
//! ```rust
//! use kubefield_core::{Engine, FieldValue, Rule};
//!
//! let engine = Engine::default();
//! let labels = FieldValue::map([("app", "web"), ("tier", "-frontend")]);
//! let diags = engine.validate(&Rule::Labels, &labels, "metadata.labels");
//!
//! assert_eq!(diags.error_count(), 1);
//! assert_eq!(diags.errors[0].entry.as_deref(), Some("tier"));
//! ```

pub mod apimachinery;
pub mod config;
pub mod cron;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod quantity;
pub mod registry;
pub mod rules;
pub mod validator;
pub mod value;

pub use config::{CronMessages, EngineConfig};
pub use diagnostics::{Diagnostics, ErrorDetail, ErrorKind};
pub use engine::{CheckOutcome, CheckReport, Engine, FieldCheck};
pub use error::{EngineError, Result};
pub use registry::Rule;
pub use validator::{BoxedValidator, Validator};
pub use value::FieldValue;
