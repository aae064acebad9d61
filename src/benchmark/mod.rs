//! # Call-Plan Synthesis
//!
//! This module turns a package's interface into ready-to-run call plans and
//! explains, per function, why no plan could be built when synthesis fails.
//!
//! ## Key Components
//!
//! - [`well_known`]: chain conventions (context type, system objects, recipes)
//! - [`constructor_map`]: which public functions produce which datatypes
//! - [`synthesizer`]: bounded recursive argument synthesis
//! - [`analyzer`]: per-function and per-package analysis, viability triage
//! - [`oracle`]: achievability ceiling and difficulty ranking
//! - [`ptb`]: the call-plan JSON shape
//! - [`errors`]: rejection taxonomy and error types
//!
//! ## Two-Tier Evaluation
//!
//! - **Tier A (Synthesis)**: every argument resolves and a type-correct call is assembled
//! - **Tier B (Execution)**: the assembled call runs without aborting
//!
//! Execution happens elsewhere; its records feed back into [`oracle`].

pub mod analyzer;
pub mod constructor_map;
pub mod errors;
pub mod oracle;
pub mod ptb;
pub mod synthesizer;
pub mod well_known;
