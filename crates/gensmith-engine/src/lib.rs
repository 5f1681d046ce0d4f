//! Generator execution engine for gensmith.
//!
//! A generator is a directory of template files plus a `generator-<name>.yaml`
//! spec listing which templates to render, under which conditions, over which
//! items, and with which variables. This crate turns a spec and a set of
//! supplied values into an ordered list of rendered files. It never writes to
//! disk on its own; [`output`] is the writer the CLI hands the result to.
//!
//! # Modules
//!
//! - [`spec`]: `GeneratorSpec`, `TemplateSpec`, `VariableSpec` and `Item` data model
//! - [`bindings`]: Resolved variable binding table shared by all render units
//! - [`variables`]: Variable resolution: defaults, required checks, pattern validation
//! - [`evaluate`]: Tera-based evaluator used uniformly for every template field
//! - [`condition`]: Truthiness of rendered condition strings
//! - [`iteration`]: Expansion of `with_items` into ordered render units
//! - [`generator`]: Orchestration of the full render pipeline
//! - [`source`]: Source template readers (directory and in-memory)
//! - [`validate`]: Static spec validation with findings
//! - [`loader`]: Generator directory loading and discovery
//! - [`render_spec`]: RenderSpec documents and `key=value` value parsing
//! - [`output`]: Writing rendered files with collision and overwrite checks

pub mod bindings;
pub mod condition;
pub mod evaluate;
pub mod generator;
pub mod iteration;
pub mod loader;
pub mod output;
pub mod render_spec;
pub mod source;
pub mod spec;
pub mod validate;
pub mod variables;

mod paths;

pub use bindings::{Bindings, ITEM_BINDING};
pub use evaluate::{EvalError, Evaluator};
pub use generator::{
    run, ErrorKind, Field, GenerateError, GenerateOptions, Generator, RenderedFile,
};
pub use iteration::{RenderUnit, RenderUnits, UnitLocation};
pub use loader::{GeneratorDir, LoadError};
pub use output::{OutputWriter, OverwritePolicy, WriteError, WriteSummary};
pub use render_spec::{RenderSpec, RenderSpecError};
pub use source::{DirectorySource, MemorySource, SourceError, SourceReader};
pub use spec::{GeneratorSpec, Item, TemplateSpec, VariableSpec};
pub use variables::{resolve_variables, ResolveError, SuppliedValues};
