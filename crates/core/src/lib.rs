//! OpenAPI / Swagger reference resolution and form analysis.
//!
//! [`DocumentLoader`] reads an entry document and everything it references
//! into a [`DocumentCache`]. A [`Resolver`] turns `$ref` / `$dynamicRef` nodes
//! into their targets over that cache, and a [`FormAnalyzer`] walks a model
//! schema into a form/type model ready for TypeScript emitters.

pub mod analysis;
pub mod cache;
pub mod config;
pub mod dialect;
pub mod document;
pub mod error;
pub mod index;
pub mod keywords;
pub mod loader;
pub mod resolver;
pub mod types;
pub mod utils;
pub mod validate;

pub use analysis::{FormAnalysisResult, FormAnalyzer, FormResource};
pub use cache::DocumentCache;
pub use config::{AnalyzerConfig, LoaderConfig, OasgenConfig};
pub use dialect::Dialect;
pub use document::NodeRef;
pub use error::{OasError, Result};
pub use loader::{DocumentLoader, LoadedSpec, load_from_str};
pub use resolver::Resolver;
pub use types::schema_type_string;
