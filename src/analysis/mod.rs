//! Fact extraction from parsed Python source.
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌───────────────┐
//! │ SourceUnit  │────▶│ parse()     │────▶│ SyntaxTree    │
//! └─────────────┘     └─────────────┘     └───────────────┘
//!                                                 │
//!                                                 ▼
//!                     ┌─────────────┐     ┌───────────────┐
//!                     │ Rule engine │◀────│ FactSet       │
//!                     └─────────────┘     │ (imports,     │
//!                                         │  calls, ...)  │
//!                                         └───────────────┘
//! ```
//!
//! Extraction is deliberately narrow. Only single-name assignments become
//! bindings, and only functions declared directly in a class body count as
//! its methods. Inherited or dynamically attached methods are invisible.

mod extractor;
mod facts;
pub mod text;

pub(crate) use extractor::direct_methods;
pub use extractor::extract;
pub use facts::{Binding, CallSite, ClassFacts, FactSet};
