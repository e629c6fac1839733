//! vfb-connect: an object model over the Virtual Fly Brain knowledge graph
//!
//! Entities (anatomy classes, neurons, images, datasets, templates) are
//! represented as [`VfbTerm`]s built from TermInfo documents. A term's tags
//! decide which relationship accessors it carries; those accessors run their
//! queries on first use and memoize the result.
//!
//! # Core Concepts
//!
//! - **Session**: [`VfbConnect`] resolves keys (labels, symbols, ids,
//!   cross-references) and owns the term cache
//! - **Terms**: a document tree plus tag-selected lazy accessors
//! - **Collections**: ordered [`VfbTerms`] with set algebra and bulk loading
//! - **Backends**: the [`Backend`] trait abstracts the servers; an
//!   [`InMemoryBackend`] serves fixture bundles
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use vfb_connect::{InMemoryBackend, VfbConnect};
//!
//! let backend = InMemoryBackend::new().with_document(json!({"term": {"core": {
//!     "short_form": "FBbt_00003679",
//!     "iri": "http://purl.obolibrary.org/obo/FBbt_00003679",
//!     "label": "fan-shaped body",
//!     "types": ["Entity", "Class", "Anatomy"]
//! }}}));
//! let vfb = VfbConnect::new(backend)?;
//! let fsb = vfb.term("fan-shaped_body")?;
//! assert_eq!(fsb.id(), "FBbt_00003679");
//! # Ok::<(), vfb_connect::VfbError>(())
//! ```

pub mod backend;
pub mod batch;
pub mod cache;
mod client;
pub mod config;
pub mod resolve;
pub mod schema;
pub mod store;
pub mod term;

pub use backend::{Backend, BackendError, DlQueryKind, InMemoryBackend, Row};
pub use cache::{CachePolicy, CacheStats};
pub use client::{ErrorKind, VfbConnect, VfbError, VfbResult, XrefMatch};
pub use config::{ClientConfig, ConfigError};
pub use schema::{Summary, TermData};
pub use store::{CachedBackend, OpenStore, SqliteTermStore, StoreError, TermStore};
pub use term::{Accessor, Capability, Partner, Score, VfbTerm, VfbTerms};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
