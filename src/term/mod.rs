//! Terms, their lazily resolved relationships and term collections
//!
//! A [`VfbTerm`] wraps one assembled TermInfo document. The document's tags
//! select, once per load, which lazy accessors the term carries; see
//! [`capability`] for the table.

pub mod capability;
mod collection;
mod lazy;
mod score;
mod vfb_term;

pub use capability::{Accessor, Capability, CapabilitySet};
pub use collection::VfbTerms;
pub use lazy::{Lazy, LazyState};
pub use score::{Partner, Score, ScoreRecord};
pub use vfb_term::VfbTerm;
