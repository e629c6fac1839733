//! Key resolution: labels, symbols, ids and cross-references
//!
//! Keys are matched against a [`LookupTable`] built once per session. Noise
//! in the key (padding, underscores for spaces, case) is absorbed by the
//! tiered matching in [`normalize`].

pub mod ids;
mod labels;
mod lookup;
pub mod normalize;

pub use ids::{short_form_from_iri, to_curie, to_short_form, XrefKey};
pub use labels::labels_to_ids;
pub use lookup::{EntryKind, LookupEntry, LookupOptions, LookupTable};
