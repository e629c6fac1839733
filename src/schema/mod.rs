//! Entity primitives and TermInfo assembly
//!
//! Value records describing one graph entity and its satellites, plus the
//! assembler that turns a raw TermInfo document into a [`TermData`] tree and
//! the [`Summary`] projection of that tree.

mod entity;
mod image;
mod relations;
mod satellite;
mod summary;
mod term_info;

#[cfg(test)]
mod tests;

pub use entity::{MinimalEdgeInfo, MinimalEntityInfo, Term};
pub use image::{group_by_template, AnatomyChannelImage, ChannelImage, Image, ImageFormat};
pub use relations::{Rel, Relations};
pub use satellite::{
    Dataset, DatasetCounts, DatasetLicense, License, Publication, Syn, Synonym, TemplateDomain,
    Xref, UNATTRIBUTED_PUB,
};
pub use summary::Summary;
pub use term_info::{assemble, assemble_str, SchemaError, SchemaResult, TermData};
