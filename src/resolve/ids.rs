//! Identifier forms: short forms, curies and IRIs

/// `cell`
pub const CELL: &str = "FBbt_00007002";
/// `neuron`
pub const NEURON: &str = "FBbt_00005106";
/// `part of`
pub const PART_OF: &str = "BFO_0000050";
/// `overlaps`
pub const OVERLAPS: &str = "RO_0002131";
/// `has synaptic terminals in`
pub const HAS_SYNAPTIC_TERMINALS_IN: &str = "RO_0002130";
/// `has presynaptic terminal in`
pub const HAS_PRESYNAPTIC_TERMINAL_IN: &str = "RO_0002113";
/// `has postsynaptic terminal in`
pub const HAS_POSTSYNAPTIC_TERMINAL_IN: &str = "RO_0002110";

pub const OBO_IRI_BASE: &str = "http://purl.obolibrary.org/obo/";
pub const VFB_IRI_BASE: &str = "http://virtualflybrain.org/reports/";

/// Last path segment of an IRI, splitting on `/` and `#`.
pub fn short_form_from_iri(iri: &str) -> &str {
    iri.rsplit(['/', '#']).next().unwrap_or(iri)
}

/// Normalize an id given as short form, curie or IRI to its short form.
pub fn to_short_form(id: &str) -> String {
    let id = id.trim();
    if id.contains("://") {
        return short_form_from_iri(id).to_string();
    }
    id.replacen(':', "_", 1)
}

/// `FBbt_00003679` -> `FBbt:00003679`. Ids already in curie form pass through.
pub fn to_curie(id: &str) -> String {
    let short_form = to_short_form(id);
    short_form.replacen('_', ":", 1)
}

/// Id prefix, e.g. `FBbt` for `FBbt_00003679`.
pub fn prefix(id: &str) -> &str {
    id.split(['_', ':']).next().unwrap_or(id)
}

/// How to spell `id` inside a DL class expression: a curie for prefixes the
/// reasoner knows, otherwise the bracketed IRI.
pub fn dl_term<S: AsRef<str>>(id: &str, curie_prefixes: &[S]) -> String {
    let short_form = to_short_form(id);
    let p = prefix(&short_form);
    if curie_prefixes.iter().any(|c| c.as_ref() == p) {
        to_curie(&short_form)
    } else if short_form.starts_with("VFB") {
        format!("<{VFB_IRI_BASE}{short_form}>")
    } else {
        format!("<{OBO_IRI_BASE}{short_form}>")
    }
}

/// A `<db>:<accession>` key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XrefKey<'a> {
    pub db: &'a str,
    pub accession: &'a str,
}

impl<'a> XrefKey<'a> {
    /// Split at the first colon; both halves must be non-empty.
    pub fn parse(key: &'a str) -> Option<Self> {
        let (db, accession) = key.trim().split_once(':')?;
        let (db, accession) = (db.trim(), accession.trim());
        if db.is_empty() || accession.is_empty() {
            return None;
        }
        Some(Self { db, accession })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iri_short_forms() {
        assert_eq!(short_form_from_iri("http://purl.obolibrary.org/obo/FBbt_00003679"), "FBbt_00003679");
        assert_eq!(short_form_from_iri("http://example.org/onto#RO_0002131"), "RO_0002131");
        assert_eq!(to_short_form("FBbt:00003679"), "FBbt_00003679");
        assert_eq!(to_short_form("VFB_jrcv0jvf"), "VFB_jrcv0jvf");
    }

    #[test]
    fn curie_conversion() {
        assert_eq!(to_curie("RO_0002131"), "RO:0002131");
        assert_eq!(to_curie("RO:0002131"), "RO:0002131");
        assert_eq!(to_curie("http://purl.obolibrary.org/obo/BFO_0000050"), "BFO:0000050");
    }

    #[test]
    fn dl_terms_fall_back_to_iris() {
        let prefixes = ["FBbt", "RO", "BFO"];
        assert_eq!(dl_term("FBbt_00005106", &prefixes), "FBbt:00005106");
        assert_eq!(
            dl_term("VFB_jrcv0jvf", &prefixes),
            "<http://virtualflybrain.org/reports/VFB_jrcv0jvf>"
        );
        assert_eq!(dl_term("FBbi_00000578", &prefixes), "<http://purl.obolibrary.org/obo/FBbi_00000578>");
    }

    #[test]
    fn xref_keys() {
        let key = XrefKey::parse("neuprint_JRC_Hemibrain_1point1:1734696429").unwrap();
        assert_eq!(key.db, "neuprint_JRC_Hemibrain_1point1");
        assert_eq!(key.accession, "1734696429");
        assert!(XrefKey::parse("LC12").is_none());
        assert!(XrefKey::parse("FlyWire:").is_none());
    }
}
