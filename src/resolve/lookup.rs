//! Session-wide label/id lookup table

use super::ids::{prefix, to_curie, to_short_form};
use super::normalize::MatchTier;
use crate::client::{ErrorKind, VfbError, VfbResult};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// What a lookup entry names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Class,
    Individual,
    Relation,
    /// A registered external database or API
    Site,
}

/// One row of the lookup feed: an id with its label and optional symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupEntry {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    pub kind: EntryKind,
}

impl LookupEntry {
    pub fn new(id: impl Into<String>, label: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            id: to_short_form(&id.into()),
            label: label.into(),
            symbol: None,
            kind,
        }
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    /// Symbol when set, else label.
    pub fn preferred_name(&self) -> &str {
        match self.symbol.as_deref() {
            Some(symbol) if !symbol.is_empty() => symbol,
            _ => &self.label,
        }
    }
}

/// Which entries make it into the table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupOptions {
    /// Index individuals as well as classes
    pub include_individuals: bool,
    /// When non-empty, only classes and individuals whose id starts with one
    /// of these prefixes are indexed
    pub prefixes: Vec<String>,
}

impl LookupOptions {
    fn admits(&self, entry: &LookupEntry) -> bool {
        match entry.kind {
            EntryKind::Relation | EntryKind::Site => true,
            EntryKind::Individual if !self.include_individuals => false,
            EntryKind::Class | EntryKind::Individual => {
                self.prefixes.is_empty() || self.prefixes.iter().any(|p| entry.id.starts_with(p.as_str()))
            }
        }
    }
}

/// Label and symbol index over every admitted entry.
///
/// Built once per session and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct LookupTable {
    names: HashMap<String, String>,
    kinds: HashMap<String, EntryKind>,
    order: Vec<String>,
    tiers: [HashMap<String, Vec<String>>; 4],
    id_prefixes: HashSet<String>,
}

impl LookupTable {
    pub fn build(entries: impl IntoIterator<Item = LookupEntry>, options: &LookupOptions) -> Self {
        let mut table = Self::default();
        for entry in entries {
            if options.admits(&entry) {
                table.insert(entry);
            }
        }
        table
    }

    fn insert(&mut self, entry: LookupEntry) {
        if !self.names.contains_key(&entry.id) {
            self.names.insert(entry.id.clone(), entry.preferred_name().to_string());
            self.kinds.insert(entry.id.clone(), entry.kind);
            self.order.push(entry.id.clone());
            if entry.kind != EntryKind::Site && entry.id.contains('_') {
                self.id_prefixes.insert(prefix(&entry.id).to_string());
            }
        }
        let keys = std::iter::once(entry.label.as_str()).chain(entry.symbol.as_deref());
        for key in keys.filter(|k| !k.trim().is_empty()) {
            for tier in MatchTier::ALL {
                let ids = self.tiers[tier.index()].entry(tier.key(key)).or_default();
                if !ids.contains(&entry.id) {
                    ids.push(entry.id.clone());
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.names.contains_key(id)
    }

    pub fn kind(&self, id: &str) -> Option<EntryKind> {
        self.kinds.get(id).copied()
    }

    /// Ids of one kind in feed order.
    pub fn ids_of_kind(&self, kind: EntryKind) -> Vec<String> {
        self.order
            .iter()
            .filter(|id| self.kinds.get(*id) == Some(&kind))
            .cloned()
            .collect()
    }

    /// Resolve a label, symbol or id to a short form.
    ///
    /// Ids (in short form, curie or IRI form) known to the table resolve to
    /// themselves. Otherwise each [`MatchTier`] is tried in turn. A tier key
    /// shared by several ids resolves to the first in feed order.
    pub fn lookup_id(&self, key: &str) -> VfbResult<String> {
        let trimmed = key.trim();
        if self.names.contains_key(trimmed) {
            return Ok(trimmed.to_string());
        }
        let short_form = to_short_form(trimmed);
        if self.names.contains_key(&short_form) {
            return Ok(short_form);
        }
        for tier in MatchTier::ALL {
            let tier_key = tier.key(key);
            if tier_key.is_empty() {
                continue;
            }
            if let Some(ids) = self.tiers[tier.index()].get(&tier_key) {
                if ids.len() > 1 {
                    warn!(
                        kind = %ErrorKind::AmbiguousMatch,
                        key,
                        ?tier,
                        candidates = ?ids,
                        "key matches several ids, using the first"
                    );
                }
                return Ok(ids[0].clone());
            }
        }
        Err(VfbError::UnresolvedKey(key.to_string()))
    }

    /// Short form of a key that is not indexed but reads as an id:
    /// `<prefix>_<local>` (or the curie/IRI form of it) where the prefix is
    /// one a class or relation id in the table uses, or a VFB prefix.
    ///
    /// Individuals are usually left out of the table but stay addressable
    /// by id. Site ids do not contribute prefixes.
    pub fn unindexed_id(&self, key: &str) -> Option<String> {
        let short_form = to_short_form(key);
        let (prefix, local) = short_form.split_once('_')?;
        let well_formed = !prefix.is_empty()
            && !local.is_empty()
            && prefix.chars().all(|c| c.is_ascii_alphanumeric())
            && local.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        let known = prefix.starts_with("VFB") || self.id_prefixes.contains(prefix);
        if !(well_formed && known) {
            return None;
        }
        debug!(key, "key not indexed, taking it as an id");
        Some(short_form)
    }

    /// [`lookup_id`](Self::lookup_id) in curie form.
    pub fn lookup_curie(&self, key: &str) -> VfbResult<String> {
        self.lookup_id(key).map(|id| to_curie(&id))
    }

    /// Preferred display name of an id.
    pub fn lookup_name(&self, id: &str) -> VfbResult<String> {
        self.names
            .get(id)
            .or_else(|| self.names.get(&to_short_form(id)))
            .cloned()
            .ok_or_else(|| VfbError::UnresolvedKey(id.to_string()))
    }

    /// Display names for `ids`, in input order.
    pub fn lookup_names<S: AsRef<str>>(&self, ids: &[S]) -> VfbResult<Vec<String>> {
        ids.iter().map(|id| self.lookup_name(id.as_ref())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> LookupTable {
        LookupTable::build(
            vec![
                LookupEntry::new("FBbt_00100484", "lobula columnar neuron LC12", EntryKind::Class)
                    .with_symbol("LC12"),
                LookupEntry::new("FBbt_00003679", "fan-shaped body", EntryKind::Class)
                    .with_symbol("FB"),
                LookupEntry::new("BFO_0000050", "part of", EntryKind::Relation),
                LookupEntry::new("RO_0002131", "overlaps", EntryKind::Relation),
                LookupEntry::new("VFB_jrcv0jvf", "LC12_R", EntryKind::Individual),
                LookupEntry::new("FlyWire", "FlyWire", EntryKind::Site),
            ],
            &LookupOptions::default(),
        )
    }

    #[test]
    fn noisy_keys_resolve_alike() {
        let t = table();
        for key in ["LC12", "LC_12", "LC 12", " LC12 ", "lc12"] {
            assert_eq!(t.lookup_id(key).unwrap(), "FBbt_00100484", "key {key:?}");
        }
        assert_eq!(t.lookup_id("lobula_columnar_neuron_LC12").unwrap(), "FBbt_00100484");
    }

    #[test]
    fn relations_resolve_in_both_forms() {
        let t = table();
        assert_eq!(t.lookup_id("part_of").unwrap(), "BFO_0000050");
        assert_eq!(t.lookup_curie("overlaps").unwrap(), "RO:0002131");
    }

    #[test]
    fn ids_resolve_to_themselves() {
        let t = table();
        assert_eq!(t.lookup_id("FBbt:00003679").unwrap(), "FBbt_00003679");
        assert_eq!(
            t.lookup_id("http://purl.obolibrary.org/obo/FBbt_00003679").unwrap(),
            "FBbt_00003679"
        );
    }

    #[test]
    fn unknown_key_is_unresolved() {
        let err = table().lookup_id("ellipsoid body").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnresolvedKey);
    }

    #[test]
    fn unindexed_ids_are_recognized_but_not_looked_up() {
        let t = table();
        assert!(t.lookup_id("VFB_00101567").is_err());
        assert_eq!(t.unindexed_id("VFB_00101567").as_deref(), Some("VFB_00101567"));
        assert_eq!(t.unindexed_id("FBbt:00007484").as_deref(), Some("FBbt_00007484"));
        assert_eq!(t.unindexed_id("LC12_R"), None);
        assert_eq!(t.unindexed_id("GO_0005623"), None);
    }

    #[test]
    fn site_ids_do_not_make_keys_id_shaped() {
        let t = LookupTable::build(
            vec![LookupEntry::new("neuprint_JRC_Hemibrain_1point1", "neuprint JRC Hemibrain", EntryKind::Site)],
            &LookupOptions::default(),
        );
        assert!(t.lookup_id("neuprint_JRC_Hemibrain_1point1:1750316098").is_err());
        assert_eq!(t.unindexed_id("neuprint_JRC_Hemibrain_1point1:1750316098"), None);
    }

    #[test]
    fn individuals_are_opt_in() {
        assert!(table().lookup_id("LC12_R").is_err());
        let opts = LookupOptions { include_individuals: true, prefixes: vec![] };
        let t = LookupTable::build(
            vec![LookupEntry::new("VFB_jrcv0jvf", "LC12_R", EntryKind::Individual)],
            &opts,
        );
        assert_eq!(t.lookup_id("LC12_R").unwrap(), "VFB_jrcv0jvf");
    }

    #[test]
    fn prefix_filter_limits_classes_only() {
        let opts = LookupOptions { include_individuals: false, prefixes: vec!["VFBexp".into()] };
        let t = LookupTable::build(
            vec![
                LookupEntry::new("FBbt_00003679", "fan-shaped body", EntryKind::Class),
                LookupEntry::new("RO_0002131", "overlaps", EntryKind::Relation),
            ],
            &opts,
        );
        assert!(t.lookup_id("fan-shaped body").is_err());
        assert!(t.lookup_id("overlaps").is_ok());
    }

    #[test]
    fn names_keep_input_shape_and_order() {
        let t = table();
        assert_eq!(t.lookup_name("FBbt_00100484").unwrap(), "LC12");
        assert_eq!(
            t.lookup_names(&["FBbt_00003679", "BFO_0000050"]).unwrap(),
            vec!["FB", "part of"]
        );
        assert!(t.lookup_names(&["FBbt_00003679", "FBbt_99999999"]).is_err());
    }

    #[test]
    fn shared_key_takes_first_in_feed_order() {
        let t = LookupTable::build(
            vec![
                LookupEntry::new("FBbt_1", "DA1", EntryKind::Class),
                LookupEntry::new("FBbt_2", "DA_1", EntryKind::Class),
            ],
            &LookupOptions::default(),
        );
        assert_eq!(t.lookup_id("DA 1").unwrap(), "FBbt_2");
        assert_eq!(t.lookup_id("DA1").unwrap(), "FBbt_1");
        assert_eq!(t.lookup_id("da1").unwrap(), "FBbt_1");
    }

    #[test]
    fn sites_are_listed_by_kind() {
        assert_eq!(table().ids_of_kind(EntryKind::Site), vec!["FlyWire"]);
    }
}
