//! Label substitution in DL class expressions

use super::ids::dl_term;
use super::lookup::LookupTable;
use crate::client::{VfbError, VfbResult};
use regex_lite::Regex;
use std::sync::LazyLock;

/// Single-quoted label, non-greedy.
static QUOTED_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"'(.+?)'").expect("valid quoted-label regex"));

/// Replace every single-quoted label in `expression` with the id it names.
///
/// `'neuron' that 'overlaps' some 'fan-shaped body'` becomes
/// `FBbt:00005106 that RO:0002131 some FBbt:00003679`. Ids whose prefix is not
/// in `curie_prefixes` are written as bracketed IRIs. An unknown label fails
/// the whole expression.
pub fn labels_to_ids<S: AsRef<str>>(
    expression: &str,
    table: &LookupTable,
    curie_prefixes: &[S],
) -> VfbResult<String> {
    let mut out = String::with_capacity(expression.len());
    let mut last = 0;
    for caps in QUOTED_LABEL.captures_iter(expression) {
        let (Some(whole), Some(label)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let id = table
            .lookup_id(label.as_str())
            .map_err(|_| VfbError::UnknownLabel {
                label: label.as_str().to_string(),
                expression: expression.to_string(),
            })?;
        out.push_str(&expression[last..whole.start()]);
        out.push_str(&dl_term(&id, curie_prefixes));
        last = whole.end();
    }
    out.push_str(&expression[last..]);
    Ok(out)
}
