//! Combinators building new catalogs out of existing ones.

use rustc_hash::FxHashSet;
use skycat_lazy::LazyValue;
use skycat_result::{Error, Result};

use crate::source::CatalogSource;

/// Row-wise union of catalogs with (partially) overlapping column sets.
///
/// The result has `Σ sizes` rows. Only columns resolvable on *every* input
/// survive; a surviving column explicit in at least one input is re-bound
/// to the lazy concatenation (in argument order) of each input's
/// resolution, while defaults untouched everywhere stay synthesized at the
/// summed size. Inputs sharing no explicit column fail with
/// `IncompatibleSources`.
///
/// Attrs policy: the first source's attrs are carried, later sources'
/// attrs are dropped (first-source-wins).
pub fn concatenate_sources(sources: &[&CatalogSource]) -> Result<CatalogSource> {
    let first = sources.first().ok_or_else(|| {
        Error::InvalidArgumentError("cannot concatenate zero sources".into())
    })?;

    let mut shared_explicit: FxHashSet<String> =
        first.store().explicit_names().into_iter().collect();
    let mut shared: FxHashSet<String> = first.columns().into_iter().collect();
    for source in &sources[1..] {
        let explicit: FxHashSet<String> = source.store().explicit_names().into_iter().collect();
        shared_explicit.retain(|name| explicit.contains(name));
        let columns: FxHashSet<String> = source.columns().into_iter().collect();
        shared.retain(|name| columns.contains(name));
    }
    if shared_explicit.is_empty() {
        return Err(Error::IncompatibleSources(
            "sources share no explicit columns".into(),
        ));
    }

    let total: usize = sources.iter().map(|s| s.size()).sum();
    tracing::debug!(
        sources = sources.len(),
        rows = total,
        "concatenating catalog sources"
    );

    let mut out = CatalogSource::new(total).with_attrs(first.attrs().clone());

    let mut names: Vec<&String> = shared.iter().collect();
    names.sort_unstable();
    for name in names {
        // A default column left untouched on every input synthesizes at
        // the summed size to the same values its concatenation would have.
        let explicit_somewhere = sources.iter().any(|s| s.store().is_explicit(name));
        if !explicit_somewhere {
            continue;
        }
        let parts = sources
            .iter()
            .map(|s| s.get(name))
            .collect::<Result<Vec<_>>>()?;
        out.set(name.clone(), LazyValue::concat(&parts)?)?;
    }
    Ok(out)
}
