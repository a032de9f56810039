//! Catalog merging.
//!
//! Folds a freshly loaded catalog into a live one:
//! - lists with the same name are overlaid entry by entry (incoming wins per code),
//! - instruments with the same name are replaced whole,
//! - file lists are concatenated without duplicates,
//! - every profile then points at the merged registry lists.

use crate::catalog::DefinitionCatalog;
use crate::registry::{ListKind, ListRegistry};
use tracing::debug;

/// What a merge changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    pub lists_added: usize,
    pub lists_overlaid: usize,
    pub instruments_added: usize,
    pub instruments_replaced: usize,
}

/// Stateless merge entry point.
pub struct CatalogMerger;

impl CatalogMerger {
    /// Merge `src` into `dst`. Never fails.
    pub fn merge(dst: &mut DefinitionCatalog, src: &DefinitionCatalog) -> MergeSummary {
        let mut summary = MergeSummary::default();

        for kind in ListKind::ALL {
            Self::merge_registry(dst.registry_mut(kind), src.registry(kind), &mut summary);
        }

        for (name, profile) in src.instruments() {
            if dst.set_instrument(name, profile.clone()).is_some() {
                summary.instruments_replaced += 1;
            } else {
                summary.instruments_added += 1;
            }
        }

        for file in src.files() {
            dst.append_file(file.clone());
        }

        let rebound = dst.rebind_references();
        if rebound > 0 {
            debug!("Rebound {} profile list references after merge", rebound);
        }

        debug!(
            "Merged catalog: {} lists added, {} overlaid, {} instruments added, {} replaced",
            summary.lists_added,
            summary.lists_overlaid,
            summary.instruments_added,
            summary.instruments_replaced
        );
        summary
    }

    fn merge_registry(dst: &mut ListRegistry, src: &ListRegistry, summary: &mut MergeSummary) {
        for (name, incoming) in src.iter() {
            match dst.get_mut(name) {
                Some(existing) => {
                    existing.overlay(incoming);
                    if let Some(base) = incoming.based_on() {
                        existing.set_based_on(base);
                    }
                    summary.lists_overlaid += 1;
                }
                None => {
                    let mut list = incoming.clone();
                    if list.name() != name {
                        list.set_name(name);
                    }
                    dst.insert(list);
                    summary.lists_added += 1;
                }
            }
        }
    }
}

impl DefinitionCatalog {
    /// Fold `incoming` into this catalog. See [`CatalogMerger`].
    pub fn merge(&mut self, incoming: &DefinitionCatalog) -> MergeSummary {
        CatalogMerger::merge(self, incoming)
    }
}
