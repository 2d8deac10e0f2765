//! Plan memoization keyed by snapshot content.
//!
//! Per-frame evaluation runs at display rate, so the sorted and sequenced
//! plan is kept until the composition actually changes.

use std::sync::Arc;

use reelplan_common::ReelplanResult;
use reelplan_project_model::Composition;

use crate::planner::{plan_composition_with, CompositionPlan, PlanOptions};

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// 64-bit FNV-1a.
pub fn fnv1a_64(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Content fingerprint of a composition.
///
/// Hashes the serialized snapshot; maps in [`Composition`] are ordered, so
/// equal snapshots always produce equal fingerprints.
pub fn fingerprint(composition: &Composition) -> ReelplanResult<u64> {
    let bytes = serde_json::to_vec(composition)?;
    Ok(fnv1a_64(&bytes))
}

/// Single-entry plan cache.
#[derive(Debug, Default)]
pub struct PlanCache {
    options: PlanOptions,
    entry: Option<(u64, Arc<CompositionPlan>)>,
    hits: u64,
    misses: u64,
}

impl PlanCache {
    pub fn new(options: PlanOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &PlanOptions {
        &self.options
    }

    /// Plan for `composition`, recomputed only when its fingerprint differs
    /// from the cached one. A failed plan leaves the previous entry intact.
    pub fn get_or_plan(&mut self, composition: &Composition) -> ReelplanResult<Arc<CompositionPlan>> {
        let key = fingerprint(composition)?;

        if let Some((cached_key, plan)) = &self.entry {
            if *cached_key == key {
                self.hits += 1;
                return Ok(Arc::clone(plan));
            }
        }

        self.misses += 1;
        tracing::debug!(fingerprint = %format!("{key:016x}"), "Plan cache miss");
        let plan = Arc::new(plan_composition_with(composition, &self.options)?);
        self.entry = Some((key, Arc::clone(&plan)));
        Ok(plan)
    }

    /// Fingerprint of the cached plan's snapshot.
    pub fn current_fingerprint(&self) -> Option<u64> {
        self.entry.as_ref().map(|(key, _)| *key)
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelplan_project_model::{KeyFrame, Project, TextOverlay, Track, TrackType};

    fn captioned(text: &str) -> Composition {
        let (composition, _) = Composition::from_parts(
            Project::placeholder(),
            vec![Track::new("t", "p", TrackType::Text, "Text")],
            vec![KeyFrame::text("k", "t", 0.0, 1000.0, TextOverlay::new(text))],
            vec![],
        );
        composition
    }

    #[test]
    fn test_fnv_reference_values() {
        assert_eq!(fnv1a_64(b""), 0xcbf29ce484222325);
        assert_eq!(fnv1a_64(b"a"), 0xaf63dc4c8601ec8c);
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let a = fingerprint(&captioned("Hello")).unwrap();
        let b = fingerprint(&captioned("Hello")).unwrap();
        let c = fingerprint(&captioned("Bye")).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_cache_reuses_plan_until_change() {
        let mut cache = PlanCache::default();
        let first = cache.get_or_plan(&captioned("Hello")).unwrap();
        let again = cache.get_or_plan(&captioned("Hello")).unwrap();
        assert!(Arc::ptr_eq(&first, &again));
        assert_eq!((cache.hits(), cache.misses()), (1, 1));

        let changed = cache.get_or_plan(&captioned("Bye")).unwrap();
        assert!(!Arc::ptr_eq(&first, &changed));
        assert_eq!(cache.misses(), 2);
    }

    #[test]
    fn test_failed_plan_keeps_previous_entry() {
        let mut cache = PlanCache::default();
        cache.get_or_plan(&captioned("Hello")).unwrap();
        let before = cache.current_fingerprint();

        let mut broken = captioned("Hello");
        broken.frames.insert("ghost".into(), vec![]);
        assert!(cache.get_or_plan(&broken).is_err());
        assert_eq!(cache.current_fingerprint(), before);

        cache.invalidate();
        assert_eq!(cache.current_fingerprint(), None);
    }
}
