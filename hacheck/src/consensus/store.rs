use arc_swap::ArcSwap;
use std::sync::Arc;
use tracing::debug;

use super::types::{GroupKind, ObservationGroup, ReferencePoolSource};

/// Latest poll results, shared by the refresh loops and request handlers.
///
/// Each field is replaced as a whole; readers hold an `Arc` to whichever
/// complete group was current when they loaded it.
pub struct ConsensusStateStore {
    service_nodes: ArcSwap<ObservationGroup>,
    reference_pools: ArcSwap<ObservationGroup>,
    pool_sources: ArcSwap<Vec<ReferencePoolSource>>,
}

impl ConsensusStateStore {
    pub fn new() -> Self {
        Self {
            service_nodes: ArcSwap::from_pointee(ObservationGroup::default()),
            reference_pools: ArcSwap::from_pointee(ObservationGroup::default()),
            pool_sources: ArcSwap::from_pointee(Vec::new()),
        }
    }

    pub fn snapshot(&self, kind: GroupKind) -> Arc<ObservationGroup> {
        match kind {
            GroupKind::ServiceNodes => self.service_nodes.load_full(),
            GroupKind::ReferencePools => self.reference_pools.load_full(),
        }
    }

    pub fn replace(&self, kind: GroupKind, group: ObservationGroup) {
        debug!(
            "Replacing {:?} group with {} observations",
            kind,
            group.observations.len()
        );
        match kind {
            GroupKind::ServiceNodes => self.service_nodes.store(Arc::new(group)),
            GroupKind::ReferencePools => self.reference_pools.store(Arc::new(group)),
        }
    }

    pub fn pool_sources(&self) -> Arc<Vec<ReferencePoolSource>> {
        self.pool_sources.load_full()
    }

    pub fn replace_pool_sources(&self, sources: Vec<ReferencePoolSource>) {
        self.pool_sources.store(Arc::new(sources));
    }
}

impl Default for ConsensusStateStore {
    fn default() -> Self {
        Self::new()
    }
}
