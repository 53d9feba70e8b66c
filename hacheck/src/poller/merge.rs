//! Folding a cycle's fresh results into the previous group

use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use tracing::warn;

use crate::consensus::{
    compute_consensus, FreshObservation, HeightMark, HeightObservation, ObservationGroup,
};
use crate::status::HealthState;

/// Build the next group from `fresh`, carrying `last_changed_at` over from
/// `previous` for every key whose height did not move.
///
/// Keys absent from `fresh` keep their last height in the group history, so
/// a pool that fails for a few cycles and returns at the same height is
/// still seen as unchanged. Duplicate keys keep their first occurrence.
/// Every observation is stamped with the group's new mode height.
pub fn merge_observations(
    previous: &ObservationGroup,
    fresh: Vec<FreshObservation>,
    fuzz: u64,
    now: DateTime<Utc>,
) -> ObservationGroup {
    let mut marks: HashMap<String, HeightMark> = previous.history.clone();
    for obs in &previous.observations {
        marks.insert(
            obs.key.clone(),
            HeightMark {
                height: obs.height,
                last_changed_at: obs.last_changed_at,
            },
        );
    }

    let mut seen = HashSet::with_capacity(fresh.len());
    let mut observations = Vec::with_capacity(fresh.len());

    for item in fresh {
        if !seen.insert(item.key.clone()) {
            warn!("Ignoring duplicate observation for {}", item.key);
            continue;
        }

        let last_changed_at = match marks.remove(&item.key) {
            Some(mark) if mark.height == item.height => mark.last_changed_at,
            _ => now,
        };

        observations.push(HeightObservation {
            key: item.key,
            height: item.height,
            observed_at: now,
            last_changed_at,
            failed: item.failed,
            mode_height: 0,
            pool: item.pool,
        });
    }

    let heights: Vec<u64> = observations.iter().map(|obs| obs.height).collect();
    let consensus = compute_consensus(&heights, fuzz);

    for obs in &mut observations {
        obs.mode_height = consensus.mode_height;
    }

    ObservationGroup {
        observations,
        consensus,
        refreshed_at: Some(now),
        history: marks,
    }
}

/// Mark each pool UP when it sits within `max_deviance` of the group mode
pub fn stamp_pool_status(group: &mut ObservationGroup, max_deviance: u64) {
    let mode_height = group.consensus.mode_height;
    for obs in &mut group.observations {
        let up = obs.height.abs_diff(mode_height) <= max_deviance;
        if let Some(pool) = obs.pool.as_mut() {
            pool.status = Some(HealthState::from_bool(up));
        }
    }
}
