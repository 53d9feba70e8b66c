//! Fuzzy plurality voting over reported heights

use std::collections::HashMap;

use super::types::ConsensusResult;

/// Compute the consensus height of `heights`.
///
/// Every non-zero height votes for each integer in `[h - fuzz, h + fuzz]`
/// (never below 1).
/// The winner is the first candidate, in input order, to reach the highest
/// vote count. Zero heights are counted as invalid and never vote.
pub fn compute_consensus(heights: &[u64], fuzz: u64) -> ConsensusResult {
    let mut votes: HashMap<u64, usize> = HashMap::new();
    let mut greatest_freq = 0usize;
    let mut mode_height = 0u64;
    let mut invalid_count = 0usize;

    for &height in heights {
        if height == 0 {
            invalid_count += 1;
            continue;
        }

        // Zero is the "no value" marker and never wins
        let low = height.saturating_sub(fuzz).max(1);
        let high = height.saturating_add(fuzz);

        for candidate in low..=high {
            let count = votes.entry(candidate).or_insert(0);
            *count += 1;

            if *count > greatest_freq {
                greatest_freq = *count;
                mode_height = candidate;
            }
        }
    }

    let valid_count = heights.len() - invalid_count;
    if valid_count == 0 {
        return ConsensusResult {
            mode_height: 0,
            valid_count: 0,
            invalid_count,
            consensus_percent: 0.0,
        };
    }

    ConsensusResult {
        mode_height,
        valid_count,
        invalid_count,
        consensus_percent: round2(greatest_freq as f64 / valid_count as f64 * 100.0),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
