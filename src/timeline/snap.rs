// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Edge snapping for caption drags.

/// Category of snap target, used to break distance ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapKind {
    CaptionEdge,
    Playhead,
}

impl SnapKind {
    fn priority(self) -> i32 {
        match self {
            SnapKind::CaptionEdge => 2,
            SnapKind::Playhead => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapTarget {
    pub time: f64,
    pub kind: SnapKind,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapMatch {
    /// Seconds to add to the sources to land on the target.
    pub delta: f64,
    pub target: SnapTarget,
}

/// Closest target to any of `sources` within `threshold` seconds.
pub fn best_snap(sources: &[f64], targets: &[SnapTarget], threshold: f64) -> Option<SnapMatch> {
    if threshold <= 0.0 {
        return None;
    }
    const EPSILON: f64 = 1e-9;

    let mut best: Option<SnapMatch> = None;
    let mut best_distance = f64::INFINITY;
    for &source in sources {
        for &target in targets {
            let delta = target.time - source;
            let distance = delta.abs();
            if distance > threshold {
                continue;
            }
            let closer = distance + EPSILON < best_distance;
            let tie_wins = (distance - best_distance).abs() <= EPSILON
                && best.map_or(true, |b| target.kind.priority() > b.target.kind.priority());
            if closer || tie_wins {
                best_distance = distance;
                best = Some(SnapMatch { delta, target });
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(time: f64) -> SnapTarget {
        SnapTarget {
            time,
            kind: SnapKind::CaptionEdge,
        }
    }

    #[test]
    fn test_picks_nearest_within_threshold() {
        let targets = [edge(5.0), edge(9.0)];
        let snap = best_snap(&[4.8, 8.0], &targets, 0.5).unwrap();
        assert!((snap.delta - 0.2).abs() < 1e-9);
        assert_eq!(snap.target.time, 5.0);

        assert!(best_snap(&[2.0], &targets, 0.5).is_none());
    }

    #[test]
    fn test_caption_edge_beats_playhead_on_tie() {
        let targets = [
            SnapTarget {
                time: 5.0,
                kind: SnapKind::Playhead,
            },
            edge(5.0),
        ];
        let snap = best_snap(&[5.1], &targets, 0.5).unwrap();
        assert_eq!(snap.target.kind, SnapKind::CaptionEdge);
    }
}
