//! Longest-road search.
//!
//! Enumerates simple trails (no path used twice) over one player's roads, starting from a
//! given path. Every fork clones the trail so each branch is explored to its end.

use crate::board::{Board, PathId, PlayerId, PlotId};
use tracing::trace;

/// A trail being grown through its open end
#[derive(Debug, Clone)]
struct Trail {
    paths: Vec<PathId>,
    /// The plot the next path must leave from
    open_end: PlotId,
    terminated: bool,
}

impl Trail {
    fn new(start: PathId, open_end: PlotId) -> Self {
        Self {
            paths: vec![start],
            open_end,
            terminated: false,
        }
    }

    fn extend(&mut self, path: PathId, open_end: PlotId) {
        self.paths.push(path);
        self.open_end = open_end;
    }
}

/// Length of the longest trail of `owner`'s roads that starts on `start`.
///
/// The start path itself is always counted. A trail cannot continue through a plot holding
/// another player's building.
pub fn longest_trail(board: &Board, start: PathId, owner: PlayerId) -> usize {
    let Some(first) = board.paths().get(start.0) else {
        return 0;
    };

    let mut trails: Vec<Trail> = first
        .endpoints
        .plots()
        .into_iter()
        .map(|end| Trail::new(start, end))
        .collect();
    let mut longest = 0;

    let mut i = 0;
    while i < trails.len() {
        while !trails[i].terminated {
            let next = extensions(board, &trails[i], owner);
            let Some((&(path, end), forks)) = next.split_first() else {
                trails[i].terminated = true;
                continue;
            };

            for &(fork_path, fork_end) in forks {
                let mut fork = trails[i].clone();
                fork.extend(fork_path, fork_end);
                trace!(at = ?trails[i].open_end, len = fork.paths.len(), "trail forked");
                trails.push(fork);
            }
            trails[i].extend(path, end);
        }

        longest = longest.max(trails[i].paths.len());
        i += 1;
    }

    longest
}

/// Paths that can extend `trail`, paired with the open end each would leave behind
fn extensions(board: &Board, trail: &Trail, owner: PlayerId) -> Vec<(PathId, PlotId)> {
    let junction = board.plot(trail.open_end);
    if junction.building.owner().is_some_and(|other| other != owner) {
        return Vec::new();
    }

    board
        .paths_at(trail.open_end)
        .filter(|&p| board.path(p).road.owner() == Some(owner))
        .filter(|p| !trail.paths.contains(p))
        .filter_map(|p| {
            let far = board.path(p).endpoints.other(trail.open_end)?;
            Some((p, far))
        })
        .collect()
}
