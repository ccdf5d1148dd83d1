//! Second construction pass: plot-to-plot and path-to-path adjacency.
//!
//! Runs once every tile has created its plots and paths, since a plot's neighbours may belong
//! to tiles generated after it.

use crate::board::{Board, EndpointPair, PathId};
use crate::coords::{mirror_offset, Coord};
use std::collections::BTreeSet;

const ABOVE: Coord = Coord::new(0, 1);
const BELOW: Coord = Coord::new(0, -1);

pub(crate) fn link(board: &mut Board) {
    link_plots(board);
    link_paths(board);
}

/// Fill each plot's neighbour slots: above, below, then the mirror neighbour.
fn link_plots(board: &mut Board) {
    for i in 0..board.plots.len() {
        let coord = board.plots[i].coord;
        let slots = [coord + ABOVE, coord + BELOW, coord + mirror_offset(coord)];
        board.plots[i].neighbors = slots.map(|slot| board.plot_index.get(&slot).copied());
    }
}

/// Collect, for each path, every other path leaving either of its endpoints.
fn link_paths(board: &mut Board) {
    for i in 0..board.paths.len() {
        let id = PathId(i);
        let mut adjacent = BTreeSet::new();

        for end in board.paths[i].endpoints.plots() {
            for neighbor in board.plot(end).neighbors() {
                match board.get_path(&EndpointPair::new(end, neighbor)) {
                    Some(other) if other != id => {
                        adjacent.insert(other);
                    }
                    _ => {}
                }
            }
        }

        board.paths[i].adjacent = adjacent;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::TileId;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn board() -> Board {
        Board::standard_with_rng(&mut StdRng::seed_from_u64(21))
    }

    #[test]
    fn test_plot_degrees() {
        let board = board();
        for plot in board.plots() {
            let degree = plot.neighbors().count();
            assert!((2..=3).contains(&degree), "plot {} has {degree}", plot.coord);
        }
        let coastal = board
            .plots()
            .iter()
            .filter(|p| p.neighbors().count() == 2)
            .count();
        assert_eq!(coastal, 18);
    }

    #[test]
    fn test_neighbour_slots() {
        let board = board();
        let id = board.get_plot(Coord::new(1, 0)).unwrap();
        let plot = board.plot(id);
        assert_eq!(plot.neighbors[0], board.get_plot(Coord::new(1, 1)));
        assert_eq!(plot.neighbors[1], board.get_plot(Coord::new(1, -1)));
        assert_eq!(plot.neighbors[2], board.get_plot(Coord::new(3, 0)));
    }

    #[test]
    fn test_inner_paths_touch_four_others() {
        let board = board();
        let center = board.get_tile(TileId::CENTER).unwrap();
        for path in center.paths {
            assert_eq!(board.path(path).adjacent.len(), 4);
            assert!(!board.path(path).adjacent.contains(&path));
        }
    }

    #[test]
    fn test_relinking_is_stable() {
        let mut board = board();
        let before: Vec<_> = board.paths().iter().map(|p| p.adjacent.clone()).collect();
        for plot in &mut board.plots {
            plot.neighbors = [None; 3];
        }
        for path in &mut board.paths {
            path.adjacent.clear();
        }

        link(&mut board);

        let after: Vec<_> = board.paths().iter().map(|p| p.adjacent.clone()).collect();
        assert_eq!(before, after);
        board.verify().unwrap();
    }
}
