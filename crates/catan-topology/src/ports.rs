//! Harbor placement along the coast.
//!
//! A port site is a pair of neighbouring coastal plots. The standard layout has nine sites
//! at fixed coordinates; the harbor kinds are rotated by a random amount before being bound,
//! so the ring of kinds keeps its order but starts at a random site.

use crate::board::{Harbor, Resource};
use crate::coords::Coord;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A coastal pair of plots and the harbor bound to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortSite {
    pub plots: (Coord, Coord),
    pub harbor: Option<Harbor>,
}

impl PortSite {
    /// Whether `coord` is one of this site's two plots
    pub fn touches(&self, coord: Coord) -> bool {
        self.plots.0 == coord || self.plots.1 == coord
    }
}

/// Port sites and the harbor kinds to spread over them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortLayout {
    pub sites: Vec<(Coord, Coord)>,
    /// Kinds in ring order; `None` leaves a site without a harbor
    pub harbors: Vec<Option<Harbor>>,
}

impl PortLayout {
    /// The nine sites of the regulation board, clockwise from the top
    pub fn standard() -> Self {
        let site = |ax, ay, bx, by| (Coord::new(ax, ay), Coord::new(bx, by));
        Self {
            sites: vec![
                site(-1, 5, 1, 5),
                site(3, 3, 3, 4),
                site(5, 1, 5, 0),
                site(5, -2, 5, -3),
                site(1, -4, 3, -4),
                site(-1, -4, -3, -4),
                site(-5, -2, -5, -3),
                site(-5, 0, -5, 1),
                site(-3, 3, -3, 4),
            ],
            harbors: vec![
                Some(Harbor::Generic),
                Some(Harbor::Specific(Resource::Grain)),
                Some(Harbor::Specific(Resource::Ore)),
                Some(Harbor::Generic),
                Some(Harbor::Specific(Resource::Wool)),
                Some(Harbor::Generic),
                Some(Harbor::Generic),
                Some(Harbor::Specific(Resource::Brick)),
                Some(Harbor::Specific(Resource::Lumber)),
            ],
        }
    }

    /// No harbors at all
    pub fn none() -> Self {
        Self {
            sites: Vec::new(),
            harbors: Vec::new(),
        }
    }
}

impl Default for PortLayout {
    fn default() -> Self {
        Self::standard()
    }
}

/// Bind harbor kinds to sites after a single random rotation.
///
/// Sites beyond the number of kinds get no harbor; surplus kinds are dropped.
pub fn assign_ports<R: Rng + ?Sized>(layout: &PortLayout, rng: &mut R) -> Vec<PortSite> {
    let mut harbors = layout.harbors.clone();
    if !harbors.is_empty() {
        let shift = rng.gen_range(0..harbors.len());
        harbors.rotate_left(shift);
        debug!(shift, "harbors rotated");
    }

    layout
        .sites
        .iter()
        .enumerate()
        .map(|(i, &plots)| PortSite {
            plots,
            harbor: harbors.get(i).copied().flatten(),
        })
        .collect()
}

/// Harbor at a plot, if it sits on a bound site
pub fn port_at(sites: &[PortSite], coord: Coord) -> Option<Harbor> {
    sites
        .iter()
        .find(|site| site.touches(coord))
        .and_then(|site| site.harbor)
}
