//! Doubled offset coordinate system for tiles, plots and paths.
//!
//! Every tile, plot and path endpoint lives on one integer grid:
//! - Tile centres sit on even `x` columns, two units apart vertically within a column,
//!   with neighbouring columns shifted by one unit.
//! - Plots sit on odd `x` columns, one unit apart vertically.
//!
//! Tiles are addressed by a [`TileId`] (ring + position), which maps onto the grid through
//! [`tile_center`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;
use thiserror::Error;

/// Largest number of rings a board may have.
///
/// Position labels are single letters, so the outermost ring may hold at most 26 tiles.
pub const MAX_RINGS: u8 = 5;

/// Integer coordinate on the doubled offset grid.
///
/// Ordered by `x` first, then `y`, so it can key ordered maps and sets.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    /// The board centre. Also returned as the sentinel for invalid tile ids.
    pub const ORIGIN: Coord = Coord::new(0, 0);

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Coord {
    type Output = Coord;

    fn add(self, rhs: Coord) -> Coord {
        Coord::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Coord {
    type Output = Coord;

    fn sub(self, rhs: Coord) -> Coord {
        Coord::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<i32> for Coord {
    type Output = Coord;

    fn mul(self, k: i32) -> Coord {
        Coord::new(self.x * k, self.y * k)
    }
}

impl Neg for Coord {
    type Output = Coord;

    fn neg(self) -> Coord {
        Coord::new(-self.x, -self.y)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Offsets from a tile centre to its six corners, clockwise from the top-left corner.
///
/// Edge `i` of a tile runs from corner `i` to corner `(i + 1) % 6`.
pub const CORNER_OFFSETS: [Coord; 6] = [
    Coord::new(-1, 1),
    Coord::new(1, 1),
    Coord::new(1, 0),
    Coord::new(1, -1),
    Coord::new(-1, -1),
    Coord::new(-1, 0),
];

/// Steps between neighbouring tile centres, in the order a ring is walked clockwise
/// once it has left its top tile: SE, S, SW, NW, N, NE.
const RING_STEPS: [Coord; 6] = [
    Coord::new(2, -1),
    Coord::new(0, -2),
    Coord::new(-2, -1),
    Coord::new(-2, 1),
    Coord::new(0, 2),
    Coord::new(2, 1),
];

/// Step from the centre to the top tile of ring 1.
const NORTH: Coord = Coord::new(0, 2);

/// Number of tile positions in a ring.
pub const fn ring_len(ring: u8) -> usize {
    if ring == 0 {
        1
    } else {
        6 * ring as usize
    }
}

/// Identifies a tile by ring (0 = centre) and clockwise position within that ring.
///
/// Position 0 of every ring is its topmost tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileId {
    pub ring: u8,
    pub position: u8,
}

impl TileId {
    pub const fn new(ring: u8, position: u8) -> Self {
        Self { ring, position }
    }

    /// The centre tile
    pub const CENTER: TileId = TileId::new(0, 0);

    /// Whether this id names a position that exists on a board of [`MAX_RINGS`] rings
    pub fn is_valid(&self) -> bool {
        self.ring < MAX_RINGS && (self.position as usize) < ring_len(self.ring)
    }

    /// All tile ids of a board with `rings` rings, in generation order
    pub fn all(rings: u8) -> impl Iterator<Item = TileId> {
        (0..rings.min(MAX_RINGS)).flat_map(|ring| {
            (0..ring_len(ring)).map(move |position| TileId::new(ring, position as u8))
        })
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ring = char::from(b'a'.saturating_add(self.ring));
        let position = char::from(b'a'.saturating_add(self.position));
        write!(f, "{ring},{position}")
    }
}

/// Errors from parsing a tile label such as `"b,d"`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseTileIdError {
    #[error("tile label must look like \"b,d\", got {0:?}")]
    Malformed(String),

    #[error("tile {0} is outside the board")]
    OutOfRange(TileId),
}

impl FromStr for TileId {
    type Err = ParseTileIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ParseTileIdError::Malformed(s.to_string());
        let &[ring, b',', position] = s.as_bytes() else {
            return Err(malformed());
        };
        if !ring.is_ascii_lowercase() || !position.is_ascii_lowercase() {
            return Err(malformed());
        }

        let id = TileId::new(ring - b'a', position - b'a');
        if id.is_valid() {
            Ok(id)
        } else {
            Err(ParseTileIdError::OutOfRange(id))
        }
    }
}

/// Centre coordinate of a tile.
///
/// Ring `r` starts at `r` steps north of the centre and walks `r` steps along each of the
/// six neighbour directions. Invalid ids map to [`Coord::ORIGIN`]; callers must check
/// [`TileId::is_valid`] before trusting the result.
pub fn tile_center(id: TileId) -> Coord {
    if !id.is_valid() || id.ring == 0 {
        return Coord::ORIGIN;
    }

    let ring = i32::from(id.ring);
    let position = i32::from(id.position);
    let side = (position / ring) as usize;
    let along = position % ring;

    let mut center = NORTH * ring;
    for step in &RING_STEPS[..side] {
        center = center + *step * ring;
    }
    center + RING_STEPS[side] * along
}

/// Centre coordinate of a tile given its textual label.
///
/// Malformed or out-of-range labels map to [`Coord::ORIGIN`].
pub fn tile_center_for_label(label: &str) -> Coord {
    label.parse().map(tile_center).unwrap_or(Coord::ORIGIN)
}

/// Offset from a plot to its third ("mirror") neighbour.
///
/// Besides the plots directly above and below, every plot has one horizontal neighbour two
/// columns away. At the reference plot `(-1, 0)` it lies to the left; the side flips with every
/// column step of two and every row step of one walked away from the reference.
pub fn mirror_offset(plot: Coord) -> Coord {
    const REFERENCE: Coord = Coord::new(-1, 0);
    const REFERENCE_MIRROR: Coord = Coord::new(-2, 0);

    let column_steps = (plot.x - REFERENCE.x).abs() / 2;
    let row_steps = (plot.y - REFERENCE.y).abs();
    if (column_steps + row_steps) % 2 == 0 {
        REFERENCE_MIRROR
    } else {
        -REFERENCE_MIRROR
    }
}

/// Slant of a path as drawn on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathDirection {
    /// Horizontal (`-----`)
    Flat,
    /// Rising left to right (`/`)
    Up,
    /// Falling left to right (`\`)
    Down,
}

impl PathDirection {
    /// Classify the path between two plots, as seen from the tile at `anchor`.
    ///
    /// The grid compresses the vertical corners of a tile onto the same column as its slanted
    /// corners, so an endpoint on an odd column and even row has its `x` doubled before the
    /// slope is taken.
    pub fn between(a: Coord, b: Coord, anchor: Coord) -> Self {
        fn widen(local: Coord) -> Coord {
            if local.x % 2 != 0 && local.y % 2 == 0 {
                Coord::new(local.x * 2, local.y)
            } else {
                local
            }
        }

        let a = widen(a - anchor);
        let b = widen(b - anchor);
        let rise = a.y - b.y;
        let run = a.x - b.x;

        if rise == 0 {
            PathDirection::Flat
        } else if run == 0 {
            if rise > 0 {
                PathDirection::Up
            } else {
                PathDirection::Down
            }
        } else if (rise > 0) == (run > 0) {
            PathDirection::Up
        } else {
            PathDirection::Down
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ring_lengths() {
        assert_eq!(ring_len(0), 1);
        assert_eq!(ring_len(1), 6);
        assert_eq!(ring_len(2), 12);
        assert_eq!(TileId::all(3).count(), 19);
    }

    #[test]
    fn test_outer_ring_walks_clockwise_from_top() {
        let expected = [
            (0, 4),
            (2, 3),
            (4, 2),
            (4, 0),
            (4, -2),
            (2, -3),
            (0, -4),
            (-2, -3),
            (-4, -2),
            (-4, 0),
            (-4, 2),
            (-2, 3),
        ];
        for (position, (x, y)) in expected.into_iter().enumerate() {
            let id = TileId::new(2, position as u8);
            assert_eq!(tile_center(id), Coord::new(x, y), "tile {id}");
        }
    }

    #[test]
    fn test_inner_ring_is_every_other_outer_position_halved() {
        for position in 0..6u8 {
            let inner = tile_center(TileId::new(1, position));
            let outer = tile_center(TileId::new(2, position * 2));
            assert_eq!(inner * 2, outer);
        }
    }

    #[test]
    fn test_tile_centers_are_unique() {
        let centers: HashSet<_> = TileId::all(MAX_RINGS).map(tile_center).collect();
        assert_eq!(centers.len(), TileId::all(MAX_RINGS).count());
    }

    #[test]
    fn test_invalid_ids_map_to_origin() {
        assert_eq!(tile_center(TileId::new(1, 6)), Coord::ORIGIN);
        assert_eq!(tile_center(TileId::new(MAX_RINGS, 0)), Coord::ORIGIN);
        assert_eq!(tile_center_for_label("b,z"), Coord::ORIGIN);
        assert_eq!(tile_center_for_label("bd"), Coord::ORIGIN);
        assert_eq!(tile_center_for_label(""), Coord::ORIGIN);
    }

    #[test]
    fn test_label_round_trip() {
        for id in TileId::all(3) {
            let label = id.to_string();
            assert_eq!(label.parse::<TileId>(), Ok(id));
            assert_eq!(tile_center_for_label(&label), tile_center(id));
        }
        assert_eq!(TileId::new(1, 3).to_string(), "b,d");
    }

    #[test]
    fn test_label_parse_errors() {
        assert!(matches!(
            "b-d".parse::<TileId>(),
            Err(ParseTileIdError::Malformed(_))
        ));
        assert!(matches!(
            "B,d".parse::<TileId>(),
            Err(ParseTileIdError::Malformed(_))
        ));
        assert_eq!(
            "a,b".parse::<TileId>(),
            Err(ParseTileIdError::OutOfRange(TileId::new(0, 1)))
        );
    }

    #[test]
    fn test_mirror_offset_flips_with_each_step() {
        assert_eq!(mirror_offset(Coord::new(-1, 0)), Coord::new(-2, 0));
        assert_eq!(mirror_offset(Coord::new(1, 0)), Coord::new(2, 0));
        assert_eq!(mirror_offset(Coord::new(1, 1)), Coord::new(-2, 0));
        assert_eq!(mirror_offset(Coord::new(-1, 1)), Coord::new(2, 0));
        assert_eq!(mirror_offset(Coord::new(3, 4)), Coord::new(-2, 0));
        assert_eq!(mirror_offset(Coord::new(-5, -3)), Coord::new(2, 0));
    }

    #[test]
    fn test_path_directions_around_center_tile() {
        let anchor = Coord::ORIGIN;
        let corner = |i: usize| CORNER_OFFSETS[i];
        assert_eq!(PathDirection::between(corner(0), corner(1), anchor), PathDirection::Flat);
        assert_eq!(PathDirection::between(corner(1), corner(2), anchor), PathDirection::Down);
        assert_eq!(PathDirection::between(corner(2), corner(3), anchor), PathDirection::Up);
        assert_eq!(PathDirection::between(corner(3), corner(4), anchor), PathDirection::Flat);
        assert_eq!(PathDirection::between(corner(4), corner(5), anchor), PathDirection::Down);
        assert_eq!(PathDirection::between(corner(5), corner(0), anchor), PathDirection::Up);
    }

    #[test]
    fn test_path_direction_ignores_endpoint_order() {
        let anchor = Coord::new(2, 1);
        let a = anchor + CORNER_OFFSETS[1];
        let b = anchor + CORNER_OFFSETS[2];
        assert_eq!(
            PathDirection::between(a, b, anchor),
            PathDirection::between(b, a, anchor)
        );
    }
}
