//! Board construction: catalog draws, tile generation and plot/path discovery.
//!
//! Tiles are generated ring by ring. Each tile visits its six corners and six sides; a corner
//! or side that an earlier tile already created is reused, so neighbouring tiles end up
//! holding the same [`PlotId`] and [`PathId`].

use crate::board::{
    Board, EndpointPair, Path, PathId, Plot, PlotId, Resource, Tile, TileKind, TopologyError,
};
use crate::coords::{tile_center, Coord, PathDirection, TileId, CORNER_OFFSETS, MAX_RINGS};
use crate::linker;
use crate::ports::{assign_ports, port_at, PortLayout};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// How many tiles of one kind the catalog holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileCount {
    pub kind: TileKind,
    pub count: u8,
}

/// Everything needed to build a board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Number of rings including the centre tile (3 for the regulation board)
    pub rings: u8,
    /// Tile kinds to draw from; slots left over once it runs dry become desert
    pub tiles: Vec<TileCount>,
    /// Production numbers to draw from; tiles left over once it runs dry get none
    pub numbers: Vec<u8>,
    pub ports: PortLayout,
}

impl BoardConfig {
    /// The regulation 19-tile board
    pub fn standard() -> Self {
        let count = |kind, count| TileCount { kind, count };
        Self {
            rings: 3,
            tiles: vec![
                count(TileKind::Resource(Resource::Grain), 4),
                count(TileKind::Resource(Resource::Wool), 4),
                count(TileKind::Resource(Resource::Lumber), 4),
                count(TileKind::Resource(Resource::Brick), 3),
                count(TileKind::Resource(Resource::Ore), 3),
                count(TileKind::Desert, 1),
            ],
            numbers: vec![2, 3, 3, 4, 4, 5, 5, 6, 6, 8, 8, 9, 9, 10, 10, 11, 11, 12],
            ports: PortLayout::standard(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, TopologyError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, TopologyError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The tile catalog expanded into one entry per tile
    fn kind_pool(&self) -> Vec<TileKind> {
        self.tiles
            .iter()
            .flat_map(|entry| std::iter::repeat(entry.kind).take(entry.count.into()))
            .collect()
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self::standard()
    }
}

/// Draw a tile kind uniformly from what is left, or desert once nothing is.
pub fn draw_tile_kind<R: Rng + ?Sized>(pool: &mut Vec<TileKind>, rng: &mut R) -> TileKind {
    if pool.is_empty() {
        return TileKind::Desert;
    }
    let index = rng.gen_range(0..pool.len());
    pool.swap_remove(index)
}

/// Draw a production number uniformly from what is left.
pub fn draw_number<R: Rng + ?Sized>(pool: &mut Vec<u8>, rng: &mut R) -> Option<u8> {
    if pool.is_empty() {
        return None;
    }
    let index = rng.gen_range(0..pool.len());
    Some(pool.swap_remove(index))
}

/// Build and link a complete board.
///
/// Ring counts are clamped to `1..=MAX_RINGS`. Construction never fails: exhausted catalogs
/// fall back to desert tiles and missing numbers.
pub fn build_board<R: Rng + ?Sized>(config: &BoardConfig, rng: &mut R) -> Board {
    let rings = config.rings.clamp(1, MAX_RINGS);
    let mut board = Board::empty(assign_ports(&config.ports, rng));
    let mut kinds = config.kind_pool();
    let mut numbers = config.numbers.clone();

    for id in TileId::all(rings) {
        let kind = draw_tile_kind(&mut kinds, rng);
        let number = match kind {
            TileKind::Desert => None,
            TileKind::Resource(_) => draw_number(&mut numbers, rng),
        };
        let coord = tile_center(id);

        let plots = CORNER_OFFSETS.map(|offset| discover_plot(&mut board, coord + offset, coord));
        let paths: [PathId; 6] = std::array::from_fn(|side| {
            discover_path(&mut board, plots[side], plots[(side + 1) % 6], coord)
        });

        trace!(tile = %id, %coord, ?kind, ?number, "tile generated");
        board.tile_index.insert(id, board.tiles.len());
        board.tiles.push(Tile {
            id,
            coord,
            kind,
            number,
            has_robber: false,
            plots,
            paths,
        });
    }

    linker::link(&mut board);
    board.place_initial_robber();

    debug!(
        rings,
        tiles = board.tiles.len(),
        plots = board.plots.len(),
        paths = board.paths.len(),
        robber = %board.robber_position(),
        "board built"
    );
    debug_assert!(board.verify().is_ok(), "built board violates its invariants");
    board
}

/// Reuse the plot at `coord` or create it, recording `tile` as touching it
fn discover_plot(board: &mut Board, coord: Coord, tile: Coord) -> PlotId {
    let id = match board.plot_index.get(&coord) {
        Some(&id) => id,
        None => {
            let id = PlotId(board.plots.len());
            board.plots.push(Plot::new(coord, port_at(&board.ports, coord)));
            board.plot_index.insert(coord, id);
            id
        }
    };
    board.plots[id.0].tiles.insert(tile);
    id
}

/// Reuse the path joining `a` and `b` or create it, slanted as seen from `tile`
fn discover_path(board: &mut Board, a: PlotId, b: PlotId, tile: Coord) -> PathId {
    let endpoints = EndpointPair::new(a, b);
    if let Some(&id) = board.path_index.get(&endpoints) {
        return id;
    }

    let direction = PathDirection::between(board.plot(a).coord, board.plot(b).coord, tile);
    let id = PathId(board.paths.len());
    board.paths.push(Path::new(endpoints, direction));
    board.path_index.insert(endpoints, id);
    id
}
