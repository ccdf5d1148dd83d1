//! Game board representation: tiles, plots, paths and the lookups the rest of the game uses.
//!
//! This module contains:
//! - Resource, tile, harbor and building types
//! - The [`Tile`], [`Plot`] and [`Path`] graph entities
//! - The [`Board`] query facade, occupancy mutation, robber handling and production
//! - Invariant checking for the shared-corner / shared-edge identity rules
//!
//! Plots and paths are stored in arenas owned by the board and referenced everywhere else
//! through [`PlotId`] and [`PathId`], so two tiles sharing a corner hold the same id.

use crate::builder::{self, BoardConfig};
use crate::coords::{tile_center, Coord, PathDirection, TileId};
use crate::player::ProductionSink;
use crate::ports::PortSite;
use crate::road;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::hash::{Hash, Hasher};
use thiserror::Error;
use tracing::debug;

/// Player identifier
pub type PlayerId = u8;

/// Resource types produced by tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Resource {
    Brick,
    Lumber,
    Ore,
    Grain,
    Wool,
}

impl Resource {
    /// All resource types
    pub const ALL: [Resource; 5] = [
        Resource::Brick,
        Resource::Lumber,
        Resource::Ore,
        Resource::Grain,
        Resource::Wool,
    ];
}

/// What a tile is made of
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Produces a resource when its number is rolled
    Resource(Resource),
    /// Never produces; the robber starts here
    Desert,
}

/// Harbor types for maritime trading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Harbor {
    /// 3:1 trade any resource
    Generic,
    /// 2:1 trade for a specific resource
    Specific(Resource),
}

impl Harbor {
    /// The exchange rate for this harbor
    pub fn rate(&self) -> u32 {
        match self {
            Harbor::Generic => 3,
            Harbor::Specific(_) => 2,
        }
    }
}

/// What's built on a plot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum VertexBuilding {
    /// Nothing built
    #[default]
    Empty,
    /// Settlement (1 resource per adjacent tile)
    Settlement(PlayerId),
    /// City (2 resources per adjacent tile)
    City(PlayerId),
}

impl VertexBuilding {
    /// Get the owner of this building, if any
    pub fn owner(&self) -> Option<PlayerId> {
        match self {
            VertexBuilding::Empty => None,
            VertexBuilding::Settlement(p) | VertexBuilding::City(p) => Some(*p),
        }
    }

    /// Resource multiplier (how many resources per production)
    pub fn resource_multiplier(&self) -> u32 {
        match self {
            VertexBuilding::Empty => 0,
            VertexBuilding::Settlement(_) => 1,
            VertexBuilding::City(_) => 2,
        }
    }
}

/// What's built on a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EdgeBuilding {
    /// Nothing built
    #[default]
    Empty,
    /// Road
    Road(PlayerId),
}

impl EdgeBuilding {
    /// Get the owner of this road, if any
    pub fn owner(&self) -> Option<PlayerId> {
        match self {
            EdgeBuilding::Empty => None,
            EdgeBuilding::Road(p) => Some(*p),
        }
    }
}

/// Index of a plot in its board's plot arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlotId(pub usize);

/// Index of a path in its board's path arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PathId(pub usize);

/// The two plots bounding a path.
///
/// Unordered: the pair `(a, b)` equals and hashes like `(b, a)`.
#[derive(Debug, Clone, Copy, Eq, Serialize, Deserialize)]
pub struct EndpointPair {
    pub a: PlotId,
    pub b: PlotId,
}

impl EndpointPair {
    pub fn new(a: PlotId, b: PlotId) -> Self {
        Self { a, b }
    }

    /// Whether `plot` is one of the two endpoints
    pub fn has(&self, plot: PlotId) -> bool {
        self.a == plot || self.b == plot
    }

    /// The endpoint that isn't `plot`, if `plot` is an endpoint at all
    pub fn other(&self, plot: PlotId) -> Option<PlotId> {
        if self.a == plot {
            Some(self.b)
        } else if self.b == plot {
            Some(self.a)
        } else {
            None
        }
    }

    pub fn plots(&self) -> [PlotId; 2] {
        [self.a, self.b]
    }

    fn sorted(&self) -> (PlotId, PlotId) {
        (self.a.min(self.b), self.a.max(self.b))
    }
}

impl PartialEq for EndpointPair {
    fn eq(&self, other: &Self) -> bool {
        self.sorted() == other.sorted()
    }
}

impl Hash for EndpointPair {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sorted().hash(state);
    }
}

/// A single hex tile on the board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tile {
    /// Ring and position
    pub id: TileId,
    /// Centre on the grid
    pub coord: Coord,
    pub kind: TileKind,
    /// Dice number that triggers production (2-12, None for desert)
    pub number: Option<u8>,
    /// Whether the robber is currently on this tile
    pub has_robber: bool,
    /// Corners, clockwise from the top-left
    pub plots: [PlotId; 6],
    /// Sides; side `i` runs from corner `i` to corner `i + 1`
    pub paths: [PathId; 6],
}

impl Tile {
    /// Get the resource this tile produces, if any
    pub fn resource(&self) -> Option<Resource> {
        match self.kind {
            TileKind::Resource(r) => Some(r),
            TileKind::Desert => None,
        }
    }

    /// Check if this tile produces resources
    pub fn is_productive(&self) -> bool {
        self.resource().is_some() && self.number.is_some() && !self.has_robber
    }
}

/// An intersection where buildings are placed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plot {
    pub coord: Coord,
    pub building: VertexBuilding,
    /// Neighbouring plots: above, below and the horizontal "mirror" neighbour
    pub neighbors: [Option<PlotId>; 3],
    /// Centres of every tile touching this plot
    pub tiles: BTreeSet<Coord>,
    pub port: Option<Harbor>,
}

impl Plot {
    pub(crate) fn new(coord: Coord, port: Option<Harbor>) -> Self {
        Self {
            coord,
            building: VertexBuilding::Empty,
            neighbors: [None; 3],
            tiles: BTreeSet::new(),
            port,
        }
    }

    /// Iterate over the neighbours that exist
    pub fn neighbors(&self) -> impl Iterator<Item = PlotId> + '_ {
        self.neighbors.iter().flatten().copied()
    }

    pub fn is_occupied(&self) -> bool {
        self.building != VertexBuilding::Empty
    }
}

/// An edge between two plots where roads are placed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Path {
    pub endpoints: EndpointPair,
    /// Slant, fixed when the path is discovered
    pub direction: PathDirection,
    pub road: EdgeBuilding,
    /// Paths sharing exactly one endpoint with this one
    pub adjacent: BTreeSet<PathId>,
}

impl Path {
    pub(crate) fn new(endpoints: EndpointPair, direction: PathDirection) -> Self {
        Self {
            endpoints,
            direction,
            road: EdgeBuilding::Empty,
            adjacent: BTreeSet::new(),
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.road != EdgeBuilding::Empty
    }
}

/// Errors raised by board lookups, mutation and invariant checks
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("no tile {0}")]
    NoSuchTile(TileId),

    #[error("no plot {0:?}")]
    NoSuchPlot(PlotId),

    #[error("no path {0:?}")]
    NoSuchPath(PathId),

    #[error("two plots share coordinate {0}")]
    DuplicatePlot(Coord),

    #[error("two paths join {0} and {1}")]
    DuplicatePath(Coord, Coord),

    #[error("plot {0} lists {1} as a neighbour but not the other way round")]
    AsymmetricPlots(Coord, Coord),

    #[error("neighbouring plots {0} and {1} have no path between them")]
    MissingPath(Coord, Coord),

    #[error("path {0:?} lists {1:?} as adjacent but they do not share exactly one plot")]
    BadPathAdjacency(PathId, PathId),

    #[error("tile {0} side {1} does not join its corners")]
    TileSideMismatch(TileId, usize),

    #[error("expected exactly one robber, found {0}")]
    RobberCount(usize),

    #[error("invalid board configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}

/// The complete game board
#[derive(Debug, Clone)]
pub struct Board {
    /// Tiles in generation order (ring by ring, clockwise)
    pub(crate) tiles: Vec<Tile>,
    pub(crate) tile_index: HashMap<TileId, usize>,
    pub(crate) plots: Vec<Plot>,
    pub(crate) plot_index: HashMap<Coord, PlotId>,
    pub(crate) paths: Vec<Path>,
    pub(crate) path_index: HashMap<EndpointPair, PathId>,
    /// Port sites bound when the board was built
    pub(crate) ports: Vec<PortSite>,
    /// Index into `tiles` of the robbed tile
    pub(crate) robber: usize,
}

impl Board {
    /// An empty board with the given port sites, ready for the builder to fill
    pub(crate) fn empty(ports: Vec<PortSite>) -> Self {
        Self {
            tiles: Vec::new(),
            tile_index: HashMap::new(),
            plots: Vec::new(),
            plot_index: HashMap::new(),
            paths: Vec::new(),
            path_index: HashMap::new(),
            ports,
            robber: 0,
        }
    }

    /// Create the regulation board with randomized tiles, numbers and ports
    pub fn standard() -> Self {
        let mut rng = rand::thread_rng();
        Self::standard_with_rng(&mut rng)
    }

    /// Create the regulation board with a provided RNG
    pub fn standard_with_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::from_config(&BoardConfig::standard(), rng)
    }

    /// Create a board from an arbitrary catalog and ring count
    pub fn from_config<R: Rng + ?Sized>(config: &BoardConfig, rng: &mut R) -> Self {
        builder::build_board(config, rng)
    }

    // ==================== Arena Access ====================

    /// All tiles in generation order
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// All plots; a plot's position in this slice is its [`PlotId`]
    pub fn plots(&self) -> &[Plot] {
        &self.plots
    }

    /// All paths; a path's position in this slice is its [`PathId`]
    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    /// The plot behind an id handed out by this board.
    ///
    /// Panics on an id from another board; lookups that take caller-built ids go through
    /// [`Board::try_plot`].
    pub fn plot(&self, id: PlotId) -> &Plot {
        &self.plots[id.0]
    }

    /// The path behind an id handed out by this board
    pub fn path(&self, id: PathId) -> &Path {
        &self.paths[id.0]
    }

    pub fn try_plot(&self, id: PlotId) -> Option<&Plot> {
        self.plots.get(id.0)
    }

    pub fn try_path(&self, id: PathId) -> Option<&Path> {
        self.paths.get(id.0)
    }

    /// Port sites and the harbor bound to each
    pub fn ports(&self) -> &[PortSite] {
        &self.ports
    }

    // ==================== Tile Queries ====================

    pub fn has_tile(&self, id: TileId) -> bool {
        self.tile_index.contains_key(&id)
    }

    pub fn has_tile_at(&self, coord: Coord) -> bool {
        self.get_tile_at(coord).is_some()
    }

    pub fn get_tile(&self, id: TileId) -> Option<&Tile> {
        self.tile_index.get(&id).map(|&i| &self.tiles[i])
    }

    pub fn get_tile_at(&self, coord: Coord) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.coord == coord)
    }

    /// Tile with the given textual label (e.g. `"b,d"`), if the label is well formed and on
    /// this board
    pub fn get_tile_by_label(&self, label: &str) -> Option<&Tile> {
        label.parse().ok().and_then(|id| self.get_tile(id))
    }

    /// Grid coordinate for a tile label; the origin for malformed labels and tiles this board
    /// does not have
    pub fn tile_position_coordinates(&self, label: &str) -> Coord {
        label
            .parse::<TileId>()
            .ok()
            .filter(|id| self.has_tile(*id))
            .map(tile_center)
            .unwrap_or(Coord::ORIGIN)
    }

    // ==================== Plot Queries ====================

    pub fn has_plot(&self, coord: Coord) -> bool {
        self.plot_index.contains_key(&coord)
    }

    pub fn get_plot(&self, coord: Coord) -> Option<PlotId> {
        self.plot_index.get(&coord).copied()
    }

    /// Paths touching a plot; none for a plot this board does not have
    pub fn paths_at(&self, plot: PlotId) -> impl Iterator<Item = PathId> + '_ {
        self.try_plot(plot)
            .into_iter()
            .flat_map(|p| p.neighbors())
            .filter_map(move |n| self.get_path(&EndpointPair::new(plot, n)))
    }

    /// Tiles touching a plot
    pub fn tiles_at_plot(&self, plot: PlotId) -> Vec<&Tile> {
        self.try_plot(plot)
            .into_iter()
            .flat_map(|p| p.tiles.iter())
            .filter_map(|c| self.get_tile_at(*c))
            .collect()
    }

    /// Whether any neighbouring plot holds a building, whoever owns it
    pub fn next_to_building(&self, plot: PlotId) -> bool {
        self.try_plot(plot)
            .is_some_and(|p| p.neighbors().any(|n| self.plot(n).is_occupied()))
    }

    // ==================== Path Queries ====================

    pub fn has_path(&self, endpoints: &EndpointPair) -> bool {
        self.path_index.contains_key(endpoints)
    }

    pub fn get_path(&self, endpoints: &EndpointPair) -> Option<PathId> {
        self.path_index.get(endpoints).copied()
    }

    pub fn has_path_between(&self, a: Coord, b: Coord) -> bool {
        self.get_path_between(a, b).is_some()
    }

    /// Path joining the plots at two coordinates, in either order
    pub fn get_path_between(&self, a: Coord, b: Coord) -> Option<PathId> {
        let a = self.get_plot(a)?;
        let b = self.get_plot(b)?;
        self.get_path(&EndpointPair::new(a, b))
    }

    pub fn has_path_from(&self, plot: PlotId, direction: PathDirection) -> bool {
        self.get_path_from(plot, direction).is_some()
    }

    /// Path leaving `plot` with the given slant
    pub fn get_path_from(&self, plot: PlotId, direction: PathDirection) -> Option<PathId> {
        self.paths_at(plot)
            .find(|&p| self.path(p).direction == direction)
    }

    /// Whether a path touching `path` holds a road of `player`
    pub fn has_adjacent_road(&self, path: PathId, player: PlayerId) -> bool {
        self.try_path(path).is_some_and(|p| {
            p.adjacent
                .iter()
                .any(|&adj| self.path(adj).road.owner() == Some(player))
        })
    }

    /// Whether `player` has an empty path next to one of their roads
    pub fn can_place_road(&self, player: PlayerId) -> bool {
        self.paths
            .iter()
            .filter(|p| p.road.owner() == Some(player))
            .flat_map(|p| p.adjacent.iter())
            .any(|&adj| !self.path(adj).is_occupied())
    }

    /// Every harbor `player` can trade through, without duplicates
    pub fn player_harbors(&self, player: PlayerId) -> Vec<Harbor> {
        let mut harbors = Vec::new();
        for plot in &self.plots {
            if plot.building.owner() != Some(player) {
                continue;
            }
            if let Some(harbor) = plot.port {
                if !harbors.contains(&harbor) {
                    harbors.push(harbor);
                }
            }
        }
        harbors
    }

    /// Paths holding a road of `player`
    pub fn roads_of(&self, player: PlayerId) -> impl Iterator<Item = PathId> + '_ {
        self.paths
            .iter()
            .enumerate()
            .filter(move |(_, p)| p.road.owner() == Some(player))
            .map(|(i, _)| PathId(i))
    }

    // ==================== Mutation Methods ====================

    /// Place a settlement (assumes validation already done)
    pub fn place_settlement(
        &mut self,
        plot: PlotId,
        player: PlayerId,
    ) -> Result<(), TopologyError> {
        self.set_building(plot, VertexBuilding::Settlement(player))
    }

    /// Upgrade a settlement to a city
    pub fn upgrade_to_city(
        &mut self,
        plot: PlotId,
        player: PlayerId,
    ) -> Result<(), TopologyError> {
        self.set_building(plot, VertexBuilding::City(player))
    }

    fn set_building(
        &mut self,
        plot: PlotId,
        building: VertexBuilding,
    ) -> Result<(), TopologyError> {
        let target = self
            .plots
            .get_mut(plot.0)
            .ok_or(TopologyError::NoSuchPlot(plot))?;
        target.building = building;
        Ok(())
    }

    /// Place a road
    pub fn place_road(&mut self, path: PathId, player: PlayerId) -> Result<(), TopologyError> {
        let target = self
            .paths
            .get_mut(path.0)
            .ok_or(TopologyError::NoSuchPath(path))?;
        target.road = EdgeBuilding::Road(player);
        Ok(())
    }

    // ==================== Robber ====================

    /// The tile currently holding the robber
    pub fn robber_position(&self) -> TileId {
        self.tiles[self.robber].id
    }

    /// Move the robber, clearing it from its previous tile
    pub fn set_robber_position(&mut self, id: TileId) -> Result<(), TopologyError> {
        let index = *self
            .tile_index
            .get(&id)
            .ok_or(TopologyError::NoSuchTile(id))?;
        self.tiles[self.robber].has_robber = false;
        self.tiles[index].has_robber = true;
        debug!(from = %self.tiles[self.robber].id, to = %id, "robber moved");
        self.robber = index;
        Ok(())
    }

    /// Put the robber on the first desert, or the first tile when there is none
    pub(crate) fn place_initial_robber(&mut self) {
        let index = self
            .tiles
            .iter()
            .position(|t| t.kind == TileKind::Desert)
            .unwrap_or(0);
        for (i, tile) in self.tiles.iter_mut().enumerate() {
            tile.has_robber = i == index;
        }
        self.robber = index;
    }

    // ==================== Resource Distribution ====================

    /// Produce resources for a dice roll.
    ///
    /// Every tile with this number and no robber credits each building on its corners
    /// (settlement 1, city 2) through `sink`. Returns the tiles that produced, for highlighting.
    pub fn generate_resources<S: ProductionSink + ?Sized>(
        &self,
        number: u8,
        sink: &mut S,
    ) -> Vec<TileId> {
        let mut produced = Vec::new();

        for tile in &self.tiles {
            if tile.number != Some(number) || tile.has_robber {
                continue;
            }
            let Some(resource) = tile.resource() else {
                continue;
            };

            for plot in tile.plots {
                let building = self.plot(plot).building;
                if let Some(owner) = building.owner() {
                    sink.credit(owner, resource, building.resource_multiplier());
                }
            }
            produced.push(tile.id);
        }

        debug!(number, tiles = produced.len(), "resources generated");
        produced
    }

    // ==================== Longest Road ====================

    /// Longest trail of `player`'s roads that starts on `start`
    pub fn road_length_from(&self, start: PathId, player: PlayerId) -> usize {
        road::longest_trail(self, start, player)
    }

    /// Longest trail anywhere in `player`'s road network
    pub fn longest_road(&self, player: PlayerId) -> usize {
        self.roads_of(player)
            .map(|start| road::longest_trail(self, start, player))
            .max()
            .unwrap_or(0)
    }

    // ==================== Invariants ====================

    /// Check the identity and adjacency invariants the builder and linker guarantee.
    pub fn verify(&self) -> Result<(), TopologyError> {
        if self.plot_index.len() != self.plots.len() {
            let mut seen = BTreeSet::new();
            for plot in &self.plots {
                if !seen.insert(plot.coord) {
                    return Err(TopologyError::DuplicatePlot(plot.coord));
                }
            }
        }
        if self.path_index.len() != self.paths.len() {
            let mut seen = std::collections::HashSet::new();
            for path in &self.paths {
                if !seen.insert(path.endpoints) {
                    return Err(TopologyError::DuplicatePath(
                        self.plot(path.endpoints.a).coord,
                        self.plot(path.endpoints.b).coord,
                    ));
                }
            }
        }

        for (i, plot) in self.plots.iter().enumerate() {
            let id = PlotId(i);
            for n in plot.neighbors() {
                let neighbor = self.plot(n);
                if !neighbor.neighbors().any(|back| back == id) {
                    return Err(TopologyError::AsymmetricPlots(plot.coord, neighbor.coord));
                }
                if !self.has_path(&EndpointPair::new(id, n)) {
                    return Err(TopologyError::MissingPath(plot.coord, neighbor.coord));
                }
            }
        }

        for (i, path) in self.paths.iter().enumerate() {
            for &adj in &path.adjacent {
                let other = self.path(adj).endpoints;
                let shared = path.endpoints.plots().iter().filter(|p| other.has(**p)).count();
                if shared != 1 || !self.path(adj).adjacent.contains(&PathId(i)) {
                    return Err(TopologyError::BadPathAdjacency(PathId(i), adj));
                }
            }
        }

        for tile in &self.tiles {
            for side in 0..6 {
                let expected = EndpointPair::new(tile.plots[side], tile.plots[(side + 1) % 6]);
                if self.path(tile.paths[side]).endpoints != expected {
                    return Err(TopologyError::TileSideMismatch(tile.id, side));
                }
            }
        }

        let robbers = self.tiles.iter().filter(|t| t.has_robber).count();
        if robbers != 1 || !self.tiles[self.robber].has_robber {
            return Err(TopologyError::RobberCount(robbers));
        }

        Ok(())
    }

    /// Convert to a JSON-friendly representation with arrays instead of HashMaps
    pub fn to_snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            tiles: self
                .tiles
                .iter()
                .map(|tile| TileSnapshot {
                    id: tile.id.to_string(),
                    x: tile.coord.x,
                    y: tile.coord.y,
                    kind: tile.kind,
                    number: tile.number,
                    has_robber: tile.has_robber,
                })
                .collect(),
            plots: self
                .plots
                .iter()
                .map(|plot| PlotSnapshot {
                    x: plot.coord.x,
                    y: plot.coord.y,
                    port: plot.port,
                    building: plot.building,
                })
                .collect(),
            paths: self
                .paths
                .iter()
                .map(|path| PathSnapshot {
                    a: self.plot(path.endpoints.a).coord,
                    b: self.plot(path.endpoints.b).coord,
                    direction: path.direction,
                    road: path.road,
                })
                .collect(),
            robber: self.robber_position().to_string(),
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

/// JSON-friendly board representation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub tiles: Vec<TileSnapshot>,
    pub plots: Vec<PlotSnapshot>,
    pub paths: Vec<PathSnapshot>,
    pub robber: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileSnapshot {
    pub id: String,
    pub x: i32,
    pub y: i32,
    pub kind: TileKind,
    pub number: Option<u8>,
    pub has_robber: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotSnapshot {
    pub x: i32,
    pub y: i32,
    pub port: Option<Harbor>,
    pub building: VertexBuilding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSnapshot {
    pub a: Coord,
    pub b: Coord,
    pub direction: PathDirection,
    pub road: EdgeBuilding,
}
