//! Catan topology - the board graph behind a hex-grid settlement game
//!
//! This crate builds the tiles of a board, the plots (intersections) between them and the
//! paths (edges) between plots, and answers the adjacency questions the rest of a game asks:
//! - Where is a tile, which plots and paths surround it
//! - Which plots neighbour each other, which paths touch each other
//! - Who gets resources for a dice roll, where the robber is
//! - How long a player's longest road is
//!
//! # Architecture
//!
//! Construction runs once: catalog draws and tile generation with deduplicated plot/path
//! discovery ([`builder`]), then a pass linking neighbouring plots and touching paths.
//! Afterwards the topology is frozen; only buildings, roads and the robber change.
//!
//! # Modules
//!
//! - [`coords`]: Doubled offset grid, tile ids and path directions
//! - [`board`]: Board facade, graph entities and invariant checks
//! - [`builder`]: Board configuration and construction
//! - [`ports`]: Harbor sites along the coast
//! - [`road`]: Longest-road search
//! - [`player`]: Player state, port queries and the production sink

pub mod board;
pub mod builder;
pub mod coords;
mod linker;
pub mod player;
pub mod ports;
pub mod road;

// Re-export commonly used types
pub use board::{
    Board, BoardSnapshot, EdgeBuilding, EndpointPair, Harbor, Path, PathId, PlayerId, Plot,
    PlotId, Resource, Tile, TileKind, TopologyError, VertexBuilding,
};
pub use builder::{BoardConfig, TileCount};
pub use coords::{Coord, ParseTileIdError, PathDirection, TileId};
pub use player::{Player, ProductionSink, ResourceHand};
pub use ports::{PortLayout, PortSite};
