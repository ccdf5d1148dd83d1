//! Player state and resource management.
//!
//! This module contains:
//! - ResourceHand for managing resource counts
//! - Player struct with its road anchors and port queries
//! - The [`ProductionSink`] through which the board pays out dice rolls

use crate::board::{Board, Harbor, PathId, PlayerId, Resource};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Most roads a player records as starting points for the longest-road search
pub const MAX_ROAD_ANCHORS: usize = 2;

/// A hand of resources
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceHand {
    pub brick: u32,
    pub lumber: u32,
    pub ore: u32,
    pub grain: u32,
    pub wool: u32,
}

impl ResourceHand {
    /// Create an empty hand
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a hand with specific amounts
    pub fn with_amounts(brick: u32, lumber: u32, ore: u32, grain: u32, wool: u32) -> Self {
        Self {
            brick,
            lumber,
            ore,
            grain,
            wool,
        }
    }

    /// Total number of resource cards
    pub fn total(&self) -> u32 {
        Resource::ALL.iter().map(|r| self.get(*r)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Get count of a specific resource
    pub fn get(&self, resource: Resource) -> u32 {
        match resource {
            Resource::Brick => self.brick,
            Resource::Lumber => self.lumber,
            Resource::Ore => self.ore,
            Resource::Grain => self.grain,
            Resource::Wool => self.wool,
        }
    }

    /// Add resources to hand
    pub fn add(&mut self, resource: Resource, amount: u32) {
        let slot = match resource {
            Resource::Brick => &mut self.brick,
            Resource::Lumber => &mut self.lumber,
            Resource::Ore => &mut self.ore,
            Resource::Grain => &mut self.grain,
            Resource::Wool => &mut self.wool,
        };
        *slot = slot.saturating_add(amount);
    }
}

/// Receives the resources a dice roll produces.
///
/// The board knows who owns each building but not where players keep their cards; game code
/// passes whatever holds them.
pub trait ProductionSink {
    fn credit(&mut self, player: PlayerId, resource: Resource, amount: u32);
}

impl ProductionSink for [Player] {
    fn credit(&mut self, player: PlayerId, resource: Resource, amount: u32) {
        if let Some(target) = self.iter_mut().find(|p| p.id == player) {
            target.resources.add(resource, amount);
        }
    }
}

impl ProductionSink for Vec<Player> {
    fn credit(&mut self, player: PlayerId, resource: Resource, amount: u32) {
        self.as_mut_slice().credit(player, resource, amount);
    }
}

impl ProductionSink for HashMap<PlayerId, ResourceHand> {
    fn credit(&mut self, player: PlayerId, resource: Resource, amount: u32) {
        self.entry(player).or_default().add(resource, amount);
    }
}

/// A single player's state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Player ID
    pub id: PlayerId,
    /// Display name
    pub name: String,
    /// Current resources
    pub resources: ResourceHand,
    /// Roads placed during setup; the longest-road search starts from these
    pub road_anchors: Vec<PathId>,
    /// Result of the last [`Player::calculate_length_of_road`]
    pub road_length: usize,
}

impl Player {
    /// Create a new player
    pub fn new(id: PlayerId, name: String) -> Self {
        Self {
            id,
            name,
            resources: ResourceHand::new(),
            road_anchors: Vec::with_capacity(MAX_ROAD_ANCHORS),
            road_length: 0,
        }
    }

    /// Remember an initial road. Returns false once both anchors are taken.
    pub fn add_initial_road_anchor(&mut self, path: PathId) -> bool {
        if self.road_anchors.len() >= MAX_ROAD_ANCHORS || self.road_anchors.contains(&path) {
            return false;
        }
        self.road_anchors.push(path);
        true
    }

    /// Recompute the longest trail reachable from this player's anchors
    pub fn calculate_length_of_road(&mut self, board: &Board) -> usize {
        self.road_length = self
            .road_anchors
            .iter()
            .map(|&anchor| board.road_length_from(anchor, self.id))
            .max()
            .unwrap_or(0);
        debug!(player = self.id, length = self.road_length, "road length");
        self.road_length
    }

    /// Resources this player can trade 2:1, each listed once
    pub fn ports(&self, board: &Board) -> Vec<Resource> {
        let mut resources: Vec<Resource> = board
            .player_harbors(self.id)
            .into_iter()
            .filter_map(|harbor| match harbor {
                Harbor::Specific(resource) => Some(resource),
                Harbor::Generic => None,
            })
            .collect();
        resources.sort_unstable();
        resources.dedup();
        resources
    }

    /// Whether this player has a 3:1 harbor
    pub fn has_universal_port(&self, board: &Board) -> bool {
        board.player_harbors(self.id).contains(&Harbor::Generic)
    }

    /// Best exchange rate this player gets when trading `resource` with the bank
    pub fn trade_rate(&self, board: &Board, resource: Resource) -> u32 {
        board
            .player_harbors(self.id)
            .iter()
            .filter(|h| matches!(h, Harbor::Generic) || **h == Harbor::Specific(resource))
            .map(Harbor::rate)
            .min()
            .unwrap_or(4)
    }

    /// Number of roads this player has on the board
    pub fn placed_roads(&self, board: &Board) -> usize {
        board.roads_of(self.id).count()
    }
}
