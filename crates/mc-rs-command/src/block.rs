//! Block placement commands: `setblock` and `fill`.

use std::fmt;

use crate::types::{BedPart, ChestType, Coord, Direction, StairHalf, StairShape};

pub const AIR: &str = "minecraft:air";

/// A single block: material, position, and ordered block-state pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockPlacement {
    pub material: String,
    pub coord: Coord,
    pub states: Vec<(String, String)>,
}

impl BlockPlacement {
    pub fn new(material: impl Into<String>, coord: Coord) -> Self {
        Self {
            material: material.into(),
            coord,
            states: Vec::new(),
        }
    }

    /// Append a block state. Order of insertion is the rendered order.
    pub fn with_state(mut self, key: &str, value: impl fmt::Display) -> Self {
        self.states.push((key.to_string(), value.to_string()));
        self
    }

    /// `material[k=v,...]`, or the bare material when there are no states.
    pub fn block_state(&self) -> String {
        if self.states.is_empty() {
            return self.material.clone();
        }
        let states: Vec<String> = self
            .states
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        format!("{}[{}]", self.material, states.join(","))
    }

    /// Stairs with full orientation.
    pub fn stairs(
        material: &str,
        coord: Coord,
        facing: Direction,
        half: StairHalf,
        shape: StairShape,
        waterlogged: bool,
    ) -> Self {
        Self::new(material, coord)
            .with_state("facing", facing)
            .with_state("half", half)
            .with_state("shape", shape)
            .with_state("waterlogged", waterlogged)
    }

    /// One half of a bed.
    pub fn bed_part(
        material: &str,
        coord: Coord,
        facing: Direction,
        part: BedPart,
        occupied: bool,
    ) -> Self {
        Self::new(material, coord)
            .with_state("facing", facing)
            .with_state("part", part)
            .with_state("occupied", occupied)
    }

    /// A chest or one half of a double chest.
    pub fn chest(trapped: bool, coord: Coord, kind: ChestType, waterlogged: bool) -> Self {
        let material = if trapped {
            "minecraft:trapped_chest"
        } else {
            "minecraft:chest"
        };
        Self::new(material, coord)
            .with_state("type", kind)
            .with_state("waterlogged", waterlogged)
    }
}

/// `setblock x y z <block> replace`
pub fn set_block(block: &BlockPlacement) -> String {
    format!("setblock {} {} replace", block.coord, block.block_state())
}

/// Replace the block at `at` with air.
pub fn clear_block(at: Coord) -> String {
    format!("setblock {at} {AIR} replace")
}

/// `fill x1 y1 z1 x2 y2 z2 <material> hollow`
pub fn fill(material: &str, from: Coord, to: Coord) -> String {
    format!("fill {from} {to} {material} hollow")
}
