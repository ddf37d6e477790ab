//! Single blocks and stairs. Both are re-placed in full on every change.

use mc_rs_command::{BlockPlacement, Coord, Direction, StairHalf, StairShape};
use serde::{Deserialize, Serialize};

use crate::client::BlockCommands;
use crate::{non_empty, Applied, ReconcileError, Reconciler, Tracked};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub material: String,
    pub position: Coord,
}

impl Block {
    fn placement(&self) -> BlockPlacement {
        BlockPlacement::new(self.material.trim(), self.position)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stairs {
    pub material: String,
    pub position: Coord,
    pub facing: Direction,
    #[serde(default = "default_half")]
    pub half: StairHalf,
    #[serde(default = "default_shape")]
    pub shape: StairShape,
    #[serde(default)]
    pub waterlogged: bool,
}

fn default_half() -> StairHalf {
    StairHalf::Bottom
}

fn default_shape() -> StairShape {
    StairShape::Straight
}

impl Stairs {
    fn placement(&self) -> BlockPlacement {
        BlockPlacement::stairs(
            self.material.trim(),
            self.position,
            self.facing,
            self.half,
            self.shape,
            self.waterlogged,
        )
    }
}

pub fn block_id(prefix: &str, at: Coord) -> String {
    format!("{prefix}-{}-{}-{}", at.x, at.y, at.z)
}

pub struct BlockReconciler<'a, C> {
    client: &'a C,
}

impl<'a, C: BlockCommands> BlockReconciler<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    async fn place(&self, desired: &Block) -> Result<Applied<Tracked<Block>>, ReconcileError> {
        non_empty("material", &desired.material)?;
        self.client
            .set_block(&desired.placement())
            .await
            .map_err(|e| ReconcileError::command("place block", e))?;
        Ok(Applied::new(Tracked::new(
            block_id("block", desired.position),
            desired.clone(),
        )))
    }
}

impl<C: BlockCommands> Reconciler for BlockReconciler<'_, C> {
    type Desired = Block;
    type State = Tracked<Block>;

    const KIND: &'static str = "block";

    async fn materialize(&self, desired: &Block) -> Result<Applied<Self::State>, ReconcileError> {
        self.place(desired).await
    }

    async fn reconcile(
        &self,
        _state: &Self::State,
        desired: &Block,
    ) -> Result<Applied<Self::State>, ReconcileError> {
        self.place(desired).await
    }

    async fn tear_down(&self, state: &Self::State) -> Result<Applied<()>, ReconcileError> {
        self.client
            .clear_block(state.desired.position)
            .await
            .map_err(|e| ReconcileError::command("remove block", e))?;
        Ok(Applied::new(()))
    }

    fn requires_replacement(state: &Self::State, desired: &Block) -> bool {
        state.desired.position != desired.position
    }

    fn desired(state: &Self::State) -> &Block {
        &state.desired
    }

    fn identity(state: &Self::State) -> &str {
        &state.id
    }
}

pub struct StairsReconciler<'a, C> {
    client: &'a C,
}

impl<'a, C: BlockCommands> StairsReconciler<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    async fn place(&self, desired: &Stairs) -> Result<Applied<Tracked<Stairs>>, ReconcileError> {
        non_empty("material", &desired.material)?;
        self.client
            .set_block(&desired.placement())
            .await
            .map_err(|e| ReconcileError::command("place stairs", e))?;
        Ok(Applied::new(Tracked::new(
            block_id("stairs", desired.position),
            desired.clone(),
        )))
    }
}

impl<C: BlockCommands> Reconciler for StairsReconciler<'_, C> {
    type Desired = Stairs;
    type State = Tracked<Stairs>;

    const KIND: &'static str = "stairs";

    async fn materialize(&self, desired: &Stairs) -> Result<Applied<Self::State>, ReconcileError> {
        self.place(desired).await
    }

    async fn reconcile(
        &self,
        _state: &Self::State,
        desired: &Stairs,
    ) -> Result<Applied<Self::State>, ReconcileError> {
        self.place(desired).await
    }

    async fn tear_down(&self, state: &Self::State) -> Result<Applied<()>, ReconcileError> {
        self.client
            .clear_block(state.desired.position)
            .await
            .map_err(|e| ReconcileError::command("remove stairs", e))?;
        Ok(Applied::new(()))
    }

    fn requires_replacement(state: &Self::State, desired: &Stairs) -> bool {
        state.desired.position != desired.position
    }

    fn desired(state: &Self::State) -> &Stairs {
        &state.desired
    }

    fn identity(state: &Self::State) -> &str {
        &state.id
    }
}

// ============================================================================
// Tests
// ============================================================================
