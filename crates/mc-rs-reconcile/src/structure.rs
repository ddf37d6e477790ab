//! Two-block structures: beds and chests.
//!
//! Halves are placed in order. If a later half fails, the halves already
//! placed are removed again and the original failure is returned. Tear-down
//! runs in reverse and never fails; a half that cannot be removed becomes a
//! warning.

use mc_rs_command::{BedPart, BlockPlacement, ChestSize, ChestType, Coord, Direction};
use serde::{Deserialize, Serialize};

use crate::block::block_id;
use crate::client::BlockCommands;
use crate::{non_empty, Applied, ReconcileError, Reconciler, Tracked, Warning, WarningKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bed {
    #[serde(default = "default_bed_material")]
    pub material: String,
    /// The foot block.
    pub position: Coord,
    /// Direction from foot to head.
    pub direction: Direction,
    #[serde(default)]
    pub occupied: bool,
}

fn default_bed_material() -> String {
    "minecraft:red_bed".to_string()
}

impl Bed {
    pub fn head_position(&self) -> Coord {
        let (dx, dz) = self.direction.step();
        self.position.offset(dx, 0, dz)
    }

    pub fn id(&self) -> String {
        format!("{}-{}", block_id("bed", self.position), self.direction)
    }

    fn parts(&self) -> [BlockPlacement; 2] {
        let material = self.material.trim();
        [
            BlockPlacement::bed_part(
                material,
                self.position,
                self.direction,
                BedPart::Foot,
                self.occupied,
            ),
            BlockPlacement::bed_part(
                material,
                self.head_position(),
                self.direction,
                BedPart::Head,
                self.occupied,
            ),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chest {
    pub position: Coord,
    #[serde(default = "default_chest_size")]
    pub size: ChestSize,
    #[serde(default)]
    pub trapped: bool,
    #[serde(default)]
    pub waterlogged: bool,
}

fn default_chest_size() -> ChestSize {
    ChestSize::Single
}

impl Chest {
    /// Single chest, or left half at the position and right half at x+1.
    fn parts(&self) -> Vec<BlockPlacement> {
        let chest = |at, kind| BlockPlacement::chest(self.trapped, at, kind, self.waterlogged);
        match self.size {
            ChestSize::Single => vec![chest(self.position, ChestType::Single)],
            ChestSize::Double => vec![
                chest(self.position, ChestType::Left),
                chest(self.position.offset(1, 0, 0), ChestType::Right),
            ],
        }
    }
}

/// Place `parts` in order, removing already-placed parts if one fails.
async fn place_all<C: BlockCommands>(
    client: &C,
    action: &str,
    parts: &[BlockPlacement],
) -> Result<(), ReconcileError> {
    for (i, part) in parts.iter().enumerate() {
        let Err(err) = client.set_block(part).await else {
            continue;
        };
        if i == 0 {
            return Err(ReconcileError::command(action, err));
        }
        let mut compensation = Vec::new();
        for placed in parts[..i].iter().rev() {
            if let Err(e) = client.clear_block(placed.coord).await {
                compensation.push(Warning::from_error(
                    WarningKind::Compensation,
                    &format!("remove {} at {}", placed.material, placed.coord),
                    &e,
                ));
            }
        }
        return Err(ReconcileError::partial(action, err, compensation));
    }
    Ok(())
}

/// Remove `parts` in reverse order, collecting failures as warnings.
async fn clear_all<C: BlockCommands>(client: &C, parts: &[BlockPlacement]) -> Vec<Warning> {
    let mut warnings = Vec::new();
    for part in parts.iter().rev() {
        if let Err(e) = client.clear_block(part.coord).await {
            warnings.push(Warning::from_error(
                WarningKind::Compensation,
                &format!("remove {} at {}", part.material, part.coord),
                &e,
            ));
        }
    }
    warnings
}

pub struct BedReconciler<'a, C> {
    client: &'a C,
}

impl<'a, C: BlockCommands> BedReconciler<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    async fn place(&self, desired: &Bed) -> Result<Applied<Tracked<Bed>>, ReconcileError> {
        non_empty("material", &desired.material)?;
        place_all(self.client, "place bed", &desired.parts()).await?;
        Ok(Applied::new(Tracked::new(desired.id(), desired.clone())))
    }
}

impl<C: BlockCommands> Reconciler for BedReconciler<'_, C> {
    type Desired = Bed;
    type State = Tracked<Bed>;

    const KIND: &'static str = "bed";

    async fn materialize(&self, desired: &Bed) -> Result<Applied<Self::State>, ReconcileError> {
        self.place(desired).await
    }

    async fn reconcile(
        &self,
        _state: &Self::State,
        desired: &Bed,
    ) -> Result<Applied<Self::State>, ReconcileError> {
        self.place(desired).await
    }

    async fn tear_down(&self, state: &Self::State) -> Result<Applied<()>, ReconcileError> {
        let warnings = clear_all(self.client, &state.desired.parts()).await;
        Ok(Applied::with_warnings((), warnings))
    }

    /// Turning the bed moves its head block, so the old head has to be
    /// cleared first.
    fn requires_replacement(state: &Self::State, desired: &Bed) -> bool {
        state.desired.position != desired.position || state.desired.direction != desired.direction
    }

    fn desired(state: &Self::State) -> &Bed {
        &state.desired
    }

    fn identity(state: &Self::State) -> &str {
        &state.id
    }
}

pub struct ChestReconciler<'a, C> {
    client: &'a C,
}

impl<'a, C: BlockCommands> ChestReconciler<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    async fn place(&self, desired: &Chest) -> Result<Applied<Tracked<Chest>>, ReconcileError> {
        place_all(self.client, "place chest", &desired.parts()).await?;
        Ok(Applied::new(Tracked::new(
            block_id("chest", desired.position),
            desired.clone(),
        )))
    }
}

impl<C: BlockCommands> Reconciler for ChestReconciler<'_, C> {
    type Desired = Chest;
    type State = Tracked<Chest>;

    const KIND: &'static str = "chest";

    async fn materialize(&self, desired: &Chest) -> Result<Applied<Self::State>, ReconcileError> {
        self.place(desired).await
    }

    async fn reconcile(
        &self,
        _state: &Self::State,
        desired: &Chest,
    ) -> Result<Applied<Self::State>, ReconcileError> {
        self.place(desired).await
    }

    async fn tear_down(&self, state: &Self::State) -> Result<Applied<()>, ReconcileError> {
        let warnings = clear_all(self.client, &state.desired.parts()).await;
        Ok(Applied::with_warnings((), warnings))
    }

    /// A size change adds or drops the right half.
    fn requires_replacement(state: &Self::State, desired: &Chest) -> bool {
        state.desired.position != desired.position || state.desired.size != desired.size
    }

    fn desired(state: &Self::State) -> &Chest {
        &state.desired
    }

    fn identity(state: &Self::State) -> &str {
        &state.id
    }
}

// ============================================================================
// Tests
// ============================================================================
