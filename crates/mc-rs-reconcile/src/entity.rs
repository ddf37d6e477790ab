//! Summoned entities, tracked by a marker embedded in their custom name.
//!
//! Entities cannot be changed in place: any attribute change replaces the
//! entity, so `reconcile` only carries the stored marker forward.

use std::marker::PhantomData;

use mc_rs_command::entity::{sheep_nbt, snbt_from_json, zombie_nbt, ZombieTraits};
use mc_rs_command::{Coord, DyeColor, Marker, ValidationError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::client::EntityCommands;
use crate::{non_empty, Applied, ReconcileError, Reconciler, Warning, WarningKind};

/// A declaration that can be summoned.
pub trait EntityKind: Clone + PartialEq + Serialize + DeserializeOwned {
    const KIND: &'static str;

    fn entity_type(&self) -> &str;

    fn position(&self) -> Coord;

    /// Extra top-level NBT entries appended after the custom name.
    fn extra_nbt(&self) -> Result<Vec<String>, ValidationError> {
        Ok(Vec::new())
    }
}

/// Any entity type, with no extra data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "type")]
    pub entity_type: String,
    pub position: Coord,
}

impl EntityKind for Entity {
    const KIND: &'static str = "entity";

    fn entity_type(&self) -> &str {
        self.entity_type.trim()
    }

    fn position(&self) -> Coord {
        self.position
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sheep {
    pub position: Coord,
    #[serde(default = "default_wool")]
    pub color: DyeColor,
    #[serde(default)]
    pub sheared: bool,
}

fn default_wool() -> DyeColor {
    DyeColor::White
}

impl EntityKind for Sheep {
    const KIND: &'static str = "sheep";

    fn entity_type(&self) -> &str {
        "minecraft:sheep"
    }

    fn position(&self) -> Coord {
        self.position
    }

    fn extra_nbt(&self) -> Result<Vec<String>, ValidationError> {
        Ok(sheep_nbt(self.color, self.sheared))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zombie {
    pub position: Coord,
    #[serde(default)]
    pub is_baby: bool,
    #[serde(default)]
    pub can_break_doors: bool,
    #[serde(default)]
    pub can_pick_up_loot: bool,
    #[serde(default)]
    pub persistence_required: bool,
    #[serde(default = "default_health")]
    pub health: f32,
}

fn default_health() -> f32 {
    ZombieTraits::default().health
}

impl EntityKind for Zombie {
    const KIND: &'static str = "zombie";

    fn entity_type(&self) -> &str {
        "minecraft:zombie"
    }

    fn position(&self) -> Coord {
        self.position
    }

    fn extra_nbt(&self) -> Result<Vec<String>, ValidationError> {
        zombie_nbt(&ZombieTraits {
            is_baby: self.is_baby,
            can_break_doors: self.can_break_doors,
            can_pick_up_loot: self.can_pick_up_loot,
            persistence_required: self.persistence_required,
            health: self.health,
        })
    }
}

/// A villager with optional operator-supplied data as a JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Villager {
    pub position: Coord,
    #[serde(default)]
    pub data_tag: Option<String>,
}

impl EntityKind for Villager {
    const KIND: &'static str = "villager";

    fn entity_type(&self) -> &str {
        "minecraft:villager"
    }

    fn position(&self) -> Coord {
        self.position
    }

    fn extra_nbt(&self) -> Result<Vec<String>, ValidationError> {
        match self.data_tag.as_deref().map(str::trim) {
            Some(json) if !json.is_empty() => snbt_from_json(json),
            _ => Ok(Vec::new()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "K: EntityKind")]
pub struct SummonedState<K> {
    pub marker: Marker,
    pub desired: K,
}

pub struct EntityReconciler<'a, C, K> {
    client: &'a C,
    kind: PhantomData<K>,
}

impl<'a, C: EntityCommands, K: EntityKind> EntityReconciler<'a, C, K> {
    pub fn new(client: &'a C) -> Self {
        Self {
            client,
            kind: PhantomData,
        }
    }
}

impl<C: EntityCommands, K: EntityKind> Reconciler for EntityReconciler<'_, C, K> {
    type Desired = K;
    type State = SummonedState<K>;

    const KIND: &'static str = K::KIND;

    async fn materialize(&self, desired: &K) -> Result<Applied<Self::State>, ReconcileError> {
        non_empty("type", desired.entity_type())?;
        let extra = desired.extra_nbt()?;
        let marker = Marker::generate();
        self.client
            .summon(desired.entity_type(), desired.position(), &marker, &extra)
            .await
            .map_err(|e| ReconcileError::command(format!("summon {}", K::KIND), e))?;
        Ok(Applied::new(SummonedState {
            marker,
            desired: desired.clone(),
        }))
    }

    async fn reconcile(
        &self,
        state: &Self::State,
        desired: &K,
    ) -> Result<Applied<Self::State>, ReconcileError> {
        Ok(Applied::new(SummonedState {
            marker: state.marker.clone(),
            desired: desired.clone(),
        }))
    }

    /// Kill the entity, then clear any copies of it from player inventories.
    /// Only the kill is required to succeed; most entity ids are not items,
    /// so the server rejects the inventory pass for them.
    async fn tear_down(&self, state: &Self::State) -> Result<Applied<()>, ReconcileError> {
        let entity_type = state.desired.entity_type();
        self.client
            .kill_marked(entity_type, &state.marker)
            .await
            .map_err(|e| ReconcileError::command(format!("kill {}", K::KIND), e))?;
        let mut warnings = Vec::new();
        if let Err(e) = self
            .client
            .clear_marked_items(entity_type, &state.marker)
            .await
        {
            warnings.push(Warning::from_error(
                WarningKind::Compensation,
                &format!("clear {} items", K::KIND),
                &e,
            ));
        }
        Ok(Applied::with_warnings((), warnings))
    }

    fn requires_replacement(state: &Self::State, desired: &K) -> bool {
        state.desired != *desired
    }

    fn desired(state: &Self::State) -> &K {
        &state.desired
    }

    fn identity(state: &Self::State) -> &str {
        state.marker.as_str()
    }
}

// ============================================================================
// Tests
// ============================================================================
