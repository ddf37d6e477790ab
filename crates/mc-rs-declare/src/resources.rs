//! The declaration file: a list of `[[resource]]` tables, each with a
//! unique `address`, a `kind`, and that kind's attributes.

use std::collections::HashSet;
use std::path::Path;

use mc_rs_reconcile::ban::Ban;
use mc_rs_reconcile::block::{Block, Stairs};
use mc_rs_reconcile::daylock::DayLock;
use mc_rs_reconcile::entity::{Entity, Sheep, Villager, Zombie};
use mc_rs_reconcile::fill::Fill;
use mc_rs_reconcile::gamemode::GameModeSetting;
use mc_rs_reconcile::gamerule::GameRule;
use mc_rs_reconcile::membership::Membership;
use mc_rs_reconcile::operator::Operator;
use mc_rs_reconcile::structure::{Bed, Chest};
use mc_rs_reconcile::team::Team;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::HostError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResourceSpec {
    Block(Block),
    Stairs(Stairs),
    Fill(Fill),
    Bed(Bed),
    Chest(Chest),
    Entity(Entity),
    Sheep(Sheep),
    Zombie(Zombie),
    Villager(Villager),
    Team(Team),
    TeamMember(Membership),
    Gamerule(GameRule),
    Gamemode(GameModeSetting),
    Daylock(DayLock),
    Op(Operator),
    Ban(Ban),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Declaration {
    pub address: String,
    #[serde(flatten)]
    pub resource: ResourceSpec,
}

impl Declaration {
    /// The kind tag and the kind's attributes as untyped data.
    pub fn split(&self) -> Result<(String, Value), HostError> {
        let mut value = serde_json::to_value(&self.resource)?;
        let kind = value
            .as_object_mut()
            .and_then(|m| m.remove("kind"))
            .and_then(|k| k.as_str().map(str::to_string))
            .ok_or_else(|| HostError::UnknownKind(format!("{:?}", self.resource)))?;
        Ok((kind, value))
    }
}

#[derive(Debug, Default, Deserialize)]
struct DeclarationFile {
    #[serde(default)]
    resource: Vec<Declaration>,
}

pub fn parse_declarations(contents: &str) -> Result<Vec<Declaration>, HostError> {
    let file: DeclarationFile = toml::from_str(contents)?;
    let mut seen = HashSet::new();
    for decl in &file.resource {
        if !seen.insert(decl.address.as_str()) {
            return Err(HostError::DuplicateAddress(decl.address.clone()));
        }
    }
    Ok(file.resource)
}

pub fn load_declarations<P: AsRef<Path>>(path: P) -> Result<Vec<Declaration>, HostError> {
    parse_declarations(&std::fs::read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use mc_rs_command::{Coord, Direction, GameMode};

    use super::*;

    const SAMPLE: &str = r#"
        [[resource]]
        address = "spawn_bed"
        kind = "bed"
        position = { x = 10, y = 64, z = 10 }
        direction = "east"

        [[resource]]
        address = "blue_team"
        kind = "team"
        name = "blue"
        color = "blue"

        [[resource]]
        address = "alice_creative"
        kind = "gamemode"
        mode = "creative"
        player = "alice"

        [[resource]]
        address = "guard"
        kind = "zombie"
        position = { x = 0, y = 70, z = 0 }
        health = 40

        [[resource]]
        address = "keep_inv"
        kind = "gamerule"
        name = "keepInventory"
        value = "true"

        [[resource]]
        address = "blue_alice"
        kind = "team_member"
        team = "blue"
        player = "alice"
    "#;

    #[test]
    fn parse_sample() {
        let decls = parse_declarations(SAMPLE).unwrap();
        assert_eq!(decls.len(), 6);
        assert_eq!(decls[0].address, "spawn_bed");
        match &decls[0].resource {
            ResourceSpec::Bed(bed) => {
                assert_eq!(bed.position, Coord::new(10, 64, 10));
                assert_eq!(bed.direction, Direction::East);
                assert_eq!(bed.material, "minecraft:red_bed");
            }
            other => panic!("expected bed, got {other:?}"),
        }
        match &decls[1].resource {
            ResourceSpec::Team(team) => {
                assert_eq!(team.name, "blue");
                assert_eq!(team.display(), "blue");
            }
            other => panic!("expected team, got {other:?}"),
        }
        match &decls[2].resource {
            ResourceSpec::Gamemode(g) => assert_eq!(g.mode, GameMode::Creative),
            other => panic!("expected gamemode, got {other:?}"),
        }
        match &decls[3].resource {
            ResourceSpec::Zombie(z) => assert_eq!(z.health, 40.0),
            other => panic!("expected zombie, got {other:?}"),
        }
    }

    #[test]
    fn split_separates_kind() {
        let decls = parse_declarations(SAMPLE).unwrap();
        let (kind, attrs) = decls[4].split().unwrap();
        assert_eq!(kind, "gamerule");
        assert_eq!(
            attrs,
            serde_json::json!({ "name": "keepInventory", "value": "true" })
        );
        let (kind, _) = decls[5].split().unwrap();
        assert_eq!(kind, "team_member");
    }

    #[test]
    fn invalid_tokens_fail_on_load() {
        let err = parse_declarations(
            r#"
            [[resource]]
            address = "bad_bed"
            kind = "bed"
            position = { x = 0, y = 0, z = 0 }
            direction = "up"
            "#,
        );
        assert!(matches!(err, Err(HostError::Toml(_))));

        let err = parse_declarations(
            r#"
            [[resource]]
            address = "x"
            kind = "portal"
            "#,
        );
        assert!(matches!(err, Err(HostError::Toml(_))));
    }

    #[test]
    fn duplicate_addresses_rejected() {
        let err = parse_declarations(
            r#"
            [[resource]]
            address = "op"
            kind = "op"
            player = "alice"

            [[resource]]
            address = "op"
            kind = "op"
            player = "bob"
            "#,
        );
        assert!(matches!(err, Err(HostError::DuplicateAddress(a)) if a == "op"));
    }

    #[test]
    fn empty_file_declares_nothing() {
        assert!(parse_declarations("").unwrap().is_empty());
    }
}
