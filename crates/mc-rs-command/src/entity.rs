//! Entity summon and removal commands.
//!
//! Every summoned entity carries its [`Marker`] as `CustomName`; removal
//! kills by marker and then clears marker-named copies from player
//! inventories.

use serde_json::{Map, Value};

use crate::selector::{custom_name_nbt, selector_by_marker_of_type, text_component, Marker};
use crate::types::{Coord, DyeColor};
use crate::ValidationError;

/// `summon <type> x y z {CustomName:'{"text":"<marker>"}'[,extra...]}`
pub fn summon(entity_type: &str, at: Coord, marker: &Marker, extra_nbt: &[String]) -> String {
    let mut entries = Vec::with_capacity(1 + extra_nbt.len());
    entries.push(custom_name_nbt(marker));
    entries.extend(extra_nbt.iter().cloned());
    format!("summon {entity_type} {at} {{{}}}", entries.join(","))
}

/// `kill @e[type=<type>,nbt={CustomName:...}]`
pub fn kill_marked(entity_type: &str, marker: &Marker) -> String {
    format!("kill {}", selector_by_marker_of_type(entity_type, marker))
}

/// `clear @a <type>{display:{Name:'{"text":"<marker>"}'}}`
pub fn clear_marked_items(entity_type: &str, marker: &Marker) -> String {
    format!(
        "clear @a {entity_type}{{display:{{Name:'{}'}}}}",
        text_component(marker.as_str())
    )
}

fn byte_flag(b: bool) -> &'static str {
    if b {
        "1b"
    } else {
        "0b"
    }
}

/// Sheep wool color and shear state.
pub fn sheep_nbt(color: DyeColor, sheared: bool) -> Vec<String> {
    vec![
        format!("Color:{}b", color.id()),
        format!("Sheared:{}", byte_flag(sheared)),
    ]
}

/// Zombie behavior flags.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZombieTraits {
    pub is_baby: bool,
    pub can_break_doors: bool,
    pub can_pick_up_loot: bool,
    pub persistence_required: bool,
    pub health: f32,
}

impl Default for ZombieTraits {
    fn default() -> Self {
        Self {
            is_baby: false,
            can_break_doors: false,
            can_pick_up_loot: false,
            persistence_required: false,
            health: 20.0,
        }
    }
}

pub fn zombie_nbt(traits: &ZombieTraits) -> Result<Vec<String>, ValidationError> {
    if !traits.health.is_finite() || traits.health <= 0.0 {
        return Err(ValidationError::Health(traits.health));
    }
    Ok(vec![
        format!("IsBaby:{}", byte_flag(traits.is_baby)),
        format!("CanBreakDoors:{}", byte_flag(traits.can_break_doors)),
        format!("CanPickUpLoot:{}", byte_flag(traits.can_pick_up_loot)),
        format!(
            "PersistenceRequired:{}",
            byte_flag(traits.persistence_required)
        ),
        format!("Health:{}f", traits.health),
    ])
}

/// Convert an operator-supplied JSON object into top-level SNBT entries.
///
/// The object must not set `CustomName`, which carries the marker.
pub fn snbt_from_json(json: &str) -> Result<Vec<String>, ValidationError> {
    let value: Value =
        serde_json::from_str(json).map_err(|e| ValidationError::DataTag(e.to_string()))?;
    let Value::Object(map) = value else {
        return Err(ValidationError::DataTag(
            "root must be a JSON object".into(),
        ));
    };
    if map.contains_key("CustomName") {
        return Err(ValidationError::DataTag(
            "CustomName is reserved for the entity marker".into(),
        ));
    }
    snbt_entries(&map)
}

fn snbt_entries(map: &Map<String, Value>) -> Result<Vec<String>, ValidationError> {
    map.iter()
        .map(|(k, v)| Ok(format!("{}:{}", snbt_key(k), snbt_value(v)?)))
        .collect()
}

fn snbt_key(key: &str) -> String {
    let bare = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '+'));
    if bare {
        key.to_string()
    } else {
        snbt_string(key)
    }
}

fn snbt_string(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

fn snbt_value(value: &Value) -> Result<String, ValidationError> {
    match value {
        Value::Null => Err(ValidationError::DataTag(
            "null has no NBT representation".into(),
        )),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::String(s) => Ok(snbt_string(s)),
        Value::Array(items) => {
            let items = items
                .iter()
                .map(snbt_value)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(format!("[{}]", items.join(",")))
        }
        Value::Object(map) => Ok(format!("{{{}}}", snbt_entries(map)?.join(","))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker() -> Marker {
        Marker::from_stored("5f0c6f1e-0000-4000-8000-000000000001")
    }

    #[test]
    fn summon_embeds_marker() {
        assert_eq!(
            summon("minecraft:armor_stand", Coord::new(1, 64, -2), &marker(), &[]),
            r#"summon minecraft:armor_stand 1 64 -2 {CustomName:'{"text":"5f0c6f1e-0000-4000-8000-000000000001"}'}"#
        );
    }

    #[test]
    fn summon_appends_extras() {
        let cmd = summon(
            "minecraft:sheep",
            Coord::new(0, 0, 0),
            &Marker::from_stored("m"),
            &sheep_nbt(DyeColor::Red, true),
        );
        assert_eq!(
            cmd,
            r#"summon minecraft:sheep 0 0 0 {CustomName:'{"text":"m"}',Color:14b,Sheared:1b}"#
        );
    }

    #[test]
    fn removal_pair() {
        let m = Marker::from_stored("m1");
        assert_eq!(
            kill_marked("minecraft:zombie", &m),
            r#"kill @e[type=minecraft:zombie,nbt={CustomName:'{"text":"m1"}'}]"#
        );
        assert_eq!(
            clear_marked_items("minecraft:zombie", &m),
            r#"clear @a minecraft:zombie{display:{Name:'{"text":"m1"}'}}"#
        );
    }

    #[test]
    fn zombie_flags() {
        let traits = ZombieTraits {
            is_baby: true,
            health: 12.5,
            ..ZombieTraits::default()
        };
        assert_eq!(
            zombie_nbt(&traits).unwrap(),
            vec![
                "IsBaby:1b",
                "CanBreakDoors:0b",
                "CanPickUpLoot:0b",
                "PersistenceRequired:0b",
                "Health:12.5f",
            ]
        );
        assert_eq!(
            zombie_nbt(&ZombieTraits::default()).unwrap()[4],
            "Health:20f"
        );
    }

    #[test]
    fn zombie_rejects_bad_health() {
        let traits = ZombieTraits {
            health: 0.0,
            ..ZombieTraits::default()
        };
        assert!(zombie_nbt(&traits).is_err());
    }

    #[test]
    fn json_data_tag_to_snbt() {
        let entries = snbt_from_json(
            r#"{"VillagerData": {"profession": "farmer", "level": 2, "type": "plains"}, "NoAI": true}"#,
        )
        .unwrap();
        assert_eq!(
            entries,
            vec![
                "NoAI:true",
                r#"VillagerData:{level:2,profession:"farmer",type:"plains"}"#,
            ]
        );
    }

    #[test]
    fn json_data_tag_quotes_unusual_keys() {
        let entries = snbt_from_json(r#"{"odd key": "a\"b", "Tags": ["x", "y"]}"#).unwrap();
        assert_eq!(entries, vec![r#"Tags:["x","y"]"#, r#""odd key":"a\"b""#]);
    }

    #[test]
    fn json_data_tag_rejections() {
        assert!(snbt_from_json("[1, 2]").is_err());
        assert!(snbt_from_json(r#"{"CustomName": "x"}"#).is_err());
        assert!(snbt_from_json(r#"{"a": null}"#).is_err());
        assert!(snbt_from_json("not json").is_err());
    }
}
