//! Snapshot encoding and the sanitize-on-load repair pass.
//!
//! A save document may be partial, hand-edited, or from an older build.
//! [`sanitize`] never fails: anything missing or malformed falls back to the
//! value a fresh adventure would have, and every bounded value is re-clamped
//! before the state reaches the rules engine.

use std::collections::HashSet;

use serde_json::{Map, Value};

use ff_mechanics::encounter::truncate;
use ff_mechanics::sheet::STARTING_PROVISIONS;
use ff_mechanics::{
    CharacterSheet, Encounter, EncounterId, EncounterRegistry, EncounterStatus, EventLog,
    GameState, Gauge, Potion, PotionChoice, SNAPSHOT_VERSION, Stat,
};

use crate::error::AdventureResult;

/// Encode a state as compact snapshot JSON.
pub fn encode(state: &GameState) -> AdventureResult<String> {
    Ok(serde_json::to_string(state)?)
}

/// Encode a state as pretty-printed JSON for export.
pub fn encode_pretty(state: &GameState) -> AdventureResult<String> {
    Ok(serde_json::to_string_pretty(state)?)
}

/// Default export file name: `ff-save-<unix millis>.json`.
pub fn export_file_name() -> String {
    format!("ff-save-{}.json", chrono::Utc::now().timestamp_millis())
}

/// Decode raw snapshot text. Unparseable text yields a fresh state.
pub fn decode(raw: &str) -> GameState {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => {
            let state = sanitize(&value);
            if serde_json::to_value(&state).ok().as_ref() != Some(&value) {
                tracing::warn!("snapshot repaired on load");
            }
            state
        }
        Err(e) => {
            tracing::warn!(error = %e, "snapshot is not valid JSON, starting fresh");
            GameState::default()
        }
    }
}

/// Repair an arbitrary JSON value into a state that satisfies every
/// invariant of the rules engine.
pub fn sanitize(value: &Value) -> GameState {
    let empty = Map::new();
    let root = value.as_object().unwrap_or(&empty);

    let player = sanitize_player(root.get("player"));
    let encounters = root
        .get("encounters")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .map(sanitize_encounters)
        .unwrap_or_default();
    let active_encounter_id = root
        .get("activeEncounterId")
        .and_then(Value::as_str)
        .map(EncounterId::from);
    let logs = sanitize_logs(root.get("logs"));

    let mut state = GameState {
        version: SNAPSHOT_VERSION,
        player,
        registry: EncounterRegistry {
            encounters,
            active_encounter_id,
        },
        logs,
    };
    state.enforce_caps();
    state
}

fn sanitize_player(value: Option<&Value>) -> CharacterSheet {
    let Some(obj) = value.and_then(Value::as_object) else {
        return CharacterSheet::default();
    };
    CharacterSheet {
        name: obj
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        skill: sanitize_stat(obj.get("skill")),
        stamina: sanitize_stat(obj.get("stamina")),
        luck: sanitize_stat(obj.get("luck")),
        provisions: integer(obj.get("provisions")).unwrap_or(STARTING_PROVISIONS),
        gold: integer(obj.get("gold")).unwrap_or(0),
        equipment: strings(obj.get("equipment")),
        treasure: strings(obj.get("treasure")),
        potion: sanitize_potion(obj.get("potion")),
    }
}

fn sanitize_stat(value: Option<&Value>) -> Stat {
    let obj = value.and_then(Value::as_object);
    let Some(initial) = obj.and_then(|o| integer(o.get("initial"))) else {
        return Stat::default();
    };
    let initial = initial.max(0);
    let current = obj
        .and_then(|o| integer(o.get("current")))
        .unwrap_or(initial);
    Stat::from(Gauge::with_current(initial, current))
}

fn sanitize_potion(value: Option<&Value>) -> Potion {
    let Some(obj) = value.and_then(Value::as_object) else {
        return Potion::default();
    };
    Potion {
        choice: obj
            .get("choice")
            .and_then(|v| serde_json::from_value::<PotionChoice>(v.clone()).ok())
            .unwrap_or_default(),
        used: obj.get("used").is_some_and(truthy),
    }
}

fn sanitize_encounters(list: &[Value]) -> Vec<Encounter> {
    let mut seen = HashSet::new();
    list.iter()
        .filter_map(sanitize_encounter)
        .map(|mut encounter| {
            while !seen.insert(encounter.id.clone()) {
                encounter.id = EncounterId::new();
            }
            encounter
        })
        .collect()
}

fn sanitize_encounter(value: &Value) -> Option<Encounter> {
    let obj = value.as_object()?;
    let skill = integer(obj.get("skill"))?;
    let stamina = obj.get("stamina").and_then(Value::as_object)?;
    let initial = integer(stamina.get("initial"))?;
    let current = integer(stamina.get("current")).unwrap_or(initial);

    let id = obj
        .get("id")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(EncounterId::from)
        .unwrap_or_default();
    let name = obj
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("Monster")
        .to_string();
    let status = obj
        .get("status")
        .and_then(|v| serde_json::from_value::<EncounterStatus>(v.clone()).ok())
        .unwrap_or(EncounterStatus::Active);

    let mut encounter = Encounter {
        id,
        name,
        skill,
        stamina: Gauge { initial, current },
        status,
    };
    encounter.enforce_caps();
    Some(encounter)
}

fn sanitize_logs(value: Option<&Value>) -> EventLog {
    let obj = value.and_then(Value::as_object);
    let channel = |key: &str| strings(obj.and_then(|o| o.get(key)));
    EventLog {
        luck: channel("luck"),
        combat: channel("combat"),
        dice: channel("dice"),
    }
}

/// A finite number truncated toward zero into the `i32` range.
fn integer(value: Option<&Value>) -> Option<i32> {
    value
        .and_then(Value::as_f64)
        .filter(|n| n.is_finite())
        .map(truncate)
}

/// The string elements of an array; anything else is dropped.
fn strings(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Loose truthiness as saved by older builds: `0`, `""` and `null` are false.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
