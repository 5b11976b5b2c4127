use std::path::Path;

use anyhow::{Context, Result};
use hashbrown::HashSet;
use multirando_game::ConfigError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Clone, Debug, Serialize)]
pub enum OptionKind {
    Toggle {
        default: bool,
    },
    Range {
        min: i64,
        max: i64,
        default: i64,
    },
    Choice {
        choices: &'static [&'static str],
        default: usize,
    },
}

#[derive(Clone, Debug, Serialize)]
pub struct OptionSpec {
    pub name: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub kind: OptionKind,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OptionValue {
    Toggle(bool),
    Range(i64),
    Choice(usize),
}

// Option values checked against a game's schema, with defaults filled in. Ordered as in the schema.
#[derive(Clone, Debug)]
pub struct ResolvedOptions {
    pub specs: Vec<OptionSpec>,
    pub values: Vec<OptionValue>, // Corresponds to specs
}

fn invalid(option: &str, reason: String) -> ConfigError {
    ConfigError::InvalidOption {
        option: option.to_string(),
        reason,
    }
}

impl ResolvedOptions {
    fn get(&self, name: &str) -> Result<OptionValue, ConfigError> {
        self.specs
            .iter()
            .position(|s| s.name == name)
            .map(|i| self.values[i])
            .ok_or_else(|| invalid(name, "not defined for this game".to_string()))
    }

    pub fn toggle(&self, name: &str) -> Result<bool, ConfigError> {
        match self.get(name)? {
            OptionValue::Toggle(x) => Ok(x),
            _ => Err(invalid(name, "not a toggle option".to_string())),
        }
    }

    pub fn range(&self, name: &str) -> Result<i64, ConfigError> {
        match self.get(name)? {
            OptionValue::Range(x) => Ok(x),
            _ => Err(invalid(name, "not a range option".to_string())),
        }
    }

    pub fn choice(&self, name: &str) -> Result<usize, ConfigError> {
        match self.get(name)? {
            OptionValue::Choice(x) => Ok(x),
            _ => Err(invalid(name, "not a choice option".to_string())),
        }
    }

    // Choice values are written by name.
    pub fn to_json(&self) -> Value {
        let mut out = Map::new();
        for (spec, value) in self.specs.iter().zip(self.values.iter()) {
            let v = match (&spec.kind, *value) {
                (OptionKind::Choice { choices, .. }, OptionValue::Choice(i)) => {
                    Value::from(choices[i])
                }
                (_, OptionValue::Toggle(x)) => Value::from(x),
                (_, OptionValue::Range(x)) => Value::from(x),
                (_, OptionValue::Choice(i)) => Value::from(i),
            };
            out.insert(spec.name.to_string(), v);
        }
        Value::Object(out)
    }
}

fn parse_option_value(spec: &OptionSpec, value: &Value) -> Result<OptionValue, ConfigError> {
    match &spec.kind {
        OptionKind::Toggle { .. } => match value {
            Value::Bool(x) => Ok(OptionValue::Toggle(*x)),
            Value::Number(n) if n.as_u64() == Some(0) => Ok(OptionValue::Toggle(false)),
            Value::Number(n) if n.as_u64() == Some(1) => Ok(OptionValue::Toggle(true)),
            Value::String(s) if s == "true" => Ok(OptionValue::Toggle(true)),
            Value::String(s) if s == "false" => Ok(OptionValue::Toggle(false)),
            _ => Err(invalid(spec.name, format!("expected true or false, got {value}"))),
        },
        OptionKind::Range { min, max, .. } => {
            let Some(x) = value.as_i64() else {
                return Err(invalid(spec.name, format!("expected an integer, got {value}")));
            };
            if x < *min || x > *max {
                return Err(invalid(spec.name, format!("{x} is outside {min}..={max}")));
            }
            Ok(OptionValue::Range(x))
        }
        OptionKind::Choice { choices, .. } => {
            let idx = match value {
                Value::String(s) => choices.iter().position(|c| c.eq_ignore_ascii_case(s)),
                Value::Number(n) => n
                    .as_u64()
                    .map(|x| x as usize)
                    .filter(|&x| x < choices.len()),
                _ => None,
            };
            idx.map(OptionValue::Choice).ok_or_else(|| {
                invalid(
                    spec.name,
                    format!("{value} is not one of [{}]", choices.join(", ")),
                )
            })
        }
    }
}

pub fn default_value(spec: &OptionSpec) -> OptionValue {
    match spec.kind {
        OptionKind::Toggle { default } => OptionValue::Toggle(default),
        OptionKind::Range { default, .. } => OptionValue::Range(default),
        OptionKind::Choice { default, .. } => OptionValue::Choice(default),
    }
}

pub fn normalize_options(
    specs: &[OptionSpec],
    raw: &Map<String, Value>,
) -> Result<ResolvedOptions, ConfigError> {
    for key in raw.keys() {
        if !specs.iter().any(|s| s.name == key) {
            return Err(invalid(key, "unknown option".to_string()));
        }
    }
    let mut values: Vec<OptionValue> = Vec::with_capacity(specs.len());
    for spec in specs {
        let value = match raw.get(spec.name) {
            Some(v) => parse_option_value(spec, v)?,
            None => default_value(spec),
        };
        values.push(value);
    }
    Ok(ResolvedOptions {
        specs: specs.to_vec(),
        values,
    })
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PlayerSettings {
    pub name: String,
    pub game: String,
    #[serde(default)]
    pub options: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct GenerationSettings {
    #[serde(default)]
    pub seed: Option<u64>,
    pub players: Vec<PlayerSettings>,
}

impl GenerationSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.players.is_empty() {
            return Err(invalid("players", "at least one player is required".to_string()));
        }
        let mut names: HashSet<&str> = HashSet::new();
        for p in &self.players {
            if p.name.is_empty() {
                return Err(invalid("players", "player name must not be empty".to_string()));
            }
            if !names.insert(&p.name) {
                return Err(invalid(
                    "players",
                    format!("duplicate player name '{}'", p.name),
                ));
            }
        }
        Ok(())
    }
}

pub fn parse_generation_settings(settings_json: &str) -> Result<GenerationSettings> {
    let mut des = serde_json::Deserializer::from_str(settings_json);
    let settings = serde_path_to_error::deserialize(&mut des)?;
    Ok(settings)
}

pub fn load_generation_settings(path: &Path) -> Result<GenerationSettings> {
    let settings_str = std::fs::read_to_string(path)
        .with_context(|| format!("Unable to read settings file {}", path.display()))?;
    parse_generation_settings(&settings_str)
        .with_context(|| format!("Unable to parse settings file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn specs() -> Vec<OptionSpec> {
        vec![
            OptionSpec {
                name: "hard_mode",
                display_name: "Hard Mode",
                description: "",
                kind: OptionKind::Toggle { default: false },
            },
            OptionSpec {
                name: "weight",
                display_name: "Weight",
                description: "",
                kind: OptionKind::Range {
                    min: 0,
                    max: 100,
                    default: 10,
                },
            },
            OptionSpec {
                name: "goal",
                display_name: "Goal",
                description: "",
                kind: OptionKind::Choice {
                    choices: &["steal_bell", "all_main_goals", "all_goals"],
                    default: 0,
                },
            },
        ]
    }

    fn raw(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn test_defaults() {
        let options = normalize_options(&specs(), &Map::new()).unwrap();
        assert!(!options.toggle("hard_mode").unwrap());
        assert_eq!(options.range("weight").unwrap(), 10);
        assert_eq!(options.choice("goal").unwrap(), 0);
    }

    #[test]
    fn test_choice_by_name_or_number() {
        let options = normalize_options(&specs(), &raw(json!({"goal": "all_goals"}))).unwrap();
        assert_eq!(options.choice("goal").unwrap(), 2);
        let options = normalize_options(&specs(), &raw(json!({"goal": 1}))).unwrap();
        assert_eq!(options.choice("goal").unwrap(), 1);
        assert_eq!(options.to_json()["goal"], json!("all_main_goals"));
        assert!(normalize_options(&specs(), &raw(json!({"goal": 3}))).is_err());
        assert!(normalize_options(&specs(), &raw(json!({"goal": "win"}))).is_err());
    }

    #[test]
    fn test_invalid_options() {
        let err = normalize_options(&specs(), &raw(json!({"weight": 101}))).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOption { ref option, .. } if option == "weight"));
        let err = normalize_options(&specs(), &raw(json!({"hard_mode": "yes"}))).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOption { .. }));
        let err = normalize_options(&specs(), &raw(json!({"speed": 3}))).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOption { ref reason, .. } if reason == "unknown option"));
    }

    #[test]
    fn test_parse_settings() -> Result<()> {
        let settings = parse_generation_settings(
            r#"{"seed": 5, "players": [{"name": "Alice", "game": "Untitled Goose Game"}]}"#,
        )?;
        assert_eq!(settings.seed, Some(5));
        assert!(settings.players[0].options.is_empty());
        settings.validate()?;

        let err = parse_generation_settings(r#"{"players": [{"name": "Alice"}]}"#).unwrap_err();
        assert!(err.to_string().contains("players[0]"));
        Ok(())
    }

    #[test]
    fn test_duplicate_player_names() {
        let settings = GenerationSettings {
            seed: None,
            players: vec![
                PlayerSettings {
                    name: "Alice".to_string(),
                    game: "Untitled Goose Game".to_string(),
                    options: Map::new(),
                };
                2
            ],
        };
        assert!(settings.validate().is_err());
    }
}
