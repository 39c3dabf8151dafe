//! Level definitions and the level table
//!
//! Levels are authored as plain serde data (`LevelDef`) and built into live
//! entities once. The table is validated up front so the simulation never
//! has to check it again.

use std::collections::HashSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::body::Body;
use super::state::{Enemy, Label, Obstacle};
use crate::tuning::Tuning;

/// Problems found while building a level table
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level table is empty")]
    Empty,
    #[error("{level}: `{entity}` must have a positive size")]
    NonPositiveSize { level: String, entity: String },
    #[error("{level}: identity `{identity}` is used twice")]
    DuplicateIdentity { level: String, identity: String },
    #[error("invalid level JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A box placed in a level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxDef {
    pub identity: String,
    pub pos: Vec2,
    pub size: Vec2,
    #[serde(default)]
    pub sprite: Option<String>,
}

impl BoxDef {
    pub fn new(identity: impl Into<String>, x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            identity: identity.into(),
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
            sprite: None,
        }
    }

    pub fn with_sprite(mut self, sprite: &str) -> Self {
        self.sprite = Some(sprite.to_string());
        self
    }

    fn build(&self) -> Body {
        Body::new(self.identity.clone(), self.pos, self.size).with_sprite(self.sprite.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyDef {
    #[serde(flatten)]
    pub body: BoxDef,
    #[serde(default)]
    pub hurt_sprite: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelDef {
    pub text: String,
    pub size: String,
    pub pos: Vec2,
}

/// Authoring form of a level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDef {
    pub name: String,
    #[serde(default)]
    pub enemies: Vec<EnemyDef>,
    #[serde(default)]
    pub traps: Vec<BoxDef>,
    #[serde(default)]
    pub obstacles: Vec<BoxDef>,
    #[serde(default)]
    pub labels: Vec<LabelDef>,
    pub player_spawn: Vec2,
    pub goal_spawn: Vec2,
}

impl LevelDef {
    fn validate(&self) -> Result<(), LevelError> {
        let boxes = self
            .enemies
            .iter()
            .map(|e| &e.body)
            .chain(&self.traps)
            .chain(&self.obstacles);
        for b in boxes {
            if b.size.x <= 0.0 || b.size.y <= 0.0 {
                return Err(LevelError::NonPositiveSize {
                    level: self.name.clone(),
                    entity: b.identity.clone(),
                });
            }
        }

        let collections: [Vec<&BoxDef>; 3] = [
            self.enemies.iter().map(|e| &e.body).collect(),
            self.traps.iter().collect(),
            self.obstacles.iter().collect(),
        ];
        for collection in collections {
            let mut seen = HashSet::new();
            for b in collection {
                if !seen.insert(b.identity.as_str()) {
                    return Err(LevelError::DuplicateIdentity {
                        level: self.name.clone(),
                        identity: b.identity.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    fn build(&self, tuning: &Tuning) -> Level {
        Level {
            name: self.name.clone(),
            enemies: self
                .enemies
                .iter()
                .map(|e| {
                    Enemy::new(e.body.build(), tuning.enemy_initial_slow)
                        .with_hurt_sprite(e.hurt_sprite.clone())
                })
                .collect(),
            traps: self.traps.iter().map(|t| Obstacle::trap(t.build())).collect(),
            obstacles: self.obstacles.iter().map(|o| Obstacle::wall(o.build())).collect(),
            labels: self
                .labels
                .iter()
                .map(|l| Label::new(l.text.clone(), l.size.clone(), l.pos))
                .collect(),
            player_spawn: self.player_spawn,
            goal_spawn: self.goal_spawn,
        }
    }
}

/// A level and the live entities it owns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    pub name: String,
    /// Dead enemies stay in place so indices remain stable
    pub enemies: Vec<Enemy>,
    pub traps: Vec<Obstacle>,
    pub obstacles: Vec<Obstacle>,
    pub labels: Vec<Label>,
    pub player_spawn: Vec2,
    pub goal_spawn: Vec2,
}

impl Level {
    /// Put every entity back where the level started it
    pub fn reset(&mut self) {
        for enemy in &mut self.enemies {
            enemy.reset();
        }
        for trap in &mut self.traps {
            trap.body.reset();
        }
        for wall in &mut self.obstacles {
            wall.body.reset();
        }
        for label in &mut self.labels {
            label.reset();
        }
    }
}

/// Ordered, validated level table
#[derive(Debug, Clone)]
pub struct LevelRegistry {
    levels: Vec<Level>,
}

impl LevelRegistry {
    pub fn new(defs: &[LevelDef], tuning: &Tuning) -> Result<Self, LevelError> {
        if defs.is_empty() {
            return Err(LevelError::Empty);
        }
        for def in defs {
            def.validate()?;
        }
        Ok(Self {
            levels: defs.iter().map(|d| d.build(tuning)).collect(),
        })
    }

    /// Parse a JSON array of level definitions
    pub fn from_json(json: &str, tuning: &Tuning) -> Result<Self, LevelError> {
        let defs: Vec<LevelDef> = serde_json::from_str(json)?;
        Self::new(&defs, tuning)
    }

    /// The levels that ship with the game
    pub fn builtin(tuning: &Tuning) -> Result<Self, LevelError> {
        Self::new(&builtin_levels(), tuning)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Level> {
        self.levels.get(index)
    }

    pub fn into_levels(self) -> Vec<Level> {
        self.levels
    }
}

fn label(text: &str, x: f32, y: f32) -> LabelDef {
    LabelDef {
        text: text.to_string(),
        size: "30px".to_string(),
        pos: Vec2::new(x, y),
    }
}

/// Authoring data for the built-in levels
pub fn builtin_levels() -> Vec<LevelDef> {
    let tutorial = LevelDef {
        name: "level 1".to_string(),
        enemies: Vec::new(),
        traps: Vec::new(),
        obstacles: vec![
            BoxDef::new("wall101", 400.0, 0.0, 250.0, 40.0),
            BoxDef::new("wall102", 610.0, 0.0, 40.0, 250.0),
            BoxDef::new("wall103", 610.0, 250.0, 40.0, 250.0),
            BoxDef::new("wall104", 0.0, 0.0, 250.0, 40.0),
            BoxDef::new("wall105", 0.0, 0.0, 40.0, 250.0),
            BoxDef::new("wall106", 0.0, 250.0, 40.0, 250.0),
            BoxDef::new("wall107", 400.0, -500.0, 250.0, 40.0),
            BoxDef::new("wall108", 610.0, -500.0, 40.0, 250.0),
            BoxDef::new("wall109", 610.0, -250.0, 40.0, 250.0),
            BoxDef::new("wall1010", 0.0, -500.0, 250.0, 40.0),
            BoxDef::new("wall1011", 0.0, -500.0, 40.0, 250.0),
            BoxDef::new("wall1012", 0.0, -250.0, 40.0, 250.0),
        ],
        labels: vec![
            label("WASD to move.", 220.0, 100.0),
            label("J: shoot forwards. K: shoot backwards.", 60.0, -100.0),
            label("Climb those stairs.", 195.0, -380.0),
        ],
        player_spawn: Vec2::new(290.0, 200.0),
        goal_spawn: Vec2::new(290.0, -500.0),
    };

    let first_enemy = LevelDef {
        name: "level 2".to_string(),
        enemies: vec![EnemyDef {
            body: BoxDef::new("enemy2", 440.0, 280.0, 35.0, 35.0),
            hurt_sprite: None,
        }],
        traps: Vec::new(),
        obstacles: vec![BoxDef::new("wall2", 200.0, 0.0, 250.0, 40.0)],
        labels: Vec::new(),
        player_spawn: Vec2::new(0.0, 0.0),
        goal_spawn: Vec2::new(200.0, 0.0),
    };

    let spikes = LevelDef {
        name: "level 3".to_string(),
        enemies: vec![
            EnemyDef {
                body: BoxDef::new("enemy301", 480.0, 60.0, 35.0, 35.0)
                    .with_sprite("img/enemy_idle.png"),
                hurt_sprite: Some("img/enemy_hurt.png".to_string()),
            },
            EnemyDef {
                body: BoxDef::new("enemy302", 80.0, -160.0, 35.0, 35.0)
                    .with_sprite("img/enemy_idle.png"),
                hurt_sprite: Some("img/enemy_hurt.png".to_string()),
            },
        ],
        traps: vec![
            BoxDef::new("trap301", 360.0, 120.0, 40.0, 40.0).with_sprite("img/spikes.png"),
            BoxDef::new("trap302", 180.0, -80.0, 40.0, 40.0).with_sprite("img/spikes.png"),
        ],
        obstacles: vec![
            BoxDef::new("wall301", 0.0, 440.0, 650.0, 40.0),
            BoxDef::new("wall302", 0.0, -400.0, 40.0, 840.0),
            BoxDef::new("wall303", 610.0, -400.0, 40.0, 840.0),
        ],
        labels: vec![label("Grow the spikes. Lure them in.", 110.0, 400.0)],
        player_spawn: Vec2::new(300.0, 300.0),
        goal_spawn: Vec2::new(285.0, -360.0),
    };

    vec![tutorial, first_enemy, spikes]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_levels_validate() {
        let tuning = Tuning::default();
        let registry = LevelRegistry::builtin(&tuning).unwrap();
        assert_eq!(registry.len(), 3);
        let first = registry.get(0).unwrap();
        assert_eq!(first.obstacles.len(), 12);
        assert_eq!(first.labels.len(), 3);
        assert!(first.enemies.is_empty());
    }

    #[test]
    fn test_empty_table_rejected() {
        let err = LevelRegistry::new(&[], &Tuning::default()).unwrap_err();
        assert!(matches!(err, LevelError::Empty));
    }

    #[test]
    fn test_non_positive_size_rejected() {
        let mut defs = builtin_levels();
        defs[1].obstacles[0].size.y = 0.0;
        let err = LevelRegistry::new(&defs, &Tuning::default()).unwrap_err();
        match err {
            LevelError::NonPositiveSize { level, entity } => {
                assert_eq!(level, "level 2");
                assert_eq!(entity, "wall2");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_identity_rejected() {
        let mut defs = builtin_levels();
        defs[0].obstacles[1].identity = "wall101".to_string();
        let err = LevelRegistry::new(&defs, &Tuning::default()).unwrap_err();
        assert!(matches!(err, LevelError::DuplicateIdentity { .. }));
    }

    #[test]
    fn test_from_json() {
        let json = r#"[{
            "name": "json level",
            "enemies": [{"identity": "e1", "pos": [10.0, 20.0], "size": [35.0, 35.0]}],
            "obstacles": [{"identity": "w1", "pos": [0.0, 0.0], "size": [100.0, 40.0]}],
            "player_spawn": [300.0, 300.0],
            "goal_spawn": [300.0, -300.0]
        }]"#;
        let tuning = Tuning::default();
        let registry = LevelRegistry::from_json(json, &tuning).unwrap();
        let level = registry.get(0).unwrap();
        assert_eq!(level.enemies[0].body.pos, Vec2::new(10.0, 20.0));
        assert_eq!(level.enemies[0].slow, tuning.enemy_initial_slow);
        assert!(level.traps.is_empty());
    }

    #[test]
    fn test_bad_json_is_an_error() {
        let err = LevelRegistry::from_json("{not json", &Tuning::default()).unwrap_err();
        assert!(matches!(err, LevelError::Json(_)));
    }

    #[test]
    fn test_reset_restores_every_entity() {
        let mut level = builtin_levels()[1].build(&Tuning::default());
        level.enemies[0].body.enlarge(10.0);
        level.enemies[0].alive = false;
        level.obstacles[0].body.shift(Vec2::new(3.0, 3.0));
        level.reset();
        assert!(level.enemies[0].alive);
        assert_eq!(level.enemies[0].body.size, Vec2::splat(35.0));
        assert_eq!(level.obstacles[0].body.pos, Vec2::new(200.0, 0.0));
    }
}
