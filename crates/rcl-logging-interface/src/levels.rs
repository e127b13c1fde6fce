//! Per-logger thresholds with dotted-name inheritance.
//!
//! Logger names form a hierarchy split on `.`: `robot.arm.gripper` inherits
//! from `robot.arm`, which inherits from `robot`, which inherits from the
//! root. The effective threshold of a name is the one set on the nearest
//! ancestor (itself included), falling back to the root threshold.

use std::collections::HashMap;

use crate::severity::Level;

/// Threshold table owned by a backend engine.
#[derive(Debug, Clone)]
pub struct LevelMap {
    root: Level,
    named: HashMap<String, Level>,
}

impl LevelMap {
    pub fn new(root: Level) -> Self {
        Self {
            root,
            named: HashMap::new(),
        }
    }

    pub fn root(&self) -> Level {
        self.root
    }

    /// Set the threshold of `name`; `None` or `""` is the root.
    pub fn set(&mut self, name: Option<&str>, level: Level) {
        match name.filter(|n| !n.is_empty()) {
            None => self.root = level,
            Some(name) => {
                self.named.insert(name.to_string(), level);
            }
        }
    }

    /// Threshold that applies to `name` after inheritance.
    pub fn effective(&self, name: Option<&str>) -> Level {
        let mut current = match name.filter(|n| !n.is_empty()) {
            Some(name) => name,
            None => return self.root,
        };
        loop {
            if let Some(level) = self.named.get(current) {
                return *level;
            }
            match current.rfind('.') {
                Some(idx) => current = &current[..idx],
                None => return self.root,
            }
        }
    }

    /// Whether a message at `level` from `name` is emitted.
    pub fn enabled(&self, name: Option<&str>, level: Level) -> bool {
        level.passes(self.effective(name))
    }

    pub fn len(&self) -> usize {
        self.named.len()
    }

    pub fn is_empty(&self) -> bool {
        self.named.is_empty()
    }
}
