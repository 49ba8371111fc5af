//! Room configuration.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::RoomError;

/// Configuration for a room instance, fixed at server start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Number of participants required to start a session. Also the
    /// hard upper bound on roster size.
    pub capacity: usize,

    /// Pseudonym pool. Each participant gets a random unused name from
    /// this list; names return to the pool on disconnect. Must hold at
    /// least `capacity` distinct entries.
    pub names: Vec<String>,

    /// Opaque settings blob handed to the game-logic factory at every
    /// session start. The room never inspects it.
    #[serde(default)]
    pub settings: Value,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            capacity: 2,
            names: [
                "Scout", "Nova", "Pepper", "Juniper", "Atlas", "Willow", "Biscuit", "Comet",
            ]
            .map(String::from)
            .to_vec(),
            settings: Value::Null,
        }
    }
}

impl RoomConfig {
    /// Checks the configuration before the server starts.
    ///
    /// A pseudonym pool smaller than the capacity would strand a
    /// participant without a name mid-lobby; that is a deployment
    /// mistake, so it is refused here rather than discovered at the
    /// worst possible moment.
    pub fn validate(&self) -> Result<(), RoomError> {
        if self.capacity == 0 {
            return Err(RoomError::InvalidConfig(
                "capacity must be at least 1".into(),
            ));
        }
        if self.names.len() < self.capacity {
            return Err(RoomError::InvalidConfig(format!(
                "pseudonym pool has {} names but capacity is {}",
                self.names.len(),
                self.capacity
            )));
        }
        let mut seen = std::collections::HashSet::new();
        for name in &self.names {
            if !seen.insert(name.as_str()) {
                return Err(RoomError::InvalidConfig(format!(
                    "duplicate pseudonym in pool: {name}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(RoomConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let config = RoomConfig {
            capacity: 0,
            ..RoomConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(RoomError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_rejects_pool_smaller_than_capacity() {
        let config = RoomConfig {
            capacity: 3,
            names: vec!["Max".into(), "Moritz".into()],
            settings: Value::Null,
        };
        assert!(matches!(
            config.validate(),
            Err(RoomError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_rejects_duplicate_names() {
        let config = RoomConfig {
            capacity: 2,
            names: vec!["Max".into(), "Max".into()],
            settings: Value::Null,
        };
        assert!(matches!(
            config.validate(),
            Err(RoomError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_accepts_pool_equal_to_capacity() {
        let config = RoomConfig {
            capacity: 2,
            names: vec!["Max".into(), "Moritz".into()],
            settings: Value::Null,
        };
        assert!(config.validate().is_ok());
    }
}
