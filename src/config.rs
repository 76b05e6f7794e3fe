use std::time::Duration;

use serde::Deserialize;

use crate::error::ProtocolError;

pub const DEFAULT_CHAT_CAPACITY: usize = 100;
pub const DEFAULT_ROOM_ID_LEN: usize = 6;
/// Shortest accepted room code; 36^4 codes keeps collisions rare.
pub const MIN_ROOM_ID_LEN: usize = 4;

/// Tunables for a [`crate::registry::SessionRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Most recent chat messages retained per room.
    pub chat_capacity: usize,
    pub room_id_len: usize,
    /// Rooms idle this long are destroyed by `reap_idle`. `None` keeps rooms
    /// until their last participant leaves.
    pub idle_timeout_secs: Option<u64>,
    /// Send rejected commands back to the actor as `error` events instead of
    /// dropping them.
    pub surface_rejections: bool,
    /// Fixed seed for room id generation.
    pub rng_seed: Option<u64>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            chat_capacity: DEFAULT_CHAT_CAPACITY,
            room_id_len: DEFAULT_ROOM_ID_LEN,
            idle_timeout_secs: None,
            surface_rejections: false,
            rng_seed: None,
        }
    }
}

impl RegistryConfig {
    pub fn from_json(text: &str) -> Result<Self, ProtocolError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ProtocolError> {
        if self.room_id_len < MIN_ROOM_ID_LEN {
            return Err(ProtocolError::InvalidConfig(format!(
                "room_id_len must be at least {MIN_ROOM_ID_LEN}, got {}",
                self.room_id_len
            )));
        }
        Ok(())
    }

    pub fn idle_timeout(&self) -> Option<Duration> {
        self.idle_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config = RegistryConfig::from_json(r#"{"idle_timeout_secs": 600}"#).unwrap();

        assert_eq!(config.chat_capacity, 100);
        assert_eq!(config.room_id_len, 6);
        assert_eq!(config.idle_timeout(), Some(Duration::from_secs(600)));
        assert!(!config.surface_rejections);
    }

    #[test]
    fn malformed_config_is_an_error() {
        let err = RegistryConfig::from_json("{\"chat_capacity\": \"lots\"}").unwrap_err();

        assert!(err.to_string().starts_with("malformed JSON"));
    }

    #[test]
    fn short_room_codes_are_rejected() {
        for len in [0, 1, MIN_ROOM_ID_LEN - 1] {
            let err = RegistryConfig::from_json(&format!(r#"{{"room_id_len": {len}}}"#)).unwrap_err();
            assert!(matches!(err, ProtocolError::InvalidConfig(_)), "len {len}: {err}");
        }

        let config = RegistryConfig::from_json(r#"{"room_id_len": 4}"#).unwrap();
        assert_eq!(config.room_id_len, MIN_ROOM_ID_LEN);
    }
}
