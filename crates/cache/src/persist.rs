//! JSON file persistence for the session cache.

use std::fs;
use std::path::Path;

use adpulse_core::AdPulseResult;

use crate::session::CacheState;

/// Load cache state from disk. A missing file yields the default state.
pub fn load_state(path: &Path) -> AdPulseResult<CacheState> {
    if !path.exists() {
        return Ok(CacheState::default());
    }
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

/// Write cache state to disk as pretty-printed JSON.
pub fn save_state(path: &Path, state: &CacheState) -> AdPulseResult<()> {
    let json = serde_json::to_string_pretty(state)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use adpulse_core::types::AdAccount;
    use chrono::Utc;

    #[test]
    fn test_missing_file_yields_default() {
        let dir = tempfile::tempdir().unwrap();
        let state = load_state(&dir.path().join("absent.json")).unwrap();
        assert_eq!(state, CacheState::default());
    }

    #[test]
    fn test_state_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let state = CacheState {
            last_filters: None,
            accounts: vec![AdAccount {
                id: "act_123".to_string(),
                name: "Main".to_string(),
            }],
            accounts_fetched_at: Some(Utc::now()),
        };
        save_state(&path, &state).unwrap();
        let loaded = load_state(&path).unwrap();
        assert_eq!(loaded, state);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(load_state(&path).is_err());
    }
}
