//! Host configuration with TOML file support.
//!
//! Changes to this configuration apply to newly opened sessions only:
//! the hub snapshots [`ServiceConfig::session_settings`] into each session
//! at open time, so in-flight sessions keep the rules they opened with.

use curia_engine::{AutoResolvePolicy, DecisionPolicy};
use curia_session::SessionSettings;
use curia_types::StakingParams;
use serde::{Deserialize, Serialize};

use crate::ServiceError;

/// Configuration for the moderation host.
///
/// Can be loaded from a TOML file via [`ServiceConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// How often the expiry sweeper re-evaluates open sessions (ms).
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,

    /// Maximum concurrent open sessions.
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,

    /// Whether to enable the HTTP API.
    #[serde(default = "default_true")]
    pub enable_rpc: bool,

    /// HTTP API port (if enabled).
    #[serde(default = "default_rpc_port")]
    pub rpc_port: u16,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Voting window for newly opened sessions, in hours.
    #[serde(default = "default_vote_window_hours")]
    pub vote_window_hours: u32,

    /// Quorum: minimum eligible voters before a decision can finalize on
    /// votes alone.
    #[serde(default = "default_min_voters")]
    pub min_voters: u32,

    /// YES:NO weighted ratio required for approval.
    #[serde(default = "default_threshold_ratio")]
    pub threshold_ratio: f64,

    /// Fallback verdict when the window expires without a clear decision.
    #[serde(default = "default_auto_resolve")]
    pub auto_resolve: AutoResolvePolicy,

    /// Stake-weighting framework parameters.
    #[serde(default)]
    pub staking: StakingParams,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_refresh_interval_ms() -> u64 {
    5_000
}

fn default_max_sessions() -> usize {
    1_024
}

fn default_true() -> bool {
    true
}

fn default_rpc_port() -> u16 {
    8630
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_vote_window_hours() -> u32 {
    48
}

fn default_min_voters() -> u32 {
    3
}

fn default_threshold_ratio() -> f64 {
    1.0
}

fn default_auto_resolve() -> AutoResolvePolicy {
    AutoResolvePolicy::Escalate
}

// ── Impl ───────────────────────────────────────────────────────────────

impl ServiceConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, ServiceError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ServiceError::Serialization(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ServiceError> {
        toml::from_str(s).map_err(|e| ServiceError::Serialization(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).expect("ServiceConfig is always serializable to TOML")
    }

    /// The settings snapshot applied to sessions opened under this
    /// configuration.
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            vote_window_hours: self.vote_window_hours,
            params: self.staking.clone(),
            policy: DecisionPolicy {
                min_voters: self.min_voters,
                threshold_ratio: self.threshold_ratio,
                auto_resolve: self.auto_resolve,
            },
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: default_refresh_interval_ms(),
            max_sessions: default_max_sessions(),
            enable_rpc: default_true(),
            rpc_port: default_rpc_port(),
            log_format: default_log_format(),
            log_level: default_log_level(),
            vote_window_hours: default_vote_window_hours(),
            min_voters: default_min_voters(),
            threshold_ratio: default_threshold_ratio(),
            auto_resolve: default_auto_resolve(),
            staking: StakingParams::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = ServiceConfig::default();
        let toml_str = config.to_toml_string();
        let parsed = ServiceConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed.rpc_port, config.rpc_port);
        assert_eq!(parsed.refresh_interval_ms, config.refresh_interval_ms);
        assert_eq!(parsed.staking, config.staking);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = ServiceConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.rpc_port, 8630);
        assert_eq!(config.min_voters, 3);
        assert_eq!(config.auto_resolve, AutoResolvePolicy::Escalate);
        assert_eq!(config.staking.min_stake_to_vote, 50.0);
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            min_voters = 7
            auto_resolve = "reject-default"

            [staking]
            min_stake_to_vote = 100.0
        "#;
        let config = ServiceConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.min_voters, 7);
        assert_eq!(config.auto_resolve, AutoResolvePolicy::RejectDefault);
        assert_eq!(config.staking.min_stake_to_vote, 100.0);
        // Untouched staking fields keep their defaults.
        assert_eq!(config.staking.stake_age_min_days, 7);
        assert_eq!(config.log_format, "human");
    }

    #[test]
    fn missing_file_returns_error() {
        assert!(ServiceConfig::from_toml_file("/nonexistent/curia.toml").is_err());
    }

    #[test]
    fn session_settings_snapshot_matches_fields() {
        let config = ServiceConfig {
            vote_window_hours: 12,
            min_voters: 5,
            threshold_ratio: 2.0,
            ..Default::default()
        };
        let settings = config.session_settings();
        assert_eq!(settings.vote_window_hours, 12);
        assert_eq!(settings.policy.min_voters, 5);
        assert_eq!(settings.policy.threshold_ratio, 2.0);
        assert!(settings.validate().is_ok());
    }
}
