//! Cluster role of the node the plugin runs on.
//!
//! The role decides which metric endpoints exist on the local metrics
//! service: masters only expose node metrics, agents additionally expose
//! one endpoint per running container.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PluginError;

/// DC/OS node role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Master,
    Agent,
    AgentPublic,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Master, Role::Agent, Role::AgentPublic];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Master => "master",
            Role::Agent => "agent",
            Role::AgentPublic => "agent-public",
        }
    }

    /// True for both private and public agents.
    pub fn is_agent(&self) -> bool {
        matches!(self, Role::Agent | Role::AgentPublic)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = PluginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s.trim())
            .ok_or_else(|| {
                PluginError::Config(format!(
                    "Role must be one of 'master', 'agent' or 'agent-public', got '{}'",
                    s
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_roles() {
        assert_eq!("master".parse::<Role>().unwrap(), Role::Master);
        assert_eq!("agent".parse::<Role>().unwrap(), Role::Agent);
        assert_eq!("agent-public".parse::<Role>().unwrap(), Role::AgentPublic);
    }

    #[test]
    fn rejects_unknown_role() {
        for bad in ["", "slave", "Master", "agent_public", "public"] {
            let err = bad.parse::<Role>().unwrap_err();
            assert!(matches!(err, PluginError::Config(_)), "{bad}: {err}");
        }
    }

    #[test]
    fn display_roundtrips_through_from_str() {
        for role in Role::ALL {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn serde_uses_kebab_case() {
        let json = serde_json::to_string(&Role::AgentPublic).unwrap();
        assert_eq!(json, "\"agent-public\"");
        let role: Role = serde_yaml::from_str("agent").unwrap();
        assert_eq!(role, Role::Agent);
    }

    #[test]
    fn agent_roles() {
        assert!(!Role::Master.is_agent());
        assert!(Role::Agent.is_agent());
        assert!(Role::AgentPublic.is_agent());
    }
}
