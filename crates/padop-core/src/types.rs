use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Flag
// ---------------------------------------------------------------------------

/// A persisted boolean fact. Environment flags record what the runtime has
/// told us about the world; completion flags record irreversible actions
/// this unit has already performed. Flags only ever flip to true.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Flag {
    // Environment facts, set by event observation
    CodebaseReady,
    DbConnected,
    DbMasterAvailable,
    CertRelationAvailable,
    ServerCertAvailable,
    NginxAvailable,
    WebsiteAvailable,
    // Completion facts, set by actions
    SystemdInstalled,
    DbRequested,
    DbAvailable,
    Initialized,
    SslAvailable,
    WebConfigured,
}

impl Flag {
    pub fn all() -> &'static [Flag] {
        &[
            Flag::CodebaseReady,
            Flag::DbConnected,
            Flag::DbMasterAvailable,
            Flag::CertRelationAvailable,
            Flag::ServerCertAvailable,
            Flag::NginxAvailable,
            Flag::WebsiteAvailable,
            Flag::SystemdInstalled,
            Flag::DbRequested,
            Flag::DbAvailable,
            Flag::Initialized,
            Flag::SslAvailable,
            Flag::WebConfigured,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Flag::CodebaseReady => "codebase-ready",
            Flag::DbConnected => "db-connected",
            Flag::DbMasterAvailable => "db-master-available",
            Flag::CertRelationAvailable => "cert-relation-available",
            Flag::ServerCertAvailable => "server-cert-available",
            Flag::NginxAvailable => "nginx-available",
            Flag::WebsiteAvailable => "website-available",
            Flag::SystemdInstalled => "systemd-installed",
            Flag::DbRequested => "db-requested",
            Flag::DbAvailable => "db-available",
            Flag::Initialized => "initialized",
            Flag::SslAvailable => "ssl-available",
            Flag::WebConfigured => "web-configured",
        }
    }

    /// True for flags that mark a completed action rather than an
    /// observed condition.
    pub fn is_completion(self) -> bool {
        matches!(
            self,
            Flag::SystemdInstalled
                | Flag::DbRequested
                | Flag::DbAvailable
                | Flag::Initialized
                | Flag::SslAvailable
                | Flag::WebConfigured
        )
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Flag {
    type Err = crate::error::PadopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Flag::all()
            .iter()
            .find(|f| f.as_str() == s)
            .copied()
            .ok_or_else(|| crate::error::PadopError::UnknownFlag(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// A named event delivered by the orchestration runtime. Events carry no
/// ordering guarantee; they only mark environment flags, and the action
/// table decides what is legal to run from the accumulated fact set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Event {
    Install,
    ConfigChanged,
    UpdateStatus,
    DbRelationJoined,
    DbMasterChanged,
    CertificatesRelationJoined,
    ServerCertReady,
    NginxReady,
    WebsiteRelationJoined,
}

impl Event {
    pub fn all() -> &'static [Event] {
        &[
            Event::Install,
            Event::ConfigChanged,
            Event::UpdateStatus,
            Event::DbRelationJoined,
            Event::DbMasterChanged,
            Event::CertificatesRelationJoined,
            Event::ServerCertReady,
            Event::NginxReady,
            Event::WebsiteRelationJoined,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Event::Install => "install",
            Event::ConfigChanged => "config-changed",
            Event::UpdateStatus => "update-status",
            Event::DbRelationJoined => "db-relation-joined",
            Event::DbMasterChanged => "db-master-changed",
            Event::CertificatesRelationJoined => "certificates-relation-joined",
            Event::ServerCertReady => "server-cert-ready",
            Event::NginxReady => "nginx-ready",
            Event::WebsiteRelationJoined => "website-relation-joined",
        }
    }

    /// Environment flags this event marks true before the action table
    /// is evaluated.
    pub fn observed_flags(self) -> &'static [Flag] {
        match self {
            Event::Install => &[Flag::CodebaseReady],
            Event::DbRelationJoined => &[Flag::DbConnected],
            Event::DbMasterChanged => &[Flag::DbMasterAvailable],
            Event::CertificatesRelationJoined => &[Flag::CertRelationAvailable],
            Event::ServerCertReady => &[Flag::ServerCertAvailable],
            Event::NginxReady => &[Flag::NginxAvailable],
            Event::WebsiteRelationJoined => &[Flag::WebsiteAvailable],
            Event::ConfigChanged | Event::UpdateStatus => &[],
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Event {
    type Err = crate::error::PadopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Event::all()
            .iter()
            .find(|e| e.as_str() == s)
            .copied()
            .ok_or_else(|| crate::error::PadopError::UnknownEvent(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// StatusLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusLevel {
    Maintenance,
    Blocked,
    Waiting,
    Active,
}

impl StatusLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusLevel::Maintenance => "maintenance",
            StatusLevel::Blocked => "blocked",
            StatusLevel::Waiting => "waiting",
            StatusLevel::Active => "active",
        }
    }
}

impl fmt::Display for StatusLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StatusLevel {
    type Err = crate::error::PadopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "maintenance" => Ok(StatusLevel::Maintenance),
            "blocked" => Ok(StatusLevel::Blocked),
            "waiting" => Ok(StatusLevel::Waiting),
            "active" => Ok(StatusLevel::Active),
            _ => Err(crate::error::PadopError::InvalidStatusLevel(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn flag_roundtrip() {
        for flag in Flag::all() {
            let parsed = Flag::from_str(flag.as_str()).unwrap();
            assert_eq!(*flag, parsed);
        }
    }

    #[test]
    fn flag_serde_matches_as_str() {
        for flag in Flag::all() {
            let yaml = serde_yaml::to_string(flag).unwrap();
            assert_eq!(yaml.trim(), flag.as_str());
        }
    }

    #[test]
    fn event_roundtrip() {
        for event in Event::all() {
            let parsed = Event::from_str(event.as_str()).unwrap();
            assert_eq!(*event, parsed);
        }
    }

    #[test]
    fn unknown_event_rejected() {
        assert!(Event::from_str("leader-elected").is_err());
        assert!(Event::from_str("").is_err());
    }

    #[test]
    fn completion_flags() {
        assert!(Flag::SystemdInstalled.is_completion());
        assert!(Flag::WebConfigured.is_completion());
        assert!(!Flag::DbConnected.is_completion());
        assert!(!Flag::NginxAvailable.is_completion());
    }

    #[test]
    fn observed_flags_map_relations() {
        assert_eq!(Event::Install.observed_flags(), &[Flag::CodebaseReady]);
        assert_eq!(
            Event::DbMasterChanged.observed_flags(),
            &[Flag::DbMasterAvailable]
        );
        assert!(Event::ConfigChanged.observed_flags().is_empty());
        assert!(Event::UpdateStatus.observed_flags().is_empty());
    }
}
