use crate::types::StatusLevel;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Effect
// ---------------------------------------------------------------------------

/// An ordered, side-effecting instruction for the orchestration runtime.
///
/// The reconciler never touches the system itself; it emits these and the
/// runtime executes them in order. Every effect is safe to re-execute:
/// files are removed before being rewritten, service starts branch to
/// restarts, and port/status calls are idempotent at the runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    RenderTemplate {
        source: String,
        target: String,
        perms: u32,
        owner: String,
        context: serde_json::Value,
    },
    RemoveFile {
        path: String,
    },
    WriteFile {
        path: String,
        contents: String,
        perms: u32,
        owner: String,
    },
    StartService {
        name: String,
    },
    RestartService {
        name: String,
    },
    OpenPort {
        port: u16,
    },
    ClosePort {
        port: u16,
    },
    SetStatus {
        level: StatusLevel,
        message: String,
    },
    RequestDatabase {
        name: String,
    },
    RequestServerCert {
        common_name: String,
        sans: Vec<String>,
        identifier: String,
    },
    ConfigureSite {
        site: String,
        template: String,
        cert_path: Option<String>,
        key_path: Option<String>,
        fqdn: Option<String>,
    },
    PropagatePort {
        port: u16,
    },
    ChownRecursive {
        path: String,
        owner: String,
        group: String,
    },
}

impl Effect {
    /// One-line human description for CLI output.
    pub fn describe(&self) -> String {
        match self {
            Effect::RenderTemplate { source, target, .. } => {
                format!("render {source} -> {target}")
            }
            Effect::RemoveFile { path } => format!("remove {path}"),
            Effect::WriteFile { path, .. } => format!("write {path}"),
            Effect::StartService { name } => format!("start service {name}"),
            Effect::RestartService { name } => format!("restart service {name}"),
            Effect::OpenPort { port } => format!("open port {port}"),
            Effect::ClosePort { port } => format!("close port {port}"),
            Effect::SetStatus { level, message } => format!("status {level}: {message}"),
            Effect::RequestDatabase { name } => format!("request database '{name}'"),
            Effect::RequestServerCert {
                common_name,
                identifier,
                ..
            } => format!("request server cert cn={common_name} id={identifier}"),
            Effect::ConfigureSite { site, .. } => format!("configure site {site}"),
            Effect::PropagatePort { port } => format!("propagate port {port} to website"),
            Effect::ChownRecursive { path, owner, .. } => format!("chown -R {owner} {path}"),
        }
    }

    /// Status reports are advisory; everything else changes the system.
    pub fn is_status(&self) -> bool {
        matches!(self, Effect::SetStatus { .. })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effect_json_tagged() {
        let effect = Effect::OpenPort { port: 443 };
        let json = serde_json::to_string(&effect).unwrap();
        assert!(json.contains("\"type\":\"open_port\""));
        assert!(json.contains("443"));
    }

    #[test]
    fn render_template_roundtrip() {
        let effect = Effect::RenderTemplate {
            source: "settings.json.tmpl".to_string(),
            target: "/opt/etherpad-lite/settings.json".to_string(),
            perms: 0o644,
            owner: "www-data".to_string(),
            context: serde_json::json!({"db_host": "db1"}),
        };
        let json = serde_json::to_string(&effect).unwrap();
        let parsed: Effect = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, effect);
    }

    #[test]
    fn describe_is_short() {
        let effect = Effect::SetStatus {
            level: StatusLevel::Blocked,
            message: "waiting for database credentials".to_string(),
        };
        assert_eq!(
            effect.describe(),
            "status blocked: waiting for database credentials"
        );
        assert!(effect.is_status());
        assert!(!Effect::ClosePort { port: 80 }.is_status());
    }
}
