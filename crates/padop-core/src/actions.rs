use crate::effect::Effect;
use crate::paths;
use crate::reconciler::{Action, ActionOutcome, ReconcileContext};
use crate::templates;
use crate::types::{Event, Flag, StatusLevel};

// ---------------------------------------------------------------------------
// Effect helpers
// ---------------------------------------------------------------------------

fn status(level: StatusLevel, message: impl Into<String>) -> Effect {
    Effect::SetStatus {
        level,
        message: message.into(),
    }
}

/// Restart the service if it is already running, otherwise start it.
/// Both branches go through `paths::SERVICE_NAME`; a diverging literal on
/// the restart path would silently restart nothing.
fn restart_or_start(running: bool) -> Effect {
    if running {
        Effect::RestartService {
            name: paths::SERVICE_NAME.to_string(),
        }
    } else {
        Effect::StartService {
            name: paths::SERVICE_NAME.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Action bodies
// ---------------------------------------------------------------------------

fn install_service_unit(_ctx: &ReconcileContext) -> ActionOutcome {
    ActionOutcome::done(vec![
        Effect::RenderTemplate {
            source: templates::SYSTEMD_UNIT_TMPL.to_string(),
            target: paths::SYSTEMD_UNIT_PATH.to_string(),
            perms: 0o644,
            owner: paths::ROOT_OWNER.to_string(),
            context: templates::systemd_unit_context(),
        },
        status(StatusLevel::Active, "etherpad systemd service ready"),
    ])
}

fn request_database(ctx: &ReconcileContext) -> ActionOutcome {
    // The relation conversation is cluster-wide; only the leader speaks.
    if !ctx.host.leader {
        return ActionOutcome::Skipped;
    }
    ActionOutcome::done(vec![
        status(
            StatusLevel::Maintenance,
            "requesting postgresql database for etherpad",
        ),
        Effect::RequestDatabase {
            name: "etherpad".to_string(),
        },
        status(StatusLevel::Active, "postgresql database requested"),
    ])
}

fn capture_db_credentials(ctx: &ReconcileContext) -> ActionOutcome {
    match &ctx.payloads.db {
        Some(creds) if creds.is_complete() => ActionOutcome::capture(
            creds.clone(),
            vec![status(StatusLevel::Active, "database credentials cached")],
        ),
        Some(_) => ActionOutcome::blocked("database credentials missing host, user, or password"),
        None => ActionOutcome::blocked("database master reported available without credentials"),
    }
}

fn write_app_config(ctx: &ReconcileContext) -> ActionOutcome {
    let Some(creds) = &ctx.facts.db else {
        return ActionOutcome::blocked("database credentials not cached yet");
    };

    let app_path = &ctx.config.app_path;
    let target = paths::settings_target(app_path);
    let stale_template = paths::settings_template(app_path);
    let ssl = ctx.facts.is_set(Flag::SslAvailable);

    ActionOutcome::done(vec![
        Effect::RemoveFile {
            path: target.display().to_string(),
        },
        Effect::RemoveFile {
            path: stale_template.display().to_string(),
        },
        Effect::RenderTemplate {
            source: templates::SETTINGS_TMPL.to_string(),
            target: target.display().to_string(),
            perms: 0o644,
            owner: paths::WEB_OWNER.to_string(),
            context: templates::settings_context(creds, ssl),
        },
        Effect::ChownRecursive {
            path: app_path.display().to_string(),
            owner: paths::WEB_OWNER.to_string(),
            group: paths::WEB_OWNER.to_string(),
        },
        restart_or_start(ctx.host.service_running),
        status(StatusLevel::Active, "etherpad initialized"),
    ])
}

fn request_server_cert(ctx: &ReconcileContext) -> ActionOutcome {
    // No completion flag: the request is re-sent whenever the identity is
    // known, and the provider treats repeats as idempotent.
    let Some(net) = &ctx.payloads.network else {
        // Report the missing identity on the relation's own event; other
        // passes stay quiet so ticks do not churn the status.
        if ctx.event == Event::CertificatesRelationJoined {
            return ActionOutcome::blocked("network identity not available");
        }
        return ActionOutcome::Skipped;
    };
    let identifier = match paths::cert_identifier(&net.unit_name) {
        Ok(id) => id,
        Err(e) => return ActionOutcome::blocked(e.to_string()),
    };
    ActionOutcome::done(vec![Effect::RequestServerCert {
        common_name: net.public_ip.clone(),
        sans: vec![
            net.public_ip.clone(),
            net.private_ip.clone(),
            net.hostname.clone(),
        ],
        identifier,
    }])
}

fn capture_server_cert(ctx: &ReconcileContext) -> ActionOutcome {
    match &ctx.payloads.cert {
        Some(material) if material.is_complete() => ActionOutcome::done(vec![
            Effect::RemoveFile {
                path: paths::SERVER_CERT_PATH.to_string(),
            },
            Effect::RemoveFile {
                path: paths::SERVER_KEY_PATH.to_string(),
            },
            Effect::WriteFile {
                path: paths::SERVER_CERT_PATH.to_string(),
                contents: material.cert.clone(),
                perms: 0o644,
                owner: paths::ROOT_OWNER.to_string(),
            },
            Effect::WriteFile {
                path: paths::SERVER_KEY_PATH.to_string(),
                contents: material.key.clone(),
                perms: 0o600,
                owner: paths::ROOT_OWNER.to_string(),
            },
            status(StatusLevel::Active, "server certificate installed"),
        ]),
        Some(_) => ActionOutcome::blocked("server certificate payload is empty"),
        None => ActionOutcome::blocked("server certificate reported ready without material"),
    }
}

fn configure_web_server(ctx: &ReconcileContext) -> ActionOutcome {
    let tls_port = ctx.config.tls_port;
    ActionOutcome::done(vec![
        status(StatusLevel::Maintenance, "configuring website"),
        Effect::ConfigureSite {
            site: templates::SITE_NAME.to_string(),
            template: templates::NGINX_SITE_TMPL.to_string(),
            cert_path: Some(paths::SERVER_CERT_PATH.to_string()),
            key_path: Some(paths::SERVER_KEY_PATH.to_string()),
            fqdn: ctx.config.fqdn.clone(),
        },
        Effect::OpenPort { port: tls_port },
        restart_or_start(ctx.host.service_running),
        status(
            StatusLevel::Active,
            format!("etherpad available on port {tls_port}"),
        ),
    ])
}

fn report_steady_state(ctx: &ReconcileContext) -> ActionOutcome {
    // Re-announced on every qualifying pass so later layers cannot leave
    // a stale status behind.
    let message = match &ctx.config.fqdn {
        Some(fqdn) => format!("etherpad available: https://{fqdn}"),
        None => "etherpad available".to_string(),
    };
    ActionOutcome::done(vec![status(StatusLevel::Active, message)])
}

fn propagate_website_port(ctx: &ReconcileContext) -> ActionOutcome {
    ActionOutcome::done(vec![Effect::PropagatePort {
        port: ctx.config.port,
    }])
}

// ---------------------------------------------------------------------------
// Action table (dependency order)
// ---------------------------------------------------------------------------

/// The full action table, held in topological order over the flag DAG.
/// A single pass down this table advances the unit as far as its facts
/// allow, so external event delivery order never matters.
pub fn action_table() -> Vec<Action> {
    vec![
        Action {
            id: "install-service-unit",
            requires: &[Flag::CodebaseReady],
            forbids: &[Flag::SystemdInstalled],
            completes: Some(Flag::SystemdInstalled),
            run: install_service_unit,
        },
        Action {
            id: "request-database",
            requires: &[Flag::DbConnected],
            forbids: &[Flag::DbRequested],
            completes: Some(Flag::DbRequested),
            run: request_database,
        },
        Action {
            id: "capture-db-credentials",
            requires: &[Flag::DbMasterAvailable],
            forbids: &[Flag::DbAvailable],
            completes: Some(Flag::DbAvailable),
            run: capture_db_credentials,
        },
        Action {
            id: "write-app-config",
            requires: &[Flag::DbAvailable, Flag::CodebaseReady, Flag::SystemdInstalled],
            forbids: &[Flag::Initialized],
            completes: Some(Flag::Initialized),
            run: write_app_config,
        },
        Action {
            id: "request-server-cert",
            requires: &[Flag::CertRelationAvailable],
            forbids: &[],
            completes: None,
            run: request_server_cert,
        },
        Action {
            id: "capture-server-cert",
            requires: &[Flag::ServerCertAvailable],
            forbids: &[Flag::SslAvailable],
            completes: Some(Flag::SslAvailable),
            run: capture_server_cert,
        },
        Action {
            id: "configure-web-server",
            requires: &[Flag::NginxAvailable, Flag::SslAvailable, Flag::Initialized],
            forbids: &[Flag::WebConfigured],
            completes: Some(Flag::WebConfigured),
            run: configure_web_server,
        },
        Action {
            id: "report-steady-state",
            requires: &[Flag::WebConfigured],
            forbids: &[],
            completes: None,
            run: report_steady_state,
        },
        Action {
            id: "propagate-website-port",
            requires: &[Flag::WebsiteAvailable],
            forbids: &[],
            completes: None,
            run: propagate_website_port,
        },
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn table_ids_are_unique() {
        let table = action_table();
        let ids: BTreeSet<_> = table.iter().map(|a| a.id).collect();
        assert_eq!(ids.len(), table.len());
    }

    #[test]
    fn every_completion_flag_has_exactly_one_producer() {
        let table = action_table();
        for flag in Flag::all().iter().filter(|f| f.is_completion()) {
            let producers = table
                .iter()
                .filter(|a| a.completes == Some(*flag))
                .count();
            assert_eq!(producers, 1, "flag {flag} should have one producer");
        }
    }

    #[test]
    fn completing_actions_forbid_their_own_flag() {
        for action in action_table() {
            if let Some(flag) = action.completes {
                assert!(
                    action.forbids.contains(&flag),
                    "{} must forbid its completion flag",
                    action.id
                );
            }
        }
    }

    #[test]
    fn table_is_topologically_ordered() {
        // A required completion flag must be produced by an earlier entry.
        let table = action_table();
        for (i, action) in table.iter().enumerate() {
            for req in action.requires.iter().filter(|f| f.is_completion()) {
                let producer = table
                    .iter()
                    .position(|a| a.completes == Some(*req))
                    .unwrap_or_else(|| panic!("no producer for {req}"));
                assert!(
                    producer < i,
                    "{} requires {} which is produced later in the table",
                    action.id,
                    req
                );
            }
        }
    }

    #[test]
    fn restart_branch_uses_the_service_name_constant() {
        match restart_or_start(true) {
            Effect::RestartService { name } => assert_eq!(name, paths::SERVICE_NAME),
            other => panic!("expected restart, got {other:?}"),
        }
        match restart_or_start(false) {
            Effect::StartService { name } => assert_eq!(name, paths::SERVICE_NAME),
            other => panic!("expected start, got {other:?}"),
        }
    }
}
