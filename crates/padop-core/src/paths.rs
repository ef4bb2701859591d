use crate::error::{PadopError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Unit-state constants
// ---------------------------------------------------------------------------

pub const PADOP_DIR: &str = ".padop";
pub const CONFIG_FILE: &str = ".padop/config.yaml";
pub const FACTS_FILE: &str = ".padop/facts.yaml";

// ---------------------------------------------------------------------------
// System constants
// ---------------------------------------------------------------------------

/// The one service name used for start and restart alike. The restart
/// branch must never reference a different literal than the start branch.
pub const SERVICE_NAME: &str = "etherpad";

pub const SYSTEMD_UNIT_PATH: &str = "/etc/systemd/system/etherpad.service";
pub const SERVER_CERT_PATH: &str = "/etc/ssl/etherpad/server.crt";
pub const SERVER_KEY_PATH: &str = "/etc/ssl/etherpad/server.key";

pub const WEB_OWNER: &str = "www-data";
pub const ROOT_OWNER: &str = "root";

pub const SETTINGS_FILE: &str = "settings.json";
pub const SETTINGS_TEMPLATE_FILE: &str = "settings.json.template";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn facts_path(root: &Path) -> PathBuf {
    root.join(FACTS_FILE)
}

pub fn padop_dir(root: &Path) -> PathBuf {
    root.join(PADOP_DIR)
}

/// Rendered application settings, under the configured app path.
pub fn settings_target(app_path: &Path) -> PathBuf {
    app_path.join(SETTINGS_FILE)
}

/// Leftover upstream settings template, removed alongside the target.
pub fn settings_template(app_path: &Path) -> PathBuf {
    app_path.join(SETTINGS_TEMPLATE_FILE)
}

// ---------------------------------------------------------------------------
// Certificate identifier
// ---------------------------------------------------------------------------

static UNIT_NAME_RE: OnceLock<Regex> = OnceLock::new();

fn unit_name_re() -> &'static Regex {
    UNIT_NAME_RE.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9\-]*/[0-9]+$").unwrap())
}

/// Derive a path-safe certificate identifier from a unit name
/// (`etherpad/0` becomes `etherpad_0`).
pub fn cert_identifier(unit_name: &str) -> Result<String> {
    if !unit_name_re().is_match(unit_name) {
        return Err(PadopError::InvalidUnitName(unit_name.to_string()));
    }
    Ok(unit_name.replace('/', "_"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
