use crate::paths;
use crate::relations::DbCredentials;
use serde_json::{json, Value};

// ---------------------------------------------------------------------------
// Template names
// ---------------------------------------------------------------------------

pub const SYSTEMD_UNIT_TMPL: &str = "etherpad.service.tmpl";
pub const SETTINGS_TMPL: &str = "settings.json.tmpl";
pub const NGINX_SITE_TMPL: &str = "etherpad.nginx.tmpl";

pub const SITE_NAME: &str = "etherpad";

// ---------------------------------------------------------------------------
// Context builders
// ---------------------------------------------------------------------------

/// Context for the application settings file: the five credential fields,
/// plus certificate paths once TLS material has been persisted.
pub fn settings_context(creds: &DbCredentials, ssl: bool) -> Value {
    let mut ctx = serde_json::Map::new();
    ctx.insert("db_name".to_string(), json!(creds.dbname));
    ctx.insert("db_host".to_string(), json!(creds.host));
    ctx.insert("db_port".to_string(), json!(creds.port));
    ctx.insert("db_user".to_string(), json!(creds.user));
    ctx.insert("db_pass".to_string(), json!(creds.password));
    if ssl {
        ctx.insert("cert_path".to_string(), json!(paths::SERVER_CERT_PATH));
        ctx.insert("key_path".to_string(), json!(paths::SERVER_KEY_PATH));
    }
    Value::Object(ctx)
}

/// The service unit is static; the template carries everything.
pub fn systemd_unit_context() -> Value {
    json!({})
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
