//! Structured Logging Setup via tracing-subscriber
//!
//! Konfigurierbar per Umgebungsvariable, die Vorrang vor der Datei hat:
//! - `SSO_LOG_LEVEL`: Filter-Direktive (z.B. `info` oder `sso_auth=debug`)
//! - `SSO_LOG_FORMAT`: Format (text/json)

use tracing_subscriber::{fmt, EnvFilter};

const ENV_LEVEL: &str = "SSO_LOG_LEVEL";
const ENV_FORMAT: &str = "SSO_LOG_FORMAT";

/// Initialisiert das Logging-System.
///
/// `level` und `format` stammen aus der Konfigurationsdatei und werden nur
/// verwendet, wenn die Umgebungsvariablen nicht gesetzt sind.
pub fn logging_initialisieren(level: &str, format: &str) {
    let filter = EnvFilter::try_from_env(ENV_LEVEL)
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    match log_format(format).as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .with_current_span(true)
                .init();
        }
        _ => {
            fmt().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Format aus der Umgebung, sonst der uebergebene Wert
fn log_format(standard: &str) -> String {
    std::env::var(ENV_FORMAT).unwrap_or_else(|_| standard.to_string())
}

/// Validiert ob ein Log-Format-String gueltig ist.
pub fn log_format_gueltig(format: &str) -> bool {
    matches!(format, "text" | "json")
}
