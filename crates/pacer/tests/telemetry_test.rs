//! Tests for subscriber installation.

use pacer::{TelemetryConfig, init_telemetry, init_telemetry_with_config};

#[test]
fn test_second_init_is_rejected() {
    let _ = init_telemetry_with_config(TelemetryConfig::default().with_json_logs(true));
    assert!(init_telemetry().is_err());
}
