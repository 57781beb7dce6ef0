//! Global subscriber installation. Kept in its own test binary since the
//! subscriber can only be installed once per process.

use primmesh_config::MesherConfig;
use primmesh_log::{LOG_FILE, init_logging};

#[test]
fn init_writes_json_log_and_refuses_reinstall() {
    let dir = tempfile::tempdir().unwrap();
    let log_dir = dir.path().join("logs");
    let mut config = MesherConfig::default();
    config.debug.log_level = "debug".to_string();

    init_logging(Some(&log_dir), true, Some(&config)).unwrap();
    tracing::error!(faces = 6, "meshed prim");

    let contents = std::fs::read_to_string(log_dir.join(LOG_FILE)).unwrap();
    let line = contents.lines().find(|l| l.contains("meshed prim")).unwrap();
    assert!(line.starts_with('{'));
    assert!(line.contains("\"faces\":6"));

    assert!(init_logging(None, false, None).is_err());
}
