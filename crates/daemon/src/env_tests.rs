// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

#[test]
#[serial]
fn state_dir_prefers_explicit_override() {
    std::env::set_var("AV_STATE_DIR", "/tmp/av-explicit");
    std::env::set_var("XDG_STATE_HOME", "/tmp/xdg");
    assert_eq!(state_dir().unwrap(), PathBuf::from("/tmp/av-explicit"));
    std::env::remove_var("AV_STATE_DIR");
    std::env::remove_var("XDG_STATE_HOME");
}

#[test]
#[serial]
fn state_dir_falls_back_to_xdg() {
    std::env::remove_var("AV_STATE_DIR");
    std::env::set_var("XDG_STATE_HOME", "/tmp/xdg");
    assert_eq!(state_dir().unwrap(), PathBuf::from("/tmp/xdg/av"));
    std::env::remove_var("XDG_STATE_HOME");
}

#[test]
#[serial]
fn poll_interval_default_and_override() {
    std::env::remove_var("AV_POLL_MS");
    assert_eq!(poll_interval(), Duration::from_secs(3));

    std::env::set_var("AV_POLL_MS", "250");
    assert_eq!(poll_interval(), Duration::from_millis(250));

    std::env::set_var("AV_POLL_MS", "0");
    assert_eq!(poll_interval(), Duration::from_secs(3));

    std::env::set_var("AV_POLL_MS", "soon");
    assert_eq!(poll_interval(), Duration::from_secs(3));
    std::env::remove_var("AV_POLL_MS");
}

#[test]
#[serial]
fn blank_config_override_is_ignored() {
    std::env::set_var("AV_CONFIG", "  ");
    assert_eq!(config_path(), None);

    std::env::set_var("AV_CONFIG", "/etc/av.toml");
    assert_eq!(config_path(), Some(PathBuf::from("/etc/av.toml")));
    std::env::remove_var("AV_CONFIG");
}
