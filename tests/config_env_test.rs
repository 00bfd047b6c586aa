//! NTREE_* environment overrides.
//!
//! Kept in its own test binary: the process environment is shared by all
//! tests of one binary, so every test here holds `ENV_LOCK`.

use std::env;
use std::fs;
use std::sync::{Mutex, MutexGuard};

use rstest::rstest;
use tempfile::TempDir;

use ntree::config::{Settings, SettingsError};
use ntree::domain::Order;

static ENV_LOCK: Mutex<()> = Mutex::new(());

const VARS: [&str; 4] = ["NTREE_ORDER", "NTREE_DELIMITER", "NTREE_INDENT", "NTREE_COLOR"];

fn lock_env() -> MutexGuard<'static, ()> {
    let guard = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    for var in VARS {
        env::remove_var(var);
    }
    guard
}

#[test]
fn given_env_vars_when_loading_then_override_config_files() {
    let _guard = lock_env();
    let temp = TempDir::new().unwrap();
    let explicit = temp.path().join("explicit.toml");
    fs::write(&explicit, "order = \"bfs\"\ndelimiter = \",\"\nindent = 2\n").unwrap();

    env::set_var("NTREE_ORDER", "dfs");
    env::set_var("NTREE_INDENT", "4");
    env::set_var("NTREE_COLOR", "false");
    let settings = Settings::load_from(None, Some(explicit.as_path()));
    for var in VARS {
        env::remove_var(var);
    }
    let settings = settings.unwrap();

    assert_eq!(settings.order, Order::DepthFirst);
    assert_eq!(settings.indent, 4);
    assert!(!settings.color);
    assert_eq!(settings.delimiter, ",", "no env var, file value kept");
}

#[rstest]
#[case("NTREE_ORDER", "sideways", "order")]
#[case("NTREE_INDENT", "abc", "indent")]
#[case("NTREE_INDENT", "-3", "indent")]
#[case("NTREE_INDENT", "0", "indent")]
#[case("NTREE_COLOR", "perhaps", "color")]
fn given_unconvertible_env_value_when_loading_then_fails_with_invalid_key(
    #[case] var: &str,
    #[case] value: &str,
    #[case] key: &str,
) {
    let _guard = lock_env();

    env::set_var(var, value);
    let result = Settings::load_from(None, None);
    env::remove_var(var);

    match result {
        Err(SettingsError::Invalid { key: actual, .. }) => assert_eq!(actual, key),
        other => panic!("expected invalid {key}, got {other:?}"),
    }
}
