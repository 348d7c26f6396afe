#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use chrono::{DateTime, TimeZone, Utc};
use shoplytics::db::repositories::LocalRepository;
use shoplytics::db::seed::{DemoConfig, DemoDataset};
use shoplytics::models::TenantId;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Variables read by the config and factory layers.
pub const CONFIG_VARS: &[&str] = &[
    "REPOSITORY_TYPE",
    "DATABASE_URL",
    "PG_DATABASE_URL",
    "SHOPLYTICS_TENANT",
    "FORECAST_ALPHA",
    "FORECAST_HORIZON",
    "SHOPLYTICS_SEED_DEMO",
];

/// Runs `f` with environment variables temporarily modified.
///
/// Access to the process environment is serialized and the previous values
/// are restored on drop, including on panic.
///
/// `Some(v)` sets a variable, `None` removes it.
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let _guard = ScopedEnv::apply(changes);
    f()
}

/// [`with_scoped_env`] starting from a clean slate of [`CONFIG_VARS`].
pub fn with_clean_config_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let mut all: Vec<(&str, Option<&str>)> = CONFIG_VARS
        .iter()
        .filter(|k| !changes.iter().any(|(c, _)| c == *k))
        .map(|k| (*k, None))
        .collect();
    all.extend_from_slice(changes);
    with_scoped_env(&all, f)
}

struct ScopedEnv {
    saved: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn apply(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let saved = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { saved }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.saved.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

/// Reference "today" for generated data.
pub fn today() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 30, 12, 0, 0).unwrap()
}

pub fn demo_tenant() -> TenantId {
    TenantId::new("tenant_demo")
}

/// Small generated storefront, loaded into a fresh local repository.
pub fn demo_repo() -> (LocalRepository, DemoDataset) {
    demo_repo_at(today())
}

/// [`demo_repo`] with the history ending on the day of `now`.
pub fn demo_repo_at(now: DateTime<Utc>) -> (LocalRepository, DemoDataset) {
    let config = DemoConfig {
        tenant_id: demo_tenant(),
        products: 12,
        customers: 80,
        months: 6,
        signup_span_days: 150,
        ..DemoConfig::default()
    };
    let dataset = DemoDataset::generate(&config, now);
    let repo = LocalRepository::new();
    repo.load_dataset(&dataset);
    (repo, dataset)
}
