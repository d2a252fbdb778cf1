// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use rstest::{fixture, rstest};
use serial_test::serial;

use super::*;

#[fixture]
fn registry() -> AppLookup {
    AppLookup::new(Path::new("/scif/apps"), Path::new("/scif/data"), "registry")
}

fn host(pairs: &[(&str, &str)]) -> EnvMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[rstest]
fn test_namespaced_keys(registry: AppLookup) {
    let vars: EnvMap = namespaced(&registry).into_iter().collect();
    assert_eq!(vars.len(), 12);
    assert_eq!(vars["SCIF_APPBIN_registry"], "/scif/apps/registry/bin");
    assert_eq!(vars["SCIF_APPNAME_registry"], "registry");
    assert_eq!(
        vars["SCIF_APPRECIPE_registry"],
        "/scif/apps/registry/scif/registry.scif"
    );
}

#[rstest]
fn test_active_keys(registry: AppLookup) {
    let vars: EnvMap = active(&registry).into_iter().collect();
    assert_eq!(vars.len(), 12);
    assert_eq!(vars["SCIF_APPROOT"], "/scif/apps/registry");
    assert_eq!(vars["SCIF_APPDATA"], "/scif/data/registry");
    assert!(vars.keys().all(|key| is_active_key(key)));
}

#[rstest]
#[case("SCIF_APPROOT", true)]
#[case("SCIF_APPNAME", true)]
#[case("SCIF_APPROOT_registry", false)]
#[case("SCIF_APPS", false)]
#[case("SCIF_BASE", false)]
#[case("APPROOT", false)]
fn test_is_active_key(#[case] key: &str, #[case] expected: bool) {
    assert_eq!(is_active_key(key), expected);
}

#[rstest]
#[case::appends("PATH", true, "/app/bin:/usr/bin")]
#[case::disabled("PATH", false, "/app/bin")]
#[case::not_a_path("FOO", true, "/app/bin")]
#[case::missing_on_host("PYTHONPATH", true, "/app/bin")]
fn test_append_path(#[case] key: &str, #[case] allow: bool, #[case] expected: &str) {
    let host_env = host(&[("PATH", "/usr/bin"), ("FOO", "bar")]);
    assert_eq!(append_path(key, "/app/bin", allow, &host_env), expected);
}

#[rstest]
fn test_resolve_is_idempotent() {
    let host_env = host(&[("PATH", "/usr/bin")]);
    let env = host(&[("PATH", "/scif/apps/a/bin"), ("SCIF_APPNAME", "a")]);

    let first = resolve(&env, true, &host_env);
    let second = resolve(&env, true, &host_env);
    assert_eq!(first, second);
    assert_eq!(first["PATH"], "/scif/apps/a/bin:/usr/bin");
    assert_eq!(first[PROMPT_VAR], PROMPT);
}

#[rstest]
fn test_parse_env_file() {
    let text = "# comment\n\nexport A=1\nB = two words\n=nokey\nnot a pair\nC=x=y\n";
    let pairs = parse_env_file(text);
    assert_eq!(
        pairs,
        vec![
            ("A".to_string(), "1".to_string()),
            ("B".to_string(), "two words".to_string()),
            ("C".to_string(), "x=y".to_string()),
        ]
    );
}

#[rstest]
fn test_noop_exporter_keeps_last() {
    let mut exporter = NoopExporter::default();
    let vars = host(&[("SCIF_APPNAME", "a")]);
    exporter.export(&vars).unwrap();
    assert_eq!(exporter.last, vars);
    exporter.export(&EnvMap::new()).unwrap();
    assert!(exporter.last.is_empty());
}

#[rstest]
#[serial]
fn test_process_exporter_restores_stale_keys() {
    let key = "SCIF_TEST_EXPORTER_VALUE";
    let mut exporter = ProcessExporter::new(EnvMap::new());

    exporter.export(&host(&[(key, "one")])).unwrap();
    assert_eq!(std::env::var(key).as_deref(), Ok("one"));

    exporter.export(&EnvMap::new()).unwrap();
    assert!(std::env::var(key).is_err(), "stale key should be removed");
}

#[rstest]
#[serial]
fn test_process_exporter_puts_back_host_value() {
    let key = "SCIF_TEST_EXPORTER_HOST";
    let mut exporter = ProcessExporter::new(host(&[(key, "original")]));

    exporter.export(&host(&[(key, "changed")])).unwrap();
    assert_eq!(std::env::var(key).as_deref(), Ok("changed"));

    exporter.export(&EnvMap::new()).unwrap();
    assert_eq!(std::env::var(key).as_deref(), Ok("original"));

    // SAFETY: serial test, no other thread reads the environment
    unsafe { std::env::remove_var(key) };
}
