// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

use rstest::{fixture, rstest};
use tempfile::TempDir;

use super::*;
use crate::recipe;

const RECIPE: &str = "%apprun foo\necho foo\n%appenv foo\nFOO_HOME=/opt/foo\n%apprun bar\necho bar\n";

#[fixture]
fn tmp() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

fn client_in(tmp: &TempDir) -> ScifClient {
    let settings = ScifSettings::with_base(tmp.path().join("scif"));
    let host = EnvMap::from([("PATH".to_string(), "/usr/bin".to_string())]);
    let mut client = ScifClient::detached(settings, host);
    client
        .set_config(recipe::parse(RECIPE).unwrap())
        .expect("config should load");
    client
}

#[rstest]
fn test_new_client_defaults(tmp: TempDir) {
    let client = ScifClient::detached(ScifSettings::with_base(tmp.path()), EnvMap::new());
    assert_eq!(client.active_app(), None);
    assert_eq!(client.entry_point(), ["/bin/bash"]);
    assert_eq!(client.entry_folder(), None);
    assert!(client.apps().is_empty());
    assert!(client.env().contains_key("SCIF_BASE"));
}

#[rstest]
fn test_lookup_unknown_app(tmp: TempDir) {
    let client = client_in(&tmp);
    let err = client.lookup("fo").unwrap_err();
    match err {
        Error::UnknownApp { name, similar } => {
            assert_eq!(name, "fo");
            assert_eq!(similar, vec!["foo"]);
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[rstest]
fn test_init_env_namespaces_every_app(tmp: TempDir) {
    let client = client_in(&tmp);
    let env = client.env();
    assert!(env.contains_key("SCIF_APPROOT_foo"));
    assert!(env.contains_key("SCIF_APPROOT_bar"));
    assert!(env.contains_key("SCIF_APPS"));
    assert!(env.keys().all(|key| !environment::is_active_key(key)));
}

#[rstest]
fn test_init_env_subset(tmp: TempDir) {
    let mut client = client_in(&tmp);
    client.init_env(&["bar".to_string()]).unwrap();
    assert!(client.env().contains_key("SCIF_APPROOT_bar"));
    assert!(!client.env().contains_key("SCIF_APPROOT_foo"));
    assert!(client.init_env(&["nope".to_string()]).is_err());
}

#[rstest]
fn test_activate_sets_active_view(tmp: TempDir) {
    let mut client = client_in(&tmp);
    client.activate("foo").unwrap();

    let lookup = client.lookup("foo").unwrap();
    assert_eq!(client.active_app(), Some("foo"));
    assert_eq!(client.env()["SCIF_APPNAME"], "foo");
    assert_eq!(client.env()["PATH"], lookup.appbin.display().to_string());
    assert_eq!(client.entry_folder(), Some(lookup.approot.as_path()));
    // nothing is installed, so there is no runscript to run
    assert_eq!(client.entry_point(), ["/bin/bash"]);

    let resolved = client.resolved_env();
    assert_eq!(resolved["PATH"], format!("{}:/usr/bin", lookup.appbin.display()));
    assert_eq!(resolved[environment::PROMPT_VAR], environment::PROMPT);
}

#[rstest]
fn test_activate_reads_installed_files(tmp: TempDir) {
    let mut client = client_in(&tmp);
    let lookup = client.lookup("foo").unwrap();
    std::fs::create_dir_all(&lookup.appmeta).unwrap();
    std::fs::write(&lookup.apprun, "echo foo\n").unwrap();
    std::fs::write(&lookup.appenv, "FOO_HOME=/opt/foo\n# note\nbroken line\n").unwrap();

    client.activate("foo").unwrap();
    assert_eq!(
        client.entry_point(),
        ["/bin/bash".to_string(), lookup.apprun.display().to_string()]
    );
    assert_eq!(client.env()["FOO_HOME"], "/opt/foo");
}

#[rstest]
fn test_activation_symmetry(tmp: TempDir) {
    let mut client = client_in(&tmp);
    let entry_point = client.entry_point().to_vec();
    let entry_folder = client.entry_folder().map(Path::to_path_buf);
    let before = client.env().clone();

    client.activate("foo").unwrap();
    client.deactivate().unwrap();

    assert_eq!(client.active_app(), None);
    assert_eq!(client.entry_point(), entry_point);
    assert_eq!(client.entry_folder().map(Path::to_path_buf), entry_folder);
    assert_eq!(client.env(), &before);
    assert!(client.env().keys().all(|key| !environment::is_active_key(key)));
}

#[rstest]
fn test_activate_replaces_previous_app(tmp: TempDir) {
    let mut client = client_in(&tmp);
    client.activate("foo").unwrap();
    client.activate("bar").unwrap();

    assert_eq!(client.active_app(), Some("bar"));
    assert_eq!(client.env()["SCIF_APPNAME"], "bar");
    assert!(!client.env().contains_key("FOO_HOME"));
}

#[rstest]
fn test_entry_folder_override(tmp: TempDir) {
    let mut settings = ScifSettings::with_base(tmp.path().join("scif"));
    settings.entry_folder = Some(tmp.path().to_path_buf());
    let mut client = ScifClient::detached(settings, EnvMap::new());
    client.set_config(recipe::parse(RECIPE).unwrap()).unwrap();

    client.activate("bar").unwrap();
    assert_eq!(client.entry_folder(), Some(tmp.path()));
}

#[rstest]
fn test_activate_unknown_app_keeps_state(tmp: TempDir) {
    let mut client = client_in(&tmp);
    client.activate("foo").unwrap();
    assert!(client.activate("nope").is_err());
    assert_eq!(client.active_app(), Some("foo"));
}

#[rstest]
fn test_load_dispatch(tmp: TempDir) {
    let mut client = client_in(&tmp);

    let recipe_path = tmp.path().join("other.scif");
    std::fs::write(&recipe_path, "%apprun other\necho other\n").unwrap();
    client.load(Some(recipe_path.as_path())).unwrap();
    assert_eq!(client.apps(), vec!["other"]);

    client.load(Some(tmp.path().join("missing").as_path())).unwrap();
    assert!(client.apps().is_empty());

    let installed = tmp.path().join("installed");
    let meta = installed.join("apps").join("kept").join("scif");
    std::fs::create_dir_all(&meta).unwrap();
    std::fs::write(meta.join("kept.scif"), "%apprun kept\necho kept\n").unwrap();
    client.load(Some(installed.as_path())).unwrap();
    assert_eq!(client.apps(), vec!["kept"]);
}

#[rstest]
fn test_load_resets_activation(tmp: TempDir) {
    let mut client = client_in(&tmp);
    client.activate("foo").unwrap();
    client.load(Some(tmp.path().join("missing").as_path())).unwrap();

    assert_eq!(client.active_app(), None);
    assert!(!client.env().contains_key("SCIF_APPNAME"));
}
