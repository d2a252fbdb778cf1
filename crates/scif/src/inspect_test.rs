// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

use rstest::{fixture, rstest};
use tempfile::TempDir;

use super::*;
use crate::defaults::ScifSettings;
use crate::environment::EnvMap;

const RECIPE: &str = "\
%apprun hello-world
echo hello
%apphelp hello-world
Prints a greeting.
%applabels hello-world
VERSION 1.0
%apptest hello-world
exit 0
%apprun goodbye
echo bye
";

#[fixture]
fn loaded() -> (TempDir, ScifClient) {
    let tmp = TempDir::new().unwrap();
    let settings = ScifSettings::with_base(tmp.path().join("scif"));
    let mut client = ScifClient::detached(settings, EnvMap::new());
    client
        .set_config(recipe::parse(RECIPE).unwrap())
        .expect("config should load");
    (tmp, client)
}

#[rstest]
#[case::everything(InspectSelection::all(), 7)]
#[case::nothing(InspectSelection::default(), 0)]
#[case::runscript_brings_help(InspectSelection { runscript: true, ..Default::default() }, 2)]
#[case::labels(InspectSelection { labels: true, ..Default::default() }, 1)]
fn test_selection_kinds(#[case] selection: InspectSelection, #[case] expected: usize) {
    assert_eq!(selection.kinds().len(), expected);
}

#[rstest]
#[case("text", InspectFormat::Text)]
#[case("JSON", InspectFormat::Json)]
#[case("yaml", InspectFormat::Yaml)]
fn test_format_from_str(#[case] text: &str, #[case] expected: InspectFormat) {
    assert_eq!(text.parse::<InspectFormat>().unwrap(), expected);
}

#[rstest]
fn test_list_apps(loaded: (TempDir, ScifClient)) {
    let (_tmp, client) = loaded;
    assert_eq!(client.list_apps(false).unwrap(), "hello-world\ngoodbye\n");

    let long = client.list_apps(true).unwrap();
    let first = long.lines().next().unwrap();
    assert!(first.starts_with("hello-world "));
    assert!(first.ends_with("apps/hello-world"));
}

#[rstest]
fn test_list_apps_empty() {
    let client = ScifClient::detached(ScifSettings::with_base("/nonexistent"), EnvMap::new());
    assert_eq!(client.list_apps(true).unwrap(), "");
}

#[rstest]
fn test_inspect_text(loaded: (TempDir, ScifClient)) {
    let (_tmp, client) = loaded;
    let selection = InspectSelection {
        labels: true,
        ..Default::default()
    };
    let text = client
        .inspect("hello-world", &selection, InspectFormat::Text)
        .unwrap();
    assert_eq!(text, "%applabels hello-world\nVERSION 1.0\n");
}

#[rstest]
fn test_inspect_json(loaded: (TempDir, ScifClient)) {
    let (_tmp, client) = loaded;
    let selection = InspectSelection {
        runscript: true,
        ..Default::default()
    };
    let text = client
        .inspect("hello-world", &selection, InspectFormat::Json)
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();

    assert_eq!(value["data"]["id"], "hello-world");
    assert_eq!(value["data"]["type"], "app");
    let attributes = value["data"]["attributes"].as_object().unwrap();
    assert_eq!(attributes.len(), 2);
    assert_eq!(attributes["runscript"][0], "echo hello");
    assert_eq!(attributes["help"][0], "Prints a greeting.");
}

#[rstest]
fn test_inspect_yaml(loaded: (TempDir, ScifClient)) {
    let (_tmp, client) = loaded;
    let text = client
        .inspect("goodbye", &InspectSelection::all(), InspectFormat::Yaml)
        .unwrap();
    let value: serde_yaml::Value = serde_yaml::from_str(&text).unwrap();
    assert_eq!(value["data"]["attributes"]["runscript"][0], "echo bye");
}

#[rstest]
fn test_inspect_unknown_app_is_empty(loaded: (TempDir, ScifClient)) {
    let (_tmp, client) = loaded;
    let text = client
        .inspect("nope", &InspectSelection::all(), InspectFormat::Json)
        .unwrap();
    assert!(text.is_empty());
}

#[rstest]
fn test_help_requires_installed_file(loaded: (TempDir, ScifClient)) {
    let (_tmp, client) = loaded;
    assert_eq!(client.help("hello-world").unwrap(), "");

    let lookup = client.lookup("hello-world").unwrap();
    std::fs::create_dir_all(&lookup.appmeta).unwrap();
    std::fs::write(&lookup.apphelp, "Prints a greeting.\n").unwrap();
    assert_eq!(client.help("hello-world").unwrap(), "Prints a greeting.\n");

    assert!(client.help("missing").is_err());
}
