// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

use rstest::rstest;

use super::*;

fn foo_is_bar(key: &str) -> Option<String> {
    match key {
        "FOO" => Some("bar".to_string()),
        "OMG" => Some("TACOS".to_string()),
        _ => None,
    }
}

#[rstest]
#[case("echo hello", &["echo", "hello"])]
#[case("echo [e]FOO", &["echo", "bar"])]
#[case("echo vanilla [out] icecream", &["echo", "vanilla", ">", "icecream"])]
#[case("blaa [in] bloo", &["blaa", "<", "bloo"])]
#[case("cat man [pipe] grep batman", &["cat", "man", "|", "grep", "batman"])]
#[case("cat man [append] grep batman", &["cat", "man", "|", "grep", "batman"])]
#[case("echo '[e]OMG rocks'", &["echo", "TACOS rocks"])]
fn test_parse_entrypoint(#[case] original: &str, #[case] expected: &[&str]) {
    let parsed = parse_entrypoint_with(original, foo_is_bar).expect("should parse");
    assert_eq!(parsed, expected);
}

#[rstest]
fn test_pipe_and_append_are_aliases() {
    assert_eq!(
        parse_entrypoint_with("a [pipe] b", foo_is_bar).unwrap(),
        parse_entrypoint_with("a [append] b", foo_is_bar).unwrap()
    );
}

#[rstest]
fn test_out_token() {
    assert_eq!(
        parse_entrypoint_with("a [out] b", foo_is_bar).unwrap(),
        vec!["a", ">", "b"]
    );
}

#[rstest]
fn test_split_does_not_expand() {
    let words = split_entrypoint("echo [e]FOO \"two words\"").unwrap();
    assert_eq!(words, vec!["echo", "$FOO", "two words"]);
}

#[rstest]
fn test_unbalanced_quotes_are_rejected() {
    let err = split_entrypoint("echo 'oops").unwrap_err();
    assert!(matches!(err, Error::InvalidEntrypoint { .. }));
}

#[rstest]
#[case(&["echo", "hello"], &["echo", "hello"])]
#[case(&["echo", "[e]OMG"], &["echo", "TACOS"])]
#[case(&["[out]"], &[">"])]
#[case(&["[in]"], &["<"])]
#[case(&["[pipe]"], &["|"])]
#[case(&["[append]"], &["|"])]
#[case(&["[e]{FOO}-suffix"], &["bar-suffix"])]
fn test_parse_entrypoint_list(#[case] original: &[&str], #[case] expected: &[&str]) {
    assert_eq!(parse_entrypoint_list_with(original, foo_is_bar), expected);
}

#[rstest]
fn test_unknown_variables_expand_to_empty() {
    assert_eq!(expand_with("x$NOPE-y", foo_is_bar), "x-y");
}

#[rstest]
fn test_substitute_leaves_other_brackets() {
    assert_eq!(substitute("[e]A [x] [in]"), "$A [x] <");
}
