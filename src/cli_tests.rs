//! Tests for CLI parsing.

use super::*;
use rstest::rstest;

const REQUIRED: [&str; 5] = ["release-install", "-R", "cli/cli", "--tag", "v2.52.0"];

fn parse(extra: &[&str]) -> std::result::Result<Cli, clap::Error> {
    Cli::try_parse_from(REQUIRED.iter().chain(extra).copied())
}

#[test]
fn cli_parses_defaults() {
    let cli = parse(&[]).expect("valid arguments");
    assert_eq!(cli.repo, "cli/cli");
    assert_eq!(cli.tag, "v2.52.0");
    assert!(cli.patterns.is_empty());
    assert!(cli.dir.is_none());
    assert!(cli.token.is_none());
    assert!(cli.config.is_none());
    assert!(cli.max_depth.is_none());
    assert!(!cli.yes);
    assert!(!cli.dry_run);
    assert_eq!(cli.verbosity, 0);
    assert!(!cli.quiet);
}

#[rstest]
#[case::missing_repo(&["release-install", "--tag", "v1"])]
#[case::missing_tag(&["release-install", "-R", "a/b"])]
fn cli_requires_repo_and_tag(#[case] args: &[&str]) {
    assert!(Cli::try_parse_from(args).is_err());
}

#[test]
fn cli_parses_repeated_patterns_in_order() {
    let cli = parse(&["-p", "a$=x", "--pattern", "b$=y"]).expect("valid arguments");
    let rules = cli.rules().expect("rules");
    assert_eq!(
        rules,
        [
            ("a$".to_owned(), "x".to_owned()),
            ("b$".to_owned(), "y".to_owned()),
        ]
    );
}

#[rstest]
#[case::first_equals("a=b=c", "a", "b=c")]
#[case::empty_template("tool$=", "tool$", "")]
#[case::positional_template(r#"(\w+)-linux$={{index . "1"}}"#, r"(\w+)-linux$", r#"{{index . "1"}}"#)]
fn split_rule_uses_first_equals(#[case] value: &str, #[case] pattern: &str, #[case] template: &str) {
    assert_eq!(
        split_rule(value).expect("split"),
        (pattern.to_owned(), template.to_owned())
    );
}

#[test]
fn pattern_without_equals_is_rejected() {
    let cli = parse(&["-p", "linux$"]).expect("valid arguments");
    assert!(matches!(
        cli.rules(),
        Err(InstallerError::InvalidPatternArgument { .. })
    ));
}

#[test]
fn cli_parses_install_options() {
    let cli = parse(&[
        "-D",
        "/opt/bin",
        "--token",
        "secret",
        "--config",
        "/etc/ri.toml",
        "--max-depth",
        "4",
        "-y",
        "--dry-run",
    ])
    .expect("valid arguments");
    assert_eq!(cli.dir, Some(Utf8PathBuf::from("/opt/bin")));
    assert_eq!(cli.token.as_deref(), Some("secret"));
    assert_eq!(cli.config, Some(Utf8PathBuf::from("/etc/ri.toml")));
    assert_eq!(cli.max_depth, Some(4));
    assert!(cli.yes);
    assert!(cli.dry_run);
}

#[test]
fn cli_counts_verbosity() {
    let cli = parse(&["-vvv"]).expect("valid arguments");
    assert_eq!(cli.verbosity, 3);
}

#[test]
fn cli_rejects_quiet_with_verbose() {
    assert!(parse(&["-q", "-v"]).is_err());
}
