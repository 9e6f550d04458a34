// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::error::ErrorKind;
use clap::FromArgMatches;
use yare::parameterized;

use super::{cli_command, format_error, Cli, Commands, OutputFormat};

fn parse(args: &[&str]) -> Cli {
    let matches = cli_command().try_get_matches_from(args).unwrap();
    Cli::from_arg_matches(&matches).unwrap()
}

#[test]
fn version_long() {
    let err = cli_command()
        .try_get_matches_from(["av", "--version"])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DisplayVersion);
}

#[test]
fn no_subcommand_parses() {
    assert!(parse(&["av"]).command.is_none());
}

#[parameterized(
    short_before = { &["av", "-o", "json", "list"] },
    long_after = { &["av", "list", "--output", "json"] },
)]
fn output_flag_is_global(args: &[&str]) {
    let cli = parse(args);
    assert_eq!(cli.output, OutputFormat::Json);
    assert!(matches!(cli.command, Some(Commands::List)));
}

#[test]
fn spawn_takes_path_and_prompt() {
    let cli = parse(&["av", "spawn", "~/work/app", "fix the login bug"]);
    let Some(Commands::Spawn {
        project_path,
        prompt,
    }) = cli.command
    else {
        panic!("expected spawn");
    };
    assert_eq!(project_path, "~/work/app");
    assert_eq!(prompt, "fix the login bug");
}

#[test]
fn send_accepts_message_or_key() {
    let cli = parse(&["av", "send", "agent-a", "run the tests"]);
    assert!(matches!(
        cli.command,
        Some(Commands::Send { ref message, key: None, .. }) if message.as_deref() == Some("run the tests")
    ));

    let cli = parse(&["av", "send", "agent-a", "--key", "Escape"]);
    assert!(matches!(
        cli.command,
        Some(Commands::Send { message: None, ref key, .. }) if key.as_deref() == Some("Escape")
    ));
}

#[test]
fn send_rejects_unsupported_key() {
    let err = cli_command()
        .try_get_matches_from(["av", "send", "agent-a", "--key", "Tab"])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidValue);
}

#[test]
fn cleanup_name_conflicts_with_completed() {
    let err = cli_command()
        .try_get_matches_from(["av", "cleanup", "agent-a", "--completed"])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ArgumentConflict);

    let cli = parse(&["av", "cleanup", "--completed"]);
    assert!(matches!(
        cli.command,
        Some(Commands::Cleanup {
            name: None,
            completed: true
        })
    ));
}

#[test]
fn peek_raw_flag() {
    let cli = parse(&["av", "peek", "agent-a", "--raw"]);
    assert!(matches!(cli.command, Some(Commands::Peek { raw: true, .. })));
}

#[parameterized(
    kill_idle = { "kill-idle" },
    notify_test = { "notify-test" },
    projects = { "projects" },
    watch = { "watch" },
)]
fn kebab_case_subcommands(name: &str) {
    assert!(parse(&["av", name]).command.is_some());
}

#[test]
fn format_error_skips_redundant_chain() {
    let inner = std::io::Error::other("socket gone");
    let err = anyhow::Error::new(inner).context("request failed: socket gone");
    assert_eq!(format_error(&err), "request failed: socket gone");
}

#[test]
fn format_error_renders_distinct_causes() {
    let inner = std::io::Error::other("socket gone");
    let err = anyhow::Error::new(inner).context("request failed");
    assert_eq!(
        format_error(&err),
        "request failed\n\nCaused by:\n    0: socket gone"
    );
}
