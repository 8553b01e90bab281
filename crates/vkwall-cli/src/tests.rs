use std::path::PathBuf;

use chrono::NaiveDate;

use super::*;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["vkwall"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_collect_with_repeated_groups() {
    let cli = Cli::try_parse_from([
        "vkwall",
        "collect",
        "--group",
        "example_group",
        "-g",
        "-4492108",
        "--from",
        "2024-03-01",
        "--to",
        "2024-03-31",
    ])
    .expect("expected valid cli args");

    let Some(Commands::Collect(args)) = cli.command else {
        panic!("expected collect command");
    };
    assert_eq!(args.groups, vec!["example_group", "-4492108"]);
    assert_eq!(args.from, day(2024, 3, 1));
    assert_eq!(args.to, day(2024, 3, 31));
    assert!(args.groups_file.is_none());
    assert!(args.output.is_none());
    assert!(!args.dry_run);
}

#[test]
fn parses_collect_with_file_output_and_dry_run() {
    let cli = Cli::try_parse_from([
        "vkwall",
        "collect",
        "--groups-file",
        "groups.txt",
        "--from",
        "2024-01-01",
        "--to",
        "2024-01-02",
        "--output",
        "reports",
        "--dry-run",
    ])
    .expect("expected valid cli args");

    let Some(Commands::Collect(args)) = cli.command else {
        panic!("expected collect command");
    };
    assert!(args.groups.is_empty());
    assert_eq!(args.groups_file, Some(PathBuf::from("groups.txt")));
    assert_eq!(args.output, Some(PathBuf::from("reports")));
    assert!(args.dry_run);
}

#[test]
fn collect_requires_window() {
    let result = Cli::try_parse_from(["vkwall", "collect", "--group", "x", "--from", "2024-01-01"]);
    assert!(result.is_err());
}

#[test]
fn collect_rejects_malformed_date() {
    let result = Cli::try_parse_from([
        "vkwall", "collect", "--group", "x", "--from", "01.03.2024", "--to", "2024-03-31",
    ]);
    assert!(result.is_err());
}

#[test]
fn parses_token_check_with_remember() {
    let cli = Cli::try_parse_from(["vkwall", "token", "check", "abc123", "--remember"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Token {
            command: TokenCommands::Check {
                token: Some(ref t),
                remember: true
            }
        }) if t == "abc123"
    ));
}

#[test]
fn parses_token_check_without_argument() {
    let cli = Cli::try_parse_from(["vkwall", "token", "check"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Token {
            command: TokenCommands::Check {
                token: None,
                remember: false
            }
        })
    ));
}

#[test]
fn parses_token_clear() {
    let cli = Cli::try_parse_from(["vkwall", "token", "clear"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Token {
            command: TokenCommands::Clear
        })
    ));
}

#[test]
fn parses_settings() {
    let cli = Cli::try_parse_from(["vkwall", "settings"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::Settings)));
}
