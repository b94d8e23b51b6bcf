//! Unit tests for CLI commands

use crate::cli::{Cli, Commands};
use clap::Parser;
use std::path::PathBuf;

#[test]
fn test_generate_with_dir() {
    let cli = Cli::try_parse_from(["modgen", "generate", "--dir", "modules"]).unwrap();

    match cli.command {
        Commands::Generate { inputs } => {
            let (source, destination) = inputs.roots().unwrap();
            assert_eq!(source, PathBuf::from("modules"));
            assert_eq!(destination, PathBuf::from("modules"));
        }
        _ => panic!("Expected Generate command"),
    }
}

#[test]
fn test_generate_with_source_and_destination() {
    let cli = Cli::try_parse_from([
        "modgen",
        "generate",
        "--source",
        "src/modules",
        "--destination",
        "build/modules",
        "--jobs",
        "4",
        "--settings",
        "modgen.toml",
    ])
    .unwrap();

    match cli.command {
        Commands::Generate { inputs } => {
            let (source, destination) = inputs.roots().unwrap();
            assert_eq!(source, PathBuf::from("src/modules"));
            assert_eq!(destination, PathBuf::from("build/modules"));
            assert_eq!(inputs.jobs, Some(4));
            assert_eq!(inputs.settings, Some(PathBuf::from("modgen.toml")));
        }
        _ => panic!("Expected Generate command"),
    }
}

#[test]
fn test_destination_defaults_to_source() {
    let cli = Cli::try_parse_from(["modgen", "check", "--source", "modules"]).unwrap();

    match cli.command {
        Commands::Check { inputs } => {
            let (_, destination) = inputs.roots().unwrap();
            assert_eq!(destination, PathBuf::from("modules"));
        }
        _ => panic!("Expected Check command"),
    }
}

#[test]
fn test_check_accepts_variable_template() {
    let cli = Cli::try_parse_from([
        "modgen",
        "check",
        "--dir",
        "modules",
        "--variable-template",
        "variable/variable._hpp",
    ])
    .unwrap();

    match cli.command {
        Commands::Check { inputs } => {
            assert_eq!(
                inputs.variable_template,
                Some(PathBuf::from("variable/variable._hpp"))
            );
        }
        _ => panic!("Expected Check command"),
    }
}

#[test]
fn test_source_root_is_required() {
    assert!(Cli::try_parse_from(["modgen", "generate"]).is_err());
}

#[test]
fn test_dir_conflicts_with_source() {
    let result = Cli::try_parse_from([
        "modgen",
        "generate",
        "--dir",
        "a",
        "--source",
        "b",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_unknown_command_is_rejected() {
    assert!(Cli::try_parse_from(["modgen", "serve", "--dir", "a"]).is_err());
}
