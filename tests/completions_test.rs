#![cfg(feature = "cli")]
//! Integration tests for `drill completions`.

use clap::CommandFactory;
use driller::cli::app::Cli;

fn generate_completions(shell: clap_complete::Shell) -> String {
    let mut cmd = Cli::command();
    let mut buf = Vec::new();
    clap_complete::generate(shell, &mut cmd, "drill", &mut buf);
    String::from_utf8(buf).expect("completions should be valid UTF-8")
}

#[test]
fn bash_completions_contain_subcommands() {
    let output = generate_completions(clap_complete::Shell::Bash);
    assert!(!output.is_empty());
    assert!(output.contains("drill"));
    assert!(output.contains("tables"));
    assert!(output.contains("extract"));
    assert!(output.contains("rows"));
    assert!(output.contains("completions"));
}

#[test]
fn bash_completions_offer_load_modes() {
    let output = generate_completions(clap_complete::Shell::Bash);
    assert!(output.contains("--load"));
    assert!(output.contains("buffered"));
}

#[test]
fn zsh_completions_are_valid() {
    let output = generate_completions(clap_complete::Shell::Zsh);
    assert!(!output.is_empty());
    assert!(output.contains("drill"));
}

#[test]
fn fish_completions_are_valid() {
    let output = generate_completions(clap_complete::Shell::Fish);
    assert!(!output.is_empty());
    assert!(output.contains("drill"));
}

#[test]
fn cli_definition_is_consistent() {
    Cli::command().debug_assert();
}
