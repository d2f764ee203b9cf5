//! # Command-Line Interface / 命令行接口
//!
//! Builds the localized `clap` command tree and dispatches to the subcommands.
//!
//! 构建本地化的 `clap` 命令树并分派到各子命令。

pub mod commands;

use anyhow::Result;
use clap::{Arg, ArgAction, Command};
use std::{env, path::PathBuf};

use crate::infra::t;

/// Pre-parses the command line arguments to find the language setting.
/// This allows i18n to be initialized before the full CLI is built.
/// It looks for a `--lang <VALUE>` argument.
fn pre_parse_language() -> Option<String> {
    let args: Vec<String> = env::args().collect();
    let pos = args.iter().position(|arg| arg == "--lang")?;
    args.get(pos + 1).cloned()
}

fn build_cli(locale: &str) -> Command {
    Command::new("ginkgo-runner")
        .version(env!("CARGO_PKG_VERSION"))
        .about(t!("cli.about", locale = locale).to_string())
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("lang")
                .long("lang")
                .help(t!("cli.lang", locale = locale).to_string())
                .value_name("LANGUAGE")
                .global(true)
                .action(ArgAction::Set),
        )
        .subcommand(
            Command::new("run")
                .about(t!("cli.run_about", locale = locale).to_string())
                .arg(
                    Arg::new("execution")
                        .short('e')
                        .long("execution")
                        .help(t!("cli.arg_execution", locale = locale).to_string())
                        .value_name("FILE")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .help(t!("cli.arg_config", locale = locale).to_string())
                        .value_name("CONFIG")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help(t!("cli.arg_output", locale = locale).to_string())
                        .value_name("FILE")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("html")
                        .long("html")
                        .help(t!("cli.arg_html", locale = locale).to_string())
                        .value_name("HTML")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                ),
        )
        .subcommand(
            Command::new("init")
                .about(t!("cli.init_about", locale = locale).to_string())
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help(t!("cli.arg_init_output", locale = locale).to_string())
                        .value_name("FILE")
                        .default_value("runner.toml")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("non-interactive")
                        .long("non-interactive")
                        .help(t!("cli.arg_non_interactive", locale = locale).to_string())
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("force")
                        .long("force")
                        .help(t!("cli.arg_force", locale = locale).to_string())
                        .action(ArgAction::SetTrue),
                ),
        )
}

pub async fn run() -> Result<()> {
    // Pre-parse language and initialize i18n first.
    let language = match pre_parse_language() {
        Some(lang) => {
            rust_i18n::set_locale(&lang);
            lang
        }
        None => {
            crate::init();
            rust_i18n::locale().to_string()
        }
    };

    let matches = build_cli(&language).get_matches();

    match matches.subcommand() {
        Some(("run", run_matches)) => {
            let execution = run_matches
                .get_one::<PathBuf>("execution")
                .cloned()
                .unwrap_or_else(|| PathBuf::from(commands::run::STDIN_MARKER));
            let config = run_matches.get_one::<PathBuf>("config").cloned();
            let output = run_matches.get_one::<PathBuf>("output").cloned();
            let html = run_matches.get_one::<PathBuf>("html").cloned();

            commands::run::execute(execution, config, output, html, &language).await?;
        }
        Some(("init", init_matches)) => {
            let output = init_matches
                .get_one::<PathBuf>("output")
                .cloned()
                .unwrap_or_else(|| PathBuf::from("runner.toml"));
            let non_interactive = init_matches.get_flag("non-interactive");
            let force = init_matches.get_flag("force");

            commands::init::run_init_wizard(&language, &output, non_interactive, force)?;
        }
        _ => {
            // Clap has already printed help for a missing subcommand.
        }
    }
    Ok(())
}
