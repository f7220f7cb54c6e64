// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod runtime;
mod tracing_setup;

use anyhow::{Context, Result};
use config::Config;
use mealpref_app::{AppState, ProfileForm};
use runtime::FileRuntime;
use std::env;
use std::path::PathBuf;
use tracing::info;
use tracing_setup::TracingConfig;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `mealpref --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;
    let profile = config.profile().with_context(|| {
        format!(
            "invalid [profile] in {}; fix name/birthday values",
            options.config_path.display()
        )
    })?;

    tracing_setup::init_tracing(&TracingConfig {
        file: options.log_path.clone().or_else(|| config.log_file()),
        level: config.log_level(),
    })?;

    if options.check_only {
        return Ok(());
    }

    let form = if options.demo {
        mealpref_testkit::demo_form_for(profile)
    } else {
        ProfileForm::new(profile)
    };
    info!(
        demo = options.demo,
        items = form.payload().item_count(),
        "starting preference editor"
    );

    let mut state = AppState::with_form(form);
    let mut runtime = FileRuntime::new(config.output_path());
    mealpref_tui::run_app(&mut state, &mut runtime)?;

    if runtime.output().is_none()
        && let Some(payload) = runtime.last_payload()
    {
        println!("{payload}");
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    log_path: Option<PathBuf>,
    print_config_path: bool,
    demo: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        log_path: None,
        print_config_path: false,
        demo: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--log" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--log requires a file path"))?;
                options.log_path = Some(PathBuf::from(value.as_ref()));
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow::anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("mealpref");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --demo                   Start with sample preferences filled in");
    println!("  --log <path>             Append logs to a file (RUST_LOG overrides level)");
    println!("  --check                  Validate config and exit");
    println!("  --help                   Show this help");
}

#[cfg(test)]
mod tests {
    use super::{CliOptions, parse_cli_args};
    use anyhow::Result;
    use std::path::PathBuf;

    fn default_options_path() -> PathBuf {
        PathBuf::from("/tmp/mealpref-config.toml")
    }

    #[test]
    fn parse_cli_args_defaults_to_provided_config_path() -> Result<()> {
        let options = parse_cli_args(Vec::<String>::new(), default_options_path())?;
        assert_eq!(
            options,
            CliOptions {
                config_path: default_options_path(),
                log_path: None,
                print_config_path: false,
                demo: false,
                print_example: false,
                check_only: false,
                show_help: false,
            }
        );
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_config_and_log_paths() -> Result<()> {
        let options = parse_cli_args(
            vec![
                "--config",
                "/custom/config.toml",
                "--log",
                "/var/tmp/mealpref.log",
            ],
            default_options_path(),
        )?;
        assert_eq!(options.config_path, PathBuf::from("/custom/config.toml"));
        assert_eq!(
            options.log_path,
            Some(PathBuf::from("/var/tmp/mealpref.log"))
        );
        Ok(())
    }

    #[test]
    fn parse_cli_args_errors_for_missing_values() {
        let error = parse_cli_args(vec!["--config"], default_options_path())
            .expect_err("missing config value should fail");
        assert!(error.to_string().contains("--config requires a file path"));

        let error = parse_cli_args(vec!["--demo", "--log"], default_options_path())
            .expect_err("missing log value should fail");
        assert!(error.to_string().contains("--log requires a file path"));
    }

    #[test]
    fn parse_cli_args_errors_for_unknown_argument() {
        let error = parse_cli_args(vec!["--wat"], default_options_path())
            .expect_err("unknown arg should fail");
        let message = error.to_string();
        assert!(message.contains("unknown argument"));
        assert!(message.contains("--help"));
    }

    #[test]
    fn parse_cli_args_sets_print_and_check_flags() -> Result<()> {
        let options = parse_cli_args(
            vec!["--print-config-path", "--print-example-config", "--check"],
            default_options_path(),
        )?;
        assert!(options.print_config_path);
        assert!(!options.demo);
        assert!(options.print_example);
        assert!(options.check_only);
        assert!(!options.show_help);
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_demo_flag() -> Result<()> {
        let options = parse_cli_args(vec!["--demo"], default_options_path())?;
        assert!(options.demo);
        assert!(!options.check_only);
        assert_eq!(options.log_path, None);
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_help_flag_for_long_and_short_variants() -> Result<()> {
        let long = parse_cli_args(vec!["--help"], default_options_path())?;
        assert!(long.show_help);

        let short = parse_cli_args(vec!["-h"], default_options_path())?;
        assert!(short.show_help);
        Ok(())
    }
}
