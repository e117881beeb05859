//! UCU analytics filter CLI.

use clap::{ColorChoice, Parser};
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;
use ucu_cli::commands::{Dashboard, page_json, scope_from_args};
use ucu_cli::config::load_config;
use ucu_cli::logging::{LogConfig, LogFormat, init_logging};
use ucu_filters::{FilterKey, PageState};

mod cli;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg, OptionsArgs};
use crate::summary::{print_options, print_page, print_pages};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(error) => {
            tracing::error!("{error:#}");
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    let mut config = load_config(cli.config.as_deref());
    if let Some(dir) = cli.storage_dir {
        config.storage_dir = Some(dir);
    }
    if let Some(url) = cli.api_url {
        config.api_base_url = url;
    }
    let dashboard = Dashboard::connect(config, cli.token)?;

    match cli.command {
        Command::Show { page, json } => match dashboard.show(&page)? {
            Some(saved) if json => println!("{}", page_json(&saved)?),
            Some(saved) => print_page(&saved),
            None => {
                eprintln!("No saved state for '{page}'.");
                return Ok(2);
            }
        },
        Command::Set { page, assignments } => {
            let state = dashboard.set_filters(&page, &assignments)?;
            print_state(&page, state);
        }
        Command::Search { page, term } => {
            let state = dashboard.search(&page, &term)?;
            print_state(&page, state);
        }
        Command::Tab { page, tab } => {
            let state = dashboard.set_tab(&page, Some(tab))?;
            print_state(&page, state);
        }
        Command::Drilldown { page, value } => {
            let state = dashboard.set_drilldown(&page, Some(value))?;
            print_state(&page, state);
        }
        Command::Reset { page } => {
            let state = dashboard.reset_filters(&page)?;
            print_state(&page, state);
        }
        Command::Clear { page } => {
            if dashboard.clear(&page)? {
                println!("Cleared saved state for '{page}'.");
            } else {
                println!("Nothing saved for '{page}'.");
            }
        }
        Command::Pages => print_pages(&dashboard.pages()?),
        Command::Options(args) => run_options(&dashboard, &args)?,
    }
    Ok(0)
}

fn run_options<S>(dashboard: &Dashboard<S>, args: &OptionsArgs) -> anyhow::Result<()>
where
    S: ucu_filters::OptionsSource + 'static,
{
    let only = args
        .only
        .as_deref()
        .map(str::parse::<FilterKey>)
        .transpose()?;
    let scope = scope_from_args(args.faculty_id.as_deref(), args.department_id.as_deref());
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let options = runtime.block_on(dashboard.options(scope))?;
    print_options(&options, only);
    Ok(())
}

fn print_state(page: &str, state: PageState) {
    print_page(&ucu_cli::commands::SavedPage {
        page: page.to_string(),
        state,
        saved_at: None,
    });
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
