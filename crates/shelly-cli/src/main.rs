use std::io::{self, IsTerminal};

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use shelly_cli::cli::{Cli, Commands};
use shelly_cli::commands::{
    HistoryArgs, PlotArgs, WatchArgs, cmd_config, cmd_history, cmd_log, cmd_plot, cmd_read,
    cmd_settings, cmd_status, cmd_watch,
};
use shelly_cli::config::{
    Config, resolve_db_path, resolve_device, resolve_index, resolve_timeout,
};
use shelly_cli::format::FormatOptions;
use shelly_cli::util::{require_device, write_output};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle completions command early (before tracing init)
    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "shelly", &mut io::stdout());
        return Ok(());
    }

    // When quiet mode is enabled, suppress info-level logging
    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(!cli.no_color && io::stderr().is_terminal())
        .init();

    let config_path = Config::path();
    let config = Config::load_from(&config_path);

    let no_color = cli.no_color || cli.output.is_some() || !io::stdout().is_terminal();
    let opts = FormatOptions::new(no_color);
    let output = cli.output.as_ref();
    let db_path = resolve_db_path(cli.db.clone(), &config);

    match cli.command {
        Commands::Status { device, compact } => {
            let address = require_device(resolve_device(device.device, &config))?;
            let timeout = resolve_timeout(device.timeout, &config);
            cmd_status(&address, timeout, output, &opts.with_compact(compact))
        }
        Commands::Settings { device, compact } => {
            let address = require_device(resolve_device(device.device, &config))?;
            let timeout = resolve_timeout(device.timeout, &config);
            cmd_settings(&address, timeout, output, &opts.with_compact(compact))
        }
        Commands::Read { meter, output: out } => {
            let address = require_device(resolve_device(meter.device.device, &config))?;
            let timeout = resolve_timeout(meter.device.timeout, &config);
            let index = resolve_index(meter.index, &config);
            cmd_read(
                &address,
                index,
                timeout,
                out.format,
                output,
                &opts.with_no_header(out.no_header),
            )
        }
        Commands::Log { meter } => {
            let address = require_device(resolve_device(meter.device.device, &config))?;
            let timeout = resolve_timeout(meter.device.timeout, &config);
            let index = resolve_index(meter.index, &config);
            cmd_log(&address, index, timeout, &db_path)
        }
        Commands::Watch {
            meter,
            output: out,
            interval,
            count,
            max_missed,
        } => {
            let address = require_device(resolve_device(meter.device.device, &config))?;
            cmd_watch(WatchArgs {
                address: &address,
                index: resolve_index(meter.index, &config),
                timeout: resolve_timeout(meter.device.timeout, &config),
                db_path: &db_path,
                interval,
                count,
                max_missed,
                format: out.format,
                output,
                quiet: cli.quiet,
                opts: &opts.with_no_header(out.no_header),
            })
        }
        Commands::History {
            range,
            output: out,
            limit,
        } => cmd_history(HistoryArgs {
            db_path: &db_path,
            since: range.since,
            until: range.until,
            limit,
            format: out.format,
            output,
            quiet: cli.quiet,
            opts: &opts.with_no_header(out.no_header),
        }),
        Commands::Plot {
            range,
            width,
            height,
        } => cmd_plot(PlotArgs {
            db_path: &db_path,
            since: range.since,
            until: range.until,
            width,
            height,
            output,
        }),
        Commands::Config { action } => {
            let content = cmd_config(action, &config_path)?;
            write_output(None, &content)
        }
        Commands::Completions { .. } => {
            // Already handled above
            unreachable!()
        }
    }
}
