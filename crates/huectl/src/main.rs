mod cli;
mod color;
mod commands;
mod error;
mod output;
mod settings;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use hue_api::{TlsMode, TransportConfig};
use hue_core::{Bridge, BridgeOptions, RefreshFlags, default_data_dir};

use crate::cli::{Cli, ColorMode, Command, OutputFormat};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "huectl", &mut std::io::stdout());
            Ok(())
        }

        // All other commands talk to the bridge
        cmd => {
            let settings = settings::load()?;
            let opts = build_bridge_options(&cli.global, &settings)?;

            let mut bridge = Bridge::connect(opts).await?;

            // Opportunistic cache maintenance: refresh everything, but
            // only when the snapshot has outlived the staleness window.
            if let Err(e) = bridge
                .refresh_cache(RefreshFlags::all(), false, true)
                .await
            {
                tracing::warn!("scheduled cache refresh failed: {e}");
            }

            let view = resolve_view(&cli.global, &settings);
            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, &mut bridge, &view).await
        }
    }
}

/// Presentation choices resolved from flags and settings.
pub struct ViewOpts {
    pub format: OutputFormat,
    pub color: ColorMode,
    pub quiet: bool,
    pub use_cache: bool,
}

fn resolve_view(global: &cli::GlobalOpts, settings: &settings::Settings) -> ViewOpts {
    let format = global.output.unwrap_or(match settings.output.as_str() {
        "json" => OutputFormat::Json,
        "json-compact" => OutputFormat::JsonCompact,
        "plain" => OutputFormat::Plain,
        _ => OutputFormat::Table,
    });
    let color = global.color.unwrap_or(match settings.color.as_str() {
        "always" => ColorMode::Always,
        "never" => ColorMode::Never,
        _ => ColorMode::Auto,
    });
    ViewOpts {
        format,
        color,
        quiet: global.quiet,
        use_cache: !global.no_cache,
    }
}

/// Build `BridgeOptions` from settings with CLI flag overrides.
fn build_bridge_options(
    global: &cli::GlobalOpts,
    settings: &settings::Settings,
) -> Result<BridgeOptions, CliError> {
    let data_dir = global
        .data_dir
        .clone()
        .or_else(|| settings.data_dir.clone())
        .unwrap_or_else(default_data_dir);

    let tls = if let Some(path) = global.ca_cert.clone().or_else(|| settings.ca_cert.clone()) {
        TlsMode::CustomCa(path)
    } else if global.verify_tls || settings.verify_tls {
        TlsMode::System
    } else {
        TlsMode::DangerAcceptInvalid
    };

    let timeout = global.timeout.unwrap_or(settings.timeout);
    if timeout == 0 {
        return Err(CliError::Validation {
            field: "timeout".into(),
            reason: "must be at least 1 second".into(),
        });
    }

    let mut opts = BridgeOptions::new(data_dir);
    opts.address = global.bridge.clone().or_else(|| settings.bridge.clone());
    opts.transport = TransportConfig {
        tls,
        timeout: std::time::Duration::from_secs(timeout),
    };
    opts.mirror_traffic = global.debug_files || settings.debug_files;
    Ok(opts)
}
