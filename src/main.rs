// SPDX-License-Identifier: GPL-3.0-only

use camera_screen::Config;
use camera_screen::backends::camera::Facing;
use camera_screen::constants::APP_ID;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "camera-screen")]
#[command(about = "Single-screen camera: preview, capture, flip and review")]
#[command(version = env!("GIT_VERSION"))]
#[command(subcommand_required = false)]
struct Cli {
    /// Config file (default: ~/.config/camera-screen/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    camera: CameraOverrides,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Virtual camera overrides, applied on top of the config file
#[derive(Args)]
struct CameraOverrides {
    /// Answer the permission prompt with "deny"
    #[arg(long, global = true)]
    deny_permission: bool,

    /// Only expose a front camera
    #[arg(long, global = true, conflicts_with = "back_only")]
    front_only: bool,

    /// Only expose a back camera
    #[arg(long, global = true)]
    back_only: bool,

    /// Make every capture fail
    #[arg(long, global = true)]
    fail_captures: bool,
}

impl CameraOverrides {
    fn apply(&self, config: &mut Config) {
        let camera = &mut config.virtual_camera;
        if self.deny_permission {
            camera.grant_permission = false;
        }
        if self.front_only {
            camera.has_front = true;
            camera.has_back = false;
        }
        if self.back_only {
            camera.has_front = false;
            camera.has_back = true;
        }
        if self.fail_captures {
            camera.fail_captures = true;
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive capture screen in the terminal (default)
    Terminal,

    /// List available cameras
    List,

    /// Take a photo without the interactive screen
    Photo {
        /// Camera to use (front or back)
        #[arg(short, long)]
        facing: Option<Facing>,

        /// Output directory (default: ~/Pictures/camera-screen)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let interactive = matches!(cli.command, None | Some(Commands::Terminal));

    // Set RUST_LOG to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=camera_screen=debug, RUST_LOG=info
    init_logging(interactive)?;

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    cli.camera.apply(&mut config);

    match cli.command {
        None | Some(Commands::Terminal) => camera_screen::terminal::run(config),
        Some(Commands::List) => cli::list_cameras(&config),
        Some(Commands::Photo { facing, output }) => cli::take_photo(config, facing, output),
    }
}

/// Interactive mode logs to a file so output does not tear the screen
fn init_logging(interactive: bool) -> Result<(), Box<dyn std::error::Error>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true);

    let log_dir = dirs::cache_dir().map(|dir| dir.join(APP_ID));
    match log_dir {
        Some(dir) if interactive => {
            std::fs::create_dir_all(&dir)?;
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(dir.join(format!("{}.log", APP_ID)))?;
            builder
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        _ => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}
