use hex::requirements::{self, TargetOs, PACKAGE};
use hex::{App, Config};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hex", version, about = "Hex game")]
struct Cli {
	/// Configuration file, defaults are used when it does not exist
	#[arg(long, default_value = hex::config::CONFIG_FILE)]
	config: PathBuf,
	/// Window width, overrides the configuration
	#[arg(long)]
	width: Option<u32>,
	/// Window height, overrides the configuration
	#[arg(long)]
	height: Option<u32>,
	/// Model to display: `cube`, `test-cube` or an `.obj` name in the models directory
	#[arg(long)]
	model: Option<String>,
	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
	/// Print the native requirement manifest
	Requirements {
		/// Target operating system, the current one when omitted
		#[arg(long)]
		os: Option<String>,
	},
}

fn main() -> anyhow::Result<()> {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.init();

	let cli = Cli::parse();

	if let Some(Command::Requirements { os }) = cli.command {
		let os = match os {
			Some(name) => name.parse::<TargetOs>().unwrap_or_else(|never| match never {}),
			None => TargetOs::current(),
		};
		print_requirements(&os);
		return Ok(());
	}

	let mut config = Config::load(&cli.config)?;
	if let Some(width) = cli.width {
		config.window.width = width;
	}
	if let Some(height) = cli.height {
		config.window.height = height;
	}
	if let Some(model) = cli.model {
		config.scene.model = model;
	}

	tracing::info!("starting {} {}", PACKAGE.name, PACKAGE.version);
	let app = App::new(config).context("failed to start")?;
	app.run()?;
	Ok(())
}

fn print_requirements(os: &TargetOs) {
	println!("{} {} ({}) for {}", PACKAGE.name, PACKAGE.version, PACKAGE.description, os);
	println!("  settings: {}", requirements::SETTINGS.join(", "));
	for requirement in requirements::requirements(os) {
		println!("  {:?}: {}", requirement.role, requirement);
	}
	match requirements::loader_library(os) {
		Some(library) => println!("  runtime loader: {}", library),
		None => println!("  runtime loader: provided by {}", os),
	}
}
