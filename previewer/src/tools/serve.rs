use anyhow::{Context, Result};
use previewer::{Config, ImageServer};
use std::path::PathBuf;
use tokio::time::{Duration, sleep};

#[derive(clap::Args, Debug)]
#[command(disable_version_flag = true, verbatim_doc_comment)]
pub struct Subcommand {
	/// Path to a configuration file (YAML format) to configure the server, cache and origin.
	/// Command line arguments will override configuration file settings.
	#[arg(short = 'c', long, value_name = "FILE", display_order = 0)]
	pub config: Option<PathBuf>,

	/// Serve via socket ip. Default: 0.0.0.0
	#[arg(short = 'i', long, display_order = 0)]
	pub ip: Option<String>,

	/// Serve via port. Default: 8080
	#[arg(short, long, display_order = 0)]
	pub port: Option<u16>,

	/// Directory for cached images. Default: "previewer" in the temporary directory
	#[arg(long, value_name = "DIR", display_order = 1)]
	pub cache_path: Option<PathBuf>,

	/// Maximum number of cached images. Default: 1000
	#[arg(long, value_name = "N", display_order = 1)]
	pub cache_capacity: Option<usize>,

	/// Shutdown server automatically after x milliseconds.
	#[arg(long, display_order = 4)]
	pub auto_shutdown: Option<u64>,
}

#[tokio::main]
pub async fn run(arguments: &Subcommand) -> Result<()> {
	let mut config = if let Some(config_path) = &arguments.config {
		Config::from_path(config_path)?
	} else {
		Config::default()
	};

	config.server.override_optional_ip(&arguments.ip);
	config.server.override_optional_port(&arguments.port);
	config.cache.override_optional_path(&arguments.cache_path);
	config.cache.override_optional_capacity(&arguments.cache_capacity);
	config.validate()?;

	let mut server = ImageServer::from_config(&config)?;
	server.start().await?;

	if let Some(milliseconds) = arguments.auto_shutdown {
		sleep(Duration::from_millis(milliseconds)).await;
	} else {
		tokio::signal::ctrl_c().await.context("listening for Ctrl-C")?;
		log::info!("received Ctrl-C");
	}

	server.stop().await;

	Ok(())
}
