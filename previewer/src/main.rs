mod tools;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{ErrorLevel, Verbosity};

#[derive(Parser, Debug)]
#[command(
	author,
	version,
	about,
	long_about = None,
	propagate_version = true,
	disable_help_subcommand = true,
)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	#[command(flatten)]
	verbose: Verbosity<ErrorLevel>,
}

#[derive(Subcommand, Debug)]
enum Commands {
	#[clap(alias = "server")]
	/// Serve resized images via http
	Serve(tools::serve::Subcommand),
}

fn main() -> Result<()> {
	let cli = Cli::parse();

	env_logger::Builder::new()
		.filter_level(cli.verbose.log_level_filter())
		.format_timestamp(None)
		.init();

	run(cli)
}

fn run(cli: Cli) -> Result<()> {
	match &cli.command {
		Commands::Serve(arguments) => tools::serve::run(arguments),
	}
}

#[cfg(test)]
mod tests {
	use crate::{Cli, run};
	use anyhow::Result;
	use clap::Parser;

	pub fn run_command(arg_vec: Vec<&str>) -> Result<String> {
		let cli = Cli::try_parse_from(arg_vec)?;
		let msg = format!("{cli:?}");
		run(cli)?;
		Ok(msg)
	}

	#[test]
	fn help() {
		let err = run_command(vec!["previewer"]).unwrap_err().to_string();
		assert!(err.starts_with("An on-demand image resizing proxy with a bounded, disk-backed LRU cache."));
		assert!(err.contains("\nUsage: previewer [OPTIONS] <COMMAND>"));
	}

	#[test]
	fn version() {
		let err = run_command(vec!["previewer", "-V"]).unwrap_err().to_string();
		assert!(err.starts_with("previewer "));
	}

	#[test]
	fn serve_help() {
		let err = run_command(vec!["previewer", "serve", "--help"]).unwrap_err().to_string();
		assert!(err.starts_with("Serve resized images via http"));
		assert!(err.contains("--cache-capacity <N>"));
	}

	#[test]
	fn unknown_argument() {
		assert!(run_command(vec!["previewer", "serve", "--capacity", "3"]).is_err());
	}
}
