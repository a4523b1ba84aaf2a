use super::{CacheConfig, OriginConfig, ResizeConfig, ServerConfig};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
	fs::File,
	io::{BufReader, Read},
	path::Path,
};

#[derive(Default, Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
	/// HTTP server configuration
	#[serde(default)]
	pub server: ServerConfig,

	/// Image cache configuration
	#[serde(default)]
	pub cache: CacheConfig,

	/// Source image origin
	#[serde(default)]
	pub origin: OriginConfig,

	/// Resize limits and output quality
	#[serde(default)]
	pub resize: ResizeConfig,
}

impl Config {
	pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
		let config: Config = serde_yaml_ng::from_reader(reader).context("parsing YAML configuration")?;
		config.validate()?;
		Ok(config)
	}

	pub fn from_string(text: &str) -> Result<Self> {
		let config: Config = serde_yaml_ng::from_str(text).context("parsing YAML configuration")?;
		config.validate()?;
		Ok(config)
	}

	/// Parses a configuration file. A relative `cache.path` is resolved against the file's directory.
	pub fn from_path(path: &Path) -> Result<Self> {
		let file = File::open(path).with_context(|| format!("opening configuration file {path:?}"))?;
		let mut config =
			Config::from_reader(BufReader::new(file)).with_context(|| format!("reading configuration file {path:?}"))?;

		if let Some(base) = path.parent() {
			config.cache.resolve_paths(base);
		}
		Ok(config)
	}

	pub fn validate(&self) -> Result<()> {
		self.cache.validate()?;
		self.origin.validate()?;
		self.resize.validate()?;
		Ok(())
	}
}
