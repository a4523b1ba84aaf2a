use anyhow::{Result, bail};
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_REGION: &str = "us-east-1";

#[derive(Debug, Default, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OriginKind {
	/// The bucket is the host name of a web server, the key is the path on it.
	#[default]
	Http,
	/// S3 compatible object store, read with `GetObject`.
	ObjectStore,
}

#[derive(Debug, Default, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OriginConfig {
	pub kind: Option<OriginKind>,

	/// Base URL of the object store, e.g. `https://s3.eu-central-1.amazonaws.com`.
	/// Without it, the AWS endpoint of `region` is used.
	pub endpoint: Option<String>,

	/// Region used for request signing.
	pub region: Option<String>,

	/// Static credentials. Without them, requests are sent unsigned.
	pub access_key_id: Option<String>,
	pub secret_access_key: Option<String>,

	/// Total time allowed for one download.
	pub timeout_seconds: Option<u64>,
}

impl OriginConfig {
	pub fn kind(&self) -> OriginKind {
		self.kind.unwrap_or_default()
	}

	pub fn region(&self) -> &str {
		self.region.as_deref().unwrap_or(DEFAULT_REGION)
	}

	/// Access key id and secret, if both are configured.
	pub fn credentials(&self) -> Option<(&str, &str)> {
		match (&self.access_key_id, &self.secret_access_key) {
			(Some(id), Some(secret)) => Some((id, secret)),
			_ => None,
		}
	}

	pub fn timeout(&self) -> Duration {
		Duration::from_secs(self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS))
	}

	pub fn validate(&self) -> Result<()> {
		if self.timeout_seconds == Some(0) {
			bail!("origin.timeout_seconds must be greater than 0");
		}
		if let Some(endpoint) = self.endpoint.as_deref() {
			if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
				bail!("origin.endpoint must start with http:// or https://, got '{endpoint}'")
			}
		}
		if self.access_key_id.is_some() != self.secret_access_key.is_some() {
			bail!("origin.access_key_id and origin.secret_access_key must be given together");
		}
		Ok(())
	}
}
