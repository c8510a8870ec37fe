use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use vocs::position::Bounds;

/// Lowest and highest block Y levels addressable by a `GlobalChunkPosition`.
const MIN_ADDRESSABLE_Y: i32 = -2048;
const MAX_ADDRESSABLE_Y: i32 = 2048;

/// Bounds must hold at least one position, and every position in them must have a chunk position.
pub(crate) fn check_bounds(bounds: Bounds) -> Result<()> {
	if bounds.is_empty() {
		return Err(Error::EmptyBounds { min_y: bounds.min_y(), max_y: bounds.max_y() });
	}

	if bounds.min_y() < MIN_ADDRESSABLE_Y || bounds.max_y() > MAX_ADDRESSABLE_Y {
		return Err(Error::BoundsOutOfRange { min_y: bounds.min_y(), max_y: bounds.max_y() });
	}

	Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	pub engine: EngineConfig,
	pub world: WorldConfig
}

impl Config {
	pub fn from_toml_str(source: &str) -> Result<Self> {
		let config: Config = toml::from_str(source)?;

		config.validate()?;
		Ok(config)
	}

	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
		let source = fs::read_to_string(path)?;

		Self::from_toml_str(&source)
	}

	pub fn validate(&self) -> Result<()> {
		self.engine.validate()?;
		self.world.validate()?;

		if self.world.sky_light > self.engine.max_light {
			return Err(Error::SkyLightAboveMax { sky_light: self.world.sky_light, max_light: self.engine.max_light });
		}

		Ok(())
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
	/// The brightest light level. Level buckets are allocated for every level from 1 up to this value.
	pub max_light: u8,
	/// Number of queued checks at which `LightingEngine::needs_flush` asks the caller to run a cycle.
	pub flush_threshold: usize
}

impl EngineConfig {
	pub fn validate(&self) -> Result<()> {
		if self.max_light == 0 || self.max_light > 15 {
			return Err(Error::MaxLightOutOfRange(self.max_light));
		}

		Ok(())
	}
}

impl Default for EngineConfig {
	fn default() -> Self {
		EngineConfig {
			max_light: 15,
			flush_threshold: 4096
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldConfig {
	pub min_y: i32,
	/// Exclusive.
	pub max_y: i32,
	/// Sky light seen above the top of the world.
	pub sky_light: u8
}

impl WorldConfig {
	pub fn bounds(&self) -> Bounds {
		Bounds::new(self.min_y, self.max_y)
	}

	pub fn validate(&self) -> Result<()> {
		check_bounds(self.bounds())?;

		if self.sky_light > 15 {
			return Err(Error::MaxLightOutOfRange(self.sky_light));
		}

		Ok(())
	}
}

impl Default for WorldConfig {
	fn default() -> Self {
		WorldConfig {
			min_y: 0,
			max_y: 256,
			sky_light: 15
		}
	}
}
