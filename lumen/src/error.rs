use thiserror::Error;

/// Problems detected while wiring up an engine. Once running, the engine never fails.
#[derive(Debug, Error)]
pub enum Error {
	#[error("maximum light level {0} is outside of the supported range 1..=15")]
	MaxLightOutOfRange(u8),
	#[error("engine is configured for a maximum light level of {engine}, but the propagator produces up to {propagator}")]
	MaxLightMismatch { engine: u8, propagator: u8 },
	#[error("sky light {sky_light} is brighter than the maximum light level {max_light}")]
	SkyLightAboveMax { sky_light: u8, max_light: u8 },
	#[error("world bounds y {min_y}..{max_y} contain no positions")]
	EmptyBounds { min_y: i32, max_y: i32 },
	#[error("world bounds y {min_y}..{max_y} exceed the addressable range -2048..2048")]
	BoundsOutOfRange { min_y: i32, max_y: i32 },
	#[error("failed to parse configuration: {0}")]
	Config(#[from] toml::de::Error),
	#[error("failed to read configuration: {0}")]
	Io(#[from] std::io::Error)
}

pub type Result<T> = std::result::Result<T, Error>;
