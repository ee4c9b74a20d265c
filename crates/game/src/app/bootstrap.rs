use std::num::ParseIntError;

use room_engine::{LoopConfig, MetricsHandle, Scene};
use thiserror::Error;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use super::room::{self, RoomTuning, ROOM_SEED, ROOM_TITLE};

const RENDER_FPS_CAP_ENV_VAR: &str = "DAEDALUS_RENDER_FPS_CAP";

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum ConfigError {
    #[error("{var} must be a whole number of frames per second, got {value:?}: {source}")]
    InvalidRenderFpsCap {
        var: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },
    #[error("{var} must be greater than zero")]
    ZeroRenderFpsCap { var: &'static str },
}

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) room: Box<dyn Scene>,
    pub(crate) victory: Box<dyn Scene>,
    pub(crate) metrics: MetricsHandle,
}

pub(crate) fn build_app() -> AppWiring {
    init_tracing();
    info!(version = env!("CARGO_PKG_VERSION"), "=== Daedalus Lab Startup ===");

    let (room, victory) = room::build_scene_pair(RoomTuning::default(), ROOM_SEED);
    let raw_cap = std::env::var(RENDER_FPS_CAP_ENV_VAR).ok();
    let max_render_fps = match parse_render_fps_cap(raw_cap.as_deref()) {
        Ok(cap) => cap,
        Err(err) => {
            warn!(error = %err, "render_fps_cap_ignored");
            None
        }
    };
    let config = LoopConfig {
        window_title: ROOM_TITLE.to_string(),
        max_render_fps,
        ..LoopConfig::default()
    };

    AppWiring {
        config,
        room,
        victory,
        metrics: MetricsHandle::default(),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

/// Unset or blank means no cap.
fn parse_render_fps_cap(raw: Option<&str>) -> Result<Option<u32>, ConfigError> {
    let Some(value) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };
    let cap = value
        .parse::<u32>()
        .map_err(|source| ConfigError::InvalidRenderFpsCap {
            var: RENDER_FPS_CAP_ENV_VAR,
            value: value.to_string(),
            source,
        })?;
    if cap == 0 {
        return Err(ConfigError::ZeroRenderFpsCap {
            var: RENDER_FPS_CAP_ENV_VAR,
        });
    }
    Ok(Some(cap))
}
