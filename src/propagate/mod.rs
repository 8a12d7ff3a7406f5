mod error;
mod geodetic;
mod model;
mod projector;

pub use model::{ModelBuilder, OrbitModel, Sgp4Builder, TleLines};
pub use projector::{locate, PathSampler, PathSpec, PathWaypoint, MAX_PATH_SAMPLES};

#[cfg(test)]
pub use model::testing;
