use std::iter::FusedIterator;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::error::PropagationError;
use super::geodetic::{ecef_to_geodetic, sidereal_angle, teme_to_ecef_position, Geodetic};
use super::model::OrbitModel;

const DEFAULT_HORIZON: Duration = Duration::minutes(100);
const DEFAULT_STEP: Duration = Duration::minutes(5);

/// Upper bound on samples per path; every tracked object pays for each one.
pub const MAX_PATH_SAMPLES: usize = 10_000;

/// One point of a future ground path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct PathWaypoint {
    pub timestamp: DateTime<Utc>,
    pub lng: f64,
    pub lat: f64,
    pub alt_km: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathSpec {
    pub horizon: Duration,
    pub step: Duration,
}

impl Default for PathSpec {
    fn default() -> Self {
        Self {
            horizon: DEFAULT_HORIZON,
            step: DEFAULT_STEP,
        }
    }
}

impl PathSpec {
    pub fn sample_count(&self) -> usize {
        let step = self.step.num_milliseconds();
        if step <= 0 || self.horizon <= Duration::zero() {
            return 0;
        }
        (self.horizon.num_milliseconds() / step) as usize
    }
}

/// Propagate `model` to `at` and convert using the sidereal angle of `at`.
pub fn locate<M: OrbitModel>(model: &M, at: DateTime<Utc>) -> Result<Geodetic, PropagationError> {
    let teme = model.position_km(at)?;
    let geodetic = ecef_to_geodetic(teme_to_ecef_position(teme, sidereal_angle(at)));
    if geodetic.is_finite() {
        Ok(geodetic)
    } else {
        Err(PropagationError::NonFinite)
    }
}

/// Lazily samples a model at `start`, `start + step`, ... for the configured
/// horizon. Each item is propagated on demand; once exhausted it stays
/// exhausted.
pub struct PathSampler<'m, M> {
    model: &'m M,
    start: DateTime<Utc>,
    step: Duration,
    next_index: usize,
    count: usize,
}

impl<'m, M: OrbitModel> PathSampler<'m, M> {
    pub fn new(model: &'m M, start: DateTime<Utc>, spec: &PathSpec) -> Self {
        Self {
            model,
            start,
            step: spec.step,
            next_index: 0,
            count: spec.sample_count(),
        }
    }
}

impl<M: OrbitModel> Iterator for PathSampler<'_, M> {
    type Item = Result<PathWaypoint, PropagationError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_index >= self.count {
            return None;
        }
        let offset = i32::try_from(self.next_index)
            .ok()
            .and_then(|k| self.step.checked_mul(k));
        self.next_index += 1;
        let Some(timestamp) = offset.and_then(|d| self.start.checked_add_signed(d)) else {
            return Some(Err(PropagationError::Time(
                "path sample outside the representable range".into(),
            )));
        };

        Some(locate(self.model, timestamp).map(|g| PathWaypoint {
            timestamp,
            lng: g.longitude_deg,
            lat: g.latitude_deg,
            alt_km: g.height_km,
        }))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.next_index;
        (remaining, Some(remaining))
    }
}

impl<M: OrbitModel> ExactSizeIterator for PathSampler<'_, M> {}

impl<M: OrbitModel> FusedIterator for PathSampler<'_, M> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::propagate::testing::FakeModel;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()
    }

    #[test]
    fn default_spec_has_twenty_points() {
        assert_eq!(PathSpec::default().sample_count(), 20);
    }

    #[test]
    fn degenerate_specs_sample_nothing() {
        let zero_step = PathSpec {
            horizon: Duration::minutes(100),
            step: Duration::zero(),
        };
        assert_eq!(zero_step.sample_count(), 0);
        let short = PathSpec {
            horizon: Duration::minutes(3),
            step: Duration::minutes(5),
        };
        assert_eq!(short.sample_count(), 0);
    }

    #[test]
    fn samples_twenty_points_five_minutes_apart() {
        let model = FakeModel::new(1, start());
        let path: Vec<_> = PathSampler::new(&model, start(), &PathSpec::default())
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(path.len(), 20);
        assert_eq!(path[0].timestamp, start());
        assert_eq!(path[19].timestamp, start() + Duration::minutes(95));
        for pair in path.windows(2) {
            assert_eq!(pair[1].timestamp - pair[0].timestamp, Duration::minutes(5));
        }
        for p in &path {
            assert!((-90.0..=90.0).contains(&p.lat));
            assert!((-180.0..=180.0).contains(&p.lng));
        }
    }

    #[test]
    fn is_lazy_and_fused() {
        let model = FakeModel::new(1, start());
        let mut sampler = PathSampler::new(&model, start(), &PathSpec::default());
        assert_eq!(model.calls.get(), 0);
        assert_eq!(sampler.len(), 20);

        sampler.next();
        assert_eq!(model.calls.get(), 1);
        assert_eq!(sampler.len(), 19);

        let rest = sampler.by_ref().count();
        assert_eq!(rest, 19);
        assert!(sampler.next().is_none());
        assert_eq!(model.calls.get(), 20);
    }

    #[test]
    fn uses_sidereal_angle_of_each_sample() {
        let model = FakeModel::new(1, start());
        let spec = PathSpec::default();
        for waypoint in PathSampler::new(&model, start(), &spec) {
            let waypoint = waypoint.unwrap();
            let expected = locate(&model, waypoint.timestamp).unwrap();
            assert!((expected.longitude_deg - waypoint.lng).abs() < 1e-9);
        }

        // a single load-time angle would give a different longitude later on
        let last = start() + Duration::minutes(95);
        let teme = model.position_km(last).unwrap();
        let frozen = ecef_to_geodetic(teme_to_ecef_position(teme, sidereal_angle(start())));
        let proper = locate(&model, last).unwrap();
        assert!((frozen.longitude_deg - proper.longitude_deg).abs() > 1.0);
    }

    #[test]
    fn samples_past_the_end_of_time_are_errors() {
        let start = DateTime::<Utc>::MAX_UTC - Duration::minutes(30);
        let model = FakeModel::new(1, start);
        let results: Vec<_> = PathSampler::new(&model, start, &PathSpec::default()).collect();
        assert_eq!(results.len(), 20);
        assert!(results[7..]
            .iter()
            .all(|r| matches!(r, Err(PropagationError::Time(_)))));
    }

    #[test]
    fn surfaces_mid_path_failure() {
        let mut model = FakeModel::new(1, start());
        model.fails_after = Some(start() + Duration::minutes(30));
        let results: Vec<_> = PathSampler::new(&model, start(), &PathSpec::default()).collect();
        assert!(results[..7].iter().all(Result::is_ok));
        assert!(results[7].is_err());
    }
}
