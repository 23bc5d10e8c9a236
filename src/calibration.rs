//! Air-shot time-zero calibration of picked travel times.
//!
//! The instrument clock drifts during an acquisition. Air shots recorded
//! before and after the survey, with the antennas at a known separation,
//! give the time-zero at both ends; the survey picks are corrected by a
//! time-zero interpolated between the two.

use thiserror::Error;

use crate::config::CoreConfig;
use crate::error::MogError;
use crate::models::{AirShotEntity, AirShotMethod, Pick, SurveyEntity};
use crate::storage::SurveyStore;

/// Per-trace time-zero and the time-step factors estimated from each air shot.
#[derive(Debug, Clone, PartialEq)]
pub struct T0Correction {
    pub t0: Vec<f64>,
    pub fac_dt_before: f64,
    pub fac_dt_after: f64,
}

impl T0Correction {
    /// No correction for `n` traces.
    pub fn zeros(n: usize) -> Self {
        Self {
            t0: vec![0.0; n],
            fac_dt_before: 1.0,
            fac_dt_after: 1.0,
        }
    }
}

/// A calibration that could not be applied.
///
/// `fallback` is an all-zero correction sized for the survey, usable as-is
/// by callers that choose to continue uncalibrated.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{reason}")]
pub struct CalibrationError {
    #[source]
    pub reason: MogError,
    pub fallback: T0Correction,
}

impl CalibrationError {
    fn new(reason: MogError, n: usize) -> Self {
        Self {
            reason,
            fallback: T0Correction::zeros(n),
        }
    }
}

/// Corrected picks and the time-zero that was removed from them.
#[derive(Debug, Clone, PartialEq)]
pub struct TravelTimes {
    pub tt: Vec<Option<f64>>,
    pub t0: Vec<f64>,
}

/// Time-zero of a fixed-separation air shot.
///
/// The mean picked time (weighted by each pick's standard deviation when
/// any are known) minus the travel time over `separation` at `velocity`.
/// Returns NaN when nothing is picked.
pub fn get_t0_fixed(picks: &[Option<Pick>], separation: f64, velocity: f64) -> f64 {
    let picked: Vec<&Pick> = picks.iter().flatten().collect();
    let weighted: Vec<(f64, f64)> = picked
        .iter()
        .filter_map(|p| p.std_dev.map(|s| (p.time, s)))
        .collect();

    let time = if weighted.is_empty() {
        picked.iter().map(|p| p.time).sum::<f64>() / picked.len() as f64
    } else {
        let norm: f64 = weighted.iter().map(|(_, s)| s).sum();
        weighted.iter().map(|(t, s)| t * s).sum::<f64>() / norm
    };

    time - separation / velocity
}

fn air_shot_t0(shot: &AirShotEntity, velocity: f64) -> Result<f64, MogError> {
    match &shot.method {
        AirShotMethod::FixedAntenna { separation } => {
            Ok(get_t0_fixed(&shot.picks, *separation, velocity))
        }
        AirShotMethod::Walkaway { .. } => {
            Err(MogError::UnsupportedFormat("walkaway air shots".to_string()))
        }
    }
}

fn resolve_t0(
    shot: Option<&AirShotEntity>,
    velocity: f64,
    n: usize,
) -> Result<Option<f64>, CalibrationError> {
    shot.map(|s| air_shot_t0(s, velocity))
        .transpose()
        .map_err(|e| CalibrationError::new(e, n))
}

/// Time-zero for each of `n` traces from the before/after air shots.
///
/// Air shots that are `None` or unnamed are absent. With calibration
/// disabled the correction is zero whatever the references hold.
pub fn correction_t0(
    n: usize,
    use_air_shots: bool,
    before: Option<&AirShotEntity>,
    after: Option<&AirShotEntity>,
    config: &CoreConfig,
) -> Result<T0Correction, CalibrationError> {
    if !use_air_shots {
        return Ok(T0Correction::zeros(n));
    }

    let before = before.filter(|s| s.is_present());
    let after = after.filter(|s| s.is_present());
    if before.is_none() && after.is_none() {
        return Err(CalibrationError::new(MogError::missing_air_shots(), n));
    }

    let t0_before = resolve_t0(before, config.air_velocity, n)?;
    let t0_after = resolve_t0(after, config.air_velocity, n)?;

    if t0_before.into_iter().chain(t0_after).any(|t| !t.is_finite()) {
        return Err(CalibrationError::new(MogError::missing_air_shots(), n));
    }

    let t0 = interpolate_t0(n, t0_before, t0_after);
    tracing::debug!(
        "t0 correction over {n} traces: before = {t0_before:?}, after = {t0_after:?}"
    );

    Ok(T0Correction {
        t0,
        fac_dt_before: 1.0,
        fac_dt_after: 1.0,
    })
}

/// A zero time-zero counts as no measurement.
fn interpolate_t0(n: usize, before: Option<f64>, after: Option<f64>) -> Vec<f64> {
    let before = before.filter(|t| *t != 0.0);
    let after = after.filter(|t| *t != 0.0);

    match (before, after) {
        (None, None) => vec![0.0; n],
        (None, Some(t)) | (Some(t), None) => vec![t; n],
        (Some(b), Some(a)) if n > 1 => {
            let step = (a - b) / (n - 1) as f64;
            (0..n).map(|i| b + step * i as f64).collect()
        }
        (Some(b), Some(_)) => vec![b; n],
    }
}

fn resolve_fac_dt(before: f64, after: f64) -> f64 {
    match (before != 1.0, after != 1.0) {
        (true, true) => 0.5 * (before + after),
        (true, false) => before,
        (false, true) => after,
        (false, false) => 1.0,
    }
}

/// Picks of `survey` corrected for time-zero and time-step drift.
///
/// Synthetic data is returned untouched. Otherwise the factors estimated
/// from the air shots are written back onto them, and onto the survey
/// unless the user pinned `user_fac_dt`.
pub fn corrected_travel_times(
    survey: &mut SurveyEntity,
    before: Option<&mut AirShotEntity>,
    after: Option<&mut AirShotEntity>,
    config: &CoreConfig,
) -> Result<TravelTimes, CalibrationError> {
    let n = survey.picks.len();
    if survey.data.synthetic {
        return Ok(TravelTimes {
            tt: survey.picked_times(),
            t0: vec![0.0; n],
        });
    }

    let correction = correction_t0(
        n,
        survey.use_air_shots,
        before.as_deref(),
        after.as_deref(),
        config,
    )?;

    if let Some(shot) = before {
        shot.fac_dt = correction.fac_dt_before;
    }
    if let Some(shot) = after {
        shot.fac_dt = correction.fac_dt_after;
    }

    let fac_dt = match survey.user_fac_dt.filter(|f| *f != 0.0) {
        Some(pinned) => pinned,
        None => resolve_fac_dt(correction.fac_dt_before, correction.fac_dt_after),
    };
    survey.fac_dt = fac_dt;

    let t0: Vec<f64> = correction.t0.iter().map(|t| fac_dt * t).collect();
    let tt = survey
        .picks
        .iter()
        .zip(&t0)
        .map(|(pick, t0)| pick.map(|p| fac_dt * p.time - t0))
        .collect();

    Ok(TravelTimes { tt, t0 })
}

/// Calibrate the stored survey `name` against its stored air shots and
/// persist the resolved factors.
pub fn calibrate_stored_survey<S: SurveyStore>(
    store: &mut S,
    name: &str,
    config: &CoreConfig,
) -> Result<TravelTimes, CalibrationError> {
    let storage_error = |message: String, n: usize| CalibrationError::new(MogError::Storage(message), n);

    let mut survey = store
        .load_survey(name)
        .map_err(|e| storage_error(e, 0))?
        .ok_or_else(|| storage_error(format!("no survey named '{name}'"), 0))?;
    let n = survey.trace_count();

    let load_shot = |shot_name: &Option<String>| -> Result<Option<AirShotEntity>, CalibrationError> {
        match shot_name {
            None => Ok(None),
            Some(shot_name) => store
                .load_air_shot(shot_name)
                .map_err(|e| storage_error(e, n))?
                .ok_or_else(|| storage_error(format!("no air shot named '{shot_name}'"), n))
                .map(Some),
        }
    };
    let mut before = load_shot(&survey.air_before)?;
    let mut after = load_shot(&survey.air_after)?;

    let times = corrected_travel_times(&mut survey, before.as_mut(), after.as_mut(), config)?;

    for shot in [before, after].into_iter().flatten() {
        store.upsert_air_shot(shot).map_err(|e| storage_error(e, n))?;
    }
    store.upsert_survey(survey).map_err(|e| storage_error(e, n))?;
    tracing::info!("calibrated survey '{name}' ({n} traces)");

    Ok(times)
}
