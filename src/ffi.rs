//! Entry points exported to host applications through uniffi.
//!
//! Hosts exchange flat records; matrices become nested vectors and counts
//! become `u32`. A calibration that cannot be applied still returns its
//! all-zero fallback, with the reason in `CorrectedTimes::error`.

use crate::calibration::{corrected_travel_times, get_t0_fixed};
use crate::config::CoreConfig;
use crate::error::MogError;
use crate::formats::{read_ramac, FileKind};
use crate::models::{AirShotEntity, AirShotMethod, GatherRecord, Pick, SurveyEntity};
use crate::storage::MonotonicIds;

/// A decoded gather as seen by the host.
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct GatherView {
    pub name: String,
    pub trace_count: u32,
    pub samples_per_trace: u32,
    pub sample_interval: f64,
    pub nominal_frequency: f64,
    pub synthetic: bool,
    pub antennas: String,
    pub time_units: String,
    pub coord_units: String,
    pub tx_offset: f64,
    pub rx_offset: f64,
    pub tx_z: Vec<f64>,
    pub rx_z: Vec<f64>,
    /// One row per sample, one column per trace.
    pub waveforms: Vec<Vec<f64>>,
}

fn count_u32(value: usize, what: &str) -> Result<u32, MogError> {
    u32::try_from(value).map_err(|_| {
        MogError::malformed(FileKind::Header, format!("{what} {value} does not fit in u32"))
    })
}

impl TryFrom<&GatherRecord> for GatherView {
    type Error = MogError;

    fn try_from(gather: &GatherRecord) -> Result<Self, MogError> {
        Ok(Self {
            name: gather.name.clone(),
            trace_count: count_u32(gather.trace_count, "trace count")?,
            samples_per_trace: count_u32(gather.samples_per_trace, "samples per trace")?,
            sample_interval: gather.sample_interval,
            nominal_frequency: gather.nominal_frequency,
            synthetic: gather.synthetic,
            antennas: gather.antennas.clone(),
            time_units: gather.time_units.clone(),
            coord_units: gather.coord_units.clone(),
            tx_offset: gather.tx_offset,
            rx_offset: gather.rx_offset,
            tx_z: gather.tx_z.clone(),
            rx_z: gather.rx_z.clone(),
            waveforms: gather.waveforms.rows().into_iter().map(|r| r.to_vec()).collect(),
        })
    }
}

/// Picks of one air shot.
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct AirShotInput {
    pub name: String,
    /// One separation for a fixed-antenna shot, several for a walkaway.
    pub separations: Vec<f64>,
    pub walkaway: bool,
    pub times: Vec<Option<f64>>,
    pub std_devs: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct CalibrationRequest {
    pub synthetic: bool,
    pub use_air_shots: bool,
    pub user_fac_dt: Option<f64>,
    pub times: Vec<Option<f64>>,
    pub before: Option<AirShotInput>,
    pub after: Option<AirShotInput>,
}

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct CorrectedTimes {
    pub tt: Vec<Option<f64>>,
    pub t0: Vec<f64>,
    pub fac_dt: f64,
    /// Why calibration was not applied; `t0` is then all zero and `tt` the raw picks.
    pub error: Option<String>,
}

fn picks(times: &[Option<f64>], std_devs: &[Option<f64>]) -> Vec<Option<Pick>> {
    times
        .iter()
        .enumerate()
        .map(|(i, t)| t.map(|t| Pick::new(t, std_devs.get(i).copied().flatten())))
        .collect()
}

impl TryFrom<AirShotInput> for AirShotEntity {
    type Error = MogError;

    fn try_from(input: AirShotInput) -> Result<Self, MogError> {
        let method = if input.walkaway {
            AirShotMethod::Walkaway {
                separations: input.separations,
            }
        } else {
            let separation = input.separations.first().copied().ok_or_else(|| {
                MogError::Configuration(format!("air shot '{}' has no separation", input.name))
            })?;
            AirShotMethod::FixedAntenna { separation }
        };
        let data = GatherRecord {
            trace_count: input.times.len(),
            ..Default::default()
        };
        let mut shot = AirShotEntity::new(input.name, data, method);
        shot.picks = picks(&input.times, &input.std_devs);
        Ok(shot)
    }
}

#[uniffi::export]
pub fn decode_ramac(basename: String) -> Result<GatherView, MogError> {
    let gather = read_ramac(&basename, &CoreConfig::default())?;
    GatherView::try_from(&gather)
}

#[uniffi::export]
pub fn fixed_antenna_t0(
    times: Vec<Option<f64>>,
    std_devs: Vec<Option<f64>>,
    separation: f64,
    velocity: f64,
) -> f64 {
    get_t0_fixed(&picks(&times, &std_devs), separation, velocity)
}

#[uniffi::export]
pub fn calibrate_travel_times(request: CalibrationRequest) -> Result<CorrectedTimes, MogError> {
    let data = GatherRecord {
        trace_count: request.times.len(),
        synthetic: request.synthetic,
        ..Default::default()
    };
    let mut survey = SurveyEntity::new("", data, &mut MonotonicIds::new());
    survey.picks = picks(&request.times, &[]);
    survey.use_air_shots = request.use_air_shots;
    survey.user_fac_dt = request.user_fac_dt;

    let mut before = request.before.map(AirShotEntity::try_from).transpose()?;
    let mut after = request.after.map(AirShotEntity::try_from).transpose()?;

    let result = corrected_travel_times(
        &mut survey,
        before.as_mut(),
        after.as_mut(),
        &CoreConfig::default(),
    );

    Ok(match result {
        Ok(times) => CorrectedTimes {
            tt: times.tt,
            t0: times.t0,
            fac_dt: survey.fac_dt,
            error: None,
        },
        Err(e) => {
            tracing::warn!("calibration not applied: {}", e.reason);
            CorrectedTimes {
                tt: survey.picked_times(),
                t0: e.fallback.t0,
                fac_dt: survey.fac_dt,
                error: Some(e.reason.to_string()),
            }
        }
    })
}
