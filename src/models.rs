use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::storage::IdSequence;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SurveyId(pub u64);

/// One decoded multi-offset gather: waveforms plus acquisition geometry.
///
/// `waveforms` is sample-major: `samples_per_trace` rows by `trace_count`
/// columns. After assembly every depth and position array has exactly
/// `trace_count` entries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GatherRecord {
    pub name: String,
    pub trace_count: usize,
    pub samples_per_trace: usize,
    /// Time step between samples, in `time_units`.
    pub sample_interval: f64,
    /// Sample times, `sample_interval * k` for each sample `k`.
    pub times: Vec<f64>,
    /// Nominal antenna frequency (MHz).
    pub nominal_frequency: f64,
    pub survey_mode: String,
    /// True for numerically modelled data.
    pub synthetic: bool,
    pub waveforms: Array2<f64>,
    pub tx_x: Vec<f64>,
    pub tx_y: Vec<f64>,
    pub tx_z: Vec<f64>,
    pub rx_x: Vec<f64>,
    pub rx_y: Vec<f64>,
    pub rx_z: Vec<f64>,
    pub antennas: String,
    /// Antenna length above the surface at the transmitter.
    pub tx_offset: f64,
    /// Antenna length above the surface at the receiver.
    pub rx_offset: f64,
    pub time_units: String,
    pub coord_units: String,
    pub comment: String,
    pub date: String,
}

impl Default for GatherRecord {
    fn default() -> Self {
        Self {
            name: String::new(),
            trace_count: 0,
            samples_per_trace: 0,
            sample_interval: 0.0,
            times: Vec::new(),
            nominal_frequency: 0.0,
            survey_mode: String::new(),
            synthetic: false,
            waveforms: Array2::zeros((0, 0)),
            tx_x: Vec::new(),
            tx_y: Vec::new(),
            tx_z: Vec::new(),
            rx_x: Vec::new(),
            rx_y: Vec::new(),
            rx_z: Vec::new(),
            antennas: String::new(),
            tx_offset: 0.0,
            rx_offset: 0.0,
            time_units: String::new(),
            coord_units: String::new(),
            comment: String::new(),
            date: String::new(),
        }
    }
}

impl GatherRecord {
    /// Smallest and largest depth over transmitters and receivers.
    pub fn depth_range(&self) -> Option<(f64, f64)> {
        self.tx_z
            .iter()
            .chain(self.rx_z.iter())
            .copied()
            .fold(None, |acc, z| match acc {
                None => Some((z, z)),
                Some((lo, hi)) => Some((lo.min(z), hi.max(z))),
            })
    }
}

/// A picked arrival time and, when available, its standard deviation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pick {
    pub time: f64,
    pub std_dev: Option<f64>,
}

impl Pick {
    pub fn new(time: f64, std_dev: Option<f64>) -> Self {
        Self { time, std_dev }
    }
}

/// A pseudo travel time and its standard deviation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    pub value: f64,
    pub std_dev: f64,
}

/// Time window used for amplitude analysis of one trace.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AmplitudeWindow {
    pub tmin: f64,
    pub tmax: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurveyType {
    #[default]
    Vrp,
    CrossHole,
}

/// Trace selection criteria applied before inversion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PruneParams {
    pub step_tx: u32,
    pub step_rx: u32,
    pub round_factor: f64,
    pub use_snr: bool,
    pub threshold_snr: f64,
    pub zmin: f64,
    pub zmax: f64,
    /// Ray angle window in degrees.
    pub theta_min: f64,
    pub theta_max: f64,
}

impl Default for PruneParams {
    fn default() -> Self {
        Self {
            step_tx: 0,
            step_rx: 0,
            round_factor: 0.0,
            use_snr: false,
            threshold_snr: 0.0,
            zmin: -1e99,
            zmax: 1e99,
            theta_min: -90.0,
            theta_max: 90.0,
        }
    }
}

/// A named survey with everything measured on its traces.
///
/// Every per-trace vector has `data.trace_count` entries. `None` marks a
/// trace that has not been picked or processed yet.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SurveyEntity {
    pub id: SurveyId,
    pub name: String,
    pub data: GatherRecord,
    pub prune: PruneParams,
    pub survey_type: SurveyType,
    pub tx_borehole: Option<String>,
    pub rx_borehole: Option<String>,
    pub air_before: Option<String>,
    pub air_after: Option<String>,
    pub use_air_shots: bool,
    /// Resolved time-step correction factor.
    pub fac_dt: f64,
    /// Correction factor pinned by the user; `None` means computed.
    pub user_fac_dt: Option<f64>,
    pub f_et: f64,
    pub amp_name_ldc: String,
    pub tau_params: Vec<f64>,
    pub date: String,
    pub in_tx: Vec<bool>,
    pub in_rx: Vec<bool>,
    pub in_vect: Vec<bool>,
    pub picks: Vec<Option<Pick>>,
    pub amp_windows: Vec<Option<AmplitudeWindow>>,
    /// Peak-to-peak amplitude.
    pub app: Vec<f64>,
    pub fcentroid: Vec<f64>,
    pub scentroid: Vec<f64>,
    pub tau_app: Vec<Option<Estimate>>,
    pub tau_fce: Vec<Option<Estimate>>,
    pub tau_hyb: Vec<Option<Estimate>>,
    pub tx_cos_dir: Vec<[f64; 3]>,
    pub rx_cos_dir: Vec<[f64; 3]>,
    pub tx_z_orig: Vec<f64>,
    pub rx_z_orig: Vec<f64>,
}

impl SurveyEntity {
    /// Wrap a decoded gather; the id is drawn from `ids`.
    pub fn new<S: IdSequence>(name: impl Into<String>, data: GatherRecord, ids: &mut S) -> Self {
        let n = data.trace_count;
        let mut prune = PruneParams::default();
        if let Some((zmin, zmax)) = data.depth_range() {
            prune.zmin = zmin;
            prune.zmax = zmax;
        }

        Self {
            id: ids.next_id(),
            name: name.into(),
            prune,
            survey_type: SurveyType::default(),
            tx_borehole: None,
            rx_borehole: None,
            air_before: None,
            air_after: None,
            use_air_shots: false,
            fac_dt: 1.0,
            user_fac_dt: None,
            f_et: 1.0,
            amp_name_ldc: String::new(),
            tau_params: Vec::new(),
            date: data.date.clone(),
            in_tx: vec![true; n],
            in_rx: vec![true; n],
            in_vect: vec![true; n],
            picks: vec![None; n],
            amp_windows: vec![None; n],
            app: vec![0.0; n],
            fcentroid: vec![0.0; n],
            scentroid: vec![0.0; n],
            tau_app: vec![None; n],
            tau_fce: vec![None; n],
            tau_hyb: vec![None; n],
            tx_cos_dir: vec![[0.0; 3]; n],
            rx_cos_dir: vec![[0.0; 3]; n],
            tx_z_orig: data.tx_z.clone(),
            rx_z_orig: data.rx_z.clone(),
            data,
        }
    }

    pub fn trace_count(&self) -> usize {
        self.data.trace_count
    }

    pub fn is_picked(&self, trace: usize) -> bool {
        matches!(self.picks.get(trace), Some(Some(_)))
    }

    pub fn picked_count(&self) -> usize {
        self.picks.iter().filter(|p| p.is_some()).count()
    }

    /// Raw picked times, trace by trace.
    pub fn picked_times(&self) -> Vec<Option<f64>> {
        self.picks.iter().map(|p| p.map(|p| p.time)).collect()
    }
}

/// How an air shot was acquired.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum AirShotMethod {
    /// A single, fixed Tx-Rx separation.
    FixedAntenna { separation: f64 },
    /// A sweep over several Tx-Rx separations.
    Walkaway { separations: Vec<f64> },
}

/// A calibration recording taken with the antennas in air.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AirShotEntity {
    pub name: String,
    pub data: GatherRecord,
    pub method: AirShotMethod,
    /// Time-step correction factor estimated from this shot.
    pub fac_dt: f64,
    pub picks: Vec<Option<Pick>>,
}

impl AirShotEntity {
    pub fn new(name: impl Into<String>, data: GatherRecord, method: AirShotMethod) -> Self {
        let n = data.trace_count;
        Self {
            name: name.into(),
            data,
            method,
            fac_dt: 1.0,
            picks: vec![None; n],
        }
    }

    /// An air shot without a name stands for "no reference selected".
    pub fn is_present(&self) -> bool {
        !self.name.is_empty()
    }
}
