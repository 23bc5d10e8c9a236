pub mod calibration;
pub mod config;
pub mod error;
pub mod ffi;
pub mod formats;
pub mod memory_store;
pub mod models;
pub mod storage;

uniffi::setup_scaffolding!();

pub use calibration::{
    calibrate_stored_survey, corrected_travel_times, correction_t0, get_t0_fixed,
    CalibrationError, T0Correction, TravelTimes,
};
pub use config::CoreConfig;
pub use error::MogError;
pub use formats::{read_gather, read_ramac, FileKind, InstrumentFormat};
pub use memory_store::MemoryStore;
pub use models::{
    AirShotEntity, AirShotMethod, AmplitudeWindow, Estimate, GatherRecord, Pick, PruneParams,
    SurveyEntity, SurveyId, SurveyType,
};
pub use storage::{unique_name, IdSequence, MonotonicIds, SurveyStore};
