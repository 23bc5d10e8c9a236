use crate::error::MogError;
use crate::models::{AirShotEntity, SurveyEntity, SurveyId};

/// Persistence collaborator for surveys and air shots.
///
/// Implementations keep entities as opaque blobs keyed by name; surveys are
/// also reachable through their numeric id. Upserting under an existing name
/// replaces the previous entity.
pub trait SurveyStore {
    fn upsert_survey(&mut self, survey: SurveyEntity) -> Result<(), String>;
    fn load_survey(&self, name: &str) -> Result<Option<SurveyEntity>, String>;
    fn load_survey_by_id(&self, id: SurveyId) -> Result<Option<SurveyEntity>, String>;
    fn list_surveys(&self) -> Result<Vec<SurveyEntity>, String>;
    fn delete_survey(&mut self, name: &str) -> Result<bool, String>;

    fn upsert_air_shot(&mut self, shot: AirShotEntity) -> Result<(), String>;
    fn load_air_shot(&self, name: &str) -> Result<Option<AirShotEntity>, String>;
    fn list_air_shots(&self) -> Result<Vec<AirShotEntity>, String>;
}

/// Source of survey ids, owned by the persistence side.
pub trait IdSequence {
    fn next_id(&mut self) -> SurveyId;
}

/// Ids counting up from 1.
#[derive(Clone, Debug, Default)]
pub struct MonotonicIds {
    last: u64,
}

impl MonotonicIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for an id loaded from persistence so it is never issued again.
    pub fn observe(&mut self, id: SurveyId) {
        self.last = self.last.max(id.0);
    }
}

impl IdSequence for MonotonicIds {
    fn next_id(&mut self) -> SurveyId {
        self.last += 1;
        SurveyId(self.last)
    }
}

/// Derive a name not present in `existing` by appending " 1", " 2", ...
pub fn unique_name(name: &str, existing: &[String]) -> Result<String, MogError> {
    if name.is_empty() {
        return Err(MogError::Configuration("name must not be empty".to_string()));
    }

    let taken = |candidate: &str| existing.iter().any(|e| e == candidate);
    if !taken(name) {
        return Ok(name.to_string());
    }

    let mut suffix = 1u32;
    loop {
        let candidate = format!("{name} {suffix}");
        if !taken(&candidate) {
            return Ok(candidate);
        }
        suffix += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monotonic_ids() {
        let mut ids = MonotonicIds::new();
        assert_eq!(ids.next_id(), SurveyId(1));
        assert_eq!(ids.next_id(), SurveyId(2));

        ids.observe(SurveyId(10));
        assert_eq!(ids.next_id(), SurveyId(11));

        // A lower observed id never rewinds the sequence.
        ids.observe(SurveyId(3));
        assert_eq!(ids.next_id(), SurveyId(12));
    }

    #[test]
    fn test_unique_name() {
        let existing = vec!["M01".to_string(), "M01 1".to_string()];
        assert_eq!(unique_name("M02", &existing).unwrap(), "M02");
        assert_eq!(unique_name("M01", &existing).unwrap(), "M01 2");
        assert!(unique_name("", &existing).is_err());
    }
}
