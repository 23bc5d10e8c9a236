use crate::models::{AirShotEntity, SurveyEntity, SurveyId};
use crate::storage::{IdSequence, MonotonicIds, SurveyStore};

/// In-process store for hosts without a database.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    pub surveys: Vec<SurveyEntity>,
    pub air_shots: Vec<AirShotEntity>,
    ids: MonotonicIds,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn survey_names(&self) -> Vec<String> {
        self.surveys.iter().map(|s| s.name.clone()).collect()
    }
}

impl IdSequence for MemoryStore {
    fn next_id(&mut self) -> SurveyId {
        self.ids.next_id()
    }
}

impl SurveyStore for MemoryStore {
    fn upsert_survey(&mut self, survey: SurveyEntity) -> Result<(), String> {
        if survey.name.is_empty() {
            return Err("survey name must not be empty".to_string());
        }
        self.ids.observe(survey.id);
        match self.surveys.iter_mut().find(|s| s.name == survey.name) {
            Some(existing) => *existing = survey,
            None => self.surveys.push(survey),
        }
        Ok(())
    }

    fn load_survey(&self, name: &str) -> Result<Option<SurveyEntity>, String> {
        Ok(self.surveys.iter().find(|s| s.name == name).cloned())
    }

    fn load_survey_by_id(&self, id: SurveyId) -> Result<Option<SurveyEntity>, String> {
        Ok(self.surveys.iter().find(|s| s.id == id).cloned())
    }

    fn list_surveys(&self) -> Result<Vec<SurveyEntity>, String> {
        Ok(self.surveys.clone())
    }

    fn delete_survey(&mut self, name: &str) -> Result<bool, String> {
        let before = self.surveys.len();
        self.surveys.retain(|s| s.name != name);
        Ok(self.surveys.len() != before)
    }

    fn upsert_air_shot(&mut self, shot: AirShotEntity) -> Result<(), String> {
        if !shot.is_present() {
            return Err("air shot name must not be empty".to_string());
        }
        match self.air_shots.iter_mut().find(|s| s.name == shot.name) {
            Some(existing) => *existing = shot,
            None => self.air_shots.push(shot),
        }
        Ok(())
    }

    fn load_air_shot(&self, name: &str) -> Result<Option<AirShotEntity>, String> {
        Ok(self.air_shots.iter().find(|s| s.name == name).cloned())
    }

    fn list_air_shots(&self) -> Result<Vec<AirShotEntity>, String> {
        Ok(self.air_shots.clone())
    }
}
