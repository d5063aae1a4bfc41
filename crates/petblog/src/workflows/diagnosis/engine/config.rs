pub const DEFAULT_MIN_QUESTIONS: u32 = 5;
pub const DEFAULT_STOP_THRESHOLD: f64 = 0.45;
pub const DEFAULT_RESULT_LIMIT: usize = 5;

/// How `is_required` links influence scoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequiredSymptomPolicy {
    /// Required flags are carried for display only and never change a score.
    #[default]
    Informational,
    /// A disease is dropped from the ranking while any of its required symptoms is unconfirmed.
    Enforce,
}

/// Interview and scoring dials for the diagnosis engine.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub min_questions: u32,
    pub stop_threshold: f64,
    pub result_limit: usize,
    pub required_symptoms: RequiredSymptomPolicy,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), EngineConfigError> {
        if !self.stop_threshold.is_finite() || !(0.0..=1.0).contains(&self.stop_threshold) {
            return Err(EngineConfigError::InvalidThreshold(self.stop_threshold));
        }
        if self.result_limit == 0 {
            return Err(EngineConfigError::InvalidResultLimit);
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_questions: DEFAULT_MIN_QUESTIONS,
            stop_threshold: DEFAULT_STOP_THRESHOLD,
            result_limit: DEFAULT_RESULT_LIMIT,
            required_symptoms: RequiredSymptomPolicy::Informational,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineConfigError {
    #[error("stop threshold {0} must lie within [0, 1]")]
    InvalidThreshold(f64),
    #[error("result limit must be at least 1")]
    InvalidResultLimit,
}
