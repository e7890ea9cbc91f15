//! Guided content models: sequences, sessions and steps
//!
//! A sequence is an ordered collection of sessions scoped to one cycle phase;
//! a session is an ordered collection of steps; a step is a single timed
//! instruction referencing a media asset. The foreign keys are resolved by
//! the backend, the console only groups by them for accordion display.

use serde::{Deserialize, Serialize};

/// Ordered collection of sessions scoped to one cycle phase.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Sequence {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    /// Parent cycle phase id
    pub cycle_phase: String,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub description: Option<String>,
}

/// One guided activity (yoga, meditation, ...) within a sequence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    /// Parent sequence id
    pub sequence: String,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub description: Option<String>,
}

/// A single timed instruction unit within a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    /// Parent session id
    pub session: String,
    #[serde(default)]
    pub order: i64,
    /// Duration in seconds
    #[serde(default)]
    pub duration: u64,
    /// Referenced media asset id, if any
    #[serde(default)]
    pub media: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_duration_defaults_to_zero() {
        let step: Step =
            serde_json::from_str(r#"{"_id":"st1","name":"Breathe","session":"s1"}"#).unwrap();
        assert_eq!(step.duration, 0);
        assert!(step.media.is_none());
    }

    #[test]
    fn sequence_keeps_camel_case_phase_key() {
        let sequence = Sequence {
            id: "sq1".into(),
            name: "Morning flow".into(),
            cycle_phase: "ph1".into(),
            order: 1,
            description: None,
        };
        let json = serde_json::to_value(&sequence).unwrap();
        assert_eq!(json["cyclePhase"], "ph1");
        assert_eq!(json["_id"], "sq1");
    }
}
