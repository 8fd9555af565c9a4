//! Risk Assessment Request
//!
//! Caller-facing payload. Clinical fields arrive as free text and may be
//! blank; the four priority ratings are integers 0-5 (no validation here).

use serde::{Deserialize, Serialize};

use crate::logic::record::{Record, Value};

// External field names (caller schema)
pub const AGE: &str = "Age";
pub const BLOOD_PRESSURE: &str = "Blood Pressure";
pub const BLOOD_SUGAR: &str = "Blood Sugar";
pub const PROCEDURE_COUNT: &str = "Procedure Count";
pub const INFECTIONS_REPORTED: &str = "Infections Reported";
pub const BODY_TEMPERATURE: &str = "Body Temperature";
pub const HEART_RATE: &str = "Heart Rate";
pub const OPERATIVE_PROCEDURE: &str = "Operative_Procedure";
pub const FEELINGS_AND_URGE: &str = "Feelings_and_Urge";
pub const CRITICAL_FEELINGS: &str = "Critical_Feelings";
pub const DISEASE: &str = "Disease";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RiskAssessmentRequest {
    pub age: Option<String>,
    pub blood_pressure: Option<String>,
    pub blood_sugar: Option<String>,
    pub procedure_count: Option<String>,
    pub infections_reported: Option<String>,
    pub body_temperature: Option<String>,
    pub heart_rate: Option<String>,
    pub operative_procedure: Option<String>,
    pub feelings_and_urge: Option<String>,
    pub critical_feelings: Option<String>,
    pub disease: Option<String>,

    pub disease_rating: Option<u32>,
    pub ckd_rating: Option<u32>,
    pub sir_rating: Option<u32>,
    pub ma_rating: Option<u32>,
}

impl RiskAssessmentRequest {
    /// Flatten into the external record consumed by `mapping::project`.
    ///
    /// Numeric fields: blank → absent, parseable → number, otherwise the
    /// text is kept (it then compares as a category). Missing ratings → 0.
    pub fn to_external_record(&self) -> Record {
        Record::new()
            .with(AGE, numeric(&self.age))
            .with(BLOOD_PRESSURE, numeric(&self.blood_pressure))
            .with(BLOOD_SUGAR, numeric(&self.blood_sugar))
            .with(PROCEDURE_COUNT, numeric(&self.procedure_count))
            .with(INFECTIONS_REPORTED, numeric(&self.infections_reported))
            .with(BODY_TEMPERATURE, numeric(&self.body_temperature))
            .with(HEART_RATE, numeric(&self.heart_rate))
            .with(OPERATIVE_PROCEDURE, text(&self.operative_procedure))
            .with(FEELINGS_AND_URGE, text(&self.feelings_and_urge))
            .with(CRITICAL_FEELINGS, text(&self.critical_feelings))
            .with(DISEASE, text(&self.disease))
            .with("SIR_Weight", rating(self.sir_rating))
            .with("MA_Weight", rating(self.ma_rating))
            .with("Disease_Weight", rating(self.disease_rating))
            .with("CKD_Weight", rating(self.ckd_rating))
    }
}

fn non_blank(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn numeric(raw: &Option<String>) -> Option<Value> {
    non_blank(raw).map(Value::parse)
}

fn text(raw: &Option<String>) -> Option<Value> {
    non_blank(raw).map(Value::from)
}

fn rating(raw: Option<u32>) -> Option<Value> {
    Some(Value::Number(raw.unwrap_or(0) as f64))
}
