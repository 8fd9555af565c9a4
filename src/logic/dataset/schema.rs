//! Dataset Catalogue
//!
//! Declarative description of every supported dataset: where its rows
//! come from, which column is the outcome, how its models are scored and
//! how caller-facing fields project onto its own columns.

use serde::{Deserialize, Serialize};

use crate::constants::{CKD_THRESHOLD, DISEASE_THRESHOLD};
use crate::error::RiskError;

// ============================================================================
// DATASET KIND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DatasetKind {
    Disease,
    #[serde(rename = "CKD")]
    Ckd,
    #[serde(rename = "CASSI")]
    Cassi,
    MaternalHealth,
}

impl DatasetKind {
    /// Processing order of a risk assessment
    pub const ALL: [DatasetKind; 4] = [
        DatasetKind::Disease,
        DatasetKind::Ckd,
        DatasetKind::Cassi,
        DatasetKind::MaternalHealth,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetKind::Disease => "Disease",
            DatasetKind::Ckd => "CKD",
            DatasetKind::Cassi => "CASSI",
            DatasetKind::MaternalHealth => "MaternalHealth",
        }
    }

    pub fn schema(&self) -> &'static DatasetSchema {
        match self {
            DatasetKind::Disease => &DISEASE,
            DatasetKind::Ckd => &CKD,
            DatasetKind::Cassi => &CASSI,
            DatasetKind::MaternalHealth => &MATERNAL,
        }
    }
}

impl std::fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DatasetKind {
    type Err = RiskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DatasetKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| RiskError::UnknownDataset(s.to_string()))
    }
}

// ============================================================================
// SCHEMA TYPES
// ============================================================================

/// Where a dataset field takes its value from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSource {
    /// Copied from this caller-facing field
    External(&'static str),
    /// Not derivable from caller input; always emitted absent
    Missing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMapping {
    pub target: &'static str,
    pub source: FieldSource,
}

const fn mapped(target: &'static str, external: &'static str) -> FieldMapping {
    FieldMapping { target, source: FieldSource::External(external) }
}

const fn missing(target: &'static str) -> FieldMapping {
    FieldMapping { target, source: FieldSource::Missing }
}

/// Byte encoding of a dataset file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    /// ISO-8859-1: every byte is one char
    Latin1,
}

impl TextEncoding {
    pub fn decode(&self, bytes: &[u8]) -> String {
        match self {
            TextEncoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            TextEncoding::Latin1 => bytes.iter().map(|&b| b as char).collect(),
        }
    }
}

/// How the dataset's models turn predictions into percentages
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModelFamily {
    /// Supervised 0-1 signal, binarized against a percent threshold
    Labeled {
        threshold: f64,
        positive_label: &'static str,
    },
    /// Cluster assignment -> majority outcome label -> fixed risk value
    Unlabeled {
        risk_levels: &'static [(&'static str, f64)],
    },
}

#[derive(Debug)]
pub struct DatasetSchema {
    pub kind: DatasetKind,
    pub display_name: &'static str,
    pub file_name: &'static str,
    pub encoding: TextEncoding,
    pub label_column: &'static str,
    /// Column prefixes kept out of model features (besides the label)
    pub excluded_prefixes: &'static [&'static str],
    /// Raw cell markers treated as absent
    pub missing_markers: &'static [&'static str],
    /// Drop rows with any absent cell while loading
    pub drop_incomplete: bool,
    pub family: ModelFamily,
    /// Caller-facing priority rating for this dataset
    pub priority_field: &'static str,
    pub fields: &'static [FieldMapping],
    /// Batch harness: log file stem and expected-outcome column
    pub log_stem: &'static str,
    pub expected_column: &'static str,
}

impl DatasetSchema {
    /// True when a column is fed to the models
    pub fn is_feature(&self, column: &str) -> bool {
        column != self.label_column
            && !self.excluded_prefixes.iter().any(|p| column.starts_with(p))
    }
}

// ============================================================================
// CATALOGUE
// ============================================================================

pub static DISEASE: DatasetSchema = DatasetSchema {
    kind: DatasetKind::Disease,
    display_name: "Probability of patient in Critical Condition per Disease dataset",
    file_name: "disease.csv",
    encoding: TextEncoding::Utf8,
    label_column: "Critical",
    excluded_prefixes: &[],
    missing_markers: &[],
    drop_incomplete: true,
    family: ModelFamily::Labeled {
        threshold: DISEASE_THRESHOLD,
        positive_label: "Critical",
    },
    priority_field: "Disease_Weight",
    log_stem: "disease",
    expected_column: "Expected_Critical",
    fields: &[
        missing("Discharge"),
        mapped("Feelings_and_Urge", "Feelings_and_Urge"),
        missing("Pain_and_Infection"),
        missing("Physical_Conditions"),
        mapped("Critical_Feelings", "Critical_Feelings"),
        mapped("Disease", "Disease"),
    ],
};

pub static CKD: DatasetSchema = DatasetSchema {
    kind: DatasetKind::Ckd,
    display_name: "Probability of patient having Chronic Kidney Disease per CKD dataset",
    file_name: "ckd.csv",
    encoding: TextEncoding::Utf8,
    label_column: "ckd",
    excluded_prefixes: &[],
    missing_markers: &["?"],
    drop_incomplete: true,
    family: ModelFamily::Labeled {
        threshold: CKD_THRESHOLD,
        positive_label: "ckd",
    },
    priority_field: "CKD_Weight",
    log_stem: "ckd",
    expected_column: "Expected_CKD",
    fields: &[
        mapped("age", "Age"),
        mapped("bp", "Blood Pressure"),
        missing("sg"),
        missing("al"),
        missing("su"),
        missing("rcb"),
        missing("pc"),
        missing("pcc"),
        missing("ba"),
        mapped("bgr", "Blood Sugar"),
        missing("bu"),
        missing("sc"),
        missing("sod"),
        missing("pot"),
        missing("hemo"),
        missing("pcv"),
        missing("wbcc"),
        missing("rbcc"),
        missing("htn"),
        missing("dm"),
        missing("cad"),
        missing("appet"),
        missing("pe"),
        missing("ane"),
    ],
};

pub static CASSI: DatasetSchema = DatasetSchema {
    kind: DatasetKind::Cassi,
    display_name: "Probability of patient having new infections per CASSI Adult ODP 2022 dataset",
    file_name: "ca_ssi_adult_odp_2022.csv",
    encoding: TextEncoding::Latin1,
    label_column: "SIR",
    excluded_prefixes: &["SIR_"],
    missing_markers: &[],
    drop_incomplete: true,
    family: ModelFamily::Unlabeled {
        risk_levels: &[("Low", 0.0), ("Mid", 50.0), ("High", 100.0)],
    },
    priority_field: "SIR_Weight",
    log_stem: "cassi",
    expected_column: "Expected_SIR",
    fields: &[
        missing("SIR_CI_95_Lower_Limit"),
        missing("SIR_CI_95_Upper_Limit"),
        missing("SIR_2015"),
        mapped("Operative_Procedure", "Operative_Procedure"),
        mapped("Infections_Reported", "Infections Reported"),
        missing("Infections_Predicted"),
        mapped("Procedure_Count", "Procedure Count"),
    ],
};

pub static MATERNAL: DatasetSchema = DatasetSchema {
    kind: DatasetKind::MaternalHealth,
    display_name: "Patient's risk level per Maternal Health Risk dataset",
    file_name: "maternal_health_risk.csv",
    encoding: TextEncoding::Utf8,
    label_column: "RiskLevel",
    excluded_prefixes: &[],
    missing_markers: &[],
    drop_incomplete: false,
    family: ModelFamily::Unlabeled {
        risk_levels: &[("low risk", 0.0), ("mid risk", 50.0), ("high risk", 100.0)],
    },
    priority_field: "MA_Weight",
    log_stem: "maternal",
    expected_column: "Expected_Risk",
    fields: &[
        mapped("Age", "Age"),
        mapped("SystolicBP", "Blood Pressure"),
        missing("DiastolicBP"),
        mapped("BS", "Blood Sugar"),
        mapped("BodyTemp", "Body Temperature"),
        mapped("HeartRate", "Heart Rate"),
    ],
};
