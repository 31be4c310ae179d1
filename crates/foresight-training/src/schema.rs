//! Parameter schema registry.
//!
//! Every model family is described by a row in [`PROFILES`]: the fields it
//! exposes, whether the shared deep-learning group applies, and which optional
//! result fields it produces. Adding a family means adding a row here.

use crate::error::Result;
use crate::family::ModelFamily;
use serde::Serialize;

/// Value domain of a parameter field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Integer,
    Float,
    /// One of a fixed set of strings.
    Choice(&'static [&'static str]),
}

impl FieldKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Choice(_) => "enum",
        }
    }
}

/// Declaration of a single tunable field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldSpec {
    /// Wire name inside `params`.
    pub name: &'static str,
    /// Human readable label.
    pub label: &'static str,
    pub kind: FieldKind,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub step: Option<f64>,
    /// Default, in the same textual form a user would type.
    pub default: &'static str,
}

impl FieldSpec {
    const fn integer(name: &'static str, label: &'static str, min: f64, max: Option<f64>, default: &'static str) -> Self {
        Self { name, label, kind: FieldKind::Integer, min: Some(min), max, step: Some(1.0), default }
    }

    const fn float(
        name: &'static str,
        label: &'static str,
        min: f64,
        max: Option<f64>,
        step: f64,
        default: &'static str,
    ) -> Self {
        Self { name, label, kind: FieldKind::Float, min: Some(min), max, step: Some(step), default }
    }

    const fn choice(name: &'static str, label: &'static str, values: &'static [&'static str], default: &'static str) -> Self {
        Self { name, label, kind: FieldKind::Choice(values), min: None, max: None, step: None, default }
    }

    /// Allowed values for enum fields.
    #[must_use]
    pub fn choices(&self) -> Option<&'static [&'static str]> {
        match self.kind {
            FieldKind::Choice(values) => Some(values),
            _ => None,
        }
    }
}

/// Optional result fields a family is expected to produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResultExpectations {
    pub aic: bool,
    pub mape: bool,
    pub feature_importance: bool,
    pub history: bool,
    pub training_time: bool,
}

const NEURAL: ResultExpectations = ResultExpectations {
    aic: false,
    mape: false,
    feature_importance: false,
    history: true,
    training_time: false,
};

const CLASSICAL: ResultExpectations = ResultExpectations {
    aic: false,
    mape: false,
    feature_importance: false,
    history: false,
    training_time: true,
};

/// Registry row for one model family.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FamilyProfile {
    pub family: ModelFamily,
    /// Family-specific fields, in display order.
    pub fields: &'static [FieldSpec],
    /// Whether [`COMMON_FIELDS`] are active for this family.
    pub common_group: bool,
    pub expects: ResultExpectations,
}

/// Shared group for the deep-learning families.
pub const COMMON_FIELDS: &[FieldSpec] = &[
    FieldSpec::integer("sequenceLength", "Sequence Length", 1.0, None, "10"),
    FieldSpec::integer("denseUnits", "Dense Units", 1.0, None, "64"),
    FieldSpec::integer("epochs", "Epochs", 1.0, None, "50"),
];

pub static PROFILES: [FamilyProfile; 6] = [
    FamilyProfile {
        family: ModelFamily::Cnn,
        fields: &[
            FieldSpec::integer("numFilters", "Number of Filters", 1.0, None, "64"),
            FieldSpec::integer("kernelSize", "Kernel Size", 1.0, None, "3"),
        ],
        common_group: true,
        expects: NEURAL,
    },
    FamilyProfile {
        family: ModelFamily::Lstm,
        fields: &[FieldSpec::integer("lstmUnits", "LSTM Units", 1.0, None, "50")],
        common_group: true,
        expects: NEURAL,
    },
    FamilyProfile {
        family: ModelFamily::Arima,
        fields: &[
            FieldSpec::integer("p", "p (AR order)", 0.0, Some(10.0), "1"),
            FieldSpec::integer("d", "d (Differencing)", 0.0, Some(2.0), "1"),
            FieldSpec::integer("q", "q (MA order)", 0.0, Some(10.0), "1"),
        ],
        common_group: false,
        expects: ResultExpectations { aic: true, ..CLASSICAL },
    },
    FamilyProfile {
        family: ModelFamily::Prophet,
        fields: &[
            FieldSpec::choice("seasonalityMode", "Seasonality Mode", &["additive", "multiplicative"], "additive"),
            FieldSpec::float("changePointPrior", "Changepoint Prior Scale", 0.001, None, 0.001, "0.05"),
            FieldSpec::float("seasonalityPrior", "Seasonality Prior Scale", 0.01, None, 0.01, "10"),
        ],
        common_group: false,
        expects: ResultExpectations { mape: true, ..CLASSICAL },
    },
    FamilyProfile {
        family: ModelFamily::XgBoost,
        fields: &[
            FieldSpec::integer("maxDepth", "Max Depth", 1.0, Some(15.0), "6"),
            FieldSpec::float("learningRate", "Learning Rate", 0.001, Some(1.0), 0.001, "0.1"),
            FieldSpec::integer("nEstimators", "Number of Estimators", 10.0, Some(1000.0), "100"),
        ],
        common_group: false,
        expects: ResultExpectations { feature_importance: true, ..CLASSICAL },
    },
    FamilyProfile {
        family: ModelFamily::Transformer,
        fields: &[
            FieldSpec::integer("numHeads", "Number of Heads", 1.0, Some(16.0), "8"),
            FieldSpec::integer("numEncoderLayers", "Number of Encoder Layers", 1.0, Some(12.0), "4"),
            FieldSpec::float("dropoutRate", "Dropout Rate", 0.0, Some(0.5), 0.01, "0.1"),
            FieldSpec { step: Some(16.0), ..FieldSpec::integer("dimModel", "Model Dimension", 16.0, Some(512.0), "64") },
        ],
        common_group: true,
        expects: NEURAL,
    },
];

impl ModelFamily {
    /// Registry row for this family.
    #[must_use]
    pub fn profile(&self) -> &'static FamilyProfile {
        // PROFILES holds one row per variant, in declaration order.
        &PROFILES[*self as usize]
    }
}

/// Ordered field list for a family: the common group (when active) followed by
/// the family-specific fields.
#[must_use]
pub fn schema_for(family: ModelFamily) -> Vec<&'static FieldSpec> {
    let profile = family.profile();
    let common: &'static [FieldSpec] = if profile.common_group { COMMON_FIELDS } else { &[] };
    common.iter().chain(profile.fields.iter()).collect()
}

/// Looks a family up by its wire name before resolving its schema.
pub fn schema_for_name(name: &str) -> Result<Vec<&'static FieldSpec>> {
    Ok(schema_for(name.parse()?))
}
