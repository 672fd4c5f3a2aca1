use serde::{Deserialize, Serialize};

use crate::divination::bazi::BaziChart;
use crate::divination::zhouyi::{CastMethod, Casting};
use crate::divination::ziwei::ZiweiChart;
use crate::divination::Gender;

// ────────────────────────────────────────────────────────────────────────────
// Request
// ────────────────────────────────────────────────────────────────────────────

/// Birth data as submitted by the form. Range checks happen in `BirthMoment::new`.
#[derive(Debug, Clone, Deserialize)]
pub struct BirthInput {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub gender: Gender,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DivinationInput {
    #[serde(default)]
    pub method: CastMethod,
    #[serde(default)]
    pub question: Option<String>,
}

/// Body of `POST /analyze`.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeRequest {
    pub birth: BirthInput,
    #[serde(default)]
    pub divination: DivinationInput,
}

// ────────────────────────────────────────────────────────────────────────────
// Computed charts and interpretation
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct Charts {
    pub bazi: BaziChart,
    pub ziwei: ZiweiChart,
    pub zhouyi: Casting,
}

/// Natural-language readings, one per chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interpretation {
    pub bazi: String,
    pub ziwei: String,
    pub zhouyi: String,
}

impl Interpretation {
    /// Names of fields the model left blank.
    pub fn blank_fields(&self) -> Vec<&'static str> {
        [
            ("bazi", &self.bazi),
            ("ziwei", &self.ziwei),
            ("zhouyi", &self.zhouyi),
        ]
        .into_iter()
        .filter(|(_, text)| text.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Response
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeResponse {
    pub bazi: String,
    pub ziwei: String,
    pub zhouyi: String,
    /// Absolute URL of the generated PDF.
    pub pdf_report: String,
    pub charts: Charts,
}
