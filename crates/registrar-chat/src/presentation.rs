//! Response presentation.
//!
//! Turns a [`BotResponse`] into the pieces a front-end draws: the answer,
//! an exact-match marker, a tiered confidence badge, and a collapsible
//! evidence panel. Rendering is pure.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{BotResponse, ResponseKind};

/// Title of the evidence panel's toggle.
pub const EVIDENCE_TITLE: &str = "Show Verified Evidence";

/// Label of the exact-match marker.
pub const EXACT_MATCH_LABEL: &str = "Exact Match";

/// Display bucket for a confidence value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
}

impl ConfidenceTier {
    /// `> 0.7` is high, `> 0.4` is medium, everything else is low.
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence > 0.7 {
            ConfidenceTier::High
        } else if confidence > 0.4 {
            ConfidenceTier::Medium
        } else {
            ConfidenceTier::Low
        }
    }
}

impl fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfidenceTier::High => write!(f, "high"),
            ConfidenceTier::Medium => write!(f, "medium"),
            ConfidenceTier::Low => write!(f, "low"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfidenceBadge {
    pub tier: ConfidenceTier,
    /// Confidence as a whole percentage.
    pub percent: u32,
}

impl ConfidenceBadge {
    pub fn new(confidence: f64) -> Self {
        let percent = (confidence.clamp(0.0, 1.0) * 100.0).round() as u32;
        Self {
            tier: ConfidenceTier::from_confidence(confidence),
            percent,
        }
    }

    pub fn label(&self) -> String {
        format!("Confidence: {}%", self.percent)
    }
}

/// Expandable block holding the evidence text verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidencePanel {
    pub title: String,
    pub body: String,
    /// Panels start collapsed; the front-end owns expansion.
    pub collapsed: bool,
}

/// Presentation-ready form of a bot reply.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RenderedResponse {
    pub kind: ResponseKind,
    /// Answer text with embedded line breaks preserved.
    pub answer: String,
    pub exact_match: bool,
    pub confidence: Option<ConfidenceBadge>,
    pub evidence: Option<EvidencePanel>,
}

/// Render a response for display.
pub fn render(response: &BotResponse) -> RenderedResponse {
    RenderedResponse {
        kind: response.kind,
        answer: response.answer.clone(),
        exact_match: response.kind == ResponseKind::Exact,
        confidence: response.confidence.map(ConfidenceBadge::new),
        evidence: response.evidence.as_ref().map(|body| EvidencePanel {
            title: EVIDENCE_TITLE.to_string(),
            body: body.clone(),
            collapsed: true,
        }),
    }
}

// =============================================================================
// Tests
// =============================================================================
