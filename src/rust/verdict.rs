use std::fmt;

use crate::classifier::ClassificationResult;
use crate::session::RequestState;

/// Display class attached to a verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerdictStyle {
    WillEat,
    WillNotEat,
}

impl VerdictStyle {
    pub fn class_name(&self) -> &'static str {
        match self {
            VerdictStyle::WillEat => "will-eat",
            VerdictStyle::WillNotEat => "will-not-eat",
        }
    }
}

impl fmt::Display for VerdictStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class_name())
    }
}

/// The human-facing judgment derived from a label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub message: &'static str,
    pub style: VerdictStyle,
}

/// Maps a classification label to Jangle's verdict. Matching is exact and case-sensitive.
pub fn label_to_verdict(label: Option<&str>) -> Option<Verdict> {
    let verdict = match label? {
        "not_durian_edible" => Verdict {
            message: "Jangle will eat this!",
            style: VerdictStyle::WillEat,
        },
        "durian" => Verdict {
            message: "Jangle will NOT eat this! (It's durian — he hates durian)",
            style: VerdictStyle::WillNotEat,
        },
        "inedible" => Verdict {
            message: "Jangle will NOT eat this! (Not food)",
            style: VerdictStyle::WillNotEat,
        },
        _ => Verdict {
            message: "Hmm, I'm not sure about this one…",
            style: VerdictStyle::WillNotEat,
        },
    };
    Some(verdict)
}

/// Whole-percent confidence, or `None` when there is nothing worth showing
pub fn confidence_percent(confidence: f64) -> Option<u32> {
    if confidence > 0.0 {
        Some((confidence * 100.0).round() as u32)
    } else {
        None
    }
}

/// Lines describing a successful result, in display order
pub fn render_result(result: &ClassificationResult) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(verdict) = label_to_verdict(Some(&result.label)) {
        lines.push(format!("[{}] {}", verdict.style, verdict.message));
    }
    if let Some(percent) = confidence_percent(result.confidence) {
        lines.push(format!("Confidence: {}%", percent));
    }
    if !result.score_breakdown.is_empty() {
        let scores = serde_json::to_string_pretty(&result.score_breakdown)
            .unwrap_or_else(|_| format!("{:?}", result.score_breakdown));
        lines.push(format!("All scores: {}", scores));
    }
    lines
}

/// Lines for whatever the session is currently showing
pub fn render(state: &RequestState) -> Vec<String> {
    match state {
        RequestState::Idle => Vec::new(),
        RequestState::Loading => vec!["Analyzing...".to_string()],
        RequestState::Succeeded(result) => render_result(result),
        RequestState::Failed(err) => vec![err.user_message()],
    }
}
