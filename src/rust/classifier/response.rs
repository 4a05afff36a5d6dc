use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ClassifyError;

/// Canonical result every transport response is coerced into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub label: String,
    /// Confidence of `label`, in `[0, 1]`
    pub confidence: f64,
    /// Per-label scores, empty when the remote didn't report any
    #[serde(default)]
    pub score_breakdown: BTreeMap<String, f64>,
    /// Set only when the remote reports its own eat/no-eat decision
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub will_eat: Option<bool>,
}

/// `{prediction, confidence, all_scores, will_eat}` or `{error}`
#[derive(Debug, Default, Deserialize)]
pub(crate) struct FlatPrediction {
    #[serde(default)]
    pub prediction: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub all_scores: Option<BTreeMap<String, f64>>,
    #[serde(default)]
    pub will_eat: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Label output of the hosted space: `{label, confidences: [{label, confidence}]}`
#[derive(Debug, Deserialize)]
pub(crate) struct LabelPrediction {
    pub label: String,
    #[serde(default)]
    pub confidences: Vec<LabelConfidence>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LabelConfidence {
    pub label: String,
    pub confidence: f64,
}

/// Shape returned by the Python app: `{prediction: <verdict text>, predicted_class, confidence_scores}`
#[derive(Debug, Deserialize)]
pub(crate) struct ClassScoresPrediction {
    pub predicted_class: String,
    #[serde(default)]
    pub confidence_scores: BTreeMap<String, f64>,
}

/// `{data: [...]}` envelope of an RPC call
#[derive(Debug, Deserialize)]
pub(crate) struct RpcEnvelope {
    #[serde(default)]
    pub data: Vec<Value>,
}

impl From<FlatPrediction> for ClassificationResult {
    fn from(flat: FlatPrediction) -> Self {
        Self {
            label: flat
                .prediction
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| "unknown".to_string()),
            confidence: flat.confidence.unwrap_or(0.0),
            score_breakdown: flat.all_scores.unwrap_or_default(),
            will_eat: flat.will_eat,
        }
    }
}

impl From<LabelPrediction> for ClassificationResult {
    fn from(prediction: LabelPrediction) -> Self {
        let confidence = prediction
            .confidences
            .iter()
            .find(|c| c.label == prediction.label)
            .map(|c| c.confidence)
            .unwrap_or(0.0);
        let score_breakdown = prediction
            .confidences
            .into_iter()
            .map(|c| (c.label, c.confidence))
            .collect();
        Self {
            label: prediction.label,
            confidence,
            score_breakdown,
            will_eat: None,
        }
    }
}

impl From<ClassScoresPrediction> for ClassificationResult {
    fn from(prediction: ClassScoresPrediction) -> Self {
        let confidence = prediction
            .confidence_scores
            .get(&prediction.predicted_class)
            .copied()
            .unwrap_or(0.0);
        Self {
            label: prediction.predicted_class,
            confidence,
            score_breakdown: prediction.confidence_scores,
            will_eat: None,
        }
    }
}

/// Normalizes the JSON body of the multipart endpoint.
///
/// An explicit `error` field is surfaced verbatim as a transport error.
pub fn normalize_flat(body: Value) -> Result<ClassificationResult, ClassifyError> {
    if !body.is_object() {
        return Err(ClassifyError::unexpected());
    }
    let flat: FlatPrediction = serde_json::from_value(body)?;
    if let Some(error) = flat.error {
        return Err(ClassifyError::Transport(error));
    }
    Ok(flat.into())
}

/// Normalizes one element of an RPC `data` list, whichever shape the space returned.
pub fn normalize_rpc_item(item: Value) -> Result<ClassificationResult, ClassifyError> {
    let object = item.as_object().ok_or_else(ClassifyError::unexpected)?;

    if object.contains_key("label") {
        let prediction: LabelPrediction = serde_json::from_value(item)?;
        return Ok(prediction.into());
    }
    if object.contains_key("predicted_class") {
        let prediction: ClassScoresPrediction = serde_json::from_value(item)?;
        return Ok(prediction.into());
    }
    normalize_flat(item)
}

/// Normalizes a full RPC response. The first element of `data` is the prediction.
pub fn normalize_rpc(body: Value) -> Result<ClassificationResult, ClassifyError> {
    let envelope: RpcEnvelope = serde_json::from_value(body)?;
    let first = envelope
        .data
        .into_iter()
        .next()
        .ok_or_else(ClassifyError::unexpected)?;
    normalize_rpc_item(first)
}
