//! Linear classifier store
//!
//! JSON artifact holding a fitted linear model (logistic regression, linear
//! SVM, ...) as exported from its coefficients:
//!
//! ```json
//! {
//!   "feature_names": ["Age", "Weather_Clear", "..."],
//!   "classes": [0, 1, 2],
//!   "coefficients": [[...], [...], [...]],
//!   "intercepts": [0.1, -0.2, 0.05]
//! }
//! ```
//!
//! `feature_names` is optional. A binary model may carry a single
//! coefficient row; a positive decision value selects `classes[1]`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::inference::{InferenceError, ModelMetadata, ModelStore};
use crate::logic::features::AlignedRow;

/// Serialized linear model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
    pub classes: Vec<i64>,
    pub coefficients: Vec<Vec<f32>>,
    pub intercepts: Vec<f32>,
}

impl LinearModel {
    /// Number of input features
    pub fn width(&self) -> usize {
        self.coefficients.first().map_or(0, Vec::len)
    }

    fn is_binary(&self) -> bool {
        self.coefficients.len() == 1 && self.classes.len() == 2
    }

    fn validate(&self) -> Result<(), String> {
        if self.coefficients.is_empty() {
            return Err("no coefficient rows".to_string());
        }
        if self.coefficients.len() != self.intercepts.len() {
            return Err(format!(
                "{} coefficient rows but {} intercepts",
                self.coefficients.len(),
                self.intercepts.len()
            ));
        }
        if !self.is_binary() && self.coefficients.len() != self.classes.len() {
            return Err(format!(
                "{} coefficient rows but {} classes",
                self.coefficients.len(),
                self.classes.len()
            ));
        }

        let width = self.width();
        if width == 0 {
            return Err("coefficient rows are empty".to_string());
        }
        if self.coefficients.iter().any(|row| row.len() != width) {
            return Err("coefficient rows differ in width".to_string());
        }
        if let Some(names) = &self.feature_names {
            if names.len() != width {
                return Err(format!("{} feature names for {} coefficients", names.len(), width));
            }
        }

        Ok(())
    }

    /// Decision value per coefficient row
    fn decision(&self, x: &[f32]) -> Vec<f32> {
        self.coefficients
            .iter()
            .zip(&self.intercepts)
            .map(|(w, b)| w.iter().zip(x).map(|(w, x)| w * x).sum::<f32>() + b)
            .collect()
    }

    /// Predict the class for a feature slice of exactly `width()` values
    pub fn predict(&self, x: &[f32]) -> i64 {
        let scores = self.decision(x);

        if self.is_binary() {
            return if scores[0] > 0.0 { self.classes[1] } else { self.classes[0] };
        }

        // First maximum wins on ties
        let mut best = 0;
        for (i, &score) in scores.iter().enumerate().skip(1) {
            if score > scores[best] {
                best = i;
            }
        }
        self.classes[best]
    }
}

/// Model store backed by a [`LinearModel`]
pub struct LinearModelStore {
    model: LinearModel,
    metadata: ModelMetadata,
}

impl LinearModelStore {
    pub fn new(model: LinearModel, model_path: impl Into<String>) -> Result<Self, InferenceError> {
        model.validate().map_err(InferenceError::Load)?;

        let metadata = ModelMetadata::new(model_path, "linear", Some(model.width()));
        Ok(Self { model, metadata })
    }

    pub fn load(path: &Path) -> Result<Self, InferenceError> {
        log::info!("Loading linear model from: {}", path.display());

        let text = std::fs::read_to_string(path)
            .map_err(|e| InferenceError::Load(format!("Failed to read {}: {}", path.display(), e)))?;
        let model: LinearModel = serde_json::from_str(&text)
            .map_err(|e| InferenceError::Load(format!("Failed to parse {}: {}", path.display(), e)))?;

        let store = Self::new(model, path.display().to_string())?;
        log::info!(
            "Linear model loaded successfully ({} classes, {} inputs)",
            store.model.classes.len(),
            store.model.width()
        );
        Ok(store)
    }

    pub fn model(&self) -> &LinearModel {
        &self.model
    }
}

impl ModelStore for LinearModelStore {
    fn predict(&self, row: &AlignedRow) -> Result<i64, InferenceError> {
        let expected = self.model.width();
        if row.len() != expected {
            return Err(InferenceError::ShapeMismatch {
                expected,
                actual: row.len(),
            });
        }

        Ok(self.model.predict(row.as_slice()))
    }

    fn feature_names(&self) -> Result<Option<Vec<String>>, InferenceError> {
        Ok(self.model.feature_names.clone())
    }

    fn input_width(&self) -> Option<usize> {
        Some(self.model.width())
    }

    fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_class() -> LinearModel {
        LinearModel {
            feature_names: None,
            classes: vec![0, 1, 2],
            coefficients: vec![
                vec![1.0, 0.0],
                vec![0.0, 1.0],
                vec![-1.0, -1.0],
            ],
            intercepts: vec![0.0, 0.0, 0.5],
        }
    }

    #[test]
    fn test_multiclass_argmax() {
        let model = three_class();
        assert_eq!(model.predict(&[2.0, 1.0]), 0);
        assert_eq!(model.predict(&[1.0, 2.0]), 1);
        assert_eq!(model.predict(&[0.0, 0.0]), 2);
    }

    #[test]
    fn test_ties_pick_first_class() {
        let model = three_class();
        // 1.0 vs 1.0 vs -1.5
        assert_eq!(model.predict(&[1.0, 1.0]), 0);
    }

    #[test]
    fn test_binary_single_row() {
        let model = LinearModel {
            feature_names: None,
            classes: vec![1, 2],
            coefficients: vec![vec![1.0]],
            intercepts: vec![-0.5],
        };
        let store = LinearModelStore::new(model, "<test>").unwrap();
        assert_eq!(store.model().predict(&[1.0]), 2);
        assert_eq!(store.model().predict(&[0.0]), 1);
    }

    #[test]
    fn test_invalid_models_rejected() {
        let mut ragged = three_class();
        ragged.coefficients[1].push(3.0);
        assert!(matches!(LinearModelStore::new(ragged, "<test>"), Err(InferenceError::Load(_))));

        let mut missing_intercept = three_class();
        missing_intercept.intercepts.pop();
        assert!(LinearModelStore::new(missing_intercept, "<test>").is_err());

        let mut wrong_names = three_class();
        wrong_names.feature_names = Some(vec!["Age".to_string()]);
        assert!(LinearModelStore::new(wrong_names, "<test>").is_err());
    }

    #[test]
    fn test_feature_names_passthrough() {
        let mut model = three_class();
        model.feature_names = Some(vec!["a".to_string(), "b".to_string()]);
        let store = LinearModelStore::new(model, "<test>").unwrap();

        assert_eq!(
            store.feature_names().unwrap(),
            Some(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(store.input_width(), Some(2));
    }

    #[test]
    fn test_parse_artifact() {
        let json = r#"{
            "classes": [0, 1, 2],
            "coefficients": [[0.5], [0.1], [-0.2]],
            "intercepts": [0.0, 0.0, 0.0]
        }"#;
        let model: LinearModel = serde_json::from_str(json).unwrap();
        assert_eq!(model.feature_names, None);
        assert_eq!(model.width(), 1);
    }
}
