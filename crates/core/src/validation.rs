//! Import validation - untrusted JSON in, roadmap out.
//!
//! Checks run in a fixed order and stop at the first violation, so the
//! reported reason always names the earliest offending field.

use std::collections::HashSet;
use serde_json::Value;
use crate::roadmap::Roadmap;

/// Why a payload was rejected.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// Not parseable as JSON at all
    #[error("Malformed JSON: {0}")]
    Malformed(serde_json::Error),

    /// Parseable, but a required field is missing or has the wrong shape
    #[error("{0}")]
    Schema(String),
}

/// Validator for roadmap documents.
pub struct RoadmapValidator;

impl RoadmapValidator {
    /// Parse and validate raw text.
    pub fn validate(raw: &str) -> Result<Roadmap, ValidationError> {
        let value: Value = serde_json::from_str(raw).map_err(ValidationError::Malformed)?;
        Self::validate_value(value)
    }

    /// Validate an already parsed JSON value.
    pub fn validate_value(value: Value) -> Result<Roadmap, ValidationError> {
        Self::check_structure(&value)?;
        serde_json::from_value(value)
            .map_err(|e| schema(format!("Invalid roadmap structure: {}", e)))
    }

    fn check_structure(value: &Value) -> Result<(), ValidationError> {
        if !is_text(value.get("title")) {
            return Err(schema("Missing or invalid 'title' field"));
        }
        if !is_text(value.get("description")) {
            return Err(schema("Missing or invalid 'description' field"));
        }
        let Some(milestones) = value.get("milestones").and_then(Value::as_array) else {
            return Err(schema("Missing or invalid 'milestones' array"));
        };

        for (index, milestone) in milestones.iter().enumerate() {
            if !is_id(milestone.get("id")) {
                return Err(schema(format!(
                    "Milestone at index {} has missing or invalid 'id'",
                    index
                )));
            }
            if !is_text(milestone.get("title")) {
                return Err(schema(format!(
                    "Milestone at index {} has missing or invalid 'title'",
                    index
                )));
            }
            let Some(resources) = milestone.get("resources").and_then(Value::as_array) else {
                return Err(schema(format!(
                    "Milestone at index {} has missing or invalid 'resources' array",
                    index
                )));
            };

            let title = milestone.get("title").and_then(Value::as_str).unwrap_or_default();
            for (res_index, resource) in resources.iter().enumerate() {
                let field = if !is_id(resource.get("id")) {
                    Some("'id'")
                } else if !is_text(resource.get("title")) {
                    Some("'title'")
                } else if !is_text(resource.get("url")) {
                    Some("'url'")
                } else if !is_text_list(resource.get("tags")) {
                    Some("'tags' array")
                } else {
                    None
                };
                if let Some(field) = field {
                    return Err(schema(format!(
                        "Resource at index {} in milestone \"{}\" has missing or invalid {}",
                        res_index, title, field
                    )));
                }
            }
        }

        Self::check_unique_ids(milestones)
    }

    fn check_unique_ids(milestones: &[Value]) -> Result<(), ValidationError> {
        let mut milestone_ids = HashSet::new();
        for (index, milestone) in milestones.iter().enumerate() {
            let id = milestone["id"].as_str().unwrap_or_default();
            if !milestone_ids.insert(id) {
                return Err(schema(format!(
                    "Milestone at index {} has duplicate 'id' \"{}\"",
                    index, id
                )));
            }

            let title = milestone["title"].as_str().unwrap_or_default();
            let mut resource_ids = HashSet::new();
            let resources = milestone["resources"].as_array().map(Vec::as_slice).unwrap_or(&[]);
            for (res_index, resource) in resources.iter().enumerate() {
                let id = resource["id"].as_str().unwrap_or_default();
                if !resource_ids.insert(id) {
                    return Err(schema(format!(
                        "Resource at index {} in milestone \"{}\" has duplicate 'id' \"{}\"",
                        res_index, title, id
                    )));
                }
            }
        }
        Ok(())
    }
}

fn schema(reason: impl Into<String>) -> ValidationError {
    ValidationError::Schema(reason.into())
}

fn is_text(value: Option<&Value>) -> bool {
    value.is_some_and(Value::is_string)
}

fn is_text_list(value: Option<&Value>) -> bool {
    value
        .and_then(Value::as_array)
        .is_some_and(|items| items.iter().all(Value::is_string))
}

fn is_id(value: Option<&Value>) -> bool {
    value.and_then(Value::as_str).is_some_and(|s| !s.is_empty())
}
