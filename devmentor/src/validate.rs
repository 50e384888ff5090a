//! Request validation: fixed per-capability field table, checked before any
//! network call.
//!
//! Rules are presence + type + non-empty per field; there is no cross-field
//! validation beyond Explain's code-or-topic alternative. Failures are
//! [`GatewayError::InvalidRequest`] naming the offending field.

use serde_json::{Map, Value};

use crate::capability::{Capability, CapabilityRequest, DEFAULT_QUIZ_COUNT, MAX_QUIZ_COUNT};
use crate::error::GatewayError;

/// Validates raw JSON fields for `capability` into a typed request.
///
/// Pure check: no I/O, no side effects. The serve crate passes the request
/// body's top-level object here after deserialization.
pub fn validate(
    capability: Capability,
    fields: &Map<String, Value>,
) -> Result<CapabilityRequest, GatewayError> {
    match capability {
        Capability::Explain => {
            let code = optional_string(fields, "code")?;
            let topic = optional_string(fields, "topic")?;
            let input = match (code, topic) {
                (Some(code), _) => code,
                (None, Some(topic)) => topic,
                (None, None) => {
                    return Err(GatewayError::InvalidRequest {
                        field: "code",
                        reason: "provide `code` or `topic` as a non-empty string".to_string(),
                    })
                }
            };
            Ok(CapabilityRequest::Explain { input })
        }
        Capability::Debug => Ok(CapabilityRequest::Debug {
            code: required_string(fields, "code")?,
            error_message: optional_string(fields, "errorMessage")?,
        }),
        Capability::Summarize => Ok(CapabilityRequest::Summarize {
            text: required_string(fields, "text")?,
        }),
        Capability::Quiz => Ok(CapabilityRequest::Quiz {
            topic: required_string(fields, "topic")?,
            count: quiz_count(fields)?,
        }),
        Capability::Roadmap => Ok(CapabilityRequest::Roadmap {
            goal: required_string(fields, "goal")?,
        }),
    }
}

/// Returns the trimmed string for `name`, or `None` when absent/null/empty.
/// A present value of the wrong JSON type is an error, not `None`.
fn optional_string(
    fields: &Map<String, Value>,
    name: &'static str,
) -> Result<Option<String>, GatewayError> {
    match fields.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Ok(None)
            } else {
                Ok(Some(trimmed.to_string()))
            }
        }
        Some(_) => Err(GatewayError::InvalidRequest {
            field: name,
            reason: "expected a string".to_string(),
        }),
    }
}

fn required_string(
    fields: &Map<String, Value>,
    name: &'static str,
) -> Result<String, GatewayError> {
    optional_string(fields, name)?.ok_or_else(|| GatewayError::missing(name))
}

/// Optional `count`: a positive integer, defaulted and clamped. Anything
/// that is present but not a whole number is rejected.
fn quiz_count(fields: &Map<String, Value>) -> Result<u8, GatewayError> {
    match fields.get("count") {
        None | Some(Value::Null) => Ok(DEFAULT_QUIZ_COUNT),
        Some(Value::Number(n)) => match n.as_u64() {
            Some(0) => Err(GatewayError::InvalidRequest {
                field: "count",
                reason: "must be at least 1".to_string(),
            }),
            Some(v) => Ok(v.min(u64::from(MAX_QUIZ_COUNT)) as u8),
            None => Err(GatewayError::InvalidRequest {
                field: "count",
                reason: "expected a positive whole number".to_string(),
            }),
        },
        Some(_) => Err(GatewayError::InvalidRequest {
            field: "count",
            reason: "expected a number".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: serde_json::Value) -> Map<String, Value> {
        value.as_object().cloned().expect("test body is an object")
    }

    #[test]
    fn each_capability_rejects_missing_required_field() {
        for capability in Capability::ALL {
            let err = validate(capability, &Map::new()).unwrap_err();
            assert_eq!(err.kind(), "InvalidRequest", "capability {:?}", capability);
        }
    }

    #[test]
    fn explain_accepts_code_or_topic() {
        let from_code = validate(
            Capability::Explain,
            &fields(json!({"code": "fn main() {}"})),
        )
        .unwrap();
        assert_eq!(
            from_code,
            CapabilityRequest::Explain {
                input: "fn main() {}".to_string()
            }
        );

        let from_topic =
            validate(Capability::Explain, &fields(json!({"topic": "borrowing"}))).unwrap();
        assert_eq!(
            from_topic,
            CapabilityRequest::Explain {
                input: "borrowing".to_string()
            }
        );
    }

    #[test]
    fn explain_prefers_code_when_both_present() {
        let req = validate(
            Capability::Explain,
            &fields(json!({"code": "let x = 1;", "topic": "variables"})),
        )
        .unwrap();
        assert_eq!(
            req,
            CapabilityRequest::Explain {
                input: "let x = 1;".to_string()
            }
        );
    }

    #[test]
    fn whitespace_only_string_counts_as_missing() {
        let err = validate(Capability::Summarize, &fields(json!({"text": "   "}))).unwrap_err();
        assert!(err.to_string().contains("`text`"));
    }

    #[test]
    fn wrong_type_names_the_field() {
        let err = validate(Capability::Roadmap, &fields(json!({"goal": 42}))).unwrap_err();
        assert_eq!(err.kind(), "InvalidRequest");
        assert!(err.to_string().contains("`goal`"));
    }

    #[test]
    fn debug_keeps_optional_error_message() {
        let req = validate(
            Capability::Debug,
            &fields(json!({"code": "x", "errorMessage": "boom"})),
        )
        .unwrap();
        assert_eq!(
            req,
            CapabilityRequest::Debug {
                code: "x".to_string(),
                error_message: Some("boom".to_string()),
            }
        );
    }

    #[test]
    fn quiz_count_defaults_and_clamps() {
        let default = validate(Capability::Quiz, &fields(json!({"topic": "sorting"}))).unwrap();
        assert_eq!(
            default,
            CapabilityRequest::Quiz {
                topic: "sorting".to_string(),
                count: DEFAULT_QUIZ_COUNT,
            }
        );

        let clamped = validate(
            Capability::Quiz,
            &fields(json!({"topic": "sorting", "count": 99})),
        )
        .unwrap();
        assert_eq!(
            clamped,
            CapabilityRequest::Quiz {
                topic: "sorting".to_string(),
                count: MAX_QUIZ_COUNT,
            }
        );
    }

    #[test]
    fn quiz_count_rejects_zero_and_fractions() {
        for bad in [json!({"topic": "t", "count": 0}), json!({"topic": "t", "count": 2.5})] {
            let err = validate(Capability::Quiz, &fields(bad)).unwrap_err();
            assert_eq!(err.kind(), "InvalidRequest");
            assert!(err.to_string().contains("`count`"));
        }
    }
}
