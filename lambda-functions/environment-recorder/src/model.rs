use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub const DEFAULT_REGION: &str = "us-east-2";
pub const DEFAULT_STATUS: &str = "Active";

/// One row of the lifecycle table, keyed by `environmentId`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentRecord {
    pub environment_id: String,
    pub region: String,
    pub status: String,
    pub timestamp: String,
}

/// Fields a caller may supply on POST. Anything else in the body is ignored,
/// including a caller-provided `timestamp`.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentInput {
    pub environment_id: Option<String>,
    pub region: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("request body must be a JSON object")]
    NotAnObject,
    #[error("{0}")]
    Malformed(String),
    #[error("environmentId must not be empty")]
    EmptyEnvironmentId,
}

impl EnvironmentInput {
    /// An absent or blank body is treated as `{}`.
    pub fn from_body(body: Option<&str>) -> Result<Self, InputError> {
        let raw = match body.map(str::trim) {
            None | Some("") => return Ok(Self::default()),
            Some(raw) => raw,
        };

        let value: Value =
            serde_json::from_str(raw).map_err(|e| InputError::Malformed(e.to_string()))?;

        if !value.is_object() {
            return Err(InputError::NotAnObject);
        }

        let input: Self =
            serde_json::from_value(value).map_err(|e| InputError::Malformed(e.to_string()))?;

        // `null` counts as absent; a present id must have content.
        if input
            .environment_id
            .as_deref()
            .is_some_and(|id| id.trim().is_empty())
        {
            return Err(InputError::EmptyEnvironmentId);
        }

        Ok(input)
    }

    pub fn into_record(self, now: DateTime<Utc>) -> EnvironmentRecord {
        EnvironmentRecord {
            environment_id: self
                .environment_id
                .unwrap_or_else(|| default_environment_id(now)),
            region: self.region.unwrap_or_else(|| DEFAULT_REGION.to_string()),
            status: self.status.unwrap_or_else(|| DEFAULT_STATUS.to_string()),
            timestamp: format_timestamp(now),
        }
    }
}

/// `env-<yyyyMMddHHmmss>` in UTC. Two unkeyed writes in the same second collide.
pub fn default_environment_id(now: DateTime<Utc>) -> String {
    format!("env-{}", now.format("%Y%m%d%H%M%S"))
}

pub fn format_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 6, 12, 30, 45).unwrap()
    }

    #[test]
    fn test_default_environment_id() {
        assert_eq!(default_environment_id(fixed_now()), "env-20250106123045");
    }

    #[test]
    fn test_timestamp_format() {
        let ts = format_timestamp(fixed_now());
        assert_eq!(ts, "2025-01-06T12:30:45.000000Z");
        assert!(DateTime::parse_from_rfc3339(&ts).is_ok());
    }

    #[test]
    fn test_absent_and_blank_bodies_default() {
        assert_eq!(
            EnvironmentInput::from_body(None).unwrap(),
            EnvironmentInput::default()
        );
        assert_eq!(
            EnvironmentInput::from_body(Some("   ")).unwrap(),
            EnvironmentInput::default()
        );
        assert_eq!(
            EnvironmentInput::from_body(Some("{}")).unwrap(),
            EnvironmentInput::default()
        );
    }

    #[test]
    fn test_full_body() {
        let input = EnvironmentInput::from_body(Some(
            r#"{"environmentId": "env-1", "region": "us-west-1", "status": "Destroyed"}"#,
        ))
        .unwrap();

        assert_eq!(input.environment_id.as_deref(), Some("env-1"));
        assert_eq!(input.region.as_deref(), Some("us-west-1"));
        assert_eq!(input.status.as_deref(), Some("Destroyed"));
    }

    #[test]
    fn test_unknown_fields_and_caller_timestamp_ignored() {
        let input = EnvironmentInput::from_body(Some(
            r#"{"environmentId": "env-2", "owner": "ops", "timestamp": "1999-01-01T00:00:00Z"}"#,
        ))
        .unwrap();

        let record = input.into_record(fixed_now());
        assert_eq!(record.timestamp, "2025-01-06T12:30:45.000000Z");
    }

    #[test]
    fn test_null_fields_take_defaults() {
        let input =
            EnvironmentInput::from_body(Some(r#"{"environmentId": null, "region": null}"#))
                .unwrap();
        let record = input.into_record(fixed_now());

        assert_eq!(record.environment_id, "env-20250106123045");
        assert_eq!(record.region, DEFAULT_REGION);
    }

    #[test]
    fn test_malformed_bodies() {
        assert!(matches!(
            EnvironmentInput::from_body(Some("{not json")),
            Err(InputError::Malformed(_))
        ));
        assert_eq!(
            EnvironmentInput::from_body(Some(r#"["env-1", "us-east-1", "Active"]"#)),
            Err(InputError::NotAnObject)
        );
        assert_eq!(
            EnvironmentInput::from_body(Some("42")),
            Err(InputError::NotAnObject)
        );
        assert!(matches!(
            EnvironmentInput::from_body(Some(r#"{"environmentId": 17}"#)),
            Err(InputError::Malformed(_))
        ));
        assert_eq!(
            EnvironmentInput::from_body(Some(r#"{"environmentId": ""}"#)),
            Err(InputError::EmptyEnvironmentId)
        );
    }

    #[test]
    fn test_blank_environment_ids_rejected() {
        for body in [
            r#"{"environmentId": "   "}"#,
            r#"{"environmentId": "\t"}"#,
            r#"{"environmentId": " \n "}"#,
        ] {
            assert_eq!(
                EnvironmentInput::from_body(Some(body)),
                Err(InputError::EmptyEnvironmentId),
                "body {}",
                body
            );
        }

        let padded = EnvironmentInput::from_body(Some(r#"{"environmentId": " env-3 "}"#)).unwrap();
        assert_eq!(padded.environment_id.as_deref(), Some(" env-3 "));
    }

    #[test]
    fn test_into_record_defaults() {
        let record = EnvironmentInput::default().into_record(fixed_now());

        assert_eq!(
            record,
            EnvironmentRecord {
                environment_id: "env-20250106123045".to_string(),
                region: "us-east-2".to_string(),
                status: "Active".to_string(),
                timestamp: "2025-01-06T12:30:45.000000Z".to_string(),
            }
        );
    }

    #[test]
    fn test_record_wire_names() {
        let record = EnvironmentInput::default().into_record(fixed_now());
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["environmentId"], "env-20250106123045");
        assert_eq!(json["region"], "us-east-2");
        assert_eq!(json["status"], "Active");
        assert!(json.get("environment_id").is_none());
    }
}
