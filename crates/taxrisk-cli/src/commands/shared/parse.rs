use anyhow::Context;
use serde::de::DeserializeOwned;

/// Parse a snake_case CLI value into one of the core enums.
pub fn parse_enum<T: DeserializeOwned>(value: &str, what: &str) -> anyhow::Result<T> {
    serde_json::from_value(serde_json::Value::String(value.trim().to_ascii_lowercase()))
        .with_context(|| format!("unknown {what} '{value}'"))
}

/// Read and parse a JSON file.
pub fn read_json(path: &str) -> anyhow::Result<serde_json::Value> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?;
    serde_json::from_str(&raw).with_context(|| format!("{path} is not valid JSON"))
}

#[cfg(test)]
mod tests {
    use taxrisk_core::enums::{AuditAction, EntityType};

    use super::*;

    #[test]
    fn parses_snake_case_values() {
        let action: AuditAction = parse_enum("config_applied", "action").unwrap();
        assert_eq!(action, AuditAction::ConfigApplied);
        let entity: EntityType = parse_enum("Analysis", "entity type").unwrap();
        assert_eq!(entity, EntityType::Analysis);
    }

    #[test]
    fn unknown_value_names_the_field() {
        let err = parse_enum::<AuditAction>("renamed", "action").unwrap_err();
        assert_eq!(err.to_string(), "unknown action 'renamed'");
    }
}
