use bon::Builder;
use std::env;

pub const TABLE_NAME_VAR: &str = "DDB_TABLE";
pub const CONSISTENT_READ_VAR: &str = "DDB_CONSISTENT_READ";
pub const DEFAULT_TABLE_NAME: &str = "environment_lifecycle";

#[derive(Builder, Debug, Clone, PartialEq)]
pub struct RecorderConfig {
    #[builder(into, default = DEFAULT_TABLE_NAME.to_string())]
    pub table_name: String,

    /// Use strongly consistent reads when scanning.
    #[builder(default)]
    pub consistent_read: bool,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl RecorderConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let table_name = lookup(TABLE_NAME_VAR)
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TABLE_NAME.to_string());

        let consistent_read = lookup(CONSISTENT_READ_VAR)
            .map(|value| parse_flag(&value))
            .unwrap_or(false);

        Self::builder()
            .table_name(table_name)
            .consistent_read(consistent_read)
            .build()
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
