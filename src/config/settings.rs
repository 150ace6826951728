use crate::core::options::{ReceiveOptions, SendOptions, DEFAULT_GROUP_ID};
use crate::utils::error::{Result, SqsError};
use crate::utils::validation::{validate_aws_region, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Connection settings and per-call defaults.
///
/// Loaded from environment variables or a TOML file; `None` region/endpoint
/// fall back to the AWS default provider chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SqsSettings {
    pub region: Option<String>,
    pub endpoint_url: Option<String>,
    pub group_id: String,
    pub hide_for_seconds: u32,
    pub poll_for_seconds: u32,
    pub max_batch_size: u32,
}

impl Default for SqsSettings {
    fn default() -> Self {
        let receive = ReceiveOptions::default();
        Self {
            region: None,
            endpoint_url: None,
            group_id: DEFAULT_GROUP_ID.to_string(),
            hide_for_seconds: receive.hide_for_seconds,
            poll_for_seconds: receive.poll_for_seconds,
            max_batch_size: receive.max_batch_size,
        }
    }
}

impl SqsSettings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 從任意 key/value 來源載入 (環境變數或測試用的 map)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            region: lookup("AWS_REGION").or_else(|| lookup("AWS_DEFAULT_REGION")),
            endpoint_url: lookup("SQS_ENDPOINT_URL"),
            group_id: lookup("SQS_GROUP_ID").unwrap_or(defaults.group_id),
            hide_for_seconds: parse_var(&lookup, "SQS_HIDE_FOR_SECONDS", defaults.hide_for_seconds)?,
            poll_for_seconds: parse_var(&lookup, "SQS_POLL_FOR_SECONDS", defaults.poll_for_seconds)?,
            max_batch_size: parse_var(&lookup, "SQS_MAX_BATCH_SIZE", defaults.max_batch_size)?,
        })
    }

    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SqsError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SqsError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    pub fn send_options(&self) -> SendOptions {
        SendOptions::new().with_group_id(self.group_id.clone())
    }

    pub fn receive_options(&self) -> ReceiveOptions {
        ReceiveOptions {
            hide_for_seconds: self.hide_for_seconds,
            poll_for_seconds: self.poll_for_seconds,
            max_batch_size: self.max_batch_size,
        }
    }
}

impl Validate for SqsSettings {
    fn validate(&self) -> Result<()> {
        if let Some(region) = &self.region {
            validate_aws_region("region", region)?;
        }
        if let Some(endpoint_url) = &self.endpoint_url {
            validate_url("endpoint_url", endpoint_url)?;
        }
        self.send_options().validate()?;
        self.receive_options().validate()?;

        tracing::debug!("SQS settings validation passed");
        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| SqsError::InvalidConfigValueError {
                field: key.to_string(),
                value: raw.clone(),
                reason: "Expected a non-negative integer".to_string(),
            }),
        None => Ok(default),
    }
}

/// 替換環境變數 (例如 ${SQS_ENDPOINT_URL})，未設定的變數保留原樣
fn substitute_env_vars(content: &str) -> Result<String> {
    use regex::Regex;
    let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SqsError::ConfigError {
        message: format!("Invalid substitution pattern: {}", e),
    })?;

    let result = re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    });

    Ok(result.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let settings = SqsSettings::from_lookup(|_| None).unwrap();
        assert_eq!(settings, SqsSettings::default());
        assert_eq!(settings.group_id, "default");
        assert_eq!(settings.receive_options(), ReceiveOptions::default());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_settings_from_lookup() {
        let settings = SqsSettings::from_lookup(lookup_from(&[
            ("AWS_DEFAULT_REGION", "eu-west-1"),
            ("SQS_ENDPOINT_URL", "http://localhost:4566"),
            ("SQS_GROUP_ID", "orders"),
            ("SQS_POLL_FOR_SECONDS", "5"),
        ]))
        .unwrap();

        assert_eq!(settings.region.as_deref(), Some("eu-west-1"));
        assert_eq!(settings.endpoint_url.as_deref(), Some("http://localhost:4566"));
        assert_eq!(settings.send_options().group_id, "orders");
        assert_eq!(settings.poll_for_seconds, 5);
        assert_eq!(settings.hide_for_seconds, 3600);
    }

    #[test]
    fn test_invalid_number_is_reported() {
        let result = SqsSettings::from_lookup(lookup_from(&[("SQS_MAX_BATCH_SIZE", "ten")]));
        match result {
            Err(SqsError::InvalidConfigValueError { field, .. }) => {
                assert_eq!(field, "SQS_MAX_BATCH_SIZE")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_parse_toml_settings() {
        let toml_content = r#"
region = "ap-southeast-2"
endpoint_url = "http://localhost:4566"
group_id = "billing"
max_batch_size = 5
"#;

        let settings = SqsSettings::from_toml_str(toml_content).unwrap();
        assert_eq!(settings.region.as_deref(), Some("ap-southeast-2"));
        assert_eq!(settings.group_id, "billing");
        assert_eq!(settings.max_batch_size, 5);
        assert_eq!(settings.poll_for_seconds, 20);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SQS_UTILS_TEST_ENDPOINT", "http://127.0.0.1:9324");

        let settings =
            SqsSettings::from_toml_str(r#"endpoint_url = "${SQS_UTILS_TEST_ENDPOINT}""#).unwrap();
        assert_eq!(settings.endpoint_url.as_deref(), Some("http://127.0.0.1:9324"));

        std::env::remove_var("SQS_UTILS_TEST_ENDPOINT");
    }

    #[test]
    fn test_settings_validation() {
        let settings = SqsSettings::from_toml_str(
            r#"
endpoint_url = "not a url"
"#,
        )
        .unwrap();
        assert!(settings.validate().is_err());

        let settings = SqsSettings::from_toml_str("max_batch_size = 50").unwrap();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_settings_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"region = \"us-east-1\"\nhide_for_seconds = 30\n")
            .unwrap();

        let settings = SqsSettings::from_file(temp_file.path()).unwrap();
        assert_eq!(settings.region.as_deref(), Some("us-east-1"));
        assert_eq!(settings.hide_for_seconds, 30);
    }

    #[test]
    fn test_malformed_toml() {
        let result = SqsSettings::from_toml_str("region = ");
        assert!(matches!(result, Err(SqsError::ConfigValidationError { .. })));
    }
}
