use crate::utils::error::{Result, SqsError};
use url::Url;

pub const MAX_QUEUE_NAME_LENGTH: usize = 80;
const FIFO_SUFFIX: &str = ".fifo";

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(SqsError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(SqsError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(SqsError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SqsError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(SqsError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

pub fn validate_aws_region(field_name: &str, region: &str) -> Result<()> {
    validate_non_empty_string(field_name, region)?;

    // AWS region format validation
    if !region
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(SqsError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: region.to_string(),
            reason: "AWS region can only contain lowercase letters, numbers, and hyphens"
                .to_string(),
        });
    }

    Ok(())
}

/// Queue names are 1-80 characters of alphanumerics, hyphens and underscores.
/// FIFO queues carry a `.fifo` suffix which counts towards the limit.
pub fn validate_queue_name(queue_name: &str) -> Result<()> {
    let invalid = |reason: String| SqsError::InvalidConfigValueError {
        field: "queue_name".to_string(),
        value: queue_name.to_string(),
        reason,
    };

    if queue_name.is_empty() || queue_name.len() > MAX_QUEUE_NAME_LENGTH {
        return Err(invalid(format!(
            "Queue name must be between 1 and {} characters",
            MAX_QUEUE_NAME_LENGTH
        )));
    }

    // 後綴不分大小寫，與 QueueKind::from_queue_name 一致
    let split = queue_name.len().saturating_sub(FIFO_SUFFIX.len());
    let stem = match queue_name.get(split..) {
        Some(suffix) if suffix.eq_ignore_ascii_case(FIFO_SUFFIX) => &queue_name[..split],
        _ => queue_name,
    };
    if stem.is_empty() {
        return Err(invalid("Queue name cannot be only a .fifo suffix".to_string()));
    }

    if !stem
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(invalid(
            "Queue name can only contain alphanumeric characters, hyphens, and underscores"
                .to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("endpoint_url", "https://sqs.us-east-1.amazonaws.com").is_ok());
        assert!(validate_url("endpoint_url", "http://localhost:4566").is_ok());
        assert!(validate_url("endpoint_url", "").is_err());
        assert!(validate_url("endpoint_url", "invalid-url").is_err());
        assert!(validate_url("endpoint_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("max_batch_size", 10, 1, 10).is_ok());
        assert!(validate_range("max_batch_size", 0, 1, 10).is_err());
        assert!(validate_range("max_batch_size", 11, 1, 10).is_err());
    }

    #[test]
    fn test_validate_aws_region() {
        assert!(validate_aws_region("region", "ap-southeast-2").is_ok());
        assert!(validate_aws_region("region", "").is_err());
        assert!(validate_aws_region("region", "US_EAST_1").is_err());
    }

    #[test]
    fn test_validate_queue_name() {
        assert!(validate_queue_name("orders").is_ok());
        assert!(validate_queue_name("orders_v2-eu").is_ok());
        assert!(validate_queue_name("orders.fifo").is_ok());
        assert!(validate_queue_name("Orders.FIFO").is_ok());
        assert!(validate_queue_name(".FIFO").is_err());
        assert!(validate_queue_name("").is_err());
        assert!(validate_queue_name(".fifo").is_err());
        assert!(validate_queue_name("orders.v2").is_err());
        assert!(validate_queue_name("has space").is_err());
        assert!(validate_queue_name(&"q".repeat(81)).is_err());
        assert!(validate_queue_name(&"q".repeat(80)).is_ok());
    }
}
