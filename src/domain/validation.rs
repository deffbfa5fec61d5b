//! 输入校验
//!
//! 每个请求结构体实现 [`Validate`]，在进入应用层之前拒绝不合法的输入

use thiserror::Error;

/// 校验失败
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// 非空文本，字符数不超过 `max_chars`
pub fn text(field: &'static str, value: &str, max_chars: usize) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }
    if value.chars().count() > max_chars {
        return Err(ValidationError::new(
            field,
            format!("must be at most {} characters", max_chars),
        ));
    }
    Ok(())
}

/// 可选文本：存在时按 [`text`] 校验
pub fn optional_text(
    field: &'static str,
    value: Option<&str>,
    max_chars: usize,
) -> Result<(), ValidationError> {
    match value {
        Some(v) => text(field, v, max_chars),
        None => Ok(()),
    }
}

pub fn email(field: &'static str, value: &str) -> Result<(), ValidationError> {
    text(field, value, 255)?;
    let valid = value
        .split_once('@')
        .map(|(local, domain)| {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.chars().any(char::is_whitespace)
        })
        .unwrap_or(false);
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new(field, "must be a valid email address"))
    }
}

pub fn password(field: &'static str, value: &str) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len < 8 {
        return Err(ValidationError::new(field, "must be at least 8 characters"));
    }
    if len > 128 {
        return Err(ValidationError::new(field, "must be at most 128 characters"));
    }
    Ok(())
}

pub fn range<T>(field: &'static str, value: T, min: T, max: T) -> Result<(), ValidationError>
where
    T: PartialOrd + std::fmt::Display,
{
    if value < min || value > max {
        return Err(ValidationError::new(
            field,
            format!("must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_rejects_blank_and_long() {
        assert!(text("title", "hello", 10).is_ok());
        assert_eq!(
            text("title", "  ", 10).unwrap_err().to_string(),
            "title: must not be empty"
        );
        assert!(text("title", "abcdefghijk", 10).is_err());
        // 按字符计数而不是字节
        assert!(text("title", "가나다라", 4).is_ok());
    }

    #[test]
    fn test_email() {
        assert!(email("email", "user@example.com").is_ok());
        assert!(email("email", "user@example").is_err());
        assert!(email("email", "@example.com").is_err());
        assert!(email("email", "user example@example.com").is_err());
        assert!(email("email", "no-at-sign").is_err());
    }

    #[test]
    fn test_password_length() {
        assert!(password("password", "short").is_err());
        assert!(password("password", "long-enough").is_ok());
    }

    #[test]
    fn test_range() {
        assert!(range("pageSize", 10, 1, 100).is_ok());
        assert!(range("pageSize", 0, 1, 100).is_err());
        assert_eq!(
            range("page", 101, 1, 100).unwrap_err().message,
            "must be between 1 and 100"
        );
    }
}
