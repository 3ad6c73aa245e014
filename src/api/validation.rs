use std::sync::LazyLock;

use regex::Regex;

use super::ApiError;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid")
});

pub fn validate_username(username: &str) -> Result<&str, ApiError> {
    let trimmed = username.trim();
    if trimmed.len() < 2 || trimmed.len() > 20 {
        return Err(ApiError::validation(
            "Username must be between 2 and 20 characters",
        ));
    }
    Ok(trimmed)
}

pub fn validate_email(email: &str) -> Result<&str, ApiError> {
    let trimmed = email.trim();
    if !EMAIL_RE.is_match(trimmed) {
        return Err(ApiError::validation("Invalid email address"));
    }
    Ok(trimmed)
}

pub fn validate_password(password: &str, confirm_password: &str) -> Result<(), ApiError> {
    if password.len() < 8 || password.len() > 50 {
        return Err(ApiError::validation(
            "Password must be between 8 and 50 characters",
        ));
    }

    if password != confirm_password {
        return Err(ApiError::validation("Passwords must match"));
    }

    Ok(())
}

pub fn validate_page(page: u64) -> Result<u64, ApiError> {
    if page == 0 {
        return Err(ApiError::validation(
            "Invalid page: 0. Page must be a positive integer",
        ));
    }
    Ok(page)
}

pub fn validate_title(title: &str) -> Result<&str, ApiError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Title cannot be empty"));
    }

    if trimmed.len() > 100 {
        return Err(ApiError::validation("Title must be 100 characters or less"));
    }

    Ok(trimmed)
}

pub fn validate_content(content: &str) -> Result<&str, ApiError> {
    if content.trim().is_empty() {
        return Err(ApiError::validation("Content cannot be empty"));
    }
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username() {
        assert!(validate_username("bo").is_ok());
        assert!(validate_username("a_regular_name").is_ok());
        assert!(validate_username("x").is_err());
        assert!(validate_username(&"a".repeat(21)).is_err());
        assert_eq!(validate_username("  padded  ").unwrap(), "padded");
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("first.last@sub.domain.org").is_ok());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("missing@tld").is_err());
        assert!(validate_email("spaces in@example.com").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("longenough", "longenough").is_ok());
        assert!(validate_password("short", "short").is_err());
        assert!(validate_password(&"a".repeat(51), &"a".repeat(51)).is_err());
        assert!(validate_password("longenough", "different1").is_err());
    }

    #[test]
    fn test_validate_page() {
        assert!(validate_page(1).is_ok());
        assert!(validate_page(9999).is_ok());
        assert!(validate_page(0).is_err());
    }

    #[test]
    fn test_validate_title() {
        assert!(validate_title("Hello").is_ok());
        assert!(validate_title("").is_err());
        assert!(validate_title("   ").is_err());
        assert!(validate_title(&"a".repeat(101)).is_err());
    }
}
