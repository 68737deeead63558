//! Input validation utilities

use std::collections::HashSet;

use crate::constants::{
    MANUAL_TEAM_SIZE, MAX_TEAM_CHOICES, MAX_USERNAME_LENGTH, MIN_TEAM_CHOICES,
    MIN_USERNAME_LENGTH,
};

/// Validate username format
pub fn validate_username(username: &str) -> Result<(), &'static str> {
    if username.len() < MIN_USERNAME_LENGTH {
        return Err("Username must be at least 3 characters");
    }
    if username.len() > MAX_USERNAME_LENGTH {
        return Err("Username must be at most 64 characters");
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == '.')
    {
        return Err("Username can only contain letters, numbers, underscores, hyphens, and dots");
    }
    Ok(())
}

/// Sanitize string input (remove control characters, trim whitespace)
pub fn sanitize_string(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Validate and sanitize a collection or team title
pub fn validate_title(title: &str) -> Result<String, String> {
    let sanitized = sanitize_string(title);
    if sanitized.is_empty() {
        return Err("Title cannot be empty".to_string());
    }
    if sanitized.len() > 256 {
        return Err("Title must be at most 256 characters".to_string());
    }
    Ok(sanitized)
}

/// Validate a ranked choice list against the server-enforced bounds.
///
/// Out-of-bounds lists are rejected rather than clamped; the looser
/// range clients display is advisory only.
pub fn validate_choice_list(choices: &[String], submitter: &str) -> Result<(), String> {
    if choices.len() < MIN_TEAM_CHOICES {
        return Err(format!(
            "At least {MIN_TEAM_CHOICES} ranked choices are required"
        ));
    }
    if choices.len() > MAX_TEAM_CHOICES {
        return Err(format!(
            "At most {MAX_TEAM_CHOICES} ranked choices are allowed"
        ));
    }

    let mut seen = HashSet::new();
    for choice in choices {
        validate_username(choice).map_err(|e| format!("{choice}: {e}"))?;
        if choice == submitter {
            return Err("You cannot pick yourself as a teammate".to_string());
        }
        if !seen.insert(choice.as_str()) {
            return Err(format!("{choice} appears more than once"));
        }
    }
    Ok(())
}

/// Validate a fixed manual-team member list
pub fn validate_manual_members(members: &[String]) -> Result<(), String> {
    if members.len() != MANUAL_TEAM_SIZE {
        return Err(format!(
            "A manual team request must name exactly {MANUAL_TEAM_SIZE} members"
        ));
    }

    let mut seen = HashSet::new();
    for member in members {
        validate_username(member).map_err(|e| format!("{member}: {e}"))?;
        if !seen.insert(member.as_str()) {
            return Err(format!("{member} appears more than once"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("Alice_123").is_ok());
        assert!(validate_username("a.b-c").is_ok());
        assert!(validate_username("ab").is_err()); // Too short
        assert!(validate_username("user@name").is_err()); // Invalid character
    }

    #[test]
    fn test_validate_title() {
        assert_eq!(validate_title("  Team Rocket ").unwrap(), "Team Rocket");
        assert!(validate_title("   ").is_err());
        assert!(validate_title(&"x".repeat(300)).is_err());
    }

    #[test]
    fn test_choice_list_bounds_are_enforced_not_clamped() {
        assert!(validate_choice_list(&names(&["bob"]), "alice").is_err());

        let too_many: Vec<String> = (0..11).map(|i| format!("user{i}")).collect();
        assert!(validate_choice_list(&too_many, "alice").is_err());

        assert!(validate_choice_list(&names(&["bob", "carol"]), "alice").is_ok());
    }

    #[test]
    fn test_choice_list_rejects_self_and_duplicates() {
        assert!(validate_choice_list(&names(&["alice", "bob"]), "alice").is_err());
        assert!(validate_choice_list(&names(&["bob", "bob"]), "alice").is_err());
    }

    #[test]
    fn test_manual_members_requires_exact_size() {
        assert!(validate_manual_members(&names(&["ann", "ben"])).is_err());
        assert!(validate_manual_members(&names(&["ann", "ben", "cid", "dan"])).is_err());
        assert!(validate_manual_members(&names(&["ann", "ben", "cid"])).is_ok());
    }

    #[test]
    fn test_sanitize_string() {
        assert_eq!(sanitize_string("  hi\u{7}there  "), "hithere");
        assert_eq!(sanitize_string("a\nb"), "a\nb");
    }
}
