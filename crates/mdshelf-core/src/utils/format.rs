/// Human-readable age for a number of elapsed minutes.
/// Rounds to the nearest hour/day once past the first hour.
pub fn format_age(minutes: i64) -> String {
    if minutes < 1 {
        // Also covers negative ages from clock skew
        "just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 1440 {
        let hours = minutes / 60;
        if minutes % 60 >= 30 {
            format!("{}h ago", hours + 1)
        } else {
            format!("{}h ago", hours)
        }
    } else {
        let days = minutes / 1440;
        if (minutes % 1440) / 60 >= 12 {
            format!("{}d ago", days + 1)
        } else {
            format!("{}d ago", days)
        }
    }
}

/// First `max_chars` characters of `s` (not bytes).
pub fn prefix_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Case-insensitive substring match. An empty needle matches everything.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_age() {
        assert_eq!(format_age(-5), "just now");
        assert_eq!(format_age(0), "just now");
        assert_eq!(format_age(5), "5m ago");
        assert_eq!(format_age(89), "1h ago");
        assert_eq!(format_age(90), "2h ago");
        assert_eq!(format_age(1440 + 11 * 60), "1d ago");
        assert_eq!(format_age(1440 + 12 * 60), "2d ago");
    }

    #[test]
    fn test_prefix_chars() {
        assert_eq!(prefix_chars("hello", 3), "hel");
        assert_eq!(prefix_chars("hi", 25), "hi");
        assert_eq!(prefix_chars("日本語のメモ", 3), "日本語");
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
    }

    #[test]
    fn test_contains_ignore_case() {
        assert!(contains_ignore_case("Meeting-Notes.md", "notes"));
        assert!(contains_ignore_case("anything", ""));
        assert!(!contains_ignore_case("todo.md", "done"));
    }
}
