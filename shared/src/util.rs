/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a random resource id (UUID v4, hyphenated)
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Normalize an item name for matching: trim, lowercase, collapse whitespace
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Normalize a phone number for matching: keep digits and a leading '+'
pub fn normalize_phone(phone: &str) -> String {
    let trimmed = phone.trim();
    let mut out = String::with_capacity(trimmed.len());
    if trimmed.starts_with('+') {
        out.push('+');
    }
    out.extend(trimmed.chars().filter(|c| c.is_ascii_digit()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  Paneer   Tikka "), "paneer tikka");
        assert_eq!(normalize_name("LASSI"), "lassi");
        assert_eq!(normalize_name(""), "");
    }

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone(" +91 98765-43210 "), "+919876543210");
        assert_eq!(normalize_phone("(555) 010 2000"), "5550102000");
    }

    #[test]
    fn test_new_id_is_unique() {
        assert_ne!(new_id(), new_id());
    }
}
