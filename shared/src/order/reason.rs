//! Human-readable status reasons
//!
//! The "Unavailable items removed" reason is for display. Suppression reads the
//! cancelled lines themselves; the list in the text is only parsed for legacy
//! rows whose lines carry no cancel reason.

/// Prefix written by availability reconciliation
pub const UNAVAILABLE_ITEMS_PREFIX: &str = "Unavailable items removed: ";

/// Reason written when a customer cancels their own order
pub const CUSTOMER_CANCELLED: &str = "Cancelled by customer";

/// Reason written when an admin rejects an order
pub const REJECTED_OUT_OF_STOCK: &str = "Rejected: out of stock";

/// Per-item reason for items removed by reconciliation
pub const ITEM_UNAVAILABLE: &str = "Item unavailable";

/// Build "Unavailable items removed: X, Y"
pub fn format_removed_items<S: AsRef<str>>(names: &[S]) -> String {
    let joined = names
        .iter()
        .map(|n| n.as_ref().trim())
        .filter(|n| !n.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    format!("{}{}", UNAVAILABLE_ITEMS_PREFIX, joined)
}

/// Text after the "Unavailable items removed:" prefix (case-insensitive)
fn removed_items_list(reason: &str) -> Option<&str> {
    let trimmed = reason.trim_start();
    let prefix = UNAVAILABLE_ITEMS_PREFIX.trim_end();
    let head = trimmed.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then_some(&trimmed[prefix.len()..])
}

/// Whether a status reason was written by availability reconciliation
pub fn is_removed_items_reason(reason: &str) -> bool {
    removed_items_list(reason).is_some()
}

/// Extract the removed item names from a status reason
///
/// Lossy for names containing commas; returns an empty list when the reason is
/// not a reconciliation reason.
pub fn parse_removed_items(reason: &str) -> Vec<String> {
    let Some(list) = removed_items_list(reason) else {
        return Vec::new();
    };
    list.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Reason for an admin rejection, with optional staff note
pub fn rejection_reason(note: Option<&str>) -> String {
    match note.map(str::trim).filter(|n| !n.is_empty()) {
        Some(note) => format!("{} ({})", REJECTED_OUT_OF_STOCK, note),
        None => REJECTED_OUT_OF_STOCK.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_and_parse() {
        let reason = format_removed_items(&["Paneer Tikka", "Lassi"]);
        assert_eq!(reason, "Unavailable items removed: Paneer Tikka, Lassi");
        assert_eq!(parse_removed_items(&reason), vec!["Paneer Tikka", "Lassi"]);
    }

    #[test]
    fn test_parse_is_case_insensitive_and_tolerant() {
        assert_eq!(
            parse_removed_items("unavailable items removed:Lassi ,  ,Naan"),
            vec!["Lassi", "Naan"]
        );
    }

    #[test]
    fn test_parse_other_reasons() {
        assert!(!is_removed_items_reason(CUSTOMER_CANCELLED));
        assert!(is_removed_items_reason("UNAVAILABLE ITEMS REMOVED: Naan"));
        assert!(parse_removed_items(CUSTOMER_CANCELLED).is_empty());
        assert!(parse_removed_items("").is_empty());
        assert!(parse_removed_items("Unavailable").is_empty());
    }

    #[test]
    fn test_rejection_reason() {
        assert_eq!(rejection_reason(None), "Rejected: out of stock");
        assert_eq!(rejection_reason(Some("  ")), "Rejected: out of stock");
        assert_eq!(
            rejection_reason(Some("no paneer left")),
            "Rejected: out of stock (no paneer left)"
        );
    }
}
