//! Identifier case conversion for generated names.

const JAVA_KEYWORDS: &[&str] = &[
    "abstract", "boolean", "break", "byte", "case", "catch", "char", "class", "const", "continue",
    "default", "do", "double", "else", "enum", "extends", "final", "finally", "float", "for",
    "goto", "if", "implements", "import", "instanceof", "int", "interface", "long", "native",
    "new", "package", "private", "protected", "public", "return", "short", "static", "super",
    "switch", "synchronized", "this", "throw", "throws", "transient", "try", "void", "volatile",
    "while", "true", "false", "null", "record", "var", "yield",
];

fn segments(identifier: &str) -> impl Iterator<Item = &str> {
    identifier
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty())
}

/// Lowercases shouting segments (`ORDER`), keeps mixed-case ones.
fn normalize_segment(segment: &str) -> String {
    let has_lower = segment.chars().any(char::is_lowercase);
    if has_lower {
        segment.to_string()
    } else {
        segment.to_lowercase()
    }
}

/// Uppercases the first character.
#[must_use]
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn decapitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Converts a column or table identifier to lower camel case.
///
/// `order_id` and `ORDER_ID` become `orderId`; `tableC` is kept. Results
/// that would not be valid Java identifiers are adjusted: a leading digit
/// gets an underscore prefix and keywords get a `Value` suffix.
#[must_use]
pub fn to_lower_camel(identifier: &str) -> String {
    let mut out = String::new();
    for (i, segment) in segments(identifier).enumerate() {
        let segment = normalize_segment(segment);
        if i == 0 {
            out.push_str(&decapitalize(&segment));
        } else {
            out.push_str(&capitalize(&segment));
        }
    }
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    if JAVA_KEYWORDS.contains(&out.as_str()) {
        out.push_str("Value");
    }
    out
}

/// Converts an identifier to upper camel case, for type and method names.
#[must_use]
pub fn to_upper_camel(identifier: &str) -> String {
    let mut out: String = segments(identifier)
        .map(|s| capitalize(&normalize_segment(s)))
        .collect();
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

/// Converts an identifier to a lowercase, hyphenated route segment.
///
/// `OrderStatus` and `order_status` both become `order-status`.
#[must_use]
pub fn to_kebab(identifier: &str) -> String {
    let mut out = String::new();
    for segment in segments(identifier) {
        let mut prev_lower = false;
        if !out.is_empty() {
            out.push('-');
        }
        for c in segment.chars() {
            if c.is_uppercase() && prev_lower {
                out.push('-');
            }
            prev_lower = c.is_lowercase() || c.is_ascii_digit();
            out.extend(c.to_lowercase());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lower_camel() {
        assert_eq!(to_lower_camel("order_id"), "orderId");
        assert_eq!(to_lower_camel("ORDER_ID"), "orderId");
        assert_eq!(to_lower_camel("customerName"), "customerName");
        assert_eq!(to_lower_camel("Customer Name"), "customerName");
        assert_eq!(to_lower_camel("a"), "a");
        assert_eq!(to_lower_camel("tableC"), "tableC");
    }

    #[test]
    fn test_lower_camel_makes_valid_identifiers() {
        assert_eq!(to_lower_camel("1st_place"), "_1stPlace");
        assert_eq!(to_lower_camel("class"), "classValue");
        assert_eq!(to_lower_camel("default"), "defaultValue");
    }

    #[test]
    fn test_upper_camel() {
        assert_eq!(to_upper_camel("order_status"), "OrderStatus");
        assert_eq!(to_upper_camel("orders"), "Orders");
        assert_eq!(to_upper_camel("OrderStatus"), "OrderStatus");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("orderId"), "OrderId");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_kebab() {
        assert_eq!(to_kebab("OrderStatus"), "order-status");
        assert_eq!(to_kebab("order_status"), "order-status");
        assert_eq!(to_kebab("orders"), "orders");
    }
}
