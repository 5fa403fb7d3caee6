//! Heuristic check that generated prose is mostly English.

/// Minimum share of printable low-ASCII characters for English text, as
/// numerator over denominator (80%).
const MIN_ASCII_RATIO: (usize, usize) = (4, 5);

fn is_printable_ascii(c: char) -> bool {
    matches!(c, ' '..='~' | '\n' | '\r' | '\t')
}

/// Returns `true` when at least 80% of the characters of `text` are
/// printable ASCII. Empty text counts as English.
pub fn is_mostly_english(text: &str) -> bool {
    let total = text.chars().count();
    if total == 0 {
        return true;
    }
    let kept = text.chars().filter(|c| is_printable_ascii(*c)).count();
    let (num, den) = MIN_ASCII_RATIO;
    kept * den >= total * num
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_english() {
        assert!(is_mostly_english(""));
    }

    #[test]
    fn test_all_non_ascii_rejected() {
        let text = "é".repeat(100);
        assert!(!is_mostly_english(&text));
        assert!(!is_mostly_english("这段代码定义了一个函数"));
    }

    #[test]
    fn test_boundary_at_eighty_percent() {
        let passing = format!("{}{}", "a".repeat(81), "ü".repeat(19));
        assert!(is_mostly_english(&passing));

        let exact = format!("{}{}", "a".repeat(80), "ü".repeat(20));
        assert!(is_mostly_english(&exact));

        let failing = format!("{}{}", "a".repeat(79), "ü".repeat(21));
        assert!(!is_mostly_english(&failing));
    }

    #[test]
    fn test_code_with_newlines_is_english() {
        assert!(is_mostly_english("def f():\n\treturn 1\n"));
    }
}
