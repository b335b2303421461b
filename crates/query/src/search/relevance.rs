//! Keyword relevance scoring.
//!
//! The score is a fixed heuristic, evaluated in order on the lowercase string
//! forms of the field value and the keyword:
//!
//! | match                                   | score                              |
//! |-----------------------------------------|------------------------------------|
//! | keyword starts the value                | `3 + occurrences`                  |
//! | keyword is a whole word elsewhere       | `2 + occurrences`                  |
//! | keyword is any other substring          | `1 + occurrences + kw_len / value_len` |
//! | no occurrence, or not a string/number   | `0`                                |
//!
//! `occurrences` counts non-overlapping literal matches. Lengths are counted in
//! characters. Only the first occurrence decides which row applies.
//!
//! Numbers are matched in the text form JavaScript would print them in, see
//! [`number_text`](super::coercion::number_text): `1e21` is searched as
//! `1e+21`.

use serde_json::Value;

use super::coercion::number_text;

/// Scores a single field value against a keyword.
///
/// # Examples
///
/// ```
/// use bazaar_query::search::score;
/// use serde_json::json;
///
/// assert_eq!(score(Some(&json!("Apple")), "apple"), 4.0);
/// assert_eq!(score(Some(&json!("Green apple")), "apple"), 3.0);
/// assert_eq!(score(Some(&json!("Banana")), "apple"), 0.0);
/// assert_eq!(score(None, "apple"), 0.0);
/// ```
pub fn score(value: Option<&Value>, keyword: &str) -> f64 {
    let text = match value {
        Some(Value::String(s)) => s.to_lowercase(),
        Some(Value::Number(n)) => number_text(n).to_lowercase(),
        _ => return 0.0,
    };
    let keyword = keyword.to_lowercase();
    if keyword.is_empty() {
        return 0.0;
    }

    let Some(index) = text.find(&keyword) else {
        return 0.0;
    };
    let occurrences = text.matches(keyword.as_str()).count() as f64;

    if index == 0 {
        return 3.0 + occurrences;
    }

    let before = text[..index].chars().next_back();
    let after = text[index + keyword.len()..].chars().next();
    if is_word_boundary(before) && is_word_boundary(after) {
        return 2.0 + occurrences;
    }

    let ratio = keyword.chars().count() as f64 / text.chars().count() as f64;
    1.0 + occurrences + ratio
}

fn is_word_boundary(c: Option<char>) -> bool {
    match c {
        None => true,
        Some(c) => matches!(c, ' ' | '.' | ',' | '!' | '?'),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prefix_match() {
        assert_eq!(score(Some(&json!("Apple")), "apple"), 4.0);
        assert_eq!(score(Some(&json!("apple apple")), "APPLE"), 5.0);
    }

    #[test]
    fn test_large_number_matches_exponent_form() {
        assert_eq!(score(Some(&json!(1e21)), "1e+21"), 4.0);
        assert_eq!(score(Some(&json!(1e21)), "100000"), 0.0);
    }

    #[test]
    fn test_exact_value_scores_at_least_three() {
        for keyword in ["abc", "Hello", "x y z"] {
            let value = json!(keyword.to_uppercase());
            assert!(score(Some(&value), keyword) >= 3.0);
        }
    }

    #[test]
    fn test_whole_word_match() {
        assert_eq!(score(Some(&json!("green apple")), "apple"), 3.0);
        assert_eq!(score(Some(&json!("red,apple!")), "apple"), 3.0);
        assert_eq!(score(Some(&json!("an apple? apple.")), "apple"), 4.0);
    }

    #[test]
    fn test_substring_match() {
        let s = score(Some(&json!("Pineapple")), "apple");
        assert!((s - (2.0 + 5.0 / 9.0)).abs() < 1e-9);
        assert!(s > 1.0 && s < 3.0);
    }

    #[test]
    fn test_first_occurrence_decides() {
        // The first hit is inside "pineapple" even though a whole word follows.
        let s = score(Some(&json!("pineapple apple")), "apple");
        assert!((s - (1.0 + 2.0 + 5.0 / 15.0)).abs() < 1e-9);
    }

    #[test]
    fn test_numbers_are_scored_as_text() {
        assert_eq!(score(Some(&json!(12345)), "123"), 4.0);
        assert_eq!(score(Some(&json!(45123)), "999"), 0.0);
    }

    #[test]
    fn test_non_scalar_values_score_zero() {
        assert_eq!(score(Some(&json!(["apple"])), "apple"), 0.0);
        assert_eq!(score(Some(&json!({"a": "apple"})), "apple"), 0.0);
        assert_eq!(score(Some(&json!(true)), "true"), 0.0);
        assert_eq!(score(Some(&json!(null)), "null"), 0.0);
    }

    #[test]
    fn test_keyword_is_literal() {
        assert_eq!(score(Some(&json!("c++ rocks")), "c++"), 4.0);
        assert_eq!(score(Some(&json!("a.b.c")), "a*b"), 0.0);
    }
}
