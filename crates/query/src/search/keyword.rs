//! Keyword validation and relevance ranking.

use serde_json::Value;

use crate::error::ArgumentError;
use crate::path::FieldPath;

use super::relevance::score;

/// Shortest keyword accepted, in characters.
pub const MIN_KEYWORD_LENGTH: usize = 3;

/// Normalizes a keyword: empty means no keyword, and anything shorter than
/// [`MIN_KEYWORD_LENGTH`] is rejected.
pub fn validate_keyword(keyword: Option<&str>) -> Result<Option<&str>, ArgumentError> {
    match keyword {
        None | Some("") => Ok(None),
        Some(keyword) if keyword.chars().count() < MIN_KEYWORD_LENGTH => {
            Err(ArgumentError::KeywordTooShort {
                keyword: keyword.to_string(),
                min: MIN_KEYWORD_LENGTH,
            })
        }
        Some(keyword) => Ok(Some(keyword)),
    }
}

/// Total relevance of a record: the sum of its per-path scores.
pub fn relevance(record: &Value, keyword: &str, paths: &[FieldPath]) -> f64 {
    paths.iter().map(|path| score(path.get(record), keyword)).sum()
}

/// Scores every record and keeps those with a positive score, best first.
///
/// Scores are returned alongside the records rather than written into them.
/// Records with equal scores keep their input order.
pub fn rank<'a, I>(records: I, keyword: &str, paths: &[FieldPath]) -> Vec<(&'a Value, f64)>
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut ranked: Vec<(&Value, f64)> = records
        .into_iter()
        .map(|record| (record, relevance(record, keyword, paths)))
        .filter(|(_, relevance)| *relevance > 0.0)
        .collect();
    ranked.sort_by(|(_, a), (_, b)| b.total_cmp(a));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::parse_paths;
    use serde_json::json;

    #[test]
    fn test_validate_keyword() {
        assert_eq!(validate_keyword(None), Ok(None));
        assert_eq!(validate_keyword(Some("")), Ok(None));
        assert_eq!(validate_keyword(Some("abc")), Ok(Some("abc")));
        assert_eq!(
            validate_keyword(Some("ab")),
            Err(ArgumentError::KeywordTooShort {
                keyword: "ab".to_string(),
                min: 3
            })
        );
        // Characters, not bytes.
        assert!(validate_keyword(Some("éé")).is_err());
        assert!(validate_keyword(Some("ééé")).is_ok());
    }

    #[test]
    fn test_relevance_sums_paths() {
        let paths = parse_paths(["name", "description"]).unwrap();
        let record = json!({"name": "Apple", "description": "apple pie"});
        assert_eq!(relevance(&record, "apple", &paths), 8.0);
    }

    #[test]
    fn test_rank_orders_and_filters() {
        let records = vec![
            json!({"name": "Pineapple"}),
            json!({"name": "Banana"}),
            json!({"name": "Apple"}),
        ];
        let paths = parse_paths(["name"]).unwrap();
        let ranked = rank(&records, "apple", &paths);
        let names: Vec<_> = ranked.iter().map(|(r, _)| r["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["Apple", "Pineapple"]);
    }

    #[test]
    fn test_rank_is_stable_for_ties() {
        let records = vec![
            json!({"id": 1, "name": "apple"}),
            json!({"id": 2, "name": "Apple"}),
            json!({"id": 3, "name": "APPLE"}),
        ];
        let paths = parse_paths(["name"]).unwrap();
        let ids: Vec<_> = rank(&records, "apple", &paths)
            .iter()
            .map(|(r, _)| r["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
