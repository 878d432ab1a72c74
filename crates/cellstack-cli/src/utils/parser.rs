use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid --set format: '{0}'. Expected KEY=VALUE.")]
    InvalidKeyValue(String),

    #[error("Key cannot be empty in '{0}'.")]
    EmptyKey(String),
}

/// Splits a `KEY=VALUE` override at the first `=`; the value may itself contain `=`.
pub fn parse_key_value(pair: &str) -> Result<(&str, &str), ParseError> {
    let (key, value) = pair
        .split_once('=')
        .ok_or_else(|| ParseError::InvalidKeyValue(pair.to_string()))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(ParseError::EmptyKey(pair.to_string()));
    }
    Ok((key, value.trim()))
}

/// One source location per line. Blank lines are dropped; surrounding whitespace is kept
/// out of the paths.
pub fn parse_source_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_value_splits_at_first_equals() {
        assert_eq!(parse_key_value("top-k=5"), Ok(("top-k", "5")));
        assert_eq!(parse_key_value(" thickness.to = 4 "), Ok(("thickness.to", "4")));
        assert_eq!(parse_key_value("a=b=c"), Ok(("a", "b=c")));
    }

    #[test]
    fn key_value_requires_equals_and_key() {
        assert_eq!(
            parse_key_value("top-k"),
            Err(ParseError::InvalidKeyValue("top-k".to_string()))
        );
        assert_eq!(
            parse_key_value("=5"),
            Err(ParseError::EmptyKey("=5".to_string()))
        );
    }

    #[test]
    fn source_list_skips_blank_lines() {
        let content = "a.csv\n\n  \n/data/b.csv\r\nc d.csv\n";
        assert_eq!(
            parse_source_list(content),
            vec!["a.csv", "/data/b.csv", "c d.csv"]
        );
    }

    #[test]
    fn empty_source_list_has_no_entries() {
        assert!(parse_source_list("").is_empty());
        assert!(parse_source_list("\n\n").is_empty());
    }
}
