//! HTML scraping for the router's configuration pages

use crate::error::{Result, RouterError};
use regex::Regex;

/// First `pppoeInf` literal, lazily up to the next closing parenthesis.
const PPPOE_INF_PATTERN: &str = r"var pppoeInf = new Array\(([\s\S]*?)\)";

/// Extract the `pppoeInf` JavaScript array from the WAN configuration page.
///
/// Quotes and line breaks are stripped and the remaining text is split on
/// `,`. The field count is not checked here; see [`crate::models::WanConfig`].
pub fn parse_wan_config(html: &str) -> Result<Vec<String>> {
    let captured = Regex::new(PPPOE_INF_PATTERN)
        .ok()
        .and_then(|re| re.captures(html))
        .and_then(|caps| caps.get(1))
        .ok_or_else(|| RouterError::UnknownResponse("pppoeInf array not found".to_string()))?;

    let cleaned: String = captured
        .as_str()
        .chars()
        .filter(|c| !matches!(c, '\n' | '\r' | '"' | '\''))
        .collect();

    Ok(cleaned.trim().split(',').map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wan_config() {
        let html = r#"
            <html><head><script type="text/javascript">
            var wanTypeDetectInfoArray = new Array(1, 0);
            var pppoeInf = new Array("a","b","c");
            </script></head><body>noise (with parens)</body></html>
        "#;

        assert_eq!(parse_wan_config(html).unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_strips_newlines() {
        let html = "var pppoeInf = new Array(\n\"user\",\n\"secret\",\n2 );";
        assert_eq!(parse_wan_config(html).unwrap(), vec!["user", "secret", "2"]);
    }

    #[test]
    fn test_first_occurrence_wins() {
        let html = r#"var pppoeInf = new Array("x"); var pppoeInf = new Array("y");"#;
        assert_eq!(parse_wan_config(html).unwrap(), vec!["x"]);
    }

    #[test]
    fn test_missing_array() {
        let err = parse_wan_config("<html><body>Login</body></html>").unwrap_err();
        assert!(matches!(err, RouterError::UnknownResponse(_)));
    }
}
