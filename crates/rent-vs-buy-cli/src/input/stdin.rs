use serde_json::Value;
use std::io::{self, Read};

/// Read a parameter document from stdin if data is being piped.
/// Returns None if stdin is a TTY (interactive) or empty.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    parse_document(&buffer)
}

/// JSON first, then YAML.
fn parse_document(raw: &str) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    match serde_json::from_str(trimmed) {
        Ok(value) => Ok(Some(value)),
        Err(json_err) => serde_yaml::from_str(trimmed)
            .map(Some)
            .map_err(|_| format!("Failed to parse stdin as JSON or YAML: {}", json_err).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_is_none() {
        assert!(parse_document("  \n").unwrap().is_none());
    }

    #[test]
    fn test_json_and_yaml() {
        let json = parse_document(r#"{"years_to_run": 5}"#).unwrap().unwrap();
        assert_eq!(json["years_to_run"], 5);
        let yaml = parse_document("years_to_run: 5\n").unwrap().unwrap();
        assert_eq!(yaml["years_to_run"], 5);
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(parse_document("{not json: [").is_err());
    }
}
