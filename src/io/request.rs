//! Reading `ModelRequest` JSON.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::domain::ModelRequest;
use crate::error::AppError;

/// Read a request from `path`, or from stdin when `path` is `None`.
pub fn read_request(path: Option<&Path>) -> Result<ModelRequest, AppError> {
    match path {
        Some(path) => {
            let file = File::open(path).map_err(|e| {
                AppError::new(2, format!("Failed to open request JSON '{}': {e}", path.display()))
            })?;
            parse_request(file)
        }
        None => parse_request(std::io::stdin().lock()),
    }
}

/// Parse a request from any reader.
pub fn parse_request(reader: impl Read) -> Result<ModelRequest, AppError> {
    serde_json::from_reader(reader).map_err(|e| AppError::new(2, format!("Invalid request JSON: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Parameters;

    #[test]
    fn parses_request_with_default_parameters() {
        let req = parse_request(r#"{"model": "LAR", "values": [1000, 2000]}"#.as_bytes()).unwrap();
        assert_eq!(req.model, "LAR");
        assert_eq!(req.parameters, Parameters::default_named());
        assert_eq!(req.values, vec![1000.0, 2000.0]);
    }

    #[test]
    fn malformed_json_is_a_client_error() {
        let err = parse_request("{\"model\": ".as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 2);

        let err = read_request(Some(Path::new("/definitely/not/here.json"))).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
