//! Config File Formats

use crate::types::ConfigMap;
use serde::de::DeserializeOwned;

/// Syntax of a config file, chosen by its extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
}

impl Format {
    /// Pick the format for a file name; `None` for unsupported extensions
    pub fn from_filename(filename: &str) -> Option<Format> {
        let (_, ext) = filename.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "yml" | "yaml" => Some(Format::Yaml),
            "json" => Some(Format::Json),
            _ => None,
        }
    }

    /// Parse a document into a generic mapping.
    ///
    /// Documents with no content (blank or comments only) yield an empty map.
    pub fn parse_map(self, text: &str) -> Result<ConfigMap, String> {
        if is_blank_document(text) {
            return Ok(ConfigMap::new());
        }
        self.parse_typed(text)
    }

    /// Deserialize a document straight into `T`
    pub fn parse_typed<T: DeserializeOwned>(self, text: &str) -> Result<T, String> {
        match self {
            Format::Yaml => serde_yaml::from_str(text).map_err(|e| e.to_string()),
            Format::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
        }
    }
}

fn is_blank_document(text: &str) -> bool {
    text.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#') || line == "---"
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[test]
    fn test_format_from_filename() {
        assert_eq!(Format::from_filename("app.yml"), Some(Format::Yaml));
        assert_eq!(Format::from_filename("app.YAML"), Some(Format::Yaml));
        assert_eq!(Format::from_filename("app.json"), Some(Format::Json));
        assert_eq!(Format::from_filename("app.toml"), None);
        assert_eq!(Format::from_filename("app"), None);
    }

    #[test]
    fn test_parse_yaml_map() {
        let map = Format::Yaml
            .parse_map("server:\n  port: 8080\n  hosts: [a, b]\n")
            .unwrap();
        assert_eq!(map["server"]["port"], json!(8080));
        assert_eq!(map["server"]["hosts"], json!(["a", "b"]));
    }

    #[test]
    fn test_blank_document_is_empty_map() {
        assert!(Format::Yaml.parse_map("").unwrap().is_empty());
        assert!(Format::Yaml.parse_map("# nothing here\n\n").unwrap().is_empty());
        assert!(Format::Json.parse_map("  \n").unwrap().is_empty());
    }

    #[test]
    fn test_non_mapping_document_is_rejected() {
        assert!(Format::Yaml.parse_map("- a\n- b\n").is_err());
        assert!(Format::Json.parse_map("[1, 2]").is_err());
    }

    #[test]
    fn test_malformed_document_is_rejected() {
        assert!(Format::Yaml.parse_map("a: [unclosed").is_err());
        assert!(Format::Json.parse_map("{\"a\": ").is_err());
    }

    #[test]
    fn test_parse_typed() {
        #[derive(Deserialize)]
        struct Server {
            port: u16,
        }

        let server: Server = Format::Json.parse_typed("{\"port\": 9000}").unwrap();
        assert_eq!(server.port, 9000);
    }
}
