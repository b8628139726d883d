use crate::error::CompileError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Built-in export targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Readable,
    Sql,
    Mongo,
    Json,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Readable,
        ExportFormat::Sql,
        ExportFormat::Mongo,
        ExportFormat::Json,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Readable => "readable",
            ExportFormat::Sql => "sql",
            ExportFormat::Mongo => "mongo",
            ExportFormat::Json => "json",
        }
    }

    /// Conventional file extension for written output
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Readable => "txt",
            ExportFormat::Sql => "sql",
            ExportFormat::Mongo => "mongo.json",
            ExportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExportFormat::ALL
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CompileError::UnknownFormat(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format_names() {
        assert_eq!("sql".parse::<ExportFormat>().unwrap(), ExportFormat::Sql);
        assert_eq!(" Mongo ".parse::<ExportFormat>().unwrap(), ExportFormat::Mongo);
        assert!(matches!(
            "xml".parse::<ExportFormat>(),
            Err(CompileError::UnknownFormat(name)) if name == "xml"
        ));
    }

    #[test]
    fn test_serde_names_match_display() {
        for format in ExportFormat::ALL {
            let json = serde_json::to_string(&format).unwrap();
            assert_eq!(json, format!("\"{}\"", format));
        }
    }
}
