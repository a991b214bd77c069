use std::{fmt, fs, path::Path, path::PathBuf, str::FromStr};

use anyhow::Context;
use serde::Deserialize;

/// Run configuration, loaded once from a JSON file and immutable afterwards.
///
/// `output_dir` and `citations` are required; their absence is a fatal
/// configuration error at startup. `style` and `mandatory_fields` keep the
/// historical defaults of the Scholar export job.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub output_dir: PathBuf,
    pub citations: Vec<Profile>,
    #[serde(default)]
    pub style: Style,
    #[serde(default = "default_mandatory_fields")]
    pub mandatory_fields: Vec<String>,
}

fn default_mandatory_fields() -> Vec<String> {
    vec!["year".to_string()]
}

/// One configured Scholar author profile.
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    pub user_id: String,
    /// Export-access token (`citsig`) for the profile's BibTeX export.
    pub code: String,
    name: Option<String>,
}

impl Profile {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.user_id)
    }
}

/// Supported citation styles. Parsed from the config string; an unknown name
/// is rejected while loading the configuration, before any fetch happens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Style {
    Apa,
    #[default]
    Plain,
}

impl FromStr for Style {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "apa" => Ok(Style::Apa),
            "plain" => Ok(Style::Plain),
            other => Err(anyhow::anyhow!(
                "unknown citation style: {other} (supported: apa, plain)"
            )),
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Style::Apa => "apa",
            Style::Plain => "plain",
        })
    }
}

impl<'de> Deserialize<'de> for Style {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Config> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Config = serde_json::from_str(&raw)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn load(json: &str) -> anyhow::Result<Config> {
        let mut tmp = NamedTempFile::new().expect("tmp file");
        tmp.write_all(json.as_bytes()).expect("write config");
        Config::load(tmp.path())
    }

    #[test]
    fn loads_full_config() {
        let config = load(
            r#"{
                "output_dir": "out",
                "citations": [{"user_id": "u1", "code": "c1", "name": "Ada"}],
                "style": "apa",
                "mandatory_fields": ["year", "title"]
            }"#,
        )
        .expect("valid config");
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.citations.len(), 1);
        assert_eq!(config.citations[0].display_name(), "Ada");
        assert_eq!(config.style, Style::Apa);
        assert_eq!(config.mandatory_fields, vec!["year", "title"]);
    }

    #[test]
    fn defaults_style_and_mandatory_fields() {
        let config = load(r#"{"output_dir": "out", "citations": []}"#).expect("valid config");
        assert_eq!(config.style, Style::Plain);
        assert_eq!(config.mandatory_fields, vec!["year"]);
    }

    #[test]
    fn display_name_falls_back_to_user_id() {
        let config = load(
            r#"{"output_dir": "out", "citations": [{"user_id": "u1", "code": "c1"}]}"#,
        )
        .expect("valid config");
        assert_eq!(config.citations[0].display_name(), "u1");
    }

    #[test]
    fn missing_output_dir_is_fatal() {
        assert!(load(r#"{"citations": []}"#).is_err());
    }

    #[test]
    fn missing_citations_is_fatal() {
        assert!(load(r#"{"output_dir": "out"}"#).is_err());
    }

    #[test]
    fn unknown_style_is_fatal() {
        let err = load(r#"{"output_dir": "out", "citations": [], "style": "chicago"}"#)
            .expect_err("unknown style must fail");
        assert!(err.to_string().contains("parsing config file"));
        assert!(format!("{err:#}").contains("unknown citation style: chicago"));
    }
}
