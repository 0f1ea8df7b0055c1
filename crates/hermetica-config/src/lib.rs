use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Relative locations tried when no config path is given.
pub const CONFIG_SEARCH_PATHS: [&str; 2] = ["configs/hermetica.toml", "../../configs/hermetica.toml"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EphemerisBackend {
    #[default]
    Analytic,
    #[serde(alias = "swisseph")]
    Swiss,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EphemerisConfig {
    pub backend: EphemerisBackend,
    pub ephemeris_path: Option<PathBuf>,
    /// House system name as written in the file; parsed by the library
    pub house_system: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CorpusConfig {
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DignityConfig {
    pub domicile: i32,
    pub exaltation: i32,
    pub triplicity: i32,
    pub detriment: i32,
    pub fall: i32,
    pub angular: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HermeticaSettings {
    pub ephemeris: EphemerisConfig,
    pub corpus: CorpusConfig,
    pub dignity: DignityConfig,
}

impl Default for HermeticaSettings {
    fn default() -> Self {
        RootConfigToml::default().build()
    }
}

#[derive(Debug, Clone, Deserialize)]
struct EphemerisToml {
    #[serde(default)]
    backend: EphemerisBackend,
    #[serde(default)]
    ephemeris_path: Option<PathBuf>,
    #[serde(default = "default_house_system")]
    house_system: String,
}

impl Default for EphemerisToml {
    fn default() -> Self {
        Self {
            backend: EphemerisBackend::default(),
            ephemeris_path: None,
            house_system: default_house_system(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct CorpusToml {
    #[serde(default = "default_corpus_dir")]
    dir: PathBuf,
}

impl Default for CorpusToml {
    fn default() -> Self {
        Self {
            dir: default_corpus_dir(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct DignityToml {
    #[serde(default = "default_domicile")]
    domicile: i32,
    #[serde(default = "default_exaltation")]
    exaltation: i32,
    #[serde(default = "default_triplicity")]
    triplicity: i32,
    #[serde(default = "default_detriment")]
    detriment: i32,
    #[serde(default = "default_fall")]
    fall: i32,
    #[serde(default = "default_angular")]
    angular: i32,
}

impl Default for DignityToml {
    fn default() -> Self {
        Self {
            domicile: default_domicile(),
            exaltation: default_exaltation(),
            triplicity: default_triplicity(),
            detriment: default_detriment(),
            fall: default_fall(),
            angular: default_angular(),
        }
    }
}

fn default_house_system() -> String {
    "whole_sign".to_string()
}

fn default_corpus_dir() -> PathBuf {
    PathBuf::from("data/corpus")
}

fn default_domicile() -> i32 {
    5
}

fn default_exaltation() -> i32 {
    4
}

fn default_triplicity() -> i32 {
    3
}

fn default_detriment() -> i32 {
    -4
}

fn default_fall() -> i32 {
    -5
}

fn default_angular() -> i32 {
    2
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RootConfigToml {
    #[serde(default)]
    ephemeris: EphemerisToml,
    #[serde(default)]
    corpus: CorpusToml,
    #[serde(default)]
    dignity: DignityToml,
}

impl RootConfigToml {
    fn into_settings(self) -> anyhow::Result<HermeticaSettings> {
        if self.ephemeris.backend == EphemerisBackend::Analytic && self.ephemeris.ephemeris_path.is_some() {
            anyhow::bail!("ephemeris.ephemeris_path is only used by the swiss backend");
        }
        Ok(self.build())
    }

    fn build(self) -> HermeticaSettings {
        let RootConfigToml {
            ephemeris,
            corpus,
            dignity,
        } = self;
        HermeticaSettings {
            ephemeris: EphemerisConfig {
                backend: ephemeris.backend,
                ephemeris_path: ephemeris.ephemeris_path,
                house_system: ephemeris.house_system,
            },
            corpus: CorpusConfig { dir: corpus.dir },
            dignity: DignityConfig {
                domicile: dignity.domicile,
                exaltation: dignity.exaltation,
                triplicity: dignity.triplicity,
                detriment: dignity.detriment,
                fall: dignity.fall,
                angular: dignity.angular,
            },
        }
    }
}

/// Read the config text.
///
/// An explicit path must exist. Without one, the usual relative locations are
/// tried and `None` means none of them exists.
pub fn read_config_text(path: Option<&Path>) -> anyhow::Result<Option<(PathBuf, String)>> {
    if let Some(path) = path {
        let text = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Could not read config {}: {e}", path.display()))?;
        return Ok(Some((path.to_path_buf(), text)));
    }
    for p in &CONFIG_SEARCH_PATHS {
        if let Ok(text) = fs::read_to_string(p) {
            return Ok(Some((PathBuf::from(p), text)));
        }
    }
    Ok(None)
}

pub fn parse_settings(text: &str) -> anyhow::Result<HermeticaSettings> {
    let root: RootConfigToml = toml::from_str(text)
        .map_err(|e| anyhow::anyhow!("Failed to parse hermetica config: {e}"))?;
    root.into_settings()
}

/// Load settings, falling back to defaults when no config file is found.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<HermeticaSettings> {
    match read_config_text(path)? {
        Some((source, text)) => parse_settings(&text)
            .map_err(|e| anyhow::anyhow!("{} ({})", e, source.display())),
        None => Ok(HermeticaSettings::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_document_uses_defaults() {
        let settings = parse_settings("").unwrap();
        assert_eq!(settings, HermeticaSettings::default());
        assert_eq!(settings.ephemeris.backend, EphemerisBackend::Analytic);
        assert_eq!(settings.ephemeris.house_system, "whole_sign");
        assert_eq!(settings.corpus.dir, PathBuf::from("data/corpus"));
        assert_eq!(settings.dignity.fall, -5);
        assert_eq!(settings.dignity.angular, 2);
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let settings = parse_settings(
            r#"
            [ephemeris]
            house_system = "porphyry"

            [dignity]
            angular = 0
            "#,
        )
        .unwrap();
        assert_eq!(settings.ephemeris.house_system, "porphyry");
        assert_eq!(settings.dignity.angular, 0);
        assert_eq!(settings.dignity.domicile, 5);
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        let err = parse_settings("[ephemeris]\nbackend = \"jpl\"\n").unwrap_err();
        assert!(err.to_string().contains("jpl"));
    }

    #[test]
    fn test_backend_names() {
        let swisseph = parse_settings("[ephemeris]\nbackend = \"swisseph\"\n").unwrap();
        assert_eq!(swisseph.ephemeris.backend, EphemerisBackend::Swiss);
        let analytic = parse_settings("[ephemeris]\nbackend = \"analytic\"\n").unwrap();
        assert_eq!(analytic.ephemeris.backend, EphemerisBackend::Analytic);
        assert!(parse_settings("[ephemeris]\nbackend = 3\n").is_err());
    }

    #[test]
    fn test_swiss_backend_with_path() {
        let settings = parse_settings(
            "[ephemeris]\nbackend = \"swiss\"\nephemeris_path = \"/usr/share/sweph\"\n",
        )
        .unwrap();
        assert_eq!(settings.ephemeris.backend, EphemerisBackend::Swiss);
        assert_eq!(settings.ephemeris.ephemeris_path, Some(PathBuf::from("/usr/share/sweph")));
        assert!(parse_settings("[ephemeris]\nephemeris_path = \"/x\"\n").is_err());
    }

    #[test]
    fn test_explicit_missing_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_settings(Some(&dir.path().join("missing.toml"))).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hermetica.toml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "[corpus]\ndir = \"/srv/corpus\"").unwrap();
        let settings = load_settings(Some(&path)).unwrap();
        assert_eq!(settings.corpus.dir, PathBuf::from("/srv/corpus"));
    }
}
