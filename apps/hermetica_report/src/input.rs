use anyhow::Context;
use chrono::DateTime;
use hermetica::BirthInput;
use serde::Deserialize;
use std::path::Path;

/// One entry of a `--batch` file
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BatchEntry {
    #[serde(default)]
    pub name: String,
    /// YYYY-MM-DD
    pub date: String,
    /// HH:MM or HH:MM:SS, local clock time
    pub time: String,
    pub latitude: f64,
    pub longitude: f64,
    /// `+02:00`, `-0430`, `+05` or `Z`
    #[serde(default = "default_offset")]
    pub utc_offset: String,
}

fn default_offset() -> String {
    "+00:00".to_string()
}

impl BatchEntry {
    pub fn to_birth_input(&self) -> anyhow::Result<BirthInput> {
        let offset = parse_utc_offset(&self.utc_offset)?;
        Ok(BirthInput::parse(
            &self.name,
            &self.date,
            &self.time,
            self.latitude,
            self.longitude,
            offset,
        )?)
    }
}

/// Largest offset in use anywhere (+14:00, Line Islands).
const MAX_OFFSET_SECONDS: i32 = 14 * 3600;

/// Offset text (`+02:00`, `-0430`, `+05`, `Z`) to seconds east of UTC.
pub(crate) fn parse_utc_offset(text: &str) -> anyhow::Result<i32> {
    let t = text.trim();
    if t.eq_ignore_ascii_case("utc") {
        return Ok(0);
    }
    let stamp = format!("2000-01-01T00:00:00{}", t);
    let parsed = DateTime::parse_from_str(&stamp, "%Y-%m-%dT%H:%M:%S%#z")
        .with_context(|| format!("Invalid UTC offset {:?}", text))?;
    let seconds = parsed.offset().local_minus_utc();
    if seconds.abs() > MAX_OFFSET_SECONDS {
        anyhow::bail!("Invalid UTC offset {:?}: beyond ±14:00", text);
    }
    Ok(seconds)
}

pub(crate) fn read_batch(path: &Path) -> anyhow::Result<Vec<BirthInput>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read batch file {}", path.display()))?;
    let entries: Vec<BatchEntry> = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse batch file {}", path.display()))?;
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            entry
                .to_birth_input()
                .with_context(|| format!("Batch entry {} ({:?})", i, entry.name))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_utc_offset_forms() {
        assert_eq!(parse_utc_offset("+02:00").unwrap(), 7200);
        assert_eq!(parse_utc_offset("-04:00").unwrap(), -14400);
        assert_eq!(parse_utc_offset("+0530").unwrap(), 19800);
        assert_eq!(parse_utc_offset("-03").unwrap(), -10800);
        assert_eq!(parse_utc_offset("Z").unwrap(), 0);
        assert_eq!(parse_utc_offset("UTC").unwrap(), 0);
        assert!(parse_utc_offset("+02:75").is_err());
        assert!(parse_utc_offset("east").is_err());
    }

    #[test]
    fn test_oversized_offsets_are_errors() {
        assert!(parse_utc_offset("+999999").is_err());
        assert!(parse_utc_offset("-99999999999").is_err());
        assert!(parse_utc_offset("+15:00").is_err());
        assert_eq!(parse_utc_offset("+14:00").unwrap(), 14 * 3600);
    }

    #[test]
    fn test_stray_signs_are_errors() {
        assert!(parse_utc_offset("+-5").is_err());
        assert!(parse_utc_offset("-+05:00").is_err());
        assert!(parse_utc_offset("05:00+").is_err());
        assert!(parse_utc_offset("").is_err());
    }

    #[test]
    fn test_read_batch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("batch.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"[
                {{"name": "Madrid", "date": "1990-05-15", "time": "14:30", "latitude": 40.4168, "longitude": -3.7038, "utcOffset": "+02:00"}},
                {{"name": "NYC", "date": "2020-05-22", "time": "02:00", "latitude": 40.7128, "longitude": -74.006, "utcOffset": "-04:00"}}
            ]"#
        )
        .unwrap();
        let inputs = read_batch(&path).unwrap();
        assert_eq!(inputs.len(), 2);
        assert_eq!(inputs[1].location.utc_offset_seconds, -14400);
    }

    #[test]
    fn test_bad_batch_entry_names_index() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("batch.json");
        std::fs::write(
            &path,
            r#"[{"name": "x", "date": "1990-02-30", "time": "10:00", "latitude": 0, "longitude": 0}]"#,
        )
        .unwrap();
        let err = read_batch(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("Batch entry 0"));
    }
}
