mod input;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Parser, ValueEnum};
use hermetica::western::{DignityTable, DignityWeights};
use hermetica::{BirthInput, Corpus, EphemerisAdapter, EphemerisSettings, HouseSystem, ReportEngine};
use hermetica_config::{EphemerisBackend, HermeticaSettings};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Clone, Debug, ValueEnum)]
enum Mode {
    /// Full four-section report.
    Report,
    /// Natal chart only.
    Chart,
    /// Check the profection files of the corpus and exit.
    ValidateCorpus,
}

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[arg(long, value_enum, default_value_t = Mode::Report)]
    mode: Mode,

    #[arg(long, default_value = "")]
    name: String,

    /// Birth date, YYYY-MM-DD.
    #[arg(long)]
    date: Option<String>,

    /// Local birth time, HH:MM or HH:MM:SS.
    #[arg(long)]
    time: Option<String>,

    /// Latitude in degrees, north positive.
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Longitude in degrees, east positive.
    #[arg(long, allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Offset of the local time from UTC, e.g. `+02:00`.
    #[arg(long, default_value = "+00:00", allow_hyphen_values = true)]
    utc_offset: String,

    /// Date the profected year is taken at (default: today).
    #[arg(long)]
    as_of: Option<String>,

    /// JSON array of birth entries; replaces the single-input flags.
    #[arg(long)]
    batch: Option<PathBuf>,

    /// Config file (otherwise configs/hermetica.toml is searched for).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Corpus directory override.
    #[arg(long)]
    corpus: Option<PathBuf>,

    /// House system override.
    #[arg(long)]
    house_system: Option<String>,

    /// Write JSON here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

/// Per-entry result of a batch run.
#[derive(Serialize)]
#[serde(untagged)]
enum BatchOutcome<T> {
    Ok(T),
    Failed { name: String, error: String },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let settings = hermetica_config::load_settings(args.config.as_deref())?;
    let corpus_dir = args.corpus.clone().unwrap_or_else(|| settings.corpus.dir.clone());

    if let Mode::ValidateCorpus = args.mode {
        let check = Corpus::validate_profections(&corpus_dir)
            .with_context(|| format!("Corpus {} failed validation", corpus_dir.display()))?;
        log::info!(
            "Corpus {} is valid: {} profection houses, {} with extra keys",
            corpus_dir.display(),
            check.entries.len(),
            check.extra_keys.len()
        );
        return write_json(args.out.as_deref(), &check.extra_keys);
    }

    let adapter = build_adapter(&settings, args.house_system.as_deref())?;
    let inputs = match &args.batch {
        Some(path) => input::read_batch(path)?,
        None => vec![single_input(&args)?],
    };

    match args.mode {
        Mode::Chart => {
            let corpus = Arc::new(Corpus::default());
            let engine = ReportEngine::new(adapter, corpus, DignityTable::classical(), weights(&settings));
            if args.batch.is_none() {
                let chart = engine.chart(&inputs[0])?;
                return write_json(args.out.as_deref(), &chart);
            }
            let charts: Vec<_> = inputs
                .iter()
                .map(|input| match engine.chart(input) {
                    Ok(chart) => BatchOutcome::Ok(chart),
                    Err(e) => BatchOutcome::Failed {
                        name: input.name.clone(),
                        error: e.to_string(),
                    },
                })
                .collect();
            write_json(args.out.as_deref(), &charts)
        }
        Mode::Report => {
            let corpus = Corpus::load(&corpus_dir)
                .with_context(|| format!("Failed to load corpus {}", corpus_dir.display()))?;
            let engine = ReportEngine::new(
                adapter,
                Arc::new(corpus),
                DignityTable::classical(),
                weights(&settings),
            );
            let as_of = match &args.as_of {
                Some(text) => NaiveDate::parse_from_str(text, "%Y-%m-%d")
                    .with_context(|| format!("Invalid --as-of {:?}", text))?,
                None => Local::now().date_naive(),
            };

            if args.batch.is_none() {
                let report = engine.generate(&inputs[0], as_of)?;
                let missing = report.missing();
                if !missing.is_empty() {
                    log::warn!("{} interpretation gaps: {:?}", missing.len(), missing);
                }
                return write_json(args.out.as_deref(), &report);
            }

            let reports: Vec<_> = engine
                .generate_batch(&inputs, as_of)
                .into_iter()
                .zip(&inputs)
                .map(|(result, input)| match result {
                    Ok(report) => BatchOutcome::Ok(report),
                    Err(e) => {
                        log::warn!("Report for {:?} failed: {}", input.name, e);
                        BatchOutcome::Failed {
                            name: input.name.clone(),
                            error: e.to_string(),
                        }
                    }
                })
                .collect();
            write_json(args.out.as_deref(), &reports)
        }
        Mode::ValidateCorpus => Ok(()),
    }
}

fn single_input(args: &Args) -> anyhow::Result<BirthInput> {
    let date = args.date.as_deref().context("--date is required without --batch")?;
    let time = args.time.as_deref().context("--time is required without --batch")?;
    let lat = args.lat.context("--lat is required without --batch")?;
    let lon = args.lon.context("--lon is required without --batch")?;
    let offset = input::parse_utc_offset(&args.utc_offset)?;
    Ok(BirthInput::parse(&args.name, date, time, lat, lon, offset)?)
}

fn weights(settings: &HermeticaSettings) -> DignityWeights {
    let d = settings.dignity;
    DignityWeights {
        domicile: d.domicile,
        exaltation: d.exaltation,
        triplicity: d.triplicity,
        detriment: d.detriment,
        fall: d.fall,
        angular: d.angular,
    }
}

fn build_adapter(settings: &HermeticaSettings, house_system: Option<&str>) -> anyhow::Result<EphemerisAdapter> {
    let name = house_system.unwrap_or(&settings.ephemeris.house_system);
    let ephemeris = EphemerisSettings {
        house_system: HouseSystem::parse(name)?,
        ..EphemerisSettings::default()
    };

    match settings.ephemeris.backend {
        EphemerisBackend::Analytic => {
            let supported = hermetica::ephemeris::houses::supported_systems();
            if !supported.iter().any(|s| s == ephemeris.house_system.name()) {
                anyhow::bail!(
                    "House system {} needs the swiss backend (analytic supports {:?})",
                    ephemeris.house_system,
                    supported
                );
            }
            Ok(EphemerisAdapter::analytic(ephemeris))
        }
        #[cfg(feature = "swiss-ephemeris")]
        EphemerisBackend::Swiss => {
            let provider = hermetica::SwissEphemerisAdapter::new(settings.ephemeris.ephemeris_path.clone())?;
            Ok(EphemerisAdapter::new(Arc::new(provider), ephemeris))
        }
        #[cfg(not(feature = "swiss-ephemeris"))]
        EphemerisBackend::Swiss => {
            anyhow::bail!("ephemeris.backend = \"swiss\" needs the swiss-ephemeris feature")
        }
    }
}

fn write_json<T: Serialize + ?Sized>(out: Option<&Path>, value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match out {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_follow_settings() {
        let mut settings = HermeticaSettings::default();
        settings.dignity.angular = 0;
        let w = weights(&settings);
        assert_eq!(w.angular, 0);
        assert_eq!(w.domicile, DignityWeights::default().domicile);
    }

    #[test]
    fn test_analytic_backend_rejects_quadrant_systems() {
        let settings = HermeticaSettings::default();
        assert!(build_adapter(&settings, None).is_ok());
        assert!(build_adapter(&settings, Some("porphyry")).is_ok());
        assert!(build_adapter(&settings, Some("placidus")).is_err());
        assert!(build_adapter(&settings, Some("nonsense")).is_err());
    }

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from([
            "hermetica_report",
            "--date",
            "1990-05-15",
            "--time",
            "14:30",
            "--lat",
            "40.4168",
            "--lon",
            "-3.7038",
            "--utc-offset",
            "+02:00",
        ]);
        let input = single_input(&args).unwrap();
        assert_eq!(input.location.utc_offset_seconds, 7200);
        assert!((input.location.longitude + 3.7038).abs() < 1e-9);
    }
}
