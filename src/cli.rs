//! CLI definition and dispatch.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::text_report_adapter::TextReportAdapter;
use crate::domain::breadth;
use crate::domain::drawdown;
use crate::domain::error::MarketpulseError;
use crate::domain::group;
use crate::domain::panel::Panel;
use crate::domain::report::{Report, Section, SeriesColumn};
use crate::domain::strength;
use crate::domain::window;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

const DEFAULT_SECTOR: &[&str] = &[
    "Auto", "Bank", "Energy", "FMCG", "Infra", "IT", "Media", "Metal", "Pharma", "Realty",
];
const DEFAULT_BROAD: &[&str] = &[
    "Nifty Next 50",
    "Nifty 100",
    "Nifty 200",
    "Nifty 500",
    "Mid Cap 50",
    "Mid Cap",
    "Small Cap",
];
const DEFAULT_TREND_INSTRUMENT: &str = "Nifty TRI";
const DEFAULT_BREADTH_REFERENCE: &str = "Nifty";
const DEFAULT_RATIOS: &[(&str, &str, &str)] = &[
    ("bond", "Nifty TRI", "S&P 10 Yr index"),
    ("gold", "Nifty", "GoldBees"),
    ("midcap", "Mid Cap", "Nifty"),
    ("smallcap", "Small Cap", "Nifty"),
];

#[derive(Parser, Debug)]
#[command(name = "marketpulse", about = "Market index signal engine")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the full analytics report
    Report {
        #[arg(short, long)]
        data: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Count group members above their own trailing average
    Breadth {
        #[arg(short, long)]
        data: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long, value_enum, default_value = "sector")]
        group: GroupChoice,
        #[arg(short, long)]
        window: Option<usize>,
    },
    /// Sector-average drawdown from the trailing high
    Drawdown {
        #[arg(short, long)]
        data: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        window: Option<usize>,
    },
    /// Relative-strength matrix and rankings
    Matrix {
        #[arg(short, long)]
        data: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        window: Option<usize>,
        #[arg(long)]
        lookback: Option<usize>,
    },
    /// Show panel date range and per-instrument coverage
    Info {
        #[arg(short, long)]
        data: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum GroupChoice {
    Sector,
    Broad,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Report {
            data,
            config,
            output,
        } => run_report(&data, config.as_ref(), output.as_deref()),
        Command::Breadth {
            data,
            config,
            group,
            window,
        } => run_breadth(&data, config.as_ref(), group, window),
        Command::Drawdown {
            data,
            config,
            window,
        } => run_drawdown(&data, config.as_ref(), window),
        Command::Matrix {
            data,
            config,
            window,
            lookback,
        } => run_matrix(&data, config.as_ref(), window, lookback),
        Command::Info { data } => run_info(&data),
    }
}

/// Resolved analytics parameters: config file values merged over defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    pub sector: Vec<String>,
    pub broad: Vec<String>,
    pub trend_instrument: String,
    pub breadth_reference: String,
    pub ratios: Vec<(String, String)>,
    pub trend_window: usize,
    pub channel_high_window: usize,
    pub channel_low_window: usize,
    pub breadth_window: usize,
    pub drawdown_window: usize,
    pub strength_window: usize,
    pub strength_lookback: usize,
}

impl Settings {
    pub fn defaults() -> Self {
        Self {
            sector: DEFAULT_SECTOR.iter().map(|s| s.to_string()).collect(),
            broad: DEFAULT_BROAD.iter().map(|s| s.to_string()).collect(),
            trend_instrument: DEFAULT_TREND_INSTRUMENT.to_string(),
            breadth_reference: DEFAULT_BREADTH_REFERENCE.to_string(),
            ratios: DEFAULT_RATIOS
                .iter()
                .map(|(_, num, den)| (num.to_string(), den.to_string()))
                .collect(),
            trend_window: 40,
            channel_high_window: 26,
            channel_low_window: 52,
            breadth_window: 40,
            drawdown_window: 52,
            strength_window: 40,
            strength_lookback: 4,
        }
    }

    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, MarketpulseError> {
        let defaults = Self::defaults();

        let sector = match config.get_string("groups", "sector") {
            Some(list) => group::parse_names(&list)?,
            None => defaults.sector,
        };
        let broad = match config.get_string("groups", "broad") {
            Some(list) => group::parse_names(&list)?,
            None => defaults.broad,
        };

        let trend_instrument = config
            .get_string("instruments", "trend")
            .unwrap_or(defaults.trend_instrument);
        let breadth_reference = config
            .get_string("instruments", "breadth_reference")
            .unwrap_or(defaults.breadth_reference);

        let mut ratios = Vec::with_capacity(DEFAULT_RATIOS.len());
        for (key, num, den) in DEFAULT_RATIOS {
            match config.get_string("ratios", key) {
                Some(pair) => ratios.push(parse_ratio_pair(key, &pair)?),
                None => ratios.push((num.to_string(), den.to_string())),
            }
        }

        Ok(Self {
            sector,
            broad,
            trend_instrument,
            breadth_reference,
            ratios,
            trend_window: window_setting(config, "trend", defaults.trend_window)?,
            channel_high_window: window_setting(
                config,
                "channel_high",
                defaults.channel_high_window,
            )?,
            channel_low_window: window_setting(config, "channel_low", defaults.channel_low_window)?,
            breadth_window: window_setting(config, "breadth", defaults.breadth_window)?,
            drawdown_window: window_setting(config, "drawdown", defaults.drawdown_window)?,
            strength_window: window_setting(config, "strength", defaults.strength_window)?,
            strength_lookback: config.get_usize(
                "windows",
                "strength_lookback",
                defaults.strength_lookback,
            ),
        })
    }
}

fn window_setting(
    config: &dyn ConfigPort,
    key: &str,
    default: usize,
) -> Result<usize, MarketpulseError> {
    let value = config.get_usize("windows", key, default);
    if value == 0 {
        return Err(MarketpulseError::ConfigInvalid {
            section: "windows".into(),
            key: key.into(),
            reason: "must be at least 1".into(),
        });
    }
    Ok(value)
}

fn parse_ratio_pair(key: &str, pair: &str) -> Result<(String, String), MarketpulseError> {
    match pair.split_once('/') {
        Some((num, den)) if !num.trim().is_empty() && !den.trim().is_empty() => {
            Ok((num.trim().to_string(), den.trim().to_string()))
        }
        _ => Err(MarketpulseError::ConfigInvalid {
            section: "ratios".into(),
            key: key.into(),
            reason: "expected \"Numerator / Denominator\"".into(),
        }),
    }
}

/// Assemble every analytics section over the panel. Sections whose inputs
/// are absent degrade to a notice instead of failing the report.
pub fn build_report(panel: &Panel, settings: &Settings) -> Result<Report, MarketpulseError> {
    let mut sections = Vec::new();

    sections.push(trend_section(panel, settings)?);
    sections.push(channel_section(panel, settings)?);
    for (num, den) in &settings.ratios {
        sections.push(ratio_section(panel, num, den, settings.trend_window)?);
    }
    sections.push(breadth_section(panel, settings)?);
    sections.push(drawdown_section(panel, settings)?);
    sections.push(strength_section(panel, settings)?);

    Ok(Report {
        first_date: panel.first_date(),
        last_date: panel.last_date(),
        rows: panel.len(),
        sections,
    })
}

fn notice(title: &str, message: String) -> Section {
    Section::Notice {
        title: title.to_string(),
        message,
    }
}

fn trend_section(panel: &Panel, settings: &Settings) -> Result<Section, MarketpulseError> {
    let name = &settings.trend_instrument;
    let title = format!("Trend Analysis: {}", name);
    let series = match panel.column(name) {
        Some(series) => series,
        None => return Ok(notice(&title, format!("{} data not available", name))),
    };
    let average = window::trailing_average(series, settings.trend_window)?;

    Ok(Section::Series {
        title,
        dates: panel.dates().to_vec(),
        columns: vec![
            SeriesColumn {
                label: name.clone(),
                values: series.to_vec(),
            },
            SeriesColumn {
                label: format!("{}w SMA", settings.trend_window),
                values: average,
            },
        ],
    })
}

fn channel_section(panel: &Panel, settings: &Settings) -> Result<Section, MarketpulseError> {
    let name = &settings.trend_instrument;
    let title = format!("Price Channels: {}", name);
    let series = match panel.column(name) {
        Some(series) => series,
        None => return Ok(notice(&title, format!("{} data not available", name))),
    };
    let high = window::trailing_max(series, settings.channel_high_window, 1)?;
    let low = window::trailing_min(series, settings.channel_low_window, 1)?;

    Ok(Section::Series {
        title,
        dates: panel.dates().to_vec(),
        columns: vec![
            SeriesColumn {
                label: name.clone(),
                values: series.to_vec(),
            },
            SeriesColumn {
                label: format!("{}w High", settings.channel_high_window),
                values: high,
            },
            SeriesColumn {
                label: format!("{}w Low", settings.channel_low_window),
                values: low,
            },
        ],
    })
}

fn ratio_section(
    panel: &Panel,
    num: &str,
    den: &str,
    window_len: usize,
) -> Result<Section, MarketpulseError> {
    let title = format!("{} vs {}", num, den);
    let (a, b) = match (panel.column(num), panel.column(den)) {
        (Some(a), Some(b)) => (a, b),
        _ => {
            return Ok(notice(
                &title,
                format!("required data ({}, {}) not available", num, den),
            ));
        }
    };
    let ratio = window::ratio(a, b);
    let average = window::trailing_average(&ratio, window_len)?;

    Ok(Section::Series {
        title,
        dates: panel.dates().to_vec(),
        columns: vec![
            SeriesColumn {
                label: format!("{} / {}", num, den),
                values: ratio,
            },
            SeriesColumn {
                label: format!("{}w SMA", window_len),
                values: average,
            },
        ],
    })
}

fn breadth_section(panel: &Panel, settings: &Settings) -> Result<Section, MarketpulseError> {
    let title = "Market Breadth";
    let reference = match panel.column(&settings.breadth_reference) {
        Some(series) => series,
        None => {
            return Ok(notice(
                title,
                format!("{} data not available", settings.breadth_reference),
            ));
        }
    };

    let sector = breadth::breadth(panel, &settings.sector, settings.breadth_window)?;
    let broad = breadth::breadth(panel, &settings.broad, settings.breadth_window)?;
    if sector.group_size() == 0 || broad.group_size() == 0 {
        return Ok(notice(
            title,
            "required sector/broad index data not available".to_string(),
        ));
    }

    Ok(Section::Series {
        title: title.to_string(),
        dates: panel.dates().to_vec(),
        columns: vec![
            SeriesColumn {
                label: settings.breadth_reference.clone(),
                values: reference.to_vec(),
            },
            SeriesColumn {
                label: format!(
                    "Sectors above {}w SMA (of {})",
                    settings.breadth_window,
                    sector.group_size()
                ),
                values: count_values(&sector.counts),
            },
            SeriesColumn {
                label: format!(
                    "Broad above {}w SMA (of {})",
                    settings.breadth_window,
                    broad.group_size()
                ),
                values: count_values(&broad.counts),
            },
        ],
    })
}

fn count_values(counts: &[u32]) -> Vec<Option<f64>> {
    counts.iter().map(|&c| Some(c as f64)).collect()
}

fn drawdown_section(panel: &Panel, settings: &Settings) -> Result<Section, MarketpulseError> {
    let title = format!("Sector Drawdown from {}w High", settings.drawdown_window);
    let result = drawdown::average_drawdown(panel, &settings.sector, settings.drawdown_window)?;
    if result.members.is_empty() {
        return Ok(notice(&title, "sector index data not available".to_string()));
    }

    Ok(Section::Series {
        title,
        dates: panel.dates().to_vec(),
        columns: vec![SeriesColumn {
            label: format!("Average Drawdown ({} sectors)", result.members.len()),
            values: result.values,
        }],
    })
}

fn strength_section(panel: &Panel, settings: &Settings) -> Result<Section, MarketpulseError> {
    let title = "Relative Strength Matrix";
    let realized = group::realize(panel, &settings.sector);
    if realized.len() < strength::MIN_MATRIX_MEMBERS {
        return Ok(notice(
            title,
            format!(
                "need at least {} sector indices, have {}",
                strength::MIN_MATRIX_MEMBERS,
                realized.len()
            ),
        ));
    }
    if panel.len() <= settings.strength_window {
        return Ok(notice(
            title,
            format!(
                "insufficient history for a {}-observation window",
                settings.strength_window
            ),
        ));
    }

    let ranking = strength::rank_strength(
        panel,
        &settings.sector,
        settings.strength_window,
        settings.strength_lookback,
    )?;

    Ok(Section::Strength {
        title: title.to_string(),
        ranking,
    })
}

fn fail(err: &MarketpulseError) -> ExitCode {
    eprintln!("error: {err}");
    ExitCode::from(err)
}

fn load_settings(config: Option<&PathBuf>) -> Result<Settings, ExitCode> {
    match config {
        None => Ok(Settings::defaults()),
        Some(path) => {
            let adapter = FileConfigAdapter::from_file(path).map_err(|e| {
                fail(&MarketpulseError::ConfigParse {
                    file: path.display().to_string(),
                    reason: e.to_string(),
                })
            })?;
            Settings::from_config(&adapter).map_err(|e| fail(&e))
        }
    }
}

fn load_panel(data: &Path) -> Result<Panel, ExitCode> {
    CsvAdapter::new(data.to_path_buf())
        .load_panel()
        .map_err(|e| fail(&e))
}

fn write_report(report: &Report, output: Option<&Path>) -> ExitCode {
    match TextReportAdapter::new().write(report, output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(&e),
    }
}

fn run_report(data: &Path, config: Option<&PathBuf>, output: Option<&Path>) -> ExitCode {
    let settings = match load_settings(config) {
        Ok(settings) => settings,
        Err(code) => return code,
    };
    let panel = match load_panel(data) {
        Ok(panel) => panel,
        Err(code) => return code,
    };
    let report = match build_report(&panel, &settings) {
        Ok(report) => report,
        Err(e) => return fail(&e),
    };
    write_report(&report, output)
}

fn run_breadth(
    data: &Path,
    config: Option<&PathBuf>,
    choice: GroupChoice,
    window_len: Option<usize>,
) -> ExitCode {
    let settings = match load_settings(config) {
        Ok(settings) => settings,
        Err(code) => return code,
    };
    let panel = match load_panel(data) {
        Ok(panel) => panel,
        Err(code) => return code,
    };

    let (label, requested) = match choice {
        GroupChoice::Sector => ("sector", &settings.sector),
        GroupChoice::Broad => ("broad", &settings.broad),
    };
    let window_len = window_len.unwrap_or(settings.breadth_window);

    let result = match breadth::breadth(&panel, requested, window_len) {
        Ok(result) => result,
        Err(e) => return fail(&e),
    };
    if result.group_size() == 0 {
        eprintln!("warning: no requested {label} instruments present in the panel");
    }

    let report = Report {
        first_date: panel.first_date(),
        last_date: panel.last_date(),
        rows: panel.len(),
        sections: vec![Section::Series {
            title: format!("Market Breadth ({label}, {window_len}w)"),
            dates: panel.dates().to_vec(),
            columns: vec![SeriesColumn {
                label: format!("Members above SMA (of {})", result.group_size()),
                values: count_values(&result.counts),
            }],
        }],
    };
    write_report(&report, None)
}

fn run_drawdown(data: &Path, config: Option<&PathBuf>, window_len: Option<usize>) -> ExitCode {
    let settings = match load_settings(config) {
        Ok(settings) => settings,
        Err(code) => return code,
    };
    let panel = match load_panel(data) {
        Ok(panel) => panel,
        Err(code) => return code,
    };
    let window_len = window_len.unwrap_or(settings.drawdown_window);

    let result = match drawdown::average_drawdown(&panel, &settings.sector, window_len) {
        Ok(result) => result,
        Err(e) => return fail(&e),
    };
    if result.members.is_empty() {
        eprintln!("warning: no requested sector instruments present in the panel");
    }

    let report = Report {
        first_date: panel.first_date(),
        last_date: panel.last_date(),
        rows: panel.len(),
        sections: vec![Section::Series {
            title: format!("Sector Drawdown from {window_len}w High"),
            dates: panel.dates().to_vec(),
            columns: vec![SeriesColumn {
                label: format!("Average Drawdown ({} sectors)", result.members.len()),
                values: result.values,
            }],
        }],
    };
    write_report(&report, None)
}

fn run_matrix(
    data: &Path,
    config: Option<&PathBuf>,
    window_len: Option<usize>,
    lookback: Option<usize>,
) -> ExitCode {
    let settings = match load_settings(config) {
        Ok(settings) => settings,
        Err(code) => return code,
    };
    let panel = match load_panel(data) {
        Ok(panel) => panel,
        Err(code) => return code,
    };
    let window_len = window_len.unwrap_or(settings.strength_window);
    let lookback = lookback.unwrap_or(settings.strength_lookback);

    let ranking = match strength::rank_strength(&panel, &settings.sector, window_len, lookback) {
        Ok(ranking) => ranking,
        Err(e) => return fail(&e),
    };

    let report = Report {
        first_date: panel.first_date(),
        last_date: panel.last_date(),
        rows: panel.len(),
        sections: vec![Section::Strength {
            title: format!("Relative Strength Matrix ({window_len}w, {lookback} back)"),
            ranking,
        }],
    };
    write_report(&report, None)
}

fn run_info(data: &Path) -> ExitCode {
    let panel = match load_panel(data) {
        Ok(panel) => panel,
        Err(code) => return code,
    };

    println!(
        "{} rows from {} to {}",
        panel.len(),
        panel.first_date(),
        panel.last_date()
    );
    for name in panel.column_names() {
        let observed = panel.observation_count(name).unwrap_or(0);
        println!("  {}: {} of {} observations", name, observed, panel.len());
    }
    ExitCode::SUCCESS
}
