//! Analytics configuration
//!
//! Thresholds and limits used by the insight engine, forecaster and
//! currency converter.
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. Explicit path (`--config`), or the override in the data dir
//!    (~/.local/share/spendwise/config/analytics.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Keys missing from an override keep their default values.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::insights::MAX_SUGGESTIONS;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/analytics.toml");

/// How the forecaster picks its 7 monthly anchors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnchorMode {
    /// Month of `today - 30*i` days for i = 6..0. Short months can make
    /// two anchors land in the same month and skip another.
    #[default]
    ThirtyDaySteps,
    /// Exact calendar months: the 6 before the current one, then the current one
    Calendar,
}

impl AnchorMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ThirtyDaySteps => "thirty_day_steps",
            Self::Calendar => "calendar",
        }
    }
}

impl std::str::FromStr for AnchorMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "thirty_day_steps" => Ok(Self::ThirtyDaySteps),
            "calendar" => Ok(Self::Calendar),
            _ => Err(format!(
                "Unknown anchor mode: {} (valid: thirty_day_steps, calendar)",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsightsConfig {
    /// Category insights kept for the dashboard
    pub dashboard_limit: usize,
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self { dashboard_limit: 5 }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastConfig {
    pub anchor_mode: AnchorMode,
    /// Fraction of a category's average suggested as a saving
    pub saving_rate: Decimal,
    /// Categories (by total spend) that get a saving suggestion
    pub top_categories: usize,
    pub max_suggestions: usize,
    /// Prediction above `rising_ratio * average` triggers a warning
    pub rising_ratio: Decimal,
    /// Prediction below `falling_ratio * average` triggers a success note
    pub falling_ratio: Decimal,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            anchor_mode: AnchorMode::ThirtyDaySteps,
            saving_rate: Decimal::new(15, 2),
            top_categories: 3,
            max_suggestions: 4,
            rising_ratio: Decimal::new(11, 1),
            falling_ratio: Decimal::new(9, 1),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyConfig {
    /// Currency that stored amounts are in
    pub base: String,
    /// Rates from `base` used when the lookup has none
    pub fallback_rates: BTreeMap<String, Decimal>,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        let fallback_rates = [
            ("INR", Decimal::ONE),
            ("USD", Decimal::new(12, 3)),
            ("EUR", Decimal::new(11, 3)),
            ("GBP", Decimal::new(95, 4)),
            ("JPY", Decimal::new(175, 2)),
        ]
        .into_iter()
        .map(|(code, rate)| (code.to_string(), rate))
        .collect();

        Self {
            base: "INR".to_string(),
            fallback_rates,
        }
    }
}

/// Full analytics configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalyticsConfig {
    pub insights: InsightsConfig,
    pub forecast: ForecastConfig,
    pub currency: CurrencyConfig,
}

impl AnalyticsConfig {
    /// Load from the default override location, or the embedded defaults
    pub fn load() -> Result<Self> {
        load_config(None)
    }

    /// Load from an explicit path (falls back to defaults if it doesn't exist)
    pub fn load_from(path: &Path) -> Result<Self> {
        load_config(Some(path))
    }

    /// Parse config from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        parse_config(content)
    }
}

/// Get the default override config path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("spendwise").join("config").join("analytics.toml"))
}

/// Load configuration (override first, then default)
fn load_config(override_path: Option<&Path>) -> Result<AnalyticsConfig> {
    let path = match override_path {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path(),
    };

    let content = match path {
        Some(path) if path.exists() => fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?,
        _ => DEFAULT_CONFIG.to_string(),
    };

    parse_config(&content)
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    insights: Option<RawInsights>,
    forecast: Option<RawForecast>,
    currency: Option<RawCurrency>,
}

#[derive(Debug, Deserialize)]
struct RawInsights {
    dashboard_limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawForecast {
    anchor_mode: Option<String>,
    saving_rate: Option<f64>,
    top_categories: Option<usize>,
    max_suggestions: Option<usize>,
    rising_ratio: Option<f64>,
    falling_ratio: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawCurrency {
    base: Option<String>,
    fallback_rates: Option<BTreeMap<String, f64>>,
}

fn decimal(key: &str, value: f64) -> Result<Decimal> {
    Decimal::from_f64(value)
        .filter(|d| !d.is_sign_negative())
        .ok_or_else(|| Error::Config(format!("{} must be a non-negative number, got {}", key, value)))
}

/// Parse config from TOML content
fn parse_config(content: &str) -> Result<AnalyticsConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = AnalyticsConfig::default();

    if let Some(insights) = raw.insights {
        if let Some(limit) = insights.dashboard_limit {
            config.insights.dashboard_limit = limit;
        }
    }

    if let Some(forecast) = raw.forecast {
        if let Some(mode) = forecast.anchor_mode {
            config.forecast.anchor_mode = mode.parse().map_err(Error::Config)?;
        }
        if let Some(rate) = forecast.saving_rate {
            let rate = decimal("forecast.saving_rate", rate)?;
            if rate > Decimal::ONE {
                return Err(Error::Config(format!(
                    "forecast.saving_rate must be at most 1, got {}",
                    rate
                )));
            }
            config.forecast.saving_rate = rate;
        }
        if let Some(top) = forecast.top_categories {
            config.forecast.top_categories = top;
        }
        if let Some(max) = forecast.max_suggestions {
            if max > MAX_SUGGESTIONS {
                return Err(Error::Config(format!(
                    "forecast.max_suggestions must be at most {}, got {}",
                    MAX_SUGGESTIONS, max
                )));
            }
            config.forecast.max_suggestions = max;
        }
        if let Some(ratio) = forecast.rising_ratio {
            config.forecast.rising_ratio = decimal("forecast.rising_ratio", ratio)?;
        }
        if let Some(ratio) = forecast.falling_ratio {
            config.forecast.falling_ratio = decimal("forecast.falling_ratio", ratio)?;
        }
    }

    if let Some(currency) = raw.currency {
        if let Some(base) = currency.base {
            config.currency.base = base.trim().to_uppercase();
        }
        if let Some(rates) = currency.fallback_rates {
            let mut table = BTreeMap::new();
            for (code, rate) in rates {
                let key = format!("currency.fallback_rates.{}", code);
                table.insert(code.trim().to_uppercase(), decimal(&key, rate)?);
            }
            config.currency.fallback_rates = table;
        }
    }

    Ok(config)
}
