use chrono::{Datelike, Local, NaiveDate};
use serde::Deserialize;
use serde_with::DeserializeFromStr;
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::daytype::DayTypes;
use crate::error::{Error, ErrorKind, Result};
use crate::grid::{parse_date, WeekStart};
use crate::lunar::SUPPORTED_YEARS;

const CONFIG_PATH_ENV_VAR: &str = "WORKCAL_CONFIG_FILE";

pub fn find_configfile_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();

    if let Ok(path) = env::var(CONFIG_PATH_ENV_VAR) {
        locations.push(PathBuf::from(path));
    }

    if let Some(dir) = dirs::config_dir() {
        locations.push(dir.join("workcal").join("config.toml"));
    }

    match dirs::home_dir() {
        Some(home) => locations.push(home.join(".workcal.toml")),
        None => log::warn!("Unable to find home directory"),
    }

    locations
}

/// Loads `explicit` if given, otherwise the first existing file of
/// [`find_configfile_locations`]. Falls back to the defaults if there is none.
pub fn load_suitable_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        return Config::from_file(path);
    }

    for location in find_configfile_locations() {
        if location.is_file() {
            return Config::from_file(&location);
        }
        log::debug!("No config at {}", location.display());
    }

    log::info!("No config file found, using defaults");
    Ok(Config::default())
}

/// An `#rrggbb` colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, DeserializeFromStr)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        HexColor { r, g, b }
    }
}

impl FromStr for HexColor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || {
            Error::new(
                ErrorKind::ParseError,
                &format!("'{}' is not a colour of the form #rrggbb", s),
            )
        };

        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }

        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());

        Ok(HexColor::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Colors {
    pub work_day: HexColor,
    pub rest_day: HexColor,
    pub holiday: HexColor,
    pub selected: HexColor,
}

impl Default for Colors {
    fn default() -> Self {
        Colors {
            work_day: HexColor::new(0xff, 0xff, 0xff),
            rest_day: HexColor::new(0xee, 0xee, 0xee),
            holiday: HexColor::new(0xdf, 0xe2, 0xfb),
            selected: HexColor::new(0xab, 0xcd, 0xff),
        }
    }
}

/// Date identity as written in the config, `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, DeserializeFromStr)]
pub struct DayId(pub NaiveDate);

impl FromStr for DayId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_date(s).map(DayId)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DayLists {
    pub work: Vec<DayId>,
    pub rest: Vec<DayId>,
    pub holiday: Vec<DayId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub week_start: WeekStart,
    pub year: Option<i32>,
    pub tick_rate_ms: u64,
    pub colors: Colors,
    pub days: DayLists,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            week_start: WeekStart::default(),
            year: None,
            tick_rate_ms: 500,
            colors: Colors::default(),
            days: DayLists::default(),
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Config> {
        log::info!("Loading config from {}", path.display());

        let content = fs::read_to_string(path).map_err(|e| {
            Error::from(e).with_msg(&format!("Could not read config '{}'", path.display()))
        })?;

        content.parse()
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }

    /// The configured year or the current one, limited to the supported range.
    pub fn initial_year(&self) -> i32 {
        self.year.unwrap_or_else(|| {
            Local::now()
                .date_naive()
                .year()
                .clamp(*SUPPORTED_YEARS.start(), *SUPPORTED_YEARS.end())
        })
    }

    pub fn day_types(&self) -> DayTypes {
        let dates = |ids: &[DayId]| ids.iter().map(|id| id.0).collect::<Vec<_>>();

        let types = DayTypes::from_lists(
            &dates(&self.days.work),
            &dates(&self.days.rest),
            &dates(&self.days.holiday),
        );
        if !types.is_empty() {
            log::info!("Loaded {} configured day(s)", types.len());
        }
        types
    }

    fn validate(self) -> Result<Self> {
        if let Some(year) = self.year {
            if !SUPPORTED_YEARS.contains(&year) {
                return Err(Error::year_out_of_range(year));
            }
        }

        if self.tick_rate_ms == 0 {
            return Err(Error::new(
                ErrorKind::ConfigParse,
                "tick_rate_ms must be greater than zero",
            ));
        }

        Ok(self)
    }
}

impl FromStr for Config {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        toml::from_str::<Config>(s)?.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::daytype::DayType;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config: Config = "".parse().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.tick_rate(), Duration::from_millis(500));
        assert_eq!(config.colors.holiday.to_string(), "#dfe2fb");
    }

    #[test]
    fn full_config() {
        let config: Config = r##"
            week_start = "monday"
            year = 2024
            tick_rate_ms = 250

            [colors]
            holiday = "#FF0000"

            [days]
            work = ["2024-02-04", "2024-02-18"]
            rest = ["2024-04-05"]
            holiday = ["2024-02-10", "2024-02-11"]
        "##
        .parse()
        .unwrap();

        assert_eq!(config.week_start, WeekStart::Monday);
        assert_eq!(config.initial_year(), 2024);
        assert_eq!(config.tick_rate(), Duration::from_millis(250));
        assert_eq!(config.colors.holiday, HexColor::new(0xff, 0, 0));
        assert_eq!(config.colors.work_day, Colors::default().work_day);

        let types = config.day_types();
        assert_eq!(types.get(date(2024, 2, 4)), Some(DayType::Work));
        assert_eq!(types.get(date(2024, 4, 5)), Some(DayType::Rest));
        assert_eq!(types.get(date(2024, 2, 10)), Some(DayType::Holiday));
        assert_eq!(types.get(date(2024, 2, 11)), Some(DayType::Holiday));
        assert_eq!(types.len(), 5);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!("week_start = \"tuesday\"".parse::<Config>().is_err());
        assert!("year = 1850".parse::<Config>().is_err());
        assert!("tick_rate_ms = 0".parse::<Config>().is_err());
        assert!("[days]\nwork = [\"2024-02-30\"]".parse::<Config>().is_err());
        assert!("[colors]\nselected = \"abcdff\"".parse::<Config>().is_err());
    }

    #[test]
    fn hex_colors() {
        assert_eq!("#abcdff".parse::<HexColor>().unwrap(), HexColor::new(0xab, 0xcd, 0xff));
        assert!("#abc".parse::<HexColor>().is_err());
        assert!("#gggggg".parse::<HexColor>().is_err());
        assert!("#ääää".parse::<HexColor>().is_err());
    }

    #[test]
    fn unconfigured_year_is_supported() {
        assert!(SUPPORTED_YEARS.contains(&Config::default().initial_year()));
    }

    #[test]
    fn explicit_missing_file_fails() {
        let result = load_suitable_config(Some(Path::new("/nonexistent/workcal.toml")));
        assert!(matches!(result, Err(Error { kind: ErrorKind::IOError(_), .. })));
    }
}
