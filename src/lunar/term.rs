use chrono::NaiveDate;
use std::fmt;
use tyme4rs::tyme::solar::SolarTermDay;

use super::date::solar_day;
use crate::error::Result;

/// The 24 solar terms (jie qi), in calendar order starting with the first
/// term of January.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolarTerm {
    MinorCold,
    MajorCold,
    StartOfSpring,
    RainWater,
    AwakeningOfInsects,
    SpringEquinox,
    PureBrightness,
    GrainRain,
    StartOfSummer,
    GrainBuds,
    GrainInEar,
    SummerSolstice,
    MinorHeat,
    MajorHeat,
    StartOfAutumn,
    EndOfHeat,
    WhiteDew,
    AutumnEquinox,
    ColdDew,
    FrostsDescent,
    StartOfWinter,
    MinorSnow,
    MajorSnow,
    WinterSolstice,
}

use SolarTerm::*;

impl SolarTerm {
    pub const ALL: [SolarTerm; 24] = [
        MinorCold,
        MajorCold,
        StartOfSpring,
        RainWater,
        AwakeningOfInsects,
        SpringEquinox,
        PureBrightness,
        GrainRain,
        StartOfSummer,
        GrainBuds,
        GrainInEar,
        SummerSolstice,
        MinorHeat,
        MajorHeat,
        StartOfAutumn,
        EndOfHeat,
        WhiteDew,
        AutumnEquinox,
        ColdDew,
        FrostsDescent,
        StartOfWinter,
        MinorSnow,
        MajorSnow,
        WinterSolstice,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        const NAMES: [&str; 24] = [
            "小寒", "大寒", "立春", "雨水", "惊蛰", "春分", "清明", "谷雨", "立夏", "小满", "芒种",
            "夏至", "小暑", "大暑", "立秋", "处暑", "白露", "秋分", "寒露", "霜降", "立冬", "小雪",
            "大雪", "冬至",
        ];
        NAMES[self.index()]
    }

    // tyme4rs counts its cycle from the winter solstice.
    fn from_cycle_index(index: usize) -> SolarTerm {
        SolarTerm::ALL[(index + SolarTerm::ALL.len() - 1) % SolarTerm::ALL.len()]
    }

    /// The term starting on `date` in Beijing time, if any.
    pub fn on(date: NaiveDate) -> Result<Option<SolarTerm>> {
        let term_day: SolarTermDay = solar_day(date)?.get_term_day();
        if term_day.get_day_index() != 0 {
            return Ok(None);
        }

        Ok(Some(SolarTerm::from_cycle_index(
            term_day.get_solar_term().get_index(),
        )))
    }
}

impl fmt::Display for SolarTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
