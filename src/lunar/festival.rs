use chrono::{Datelike, NaiveDate};
use phf::phf_map;
use std::fmt;

use super::date::LunarDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Festival {
    // Lunar calendar
    SpringFestival,
    LanternFestival,
    DragonHeadRaising,
    DragonBoatFestival,
    Qixi,
    MidAutumnFestival,
    DoubleNinthFestival,
    LabaFestival,
    NewYearsEve,
    // Gregorian calendar
    NewYearsDay,
    QingmingFestival,
    LabourDay,
    NationalDay,
}

static LUNAR_FESTIVALS: phf::Map<&'static str, Festival> = phf_map! {
    "1-1" => Festival::SpringFestival,
    "1-15" => Festival::LanternFestival,
    "2-2" => Festival::DragonHeadRaising,
    "5-5" => Festival::DragonBoatFestival,
    "7-7" => Festival::Qixi,
    "8-15" => Festival::MidAutumnFestival,
    "9-9" => Festival::DoubleNinthFestival,
    "12-8" => Festival::LabaFestival,
};

static GREGORIAN_FESTIVALS: phf::Map<&'static str, Festival> = phf_map! {
    "1-1" => Festival::NewYearsDay,
    "4-4" => Festival::QingmingFestival,
    "5-1" => Festival::LabourDay,
    "10-1" => Festival::NationalDay,
};

impl Festival {
    /// Festivals of a lunar date. Leap months carry none.
    pub fn lunar(date: &LunarDate) -> Vec<Festival> {
        if date.leap {
            return Vec::new();
        }

        let mut festivals: Vec<Festival> = LUNAR_FESTIVALS
            .get(format!("{}-{}", date.month, date.day).as_str())
            .copied()
            .into_iter()
            .collect();

        if date.month == 12 && date.is_month_end() {
            festivals.push(Festival::NewYearsEve);
        }

        festivals
    }

    /// Fixed-date festival of the Gregorian calendar.
    pub fn gregorian(date: NaiveDate) -> Option<Festival> {
        GREGORIAN_FESTIVALS
            .get(format!("{}-{}", date.month(), date.day()).as_str())
            .copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Festival::SpringFestival => "春节",
            Festival::LanternFestival => "元宵节",
            Festival::DragonHeadRaising => "龙头节",
            Festival::DragonBoatFestival => "端午节",
            Festival::Qixi => "七夕节",
            Festival::MidAutumnFestival => "中秋节",
            Festival::DoubleNinthFestival => "重阳节",
            Festival::LabaFestival => "腊八节",
            Festival::NewYearsEve => "除夕",
            Festival::NewYearsDay => "元旦",
            Festival::QingmingFestival => "清明节",
            Festival::LabourDay => "劳动节",
            Festival::NationalDay => "国庆节",
        }
    }
}

impl fmt::Display for Festival {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
