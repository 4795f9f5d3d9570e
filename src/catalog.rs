//! The fixed universe of rooms, day codes and time windows a schedule is
//! built from.
//!
//! A [`Catalog`] is read-only once built and is shared by every option run.
//! Theory classes meet on paired day-patterns (`ST`, `MW`, `RA`) in 1.5h
//! windows; labs meet on single days in 3h windows that straddle several
//! theory windows.

use crate::data::{ClassRecord, ClassType};
use crate::error::ScheduleError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Weekday letters in calendar order: Sunday, Monday, Tuesday, Wednesday,
/// Thursday, Saturday.
pub const WEEKDAYS: &str = "SMTWRA";

const THEORY_ROOMS: [&str; 9] = [
    "NAC210", "NAC302", "NAC411", "NAC510", "NAC612", "SAC201", "SAC304", "SAC402", "SAC505",
];
const LAB_ROOMS: [&str; 6] = ["LIB601", "LIB602", "LIB603", "LIB604", "LIB605", "LIB606"];
const THEORY_DAYS: [&str; 3] = ["ST", "MW", "RA"];
const LAB_DAYS: [&str; 6] = ["S", "M", "T", "W", "R", "A"];
const THEORY_TIMES: [(&str, u16, u16); 6] = [
    ("08:00 AM - 09:30 AM", 480, 570),
    ("09:40 AM - 11:10 AM", 580, 670),
    ("11:20 AM - 12:50 PM", 680, 770),
    ("01:00 PM - 02:30 PM", 780, 870),
    ("02:40 PM - 04:10 PM", 880, 970),
    ("04:20 PM - 05:50 PM", 980, 1070),
];
const LAB_TIMES: [(&str, u16, u16); 5] = [
    ("08:00 AM - 11:10 AM", 480, 670),
    ("09:40 AM - 12:50 PM", 580, 770),
    ("11:20 AM - 02:30 PM", 680, 870),
    ("12:50 PM - 04:10 PM", 770, 970),
    ("02:40 PM - 05:50 PM", 880, 1070),
];

/// A set of weekdays, one bit per letter of [`WEEKDAYS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DaySet(u8);

impl DaySet {
    /// Expands a day code, ignoring letters that are not weekdays.
    pub fn expand(code: &str) -> Self {
        let bits = code
            .chars()
            .filter_map(|ch| WEEKDAYS.find(ch))
            .fold(0u8, |acc, idx| acc | (1 << idx));
        Self(bits)
    }

    /// Strict form of [`DaySet::expand`]: every letter must be a weekday and
    /// appear once.
    pub fn parse(code: &str) -> Option<Self> {
        let mut bits = 0u8;
        for ch in code.chars() {
            let bit = 1u8 << WEEKDAYS.find(ch)?;
            if bits & bit != 0 {
                return None;
            }
            bits |= bit;
        }
        (bits != 0).then_some(Self(bits))
    }

    pub fn intersects(self, other: DaySet) -> bool {
        self.0 & other.0 != 0
    }
}

/// Converts a 12-hour clock reading such as `01:00 PM` into minutes since
/// midnight. `12:00 AM` is 0 and `12:00 PM` is 720.
pub fn clock_minutes(text: &str) -> Option<u16> {
    let text = text.trim().to_ascii_uppercase();
    let (clock, pm) = if let Some(clock) = text.strip_suffix("AM") {
        (clock, false)
    } else if let Some(clock) = text.strip_suffix("PM") {
        (clock, true)
    } else {
        return None;
    };
    let (hh, mm) = clock.trim().split_once(':')?;
    let hh: u16 = hh.parse().ok()?;
    let mm: u16 = mm.parse().ok()?;
    if !(1..=12).contains(&hh) || mm >= 60 {
        return None;
    }
    let hh = hh % 12 + if pm { 12 } else { 0 };
    Some(hh * 60 + mm)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeWindow {
    pub label: String,
    pub start: u16,
    pub end: u16,
}

impl TimeWindow {
    /// Parses `hh:mm AM - hh:mm PM`. The window must not be empty.
    pub fn parse(label: &str) -> Option<Self> {
        let (start, end) = label.split_once('-')?;
        let start = clock_minutes(start)?;
        let end = clock_minutes(end)?;
        (start < end).then(|| Self {
            label: label.to_string(),
            start,
            end,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayPattern {
    pub code: String,
    pub days: DaySet,
}

/// A concrete meeting: the weekdays it occupies and its half-open minute
/// interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Booking {
    pub days: DaySet,
    pub start: u16,
    pub end: u16,
}

impl Booking {
    /// Overlap requires a shared weekday and intersecting time intervals.
    pub fn overlaps(&self, other: &Booking) -> bool {
        self.days.intersects(other.days) && self.start < other.end && other.start < self.end
    }
}

/// Rooms, day codes and windows of one resource tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    pub rooms: Vec<String>,
    pub days: Vec<DayPattern>,
    pub times: Vec<TimeWindow>,
}

impl Domain {
    pub fn booking(&self, day: usize, time: usize) -> Booking {
        let window = &self.times[time];
        Booking {
            days: self.days[day].days,
            start: window.start,
            end: window.end,
        }
    }

    pub fn day_index(&self, code: &str) -> Option<usize> {
        self.days.iter().position(|d| d.code == code)
    }

    pub fn time_index(&self, label: &str) -> Option<usize> {
        self.times.iter().position(|t| t.label == label)
    }

    pub fn room_index(&self, room: &str) -> Option<usize> {
        self.rooms.iter().position(|r| r == room)
    }

    fn from_parts(
        tier: ClassType,
        rooms: &[String],
        days: &[String],
        times: &[String],
    ) -> Result<Self, ScheduleError> {
        if rooms.is_empty() || days.is_empty() || times.is_empty() {
            return Err(ScheduleError::invalid_catalog(format!(
                "{tier} rooms, days and times must all be non-empty"
            )));
        }
        ensure_unique(tier, "room", rooms)?;
        ensure_unique(tier, "day", days)?;
        ensure_unique(tier, "time", times)?;

        let days = days
            .iter()
            .map(|code| {
                DaySet::parse(code)
                    .map(|days| DayPattern {
                        code: code.clone(),
                        days,
                    })
                    .ok_or_else(|| {
                        ScheduleError::invalid_catalog(format!("bad {tier} day code '{code}'"))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let times = times
            .iter()
            .map(|label| {
                TimeWindow::parse(label).ok_or_else(|| {
                    ScheduleError::invalid_catalog(format!("bad {tier} time window '{label}'"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            rooms: rooms.to_vec(),
            days,
            times,
        })
    }
}

fn ensure_unique(tier: ClassType, what: &str, values: &[String]) -> Result<(), ScheduleError> {
    let mut seen = HashSet::new();
    for value in values {
        if !seen.insert(value.as_str()) {
            return Err(ScheduleError::invalid_catalog(format!(
                "duplicate {tier} {what} '{value}'"
            )));
        }
    }
    Ok(())
}

/// Serializable form of a catalog, used for catalog files and
/// `GET /api/catalog`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSpec {
    pub theory_rooms: Vec<String>,
    pub lab_rooms: Vec<String>,
    pub theory_days: Vec<String>,
    pub lab_days: Vec<String>,
    pub theory_times: Vec<String>,
    pub lab_times: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    theory: Domain,
    lab: Domain,
}

impl Default for Catalog {
    fn default() -> Self {
        fn strings(values: &[&str]) -> Vec<String> {
            values.iter().map(|v| v.to_string()).collect()
        }
        fn patterns(codes: &[&str]) -> Vec<DayPattern> {
            codes
                .iter()
                .map(|code| DayPattern {
                    code: code.to_string(),
                    days: DaySet::expand(code),
                })
                .collect()
        }
        fn windows(times: &[(&str, u16, u16)]) -> Vec<TimeWindow> {
            times
                .iter()
                .map(|&(label, start, end)| TimeWindow {
                    label: label.to_string(),
                    start,
                    end,
                })
                .collect()
        }

        Self {
            theory: Domain {
                rooms: strings(&THEORY_ROOMS),
                days: patterns(&THEORY_DAYS),
                times: windows(&THEORY_TIMES),
            },
            lab: Domain {
                rooms: strings(&LAB_ROOMS),
                days: patterns(&LAB_DAYS),
                times: windows(&LAB_TIMES),
            },
        }
    }
}

impl Catalog {
    pub fn from_spec(spec: &CatalogSpec) -> Result<Self, ScheduleError> {
        let theory = Domain::from_parts(
            ClassType::Theory,
            &spec.theory_rooms,
            &spec.theory_days,
            &spec.theory_times,
        )?;
        let lab = Domain::from_parts(ClassType::Lab, &spec.lab_rooms, &spec.lab_days, &spec.lab_times)?;

        if let Some(shared) = theory.rooms.iter().find(|r| lab.rooms.contains(r)) {
            return Err(ScheduleError::invalid_catalog(format!(
                "room '{shared}' is listed as both theory and lab"
            )));
        }
        Ok(Self { theory, lab })
    }

    pub fn spec(&self) -> CatalogSpec {
        fn codes(domain: &Domain) -> Vec<String> {
            domain.days.iter().map(|d| d.code.clone()).collect()
        }
        fn labels(domain: &Domain) -> Vec<String> {
            domain.times.iter().map(|t| t.label.clone()).collect()
        }
        CatalogSpec {
            theory_rooms: self.theory.rooms.clone(),
            lab_rooms: self.lab.rooms.clone(),
            theory_days: codes(&self.theory),
            lab_days: codes(&self.lab),
            theory_times: labels(&self.theory),
            lab_times: labels(&self.lab),
        }
    }

    pub fn domain(&self, tier: ClassType) -> &Domain {
        match tier {
            ClassType::Theory => &self.theory,
            ClassType::Lab => &self.lab,
        }
    }

    /// Compact code for a slot: `ST1` for theory, `SL1` for lab windows.
    pub fn slot_code(&self, tier: ClassType, day: usize, time: usize) -> String {
        let days = &self.domain(tier).days[day].code;
        match tier {
            ClassType::Theory => format!("{days}{}", time + 1),
            ClassType::Lab => format!("{days}L{}", time + 1),
        }
    }

    /// Resolves a placed record back to the meeting it occupies. `None` for
    /// unplaced records or labels outside this catalog.
    pub fn booking_of(&self, record: &ClassRecord) -> Option<Booking> {
        if !record.is_placed() {
            return None;
        }
        let domain = self.domain(record.class_type);
        let day = domain.day_index(&record.days)?;
        let time = domain.time_index(&record.time)?;
        Some(domain.booking(day, time))
    }
}
