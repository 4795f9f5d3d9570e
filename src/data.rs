use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of an instructor in the request, stable for the whole request.
pub type InstructorId = usize;

pub const TBD: &str = "TBD";
pub const UNASSIGNED_COURSE: &str = "UNASSIGNED";
pub const UNASSIGNED_FACULTY: &str = "Unassigned (No Slots)";

fn default_max_sections() -> u32 {
    3
}

fn default_total_sections() -> u32 {
    1
}

/// Resource tier of a class. Theory and lab classes draw from disjoint
/// room pools and different day/time domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassType {
    Theory,
    Lab,
}

impl fmt::Display for ClassType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassType::Theory => write!(f, "theory"),
            ClassType::Lab => write!(f, "lab"),
        }
    }
}

/// One instructor's teaching request and availability.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructorRequest {
    pub name: String,
    pub course_code: String,
    #[serde(default = "default_max_sections")]
    pub max_sections: u32,
    /// Theory day-patterns; empty means any.
    #[serde(default)]
    pub preferred_days: Vec<String>,
    /// Theory time windows; empty means any.
    #[serde(default)]
    pub available_times: Vec<String>,
    #[serde(default)]
    pub room_preference: Option<String>,
    #[serde(default)]
    pub has_lab: bool,
    #[serde(default)]
    pub lab_days: Vec<String>,
    #[serde(default)]
    pub lab_times: Vec<String>,
}

/// The complete input for one generation request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub instructors: Vec<InstructorRequest>,
    #[serde(default = "default_total_sections")]
    pub total_sections: u32,
}

/// A placed or unplaced class in a candidate schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassRecord {
    pub course_code: String,
    pub section: String,
    pub faculty: String,
    pub days: String,
    pub time: String,
    pub room: String,
    #[serde(rename = "type")]
    pub class_type: ClassType,
    pub rationale: String,
    /// Compact slot code such as `ST1` or `SL2`, only for placed classes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflict: Option<bool>,
}

impl ClassRecord {
    pub fn is_placed(&self) -> bool {
        self.conflict != Some(true)
    }

    /// Record for a section no instructor could take.
    pub fn unassigned(section: u32) -> Self {
        Self {
            course_code: UNASSIGNED_COURSE.to_string(),
            section: section_label(section),
            faculty: UNASSIGNED_FACULTY.to_string(),
            days: TBD.to_string(),
            time: TBD.to_string(),
            room: TBD.to_string(),
            class_type: ClassType::Theory,
            rationale: "Could not find valid slot for any instructor".to_string(),
            code: None,
            conflict: Some(true),
        }
    }

    /// Record for a lab pairing that found no slot.
    pub fn unplaced_lab(course_code: &str, section: &str, faculty: &str, reason: String) -> Self {
        Self {
            course_code: lab_course_code(course_code),
            section: section.to_string(),
            faculty: faculty.to_string(),
            days: TBD.to_string(),
            time: TBD.to_string(),
            room: TBD.to_string(),
            class_type: ClassType::Lab,
            rationale: reason,
            code: None,
            conflict: Some(true),
        }
    }
}

pub fn section_label(section: u32) -> String {
    format!("{section:02}")
}

pub fn lab_course_code(course_code: &str) -> String {
    format!("{course_code}L")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkloadEntry {
    pub name: String,
    pub count: u32,
}

/// One of the generated timetable options.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateSchedule {
    pub option: u8,
    pub classes: Vec<ClassRecord>,
    pub conflict: bool,
    pub conflict_count: u32,
    pub conflict_message: Option<String>,
    pub workload: Vec<WorkloadEntry>,
}

/// The final output of the generator.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateResponse {
    pub schedules: Vec<CandidateSchedule>,
}
