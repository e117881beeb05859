//! Filterable dimensions.
//!
//! The set of keys is fixed at compile time. Anything arriving as a string
//! (stored snapshots, CLI arguments, query parameters) goes through
//! [`FilterKey::from_str`], which is the only place an unknown key can be
//! rejected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// A filterable dimension of the analytics pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKey {
    FacultyId,
    DepartmentId,
    ProgramId,
    CourseCode,
    SemesterId,
    IntakeYear,
    HighSchool,
    Gender,
    AccessNumber,
    RegNumber,
    StudentName,
}

impl FilterKey {
    /// Every key, in declaration order.
    pub const ALL: [FilterKey; 11] = [
        FilterKey::FacultyId,
        FilterKey::DepartmentId,
        FilterKey::ProgramId,
        FilterKey::CourseCode,
        FilterKey::SemesterId,
        FilterKey::IntakeYear,
        FilterKey::HighSchool,
        FilterKey::Gender,
        FilterKey::AccessNumber,
        FilterKey::RegNumber,
        FilterKey::StudentName,
    ];

    /// Returns the wire name (`faculty_id`, `department_id`, ...).
    pub const fn as_str(&self) -> &'static str {
        match self {
            FilterKey::FacultyId => "faculty_id",
            FilterKey::DepartmentId => "department_id",
            FilterKey::ProgramId => "program_id",
            FilterKey::CourseCode => "course_code",
            FilterKey::SemesterId => "semester_id",
            FilterKey::IntakeYear => "intake_year",
            FilterKey::HighSchool => "high_school",
            FilterKey::Gender => "gender",
            FilterKey::AccessNumber => "access_number",
            FilterKey::RegNumber => "reg_number",
            FilterKey::StudentName => "student_name",
        }
    }

    /// Human-readable label for tables and prompts.
    pub const fn label(&self) -> &'static str {
        match self {
            FilterKey::FacultyId => "Faculty",
            FilterKey::DepartmentId => "Department",
            FilterKey::ProgramId => "Program",
            FilterKey::CourseCode => "Course",
            FilterKey::SemesterId => "Semester",
            FilterKey::IntakeYear => "Intake Year",
            FilterKey::HighSchool => "High School",
            FilterKey::Gender => "Gender",
            FilterKey::AccessNumber => "Access Number",
            FilterKey::RegNumber => "Registration Number",
            FilterKey::StudentName => "Student Name",
        }
    }

    /// Whether the options service publishes a choice list for this key.
    ///
    /// Search-derived keys and gender are free-form.
    pub const fn has_options(&self) -> bool {
        matches!(
            self,
            FilterKey::FacultyId
                | FilterKey::DepartmentId
                | FilterKey::ProgramId
                | FilterKey::CourseCode
                | FilterKey::SemesterId
                | FilterKey::IntakeYear
                | FilterKey::HighSchool
        )
    }

    /// Whether values are numeric identifiers, even when they arrive as text.
    pub const fn is_identifier(&self) -> bool {
        matches!(
            self,
            FilterKey::FacultyId
                | FilterKey::DepartmentId
                | FilterKey::ProgramId
                | FilterKey::SemesterId
                | FilterKey::IntakeYear
        )
    }

    /// Whether the key is filled from the free-text search box.
    pub const fn is_search_derived(&self) -> bool {
        matches!(
            self,
            FilterKey::AccessNumber | FilterKey::RegNumber | FilterKey::StudentName
        )
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterKey {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s.trim())
            .ok_or_else(|| ModelError::InvalidKey(s.to_string()))
    }
}
