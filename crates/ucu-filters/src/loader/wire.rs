//! Decoding of the filter-options response body.
//!
//! The service returns one list per dimension, each row shaped after its
//! warehouse table:
//!
//! ```text
//! {
//!   "faculties":    [{"faculty_id": 1, "faculty_name": "Engineering"}],
//!   "departments":  [{"department_id": 4, "department_name": "Computing"}],
//!   "programs":     [{"program_id": 9, "program_name": "BSc CS"}],
//!   "courses":      [{"course_code": "CSC1101", "course_name": "Intro"}],
//!   "semesters":    [{"semester_id": 1, "semester_name": "2024 Sem 1"}],
//!   "high_schools": [{"high_school": "Kings College", "high_school_district": "Wakiso"}],
//!   "intake_years": [2024, 2023]
//! }
//! ```
//!
//! Generic `{"id", "name"}` rows are accepted as well. Lists the caller's role
//! may not see are simply absent.

use serde::Deserialize;
use ucu_model::{FilterKey, FilterOption, FilterOptions, FilterValue, OptionSet};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FilterOptionsResponse {
    pub faculties: Vec<NamedRow>,
    pub departments: Vec<NamedRow>,
    pub programs: Vec<NamedRow>,
    pub courses: Vec<NamedRow>,
    pub semesters: Vec<NamedRow>,
    pub high_schools: Vec<HighSchoolRow>,
    pub intake_years: Vec<FilterValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NamedRow {
    #[serde(
        alias = "faculty_id",
        alias = "department_id",
        alias = "program_id",
        alias = "course_code",
        alias = "semester_id"
    )]
    pub id: FilterValue,
    #[serde(
        default,
        alias = "faculty_name",
        alias = "department_name",
        alias = "program_name",
        alias = "course_name",
        alias = "semester_name"
    )]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HighSchoolRow {
    pub high_school: String,
    #[serde(default)]
    pub high_school_district: Option<String>,
}

impl NamedRow {
    fn into_option(self) -> FilterOption {
        let label = self.name.unwrap_or_else(|| self.id.to_string());
        FilterOption {
            id: self.id,
            label,
        }
    }
}

impl HighSchoolRow {
    fn into_option(self) -> FilterOption {
        let label = match self.high_school_district.as_deref().map(str::trim) {
            Some(district) if !district.is_empty() => {
                format!("{} ({district})", self.high_school)
            }
            _ => self.high_school.clone(),
        };
        FilterOption {
            id: FilterValue::Text(self.high_school),
            label,
        }
    }
}

fn named(rows: Vec<NamedRow>) -> OptionSet {
    rows.into_iter().map(NamedRow::into_option).collect()
}

impl FilterOptionsResponse {
    pub fn into_options(self) -> FilterOptions {
        FilterOptions::new()
            .with(FilterKey::FacultyId, named(self.faculties))
            .with(FilterKey::DepartmentId, named(self.departments))
            .with(FilterKey::ProgramId, named(self.programs))
            .with(FilterKey::CourseCode, named(self.courses))
            .with(FilterKey::SemesterId, named(self.semesters))
            .with(
                FilterKey::HighSchool,
                self.high_schools
                    .into_iter()
                    .map(HighSchoolRow::into_option)
                    .collect(),
            )
            .with(
                FilterKey::IntakeYear,
                self.intake_years
                    .into_iter()
                    .map(|year| FilterOption {
                        label: year.to_string(),
                        id: year,
                    })
                    .collect(),
            )
    }
}
