//! Request validation.
//!
//! Checks every instructor against the catalog before any option is built
//! and resolves preference labels to catalog indices. An empty preference
//! list resolves to the whole domain of its tier. All problems are reported
//! together in one `InvalidInput` error.

use crate::catalog::{Catalog, Domain};
use crate::data::{ClassType, InstructorRequest};
use crate::error::ScheduleError;
use std::collections::HashSet;

/// Largest `totalSections` a single request may ask for.
pub const MAX_TOTAL_SECTIONS: u32 = 1_000;

pub fn check_total_sections(total_sections: u32) -> Result<(), ScheduleError> {
    if total_sections > MAX_TOTAL_SECTIONS {
        return Err(ScheduleError::invalid_input(format!(
            "totalSections of {total_sections} exceeds the limit of {MAX_TOTAL_SECTIONS}"
        )));
    }
    Ok(())
}

/// An instructor with preferences resolved against the catalog.
#[derive(Debug, Clone)]
pub struct ResolvedInstructor<'a> {
    pub request: &'a InstructorRequest,
    pub theory_days: Vec<usize>,
    pub theory_times: Vec<usize>,
    pub lab_days: Vec<usize>,
    pub lab_times: Vec<usize>,
    /// Preferred theory room, when it names one.
    pub room: Option<usize>,
}

pub fn resolve<'a>(
    catalog: &Catalog,
    instructors: &'a [InstructorRequest],
) -> Result<Vec<ResolvedInstructor<'a>>, ScheduleError> {
    if instructors.is_empty() {
        return Err(ScheduleError::invalid_input("No instructor data provided"));
    }

    let theory = catalog.domain(ClassType::Theory);
    let lab = catalog.domain(ClassType::Lab);
    let mut errors = Vec::new();
    let mut names = HashSet::new();
    let mut resolved = Vec::with_capacity(instructors.len());

    for (idx, inst) in instructors.iter().enumerate() {
        let who = if inst.name.trim().is_empty() {
            format!("instructor #{}", idx + 1)
        } else {
            format!("'{}'", inst.name)
        };

        if inst.name.trim().is_empty() {
            errors.push(format!("{who} has no name"));
        } else if !names.insert(inst.name.as_str()) {
            errors.push(format!("{who} is listed more than once"));
        }
        if inst.course_code.trim().is_empty() {
            errors.push(format!("{who} has no course code"));
        }
        if inst.max_sections == 0 {
            errors.push(format!("{who} has maxSections of 0"));
        }

        let theory_days = lookup(&inst.preferred_days, theory, Domain::day_index, theory.days.len(), |v| {
            errors.push(format!("{who} prefers unknown day pattern '{v}'"))
        });
        let theory_times = lookup(&inst.available_times, theory, Domain::time_index, theory.times.len(), |v| {
            errors.push(format!("{who} lists unknown time slot '{v}'"))
        });
        let lab_days = lookup(&inst.lab_days, lab, Domain::day_index, lab.days.len(), |v| {
            errors.push(format!("{who} prefers unknown lab day '{v}'"))
        });
        let lab_times = lookup(&inst.lab_times, lab, Domain::time_index, lab.times.len(), |v| {
            errors.push(format!("{who} lists unknown lab time slot '{v}'"))
        });
        let room = inst
            .room_preference
            .as_deref()
            .and_then(|room| theory.room_index(room.trim()));

        resolved.push(ResolvedInstructor {
            request: inst,
            theory_days,
            theory_times,
            lab_days,
            lab_times,
            room,
        });
    }

    if errors.is_empty() {
        Ok(resolved)
    } else {
        Err(ScheduleError::invalid_input(errors.join("; ")))
    }
}

fn lookup(
    values: &[String],
    domain: &Domain,
    index_of: fn(&Domain, &str) -> Option<usize>,
    full: usize,
    mut on_unknown: impl FnMut(&str),
) -> Vec<usize> {
    if values.is_empty() {
        return (0..full).collect();
    }
    let mut indices = Vec::with_capacity(values.len());
    for value in values {
        match index_of(domain, value.trim()) {
            Some(idx) if !indices.contains(&idx) => indices.push(idx),
            Some(_) => {}
            None => on_unknown(value),
        }
    }
    indices
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instructor(name: &str) -> InstructorRequest {
        InstructorRequest {
            name: name.to_string(),
            course_code: "CSE115".to_string(),
            max_sections: 3,
            ..Default::default()
        }
    }

    #[test]
    fn empty_list_is_rejected() {
        let catalog = Catalog::default();
        assert_eq!(
            resolve(&catalog, &[]).unwrap_err(),
            ScheduleError::InvalidInput("No instructor data provided".into())
        );
    }

    #[test]
    fn section_count_is_capped() {
        assert!(check_total_sections(0).is_ok());
        assert!(check_total_sections(MAX_TOTAL_SECTIONS).is_ok());
        assert_eq!(
            check_total_sections(u32::MAX).unwrap_err(),
            ScheduleError::InvalidInput(format!(
                "totalSections of {} exceeds the limit of {MAX_TOTAL_SECTIONS}",
                u32::MAX
            ))
        );
    }

    #[test]
    fn empty_preferences_mean_whole_domain() {
        let catalog = Catalog::default();
        let instructors = vec![instructor("Dr. Ahmed")];
        let resolved = resolve(&catalog, &instructors).unwrap();
        assert_eq!(resolved[0].theory_days, vec![0, 1, 2]);
        assert_eq!(resolved[0].theory_times.len(), 6);
        assert_eq!(resolved[0].lab_days.len(), 6);
        assert_eq!(resolved[0].lab_times.len(), 5);
        assert_eq!(resolved[0].room, None);
    }

    #[test]
    fn preferences_keep_their_order() {
        let catalog = Catalog::default();
        let mut inst = instructor("Dr. Ahmed");
        inst.preferred_days = vec!["RA".into(), "ST".into(), "RA".into()];
        inst.available_times = vec!["01:00 PM - 02:30 PM".into()];
        inst.lab_days = vec!["W".into()];
        inst.room_preference = Some("SAC304".into());
        let instructors = vec![inst];

        let resolved = resolve(&catalog, &instructors).unwrap();
        assert_eq!(resolved[0].theory_days, vec![2, 0]);
        assert_eq!(resolved[0].theory_times, vec![3]);
        assert_eq!(resolved[0].lab_days, vec![3]);
        assert_eq!(resolved[0].room, Some(6));
    }

    #[test]
    fn unknown_room_preference_is_ignored() {
        let catalog = Catalog::default();
        let mut inst = instructor("Dr. Ahmed");
        inst.room_preference = Some("LIB601".into());
        let instructors = vec![inst];
        assert_eq!(resolve(&catalog, &instructors).unwrap()[0].room, None);
    }

    #[test]
    fn reports_every_problem() {
        let catalog = Catalog::default();
        let mut bad_day = instructor("Dr. Ahmed");
        bad_day.preferred_days = vec!["S".into()];
        let mut bad_lab = instructor("Dr. Bose");
        bad_lab.lab_times = vec!["08:00 AM - 09:30 AM".into()];
        bad_lab.max_sections = 0;
        let duplicate = instructor("Dr. Ahmed");
        let unnamed = InstructorRequest {
            course_code: "MAT120".into(),
            max_sections: 1,
            ..Default::default()
        };

        let err = resolve(&catalog, &[bad_day, bad_lab, duplicate, unnamed]).unwrap_err();
        let ScheduleError::InvalidInput(msg) = &err else {
            panic!("expected invalid input, got {err:?}");
        };
        assert!(msg.contains("'Dr. Ahmed' prefers unknown day pattern 'S'"));
        assert!(msg.contains("'Dr. Bose' lists unknown lab time slot"));
        assert!(msg.contains("'Dr. Bose' has maxSections of 0"));
        assert!(msg.contains("'Dr. Ahmed' is listed more than once"));
        assert!(msg.contains("instructor #4 has no name"));
    }
}
