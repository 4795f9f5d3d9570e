use crate::catalog::Catalog;
use crate::data::{CandidateSchedule, GenerateRequest, GenerateResponse, WorkloadEntry};
use crate::error::ScheduleError;
use crate::planner::{OptionRun, plan_option};
use crate::tiebreak::TieBreak;
use crate::validation;
use log::info;
use rayon::prelude::*;
use std::time::Instant;

/// Number of candidate schedules returned per request.
pub const OPTION_COUNT: u8 = 3;

/// Generates the candidate schedules for a request.
///
/// Each option is an independent greedy run with its own occupancy state and
/// tie-break order, so the runs execute in parallel. Options come back in
/// option order, neither ranked nor deduplicated. Only malformed input is an
/// error; sections that cannot be placed are reported inside the options.
pub fn solve(
    request: &GenerateRequest,
    catalog: &Catalog,
    tie_break: TieBreak,
) -> Result<GenerateResponse, ScheduleError> {
    let start_time = Instant::now();
    let instructors = validation::resolve(catalog, &request.instructors)?;
    validation::check_total_sections(request.total_sections)?;
    info!(
        "Generating {} option(s) for {} section(s) across {} instructor(s)...",
        OPTION_COUNT,
        request.total_sections,
        instructors.len()
    );

    let schedules: Vec<CandidateSchedule> = (1..=OPTION_COUNT)
        .into_par_iter()
        .map(|option| {
            let run = plan_option(
                catalog,
                &instructors,
                request.total_sections,
                tie_break.shuffler_for(option),
            );
            summarize(option, run, request)
        })
        .collect();

    for schedule in &schedules {
        info!(
            "Option {}: {} class record(s), {} conflict(s)",
            schedule.option,
            schedule.classes.len(),
            schedule.conflict_count
        );
    }
    info!("Schedules generated in {:.2?}", start_time.elapsed());

    Ok(GenerateResponse { schedules })
}

fn summarize(option: u8, run: OptionRun, request: &GenerateRequest) -> CandidateSchedule {
    let conflict_count = run.unplaced_sections + run.unplaced_labs;
    let workload = request
        .instructors
        .iter()
        .zip(run.workload)
        .map(|(inst, count)| WorkloadEntry {
            name: inst.name.clone(),
            count,
        })
        .collect();

    CandidateSchedule {
        option,
        classes: run.classes,
        conflict: conflict_count > 0,
        conflict_count,
        conflict_message: conflict_message(run.unplaced_sections, run.unplaced_labs),
        workload,
    }
}

fn conflict_message(sections: u32, labs: u32) -> Option<String> {
    match (sections, labs) {
        (0, 0) => None,
        (sections, 0) => Some(format!(
            "Could not schedule {sections} section(s) due to availability conflicts."
        )),
        (0, labs) => Some(format!(
            "Could not schedule {labs} lab(s) due to availability conflicts."
        )),
        (sections, labs) => Some(format!(
            "Could not schedule {sections} section(s) and {labs} lab(s) due to availability conflicts."
        )),
    }
}
