use crate::catalog::Catalog;
use crate::data::{ClassRecord, ClassType, InstructorId, lab_course_code, section_label};
use crate::occupancy::OccupancyTracker;
use crate::tiebreak::Shuffler;
use crate::validation::ResolvedInstructor;
use itertools::Itertools;
use log::{debug, trace};
use std::collections::VecDeque;

/// Attempts allowed per requested section before a run stops early.
const ATTEMPTS_PER_SECTION: u32 = 10;

/// Result of one greedy pass over the instructors.
#[derive(Debug, Clone)]
pub struct OptionRun {
    pub classes: Vec<ClassRecord>,
    pub unplaced_sections: u32,
    pub unplaced_labs: u32,
    /// Placed theory sections per instructor, in request order.
    pub workload: Vec<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Candidate {
    day: usize,
    time: usize,
    primary: bool,
}

/// Why a lab could not be paired. An instructor clash outranks room
/// exhaustion when both were seen.
enum LabMiss {
    RoomsFull(String),
    Clash(String),
}

/// Runs the greedy assignment for one option.
pub fn plan_option<'a>(
    catalog: &'a Catalog,
    instructors: &'a [ResolvedInstructor<'a>],
    total_sections: u32,
    shuffler: Shuffler,
) -> OptionRun {
    Planner {
        catalog,
        instructors,
        tracker: OccupancyTracker::new(catalog, instructors.len()),
        shuffler,
        classes: Vec::new(),
        unplaced_labs: 0,
    }
    .run(total_sections)
}

struct Planner<'a> {
    catalog: &'a Catalog,
    instructors: &'a [ResolvedInstructor<'a>],
    tracker: OccupancyTracker<'a>,
    shuffler: Shuffler,
    classes: Vec<ClassRecord>,
    unplaced_labs: u32,
}

impl<'a> Planner<'a> {
    fn run(mut self, total_sections: u32) -> OptionRun {
        let instructors = self.instructors;
        let mut order: Vec<InstructorId> = (0..instructors.len()).collect();
        self.shuffler.shuffle(&mut order);
        let mut queue: VecDeque<InstructorId> = order.into();

        let max_attempts = total_sections.saturating_mul(ATTEMPTS_PER_SECTION);
        let mut attempts = 0;
        let mut section = 1;

        while section <= total_sections && attempts < max_attempts {
            attempts += 1;
            let Some(id) = queue.pop_front() else {
                break;
            };
            let inst = &instructors[id];
            if self.tracker.workload_of(id) >= inst.request.max_sections {
                debug!(
                    "{} is at {} section(s), leaving the queue",
                    inst.request.name, inst.request.max_sections
                );
                continue;
            }
            // Back to the tail for round robin; undone below if nothing fits.
            queue.push_back(id);

            let label = section_label(section);
            if self.place_theory(id, &label) {
                if inst.request.has_lab {
                    self.place_lab(id, &label);
                }
                section += 1;
            } else {
                debug!(
                    "no slot left for {} (section {label}), dropping from this option",
                    inst.request.name
                );
                queue.pop_back();
            }
        }

        if section <= total_sections {
            debug!(
                "stopped at section {section} of {total_sections} after {attempts} attempt(s), {} instructor(s) still queued",
                queue.len()
            );
        }

        let unplaced_sections = total_sections - (section - 1);
        for n in section..=total_sections {
            self.classes.push(ClassRecord::unassigned(n));
        }

        OptionRun {
            classes: self.classes,
            unplaced_sections,
            unplaced_labs: self.unplaced_labs,
            workload: self.tracker.into_workload(),
        }
    }

    /// Theory candidates in try order: slots on the instructor's primary day
    /// first, closest to their existing sections, then everything else.
    fn rank_theory(&mut self, id: InstructorId) -> Vec<Candidate> {
        let inst = &self.instructors[id];
        let primary = self.tracker.primary_day(id);

        let (mut tier1, mut tier2): (Vec<Candidate>, Vec<Candidate>) = inst
            .theory_days
            .iter()
            .cartesian_product(inst.theory_times.iter())
            .map(|(&day, &time)| Candidate {
                day,
                time,
                primary: Some(day) == primary,
            })
            .partition(|c| c.primary);

        let existing: Vec<usize> = self
            .tracker
            .bookings(id)
            .iter()
            .filter(|b| b.tier == ClassType::Theory && Some(b.day) == primary)
            .map(|b| b.time)
            .collect();
        if existing.is_empty() {
            self.shuffler.shuffle(&mut tier1);
        } else {
            tier1.sort_by_key(|c| existing.iter().map(|&t| t.abs_diff(c.time)).min());
        }
        self.shuffler.shuffle(&mut tier2);

        tier1.extend(tier2);
        tier1
    }

    fn place_theory(&mut self, id: InstructorId, section: &str) -> bool {
        let instructors = self.instructors;
        let inst = &instructors[id];
        let name = inst.request.name.as_str();
        let catalog = self.catalog;
        let theory = catalog.domain(ClassType::Theory);

        for cand in self.rank_theory(id) {
            let (days, time) = (&theory.days[cand.day].code, &theory.times[cand.time].label);
            if !self.tracker.is_instructor_free(id, ClassType::Theory, cand.day, cand.time) {
                trace!("{name} already busy on {days} {time}");
                continue;
            }
            let Some(room) = self.pick_room(ClassType::Theory, cand.day, cand.time, inst.room) else {
                trace!("no free theory room on {days} {time}");
                continue;
            };

            self.tracker.reserve_room(ClassType::Theory, cand.day, cand.time, room);
            self.tracker.book_instructor(id, ClassType::Theory, cand.day, cand.time);
            self.tracker.increment_workload(id);
            self.tracker.set_primary_day_if_unset(id, cand.day);

            let rationale = if cand.primary {
                format!("Consolidated on primary day {days} {time}")
            } else {
                format!("Matched {days} {time}")
            };
            let record = self.placed(
                ClassType::Theory,
                inst.request.course_code.clone(),
                section,
                name,
                (cand.day, cand.time, room),
                rationale,
            );
            debug!(
                "{} {}-{section} -> {days} {time} in {}",
                name, record.course_code, record.room
            );
            self.classes.push(record);
            return true;
        }
        false
    }

    /// Pairs a lab with the theory section just placed. Failure is recorded
    /// as an unplaced lab and never undoes the theory placement.
    fn place_lab(&mut self, id: InstructorId, section: &str) {
        let instructors = self.instructors;
        let inst = &instructors[id];
        let name = inst.request.name.as_str();
        let catalog = self.catalog;
        let lab = catalog.domain(ClassType::Lab);

        let mut candidates: Vec<(usize, usize)> = inst
            .lab_days
            .iter()
            .copied()
            .cartesian_product(inst.lab_times.iter().copied())
            .collect();
        self.shuffler.shuffle(&mut candidates);

        let mut miss: Option<LabMiss> = None;
        for (day, time) in candidates {
            let (days, window) = (&lab.days[day].code, &lab.times[time].label);
            if let Some(reason) = self.clash_reason(id, day, time) {
                trace!("lab on {days} {window} rejected: {reason}");
                if !matches!(miss, Some(LabMiss::Clash(_))) {
                    miss = Some(LabMiss::Clash(reason));
                }
                continue;
            }
            let Some(room) = self.pick_room(ClassType::Lab, day, time, None) else {
                trace!("no free lab room on {days} {window}");
                if miss.is_none() {
                    miss = Some(LabMiss::RoomsFull(format!("No free lab room on {days} {window}")));
                }
                continue;
            };

            self.tracker.reserve_room(ClassType::Lab, day, time, room);
            self.tracker.book_instructor(id, ClassType::Lab, day, time);
            let record = self.placed(
                ClassType::Lab,
                lab_course_code(&inst.request.course_code),
                section,
                name,
                (day, time, room),
                format!("Lab for section {section} on {days} {window}"),
            );
            debug!(
                "{} {}-{section} -> {days} {window} in {}",
                name, record.course_code, record.room
            );
            self.classes.push(record);
            return;
        }

        let reason = match miss {
            Some(LabMiss::Clash(reason) | LabMiss::RoomsFull(reason)) => reason,
            None => "No lab slot matches the lab preferences".to_string(),
        };
        debug!("lab for {name} section {section} unplaced: {reason}");
        self.unplaced_labs += 1;
        self.classes.push(ClassRecord::unplaced_lab(
            &inst.request.course_code,
            section,
            name,
            reason,
        ));
    }

    /// Checks a lab slot against the instructor's classes on record and their
    /// tracked bookings. Both must agree that the slot is free.
    fn clash_reason(&self, id: InstructorId, day: usize, time: usize) -> Option<String> {
        let name = &self.instructors[id].request.name;
        let wanted = self.catalog.domain(ClassType::Lab).booking(day, time);

        let on_record = self.classes.iter().find(|c| {
            c.faculty == *name
                && self
                    .catalog
                    .booking_of(c)
                    .is_some_and(|b| b.overlaps(&wanted))
        });
        if let Some(existing) = on_record {
            return Some(format!(
                "{name} already teaches {}-{} on {} {}",
                existing.course_code, existing.section, existing.days, existing.time
            ));
        }

        self.tracker
            .clash(id, ClassType::Lab, day, time)
            .map(|busy| {
                let domain = self.catalog.domain(busy.tier);
                format!(
                    "{name} is already booked on {} {}",
                    domain.days[busy.day].code, domain.times[busy.time].label
                )
            })
    }

    /// A free room for the slot, trying the preferred room first.
    fn pick_room(
        &mut self,
        tier: ClassType,
        day: usize,
        time: usize,
        preferred: Option<usize>,
    ) -> Option<usize> {
        let count = self.catalog.domain(tier).rooms.len();
        let mut rooms: Vec<usize> = (0..count).filter(|&r| Some(r) != preferred).collect();
        self.shuffler.shuffle(&mut rooms);
        preferred
            .into_iter()
            .chain(rooms)
            .find(|&room| self.tracker.is_room_free(tier, day, time, room))
    }

    fn placed(
        &self,
        tier: ClassType,
        course_code: String,
        section: &str,
        faculty: &str,
        (day, time, room): (usize, usize, usize),
        rationale: String,
    ) -> ClassRecord {
        let domain = self.catalog.domain(tier);
        ClassRecord {
            course_code,
            section: section.to_string(),
            faculty: faculty.to_string(),
            days: domain.days[day].code.clone(),
            time: domain.times[time].label.clone(),
            room: domain.rooms[room].clone(),
            class_type: tier,
            rationale,
            code: Some(self.catalog.slot_code(tier, day, time)),
            conflict: None,
        }
    }
}
