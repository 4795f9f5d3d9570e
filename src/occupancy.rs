use crate::catalog::{Booking, Catalog};
use crate::data::{ClassType, InstructorId};
use std::collections::HashSet;

/// A (day, time, room) triple, as indices into one tier's catalog domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotKey {
    pub day: usize,
    pub time: usize,
    pub room: usize,
}

/// A slot an instructor is committed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusySlot {
    pub tier: ClassType,
    pub day: usize,
    pub time: usize,
    pub booking: Booking,
}

/// Mutable state of a single option run. Built fresh for every run and
/// dropped with it.
#[derive(Debug)]
pub struct OccupancyTracker<'a> {
    catalog: &'a Catalog,
    used_theory: HashSet<SlotKey>,
    used_lab: HashSet<SlotKey>,
    busy: Vec<Vec<BusySlot>>,
    workload: Vec<u32>,
    primary_day: Vec<Option<usize>>,
}

impl<'a> OccupancyTracker<'a> {
    pub fn new(catalog: &'a Catalog, instructors: usize) -> Self {
        Self {
            catalog,
            used_theory: HashSet::new(),
            used_lab: HashSet::new(),
            busy: vec![Vec::new(); instructors],
            workload: vec![0; instructors],
            primary_day: vec![None; instructors],
        }
    }

    fn used(&self, tier: ClassType) -> &HashSet<SlotKey> {
        match tier {
            ClassType::Theory => &self.used_theory,
            ClassType::Lab => &self.used_lab,
        }
    }

    /// A room is free when no reservation of the same room in the same tier
    /// overlaps the slot. For theory this is exact triple membership, since
    /// theory slots never partially overlap; lab windows do.
    pub fn is_room_free(&self, tier: ClassType, day: usize, time: usize, room: usize) -> bool {
        let used = self.used(tier);
        if used.contains(&SlotKey { day, time, room }) {
            return false;
        }
        let domain = self.catalog.domain(tier);
        let wanted = domain.booking(day, time);
        !used
            .iter()
            .any(|key| key.room == room && domain.booking(key.day, key.time).overlaps(&wanted))
    }

    /// Callers check [`Self::is_room_free`] first; reserving twice is a bug.
    pub fn reserve_room(&mut self, tier: ClassType, day: usize, time: usize, room: usize) {
        let used = match tier {
            ClassType::Theory => &mut self.used_theory,
            ClassType::Lab => &mut self.used_lab,
        };
        let inserted = used.insert(SlotKey { day, time, room });
        debug_assert!(inserted, "room reserved twice");
    }

    /// First existing booking of the instructor that overlaps the slot.
    pub fn clash(&self, id: InstructorId, tier: ClassType, day: usize, time: usize) -> Option<&BusySlot> {
        let wanted = self.catalog.domain(tier).booking(day, time);
        self.busy[id].iter().find(|b| b.booking.overlaps(&wanted))
    }

    pub fn is_instructor_free(&self, id: InstructorId, tier: ClassType, day: usize, time: usize) -> bool {
        self.clash(id, tier, day, time).is_none()
    }

    pub fn book_instructor(&mut self, id: InstructorId, tier: ClassType, day: usize, time: usize) {
        let booking = self.catalog.domain(tier).booking(day, time);
        self.busy[id].push(BusySlot {
            tier,
            day,
            time,
            booking,
        });
    }

    pub fn bookings(&self, id: InstructorId) -> &[BusySlot] {
        &self.busy[id]
    }

    pub fn increment_workload(&mut self, id: InstructorId) {
        self.workload[id] += 1;
    }

    pub fn workload_of(&self, id: InstructorId) -> u32 {
        self.workload[id]
    }

    pub fn set_primary_day_if_unset(&mut self, id: InstructorId, day: usize) {
        if self.primary_day[id].is_none() {
            self.primary_day[id] = Some(day);
        }
    }

    pub fn primary_day(&self, id: InstructorId) -> Option<usize> {
        self.primary_day[id]
    }

    pub fn into_workload(self) -> Vec<u32> {
        self.workload
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THEORY: ClassType = ClassType::Theory;
    const LAB: ClassType = ClassType::Lab;

    #[test]
    fn rooms_are_tracked_per_tier() {
        let catalog = Catalog::default();
        let mut tracker = OccupancyTracker::new(&catalog, 1);

        assert!(tracker.is_room_free(THEORY, 0, 0, 0));
        tracker.reserve_room(THEORY, 0, 0, 0);
        assert!(!tracker.is_room_free(THEORY, 0, 0, 0));
        assert!(tracker.is_room_free(THEORY, 0, 1, 0));
        assert!(tracker.is_room_free(THEORY, 0, 0, 1));
        assert!(tracker.is_room_free(LAB, 0, 0, 0));
    }

    #[test]
    fn overlapping_lab_windows_share_no_room() {
        let catalog = Catalog::default();
        let mut tracker = OccupancyTracker::new(&catalog, 1);

        // S 08:00-11:10 then S 09:40-12:50 in the same lab room.
        tracker.reserve_room(LAB, 0, 0, 2);
        assert!(!tracker.is_room_free(LAB, 0, 1, 2));
        assert!(tracker.is_room_free(LAB, 0, 1, 3));
        assert!(tracker.is_room_free(LAB, 1, 1, 2));
        assert!(tracker.is_room_free(LAB, 0, 2, 2));
    }

    #[test]
    fn instructor_overlap_spans_tiers() {
        let catalog = Catalog::default();
        let mut tracker = OccupancyTracker::new(&catalog, 2);

        // ST 09:40-11:10
        tracker.book_instructor(0, THEORY, 0, 1);
        // Tuesday 08:00-11:10 lab overlaps it, Monday does not.
        let tuesday = catalog.domain(LAB).day_index("T").unwrap();
        let monday = catalog.domain(LAB).day_index("M").unwrap();
        assert!(!tracker.is_instructor_free(0, LAB, tuesday, 0));
        assert!(tracker.is_instructor_free(0, LAB, monday, 0));
        assert_eq!(tracker.clash(0, LAB, tuesday, 0).map(|b| b.time), Some(1));
        assert!(tracker.is_instructor_free(1, LAB, tuesday, 0));
    }

    #[test]
    fn primary_day_is_sticky() {
        let catalog = Catalog::default();
        let mut tracker = OccupancyTracker::new(&catalog, 1);
        assert_eq!(tracker.primary_day(0), None);
        tracker.set_primary_day_if_unset(0, 2);
        tracker.set_primary_day_if_unset(0, 1);
        assert_eq!(tracker.primary_day(0), Some(2));

        tracker.increment_workload(0);
        tracker.increment_workload(0);
        assert_eq!(tracker.workload_of(0), 2);
        assert_eq!(tracker.into_workload(), vec![2]);
    }
}
