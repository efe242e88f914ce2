use crate::services::driver::ElementHandle;

/// One cell of the ordering calendar, with status flags derived from the
/// cell's class tokens. The handle stays valid for clicking the day later.
#[derive(Debug, Clone)]
pub struct CalendarDay {
    pub id: String,
    pub number: u32,
    pub handle: ElementHandle,
    pub is_future: bool,
    pub is_past: bool,
    pub has_no_service: bool,
    pub has_existing_order: bool,
}

impl CalendarDay {
    /// A day is open for ordering when it is in the future and carries no
    /// disqualifying flag.
    pub fn eligible(&self) -> bool {
        self.is_future && !self.is_past && !self.has_no_service && !self.has_existing_order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(is_future: bool, is_past: bool, no_service: bool, ordered: bool) -> CalendarDay {
        CalendarDay {
            id: "date_2026-02-05".to_string(),
            number: 5,
            handle: ElementHandle(0),
            is_future,
            is_past,
            has_no_service: no_service,
            has_existing_order: ordered,
        }
    }

    #[test]
    fn test_eligible_requires_future_and_no_flags() {
        assert!(day(true, false, false, false).eligible());
    }

    #[test]
    fn test_any_disqualifying_flag_blocks_eligibility() {
        assert!(!day(false, false, false, false).eligible());
        assert!(!day(true, true, false, false).eligible());
        assert!(!day(true, false, true, false).eligible());
        assert!(!day(true, false, false, true).eligible());
    }
}
