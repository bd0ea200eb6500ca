use crate::{
    statistics::DateRange,
    validation::{ValidationErrors, optional_date},
};

/// The date range filter as the user typed it, either bound may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateRangeForm {
    /// The first date as `YYYY-MM-DD`, or empty for no lower bound.
    pub start_date: String,
    /// The last date as `YYYY-MM-DD`, or empty for no upper bound.
    pub end_date: String,
}

impl DateRangeForm {
    /// Check both dates and build the range.
    ///
    /// # Errors
    ///
    /// Returns [ValidationErrors] if a date does not parse or the start date
    /// is after the end date.
    pub fn validate(&self) -> Result<DateRange, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let start = optional_date(&mut errors, "startDate", &self.start_date);
        let end = optional_date(&mut errors, "endDate", &self.end_date);

        if let (Some(start), Some(end)) = (start, end)
            && start > end
        {
            errors.add("endDate", "Start date must be before or equal to end date");
        }

        errors.into_result(|| DateRange::new(start, end))
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::statistics::{DateRange, DateRangeForm};

    fn form(start_date: &str, end_date: &str) -> DateRangeForm {
        DateRangeForm {
            start_date: start_date.to_owned(),
            end_date: end_date.to_owned(),
        }
    }

    #[test]
    fn both_bounds_are_optional() {
        assert_eq!(form("", "").validate(), Ok(DateRange::all()));
        assert_eq!(
            form("2025-01-01", "").validate(),
            Ok(DateRange::new(Some(date!(2025 - 01 - 01)), None))
        );
    }

    #[test]
    fn same_day_range_is_valid() {
        assert_eq!(
            form("2025-01-10", "2025-01-10").validate(),
            Ok(DateRange::new(
                Some(date!(2025 - 01 - 10)),
                Some(date!(2025 - 01 - 10))
            ))
        );
    }

    #[test]
    fn start_after_end_is_reported_on_end_date() {
        let errors = form("2025-02-01", "2025-01-01").validate().unwrap_err();

        assert_eq!(
            errors.get("endDate"),
            Some("Start date must be before or equal to end date")
        );
        assert_eq!(errors.get("startDate"), None);
    }

    #[test]
    fn unparseable_date_is_reported() {
        let errors = form("01/02/2025", "").validate().unwrap_err();

        assert_eq!(errors.get("startDate"), Some("Invalid date"));
    }
}
