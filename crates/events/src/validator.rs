//! Business rules applied to event input before it is written.

use eventdesk_core::ValidationErrors;

use crate::EventDto;

/// Cross-field checks on [`EventDto`]. Appends errors, never fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct EventValidator;

impl EventValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, dto: &EventDto, errors: &mut ValidationErrors) {
        // max_price == 0 means "no upper bound"; both zero means free.
        if dto.base_price > dto.max_price && dto.max_price != 0 {
            errors.reject("wrongPrices", "Prices is wrong");
        }

        // Only end-of-event ordering is checked; enrollment window ordering is not.
        if let Some(end) = dto.end_event_date_time {
            let before_begin = dto.begin_event_date_time.is_some_and(|begin| end < begin);
            let before_close = dto
                .close_enrollment_date_time
                .is_some_and(|close| end < close);

            if before_begin || before_close {
                errors.reject_value(
                    "endEventDateTime",
                    "wrongValue",
                    "EndEventDateTime is wrong",
                    serde_json::to_value(end).ok(),
                );
            }
        }
    }
}

/// Full write-path check: field constraints first, then business rules.
///
/// Business rules only run when the constraints hold, so a request reports
/// one stage of errors at a time.
pub fn check_event_dto(dto: &EventDto) -> Result<(), ValidationErrors> {
    let mut errors = EventDto::errors();
    dto.check_constraints(&mut errors);
    if errors.has_errors() {
        return Err(errors);
    }

    EventValidator::new().validate(dto, &mut errors);
    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use proptest::prelude::*;

    fn at(day: u32) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(2019, 7, day).and_then(|d| d.and_hms_opt(4, 30, 0))
    }

    fn dto(base_price: i32, max_price: i32) -> EventDto {
        EventDto {
            name: "Spring".to_string(),
            description: "REST API Development with Spring".to_string(),
            begin_enrollment_date_time: at(11),
            close_enrollment_date_time: at(12),
            begin_event_date_time: at(13),
            end_event_date_time: at(14),
            location: Some("D2".to_string()),
            base_price,
            max_price,
            limit_of_enrollment: 100,
        }
    }

    fn validate(dto: &EventDto) -> ValidationErrors {
        let mut errors = EventDto::errors();
        EventValidator::new().validate(dto, &mut errors);
        errors
    }

    #[test]
    fn base_above_max_is_a_global_error() {
        let errors = validate(&dto(100_000, 200));
        assert_eq!(errors.len(), 1);
        let error = errors.iter().next().unwrap();
        assert!(error.is_global());
        assert_eq!(error.code, "wrongPrices");
        assert_eq!(error.object_name, "eventDto");
    }

    #[test]
    fn unlimited_max_price_accepts_any_base() {
        assert!(!validate(&dto(100, 0)).has_errors());
        assert!(!validate(&dto(0, 0)).has_errors());
    }

    #[test]
    fn end_before_begin_is_rejected() {
        let errors = validate(&EventDto {
            begin_event_date_time: at(15),
            ..dto(100, 200)
        });
        assert!(errors.has_field_error("endEventDateTime"));
    }

    #[test]
    fn rejected_end_is_reported_in_iso_form() {
        let errors = validate(&EventDto {
            begin_event_date_time: at(15),
            ..dto(100, 200)
        });
        let error = errors.field_errors("endEventDateTime").next().unwrap();
        assert_eq!(
            error.rejected_value,
            Some(serde_json::Value::String("2019-07-14T04:30:00".to_string()))
        );
    }

    #[test]
    fn end_before_close_enrollment_is_rejected() {
        let errors = validate(&EventDto {
            close_enrollment_date_time: at(20),
            begin_event_date_time: at(10),
            ..dto(100, 200)
        });
        assert!(errors.has_field_error("endEventDateTime"));
    }

    #[test]
    fn enrollment_window_ordering_is_not_checked() {
        // Close enrollment before begin enrollment passes this validator.
        let errors = validate(&EventDto {
            begin_enrollment_date_time: at(12),
            close_enrollment_date_time: at(11),
            ..dto(100, 200)
        });
        assert!(!errors.has_errors());
    }

    #[test]
    fn wrong_prices_and_dates_are_both_reported() {
        let errors = validate(&EventDto {
            close_enrollment_date_time: at(10),
            end_event_date_time: at(12),
            ..dto(100_000, 200)
        });
        assert_eq!(errors.global_errors().count(), 1);
        assert!(errors.has_field_error("endEventDateTime"));
    }

    #[test]
    fn check_runs_constraints_before_rules() {
        let errors = check_event_dto(&EventDto {
            name: String::new(),
            ..dto(100_000, 200)
        })
        .unwrap_err();
        assert!(errors.has_field_error("name"));
        assert_eq!(errors.global_errors().count(), 0);

        let errors = check_event_dto(&dto(100_000, 200)).unwrap_err();
        assert_eq!(errors.global_errors().count(), 1);

        assert!(check_event_dto(&dto(100, 200)).is_ok());
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 512,
            ..ProptestConfig::default()
        })]

        /// Property: max_price == 0 never triggers a price error.
        #[test]
        fn zero_max_price_is_always_valid(base in 0i32..i32::MAX) {
            prop_assert!(!validate(&dto(base, 0)).has_errors());
        }

        /// Property: base > max > 0 always triggers a price error.
        #[test]
        fn base_above_positive_max_always_fails(max in 1i32..1_000_000, delta in 1i32..1_000_000) {
            let errors = validate(&dto(max + delta, max));
            prop_assert_eq!(errors.global_errors().count(), 1);
        }

        /// Property: base <= max never triggers a price error.
        #[test]
        fn ordered_prices_are_valid(base in 0i32..1_000_000, extra in 0i32..1_000_000) {
            prop_assert!(!validate(&dto(base, base + extra)).has_errors());
        }
    }
}
