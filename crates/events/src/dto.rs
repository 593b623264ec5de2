//! Client input shape for creating/updating events.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use eventdesk_core::ValidationErrors;

/// Input projection of [`crate::Event`].
///
/// Carries only client-editable fields. Unknown properties (including `id`,
/// `free`, `offline`, `eventStatus`, `manager`) are rejected at deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct EventDto {
    pub name: String,
    pub description: String,
    pub begin_enrollment_date_time: Option<NaiveDateTime>,
    pub close_enrollment_date_time: Option<NaiveDateTime>,
    pub begin_event_date_time: Option<NaiveDateTime>,
    pub end_event_date_time: Option<NaiveDateTime>,
    pub location: Option<String>,
    pub base_price: i32,
    pub max_price: i32,
    pub limit_of_enrollment: i32,
}

impl EventDto {
    /// Object name used in validation errors.
    pub const OBJECT_NAME: &'static str = "eventDto";

    pub fn errors() -> ValidationErrors {
        ValidationErrors::new(Self::OBJECT_NAME)
    }

    /// Field constraints: required text, required date-times, non-negative numbers.
    pub fn check_constraints(&self, errors: &mut ValidationErrors) {
        for (field, value) in [("name", &self.name), ("description", &self.description)] {
            if value.trim().is_empty() {
                errors.reject_value(
                    field,
                    "NotEmpty",
                    "must not be empty",
                    Some(serde_json::Value::String(value.clone())),
                );
            }
        }

        for (field, value) in [
            ("beginEnrollmentDateTime", self.begin_enrollment_date_time),
            ("closeEnrollmentDateTime", self.close_enrollment_date_time),
            ("beginEventDateTime", self.begin_event_date_time),
            ("endEventDateTime", self.end_event_date_time),
        ] {
            if value.is_none() {
                errors.reject_value(field, "NotNull", "must not be null", None);
            }
        }

        for (field, value) in [
            ("basePrice", self.base_price),
            ("maxPrice", self.max_price),
            ("limitOfEnrollment", self.limit_of_enrollment),
        ] {
            if value < 0 {
                errors.reject_value(
                    field,
                    "Min",
                    "must be greater than or equal to 0",
                    Some(serde_json::Value::from(value)),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(2019, 7, day).and_then(|d| d.and_hms_opt(4, 30, 0))
    }

    fn complete() -> EventDto {
        EventDto {
            name: "Spring".to_string(),
            description: "REST API Development with Spring".to_string(),
            begin_enrollment_date_time: at(11),
            close_enrollment_date_time: at(12),
            begin_event_date_time: at(13),
            end_event_date_time: at(14),
            location: Some("강남역 D2 스타트업 팩토리".to_string()),
            base_price: 100,
            max_price: 200,
            limit_of_enrollment: 100,
        }
    }

    #[test]
    fn complete_dto_passes_constraints() {
        let mut errors = EventDto::errors();
        complete().check_constraints(&mut errors);
        assert!(!errors.has_errors(), "{errors:?}");
    }

    #[test]
    fn empty_dto_reports_every_required_field() {
        let mut errors = EventDto::errors();
        EventDto::default().check_constraints(&mut errors);

        for field in [
            "name",
            "description",
            "beginEnrollmentDateTime",
            "closeEnrollmentDateTime",
            "beginEventDateTime",
            "endEventDateTime",
        ] {
            assert!(errors.has_field_error(field), "missing error for {field}");
        }
        assert!(!errors.has_field_error("location"));
    }

    #[test]
    fn negative_numbers_are_rejected() {
        let mut errors = EventDto::errors();
        EventDto {
            base_price: -1,
            limit_of_enrollment: -5,
            ..complete()
        }
        .check_constraints(&mut errors);

        assert!(errors.has_field_error("basePrice"));
        assert!(errors.has_field_error("limitOfEnrollment"));
        assert!(!errors.has_field_error("maxPrice"));
    }

    #[test]
    fn deserializes_local_date_times() {
        let dto: EventDto = serde_json::from_str(
            r#"{"name":"Spring","description":"d","beginEnrollmentDateTime":"2019-07-11T04:30:00","basePrice":100}"#,
        )
        .unwrap();
        assert_eq!(dto.begin_enrollment_date_time, at(11));
        assert_eq!(dto.base_price, 100);
        assert_eq!(dto.max_price, 0);
    }

    #[test]
    fn server_controlled_fields_are_rejected() {
        for body in [
            r#"{"name":"Spring","id":100}"#,
            r#"{"name":"Spring","free":true}"#,
            r#"{"name":"Spring","eventStatus":"PUBLISHED"}"#,
        ] {
            assert!(serde_json::from_str::<EventDto>(body).is_err(), "{body}");
        }
    }
}
