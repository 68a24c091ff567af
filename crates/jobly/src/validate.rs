//! Checks that run on raw filters before a `WHERE` clause is built.

use crate::error::{JoblyError, JoblyResult};
use crate::filter::FilterRequest;

/// Validate the numeric range filters of `GET /companies`.
///
/// Rules are checked in order and the first failure wins:
///
/// 1. `minEmployees`, when present, must parse as an integer.
/// 2. `maxEmployees`, when present, must parse as an integer.
/// 3. Neither bound may be negative.
/// 4. When both are present, `minEmployees <= maxEmployees`.
///
/// Integers parse from their leading digits, so `"120abc"` is accepted as
/// `120`. A JSON number with a fractional part is not an integer. Filters
/// other than the two bounds are not inspected.
pub fn validate_company_filters(raw: &FilterRequest) -> JoblyResult<()> {
    let min = parse_bound(raw, "minEmployees")?;
    let max = parse_bound(raw, "maxEmployees")?;

    if min.is_some_and(|n| n < 0) || max.is_some_and(|n| n < 0) {
        return Err(JoblyError::validation("Please enter positive numbers"));
    }

    if let (Some(min), Some(max)) = (min, max)
        && min > max
    {
        return Err(JoblyError::validation(
            "maximum number of employees should be greater than the minimum",
        ));
    }

    Ok(())
}

/// Validate the filters of `GET /jobs`: `minSalary`, when present, must be a
/// positive integer.
pub fn validate_job_filters(raw: &FilterRequest) -> JoblyResult<()> {
    if let Some(value) = raw.get("minSalary") {
        match value.parse_int() {
            Some(n) if n > 0 => {}
            _ => {
                return Err(JoblyError::validation(
                    "minimum salary must be a positive integer number",
                ));
            }
        }
    }
    Ok(())
}

fn parse_bound(raw: &FilterRequest, key: &str) -> JoblyResult<Option<i64>> {
    match raw.get(key) {
        None => Ok(None),
        Some(value) => value
            .parse_int()
            .map(Some)
            .ok_or_else(|| JoblyError::validation(format!("{key} must be a number"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::FilterValue;

    fn filters(pairs: &[(&str, FilterValue)]) -> FilterRequest {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn message(result: JoblyResult<()>) -> String {
        match result {
            Err(JoblyError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn non_numeric_min_fails() {
        let raw = filters(&[("minEmployees", "ppp".into())]);
        assert_eq!(
            message(validate_company_filters(&raw)),
            "minEmployees must be a number"
        );
    }

    #[test]
    fn non_numeric_max_fails() {
        let raw = filters(&[("maxEmployees", "hjhjhj".into())]);
        assert_eq!(
            message(validate_company_filters(&raw)),
            "maxEmployees must be a number"
        );
    }

    #[test]
    fn boolean_bound_is_not_a_number() {
        let raw = filters(&[("minEmployees", true.into())]);
        assert_eq!(
            message(validate_company_filters(&raw)),
            "minEmployees must be a number"
        );
    }

    #[test]
    fn negative_bounds_fail() {
        let raw = filters(&[("maxEmployees", (-5).into())]);
        assert_eq!(
            message(validate_company_filters(&raw)),
            "Please enter positive numbers"
        );

        let raw = filters(&[("minEmployees", (-200).into())]);
        assert_eq!(
            message(validate_company_filters(&raw)),
            "Please enter positive numbers"
        );

        let raw = filters(&[("maxEmployees", "-220".into())]);
        assert!(validate_company_filters(&raw).is_err());
    }

    #[test]
    fn min_greater_than_max_fails() {
        let raw = filters(&[("minEmployees", 50.into()), ("maxEmployees", 10.into())]);
        assert_eq!(
            message(validate_company_filters(&raw)),
            "maximum number of employees should be greater than the minimum"
        );
    }

    #[test]
    fn first_failing_rule_wins() {
        // min is not a number and max is negative: rule 1 reports first
        let raw = filters(&[("minEmployees", "x".into()), ("maxEmployees", (-1).into())]);
        assert_eq!(
            message(validate_company_filters(&raw)),
            "minEmployees must be a number"
        );

        // negative min and min > max: rule 3 reports before rule 4
        let raw = filters(&[("minEmployees", (-1).into()), ("maxEmployees", (-5).into())]);
        assert_eq!(
            message(validate_company_filters(&raw)),
            "Please enter positive numbers"
        );
    }

    #[test]
    fn valid_filters_pass() {
        let raw = filters(&[
            ("name", "NET".into()),
            ("minEmployees", 120.into()),
            ("maxEmployees", 200.into()),
        ]);
        assert!(validate_company_filters(&raw).is_ok());
    }

    #[test]
    fn equal_bounds_pass() {
        let raw = filters(&[("minEmployees", 100.into()), ("maxEmployees", 100.into())]);
        assert!(validate_company_filters(&raw).is_ok());
    }

    #[test]
    fn no_filters_pass() {
        assert!(validate_company_filters(&FilterRequest::new()).is_ok());
        assert!(validate_job_filters(&FilterRequest::new()).is_ok());
    }

    #[test]
    fn leading_digits_are_enough() {
        let raw = FilterRequest::from_query_pairs([("minEmployees", "120abc"), ("maxEmployees", "300")]);
        assert!(validate_company_filters(&raw).is_ok());
    }

    #[test]
    fn zero_is_a_valid_bound() {
        let raw = filters(&[("minEmployees", 0.into())]);
        assert!(validate_company_filters(&raw).is_ok());
    }

    #[test]
    fn min_salary_must_be_positive_integer() {
        for bad in ["abc", "0", "-100", ""] {
            let raw = FilterRequest::from_query_pairs([("minSalary", bad)]);
            assert_eq!(
                message(validate_job_filters(&raw)),
                "minimum salary must be a positive integer number"
            );
        }

        let raw = FilterRequest::from_query_pairs([("minSalary", "50000")]);
        assert!(validate_job_filters(&raw).is_ok());
    }

    #[test]
    fn fractional_json_bounds_fail() {
        let raw = filters(&[("minEmployees", 10.5.into())]);
        assert_eq!(
            message(validate_company_filters(&raw)),
            "minEmployees must be a number"
        );

        let raw = filters(&[("maxEmployees", 99.9.into())]);
        assert_eq!(
            message(validate_company_filters(&raw)),
            "maxEmployees must be a number"
        );

        let raw = filters(&[("minSalary", 50000.5.into())]);
        assert_eq!(
            message(validate_job_filters(&raw)),
            "minimum salary must be a positive integer number"
        );
    }

    #[test]
    fn whole_json_floats_pass() {
        let raw = filters(&[("minEmployees", 10.0.into()), ("maxEmployees", 20.0.into())]);
        assert!(validate_company_filters(&raw).is_ok());

        let raw = filters(&[("minSalary", 50000.0.into())]);
        assert!(validate_job_filters(&raw).is_ok());
    }

    #[test]
    fn overflowing_digits_are_not_a_number() {
        let raw = FilterRequest::from_query_pairs([("minEmployees", "99999999999999999999")]);
        assert_eq!(
            message(validate_company_filters(&raw)),
            "minEmployees must be a number"
        );
    }
}
