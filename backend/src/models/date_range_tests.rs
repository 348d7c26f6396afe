#[cfg(test)]
mod tests {
    use crate::models::date_range::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_preset_lenient_defaults_to_30d() {
        assert_eq!(RangePreset::lenient(None), RangePreset::Last30Days);
        assert_eq!(RangePreset::lenient(Some("7d")), RangePreset::Last30Days);
        assert_eq!(RangePreset::lenient(Some("90d")), RangePreset::Last90Days);
    }

    #[test]
    fn test_range_for_30d_is_inclusive_of_today() {
        let now = Utc.with_ymd_and_hms(2024, 3, 31, 15, 45, 0).unwrap();
        let range = range_for(RangePreset::Last30Days, now);
        assert_eq!(range.to, Utc.with_ymd_and_hms(2024, 3, 31, 0, 0, 0).unwrap());
        assert_eq!(range.from, Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_range_for_90d() {
        let now = Utc.with_ymd_and_hms(2024, 3, 31, 0, 0, 0).unwrap();
        let range = range_for(RangePreset::Last90Days, now);
        assert_eq!((range.to - range.from).num_days(), 89);
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(
            parse_date("2024-01-01"),
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(
            parse_date("2024-01-01T12:30:00Z"),
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 12, 30, 0).unwrap())
        );
        assert_eq!(
            parse_date("2024-01-01T12:30:00+02:00"),
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 10, 30, 0).unwrap())
        );
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_parse_from_to_ignores_invalid_side() {
        let (from, to) = parse_from_to(Some("2024-02-01"), Some("garbage"));
        assert!(from.is_some());
        assert!(to.is_none());
    }

    #[test]
    fn test_days_between_floors() {
        let a = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2024, 1, 3, 23, 0, 0).unwrap();
        assert_eq!(days_between(b, a), 2);
        assert_eq!(days_between(a, a), 0);
    }
}
