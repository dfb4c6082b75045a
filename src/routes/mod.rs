pub mod calendar;
pub mod financials;
pub mod forecast;
pub mod landing;
pub mod patterns;
pub mod timeline;
pub mod trends;

#[cfg(test)]
mod tests {
    #[test]
    fn test_module_structure() {
        // Test that all route module constants are accessible
        assert_eq!(super::calendar::GET_HOLIDAYS, "get_holidays");
        assert_eq!(super::calendar::GET_HOLIDAY_COUNT, "get_holiday_count");
        assert_eq!(
            super::financials::GET_CASE_FINANCIALS,
            "get_case_financials_data"
        );
        assert_eq!(
            super::forecast::GET_FULL_DAY_FORECAST,
            "get_full_day_forecast"
        );
        assert_eq!(super::patterns::GET_FLAG_PATTERNS, "get_flag_pattern_data");
        assert_eq!(super::timeline::GET_CASE_TIMELINE, "get_case_timeline_data");
        assert_eq!(super::trends::GET_VOLUME_TRENDS, "get_volume_trends_data");
        assert_eq!(super::landing::LIST_DATASETS, "list_datasets");
        assert_eq!(super::landing::POST_DATASET, "store_dataset");
    }
}
