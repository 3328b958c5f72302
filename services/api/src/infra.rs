use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_iso_dates() {
        let date = parse_date(" 2025-09-01 ").expect("valid date");
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 9, 1).expect("valid date"));
    }

    #[test]
    fn parse_date_explains_failures() {
        let err = parse_date("09/01/2025").expect_err("invalid format");
        assert!(err.contains("YYYY-MM-DD"));
    }
}
