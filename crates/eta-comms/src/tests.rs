//! Unit tests for eta-comms.  No test touches the network.

use chrono::{TimeZone, Utc};

use eta_alert::{Alert, DelaySummary, classify};
use eta_core::time::add_minutes;
use eta_core::{DriverId, GeoPoint, SeverityBands, StopId, Timestamp};
use eta_project::EtaProjection;

use crate::{CommsError, CommsResult, CommunicationGenerator, MessageRequest};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn t0() -> Timestamp {
    Utc.with_ymd_and_hms(2024, 5, 1, 14, 0, 0).unwrap()
}

fn proj(driver: &str, sequence: u32, delay_min: f64) -> EtaProjection {
    let planned = add_minutes(t0(), 20.0 * sequence as f64);
    EtaProjection {
        driver_id:          DriverId::from(driver),
        stop_id:            StopId::new(format!("{driver}_stop_{sequence:03}")),
        sequence,
        customer:           format!("Customer_{sequence:03}"),
        location:           GeoPoint::new(25.2, 55.27),
        distance_km:        3.0,
        travel_time_min:    5.0,
        service_time_min:   5.0,
        traffic_multiplier: 1.0,
        planned_arrival:    planned,
        projected_arrival:  add_minutes(planned, delay_min),
        delay_min,
        delayed:            delay_min > 15.0,
        avg_speed_kmh:      40.0,
    }
}

fn scenario(delays: &[f64]) -> (Vec<Alert>, DelaySummary) {
    let rows: Vec<_> = delays
        .iter()
        .enumerate()
        .map(|(i, &d)| proj("driver_002", i as u32 + 1, d))
        .collect();
    let alerts = classify(&rows, &SeverityBands::default(), t0());
    let summary = DelaySummary::build(&rows, &alerts, 15.0, 5);
    (alerts, summary)
}

/// Always fails, like an unreachable service.
struct Failing;

impl CommunicationGenerator for Failing {
    fn generate(&self, _request: &MessageRequest<'_>) -> CommsResult<String> {
        Err(CommsError::Unavailable("connection refused".into()))
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

/// Returns the same text for every request.
struct Canned(&'static str);

impl CommunicationGenerator for Canned {
    fn generate(&self, _request: &MessageRequest<'_>) -> CommsResult<String> {
        Ok(self.0.to_owned())
    }

    fn name(&self) -> &'static str {
        "canned"
    }
}

// ── Template generator ────────────────────────────────────────────────────────

#[cfg(test)]
mod template_tests {
    use super::*;
    use crate::{ALL_CLEAR, SupervisorReport, TemplateGenerator};

    #[test]
    fn report_is_valid_json() {
        let (_, summary) = scenario(&[40.0, 18.0, 2.0]);
        let text = TemplateGenerator.render(&MessageRequest::SupervisorReport(&summary));
        let report: SupervisorReport = serde_json::from_str(&text).unwrap();
        assert_eq!(report.summary, "1 drivers with 3 stops, 2 delays");
        assert_eq!(report.risk_level, "HIGH");
        assert_eq!(report.delays.len(), 2);
        assert_eq!(report.delays[0].delay_min, 40.0);
        assert_eq!(report.recommendations.len(), 2);
        assert!(report.raw_response.is_none());
    }

    #[test]
    fn dispatcher_lists_worst_first() {
        let (_, summary) = scenario(&[18.0, 40.0]);
        let text = TemplateGenerator.render(&MessageRequest::DispatcherAlert(&summary));
        assert!(text.starts_with("DELIVERY ALERT - 2 stops"));
        let high = text.find("delayed by 40.0 minutes").unwrap();
        let low = text.find("delayed by 18.0 minutes").unwrap();
        assert!(high < low);
    }

    #[test]
    fn dispatcher_all_clear_without_delays() {
        let (_, summary) = scenario(&[1.0]);
        let text = TemplateGenerator.render(&MessageRequest::DispatcherAlert(&summary));
        assert_eq!(text, ALL_CLEAR);
    }

    #[test]
    fn dispatcher_counts_alerts_not_listed_delays() {
        let rows = vec![proj("driver_002", 1, 40.0), proj("driver_002", 2, 25.0)];
        let alerts = classify(&rows, &SeverityBands::default(), t0());
        let summary = DelaySummary::build(&rows, &alerts, 15.0, 0);
        let text = TemplateGenerator.render(&MessageRequest::DispatcherAlert(&summary));
        assert_ne!(text, ALL_CLEAR);
        assert!(text.starts_with("DELIVERY ALERT - 2 stops"));
        assert!(text.contains("1. Contact affected customers"));
        assert!(!text.contains("Review the remaining route"));
    }

    #[test]
    fn customer_notice_has_window() {
        let (alerts, _) = scenario(&[20.0]);
        let text = TemplateGenerator.render(&MessageRequest::CustomerNotice(&alerts[0]));
        // Planned 14:20, projected 14:40, window to 15:10.
        assert!(text.contains("Customer_001"));
        assert!(text.contains("14:20"));
        assert!(text.contains("between 14:40 and 15:10"));
    }

    #[test]
    fn prompts_mention_threshold_and_customer() {
        let (alerts, summary) = scenario(&[25.0]);
        assert!(MessageRequest::SupervisorReport(&summary).prompt().contains("more than 15 minutes"));
        assert!(MessageRequest::CustomerNotice(&alerts[0]).prompt().contains("Customer_001"));
        assert_eq!(MessageRequest::CustomerNotice(&alerts[0]).max_tokens(500), 150);
        assert_eq!(MessageRequest::DispatcherAlert(&summary).max_tokens(500), 200);
    }
}

// ── Supervisor report parsing ─────────────────────────────────────────────────

#[cfg(test)]
mod report_tests {
    use super::*;
    use eta_alert::RiskLevel;
    use crate::SupervisorReport;

    #[test]
    fn parses_fenced_json() {
        let (_, summary) = scenario(&[22.0]);
        let text = "```json\n{\"summary\": \"ok\", \"risk_level\": \"medium\", \
                    \"delays\": [{\"stop_id\": \"s\", \"delay_minutes\": 22.0}]}\n```";
        let report = SupervisorReport::parse_or_fallback(text, &summary);
        assert_eq!(report.summary, "ok");
        assert_eq!(report.risk(), Some(RiskLevel::Medium));
        assert_eq!(report.delays[0].delay_min, 22.0);
        assert!(report.recommendations.is_empty());
        assert!(report.raw_response.is_none());
    }

    #[test]
    fn fence_tag_is_case_insensitive() {
        let (_, summary) = scenario(&[22.0]);
        let text = "```JSON\n{\"summary\": \"upper\", \"risk_level\": \"LOW\"}\n```";
        let report = SupervisorReport::parse_or_fallback(text, &summary);
        assert_eq!(report.summary, "upper");
        assert_eq!(report.risk(), Some(RiskLevel::Low));
        assert!(report.raw_response.is_none());
    }

    #[test]
    fn invalid_json_keeps_raw_text() {
        let (_, summary) = scenario(&[22.0, 3.0]);
        let report = SupervisorReport::parse_or_fallback("Everything looks fine.", &summary);
        assert_eq!(report.raw_response.as_deref(), Some("Everything looks fine."));
        assert_eq!(report.summary, "1 drivers with 2 stops, 1 delays");
        assert_eq!(report.risk(), Some(RiskLevel::Medium));
        assert_eq!(report.delays.len(), 1);
    }

    #[test]
    fn missing_risk_is_unknown() {
        let (_, summary) = scenario(&[]);
        let report = SupervisorReport::parse_or_fallback("{}", &summary);
        assert_eq!(report.risk_level, "UNKNOWN");
        assert_eq!(report.risk(), None);
    }
}

// ── Communicator ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod communicator_tests {
    use super::*;
    use eta_core::{CommsBackend, CommsSettings};

    use crate::{ALL_CLEAR, Communicator, LiveGenerator, build_generator};

    #[test]
    fn failing_generator_falls_back_per_message() {
        let (alerts, summary) = scenario(&[40.0, 25.0, 16.0]);
        let comms = Communicator::new(Failing).communicate(&summary, &alerts, t0());

        assert_eq!(comms.generator, "failing");
        // Report, dispatcher alert, three notices.
        assert_eq!(comms.fallbacks, 5);
        assert_eq!(comms.customer_messages.len(), 3);
        assert!(comms.dispatcher_alert.starts_with("DELIVERY ALERT"));
        assert_eq!(comms.supervisor_report.risk_level, "HIGH");
        assert!(comms.supervisor_report.raw_response.is_none());
    }

    #[test]
    fn no_delays_means_all_clear_and_no_notices() {
        let (alerts, summary) = scenario(&[-5.0, 2.0]);
        let comms = Communicator::new(Failing).communicate(&summary, &alerts, t0());
        assert_eq!(comms.dispatcher_alert, ALL_CLEAR);
        assert!(comms.customer_messages.is_empty());
        // Only the report asked the generator.
        assert_eq!(comms.fallbacks, 1);
        assert_eq!(comms.supervisor_report.risk_level, "LOW");
    }

    #[test]
    fn free_text_report_is_wrapped() {
        let (alerts, summary) = scenario(&[31.0]);
        let comms = Communicator::new(Canned("All good")).communicate(&summary, &alerts, t0());
        assert_eq!(comms.fallbacks, 0);
        assert_eq!(comms.dispatcher_alert, "All good");
        assert_eq!(comms.customer_messages[0].message, "All good");
        assert_eq!(comms.supervisor_report.raw_response.as_deref(), Some("All good"));
    }

    #[test]
    fn notices_follow_alert_order() {
        let (alerts, summary) = scenario(&[16.0, 45.0, 20.0]);
        let comms = Communicator::new(crate::TemplateGenerator).communicate(&summary, &alerts, t0());
        let delays: Vec<f64> = comms.customer_messages.iter().map(|m| m.delay_min).collect();
        assert_eq!(delays, [45.0, 20.0, 16.0]);
    }

    #[test]
    fn live_without_key_selects_template() {
        let settings = CommsSettings { backend: CommsBackend::Live, ..CommsSettings::default() };
        assert!(matches!(LiveGenerator::new(&settings), Err(CommsError::MissingApiKey)));
        assert_eq!(build_generator(&settings).name(), "template");
    }

    #[test]
    fn live_url_is_joined() {
        let settings = CommsSettings {
            backend:  CommsBackend::Live,
            endpoint: "http://localhost:9/v1/".into(),
            api_key:  Some("k".into()),
            ..CommsSettings::default()
        };
        let live = LiveGenerator::new(&settings).unwrap();
        assert_eq!(live.url(), "http://localhost:9/v1/chat/completions");
        assert_eq!(Communicator::from_settings(&settings).generator_name(), "live");
    }

    #[test]
    fn serializes_to_json() {
        let (alerts, summary) = scenario(&[18.0]);
        let comms = Communicator::new(crate::TemplateGenerator).communicate(&summary, &alerts, t0());
        let json = serde_json::to_value(&comms).unwrap();
        assert_eq!(json["generator"], "template");
        assert_eq!(json["customer_messages"][0]["severity"], "LOW");
    }
}
