//! The `Communicator` and the messages it produces.

use log::{info, warn};
use serde::{Deserialize, Serialize};

use eta_alert::{Alert, DelaySummary, RiskLevel, Severity};
use eta_core::{CommsBackend, CommsSettings, DriverId, StopId, Timestamp};

use crate::{CommunicationGenerator, LiveGenerator, MessageRequest, TemplateGenerator};

/// Dispatcher alert text when nothing is late.
pub const ALL_CLEAR: &str = "No delivery delays detected. All stops are on schedule.";

// ── Supervisor report ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReportDelay {
    #[serde(default)]
    pub stop_id:   String,
    #[serde(default)]
    pub driver_id: String,
    #[serde(default)]
    pub customer:  String,
    #[serde(default, rename = "delay_minutes", alias = "delay_min")]
    pub delay_min: f64,
}

/// Structured status report for the routing supervisor.
///
/// Deserialization is lenient: a generator may omit fields.  `raw_response`
/// is set only when the generator's text was not a usable JSON report.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SupervisorReport {
    #[serde(default)]
    pub summary:         String,
    #[serde(default)]
    pub delays:          Vec<ReportDelay>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default = "unknown_risk")]
    pub risk_level:      String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response:    Option<String>,
}

fn unknown_risk() -> String {
    "UNKNOWN".to_owned()
}

impl SupervisorReport {
    /// Report built directly from the summary.
    pub fn from_summary(summary: &DelaySummary) -> Self {
        let m = &summary.metrics;
        let delays = summary
            .top_delays
            .iter()
            .map(|d| ReportDelay {
                stop_id:   d.stop_id.to_string(),
                driver_id: d.driver_id.to_string(),
                customer:  d.customer.clone(),
                delay_min: d.delay_min,
            })
            .collect();

        let recommendations = match summary.top_delays.first() {
            Some(worst) => vec![
                "Contact customers for delayed stops to manage expectations".to_owned(),
                format!(
                    "Review the remaining route of {} to recover the {:.1}-minute delay",
                    worst.driver_id, worst.delay_min
                ),
            ],
            None => vec![
                "No action needed; all stops are on schedule".to_owned(),
                "Keep monitoring live driver positions".to_owned(),
            ],
        };

        Self {
            summary: format!(
                "{} drivers with {} stops, {} delays",
                m.total_drivers, m.total_stops, m.delayed_stops
            ),
            delays,
            recommendations,
            risk_level: summary.risk_level().to_string(),
            raw_response: None,
        }
    }

    /// Parse generator output, tolerating a Markdown code fence around it.
    /// Anything else becomes the summary-derived report with `raw_response`
    /// preserved.
    pub fn parse_or_fallback(text: &str, summary: &DelaySummary) -> Self {
        match serde_json::from_str::<Self>(strip_code_fence(text)) {
            Ok(report) => report,
            Err(e) => {
                warn!("supervisor report is not valid JSON ({e}); using structured fallback");
                Self {
                    raw_response: Some(text.to_owned()),
                    ..Self::from_summary(summary)
                }
            }
        }
    }

    /// The report's risk level, if it is one of LOW / MEDIUM / HIGH.
    pub fn risk(&self) -> Option<RiskLevel> {
        RiskLevel::parse(&self.risk_level)
    }
}

fn strip_code_fence(text: &str) -> &str {
    let t = text.trim();
    let Some(body) = t.strip_prefix("```") else {
        return t;
    };
    let body = match body.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => &body[4..],
        _ => body,
    };
    body.strip_suffix("```").unwrap_or(body).trim()
}

// ── Communications ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CustomerMessage {
    pub stop_id:   StopId,
    pub driver_id: DriverId,
    pub customer:  String,
    pub delay_min: f64,
    pub severity:  Severity,
    pub message:   String,
}

/// Every message produced for one run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Communications {
    pub generated_at:      Timestamp,
    /// Name of the configured generator.
    pub generator:         &'static str,
    pub supervisor_report: SupervisorReport,
    pub dispatcher_alert:  String,
    pub customer_messages: Vec<CustomerMessage>,
    /// Messages rendered by the template because the configured generator
    /// failed.
    pub fallbacks:         usize,
}

// ── Communicator ──────────────────────────────────────────────────────────────

/// Pick the generator named by `settings`.
///
/// A live backend without an API key is logged and replaced by the
/// template generator.
pub fn build_generator(settings: &CommsSettings) -> Box<dyn CommunicationGenerator> {
    match settings.backend {
        CommsBackend::Template => Box::new(TemplateGenerator),
        CommsBackend::Live => match LiveGenerator::new(settings) {
            Ok(live) => Box::new(live),
            Err(e) => {
                warn!("live generator unavailable ({e}); using templates");
                Box::new(TemplateGenerator)
            }
        },
    }
}

/// Runs the configured generator with a per-message template fallback.
pub struct Communicator {
    generator: Box<dyn CommunicationGenerator>,
    template:  TemplateGenerator,
}

impl Communicator {
    pub fn new<G: CommunicationGenerator + 'static>(generator: G) -> Self {
        Self { generator: Box::new(generator), template: TemplateGenerator }
    }

    pub fn from_settings(settings: &CommsSettings) -> Self {
        Self { generator: build_generator(settings), template: TemplateGenerator }
    }

    pub fn generator_name(&self) -> &'static str {
        self.generator.name()
    }

    fn text(&self, request: &MessageRequest<'_>, fallbacks: &mut usize) -> String {
        match self.generator.generate(request) {
            Ok(text) => text,
            Err(e) => {
                warn!(
                    "{} generator failed for {:?}: {e}; using template",
                    self.generator.name(),
                    request.kind()
                );
                *fallbacks += 1;
                self.template.render(request)
            }
        }
    }

    fn report_with(&self, summary: &DelaySummary, fallbacks: &mut usize) -> SupervisorReport {
        let text = self.text(&MessageRequest::SupervisorReport(summary), fallbacks);
        SupervisorReport::parse_or_fallback(&text, summary)
    }

    fn dispatcher_with(&self, summary: &DelaySummary, fallbacks: &mut usize) -> String {
        if !summary.has_delays() {
            return ALL_CLEAR.to_owned();
        }
        self.text(&MessageRequest::DispatcherAlert(summary), fallbacks)
    }

    fn notice_with(&self, alert: &Alert, fallbacks: &mut usize) -> CustomerMessage {
        let p = &alert.projection;
        CustomerMessage {
            stop_id:   p.stop_id.clone(),
            driver_id: p.driver_id.clone(),
            customer:  p.customer.clone(),
            delay_min: p.delay_min,
            severity:  alert.severity,
            message:   self.text(&MessageRequest::CustomerNotice(alert), fallbacks),
        }
    }

    pub fn supervisor_report(&self, summary: &DelaySummary) -> SupervisorReport {
        self.report_with(summary, &mut 0)
    }

    /// [`ALL_CLEAR`] when the summary holds no delays.
    pub fn dispatcher_alert(&self, summary: &DelaySummary) -> String {
        self.dispatcher_with(summary, &mut 0)
    }

    pub fn customer_notice(&self, alert: &Alert) -> CustomerMessage {
        self.notice_with(alert, &mut 0)
    }

    /// All messages for a run: one report, one dispatcher alert, and one
    /// customer notice per alert.
    pub fn communicate(
        &self,
        summary: &DelaySummary,
        alerts:  &[Alert],
        now:     Timestamp,
    ) -> Communications {
        let mut fallbacks = 0;
        let supervisor_report = self.report_with(summary, &mut fallbacks);
        let dispatcher_alert = self.dispatcher_with(summary, &mut fallbacks);
        let customer_messages: Vec<_> =
            alerts.iter().map(|a| self.notice_with(a, &mut fallbacks)).collect();

        info!(
            "generated {} customer messages with the {} generator ({} fallbacks)",
            customer_messages.len(),
            self.generator.name(),
            fallbacks
        );

        Communications {
            generated_at: now,
            generator: self.generator.name(),
            supervisor_report,
            dispatcher_alert,
            customer_messages,
            fallbacks,
        }
    }
}
