//! Message requests and their prompts.

use std::fmt::Write as _;

use eta_alert::{Alert, DelaySummary};

/// Which audience a message is for.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MessageKind {
    SupervisorReport,
    DispatcherAlert,
    CustomerNotice,
}

/// Input for one generated message.
#[derive(Clone, Copy, Debug)]
pub enum MessageRequest<'a> {
    /// JSON status report for the routing supervisor.
    SupervisorReport(&'a DelaySummary),
    /// Short operational alert covering the summary's worst delays.
    DispatcherAlert(&'a DelaySummary),
    /// Apology and new time window for one delayed customer.
    CustomerNotice(&'a Alert),
}

impl MessageRequest<'_> {
    pub fn kind(&self) -> MessageKind {
        match self {
            MessageRequest::SupervisorReport(_) => MessageKind::SupervisorReport,
            MessageRequest::DispatcherAlert(_) => MessageKind::DispatcherAlert,
            MessageRequest::CustomerNotice(_) => MessageKind::CustomerNotice,
        }
    }

    /// Completion budget for this kind; reports use the configured maximum.
    pub fn max_tokens(&self, configured: u32) -> u32 {
        match self.kind() {
            MessageKind::SupervisorReport => configured,
            MessageKind::DispatcherAlert => configured.min(200),
            MessageKind::CustomerNotice => configured.min(150),
        }
    }

    /// Prompt text sent to a language-model generator.
    pub fn prompt(&self) -> String {
        match self {
            MessageRequest::SupervisorReport(s) => supervisor_prompt(s),
            MessageRequest::DispatcherAlert(s) => dispatcher_prompt(s),
            MessageRequest::CustomerNotice(a) => customer_prompt(a),
        }
    }
}

pub(crate) const SYSTEM_PROMPT: &str = "You are a helpful assistant for delivery logistics.";

fn supervisor_prompt(summary: &DelaySummary) -> String {
    let m = &summary.metrics;
    let mut delays = String::new();
    for d in &summary.top_delays {
        let _ = writeln!(
            delays,
            "  - {} (driver {}, customer {}): {:.1} min late",
            d.stop_id, d.driver_id, d.customer, d.delay_min
        );
    }
    format!(
        "You are a routing supervisor AI. Analyze the following delivery ETA data and \
         respond with a JSON object only.\n\n\
         ETA data:\n\
         - total drivers: {}\n\
         - total stops: {}\n\
         - delayed stops: {}\n\
         - average delay: {:.2} min\n\
         - max delay: {:.2} min\n\
         Worst delays:\n{}\n\
         The JSON object must contain:\n\
         - summary: brief overview of delivery status\n\
         - delays: stops delayed more than {} minutes, each with stop_id, driver_id, \
         customer and delay_minutes\n\
         - recommendations: top 2 operational actions\n\
         - risk_level: LOW, MEDIUM or HIGH based on delay severity",
        m.total_drivers,
        m.total_stops,
        m.delayed_stops,
        m.average_delay_min,
        m.max_delay_min,
        delays,
        summary.delay_threshold_min,
    )
}

/// One line per delayed stop, shared by the prompt and the template.
pub(crate) fn delay_lines(summary: &DelaySummary) -> String {
    summary
        .top_delays
        .iter()
        .map(|d| {
            format!(
                "Driver {}: Stop {} ({}) delayed by {:.1} minutes [{}]",
                d.driver_id, d.sequence, d.customer, d.delay_min, d.severity
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn dispatcher_prompt(summary: &DelaySummary) -> String {
    format!(
        "You are a delivery dispatcher assistant. Create a concise alert message for the \
         following delayed deliveries.\n\n\
         Delayed stops:\n{}\n\n\
         Provide:\n\
         1. Brief summary of the situation\n\
         2. Top 2 recommended actions\n\
         3. Keep it under 150 words, professional tone",
        delay_lines(summary)
    )
}

fn customer_prompt(alert: &Alert) -> String {
    let p = &alert.projection;
    format!(
        "Create a polite, concise customer message about a delivery delay.\n\n\
         Customer: {}\n\
         Original ETA: {}\n\
         New ETA: {}\n\
         Delay: {:.0} minutes\n\n\
         Requirements:\n\
         - Apologetic but professional tone\n\
         - Under 100 words\n\
         - Include updated time window\n\
         - No technical jargon",
        p.customer,
        p.planned_arrival.format("%H:%M"),
        p.projected_arrival.format("%H:%M"),
        p.delay_min
    )
}
