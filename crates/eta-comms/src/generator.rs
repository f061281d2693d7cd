//! The `CommunicationGenerator` trait and the template implementation.

use eta_alert::DelaySummary;
use eta_core::time::add_minutes;

use crate::request::delay_lines;
use crate::{ALL_CLEAR, CommsResult, MessageRequest, SupervisorReport};

/// Produces the text for one message.
///
/// Called from the communicator's thread, one message at a time.
/// Implementations must be `Send + Sync` so a communicator can be shared.
pub trait CommunicationGenerator: Send + Sync {
    fn generate(&self, request: &MessageRequest<'_>) -> CommsResult<String>;

    /// Short identifier recorded with the generated messages.
    fn name(&self) -> &'static str;
}

impl<T: CommunicationGenerator + ?Sized> CommunicationGenerator for Box<T> {
    fn generate(&self, request: &MessageRequest<'_>) -> CommsResult<String> {
        (**self).generate(request)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

// ── TemplateGenerator ─────────────────────────────────────────────────────────

/// Width of the delivery window quoted to customers, minutes.
const CUSTOMER_WINDOW_MIN: f64 = 30.0;

/// Deterministic text built only from the delay data.  Never fails.
#[derive(Copy, Clone, Debug, Default)]
pub struct TemplateGenerator;

impl TemplateGenerator {
    pub fn render(&self, request: &MessageRequest<'_>) -> String {
        match request {
            MessageRequest::SupervisorReport(s) => {
                let report = SupervisorReport::from_summary(s);
                serde_json::to_string_pretty(&report).unwrap_or(report.summary)
            }
            MessageRequest::DispatcherAlert(s) => dispatcher_text(s),
            MessageRequest::CustomerNotice(alert) => {
                let p = &alert.projection;
                let until = add_minutes(p.projected_arrival, CUSTOMER_WINDOW_MIN);
                format!(
                    "Hi {}, we wanted to update you on your delivery. It is running about \
                     {:.0} minutes behind the planned {} and should now reach you between \
                     {} and {}. We apologise for the inconvenience and thank you for your \
                     patience.",
                    p.customer,
                    p.delay_min.max(0.0),
                    p.planned_arrival.format("%H:%M"),
                    p.projected_arrival.format("%H:%M"),
                    until.format("%H:%M"),
                )
            }
        }
    }
}

impl CommunicationGenerator for TemplateGenerator {
    fn generate(&self, request: &MessageRequest<'_>) -> CommsResult<String> {
        Ok(self.render(request))
    }

    fn name(&self) -> &'static str {
        "template"
    }
}

fn dispatcher_text(summary: &DelaySummary) -> String {
    if !summary.has_delays() {
        return ALL_CLEAR.to_owned();
    }
    let mut text = format!(
        "DELIVERY ALERT - {} stops delayed beyond the {:.0}-minute threshold\n\n",
        summary.severity.total(),
        summary.delay_threshold_min,
    );
    if !summary.top_delays.is_empty() {
        text.push_str(&delay_lines(summary));
        text.push_str("\n\n");
    }
    text.push_str(
        "RECOMMENDED ACTIONS:\n\
         1. Contact affected customers with updated ETAs",
    );
    if let Some(worst) = summary.top_delays.first() {
        text.push_str(&format!(
            "\n2. Review the remaining route of {} (worst delay {:.1} minutes at stop {})",
            worst.driver_id, worst.delay_min, worst.sequence,
        ));
    }
    text
}
