//! Console report for a finished run.

use crate::pipeline::RunOutcome;

pub fn print_insights(outcome: &RunOutcome) {
    let m = &outcome.summary.metrics;
    let sev = &outcome.summary.severity;

    println!();
    println!("=== Run insights ===");
    println!("Performance");
    println!("  Total deliveries : {}", m.total_stops);
    println!("  On-time rate     : {:.1}%", m.on_time_rate_percent());
    println!("  Average delay    : {:.1} min", m.average_delay_min);
    println!("  Worst delay      : {:.1} min", m.max_delay_min);
    println!();
    println!("Alerts: {} stops (risk {})", outcome.alerts.len(), outcome.summary.risk_level());
    println!("  High severity    : {} stops", sev.high);
    println!("  Medium severity  : {} stops", sev.medium);
    println!("  Low severity     : {} stops", sev.low);
    println!();
    println!("Operations");
    println!("  Total distance   : {:.1} km", m.total_distance_km);
    println!("  Average speed    : {:.1} km/h", m.average_speed_kmh);
    println!("  Active drivers   : {}", m.total_drivers);

    if !outcome.fleet.failures.is_empty() {
        println!();
        println!("Skipped drivers");
        for f in &outcome.fleet.failures {
            println!("  {:<12} {}", f.driver_id, f.error);
        }
    }

    if !outcome.summary.top_delays.is_empty() {
        println!();
        println!("{:<12} {:<6} {:<20} {:>9}  {:<6}", "Driver", "Stop", "Customer", "Delay", "Level");
        println!("{}", "-".repeat(58));
        for d in &outcome.summary.top_delays {
            println!(
                "{:<12} {:<6} {:<20} {:>7.1} m  {:<6}",
                d.driver_id, d.sequence, d.customer, d.delay_min, d.severity
            );
        }
    }

    println!();
    println!("Dispatcher alert ({} generator)", outcome.comms.generator);
    for line in outcome.comms.dispatcher_alert.lines() {
        println!("  {line}");
    }

    let p = &outcome.paths;
    println!();
    println!("Files");
    println!("  {}", p.projections.display());
    println!("  {}", p.alerts.display());
    println!("  {}", p.summary.display());
    println!("  {}", p.communications.display());
}
