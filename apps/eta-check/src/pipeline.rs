//! One end-to-end run: load → project → classify → communicate → export.

use anyhow::{Context, Result};
use log::info;

use eta_alert::{Alert, DelaySummary, classify};
use eta_comms::{Communications, Communicator};
use eta_core::{EtaConfig, Timestamp};
use eta_output::{CsvWriter, ExportObserver, OutputPaths, OutputWriter, RunSummary};
use eta_project::{FleetProjection, ProjectorBuilder};
use eta_route::{load_positions_csv, load_stops_csv};

use crate::cli::RunArgs;

/// Everything one run produced.
pub struct RunOutcome {
    pub fleet:       FleetProjection,
    pub alerts:      Vec<Alert>,
    pub summary:     DelaySummary,
    pub run_summary: RunSummary,
    pub comms:       Communications,
    pub paths:       OutputPaths,
}

fn export<W: OutputWriter>(
    writer:      &mut W,
    alerts:      &[Alert],
    run_summary: &RunSummary,
    comms:       &Communications,
) -> Result<()> {
    writer.write_alerts(alerts)?;
    writer.write_summary(run_summary)?;
    writer.write_communications(comms)?;
    writer.finish()?;
    Ok(())
}

pub fn run_once(
    config: &EtaConfig,
    args:   &RunArgs,
    stamp:  &str,
    now:    Timestamp,
) -> Result<RunOutcome> {
    let stops = load_stops_csv(&args.stops)
        .with_context(|| format!("loading stops from {}", args.stops.display()))?;
    let positions = load_positions_csv(&args.positions)
        .with_context(|| format!("loading positions from {}", args.positions.display()))?;
    info!("loaded {} stops and {} positions", stops.len(), positions.len());

    let projector = ProjectorBuilder::from_config(config.clone())?.build()?;

    let writer = CsvWriter::new(&args.output, Some(stamp))
        .with_context(|| format!("creating output in {}", args.output.display()))?;
    let mut obs = ExportObserver::new(writer);
    let fleet = projector.project_all(positions, stops, &mut obs);
    if let Some(e) = obs.take_error() {
        return Err(e).context("writing projections");
    }

    let alerts = classify(&fleet.projections, &config.severity, now);
    let summary = DelaySummary::build(
        &fleet.projections,
        &alerts,
        config.delay_threshold_min,
        config.top_n,
    );
    let comms = Communicator::from_settings(&config.comms).communicate(&summary, &alerts, now);
    let run_summary = RunSummary::new(now, config, &summary, Some(&comms), &fleet.failures);

    let mut writer = obs.into_writer();
    export(&mut writer, &alerts, &run_summary, &comms).context("writing results")?;

    #[cfg(feature = "sqlite")]
    {
        let mut db = eta_output::SqliteWriter::new(&args.output, stamp)?;
        db.write_projections(&fleet.projections)?;
        export(&mut db, &alerts, &run_summary, &comms).context("writing database")?;
    }

    Ok(RunOutcome {
        fleet,
        alerts,
        summary,
        run_summary,
        comms,
        paths: writer.paths().clone(),
    })
}
