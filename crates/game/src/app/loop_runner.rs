use std::process::ExitCode;

use room_engine::run_app_with_metrics;
use tracing::{error, info};

use super::bootstrap::AppWiring;

pub(crate) fn run(app: AppWiring) -> ExitCode {
    let metrics = app.metrics.clone();
    if let Err(err) = run_app_with_metrics(app.config, app.room, app.victory, app.metrics) {
        error!(error = %err, "startup_failed");
        return ExitCode::FAILURE;
    }

    let last = metrics.snapshot();
    info!(
        fps = last.fps,
        tps = last.tps,
        worst_frame_ms = last.worst_frame_ms,
        dropped_backlog_ms = last.dropped_backlog_ms,
        "final_loop_metrics"
    );
    ExitCode::SUCCESS
}
