//! Build result reporting.

use super::engine::{BuildResult, BuildSummary};

/// Logs a banner framed the way the engine's own log sections are.
pub fn banner(title: &str) {
    log::info!("###########################");
    log::info!("#{:^25}#", title);
    log::info!("###########################");
}

/// Logs duration, warnings, errors and size of a finished build.
pub fn report_summary(summary: &BuildSummary) {
    banner("Build results");
    log::info!("Duration: {:?}", summary.total_time());
    log::info!("Warnings: {}", summary.total_warnings);
    log::info!("Errors: {}", summary.total_errors);
    log::info!("Size: {} bytes", summary.total_size);
}

/// Logs the outcome and returns the exit code for `result`.
pub fn exit_code_for(result: BuildResult) -> i32 {
    match result {
        BuildResult::Succeeded => log::info!("Build succeeded!"),
        BuildResult::Failed => log::error!("Build failed!"),
        BuildResult::Cancelled => log::warn!("Build cancelled!"),
        BuildResult::Unknown => log::warn!("Build result is unknown!"),
    }
    result.exit_code()
}
