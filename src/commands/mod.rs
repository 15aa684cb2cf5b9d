//! Command dispatch and handlers.

pub mod extract;
pub mod scan;

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use crate::cassette::session::RecordingSession;
use crate::cli::Command;
use crate::context::ServiceContext;
use crate::environment::Environment;

/// Environment variable naming a directory to record cassettes into.
pub const RECORD_ENV: &str = "PKGEXTRACT_RECORD";

/// Dispatch a parsed command to its handler.
///
/// When `PKGEXTRACT_RECORD` is set to a directory path, all port interactions
/// are recorded to per-port cassette files in that directory.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    let env = Environment::from_env();
    let (ctx, session) = if let Ok(path) = env::var(RECORD_ENV) {
        let (ctx, session) = ServiceContext::recording_at(env, &PathBuf::from(path))?;
        (ctx, Some(session))
    } else {
        (ServiceContext::live(env), None)
    };
    let ctx = Arc::new(ctx);

    let result = dispatch_with_context(command, &ctx);

    // Finish recording after command completes (even on error)
    if let Some(session) = session {
        // Drop context first to release Arc references
        drop(ctx);
        finish_recording(session)?;
    }

    result
}

/// Dispatch a command with the given service context.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch_with_context(command: &Command, ctx: &Arc<ServiceContext>) -> Result<(), String> {
    match command {
        Command::Extract(args) => extract::run_with_context(ctx, args),
        Command::Scan(args) => scan::run_with_context(ctx, args),
    }
}

/// Finish a recording session and print the output directory.
fn finish_recording(session: RecordingSession) -> Result<(), String> {
    let output_dir = session.finish()?;
    eprintln!("Recording saved to: {}", output_dir.display());
    Ok(())
}
