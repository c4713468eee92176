//! Live playback command handler.

use marionette::console::{Console, ConsoleRenderer, HELP, TerminalGuard};
use marionette::{Command, MarionetteResult, Playback, PlaybackConfig, Script};
use marionette_platform::{ChatPlatform, DryRunPlatform, WorkspacePlatform};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Stage every actor and play the script under keyboard control.
///
/// Staging begins as soon as the console is up. Returns once the script
/// completes, staging fails, or the director quits.
#[instrument(skip(config))]
pub async fn play(dir: &Path, dry_run: bool, config: &PlaybackConfig) -> MarionetteResult<()> {
    let script = Script::from_dir(dir)?;
    let total = script.len();
    let transcript = script.transcript();

    let platform: Arc<dyn ChatPlatform> = if dry_run {
        info!("Dry run: nothing will be sent");
        Arc::new(DryRunPlatform::new())
    } else {
        Arc::new(WorkspacePlatform::new(
            config.api_url().clone(),
            config.request_timeout(),
        )?)
    };

    let playback = Playback::new(
        script,
        platform,
        config.playback_options()?,
        Box::new(ConsoleRenderer::stdout()),
    );
    let handle = playback.handle();

    println!("{}", HELP);
    let guard = TerminalGuard::enter()?;
    let console = Console::new(handle.clone(), transcript);
    let keys = tokio::task::spawn_blocking(move || console.run());

    handle.send(Command::BeginStaging);
    let outcome = playback.run().await;

    match keys.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(error = %e, "Console stopped with an error"),
        Err(e) => warn!(error = %e, "Console task failed"),
    }
    guard.leave()?;

    let report = outcome?;
    if report.completed(total) {
        println!("Played all {} lines ({} sent).", total, report.sent());
    } else {
        println!(
            "Stopped at line {} of {} ({} sent, {} failed attempts).",
            report.cursor(),
            total,
            report.sent(),
            report.failed()
        );
    }
    Ok(())
}
