//! Offline script commands: transcript and validation.

use marionette::{MarionetteResult, Script};
use std::path::Path;

/// Print the script's transcript to stdout.
pub fn print_transcript(dir: &Path) -> MarionetteResult<()> {
    let script = Script::from_dir(dir)?;
    for line in script.transcript() {
        println!("{}", line);
    }
    Ok(())
}

/// Load a script, report problems, and print when each line fires.
///
/// Returns the number of problems found.
pub fn check_script(dir: &Path) -> MarionetteResult<usize> {
    let script = Script::from_dir(dir)?;
    let warnings = script.validate();

    println!(
        "{}: {} actors, {} spaces, {} lines",
        dir.display(),
        script.actors().len(),
        script.spaces().len(),
        script.len()
    );
    for (index, line) in script.lines().iter().enumerate() {
        let timing = if *line.auto() {
            format!("auto {:>6.1}s", line.effective_delay().as_secs_f64())
        } else {
            "wait        ".to_string()
        };
        let kind = if *line.comment() {
            "comment"
        } else if line.filename().is_some() && line.text().is_none() {
            "file"
        } else {
            "text"
        };
        println!(
            "{:>4} {} {:<7} {}",
            index,
            timing,
            kind,
            script.speaker_name(line)
        );
    }

    for warning in &warnings {
        println!("problem: {}", warning);
    }
    if warnings.is_empty() {
        println!("no problems found");
    }
    Ok(warnings.len())
}
