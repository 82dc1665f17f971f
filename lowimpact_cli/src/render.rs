//! Terminal rendering of the overview and playback screens.

use lowimpact_core::{Completion, Level, Overview, Playback, ProgressState, Step, StepTarget};

pub const APP_TITLE: &str = "Low Impact Daily Trainer";

pub const DISCLAIMER: &str = "⚠ Always consult a healthcare professional before starting a new \
exercise plan. Stop if you feel pain, dizziness, or shortness of breath.";

const BAR_WIDTH: usize = 20;

pub fn render_overview(overview: &Overview) {
    let session = &overview.session;

    println!("\n{}", APP_TITLE);
    println!("{}", overview.category.title());
    println!("  {}", overview.category.subtitle());
    println!();
    println!("╭─────────────────────────────────────────╮");
    println!("│  {}", session.title);
    println!("╰─────────────────────────────────────────╯");
    println!("  Difficulty: {} / {}", overview.progress.level, Level::MAX);
    println!("  Estimated time: {} min", session.total_minutes);
    println!("  Streak: {}", overview.progress.streak_label());
    println!();

    let width = session
        .steps
        .iter()
        .map(|s| s.name.chars().count())
        .max()
        .unwrap_or(0);

    for step in &session.steps {
        println!("  {:<width$}  {}", step.name, step.target, width = width);
    }

    if overview.completed_today {
        println!();
        println!("  Completed today");
    }
    println!();
}

pub fn render_status(progress: &ProgressState, today: i64) {
    println!("Level: {} / {}", progress.level, Level::MAX);
    println!("Streak: {}", progress.streak_label());
    match progress.last_completed_day {
        Some(day) => println!("Last completed day: {}", day),
        None => println!("Last completed day: never"),
    }
    println!(
        "Completed today: {}",
        if progress.completed_today(today) { "yes" } else { "no" }
    );
}

/// Progress bar for the share of steps reached.
pub fn progress_bar(fraction: f64) -> String {
    let filled = ((fraction.clamp(0.0, 1.0) * BAR_WIDTH as f64).round()) as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

/// Target line shown under the active step.
pub fn playback_target_line(step: &Step, remaining: Option<u32>) -> Option<String> {
    match step.target {
        StepTarget::Duration(secs) => Some(format!("Time: {}s", remaining.unwrap_or(secs))),
        StepTarget::Reps(n) => Some(format!("Reps: x{} (self-paced)", n)),
        StepTarget::Instruction => None,
    }
}

pub fn render_step(playback: &Playback) {
    let Some(step) = playback.current_step() else {
        return;
    };
    let count = playback.session().steps.len();
    let index = playback.step_index().unwrap_or(0);

    println!();
    println!("{}  {}/{}", progress_bar(playback.progress()), index + 1, count);
    println!("  {}", step.name);
    if let Some(line) = playback_target_line(step, playback.remaining_sec()) {
        println!("  {}", line);
    }
    println!("Enter: {}   x + Enter: Exit", playback.advance_label());
}

pub fn render_completion(completion: &Completion) {
    println!();
    println!("Session complete!");
    println!("Great job showing up today.");
    render_progress_change(completion);
}

pub fn render_progress_change(completion: &Completion) {
    println!("  Streak: {}", completion.state.streak_label());
    if completion.leveled_up {
        println!("  Level up! Difficulty is now {} / {}", completion.state.level, Level::MAX);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0.0), format!("[{}]", "-".repeat(20)));
        assert_eq!(progress_bar(1.0), format!("[{}]", "#".repeat(20)));
        assert_eq!(progress_bar(0.5), format!("[{}{}]", "#".repeat(10), "-".repeat(10)));
    }

    #[test]
    fn test_playback_target_line() {
        assert_eq!(
            playback_target_line(&Step::timed("Hold", 30), Some(12)).as_deref(),
            Some("Time: 12s")
        );
        assert_eq!(
            playback_target_line(&Step::reps("Raise", 8), None).as_deref(),
            Some("Reps: x8 (self-paced)")
        );
        assert_eq!(playback_target_line(&Step::instruction("Rest"), None), None);
    }
}
