//! Plain-text rendering for the terminal host.

use quiz_core::model::{Quiz, QuizResult};
use services::{
    CatalogPage, CategorySummary, QuizStats, SessionProgress, SessionUpdate, TimeUrgency,
    ViolationWarning,
};

pub fn catalog(page: &CatalogPage) {
    println!(
        "Showing {} of {} quizzes (page {}/{})",
        page.items.len(),
        page.total_matches,
        page.page,
        page.total_pages
    );
    for item in &page.items {
        println!(
            "  [{}] {} · {} · {} · {} min · {} questions · {} attempts · ★{:.1}",
            item.id,
            item.title,
            item.category,
            item.difficulty,
            item.duration_minutes,
            item.question_count,
            item.attempts,
            item.rating
        );
    }
}

pub fn categories(categories: &[CategorySummary]) {
    for c in categories {
        println!("  {} ({})", c.name, c.quiz_count);
    }
}

pub fn briefing(quiz: &Quiz, max_violations: u32) {
    println!("{}", quiz.title());
    println!("{}", quiz.description());
    println!(
        "{} questions · {} minutes · {} max warnings",
        quiz.question_count(),
        quiz.duration_minutes(),
        max_violations
    );
    println!("Rules:");
    println!("  - the quiz runs in exam mode");
    println!("  - leaving exam mode or switching away is flagged as malpractice");
    println!("  - after {max_violations} warnings the quiz is terminated");
    println!("  - developer-tool shortcuts are blocked");
}

/// Tracks what has been shown so ticks don't reprint the question.
#[derive(Default)]
pub struct SessionView {
    shown: Option<(usize, usize)>,
    urgency: Option<TimeUrgency>,
}

impl SessionView {
    pub fn update(&mut self, quiz: &Quiz, update: &SessionUpdate) {
        match update {
            SessionUpdate::Progress(progress) => self.progress(quiz, progress),
            SessionUpdate::Warning(warning) => warn(warning),
            SessionUpdate::Rejected(reason) => println!("! {reason}"),
            SessionUpdate::Ended(outcome) => println!("Quiz ended: {outcome}"),
        }
    }

    fn progress(&mut self, quiz: &Quiz, progress: &SessionProgress) {
        let timer = progress.timer();
        if self.urgency != Some(timer.urgency) {
            match timer.urgency {
                TimeUrgency::Low => println!("⏳ {timer} left"),
                TimeUrgency::Critical => println!("⏰ {timer} left!"),
                TimeUrgency::Normal => {}
            }
            self.urgency = Some(timer.urgency);
        }

        let key = (progress.current, progress.answered);
        if self.shown == Some(key) {
            return;
        }
        self.shown = Some(key);

        let question = &quiz.questions()[progress.current];
        println!();
        println!(
            "Question {} of {} · {} answered · {}{}",
            progress.current + 1,
            progress.total,
            progress.answered,
            timer,
            if progress.violations > 0 {
                format!(" · warnings {}/{}", progress.violations, progress.max_violations)
            } else {
                String::new()
            }
        );
        println!("{}", question.prompt());
        for (i, option) in question.options().iter().enumerate() {
            println!("  {}. {option}", i + 1);
        }
    }
}

fn warn(warning: &ViolationWarning) {
    println!();
    println!("⚠ Malpractice detected: {}", warning.reason);
    println!(
        "Warning {} of {}. Type `resume` to return to exam mode.",
        warning.count, warning.max
    );
}

pub fn result(result: &QuizResult) {
    println!();
    println!("{}", result.headline());
    println!(
        "Score: {}/{} ({}%) · answered {} · {}s",
        result.correct(),
        result.total(),
        result.percentage(),
        result.answered(),
        result.time_spent_secs()
    );
    if let Some(reason) = result.violation_reason() {
        println!("Terminated for: {reason}");
    }
    for (i, review) in result.reviews().iter().enumerate() {
        let mark = if review.is_correct { "✓" } else { "✗" };
        let chosen = review
            .selected
            .map_or_else(|| "-".to_string(), |s| (s + 1).to_string());
        println!(
            "  {mark} {}. {} (yours: {chosen}, correct: {})",
            i + 1,
            review.prompt,
            review.correct_option + 1
        );
        if let Some(explanation) = &review.explanation {
            println!("     {explanation}");
        }
    }
    if result.certificate_eligible() {
        println!("Certificate available.");
    }
}

pub fn stats(stats: &QuizStats) {
    println!(
        "Attempts this run: {} · average {}% · best {}%",
        stats.attempts, stats.average_percentage, stats.best_percentage
    );
}
