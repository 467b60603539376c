use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use saxsbead::engine::progress::{Progress, ProgressCallback};
use std::time::Duration;

const SPINNER_TICK_MS: u64 = 80;

/// Shows a curve computation on stderr: a spinner while a stage runs, then one bar
/// step per evaluated q sample, labelled with the size of the averaged ensemble.
#[derive(Clone)]
pub struct CliProgressHandler {
    bar: ProgressBar,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        let bar = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stderr())
            .with_style(spinner_style());
        bar.finish_and_clear();
        Self { bar }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let bar = self.bar.clone();
        Box::new(move |progress: Progress| render(&bar, progress))
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn ensemble_label(beads: usize, conformers: usize) -> String {
    let plural = if conformers == 1 { "" } else { "s" };
    format!("{} beads x {} conformer{}", beads, conformers, plural)
}

fn render(bar: &ProgressBar, progress: Progress) {
    match progress {
        Progress::StageStart { name } => {
            bar.reset();
            bar.set_length(0);
            bar.set_style(spinner_style());
            bar.set_message(name);
            bar.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
        }
        Progress::SweepStart {
            samples,
            beads,
            conformers,
        } => {
            bar.disable_steady_tick();
            bar.reset();
            bar.set_length(samples);
            bar.set_style(sweep_style());
            bar.set_message(ensemble_label(beads, conformers));
        }
        Progress::SampleComputed => bar.inc(1),
        Progress::SweepFinish => {
            let samples = bar.length().unwrap_or(0);
            bar.set_position(samples);
            let summary = format!("{} q samples, {}", samples, bar.message());
            bar.finish_with_message(summary);
        }
        // Marks whatever the bar last described as done.
        Progress::StageFinish => {
            bar.disable_steady_tick();
            let summary = format!("✓ {}", bar.message());
            bar.finish_with_message(summary);
        }
        Progress::Message(msg) => bar.println(format!("  {}", msg)),
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn sweep_style() -> ProgressStyle {
    ProgressStyle::with_template("{msg} [{bar:40.cyan/blue}] {pos}/{len} q ({eta})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-")
}
