//! Terminal progress for multi-file merges.

use indicatif::{ProgressBar, ProgressStyle};

use iqt_ingest::MergeProgress;

use crate::pipeline::display_name;

const TEMPLATE: &str = "{spinner} [{bar:30}] {pos}/{len} {msg}";

/// Progress bar created on the first merge notification.
///
/// Drawing is suppressed automatically when stderr is not a terminal.
#[derive(Default)]
pub struct MergeProgressBar {
    bar: Option<ProgressBar>,
}

impl MergeProgressBar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, progress: MergeProgress<'_>) {
        let bar = self.bar.get_or_insert_with(|| {
            let bar = ProgressBar::new(progress.total as u64);
            if let Ok(style) = ProgressStyle::with_template(TEMPLATE) {
                bar.set_style(style.progress_chars("=> "));
            }
            bar
        });
        bar.set_position(progress.index as u64);
        bar.set_message(format!("reading {}", display_name(progress.path)));
    }

    pub fn finish(self) {
        if let Some(bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}
