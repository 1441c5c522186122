use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    events::{Level, PipelineEvent},
    info, success,
    worker::{RunHandle, WorkerError},
    warning,
};

pub fn print_event(event: &PipelineEvent) {
    match event.level() {
        Level::Info => info!("{}", event),
        Level::Success => success!("{}", event),
        Level::Warning => warning!("{}", event),
    }
}

/// Renders the events of a run as they arrive and waits for its result.
///
/// `total` is the number of songs searched; it drives the progress bar.
pub async fn follow<T>(mut handle: RunHandle<T>, total: usize) -> Result<T, WorkerError> {
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} [{bar:30.blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));

    while let Some(event) = handle.next_event().await {
        match &event {
            PipelineEvent::Searching { index, request, .. } => {
                pb.set_position(*index as u64);
                pb.set_message(request.title.clone());
            }
            PipelineEvent::Found { .. }
            | PipelineEvent::NotFound { .. }
            | PipelineEvent::SearchFailed { .. } => pb.inc(1),
            _ => {}
        }
        pb.suspend(|| print_event(&event));
    }

    pb.finish_and_clear();
    handle.join().await
}
