use crate::BookletUpdate;
use booklet_core::layout::PageSource;
use booklet_core::{
    BookletOptions, SourceDocument, calculate_statistics, impose_with_progress, load_pdf, save_pdf,
};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

/// Keeps the most recently loaded source so stats requests followed by
/// `Generate` read the file once.
pub struct SourceCache {
    cached: Option<SourceDocument>,
}

impl SourceCache {
    pub fn new() -> Self {
        Self { cached: None }
    }

    /// Get the cached source if the path matches, otherwise load and cache
    pub async fn get_or_load(&mut self, path: &Path) -> booklet_core::Result<&SourceDocument> {
        let source = match self.cached.take() {
            Some(source) if source.path() == path => {
                log::debug!("Using cached source document");
                source
            }
            _ => {
                log::debug!("Loading source document (cache miss or path changed)");
                load_pdf(path).await?
            }
        };
        Ok(self.cached.insert(source))
    }
}

fn send_error(update_tx: &mpsc::UnboundedSender<BookletUpdate>, message: String) {
    let _ = update_tx.send(BookletUpdate::Error { message });
}

fn send_status(update_tx: &mpsc::UnboundedSender<BookletUpdate>, message: String) {
    log::debug!("{}", message);
    let _ = update_tx.send(BookletUpdate::Status { message });
}

pub async fn handle_generate(
    options: BookletOptions,
    cache: &mut SourceCache,
    update_tx: &mpsc::UnboundedSender<BookletUpdate>,
) {
    if let Err(e) = options.validate() {
        send_error(update_tx, format!("Invalid options: {e}"));
        return;
    }

    send_status(
        update_tx,
        format!("Loading {}", options.input_file.display()),
    );
    let source = match cache.get_or_load(&options.input_file).await {
        Ok(source) => source.clone(),
        Err(e) => {
            send_error(update_tx, format!("Failed to load PDF: {e}"));
            return;
        }
    };

    let stats = match calculate_statistics(source.page_count(), &options) {
        Ok(stats) => stats,
        Err(e) => {
            send_error(update_tx, format!("Failed to impose PDF: {e}"));
            return;
        }
    };
    send_status(
        update_tx,
        format!(
            "Imposing {} page(s) onto {} sheet(s), {} blank(s) added",
            stats.source_pages, stats.output_sheets, stats.blank_pages_added
        ),
    );

    let progress_tx = update_tx.clone();
    let imposed = impose_with_progress(source, &options, move |progress| {
        for page in progress.failed_pages.iter().flatten() {
            let _ = progress_tx.send(BookletUpdate::Status {
                message: format!(
                    "Warning: page {} could not be copied, drew a placeholder",
                    page + 1
                ),
            });
        }
        let _ = progress_tx.send(BookletUpdate::Progress {
            operation: progress.to_string(),
            current: progress.current,
            total: progress.total,
        });
    })
    .await;
    let imposed = match imposed {
        Ok(doc) => doc,
        Err(e) => {
            send_error(update_tx, format!("Failed to impose PDF: {e}"));
            return;
        }
    };

    let output_path = options.output_path();
    send_status(update_tx, format!("Saving {}", output_path.display()));
    if let Err(e) = save_pdf(imposed, &output_path).await {
        send_error(update_tx, format!("Failed to save PDF: {e}"));
        return;
    }

    let _ = update_tx.send(BookletUpdate::Complete {
        path: output_path,
        stats,
    });
}

pub async fn handle_load_config(path: PathBuf, update_tx: &mpsc::UnboundedSender<BookletUpdate>) {
    match BookletOptions::load(&path).await {
        Ok(options) => {
            let _ = update_tx.send(BookletUpdate::ConfigLoaded { options });
        }
        Err(e) => send_error(update_tx, format!("Failed to load configuration: {e}")),
    }
}

pub async fn handle_calculate_stats(
    options: BookletOptions,
    cache: &mut SourceCache,
    update_tx: &mpsc::UnboundedSender<BookletUpdate>,
) {
    let page_count = match cache.get_or_load(&options.input_file).await {
        Ok(source) => source.page_count(),
        Err(e) => {
            send_error(update_tx, format!("Failed to load PDF for stats: {e}"));
            return;
        }
    };

    match calculate_statistics(page_count, &options) {
        Ok(stats) => {
            let _ = update_tx.send(BookletUpdate::StatsCalculated { stats });
        }
        Err(e) => send_error(update_tx, format!("Failed to calculate statistics: {e}")),
    }
}
