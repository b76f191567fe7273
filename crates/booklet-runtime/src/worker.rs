use crate::handlers::{self, SourceCache};
use crate::{BookletCommand, BookletUpdate};
use tokio::sync::mpsc;

/// Async worker task that processes booklet commands and sends updates.
///
/// Commands run one at a time. A stats request first drains the queue: later
/// stats requests replace it, and any other queued command runs before it,
/// so stats may be answered after commands that arrived behind them. The
/// task ends once every command sender has been dropped and the queue is
/// drained.
pub async fn worker_task(
    mut command_rx: mpsc::UnboundedReceiver<BookletCommand>,
    update_tx: mpsc::UnboundedSender<BookletUpdate>,
) {
    let mut cache = SourceCache::new();

    while let Some(cmd) = command_rx.recv().await {
        process_command(cmd, &mut cache, &mut command_rx, &update_tx).await;
    }

    log::debug!("Command channel closed, worker exiting");
}

async fn process_command(
    cmd: BookletCommand,
    cache: &mut SourceCache,
    command_rx: &mut mpsc::UnboundedReceiver<BookletCommand>,
    update_tx: &mpsc::UnboundedSender<BookletUpdate>,
) {
    match cmd {
        BookletCommand::Generate { options } => {
            handlers::handle_generate(options, cache, update_tx).await;
        }
        BookletCommand::CalculateStats { mut options } => {
            // Drain any queued stats requests, keeping only the most recent
            while let Ok(next_cmd) = command_rx.try_recv() {
                if let BookletCommand::CalculateStats {
                    options: new_options,
                } = next_cmd
                {
                    log::debug!("Discarding queued stats request, using newer request");
                    options = new_options;
                } else {
                    // Can't put it back, so run it before the stats
                    Box::pin(process_command(next_cmd, cache, command_rx, update_tx)).await;
                }
            }

            handlers::handle_calculate_stats(options, cache, update_tx).await;
        }
        BookletCommand::LoadConfig { path } => {
            handlers::handle_load_config(path, update_tx).await;
        }
    }
}
