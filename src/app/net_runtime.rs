//! Background network jobs to keep the UI loop responsive.
//!
//! Every request runs on its own task and reports back over a channel.
//! There is no cancellation and no timeout; staleness is decided by the
//! receiver when the update is applied.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;

use crate::api::{ApiError, ExportedFile, ReviewApi};
use crate::core::{
    model::{ReviewPage, Sentiment, TopWord},
    session::ReviewTicket,
};

/// Work queued by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetRequest {
    Reviews { ticket: ReviewTicket },
    TopWords { sentiment: Sentiment },
    SimilarWords { generation: u64, word: String, sentiment: Sentiment },
    Export { sentiment: Sentiment },
}

/// Completed work, sent back to the event loop.
#[derive(Debug)]
pub enum NetUpdate {
    Reviews {
        ticket: ReviewTicket,
        result: Result<ReviewPage, ApiError>,
    },
    TopWords {
        sentiment: Sentiment,
        result: Result<Vec<TopWord>, ApiError>,
    },
    SimilarWords {
        generation: u64,
        result: Result<Vec<String>, ApiError>,
    },
    Exported {
        result: anyhow::Result<PathBuf>,
    },
}

/// Spawn a task for `request`.  `export_dir` is where downloads land.
pub fn dispatch(
    api: Arc<dyn ReviewApi>,
    tx: mpsc::UnboundedSender<NetUpdate>,
    export_dir: PathBuf,
    request: NetRequest,
) {
    tracing::debug!("dispatch {request:?}");
    tokio::spawn(async move {
        let update = match request {
            NetRequest::Reviews { ticket } => NetUpdate::Reviews {
                ticket,
                result: api.reviews(ticket.query()).await,
            },
            NetRequest::TopWords { sentiment } => NetUpdate::TopWords {
                sentiment,
                result: api.top_words(sentiment).await,
            },
            NetRequest::SimilarWords {
                generation,
                word,
                sentiment,
            } => NetUpdate::SimilarWords {
                generation,
                result: api.similar_words(word, sentiment).await,
            },
            NetRequest::Export { sentiment } => {
                let result = match api.export_reviews(sentiment).await {
                    Ok(file) => save_export(&export_dir, file).await,
                    Err(err) => Err(err.into()),
                };
                NetUpdate::Exported { result }
            }
        };
        // Receiver gone means the app is shutting down.
        let _ = tx.send(update);
    });
}

/// Give up after this many taken names rather than probing forever.
const MAX_EXPORT_NAMES: u32 = 10_000;

/// Write an export into `dir` without clobbering an existing file.
///
/// Files are created with `create_new`, so a name taken between the check
/// and the write is skipped rather than replaced.  Taken names get a
/// counter before the extension: `reviews-1.xlsx`, `reviews-2.xlsx`, ...
pub async fn save_export(dir: &Path, file: ExportedFile) -> anyhow::Result<PathBuf> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("creating {}", dir.display()))?;

    let name = export_name(&file.file_name);
    for attempt in 0..MAX_EXPORT_NAMES {
        let path = dir.join(numbered_name(&name, attempt));
        let mut out = match OpenOptions::new().write(true).create_new(true).open(&path).await {
            Ok(out) => out,
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(err) => return Err(err).with_context(|| format!("creating {}", path.display())),
        };
        out.write_all(&file.bytes)
            .await
            .with_context(|| format!("writing {}", path.display()))?;
        out.flush()
            .await
            .with_context(|| format!("writing {}", path.display()))?;
        tracing::info!("saved export ({} bytes) to {}", file.bytes.len(), path.display());
        return Ok(path);
    }
    anyhow::bail!("no free file name for {name} in {}", dir.display())
}

/// Final path component of the server-suggested name, or the default.
fn export_name(suggested: &str) -> String {
    Path::new(suggested)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| crate::api::http::DEFAULT_EXPORT_NAME.to_string())
}

fn numbered_name(name: &str, attempt: u32) -> String {
    if attempt == 0 {
        return name.to_string();
    }
    let path = Path::new(name);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string());
    match path.extension() {
        Some(ext) => format!("{stem}-{attempt}.{}", ext.to_string_lossy()),
        None => format!("{stem}-{attempt}"),
    }
}
