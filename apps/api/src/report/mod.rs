// PDF report generation: layout, rendering and local storage.
// Rendering is CPU-bound and runs inside tokio::task::spawn_blocking.

pub mod font;
pub mod layout;
pub mod pdf;

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use anyhow::{Context, Result};
use tracing::{info, warn};
use uuid::Uuid;

pub use font::ReportFont;
pub use layout::{default_page_config, Block, PageConfig};

const TITLE_SIZE_PT: f32 = 20.0;
const SUBTITLE_SIZE_PT: f32 = 9.0;
const HEADING_SIZE_PT: f32 = 14.0;
const BODY_SIZE_PT: f32 = 11.0;

/// One headed section of the report.
#[derive(Debug, Clone)]
pub struct ReportSection {
    pub heading: String,
    pub body: String,
}

/// Everything printed in a report, already in display order.
#[derive(Debug, Clone)]
pub struct ReportContent {
    pub title: String,
    pub subtitle: String,
    pub sections: Vec<ReportSection>,
}

impl ReportContent {
    fn to_blocks(&self) -> Vec<Block> {
        let mut blocks = vec![
            Block {
                text: self.title.clone(),
                font_size_pt: TITLE_SIZE_PT,
                space_before_mm: 0.0,
            },
            Block {
                text: self.subtitle.clone(),
                font_size_pt: SUBTITLE_SIZE_PT,
                space_before_mm: 2.0,
            },
        ];
        for section in &self.sections {
            blocks.push(Block {
                text: section.heading.clone(),
                font_size_pt: HEADING_SIZE_PT,
                space_before_mm: 8.0,
            });
            blocks.push(Block {
                text: section.body.clone(),
                font_size_pt: BODY_SIZE_PT,
                space_before_mm: 2.0,
            });
        }
        blocks
    }
}

/// A report written to the report directory.
#[derive(Debug, Clone)]
pub struct StoredReport {
    pub file_name: String,
    pub path: PathBuf,
}

/// Renders reports and stores them under a local directory served at `/reports`.
/// Reports older than the retention window are deleted after each write.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    dir: PathBuf,
    font: ReportFont,
    page: PageConfig,
    retention: Option<Duration>,
}

impl ReportWriter {
    pub fn new(dir: PathBuf, font: ReportFont) -> Self {
        Self {
            dir,
            font,
            page: default_page_config(),
            retention: None,
        }
    }

    pub fn with_retention(mut self, retention: Option<Duration>) -> Self {
        self.retention = retention;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Creates the report directory if needed.
    pub async fn ensure_dir(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("failed to create report dir {}", self.dir.display()))
    }

    /// Renders `content` to `<uuid>.pdf` in the report directory.
    pub async fn write(&self, content: ReportContent) -> Result<StoredReport> {
        let blocks = content.to_blocks();
        let title = content.title.clone();
        let page = self.page.clone();
        let font = self.font.clone();

        let bytes = tokio::task::spawn_blocking(move || {
            pdf::render_pdf(&title, &blocks, &page, &font)
        })
        .await
        .context("spawn_blocking failed in PDF rendering")??;

        self.ensure_dir().await?;

        let file_name = format!("{}.pdf", Uuid::new_v4());
        let path = self.dir.join(&file_name);
        tokio::fs::write(&path, &bytes)
            .await
            .with_context(|| format!("failed to write report {}", path.display()))?;

        info!("Report written: {} ({} bytes)", path.display(), bytes.len());

        if let Err(e) = self.prune_expired().await {
            warn!("Report pruning failed: {e:#}");
        }

        Ok(StoredReport { file_name, path })
    }

    /// Deletes `.pdf` files last modified before the retention window.
    /// Returns how many were removed.
    pub async fn prune_expired(&self) -> Result<usize> {
        let Some(cutoff) = self
            .retention
            .and_then(|retention| SystemTime::now().checked_sub(retention))
        else {
            return Ok(0);
        };

        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("failed to list report dir {}", self.dir.display()))
            }
        };

        let mut removed = 0;
        while let Some(entry) = entries
            .next_entry()
            .await
            .with_context(|| format!("failed to list report dir {}", self.dir.display()))?
        {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("pdf") {
                continue;
            }
            let Ok(metadata) = entry.metadata().await else {
                continue;
            };
            let expired = metadata.is_file()
                && metadata.modified().is_ok_and(|modified| modified < cutoff);
            if !expired {
                continue;
            }
            match tokio::fs::remove_file(&path).await {
                Ok(()) => removed += 1,
                Err(e) => warn!("Failed to remove expired report {}: {e}", path.display()),
            }
        }

        if removed > 0 {
            info!("Pruned {removed} expired report(s) from {}", self.dir.display());
        }
        Ok(removed)
    }
}
