use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::codec::{Base64Codec, PayloadCodec, prepare_payload};
use crate::config::{PayloadCheck, RunConfig};
use crate::discovery::{AudioItem, discover_audio_files};
use crate::error::{Result, CoughScanError};
use crate::inference::{ClassificationResponse, InferenceClient};
use crate::sink::{ENCODING_FAILURE_TEXT, ResultRecord, ResultSink, RunStatistics};
use crate::strategy::{Judgment, Strategy};

/// Run-level settings for the driver
#[derive(Debug, Clone)]
pub struct DriverOptions {
    /// Pause before every file, regardless of earlier outcomes
    pub request_delay: Duration,
    pub payload_check: PayloadCheck,
    pub extensions: Vec<String>,
    pub show_progress: bool,
}

impl DriverOptions {
    pub fn from_config(run: &RunConfig) -> Self {
        Self {
            request_delay: run.request_delay(),
            payload_check: run.payload_check,
            extensions: run.extensions.clone(),
            show_progress: false,
        }
    }
}

/// Where one file ended up
#[derive(Debug)]
pub enum ItemOutcome {
    /// A response was received; the judgment may still be Unparseable
    Classified {
        judgment: Judgment,
        response: ClassificationResponse,
    },
    /// The encoded payload failed its check; the service was not called
    EncodingFailed,
    /// Reading the file or the service call failed
    Failed(CoughScanError),
}

impl RunStatistics {
    /// Count one outcome. Exactly one counter moves per call.
    pub fn tally(&mut self, outcome: &ItemOutcome) {
        match outcome {
            ItemOutcome::Classified { judgment: Judgment::Positive, .. } => self.positive += 1,
            ItemOutcome::Classified { judgment: Judgment::Negative, .. } => self.negative += 1,
            ItemOutcome::Classified { judgment: Judgment::Unparseable, .. }
            | ItemOutcome::EncodingFailed
            | ItemOutcome::Failed(_) => self.errors += 1,
        }
    }
}

/// Result of a whole run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub stats: RunStatistics,
    /// Files found by discovery
    pub discovered: usize,
    /// True when the stop flag cut the run short
    pub interrupted: bool,
    pub output: PathBuf,
}

/// Batch classification driver: discovery, encoding, classification,
/// judgment and persistence, one file at a time
pub struct Driver {
    client: Box<dyn InferenceClient>,
    strategy: Box<dyn Strategy>,
    codec: Box<dyn PayloadCodec>,
    options: DriverOptions,
    stop: Arc<AtomicBool>,
}

impl Driver {
    pub fn new(
        client: Box<dyn InferenceClient>,
        strategy: Box<dyn Strategy>,
        options: DriverOptions,
    ) -> Self {
        Self {
            client,
            strategy,
            codec: Box::new(Base64Codec),
            options,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_codec(mut self, codec: Box<dyn PayloadCodec>) -> Self {
        self.codec = codec;
        self
    }

    /// Flag checked before each file; setting it ends the run after the
    /// file in flight has been recorded
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Classify every audio file under `root`, writing results to `output`
    pub async fn run<P: AsRef<Path>, Q: AsRef<Path>>(&self, root: P, output: Q) -> Result<RunSummary> {
        let root = root.as_ref();
        let items = discover_audio_files(root, &self.options.extensions)?;

        info!("Found {} audio files under {}", items.len(), root.display());
        info!("Strategy: {}", self.strategy.name());

        let mut sink = ResultSink::open_run(output.as_ref(), self.strategy.report_title()).await?;
        let mut stats = RunStatistics::default();
        let mut interrupted = false;

        let progress = self.progress_bar(items.len());

        for (idx, item) in items.iter().enumerate() {
            if self.stop.load(Ordering::SeqCst) {
                warn!("Stop requested, skipping remaining {} files", items.len() - idx);
                interrupted = true;
                break;
            }

            info!("Processing [{}/{}]: {} ({} bytes)", idx + 1, items.len(), item.path.display(), item.size);
            progress.set_message(item.path.display().to_string());

            let outcome = self.process_item(item).await;
            stats.tally(&outcome);
            debug_assert_eq!(stats.processed(), idx + 1);

            let record = ResultRecord::new(&item.path, self.outcome_text(&outcome));
            sink.append_record(&record).await?;
            progress.inc(1);
        }

        progress.finish_and_clear();
        let output = sink.close_run(&stats, interrupted).await?;

        info!("Positive: {}, negative: {}, failed: {}", stats.positive, stats.negative, stats.errors);
        info!("Results written to {}", output.display());

        Ok(RunSummary {
            stats,
            discovered: items.len(),
            interrupted,
            output,
        })
    }

    /// Drive one file to a terminal outcome. Never returns an error:
    /// every failure becomes `ItemOutcome::Failed` or `EncodingFailed`.
    pub async fn process_item(&self, item: &AudioItem) -> ItemOutcome {
        if !self.options.request_delay.is_zero() {
            tokio::time::sleep(self.options.request_delay).await;
        }

        let bytes = match tokio::fs::read(&item.path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Failed to read {}: {}", item.path.display(), e);
                return ItemOutcome::Failed(CoughScanError::Io(e));
            }
        };

        let Some(payload) = prepare_payload(self.codec.as_ref(), item, &bytes, self.options.payload_check) else {
            warn!("Encoded payload for {} failed validation ({} bytes)", item.path.display(), bytes.len());
            return ItemOutcome::EncodingFailed;
        };
        drop(bytes);

        match self.client.classify(&payload, self.strategy.instruction()).await {
            Ok(response) => {
                let judgment = self.strategy.extract_judgment(&response.text);
                info!("{} => {}", item.path.display(), judgment);
                ItemOutcome::Classified { judgment, response }
            }
            Err(e) => {
                warn!("Failed to process {}: {}", item.path.display(), e);
                ItemOutcome::Failed(e)
            }
        }
    }

    /// Text stored in the record's 检测结果 field
    pub fn outcome_text(&self, outcome: &ItemOutcome) -> String {
        match outcome {
            ItemOutcome::Classified { judgment, response } => {
                self.strategy.record_style().render(*judgment, &response.text)
            }
            ItemOutcome::EncodingFailed => ENCODING_FAILURE_TEXT.to_string(),
            ItemOutcome::Failed(e) => format!("Error: {}", e),
        }
    }

    fn progress_bar(&self, total: usize) -> ProgressBar {
        if !self.options.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {wide_msg}")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb
    }
}
