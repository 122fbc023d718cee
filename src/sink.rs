// Append-only result log
//
// Layout of one run:
//
//   === <title> ===
//   <blank>
//   文件路径: <path>
//   检测结果: <outcome>
//   ----------------------------------------
//   ...
//   <blank>
//   === 统计信息 ===
//   有咳嗽音频数量: <n>
//   无咳嗽音频数量: <n>
//   处理失败数量: <n>
//   === 检测完成 ===
//
// Every record is synced to disk before `append_record` returns.

use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::{Result, CoughScanError};

/// Outcome text for a payload that failed the encoding check
pub const ENCODING_FAILURE_TEXT: &str = "生成的 Base64 数据无效";

const SEPARATOR_WIDTH: usize = 40;
const COMPLETED_MARKER: &str = "=== 检测完成 ===";
const INTERRUPTED_MARKER: &str = "=== 检测中断 ===";

/// One processed file as written to the log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRecord {
    pub path: PathBuf,
    pub outcome: String,
}

impl ResultRecord {
    pub fn new(path: impl Into<PathBuf>, outcome: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            outcome: outcome.into(),
        }
    }

    pub fn render(&self) -> String {
        format!(
            "文件路径: {}\n检测结果: {}\n{}\n",
            self.path.display(),
            self.outcome,
            "-".repeat(SEPARATOR_WIDTH)
        )
    }
}

/// Per-run counters; every processed file increments exactly one
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStatistics {
    pub positive: usize,
    pub negative: usize,
    pub errors: usize,
}

impl RunStatistics {
    pub fn processed(&self) -> usize {
        self.positive + self.negative + self.errors
    }

    fn render(&self, interrupted: bool) -> String {
        format!(
            "\n=== 统计信息 ===\n有咳嗽音频数量: {}\n无咳嗽音频数量: {}\n处理失败数量: {}\n{}\n",
            self.positive,
            self.negative,
            self.errors,
            if interrupted { INTERRUPTED_MARKER } else { COMPLETED_MARKER }
        )
    }
}

/// Open handle on one run's result file
pub struct ResultSink {
    file: File,
    path: PathBuf,
    records: usize,
}

impl ResultSink {
    /// Truncate or create `path` and write the header.
    ///
    /// Failure here is fatal for the run.
    pub async fn open_run<P: AsRef<Path>>(path: P, title: &str) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                CoughScanError::Output(format!("Cannot create {}: {}", parent.display(), e))
            })?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .await
            .map_err(|e| CoughScanError::Output(format!("Cannot open {}: {}", path.display(), e)))?;

        let mut sink = Self { file, path, records: 0 };
        sink.write_durable(&format!("=== {} ===\n\n", title)).await?;

        debug!("Opened result file {}", sink.path.display());
        Ok(sink)
    }

    /// Append one record; it is on disk when this returns
    pub async fn append_record(&mut self, record: &ResultRecord) -> Result<()> {
        self.write_durable(&record.render()).await?;
        self.records += 1;
        Ok(())
    }

    /// Append the statistics block and close the file
    pub async fn close_run(mut self, stats: &RunStatistics, interrupted: bool) -> Result<PathBuf> {
        self.write_durable(&stats.render(interrupted)).await?;
        debug!("Closed result file {} after {} records", self.path.display(), self.records);
        Ok(self.path)
    }

    #[cfg(test)]
    pub(crate) fn records_written(&self) -> usize {
        self.records
    }

    async fn write_durable(&mut self, text: &str) -> Result<()> {
        self.file.write_all(text.as_bytes()).await?;
        self.file.flush().await?;
        self.file.sync_data().await?;
        Ok(())
    }
}
