use anyhow::Result;
use std::fs::{self, create_dir_all};
use std::path::{Path, PathBuf};
use wxbar_core::{DisplayLabels, DisplaySink, PixelBuffer};

/// Writes each frame as `chart.ppm` plus `labels.json` into a directory.
///
/// Files are written to a temporary name and renamed so a reader never
/// sees a half-written frame.
pub struct FsSink {
    dir: PathBuf,
}

impl FsSink {
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn chart_path(&self) -> PathBuf {
        self.dir.join("chart.ppm")
    }

    pub fn labels_path(&self) -> PathBuf {
        self.dir.join("labels.json")
    }

    fn replace(&self, path: &Path, contents: &[u8]) -> Result<()> {
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl DisplaySink for FsSink {
    async fn show(&mut self, frame: &PixelBuffer, labels: &DisplayLabels) -> Result<()> {
        self.replace(&self.chart_path(), &frame.to_ppm())?;
        let json = serde_json::to_vec_pretty(labels)?;
        self.replace(&self.labels_path(), &json)?;
        Ok(())
    }
}

/// Logs the text labels; useful when no panel is attached
pub struct LogSink;

#[async_trait::async_trait]
impl DisplaySink for LogSink {
    async fn show(&mut self, frame: &PixelBuffer, labels: &DisplayLabels) -> Result<()> {
        tracing::info!(
            temperature = %labels.temperature,
            status = %labels.status,
            rain_events = labels.rain_events.len(),
            width = frame.width(),
            height = frame.height(),
            "frame ready"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wxbar_core::{palette, History};

    #[tokio::test]
    async fn writes_chart_and_labels() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = FsSink::new(dir.path().join("display")).unwrap();
        let history = History::new();
        let frame = wxbar_core::render(&history, 288, 40);
        let labels = DisplayLabels::from_history(&history);

        sink.show(&frame, &labels).await.unwrap();

        let ppm = std::fs::read(sink.chart_path()).unwrap();
        assert!(ppm.starts_with(b"P6\n288 40\n255\n"));
        assert_eq!(ppm.len(), "P6\n288 40\n255\n".len() + 288 * 40 * 3);

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(sink.labels_path()).unwrap()).unwrap();
        assert_eq!(json["status"], "Update:-");
        assert_eq!(json["temperature"]["tens"], 0);
        assert!(!dir.path().join("display/chart.tmp").exists());
    }

    #[tokio::test]
    async fn overwrites_previous_frame() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = FsSink::new(dir.path()).unwrap();
        let labels = DisplayLabels::from_history(&History::new());

        sink.show(&PixelBuffer::filled(4, 4, palette::RAIN), &labels)
            .await
            .unwrap();
        sink.show(&PixelBuffer::filled(2, 2, palette::BACKGROUND), &labels)
            .await
            .unwrap();

        let ppm = std::fs::read(sink.chart_path()).unwrap();
        assert!(ppm.starts_with(b"P6\n2 2\n255\n"));
    }

    #[tokio::test]
    async fn log_sink_accepts_frames() {
        let labels = DisplayLabels::from_history(&History::new());
        let frame = PixelBuffer::filled(1, 1, palette::BACKGROUND);

        assert!(LogSink.show(&frame, &labels).await.is_ok());
    }
}
