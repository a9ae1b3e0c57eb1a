use anyhow::Result;

use crate::{DisplayLabels, PixelBuffer};

/// Destination for rendered frames (a physical panel, a file, ...)
#[async_trait::async_trait]
pub trait DisplaySink: Send + Sync {
    async fn show(&mut self, frame: &PixelBuffer, labels: &DisplayLabels) -> Result<()>;
}
