use crate::core::{Pipeline, ProgressNotifier};
use crate::domain::model::{ParsedEvent, ScheduleImage};
use crate::utils::error::Result;

pub struct ScheduleEngine<P: Pipeline, N: ProgressNotifier> {
    pipeline: P,
    notifier: N,
}

impl<P: Pipeline, N: ProgressNotifier> ScheduleEngine<P, N> {
    pub fn new(pipeline: P, notifier: N) -> Self {
        Self { pipeline, notifier }
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// 依序執行各階段；任何一步失敗整個執行就失敗，不回傳部分結果。
    pub async fn run(&self, image: &ScheduleImage) -> Result<Vec<ParsedEvent>> {
        self.run_reporting(image, &self.notifier).await
    }

    /// Like [`run`](Self::run), but progress and failure messages go to
    /// `notifier` instead of the engine's own notifier.
    pub async fn run_reporting<M: ProgressNotifier + ?Sized>(
        &self,
        image: &ScheduleImage,
        notifier: &M,
    ) -> Result<Vec<ParsedEvent>> {
        match self.run_stages(image, notifier).await {
            Ok(events) => Ok(events),
            Err(e) => {
                tracing::error!(
                    "❌ Schedule parsing failed: {} (Category: {:?}, Severity: {:?})",
                    e,
                    e.category(),
                    e.severity()
                );
                notifier.error(&e.user_friendly_message());
                Err(e)
            }
        }
    }

    async fn run_stages<M: ProgressNotifier + ?Sized>(
        &self,
        image: &ScheduleImage,
        notifier: &M,
    ) -> Result<Vec<ParsedEvent>> {
        notifier.info("finding events...");
        let grid = self.pipeline.locate(image).await?;
        notifier.info(&format!("found {} events", grid.regions.len()));

        notifier.info("Figuring out the dates...");
        let header_text = self.pipeline.recognize_header(image, &grid).await?;
        notifier.info(&format!("Found first date \"{}\"", header_text));

        notifier.info("generating google calendar urls");
        let events = self.pipeline.build_events(&grid, &header_text).await?;

        notifier.info("Done parsing");
        tracing::info!("✅ Parsed {} events", events.len());
        Ok(events)
    }
}
