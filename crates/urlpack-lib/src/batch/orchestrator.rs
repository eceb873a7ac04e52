use super::progress::ProgressTracker;
use super::state::{BatchState, StateMachine};
use super::types::{BatchResult, FailureRecord, ProcessedFile};
use crate::archive::{EntryNames, build_archive};
use crate::config::Config;
use crate::error::UrlPackError;
use crate::fetch::{
    AccessPath, FallbackRouter, Fetch, FetchResult, HttpFetcher, RetryPolicy, with_retry,
};
use crate::input::RequestedItem;
use crate::normalize::{normalize_content, resolve_filename};
use crate::report::BatchReport;
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use url::Url;

/// A fetched and normalized item whose archive name is not yet claimed.
struct ResolvedItem {
    url: Url,
    filename: String,
    content_type: String,
    bytes: Vec<u8>,
}

/// Runs every item of a batch through fetch, normalization and naming, then archives the successes.
#[derive(Debug)]
pub struct BatchOrchestrator<F> {
    router: FallbackRouter<F>,
    retry: RetryPolicy,
    concurrency: usize,
}

impl BatchOrchestrator<HttpFetcher> {
    pub fn from_config(config: &Config) -> Result<Self, UrlPackError> {
        let fetcher = HttpFetcher::new(&config.fetch)?;
        let access_paths = AccessPath::from_defs(&config.effective_access_paths())?;

        Ok(Self::new(
            FallbackRouter::new(fetcher, access_paths),
            RetryPolicy::from_config(&config.retry),
        )
        .with_concurrency(config.batch.concurrency))
    }
}

impl<F: Fetch> BatchOrchestrator<F> {
    pub fn new(router: FallbackRouter<F>, retry: RetryPolicy) -> Self {
        Self {
            router,
            retry,
            concurrency: 1,
        }
    }

    /// Number of items fetched at once. Results and progress are still reported in list order.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Processes `items` and returns the archive of every item that succeeded.
    ///
    /// `on_progress` receives the percentage of attempted items after each item, in list order.
    /// Per-item failures are recorded and never abort the batch. The batch fails only when
    /// nothing succeeded, with the first failure's reason.
    pub async fn run(
        &self,
        items: Vec<RequestedItem>,
        mut on_progress: impl FnMut(u8),
    ) -> Result<BatchResult, UrlPackError> {
        let total = items.len();
        let mut machine = StateMachine::new();
        let mut progress = ProgressTracker::new(total);
        let mut names = EntryNames::new();
        let mut processed = Vec::new();
        let mut failures = Vec::new();

        machine.advance(BatchState::Processing);
        tracing::info!(total, concurrency = self.concurrency, "Processing batch");

        let mut outcomes = stream::iter(items)
            .map(|item| self.process_item(item))
            .buffered(self.concurrency);
        while let Some(outcome) = outcomes.next().await {
            match outcome {
                Ok(resolved) => {
                    let filename = names.claim(&resolved.filename);
                    tracing::info!(url = %resolved.url, filename = %filename, "Processed");
                    processed.push(ProcessedFile::new(
                        resolved.bytes,
                        filename,
                        resolved.url,
                        resolved.content_type,
                    ));
                }
                Err(failure) => {
                    tracing::error!(url = %failure.item.url, reason = %failure.reason, "Download failed");
                    failures.push(failure);
                }
            }
            on_progress(progress.record_attempt());
        }

        log_summary(total, &processed, &failures);

        if processed.is_empty() {
            if let Some(first) = failures.first() {
                machine.advance(BatchState::Error);
                return Err(UrlPackError::BatchFailed {
                    reason: first.reason.clone(),
                });
            }
        }

        machine.advance(BatchState::Archiving);
        let report = BatchReport::new(total, &processed, &failures);
        let archive = match build_archive(processed) {
            Ok(archive) => archive,
            Err(err) => {
                machine.advance(BatchState::Error);
                return Err(err.into());
            }
        };
        machine.advance(BatchState::Complete);
        tracing::info!(
            state = %machine.state(),
            size = archive.len(),
            entries = report.processed_count,
            "Archive created"
        );

        Ok(BatchResult { archive, report })
    }

    async fn process_item(&self, item: RequestedItem) -> Result<ResolvedItem, FailureRecord> {
        tracing::debug!(url = %item.url, filename = %item.filename, "Downloading");
        let fetched = with_retry(&self.retry, || self.router.resolve(&item.url)).await;
        let FetchResult {
            bytes,
            content_type,
        } = match fetched {
            Ok(fetched) => fetched,
            Err(err) => {
                return Err(FailureRecord {
                    item,
                    reason: err.to_string(),
                });
            }
        };

        let declared = content_type.clone();
        let normalized =
            match tokio::task::spawn_blocking(move || normalize_content(bytes, &declared)).await {
                Ok(normalized) => normalized,
                Err(err) => {
                    return Err(FailureRecord {
                        item,
                        reason: format!("Image conversion task failed: {err}"),
                    });
                }
            };

        let filename = resolve_filename(&item.filename, &content_type, normalized.was_converted());
        Ok(ResolvedItem {
            url: item.url,
            filename,
            content_type,
            bytes: normalized.bytes,
        })
    }
}

fn log_summary(total: usize, processed: &[ProcessedFile], failures: &[FailureRecord]) {
    if failures.is_empty() {
        tracing::info!(processed = processed.len(), total, "All downloads succeeded");
        return;
    }

    tracing::warn!(
        processed = processed.len(),
        failed = failures.len(),
        total,
        failed_urls = %failures.iter().map(|failure| failure.item.url.as_str()).join(", "),
        "Download summary"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchError;
    use crate::fetch::testing::ScriptedFetcher;
    use std::io::{Cursor, Read};
    use std::time::Duration;

    fn item(url: &str, filename: &str) -> RequestedItem {
        RequestedItem::new(Url::parse(url).unwrap(), filename)
    }

    fn text(body: &str) -> Result<FetchResult, FetchError> {
        Ok(FetchResult::new(body.as_bytes().to_vec(), "text/plain"))
    }

    fn orchestrator(fetcher: ScriptedFetcher) -> BatchOrchestrator<ScriptedFetcher> {
        BatchOrchestrator::new(
            FallbackRouter::direct_only(fetcher),
            RetryPolicy::new(2, Duration::from_millis(10)),
        )
    }

    fn entry_names(archive: &[u8]) -> Vec<String> {
        let zip = zip::ZipArchive::new(Cursor::new(archive)).unwrap();
        zip.file_names().map(str::to_string).sorted().collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_item_is_recorded_and_batch_continues() {
        let fetcher = ScriptedFetcher::new()
            .respond("https://example.com/1", text("one"))
            .respond("https://example.com/2", Err(FetchError::status(500)))
            .respond("https://example.com/3", text("three"));
        let orchestrator = orchestrator(fetcher);
        let items = vec![
            item("https://example.com/1", "one"),
            item("https://example.com/2", "two"),
            item("https://example.com/3", "three.txt"),
        ];

        let result = orchestrator.run(items, |_| {}).await.unwrap();

        assert_eq!(result.processed_count(), 2);
        assert_eq!(result.failed_count(), 1);
        assert_eq!(entry_names(&result.archive), vec!["one.plain", "three.txt"]);
        assert_eq!(
            result.report.failures[0].reason,
            "Failed to download file: Download error: 500 Internal Server Error"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_every_item_is_retried_from_the_top() {
        let fetcher = ScriptedFetcher::new().respond("https://example.com/ok", text("ok"));
        let orchestrator = orchestrator(fetcher);

        orchestrator
            .run(
                vec![
                    item("https://example.com/missing", "missing"),
                    item("https://example.com/ok", "ok.txt"),
                ],
                |_| {},
            )
            .await
            .unwrap();

        let calls = orchestrator.router_calls();
        assert_eq!(
            calls.iter().filter(|c| *c == "https://example.com/missing").count(),
            3
        );
        assert_eq!(calls.last().map(String::as_str), Some("https://example.com/ok"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_failures_fail_batch_with_first_reason() {
        let fetcher = ScriptedFetcher::new()
            .respond("https://example.com/1", Err(FetchError::Timeout))
            .respond("https://example.com/2", Err(FetchError::status(404)));
        let orchestrator = orchestrator(fetcher);

        let err = orchestrator
            .run(
                vec![
                    item("https://example.com/1", "a"),
                    item("https://example.com/2", "b"),
                ],
                |_| {},
            )
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Failed to download any files. Error for first file: Failed to download file: Download timeout exceeded"
        );
    }

    #[tokio::test]
    async fn test_empty_batch_fails_in_archive_builder() {
        let orchestrator = orchestrator(ScriptedFetcher::new());
        let mut reported = Vec::new();

        let err = orchestrator
            .run(Vec::new(), |percent| reported.push(percent))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            UrlPackError::Archive(crate::archive::ArchiveError::EmptyInput)
        ));
        assert!(reported.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_is_reported_once_per_item_in_order() {
        let fetcher = ScriptedFetcher::new()
            .respond("https://example.com/1", text("1"))
            .respond("https://example.com/3", text("3"));
        let orchestrator = orchestrator(fetcher);
        let items = (1..=4)
            .map(|n| item(&format!("https://example.com/{n}"), &format!("f{n}.txt")))
            .collect();
        let mut reported = Vec::new();

        orchestrator
            .run(items, |percent| reported.push(percent))
            .await
            .unwrap();

        assert_eq!(reported, vec![25, 50, 75, 100]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_run_keeps_list_order() {
        let fetcher = (1..=6).fold(ScriptedFetcher::new(), |fetcher, n| {
            fetcher.respond(&format!("https://example.com/{n}"), text(&n.to_string()))
        });
        let orchestrator = orchestrator(fetcher).with_concurrency(3);
        let items = (1..=6)
            .map(|n| item(&format!("https://example.com/{n}"), &format!("f{n}.txt")))
            .collect();
        let mut reported = Vec::new();

        let result = orchestrator
            .run(items, |percent| reported.push(percent))
            .await
            .unwrap();

        assert_eq!(reported, vec![17, 33, 50, 67, 83, 100]);
        let names: Vec<_> = result
            .report
            .processed
            .iter()
            .map(|entry| entry.filename.as_str())
            .collect();
        assert_eq!(names, vec!["f1.txt", "f2.txt", "f3.txt", "f4.txt", "f5.txt", "f6.txt"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_names_are_disambiguated() {
        let fetcher = ScriptedFetcher::new()
            .respond("https://example.com/a", text("first"))
            .respond("https://example.com/b", text("second"));
        let orchestrator = orchestrator(fetcher);

        let result = orchestrator
            .run(
                vec![
                    item("https://example.com/a", "same.txt"),
                    item("https://example.com/b", "same.txt"),
                ],
                |_| {},
            )
            .await
            .unwrap();

        let mut zip = zip::ZipArchive::new(Cursor::new(result.archive)).unwrap();
        let mut second = String::new();
        zip.by_name("same-2.txt")
            .unwrap()
            .read_to_string(&mut second)
            .unwrap();
        assert_eq!(second, "second");
        assert_eq!(zip.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_images_are_converted_and_renamed() {
        let mut jpeg = Vec::new();
        image::DynamicImage::ImageRgb8(image::RgbImage::new(2, 2))
            .write_to(&mut Cursor::new(&mut jpeg), image::ImageFormat::Jpeg)
            .unwrap();
        let fetcher = ScriptedFetcher::new().respond(
            "https://example.com/photo.jpg",
            Ok(FetchResult::new(jpeg, "image/jpeg")),
        );
        let orchestrator = orchestrator(fetcher);

        let result = orchestrator
            .run(vec![item("https://example.com/photo.jpg", "holiday.jpg")], |_| {})
            .await
            .unwrap();

        let entry = &result.report.processed[0];
        assert_eq!(entry.filename, "holiday.png");
        assert_eq!(entry.content_type, "image/jpeg");
        let mut zip = zip::ZipArchive::new(Cursor::new(result.archive)).unwrap();
        let mut png = Vec::new();
        zip.by_name("holiday.png").unwrap().read_to_end(&mut png).unwrap();
        assert_eq!(image::guess_format(&png).unwrap(), image::ImageFormat::Png);
    }

    impl BatchOrchestrator<ScriptedFetcher> {
        fn router_calls(&self) -> Vec<String> {
            self.router.fetcher().calls()
        }
    }
}
