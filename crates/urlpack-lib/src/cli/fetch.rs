use crate::batch::BatchOrchestrator;
use crate::cli::FetchParams;
use crate::error::UrlPackError;

pub async fn run_fetch(params: FetchParams) -> Result<(), UrlPackError> {
    let FetchParams {
        app_config,
        items,
        output_path,
        report_path,
    } = params;

    let orchestrator = BatchOrchestrator::from_config(&app_config)?;

    let requested = items.len();
    tracing::info!("Downloading {} files...", requested);
    let result = orchestrator
        .run(items, |percent| {
            tracing::info!(progress = percent, "Progress: {}%", percent);
        })
        .await?;

    tracing::info!("Writing archive to {}", output_path.display());
    tokio::fs::write(&output_path, &result.archive)
        .await
        .map_err(|e| UrlPackError::ArchiveWrite {
            path: output_path.clone(),
            reason: e.to_string(),
        })?;

    if let Some(report_path) = report_path {
        tracing::info!("Writing report to {}", report_path.display());
        result.report.save_to_file(&report_path).await?;
    }

    tracing::info!(
        "Archive created at {} with {} of {} files",
        output_path.display(),
        result.processed_count(),
        requested
    );
    Ok(())
}
