use crate::cli::CheckParams;
use crate::error::UrlPackError;

pub async fn run_check(params: CheckParams) -> Result<(), UrlPackError> {
    let CheckParams { items } = params;

    for (index, item) in items.iter().enumerate() {
        tracing::info!(line = index + 1, url = %item.url, filename = %item.filename, "Valid item");
    }

    tracing::info!("{} items are valid", items.len());
    Ok(())
}
