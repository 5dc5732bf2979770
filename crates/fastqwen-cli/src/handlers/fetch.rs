//! `fastqwen fetch`.

use anyhow::Result;

use fastqwen_core::ModelFetcher;
use fastqwen_runtime::HfModelFetcher;

use crate::bootstrap::model_settings;
use crate::commands::ModelArgs;

/// Make sure the artifact is on disk, then print where it is.
pub async fn execute(args: &ModelArgs) -> Result<()> {
    let settings = model_settings(args)?;

    let fetcher = HfModelFetcher::new().with_progress(true);
    let path = fetcher
        .fetch(&settings.model_source(), &settings.models_dir)
        .await?;

    println!("{}", path.display());
    Ok(())
}
