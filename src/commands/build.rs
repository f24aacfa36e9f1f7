//! Generate static files

use anyhow::Result;

use crate::generator::Generator;
use crate::Stationary;

/// Build the site into its (absent) output directory
pub fn run(site: &Stationary) -> Result<()> {
    let start = std::time::Instant::now();

    let generator = Generator::new(site)?;
    let summary = generator.generate()?;

    tracing::info!(
        "Built {} posts, {} pages and {} static files into {:?}",
        summary.posts,
        summary.pages,
        summary.assets,
        site.public_dir
    );
    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(())
}

/// Clean, then build
pub fn rebuild(site: &Stationary) -> Result<()> {
    super::clean::run(site)?;
    run(site)
}
