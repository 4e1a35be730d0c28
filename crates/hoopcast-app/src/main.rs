// Hoopcast entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, keep stdout for the run summary)
// 2. Load settings
// 3. Ensure a league file exists, then load it with overrides applied
// 4. Open database
// 5. Discover partitions
// 6. Run, store and export every partition
// 7. Report; exit non-zero if any partition failed

use hoopcast_app::partitions;
use hoopcast_app::runner;
use hoopcast_app::settings;
use hoopcast_core::db;

use anyhow::Context;
use tracing::info;

fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;
    info!("Hoopcast starting up");

    // 2. Load settings
    let settings = settings::load_settings().context("failed to load settings")?;
    info!(
        "Settings loaded: data={}, output={}",
        settings.data_dir.display(),
        settings.output_dir.display()
    );

    // 3. Scoring format
    if settings::ensure_league_file(&settings.league_path)? {
        info!("Wrote default league file to {}", settings.league_path.display());
    }
    let config = runner::load_effective_config(&settings)?;
    info!(
        "Config loaded: {} teams, ${} salary cap, {} categories, {} blacklisted",
        config.fantasy_teams,
        config.salary_cap,
        config.categories.len(),
        config.blacklist.len()
    );

    // 4. Open database
    let db = db::Database::open(&settings.db_path).context("failed to open database")?;
    info!("Database opened at {}", settings.db_path);

    // 5. Discover partitions
    let partitions = partitions::discover(&settings.data_dir)?;
    info!("Found {} partitions", partitions.len());

    // 6. Run
    let summary = runner::run_all(&partitions, &config, &db, &settings.output_dir);

    // 7. Report
    for key in &summary.succeeded {
        println!("ok      {key}");
    }
    for (key, reason) in &summary.failed {
        println!("FAILED  {key}: {reason}");
    }
    info!(
        "Hoopcast finished: {} succeeded, {} failed",
        summary.succeeded.len(),
        summary.failed.len()
    );

    if !summary.is_success() {
        anyhow::bail!("{} of {} partitions failed", summary.failed.len(), partitions.len());
    }
    Ok(())
}

/// Initialize tracing to log to a file under `logs/`.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("hoopcast.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new("hoopcast=info,hoopcast_app=info,hoopcast_core=info,warn")
            }),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
