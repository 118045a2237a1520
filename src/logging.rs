use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Map the `-v` count to a max level. Quiet by default so nothing is written
/// while the alternate screen is active.
pub fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

pub fn init(verbosity: u8) -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(level_for(verbosity))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
