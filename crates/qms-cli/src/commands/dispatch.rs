use qms_config::QmsConfig;

use crate::cli::{Commands, GlobalFlags};
use crate::commands;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    config: &QmsConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Progress(args) => commands::progress::handle(&args, config, flags).await,
        Commands::Score(args) => commands::score::handle(&args, config, flags).await,
        Commands::Answer(args) => commands::answer::handle(&args, config, flags).await,
    }
}
