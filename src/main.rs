use std::io::Write;

use anyhow::Result;
use clap::Parser;
use device_snapshot::cli::commands::{Cli, Commands, SettingsArgs};
use device_snapshot::cli::runtime::{SHUTDOWN_GRACE, block_on_with_grace};
use device_snapshot::cli::DeviceCommandHandler;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    block_on_with_grace(run(cli), SHUTDOWN_GRACE)?
}

async fn run(cli: Cli) -> Result<()> {
    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Commands::Show { detailed, settings } => {
            let handler = DeviceCommandHandler::from_args(&settings)?;
            handler.handle_show(detailed, &mut stdout).await?;
        }
        Commands::Upload {
            output,
            pretty,
            settings,
        } => {
            let handler = DeviceCommandHandler::from_args(&settings)?;
            handler
                .handle_upload(output.as_deref(), pretty, &mut stdout)
                .await?;
        }
        Commands::Catalog => {
            let handler = DeviceCommandHandler::from_args(&SettingsArgs::default())?;
            handler.handle_catalog(&mut stdout)?;
        }
    }

    stdout.flush()?;
    Ok(())
}
