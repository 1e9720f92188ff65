// CLI binary entry point for tagwright

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::commands;
use cli::{Commands, Config, OutputFormatter};
use std::process;

fn main() {
    let config = Config::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.log_filter()))
        .format_timestamp(None)
        .init();

    if let Err(e) = run(&config) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(config: &Config) -> Result<()> {
    let formatter = OutputFormatter::new(config.format, config.quiet);
    let options = config.codec_options();

    match &config.command {
        Commands::Read { files, output } => {
            commands::command_read(files, output.as_deref(), &formatter, options)
        }
        Commands::Frames { file } => commands::command_frames(file, &formatter, options),
        Commands::Detect { files } => commands::command_detect(files, &formatter, options),
        Commands::Scan {
            directory,
            pattern,
            skip_album_dirs,
            csv,
        } => commands::command_scan(
            directory,
            pattern,
            *skip_album_dirs,
            *csv,
            &formatter,
            options,
        ),
        Commands::Set {
            file,
            frames,
            remove,
            output,
        } => commands::command_set(file, frames, remove, output, &formatter, options),
        Commands::V1FromV2 { files } => commands::command_v1_from_v2(files, &formatter, options),
        Commands::Info { files } => commands::command_info(files, &formatter, options),
    }
}
