//! Config subcommand handlers.

use serde::Serialize;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct Paths {
    config: String,
    data_dir: String,
    installation: String,
    settings: String,
}

fn render_toml(cfg: &Config) -> Result<String, CliError> {
    toml::to_string_pretty(cfg).map_err(|e| CliError::Config(e.to_string()))
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            let cfg = config::load_config()?;
            let resolved = config::resolve(global, &cfg)?;
            let paths = Paths {
                config: config::config_path().display().to_string(),
                data_dir: config::data_dir().display().to_string(),
                installation: resolved.installation,
                settings: resolved.settings_path.display().to_string(),
            };

            let out = output::render_single(
                &global.output,
                &paths,
                |p| {
                    [
                        format!("Config:       {}", p.config),
                        format!("Data dir:     {}", p.data_dir),
                        format!("Installation: {}", p.installation),
                        format!("Settings:     {}", p.settings),
                    ]
                    .join("\n")
                },
                |p| p.config.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            let out = match global.output {
                OutputFormat::Table | OutputFormat::Plain => render_toml(&cfg)?,
                _ => output::render_single(&global.output, &cfg, |_| String::new(), |_| String::new()),
            };
            output::print_output(out.trim_end(), global.quiet);
            Ok(())
        }

        ConfigCommand::Init { force } => {
            let path = config::config_path();
            if path.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }

            let written = config::save_config(&Config::default())?;
            if !global.quiet {
                eprintln!("Wrote {}", written.display());
            }
            Ok(())
        }
    }
}
