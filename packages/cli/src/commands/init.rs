use anyhow::Result;
use arbor_reconciler::{ReconcilerConfig, StaleAttributes, DEFAULT_CONFIG_NAME};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::Path;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Yield once the deadline reports less than this many milliseconds
    #[arg(long, default_value = "1.0")]
    pub yield_threshold: f64,

    /// Leave attributes dropped from props on the host node
    #[arg(long)]
    pub retain_stale_attributes: bool,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &Path) -> Result<()> {
    let config_path = cwd.join(DEFAULT_CONFIG_NAME);

    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    let config = ReconcilerConfig {
        yield_threshold: args.yield_threshold,
        stale_attributes: if args.retain_stale_attributes {
            StaleAttributes::Retain
        } else {
            StaleAttributes::Clear
        },
    };

    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;

    println!(
        "  {} Created {}",
        "✓".green(),
        DEFAULT_CONFIG_NAME.bright_white()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_writes_loadable_config() {
        let dir = std::env::temp_dir().join(format!("arbor-init-test-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        let args = InitArgs {
            yield_threshold: 2.5,
            retain_stale_attributes: true,
            force: false,
        };
        init(args, &dir).unwrap();

        let config = ReconcilerConfig::load(&dir).unwrap();
        assert_eq!(config.yield_threshold, 2.5);
        assert_eq!(config.stale_attributes, StaleAttributes::Retain);

        fs::remove_dir_all(&dir).unwrap();
    }
}
