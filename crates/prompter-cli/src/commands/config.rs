use anyhow::Result;

use prompter_core::AppConfig;

/// Print the config location and effective settings, or write the defaults
pub fn run(config: &AppConfig, init: bool) -> Result<()> {
    let path = AppConfig::config_path();

    if init {
        if path.exists() {
            println!("Config already exists at {}", path.display());
            return Ok(());
        }
        AppConfig::default().save()?;
        println!("Wrote default config to {}", path.display());
        return Ok(());
    }

    if path.exists() {
        println!("# {}", path.display());
    } else {
        println!("# {} (not found, showing defaults)", path.display());
        println!("# run `prompter config --init` to create it");
    }
    println!();
    print!("{}", config.to_toml()?);

    Ok(())
}
