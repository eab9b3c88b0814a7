use anyhow::Result;

use faveicon_core::AppConfig;

pub fn run(config: &AppConfig, init: bool) -> Result<()> {
    let path = AppConfig::config_path();

    if init {
        if path.exists() {
            println!("Config already exists at {}", path.display());
            println!("Remove it first to regenerate the defaults.");
            return Ok(());
        }
        AppConfig::default().save()?;
        println!("Wrote default config to {}", path.display());
        return Ok(());
    }

    let origin = if path.exists() { "" } else { " (not found, using defaults)" };
    println!("Config: {}{}\n", path.display(), origin);
    print!("{}", config.to_toml()?);

    Ok(())
}
