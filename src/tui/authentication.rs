use cal_board::storage::config::{Config, ConfigError, Credential, CLIENT_ID_VAR, CLIENT_SECRET_VAR};

/// Loads the config and credentials, printing setup instructions when either is incomplete.
pub fn check_setup() -> Result<(Config, Credential), Box<dyn std::error::Error>> {
    let config = Config::load_or_create()?;

    if let Err(e) = config.validate() {
        println!("Configuration incomplete. Please edit the config file at:");
        println!("{}", Config::config_path().display());
        println!("\nYou need to set:");
        println!("  - api.tenant_id: The tenant your events live under");
        println!("  - api.base_url: The events service host (defaults to the public instance)");
        return Err(e.into());
    }

    match Credential::from_env() {
        Ok(credential) => {
            tracing::info!("Loaded credentials from the environment");
            Ok((config, credential))
        }
        Err(e @ ConfigError::MissingEnv(_)) => {
            println!("Missing API credentials.");
            println!("\nExport them, or put them in a .env file next to where you run cal-board:");
            println!("  {}=<your client id>", CLIENT_ID_VAR);
            println!("  {}=<your client secret>", CLIENT_SECRET_VAR);
            Err(e.into())
        }
        Err(e) => Err(e.into()),
    }
}
