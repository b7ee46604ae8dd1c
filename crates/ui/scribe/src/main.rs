use std::sync::Arc;

use clap::Parser;
use color_eyre::Result;
use form_api::HttpFormService;
use scribe::{
    app::App,
    cli::{Cli, Cmd},
    config::Config,
    fetch::fetch_schema_json,
};

#[tokio::main]
pub async fn main() -> Result<()> {
    scribe::errors::init()?;
    scribe::logging::init()?;

    let args = Cli::parse();
    let mut config = Config::new()?;
    match args.command() {
        Cmd::Run(run) => {
            config.apply_cli(&run)?;
            let service = HttpFormService::new(config.api.base_url.clone())?;
            let mut app = App::new(config, Arc::new(service));
            app.run().await?;
        }
        Cmd::Fetch {
            roll_number,
            name,
            base_url,
        } => {
            let service = HttpFormService::new(base_url.unwrap_or(config.api.base_url))?;
            println!("{}", fetch_schema_json(&service, &roll_number, &name).await?);
        }
    }
    Ok(())
}
