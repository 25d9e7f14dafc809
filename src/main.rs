use std::process::exit;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use famsync::api_store::StoreClient;
use famsync::cli::{build_cli, Invocation};
use famsync::commands::{self, Context};
use famsync::config::Config;
use famsync::utils::{AssumeYes, Confirm, EnterKey, StdinConfirm};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "famsync=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let matches = build_cli().get_matches();
    let invocation = Invocation::build(&matches).unwrap_or_else(|err| {
        eprintln!("{}", err);
        exit(1);
    });

    let config = Config::from_env().unwrap_or_else(|err| {
        eprintln!("{}", err);
        exit(1);
    });

    let store = StoreClient::new(&config).unwrap_or_else(|err| {
        eprintln!("Failed to create store client due to error = {}", err);
        exit(1);
    });
    tracing::debug!(api_url = %store.base_url(), "store client ready");

    let confirm: &dyn Confirm = if invocation.assume_yes { &AssumeYes } else { &StdinConfirm };
    let ctx = Context { store: &store, confirm, config: &config, stop: &EnterKey };

    let result = commands::run(invocation.command, &ctx).await;

    println!();
    match result {
        Ok(_) => exit(0),
        Err(err) => {
            eprintln!("❌  Failed due to error='{}'", err);
            exit(1);
        }
    }
}
