use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use futures::FutureExt;

use jugaad_client::{
    AlertRequest, BackendClient, DeleteItemRequest, FetchCoordinator, ItemQuery, ItemsQuery,
    Prerequisites, SignupRequest, TrackedItem,
};
use jugaad_core::{load_app_config, AppConfig, Environment, Identity, LocationResult};
use jugaad_location::{
    ConfiguredPosition, IpLookupClient, LocationResolver, Resolution, ReverseGeocoder,
};

#[derive(Debug, Parser)]
#[command(name = "jugaad")]
#[command(about = "Jugaad price-alert client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve the delivery location (device position, IP fallback, pincode).
    Resolve,
    /// List tracked items for the signed-in user.
    Items(IdentityArgs),
    /// Show one item with its price history.
    Item { item_id: String },
    /// Create a price alert for a product URL.
    Add {
        #[command(flatten)]
        identity: IdentityArgs,
        url: String,
        #[arg(long, default_value_t = 0.0)]
        min_price: f64,
        #[arg(long)]
        max_price: f64,
        #[arg(long, default_value_t = 0.0)]
        min_offer: f64,
        #[arg(long, default_value_t = 0.0)]
        max_offer: f64,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Delete a tracked item.
    Delete {
        #[command(flatten)]
        identity: IdentityArgs,
        item_id: String,
    },
    /// Register the signed-in user with the backend.
    Signup(IdentityArgs),
    /// Ask the recipe assistant for a meal plan.
    Plan { query: String },
}

#[derive(Debug, Args)]
struct IdentityArgs {
    #[arg(long, env = "JUGAAD_UID")]
    uid: String,
    #[arg(long, env = "JUGAAD_EMAIL")]
    email: String,
    #[arg(long = "username", env = "JUGAAD_USERNAME")]
    display_name: String,
}

impl From<IdentityArgs> for Identity {
    fn from(args: IdentityArgs) -> Self {
        Identity {
            uid: args.uid,
            email: args.email,
            display_name: args.display_name,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_app_config().context("loading configuration")?;
    init_tracing(&config);

    let cli = Cli::parse();
    match cli.command {
        Commands::Resolve => {
            let location = resolve_location(&config).await?;
            println!("{}", serde_json::to_string_pretty(&location)?);
        }
        Commands::Items(identity) => run_items(&config, identity.into()).await?,
        Commands::Item { item_id } => {
            let location = resolve_location(&config).await?;
            let client = backend_client(&config)?;
            let detail = client.get_item(&ItemQuery::new(&item_id, &location)).await?;
            println!("{}", serde_json::to_string_pretty(&detail)?);
        }
        Commands::Add {
            identity,
            url,
            min_price,
            max_price,
            min_offer,
            max_offer,
            notes,
        } => {
            let location = resolve_location(&config).await?;
            let identity: Identity = identity.into();
            let client = backend_client(&config)?;
            client
                .add_item(&AlertRequest {
                    uid: identity.uid,
                    email: identity.email,
                    username: identity.display_name,
                    url,
                    min_price,
                    max_price,
                    min_offer,
                    max_offer,
                    notes,
                    pincode: location.pincode,
                })
                .await?;
            println!("alert created");
        }
        Commands::Delete { identity, item_id } => {
            let client = backend_client(&config)?;
            client
                .delete_item(&DeleteItemRequest {
                    uid: identity.uid,
                    item_id,
                })
                .await?;
            println!("item deleted");
        }
        Commands::Signup(identity) => {
            let location = resolve_location(&config).await?;
            let client = backend_client(&config)?;
            client
                .signup(&SignupRequest::new(&identity.into(), &location))
                .await?;
            println!("signed up");
        }
        Commands::Plan { query } => {
            let client = backend_client(&config)?;
            let plan = client.plan(&query).await?;
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
    }

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(ansi_output(&config.env))
        .init();
    tracing::debug!(env = %config.env, "tracing initialized");
}

/// Colored output is for terminals; production logs go to collectors that
/// should not see ANSI escapes.
fn ansi_output(env: &Environment) -> bool {
    !matches!(env, Environment::Production)
}

fn backend_client(config: &AppConfig) -> anyhow::Result<BackendClient> {
    Ok(BackendClient::new(
        &config.backend_base_url,
        config.request_timeout_secs,
        &config.user_agent,
    )?)
}

/// Runs the full fallback chain once and surfaces the degraded-accuracy
/// advisory (when present) as a warning, without failing the command.
async fn resolve_location(config: &AppConfig) -> anyhow::Result<LocationResult> {
    let resolver = LocationResolver::new(
        ConfiguredPosition::from(config.device_position),
        IpLookupClient::new(
            &config.ip_lookup_url,
            config.request_timeout_secs,
            &config.user_agent,
        )?,
        ReverseGeocoder::new(
            &config.backend_base_url,
            config.request_timeout_secs,
            &config.user_agent,
        )?,
        config.geolocation_timeout_ms,
    );

    let Resolution { location, advisory } = resolver.resolve().await;
    if let Some(advisory) = advisory {
        tracing::warn!("{}", advisory.message);
        eprintln!("warning: {}", advisory.message);
    }
    tracing::info!(
        pincode = location.pincode.as_deref().unwrap_or("unknown"),
        has_coordinates = location.coordinates().is_some(),
        "location resolution finished"
    );
    Ok(location)
}

/// Lists tracked items through the dependent-fetch coordinator, gated on
/// identity and resolved location exactly as the dashboard view is.
async fn run_items(config: &AppConfig, identity: Identity) -> anyhow::Result<()> {
    let location = resolve_location(config).await?;
    let client = Arc::new(backend_client(config)?);

    let (mut prereqs, prereq_rx) = Prerequisites::channel();
    let fetch = {
        let client = Arc::clone(&client);
        move |(identity, location): (Identity, LocationResult)| {
            let client = Arc::clone(&client);
            async move {
                client
                    .get_items(&ItemsQuery::new(&identity, &location))
                    .await
            }
            .boxed()
        }
    };
    let mut coordinator: FetchCoordinator<Vec<TrackedItem>> =
        FetchCoordinator::spawn("items", prereq_rx, fetch);

    prereqs.set_identity(identity);
    prereqs.set_location(location);

    loop {
        let state = coordinator.state();
        if let Some(items) = state.data {
            println!("{}", serde_json::to_string_pretty(&items)?);
            return Ok(());
        }
        if let Some(error) = state.error {
            if let Some(notice) = coordinator.try_notice() {
                tracing::warn!(consumer = notice.consumer, "{}", notice.message);
                eprintln!("warning: {}", notice.message);
            }
            anyhow::bail!("fetching items failed: {error}");
        }
        anyhow::ensure!(
            coordinator.state_changed().await,
            "item fetch task exited unexpectedly"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ansi_output_disabled_in_production() {
        assert!(!ansi_output(&Environment::Production));
    }

    #[test]
    fn ansi_output_enabled_for_local_environments() {
        assert!(ansi_output(&Environment::Development));
        assert!(ansi_output(&Environment::Test));
    }
}
