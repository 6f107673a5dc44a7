//! Command handlers. Each handler builds only the services it needs.

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use revdash_adapter_headless::{HeadlessDocument, ManualColorScheme};
use revdash_adapter_simulated::{InMemoryProfileRepository, SimulatedMarketplace};
use revdash_adapter_storage::MemoryStore;
use revdash_app::ports::KeyValueStore;
use revdash_app::services::marketplace_service::MarketplaceService;
use revdash_app::services::profile_service::ProfileService;
use revdash_app::services::settings_service::SettingsService;
use revdash_domain::marketplace::{Credentials, MarketplaceConnection};
use revdash_domain::settings::{SettingField, SettingUpdate};

use crate::cli::{Command, MarketplaceArgs, MarketplaceCommand, ProfileCommand};
use crate::config::{Config, StorageConfig};

pub type SettingsFacade = SettingsService<Arc<dyn KeyValueStore>, HeadlessDocument, ManualColorScheme>;

/// Open the configured key-value store.
///
/// # Errors
///
/// Returns an error if the storage directory cannot be created.
pub fn open_storage(config: &StorageConfig) -> Result<Arc<dyn KeyValueStore>> {
    if config.ephemeral {
        tracing::debug!("using ephemeral in-memory storage");
        return Ok(Arc::new(MemoryStore::new()));
    }
    let store = revdash_adapter_storage::Config {
        dir: config.dir.clone(),
    }
    .build()
    .with_context(|| format!("failed to open storage at {}", config.dir.display()))?;
    Ok(Arc::new(store))
}

/// Wire the settings facade against the configured adapters.
///
/// # Errors
///
/// Returns an error if the storage cannot be opened.
pub fn start_settings(config: &Config) -> Result<(SettingsFacade, Arc<ManualColorScheme>)> {
    let storage = open_storage(&config.storage)?;
    let system_theme = Arc::new(ManualColorScheme::new(
        config.appearance.system_prefers_dark,
    ));
    let settings = SettingsService::start(
        storage,
        HeadlessDocument::new(),
        Arc::clone(&system_theme),
    );
    Ok((settings, system_theme))
}

pub async fn run(command: Command, config: &Config) -> Result<()> {
    match command {
        Command::Show => show(config),
        Command::Set { field, value } => set(config, &field, &value),
        Command::Reset => reset(config),
        Command::Render { prefers_dark } => render(config, prefers_dark),
        Command::Profile(command) => profile(command).await,
        Command::Marketplace(args) => marketplace(config, args).await,
    }
}

fn show(config: &Config) -> Result<()> {
    let (settings, _) = start_settings(config)?;
    let current = settings.current_settings();
    for field in SettingField::ALL {
        println!("{}", current.value_of(field));
    }
    println!("effectiveDark={}", settings.effective_dark());
    Ok(())
}

fn set(config: &Config, field: &str, value: &str) -> Result<()> {
    let field: SettingField = field.parse()?;
    let update = SettingUpdate::parse(field, value)?;
    let (settings, _) = start_settings(config)?;
    settings.update_field(update);
    println!("{}", settings.current_settings().value_of(field));
    Ok(())
}

fn reset(config: &Config) -> Result<()> {
    let (settings, _) = start_settings(config)?;
    settings.reset_to_defaults();
    println!("settings restored to defaults");
    Ok(())
}

fn render(config: &Config, prefers_dark: Option<bool>) -> Result<()> {
    let (settings, system_theme) = start_settings(config)?;
    if let Some(prefers_dark) = prefers_dark {
        system_theme.set_prefers_dark(prefers_dark);
    }
    println!("{}", settings.environment().snapshot());
    Ok(())
}

async fn profile(command: ProfileCommand) -> Result<()> {
    let service = ProfileService::new(InMemoryProfileRepository::demo());
    match command {
        ProfileCommand::Show => {
            let profile = service.get_profile().await?;
            println!("name:      {}", profile.full_name);
            println!("email:     {}", profile.email);
            println!("company:   {}", profile.company);
            if let Some(phone) = &profile.phone {
                println!("phone:     {phone}");
            }
            println!("language:  {}", profile.language.display_name());
            println!("timezone:  {}", profile.timezone);
            if let Some(key) = service.masked_api_key().await? {
                println!("api key:   {key}");
            }
            println!("notifications: {:?}", service.notifications().await?);
            println!("reports:       {:?}", service.reports().await?);
            println!("dashboard:     {:?}", service.dashboard().await?);
        }
        ProfileCommand::Usage => {
            let usage = service.usage_stats().await?;
            println!(
                "reviews:      {}/{} ({}%)",
                usage.reviews_analyzed,
                usage.review_limit,
                usage.review_percent()
            );
            println!(
                "api calls:    {}/{} ({}%)",
                usage.api_calls,
                usage.api_call_limit,
                usage.api_call_percent()
            );
            println!(
                "marketplaces: {}/{} ({}%)",
                usage.connected_marketplaces,
                usage.marketplace_limit,
                usage.marketplace_percent()
            );
            if usage.is_over_limit() {
                println!("plan limit exceeded");
            }
        }
        ProfileCommand::Activity { limit } => {
            let entries = service.recent_activity(limit).await?;
            if entries.is_empty() {
                println!("no activity recorded");
            }
            for entry in entries {
                println!(
                    "{}  {:<24} {}",
                    entry.at.format("%Y-%m-%d %H:%M:%S"),
                    entry.kind.to_string(),
                    entry.description
                );
            }
        }
        ProfileCommand::Export { output } => {
            let json = service.export_data().await?;
            match output {
                Some(path) => {
                    fs::write(&path, &json)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!("exported account data to {}", path.display());
                }
                None => println!("{json}"),
            }
        }
        ProfileCommand::Import { file } => {
            let raw = fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let snapshot = service.import_data(&raw).await?;
            println!(
                "imported profile of {} exported at {}",
                snapshot.profile.full_name, snapshot.exported_at
            );
        }
    }
    Ok(())
}

async fn marketplace(config: &Config, args: MarketplaceArgs) -> Result<()> {
    let gateway = SimulatedMarketplace::new(config.marketplace.name.clone())
        .with_latency(Duration::from_millis(config.marketplace.latency_ms));
    let service = MarketplaceService::new(gateway)
        .with_timeout(Duration::from_millis(config.marketplace.timeout_ms));
    let credentials = Credentials {
        seller_id: args.seller_id,
        api_token: args.token,
    };

    let connection = match args.command {
        MarketplaceCommand::Status => service.status(),
        MarketplaceCommand::Connect => open(&service, &credentials).await?,
        MarketplaceCommand::Disconnect => {
            open(&service, &credentials).await?;
            service.disconnect().await?
        }
        MarketplaceCommand::Test => {
            open(&service, &credentials).await?;
            let healthy = service.test_connection().await?;
            println!("connection test: {}", if healthy { "ok" } else { "failed" });
            service.status()
        }
        MarketplaceCommand::Sync => {
            open(&service, &credentials).await?;
            service.sync().await?
        }
    };
    print_connection(&connection);
    Ok(())
}

async fn open(
    service: &MarketplaceService<SimulatedMarketplace>,
    credentials: &Credentials,
) -> Result<MarketplaceConnection> {
    service.login(credentials).await?;
    Ok(service.connect().await?)
}

fn print_connection(connection: &MarketplaceConnection) {
    fn or_none<T: ToString>(value: Option<T>) -> String {
        value.map_or_else(|| "-".to_string(), |v| v.to_string())
    }

    println!("marketplace: {}", connection.marketplace);
    println!("status:      {}", connection.status);
    println!("store:       {}", or_none(connection.store_name.as_deref()));
    println!("last sync:   {}", or_none(connection.last_sync));
    println!("products:    {}", or_none(connection.product_count));
    println!("reviews:     {}", or_none(connection.review_count));
    if let Some(error) = &connection.last_error {
        println!("last error:  {error}");
    }
}
