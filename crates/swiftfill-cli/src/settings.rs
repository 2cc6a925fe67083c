//! Shop settings and usage command handlers.

use chrono::{Duration, Utc};
use clap::Subcommand;
use rust_decimal::Decimal;
use swiftfill_core::{validate_shop_domain, SettingsUpdate};

/// Sub-commands available under `settings`.
#[derive(Debug, Subcommand)]
pub enum SettingsCommands {
    /// Show stored settings for a shop
    Show { shop: String },
    /// Create or replace settings for a shop
    Set {
        shop: String,
        /// Provider API key used for this shop's lookups
        #[arg(long, env = "SWIFTFILL_SHOP_API_KEY", hide_env_values = true)]
        api_key: String,
        /// Turn the service off for this shop
        #[arg(long)]
        disabled: bool,
        /// Turn off checkout autocomplete
        #[arg(long)]
        no_checkout: bool,
        /// Turn off customer-profile autocomplete
        #[arg(long)]
        no_profile: bool,
        #[arg(long)]
        charge_per_lookup: Option<Decimal>,
        #[arg(long)]
        max_monthly_charge: Option<Decimal>,
    },
    /// Show lookup volume and the most recent lookups for a shop
    Usage {
        shop: String,
        /// Size of the summary window in days
        #[arg(long, default_value = "30")]
        days: i64,
        /// Maximum number of recent lookups to list
        #[arg(long, default_value = "20")]
        limit: i64,
    },
}

/// Dispatches a `settings` sub-command.
///
/// # Errors
///
/// Returns an error if the shop domain is invalid, validation fails, or a
/// database query fails.
pub(crate) async fn run(pool: &sqlx::PgPool, command: SettingsCommands) -> anyhow::Result<()> {
    match command {
        SettingsCommands::Show { shop } => run_settings_show(pool, &shop).await,
        SettingsCommands::Set {
            shop,
            api_key,
            disabled,
            no_checkout,
            no_profile,
            charge_per_lookup,
            max_monthly_charge,
        } => {
            let update = SettingsUpdate {
                api_key,
                enabled: !disabled,
                enabled_checkout: !no_checkout,
                enabled_profile: !no_profile,
                charge_per_lookup,
                max_monthly_charge,
            };
            run_settings_set(pool, &shop, update).await
        }
        SettingsCommands::Usage { shop, days, limit } => {
            run_usage(pool, &shop, days, limit).await
        }
    }
}

async fn run_settings_show(pool: &sqlx::PgPool, shop: &str) -> anyhow::Result<()> {
    let shop = validate_shop_domain(shop)?;
    let Some(row) = swiftfill_db::get_shop_settings(pool, &shop).await? else {
        println!("no settings stored for {shop}; searches are refused until `settings set` runs");
        return Ok(());
    };

    println!("shop:               {}", row.shop);
    println!("api key:            {}", mask_key(&row.api_key));
    println!("enabled:            {}", row.enabled);
    println!("checkout:           {}", row.enabled_checkout);
    println!("profile:            {}", row.enabled_profile);
    println!("charge per lookup:  {}", row.charge_per_lookup);
    println!("max monthly charge: {}", row.max_monthly_charge);
    println!("lookups:            {}", row.usage_count);
    println!(
        "last used:          {}",
        row.last_used_at
            .map_or_else(|| "never".to_string(), |t| t.to_rfc3339())
    );
    Ok(())
}

async fn run_settings_set(
    pool: &sqlx::PgPool,
    shop: &str,
    update: SettingsUpdate,
) -> anyhow::Result<()> {
    let shop = validate_shop_domain(shop)?;
    let settings = update.validate(&shop)?;
    let row = swiftfill_db::upsert_shop_settings(pool, &settings).await?;
    tracing::info!(shop = %row.shop, "settings saved");
    println!(
        "saved settings for {} (enabled={}, checkout={}, profile={})",
        row.shop, row.enabled, row.enabled_checkout, row.enabled_profile
    );
    Ok(())
}

async fn run_usage(pool: &sqlx::PgPool, shop: &str, days: i64, limit: i64) -> anyhow::Result<()> {
    let shop = validate_shop_domain(shop)?;
    let since = Utc::now() - Duration::days(days.max(1));
    let summary = swiftfill_db::usage_summary(pool, &shop, since).await?;
    println!(
        "{shop}: {} lookup(s), {} accrued over the last {} day(s)",
        summary.lookups,
        summary.total_cost,
        days.max(1)
    );

    let lookups = swiftfill_db::list_recent_lookups(pool, &shop, limit.clamp(1, 200)).await?;
    if lookups.is_empty() {
        return Ok(());
    }

    println!();
    println!(
        "{:<22}{:<10}{:<9}{:<9}QUERY",
        "WHEN", "CONTEXT", "RESULTS", "CHARGED"
    );
    for lookup in &lookups {
        println!(
            "{:<22}{:<10}{:<9}{:<9}{}",
            lookup.created_at.format("%Y-%m-%d %H:%M:%S"),
            lookup.context.as_deref().unwrap_or("-"),
            lookup.result_count,
            lookup.charged,
            lookup.query
        );
    }
    Ok(())
}

/// Keeps the last four characters of a key visible.
pub(crate) fn mask_key(key: &str) -> String {
    let count = key.chars().count();
    if count <= 4 {
        return "*".repeat(count);
    }
    let tail: String = key.chars().skip(count - 4).collect();
    format!("{}{tail}", "*".repeat(count - 4))
}
