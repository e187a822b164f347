use std::env;

use afiliado_rs::actions::DEFAULT_RECENT_LINKS_LIMIT;
use afiliado_rs::{Actions, ApiClient, AppConfig, check_shopee_link};
use anyhow::{Context, Result, bail};

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <shopee_link>", args[0]);
        eprintln!("       {} --recent [limit]", args[0]);
        eprintln!("  shopee_link: product link starting with https://shopee.com.br, https://shp.ee, ...");
        eprintln!("  limit: number of recent links to list (default: {})", DEFAULT_RECENT_LINKS_LIMIT);
        std::process::exit(1);
    }

    let config = AppConfig::from_env().context("Failed to load configuration")?;
    let client = ApiClient::new(&config.api_base_url).context("Failed to build HTTP client")?;
    let actions = Actions::from_config(client, &config);

    if args[1] == "--recent" {
        let limit = match args.get(2) {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("Invalid limit: {}", raw))?,
            None => DEFAULT_RECENT_LINKS_LIMIT,
        };

        let result = actions.fetch_recent_links(limit).await;
        if !result.success {
            bail!(result.error.unwrap_or_default());
        }

        let records = result.records.unwrap_or_default();
        println!("{} recent link(s)", records.len());
        for record in &records {
            println!("\n#{} {}", record.id, record.product_name);
            println!("  Link: {}", record.affiliate_link);
            if !record.shop_name.is_empty() {
                println!("  Shop: {}", record.shop_name);
            }
            if !record.price_min.is_empty() {
                println!("  Price: {} {}", record.currency, record.price_min);
            }
            println!("  Created: {}", record.createdat);
        }
        return Ok(());
    }

    let link = match check_shopee_link(&args[1]) {
        Ok(link) => link,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    println!("Generating affiliate link...");
    let result = actions.generate_link(link).await;
    match result.affiliate_link {
        Some(affiliate_link) if result.success => println!("Affiliate link: {}", affiliate_link),
        _ => bail!(result.error.unwrap_or_default()),
    }

    Ok(())
}
