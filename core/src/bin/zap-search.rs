//! Run a single listings search and print the result as JSON.

use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use zap_core::{
    BusinessType, FieldSelector, FullSearchResponseFields, ListingType, SdkConfig, SearchOutput,
    SearchParams, ZapSdk,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Business {
    Sale,
    Rent,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Kind {
    Used,
    Development,
}

#[derive(Parser)]
#[command(name = "zap-search", about = "Search Zap Imóveis listings")]
struct Cli {
    #[arg(long, value_enum, default_value = "sale")]
    business_type: Business,

    #[arg(long, value_enum, default_value = "used")]
    listing_type: Kind,

    #[arg(long, default_value_t = 1)]
    page: u32,

    #[arg(long, default_value_t = 10)]
    size: u32,

    /// Request every selectable field instead of listing fields only.
    #[arg(long)]
    all_fields: bool,

    /// Print the decoded response instead of validated listings.
    #[arg(long)]
    raw: bool,

    /// Only print the includeFields value that would be sent.
    #[arg(long)]
    print_fields: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = SdkConfig::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    let include_fields = if cli.all_fields {
        FullSearchResponseFields::all()
    } else {
        FullSearchResponseFields::listing_search()
    };
    if cli.print_fields {
        println!("{}", include_fields.include_fields());
        return ExitCode::SUCCESS;
    }

    let business_type = match cli.business_type {
        Business::Sale => BusinessType::Sale,
        Business::Rent => BusinessType::Rent,
    };
    let listing_type = match cli.listing_type {
        Kind::Used => ListingType::Used,
        Kind::Development => ListingType::Development,
    };
    let params = SearchParams::new(business_type, listing_type)
        .page(cli.page)
        .size(cli.size)
        .include_fields(include_fields);

    let sdk = ZapSdk::new(config);
    let output = match sdk.search(&params, !cli.raw) {
        Ok(output) => output,
        Err(e) => {
            error!("Search failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let rendered = match &output {
        SearchOutput::Listings(listings) => {
            info!("Fetched {} listings", listings.len());
            serde_json::to_string_pretty(listings)
        }
        SearchOutput::Raw(value) => serde_json::to_string_pretty(value),
    };
    match rendered {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Could not render output: {}", e);
            ExitCode::FAILURE
        }
    }
}
