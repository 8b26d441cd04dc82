use anyhow::{Context, Result};
use clap::Parser;
use std::time::Duration;
use wcapi::commands::{self, DEFAULT_PER_PAGE};
use wcapi::woocommerce::{ClientConfig, WooCommerceApi};

/// wcapi - WooCommerce REST API client
///
/// Sends authenticated requests to a store's WooCommerce REST API
/// (wp-json/wc/v3). Without a subcommand, every product is fetched and
/// printed as one JSON object per line.
///
/// Examples:
///   wcapi --url https://shop.example.com products --per-page 50
///   wcapi get orders -p status=processing
#[derive(Parser, Debug)]
#[command(author, version = env!("WCAPI_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Store URL, e.g. https://shop.example.com (also via WC_URL)
    #[arg(long, env = "WC_URL", value_name = "URL", global = true)]
    pub url: Option<String>,

    /// REST API consumer key (also via WC_CONSUMER_KEY)
    #[arg(
        long,
        env = "WC_CONSUMER_KEY",
        value_name = "KEY",
        hide_env_values = true,
        global = true
    )]
    pub consumer_key: Option<String>,

    /// REST API consumer secret (also via WC_CONSUMER_SECRET)
    #[arg(
        long,
        env = "WC_CONSUMER_SECRET",
        value_name = "SECRET",
        hide_env_values = true,
        global = true
    )]
    pub consumer_secret: Option<String>,

    /// Per-attempt request timeout in seconds
    #[arg(
        long,
        env = "WC_TIMEOUT",
        value_name = "SECS",
        default_value_t = 10,
        global = true
    )]
    pub timeout: u64,

    /// Retries after the first attempt for transient failures
    #[arg(long, env = "WC_MAX_RETRIES", default_value_t = 3, global = true)]
    pub max_retries: usize,
}

impl Cli {
    fn client_config(&self) -> Result<ClientConfig> {
        let url = self
            .url
            .as_deref()
            .context("Store URL is required (--url or WC_URL)")?;
        let key = self
            .consumer_key
            .as_deref()
            .context("Consumer key is required (--consumer-key or WC_CONSUMER_KEY)")?;
        let secret = self
            .consumer_secret
            .as_deref()
            .context("Consumer secret is required (--consumer-secret or WC_CONSUMER_SECRET)")?;

        Ok(ClientConfig::new(url, key, secret)
            .with_timeout(Duration::from_secs(self.timeout))
            .with_max_retries(self.max_retries))
    }
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Fetch all products and print one JSON object per line
    Products(ProductsArgs),

    /// GET an endpoint and print the raw response body
    Get(GetArgs),

    /// POST a JSON payload to an endpoint
    Post(PayloadArgs),

    /// PUT a JSON payload to an endpoint
    Put(PayloadArgs),

    /// DELETE an endpoint
    Delete(EndpointArgs),
}

#[derive(clap::Args, Debug)]
pub struct ProductsArgs {
    /// Products per page
    #[arg(long, default_value_t = DEFAULT_PER_PAGE)]
    pub per_page: u32,

    /// Stop after this many pages even if the store has more
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub max_pages: Option<u32>,
}

impl Default for ProductsArgs {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_PER_PAGE,
            max_pages: None,
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct GetArgs {
    /// Endpoint below wp-json/wc/v3, e.g. "orders" or "products/42"
    pub endpoint: String,

    /// Query parameter, repeatable (each key at most once)
    #[arg(long = "param", short = 'p', value_name = "KEY=VALUE", value_parser = commands::parse_param)]
    pub params: Vec<(String, String)>,
}

#[derive(clap::Args, Debug)]
pub struct PayloadArgs {
    /// Endpoint below wp-json/wc/v3
    pub endpoint: String,

    /// JSON request body
    #[arg(long, short = 'd', value_name = "JSON")]
    pub data: String,
}

#[derive(clap::Args, Debug)]
pub struct EndpointArgs {
    /// Endpoint below wp-json/wc/v3
    pub endpoint: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let api = WooCommerceApi::new(cli.client_config()?)?;
    let mut stdout = std::io::stdout().lock();

    let command = cli
        .command
        .unwrap_or_else(|| Commands::Products(ProductsArgs::default()));

    match command {
        Commands::Products(args) => {
            commands::print_products(&api, args.per_page, args.max_pages, &mut stdout)
                .await
                .context("Failed to get products")?;
        }
        Commands::Get(args) => {
            let params = commands::collect_params(args.params)?;
            let body = api.get(&args.endpoint, &params).await?;
            commands::print_body(&body, &mut stdout)?;
        }
        Commands::Post(args) => {
            let payload = commands::parse_payload(&args.data)?;
            let body = api.post(&args.endpoint, &payload).await?;
            commands::print_body(&body, &mut stdout)?;
        }
        Commands::Put(args) => {
            let payload = commands::parse_payload(&args.data)?;
            let body = api.put(&args.endpoint, &payload).await?;
            commands::print_body(&body, &mut stdout)?;
        }
        Commands::Delete(args) => {
            let body = api.delete(&args.endpoint).await?;
            commands::print_body(&body, &mut stdout)?;
        }
    }
    Ok(())
}
