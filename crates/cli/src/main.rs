mod commands;
mod server;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "curve-cli", about = "Bonding-curve quote and trade CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Offline buy quote from explicit reserves.
    QuoteBuy(commands::quote::QuoteBuyArgs),
    /// Offline sell quote from explicit reserves.
    QuoteSell(commands::quote::QuoteSellArgs),
    /// Spot price, market cap and graduation progress for a token.
    Price(commands::trade::PriceArgs),
    /// Build (and optionally broadcast) a curve buy.
    BuildBuy(commands::trade::BuildBuyArgs),
    /// Build (and optionally broadcast) a curve sell.
    BuildSell(commands::trade::BuildSellArgs),
    /// Serve the price/trade HTTP API.
    Serve(commands::serve::ServeArgs),
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::QuoteBuy(args) => commands::quote::run_buy(args),
        Commands::QuoteSell(args) => commands::quote::run_sell(args),
        Commands::Price(args) => commands::trade::run_price(args).await,
        Commands::BuildBuy(args) => commands::trade::run_build_buy(args).await,
        Commands::BuildSell(args) => commands::trade::run_build_sell(args).await,
        Commands::Serve(args) => commands::serve::run(args).await,
    };
    if let Err(err) = result {
        eprintln!("error: {err:?}");
        std::process::exit(1);
    }
}
