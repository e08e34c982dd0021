//! Fit AR, MA and ARMA models to a price series and print their forecasts.
//!
//! Usage: `cargo run --example forecast_prices [prices.csv] [config.json]`
//!
//! Without a CSV path a synthetic ARMA(1,1) series is generated. Set
//! `RUST_LOG=price_forecast=debug` to see the optimizer logs.

use chrono::{Duration, TimeZone, Utc};
use price_forecast::simulate::ArmaProcess;
use price_forecast::{
    DataLoader, ForecastModel, Model, ModelConfig, ModelOrder, NumericSeries, PriceField,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const HORIZON: usize = 5;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "price_forecast=info".into()),
        )
        .init();

    println!("Price Forecast: AR / MA / ARMA Example");
    println!("======================================\n");

    let mut args = std::env::args().skip(1);
    let series = match args.next() {
        Some(path) => load_closes(&path)?,
        None => synthetic_series()?,
    };
    let config = match args.next() {
        Some(path) => ModelConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        None => ModelConfig::with_seed(42),
    };

    println!(
        "Training on {} points ending {}\n",
        series.len(),
        series.last().map(|(ts, _)| ts.format("%Y-%m-%d").to_string()).unwrap_or_default()
    );

    for order in [ModelOrder::Ar(2), ModelOrder::Ma(1), ModelOrder::Arma(1, 1)] {
        let mut model = match Model::fit(order, series.clone(), config.clone()) {
            Ok(model) => model,
            Err(e) => {
                println!("{}: training failed: {}\n", order, e);
                continue;
            }
        };

        println!("{}", model.report());

        let forecast = model.forecast(HORIZON)?;
        println!("Forecast ({} steps):", HORIZON);
        for (timestamp, value) in forecast.iter() {
            println!("  {}  {:>12.4}", timestamp.format("%Y-%m-%d"), value);
        }
        println!();
    }

    Ok(())
}

fn load_closes(path: &str) -> Result<NumericSeries, Box<dyn std::error::Error>> {
    let prices = DataLoader::from_csv(path)?;
    println!(
        "Loaded {} rows for {} (close std dev {:.4})",
        prices.len(),
        prices.ticker(),
        prices.std_dev()?
    );
    Ok(prices.series(PriceField::Close)?)
}

fn synthetic_series() -> Result<NumericSeries, Box<dyn std::error::Error>> {
    println!("No CSV given; generating a synthetic ARMA(1,1) series");
    let process = ArmaProcess::new(20.0, vec![0.8], vec![0.3], 1.5)?;
    let start = Utc
        .with_ymd_and_hms(2024, 1, 2, 0, 0, 0)
        .single()
        .ok_or("invalid start date")?;
    Ok(process.generate(250, start, Duration::days(1), 7)?)
}
