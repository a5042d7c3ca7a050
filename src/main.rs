use anyhow::Result;
use std::time::Duration;

mod aggregator;
mod config;
mod currency;
mod property_client;
mod view_model;

use crate::config::Settings;
use crate::property_client::HttpPropertyClient;
use crate::view_model::{ALL_LABEL, PropertyViewModel, QUESTION, ViewState, bedroom_label};

fn selection_label(selected_bedrooms: Option<u32>) -> String {
    selected_bedrooms
        .map(bedroom_label)
        .unwrap_or_else(|| ALL_LABEL.to_string())
}

fn render(state: &ViewState) {
    let label = selection_label(state.selected_bedrooms);
    match &state.average_price {
        Some(price) => println!("  {:<12} {}", label, price),
        None => println!("  {:<12} -", label),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    log::info!("Average price client starting");

    let settings = Settings::load()?;
    let timeout = settings
        .endpoint
        .request_timeout_seconds
        .map(Duration::from_secs);
    let client = HttpPropertyClient::new(timeout)?;
    let mut view_model = PropertyViewModel::new(client, &settings);
    let mut state_rx = view_model.subscribe();

    println!("{}", QUESTION);
    view_model.fetch_properties().await;

    let state = view_model.state();
    if let Some(error) = &state.error_message {
        // Not fatal: report and exit cleanly, as the screen would.
        eprintln!("{}", error);
        log::info!("Average price client finished");
        return Ok(());
    }
    log::info!(
        "Loaded {} listings",
        view_model.aggregator().catalog().len()
    );
    render(&state);

    println!("By bedrooms:");
    let options = std::iter::once(None).chain(state.unique_bedrooms.iter().copied().map(Some));
    for option in options {
        view_model.select_bedrooms(option);
        render(&state_rx.borrow_and_update());
    }

    log::info!("Average price client finished");
    Ok(())
}
