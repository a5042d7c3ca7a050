use crate::aggregator::PropertyAggregator;
use crate::config::Settings;
use crate::property_client::PropertySource;
use tokio::sync::watch;

/// What the screen renders. Published on every change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub average_price: Option<String>,
    pub selected_bedrooms: Option<u32>,
    pub unique_bedrooms: Vec<u32>,
    pub is_loading: bool,
    pub error_message: Option<String>,
}

pub const QUESTION: &str = "What is the average property price?";
pub const ALL_LABEL: &str = "All";

pub fn bedroom_label(count: u32) -> String {
    if count == 1 {
        format!("{} bedroom", count)
    } else {
        format!("{} bedrooms", count)
    }
}

pub struct PropertyViewModel<S: PropertySource> {
    source: S,
    url: String,
    aggregator: PropertyAggregator,
    is_loading: bool,
    error_message: Option<String>,
    state_tx: watch::Sender<ViewState>,
}

impl<S: PropertySource> PropertyViewModel<S> {
    pub fn new(source: S, settings: &Settings) -> Self {
        let mut aggregator = PropertyAggregator::new(settings.display.currency_symbol.clone());
        aggregator.set_selection(settings.display.selected_bedrooms);
        let (state_tx, _) = watch::channel(ViewState {
            selected_bedrooms: settings.display.selected_bedrooms,
            ..ViewState::default()
        });

        Self {
            source,
            url: settings.endpoint.url.clone(),
            aggregator,
            is_loading: false,
            error_message: None,
            state_tx,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state_tx.subscribe()
    }

    pub fn state(&self) -> ViewState {
        self.state_tx.borrow().clone()
    }

    /// Runs one fetch cycle. Failures leave the previous catalog in place and
    /// are reported through `error_message`.
    pub async fn fetch_properties(&mut self) {
        self.is_loading = true;
        self.error_message = None;
        self.publish();

        match self.source.fetch_properties(&self.url).await {
            Ok(listings) => {
                log::info!("Ingesting {} listings", listings.len());
                self.aggregator.ingest(listings);
            }
            Err(e) => {
                log::error!("Failed to fetch properties from {}: {}", self.url, e);
                self.error_message = Some(e.to_string());
            }
        }

        self.is_loading = false;
        self.publish();
    }

    pub fn select_bedrooms(&mut self, selected_bedrooms: Option<u32>) {
        self.aggregator.set_selection(selected_bedrooms);
        self.publish();
    }

    pub fn aggregator(&self) -> &PropertyAggregator {
        &self.aggregator
    }

    fn publish(&self) {
        let next = ViewState {
            average_price: self.aggregator.formatted_average(),
            selected_bedrooms: self.aggregator.selected_bedrooms(),
            unique_bedrooms: self.aggregator.unique_bedrooms().to_vec(),
            is_loading: self.is_loading,
            error_message: self.error_message.clone(),
        };
        self.state_tx.send_if_modified(|state| {
            if *state == next {
                false
            } else {
                *state = next;
                true
            }
        });
    }
}
