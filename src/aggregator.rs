use crate::currency::format_price;
use crate::property_client::Listing;

/// Averages listing prices, optionally restricted to one bedroom count.
///
/// - With a selection, only listings with exactly that many bedrooms count.
/// - If no listings remain, returns `None`.
/// - Otherwise, calculates the arithmetic mean of the remaining prices.
pub fn average_price(listings: &[Listing], selected_bedrooms: Option<u32>) -> Option<f64> {
    let (total, count) = listings
        .iter()
        .filter(|listing| selected_bedrooms.is_none_or(|bedrooms| listing.bedrooms == bedrooms))
        .fold((0u128, 0usize), |(total, count), listing| {
            (total + u128::from(listing.price), count + 1)
        });

    if count == 0 {
        None
    } else {
        Some(total as f64 / count as f64)
    }
}

/// Sorted ascending, each count once.
pub fn unique_bedrooms(listings: &[Listing]) -> Vec<u32> {
    let mut bedrooms: Vec<u32> = listings.iter().map(|listing| listing.bedrooms).collect();
    bedrooms.sort_unstable();
    bedrooms.dedup();
    bedrooms
}

/// In-memory catalog plus the values derived from it.
#[derive(Debug, Clone)]
pub struct PropertyAggregator {
    catalog: Vec<Listing>,
    selected_bedrooms: Option<u32>,
    unique_bedrooms: Vec<u32>,
    average: Option<f64>,
    currency_symbol: String,
}

impl PropertyAggregator {
    pub fn new(currency_symbol: impl Into<String>) -> Self {
        Self {
            catalog: Vec::new(),
            selected_bedrooms: None,
            unique_bedrooms: Vec::new(),
            average: None,
            currency_symbol: currency_symbol.into(),
        }
    }

    /// Replaces the whole catalog and refreshes everything derived from it.
    pub fn ingest(&mut self, listings: Vec<Listing>) {
        self.catalog = listings;
        self.unique_bedrooms = unique_bedrooms(&self.catalog);
        self.recompute();
    }

    pub fn set_selection(&mut self, selected_bedrooms: Option<u32>) {
        self.selected_bedrooms = selected_bedrooms;
        self.recompute();
    }

    pub fn recompute(&mut self) {
        self.average = average_price(&self.catalog, self.selected_bedrooms);
        log::debug!(
            "Recomputed average over {} listings (selection {:?}): {:?}",
            self.catalog.len(),
            self.selected_bedrooms,
            self.average
        );
    }

    pub fn catalog(&self) -> &[Listing] {
        &self.catalog
    }

    pub fn selected_bedrooms(&self) -> Option<u32> {
        self.selected_bedrooms
    }

    pub fn unique_bedrooms(&self) -> &[u32] {
        &self.unique_bedrooms
    }

    pub fn average(&self) -> Option<f64> {
        self.average
    }

    pub fn formatted_average(&self) -> Option<String> {
        self.average()
            .map(|average| format_price(average, &self.currency_symbol))
    }
}
