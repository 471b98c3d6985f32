use crate::models::{Currency, HotelDeals};

/// Renders the deals listing shown in the shell and mailed by headless runs
pub fn render(hotels: &[HotelDeals], currency: Currency) -> String {
    hotels
        .iter()
        .filter(|h| !h.deals.is_empty())
        .map(|hotel| {
            let deals: String = hotel
                .deals
                .iter()
                .map(|deal| {
                    format!(
                        "  Website: {}\n  Price: {}{}\n\n",
                        deal.provider,
                        deal.total,
                        currency.symbol()
                    )
                })
                .collect();
            format!("{}:\n{deals}  View deals: {}\n\n", hotel.hotel, hotel.link)
        })
        .collect()
}
