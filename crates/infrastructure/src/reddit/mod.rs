pub mod listing;
pub mod scraper;

pub use listing::{summarize_listing, Listing};
pub use scraper::RedditListingScraper;
