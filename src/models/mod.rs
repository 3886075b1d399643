pub mod artist;
pub mod category;
pub mod drink;
pub mod question;
pub mod show;
pub mod venue;

pub use artist::Artist;
pub use category::Category;
pub use drink::{Drink, Ingredient};
pub use question::{NewQuestion, Question};
pub use show::{Show, ShowListing};
pub use venue::{Venue, VenueArea};

/// `ILIKE` pattern matching `term` anywhere, with wildcards in `term` escaped.
pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
