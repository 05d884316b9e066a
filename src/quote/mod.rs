pub mod batch;
pub mod normalize;
pub mod series;

pub use self::batch::{QuoteService, assemble, validate_symbols};
pub use self::normalize::{Normalizer, price_change};
pub use self::series::build_series;
