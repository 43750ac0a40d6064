//! Prediction dispatch
//!
//! Two independent prediction paths share the resolver and feature
//! assembly and diverge afterward: price regression over the full feature
//! vector, and brand/model multi-output classification over a smaller,
//! differently mapped row.

mod brand_model;
mod context;
mod format;
mod price;

pub use brand_model::{
    predict_brand_model, BrandModelInput, BrandModelPrediction, RankedLabel,
};
pub use context::{PredictionContext, PriceVocabularies};
pub use format::format_price_lkr;
pub use price::{predict_price, MatchedValues, PricePrediction, RawPriceInput, PRICE_WARNING};

use chrono::Datelike;

/// Current calendar year, the reference point for car age.
pub fn current_year() -> i32 {
    chrono::Utc::now().year()
}
