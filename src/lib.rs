//! Health Score: upload a photo of a product's ingredient list and get a
//! health score with the detected ingredients.
//!
//! The upload panel, score panel and page state live in [`client`]; the
//! analysis backend sits behind [`client::services::analyzer::IngredientAnalyzer`].

pub mod client;
pub mod utils;
