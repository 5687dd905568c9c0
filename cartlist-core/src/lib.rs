pub mod ai;
pub mod error;
pub mod extract;
pub mod instacart;
pub mod normalize;
pub mod pipeline;
pub mod types;

pub use error::{ConfigError, ExtractError};
pub use extract::extract_recipe;
pub use instacart::{InstacartClient, InstacartConfig, SubmitError};
pub use normalize::{NormalizeError, NormalizeTask, TaskModels};
pub use pipeline::{Pipeline, PipelineError};
pub use types::{ExtractedRecipe, Filters, LineItem, Measurement, ShoppingList};
