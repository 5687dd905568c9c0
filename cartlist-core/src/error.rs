use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("No ingredients found.")]
    NoIngredients,

    #[error("No Recipe found in page")]
    NoRecipe,

    #[error("Invalid JSON-LD: {0}")]
    InvalidJson(String),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),
}
