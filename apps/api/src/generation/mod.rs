// Recipe generation: prompt compilation, the model gateway, and
// normalization of whatever the model sends back.
// All model calls go through llm_client via RecipeGateway.

pub mod compiler;
pub mod compliance;
pub mod gateway;
pub mod generator;
pub mod handlers;
pub mod normalizer;
pub mod prompts;
pub mod schema;
pub mod validation;
