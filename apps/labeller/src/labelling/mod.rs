// Post labelling: prompt variants, response parsing, the bounded classifier
// and the row loop. All completion calls go through llm_client.

pub mod classifier;
pub mod parser;
pub mod pipeline;
pub mod prompts;
pub mod variant;
