//! Field classification and example synthesis
//!
//! Turns raw field metadata (and, optionally, live sampled records) into a
//! compact type tag plus a short, deterministic list of example values.
//!
//! # Components
//!
//! - **Classifier**: maps interface hint + storage type to a `SimplifiedType`
//! - **Synthesizer**: runs the example strategy chain
//!   (choices → constraints → boolean → relation → live sample → default)

mod classify;
mod synthesize;
mod types;

pub use classify::{classify, classify_interface, classify_storage};
pub use synthesize::{
    collect_examples, default_example, ExampleSynthesizer, SynthesizerConfig, STRATEGY_CHAIN,
};
pub use types::{
    CollectionSchema, Constraints, ExampleSource, ExportedSchema, FieldDescriptor, FieldSchema,
    SimplifiedType,
};
