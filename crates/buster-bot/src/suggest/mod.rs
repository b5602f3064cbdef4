mod calls;
mod double_chance;
mod entropy;

pub use calls::{playable_values, rank_calls, CallBoard, CallOption};
pub use double_chance::{double_chance_suggestions, DoubleChance};
pub use entropy::{EntropyOutcome, EntropySuggester};
