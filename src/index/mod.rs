mod reaction_type;
mod xs_index;

pub use reaction_type::ReactionType;
pub use xs_index::{XsIndex, XsIndexIter};
