use num_enum::TryFromPrimitive;
use strum_macros::{Display, EnumIter};

//=====================================================================
// Enum of the ENDF reaction MT numbers commonly tracked in depletion
// chains. Reactions outside this table are still valid in an XsIndex,
// they simply have no descriptive name.
//=====================================================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, Display, EnumIter)]
#[repr(usize)]
pub enum ReactionType {
    #[strum(to_string = "total")]
    Total = 1,
    #[strum(to_string = "elastic")]
    Elastic = 2,
    #[strum(to_string = "n,2n")]
    N2N = 16,
    #[strum(to_string = "n,3n")]
    N3N = 17,
    #[strum(to_string = "fission")]
    Fission = 18,
    #[strum(to_string = "n,gamma")]
    NGamma = 102,
    #[strum(to_string = "n,p")]
    NP = 103,
    #[strum(to_string = "n,d")]
    ND = 104,
    #[strum(to_string = "n,t")]
    NT = 105,
    #[strum(to_string = "n,3He")]
    N3He = 106,
    #[strum(to_string = "n,alpha")]
    NAlpha = 107,
}

impl ReactionType {
    // Look up a reaction by MT number, None if it is not in the table
    pub fn from_mt(mt: usize) -> Option<Self> {
        Self::try_from(mt).ok()
    }

    pub fn mt(self) -> usize {
        self as usize
    }
}
