use std::collections::BTreeSet;
use std::fmt;

use strum_macros::{Display, EnumIter, EnumString};

use crate::error::{XsError, XsResult};

//=====================================================================
// Capabilities a transport solver can provide and that reduced order
// solvers or the depletion manager can need. Two components can be
// coupled when every needed feature is provided.
//=====================================================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumString, Display)]
pub enum Feature {
    // Homogenized macroscopic cross sections over the entire domain
    #[strum(serialize = "homog.macro.global")]
    HomogenizedGlobalMacroXs,
    // Homogenized macroscopic cross sections over sub-domains
    #[strum(serialize = "homog.macro.local")]
    HomogenizedLocalMacroXs,
    // Homogenized microscopic cross sections over sub-domains
    #[strum(serialize = "homog.micro.local")]
    MicroReactionXs,
    #[strum(serialize = "fissionMatrix")]
    FissionMatrix,
    #[strum(serialize = "reactionrates.local")]
    LocalReactionRates,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureCollection(BTreeSet<Feature>);

impl FeatureCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, feature: Feature) -> bool {
        self.0.insert(feature)
    }

    pub fn contains(&self, feature: Feature) -> bool {
        self.0.contains(&feature)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Feature> + '_ {
        self.0.iter().copied()
    }

    pub fn union(&self, other: &FeatureCollection) -> FeatureCollection {
        Self(self.0.union(&other.0).copied().collect())
    }

    pub fn intersection(&self, other: &FeatureCollection) -> FeatureCollection {
        Self(self.0.intersection(&other.0).copied().collect())
    }

    /// Features in `self` that are not in `other`
    pub fn difference(&self, other: &FeatureCollection) -> FeatureCollection {
        Self(self.0.difference(&other.0).copied().collect())
    }

    pub fn is_subset(&self, other: &FeatureCollection) -> bool {
        self.0.is_subset(&other.0)
    }
}

impl FromIterator<Feature> for FeatureCollection {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for FeatureCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.0.iter().map(|feature| feature.to_string()).collect();
        write!(f, "{{{}}}", names.join(", "))
    }
}

/// Ensure `provider` has every feature `consumer` needs
pub fn check_compatibility(
    provider: &str,
    features: &FeatureCollection,
    consumer: &str,
    needs: &FeatureCollection,
) -> XsResult<()> {
    let missing = needs.difference(features);
    if missing.is_empty() {
        return Ok(());
    }
    Err(XsError::Incompatible {
        provider: provider.to_string(),
        consumer: consumer.to_string(),
        needs: needs.clone(),
        has: features.clone(),
        missing,
    })
}
