use std::fmt;

use crate::error::{XsError, XsResult};
use crate::index::ReactionType;

//=====================================================================
// Index and locator for microscopic cross sections and reaction rates.
//
// The reactions of isotope `zais[i]` occupy `rxns[zptr[i]..zptr[i + 1]]`
// of the flat reaction vector, so every per-material data row shares
// one layout. An index is immutable once built and is shared between
// arrays through an `Arc`; two arrays can only be combined when their
// indices are equal.
//
// Example layout:
//     zais = [80160, 922350, 922380]
//     rxns = [102, 18, 102, 102, 18]
//     zptr = [0, 1, 3, 5]
// gives the flat ordering
//     (80160, 102), (922350, 18), (922350, 102), (922380, 102), (922380, 18)
//=====================================================================
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct XsIndex {
    zais: Vec<usize>,
    rxns: Vec<usize>,
    zptr: Vec<usize>,
}

impl XsIndex {
    pub fn new(zais: Vec<usize>, rxns: Vec<usize>, zptr: Vec<usize>) -> XsResult<Self> {
        // One more pointer than isotopes, which also rules out an empty pointer vector
        if zptr.len() != zais.len() + 1 {
            return Err(XsError::LengthMismatch {
                what: "Number of pointers (one more than isotopes)",
                expected: zais.len() + 1,
                found: zptr.len(),
            });
        }

        // The final pointer closes the last isotope's segment
        let final_pointer = zptr[zptr.len() - 1];
        if rxns.len() != final_pointer {
            return Err(XsError::LengthMismatch {
                what: "Number of reactions (final pointer)",
                expected: final_pointer,
                found: rxns.len(),
            });
        }

        if zptr[0] != 0 {
            return Err(XsError::InvalidIndex(format!(
                "first pointer must be zero, got {}",
                zptr[0]
            )));
        }
        if let Some(pair) = zptr.windows(2).find(|pair| pair[0] > pair[1]) {
            return Err(XsError::InvalidIndex(format!(
                "pointers must be non-decreasing, found {} before {}",
                pair[0], pair[1]
            )));
        }
        // A reaction listed twice for one isotope could not be found again by index_of
        for (isotope, segment) in zptr.windows(2).enumerate() {
            let reactions = &rxns[segment[0]..segment[1]];
            if let Some((offset, mt)) = reactions
                .iter()
                .enumerate()
                .find(|&(offset, mt)| reactions[..offset].contains(mt))
            {
                return Err(XsError::InvalidIndex(format!(
                    "reaction {} of isotope {} is listed twice (position {})",
                    mt,
                    zais[isotope],
                    segment[0] + offset
                )));
            }
        }
        // Lookups by isotope are binary searches
        if let Some(pair) = zais.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(XsError::InvalidIndex(format!(
                "isotopes must be strictly increasing, found {} before {}",
                pair[0], pair[1]
            )));
        }

        Ok(Self { zais, rxns, zptr })
    }

    // Build an index from (zai, reactions) pairs, e.g. pulled out of a depletion chain.
    // Isotopes are sorted, reactions keep the order they were given in.
    pub fn from_isotopes<I, R>(isotopes: I) -> XsResult<Self>
    where
        I: IntoIterator<Item = (usize, R)>,
        R: IntoIterator<Item = usize>,
    {
        let mut isotopes: Vec<(usize, Vec<usize>)> = isotopes
            .into_iter()
            .map(|(zai, reactions)| (zai, reactions.into_iter().collect()))
            .collect();
        isotopes.sort_by_key(|(zai, _)| *zai);

        let mut zais = Vec::with_capacity(isotopes.len());
        let mut zptr = Vec::with_capacity(isotopes.len() + 1);
        let mut rxns = Vec::new();
        zptr.push(0);
        for (zai, reactions) in isotopes {
            zais.push(zai);
            rxns.extend(reactions);
            zptr.push(rxns.len());
        }

        // Duplicate isotopes are caught by the ordering check
        Self::new(zais, rxns, zptr)
    }

    /// Number of stored reactions
    pub fn len(&self) -> usize {
        self.rxns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rxns.is_empty()
    }

    pub fn num_isotopes(&self) -> usize {
        self.zais.len()
    }

    pub fn zais(&self) -> &[usize] {
        &self.zais
    }

    pub fn rxns(&self) -> &[usize] {
        &self.rxns
    }

    pub fn zptr(&self) -> &[usize] {
        &self.zptr
    }

    /// Iterate over `(zai, mt)` pairs in storage order
    pub fn iter(&self) -> XsIndexIter<'_> {
        XsIndexIter { index: self, isotope: 0, position: 0 }
    }

    /// Isotope and reaction stored at a flat position. Negative positions
    /// count back from the end, so `locate(-1)` is the last reaction.
    pub fn locate(&self, position: isize) -> XsResult<(usize, usize)> {
        let len = self.rxns.len() as isize;
        let flat = if position < 0 { position + len } else { position };
        if flat < 0 || flat >= len {
            return Err(XsError::NotFound(format!(
                "Reaction position {} (index holds {} reactions)",
                position, len
            )));
        }
        let flat = flat as usize;

        // Owning isotope is the last segment starting at or before `flat`. A position
        // sitting exactly on a boundary belongs to the isotope starting there, and
        // isotopes without reactions are stepped over.
        let isotope = self.zptr.partition_point(|&start| start <= flat) - 1;
        Ok((self.zais[isotope], self.rxns[flat]))
    }

    /// Flat position of a given isotope and reaction, the inverse of [`XsIndex::locate`]
    pub fn index_of(&self, zai: usize, mt: usize) -> XsResult<usize> {
        self.reactions_of(zai)?
            .find(|&(rxn, _)| rxn == mt)
            .map(|(_, position)| position)
            .ok_or_else(|| XsError::NotFound(format!("Reaction {} of isotope {}", mt, zai)))
    }

    /// Position of `zai` in [`XsIndex::zais`]
    pub fn find_isotope(&self, zai: usize) -> XsResult<usize> {
        self.zais
            .binary_search(&zai)
            .map_err(|_| XsError::NotFound(format!("Isotope {}", zai)))
    }

    /// `(mt, flat position)` for every reaction of one isotope
    pub fn reactions_of(&self, zai: usize) -> XsResult<impl Iterator<Item = (usize, usize)> + '_> {
        let isotope = self.find_isotope(zai)?;
        let start = self.zptr[isotope];
        let end = self.zptr[isotope + 1];
        Ok(self.rxns[start..end]
            .iter()
            .enumerate()
            .map(move |(offset, &mt)| (mt, start + offset)))
    }

    // Human readable label for a flat position, used in diagnostics
    pub fn describe(&self, position: isize) -> XsResult<String> {
        let (zai, mt) = self.locate(position)?;
        Ok(match ReactionType::from_mt(mt) {
            Some(reaction) => format!("{} MT={} ({})", zai, mt, reaction),
            None => format!("{} MT={}", zai, mt),
        })
    }
}

impl fmt::Display for XsIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "XsIndex({} isotopes, {} reactions)", self.num_isotopes(), self.len())
    }
}

impl<'a> IntoIterator for &'a XsIndex {
    type Item = (usize, usize);
    type IntoIter = XsIndexIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

//=====================================================================
// Lazy walk over an XsIndex. Calling `XsIndex::iter` again starts a
// fresh walk from the first reaction.
//=====================================================================
#[derive(Debug, Clone)]
pub struct XsIndexIter<'a> {
    index: &'a XsIndex,
    isotope: usize,
    position: usize,
}

impl Iterator for XsIndexIter<'_> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.position >= self.index.rxns.len() {
            return None;
        }
        // Step past every segment that ends at or before the current position
        while self.index.zptr[self.isotope + 1] <= self.position {
            self.isotope += 1;
        }
        let item = (self.index.zais[self.isotope], self.index.rxns[self.position]);
        self.position += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.index.rxns.len() - self.position;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for XsIndexIter<'_> {}

#[cfg(test)]
mod tests {
    use std::hash::{DefaultHasher, Hash, Hasher};

    use super::*;
    use crate::utils::testing::{TEST_INDEX, test_index};

    #[test]
    fn test_iteration() {
        let index = test_index();
        let pairs: Vec<(usize, usize)> = index.iter().collect();
        assert_eq!(
            pairs,
            vec![(80160, 102), (922350, 18), (922350, 102), (922380, 102), (922380, 18)]
        );
        assert_eq!(index.iter().len(), 5);

        // Iteration can be restarted
        let again: Vec<(usize, usize)> = (&*index).into_iter().collect();
        assert_eq!(pairs, again);
    }

    #[test]
    fn test_locate() {
        let index = test_index();
        assert_eq!(index.locate(0).unwrap(), (80160, 102));
        assert_eq!(index.locate(1).unwrap(), (922350, 18));
        assert_eq!(index.locate(2).unwrap(), (922350, 102));
        assert_eq!(index.locate(3).unwrap(), (922380, 102));
        assert_eq!(index.locate(-1).unwrap(), (922380, 18));
        assert_eq!(index.locate(-1).unwrap(), index.locate(index.len() as isize - 1).unwrap());
        assert_eq!(index.locate(-5).unwrap(), (80160, 102));
    }

    #[test]
    fn test_locate_out_of_range() {
        let index = test_index();
        assert!(matches!(index.locate(5), Err(XsError::NotFound(_))));
        assert!(matches!(index.locate(-6), Err(XsError::NotFound(_))));
    }

    #[test]
    fn test_index_of() {
        let index = test_index();
        assert_eq!(index.index_of(922350, 18).unwrap(), 1);
        assert_eq!(index.index_of(922350, 102).unwrap(), 2);
        assert_eq!(index.index_of(922380, 18).unwrap(), 4);
        assert!(matches!(index.index_of(922350, 16), Err(XsError::NotFound(_))));
        assert!(matches!(index.index_of(942390, 18), Err(XsError::NotFound(_))));
    }

    #[test]
    fn test_round_trip() {
        let index = test_index();
        for position in 0..index.len() {
            let (zai, mt) = index.locate(position as isize).unwrap();
            assert_eq!(index.index_of(zai, mt).unwrap(), position);
        }
    }

    #[test]
    fn test_round_trip_with_empty_segments() {
        // 10010 and 541350 carry no reactions
        let index = XsIndex::new(
            vec![10010, 80160, 541350, 922350],
            vec![102, 102, 18, 16, 17],
            vec![0, 0, 1, 1, 5],
        )
        .unwrap();
        assert_eq!(index.locate(0).unwrap(), (80160, 102));
        assert_eq!(index.locate(1).unwrap(), (922350, 102));
        for position in 0..index.len() {
            let (zai, mt) = index.locate(position as isize).unwrap();
            assert_eq!(index.index_of(zai, mt).unwrap(), position);
        }
        let pairs: Vec<(usize, usize)> = index.iter().collect();
        assert_eq!(pairs[0], (80160, 102));
        assert_eq!(pairs[4], (922350, 17));
        assert_eq!(index.reactions_of(10010).unwrap().count(), 0);
    }

    #[test]
    fn test_find_isotope() {
        let index = test_index();
        assert_eq!(index.find_isotope(80160).unwrap(), 0);
        assert_eq!(index.find_isotope(922380).unwrap(), 2);
        assert!(matches!(index.find_isotope(922360), Err(XsError::NotFound(_))));
        assert!(matches!(index.find_isotope(10010), Err(XsError::NotFound(_))));
        assert!(matches!(index.find_isotope(999999), Err(XsError::NotFound(_))));
    }

    #[test]
    fn test_reactions_of() {
        let index = test_index();
        let reactions: Vec<(usize, usize)> = index.reactions_of(922380).unwrap().collect();
        assert_eq!(reactions, vec![(102, 3), (18, 4)]);
        let reactions: Vec<(usize, usize)> = index.reactions_of(922350).unwrap().collect();
        assert_eq!(reactions, vec![(18, 1), (102, 2)]);
        assert!(index.reactions_of(10010).is_err());
    }

    #[test]
    fn test_pointer_count_mismatch() {
        let result = XsIndex::new(vec![80160, 922350], vec![102, 18], vec![0, 1]);
        assert!(matches!(result, Err(XsError::LengthMismatch { expected: 3, found: 2, .. })));

        let result = XsIndex::new(vec![], vec![], vec![]);
        assert!(matches!(result, Err(XsError::LengthMismatch { .. })));
    }

    #[test]
    fn test_reaction_count_mismatch() {
        let result = XsIndex::new(vec![80160, 922350], vec![102, 18], vec![0, 1, 3]);
        assert!(matches!(result, Err(XsError::LengthMismatch { expected: 3, found: 2, .. })));
    }

    #[test]
    fn test_invalid_ordering() {
        let result = XsIndex::new(vec![922350, 80160], vec![102, 18], vec![0, 1, 2]);
        assert!(matches!(result, Err(XsError::InvalidIndex(_))));

        let result = XsIndex::new(vec![80160, 922350], vec![102], vec![0, 2, 1]);
        assert!(matches!(result, Err(XsError::InvalidIndex(_))));

        let result = XsIndex::new(vec![80160, 922350], vec![102, 18], vec![1, 1, 2]);
        assert!(matches!(result, Err(XsError::InvalidIndex(_))));
    }

    #[test]
    fn test_duplicate_reaction() {
        let result = XsIndex::new(vec![80160, 922350], vec![102, 18, 102, 18], vec![0, 1, 4]);
        assert!(matches!(result, Err(XsError::InvalidIndex(_))));

        // The same reaction on different isotopes is fine
        let index = XsIndex::new(vec![80160, 922350], vec![102, 18, 102], vec![0, 1, 3]).unwrap();
        assert_eq!(index.index_of(922350, 102).unwrap(), 2);

        let duplicated = XsIndex::from_isotopes(vec![(922350, vec![18, 102, 18])]);
        assert!(matches!(duplicated, Err(XsError::InvalidIndex(_))));
    }

    #[test]
    fn test_empty_index() {
        let index = XsIndex::new(vec![], vec![], vec![0]).unwrap();
        assert!(index.is_empty());
        assert_eq!(index.iter().count(), 0);
        assert!(index.locate(-1).is_err());
    }

    #[test]
    fn test_from_isotopes() {
        let index = XsIndex::from_isotopes(vec![
            (922380, vec![102, 18]),
            (80160, vec![102]),
            (922350, vec![18, 102]),
        ])
        .unwrap();
        assert_eq!(index, *test_index());

        let duplicated = XsIndex::from_isotopes(vec![(80160, vec![102]), (80160, vec![18])]);
        assert!(matches!(duplicated, Err(XsError::InvalidIndex(_))));
    }

    #[test]
    fn test_equality_and_hash() {
        let index = test_index();
        let same = XsIndex::new(
            vec![80160, 922350, 922380],
            vec![102, 18, 102, 102, 18],
            vec![0, 1, 3, 5],
        )
        .unwrap();
        assert_eq!(*index, same);

        let mut hasher = DefaultHasher::new();
        index.hash(&mut hasher);
        let hash1 = hasher.finish();
        let mut hasher = DefaultHasher::new();
        same.hash(&mut hasher);
        let hash2 = hasher.finish();
        assert_eq!(hash1, hash2);

        // Same shape, different reactions
        let other = XsIndex::new(
            vec![80160, 922350, 922380],
            vec![102, 18, 102, 102, 16],
            vec![0, 1, 3, 5],
        )
        .unwrap();
        assert_ne!(*index, other);
    }

    #[test]
    fn test_describe_and_display() {
        let index = &*TEST_INDEX;
        assert_eq!(index.describe(1).unwrap(), "922350 MT=18 (fission)");
        assert_eq!(index.describe(0).unwrap(), "80160 MT=102 (n,gamma)");
        assert_eq!(index.describe(-2).unwrap(), "922380 MT=102 (n,gamma)");
        assert_eq!(format!("{}", index), "XsIndex(3 isotopes, 5 reactions)");

        let unnamed = XsIndex::new(vec![10010], vec![999], vec![0, 1]).unwrap();
        assert_eq!(unnamed.describe(-1).unwrap(), "10010 MT=999");
    }
}
