use crate::core::error::{Error, Result};

/// Bitmask to track missing values
///
/// A set bit marks the element at that position as missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitMask {
    pub(crate) data: Vec<u8>,
    pub(crate) len: usize,
}

impl BitMask {
    /// Creates a new bitmask with every bit cleared
    pub fn new(length: usize) -> Self {
        let bytes_needed = (length + 7) / 8;

        Self {
            data: vec![0u8; bytes_needed],
            len: length,
        }
    }

    /// Creates a bitmask from a slice of boolean values
    pub fn from_bools(bools: &[bool]) -> Self {
        let mut mask = Self::new(bools.len());
        for (i, &is_set) in bools.iter().enumerate() {
            if is_set {
                mask.data[i / 8] |= 1 << (i % 8);
            }
        }
        mask
    }

    /// Checks if a bit is set
    pub fn get(&self, index: usize) -> Result<bool> {
        if index >= self.len {
            return Err(Error::IndexOutOfBounds {
                index: index as isize,
                size: self.len,
            });
        }

        Ok(self.is_set(index))
    }

    #[inline]
    pub(crate) fn is_set(&self, index: usize) -> bool {
        (self.data[index / 8] & (1 << (index % 8))) != 0
    }

    /// Sets or clears the bit at `index`
    pub fn set(&mut self, index: usize, value: bool) -> Result<()> {
        if index >= self.len {
            return Err(Error::IndexOutOfBounds {
                index: index as isize,
                size: self.len,
            });
        }

        let byte_idx = index / 8;
        let bit = 1u8 << (index % 8);
        if value {
            self.data[byte_idx] |= bit;
        } else {
            self.data[byte_idx] &= !bit;
        }
        Ok(())
    }

    /// Number of set bits
    pub fn count_ones(&self) -> usize {
        self.data.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Whether any bit is set
    pub fn any(&self) -> bool {
        self.data.iter().any(|&b| b != 0)
    }

    /// Gathers the bits at `positions` into a new mask
    ///
    /// Positions must already be bounds-checked against `len`.
    pub fn take(&self, positions: &[usize]) -> Self {
        let mut mask = Self::new(positions.len());
        for (i, &pos) in positions.iter().enumerate() {
            if self.is_set(pos) {
                mask.data[i / 8] |= 1 << (i % 8);
            }
        }
        mask
    }

    /// Converts the bitmask to a vector of boolean values
    pub fn to_bools(&self) -> Vec<bool> {
        (0..self.len).map(|i| self.is_set(i)).collect()
    }

    /// Returns the length of the bitmask
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns whether the bitmask is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bools_packs_bits() {
        let mut bools = vec![false; 10];
        bools[0] = true;
        bools[9] = true;
        let mask = BitMask::from_bools(&bools);
        assert_eq!(mask.count_ones(), 2);
        assert_eq!(mask.data, vec![0b0000_0001, 0b0000_0010]);
    }

    #[test]
    fn test_set_and_get() {
        let mut mask = BitMask::new(12);
        mask.set(9, true).unwrap();
        assert!(mask.get(9).unwrap());
        assert!(!mask.get(8).unwrap());
        mask.set(9, false).unwrap();
        assert!(!mask.any());
        assert!(mask.get(12).is_err());
    }

    #[test]
    fn test_take_reorders_bits() {
        let mask = BitMask::from_bools(&[true, false, false, true]);
        let taken = mask.take(&[3, 3, 1, 0]);
        assert_eq!(taken.to_bools(), vec![true, true, false, true]);
    }
}
