use crate::column::Column;

/// Maximal runs of equal consecutive values in a column
#[derive(Debug, Clone, PartialEq)]
pub struct Runs {
    /// Offset of the first element of each run
    pub begin: Vec<usize>,
    /// Offset one past the last element of each run
    pub end: Vec<usize>,
    /// The value shared by each run
    pub values: Column,
}

impl Runs {
    pub fn len(&self) -> usize {
        self.begin.len()
    }

    pub fn is_empty(&self) -> bool {
        self.begin.is_empty()
    }
}

impl Column {
    /// Split the column into contiguous runs of equal values
    ///
    /// Missing elements compare equal to each other and unequal to every present value.
    pub fn contiguous(&self) -> Runs {
        let len = self.len();
        let mut begin = Vec::new();
        let mut end = Vec::new();

        let mut previous = None;
        for i in 0..len {
            let current = self.value_at(i);
            if previous.as_ref() != Some(&current) {
                if !begin.is_empty() {
                    end.push(i);
                }
                begin.push(i);
            }
            previous = Some(current);
        }
        if !begin.is_empty() {
            end.push(len);
        }

        let values = self.take(&begin);
        Runs { begin, end, values }
    }
}
