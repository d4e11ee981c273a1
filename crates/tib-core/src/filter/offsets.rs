/// Maps output char positions of a filtered stream back to input positions.
///
/// Each entry `(output_pos, cumulative_diff)` applies from `output_pos`
/// onwards until the next entry. Entries are appended in strictly increasing
/// output order.
#[derive(Debug, Default, Clone)]
pub struct OffsetCorrector {
    entries: Vec<(usize, isize)>,
}

impl OffsetCorrector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one converted chunk.
    ///
    /// `input_end` is the absolute input offset just after the chunk,
    /// `input_len` the chunk's length and `output_len` the length of its
    /// replacement.
    pub fn record(&mut self, input_end: usize, input_len: usize, output_len: usize) {
        let diff = input_len as isize - output_len as isize;
        if diff == 0 {
            return;
        }
        let prev = self.last_cumulative_diff();
        let input_end = input_end as isize;
        if diff > 0 {
            // Fewer output chars: everything after this chunk's output shifts.
            self.push((input_end - diff - prev) as usize, prev + diff);
        } else {
            // Each extra output char points back at the chunk's last input char.
            let output_start = input_end - prev;
            for extra in 0..-diff {
                self.push((output_start + extra) as usize, prev - extra - 1);
            }
        }
    }

    /// Input position for `output_pos`.
    pub fn correct(&self, output_pos: usize) -> usize {
        let idx = self.entries.partition_point(|&(pos, _)| pos <= output_pos);
        let diff = match idx {
            0 => 0,
            i => self.entries[i - 1].1,
        };
        (output_pos as isize + diff) as usize
    }

    pub fn last_cumulative_diff(&self) -> isize {
        self.entries.last().map_or(0, |&(_, diff)| diff)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn push(&mut self, output_pos: usize, cumulative_diff: isize) {
        debug_assert!(
            self.entries.last().map_or(true, |&(pos, _)| pos < output_pos),
            "offset entries must be strictly increasing"
        );
        self.entries.push((output_pos, cumulative_diff));
    }
}
