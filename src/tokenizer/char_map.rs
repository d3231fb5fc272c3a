/// Maps character codes to a value, dense for Latin-1 and by interval above.
///
/// Later registrations win over earlier ones, so a tokenizer can lay down a
/// broad default and carve exceptions out of it.
#[derive(Debug, Clone)]
pub struct CharReferenceMap<T> {
    dense: Vec<Option<T>>,
    intervals: Vec<(u32, u32, Option<T>)>,
}

const DENSE_SIZE: u32 = 256;

impl<T: Copy> CharReferenceMap<T> {
    pub fn new() -> Self {
        CharReferenceMap {
            dense: vec![None; DENSE_SIZE as usize],
            intervals: Vec::new(),
        }
    }

    /// Assigns `reference` to every code in `start..=end`.
    pub fn add_interval(&mut self, start: u32, end: u32, reference: T) {
        self.set_interval(start, end, Some(reference));
    }

    /// Removes any assignment for the codes in `start..=end`.
    pub fn remove_interval(&mut self, start: u32, end: u32) {
        self.set_interval(start, end, None);
    }

    pub fn add_char(&mut self, ch: char, reference: T) {
        self.add_interval(ch as u32, ch as u32, reference);
    }

    fn set_interval(&mut self, start: u32, end: u32, reference: Option<T>) {
        if start > end {
            return;
        }

        let dense_end = end.min(DENSE_SIZE - 1);
        for code in start..=dense_end {
            self.dense[code as usize] = reference;
        }

        if end >= DENSE_SIZE {
            self.intervals.push((start.max(DENSE_SIZE), end, reference));
        }
    }

    pub fn lookup(&self, ch: char) -> Option<T> {
        let code = ch as u32;
        if code < DENSE_SIZE {
            return self.dense[code as usize];
        }

        self.intervals
            .iter()
            .rev()
            .find(|(start, end, _)| (*start..=*end).contains(&code))
            .and_then(|(_, _, reference)| *reference)
    }

    pub fn clear(&mut self) {
        self.dense.iter_mut().for_each(|slot| *slot = None);
        self.intervals.clear();
    }
}

impl<T: Copy> Default for CharReferenceMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[test]
fn test_later_interval_overrides() {
    let mut map = CharReferenceMap::new();
    map.add_interval(0, 0xFFFE, 1);
    map.add_interval('a' as u32, 'z' as u32, 2);
    map.add_interval(0x400, 0x4FF, 3);

    assert_eq!(map.lookup('A'), Some(1));
    assert_eq!(map.lookup('q'), Some(2));
    assert_eq!(map.lookup('\u{0416}'), Some(3));
    assert_eq!(map.lookup('\u{3042}'), Some(1));
    assert_eq!(map.lookup('\u{1F600}'), None);

    map.clear();
    assert_eq!(map.lookup('q'), None);
}
