use std::collections::HashMap;
use std::hash::Hash;

/// Running sum and count of one numeric column.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Accumulator {
    pub sum: f64,
    pub count: usize,
}

impl Accumulator {
    pub fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    /// `None` for an empty group, never NaN.
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

impl FromIterator<f64> for Accumulator {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut acc = Accumulator::default();
        for value in iter {
            acc.push(value);
        }
        acc
    }
}

/// Group-by that remembers the order keys were first seen in.
///
/// `finish` returns groups in first-seen order; callers sort from there.
#[derive(Debug, Clone)]
pub struct Grouped<K, V> {
    slots: HashMap<K, usize>,
    groups: Vec<(K, V)>,
}

impl<K, V> Default for Grouped<K, V> {
    fn default() -> Self {
        Self {
            slots: HashMap::new(),
            groups: Vec::new(),
        }
    }
}

impl<K: Hash + Eq + Clone, V: Default> Grouped<K, V> {
    pub fn entry(&mut self, key: &K) -> &mut V {
        let slot = match self.slots.get(key) {
            Some(&slot) => slot,
            None => {
                self.groups.push((key.clone(), V::default()));
                self.slots.insert(key.clone(), self.groups.len() - 1);
                self.groups.len() - 1
            }
        };
        &mut self.groups[slot].1
    }

    pub fn finish(self) -> Vec<(K, V)> {
        self.groups
    }

    /// Groups sorted by key.
    pub fn finish_sorted(self) -> Vec<(K, V)>
    where
        K: Ord,
    {
        let mut groups = self.groups;
        groups.sort_by(|a, b| a.0.cmp(&b.0));
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_accumulator_has_no_mean() {
        let acc = Accumulator::default();
        assert_eq!(acc.sum, 0.0);
        assert_eq!(acc.count, 0);
        assert_eq!(acc.mean(), None);
    }

    #[test]
    fn mean_of_values() {
        let acc: Accumulator = [100.0, 50.0].into_iter().collect();
        assert_eq!(acc.mean(), Some(75.0));
    }

    #[test]
    fn groups_keep_first_seen_order() {
        let mut g: Grouped<&str, Accumulator> = Grouped::default();
        for (k, v) in [("b", 1.0), ("a", 2.0), ("b", 3.0)] {
            g.entry(&k).push(v);
        }
        let keys: Vec<&str> = g.clone().finish().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["b", "a"]);

        let sorted = g.finish_sorted();
        assert_eq!(sorted[0].0, "a");
        assert_eq!(sorted[1].1.sum, 4.0);
    }
}
