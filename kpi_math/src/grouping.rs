//! Order-preserving grouping

use std::collections::HashMap;
use std::hash::Hash;

/// Partition `items` by the key returned from `key_fn`.
///
/// Groups are returned in the order their key is first seen, and the items
/// inside each group keep their input order. Every item lands in exactly
/// one group.
///
/// # Examples
///
/// ```
/// use kpi_math::group_by;
///
/// let words = ["apple", "avocado", "banana"];
/// let groups = group_by(&words, |w| w.chars().next().unwrap());
///
/// assert_eq!(groups[0].0, 'a');
/// assert_eq!(groups[0].1, vec![&"apple", &"avocado"]);
/// assert_eq!(groups[1].1, vec![&"banana"]);
/// ```
pub fn group_by<'a, T, K, F>(items: &'a [T], key_fn: F) -> Vec<(K, Vec<&'a T>)>
where
    K: Eq + Hash + Clone,
    F: Fn(&T) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<&'a T>)> = Vec::new();

    for item in items {
        let key = key_fn(item);
        match index.get(&key) {
            Some(&position) => groups[position].1.push(item),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, vec![item]));
            }
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_are_exhaustive_and_disjoint() {
        let items: Vec<(u32, &str)> = vec![(1, "x"), (2, "y"), (3, "x"), (4, "z"), (5, "y")];
        let groups = group_by(&items, |i| i.1);

        let total: usize = groups.iter().map(|(_, members)| members.len()).sum();
        assert_eq!(total, items.len());

        let mut seen: Vec<u32> = groups
            .iter()
            .flat_map(|(_, members)| members.iter().map(|m| m.0))
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_first_seen_order() {
        let items = ["b", "a", "b", "c"];
        let keys: Vec<&str> = group_by(&items, |s| *s).into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_composite_key() {
        let items = [("food", "north"), ("food", "south"), ("food", "north")];
        let groups = group_by(&items, |i| (i.0.to_string(), i.1.to_string()));
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].1.len(), 2);
    }

    #[test]
    fn test_empty_input() {
        let items: [i32; 0] = [];
        assert!(group_by(&items, |i| *i).is_empty());
    }
}
