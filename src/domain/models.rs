use std::collections::BTreeMap;

pub type UserId = String;
pub type ItemId = String;
pub type RatingValue = f64;

/// Ratings of a single user, keyed by item
pub type ItemRatings = BTreeMap<ItemId, RatingValue>;

/// Mean of a user's ratings, `None` when the user has rated nothing
pub fn mean_rating(ratings: &ItemRatings) -> Option<RatingValue> {
    if ratings.is_empty() {
        return None;
    }

    let sum: RatingValue = ratings.values().sum();
    Some(sum / ratings.len() as f64)
}

/// Ratings present in both maps, as `(a, b)` pairs in item order
pub fn co_rated(a: &ItemRatings, b: &ItemRatings) -> Vec<(RatingValue, RatingValue)> {
    a.iter()
        .filter_map(|(item, &rating_a)| b.get(item).map(|&rating_b| (rating_a, rating_b)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratings(entries: &[(&str, f64)]) -> ItemRatings {
        entries
            .iter()
            .map(|(item, rating)| (item.to_string(), *rating))
            .collect()
    }

    #[test]
    fn test_mean_rating() {
        let r = ratings(&[("x", 5.0), ("y", 3.0), ("z", 4.0)]);
        assert!((mean_rating(&r).unwrap() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_mean_rating_empty() {
        assert_eq!(mean_rating(&ItemRatings::new()), None);
    }

    #[test]
    fn test_co_rated_keeps_only_shared_items() {
        let a = ratings(&[("x", 5.0), ("y", 3.0), ("z", 4.0)]);
        let b = ratings(&[("w", 1.0), ("y", 2.0), ("z", 1.0)]);

        assert_eq!(co_rated(&a, &b), vec![(3.0, 2.0), (4.0, 1.0)]);
        assert_eq!(co_rated(&b, &a), vec![(2.0, 3.0), (1.0, 4.0)]);
    }

    #[test]
    fn test_co_rated_disjoint() {
        let a = ratings(&[("x", 5.0)]);
        let b = ratings(&[("y", 5.0)]);
        assert!(co_rated(&a, &b).is_empty());
    }
}
