use std::collections::BTreeMap;

use crate::domain::{ItemId, RatingMatrix};
use crate::errors::RecommendError;
use crate::neighborhood::select_neighbors;
use crate::similarity::SimilarityMetric;

#[derive(Debug, Clone, PartialEq)]
pub struct RecommendedItem {
    pub item: ItemId,
    pub score: f64,
    /// Number of neighbors that rated the item
    pub support: usize,
}

#[derive(Default)]
struct ItemTotals {
    weighted_sum: f64,
    similarity_sum: f64,
    support: usize,
}

/// Items `user` has not rated, scored by the similarity-weighted average of
/// the neighborhood's ratings, best first.
pub fn recommend_items(
    matrix: &RatingMatrix,
    user: &str,
    metric: &dyn SimilarityMetric,
    neighborhood_size: usize,
    limit: usize,
) -> Result<Vec<RecommendedItem>, RecommendError> {
    let Some(user_ratings) = matrix.user_ratings(user) else {
        return Ok(Vec::new());
    };

    let neighbors = select_neighbors(matrix, user, metric, neighborhood_size)?;
    let mut totals: BTreeMap<&ItemId, ItemTotals> = BTreeMap::new();

    for neighbor in &neighbors {
        let Some(ratings) = matrix.user_ratings(&neighbor.user) else {
            continue;
        };

        for (item, rating) in ratings.iter().filter(|(item, _)| !user_ratings.contains_key(*item)) {
            let entry = totals.entry(item).or_default();
            entry.weighted_sum += rating * neighbor.similarity;
            entry.similarity_sum += neighbor.similarity.abs();
            entry.support += 1;
        }
    }

    let mut recommendations: Vec<RecommendedItem> = totals
        .into_iter()
        .map(|(item, totals)| RecommendedItem {
            item: item.clone(),
            score: totals.weighted_sum / totals.similarity_sum,
            support: totals.support,
        })
        .collect();

    recommendations.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.item.cmp(&b.item)));
    recommendations.truncate(limit);

    Ok(recommendations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::Metric;

    fn matrix() -> RatingMatrix {
        [
            ("A", "x", 5.0),
            ("A", "y", 3.0),
            ("A", "z", 4.0),
            ("B", "x", 4.0),
            ("B", "y", 3.0),
            ("B", "z", 5.0),
            ("B", "u", 2.0),
            ("B", "v", 5.0),
            ("D", "x", 5.0),
            ("D", "y", 2.0),
            ("D", "z", 4.0),
            ("D", "v", 3.0),
            ("C", "x", 1.0),
            ("C", "y", 5.0),
            ("C", "z", 1.0),
            ("C", "t", 5.0),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_recommends_only_unseen_items_from_positive_neighbors() {
        let recommendations = recommend_items(&matrix(), "A", &Metric::Pearson, 200, 10).unwrap();

        let items: Vec<&str> = recommendations.iter().map(|r| r.item.as_str()).collect();
        // t is only rated by the anti-correlated C
        assert_eq!(items.len(), 2);
        assert!(items.contains(&"u"));
        assert!(items.contains(&"v"));
        assert!(recommendations.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_scores_are_weighted_averages() {
        let recommendations = recommend_items(&matrix(), "A", &Metric::Pearson, 200, 10).unwrap();

        let u = recommendations.iter().find(|r| r.item == "u").unwrap();
        assert!((u.score - 2.0).abs() < 1e-12);
        assert_eq!(u.support, 1);

        let v = recommendations.iter().find(|r| r.item == "v").unwrap();
        assert!(v.score > 3.0 && v.score < 5.0);
        assert_eq!(v.support, 2);
    }

    #[test]
    fn test_limit() {
        let recommendations = recommend_items(&matrix(), "A", &Metric::Pearson, 200, 1).unwrap();
        assert_eq!(recommendations.len(), 1);
    }

    #[test]
    fn test_unknown_user() {
        let recommendations = recommend_items(&matrix(), "nobody", &Metric::Pearson, 200, 10).unwrap();
        assert!(recommendations.is_empty());
    }
}
