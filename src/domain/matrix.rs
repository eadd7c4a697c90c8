use std::collections::{BTreeMap, BTreeSet};

use super::models::{mean_rating, ItemId, ItemRatings, RatingValue, UserId};

/// Sparse user → item → rating matrix.
///
/// A user is present only while it has at least one rating; removing the
/// last rating of a user removes the user as well.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatingMatrix {
    users: BTreeMap<UserId, ItemRatings>,
}

impl RatingMatrix {
    pub fn new() -> Self {
        Self {
            users: BTreeMap::new(),
        }
    }

    /// Build a matrix from an explicitly supplied map, dropping users without ratings
    pub fn from_users(users: BTreeMap<UserId, ItemRatings>) -> Self {
        let users = users
            .into_iter()
            .filter(|(_, ratings)| !ratings.is_empty())
            .collect();
        Self { users }
    }

    /// Insert or replace a rating, returning the previous value
    pub fn insert(
        &mut self,
        user: impl Into<UserId>,
        item: impl Into<ItemId>,
        rating: RatingValue,
    ) -> Option<RatingValue> {
        self.users
            .entry(user.into())
            .or_default()
            .insert(item.into(), rating)
    }

    /// Remove a rating, returning its value if it existed
    pub fn remove(&mut self, user: &str, item: &str) -> Option<RatingValue> {
        let ratings = self.users.get_mut(user)?;
        let removed = ratings.remove(item);

        if ratings.is_empty() {
            self.users.remove(user);
        }

        removed
    }

    pub fn get(&self, user: &str, item: &str) -> Option<RatingValue> {
        self.users.get(user)?.get(item).copied()
    }

    pub fn has_rated(&self, user: &str, item: &str) -> bool {
        self.get(user, item).is_some()
    }

    pub fn user_ratings(&self, user: &str) -> Option<&ItemRatings> {
        self.users.get(user)
    }

    pub fn contains_user(&self, user: &str) -> bool {
        self.users.contains_key(user)
    }

    pub fn mean_rating(&self, user: &str) -> Option<RatingValue> {
        self.users.get(user).and_then(mean_rating)
    }

    pub fn users(&self) -> impl Iterator<Item = &UserId> {
        self.users.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&UserId, &ItemRatings)> {
        self.users.iter()
    }

    /// Every observed `(user, item, rating)` triple, in user then item order
    pub fn entries(&self) -> impl Iterator<Item = (&UserId, &ItemId, RatingValue)> {
        self.users.iter().flat_map(|(user, ratings)| {
            ratings
                .iter()
                .map(move |(item, &rating)| (user, item, rating))
        })
    }

    /// Distinct items rated by anyone, sorted
    pub fn items(&self) -> Vec<ItemId> {
        let items: BTreeSet<&ItemId> = self
            .users
            .values()
            .flat_map(|ratings| ratings.keys())
            .collect();
        items.into_iter().cloned().collect()
    }

    pub fn num_users(&self) -> usize {
        self.users.len()
    }

    pub fn num_items(&self) -> usize {
        self.items().len()
    }

    pub fn num_ratings(&self) -> usize {
        self.users.values().map(|ratings| ratings.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl<U, I> FromIterator<(U, I, RatingValue)> for RatingMatrix
where
    U: Into<UserId>,
    I: Into<ItemId>,
{
    fn from_iter<T: IntoIterator<Item = (U, I, RatingValue)>>(iter: T) -> Self {
        let mut matrix = RatingMatrix::new();
        for (user, item, rating) in iter {
            matrix.insert(user, item, rating);
        }
        matrix
    }
}
