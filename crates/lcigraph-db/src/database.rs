//! Ordered activity store
//!
//! Activities are kept in insertion order (iteration order is part of the
//! determinism contract of every pass) with a name index for supplier
//! lookups. Removal rebuilds the index.

use crate::model::{Activity, ActivityKey};
use crate::query::{describe, matches_all, Filter};
use crate::{DbError, Result};
use ahash::{AHashMap, AHashSet};
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct Database {
    activities: Vec<Activity>,
    by_name: AHashMap<String, Vec<usize>>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_activities(activities: Vec<Activity>) -> Self {
        let mut db = Self {
            activities,
            by_name: AHashMap::new(),
        };
        db.reindex();
        db
    }

    pub fn into_activities(self) -> Vec<Activity> {
        self.activities
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Activity> {
        self.activities.iter()
    }

    /// Mutable access to every activity. Identity fields must not change
    /// through this iterator; call [`Database::reindex`] if they do.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Activity> {
        self.activities.iter_mut()
    }

    pub fn reindex(&mut self) {
        self.by_name.clear();
        for (idx, act) in self.activities.iter().enumerate() {
            self.by_name.entry(act.name.clone()).or_default().push(idx);
        }
    }

    pub fn push(&mut self, activity: Activity) {
        let idx = self.activities.len();
        self.by_name
            .entry(activity.name.clone())
            .or_default()
            .push(idx);
        self.activities.push(activity);
    }

    /// Push unless an activity with the same identity already exists.
    pub fn push_unique(&mut self, activity: Activity) -> bool {
        if self.contains_key(&activity.key()) {
            tracing::debug!(activity = %activity.key(), "skipping duplicate activity");
            return false;
        }
        self.push(activity);
        true
    }

    pub fn extend<I: IntoIterator<Item = Activity>>(&mut self, activities: I) {
        for act in activities {
            self.push(act);
        }
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    pub fn named(&self, name: &str) -> impl Iterator<Item = &Activity> {
        self.by_name
            .get(name)
            .into_iter()
            .flatten()
            .map(move |&idx| &self.activities[idx])
    }

    /// Activities that can supply an exchange of this name and product.
    pub fn candidates(&self, name: &str, product: Option<&str>) -> Vec<&Activity> {
        self.named(name)
            .filter(|a| product.map_or(true, |p| a.reference_product == p))
            .collect()
    }

    pub fn find(&self, key: &ActivityKey) -> Option<&Activity> {
        self.named(&key.name)
            .find(|a| a.reference_product == key.reference_product && a.location == key.location)
    }

    pub fn contains_key(&self, key: &ActivityKey) -> bool {
        self.find(key).is_some()
    }

    pub fn by_code(&self, code: &str) -> Option<&Activity> {
        self.activities.iter().find(|a| a.code == code)
    }

    /// Every activity matching all `filters`, in database order.
    pub fn get_many(&self, filters: &[Filter]) -> Vec<&Activity> {
        self.activities
            .iter()
            .filter(|a| matches_all(filters, *a))
            .collect()
    }

    /// Exactly one match, else `NoResults` / `MultipleResults`.
    pub fn get_one(&self, filters: &[Filter]) -> Result<&Activity> {
        let found = self.get_many(filters);
        match found.as_slice() {
            [] => Err(DbError::NoResults {
                query: describe(filters),
            }),
            [one] => Ok(*one),
            _ => Err(DbError::MultipleResults {
                query: describe(filters),
                count: found.len(),
            }),
        }
    }

    // ========================================================================
    // Removal
    // ========================================================================

    /// Remove every activity matching `pred` and return them in order.
    pub fn remove_where<F>(&mut self, mut pred: F) -> Vec<Activity>
    where
        F: FnMut(&Activity) -> bool,
    {
        let (removed, kept): (Vec<Activity>, Vec<Activity>) =
            std::mem::take(&mut self.activities)
                .into_iter()
                .partition(|a| pred(a));
        self.activities = kept;
        self.reindex();
        removed
    }

    /// Keep only the activities matching `keep`.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&Activity) -> bool,
    {
        self.activities.retain(|a| keep(a));
        self.reindex();
    }

    /// Identity keys held by more than one activity.
    pub fn duplicate_keys(&self) -> Vec<ActivityKey> {
        let mut seen = AHashSet::new();
        let mut dups = Vec::new();
        for act in &self.activities {
            let key = act.key();
            if !seen.insert(key.clone()) && !dups.contains(&key) {
                dups.push(key);
            }
        }
        dups
    }

    // ========================================================================
    // Snapshots
    // ========================================================================

    pub fn from_json_str(json: &str) -> Result<Self> {
        let activities: Vec<Activity> = serde_json::from_str(json)?;
        Ok(Self::from_activities(activities))
    }

    pub fn load_json(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.activities)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Database {
    type Item = &'a Activity;
    type IntoIter = std::slice::Iter<'a, Activity>;

    fn into_iter(self) -> Self::IntoIter {
        self.activities.iter()
    }
}

impl FromIterator<Activity> for Database {
    fn from_iter<I: IntoIterator<Item = Activity>>(iter: I) -> Self {
        Self::from_activities(iter.into_iter().collect())
    }
}
