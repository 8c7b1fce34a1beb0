use std::collections::HashMap;

use uuid::Uuid;

use crate::entity::categories::Model as CategoryModel;

pub const PATH_SEPARATOR: char = '/';

/// A resolved category and every category below it.
#[derive(Debug, Clone)]
pub struct CategoryScope {
    pub category: CategoryModel,
    pub descendants: Vec<CategoryModel>,
}

impl CategoryScope {
    /// The category's own id first, then its descendants.
    pub fn ids(&self) -> Vec<Uuid> {
        std::iter::once(self.category.id)
            .chain(self.descendants.iter().map(|c| c.id))
            .collect()
    }
}

/// `candidate` lies strictly below `ancestor` in the materialized path.
///
/// A shared string prefix is not enough: `laptop-10` is not below `laptop-1`.
pub fn is_descendant_path(ancestor: &str, candidate: &str) -> bool {
    candidate
        .strip_prefix(ancestor)
        .and_then(|rest| rest.strip_prefix(PATH_SEPARATOR))
        .is_some_and(|rest| !rest.is_empty())
}

pub fn child_full_slug(parent_full_slug: Option<&str>, slug: &str) -> String {
    match parent_full_slug {
        Some(parent) => format!("{parent}{PATH_SEPARATOR}{slug}"),
        None => slug.to_string(),
    }
}

/// URL slug for a display name: lowercase ASCII words joined by `-`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.chars().flat_map(char::to_lowercase) {
        let ch = match ch {
            // dot left over from lowercasing 'İ'
            '\u{307}' => continue,
            'ç' => 'c',
            'ğ' => 'g',
            'ı' => 'i',
            'ö' => 'o',
            'ş' => 's',
            'ü' => 'u',
            other => other,
        };
        if ch.is_ascii_alphanumeric() {
            slug.push(ch);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Categories strictly below `root`, in path order.
pub fn descendants_of(all: &[CategoryModel], root: &CategoryModel) -> Vec<CategoryModel> {
    let mut found: Vec<CategoryModel> = all
        .iter()
        .filter(|c| is_descendant_path(&root.full_slug, &c.full_slug))
        .cloned()
        .collect();
    found.sort_by(|a, b| a.full_slug.cmp(&b.full_slug));
    found
}

/// Sum per-category counts over each category's subtree.
///
/// `direct` holds counts keyed by the category a product is directly assigned to.
/// The traversal walks the materialized paths, so tree depth never grows the stack.
pub fn subtree_totals(all: &[CategoryModel], direct: &HashMap<Uuid, u64>) -> HashMap<Uuid, u64> {
    let mut totals = HashMap::with_capacity(all.len());
    for category in all {
        let own = direct.get(&category.id).copied().unwrap_or(0);
        let below: u64 = all
            .iter()
            .filter(|c| is_descendant_path(&category.full_slug, &c.full_slug))
            .map(|c| direct.get(&c.id).copied().unwrap_or(0))
            .sum();
        totals.insert(category.id, own + below);
    }
    totals
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use super::child_full_slug;
    use crate::entity::categories::Model as CategoryModel;

    pub fn category(full_slug: &str, parent: Option<&CategoryModel>) -> CategoryModel {
        let slug = full_slug.rsplit('/').next().unwrap_or(full_slug).to_string();
        assert_eq!(
            child_full_slug(parent.map(|p| p.full_slug.as_str()), &slug),
            full_slug
        );
        CategoryModel {
            id: Uuid::new_v4(),
            name: slug.replace('-', " "),
            slug,
            full_slug: full_slug.to_string(),
            parent_id: parent.map(|p| p.id),
            product_count: 0,
            created_at: Utc
                .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
                .unwrap()
                .fixed_offset(),
        }
    }
}
