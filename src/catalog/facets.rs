use std::collections::{BTreeMap, HashMap};

use uuid::Uuid;

use crate::{
    catalog::scope::subtree_totals,
    dto::catalog::{CategoryCount, FilterCounts},
    entity::categories::Model as CategoryModel,
    models::Specifications,
};

/// Filtered product counts for every category's subtree.
///
/// `direct` maps a category id to the number of filtered products assigned directly to
/// it, i.e. the filter evaluated without its own category scope.
pub fn category_counts(
    categories: &[CategoryModel],
    direct: &HashMap<Uuid, u64>,
) -> Vec<CategoryCount> {
    let totals = subtree_totals(categories, direct);
    categories
        .iter()
        .map(|category| CategoryCount {
            id: category.id,
            name: category.name.clone(),
            slug: category.slug.clone(),
            full_slug: category.full_slug.clone(),
            filtered_count: totals.get(&category.id).copied().unwrap_or(0),
        })
        .collect()
}

impl FilterCounts {
    /// Count raw values across the filtered products. Empty values are skipped.
    pub fn tally<'a>(products: impl IntoIterator<Item = &'a Specifications>) -> Self {
        let mut counts = FilterCounts::default();
        for specs in products {
            let simple = &specs.simple;
            let detailed = &specs.detailed;

            if !simple.processor.is_empty() {
                bump(&mut counts.processor, &detailed.processor.processor);
            }
            bump(
                &mut counts.processor_architecture,
                &detailed.processor.processor_architecture,
            );
            if !simple.graphics.is_empty() {
                bump(&mut counts.graphics, &detailed.graphics.gpu);
            }
            bump(&mut counts.memory, &simple.memory);
            bump(&mut counts.display, &simple.display);
            bump(&mut counts.os, &simple.os);
            bump(&mut counts.first_port, &detailed.storage.first_port);
            bump(&mut counts.second_port, &detailed.storage.second_port);
        }
        counts
    }
}

/// Unset (empty) values are not offered as a filter option.
fn bump(map: &mut BTreeMap<String, u64>, value: &str) {
    if value.is_empty() {
        return;
    }
    *map.entry(value.to_string()).or_insert(0) += 1;
}
