use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, Condition, sea_query::Expr};
use uuid::Uuid;

use crate::{
    catalog::spec_matcher::SpecMatcher,
    entity::products::Column,
    routes::params::{CatalogQuery, present},
};
#[cfg(test)]
use crate::{entity::products::Model as ProductModel, models::Specifications};

/// A filterable specification value and where it is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecField {
    Processor,
    ProcessorArchitecture,
    Graphics,
    Memory,
    Storage,
    Display,
    Os,
    FirstPort,
    SecondPort,
}

impl SpecField {
    pub const ALL: [SpecField; 9] = [
        SpecField::Processor,
        SpecField::ProcessorArchitecture,
        SpecField::Graphics,
        SpecField::Memory,
        SpecField::Storage,
        SpecField::Display,
        SpecField::Os,
        SpecField::FirstPort,
        SpecField::SecondPort,
    ];

    /// Key path inside the `specifications` document.
    pub fn path(self) -> &'static [&'static str] {
        match self {
            SpecField::Processor => &["simple", "processor"],
            SpecField::ProcessorArchitecture => {
                &["detailed", "processor", "processorArchitecture"]
            }
            SpecField::Graphics => &["simple", "graphics"],
            SpecField::Memory => &["simple", "memory"],
            SpecField::Storage => &["simple", "storage"],
            SpecField::Display => &["simple", "display"],
            SpecField::Os => &["simple", "os"],
            SpecField::FirstPort => &["detailed", "storage", "firstPort"],
            SpecField::SecondPort => &["detailed", "storage", "secondPort"],
        }
    }

    #[cfg(test)]
    pub fn stored(self, specs: &Specifications) -> &str {
        match self {
            SpecField::Processor => &specs.simple.processor,
            SpecField::ProcessorArchitecture => &specs.detailed.processor.processor_architecture,
            SpecField::Graphics => &specs.simple.graphics,
            SpecField::Memory => &specs.simple.memory,
            SpecField::Storage => &specs.simple.storage,
            SpecField::Display => &specs.simple.display,
            SpecField::Os => &specs.simple.os,
            SpecField::FirstPort => &specs.detailed.storage.first_port,
            SpecField::SecondPort => &specs.detailed.storage.second_port,
        }
    }

    fn requested(self, query: &CatalogQuery) -> Option<&str> {
        let value = match self {
            SpecField::Processor => &query.processor,
            SpecField::ProcessorArchitecture => &query.processor_architecture,
            SpecField::Graphics => &query.graphics,
            SpecField::Memory => &query.memory,
            SpecField::Storage => &query.storage,
            SpecField::Display => &query.display,
            SpecField::Os => &query.os,
            SpecField::FirstPort => &query.first_port,
            SpecField::SecondPort => &query.second_port,
        };
        present(value)
    }

    fn matcher(self, raw: &str) -> SpecMatcher {
        match self {
            SpecField::Memory => SpecMatcher::memory(raw),
            SpecField::Graphics => SpecMatcher::graphics(raw),
            SpecField::Storage | SpecField::FirstPort | SpecField::SecondPort => {
                SpecMatcher::capacity(raw)
            }
            SpecField::Processor | SpecField::Display | SpecField::Os => SpecMatcher::token(raw),
            SpecField::ProcessorArchitecture => SpecMatcher::contains(raw),
        }
    }

    fn sql_text(self) -> String {
        let keys = self
            .path()
            .iter()
            .map(|key| format!("'{key}'"))
            .collect::<Vec<_>>()
            .join(", ");
        format!(r#"jsonb_extract_path_text("products"."specifications", {keys})"#)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecPredicate {
    pub field: SpecField,
    pub matcher: SpecMatcher,
}

/// The constraints of one catalog query, ANDed together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFilter {
    pub category_ids: Vec<Uuid>,
    pub specs: Vec<SpecPredicate>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub in_stock_only: bool,
}

impl ProductFilter {
    pub fn build(query: &CatalogQuery, category_ids: Vec<Uuid>) -> Self {
        let specs = SpecField::ALL
            .iter()
            .filter_map(|field| {
                field.requested(query).map(|raw| SpecPredicate {
                    field: *field,
                    matcher: field.matcher(raw),
                })
            })
            .collect();

        Self {
            category_ids,
            specs,
            min_price: query.min_price(),
            max_price: query.max_price(),
            in_stock_only: query.in_stock_only(),
        }
    }

    /// Full predicate: category scope plus [`ProductFilter::unscoped_condition`].
    pub fn condition(&self) -> Condition {
        Condition::all()
            .add(Column::CategoryId.is_in(self.category_ids.clone()))
            .add(self.unscoped_condition())
    }

    /// Every constraint except the category scope.
    pub fn unscoped_condition(&self) -> Condition {
        let mut condition = Condition::all().add(Column::IsDeleted.eq(false));

        for spec in &self.specs {
            let sql = format!("{} ~* $1", spec.field.sql_text());
            for clause in spec.matcher.clauses() {
                condition = condition.add(Expr::cust_with_values(sql.as_str(), [clause]));
            }
        }

        if let Some(min_price) = self.min_price {
            condition = condition.add(Column::Price.gte(min_price));
        }

        if let Some(max_price) = self.max_price {
            condition = condition.add(Column::Price.lte(max_price));
        }

        if self.in_stock_only {
            condition = condition.add(Column::Stock.gt(0));
        }

        condition
    }

    /// Evaluate the predicate against a loaded row.
    #[cfg(test)]
    pub fn matches(&self, product: &ProductModel) -> bool {
        !product.is_deleted
            && self.category_ids.contains(&product.category_id)
            && self.min_price.is_none_or(|min| product.price >= min)
            && self.max_price.is_none_or(|max| product.price <= max)
            && (!self.in_stock_only || product.stock > 0)
            && self.specs.iter().all(|spec| {
                spec.matcher
                    .matches(spec.field.stored(&product.specifications))
            })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use sea_orm::{EntityTrait, QueryFilter, QueryTrait, sea_query::PostgresQueryBuilder};

    use super::*;
    use crate::{
        entity::products::Entity as Products,
        models::{ProductImages, SimpleSpecs},
    };

    fn product(category_id: Uuid, memory: &str, graphics: &str, stock: i32) -> ProductModel {
        let created = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap().fixed_offset();
        ProductModel {
            id: Uuid::new_v4(),
            name: "Test laptop".into(),
            description: String::new(),
            price: Decimal::new(45_000, 0),
            stock,
            category_id,
            slug: "test-laptop".into(),
            images: ProductImages::default(),
            specifications: Specifications {
                simple: SimpleSpecs {
                    memory: memory.into(),
                    graphics: graphics.into(),
                    processor: "Intel® Core™ i7-13700H".into(),
                    ..Default::default()
                },
                ..Default::default()
            },
            is_active: true,
            is_deleted: false,
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn only_present_dimensions_become_predicates() {
        let query = CatalogQuery {
            memory: Some("2x16GB 4800MHz".into()),
            graphics: Some(String::new()),
            first_port: Some("1TB".into()),
            ..Default::default()
        };
        let filter = ProductFilter::build(&query, vec![]);
        let fields: Vec<_> = filter.specs.iter().map(|s| s.field).collect();
        assert_eq!(fields, vec![SpecField::Memory, SpecField::FirstPort]);
        assert!(!filter.in_stock_only);
        assert_eq!(filter.min_price, None);
    }

    #[test]
    fn identical_parameters_build_identical_predicates() {
        let scope = vec![Uuid::new_v4(), Uuid::new_v4()];
        let query = CatalogQuery {
            processor: Some("i7-13700H".into()),
            graphics: Some("6GB RTX 4050".into()),
            min_price: Some("20000".into()),
            in_stock: Some("true".into()),
            ..Default::default()
        };
        let first = ProductFilter::build(&query, scope.clone());
        let second = ProductFilter::build(&query, scope);
        assert_eq!(first, second);

        let render = |filter: &ProductFilter| {
            Products::find()
                .filter(filter.condition())
                .into_query()
                .to_string(PostgresQueryBuilder)
        };
        assert_eq!(render(&first), render(&second));
    }

    #[test]
    fn condition_renders_regex_clauses_against_the_document() {
        let query = CatalogQuery {
            graphics: Some("6GB RTX 4050".into()),
            second_port: Some("500GB".into()),
            max_price: Some("35000".into()),
            ..Default::default()
        };
        let filter = ProductFilter::build(&query, vec![Uuid::nil()]);
        let sql = Products::find()
            .filter(filter.condition())
            .into_query()
            .to_string(PostgresQueryBuilder);

        assert!(sql.contains(
            r#"jsonb_extract_path_text("products"."specifications", 'simple', 'graphics') ~*"#
        ));
        assert!(sql.contains("'detailed', 'storage', 'secondPort'"));
        assert!(sql.contains(r#""products"."is_deleted" = FALSE"#));
        assert!(sql.contains(r#""products"."price" <="#));
        assert!(!sql.contains(r#""products"."stock" >"#));
    }

    #[test]
    fn unscoped_condition_drops_only_the_category_scope() {
        let scope = Uuid::new_v4();
        let filter = ProductFilter::build(&CatalogQuery::default(), vec![scope]);
        let scoped = Products::find()
            .filter(filter.condition())
            .into_query()
            .to_string(PostgresQueryBuilder);
        let unscoped = Products::find()
            .filter(filter.unscoped_condition())
            .into_query()
            .to_string(PostgresQueryBuilder);
        assert!(scoped.contains(&scope.to_string()));
        assert!(!unscoped.contains(&scope.to_string()));
        assert!(unscoped.contains(r#""products"."is_deleted" = FALSE"#));
    }

    #[test]
    fn in_memory_evaluation_follows_the_same_rules() {
        let category = Uuid::new_v4();
        let query = CatalogQuery {
            memory: Some("2x16GB 4800MHz".into()),
            graphics: Some("6GB RTX 4050".into()),
            processor: Some("i7-13700H".into()),
            ..Default::default()
        };
        let filter = ProductFilter::build(&query, vec![category]);

        let hit = product(category, "(2x16GB) 4800 MHz", "RTX 4050 6GB GDDR6", 0);
        assert!(filter.matches(&hit));

        let wrong_memory = product(category, "(2x8GB) 4800MHz", "RTX 4050 6GB GDDR6", 3);
        assert!(!filter.matches(&wrong_memory));

        let wrong_gpu = product(category, "(2x16GB) 4800MHz", "8GB RTX 4060", 3);
        assert!(!filter.matches(&wrong_gpu));

        let other_category = product(Uuid::new_v4(), "(2x16GB) 4800MHz", "RTX 4050 6GB", 3);
        assert!(!filter.matches(&other_category));

        let mut deleted = hit.clone();
        deleted.is_deleted = true;
        assert!(!filter.matches(&deleted));
    }

    #[test]
    fn stock_is_only_constrained_when_requested() {
        let category = Uuid::new_v4();
        let sold_out = product(category, "", "", 0);

        let any_stock = ProductFilter::build(&CatalogQuery::default(), vec![category]);
        assert!(any_stock.matches(&sold_out));

        let query = CatalogQuery {
            in_stock: Some("true".into()),
            ..Default::default()
        };
        let in_stock = ProductFilter::build(&query, vec![category]);
        assert!(!in_stock.matches(&sold_out));
    }

    #[test]
    fn price_bounds_are_inclusive() {
        let category = Uuid::new_v4();
        let item = product(category, "", "", 1);
        let query = CatalogQuery {
            min_price: Some("45000".into()),
            max_price: Some("45000".into()),
            ..Default::default()
        };
        assert!(ProductFilter::build(&query, vec![category]).matches(&item));

        let query = CatalogQuery {
            min_price: Some("45000.01".into()),
            ..Default::default()
        };
        assert!(!ProductFilter::build(&query, vec![category]).matches(&item));
    }
}
