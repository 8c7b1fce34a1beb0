use std::str::FromStr;

use laptop_catalog_api::{
    catalog::scope::{child_full_slug, slugify},
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    entity::{categories, products, users},
    models::{
        DetailedSpecs, GraphicsDetails, MemoryDetails, ProcessorDetails, ProductImage,
        ProductImages, SimpleSpecs, Specifications, StorageDetails,
    },
    services::{auth_service::hash_password, category_service::refresh_product_count},
};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, Set,
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    // Ensure migrations are applied.
    run_migrations(&orm).await?;

    let admin_id = ensure_user(&orm, "admin@example.com", "admin123", "admin").await?;
    let user_id = ensure_user(&orm, "user@example.com", "user123", "user").await?;

    let root = ensure_category(&orm, "Laptoplar", None).await?;
    let gaming = ensure_category(&orm, "Oyun Bilgisayarları", Some(&root)).await?;
    let office = ensure_category(&orm, "İş Bilgisayarları", Some(&root)).await?;
    seed_laptops(&orm, &gaming, &office).await?;

    println!("Seed completed. Admin ID: {admin_id}, User ID: {user_id}");
    Ok(())
}

async fn ensure_user(
    orm: &DatabaseConnection,
    email: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    if let Some(existing) = users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .one(orm)
        .await?
    {
        let mut active: users::ActiveModel = existing.into();
        active.role = Set(role.to_string());
        let user = active.update(orm).await?;
        println!("Ensured user {email} (role={role})");
        return Ok(user.id);
    }

    let user = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        password_hash: Set(hash_password(password)?),
        created_at: NotSet,
        role: Set(role.to_string()),
    }
    .insert(orm)
    .await?;

    println!("Ensured user {email} (role={role})");
    Ok(user.id)
}

async fn ensure_category(
    orm: &DatabaseConnection,
    name: &str,
    parent: Option<&categories::Model>,
) -> anyhow::Result<categories::Model> {
    let slug = slugify(name);
    let full_slug = child_full_slug(parent.map(|p| p.full_slug.as_str()), &slug);

    if let Some(existing) = categories::Entity::find()
        .filter(categories::Column::FullSlug.eq(full_slug.as_str()))
        .one(orm)
        .await?
    {
        return Ok(existing);
    }

    let category = categories::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        slug: Set(slug),
        full_slug: Set(full_slug),
        parent_id: Set(parent.map(|p| p.id)),
        product_count: Set(0),
        created_at: NotSet,
    }
    .insert(orm)
    .await?;
    println!("Seeded category {}", category.full_slug);
    Ok(category)
}

struct SeedLaptop {
    name: &'static str,
    price: &'static str,
    stock: i32,
    processor: &'static str,
    architecture: &'static str,
    gpu: &'static str,
    memory: &'static str,
    first_port: &'static str,
}

fn specifications(laptop: &SeedLaptop) -> Specifications {
    Specifications {
        simple: SimpleSpecs {
            processor: format!("Intel® Core™ {}", laptop.processor),
            graphics: laptop.gpu.to_string(),
            memory: laptop.memory.to_string(),
            storage: laptop.first_port.to_string(),
            display: "15.6\" FHD 144Hz".to_string(),
            os: "Windows 11 Home".to_string(),
            ..Default::default()
        },
        detailed: DetailedSpecs {
            processor: ProcessorDetails {
                processor_architecture: laptop.architecture.to_string(),
                processor: laptop.processor.to_string(),
            },
            graphics: GraphicsDetails {
                gpu: laptop.gpu.to_string(),
            },
            memory: MemoryDetails {
                ram: laptop.memory.to_string(),
            },
            storage: StorageDetails {
                first_port: laptop.first_port.to_string(),
                second_port: String::new(),
            },
            ..Default::default()
        },
    }
}

async fn seed_laptops(
    orm: &DatabaseConnection,
    gaming: &categories::Model,
    office: &categories::Model,
) -> anyhow::Result<()> {
    let laptops = [
        (
            gaming,
            SeedLaptop {
                name: "MSI Katana 15",
                price: "42999.00",
                stock: 8,
                processor: "i7-13620H",
                architecture: "13. Nesil",
                gpu: "6GB RTX 4050",
                memory: "(2x8GB) 5200MHz",
                first_port: "1TB M.2 SSD",
            },
        ),
        (
            gaming,
            SeedLaptop {
                name: "ASUS TUF Gaming F15",
                price: "38499.00",
                stock: 0,
                processor: "i5-12500H",
                architecture: "12. Nesil",
                gpu: "4GB RTX 3050",
                memory: "(1x16GB) 3200MHz",
                first_port: "512GB M.2 SSD",
            },
        ),
        (
            office,
            SeedLaptop {
                name: "Lenovo ThinkPad E14",
                price: "27999.00",
                stock: 15,
                processor: "i5-1335U",
                architecture: "13. Nesil",
                gpu: "Intel® Iris® Xe Graphics",
                memory: "(2x8GB) 3200MHz",
                first_port: "512GB M.2 SSD",
            },
        ),
    ];

    for (category, laptop) in &laptops {
        let slug = slugify(laptop.name);
        let exists = products::Entity::find()
            .filter(products::Column::CategoryId.eq(category.id))
            .filter(products::Column::Slug.eq(slug.as_str()))
            .one(orm)
            .await?
            .is_some();
        if exists {
            continue;
        }

        products::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(laptop.name.to_string()),
            description: Set(format!("{} dizüstü bilgisayar", laptop.name)),
            price: Set(Decimal::from_str(laptop.price)?),
            stock: Set(laptop.stock),
            category_id: Set(category.id),
            slug: Set(slug.clone()),
            images: Set(ProductImages(vec![ProductImage {
                url: format!("/images/{slug}.jpg"),
                alt: laptop.name.to_string(),
                is_main: true,
            }])),
            specifications: Set(specifications(laptop)),
            is_active: Set(true),
            is_deleted: Set(false),
            created_at: NotSet,
            updated_at: NotSet,
        }
        .insert(orm)
        .await?;
    }

    for category in [gaming, office] {
        refresh_product_count(orm, category.id).await?;
    }

    println!("Seeded laptops");
    Ok(())
}
