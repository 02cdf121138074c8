//! 初始数据填充
//!
//! 只有集合为空时才插入固定数据，重复运行不会产生重复记录。

use chrono::Utc;
use tracing::{info, warn};

use super::products::{
    model::{NewProduct, ProductFields},
    repository::ProductRepository,
};
use super::users::{
    model::{NewUser, UserFields},
    repository::UserRepository,
};
use crate::infrastructure::database::StoreError;

const INITIAL_USERS: &[(&str, &str, i64)] = &[
    ("Juan Pérez", "juan@email.com", 30),
    ("María García", "maria@email.com", 25),
    ("Carlos López", "carlos@email.com", 35),
];

const INITIAL_PRODUCTS: &[(&str, f64, &str, i64)] = &[
    ("Laptop Dell", 800.99, "Electrónicos", 15),
    ("Smartphone Samsung", 450.00, "Electrónicos", 25),
    ("Mesa de Oficina", 120.50, "Muebles", 8),
    ("Libro de JavaScript", 35.99, "Libros", 50),
];

/// 每个集合实际插入的条数，跳过的集合为 0
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub users_inserted: usize,
    pub products_inserted: usize,
}

pub async fn seed(
    users: &dyn UserRepository,
    products: &dyn ProductRepository,
) -> Result<SeedReport, StoreError> {
    let mut report = SeedReport::default();

    let existing_users = users.count().await?;
    if existing_users > 0 {
        warn!("已存在 {} 个用户，跳过用户数据", existing_users);
    } else {
        let now = Utc::now();
        for (name, email, age) in INITIAL_USERS {
            users
                .insert(NewUser {
                    fields: UserFields {
                        name: name.to_string(),
                        email: email.to_string(),
                        age: *age,
                    },
                    created_at: now,
                })
                .await?;
        }
        report.users_inserted = INITIAL_USERS.len();
        info!("✅ 已插入 {} 个初始用户", report.users_inserted);
    }

    let existing_products = products.count().await?;
    if existing_products > 0 {
        warn!("已存在 {} 个产品，跳过产品数据", existing_products);
    } else {
        let now = Utc::now();
        for (name, price, category, stock) in INITIAL_PRODUCTS {
            products
                .insert(NewProduct {
                    fields: ProductFields {
                        name: name.to_string(),
                        price: *price,
                        category: category.to_string(),
                        stock: *stock,
                    },
                    created_at: now,
                })
                .await?;
        }
        report.products_inserted = INITIAL_PRODUCTS.len();
        info!("✅ 已插入 {} 个初始产品", report.products_inserted);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::products::{memory::MemoryProductRepository, model::ProductFilter};
    use crate::app::users::memory::MemoryUserRepository;

    #[tokio::test]
    async fn test_seed_fills_empty_collections() {
        let users = MemoryUserRepository::new();
        let products = MemoryProductRepository::new();

        let report = seed(&users, &products).await.unwrap();
        assert_eq!(
            report,
            SeedReport {
                users_inserted: 3,
                products_inserted: 4,
            }
        );
        assert_eq!(users.count().await.unwrap(), 3);
        assert_eq!(
            products.list(&ProductFilter::default()).await.unwrap().len(),
            4
        );
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let users = MemoryUserRepository::new();
        let products = MemoryProductRepository::new();

        seed(&users, &products).await.unwrap();
        let second = seed(&users, &products).await.unwrap();

        assert_eq!(second, SeedReport::default());
        assert_eq!(users.count().await.unwrap(), 3);
        assert_eq!(products.count().await.unwrap(), 4);
    }
}
