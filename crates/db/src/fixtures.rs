use std::collections::BTreeSet;

use dokan_core::domain::faq::FaqEntry;
use dokan_core::domain::product::{Product, ProductCode};

use crate::connection::DbPool;
use crate::repositories::{
    FaqRepository, ProductRepository, RepositoryError, SqlFaqRepository, SqlProductRepository,
};

struct SeedProduct {
    code: &'static str,
    name: &'static str,
    price: u64,
    sizes: &'static [&'static str],
    color: &'static str,
    stock_label: &'static str,
    image_url: Option<&'static str>,
}

/// Sample catalog for demos and local testing.
const SEED_PRODUCTS: &[SeedProduct] = &[
    SeedProduct {
        code: "DR-1050",
        name: "Cotton Three-Piece",
        price: 1050,
        sizes: &["M", "L", "XL"],
        color: "Maroon",
        stock_label: "In stock",
        image_url: Some("https://cdn.example.com/catalog/dr-1050.jpg"),
    },
    SeedProduct {
        code: "DR-2040",
        name: "Georgette Party Gown",
        price: 2450,
        sizes: &["S", "M", "L"],
        color: "Navy Blue",
        stock_label: "Only 3 left",
        image_url: None,
    },
    SeedProduct {
        code: "KT-220",
        name: "Block Print Kurti",
        price: 890,
        sizes: &["M", "L"],
        color: "Indigo",
        stock_label: "In stock",
        image_url: None,
    },
];

/// (question, comma-separated keywords, answer) in match order.
const SEED_FAQS: &[(&str, &str, &str)] = &[
    (
        "Delivery charge",
        "delivery, ডেলিভারি, charge, চার্জ",
        "ঢাকার ভিতরে ডেলিভারি চার্জ ৭০ টাকা, ঢাকার বাইরে ১৫০ টাকা।",
    ),
    (
        "Delivery time",
        "কতদিন, how many days",
        "ঢাকার ভিতরে ১-২ দিন, ঢাকার বাইরে ৩-৫ দিনের মধ্যে ডেলিভারি হয়।",
    ),
    ("Payment", "bkash, বিকাশ, payment, পেমেন্ট", "ক্যাশ অন ডেলিভারি এবং বিকাশ দুটোই চলবে।"),
    ("Returns", "return, exchange, ফেরত, এক্সচেঞ্জ", "ডেলিভারির ৩ দিনের মধ্যে এক্সচেঞ্জ করা যাবে।"),
];

pub struct DemoDataset;

impl DemoDataset {
    /// Upserts the sample catalog and FAQ. Running it twice leaves the same
    /// rows behind.
    pub async fn load(pool: &DbPool) -> Result<SeedResult, RepositoryError> {
        let products = SqlProductRepository::new(pool.clone());
        for product in Self::products() {
            products.save(product).await?;
        }

        let faqs = SqlFaqRepository::new(pool.clone());
        for entry in Self::faq_entries() {
            faqs.save(entry).await?;
        }

        Ok(SeedResult { products_seeded: SEED_PRODUCTS.len(), faqs_seeded: SEED_FAQS.len() })
    }

    pub async fn verify(pool: &DbPool) -> Result<VerificationResult, RepositoryError> {
        let mut checks = Vec::new();

        let products = SqlProductRepository::new(pool.clone());
        for seed in SEED_PRODUCTS {
            let found = products.find_by_code(&ProductCode::new(seed.code)).await?;
            checks.push((seed.code, found.is_some_and(|product| product.price == seed.price)));
        }

        let faqs = SqlFaqRepository::new(pool.clone()).list().await?;
        for (question, _, _) in SEED_FAQS {
            checks.push((*question, faqs.iter().any(|entry| entry.question == *question)));
        }

        let all_present = checks.iter().all(|(_, ok)| *ok);
        Ok(VerificationResult { all_present, checks })
    }

    pub fn products() -> Vec<Product> {
        SEED_PRODUCTS
            .iter()
            .map(|seed| Product {
                code: ProductCode::new(seed.code),
                name: seed.name.to_string(),
                price: seed.price,
                sizes: seed.sizes.iter().map(|size| size.to_string()).collect::<BTreeSet<_>>(),
                color: seed.color.to_string(),
                stock_label: seed.stock_label.to_string(),
                image_url: seed.image_url.map(str::to_string),
                video_url: None,
            })
            .collect()
    }

    pub fn faq_entries() -> Vec<FaqEntry> {
        SEED_FAQS
            .iter()
            .map(|(question, keywords, answer)| {
                FaqEntry::from_keyword_list(question, keywords, answer)
            })
            .collect()
    }
}

#[derive(Debug)]
pub struct SeedResult {
    pub products_seeded: usize,
    pub faqs_seeded: usize,
}

#[derive(Debug)]
pub struct VerificationResult {
    pub all_present: bool,
    pub checks: Vec<(&'static str, bool)>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{connect_with_settings, migrations};

    #[test]
    fn seed_records_are_valid() {
        for product in DemoDataset::products() {
            product.validate().expect("seed product should validate");
        }
        for entry in DemoDataset::faq_entries() {
            entry.validate().expect("seed faq entry should validate");
        }
    }

    #[tokio::test]
    async fn load_is_idempotent_and_verifiable() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("run migrations");

        let first = DemoDataset::load(&pool).await.expect("load seed");
        let first_verification = DemoDataset::verify(&pool).await.expect("verify seed");
        assert!(first_verification.all_present);
        assert_eq!(first.products_seeded, 3);

        DemoDataset::load(&pool).await.expect("reload seed");
        let second_verification = DemoDataset::verify(&pool).await.expect("re-verify seed");
        assert_eq!(first_verification.checks, second_verification.checks);

        let faq_count: i64 = sqlx::query_scalar("SELECT COUNT(1) FROM faq_entry")
            .fetch_one(&pool)
            .await
            .expect("count faq rows");
        assert_eq!(faq_count, SEED_FAQS.len() as i64);
    }
}
