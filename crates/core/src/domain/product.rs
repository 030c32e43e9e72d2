use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Catalog code. Codes compare case-insensitively, so the stored form is
/// always upper case.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProductCode(String);

impl ProductCode {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ProductCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub code: ProductCode,
    pub name: String,
    /// Whole currency units; the catalog carries no fractional prices.
    pub price: u64,
    pub sizes: BTreeSet<String>,
    pub color: String,
    pub stock_label: String,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
}

impl Product {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.code.is_empty() {
            return Err(DomainError::InvalidProduct("product code must not be empty".to_string()));
        }
        if self.name.trim().is_empty() {
            return Err(DomainError::InvalidProduct(format!(
                "product `{}` must have a name",
                self.code
            )));
        }
        if self.code.as_str().chars().any(char::is_whitespace) {
            return Err(DomainError::InvalidProduct(format!(
                "product code `{}` must not contain whitespace",
                self.code
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::{Product, ProductCode};
    use crate::errors::DomainError;

    fn product(code: &str, name: &str) -> Product {
        Product {
            code: ProductCode::new(code),
            name: name.to_string(),
            price: 1050,
            sizes: BTreeSet::from(["M".to_string(), "L".to_string()]),
            color: "Maroon".to_string(),
            stock_label: "In stock".to_string(),
            image_url: None,
            video_url: None,
        }
    }

    #[test]
    fn product_codes_compare_case_insensitively() {
        assert_eq!(ProductCode::new(" dr-1050 "), ProductCode::new("DR-1050"));
    }

    #[test]
    fn validate_rejects_blank_code_and_name() {
        assert!(matches!(product("", "Dress").validate(), Err(DomainError::InvalidProduct(_))));
        assert!(matches!(product("DR-1", "  ").validate(), Err(DomainError::InvalidProduct(_))));
        assert!(product("DR-1050", "Kurti").validate().is_ok());
    }
}
