use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::PawprintError;

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Dog Food")]
    DogFood,
    #[serde(rename = "Cat Food")]
    CatFood,
    #[serde(rename = "Dog Toys")]
    DogToys,
    #[serde(rename = "Cat Toys")]
    CatToys,
    #[serde(rename = "Pet Accessories")]
    PetAccessories,
    #[serde(rename = "Grooming Supplies")]
    GroomingSupplies,
    #[serde(rename = "Grooming Services")]
    GroomingServices,
    #[serde(rename = "Health Products")]
    HealthProducts,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::DogFood,
        Category::CatFood,
        Category::DogToys,
        Category::CatToys,
        Category::PetAccessories,
        Category::GroomingSupplies,
        Category::GroomingServices,
        Category::HealthProducts,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::DogFood => "Dog Food",
            Self::CatFood => "Cat Food",
            Self::DogToys => "Dog Toys",
            Self::CatToys => "Cat Toys",
            Self::PetAccessories => "Pet Accessories",
            Self::GroomingSupplies => "Grooming Supplies",
            Self::GroomingServices => "Grooming Services",
            Self::HealthProducts => "Health Products",
        }
    }

    pub fn products(&self) -> &'static [&'static str] {
        match self {
            Self::DogFood => &[
                "Premium Dry Dog Food",
                "Wet Dog Food Cans",
                "Puppy Kibble",
                "Senior Dog Diet",
                "Grain-Free Dog Food",
            ],
            Self::CatFood => &[
                "Premium Cat Kibble",
                "Wet Cat Food Pouches",
                "Kitten Formula",
                "Senior Cat Diet",
                "Hairball Control Formula",
            ],
            Self::DogToys => &[
                "Rubber Chew Toy",
                "Tennis Ball Pack",
                "Plush Squeaky Toy",
                "Rope Tug Toy",
                "Interactive Puzzle Toy",
            ],
            Self::CatToys => &[
                "Catnip Mouse",
                "Feather Wand",
                "Laser Pointer",
                "Cat Tunnel",
                "Interactive Ball Tower",
            ],
            Self::PetAccessories => &["Dog Collar", "Cat Collar", "Dog Leash", "Pet ID Tag", "Pet Carrier"],
            Self::GroomingSupplies => &["Dog Shampoo", "Cat Shampoo", "Nail Clippers", "Brush", "Toothbrush Kit"],
            Self::GroomingServices => &[
                "Basic Bath",
                "Full Grooming",
                "Nail Trim",
                "Teeth Cleaning",
                "De-shedding Treatment",
            ],
            Self::HealthProducts => &[
                "Flea & Tick Treatment",
                "Vitamins",
                "Joint Supplements",
                "Dental Chews",
                "Ear Cleaner",
            ],
        }
    }

    /// Unit price range (min, max) in dollars.
    pub fn price_range(&self) -> (f64, f64) {
        match self {
            Self::DogFood => (15.0, 60.0),
            Self::CatFood => (10.0, 45.0),
            Self::DogToys => (5.0, 25.0),
            Self::CatToys => (3.0, 20.0),
            Self::PetAccessories => (8.0, 40.0),
            Self::GroomingSupplies => (7.0, 30.0),
            Self::GroomingServices => (25.0, 120.0),
            Self::HealthProducts => (12.0, 50.0),
        }
    }

    /// Demand multiplier per calendar month, January first.
    pub fn seasonal_factors(&self) -> [f64; 12] {
        match self {
            Self::DogFood => [1.0, 1.0, 1.0, 1.0, 1.1, 1.2, 1.3, 1.2, 1.1, 1.0, 1.0, 1.2],
            Self::CatFood => [1.0, 1.0, 1.0, 1.0, 1.1, 1.2, 1.2, 1.1, 1.0, 1.0, 1.0, 1.1],
            Self::DogToys | Self::CatToys => {
                [1.0, 1.0, 1.1, 1.2, 1.1, 1.0, 1.0, 1.0, 1.1, 1.0, 1.2, 1.5]
            }
            Self::PetAccessories => [1.0, 1.0, 1.1, 1.2, 1.3, 1.4, 1.3, 1.2, 1.1, 1.0, 1.1, 1.3],
            Self::GroomingSupplies => [1.0, 1.0, 1.1, 1.2, 1.3, 1.4, 1.5, 1.4, 1.3, 1.2, 1.1, 1.0],
            Self::GroomingServices => [1.0, 1.0, 1.1, 1.2, 1.3, 1.5, 1.6, 1.5, 1.3, 1.2, 1.1, 1.2],
            Self::HealthProducts => [1.3, 1.2, 1.1, 1.0, 1.0, 1.0, 1.0, 1.0, 1.1, 1.2, 1.3, 1.4],
        }
    }

    pub fn has_product(&self, product: &str) -> bool {
        self.products().contains(&product)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = PawprintError;

    /// Accepts the display name in any case; also "dog-food" / "dog_food".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace(['-', '_'], " ");
        Category::ALL
            .iter()
            .find(|c| c.name().eq_ignore_ascii_case(&wanted))
            .copied()
            .ok_or_else(|| PawprintError::UnknownCategory(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Sales line
// ---------------------------------------------------------------------------

/// One line item of a basket. Field order matches the CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesLine {
    pub transaction_id: String,
    pub date: NaiveDate,
    pub customer_id: String,
    pub category: Category,
    pub product: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub total_price: f64,
    pub discount: f64,
}

/// Round a dollar amount to cents.
pub fn round_cents(val: f64) -> f64 {
    (val * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_str_variants() {
        assert_eq!("Dog Food".parse::<Category>().unwrap(), Category::DogFood);
        assert_eq!("grooming-services".parse::<Category>().unwrap(), Category::GroomingServices);
        assert_eq!("HEALTH_PRODUCTS".parse::<Category>().unwrap(), Category::HealthProducts);
        assert!("Fish Food".parse::<Category>().is_err());
    }

    #[test]
    fn test_every_product_belongs_to_one_category() {
        for cat in Category::ALL {
            for product in cat.products() {
                let owners: Vec<_> = Category::ALL.iter().filter(|c| c.has_product(product)).collect();
                assert_eq!(owners, vec![&cat], "{product} should belong only to {cat}");
            }
        }
    }

    #[test]
    fn test_category_serializes_as_display_name() {
        let json = serde_json::to_string(&Category::PetAccessories).unwrap();
        assert_eq!(json, "\"Pet Accessories\"");
    }

    #[test]
    fn test_round_cents() {
        assert_eq!(round_cents(12.345_1), 12.35);
        assert_eq!(round_cents(0.0), 0.0);
        assert_eq!(round_cents(19.994), 19.99);
    }
}
