//! Guesses a shopping category for a product from its name.
//!
//! Categories come from an ordered table of keyword rules. The first rule
//! whose keyword appears in the product name wins, so more specific keywords
//! (e.g. "ice cream") must come before the general ones they contain
//! (e.g. "cream").

/// The category for products that no rule matches.
pub const DEFAULT_CATEGORY: &str = "Other";

/// Maps products whose name contains `keyword` to `category`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRule {
    keyword: String,
    category: String,
}

impl CategoryRule {
    /// Create a rule. Matching ignores case.
    pub fn new(keyword: &str, category: &str) -> Self {
        Self {
            keyword: keyword.to_lowercase(),
            category: category.to_owned(),
        }
    }

    fn matches(&self, lowercase_name: &str) -> bool {
        lowercase_name.contains(&self.keyword)
    }
}

/// An ordered list of [CategoryRule]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRules {
    rules: Vec<CategoryRule>,
}

impl CategoryRules {
    /// Create a rule table from `rules`, tried in order.
    pub fn new(rules: Vec<CategoryRule>) -> Self {
        Self { rules }
    }

    /// Add a rule that is tried after the existing rules.
    pub fn with_rule(mut self, keyword: &str, category: &str) -> Self {
        self.rules.push(CategoryRule::new(keyword, category));
        self
    }

    /// Get the category of the first rule matching `product_name`, or
    /// [DEFAULT_CATEGORY] if none match.
    pub fn guess(&self, product_name: &str) -> &str {
        let name = product_name.to_lowercase();

        self.rules
            .iter()
            .find(|rule| rule.matches(&name))
            .map(|rule| rule.category.as_str())
            .unwrap_or(DEFAULT_CATEGORY)
    }
}

const GROCERY_RULES: &[(&str, &[&str])] = &[
    ("Fuel", &["diesel", "unleaded", "petrol"]),
    (
        "Household",
        &[
            "toilet",
            "kitchen roll",
            "washing",
            "detergent",
            "bleach",
            "bin bag",
            "foil",
        ],
    ),
    (
        "Toiletries",
        &["shampoo", "toothpaste", "soap", "deodorant", "shower"],
    ),
    ("Frozen", &["frozen", "ice cream"]),
    (
        "Alcohol",
        &["beer", "lager", "wine", "cider", "vodka", "whisky"],
    ),
    ("Drinks", &["juice", "water", "cola", "coffee", "squash"]),
    ("Snacks", &["crisps", "chocolate", "biscuit", "sweets"]),
    (
        "Dairy & Eggs",
        &[
            "milk", "cheese", "cheddar", "yogurt", "yoghurt", "butter", "cream", "eggs",
        ],
    ),
    (
        "Bakery",
        &["bread", "loaf", "bagel", "croissant", "rolls", "wrap"],
    ),
    (
        "Meat & Fish",
        &[
            "chicken", "beef", "pork", "bacon", "sausage", "mince", "salmon", "tuna", "fish",
            "prawn",
        ],
    ),
    (
        "Fruit & Veg",
        &[
            "apple", "banana", "orange", "grape", "berr", "tomato", "potato", "onion", "carrot",
            "lettuce", "salad", "pepper", "broccoli", "avocado", "lemon", "mushroom",
        ],
    ),
    (
        "Cupboard",
        &[
            "pasta", "rice", "flour", "sugar", "cereal", "beans", "soup", "sauce", "oil",
        ],
    ),
];

impl Default for CategoryRules {
    /// The built-in rules for supermarket products.
    fn default() -> Self {
        let rules = GROCERY_RULES
            .iter()
            .flat_map(|(category, keywords)| {
                keywords
                    .iter()
                    .map(|keyword| CategoryRule::new(keyword, category))
            })
            .collect();

        Self::new(rules)
    }
}
