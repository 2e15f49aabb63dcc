use serde::{ Deserialize, Serialize };
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{ Path, PathBuf };
use thiserror::Error;
use log::info;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read menu file '{path}': {source}")] Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse menu file '{path}': {source}")] Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Menu catalog has no items")]
    Empty,
    #[error("Menu item names must not be blank")]
    BlankItemName,
    #[error("Alias for menu item '{0}' has a blank keyword")] BlankAliasKeyword(String),
    #[error("Menu item '{0}' is listed more than once")] DuplicateItem(String),
    #[error("Menu item '{0}' must have a positive price")] ZeroPrice(String),
    #[error("Alias '{keyword}' points to unknown menu item '{item}'")] UnknownAlias {
        keyword: String,
        item: String,
    },
    #[error("Rule '{rule}' references menu item '{item}' which is not in the catalog")] MissingItem {
        rule: String,
        item: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Hot,
    Cold,
    Food,
    Snacks,
    Drinks,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Hot,
        Category::Cold,
        Category::Food,
        Category::Snacks,
        Category::Drinks,
    ];

    pub fn icon(&self) -> &'static str {
        match self {
            Category::Hot => "☕",
            Category::Cold => "🧊",
            Category::Food => "🍕",
            Category::Snacks => "🥪",
            Category::Drinks => "🍹",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Category::Hot => "HOT",
            Category::Cold => "COLD",
            Category::Food => "FOOD",
            Category::Snacks => "SNACKS",
            Category::Drinks => "DRINKS",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MenuItem {
    pub name: String,
    pub price: u32,
    pub category: Category,
}

/// Secondary lookup entry: a partial name or category word mapped to an item.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Alias {
    pub keyword: String,
    pub item: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CafeInfo {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub hours: String,
}

/// On-disk shape of a menu override file.
#[derive(Debug, Deserialize)]
struct MenuFile {
    cafe: CafeInfo,
    items: Vec<MenuItem>,
    #[serde(default)]
    aliases: Vec<Alias>,
}

/// Immutable menu data shared by the matcher and the prompt builder.
///
/// Item order is declaration order. Direct name lookups return the first
/// declared item whose name appears in the text, so the order is part of the
/// catalog's behaviour.
#[derive(Debug, Clone)]
pub struct MenuCatalog {
    cafe: CafeInfo,
    items: Vec<MenuItem>,
    aliases: Vec<Alias>,
}

pub fn format_price(price: u32) -> String {
    format!("₹{}", price)
}

impl MenuCatalog {
    pub fn new(
        cafe: CafeInfo,
        items: Vec<MenuItem>,
        aliases: Vec<Alias>
    ) -> Result<Self, CatalogError> {
        if items.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        for item in &items {
            if item.name.trim().is_empty() {
                return Err(CatalogError::BlankItemName);
            }
            if !seen.insert(item.name.to_lowercase()) {
                return Err(CatalogError::DuplicateItem(item.name.clone()));
            }
            if item.price == 0 {
                return Err(CatalogError::ZeroPrice(item.name.clone()));
            }
        }

        let aliases = aliases
            .into_iter()
            .map(|alias| Alias {
                keyword: alias.keyword.to_lowercase(),
                item: alias.item,
            })
            .collect::<Vec<_>>();
        for alias in &aliases {
            if alias.keyword.trim().is_empty() {
                return Err(CatalogError::BlankAliasKeyword(alias.item.clone()));
            }
            if !seen.contains(&alias.item.to_lowercase()) {
                return Err(CatalogError::UnknownAlias {
                    keyword: alias.keyword.clone(),
                    item: alias.item.clone(),
                });
            }
        }

        Ok(Self { cafe, items, aliases })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: MenuFile = serde_json::from_str(&content).map_err(|source| CatalogError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::new(file.cafe, file.items, file.aliases)?;
        info!(
            "Loaded {} menu items and {} aliases from {}",
            catalog.items.len(),
            catalog.aliases.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Loads the catalog from `path` when given, otherwise the built-in table.
    pub fn load(path: Option<&str>) -> Result<Self, CatalogError> {
        match path {
            Some(p) if !p.trim().is_empty() => Self::from_file(p),
            _ => {
                info!("Using built-in menu catalog");
                Ok(Self::builtin())
            }
        }
    }

    pub fn builtin() -> Self {
        let item = |name: &str, price: u32, category: Category| MenuItem {
            name: name.to_string(),
            price,
            category,
        };
        let alias = |keyword: &str, item: &str| Alias {
            keyword: keyword.to_string(),
            item: item.to_string(),
        };

        Self {
            cafe: CafeInfo {
                name: "Love Over Coffee".to_string(),
                address: "PLOT NO 11, Scheme No 51, Scheme No 113, Indore".to_string(),
                phone: "093296 97769".to_string(),
                hours: "8 AM - 11 PM daily".to_string(),
            },
            items: vec![
                item("Cappuccino", 160, Category::Hot),
                item("Espresso", 110, Category::Hot),
                item("Americano", 150, Category::Hot),
                item("Hot Chocolate", 180, Category::Hot),
                item("Cafe Frappe", 190, Category::Cold),
                item("Tiramisu Frappe", 240, Category::Cold),
                item("Dark Choco Frappe", 200, Category::Cold),
                item("Nutella Frappe", 300, Category::Cold),
                item("Cheese Margarita", 310, Category::Food),
                item("Paneer Bhurji Pizza", 400, Category::Food),
                item("Farm Fresh Pizza", 330, Category::Food),
                item("Pesto Grilled Sandwich", 330, Category::Snacks),
                item("Veg Club Sandwich", 260, Category::Snacks),
                item("Tandoori Paneer Sandwich", 270, Category::Snacks),
                item("Peri Peri Fries", 220, Category::Snacks),
                item("Cheese Nachos", 270, Category::Snacks),
                item("Pao Bhaji Fondue", 350, Category::Snacks),
                item("Virgin Mojito", 170, Category::Drinks),
                item("Blueberry Ice Tea", 200, Category::Drinks)
            ],
            aliases: vec![
                alias("cappuccino", "Cappuccino"),
                alias("espresso", "Espresso"),
                alias("americano", "Americano"),
                alias("hot chocolate", "Hot Chocolate"),
                alias("chocolate", "Hot Chocolate"),
                alias("frappe", "Cafe Frappe"),
                alias("tiramisu", "Tiramisu Frappe"),
                alias("dark choco", "Dark Choco Frappe"),
                alias("nutella", "Nutella Frappe"),
                alias("margarita", "Cheese Margarita"),
                alias("pizza", "Paneer Bhurji Pizza"),
                alias("paneer pizza", "Paneer Bhurji Pizza"),
                alias("farm fresh", "Farm Fresh Pizza"),
                alias("pesto", "Pesto Grilled Sandwich"),
                alias("club sandwich", "Veg Club Sandwich"),
                alias("sandwich", "Veg Club Sandwich"),
                alias("tandoori", "Tandoori Paneer Sandwich"),
                alias("fries", "Peri Peri Fries"),
                alias("peri peri", "Peri Peri Fries"),
                alias("nachos", "Cheese Nachos"),
                alias("pao bhaji", "Pao Bhaji Fondue"),
                alias("fondue", "Pao Bhaji Fondue"),
                alias("mojito", "Virgin Mojito"),
                alias("ice tea", "Blueberry Ice Tea"),
                alias("blueberry", "Blueberry Ice Tea")
            ],
        }
    }

    pub fn cafe(&self) -> &CafeInfo {
        &self.cafe
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn aliases(&self) -> &[Alias] {
        &self.aliases
    }

    pub fn get(&self, name: &str) -> Option<&MenuItem> {
        let wanted = name.to_lowercase();
        self.items.iter().find(|item| item.name.to_lowercase() == wanted)
    }

    pub fn price(&self, name: &str) -> Option<u32> {
        self.get(name).map(|item| item.price)
    }

    /// Items grouped by category, skipping empty categories.
    pub fn by_category(&self) -> Vec<(Category, Vec<&MenuItem>)> {
        Category::ALL.iter()
            .filter_map(|category| {
                let items = self.items
                    .iter()
                    .filter(|item| item.category == *category)
                    .collect::<Vec<_>>();
                if items.is_empty() {
                    None
                } else {
                    Some((*category, items))
                }
            })
            .collect()
    }

    /// Fails with `MissingItem` for the first name in `names` the catalog lacks.
    pub fn require(&self, rule: &str, names: &[&str]) -> Result<(), CatalogError> {
        match names.iter().find(|name| self.get(name).is_none()) {
            Some(missing) =>
                Err(CatalogError::MissingItem {
                    rule: rule.to_string(),
                    item: missing.to_string(),
                }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn cafe() -> CafeInfo {
        MenuCatalog::builtin().cafe().clone()
    }

    fn item(name: &str, price: u32) -> MenuItem {
        MenuItem { name: name.to_string(), price, category: Category::Hot }
    }

    #[test]
    fn builtin_catalog_passes_validation() {
        let builtin = MenuCatalog::builtin();
        let rebuilt = MenuCatalog::new(
            builtin.cafe().clone(),
            builtin.items().to_vec(),
            builtin.aliases().to_vec()
        );
        assert!(rebuilt.is_ok());
        assert_eq!(builtin.price("Cappuccino"), Some(160));
        assert_eq!(builtin.price("cappuccino"), Some(160));
        assert_eq!(builtin.price("Flat White"), None);
    }

    #[test]
    fn rejects_duplicate_names_case_insensitively() {
        let err = MenuCatalog::new(
            cafe(),
            vec![item("Latte", 100), item("latte", 120)],
            vec![]
        ).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateItem(name) if name == "latte"));
    }

    #[test]
    fn rejects_zero_price_and_empty_catalog() {
        let err = MenuCatalog::new(cafe(), vec![item("Latte", 0)], vec![]).unwrap_err();
        assert!(matches!(err, CatalogError::ZeroPrice(_)));

        let err = MenuCatalog::new(cafe(), vec![], vec![]).unwrap_err();
        assert!(matches!(err, CatalogError::Empty));
    }

    #[test]
    fn rejects_alias_to_unknown_item() {
        let err = MenuCatalog::new(
            cafe(),
            vec![item("Latte", 100)],
            vec![Alias { keyword: "mocha".into(), item: "Mocha".into() }]
        ).unwrap_err();
        assert!(
            matches!(err, CatalogError::UnknownAlias { keyword, item } if keyword == "mocha" && item == "Mocha")
        );
    }

    #[test]
    fn rejects_blank_item_name() {
        let err = MenuCatalog::new(cafe(), vec![item("Latte", 100), item("  ", 5)], vec![]).unwrap_err();
        assert!(matches!(err, CatalogError::BlankItemName));
    }

    #[test]
    fn rejects_blank_alias_keyword() {
        let err = MenuCatalog::new(
            cafe(),
            vec![item("Espresso", 110)],
            vec![Alias { keyword: "".into(), item: "Espresso".into() }]
        ).unwrap_err();
        assert!(matches!(err, CatalogError::BlankAliasKeyword(target) if target == "Espresso"));
    }

    #[test]
    fn lookups_fold_non_ascii_case() {
        let catalog = MenuCatalog::new(
            cafe(),
            vec![item("Café Crème", 180)],
            vec![Alias { keyword: "creme".into(), item: "CAFÉ CRÈME".into() }]
        ).unwrap();
        assert_eq!(catalog.get("café crème").map(|i| i.name.as_str()), Some("Café Crème"));
        assert_eq!(catalog.price("CAFÉ CRÈME"), Some(180));
    }

    #[test]
    fn alias_keywords_are_lowercased() {
        let catalog = MenuCatalog::new(
            cafe(),
            vec![item("Latte", 100)],
            vec![Alias { keyword: "LAT".into(), item: "Latte".into() }]
        ).unwrap();
        assert_eq!(catalog.aliases()[0].keyword, "lat");
    }

    #[test]
    fn require_reports_the_missing_item() {
        let catalog = MenuCatalog::builtin();
        assert!(catalog.require("sad", &["Hot Chocolate", "Cheese Nachos"]).is_ok());
        let err = catalog.require("sad", &["Hot Chocolate", "Mango Lassi"]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Rule 'sad' references menu item 'Mango Lassi' which is not in the catalog"
        );
    }

    #[test]
    fn groups_items_by_category_in_fixed_order() {
        let catalog = MenuCatalog::builtin();
        let groups = catalog.by_category();
        let categories = groups.iter().map(|(c, _)| *c).collect::<Vec<_>>();
        assert_eq!(categories, Category::ALL.to_vec());
        let hot = groups[0].1.iter().map(|i| i.name.as_str()).collect::<Vec<_>>();
        assert_eq!(hot, vec!["Cappuccino", "Espresso", "Americano", "Hot Chocolate"]);
    }

    #[test]
    fn loads_catalog_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "cafe": {{ "name": "Test Cafe", "address": "1 Bean St", "phone": "123", "hours": "9-5" }},
                "items": [
                    {{ "name": "Flat White", "price": 150, "category": "hot" }},
                    {{ "name": "Lemonade", "price": 90, "category": "drinks" }}
                ],
                "aliases": [{{ "keyword": "lemon", "item": "Lemonade" }}]
            }}"#
        ).unwrap();

        let catalog = MenuCatalog::load(file.path().to_str()).unwrap();
        assert_eq!(catalog.cafe().name, "Test Cafe");
        assert_eq!(catalog.items().len(), 2);
        assert_eq!(catalog.price("Lemonade"), Some(90));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = MenuCatalog::from_file("/definitely/not/here/menu.json").unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }

    #[test]
    fn empty_path_falls_back_to_builtin() {
        let catalog = MenuCatalog::load(Some("  ")).unwrap();
        assert_eq!(catalog.items().len(), MenuCatalog::builtin().items().len());
    }
}
