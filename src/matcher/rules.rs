use std::fmt;
use log::warn;
use crate::config::menu::{ format_price, MenuCatalog };
use super::find_item;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    PriceInquiry,
    Sad,
    Romantic,
    Tired,
    Hungry,
    Celebration,
    Cold,
    Hot,
    Menu,
    Coffee,
    Recommendation,
    Budget,
    Location,
    Hours,
    Greeting,
    Thanks,
    Farewell,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::PriceInquiry => "price_inquiry",
            Intent::Sad => "mood_sad",
            Intent::Romantic => "mood_romantic",
            Intent::Tired => "mood_tired",
            Intent::Hungry => "mood_hungry",
            Intent::Celebration => "celebration",
            Intent::Cold => "prefers_cold",
            Intent::Hot => "prefers_hot",
            Intent::Menu => "menu_request",
            Intent::Coffee => "coffee_mention",
            Intent::Recommendation => "recommendation",
            Intent::Budget => "budget",
            Intent::Location => "location",
            Intent::Hours => "hours",
            Intent::Greeting => "greeting",
            Intent::Thanks => "thanks",
            Intent::Farewell => "farewell",
        }
    }

    /// Heading used when listing this intent in the mood suggestions of the
    /// system prompt. `None` for intents that are not moods.
    pub fn mood_label(&self) -> Option<&'static str> {
        match self {
            Intent::Sad => Some("Heartbreak/Sad"),
            Intent::Romantic => Some("Date/Romantic"),
            Intent::Tired => Some("Tired/Work"),
            Intent::Hungry => Some("Hungry"),
            Intent::Celebration => Some("Celebration"),
            _ => None,
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub struct KeywordRule {
    pub intent: Intent,
    /// Lowercase substrings; any one of them fires the rule.
    pub triggers: &'static [&'static str],
    /// Catalog items the response template prices.
    pub references: &'static [&'static str],
    respond: fn(&MenuCatalog, &str) -> String,
}

impl KeywordRule {
    pub fn matches(&self, normalized: &str) -> bool {
        self.triggers.iter().any(|trigger| normalized.contains(trigger))
    }

    pub fn respond(&self, catalog: &MenuCatalog, normalized: &str) -> String {
        (self.respond)(catalog, normalized)
    }
}

/// Category rules in priority order. The first rule that matches answers.
pub const RULES: &[KeywordRule] = &[
    KeywordRule {
        intent: Intent::PriceInquiry,
        triggers: &["price", "cost", "how much", "kitna"],
        references: &[],
        respond: price_inquiry,
    },
    KeywordRule {
        intent: Intent::Sad,
        triggers: &["sad", "breakup", "heartbroken", "cry", "upset"],
        references: &["Dark Choco Frappe", "Hot Chocolate", "Cheese Nachos"],
        respond: sad,
    },
    KeywordRule {
        intent: Intent::Romantic,
        triggers: &["date", "girlfriend", "boyfriend", "romantic", "impress"],
        references: &["Paneer Bhurji Pizza", "Cappuccino", "Cheese Nachos"],
        respond: romantic,
    },
    KeywordRule {
        intent: Intent::Tired,
        triggers: &["tired", "sleepy", "energy", "work", "thak"],
        references: &["Espresso", "Tiramisu Frappe"],
        respond: tired,
    },
    KeywordRule {
        intent: Intent::Hungry,
        triggers: &["hungry", "starving", "bhook", "khana"],
        references: &["Paneer Bhurji Pizza", "Peri Peri Fries", "Pao Bhaji Fondue"],
        respond: hungry,
    },
    KeywordRule {
        intent: Intent::Celebration,
        triggers: &["birthday", "celebrate", "party"],
        references: &["Nutella Frappe", "Cheese Nachos"],
        respond: celebration,
    },
    KeywordRule {
        intent: Intent::Cold,
        triggers: &["cold", "thanda", "chill"],
        references: &["Tiramisu Frappe", "Virgin Mojito", "Blueberry Ice Tea"],
        respond: cold,
    },
    KeywordRule {
        intent: Intent::Hot,
        triggers: &["hot", "garam", "warm"],
        references: &["Cappuccino", "Americano", "Hot Chocolate"],
        respond: hot,
    },
    KeywordRule {
        intent: Intent::Menu,
        triggers: &["menu", "what do you have", "options", "kya hai"],
        references: &[],
        respond: menu,
    },
    KeywordRule {
        intent: Intent::Coffee,
        triggers: &["coffee"],
        references: &["Cappuccino", "Tiramisu Frappe"],
        respond: coffee,
    },
    KeywordRule {
        intent: Intent::Recommendation,
        triggers: &["best", "recommend", "popular", "famous"],
        references: &["Cappuccino", "Paneer Bhurji Pizza", "Tiramisu Frappe", "Cheese Nachos"],
        respond: recommendation,
    },
    KeywordRule {
        intent: Intent::Budget,
        triggers: &["cheap", "budget", "sasta"],
        references: &["Espresso", "Virgin Mojito", "Blueberry Ice Tea"],
        respond: budget,
    },
    KeywordRule {
        intent: Intent::Location,
        triggers: &["address", "location", "where", "kahan"],
        references: &[],
        respond: location,
    },
    KeywordRule {
        intent: Intent::Hours,
        triggers: &["timing", "hours", "open", "close", "time"],
        references: &[],
        respond: hours,
    },
    KeywordRule {
        intent: Intent::Greeting,
        triggers: &["hi", "hello", "hey", "hii", "namaste"],
        references: &[],
        respond: greeting,
    },
    KeywordRule {
        intent: Intent::Thanks,
        triggers: &["thank", "thanks", "dhanyawad", "shukriya"],
        references: &[],
        respond: thanks,
    },
    KeywordRule {
        intent: Intent::Farewell,
        triggers: &["bye", "later", "tata", "chal"],
        references: &[],
        respond: farewell,
    },
];

fn price(catalog: &MenuCatalog, name: &str) -> String {
    match catalog.price(name) {
        Some(p) => format_price(p),
        None => {
            warn!("Reply template prices '{}' which is not in the menu catalog", name);
            String::new()
        }
    }
}

fn price_inquiry(catalog: &MenuCatalog, normalized: &str) -> String {
    match find_item(catalog, normalized) {
        Some(item) =>
            format!(
                "{} costs just {}! It's absolutely amazing - you gotta try it! 😋☕",
                item.name,
                format_price(item.price)
            ),
        None =>
            "Which item's price do you wanna know? Just tell me - Cappuccino, Pizza, Mojito, anything! 💫".to_string(),
    }
}

fn sad(catalog: &MenuCatalog, _: &str) -> String {
    format!(
        "Aww babe 🥺💔 You need some comfort! Dark Choco Frappe ({}) is literally a hug in a cup! Or try Hot Chocolate ({}) with a side of Cheese Nachos ({}). Chocolate heals everything! 🍫✨",
        price(catalog, "Dark Choco Frappe"),
        price(catalog, "Hot Chocolate"),
        price(catalog, "Cheese Nachos")
    )
}

fn romantic(catalog: &MenuCatalog, _: &str) -> String {
    format!(
        "Ooh date night! 💕✨ Share a Paneer Bhurji Pizza ({}) - it's our bestseller! Add two Cappuccinos ({} each) and finish with Cheese Nachos ({}). Total couple goals! 🍕❤️",
        price(catalog, "Paneer Bhurji Pizza"),
        price(catalog, "Cappuccino"),
        price(catalog, "Cheese Nachos")
    )
}

fn tired(catalog: &MenuCatalog, _: &str) -> String {
    format!(
        "Need a boost? ⚡ Double Espresso ({}) will wake you UP! Or go for Tiramisu Frappe ({}) - coffee + dessert vibes! Hustle mode: ON! 🚀💪",
        price(catalog, "Espresso"),
        price(catalog, "Tiramisu Frappe")
    )
}

fn hungry(catalog: &MenuCatalog, _: &str) -> String {
    format!(
        "Bhook lagi? 🍽️ Paneer Bhurji Pizza ({}) is FIRE! Add Peri Peri Fries ({}) and you're sorted! Or try Pao Bhaji Fondue ({}) for desi fusion! 🔥",
        price(catalog, "Paneer Bhurji Pizza"),
        price(catalog, "Peri Peri Fries"),
        price(catalog, "Pao Bhaji Fondue")
    )
}

fn celebration(catalog: &MenuCatalog, _: &str) -> String {
    format!(
        "Yayyy celebrations! 🎉🎂 Nutella Frappe ({}) is the party in a glass! Add Cheese Nachos ({}) to share! We'll make it special! 🥳✨",
        price(catalog, "Nutella Frappe"),
        price(catalog, "Cheese Nachos")
    )
}

fn cold(catalog: &MenuCatalog, _: &str) -> String {
    format!(
        "Cold vibes incoming! 🧊 Tiramisu Frappe ({}) is chef's kiss! Virgin Mojito ({}) for refreshing feels, or Blueberry Ice Tea ({}) for fruity! 🍹",
        price(catalog, "Tiramisu Frappe"),
        price(catalog, "Virgin Mojito"),
        price(catalog, "Blueberry Ice Tea")
    )
}

fn hot(catalog: &MenuCatalog, _: &str) -> String {
    format!(
        "Hot drinks loading... ☕ Cappuccino ({}) is classic love! Americano ({}) for strong vibes, or Hot Chocolate ({}) for cozy feels! 🔥",
        price(catalog, "Cappuccino"),
        price(catalog, "Americano"),
        price(catalog, "Hot Chocolate")
    )
}

fn menu(catalog: &MenuCatalog, _: &str) -> String {
    let sections = catalog
        .by_category()
        .into_iter()
        .map(|(category, items)| {
            let listed = items
                .iter()
                .map(|item| format!("{} {}", item.name, format_price(item.price)))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{} {}: {}", category.icon(), category, listed)
        })
        .collect::<Vec<_>>()
        .join("\n");
    format!("Here's the magic menu! ✨\n\n{}\n\nWhat's calling you? 😊", sections)
}

fn coffee(catalog: &MenuCatalog, _: &str) -> String {
    format!(
        "Coffee lover spotted! ☕ Cappuccino ({}) is classic! Tiramisu Frappe ({}) for cold coffee lovers! What's your mood - hot or cold? ✨",
        price(catalog, "Cappuccino"),
        price(catalog, "Tiramisu Frappe")
    )
}

fn recommendation(catalog: &MenuCatalog, _: &str) -> String {
    format!(
        "Our legendary items? 🏆 Cappuccino ({}), Paneer Bhurji Pizza ({}), Tiramisu Frappe ({}), and Cheese Nachos ({})! Can't go wrong with these! ✨",
        price(catalog, "Cappuccino"),
        price(catalog, "Paneer Bhurji Pizza"),
        price(catalog, "Tiramisu Frappe"),
        price(catalog, "Cheese Nachos")
    )
}

fn budget(catalog: &MenuCatalog, _: &str) -> String {
    format!(
        "Budget-friendly picks! 💰 Espresso {}, Virgin Mojito {}, Blueberry Ice Tea {}! Great taste, wallet happy! 😊",
        price(catalog, "Espresso"),
        price(catalog, "Virgin Mojito"),
        price(catalog, "Blueberry Ice Tea")
    )
}

fn location(catalog: &MenuCatalog, _: &str) -> String {
    let cafe = catalog.cafe();
    format!(
        "Find us at: {} 📍\nCall: {} 📞\nOpen {}! Come vibe with us! 👋✨",
        cafe.address,
        cafe.phone,
        cafe.hours
    )
}

fn hours(catalog: &MenuCatalog, _: &str) -> String {
    format!(
        "We're open {}! ⏰ Best time? Evenings for that golden hour aesthetic! 🌅☕",
        catalog.cafe().hours
    )
}

fn greeting(catalog: &MenuCatalog, _: &str) -> String {
    format!(
        "Heyyy! 👋✨ Welcome to {}! I'm Maggie, your cafe bestie! Tell me your mood or ask about our menu - I got you! 😊☕",
        catalog.cafe().name
    )
}

fn thanks(_: &MenuCatalog, _: &str) -> String {
    "Aww you're welcome! 🥰 Come visit soon - the vibes are immaculate! See you at LOC! ☕💕".to_string()
}

fn farewell(_: &MenuCatalog, _: &str) -> String {
    "Byeee! 👋 Don't forget us! Hot coffee and warm hearts always waiting! See ya! ☕💕✨".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn templates_price_exactly_their_references() {
        let catalog = MenuCatalog::builtin();
        for rule in RULES.iter().filter(|rule| rule.intent != Intent::Menu) {
            let reply = rule.respond(&catalog, "");
            for name in rule.references {
                let quoted = format_price(catalog.price(name).unwrap());
                assert!(reply.contains(&quoted), "{} does not quote {} for {}", rule.intent, quoted, name);
            }
            assert_eq!(
                reply.matches('₹').count(),
                rule.references.len(),
                "{} prices items missing from its references",
                rule.intent
            );
        }
    }

    #[test]
    fn menu_template_prices_every_item() {
        let catalog = MenuCatalog::builtin();
        let rule = RULES.iter().find(|rule| rule.intent == Intent::Menu).unwrap();
        let reply = rule.respond(&catalog, "");
        assert_eq!(reply.matches('₹').count(), catalog.items().len());
    }
}
