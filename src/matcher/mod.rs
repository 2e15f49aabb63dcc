pub mod rules;

use crate::config::menu::{ format_price, CatalogError, MenuCatalog, MenuItem };
use log::debug;
use std::sync::Arc;

pub use rules::{ Intent, KeywordRule, RULES };

pub const DEFAULT_RESPONSE: &str =
    "I'm Maggie! 💫 Your cafe BFF! Ask me prices, tell me your mood (sad? celebrating? date night?), or just say what you're craving! I know EVERYTHING about Love Over Coffee! ☕🍕✨";

/// Which branch of the matcher produced an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    Rule(Intent),
    Item(String),
    Default,
}

#[derive(Debug, Clone)]
pub struct Answer {
    pub outcome: MatchOutcome,
    pub text: String,
}

/// Looks up a menu item mentioned in already-lowercased text.
///
/// Full item names are tried first, in catalog order; aliases second, in
/// alias order.
pub fn find_item<'a>(catalog: &'a MenuCatalog, normalized: &str) -> Option<&'a MenuItem> {
    catalog
        .items()
        .iter()
        .find(|item| normalized.contains(&item.name.to_lowercase()))
        .or_else(|| {
            catalog
                .aliases()
                .iter()
                .find(|alias| normalized.contains(alias.keyword.as_str()))
                .and_then(|alias| catalog.get(&alias.item))
        })
}

/// Maps one utterance to one canned reply. Stateless; safe to share.
#[derive(Debug, Clone)]
pub struct IntentMatcher {
    catalog: Arc<MenuCatalog>,
}

impl IntentMatcher {
    /// Fails if any rule template prices an item the catalog does not carry.
    pub fn new(catalog: Arc<MenuCatalog>) -> Result<Self, CatalogError> {
        for rule in RULES {
            catalog.require(rule.intent.as_str(), rule.references)?;
        }
        Ok(Self { catalog })
    }

    pub fn catalog(&self) -> &MenuCatalog {
        &self.catalog
    }

    pub fn answer(&self, text: &str) -> Answer {
        let normalized = text.to_lowercase();

        if let Some(rule) = RULES.iter().find(|rule| rule.matches(&normalized)) {
            debug!("Matched rule '{}'", rule.intent);
            return Answer {
                outcome: MatchOutcome::Rule(rule.intent),
                text: rule.respond(&self.catalog, &normalized),
            };
        }

        if let Some(item) = find_item(&self.catalog, &normalized) {
            debug!("Matched menu item '{}'", item.name);
            return Answer {
                outcome: MatchOutcome::Item(item.name.clone()),
                text: format!(
                    "{}? Amazing choice! It's {}! Want me to tell you more or suggest something to pair with it? 😊✨",
                    item.name,
                    format_price(item.price)
                ),
            };
        }

        debug!("No rule or item matched, using default response");
        Answer {
            outcome: MatchOutcome::Default,
            text: DEFAULT_RESPONSE.to_string(),
        }
    }

    pub fn classify(&self, text: &str) -> MatchOutcome {
        self.answer(text).outcome
    }

    pub fn respond(&self, text: &str) -> String {
        self.answer(text).text
    }
}
