use crate::config::menu::{ format_price, MenuCatalog };
use crate::matcher::RULES;
use crate::models::chat::{ ChatMessage, Role };

const SYSTEM_TEMPLATE: &str =
    "You are Maggie, the friendly AI Waiter for '{cafe_name}' cafe.
Location: {address}.
Hours: {hours}.

PERSONALITY: Warm, Gen-Z friendly, use Hinglish naturally. Be enthusiastic about food!
RULES: Keep answers under 40 words. Be helpful and suggest menu items based on mood.

{cafe_name_upper} - COMPLETE MENU:
{menu}

MOOD-BASED SUGGESTIONS:
{moods}

Be cheerful, use light humor, end with a relevant suggestion!";

const CHAT_TEMPLATE: &str =
    "{system_prompt}

Conversation so far:
{history}

Respond as Maggie (keep it under 40 words, be fun and helpful):";

fn menu_block(catalog: &MenuCatalog) -> String {
    catalog
        .by_category()
        .into_iter()
        .map(|(category, items)| {
            let listed = items
                .iter()
                .map(|item| format!("{} ({})", item.name, format_price(item.price)))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{}: {}", category, listed)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn mood_block(catalog: &MenuCatalog) -> String {
    RULES.iter()
        .filter_map(|rule| {
            let label = rule.intent.mood_label()?;
            let picks = rule.references
                .iter()
                .filter_map(|name| catalog.get(name))
                .map(|item| format!("{} {}", item.name, format_price(item.price)))
                .collect::<Vec<_>>()
                .join(", ");
            Some(format!("- {}: {}", label, picks))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Substitutes `{key}` placeholders in one pass over `template`, so inserted
/// values are never scanned for placeholders themselves.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let hit = tail.find('}').and_then(|end| {
            values
                .iter()
                .find(|(key, _)| *key == &tail[1..end])
                .map(|(_, value)| (end, *value))
        });
        match hit {
            Some((end, value)) => {
                out.push_str(value);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

pub fn system_prompt(catalog: &MenuCatalog) -> String {
    let cafe = catalog.cafe();
    let upper = cafe.name.to_uppercase();
    let menu = menu_block(catalog);
    let moods = mood_block(catalog);
    fill(
        SYSTEM_TEMPLATE,
        &[
            ("cafe_name_upper", upper.as_str()),
            ("cafe_name", cafe.name.as_str()),
            ("address", cafe.address.as_str()),
            ("hours", cafe.hours.as_str()),
            ("menu", menu.as_str()),
            ("moods", moods.as_str()),
        ]
    )
}

pub fn format_history_for_prompt(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .map(|msg| {
            let speaker = match msg.role {
                Role::User => "Customer",
                Role::Assistant => "Maggie",
            };
            format!("{}: {}", speaker, msg.content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Full prompt sent to the external chat service for one turn.
pub fn chat_prompt(catalog: &MenuCatalog, messages: &[ChatMessage]) -> String {
    let system = system_prompt(catalog);
    let history = format_history_for_prompt(messages);
    fill(CHAT_TEMPLATE, &[("system_prompt", system.as_str()), ("history", history.as_str())])
}
