use crate::cli::Args;
use crate::config::menu::MenuCatalog;
use crate::config::prompt;
use crate::llm::chat::{ ChatClient, new_client as new_chat_client };
use crate::matcher::IntentMatcher;
use crate::models::chat::{ last_utterance, ChatMessage };

use log::{ info, warn, debug };
use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Answers chat turns. Holds only read-only state, so one instance is shared
/// across all requests.
#[derive(Clone)]
pub struct WaiterAgent {
    matcher: IntentMatcher,
    chat_client: Option<Arc<dyn ChatClient>>,
}

impl fmt::Debug for WaiterAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WaiterAgent")
            .field("matcher", &self.matcher)
            .field("delegates", &self.delegates())
            .finish()
    }
}

impl WaiterAgent {
    pub fn new(args: &Args) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let catalog = Arc::new(MenuCatalog::load(args.menu_path.as_deref())?);
        let matcher = IntentMatcher::new(catalog)?;
        info!("Menu catalog validated: {} items", matcher.catalog().items().len());

        let llm_config = args.llm_config();
        let chat_client = if !llm_config.is_configured() {
            info!("No {} API key configured, answering from local rules only", llm_config.llm_type);
            None
        } else {
            match new_chat_client(&llm_config) {
                Ok(client) => {
                    info!(
                        "Chat client configured: Type={}, Model={}, BaseURL={}",
                        client.get_llm_type(),
                        client.get_model(),
                        client.get_base_url().as_deref().unwrap_or("adapter default")
                    );
                    Some(client)
                }
                Err(e) => {
                    warn!("Failed to create chat client, answering from local rules only: {}", e);
                    None
                }
            }
        };

        Ok(Self::with_parts(matcher, chat_client))
    }

    pub fn with_parts(matcher: IntentMatcher, chat_client: Option<Arc<dyn ChatClient>>) -> Self {
        Self { matcher, chat_client }
    }

    pub fn matcher(&self) -> &IntentMatcher {
        &self.matcher
    }

    pub fn delegates(&self) -> bool {
        self.chat_client.is_some()
    }

    /// Produces the reply for the last message of `messages`. Never fails: any
    /// problem with the external service degrades to the local matcher.
    pub async fn reply(&self, request_id: &str, messages: &[ChatMessage]) -> String {
        let utterance = last_utterance(messages);

        let Some(client) = &self.chat_client else {
            return self.local_reply(request_id, utterance);
        };

        let full_prompt = prompt::chat_prompt(self.matcher.catalog(), messages);
        match client.complete(&full_prompt).await {
            Ok(resp) if !resp.response.trim().is_empty() => {
                info!("[{}] Answered by {}", request_id, client.get_llm_type());
                resp.response.trim().to_string()
            }
            Ok(_) => {
                warn!("[{}] Chat service returned a blank reply, using local rules", request_id);
                self.local_reply(request_id, utterance)
            }
            Err(e) => {
                warn!("[{}] Chat service unavailable, using local rules: {}", request_id, e);
                self.local_reply(request_id, utterance)
            }
        }
    }

    fn local_reply(&self, request_id: &str, utterance: &str) -> String {
        let answer = self.matcher.answer(utterance);
        debug!("[{}] Local rules answered with {:?}", request_id, answer.outcome);
        answer.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::chat::CompletionResponse;
    use crate::llm::{ LlmError, LlmType };
    use crate::matcher::DEFAULT_RESPONSE;
    use crate::models::chat::Role;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records prompts and answers with a fixed result.
    struct FakeClient {
        reply: Option<String>,
        prompts: Mutex<Vec<String>>,
    }

    impl FakeClient {
        fn new(reply: Option<&str>) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.map(str::to_string),
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ChatClient for FakeClient {
        async fn complete(&self, prompt: &str) -> Result<CompletionResponse, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.reply {
                Some(text) => Ok(CompletionResponse { response: text.clone() }),
                None => Err(LlmError::Status { provider: LlmType::Gemini, status: 503 }),
            }
        }

        fn get_model(&self) -> String {
            "fake".into()
        }

        fn get_base_url(&self) -> Option<String> {
            None
        }

        fn get_llm_type(&self) -> LlmType {
            LlmType::Gemini
        }
    }

    fn matcher() -> IntentMatcher {
        IntentMatcher::new(Arc::new(MenuCatalog::builtin())).unwrap()
    }

    fn conversation(last: &str) -> Vec<ChatMessage> {
        vec![ChatMessage::new(Role::Assistant, "Heyyy!"), ChatMessage::new(Role::User, last)]
    }

    #[tokio::test]
    async fn answers_locally_without_client() {
        let agent = WaiterAgent::with_parts(matcher(), None);
        assert!(!agent.delegates());
        let reply = agent.reply("t", &conversation("how much is cappuccino")).await;
        assert!(reply.contains("₹160"));
    }

    #[tokio::test]
    async fn empty_conversation_gets_default() {
        let agent = WaiterAgent::with_parts(matcher(), None);
        assert_eq!(agent.reply("t", &[]).await, DEFAULT_RESPONSE);
    }

    #[tokio::test]
    async fn uses_client_reply_when_available() {
        let client = FakeClient::new(Some("  Try the Nutella Frappe!\n"));
        let agent = WaiterAgent::with_parts(matcher(), Some(client.clone()));
        let reply = agent.reply("t", &conversation("I'm feeling sad")).await;
        assert_eq!(reply, "Try the Nutella Frappe!");

        let prompts = client.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Customer: I'm feeling sad"));
        assert!(prompts[0].contains("Maggie: Heyyy!"));
    }

    #[tokio::test]
    async fn falls_back_silently_when_client_fails() {
        let agent = WaiterAgent::with_parts(matcher(), Some(FakeClient::new(None)));
        let local = agent.matcher().respond("I'm feeling sad");
        assert_eq!(agent.reply("t", &conversation("I'm feeling sad")).await, local);
    }

    #[tokio::test]
    async fn blank_client_reply_falls_back() {
        let agent = WaiterAgent::with_parts(matcher(), Some(FakeClient::new(Some(" \n "))));
        let reply = agent.reply("t", &conversation("menu")).await;
        assert!(reply.starts_with("Here's the magic menu!"));
    }

    #[tokio::test]
    async fn falls_back_when_service_is_unreachable() {
        let client = crate::llm::chat::gemini::GeminiChatClient::new(
            "key".into(),
            None,
            Some("http://127.0.0.1:1".into()),
            0.9,
            150,
            std::time::Duration::from_secs(2)
        ).unwrap();
        let agent = WaiterAgent::with_parts(matcher(), Some(Arc::new(client)));
        let reply = agent.reply("t", &conversation("bye")).await;
        assert_eq!(reply, agent.matcher().respond("bye"));
    }

    #[test]
    fn new_runs_local_only_without_key() {
        let args = <Args as clap::Parser>::try_parse_from(["maggie-agent", "--chat-api-key", ""]).unwrap();
        let agent = WaiterAgent::new(&args).unwrap();
        assert!(!agent.delegates());
    }

    #[test]
    fn new_fails_on_unreadable_menu() {
        let args = <Args as clap::Parser>::try_parse_from([
            "maggie-agent",
            "--menu-path",
            "/no/such/menu.json",
        ]).unwrap();
        assert!(WaiterAgent::new(&args).is_err());
    }
}
