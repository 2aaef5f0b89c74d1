//! Session behaviour against a scripted client and a recording surface.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

use super::*;
use crate::attachment::{Attachment, IMAGE_PROMPT};
use crate::{AiClient, AiError, AiResponse, ContentPart, Role, Surface, TokenUsage, Turn};

#[derive(Debug, Clone)]
struct Call {
    api_key: String,
    turns: Vec<Turn>,
    max_tokens: u32,
}

/// Replays queued replies in order, optionally holding each call until released.
#[derive(Default)]
struct ScriptedClient {
    replies: Mutex<VecDeque<Result<AiResponse, AiError>>>,
    calls: Mutex<Vec<Call>>,
    gate: Option<Arc<Notify>>,
}

impl ScriptedClient {
    fn replying(replies: Vec<Result<AiResponse, AiError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            ..Default::default()
        }
    }

    fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AiClient for ScriptedClient {
    async fn send_message(
        &self,
        api_key: &str,
        turns: &[Turn],
        max_tokens: u32,
    ) -> Result<AiResponse, AiError> {
        self.calls.lock().unwrap().push(Call {
            api_key: api_key.to_string(),
            turns: turns.to_vec(),
            max_tokens,
        });
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AiError::Transport("no scripted reply".into())))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Shown {
    Message(Role, String),
    PendingStarted,
    PendingFinished,
}

#[derive(Default)]
struct RecordingSurface {
    events: Mutex<Vec<Shown>>,
}

impl RecordingSurface {
    fn events(&self) -> Vec<Shown> {
        self.events.lock().unwrap().clone()
    }

    fn messages(&self) -> Vec<(Role, String)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Shown::Message(role, markup) => Some((role, markup)),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn show(&self, role: Role, markup: &str) {
        self.events
            .lock()
            .unwrap()
            .push(Shown::Message(role, markup.to_string()));
    }

    fn pending_started(&self) {
        self.events.lock().unwrap().push(Shown::PendingStarted);
    }

    fn pending_finished(&self) {
        self.events.lock().unwrap().push(Shown::PendingFinished);
    }
}

fn reply(text: &str) -> Result<AiResponse, AiError> {
    Ok(AiResponse {
        content: text.to_string(),
        model: "openai/gpt-4o".to_string(),
        usage: TokenUsage {
            input_tokens: 10,
            output_tokens: 5,
        },
    })
}

fn unauthorized() -> Result<AiResponse, AiError> {
    Err(AiError::RemoteApi {
        status: 401,
        message: "bad key".into(),
    })
}

fn session_with(
    client: ScriptedClient,
    api_key: &str,
) -> (Session, Arc<ScriptedClient>, Arc<RecordingSurface>) {
    let client = Arc::new(client);
    let surface = Arc::new(RecordingSurface::default());
    let session = Session::new(
        client.clone(),
        surface.clone(),
        Settings::new(api_key, "You are helpful."),
    );
    (session, client, surface)
}

/// Wait until the client has seen `n` calls.
async fn wait_for_calls(client: &ScriptedClient, n: usize) {
    for _ in 0..200 {
        if client.calls().len() >= n {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(client.calls().len(), n);
}

#[tokio::test]
async fn successful_submit_appends_user_and_reply() {
    let (session, client, surface) =
        session_with(ScriptedClient::replying(vec![reply("hi there")]), "sk-or-test");

    let outcome = session.submit("hello").await;
    assert_eq!(outcome, SubmitOutcome::Answered("hi there".into()));

    assert_eq!(
        session.transcript(),
        vec![Turn::user("hello"), Turn::assistant("hi there")]
    );
    assert!(!session.is_busy());

    let calls = client.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].api_key, "sk-or-test");
    assert_eq!(calls[0].max_tokens, CHAT_MAX_TOKENS);
    assert_eq!(
        calls[0].turns,
        vec![Turn::system("You are helpful."), Turn::user("hello")]
    );

    assert_eq!(
        surface.events(),
        vec![
            Shown::Message(Role::User, "hello".into()),
            Shown::PendingStarted,
            Shown::PendingFinished,
            Shown::Message(Role::Assistant, "hi there".into()),
        ]
    );
}

#[tokio::test]
async fn failed_submit_keeps_only_the_user_turn() {
    let (session, _client, surface) =
        session_with(ScriptedClient::replying(vec![unauthorized()]), "sk-or-test");

    let outcome = session.submit("hello").await;
    assert_eq!(outcome, SubmitOutcome::Failed);

    assert_eq!(session.transcript(), vec![Turn::user("hello")]);
    assert!(!session.is_busy());

    let messages = surface.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1], (Role::Assistant, notices::CHAT_FAILED.to_string()));
    assert!(!messages[1].1.contains("bad key"));
    assert!(surface.events().contains(&Shown::PendingFinished));
}

#[tokio::test]
async fn blank_input_is_a_no_op() {
    let (session, client, surface) = session_with(ScriptedClient::default(), "sk-or-test");

    assert_eq!(session.submit("").await, SubmitOutcome::Ignored);
    assert_eq!(session.submit("   \n\t").await, SubmitOutcome::Ignored);

    assert_eq!(session.message_count(), 0);
    assert!(client.calls().is_empty());
    assert!(surface.events().is_empty());
}

#[tokio::test]
async fn missing_key_shows_guidance_without_network() {
    let (session, client, surface) = session_with(ScriptedClient::default(), "");

    assert_eq!(session.submit("hello").await, SubmitOutcome::NeedsConfig);

    assert_eq!(session.message_count(), 0);
    assert!(client.calls().is_empty());
    assert_eq!(
        surface.messages(),
        vec![(Role::Assistant, notices::CHAT_NEEDS_KEY.to_string())]
    );
    assert!(!session.is_busy());
}

#[tokio::test]
async fn submit_while_pending_is_dropped() {
    let gate = Arc::new(Notify::new());
    let (session, client, _surface) = session_with(
        ScriptedClient::replying(vec![reply("hi there")]).gated(gate.clone()),
        "sk-or-test",
    );
    let session = Arc::new(session);

    let first = tokio::spawn({
        let session = session.clone();
        async move { session.submit("hello").await }
    });

    wait_for_calls(&client, 1).await;
    assert!(session.is_busy());

    assert_eq!(session.submit("again").await, SubmitOutcome::Busy);
    assert_eq!(session.message_count(), 1);
    assert!(!session.reset(), "reset must be refused while pending");

    gate.notify_one();
    let outcome = first.await.unwrap();
    assert_eq!(outcome, SubmitOutcome::Answered("hi there".into()));

    assert_eq!(client.calls().len(), 1);
    assert_eq!(session.message_count(), 2);
    assert!(!session.is_busy());
}

#[tokio::test]
async fn attachment_while_chat_pending_is_dropped() {
    let gate = Arc::new(Notify::new());
    let (session, client, surface) = session_with(
        ScriptedClient::replying(vec![reply("hi there")]).gated(gate.clone()),
        "sk-or-test",
    );
    let session = Arc::new(session);

    let chat = tokio::spawn({
        let session = session.clone();
        async move { session.submit("hello").await }
    });
    wait_for_calls(&client, 1).await;

    let png = Attachment::new("cat.png", "image/png", vec![1, 2, 3]);
    assert_eq!(session.submit_attachment(&png).await, SubmitOutcome::Busy);
    assert_eq!(client.calls().len(), 1);
    assert_eq!(session.message_count(), 1);
    assert!(!surface
        .messages()
        .iter()
        .any(|(_, text)| text.contains("cat.png")));

    gate.notify_one();
    assert_eq!(
        chat.await.unwrap(),
        SubmitOutcome::Answered("hi there".into())
    );
    assert_eq!(client.calls().len(), 1);
    assert_eq!(session.message_count(), 2);
}

#[tokio::test]
async fn chat_while_attachment_pending_is_dropped() {
    let gate = Arc::new(Notify::new());
    let (session, client, _surface) = session_with(
        ScriptedClient::replying(vec![reply("A cat.")]).gated(gate.clone()),
        "sk-or-test",
    );
    let session = Arc::new(session);

    let analysis = tokio::spawn({
        let session = session.clone();
        async move {
            let png = Attachment::new("cat.png", "image/png", vec![1, 2, 3]);
            session.submit_attachment(&png).await
        }
    });
    wait_for_calls(&client, 1).await;
    assert!(session.is_busy());

    assert_eq!(session.submit("hello").await, SubmitOutcome::Busy);
    assert_eq!(session.search("rust").await, SubmitOutcome::Busy);
    assert_eq!(client.calls().len(), 1);
    assert_eq!(session.message_count(), 0);

    gate.notify_one();
    assert_eq!(
        analysis.await.unwrap(),
        SubmitOutcome::Answered("A cat.".into())
    );
    assert_eq!(client.calls().len(), 1);
    assert_eq!(session.message_count(), 0);
    assert!(!session.is_busy());
}

#[tokio::test]
async fn batch_holds_the_flag_for_each_file() {
    let gate = Arc::new(Notify::new());
    let (session, client, _surface) = session_with(
        ScriptedClient::replying(vec![reply("first"), reply("second")]).gated(gate.clone()),
        "sk-or-test",
    );
    let session = Arc::new(session);

    let batch = tokio::spawn({
        let session = session.clone();
        async move {
            let files = vec![
                Attachment::new("a.txt", "text/plain", b"A".to_vec()),
                Attachment::new("b.txt", "text/plain", b"B".to_vec()),
            ];
            session.submit_attachments(&files).await
        }
    });

    wait_for_calls(&client, 1).await;
    assert_eq!(session.submit("hello").await, SubmitOutcome::Busy);
    gate.notify_one();

    // The flag is released between files and taken again for the next one.
    wait_for_calls(&client, 2).await;
    assert_eq!(session.submit("hello").await, SubmitOutcome::Busy);
    gate.notify_one();

    assert_eq!(
        batch.await.unwrap(),
        vec![
            SubmitOutcome::Answered("first".into()),
            SubmitOutcome::Answered("second".into()),
        ]
    );
    assert_eq!(client.calls().len(), 2);
    assert_eq!(session.message_count(), 0);
    assert!(!session.is_busy());
}

#[tokio::test]
async fn later_submissions_carry_full_history() {
    let (session, client, _surface) = session_with(
        ScriptedClient::replying(vec![reply("hi there"), reply("4")]),
        "sk-or-test",
    );

    session.submit("hello").await;
    session.submit("  what is 2+2?  ").await;

    let calls = client.calls();
    assert_eq!(
        calls[1].turns,
        vec![
            Turn::system("You are helpful."),
            Turn::user("hello"),
            Turn::assistant("hi there"),
            Turn::user("what is 2+2?"),
        ]
    );
    assert_eq!(session.message_count(), 4);
}

#[tokio::test]
async fn replies_are_rendered_as_markup() {
    let (session, _client, surface) = session_with(
        ScriptedClient::replying(vec![reply("**Sure**\nuse `ls`")]),
        "sk-or-test",
    );

    session.submit("how do I list files?").await;

    let messages = surface.messages();
    assert_eq!(
        messages.last().unwrap().1,
        "<strong>Sure</strong><br>use <code>ls</code>"
    );
    // The transcript keeps the raw text.
    assert_eq!(session.transcript()[1], Turn::assistant("**Sure**\nuse `ls`"));
}

#[tokio::test]
async fn usage_is_tracked_per_model() {
    let (session, _client, _surface) = session_with(
        ScriptedClient::replying(vec![reply("a"), reply("b")]),
        "sk-or-test",
    );

    session.submit("one").await;
    session.submit("two").await;

    let usage = session.usage();
    assert_eq!(usage.call_count(), 2);
    assert_eq!(usage.total_tokens(), 30);
    assert!(usage.for_model("openai/gpt-4o").is_some());
}

#[tokio::test]
async fn image_attachment_sends_image_part_without_touching_history() {
    let (session, client, surface) =
        session_with(ScriptedClient::replying(vec![reply("A cat.")]), "sk-or-test");

    let png = Attachment::new("cat.png", "image/png", vec![0x89, 0x50, 0x4E, 0x47]);
    let outcome = session.submit_attachment(&png).await;
    assert_eq!(outcome, SubmitOutcome::Answered("A cat.".into()));

    let calls = client.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].max_tokens, ATTACHMENT_MAX_TOKENS);
    assert_eq!(calls[0].turns.len(), 2);
    assert_eq!(calls[0].turns[0], Turn::system("You are helpful."));
    assert_eq!(
        calls[0].turns[1].content,
        vec![
            ContentPart::text(IMAGE_PROMPT),
            ContentPart::Image {
                mime_type: "image/png".into(),
                data: "iVBORw==".into(),
            },
        ]
    );

    assert_eq!(session.message_count(), 0);
    assert_eq!(
        surface.messages(),
        vec![
            (Role::User, "Analyzing file: cat.png".to_string()),
            (Role::Assistant, "A cat.".to_string()),
        ]
    );
}

#[tokio::test]
async fn attachment_history_is_not_sent_with_later_chat() {
    let (session, client, _surface) = session_with(
        ScriptedClient::replying(vec![reply("A cat."), reply("hi")]),
        "sk-or-test",
    );

    let png = Attachment::new("cat.png", "image/png", vec![1, 2, 3]);
    session.submit_attachment(&png).await;
    session.submit("hello").await;

    let calls = client.calls();
    assert_eq!(
        calls[1].turns,
        vec![Turn::system("You are helpful."), Turn::user("hello")]
    );
}

#[tokio::test]
async fn unsupported_attachment_never_calls_the_model() {
    let (session, client, surface) = session_with(ScriptedClient::default(), "sk-or-test");

    let pdf = Attachment::new("report.pdf", "application/pdf", vec![0x25, 0x50, 0x44, 0x46]);
    assert_eq!(
        session.submit_attachment(&pdf).await,
        SubmitOutcome::Unsupported
    );

    assert!(client.calls().is_empty());
    let messages = surface.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(
        messages[1].1,
        "File type application/pdf is not yet supported for analysis. \
         Currently supported: images and text files."
    );
    assert!(!session.is_busy());
}

#[tokio::test]
async fn failed_text_attachment_shows_text_notice() {
    let (session, client, surface) =
        session_with(ScriptedClient::replying(vec![unauthorized()]), "sk-or-test");

    let notes = Attachment::new("notes.txt", "text/plain", b"remember the milk".to_vec());
    assert_eq!(session.submit_attachment(&notes).await, SubmitOutcome::Failed);

    let calls = client.calls();
    assert_eq!(
        calls[0].turns[1],
        Turn::user("Please analyze this text file (notes.txt):\n\nremember the milk")
    );
    assert_eq!(
        surface.messages().last().unwrap().1,
        notices::TEXT_FAILED.to_string()
    );
}

#[tokio::test]
async fn attachments_without_key_show_one_notice() {
    let (session, client, surface) = session_with(ScriptedClient::default(), "");

    let files = vec![
        Attachment::new("a.png", "image/png", vec![1]),
        Attachment::new("b.txt", "text/plain", vec![2]),
    ];
    let outcomes = session.submit_attachments(&files).await;
    assert_eq!(outcomes, vec![SubmitOutcome::NeedsConfig]);
    assert!(client.calls().is_empty());
    assert_eq!(
        surface.messages(),
        vec![(Role::Assistant, notices::ATTACH_NEEDS_KEY.to_string())]
    );
}

#[tokio::test]
async fn attachments_are_processed_in_order() {
    let (session, client, _surface) = session_with(
        ScriptedClient::replying(vec![reply("first"), reply("second")]),
        "sk-or-test",
    );

    let files = vec![
        Attachment::new("a.txt", "text/plain", b"A".to_vec()),
        Attachment::new("b.txt", "text/plain", b"B".to_vec()),
    ];
    let outcomes = session.submit_attachments(&files).await;
    assert_eq!(
        outcomes,
        vec![
            SubmitOutcome::Answered("first".into()),
            SubmitOutcome::Answered("second".into()),
        ]
    );
    let calls = client.calls();
    assert!(calls[0].turns[1].text_content().contains("(a.txt)"));
    assert!(calls[1].turns[1].text_content().contains("(b.txt)"));
}

#[tokio::test]
async fn search_wraps_query_in_a_chat_turn() {
    let (session, client, _surface) =
        session_with(ScriptedClient::replying(vec![reply("Rust is...")]), "sk-or-test");

    session.search("rust ownership").await;

    assert_eq!(
        client.calls()[0].turns[1],
        Turn::user("Search for information about: rust ownership")
    );
    assert_eq!(session.message_count(), 2);
}

#[tokio::test]
async fn search_without_key_shows_search_notice() {
    let (session, client, surface) = session_with(ScriptedClient::default(), "");

    assert_eq!(session.search("rust").await, SubmitOutcome::NeedsConfig);
    assert_eq!(session.search("  ").await, SubmitOutcome::Ignored);
    assert!(client.calls().is_empty());
    assert_eq!(
        surface.messages(),
        vec![(Role::Assistant, notices::SEARCH_NEEDS_KEY.to_string())]
    );
}

#[tokio::test]
async fn saved_settings_apply_to_the_next_request() {
    let (session, client, surface) =
        session_with(ScriptedClient::replying(vec![reply("ok")]), "");

    let saved = session.save_settings("  sk-or-new  ", "  Be terse.  ");
    assert_eq!(saved, Settings::new("sk-or-new", "Be terse."));
    assert_eq!(
        surface.messages(),
        vec![(Role::Assistant, notices::SETTINGS_SAVED.to_string())]
    );

    session.submit("hi").await;
    let calls = client.calls();
    assert_eq!(calls[0].api_key, "sk-or-new");
    assert_eq!(calls[0].turns[0], Turn::system("Be terse."));
}

#[test]
fn saving_an_empty_key_asks_for_one() {
    let (session, _client, surface) = session_with(ScriptedClient::default(), "sk-or-old");

    session.save_settings("   ", "prompt");
    assert!(!session.settings().has_api_key());
    assert_eq!(
        surface.messages(),
        vec![(Role::Assistant, notices::SETTINGS_NEED_KEY.to_string())]
    );
}

#[test]
fn greet_only_without_key() {
    let (with_key, _, surface) = session_with(ScriptedClient::default(), "sk-or-test");
    with_key.greet();
    assert!(surface.events().is_empty());

    let (without_key, _, surface) = session_with(ScriptedClient::default(), "");
    without_key.greet();
    assert_eq!(surface.messages().len(), 1);
    assert!(surface.messages()[0].1.contains("Welcome!"));
}

#[tokio::test]
async fn reset_clears_history() {
    let (session, _client, _surface) =
        session_with(ScriptedClient::replying(vec![reply("hi")]), "sk-or-test");

    session.submit("hello").await;
    assert_eq!(session.message_count(), 2);

    assert!(session.reset());
    assert_eq!(session.message_count(), 0);
    assert!(!session.is_busy());
}

#[test]
fn settings_debug_redacts_key() {
    let settings = Settings::new("sk-or-secret", "prompt");
    let out = format!("{settings:?}");
    assert!(!out.contains("sk-or-secret"));
    assert!(out.contains("prompt"));
}
