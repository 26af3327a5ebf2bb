//! Integration tests for the chat handlers: chat registration, welcome, wa counting and commands.

mod common;

use std::sync::Arc;

use common::{
    mock_head, new_members_message, post, preparer, reply_message, text_message, user,
    FakePostSource, RecordingBot, Sent, GROUP_ID,
};
use handler_chain::HandlerChain;
use keybot::config::WaConfig;
use keybot::handlers::BotUsername;
use keybot::{ChatRegistrationHandler, CommandHandler, DailyBest, WaHandler, WelcomeHandler};
use keybot_core::{Handler, HandlerError, HandlerResponse, KeybotError, PhotoInput};
use storage::{RuntimeInfoStore, WaRepository};
use tempfile::TempDir;
use tokio::sync::RwLock;

fn bot_username(name: &str) -> BotUsername {
    Arc::new(RwLock::new(Some(name.to_string())))
}

fn runtime_store(dir: &TempDir) -> Arc<RuntimeInfoStore> {
    Arc::new(RuntimeInfoStore::new(
        dir.path().join("runtime-info.json"),
        dir.path().join("runtime-info.lock"),
    ))
}

async fn wa_repo() -> Arc<WaRepository> {
    Arc::new(WaRepository::new("sqlite::memory:").await.unwrap())
}

fn instant_wa_config() -> WaConfig {
    WaConfig {
        delay_min_secs: 0,
        delay_max_secs: 0,
        ..WaConfig::default()
    }
}

/// **Test: The bot being added registers the chat and stops the chain.**
///
/// **Setup:** Registration handler followed by a welcome handler.
/// **Action:** New-members message containing `@KeyBot` (case differs from the configured name).
/// **Expected:** Stop; chat registered; no welcome sent.
#[tokio::test]
async fn test_registration_when_bot_added() {
    let dir = TempDir::new().unwrap();
    let store = runtime_store(&dir);
    let bot = RecordingBot::new();
    let chain = HandlerChain::new()
        .add_handler(Arc::new(ChatRegistrationHandler::new(
            store.clone(),
            bot_username("keybot"),
        )))
        .add_handler(Arc::new(WelcomeHandler::new(bot.clone(), "hi ${user}", true)));

    let message = new_members_message(GROUP_ID, vec![user(9, Some("KeyBot"), "Key")]);
    let response = chain.handle(&message).await.unwrap();

    assert_eq!(response, HandlerResponse::Stop);
    assert_eq!(store.load().await.unwrap().chat_id, vec![GROUP_ID]);
    assert!(bot.sent().is_empty());
}

/// **Test: Other members joining do not register the chat.**
#[tokio::test]
async fn test_registration_ignores_other_members() {
    let dir = TempDir::new().unwrap();
    let store = runtime_store(&dir);
    let handler = ChatRegistrationHandler::new(store.clone(), bot_username("keybot"));

    let message = new_members_message(GROUP_ID, vec![user(5, Some("alice"), "Alice")]);
    let response = handler.handle(&message).await.unwrap();

    assert_eq!(response, HandlerResponse::Continue);
    assert!(store.load().await.unwrap().chat_id.is_empty());
}

/// **Test: Each new member gets one welcome with an HTML mention.**
#[tokio::test]
async fn test_welcome_each_member() {
    let bot = RecordingBot::new();
    let handler = WelcomeHandler::new(bot.clone(), "${user}，欢迎！", true);

    let message = new_members_message(
        GROUP_ID,
        vec![user(5, Some("alice"), "Alice"), user(6, None, "Bob & Co")],
    );
    let response = handler.handle(&message).await.unwrap();

    assert_eq!(response, HandlerResponse::Stop);
    assert_eq!(
        bot.sent(),
        vec![
            Sent::Message {
                chat_id: GROUP_ID,
                text: "<a href=\"tg://user?id=5\">Alice</a>，欢迎！".to_string(),
            },
            Sent::Message {
                chat_id: GROUP_ID,
                text: "<a href=\"tg://user?id=6\">Bob &amp; Co</a>，欢迎！".to_string(),
            },
        ]
    );
}

/// **Test: An empty welcome template is an error and nothing is sent.**
#[tokio::test]
async fn test_welcome_empty_template() {
    let bot = RecordingBot::new();
    let handler = WelcomeHandler::new(bot.clone(), "  ", true);

    let message = new_members_message(GROUP_ID, vec![user(5, None, "Alice")]);
    let result = handler.handle(&message).await;

    assert!(matches!(
        result,
        Err(KeybotError::Handler(HandlerError::EmptyTemplate))
    ));
    assert!(bot.sent().is_empty());
}

/// **Test: A failed send still tries every member, then reports the failure.**
#[tokio::test]
async fn test_welcome_send_failure_tries_all() {
    let bot = RecordingBot::failing_messages();
    let handler = WelcomeHandler::new(bot.clone(), "hi ${user}", true);

    let message = new_members_message(
        GROUP_ID,
        vec![user(5, None, "Alice"), user(6, None, "Bob")],
    );
    let result = handler.handle(&message).await;

    assert!(matches!(result, Err(KeybotError::Bot(ref m)) if m == "Failed to welcome"));
    assert_eq!(bot.sent().len(), 2);
}

/// **Test: Disabled welcome passes the message on.**
#[tokio::test]
async fn test_welcome_disabled() {
    let bot = RecordingBot::new();
    let handler = WelcomeHandler::new(bot.clone(), "hi ${user}", false);

    let message = new_members_message(GROUP_ID, vec![user(5, None, "Alice")]);

    assert_eq!(
        handler.handle(&message).await.unwrap(),
        HandlerResponse::Continue
    );
    assert!(bot.sent().is_empty());
}

/// **Test: The third wa on a message triggers exactly one delayed reply to it.**
///
/// **Setup:** Group configured; zero delay.
/// **Action:** Four wa replies to message 10 from different users.
/// **Expected:** Counts stored; one reply `哇！` to message 10.
#[tokio::test]
async fn test_wa_threshold_triggers_one_reply() {
    let bot = RecordingBot::new();
    let repo = wa_repo().await;
    let handler = WaHandler::new(bot.clone(), repo.clone(), Some(GROUP_ID), instant_wa_config());

    for (id, waer) in [(11, 1), (12, 2), (13, 3), (14, 4)] {
        let message = reply_message(id, GROUP_ID, user(waer, None, "W"), "哇哦", 10);
        assert_eq!(handler.handle(&message).await.unwrap(), HandlerResponse::Stop);
    }

    let sent = bot.wait_for(1).await;
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    assert_eq!(repo.count_for(10).await.unwrap(), 4);
    assert_eq!(
        sent,
        vec![Sent::Reply {
            chat_id: GROUP_ID,
            reply_to: "10".to_string(),
            text: "哇！".to_string(),
        }]
    );
    assert_eq!(bot.sent().len(), 1);
}

/// **Test: Wa-s outside the configured group, or with no group configured, are not counted.**
#[tokio::test]
async fn test_wa_ignored_outside_group() {
    let bot = RecordingBot::new();
    let repo = wa_repo().await;
    let in_other = WaHandler::new(bot.clone(), repo.clone(), Some(GROUP_ID), instant_wa_config());
    let unset = WaHandler::new(bot.clone(), repo.clone(), None, instant_wa_config());

    let elsewhere = reply_message(11, -999, user(1, None, "W"), "哇", 10);
    let in_group = reply_message(12, GROUP_ID, user(1, None, "W"), "哇", 10);

    assert_eq!(
        in_other.handle(&elsewhere).await.unwrap(),
        HandlerResponse::Continue
    );
    assert_eq!(
        unset.handle(&in_group).await.unwrap(),
        HandlerResponse::Continue
    );
    assert_eq!(repo.count_for(10).await.unwrap(), 0);
}

/// **Test: Only replies starting with the trigger count.**
#[tokio::test]
async fn test_wa_requires_reply_and_trigger() {
    let bot = RecordingBot::new();
    let repo = wa_repo().await;
    let handler = WaHandler::new(bot.clone(), repo.clone(), Some(GROUP_ID), instant_wa_config());

    let not_reply = text_message(11, GROUP_ID, user(1, None, "W"), "哇");
    let wrong_text = reply_message(12, GROUP_ID, user(1, None, "W"), "nice 哇", 10);

    assert_eq!(
        handler.handle(&not_reply).await.unwrap(),
        HandlerResponse::Continue
    );
    assert_eq!(
        handler.handle(&wrong_text).await.unwrap(),
        HandlerResponse::Continue
    );
    assert_eq!(repo.count_for(10).await.unwrap(), 0);
}

/// **Test: A repeated wa message is counted once.**
#[tokio::test]
async fn test_wa_duplicate_counted_once() {
    let bot = RecordingBot::new();
    let repo = wa_repo().await;
    let handler = WaHandler::new(bot.clone(), repo.clone(), Some(GROUP_ID), instant_wa_config());
    let message = reply_message(11, GROUP_ID, user(1, Some("alice"), "A"), "哇", 10);

    handler.handle(&message).await.unwrap();
    let again = handler.handle(&message).await.unwrap();

    assert_eq!(again, HandlerResponse::Stop);
    assert_eq!(repo.count_for(10).await.unwrap(), 1);
}

async fn command_handler(
    server: &mut mockito::ServerGuard,
    bot: Arc<RecordingBot>,
    store: Arc<RuntimeInfoStore>,
    admins: Vec<String>,
) -> (CommandHandler, mockito::Mock) {
    let head = mock_head(server, "/kb.jpg").await;
    let source = FakePostSource::new(vec![post("kb", 7, &format!("{}/kb.jpg", server.url()), 5)]);
    let daily = DailyBest::new(bot, source, preparer(), store).with_group_id(Some(GROUP_ID));
    (
        CommandHandler::new(daily, admins, bot_username("keybot")),
        head,
    )
}

/// **Test: /redditpreview from an admin posts into the requesting chat without recording.**
#[tokio::test]
async fn test_command_preview_by_admin() {
    let mut server = mockito::Server::new_async().await;
    let dir = TempDir::new().unwrap();
    let store = runtime_store(&dir);
    let bot = RecordingBot::new();
    let (handler, head) =
        command_handler(&mut server, bot.clone(), store.clone(), vec!["alice".to_string()]).await;

    let message = text_message(3, 777, user(5, Some("Alice"), "Alice"), "/redditpreview@keybot");
    let response = handler.handle(&message).await.unwrap();

    head.assert_async().await;
    assert_eq!(response, HandlerResponse::Stop);
    assert!(matches!(
        &bot.sent()[0],
        Sent::Photo { chat_id: 777, photo: PhotoInput::Url(_), .. }
    ));
    assert_eq!(store.load().await.unwrap().last_msg_id, None);
}

/// **Test: /redditbest posts to the group and records the daily post; admins match by id.**
#[tokio::test]
async fn test_command_best_by_admin_id() {
    let mut server = mockito::Server::new_async().await;
    let dir = TempDir::new().unwrap();
    let store = runtime_store(&dir);
    let bot = RecordingBot::new();
    let (handler, _head) =
        command_handler(&mut server, bot.clone(), store.clone(), vec!["5".to_string()]).await;

    let message = text_message(3, 777, user(5, None, "Alice"), "/redditbest");
    handler.handle(&message).await.unwrap();

    assert!(matches!(&bot.sent()[0], Sent::Photo { chat_id: GROUP_ID, .. }));
    assert_eq!(store.load().await.unwrap().last_msg_id, Some(100));
}

/// **Test: Non-admins are ignored; commands for other bots pass through.**
#[tokio::test]
async fn test_command_ignored_cases() {
    let mut server = mockito::Server::new_async().await;
    let dir = TempDir::new().unwrap();
    let bot = RecordingBot::new();
    let (handler, _head) = command_handler(
        &mut server,
        bot.clone(),
        runtime_store(&dir),
        vec!["alice".to_string()],
    )
    .await;

    let non_admin = text_message(3, 777, user(6, Some("mallory"), "M"), "/redditbest");
    let other_bot = text_message(4, 777, user(5, Some("alice"), "A"), "/redditbest@otherbot");
    let plain = text_message(5, 777, user(5, Some("alice"), "A"), "redditbest");

    assert_eq!(handler.handle(&non_admin).await.unwrap(), HandlerResponse::Stop);
    assert_eq!(handler.handle(&other_bot).await.unwrap(), HandlerResponse::Continue);
    assert_eq!(handler.handle(&plain).await.unwrap(), HandlerResponse::Continue);
    assert!(bot.sent().is_empty());
}
