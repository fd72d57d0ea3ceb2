//! Conversational handlers for each supported event type.

use async_trait::async_trait;
use tracing::{debug, info};

use super::{EventHandler, HandlerError, HandlerRegistry};
use crate::line::{Event, EventKind, EventTag, MessageContent, Messenger, OutboundMessage};

const PRIVATE_CHAT_TEXT: &str = "👋 您好！請將我加入群組中使用，我是群組共享Token管理Bot。\n\n\
使用方式：\n\
1. 將我邀請到您的群組\n\
2. 在群組中輸入 /綁定Token 開始使用\n\
3. 輸入 /說明 查看所有指令";

const HELP_TEXT: &str = "🤖 Line Bot Token管理系統\n\n\
📋 可用指令：\n\
/綁定Token - 綁定群組Token帳戶\n\
/購買Token - 查看Token充值資訊\n\
/查詢Token - 查看餘額與交易記錄\n\
/儲值 [金額] [帳號] - 自動Razer儲值\n\
/設置管理員 @用戶 - 設定群組管理員\n\
/刪除管理員 @用戶 - 移除群組管理員\n\
/更新Token [編號] - 手動補登Token\n\
/刪除綁定 - 解除群組綁定(管理員)\n\
/說明 - 顯示此說明\n\n\
❓ 如有問題請聯繫系統管理員";

const FOLLOW_TEXT: &str = "🎮 歡迎使用遊戲自動化儲值 Line Bot！\n\n\
我可以幫您：\n\
✅ 自動化遊戲儲值\n\
✅ 查詢代幣餘額\n\
✅ 管理交易記錄\n\
✅ 設定帳號資訊\n\n\
請輸入「開始」或「start」來開始使用！";

const JOIN_TEXT: &str = "🎮 感謝將我加入此群組！\n\n\
我是遊戲自動化儲值機器人，可以協助群組成員進行：\n\
✅ 遊戲自動化儲值\n\
✅ 餘額查詢\n\
✅ 交易管理\n\n\
請私訊我來開始使用服務！";

const IMAGE_RECEIVED_TEXT: &str = "📸 已收到您的圖片！";
const CHECK_BALANCE_TEXT: &str = "正在查詢您的餘額...";
const START_TOPUP_TEXT: &str = "正在啟動自動化儲值流程...";
const UNKNOWN_ACTION_TEXT: &str = "未知的操作，請重新選擇。";

/// Registry with every handler the bot ships with.
pub fn default_registry() -> HandlerRegistry {
    HandlerRegistry::new()
        .register(EventTag::TextMessage, TextMessageHandler)
        .register(EventTag::ImageMessage, ImageMessageHandler)
        .register(EventTag::LocationMessage, LocationMessageHandler)
        .register(EventTag::StickerMessage, StickerMessageHandler)
        .register(EventTag::Postback, PostbackHandler)
        .register(EventTag::Follow, FollowHandler)
        .register(EventTag::Unfollow, UnfollowHandler)
        .register(EventTag::Join, JoinHandler)
        .register(EventTag::Leave, LeaveHandler)
}

async fn reply(
    messenger: &dyn Messenger,
    event: &Event,
    messages: &[OutboundMessage],
) -> Result<(), HandlerError> {
    let token = event
        .reply_token
        .as_deref()
        .ok_or(HandlerError::MissingReplyToken)?;
    messenger.reply(token, messages).await?;
    Ok(())
}

/// Bot commands recognised in group chats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
}

impl Command {
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim() {
            "/help" | "/說明" => Some(Command::Help),
            _ => None,
        }
    }
}

pub struct TextMessageHandler;

#[async_trait]
impl EventHandler for TextMessageHandler {
    async fn handle(&self, event: &Event, messenger: &dyn Messenger) -> Result<(), HandlerError> {
        let EventKind::Message {
            message: MessageContent::Text { text, .. },
        } = &event.kind
        else {
            return Err(HandlerError::UnexpectedEvent {
                expected: EventTag::TextMessage,
            });
        };

        let chat_id = event.source.as_ref().and_then(|s| s.chat_id());
        info!(
            user_id = ?event.user_id(),
            chat_id = ?chat_id,
            text_length = text.len(),
            "text_message_received"
        );

        if chat_id.is_none() {
            return reply(messenger, event, &[OutboundMessage::text(PRIVATE_CHAT_TEXT)]).await;
        }

        match Command::parse(text) {
            Some(Command::Help) => reply(messenger, event, &[OutboundMessage::text(HELP_TEXT)]).await,
            None => {
                debug!("group_text_not_a_command");
                Ok(())
            }
        }
    }
}

pub struct ImageMessageHandler;

#[async_trait]
impl EventHandler for ImageMessageHandler {
    async fn handle(&self, event: &Event, messenger: &dyn Messenger) -> Result<(), HandlerError> {
        info!(user_id = ?event.user_id(), "image_message_received");
        reply(messenger, event, &[OutboundMessage::text(IMAGE_RECEIVED_TEXT)]).await
    }
}

pub struct LocationMessageHandler;

#[async_trait]
impl EventHandler for LocationMessageHandler {
    async fn handle(&self, event: &Event, messenger: &dyn Messenger) -> Result<(), HandlerError> {
        let EventKind::Message {
            message:
                MessageContent::Location {
                    address,
                    latitude,
                    longitude,
                    ..
                },
        } = &event.kind
        else {
            return Err(HandlerError::UnexpectedEvent {
                expected: EventTag::LocationMessage,
            });
        };

        let address = address.as_deref().unwrap_or("");
        info!(user_id = ?event.user_id(), address = %address, "location_message_received");

        let text = format!(
            "📍 已收到您的位置資訊:\n地址: {address}\n緯度: {latitude}\n經度: {longitude}"
        );
        reply(messenger, event, &[OutboundMessage::text(text)]).await
    }
}

pub struct StickerMessageHandler;

#[async_trait]
impl EventHandler for StickerMessageHandler {
    async fn handle(&self, event: &Event, messenger: &dyn Messenger) -> Result<(), HandlerError> {
        if let EventKind::Message {
            message:
                MessageContent::Sticker {
                    package_id,
                    sticker_id,
                    ..
                },
        } = &event.kind
        {
            info!(
                user_id = ?event.user_id(),
                package_id = %package_id,
                sticker_id = %sticker_id,
                "sticker_message_received"
            );
        }
        reply(messenger, event, &[OutboundMessage::sticker("1", "1")]).await
    }
}

/// Read the `action` field from form-encoded postback data.
pub fn postback_action(data: &str) -> Option<String> {
    url::form_urlencoded::parse(data.as_bytes())
        .find(|(key, _)| key == "action")
        .map(|(_, value)| value.into_owned())
}

pub struct PostbackHandler;

#[async_trait]
impl EventHandler for PostbackHandler {
    async fn handle(&self, event: &Event, messenger: &dyn Messenger) -> Result<(), HandlerError> {
        let EventKind::Postback { postback } = &event.kind else {
            return Err(HandlerError::UnexpectedEvent {
                expected: EventTag::Postback,
            });
        };

        info!(user_id = ?event.user_id(), data = %postback.data, "postback_received");

        let Some(action) = postback_action(&postback.data) else {
            debug!("postback_without_action");
            return Ok(());
        };

        let text = match action.as_str() {
            "check_balance" => CHECK_BALANCE_TEXT,
            "start_topup" => START_TOPUP_TEXT,
            _ => UNKNOWN_ACTION_TEXT,
        };
        reply(messenger, event, &[OutboundMessage::text(text)]).await
    }
}

pub struct FollowHandler;

#[async_trait]
impl EventHandler for FollowHandler {
    async fn handle(&self, event: &Event, messenger: &dyn Messenger) -> Result<(), HandlerError> {
        info!(user_id = ?event.user_id(), "user_followed");
        reply(messenger, event, &[OutboundMessage::text(FOLLOW_TEXT)]).await
    }
}

pub struct UnfollowHandler;

#[async_trait]
impl EventHandler for UnfollowHandler {
    async fn handle(&self, event: &Event, _: &dyn Messenger) -> Result<(), HandlerError> {
        info!(user_id = ?event.user_id(), "user_unfollowed");
        Ok(())
    }
}

pub struct JoinHandler;

#[async_trait]
impl EventHandler for JoinHandler {
    async fn handle(&self, event: &Event, messenger: &dyn Messenger) -> Result<(), HandlerError> {
        let chat_id = event.source.as_ref().and_then(|s| s.chat_id());
        info!(chat_id = chat_id.unwrap_or("unknown"), "bot_joined_chat");
        reply(messenger, event, &[OutboundMessage::text(JOIN_TEXT)]).await
    }
}

pub struct LeaveHandler;

#[async_trait]
impl EventHandler for LeaveHandler {
    async fn handle(&self, event: &Event, _: &dyn Messenger) -> Result<(), HandlerError> {
        let chat_id = event.source.as_ref().and_then(|s| s.chat_id());
        info!(chat_id = chat_id.unwrap_or("unknown"), "bot_left_chat");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::MessagingError;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingMessenger {
        replies: Mutex<Vec<(String, Vec<OutboundMessage>)>>,
    }

    impl RecordingMessenger {
        fn replies(&self) -> Vec<(String, Vec<OutboundMessage>)> {
            self.replies.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Messenger for RecordingMessenger {
        async fn reply(
            &self,
            reply_token: &str,
            messages: &[OutboundMessage],
        ) -> Result<(), MessagingError> {
            self.replies
                .lock()
                .unwrap()
                .push((reply_token.to_string(), messages.to_vec()));
            Ok(())
        }
    }

    fn event(value: Value) -> Event {
        Event::from_value(value).unwrap()
    }

    fn text_event(text: &str, source: Value) -> Event {
        event(json!({
            "type": "message",
            "replyToken": "r1",
            "source": source,
            "message": {"type": "text", "id": "m", "text": text}
        }))
    }

    #[tokio::test]
    async fn test_private_text_gets_guidance() {
        let messenger = RecordingMessenger::default();
        let ev = text_event("hi", json!({"type": "user", "userId": "U1"}));

        TextMessageHandler.handle(&ev, &messenger).await.unwrap();

        assert_eq!(
            messenger.replies(),
            vec![("r1".to_string(), vec![OutboundMessage::text(PRIVATE_CHAT_TEXT)])]
        );
    }

    #[tokio::test]
    async fn test_group_help_command() {
        let messenger = RecordingMessenger::default();
        let ev = text_event(" /說明 ", json!({"type": "group", "groupId": "C1", "userId": "U1"}));

        TextMessageHandler.handle(&ev, &messenger).await.unwrap();

        let replies = messenger.replies();
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].1, vec![OutboundMessage::text(HELP_TEXT)]);
    }

    #[tokio::test]
    async fn test_group_chatter_ignored() {
        let messenger = RecordingMessenger::default();
        let ev = text_event("lunch?", json!({"type": "room", "roomId": "R1"}));

        TextMessageHandler.handle(&ev, &messenger).await.unwrap();

        assert!(messenger.replies().is_empty());
    }

    #[tokio::test]
    async fn test_text_handler_rejects_other_events() {
        let messenger = RecordingMessenger::default();
        let ev = event(json!({"type": "follow", "replyToken": "r"}));

        let err = TextMessageHandler.handle(&ev, &messenger).await.unwrap_err();
        assert!(matches!(
            err,
            HandlerError::UnexpectedEvent {
                expected: EventTag::TextMessage
            }
        ));
    }

    #[tokio::test]
    async fn test_location_reply() {
        let messenger = RecordingMessenger::default();
        let ev = event(json!({
            "type": "message",
            "replyToken": "r2",
            "message": {
                "type": "location", "id": "l",
                "address": "台北市信義區", "latitude": 25.0339, "longitude": 121.5645
            }
        }));

        LocationMessageHandler.handle(&ev, &messenger).await.unwrap();

        let replies = messenger.replies();
        match &replies[0].1[0] {
            OutboundMessage::Text { text } => {
                assert!(text.contains("台北市信義區"));
                assert!(text.contains("25.0339"));
                assert!(text.contains("121.5645"));
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_sticker_reply() {
        let messenger = RecordingMessenger::default();
        let ev = event(json!({
            "type": "message",
            "replyToken": "r3",
            "message": {"type": "sticker", "id": "s", "packageId": "789", "stickerId": "10855"}
        }));

        StickerMessageHandler.handle(&ev, &messenger).await.unwrap();

        assert_eq!(messenger.replies()[0].1, vec![OutboundMessage::sticker("1", "1")]);
    }

    #[test]
    fn test_postback_action() {
        assert_eq!(postback_action("action=check_balance"), Some("check_balance".to_string()));
        assert_eq!(
            postback_action("item=5&action=start_topup"),
            Some("start_topup".to_string())
        );
        assert_eq!(postback_action("item=5"), None);
        assert_eq!(postback_action(""), None);
    }

    #[tokio::test]
    async fn test_postback_replies() {
        let cases = [
            ("action=check_balance", Some(CHECK_BALANCE_TEXT)),
            ("action=start_topup", Some(START_TOPUP_TEXT)),
            ("action=refund", Some(UNKNOWN_ACTION_TEXT)),
            ("menu=1", None),
        ];

        for (data, expected) in cases {
            let messenger = RecordingMessenger::default();
            let ev = event(json!({
                "type": "postback",
                "replyToken": "p",
                "postback": {"data": data}
            }));

            PostbackHandler.handle(&ev, &messenger).await.unwrap();

            let replies = messenger.replies();
            match expected {
                Some(text) => assert_eq!(replies[0].1, vec![OutboundMessage::text(text)]),
                None => assert!(replies.is_empty(), "{data} should not reply"),
            }
        }
    }

    #[tokio::test]
    async fn test_follow_without_reply_token_fails() {
        let messenger = RecordingMessenger::default();
        let ev = event(json!({"type": "follow", "source": {"type": "user", "userId": "U"}}));

        let err = FollowHandler.handle(&ev, &messenger).await.unwrap_err();
        assert!(matches!(err, HandlerError::MissingReplyToken));
    }

    #[tokio::test]
    async fn test_join_and_leave() {
        let messenger = RecordingMessenger::default();
        let join = event(json!({
            "type": "join",
            "replyToken": "j",
            "source": {"type": "group", "groupId": "C9"}
        }));
        let leave = event(json!({"type": "leave", "source": {"type": "group", "groupId": "C9"}}));

        JoinHandler.handle(&join, &messenger).await.unwrap();
        LeaveHandler.handle(&leave, &messenger).await.unwrap();

        assert_eq!(
            messenger.replies(),
            vec![("j".to_string(), vec![OutboundMessage::text(JOIN_TEXT)])]
        );
    }

    #[test]
    fn test_default_registry_tags() {
        let names: Vec<_> = default_registry().tags().map(|t| t.name()).collect();
        assert_eq!(
            names,
            vec![
                "TextMessage",
                "ImageMessage",
                "LocationMessage",
                "StickerMessage",
                "PostbackEvent",
                "FollowEvent",
                "UnfollowEvent",
                "JoinEvent",
                "LeaveEvent",
            ]
        );
    }
}
