//! LINE webhook event types.
//!
//! The request body is decoded in two stages: the outer [`WebhookPayload`]
//! keeps each event as raw JSON, and [`Event::from_value`] decodes events
//! one at a time so a malformed event only affects itself.

use std::fmt;

use serde::Deserialize;
use serde_json::Value;

/// Top-level webhook request body.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    /// User ID of the bot that should receive the events
    #[serde(default)]
    pub destination: Option<String>,
    /// Raw events, decoded individually during dispatch
    pub events: Vec<Value>,
}

/// A single decoded webhook event.
#[derive(Debug, Clone)]
pub struct Event {
    pub reply_token: Option<String>,
    pub timestamp: i64,
    pub source: Option<Source>,
    pub webhook_event_id: Option<String>,
    pub mode: Option<String>,
    pub kind: EventKind,
}

/// Fields shared by every event type.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
    #[serde(default)]
    reply_token: Option<String>,
    #[serde(default)]
    timestamp: i64,
    #[serde(default)]
    source: Option<Source>,
    #[serde(default)]
    webhook_event_id: Option<String>,
    #[serde(default)]
    mode: Option<String>,
}

impl Event {
    /// Decode one raw event.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let kind = EventKind::deserialize(&value)?;
        let envelope = Envelope::deserialize(value)?;

        Ok(Event {
            reply_token: envelope.reply_token,
            timestamp: envelope.timestamp,
            source: envelope.source,
            webhook_event_id: envelope.webhook_event_id,
            mode: envelope.mode,
            kind,
        })
    }

    /// Dispatch tag for this event, `None` for unsupported types.
    pub fn tag(&self) -> Option<EventTag> {
        self.kind.tag()
    }

    /// ID of the user who triggered the event, if LINE disclosed it.
    pub fn user_id(&self) -> Option<&str> {
        self.source.as_ref().and_then(Source::user_id)
    }
}

/// Where an event came from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Source {
    User {
        #[serde(rename = "userId")]
        user_id: String,
    },
    Group {
        #[serde(rename = "groupId")]
        group_id: String,
        #[serde(default, rename = "userId")]
        user_id: Option<String>,
    },
    Room {
        #[serde(rename = "roomId")]
        room_id: String,
        #[serde(default, rename = "userId")]
        user_id: Option<String>,
    },
    /// Any source type this bot does not model (e.g. `channel`).
    #[serde(other)]
    Unknown,
}

impl Source {
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Source::User { user_id } => Some(user_id),
            Source::Group { user_id, .. } | Source::Room { user_id, .. } => user_id.as_deref(),
            Source::Unknown => None,
        }
    }

    /// Group or room ID for multi-person chats.
    pub fn chat_id(&self) -> Option<&str> {
        match self {
            Source::User { .. } | Source::Unknown => None,
            Source::Group { group_id, .. } => Some(group_id),
            Source::Room { room_id, .. } => Some(room_id),
        }
    }
}

/// Event payload, keyed by the `type` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EventKind {
    Message { message: MessageContent },
    Postback { postback: Postback },
    Follow,
    Unfollow,
    Join,
    Leave,
    MemberJoined { joined: Members },
    MemberLeft { left: Members },
    Beacon { beacon: Beacon },
    #[serde(other)]
    Unsupported,
}

impl EventKind {
    pub fn tag(&self) -> Option<EventTag> {
        let tag = match self {
            EventKind::Message { message } => return message.tag(),
            EventKind::Postback { .. } => EventTag::Postback,
            EventKind::Follow => EventTag::Follow,
            EventKind::Unfollow => EventTag::Unfollow,
            EventKind::Join => EventTag::Join,
            EventKind::Leave => EventTag::Leave,
            EventKind::MemberJoined { .. } => EventTag::MemberJoined,
            EventKind::MemberLeft { .. } => EventTag::MemberLeft,
            EventKind::Beacon { .. } => EventTag::Beacon,
            EventKind::Unsupported => return None,
        };
        Some(tag)
    }
}

/// Message event content, keyed by the message `type`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MessageContent {
    Text {
        id: String,
        text: String,
    },
    Image {
        id: String,
    },
    Video {
        id: String,
    },
    Audio {
        id: String,
    },
    File {
        id: String,
        #[serde(default, rename = "fileName")]
        file_name: Option<String>,
    },
    Location {
        id: String,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        address: Option<String>,
        latitude: f64,
        longitude: f64,
    },
    Sticker {
        id: String,
        #[serde(rename = "packageId")]
        package_id: String,
        #[serde(rename = "stickerId")]
        sticker_id: String,
    },
    #[serde(other)]
    Unsupported,
}

impl MessageContent {
    pub fn tag(&self) -> Option<EventTag> {
        let tag = match self {
            MessageContent::Text { .. } => EventTag::TextMessage,
            MessageContent::Image { .. } => EventTag::ImageMessage,
            MessageContent::Video { .. } => EventTag::VideoMessage,
            MessageContent::Audio { .. } => EventTag::AudioMessage,
            MessageContent::File { .. } => EventTag::FileMessage,
            MessageContent::Location { .. } => EventTag::LocationMessage,
            MessageContent::Sticker { .. } => EventTag::StickerMessage,
            MessageContent::Unsupported => return None,
        };
        Some(tag)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Postback {
    pub data: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Members {
    pub members: Vec<Source>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Beacon {
    pub hwid: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Dispatch key for event handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventTag {
    TextMessage,
    ImageMessage,
    VideoMessage,
    AudioMessage,
    FileMessage,
    LocationMessage,
    StickerMessage,
    Postback,
    Follow,
    Unfollow,
    Join,
    Leave,
    MemberJoined,
    MemberLeft,
    Beacon,
}

impl EventTag {
    /// Name reported by the webhook smoke-test endpoint.
    pub fn name(self) -> &'static str {
        match self {
            EventTag::TextMessage => "TextMessage",
            EventTag::ImageMessage => "ImageMessage",
            EventTag::VideoMessage => "VideoMessage",
            EventTag::AudioMessage => "AudioMessage",
            EventTag::FileMessage => "FileMessage",
            EventTag::LocationMessage => "LocationMessage",
            EventTag::StickerMessage => "StickerMessage",
            EventTag::Postback => "PostbackEvent",
            EventTag::Follow => "FollowEvent",
            EventTag::Unfollow => "UnfollowEvent",
            EventTag::Join => "JoinEvent",
            EventTag::Leave => "LeaveEvent",
            EventTag::MemberJoined => "MemberJoinedEvent",
            EventTag::MemberLeft => "MemberLeftEvent",
            EventTag::Beacon => "BeaconEvent",
        }
    }
}

impl fmt::Display for EventTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
