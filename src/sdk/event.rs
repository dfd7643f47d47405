use strum_macros::{Display, IntoStaticStr};

use crate::sdk::attribute::{Attribute, ValueKind};

use Attribute::*;
use ValueKind::{Bool, Data, Int, String as Str};

/// Native event slots, in vendor order.
///
/// Each slot holds at most one `void (*)(void)` handler. The handler reads
/// the event payload back out of the attribute table while it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(i32)]
pub enum EventKind {
    AvatarAdd = 0,
    AvatarChange,
    AvatarDelete,
    CellBegin,
    CellObject,
    CellEnd,
    Chat,
    ObjectAdd,
    ObjectDelete,
    UniverseAttributes,
    UniverseDisconnect,
    WorldAttributes,
    WorldInfo,
    WorldDisconnect,
    SendFile,
    Teleport,
    TerrainBegin,
    TerrainChanged,
    TerrainData,
    TerrainEnd,
    ObjectClick,
    ObjectSelect,
    Url,
    UrlClick,
    AvatarClick,
}

const ALL: &[EventKind] = &[
    EventKind::AvatarAdd,
    EventKind::AvatarChange,
    EventKind::AvatarDelete,
    EventKind::CellBegin,
    EventKind::CellObject,
    EventKind::CellEnd,
    EventKind::Chat,
    EventKind::ObjectAdd,
    EventKind::ObjectDelete,
    EventKind::UniverseAttributes,
    EventKind::UniverseDisconnect,
    EventKind::WorldAttributes,
    EventKind::WorldInfo,
    EventKind::WorldDisconnect,
    EventKind::SendFile,
    EventKind::Teleport,
    EventKind::TerrainBegin,
    EventKind::TerrainChanged,
    EventKind::TerrainData,
    EventKind::TerrainEnd,
    EventKind::ObjectClick,
    EventKind::ObjectSelect,
    EventKind::Url,
    EventKind::UrlClick,
    EventKind::AvatarClick,
];

const OBJECT_PAYLOAD: &[(Attribute, ValueKind)] = &[
    (ObjectType, Int),
    (ObjectId, Int),
    (ObjectNumber, Int),
    (ObjectOwner, Int),
    (ObjectBuildTimestamp, Int),
    (ObjectX, Int),
    (ObjectY, Int),
    (ObjectZ, Int),
    (ObjectYaw, Int),
    (ObjectTilt, Int),
    (ObjectRoll, Int),
    (ObjectModel, Str),
    (ObjectDescription, Str),
    (ObjectAction, Str),
    (ObjectData, Data),
];

const AVATAR_PAYLOAD: &[(Attribute, ValueKind)] = &[
    (AvatarSession, Int),
    (AvatarName, Str),
    (AvatarCitizen, Int),
    (AvatarPrivilege, Int),
    (AvatarX, Int),
    (AvatarY, Int),
    (AvatarZ, Int),
    (AvatarYaw, Int),
    (AvatarType, Int),
    (AvatarGesture, Int),
    (AvatarState, Int),
];

impl EventKind {
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Vendor name without the `AW_EVENT_` prefix, e.g. `CELL_OBJECT`.
    pub fn name(self) -> &'static str {
        self.into()
    }

    pub fn from_code(code: i32) -> Option<Self> {
        usize::try_from(code).ok().and_then(|i| ALL.get(i)).copied()
    }

    pub fn all() -> impl Iterator<Item = EventKind> {
        ALL.iter().copied()
    }

    /// Attributes that carry this event's payload while its handler runs.
    pub fn attributes(self) -> &'static [(Attribute, ValueKind)] {
        match self {
            EventKind::AvatarAdd | EventKind::AvatarChange => AVATAR_PAYLOAD,
            EventKind::AvatarDelete => &[(AvatarSession, Int), (AvatarName, Str)],
            EventKind::CellBegin => &[(CellX, Int), (CellZ, Int)],
            EventKind::CellObject | EventKind::ObjectAdd => OBJECT_PAYLOAD,
            EventKind::CellEnd => &[],
            EventKind::Chat => &[
                (ChatSession, Int),
                (ChatType, Int),
                (ChatMessage, Str),
                (AvatarName, Str),
            ],
            EventKind::ObjectDelete => &[
                (ObjectNumber, Int),
                (ObjectId, Int),
                (ObjectX, Int),
                (ObjectZ, Int),
                (ObjectSession, Int),
            ],
            EventKind::UniverseAttributes => &[
                (UniverseName, Str),
                (UniverseBuildNumber, Int),
                (UniverseWelcomeMessage, Str),
            ],
            EventKind::UniverseDisconnect | EventKind::WorldDisconnect => {
                &[(DisconnectReason, Int)]
            }
            EventKind::WorldAttributes => &[(WorldName, Str), (WorldTitle, Str), (WorldSize, Int)],
            EventKind::WorldInfo => &[
                (WorldlistName, Str),
                (WorldlistStatus, Int),
                (WorldlistUsers, Int),
            ],
            EventKind::SendFile => &[
                (FileSender, Int),
                (FileSenderName, Str),
                (FileSession, Int),
                (FileAddress, Int),
                (FilePort, Int),
            ],
            EventKind::Teleport => &[
                (TeleportWorld, Str),
                (TeleportX, Int),
                (TeleportY, Int),
                (TeleportZ, Int),
                (TeleportYaw, Int),
                (TeleportWarp, Bool),
            ],
            EventKind::TerrainBegin | EventKind::TerrainEnd => {
                &[(TerrainPageX, Int), (TerrainPageZ, Int), (TerrainComplete, Bool)]
            }
            EventKind::TerrainChanged => &[(TerrainPageX, Int), (TerrainPageZ, Int)],
            EventKind::TerrainData => &[
                (TerrainPageX, Int),
                (TerrainPageZ, Int),
                (TerrainNodeX, Int),
                (TerrainNodeZ, Int),
                (TerrainNodeSize, Int),
                (TerrainNodeTextures, Data),
                (TerrainNodeHeights, Data),
            ],
            EventKind::ObjectClick | EventKind::ObjectSelect => &[
                (AvatarSession, Int),
                (AvatarName, Str),
                (ObjectNumber, Int),
                (ObjectId, Int),
                (ObjectX, Int),
                (ObjectZ, Int),
            ],
            EventKind::Url => &[(UrlName, Str), (UrlPost, Str), (UrlTarget, Str)],
            EventKind::UrlClick => &[(AvatarSession, Int), (AvatarName, Str), (UrlName, Str)],
            EventKind::AvatarClick => &[
                (AvatarSession, Int),
                (AvatarName, Str),
                (ClickedSession, Int),
                (ClickedName, Str),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_match_vendor_order() {
        for (i, kind) in EventKind::all().enumerate() {
            assert_eq!(kind.code(), i as i32);
            assert_eq!(EventKind::from_code(i as i32), Some(kind));
        }
        assert_eq!(EventKind::CellObject.code(), 4);
        assert_eq!(EventKind::Chat.code(), 6);
        assert_eq!(EventKind::from_code(99), None);
    }

    #[test]
    fn test_display_uses_vendor_name() {
        assert_eq!(EventKind::CellObject.to_string(), "CELL_OBJECT");
        assert_eq!(EventKind::UniverseDisconnect.to_string(), "UNIVERSE_DISCONNECT");
    }

    #[test]
    fn test_name_matches_display() {
        assert_eq!(EventKind::AvatarClick.name(), "AVATAR_CLICK");
        assert_eq!(EventKind::Url.name(), "URL");
        for kind in EventKind::all() {
            assert_eq!(kind.name(), kind.to_string());
        }
    }

    #[test]
    fn test_cell_object_payload_covers_object_fields() {
        let attrs: Vec<_> = EventKind::CellObject
            .attributes()
            .iter()
            .map(|(a, _)| *a)
            .collect();
        assert!(attrs.contains(&ObjectNumber));
        assert!(attrs.contains(&ObjectData));
        assert_eq!(attrs.len(), 15);
    }
}
