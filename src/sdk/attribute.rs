//! SDK attribute codes.
//!
//! The vendor library exposes nearly all of its state through a single flat
//! table of integer attributes. Codes are consecutive, starting at
//! `LOGIN_NAME = 0`, and must stay in vendor order.

use std::fmt;

use strum_macros::Display;

use crate::error::{Error, Result};

macro_rules! attributes {
    ($($variant:ident = $name:literal,)*) => {
        /// Attribute code understood by the `aw_int`/`aw_string`/... family.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(i32)]
        pub enum Attribute {
            $($variant,)*
        }

        const ALL: &[Attribute] = &[$(Attribute::$variant,)*];
        const NAMES: &[&str] = &[$($name,)*];
    };
}

attributes! {
    LoginName = "LOGIN_NAME",
    LoginPassword = "LOGIN_PASSWORD",
    LoginOwner = "LOGIN_OWNER",
    LoginPrivilegePassword = "LOGIN_PRIVILEGE_PASSWORD",
    LoginPrivilegeNumber = "LOGIN_PRIVILEGE_NUMBER",
    LoginPrivilegeName = "LOGIN_PRIVILEGE_NAME",
    LoginApplication = "LOGIN_APPLICATION",
    LoginEmail = "LOGIN_EMAIL",
    UniverseBrowserMinimum = "UNIVERSE_BROWSER_MINIMUM",
    UniverseBrowserRelease = "UNIVERSE_BROWSER_RELEASE",
    UniverseBrowserBeta = "UNIVERSE_BROWSER_BETA",
    UniverseWorldMinimum = "UNIVERSE_WORLD_MINIMUM",
    UniverseWorldStart = "UNIVERSE_WORLD_START",
    UniverseRegistrationRequired = "UNIVERSE_REGISTRATION_REQUIRED",
    UniverseBuildNumber = "UNIVERSE_BUILD_NUMBER",
    UniverseMonthlyCharge = "UNIVERSE_MONTHLY_CHARGE",
    UniverseAnnualCharge = "UNIVERSE_ANNUAL_CHARGE",
    UniverseRegisterMethod = "UNIVERSE_REGISTER_METHOD",
    UniverseTime = "UNIVERSE_TIME",
    UniverseCitizenChangesAllowed = "UNIVERSE_CITIZEN_CHANGES_ALLOWED",
    UniverseBrowserRelease22 = "UNIVERSE_BROWSER_RELEASE_22",
    UniverseWelcomeMessage = "UNIVERSE_WELCOME_MESSAGE",
    UniverseWorldRelease = "UNIVERSE_WORLD_RELEASE",
    UniverseWorldBeta = "UNIVERSE_WORLD_BETA",
    UniverseAllowTourists = "UNIVERSE_ALLOW_TOURISTS",
    UniverseSearchUrl = "UNIVERSE_SEARCH_URL",
    UniverseNotepadUrl = "UNIVERSE_NOTEPAD_URL",
    UniverseName = "UNIVERSE_NAME",
    UniverseUserListEnabled = "UNIVERSE_USER_LIST_ENABLED",
    CitizenNumber = "CITIZEN_NUMBER",
    CitizenName = "CITIZEN_NAME",
    CitizenPassword = "CITIZEN_PASSWORD",
    CitizenEmail = "CITIZEN_EMAIL",
    CitizenTimeLeft = "CITIZEN_TIME_LEFT",
    CitizenPrivilegePassword = "CITIZEN_PRIVILEGE_PASSWORD",
    CitizenImmigrationTime = "CITIZEN_IMMIGRATION_TIME",
    CitizenExpirationTime = "CITIZEN_EXPIRATION_TIME",
    CitizenBeta = "CITIZEN_BETA",
    CitizenLastLogin = "CITIZEN_LAST_LOGIN",
    CitizenBotLimit = "CITIZEN_BOT_LIMIT",
    CitizenTotalTime = "CITIZEN_TOTAL_TIME",
    CitizenEnabled = "CITIZEN_ENABLED",
    CitizenComment = "CITIZEN_COMMENT",
    CitizenUrl = "CITIZEN_URL",
    WorldName = "WORLD_NAME",
    WorldTitle = "WORLD_TITLE",
    WorldBackdrop = "WORLD_BACKDROP",
    WorldGround = "WORLD_GROUND",
    WorldObjectPath = "WORLD_OBJECT_PATH",
    WorldObjectRefresh = "WORLD_OBJECT_REFRESH",
    WorldBuildRight = "WORLD_BUILD_RIGHT",
    WorldEminentDomainRight = "WORLD_EMINENT_DOMAIN_RIGHT",
    WorldEnterRight = "WORLD_ENTER_RIGHT",
    WorldSpecialObjectsRight = "WORLD_SPECIAL_OBJECTS_RIGHT",
    WorldFogRed = "WORLD_FOG_RED",
    WorldFogGreen = "WORLD_FOG_GREEN",
    WorldFogBlue = "WORLD_FOG_BLUE",
    WorldCaretakerCapability = "WORLD_CARETAKER_CAPABILITY",
    WorldRestrictedRadius = "WORLD_RESTRICTED_RADIUS",
    WorldPublicSpeakerCapability = "WORLD_PUBLIC_SPEAKER_CAPABILITY",
    WorldPublicSpeakerRight = "WORLD_PUBLIC_SPEAKER_RIGHT",
    WorldCreationTimestamp = "WORLD_CREATION_TIMESTAMP",
    WorldHomePage = "WORLD_HOME_PAGE",
    WorldBuildNumber = "WORLD_BUILD_NUMBER",
    WorldObjectPassword = "WORLD_OBJECT_PASSWORD",
    WorldDisableCreateUrl = "WORLD_DISABLE_CREATE_URL",
    WorldRating = "WORLD_RATING",
    WorldWelcomeMessage = "WORLD_WELCOME_MESSAGE",
    WorldEjectRight = "WORLD_EJECT_RIGHT",
    WorldEjectCapability = "WORLD_EJECT_CAPABILITY",
    WorldCellLimit = "WORLD_CELL_LIMIT",
    WorldBuildCapability = "WORLD_BUILD_CAPABILITY",
    WorldAllowPassthru = "WORLD_ALLOW_PASSTHRU",
    WorldAllowFlying = "WORLD_ALLOW_FLYING",
    WorldAllowTeleport = "WORLD_ALLOW_TELEPORT",
    WorldAllowObjectSelect = "WORLD_ALLOW_OBJECT_SELECT",
    WorldBotsRight = "WORLD_BOTS_RIGHT",
    WorldSpeakCapability = "WORLD_SPEAK_CAPABILITY",
    WorldSpeakRight = "WORLD_SPEAK_RIGHT",
    WorldAllowTouristWhisper = "WORLD_ALLOW_TOURIST_WHISPER",
    WorldLightX = "WORLD_LIGHT_X",
    WorldLightY = "WORLD_LIGHT_Y",
    WorldLightZ = "WORLD_LIGHT_Z",
    WorldLightRed = "WORLD_LIGHT_RED",
    WorldLightGreen = "WORLD_LIGHT_GREEN",
    WorldLightBlue = "WORLD_LIGHT_BLUE",
    WorldAmbientLightRed = "WORLD_AMBIENT_LIGHT_RED",
    WorldAmbientLightGreen = "WORLD_AMBIENT_LIGHT_GREEN",
    WorldAmbientLightBlue = "WORLD_AMBIENT_LIGHT_BLUE",
    WorldAllowAvatarCollision = "WORLD_ALLOW_AVATAR_COLLISION",
    WorldFogEnable = "WORLD_FOG_ENABLE",
    WorldFogMinimum = "WORLD_FOG_MINIMUM",
    WorldFogMaximum = "WORLD_FOG_MAXIMUM",
    WorldFogTinted = "WORLD_FOG_TINTED",
    WorldMaxUsers = "WORLD_MAX_USERS",
    WorldSize = "WORLD_SIZE",
    WorldObjectCount = "WORLD_OBJECT_COUNT",
    WorldExpiration = "WORLD_EXPIRATION",
    WorldSpecialCommandsRight = "WORLD_SPECIAL_COMMANDS_RIGHT",
    WorldMaxLightRadius = "WORLD_MAX_LIGHT_RADIUS",
    WorldSkybox = "WORLD_SKYBOX",
    WorldMinimumVisibility = "WORLD_MINIMUM_VISIBILITY",
    WorldRepeatingGround = "WORLD_REPEATING_GROUND",
    WorldKeywords = "WORLD_KEYWORDS",
    WorldEnableTerrain = "WORLD_ENABLE_TERRAIN",
    WorldAllow3AxisRotation = "WORLD_ALLOW_3_AXIS_ROTATION",
    WorldTerrainTimestamp = "WORLD_TERRAIN_TIMESTAMP",
    WorldEntryPoint = "WORLD_ENTRY_POINT",
    WorldSkyNorthRed = "WORLD_SKY_NORTH_RED",
    WorldSkyNorthGreen = "WORLD_SKY_NORTH_GREEN",
    WorldSkyNorthBlue = "WORLD_SKY_NORTH_BLUE",
    WorldSkySouthRed = "WORLD_SKY_SOUTH_RED",
    WorldSkySouthGreen = "WORLD_SKY_SOUTH_GREEN",
    WorldSkySouthBlue = "WORLD_SKY_SOUTH_BLUE",
    WorldSkyEastRed = "WORLD_SKY_EAST_RED",
    WorldSkyEastGreen = "WORLD_SKY_EAST_GREEN",
    WorldSkyEastBlue = "WORLD_SKY_EAST_BLUE",
    WorldSkyWestRed = "WORLD_SKY_WEST_RED",
    WorldSkyWestGreen = "WORLD_SKY_WEST_GREEN",
    WorldSkyWestBlue = "WORLD_SKY_WEST_BLUE",
    WorldSkyTopRed = "WORLD_SKY_TOP_RED",
    WorldSkyTopGreen = "WORLD_SKY_TOP_GREEN",
    WorldSkyTopBlue = "WORLD_SKY_TOP_BLUE",
    WorldSkyBottomRed = "WORLD_SKY_BOTTOM_RED",
    WorldSkyBottomGreen = "WORLD_SKY_BOTTOM_GREEN",
    WorldSkyBottomBlue = "WORLD_SKY_BOTTOM_BLUE",
    WorldCloudsLayer1Texture = "WORLD_CLOUDS_LAYER1_TEXTURE",
    WorldCloudsLayer1Mask = "WORLD_CLOUDS_LAYER1_MASK",
    WorldCloudsLayer1Tile = "WORLD_CLOUDS_LAYER1_TILE",
    WorldCloudsLayer1SpeedX = "WORLD_CLOUDS_LAYER1_SPEED_X",
    WorldCloudsLayer1SpeedZ = "WORLD_CLOUDS_LAYER1_SPEED_Z",
    WorldCloudsLayer1Opacity = "WORLD_CLOUDS_LAYER1_OPACITY",
    WorldCloudsLayer2Texture = "WORLD_CLOUDS_LAYER2_TEXTURE",
    WorldCloudsLayer2Mask = "WORLD_CLOUDS_LAYER2_MASK",
    WorldCloudsLayer2Tile = "WORLD_CLOUDS_LAYER2_TILE",
    WorldCloudsLayer2SpeedX = "WORLD_CLOUDS_LAYER2_SPEED_X",
    WorldCloudsLayer2SpeedZ = "WORLD_CLOUDS_LAYER2_SPEED_Z",
    WorldCloudsLayer2Opacity = "WORLD_CLOUDS_LAYER2_OPACITY",
    WorldCloudsLayer3Texture = "WORLD_CLOUDS_LAYER3_TEXTURE",
    WorldCloudsLayer3Mask = "WORLD_CLOUDS_LAYER3_MASK",
    WorldCloudsLayer3Tile = "WORLD_CLOUDS_LAYER3_TILE",
    WorldCloudsLayer3SpeedX = "WORLD_CLOUDS_LAYER3_SPEED_X",
    WorldCloudsLayer3SpeedZ = "WORLD_CLOUDS_LAYER3_SPEED_Z",
    WorldCloudsLayer3Opacity = "WORLD_CLOUDS_LAYER3_OPACITY",
    WorldDisableChat = "WORLD_DISABLE_CHAT",
    WorldAllowCitizenWhisper = "WORLD_ALLOW_CITIZEN_WHISPER",
    WorldAlwaysShowNames = "WORLD_ALWAYS_SHOW_NAMES",
    WorldDisableAvatarList = "WORLD_DISABLE_AVATAR_LIST",
    WorldAvatarRefreshRate = "WORLD_AVATAR_REFRESH_RATE",
    WorldWaterTexture = "WORLD_WATER_TEXTURE",
    WorldWaterMask = "WORLD_WATER_MASK",
    WorldWaterBottomTexture = "WORLD_WATER_BOTTOM_TEXTURE",
    WorldWaterBottomMask = "WORLD_WATER_BOTTOM_MASK",
    WorldWaterOpacity = "WORLD_WATER_OPACITY",
    WorldWaterRed = "WORLD_WATER_RED",
    WorldWaterGreen = "WORLD_WATER_GREEN",
    WorldWaterBlue = "WORLD_WATER_BLUE",
    WorldWaterLevel = "WORLD_WATER_LEVEL",
    WorldWaterSurfaceMove = "WORLD_WATER_SURFACE_MOVE",
    WorldWaterWaveMove = "WORLD_WATER_WAVE_MOVE",
    WorldWaterSpeed = "WORLD_WATER_SPEED",
    WorldWaterEnabled = "WORLD_WATER_ENABLED",
    WorldEminentDomainCapability = "WORLD_EMINENT_DOMAIN_CAPABILITY",
    WorldLightTexture = "WORLD_LIGHT_TEXTURE",
    WorldLightMask = "WORLD_LIGHT_MASK",
    WorldLightDrawSize = "WORLD_LIGHT_DRAW_SIZE",
    WorldLightDrawFront = "WORLD_LIGHT_DRAW_FRONT",
    WorldLightDrawBright = "WORLD_LIGHT_DRAW_BRIGHT",
    WorldLightSourceUseColor = "WORLD_LIGHT_SOURCE_USE_COLOR",
    WorldLightSourceColor = "WORLD_LIGHT_SOURCE_COLOR",
    WorldTerrainAmbient = "WORLD_TERRAIN_AMBIENT",
    WorldTerrainDiffuse = "WORLD_TERRAIN_DIFFUSE",
    WorldWaterVisibility = "WORLD_WATER_VISIBILITY",
    WorldSoundFootstep = "WORLD_SOUND_FOOTSTEP",
    WorldSoundWaterEnter = "WORLD_SOUND_WATER_ENTER",
    WorldSoundWaterExit = "WORLD_SOUND_WATER_EXIT",
    WorldSoundAmbient = "WORLD_SOUND_AMBIENT",
    WorldGravity = "WORLD_GRAVITY",
    WorldBuoyancy = "WORLD_BUOYANCY",
    WorldFriction = "WORLD_FRICTION",
    WorldWaterFriction = "WORLD_WATER_FRICTION",
    WorldSlopeslideEnabled = "WORLD_SLOPESLIDE_ENABLED",
    WorldSlopeslideMinAngle = "WORLD_SLOPESLIDE_MIN_ANGLE",
    WorldSlopeslideMaxAngle = "WORLD_SLOPESLIDE_MAX_ANGLE",
    WorldAllowTouristBuild = "WORLD_ALLOW_TOURIST_BUILD",
    WorldEnableReferer = "WORLD_ENABLE_REFERER",
    WorldWaterUnderTerrain = "WORLD_WATER_UNDER_TERRAIN",
    WorldTerrainOffset = "WORLD_TERRAIN_OFFSET",
    WorldVoipRight = "WORLD_VOIP_RIGHT",
    WorldDisableMultipleMedia = "WORLD_DISABLE_MULTIPLE_MEDIA",
    WorldBotmenuUrl = "WORLD_BOTMENU_URL",
    WorldEnableBumpEvent = "WORLD_ENABLE_BUMP_EVENT",
    WorldEnableSyncEvents = "WORLD_ENABLE_SYNC_EVENTS",
    WorldEnableCav = "WORLD_ENABLE_CAV",
    WorldEnablePav = "WORLD_ENABLE_PAV",
    WorldChatDisableUrlClicks = "WORLD_CHAT_DISABLE_URL_CLICKS",
    WorldMoverEmptyResetTimeout = "WORLD_MOVER_EMPTY_RESET_TIMEOUT",
    WorldMoverUsedResetTimeout = "WORLD_MOVER_USED_RESET_TIMEOUT",
    MyX = "MY_X",
    MyY = "MY_Y",
    MyZ = "MY_Z",
    MyYaw = "MY_YAW",
    MyPitch = "MY_PITCH",
    MyType = "MY_TYPE",
    MyGesture = "MY_GESTURE",
    MyState = "MY_STATE",
    AvatarSession = "AVATAR_SESSION",
    AvatarName = "AVATAR_NAME",
    AvatarX = "AVATAR_X",
    AvatarY = "AVATAR_Y",
    AvatarZ = "AVATAR_Z",
    AvatarYaw = "AVATAR_YAW",
    AvatarPitch = "AVATAR_PITCH",
    AvatarType = "AVATAR_TYPE",
    AvatarGesture = "AVATAR_GESTURE",
    AvatarState = "AVATAR_STATE",
    AvatarAddress = "AVATAR_ADDRESS",
    AvatarVersion = "AVATAR_VERSION",
    AvatarCitizen = "AVATAR_CITIZEN",
    AvatarPrivilege = "AVATAR_PRIVILEGE",
    AvatarLock = "AVATAR_LOCK",
    AvatarFlags = "AVATAR_FLAGS",
    ChatSession = "CHAT_SESSION",
    ChatMessage = "CHAT_MESSAGE",
    CellX = "CELL_X",
    CellZ = "CELL_Z",
    CellSequence = "CELL_SEQUENCE",
    CellSize = "CELL_SIZE",
    CellIterator = "CELL_ITERATOR",
    CellCombine = "CELL_COMBINE",
    ObjectId = "OBJECT_ID",
    ObjectNumber = "OBJECT_NUMBER",
    ObjectX = "OBJECT_X",
    ObjectY = "OBJECT_Y",
    ObjectZ = "OBJECT_Z",
    ObjectYaw = "OBJECT_YAW",
    ObjectTilt = "OBJECT_TILT",
    ObjectRoll = "OBJECT_ROLL",
    ObjectModel = "OBJECT_MODEL",
    ObjectDescription = "OBJECT_DESCRIPTION",
    ObjectAction = "OBJECT_ACTION",
    ObjectOldNumber = "OBJECT_OLD_NUMBER",
    ObjectOldX = "OBJECT_OLD_X",
    ObjectOldZ = "OBJECT_OLD_Z",
    ObjectOwner = "OBJECT_OWNER",
    ObjectSession = "OBJECT_SESSION",
    ObjectBuildTimestamp = "OBJECT_BUILD_TIMESTAMP",
    ObjectSync = "OBJECT_SYNC",
    ObjectType = "OBJECT_TYPE",
    ObjectData = "OBJECT_DATA",
    QueryComplete = "QUERY_COMPLETE",
    ChatType = "CHAT_TYPE",
    LicenseName = "LICENSE_NAME",
    LicensePassword = "LICENSE_PASSWORD",
    LicenseUsers = "LICENSE_USERS",
    LicenseRange = "LICENSE_RANGE",
    LicenseEmail = "LICENSE_EMAIL",
    LicenseComment = "LICENSE_COMMENT",
    LicenseCreationTime = "LICENSE_CREATION_TIME",
    LicenseExpirationTime = "LICENSE_EXPIRATION_TIME",
    LicenseLastStart = "LICENSE_LAST_START",
    LicenseLastAddress = "LICENSE_LAST_ADDRESS",
    LicenseHidden = "LICENSE_HIDDEN",
    LicenseAllowTourists = "LICENSE_ALLOW_TOURISTS",
    LicenseVoip = "LICENSE_VOIP",
    LicensePlugins = "LICENSE_PLUGINS",
    WorldlistName = "WORLDLIST_NAME",
    WorldlistStatus = "WORLDLIST_STATUS",
    WorldlistUsers = "WORLDLIST_USERS",
    WorldlistRating = "WORLDLIST_RATING",
    WorldlistMore = "WORLDLIST_MORE",
    EjectSession = "EJECT_SESSION",
    EjectDuration = "EJECT_DURATION",
    EjectionType = "EJECTION_TYPE",
    EjectionAddress = "EJECTION_ADDRESS",
    EjectionExpirationTime = "EJECTION_EXPIRATION_TIME",
    EjectionCreationTime = "EJECTION_CREATION_TIME",
    EjectionComment = "EJECTION_COMMENT",
    DisconnectReason = "DISCONNECT_REASON",
    FileRecipient = "FILE_RECIPIENT",
    FileSender = "FILE_SENDER",
    FileSenderName = "FILE_SENDER_NAME",
    FileSession = "FILE_SESSION",
    FileAddress = "FILE_ADDRESS",
    FilePort = "FILE_PORT",
    ClickedSession = "CLICKED_SESSION",
    ClickedName = "CLICKED_NAME",
    UrlName = "URL_NAME",
    UrlPost = "URL_POST",
    UrlTarget = "URL_TARGET",
    UrlTarget3d = "URL_TARGET_3D",
    TeleportWorld = "TELEPORT_WORLD",
    TeleportX = "TELEPORT_X",
    TeleportY = "TELEPORT_Y",
    TeleportZ = "TELEPORT_Z",
    TeleportYaw = "TELEPORT_YAW",
    TeleportWarp = "TELEPORT_WARP",
    ServerBuild = "SERVER_BUILD",
    ServerName = "SERVER_NAME",
    ServerPassword = "SERVER_PASSWORD",
    ServerRegistry = "SERVER_REGISTRY",
    ServerCaretakers = "SERVER_CARETAKERS",
    ServerId = "SERVER_ID",
    ServerInstance = "SERVER_INSTANCE",
    ServerEnabled = "SERVER_ENABLED",
    ServerState = "SERVER_STATE",
    ServerUsers = "SERVER_USERS",
    ServerMaxUsers = "SERVER_MAX_USERS",
    ServerObjects = "SERVER_OBJECTS",
    ServerSize = "SERVER_SIZE",
    ServerExpiration = "SERVER_EXPIRATION",
    ServerStartRc = "SERVER_START_RC",
    ServerMore = "SERVER_MORE",
    ServerTerrainNodes = "SERVER_TERRAIN_NODES",
    TerrainX = "TERRAIN_X",
    TerrainZ = "TERRAIN_Z",
    TerrainPageX = "TERRAIN_PAGE_X",
    TerrainPageZ = "TERRAIN_PAGE_Z",
    TerrainNodeX = "TERRAIN_NODE_X",
    TerrainNodeZ = "TERRAIN_NODE_Z",
    TerrainNodeSize = "TERRAIN_NODE_SIZE",
    TerrainNodeTextureCount = "TERRAIN_NODE_TEXTURE_COUNT",
    TerrainNodeHeightCount = "TERRAIN_NODE_HEIGHT_COUNT",
    TerrainNodeTextures = "TERRAIN_NODE_TEXTURES",
    TerrainNodeHeights = "TERRAIN_NODE_HEIGHTS",
    TerrainSequence = "TERRAIN_SEQUENCE",
    TerrainComplete = "TERRAIN_COMPLETE",
    TerrainVersionNeeded = "TERRAIN_VERSION_NEEDED",
    EnterGlobal = "ENTER_GLOBAL",
    ConsoleRed = "CONSOLE_RED",
    ConsoleGreen = "CONSOLE_GREEN",
    ConsoleBlue = "CONSOLE_BLUE",
    ConsoleBold = "CONSOLE_BOLD",
    ConsoleItalics = "CONSOLE_ITALICS",
    ConsoleMessage = "CONSOLE_MESSAGE",
    BotgramTo = "BOTGRAM_TO",
    BotgramFrom = "BOTGRAM_FROM",
    BotgramFromName = "BOTGRAM_FROM_NAME",
    BotgramType = "BOTGRAM_TYPE",
    BotgramText = "BOTGRAM_TEXT",
    ToolbarId = "TOOLBAR_ID",
    ToolbarSession = "TOOLBAR_SESSION",
    UserlistMore = "USERLIST_MORE",
    UserlistName = "USERLIST_NAME",
    UserlistWorld = "USERLIST_WORLD",
    UserlistEmail = "USERLIST_EMAIL",
    UserlistCitizen = "USERLIST_CITIZEN",
    UserlistPrivilege = "USERLIST_PRIVILEGE",
    UserlistState = "USERLIST_STATE",
    UserlistAddress = "USERLIST_ADDRESS",
    UserlistId = "USERLIST_ID",
    SoundName = "SOUND_NAME",
    CameraLocationType = "CAMERA_LOCATION_TYPE",
    CameraLocationObject = "CAMERA_LOCATION_OBJECT",
    CameraLocationSession = "CAMERA_LOCATION_SESSION",
    CameraTargetType = "CAMERA_TARGET_TYPE",
    CameraTargetObject = "CAMERA_TARGET_OBJECT",
    CameraTargetSession = "CAMERA_TARGET_SESSION",
    PluginString = "PLUGIN_STRING",
    BotmenuToSession = "BOTMENU_TO_SESSION",
    BotmenuFromName = "BOTMENU_FROM_NAME",
    BotmenuFromSession = "BOTMENU_FROM_SESSION",
    BotmenuQuestion = "BOTMENU_QUESTION",
    BotmenuAnswer = "BOTMENU_ANSWER",
    ContactNumber = "CONTACT_NUMBER",
    ContactStatus = "CONTACT_STATUS",
    ContactName = "CONTACT_NAME",
    ContactWorld = "CONTACT_WORLD",
    ContactMore = "CONTACT_MORE",
    ContactOptions = "CONTACT_OPTIONS",
    TelegramTo = "TELEGRAM_TO",
    TelegramFrom = "TELEGRAM_FROM",
    TelegramText = "TELEGRAM_TEXT",
    TelegramSent = "TELEGRAM_SENT",
    TelegramMore = "TELEGRAM_MORE",
    JoinName = "JOIN_NAME",
    JoinCitizen = "JOIN_CITIZEN",
    JoinWorld = "JOIN_WORLD",
    JoinX = "JOIN_X",
    JoinY = "JOIN_Y",
    JoinZ = "JOIN_Z",
    JoinYaw = "JOIN_YAW",
    RegisterCcName = "REGISTER_CC_NAME",
    RegisterCcNumber = "REGISTER_CC_NUMBER",
    RegisterCcMonth = "REGISTER_CC_MONTH",
    RegisterCcYear = "REGISTER_CC_YEAR",
    RegisterAddress = "REGISTER_ADDRESS",
    RegisterCity = "REGISTER_CITY",
    RegisterState = "REGISTER_STATE",
    RegisterZip = "REGISTER_ZIP",
    RegisterPhoneNumber = "REGISTER_PHONE_NUMBER",
    RegisterBusinessName = "REGISTER_BUSINESS_NAME",
    RegisterVendor = "REGISTER_VENDOR",
    RegisterResult = "REGISTER_RESULT",
    RegisterMethod = "REGISTER_METHOD",
    VoipData = "VOIP_DATA",
    UniverseCavPath = "UNIVERSE_CAV_PATH",
    CitizenPavEnabled = "CITIZEN_PAV_ENABLED",
    CavCitizen = "CAV_CITIZEN",
    CavDefinition = "CAV_DEFINITION",
    EntityType = "ENTITY_TYPE",
    EntityId = "ENTITY_ID",
    EntityState = "ENTITY_STATE",
    EntityFlags = "ENTITY_FLAGS",
    EntityX = "ENTITY_X",
    EntityY = "ENTITY_Y",
    EntityZ = "ENTITY_Z",
    EntityYaw = "ENTITY_YAW",
    EntityPitch = "ENTITY_PITCH",
    EntityRoll = "ENTITY_ROLL",
    EntityOwnerSession = "ENTITY_OWNER_SESSION",
    EntityOwnerCitizen = "ENTITY_OWNER_CITIZEN",
    AvatarDistance = "AVATAR_DISTANCE",
    AvatarAngle = "AVATAR_ANGLE",
    AvatarYDelta = "AVATAR_Y_DELTA",
    AvatarYawDelta = "AVATAR_YAW_DELTA",
    AvatarPitchDelta = "AVATAR_PITCH_DELTA",
    AvatarWorldInstance = "AVATAR_WORLD_INSTANCE",
    AttribSenderSession = "ATTRIB_SENDER_SESSION",
    EntityModelNum = "ENTITY_MODEL_NUM",
    WorldV4ObjectsRight = "WORLD_V4_OBJECTS_RIGHT",
    CitizenLastAddress = "CITIZEN_LAST_ADDRESS",
    HudElementType = "HUD_ELEMENT_TYPE",
    HudElementId = "HUD_ELEMENT_ID",
    HudElementSession = "HUD_ELEMENT_SESSION",
    HudElementOrigin = "HUD_ELEMENT_ORIGIN",
    HudElementX = "HUD_ELEMENT_X",
    HudElementY = "HUD_ELEMENT_Y",
    HudElementZ = "HUD_ELEMENT_Z",
    HudElementFlags = "HUD_ELEMENT_FLAGS",
    HudElementText = "HUD_ELEMENT_TEXT",
    HudElementColor = "HUD_ELEMENT_COLOR",
    HudElementOpacity = "HUD_ELEMENT_OPACITY",
    HudElementSizeX = "HUD_ELEMENT_SIZE_X",
    HudElementSizeY = "HUD_ELEMENT_SIZE_Y",
    HudElementSizeZ = "HUD_ELEMENT_SIZE_Z",
    HudElementClickX = "HUD_ELEMENT_CLICK_X",
    HudElementClickY = "HUD_ELEMENT_CLICK_Y",
    HudElementClickZ = "HUD_ELEMENT_CLICK_Z",
    HudElementTextureOffsetX = "HUD_ELEMENT_TEXTURE_OFFSET_X",
    HudElementTextureOffsetY = "HUD_ELEMENT_TEXTURE_OFFSET_Y",
    CitizenPrivacy = "CITIZEN_PRIVACY",
    CitizenTrial = "CITIZEN_TRIAL",
    UniverseCavPath2 = "UNIVERSE_CAV_PATH2",
    WorldDisableShadows = "WORLD_DISABLE_SHADOWS",
    WorldEnableCameraCollision = "WORLD_ENABLE_CAMERA_COLLISION",
    WorldSpecialCommands = "WORLD_SPECIAL_COMMANDS",
    UniverseObjectRefresh = "UNIVERSE_OBJECT_REFRESH",
    UniverseObjectPassword = "UNIVERSE_OBJECT_PASSWORD",
    CavSession = "CAV_SESSION",
    CitizenCavEnabled = "CITIZEN_CAV_ENABLED",
    WorldCavObjectPath = "WORLD_CAV_OBJECT_PATH",
    WorldCavObjectPassword = "WORLD_CAV_OBJECT_PASSWORD",
    WorldCavObjectRefresh = "WORLD_CAV_OBJECT_REFRESH",
    ObjectCallbackReference = "OBJECT_CALLBACK_REFERENCE",
    WorldTerrainRight = "WORLD_TERRAIN_RIGHT",
    UniverseAllowTouristsCav = "UNIVERSE_ALLOW_TOURISTS_CAV",
    UniverseAllowBotsCav = "UNIVERSE_ALLOW_BOTS_CAV",
    WorldVoipConferenceGlobal = "WORLD_VOIP_CONFERENCE_GLOBAL",
    WorldVoipModerateGlobal = "WORLD_VOIP_MODERATE_GLOBAL",
    ObjectSessionTo = "OBJECT_SESSION_TO",
    WorldCameraZoom = "WORLD_CAMERA_ZOOM",
    WorldWaitLimit = "WORLD_WAIT_LIMIT",
    XferDisconnectReason = "XFER_DISCONNECT_REASON",
    XferType = "XFER_TYPE",
    XferFromSession = "XFER_FROM_SESSION",
    XferFromName = "XFER_FROM_NAME",
    XferToSession = "XFER_TO_SESSION",
    XferToName = "XFER_TO_NAME",
    XferToWorldName = "XFER_TO_WORLD_NAME",
    XferToZoneName = "XFER_TO_ZONE_NAME",
    XferToTagName = "XFER_TO_TAG_NAME",
    XferDataId = "XFER_DATA_ID",
    XferDataFileName = "XFER_DATA_FILE_NAME",
    XferDataLenTotal = "XFER_DATA_LEN_TOTAL",
    XferDataLenOffset = "XFER_DATA_LEN_OFFSET",
    XferData = "XFER_DATA",
    XferData2 = "XFER_DATA2",
    XferData3 = "XFER_DATA3",
    XferDataMore = "XFER_DATA_MORE",
    XferRc = "XFER_RC",
    XferShowName = "XFER_SHOW_NAME",
    XferOptions = "XFER_OPTIONS",
    XferExpiration = "XFER_EXPIRATION",
    LicenseXferShowRights = "LICENSE_XFER_SHOW_RIGHTS",
    XferShowCapability = "XFER_SHOW_CAPABILITY",
    XferShowSequence = "XFER_SHOW_SEQUENCE",
    LaserBeamSourceType = "LASER_BEAM_SOURCE_TYPE",
    LaserBeamSourceId = "LASER_BEAM_SOURCE_ID",
    LaserBeamSourceX = "LASER_BEAM_SOURCE_X",
    LaserBeamSourceY = "LASER_BEAM_SOURCE_Y",
    LaserBeamSourceZ = "LASER_BEAM_SOURCE_Z",
    LaserBeamTargetType = "LASER_BEAM_TARGET_TYPE",
    LaserBeamTargetId = "LASER_BEAM_TARGET_ID",
    LaserBeamTargetX = "LASER_BEAM_TARGET_X",
    LaserBeamTargetY = "LASER_BEAM_TARGET_Y",
    LaserBeamTargetZ = "LASER_BEAM_TARGET_Z",
    LaserBeamStyle = "LASER_BEAM_STYLE",
    LaserBeamColor = "LASER_BEAM_COLOR",
    LaserBeamDefinition = "LASER_BEAM_DEFINITION",
    WorldVoipcastHost = "WORLD_VOIPCAST_HOST",
    WorldVoipcastPort = "WORLD_VOIPCAST_PORT",
    MyZone = "MY_ZONE",
    AvatarZone = "AVATAR_ZONE",
    UniversePerCitizenCav = "UNIVERSE_PER_CITIZEN_CAV",
    XferOwner = "XFER_OWNER",
    WorldEnableWireframe = "WORLD_ENABLE_WIREFRAME",
    ShopitemId = "SHOPITEM_ID",
    ShopitemCreation = "SHOPITEM_CREATION",
    ShopitemExpiration = "SHOPITEM_EXPIRATION",
    ShopitemPrice = "SHOPITEM_PRICE",
    ShopitemType = "SHOPITEM_TYPE",
    ShopitemCategory = "SHOPITEM_CATEGORY",
    ShopitemDescription = "SHOPITEM_DESCRIPTION",
    ShopitemObject = "SHOPITEM_OBJECT",
    ShopitemDefinition = "SHOPITEM_DEFINITION",
    ShoptransId = "SHOPTRANS_ID",
    ShoptransCitizen = "SHOPTRANS_CITIZEN",
    ShoptransItemid = "SHOPTRANS_ITEMID",
    ShoptransAmount = "SHOPTRANS_AMOUNT",
    ShoptransDate = "SHOPTRANS_DATE",
    ShoptransSeller = "SHOPTRANS_SELLER",
    ShoptransComment = "SHOPTRANS_COMMENT",
    ShoptransTotal = "SHOPTRANS_TOTAL",
    ShoptransIterator = "SHOPTRANS_ITERATOR",
    ShoptransMore = "SHOPTRANS_MORE",
    ShopitemChanged = "SHOPITEM_CHANGED",
    LicenseShop = "LICENSE_SHOP",
    CitizenPwdExp = "CITIZEN_PWD_EXP",
    UniverseExpirationDate = "UNIVERSE_EXPIRATION_DATE",
    UniverseImmigration = "UNIVERSE_IMMIGRATION",
    CitizenSecPassword = "CITIZEN_SEC_PASSWORD",
    ChatChannel = "CHAT_CHANNEL",
    ChatCitizen = "CHAT_CITIZEN",
    WorldChatChannel1Name = "WORLD_CHAT_CHANNEL1_NAME",
    WorldChatChannel2Name = "WORLD_CHAT_CHANNEL2_NAME",
    WorldChatChannel3Name = "WORLD_CHAT_CHANNEL3_NAME",
    WorldChatChannel4Name = "WORLD_CHAT_CHANNEL4_NAME",
    WorldChatChannel5Name = "WORLD_CHAT_CHANNEL5_NAME",
    WorldChatChannel1Color = "WORLD_CHAT_CHANNEL1_COLOR",
    WorldChatChannel2Color = "WORLD_CHAT_CHANNEL2_COLOR",
    WorldChatChannel3Color = "WORLD_CHAT_CHANNEL3_COLOR",
    WorldChatChannel4Color = "WORLD_CHAT_CHANNEL4_COLOR",
    WorldChatChannel5Color = "WORLD_CHAT_CHANNEL5_COLOR",
    WorldlistBots = "WORLDLIST_BOTS",
    LicenseOwner = "LICENSE_OWNER",
    WorldOwnerCapability = "WORLD_OWNER_CAPABILITY",
    WorldRightsOffered = "WORLD_RIGHTS_OFFERED",
    WorldRightsEnterCosts = "WORLD_RIGHTS_ENTER_COSTS",
    WorldRightsBuildCosts = "WORLD_RIGHTS_BUILD_COSTS",
    WorldRightsV4ObjsCosts = "WORLD_RIGHTS_V4_OBJS_COSTS",
    WorldRightsSpecialObjsCosts = "WORLD_RIGHTS_SPECIAL_OBJS_COSTS",
    WorldRightsSpecialCmdsCosts = "WORLD_RIGHTS_SPECIAL_CMDS_COSTS",
    PurchaseKind = "PURCHASE_KIND",
    PurchaseType = "PURCHASE_TYPE",
    PurchaseCosts = "PURCHASE_COSTS",
    CitrightTypes = "CITRIGHT_TYPES",
    DlgOriginatorSession = "DLG_ORIGINATOR_SESSION",
    DlgRecipientSession = "DLG_RECIPIENT_SESSION",
    DlgReference = "DLG_REFERENCE",
    DlgOption = "DLG_OPTION",
    DlgTitle = "DLG_TITLE",
    DlgText = "DLG_TEXT",
    DlgAnswerOriginatorSession = "DLG_ANSWER_ORIGINATOR_SESSION",
    DlgAnswerRecipientSession = "DLG_ANSWER_RECIPIENT_SESSION",
    DlgAnswerReference = "DLG_ANSWER_REFERENCE",
    DlgAnswerOption = "DLG_ANSWER_OPTION",
    DlgAnswerText = "DLG_ANSWER_TEXT",
    WorldWaterUseShaders = "WORLD_WATER_USE_SHADERS",
    WorldWaterSurfaceColor = "WORLD_WATER_SURFACE_COLOR",
    WorldWaterTintColor = "WORLD_WATER_TINT_COLOR",
    WorldWaterWaveletSpeed = "WORLD_WATER_WAVELET_SPEED",
    WorldWaterWaveletDirectionX = "WORLD_WATER_WAVELET_DIRECTION_X",
    WorldWaterWaveletDirectionZ = "WORLD_WATER_WAVELET_DIRECTION_Z",
    WorldWaterWaveletHeight = "WORLD_WATER_WAVELET_HEIGHT",
    WorldWaterWave1Speed = "WORLD_WATER_WAVE1_SPEED",
    WorldWaterWave1DirectionX = "WORLD_WATER_WAVE1_DIRECTION_X",
    WorldWaterWave1DirectionZ = "WORLD_WATER_WAVE1_DIRECTION_Z",
    WorldWaterWave1Height = "WORLD_WATER_WAVE1_HEIGHT",
    WorldWaterWave2Speed = "WORLD_WATER_WAVE2_SPEED",
    WorldWaterWave2DirectionX = "WORLD_WATER_WAVE2_DIRECTION_X",
    WorldWaterWave2DirectionZ = "WORLD_WATER_WAVE2_DIRECTION_Z",
    WorldWaterWave2Height = "WORLD_WATER_WAVE2_HEIGHT",
    WorldWaterWave3Speed = "WORLD_WATER_WAVE3_SPEED",
    WorldWaterWave3DirectionX = "WORLD_WATER_WAVE3_DIRECTION_X",
    WorldWaterWave3DirectionZ = "WORLD_WATER_WAVE3_DIRECTION_Z",
    WorldWaterWave3Height = "WORLD_WATER_WAVE3_HEIGHT",
    WorldWaterWave4Speed = "WORLD_WATER_WAVE4_SPEED",
    WorldWaterWave4DirectionX = "WORLD_WATER_WAVE4_DIRECTION_X",
    WorldWaterWave4DirectionZ = "WORLD_WATER_WAVE4_DIRECTION_Z",
    WorldWaterWave4Height = "WORLD_WATER_WAVE4_HEIGHT",
    WorldAutoCubemap = "WORLD_AUTO_CUBEMAP",
    WorldAutoCubemapQuality = "WORLD_AUTO_CUBEMAP_QUALITY",
    WorldAutoCubemapInterval = "WORLD_AUTO_CUBEMAP_INTERVAL",
    WorldWaterReflectionHighlight = "WORLD_WATER_REFLECTION_HIGHLIGHT",
    WorldWaterShallowDepth = "WORLD_WATER_SHALLOW_DEPTH",
    WorldWaterShallowIntensity = "WORLD_WATER_SHALLOW_INTENSITY",
    WorldWaterShallowDistortion = "WORLD_WATER_SHALLOW_DISTORTION",
    WorldWaterShallowScale = "WORLD_WATER_SHALLOW_SCALE",
    WorldWaterGridScale = "WORLD_WATER_GRID_SCALE",
    UniverseBuyCreditsUrl = "UNIVERSE_BUY_CREDITS_URL",
    CitizenOnlineState = "CITIZEN_ONLINE_STATE",
    CitizenTitleNumber = "CITIZEN_TITLE_NUMBER",
    CitizenTitleStars = "CITIZEN_TITLE_STARS",
    UniverseImmigrateUrl = "UNIVERSE_IMMIGRATE_URL",
    CitizenSession = "CITIZEN_SESSION",
    ChatTargetTypes = "CHAT_TARGET_TYPES",
    ChatTargetSession = "CHAT_TARGET_SESSION",
    CitizenHash = "CITIZEN_HASH",
    XferData4 = "XFER_DATA4",
    XferData5 = "XFER_DATA5",
    LicenseLastPort = "LICENSE_LAST_PORT",
    LicenseLastStop = "LICENSE_LAST_STOP",
    ContactLastSeen = "CONTACT_LAST_SEEN",
    WorldDisableBalloons = "WORLD_DISABLE_BALLOONS",
    WorldMaximumVisibility = "WORLD_MAXIMUM_VISIBILITY",
    TelegramJournalStart = "TELEGRAM_JOURNAL_START",
    TelegramJournalEnd = "TELEGRAM_JOURNAL_END",
    TelegramStatus = "TELEGRAM_STATUS",
    MaxAttribute = "MAX_ATTRIBUTE",
}

impl Attribute {
    /// Raw code passed across the C ABI.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Vendor name without the `AW_` prefix, e.g. `WORLD_SIZE`.
    pub fn name(self) -> &'static str {
        NAMES[self as usize]
    }

    pub fn from_code(code: i32) -> Option<Self> {
        usize::try_from(code).ok().and_then(|i| ALL.get(i)).copied()
    }

    /// Look up an attribute by vendor name. Case-insensitive, the `AW_`
    /// prefix is optional.
    pub fn from_name(name: &str) -> Option<Self> {
        let upper = name.trim().to_ascii_uppercase();
        let bare = upper.strip_prefix("AW_").unwrap_or(&upper);
        NAMES.iter().position(|n| *n == bare).map(|i| ALL[i])
    }

    pub fn all() -> impl Iterator<Item = Attribute> {
        ALL.iter().copied()
    }

    /// Resolve a short world attribute name such as `"size"` or
    /// `"allow_flying"` to its `WORLD_*` attribute.
    pub fn world(name: &str) -> Result<Self> {
        let upper = name.trim().to_ascii_uppercase();
        let bare = upper.strip_prefix("AW_").unwrap_or(&upper);
        let full = if bare.starts_with("WORLD_") {
            bare.to_string()
        } else {
            format!("WORLD_{}", bare)
        };

        Attribute::from_name(&full)
            .filter(|attr| attr.is_world())
            .ok_or_else(|| Error::UnknownAttribute(name.to_string()))
    }

    pub fn is_world(self) -> bool {
        self.name().starts_with("WORLD_")
    }

    /// World rights are the `WORLD_*_RIGHT` attributes, each holding a
    /// citizen list that `aw_has_world_right` evaluates.
    pub fn is_world_right(self) -> bool {
        self.is_world() && self.name().ends_with("_RIGHT")
    }

    pub fn world_rights() -> impl Iterator<Item = Attribute> {
        Attribute::all().filter(|attr| attr.is_world_right())
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AW_{}", self.name())
    }
}

/// Which accessor family an attribute is read or written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ValueKind {
    Int,
    Bool,
    Float,
    String,
    Data,
}

/// A typed attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Int(i32),
    Bool(bool),
    Float(f32),
    String(String),
    Data(Vec<u8>),
}

impl AttributeValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            AttributeValue::Int(_) => ValueKind::Int,
            AttributeValue::Bool(_) => ValueKind::Bool,
            AttributeValue::Float(_) => ValueKind::Float,
            AttributeValue::String(_) => ValueKind::String,
            AttributeValue::Data(_) => ValueKind::Data,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            AttributeValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            AttributeValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            AttributeValue::Data(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Int(v) => write!(f, "{}", v),
            AttributeValue::Bool(v) => write!(f, "{}", v),
            AttributeValue::Float(v) => write!(f, "{}", v),
            AttributeValue::String(v) => write!(f, "{}", v),
            AttributeValue::Data(v) => write!(f, "<{} bytes>", v.len()),
        }
    }
}

impl From<i32> for AttributeValue {
    fn from(v: i32) -> Self {
        AttributeValue::Int(v)
    }
}

impl From<bool> for AttributeValue {
    fn from(v: bool) -> Self {
        AttributeValue::Bool(v)
    }
}

impl From<f32> for AttributeValue {
    fn from(v: f32) -> Self {
        AttributeValue::Float(v)
    }
}

impl From<&str> for AttributeValue {
    fn from(v: &str) -> Self {
        AttributeValue::String(v.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(v: String) -> Self {
        AttributeValue::String(v)
    }
}

impl From<Vec<u8>> for AttributeValue {
    fn from(v: Vec<u8>) -> Self {
        AttributeValue::Data(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_consecutive() {
        for (i, attr) in Attribute::all().enumerate() {
            assert_eq!(attr.code(), i as i32);
            assert_eq!(Attribute::from_code(i as i32), Some(attr));
        }
        assert_eq!(Attribute::LoginName.code(), 0);
        assert_eq!(Attribute::MaxAttribute.code(), 619);
    }

    #[test]
    fn test_known_codes() {
        assert_eq!(Attribute::LoginOwner.code(), 2);
        assert_eq!(Attribute::WorldName.code(), 44);
        assert_eq!(Attribute::WorldSize.code(), 95);
        assert_eq!(Attribute::MyX.code(), 198);
        assert_eq!(Attribute::CellIterator.code(), 228);
    }

    #[test]
    fn test_from_code_out_of_range() {
        assert_eq!(Attribute::from_code(-1), None);
        assert_eq!(Attribute::from_code(620), None);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Attribute::from_name("WORLD_SIZE"), Some(Attribute::WorldSize));
        assert_eq!(Attribute::from_name("aw_world_size"), Some(Attribute::WorldSize));
        assert_eq!(
            Attribute::from_name("WORLD_ALLOW_3_AXIS_ROTATION"),
            Some(Attribute::WorldAllow3AxisRotation)
        );
        assert_eq!(Attribute::from_name("NOT_A_THING"), None);
    }

    #[test]
    fn test_world_lookup() {
        assert_eq!(Attribute::world("size").unwrap(), Attribute::WorldSize);
        assert_eq!(Attribute::world("Allow_Flying").unwrap(), Attribute::WorldAllowFlying);
        assert_eq!(Attribute::world("AW_WORLD_TITLE").unwrap(), Attribute::WorldTitle);
        assert!(matches!(
            Attribute::world("no_such_attribute"),
            Err(Error::UnknownAttribute(_))
        ));
        // LOGIN_NAME exists but is not a world attribute
        assert!(Attribute::world("login_name").is_err());
    }

    #[test]
    fn test_world_rights() {
        let rights: Vec<_> = Attribute::world_rights().collect();
        assert_eq!(rights.len(), 12);
        assert!(rights.contains(&Attribute::WorldBuildRight));
        assert!(rights.contains(&Attribute::WorldTerrainRight));
        assert!(!rights.contains(&Attribute::WorldSize));
    }

    #[test]
    fn test_display() {
        assert_eq!(Attribute::WorldSize.to_string(), "AW_WORLD_SIZE");
        assert_eq!(ValueKind::String.to_string(), "string");
        assert_eq!(AttributeValue::Data(vec![1, 2, 3]).to_string(), "<3 bytes>");
    }
}
