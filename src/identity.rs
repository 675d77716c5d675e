use crate::client::RawBotProfile;

const DEFAULT_NAME: &str = "Bot";
const DEFAULT_USERNAME: &str = "bot";
const DEFAULT_DESCRIPTION: &str = "Imitated bot🤖";

/// Display identity of the bot, with fallbacks for anything the backend omits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotProfile {
    pub name: String,
    pub username: String,
    pub description: String,
    pub avatar: Option<String>,
}

impl Default for BotProfile {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            username: DEFAULT_USERNAME.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            avatar: None,
        }
    }
}

impl BotProfile {
    pub fn from_wire(raw: Option<RawBotProfile>) -> Self {
        let Some(raw) = raw else {
            return Self::default();
        };
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        let defaults = Self::default();

        Self {
            name: non_empty(raw.name).unwrap_or(defaults.name),
            username: non_empty(raw.username)
                .map(|u| u.trim_start_matches('@').to_string())
                .unwrap_or(defaults.username),
            description: non_empty(raw.description).unwrap_or(defaults.description),
            avatar: non_empty(raw.image),
        }
    }

    /// "@handle" as shown under the name.
    pub fn handle(&self) -> String {
        format!("@{}", self.username)
    }
}
