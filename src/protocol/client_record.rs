// src/protocol/client_record.rs
use crate::models::server::{parse_int, Player, Spectator};
use crate::protocol::text::{to_char_codes, to_plain_text};
use std::collections::HashSet;

const SPECTATOR_PREFIX: &[u8] = b"\\s\\";
const COLUMN_COUNT: usize = 9;

const INDEX_FRAGS: usize = 1;
const INDEX_TIME: usize = 2;
const INDEX_PING: usize = 3;
const INDEX_NAME: usize = 4;
const INDEX_SKIN: usize = 5;
const INDEX_COLOR_TOP: usize = 6;
const INDEX_COLOR_BOTTOM: usize = 7;
const INDEX_TEAM: usize = 8;

pub const DEFAULT_BOT_NAMES: [&str; 2] = ["[ServeMe]", "twitch.tv/vikpe"];
pub const DEFAULT_BOT_PING: i32 = 10;

/// Decides whether a client row belongs to a bot.
pub trait BotDetector: Send + Sync {
    fn is_bot(&self, name: &str, ping: i32) -> bool;
}

/// Bot heuristic by exact name or by a sentinel ping value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotPolicy {
    pub names: HashSet<String>,
    pub ping: Option<i32>,
}

impl BotPolicy {
    pub fn new<I, S>(names: I, ping: Option<i32>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            ping,
        }
    }
}

impl Default for BotPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_BOT_NAMES, Some(DEFAULT_BOT_PING))
    }
}

impl BotDetector for BotPolicy {
    fn is_bot(&self, name: &str, ping: i32) -> bool {
        self.names.contains(name) || self.ping == Some(ping)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Client {
    Player(Player),
    Spectator(Spectator),
}

/// Parses one status row. `None` when the row does not have exactly nine
/// columns; numeric columns fall back to zero instead of failing.
pub fn parse_client_record(columns: &[Vec<u8>], bots: &dyn BotDetector) -> Option<Client> {
    if columns.len() != COLUMN_COUNT {
        return None;
    }

    let raw_name = columns[INDEX_NAME].as_slice();
    let (is_spectator, raw_name) = match raw_name.strip_prefix(SPECTATOR_PREFIX) {
        Some(stripped) => (true, stripped),
        None => (false, raw_name),
    };

    let name = to_plain_text(raw_name);
    let name_int = to_char_codes(&name);
    let ping = int_column(&columns[INDEX_PING]);
    let is_bot = bots.is_bot(&name, ping);

    if is_spectator {
        return Some(Client::Spectator(Spectator {
            name,
            name_int,
            is_bot,
        }));
    }

    let team = to_plain_text(&columns[INDEX_TEAM]);
    let team_int = to_char_codes(&team);

    Some(Client::Player(Player {
        name,
        name_int,
        team,
        team_int,
        skin: String::from_utf8_lossy(&columns[INDEX_SKIN]).into_owned(),
        colors: [
            int_column(&columns[INDEX_COLOR_TOP]),
            int_column(&columns[INDEX_COLOR_BOTTOM]),
        ],
        frags: int_column(&columns[INDEX_FRAGS]),
        ping,
        time: int_column(&columns[INDEX_TIME]),
        is_bot,
    }))
}

fn int_column(column: &[u8]) -> i32 {
    std::str::from_utf8(column).map(parse_int).unwrap_or(0)
}
