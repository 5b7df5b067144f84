//! Domain models and value objects

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use time::{Date, Month};

/// One of the lotteries whose results are republished
///
/// The variant order is the canonical ordering used for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LotteryId {
    MegaSena,
    Lotofacil,
    Quina,
    Lotomania,
    Timemania,
    DuplaSena,
    DiaDeSorte,
    SuperSete,
    MaisMilionaria,
}

impl LotteryId {
    /// Every lottery, in canonical order
    pub const ALL: [LotteryId; 9] = [
        LotteryId::MegaSena,
        LotteryId::Lotofacil,
        LotteryId::Quina,
        LotteryId::Lotomania,
        LotteryId::Timemania,
        LotteryId::DuplaSena,
        LotteryId::DiaDeSorte,
        LotteryId::SuperSete,
        LotteryId::MaisMilionaria,
    ];

    /// Identifier used by the upstream API and in page URLs
    pub fn slug(self) -> &'static str {
        match self {
            LotteryId::MegaSena => "megasena",
            LotteryId::Lotofacil => "lotofacil",
            LotteryId::Quina => "quina",
            LotteryId::Lotomania => "lotomania",
            LotteryId::Timemania => "timemania",
            LotteryId::DuplaSena => "duplasena",
            LotteryId::DiaDeSorte => "diadesorte",
            LotteryId::SuperSete => "supersete",
            LotteryId::MaisMilionaria => "maismilionaria",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            LotteryId::MegaSena => "Mega-Sena",
            LotteryId::Lotofacil => "Lotofácil",
            LotteryId::Quina => "Quina",
            LotteryId::Lotomania => "Lotomania",
            LotteryId::Timemania => "Timemania",
            LotteryId::DuplaSena => "Dupla Sena",
            LotteryId::DiaDeSorte => "Dia de Sorte",
            LotteryId::SuperSete => "Super Sete",
            LotteryId::MaisMilionaria => "+Milionária",
        }
    }

    /// How many numbers a completed draw reveals (per draw, for Dupla Sena)
    pub fn expected_numbers(self) -> usize {
        match self {
            LotteryId::MegaSena => 6,
            LotteryId::Lotofacil => 15,
            LotteryId::Quina => 5,
            LotteryId::Lotomania => 20,
            LotteryId::Timemania => 7,
            LotteryId::DuplaSena => 6,
            LotteryId::DiaDeSorte => 7,
            LotteryId::SuperSete => 7,
            LotteryId::MaisMilionaria => 6,
        }
    }

    /// Display width of a drawn number; Super Sete draws single digits per column
    pub fn number_width(self) -> usize {
        match self {
            LotteryId::SuperSete => 1,
            _ => 2,
        }
    }

    pub fn has_second_draw(self) -> bool {
        matches!(self, LotteryId::DuplaSena)
    }

    /// Weekday names (pt-BR) on which the lottery is drawn
    pub fn draw_days(self) -> &'static [&'static str] {
        match self {
            LotteryId::MegaSena | LotteryId::Timemania | LotteryId::DiaDeSorte => {
                &["terça", "quinta", "sábado"]
            }
            LotteryId::Lotofacil | LotteryId::Quina => {
                &["segunda", "terça", "quarta", "quinta", "sexta", "sábado"]
            }
            LotteryId::Lotomania | LotteryId::DuplaSena | LotteryId::SuperSete => {
                &["segunda", "quarta", "sexta"]
            }
            LotteryId::MaisMilionaria => &["quarta", "sábado"],
        }
    }
}

impl fmt::Display for LotteryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown lottery '{0}'")]
pub struct UnknownLottery(pub String);

impl FromStr for LotteryId {
    type Err = UnknownLottery;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .replace('+', "mais")
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        let key = key.replace('á', "a");

        LotteryId::ALL
            .into_iter()
            .find(|id| id.slug() == key)
            .ok_or_else(|| UnknownLottery(s.to_string()))
    }
}

/// Lottery-specific extra draws
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupplementalMarkers {
    /// +Milionária "trevos"
    pub clovers: Vec<String>,
    /// Dia de Sorte "mês da sorte"
    pub lucky_month: Option<String>,
    /// Timemania "time do coração"
    pub team: Option<String>,
}

/// One prize tier; index 0 is the jackpot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrizeTier {
    pub label: String,
    /// None when neither the payload nor the label reveals it
    pub required_hits: Option<u32>,
    pub winner_count: u64,
    pub prize_amount: f64,
}

/// The upcoming contest as announced with a result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NextContestInfo {
    pub number: Option<u32>,
    pub date: String,
    pub estimated_prize: f64,
}

/// Where jackpot winners bought their tickets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinnerLocale {
    pub city: String,
    pub state: String,
    pub winner_count: u64,
}

/// The single normalized representation of one contest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalResult {
    pub lottery: LotteryId,
    pub name: String,
    /// 0 when the payload did not carry a usable contest number
    pub contest_number: u32,
    /// As provided upstream (`dd/mm/yyyy` or ISO), empty when absent
    pub contest_date: String,
    pub location: Option<String>,
    pub drawn_numbers: Vec<String>,
    pub secondary_drawn_numbers: Vec<String>,
    pub supplemental: SupplementalMarkers,
    pub prize_tiers: Vec<PrizeTier>,
    pub accumulated: bool,
    pub next_contest: NextContestInfo,
    pub winner_locales: Vec<WinnerLocale>,
}

impl CanonicalResult {
    /// Jackpot tier, if any tiers are known
    pub fn jackpot(&self) -> Option<&PrizeTier> {
        self.prize_tiers.first()
    }

    /// Whether the record satisfies the completed-draw invariants
    pub fn is_complete(&self) -> bool {
        let expected = self.lottery.expected_numbers();
        self.contest_number > 0
            && self.drawn_numbers.len() == expected
            && (!self.lottery.has_second_draw() || self.secondary_drawn_numbers.len() == expected)
            && !self.prize_tiers.is_empty()
    }

    pub fn contest_date_parsed(&self) -> Option<Date> {
        parse_contest_date(&self.contest_date)
    }
}

/// Parse `dd/mm/yyyy` or `yyyy-mm-dd` (a trailing time part is ignored)
pub fn parse_contest_date(raw: &str) -> Option<Date> {
    let raw = raw.trim();
    let raw = raw.split(['T', ' ']).next().unwrap_or(raw);

    let (day, month, year) = if raw.contains('/') {
        let mut parts = raw.splitn(3, '/');
        let day = parts.next()?.parse::<u8>().ok()?;
        let month = parts.next()?.parse::<u8>().ok()?;
        let year = parts.next()?.parse::<i32>().ok()?;
        (day, month, year)
    } else {
        let mut parts = raw.splitn(3, '-');
        let year = parts.next()?.parse::<i32>().ok()?;
        let month = parts.next()?.parse::<u8>().ok()?;
        let day = parts.next()?.parse::<u8>().ok()?;
        (day, month, year)
    };

    let month = Month::try_from(month).ok()?;
    Date::from_calendar_date(year, month, day).ok()
}

/// Format a date the way the upstream API does (`dd/mm/yyyy`)
pub fn format_contest_date(date: Date) -> String {
    format!(
        "{:02}/{:02}/{:04}",
        date.day(),
        u8::from(date.month()),
        date.year()
    )
}

/// Site-wide settings needed to build canonical links
#[derive(Debug, Clone)]
pub struct SiteInfo {
    /// Base URL without trailing slash, e.g. `https://loterias.example.com`
    pub base_url: String,
}

impl SiteInfo {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn lottery_url(&self, lottery: LotteryId) -> String {
        format!("{}/{}", self.base_url, lottery.slug())
    }

    pub fn contest_url(&self, lottery: LotteryId, contest: u32) -> String {
        format!("{}/{}/{}", self.base_url, lottery.slug(), contest)
    }

    /// Host part of the base URL, as IndexNow expects it
    pub fn host(&self) -> &str {
        let without_scheme = self
            .base_url
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(&self.base_url);
        without_scheme.split('/').next().unwrap_or(without_scheme)
    }
}
