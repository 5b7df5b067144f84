//! Field normalization: raw upstream payloads into [`CanonicalResult`]
//!
//! Providers have shipped several payload shapes (snake_case, camelCase and
//! Portuguese abbreviations). Each logical field is resolved through an ordered
//! table of candidate keys; the first key present in the payload wins.
//! Normalization is total and performs no I/O.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

use crate::model::{
    CanonicalResult, LotteryId, NextContestInfo, PrizeTier, SupplementalMarkers, WinnerLocale,
};
use crate::raw::{
    coerce_array, coerce_bool, coerce_count, coerce_number, coerce_string, coerce_u32,
    first_present,
};

/// Candidate key tables, most specific first
pub mod keys {
    pub const ENVELOPE: &[&str] = &["resultado", "result"];

    pub const NAME: &[&str] = &["nome", "nome_loteria", "nomeLoteria", "name"];
    pub const CONTEST: &[&str] = &[
        "concurso",
        "numero_concurso",
        "numeroConcurso",
        "numero",
        "contest",
    ];
    pub const DATE: &[&str] = &[
        "data",
        "data_concurso",
        "dataApuracao",
        "data_sorteio",
        "date",
    ];
    pub const LOCATION: &[&str] = &[
        "local",
        "local_realizacao",
        "localSorteio",
        "localRealizacao",
        "location",
    ];
    pub const NUMBERS: &[&str] = &["dezenas", "numeros", "numerosSorteados", "listaDezenas"];
    pub const SECOND_NUMBERS: &[&str] = &[
        "dezenas_2",
        "numeros_2",
        "dezenasSegundoSorteio",
        "listaDezenasSegundoSorteio",
    ];
    pub const CLOVERS: &[&str] = &["trevos", "trevosSorteados", "listaTrevos"];
    pub const LUCKY_MONTH: &[&str] = &["mes_sorte", "mesSorte", "mes_da_sorte"];
    pub const TEAM: &[&str] = &["time_coracao", "timeCoracao", "timeDoCoracao"];
    /// Shared by Timemania (team) and Dia de Sorte (month) in the official feed
    pub const TEAM_OR_MONTH: &[&str] = &["nomeTimeCoracaoMesSorte"];

    pub const PRIZES: &[&str] = &["premiacao", "premiacoes", "listaRateioPremio", "premios"];
    pub const SECOND_PRIZES: &[&str] = &[
        "premiacao_2",
        "premiacoes_2",
        "premiacaoSegundoSorteio",
        "listaRateioPremioSegundoSorteio",
    ];
    pub const TIER_LABEL: &[&str] = &["descricao", "descricaoFaixa", "nome", "faixa"];
    pub const TIER_HITS: &[&str] = &["acertos", "numero_acertos", "numeroAcertos", "hits"];
    pub const TIER_WINNERS: &[&str] = &[
        "ganhadores",
        "numeroDeGanhadores",
        "vencedores",
        "quantidade_ganhadores",
    ];
    pub const TIER_PRIZE: &[&str] = &["valor_premio", "valorPremio", "premio", "valor"];

    pub const ACCUMULATED: &[&str] = &["acumulou", "acumulado", "accumulated"];

    pub const NEXT_NUMBER: &[&str] = &[
        "proximo_concurso",
        "proximoConcurso",
        "numeroConcursoProximo",
    ];
    pub const NEXT_DATE: &[&str] = &["data_proximo_concurso", "dataProximoConcurso"];
    pub const NEXT_ESTIMATE: &[&str] = &[
        "valor_estimado_proximo_concurso",
        "valorEstimadoProximoConcurso",
        "estimativa_premio",
        "valorEstimado",
    ];
    /// Keys inside a nested next-contest object
    pub const NESTED_NEXT_NUMBER: &[&str] = &["numero", "concurso"];
    pub const NESTED_NEXT_DATE: &[&str] = &["data"];
    pub const NESTED_NEXT_ESTIMATE: &[&str] = &["valor_estimado", "valorEstimado", "estimativa"];

    pub const LOCALES: &[&str] = &[
        "local_ganhadores",
        "listaMunicipioUFGanhadores",
        "ganhadores_localidades",
    ];
    pub const LOCALE_CITY: &[&str] = &["municipio", "cidade", "nomeMunicipio", "city"];
    pub const LOCALE_STATE: &[&str] = &["uf", "estado", "siglaUf", "state"];
    pub const LOCALE_WINNERS: &[&str] = &["ganhadores", "quantidade", "numeroDeGanhadores"];
}

static HITS_IN_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)\s*(?:acertos?|pontos?|hits?)").expect("static regex is valid")
});

/// Normalize one raw payload into a canonical result.
///
/// `lottery` supplies the display-name fallback and lottery-specific rules
/// (number width, which shared keys apply).
pub fn normalize(raw: &Value, lottery: LotteryId) -> CanonicalResult {
    let root = first_present(raw, keys::ENVELOPE)
        .filter(|inner| inner.is_object())
        .unwrap_or(raw);
    let field = |candidates: &[&str]| first_present(root, candidates);

    let width = lottery.number_width();
    let drawn_numbers = drawn_list(field(keys::NUMBERS), width);
    let secondary_drawn_numbers = drawn_list(field(keys::SECOND_NUMBERS), width);

    let prize_tiers: Vec<PrizeTier> = coerce_array(field(keys::PRIZES))
        .iter()
        .chain(coerce_array(field(keys::SECOND_PRIZES)))
        .map(prize_tier)
        .collect();

    let accumulated = match prize_tiers.first() {
        Some(jackpot) => jackpot.winner_count == 0,
        None => coerce_bool(field(keys::ACCUMULATED)),
    };

    CanonicalResult {
        lottery,
        name: coerce_string(field(keys::NAME))
            .unwrap_or_else(|| lottery.display_name().to_string()),
        contest_number: coerce_u32(field(keys::CONTEST)).unwrap_or(0),
        contest_date: coerce_string(field(keys::DATE)).unwrap_or_default(),
        location: coerce_string(field(keys::LOCATION)),
        drawn_numbers,
        secondary_drawn_numbers,
        supplemental: supplemental(root, lottery),
        prize_tiers,
        accumulated,
        next_contest: next_contest(root),
        winner_locales: coerce_array(field(keys::LOCALES))
            .iter()
            .map(winner_locale)
            .collect(),
    }
}

/// Render one drawn number as a fixed-width string.
///
/// Non-negative integral values (including `5.0`) are zero-padded; other
/// numbers and text are kept as is, trimmed. Values that
/// are neither numbers nor text yield None.
pub fn format_drawn_number(value: &Value, width: usize) -> Option<String> {
    match value {
        Value::Number(n) => match coerce_u32(Some(value)) {
            Some(int) => Some(format!("{:0width$}", int)),
            None => Some(n.to_string()),
        },
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                None
            } else if s.bytes().all(|b| b.is_ascii_digit()) {
                Some(format!("{:0>width$}", s))
            } else {
                Some(s.to_string())
            }
        }
        _ => None,
    }
}

fn drawn_list(value: Option<&Value>, width: usize) -> Vec<String> {
    coerce_array(value)
        .iter()
        .filter_map(|item| format_drawn_number(item, width))
        .collect()
}

fn prize_tier(raw: &Value) -> PrizeTier {
    let label = coerce_string(first_present(raw, keys::TIER_LABEL)).unwrap_or_default();
    let required_hits = coerce_u32(first_present(raw, keys::TIER_HITS)).or_else(|| {
        HITS_IN_LABEL
            .captures(&label)
            .and_then(|caps| caps[1].parse().ok())
    });

    PrizeTier {
        label,
        required_hits,
        winner_count: coerce_count(first_present(raw, keys::TIER_WINNERS)),
        prize_amount: coerce_number(first_present(raw, keys::TIER_PRIZE)).unwrap_or(0.0),
    }
}

fn supplemental(root: &Value, lottery: LotteryId) -> SupplementalMarkers {
    let shared = coerce_string(first_present(root, keys::TEAM_OR_MONTH));

    let lucky_month = coerce_string(first_present(root, keys::LUCKY_MONTH)).or_else(|| {
        shared
            .clone()
            .filter(|_| lottery == LotteryId::DiaDeSorte)
    });
    let team = coerce_string(first_present(root, keys::TEAM))
        .or_else(|| shared.filter(|_| lottery == LotteryId::Timemania));

    SupplementalMarkers {
        clovers: drawn_list(first_present(root, keys::CLOVERS), 1),
        lucky_month,
        team,
    }
}

fn next_contest(root: &Value) -> NextContestInfo {
    let number_field = first_present(root, keys::NEXT_NUMBER);

    // Some providers nest the whole block under the number key
    if let Some(nested @ Value::Object(_)) = number_field {
        return NextContestInfo {
            number: coerce_u32(first_present(nested, keys::NESTED_NEXT_NUMBER)),
            date: coerce_string(first_present(nested, keys::NESTED_NEXT_DATE))
                .unwrap_or_default(),
            estimated_prize: coerce_number(first_present(nested, keys::NESTED_NEXT_ESTIMATE))
                .unwrap_or(0.0),
        };
    }

    NextContestInfo {
        number: coerce_u32(number_field),
        date: coerce_string(first_present(root, keys::NEXT_DATE)).unwrap_or_default(),
        estimated_prize: coerce_number(first_present(root, keys::NEXT_ESTIMATE)).unwrap_or(0.0),
    }
}

fn winner_locale(raw: &Value) -> WinnerLocale {
    WinnerLocale {
        city: coerce_string(first_present(raw, keys::LOCALE_CITY)).unwrap_or_default(),
        state: coerce_string(first_present(raw, keys::LOCALE_STATE)).unwrap_or_default(),
        winner_count: coerce_count(first_present(raw, keys::LOCALE_WINNERS)),
    }
}
