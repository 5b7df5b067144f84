//! Future contest projection - placeholder results for contests not yet drawn
//!
//! Projections exist to pre-render pages; they are never authoritative. A
//! projected record has no drawn numbers and is always marked accumulated.

use time::{Date, Weekday};

use crate::model::{
    CanonicalResult, LotteryId, NextContestInfo, PrizeTier, SupplementalMarkers,
    format_contest_date,
};

/// Growth applied to the prize estimate per contest ahead
pub const ESTIMATE_GROWTH_PER_STEP: f64 = 0.1;

/// pt-BR weekday name, matching [`LotteryId::draw_days`]
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Monday => "segunda",
        Weekday::Tuesday => "terça",
        Weekday::Wednesday => "quarta",
        Weekday::Thursday => "quinta",
        Weekday::Friday => "sexta",
        Weekday::Saturday => "sábado",
        Weekday::Sunday => "domingo",
    }
}

/// Walk forward from `from` until `steps` draw days of `lottery` have passed.
///
/// `from` itself never counts. Returns None only if the calendar runs out.
pub fn nth_draw_date(lottery: LotteryId, from: Date, steps: u32) -> Option<Date> {
    let draw_days = lottery.draw_days();
    if draw_days.is_empty() {
        return None;
    }

    let mut day = from;
    let mut passed = 0;
    while passed < steps {
        day = day.next_day()?;
        if draw_days.contains(&weekday_name(day.weekday())) {
            passed += 1;
        }
    }
    Some(day)
}

/// Estimated prize `steps` contests ahead of a base estimate
pub fn projected_estimate(base: f64, steps: u32) -> f64 {
    base * (1.0 + ESTIMATE_GROWTH_PER_STEP * f64::from(steps))
}

/// Project the contest `steps_ahead` draws after `latest`.
///
/// Returns None when `latest` lacks a contest number or a parseable date, or
/// when `steps_ahead` is 0.
pub fn project(latest: &CanonicalResult, steps_ahead: u32) -> Option<CanonicalResult> {
    if steps_ahead == 0 || latest.contest_number == 0 {
        return None;
    }
    let lottery = latest.lottery;
    let from = latest.contest_date_parsed()?;

    let contest_number = latest.contest_number.checked_add(steps_ahead)?;
    let contest_date = nth_draw_date(lottery, from, steps_ahead)?;
    let following_date = nth_draw_date(lottery, contest_date, 1)?;
    let base = latest.next_contest.estimated_prize;

    Some(CanonicalResult {
        lottery,
        name: latest.name.clone(),
        contest_number,
        contest_date: format_contest_date(contest_date),
        location: None,
        drawn_numbers: Vec::new(),
        secondary_drawn_numbers: Vec::new(),
        supplemental: SupplementalMarkers::default(),
        prize_tiers: vec![PrizeTier {
            label: "Prêmio estimado".to_string(),
            required_hits: u32::try_from(lottery.expected_numbers()).ok(),
            winner_count: 0,
            prize_amount: projected_estimate(base, steps_ahead),
        }],
        accumulated: true,
        next_contest: NextContestInfo {
            number: contest_number.checked_add(1),
            date: format_contest_date(following_date),
            estimated_prize: projected_estimate(base, steps_ahead + 1),
        },
        winner_locales: Vec::new(),
    })
}

/// Projections for the next `count` contests after `latest`
pub fn project_range(latest: &CanonicalResult, count: u32) -> Vec<CanonicalResult> {
    (1..=count)
        .map_while(|steps| project(latest, steps))
        .collect()
}
