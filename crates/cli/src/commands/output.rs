//! Human-readable rendering of results

use loterias_domain::CanonicalResult;
use loterias_domain::usecases::seo::display_date;

/// `1234567.8` -> `R$ 1.234.567,80`
pub(crate) fn format_brl(amount: f64) -> String {
    let cents = (amount * 100.0).round() as i64;
    let (sign, cents) = if cents < 0 { ("-", -cents) } else { ("", cents) };

    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    format!("{}R$ {},{:02}", sign, grouped, cents % 100)
}

pub(crate) fn print_result(result: &CanonicalResult) {
    println!("{} - Contest {}", result.name, result.contest_number);
    println!("=================================");

    if !result.contest_date.is_empty() {
        println!("Date: {}", display_date(result));
    }
    if let Some(location) = &result.location {
        println!("Location: {}", location);
    }

    println!("Numbers: {}", result.drawn_numbers.join(" "));
    if !result.secondary_drawn_numbers.is_empty() {
        println!("Second draw: {}", result.secondary_drawn_numbers.join(" "));
    }
    if !result.supplemental.clovers.is_empty() {
        println!("Clovers: {}", result.supplemental.clovers.join(" "));
    }
    if let Some(month) = &result.supplemental.lucky_month {
        println!("Lucky month: {}", month);
    }
    if let Some(team) = &result.supplemental.team {
        println!("Team: {}", team);
    }

    if !result.prize_tiers.is_empty() {
        println!();
        println!("Prize tiers:");
        for tier in &result.prize_tiers {
            println!(
                "  - {}: {} winner(s), {}",
                tier.label,
                tier.winner_count,
                format_brl(tier.prize_amount)
            );
        }
    }

    if !result.winner_locales.is_empty() {
        println!();
        println!("Winners:");
        for locale in &result.winner_locales {
            println!(
                "  - {}/{}: {}",
                locale.city, locale.state, locale.winner_count
            );
        }
    }

    println!();
    if result.accumulated {
        println!("Accumulated!");
    }

    let next = &result.next_contest;
    match next.number {
        Some(number) if !next.date.is_empty() => {
            println!("Next contest: {} on {}", number, next.date)
        }
        Some(number) => println!("Next contest: {}", number),
        None if !next.date.is_empty() => println!("Next contest on {}", next.date),
        None => {}
    }
    if next.estimated_prize > 0.0 {
        println!("Estimated prize: {}", format_brl(next.estimated_prize));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_brl() {
        assert_eq!(format_brl(0.0), "R$ 0,00");
        assert_eq!(format_brl(12.5), "R$ 12,50");
        assert_eq!(format_brl(1234.56), "R$ 1.234,56");
        assert_eq!(format_brl(45_000_000.0), "R$ 45.000.000,00");
        assert_eq!(format_brl(-999.999), "-R$ 1.000,00");
    }
}
