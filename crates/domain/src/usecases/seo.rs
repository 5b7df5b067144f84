//! SEO artifacts - robots.txt, sitemap.xml, JSON-LD and indexing URL lists
//!
//! Everything here is pure serialization of canonical results.

use serde_json::{Value, json};

use crate::model::{CanonicalResult, LotteryId, SiteInfo, format_contest_date};

/// How often a sitemap entry is expected to change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFrequency {
    Daily,
    Weekly,
    Never,
}

impl ChangeFrequency {
    fn as_str(self) -> &'static str {
        match self {
            ChangeFrequency::Daily => "daily",
            ChangeFrequency::Weekly => "weekly",
            ChangeFrequency::Never => "never",
        }
    }
}

/// One `<url>` element
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    pub loc: String,
    /// ISO date (`yyyy-mm-dd`)
    pub lastmod: Option<String>,
    pub changefreq: ChangeFrequency,
    pub priority: f32,
}

pub fn robots_txt(site: &SiteInfo) -> String {
    format!(
        "User-agent: *\nAllow: /\n\nSitemap: {}/sitemap.xml\n",
        site.base_url
    )
}

/// Sitemap entries for lottery pages, drawn contests and projected contests.
///
/// Each lottery page appears once, even when several results belong to it.
pub fn sitemap_entries(
    site: &SiteInfo,
    results: &[CanonicalResult],
    projections: &[CanonicalResult],
) -> Vec<SitemapEntry> {
    let mut entries = Vec::new();

    for lottery in LotteryId::ALL {
        let Some(latest) = results
            .iter()
            .filter(|r| r.lottery == lottery)
            .max_by_key(|r| r.contest_number)
        else {
            continue;
        };
        entries.push(SitemapEntry {
            loc: site.lottery_url(lottery),
            lastmod: iso_date(latest),
            changefreq: ChangeFrequency::Daily,
            priority: 0.9,
        });
    }

    entries.extend(
        results
            .iter()
            .filter(|r| r.contest_number > 0)
            .map(|r| SitemapEntry {
                loc: site.contest_url(r.lottery, r.contest_number),
                lastmod: iso_date(r),
                changefreq: ChangeFrequency::Never,
                priority: 0.7,
            }),
    );

    entries.extend(projections.iter().map(|r| SitemapEntry {
        loc: site.contest_url(r.lottery, r.contest_number),
        lastmod: None,
        changefreq: ChangeFrequency::Weekly,
        priority: 0.5,
    }));

    entries
}

pub fn sitemap_xml(entries: &[SitemapEntry]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );

    for entry in entries {
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", xml_escape(&entry.loc)));
        if let Some(lastmod) = &entry.lastmod {
            xml.push_str(&format!("    <lastmod>{}</lastmod>\n", xml_escape(lastmod)));
        }
        xml.push_str(&format!(
            "    <changefreq>{}</changefreq>\n",
            entry.changefreq.as_str()
        ));
        xml.push_str(&format!("    <priority>{:.1}</priority>\n", entry.priority));
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}

/// Pages affected when a contest is published
pub fn canonical_urls(site: &SiteInfo, result: &CanonicalResult) -> Vec<String> {
    vec![
        site.contest_url(result.lottery, result.contest_number),
        site.lottery_url(result.lottery),
    ]
}

/// schema.org graph (Event, BreadcrumbList, FAQPage) for a contest page
pub fn json_ld(site: &SiteInfo, result: &CanonicalResult) -> Value {
    let contest_url = site.contest_url(result.lottery, result.contest_number);
    let title = format!("{} concurso {}", result.name, result.contest_number);
    let numbers = result.drawn_numbers.join(" - ");

    let mut event = json!({
        "@type": "Event",
        "name": title,
        "url": contest_url,
        "eventStatus": "https://schema.org/EventScheduled",
        "organizer": {"@type": "Organization", "name": "Caixa Econômica Federal"},
    });
    if let Some(date) = iso_date(result) {
        event["startDate"] = json!(date);
    }
    if let Some(location) = &result.location {
        event["location"] = json!({"@type": "Place", "name": location});
    }
    if !numbers.is_empty() {
        event["description"] = json!(format!("Números sorteados: {}", numbers));
    }

    let breadcrumbs = json!({
        "@type": "BreadcrumbList",
        "itemListElement": [
            {"@type": "ListItem", "position": 1, "name": "Início", "item": site.base_url},
            {"@type": "ListItem", "position": 2, "name": result.name, "item": site.lottery_url(result.lottery)},
            {"@type": "ListItem", "position": 3, "name": title, "item": contest_url},
        ]
    });

    let winners_answer = if result.accumulated {
        "Não houve ganhadores na faixa principal; o prêmio acumulou.".to_string()
    } else {
        let winners = result.jackpot().map(|t| t.winner_count).unwrap_or(0);
        format!("Sim, {} aposta(s) acertaram a faixa principal.", winners)
    };

    let mut questions = Vec::new();
    if !numbers.is_empty() {
        questions.push(faq_entry(
            &format!("Quais foram os números sorteados no {}?", title),
            &numbers,
        ));
    }
    questions.push(faq_entry(
        &format!("Alguém ganhou o {}?", title),
        &winners_answer,
    ));

    json!({
        "@context": "https://schema.org",
        "@graph": [
            event,
            breadcrumbs,
            {"@type": "FAQPage", "mainEntity": questions},
        ]
    })
}

fn faq_entry(question: &str, answer: &str) -> Value {
    json!({
        "@type": "Question",
        "name": question,
        "acceptedAnswer": {"@type": "Answer", "text": answer},
    })
}

fn iso_date(result: &CanonicalResult) -> Option<String> {
    result.contest_date_parsed().map(|date| {
        format!(
            "{:04}-{:02}-{:02}",
            date.year(),
            u8::from(date.month()),
            date.day()
        )
    })
}

/// Human-readable date for page copy, falling back to the upstream text
pub fn display_date(result: &CanonicalResult) -> String {
    result
        .contest_date_parsed()
        .map(format_contest_date)
        .unwrap_or_else(|| result.contest_date.clone())
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use crate::usecases::future::project_range;

    fn site() -> SiteInfo {
        SiteInfo::new("https://loterias.example.com")
    }

    fn quina(contest: u32, winners: u64) -> CanonicalResult {
        normalize(
            &json!({
                "concurso": contest,
                "data": "08/03/2024",
                "local": "Espaço da Sorte",
                "dezenas": [3, 14, 25, 36, 47],
                "premiacao": [{"descricao": "5 acertos", "ganhadores": winners, "valor_premio": 1000}],
                "valor_estimado_proximo_concurso": 1000000
            }),
            LotteryId::Quina,
        )
    }

    #[test]
    fn test_robots_points_to_sitemap() {
        let robots = robots_txt(&site());
        assert!(robots.contains("User-agent: *"));
        assert!(robots.ends_with("Sitemap: https://loterias.example.com/sitemap.xml\n"));
    }

    #[test]
    fn test_sitemap_entries_cover_lottery_contest_and_future_pages() {
        let results = vec![quina(6400, 1), quina(6399, 0)];
        let projections = project_range(&results[0], 2);

        let entries = sitemap_entries(&site(), &results, &projections);
        let locs: Vec<&str> = entries.iter().map(|e| e.loc.as_str()).collect();

        assert_eq!(
            locs,
            vec![
                "https://loterias.example.com/quina",
                "https://loterias.example.com/quina/6400",
                "https://loterias.example.com/quina/6399",
                "https://loterias.example.com/quina/6401",
                "https://loterias.example.com/quina/6402",
            ]
        );
        assert_eq!(entries[0].lastmod.as_deref(), Some("2024-03-08"));
        assert_eq!(entries[3].changefreq, ChangeFrequency::Weekly);
    }

    #[test]
    fn test_sitemap_xml_is_escaped() {
        let entries = vec![SitemapEntry {
            loc: "https://example.com/?a=1&b=2".to_string(),
            lastmod: None,
            changefreq: ChangeFrequency::Daily,
            priority: 0.9,
        }];
        let xml = sitemap_xml(&entries);

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<loc>https://example.com/?a=1&amp;b=2</loc>"));
        assert!(xml.contains("<priority>0.9</priority>"));
        assert!(!xml.contains("<lastmod>"));
    }

    #[test]
    fn test_json_ld_graph() {
        let value = json_ld(&site(), &quina(6400, 0));
        let graph = value["@graph"].as_array().unwrap();

        assert_eq!(graph[0]["@type"], "Event");
        assert_eq!(graph[0]["startDate"], "2024-03-08");
        assert_eq!(graph[0]["location"]["name"], "Espaço da Sorte");
        assert_eq!(graph[1]["itemListElement"][2]["item"], "https://loterias.example.com/quina/6400");
        let answers = graph[2]["mainEntity"].as_array().unwrap();
        assert_eq!(answers.len(), 2);
        assert!(
            answers[1]["acceptedAnswer"]["text"]
                .as_str()
                .unwrap()
                .contains("acumulou")
        );
    }

    #[test]
    fn test_canonical_urls() {
        let urls = canonical_urls(&site(), &quina(6400, 1));
        assert_eq!(
            urls,
            vec![
                "https://loterias.example.com/quina/6400".to_string(),
                "https://loterias.example.com/quina".to_string(),
            ]
        );
    }
}
