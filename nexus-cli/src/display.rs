use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};
use textplots::Plot;

use nexus_db::models::Draw;
use nexus_engine::config::Strategy;
use nexus_engine::generator::Recommendation;
use nexus_engine::generator::projection::projection_index;
use nexus_engine::history::HistorySeries;
use nexus_engine::pipeline::AnalysisReport;
use nexus_engine::search::SearchCandidate;

fn numbers_str(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| format!("{:2}", n))
        .collect::<Vec<_>>()
        .join(" - ")
}

pub fn display_draws(draws: &[Draw]) {
    if draws.is_empty() {
        println!("Aucun tirage à afficher.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Tirage", "Numéros"]);

    for draw in draws {
        table.add_row(vec![draw.round().to_string(), numbers_str(draw.numbers())]);
    }

    println!("{table}");
}

pub fn display_fetch_summary(series: &HistorySeries) {
    let stats = series.stats();
    println!("Collecte terminée :");
    println!("  Tirages demandés  : {}", stats.requested);
    println!("  Nouveaux tirages  : {}", stats.new_draws);
    println!("  Ignorés           : {}", stats.skipped);
    println!("  Historique        : {} tirages", series.len());
    if let Some(latest) = series.latest() {
        println!("  Dernier tirage    : {} ({})", latest.round(), numbers_str(latest.numbers()));
    }
    println!("  Prochain tirage   : {}", series.next_round());
}

pub fn display_matches(draws: &[Draw], matches: &[SearchCandidate], window: usize) {
    if matches.is_empty() {
        println!("Aucune correspondance.");
        return;
    }

    println!("\n== Fenêtres similaires (W = {}) ==\n", window);
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Rang", "Offset", "Tirages", "Similarité", "Tirage suivant"]);

    for (rank, candidate) in matches.iter().enumerate() {
        let first = draws[candidate.offset + window - 1].round();
        let last = draws[candidate.offset].round();
        let projected = projection_index(candidate.offset, draws.len())
            .map(|i| numbers_str(draws[i].numbers()))
            .unwrap_or_else(|| "—".to_string());

        let color = if rank == 0 { Color::Green } else { Color::Reset };
        table.add_row(vec![
            Cell::new(rank + 1),
            Cell::new(candidate.offset),
            Cell::new(format!("{}–{}", first, last)),
            Cell::new(format!("{:.1}%", candidate.score * 100.0)).fg(color),
            Cell::new(projected),
        ]);
    }

    println!("{table}");
}

pub fn display_similarity_chart(scan: &[SearchCandidate]) {
    println!("\n== Similarité par offset ==\n");

    let points: Vec<(f32, f32)> = scan
        .iter()
        .filter(|c| c.score.is_finite())
        .map(|c| (c.offset as f32, c.score as f32))
        .collect();
    if points.len() < 2 {
        println!("  (Pas de données à afficher)");
        return;
    }

    let x_min = points[0].0;
    let x_max = points[points.len() - 1].0;
    let y_min = points.iter().map(|p| p.1).fold(f32::INFINITY, f32::min) - 0.01;
    let y_max = points.iter().map(|p| p.1).fold(f32::NEG_INFINITY, f32::max) + 0.01;

    let shape = textplots::Shape::Lines(&points);
    let mut chart = textplots::Chart::new_with_y_range(120, 40, x_min, x_max, y_min, y_max);
    println!("{}", chart.lineplot(&shape));
}

fn recommendation_table(recommendations: &[&Recommendation]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "Numéros", "Note"]);

    for (i, rec) in recommendations.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(rec.game.to_string()),
            Cell::new(rec.annotation.as_deref().unwrap_or("")),
        ]);
    }
    table
}

pub fn display_recommendations(report: &AnalysisReport) {
    for strategy in [
        Strategy::Projection,
        Strategy::Refinement,
        Strategy::Momentum,
        Strategy::Combination,
    ] {
        let recs: Vec<&Recommendation> = report.by_strategy(strategy).collect();
        if recs.is_empty() {
            continue;
        }
        println!("\n── {} ({} grilles) ──", strategy.label(), recs.len());
        if strategy == Strategy::Combination {
            if let Some(plan) = &report.plan {
                println!("  Noyau      : {}", numbers_str(&plan.core));
                println!("  Satellites : {}", numbers_str(&plan.satellites));
            }
        }
        println!("{}", recommendation_table(&recs));
    }
}

pub fn display_top_picks(report: &AnalysisReport) {
    let picks = report.top_picks();
    if picks.is_empty() {
        return;
    }

    println!("\n== Sélection du jour (tirage {}) ==\n", report.next_round);
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Stratégie", "Numéros"]);

    for rec in picks {
        table.add_row(vec![
            Cell::new(rec.strategy.label()),
            Cell::new(rec.game.to_string()).fg(Color::Green),
        ]);
    }
    println!("{table}");
}
