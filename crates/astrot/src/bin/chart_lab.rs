use anyhow::Context;
use chrono::{NaiveDate, NaiveTime};
use clap::Parser;

use astrot::summary::{
    format_degree, ChartInterpretation, ChartSummary, Interpreter, TemplateInterpreter,
};
use astrot::{BirthData, ChartBuilder};

#[derive(Parser, Debug)]
#[command(author, version, about = "Compute a birth chart and print it")]
struct Args {
    /// Birth date, YYYY-MM-DD
    date: NaiveDate,

    /// Local clock time, HH:MM
    #[arg(value_parser = parse_clock)]
    time: NaiveTime,

    #[arg(allow_hyphen_values = true)]
    latitude: f64,

    #[arg(allow_hyphen_values = true)]
    longitude: f64,

    #[arg(long, default_value = "UTC")]
    timezone: String,

    #[arg(long)]
    name: Option<String>,

    /// Print placements and the template reading instead of JSON
    #[arg(long)]
    summary: bool,

    /// With --summary, also print the sectioned reading
    #[arg(long)]
    sections: bool,
}

fn parse_clock(text: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(text, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M:%S"))
        .map_err(|e| format!("invalid time '{}': {}", text, e))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = astrot_config::load_settings()?;
    let builder = ChartBuilder::from_config(&config).context("building chart engine")?;
    log::info!(
        "provider {} with {} houses",
        builder.provider().name(),
        builder.settings().house_system
    );

    let birth = BirthData::new(
        args.date,
        args.time,
        args.latitude,
        args.longitude,
        args.timezone,
    );
    let chart = builder.build_bounded(&birth).await?;

    if !args.summary {
        println!("{}", serde_json::to_string_pretty(&chart)?);
        return Ok(());
    }

    let summary = ChartSummary::from_chart(args.name.as_deref(), &chart)?;
    for line in summary.placement_lines() {
        println!("{}", line);
    }
    println!(
        "Ascendant {} {}, Midheaven {} {}",
        format_degree(chart.angles.ascendant.degree),
        chart.angles.ascendant.sign,
        format_degree(chart.angles.midheaven.degree),
        chart.angles.midheaven.sign
    );
    for aspect in &chart.aspects {
        println!(
            "{} {} {} (orb {}{})",
            aspect.first,
            aspect.aspect.aspect_type.symbol(),
            aspect.second,
            format_degree(aspect.aspect.orb),
            if aspect.aspect.applying { ", applying" } else { "" }
        );
    }
    println!();
    println!("{}", TemplateInterpreter.interpret(&summary).await?);

    if args.sections {
        let reading = ChartInterpretation::from_summary(&summary);
        for (title, text) in [
            ("Sun", &reading.sun_sign),
            ("Moon", &reading.moon_sign),
            ("Rising", &reading.rising_sign),
            ("Big three", &reading.big_three),
            ("Personality", &reading.personality),
            ("Relationships", &reading.relationships),
            ("Career", &reading.career),
            ("Challenges", &reading.challenges),
            ("Strengths", &reading.strengths),
            ("Life theme", &reading.life_theme),
        ] {
            println!("\n{}\n{}", title, text);
        }
    }
    Ok(())
}
