use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use helix_client::HelixClient;
use streamkin_common::Config;
use streamkin_engine::pipeline::PipelineConfig;
use streamkin_engine::Recommender;

/// Recommend live channels whose audiences overlap a channel's followers.
#[derive(Debug, Parser)]
#[command(name = "streamkin", version, about)]
struct Args {
    /// Channel login to build recommendations for.
    channel: String,

    /// How many followers to sample.
    #[arg(long, default_value_t = 300)]
    sample_sz: usize,

    /// Skip followers who follow more than this many channels.
    #[arg(long, default_value_t = 150)]
    max_followings: usize,

    /// Minimum distinct sampled followers a candidate needs.
    #[arg(long, default_value_t = 3)]
    min_mutual: u32,

    /// Candidate batch size for the liveness lookup.
    #[arg(long, default_value_t = 100)]
    batch_sz: usize,

    /// Aggregation worker pool size.
    #[arg(long, default_value_t = 100)]
    n_consumers: usize,

    /// Keep only streams in this language ("any" disables the filter).
    #[arg(long, default_value = "en")]
    lang: String,

    /// Emit recommendations as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("streamkin=info".parse()?))
        .init();

    let args = Args::parse();
    let started = Instant::now();

    let config = Config::from_env();
    config.log_redacted();

    let client = HelixClient::with_base_url(
        config.client_id,
        config.bearer_token,
        config.helix_base_url,
    );

    let lang = (args.lang != "any").then(|| args.lang.clone());
    let recommender = Recommender::new(
        Arc::new(client),
        PipelineConfig {
            sample_sz: args.sample_sz,
            max_followings: args.max_followings,
            min_mutual: args.min_mutual,
            batch_sz: args.batch_sz,
            n_consumers: args.n_consumers,
            lang,
        },
    );

    let outcome = recommender.run(&args.channel).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome.recommendations)?);
        info!(
            recommendations = outcome.recommendations.len(),
            elapsed_secs = started.elapsed().as_secs_f32(),
            "Run finished"
        );
        return Ok(());
    }

    println!(
        "\nRecommendations for {} ({} followers):",
        outcome.origin.display_name,
        outcome
            .origin
            .total_followers
            .map_or_else(|| "?".to_string(), |t| t.to_string())
    );
    println!(
        "{:>20}  {:>7}  {:>11}  {:>4}  {:>9}  {:>7}  {:>6}",
        "channel", "viewers", "uptime", "lang", "followers", "score", "mutual"
    );
    for rec in &outcome.recommendations {
        println!(
            "{:>20}  {:>7}  {:>11}  {:>4}  {:>9}  {:>6.3}%  {:>6}",
            rec.stream.user_name,
            rec.stream.viewer_count,
            rec.duration,
            rec.stream.language,
            rec.stream
                .total_followers
                .map_or_else(|| "?".to_string(), |t| t.to_string()),
            rec.score * 100.0,
            rec.overlap,
        );
    }

    print!("{}", outcome.stats);
    info!(
        recommendations = outcome.recommendations.len(),
        elapsed_secs = started.elapsed().as_secs_f32(),
        "Run finished"
    );
    Ok(())
}
