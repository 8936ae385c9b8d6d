use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use data_loader::{DataIndex, MovieId, RaterId};
use engine::{ItemScore, RecommendationEngine};
use filters::{AllFilters, DirectorsFilter, Filter, GenreFilter, MinutesFilter, YearAfterFilter};
use rand::seq::IndexedRandom;
use server::{MovieRecommendation, RecommendationOrchestrator};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::{info, warn};

/// ReelRecs - Movie Recommendation Engine
#[derive(Parser)]
#[command(name = "reel-recs")]
#[command(about = "Movie recommendations from similar raters' tastes", long_about = None)]
struct Cli {
    /// Movies CSV (id,title,year,country,genre,director,minutes,poster)
    #[arg(long, global = true, default_value = "data/ratedmoviesfull.csv")]
    movies: PathBuf,

    /// Ratings CSV (rater_id,movie_id,rating,time)
    #[arg(long, global = true, default_value = "data/ratings.csv")]
    ratings: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Movie filter flags; every flag given must hold.
#[derive(Args, Debug, Default, Clone)]
struct FilterArgs {
    /// Shortest running time in minutes (inclusive)
    #[arg(long)]
    min_minutes: Option<u32>,

    /// Longest running time in minutes (inclusive)
    #[arg(long)]
    max_minutes: Option<u32>,

    /// Only movies released in or after this year
    #[arg(long)]
    year_after: Option<i32>,

    /// Only movies listing this genre
    #[arg(long)]
    genre: Option<String>,

    /// Comma-separated directors; any one of them is enough
    #[arg(long)]
    directors: Option<String>,
}

impl FilterArgs {
    fn to_filter(&self) -> Filter {
        let mut all = AllFilters::new();
        if self.min_minutes.is_some() || self.max_minutes.is_some() {
            all.push(MinutesFilter::new(
                self.min_minutes.unwrap_or(0),
                self.max_minutes.unwrap_or(u32::MAX),
            ));
        }
        if let Some(year) = self.year_after {
            all.push(YearAfterFilter::new(year));
        }
        if let Some(genre) = &self.genre {
            all.push(GenreFilter::new(genre.as_str()));
        }
        if let Some(directors) = &self.directors {
            all.push(DirectorsFilter::new(directors));
        }
        all.into()
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Get movie recommendations for a rater
    Recommend {
        /// Rater to recommend for (default: the most active rater)
        #[arg(long)]
        rater_id: Option<RaterId>,

        /// Number of recommendations to return
        #[arg(long, default_value = "15")]
        limit: usize,

        /// Show how each score was produced
        #[arg(long)]
        explain: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// List the raters most similar to a rater
    Similar {
        #[arg(long)]
        rater_id: RaterId,

        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Show average ratings, highest first
    Averages {
        /// Minimum number of raters per movie
        #[arg(long, default_value = "5")]
        min_raters: usize,

        #[arg(long, default_value = "20")]
        limit: usize,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Show a rater's profile and top-rated movies
    Rater {
        #[arg(long)]
        rater_id: RaterId,
    },

    /// Search for movies by title
    Search {
        /// Movie title to search for (case-insensitive substring match)
        #[arg(long)]
        title: String,
    },

    /// Print dataset statistics
    Stats {
        /// Genre to count movies for
        #[arg(long, default_value = "Comedy")]
        genre: String,

        /// Count movies longer than this many minutes
        #[arg(long, default_value = "150")]
        longer_than: u32,

        /// Movie to count raters for
        #[arg(long)]
        movie_id: Option<MovieId>,
    },

    /// Pick random movies for a new rater to rate
    ItemsToRate {
        #[arg(long, default_value = "15")]
        count: usize,
    },

    /// Run benchmark to test performance
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Number of concurrent requests
        #[arg(long, default_value = "10")]
        concurrent: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let data_index = load_data(&cli.movies, &cli.ratings)?;

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Recommend {
            rater_id,
            limit,
            explain,
            json,
            filter,
        } => handle_recommend(data_index, rater_id, limit, explain, json, &filter).await?,
        Commands::Similar { rater_id, limit } => handle_similar(data_index, &rater_id, limit)?,
        Commands::Averages {
            min_raters,
            limit,
            filter,
        } => handle_averages(data_index, min_raters, limit, &filter)?,
        Commands::Rater { rater_id } => handle_rater(data_index, &rater_id)?,
        Commands::Search { title } => handle_search(data_index, &title)?,
        Commands::Stats {
            genre,
            longer_than,
            movie_id,
        } => handle_stats(data_index, &genre, longer_than, movie_id.as_deref())?,
        Commands::ItemsToRate { count } => handle_items_to_rate(data_index, count)?,
        Commands::Benchmark {
            requests,
            concurrent,
        } => handle_benchmark(data_index, requests, concurrent).await?,
    }

    Ok(())
}

fn load_data(movies: &Path, ratings: &Path) -> Result<Arc<DataIndex>> {
    info!("Loading {} and {}", movies.display(), ratings.display());
    let start = Instant::now();
    let data_index = Arc::new(
        DataIndex::load_from_files(movies, ratings).context("Failed to load dataset")?,
    );
    let (movie_count, rater_count, rating_count) = data_index.counts();
    println!(
        "{} Loaded {} movies, {} raters, {} ratings in {:?}",
        "✓".green(),
        movie_count,
        rater_count,
        rating_count,
        start.elapsed()
    );
    Ok(data_index)
}

/// Handle the 'recommend' command
async fn handle_recommend(
    data_index: Arc<DataIndex>,
    rater_id: Option<RaterId>,
    limit: usize,
    explain: bool,
    json: bool,
    filter: &FilterArgs,
) -> Result<()> {
    let orchestrator = RecommendationOrchestrator::new(data_index.clone());

    let rater_id = match rater_id {
        Some(id) => {
            data_index
                .raters
                .get(&id)
                .ok_or_else(|| anyhow!("Rater {} not found", id))?;
            id
        }
        None => orchestrator
            .most_active_rater()
            .context("Dataset has no raters")?,
    };

    let filter = filter.to_filter();
    let recommendations = orchestrator
        .get_recommendations_by_filter(&rater_id, limit, &filter)
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&recommendations)?);
        return Ok(());
    }

    println!(
        "{}",
        format!("Recommendations for rater {} ({})", rater_id, filter)
            .bold()
            .blue()
    );
    if recommendations.is_empty() {
        println!("{}", "No recommendations found".yellow());
    }
    print_recommendations(&recommendations, explain);
    Ok(())
}

/// Handle the 'similar' command
fn handle_similar(data_index: Arc<DataIndex>, rater_id: &str, limit: usize) -> Result<()> {
    let rater = data_index
        .raters
        .get(rater_id)
        .ok_or_else(|| anyhow!("Rater {} not found", rater_id))?;
    let engine = RecommendationEngine::new(data_index.clone());

    let similar = engine.similar_raters(rater_id);
    println!(
        "{}",
        format!(
            "{} raters similar to {} ({} ratings)",
            similar.len(),
            rater_id,
            rater.num_ratings()
        )
        .bold()
        .blue()
    );
    for (i, s) in similar.iter().take(limit).enumerate() {
        let ratings = data_index
            .raters
            .get(&s.rater_id)
            .map(|r| r.num_ratings())
            .unwrap_or(0);
        println!(
            "{}. rater {} - weight {:.1} ({} ratings)",
            (i + 1).to_string().green(),
            s.rater_id,
            s.weight,
            ratings
        );
    }
    Ok(())
}

/// Handle the 'averages' command
fn handle_averages(
    data_index: Arc<DataIndex>,
    min_raters: usize,
    limit: usize,
    filter: &FilterArgs,
) -> Result<()> {
    let engine = RecommendationEngine::new(data_index.clone());
    let filter = filter.to_filter();

    let averages = engine.average_ratings_by_filter(min_raters, &filter);
    println!(
        "{}",
        format!(
            "{} movies with at least {} ratings ({})",
            averages.len(),
            min_raters,
            filter
        )
        .bold()
        .blue()
    );
    // Averages come lowest first
    print_scores(&data_index, averages.iter().rev().take(limit));
    Ok(())
}

/// Handle the 'rater' command
fn handle_rater(data_index: Arc<DataIndex>, rater_id: &str) -> Result<()> {
    let rater = data_index
        .raters
        .get(rater_id)
        .ok_or_else(|| anyhow!("Rater {} not found", rater_id))?;

    let num_ratings = rater.num_ratings();
    let avg_rating = if num_ratings > 0 {
        rater.ratings().map(|(_, r)| r).sum::<f64>() / num_ratings as f64
    } else {
        0.0
    };

    println!("{}", format!("Rater ID: {}", rater_id).bold().blue());
    println!("{}Number of ratings: {}", "• ".cyan(), num_ratings);
    println!("{}Average rating: {:.2}", "• ".cyan(), avg_rating);

    let mut top_rated: Vec<ItemScore> = rater
        .ratings()
        .map(|(movie_id, rating)| ItemScore::new(movie_id.clone(), rating))
        .collect();
    engine::rank(&mut top_rated, engine::SortOrder::Descending);

    println!("Top rated movies:");
    print_scores(&data_index, top_rated.iter().take(10));
    Ok(())
}

/// Handle the 'search' command
fn handle_search(data_index: Arc<DataIndex>, title: &str) -> Result<()> {
    let title_lower = title.to_lowercase();
    let movies = &data_index.movies;

    // Exact matches first, then substring matches, each by title
    let mut matches: Vec<(u8, &str, &MovieId)> = movies
        .movies()
        .filter_map(|movie| {
            let movie_title = movie.title.to_lowercase();
            if movie_title == title_lower {
                Some((0, movie.title.as_str(), &movie.id))
            } else if movie_title.contains(&title_lower) {
                Some((1, movie.title.as_str(), &movie.id))
            } else {
                None
            }
        })
        .collect();
    matches.sort();

    println!("{}", format!("Search results for '{}':", title).bold().blue());
    for (_, movie_title, movie_id) in matches.iter().take(20) {
        println!(
            "{}: {} ({}) [{}] {} min, {} ratings",
            movie_id,
            movie_title,
            movies.year(movie_id),
            movies.genres(movie_id),
            movies.minutes(movie_id),
            data_index.raters.raters_of(movie_id)
        );
    }
    Ok(())
}

/// Handle the 'stats' command
fn handle_stats(
    data_index: Arc<DataIndex>,
    genre: &str,
    longer_than: u32,
    movie_id: Option<&str>,
) -> Result<()> {
    let movies = &data_index.movies;
    let raters = &data_index.raters;

    println!("{}", "Movies".bold().blue());
    println!("{}Total: {}", "• ".green(), movies.len());
    println!("{}{}: {}", "• ".green(), genre, movies.count_in_genre(genre));
    println!(
        "{}Longer than {} minutes: {}",
        "• ".green(),
        longer_than,
        movies.count_longer_than(longer_than)
    );
    let directors = movies.top_directors();
    println!(
        "{}Most movies by one director: {} ({})",
        "• ".green(),
        directors.count,
        directors.names.join(", ")
    );
    println!("{}Genres:", "• ".green());
    for (name, count) in movies.genre_counts() {
        println!("    {}: {}", name, count);
    }

    println!("{}", "Raters".bold().blue());
    println!("{}Total: {}", "• ".cyan(), raters.len());
    println!("{}Ratings: {}", "• ".cyan(), raters.num_ratings());
    let top = raters.top_raters();
    println!(
        "{}Most ratings by one rater: {} ({})",
        "• ".cyan(),
        top.count,
        top.names.join(", ")
    );
    println!(
        "{}Distinct movies rated: {}",
        "• ".cyan(),
        raters.distinct_movies_rated()
    );
    if let Some(movie_id) = movie_id {
        println!(
            "{}Raters of {} ({}): {}",
            "• ".cyan(),
            movie_id,
            movies.title(movie_id),
            raters.raters_of(movie_id)
        );
    }

    let report = data_index.validate();
    if !report.is_clean() {
        println!(
            "{} {} ratings of unknown movies, {} ratings off the scale",
            "!".yellow(),
            report.unknown_movie_ratings,
            report.out_of_scale_ratings
        );
    }
    Ok(())
}

/// Handle the 'items-to-rate' command
fn handle_items_to_rate(data_index: Arc<DataIndex>, count: usize) -> Result<()> {
    let orchestrator = RecommendationOrchestrator::new(data_index.clone());
    let movies = &data_index.movies;

    println!("{}", "Please rate these movies:".bold().blue());
    for (i, movie_id) in orchestrator.items_to_rate(count).iter().enumerate() {
        println!(
            "{}. {} ({}) - {} min",
            (i + 1).to_string().green(),
            movies.title(movie_id),
            movies.year(movie_id),
            movies.minutes(movie_id)
        );
    }
    Ok(())
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    data_index: Arc<DataIndex>,
    requests: usize,
    concurrent: usize,
) -> Result<()> {
    let orchestrator = RecommendationOrchestrator::new(data_index.clone());
    let limit = orchestrator.config().max_results;

    // Pick random raters from the dataset
    let all_raters: Vec<RaterId> = data_index.raters.raters().map(|r| r.id.clone()).collect();
    let mut rng = rand::rng();
    let rater_ids: Vec<RaterId> = (0..requests)
        .filter_map(|_| all_raters.choose(&mut rng).cloned())
        .collect();
    if rater_ids.is_empty() {
        return Err(anyhow!("Dataset has no raters to benchmark"));
    }

    // Use tokio::spawn to make concurrent requests
    let permits = Arc::new(Semaphore::new(concurrent.max(1)));
    let start = Instant::now();
    let mut handles = vec![];
    for rater_id in rater_ids {
        let orchestrator = orchestrator.clone();
        let permits = permits.clone();
        let handle = tokio::spawn(async move {
            let _permit = permits.acquire_owned().await?;
            let start = Instant::now();
            orchestrator.get_recommendations(&rater_id, limit).await?;
            Ok::<_, anyhow::Error>(start.elapsed())
        });
        handles.push(handle);
    }

    // Wait for all tasks to complete and collect timings
    let mut timings = vec![];
    let mut failures = 0;
    for handle in handles {
        match handle.await? {
            Ok(elapsed) => timings.push(elapsed),
            Err(e) => {
                warn!("Benchmark request failed: {:#}", e);
                failures += 1;
            }
        }
    }
    let wall_time = start.elapsed();
    info!(
        "Benchmark finished: {} requests ok, {} failed in {:?}",
        timings.len(),
        failures,
        wall_time
    );
    if timings.is_empty() {
        return Err(anyhow!("Every benchmark request failed"));
    }

    let total_time: Duration = timings.iter().sum();
    let avg_latency = total_time / (timings.len() as u32);
    timings.sort();
    let p50 = percentile(&timings, 0.50);
    let p95 = percentile(&timings, 0.95);
    let p99 = percentile(&timings, 0.99);
    let throughput = timings.len() as f64 / wall_time.as_secs_f64();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Requests: {} ({} concurrent)", timings.len(), concurrent);
    println!("Total time: {:?}", wall_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", p50);
    println!("P95 latency: {:?}", p95);
    println!("P99 latency: {:?}", p99);
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

/// Value at fraction `p` of sorted, non-empty `timings`
fn percentile(timings: &[Duration], p: f64) -> Duration {
    let idx = ((timings.len() as f64 * p) as usize).min(timings.len() - 1);
    timings[idx]
}

/// Print movie scores as "rank. title (year) - value"
fn print_scores<'a>(data_index: &DataIndex, scores: impl Iterator<Item = &'a ItemScore>) {
    let movies = &data_index.movies;
    for (i, score) in scores.enumerate() {
        println!(
            "{}. {} ({}) - {:.2}",
            (i + 1).to_string().green(),
            movies.title(&score.movie_id),
            movies.year(&score.movie_id),
            score.value
        );
    }
}

/// Helper function to format and print recommendations
fn print_recommendations(recommendations: &[MovieRecommendation], explain: bool) {
    for (i, rec) in recommendations.iter().enumerate() {
        println!(
            "{}. {} ({}) [{}] - Score: {:.2}",
            (i + 1).to_string().green(),
            rec.title.bold(),
            rec.year,
            rec.genres.join(", "),
            rec.score
        );
        if explain {
            println!(
                "   {} min, directed by {}",
                rec.minutes,
                rec.directors.join(", ")
            );
            println!("   {}", rec.explanation.dimmed());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_flags_accept_everything() {
        let filter = FilterArgs::default().to_filter();
        assert_eq!(filter.to_string(), "any movie");
    }

    #[test]
    fn test_flags_compose() {
        let args = FilterArgs {
            min_minutes: Some(90),
            year_after: Some(2000),
            genre: Some("Drama".to_string()),
            ..Default::default()
        };

        let Filter::All(all) = args.to_filter() else {
            panic!("expected AllFilters");
        };
        assert_eq!(all.len(), 3);
        assert_eq!(
            all.filters()[0],
            Filter::Minutes(MinutesFilter::new(90, u32::MAX))
        );
    }

    #[test]
    fn test_load_data_reports_missing_files() {
        let err = load_data(Path::new("no/such/movies.csv"), Path::new("no/such/ratings.csv"))
            .unwrap_err();
        assert!(format!("{:#}", err).starts_with("Failed to load dataset"));
    }

    #[test]
    fn test_percentile() {
        let timings: Vec<Duration> = (1..=10).map(Duration::from_millis).collect();
        assert_eq!(percentile(&timings, 0.5), Duration::from_millis(6));
        assert_eq!(percentile(&timings, 0.99), Duration::from_millis(10));
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from([
            "reel-recs",
            "--movies",
            "m.csv",
            "averages",
            "--min-raters",
            "3",
            "--year-after",
            "1990",
        ])
        .unwrap();

        assert_eq!(cli.movies, PathBuf::from("m.csv"));
        assert!(matches!(
            cli.command,
            Commands::Averages { min_raters: 3, .. }
        ));
    }
}
