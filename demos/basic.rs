use fuzz_rush::{FuzzRush, MatchConfig, OutputFormat, TokenizeConfig};
use tracing_subscriber::EnvFilter;

fn main() -> fuzz_rush::Result<()> {
    // RUST_LOG=fuzz_rush=debug for engine details
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let source_names = vec!["Apple Inc", "Microsoft Corp"];
    let target_names = vec!["Apple", "Microsoft", "Google"];

    let mut matcher = FuzzRush::new(source_names, target_names);
    matcher.tokenize(&TokenizeConfig::default())?;

    let matches = matcher.match_names(&MatchConfig::default(), OutputFormat::Flat)?;
    if let Some(flat) = matches.as_flat() {
        println!("{:#?}", flat);
    }

    let grouped = matcher.match_names(&MatchConfig::default().ntop(3), OutputFormat::Grouped)?;
    println!("{:?}", grouped);
    Ok(())
}
