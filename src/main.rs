use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use travelprep::{ChecklistGenerator, ReferenceData, TravelPrepConfig, TripContext, logging};

fn read_trip(path: Option<PathBuf>) -> Result<TripContext> {
    let text = match &path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read trip file {}", path.display()))?,
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read trip from stdin")?;
            text
        }
    };

    serde_json::from_str(&text).context("Failed to parse trip context")
}

fn main() -> Result<()> {
    let config = TravelPrepConfig::load()?;
    logging::init(&config.logging)?;

    let reference = ReferenceData::load(&config.data)?;
    let trip = read_trip(std::env::args_os().nth(1).map(PathBuf::from))?;

    let checklist = match ChecklistGenerator::new(&reference)
        .with_settings(config.engine)
        .generate(&trip)
    {
        Ok(checklist) => checklist,
        Err(e) => {
            eprintln!("{}", e.user_message());
            return Err(e.into());
        }
    };

    println!("{}", serde_json::to_string_pretty(&checklist)?);
    Ok(())
}
