use anyhow::Result;
use tymetracker::Tracker;

pub fn run(tracker: &Tracker) -> Result<()> {
    tracker.init()?;
    println!("Initialized new data file {}", tracker.path().display());
    Ok(())
}
