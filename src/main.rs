use dayclock::{
    build_schedule, logging, parse_sections, ClockConfig, ClockFace, ClockWindow, DocumentSource,
    FileSource, SECTIONS_RESOURCE,
};
use tracing::{debug, info};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let text = FileSource::new(".").fetch(SECTIONS_RESOURCE)?;
    let schedule = build_schedule(&parse_sections(&text));
    info!(sections = schedule.len(), "loaded schedule");
    for section in &schedule {
        debug!(
            name = %section.name,
            color = %section.color,
            start = section.start_minute,
            end = section.end_minute,
            "section"
        );
    }

    let face = ClockFace::new(schedule, ClockConfig::default());
    ClockWindow::new(face).show()?;
    Ok(())
}
