use crate::cli::CalibrateArgs;
use crate::locate::{window_distances, Calibration, WindowMatch};
use crate::utils::{load_template, parse_sequence, Result};

/// Prints the template baseline for an insert without reading any alignments.
pub fn calibrate(args: CalibrateArgs) -> Result<Calibration> {
    let query = parse_sequence(&args.query)?;
    let template = load_template(&args.template_path)?;
    log::info!(
        "Query length: {}, template length: {}",
        query.len(),
        template.len()
    );

    let distances = window_distances(&template, &query, args.metric)
        .map_err(|e| format!("Cannot calibrate against the template: {}", e))?;
    let best = WindowMatch::first_minimum(&template, query.len(), &distances, args.flank_len)
        .ok_or("Template has no window to scan")?;
    let num_best = distances.iter().filter(|&&d| d == best.distance).count();
    if num_best > 1 {
        log::warn!(
            "{} template windows share the minimum distance; reporting the first",
            num_best
        );
    }
    let calibration = Calibration::from_match(best);

    let best = &calibration.template_match;
    println!("metric\t{}", args.metric);
    println!("template_distance\t{}", calibration.template_distance());
    println!("cutoff\t{}", calibration.cutoff);
    println!("template_offset\t{}", best.offset);
    println!("template_match\t{}", String::from_utf8_lossy(&best.window));
    println!("template_context\t{}", best.context);
    println!("windows_at_minimum\t{}", num_best);

    Ok(calibration)
}
